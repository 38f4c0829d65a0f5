use std::collections::HashSet;

use crate::term::{Term, TermRef};

/// Replaces every free `target` in `term` with `replacement`, renaming binders
/// of `term` that would capture a free variable of `replacement`.
pub fn substitute(term: &TermRef, target: &str, replacement: &TermRef) -> TermRef {
    let unavailable = replacement.free_vars();
    substitute_rec(term, target, replacement, &unavailable)
}

fn substitute_rec(
    term: &TermRef,
    target: &str,
    replacement: &TermRef,
    unavailable: &HashSet<String>,
) -> TermRef {
    use Term::*;
    match term.as_ref() {
        Var(x) if x == target => replacement.clone(),
        Var(_) | Named(_) | Error(_) => term.clone(),
        Apply(lhs, rhs) => Term::apply(
            substitute_rec(lhs, target, replacement, unavailable),
            substitute_rec(rhs, target, replacement, unavailable),
        ),
        // shadowed
        Abs(x, _) if x == target => term.clone(),
        Abs(x, body) if unavailable.contains(x) => {
            let body_vars = body.free_vars();
            let fresh = fresh_name(x, |name| {
                name == target || unavailable.contains(name) || body_vars.contains(name)
            });
            let body = substitute(body, x, &Term::var(fresh.as_str()));
            Term::abs(
                fresh,
                substitute_rec(&body, target, replacement, unavailable),
            )
        }
        Abs(x, body) => Term::abs(
            x.as_str(),
            substitute_rec(body, target, replacement, unavailable),
        ),
    }
}

/// Appends `'` to `name` until the result is not `taken`.
fn fresh_name(name: &str, taken: impl Fn(&str) -> bool) -> String {
    let mut fresh = format!("{name}'");
    while taken(&fresh) {
        fresh.push('\'');
    }
    fresh
}
