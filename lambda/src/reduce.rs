use tracing::trace;

use crate::{
    eval::{EvalError, Result},
    parser,
    store::Store,
    subst::substitute,
    term::{Term, TermRef},
};

/// Outcome of a single `beta` call.
#[derive(PartialEq, Eq, Clone, Debug)]
pub enum Step {
    /// No redex left.
    Normal,
    /// An application of an abstraction was reduced.
    Reduced(TermRef),
    /// A named term in function position was replaced by its definition.
    Unpacked { term: TermRef, name: String },
}

impl Step {
    pub fn term(&self) -> Option<&TermRef> {
        match self {
            Step::Normal => None,
            Step::Reduced(term) | Step::Unpacked { term, .. } => Some(term),
        }
    }
}

#[derive(PartialEq, Eq, Clone, Copy, Debug)]
enum Phase {
    /// Only `(λx.t) s` is a redex.
    Ordinary,
    /// `N s` with `N` a named term is a redex as well.
    Named,
}

enum Found {
    Reduced(TermRef),
    /// The named term in function position was replaced by a variable of the
    /// same name, still to be substituted by its definition.
    Marked(TermRef, String),
}

/// Leftmost-outermost search for the first redex eligible in `phase`.
fn step(term: &TermRef, phase: Phase) -> Option<Found> {
    use Term::*;
    match term.as_ref() {
        Var(_) | Named(_) | Error(_) => None,
        Abs(x, body) => Some(match step(body, phase)? {
            Found::Reduced(body) => Found::Reduced(Term::abs(x.as_str(), body)),
            Found::Marked(body, name) => Found::Marked(Term::abs(x.as_str(), body), name),
        }),
        Apply(lhs, rhs) => {
            if let Abs(x, body) = lhs.as_ref() {
                return Some(Found::Reduced(substitute(body, x, rhs)));
            }
            if let (Named(name), Phase::Named) = (lhs.as_ref(), phase) {
                return Some(Found::Marked(
                    Term::apply(Term::var(name.as_str()), rhs.clone()),
                    name.clone(),
                ));
            }
            if let Some(found) = step(lhs, phase) {
                return Some(match found {
                    Found::Reduced(lhs) => Found::Reduced(Term::apply(lhs, rhs.clone())),
                    Found::Marked(lhs, name) => {
                        Found::Marked(Term::apply(lhs, rhs.clone()), name)
                    }
                });
            }
            Some(match step(rhs, phase)? {
                Found::Reduced(rhs) => Found::Reduced(Term::apply(lhs.clone(), rhs)),
                Found::Marked(rhs, name) => Found::Marked(Term::apply(lhs.clone(), rhs), name),
            })
        }
    }
}

/// Performs at most one reduction on `term`. Ordinary redexes anywhere in the
/// term take priority over expanding a named term.
pub fn beta(term: &TermRef, store: &Store) -> Result<Step> {
    match step(term, Phase::Ordinary).or_else(|| step(term, Phase::Named)) {
        Some(Found::Reduced(term)) => {
            trace!(%term, "reduced");
            Ok(Step::Reduced(term))
        }
        Some(Found::Marked(marked, name)) => {
            let definition = store
                .get(&name)
                .ok_or_else(|| EvalError::Undefined(name.clone()))?;
            let definition = parser::parse(definition, store);
            // Substituted from the root so that every enclosing binder takes part
            // in capture avoidance.
            let term = substitute(&marked, &name, &definition);
            trace!(%name, %term, "unpacked");
            Ok(Step::Unpacked { term, name })
        }
        None => Ok(Step::Normal),
    }
}
