use std::{collections::HashSet, rc::Rc};

use crate::parser::ParseError;

pub type TermRef = Rc<Term>;

/// The glyph every binder spelling is normalized to.
pub const BINDER: char = 'λ';

#[derive(PartialEq, Eq, Clone, Debug)]
pub enum Term {
    /// `x`
    Var(String),
    /// `λx. t`
    Abs(String, TermRef),
    /// `t t`
    Apply(TermRef, TermRef),
    /// A name bound in the evaluator's store, expanded on demand.
    Named(String),
    /// Input that failed to parse. Never reduces.
    Error(ParseError),
}

impl Term {
    pub fn var(name: impl Into<String>) -> TermRef {
        Rc::new(Term::Var(name.into()))
    }

    pub fn abs(param: impl Into<String>, body: TermRef) -> TermRef {
        Rc::new(Term::Abs(param.into(), body))
    }

    pub fn apply(lhs: TermRef, rhs: TermRef) -> TermRef {
        Rc::new(Term::Apply(lhs, rhs))
    }

    pub fn named(name: impl Into<String>) -> TermRef {
        Rc::new(Term::Named(name.into()))
    }

    /// Names occurring free in the term. Named references contribute nothing,
    /// their expansion is deferred.
    pub fn free_vars(&self) -> HashSet<String> {
        fn rec<'a>(term: &'a Term, bound: &mut Vec<&'a str>, acc: &mut HashSet<String>) {
            match term {
                Term::Var(x) => {
                    if !bound.contains(&x.as_str()) {
                        acc.insert(x.clone());
                    }
                }
                Term::Abs(x, body) => {
                    bound.push(x);
                    rec(body, bound, acc);
                    bound.pop();
                }
                Term::Apply(lhs, rhs) => {
                    rec(lhs, bound, acc);
                    rec(rhs, bound, acc);
                }
                Term::Named(_) | Term::Error(_) => {}
            }
        }
        let mut acc = HashSet::new();
        rec(self, &mut vec![], &mut acc);
        acc
    }
}

impl std::fmt::Display for Term {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        use Term::*;
        match self {
            Var(x) | Named(x) => f.write_str(x),
            Abs(x, body) => {
                write!(f, "{BINDER}{x}")?;
                // λx.λy.t prints as λx y.t
                let mut body = body;
                while let Abs(y, inner) = body.as_ref() {
                    write!(f, " {y}")?;
                    body = inner;
                }
                write!(f, ".{body}")
            }
            Apply(lhs, rhs) => {
                if matches!(lhs.as_ref(), Abs(..)) {
                    write!(f, "({lhs})")?;
                } else {
                    write!(f, "{lhs}")?;
                }
                if matches!(rhs.as_ref(), Abs(..) | Apply(..)) {
                    write!(f, " ({rhs})")
                } else {
                    write!(f, " {rhs}")
                }
            }
            Error(e) => write!(f, "{e}"),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_display() {
        let id = Term::abs("x", Term::var("x"));
        assert_eq!(id.to_string(), "λx.x");
        assert_eq!(
            Term::abs("x", Term::abs("y", Term::var("x"))).to_string(),
            "λx y.x"
        );
        assert_eq!(
            Term::apply(id.clone(), Term::var("y")).to_string(),
            "(λx.x) y"
        );
        assert_eq!(
            Term::apply(
                Term::apply(Term::var("a"), Term::var("b")),
                Term::apply(Term::var("c"), id.clone())
            )
            .to_string(),
            "a b (c (λx.x))"
        );
        assert_eq!(
            Term::abs("f", Term::apply(Term::named("I"), Term::var("f"))).to_string(),
            "λf.I f"
        );
        assert_eq!(
            Term::Error(ParseError::UnmatchedParenthesis).to_string(),
            "Error: unmatched parenthesis"
        );
    }

    #[test]
    fn test_free_vars() {
        let term = Term::apply(
            Term::abs("x", Term::apply(Term::var("x"), Term::var("yz"))),
            Term::apply(Term::var("x"), Term::named("I")),
        );
        let expected: HashSet<String> = ["yz", "x"].into_iter().map(String::from).collect();
        assert_eq!(term.free_vars(), expected);
        assert!(Term::abs("x", Term::var("x")).free_vars().is_empty());
    }
}
