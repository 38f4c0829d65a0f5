use std::iter::FusedIterator;

use tracing::trace;

use crate::{
    eval::Result,
    reduce::{beta, Step},
    store::Store,
    term::TermRef,
};

enum State {
    Start(TermRef),
    /// The last term handed out.
    Running(TermRef),
    Done,
}

/// Lazy reduction sequence: the initial term, then one term per reduction
/// step. Ends once no redex is left, so a term without a normal form never
/// ends; bound it with `take` or similar.
///
/// A failed expansion is yielded once and ends the sequence.
pub struct Normalize<'a> {
    state: State,
    store: &'a Store,
    steps: usize,
}

impl<'a> Normalize<'a> {
    pub(crate) fn new(term: TermRef, store: &'a Store) -> Self {
        Self {
            state: State::Start(term),
            store,
            steps: 0,
        }
    }

    /// Reductions performed so far.
    pub fn steps(&self) -> usize {
        self.steps
    }
}

impl Iterator for Normalize<'_> {
    type Item = Result<TermRef>;

    fn next(&mut self) -> Option<Self::Item> {
        match std::mem::replace(&mut self.state, State::Done) {
            State::Start(term) => {
                self.state = State::Running(term.clone());
                Some(Ok(term))
            }
            State::Running(term) => match beta(&term, self.store) {
                Ok(Step::Normal) => {
                    trace!(steps = self.steps, "normal form");
                    None
                }
                Ok(Step::Reduced(next) | Step::Unpacked { term: next, .. }) => {
                    self.steps += 1;
                    self.state = State::Running(next.clone());
                    Some(Ok(next))
                }
                Err(e) => Some(Err(e)),
            },
            State::Done => None,
        }
    }
}

impl FusedIterator for Normalize<'_> {}

#[cfg(test)]
mod test {
    use super::*;
    use crate::parser::parse;

    #[test]
    fn test_sentinel() {
        let store = Store::default();
        let mut sequence = Normalize::new(parse("(λx.x) ((λy.y) z)", &store), &store);
        assert_eq!(sequence.next().unwrap().unwrap().to_string(), "(λx.x) ((λy.y) z)");
        assert_eq!(sequence.next().unwrap().unwrap().to_string(), "(λy.y) z");
        assert_eq!(sequence.next().unwrap().unwrap().to_string(), "z");
        assert!(sequence.next().is_none());
        assert!(sequence.next().is_none());
        assert_eq!(sequence.steps(), 2);
    }

    #[test]
    fn test_last_term_is_normal() {
        let store = Store::default();
        let last = Normalize::new(parse("(λf x.f (f x)) (λy.y) a", &store), &store)
            .last()
            .unwrap()
            .unwrap();
        assert_eq!(last.to_string(), "a");
        assert_eq!(beta(&last, &store).unwrap(), Step::Normal);
    }

    #[test]
    fn test_snapshots_are_independent() {
        let store = Store::default();
        let terms: Vec<_> = Normalize::new(parse("(λx.x x) (λy.y)", &store), &store)
            .map(|term| term.unwrap())
            .collect();
        let rendered: Vec<_> = terms.iter().map(ToString::to_string).collect();
        assert_eq!(rendered, ["(λx.x x) (λy.y)", "(λy.y) (λy.y)", "λy.y"]);
    }

    #[test]
    fn test_error_ends_sequence() {
        use crate::term::Term;
        let store = Store::default();
        let term = Term::apply(Term::named("Z"), Term::var("a"));
        let mut sequence = Normalize::new(term, &store);
        assert!(sequence.next().unwrap().is_ok());
        assert!(sequence.next().unwrap().is_err());
        assert!(sequence.next().is_none());
    }
}
