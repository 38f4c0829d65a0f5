use thiserror::Error;
use tracing::debug;

use crate::{
    library,
    normalize::Normalize,
    parser::{self, ParseError},
    reduce::{self, Step},
    store::Store,
    term::{Term, TermRef},
};

#[derive(Debug, Error)]
pub enum EvalError {
    #[error("Named term `{0}` is not defined")]
    Undefined(String),
    #[error("`{0}` cannot be used as a name")]
    InvalidName(String),
    #[error("Definition of `{name}` does not parse: {source}")]
    InvalidDefinition { name: String, source: ParseError },
}
pub type Result<T> = std::result::Result<T, EvalError>;

/// One evaluator per store; named terms of different evaluators never mix.
#[derive(Default, Debug)]
pub struct Evaluator {
    store: Store,
}

impl Evaluator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn store(&self) -> &Store {
        &self.store
    }

    pub fn parse(&self, input: &str) -> TermRef {
        parser::parse(input, &self.store)
    }

    pub fn beta(&self, term: &TermRef) -> Result<Step> {
        reduce::beta(term, &self.store)
    }

    /// Binds `name` to `raw`. If the first step of `raw` would already be a
    /// named-term expansion, that step is taken now and its result is stored
    /// instead; otherwise `raw` is kept as written.
    pub fn define(&mut self, name: &str, raw: &str) -> Result<()> {
        if !is_identifier(name) {
            return Err(EvalError::InvalidName(name.to_string()));
        }
        let term = self.parse(raw);
        if let Term::Error(source) = term.as_ref() {
            return Err(EvalError::InvalidDefinition {
                name: name.to_string(),
                source: source.clone(),
            });
        }
        let definition = match self.beta(&term)? {
            Step::Unpacked { term, .. } => term.to_string(),
            Step::Normal | Step::Reduced(_) => parser::normalize_binders(raw.trim()),
        };
        debug!(%name, %definition, "define");
        if let Some(previous) = self.store.insert(name, definition) {
            debug!(%name, %previous, "redefined");
        }
        Ok(())
    }

    /// The reduction sequence of `term`, starting with `term` itself.
    pub fn normalize(&self, term: TermRef) -> Normalize<'_> {
        Normalize::new(term, &self.store)
    }

    pub fn evaluate(&self, input: &str) -> Normalize<'_> {
        self.normalize(self.parse(input))
    }

    /// Defines every entry of the library sections aliased by one of `names`,
    /// in file order. Returns the names defined.
    pub fn import(&mut self, source: &str, names: &[&str]) -> Result<Vec<String>> {
        let mut defined = vec![];
        for section in library::sections(source) {
            if !section.aliases.iter().any(|alias| names.contains(alias)) {
                continue;
            }
            debug!(section = section.title(), "import");
            for (name, raw) in section.definitions() {
                self.define(name, raw)?;
                defined.push(name.to_string());
            }
        }
        Ok(defined)
    }
}

fn is_identifier(name: &str) -> bool {
    matches!(
        crate::lexer::tokenize(name).as_deref(),
        Ok([crate::lexer::Token::Identifier(_)])
    )
}
