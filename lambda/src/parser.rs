use std::rc::Rc;

use thiserror::Error;

use crate::{
    lexer::{self, Token},
    store::Store,
    term::{Term, TermRef, BINDER},
};

/// Terms nested deeper than this are rejected. Every parenthesis, binder
/// parameter and argument of an application chain counts as one level.
pub const MAX_DEPTH: usize = 1024;

#[derive(PartialEq, Eq, Clone, Debug, Error)]
pub enum ParseError {
    #[error("Error: unmatched parenthesis")]
    UnmatchedParenthesis,
    #[error("Error: Improper Abstraction")]
    ImproperAbstraction,
    #[error("Error: unexpected `{0}`")]
    UnexpectedToken(String),
    #[error("Error: unexpected end of input")]
    UnexpectedEnd,
    #[error("Error: expression nested too deeply")]
    TooDeep,
    #[error("Error: {0}")]
    Lexical(String),
}
pub type Result<T> = std::result::Result<T, ParseError>;

/// Rewrites the `\` and `@` binder spellings to `λ`.
pub fn normalize_binders(input: &str) -> String {
    input.replace(['\\', '@'], &BINDER.to_string())
}

/// Parses `input`, resolving identifiers that are keys of `store` to named
/// references. Failures come back as a `Term::Error` leaf.
pub fn parse(input: &str, store: &Store) -> TermRef {
    match try_parse(input, store) {
        Ok(term) => term,
        Err(e) => Rc::new(Term::Error(e)),
    }
}

fn try_parse(input: &str, store: &Store) -> Result<TermRef> {
    check_parentheses(input)?;
    let tokens = lexer::tokenize(input).map_err(|e| ParseError::Lexical(format!("{e:?}")))?;
    let mut parser = Parser {
        tokens: &tokens,
        pos: 0,
        depth: 0,
        store,
    };
    let term = parser.parse_app()?;
    match parser.peek() {
        None => Ok(term),
        Some(token) => Err(ParseError::UnexpectedToken(token.to_string())),
    }
}

fn check_parentheses(input: &str) -> Result<()> {
    let mut open = 0usize;
    for c in input.chars() {
        match c {
            '(' => open += 1,
            ')' => open = open.checked_sub(1).ok_or(ParseError::UnmatchedParenthesis)?,
            _ => {}
        }
    }
    if open == 0 {
        Ok(())
    } else {
        Err(ParseError::UnmatchedParenthesis)
    }
}

struct Parser<'a> {
    tokens: &'a [Token],
    pos: usize,
    depth: usize,
    store: &'a Store,
}

impl<'a> Parser<'a> {
    fn peek(&self) -> Option<&'a Token> {
        self.tokens.get(self.pos)
    }

    fn advance(&mut self) -> Option<&'a Token> {
        let token = self.tokens.get(self.pos)?;
        self.pos += 1;
        Some(token)
    }

    fn expect(&mut self, expected: &Token) -> Result<()> {
        match self.advance() {
            Some(token) if token == expected => Ok(()),
            Some(token) => Err(ParseError::UnexpectedToken(token.to_string())),
            None => Err(ParseError::UnexpectedEnd),
        }
    }

    fn enter(&mut self) -> Result<()> {
        self.depth += 1;
        if self.depth > MAX_DEPTH {
            return Err(ParseError::TooDeep);
        }
        Ok(())
    }

    fn leave(&mut self, levels: usize) {
        self.depth -= levels;
    }

    /// `app := term (term)*`, stopping before `)` or the end of input.
    fn parse_app(&mut self) -> Result<TermRef> {
        let mut lhs = self.parse_term()?;
        let mut spine = 0;
        while !matches!(self.peek(), None | Some(Token::RParen)) {
            // `a b c` nests to the left
            self.enter()?;
            spine += 1;
            let rhs = self.parse_term()?;
            lhs = Term::apply(lhs, rhs);
        }
        self.leave(spine);
        Ok(lhs)
    }

    fn parse_term(&mut self) -> Result<TermRef> {
        match self.advance() {
            Some(Token::LParen) => {
                self.enter()?;
                let term = if self.peek() == Some(&Token::Lambda) {
                    self.advance();
                    self.parse_abs()?
                } else {
                    self.parse_app()?
                };
                self.expect(&Token::RParen)?;
                self.leave(1);
                Ok(term)
            }
            Some(Token::Lambda) => self.parse_abs(),
            Some(Token::Identifier(name)) => Ok(if self.store.contains(name) {
                Term::named(name.as_str())
            } else {
                Term::var(name.as_str())
            }),
            Some(token) => Err(ParseError::UnexpectedToken(token.to_string())),
            None => Err(ParseError::UnexpectedEnd),
        }
    }

    /// `abs := IDENT+ '.' app`, the binder already consumed.
    /// `λx y.t` is sugar for `λx.λy.t`.
    fn parse_abs(&mut self) -> Result<TermRef> {
        let mut params = vec![];
        loop {
            match self.advance() {
                Some(Token::Identifier(name)) => {
                    self.enter()?;
                    params.push(name.as_str());
                }
                Some(Token::Dot) if !params.is_empty() => break,
                _ => return Err(ParseError::ImproperAbstraction),
            }
        }
        let body = self.parse_app()?;
        self.leave(params.len());
        Ok(params
            .into_iter()
            .rev()
            .fold(body, |body, param| Term::abs(param, body)))
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn parse_plain(input: &str) -> TermRef {
        parse(input, &Store::default())
    }

    #[test]
    fn test_parse() {
        assert_eq!(parse_plain("λx.x"), Term::abs("x", Term::var("x")));
        assert_eq!(
            parse_plain("a b c"),
            Term::apply(Term::apply(Term::var("a"), Term::var("b")), Term::var("c"))
        );
        assert_eq!(
            parse_plain("(λx.x) y"),
            Term::apply(Term::abs("x", Term::var("x")), Term::var("y"))
        );
        assert_eq!(
            parse_plain("a (b c)"),
            Term::apply(Term::var("a"), Term::apply(Term::var("b"), Term::var("c")))
        );
    }

    #[test]
    fn test_binder_sugar_and_spellings() {
        let expected = Term::abs("x", Term::abs("y", Term::var("x")));
        assert_eq!(parse_plain("λx y.x"), expected);
        assert_eq!(parse_plain("\\x.\\y.x"), expected);
        assert_eq!(parse_plain("@x.(λy.x)"), expected);
    }

    #[test]
    fn test_body_is_greedy() {
        assert_eq!(
            parse_plain("a λx.x b"),
            Term::apply(
                Term::var("a"),
                Term::abs("x", Term::apply(Term::var("x"), Term::var("b")))
            )
        );
    }

    #[test]
    fn test_named_resolution() {
        let mut store = Store::default();
        store.insert("I", "λx.x".to_string());
        assert_eq!(
            parse("I a", &store),
            Term::apply(Term::named("I"), Term::var("a"))
        );
        // a parameter is always a plain variable
        assert_eq!(
            parse("λI.b", &store),
            Term::abs("I", Term::var("b"))
        );
    }

    #[test]
    fn test_errors() {
        assert_eq!(
            *parse_plain("(a"),
            Term::Error(ParseError::UnmatchedParenthesis)
        );
        assert_eq!(
            *parse_plain("a) (b"),
            Term::Error(ParseError::UnmatchedParenthesis)
        );
        assert_eq!(parse_plain("(a").to_string(), "Error: unmatched parenthesis");
        for input in ["λx y", "λ.x", "λx (y).x", "(λx) y"] {
            assert_eq!(
                *parse_plain(input),
                Term::Error(ParseError::ImproperAbstraction),
                "{input}"
            );
        }
        assert_eq!(*parse_plain(""), Term::Error(ParseError::UnexpectedEnd));
        assert_eq!(
            *parse_plain("()"),
            Term::Error(ParseError::UnexpectedToken(")".to_string()))
        );
        assert_eq!(
            *parse_plain("a . b"),
            Term::Error(ParseError::UnexpectedToken(".".to_string()))
        );
    }

    #[test]
    fn test_depth_is_bounded() {
        let deep = format!("{}x{}", "(".repeat(MAX_DEPTH + 1), ")".repeat(MAX_DEPTH + 1));
        assert_eq!(*parse_plain(&deep), Term::Error(ParseError::TooDeep));
        let ok = format!("{}x{}", "(".repeat(10), ")".repeat(10));
        assert_eq!(parse_plain(&ok), Term::var("x"));
        let binders = format!("{}x", "λx.".repeat(MAX_DEPTH + 1));
        assert_eq!(*parse_plain(&binders), Term::Error(ParseError::TooDeep));
    }

    #[test]
    fn test_application_chain_is_bounded() {
        let long = "x ".repeat(300_000);
        assert_eq!(*parse_plain(&long), Term::Error(ParseError::TooDeep));
        assert_eq!(parse_plain(&long).to_string(), "Error: expression nested too deeply");
        let params = format!("λ{}.x", " x".repeat(MAX_DEPTH + 1));
        assert_eq!(*parse_plain(&params), Term::Error(ParseError::TooDeep));

        let chain = "x ".repeat(100);
        let term = parse_plain(&chain);
        assert_eq!(term.to_string(), chain.trim_end());
        assert_eq!(term.free_vars().len(), 1);
    }

    #[test]
    fn test_round_trip() {
        for input in [
            "λx.x",
            "λx y.x",
            "(λx.x) y",
            "a b (c d)",
            "λf.(λx.f (x x)) (λx.f (x x))",
            "x (λy.y) z",
            "λx.x (λy.y)",
        ] {
            assert_eq!(parse_plain(input).to_string(), input);
            assert_eq!(parse_plain(&parse_plain(input).to_string()), parse_plain(input));
        }
    }
}
