use lexgen::lexer;
use thiserror::Error;

pub type LexerError = lexgen_util::LexerError<LexicalError>;

#[derive(Clone, PartialEq, Eq, Debug)]
pub enum Token {
    LParen,
    RParen,
    Lambda,
    Dot,
    Identifier(String),
}

impl std::fmt::Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Token::LParen => f.write_str("("),
            Token::RParen => f.write_str(")"),
            Token::Lambda => write!(f, "{}", crate::term::BINDER),
            Token::Dot => f.write_str("."),
            Token::Identifier(name) => f.write_str(name),
        }
    }
}

#[derive(Debug, Error)]
pub enum LexicalError {}

lexer! {
    pub Lexer -> Token;
    type Error = LexicalError;
    let ws = [' ' '\t' '\n' '\r'];
    let ident = _ # [' ' '\t' '\n' '\r' '(' ')' '.' 'λ' '\\' '@'];

    $ws,
    "(" = Token::LParen,
    ")" = Token::RParen,
    "λ" | "\\" | "@" = Token::Lambda,
    "." = Token::Dot,
    $ident+ => |lexer| lexer.return_(Token::Identifier(lexer.match_().to_string())),
}

/// Splits `input` into tokens. Identifiers are maximal runs of characters that
/// are neither whitespace nor one of `( ) . λ \ @`.
pub fn tokenize(input: &str) -> Result<Vec<Token>, LexerError> {
    Lexer::new(input)
        .map(|token| token.map(|(_, token, _)| token))
        .collect()
}
