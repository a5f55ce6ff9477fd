//! Module providing Token struct for lexing
use std::fmt::{Display, Formatter};

/// Represents Tokens in a reaction equation
#[derive(Debug, PartialEq, Clone, Eq, Hash)]
pub enum Token {
    /// Run of digits and decimal points in front of a metabolite id, kept as written
    Coefficient(String),
    Identifier(String),
    Plus,
    /// `<->`
    ReversibleArrow,
    /// `->`
    IrreversibleArrow,
    Eof,
}

impl Token {
    pub fn is_arrow(&self) -> bool {
        matches!(self, Token::ReversibleArrow | Token::IrreversibleArrow)
    }
}

impl Display for Token {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Token::Coefficient(c) => write!(f, "{}", c),
            Token::Identifier(id) => write!(f, "{}", id),
            Token::Plus => write!(f, "+"),
            Token::ReversibleArrow => write!(f, "<->"),
            Token::IrreversibleArrow => write!(f, "->"),
            Token::Eof => write!(f, "end of equation"),
        }
    }
}
