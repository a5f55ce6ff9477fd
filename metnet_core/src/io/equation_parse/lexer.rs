//! Lex a reaction equation string into a series of tokens for later parsing
//!
//! Tokens are separated by whitespace. A word is an arrow (`<->` or `->`), a plus sign, or a
//! stoichiometric term: a leading run of digits and decimal points (the coefficient) followed
//! by the metabolite identifier. A word made only of digits is a coefficient whose
//! identifier is the next word.

use thiserror::Error;

use crate::io::equation_parse::token::Token;

pub struct Lexer {
    source: Vec<char>,
    tokens: Vec<Token>,
    start: usize,
    current: usize,
}

impl Lexer {
    pub fn new(source: &str) -> Self {
        Lexer {
            source: source.chars().collect(),
            tokens: Vec::new(),
            start: 0,
            current: 0,
        }
    }

    /// Convert the source into tokens, the returned Vec always ends with [`Token::Eof`]
    pub fn lex(&mut self) -> Result<Vec<Token>, LexerError> {
        while !self.is_at_end() {
            self.start = self.current;
            self.scan_token()?;
        }

        self.tokens.push(Token::Eof);
        Ok(std::mem::take(&mut self.tokens))
    }

    fn scan_token(&mut self) -> Result<(), LexerError> {
        let c: char = self.advance();
        match c {
            // Whitespace
            c if c.is_whitespace() => {}
            c if c.is_control() => return Err(LexerError::InvalidCharacter(c)),
            _ => self.read_word()?,
        };
        Ok(())
    }

    fn advance(&mut self) -> char {
        let char_at_current = self.source[self.current];
        self.current += 1;
        char_at_current
    }

    fn read_word(&mut self) -> Result<(), LexerError> {
        while !self.is_at_end() && !self.peek().is_whitespace() {
            if self.peek().is_control() {
                return Err(LexerError::InvalidCharacter(self.peek()));
            }
            self.advance();
        }

        let text: String = self.source[self.start..self.current].iter().collect();

        match text.as_str() {
            "<->" => self.add_token(Token::ReversibleArrow),
            "->" => self.add_token(Token::IrreversibleArrow),
            "+" => self.add_token(Token::Plus),
            word if word.contains("->") => {
                return Err(LexerError::UnseparatedArrow(word.to_string()))
            }
            word => self.read_term(word),
        }
        Ok(())
    }

    fn read_term(&mut self, word: &str) {
        let split = word
            .find(|c: char| !Lexer::is_coefficient_char(c))
            .unwrap_or(word.len());
        let (coefficient, identifier) = word.split_at(split);
        if !coefficient.is_empty() {
            self.add_token(Token::Coefficient(coefficient.to_string()));
        }
        if !identifier.is_empty() {
            self.add_token(Token::Identifier(identifier.to_string()));
        }
    }

    fn is_coefficient_char(c: char) -> bool {
        matches!(c, '0'..='9' | '.')
    }

    fn peek(&self) -> char {
        if self.is_at_end() {
            return '\0';
        }
        self.source[self.current]
    }

    fn add_token(&mut self, token: Token) {
        self.tokens.push(token);
    }

    fn is_at_end(&self) -> bool {
        self.current >= self.source.len()
    }
}

#[derive(Debug, Error, PartialEq, Clone)]
pub enum LexerError {
    #[error("Invalid character {0:?} in equation")]
    InvalidCharacter(char),
    #[error("Arrow in `{0}` must be separated from metabolites by whitespace")]
    UnseparatedArrow(String),
}

#[cfg(test)]
mod tests {
    use crate::io::equation_parse::lexer::{Lexer, LexerError};
    use crate::io::equation_parse::token::Token;

    #[test]
    fn test_single_term() {
        let mut lexer = Lexer::new("glc__D_e");
        let tokens = lexer.lex().unwrap();
        assert_eq!(tokens.len(), 2);
        assert_eq!(tokens[0], Token::Identifier(String::from("glc__D_e")));
        assert_eq!(tokens[1], Token::Eof);
    }

    #[test]
    fn test_reversible() {
        let mut lexer = Lexer::new("2A + B <-> 0.5C");
        let tokens = lexer.lex().unwrap();
        let expected_tokens = vec![
            Token::Coefficient(String::from("2")),
            Token::Identifier(String::from("A")),
            Token::Plus,
            Token::Identifier(String::from("B")),
            Token::ReversibleArrow,
            Token::Coefficient(String::from("0.5")),
            Token::Identifier(String::from("C")),
            Token::Eof,
        ];
        assert_eq!(tokens, expected_tokens);
    }

    #[test]
    fn test_separated_coefficient() {
        let mut lexer = Lexer::new("  2 A ->");
        let tokens = lexer.lex().unwrap();
        let expected_tokens = vec![
            Token::Coefficient(String::from("2")),
            Token::Identifier(String::from("A")),
            Token::IrreversibleArrow,
            Token::Eof,
        ];
        assert_eq!(tokens, expected_tokens);
    }

    #[test]
    fn test_identifier_symbols() {
        // Only a standalone plus separates terms
        let mut lexer = Lexer::new("h+ + co2-c -> 10fe3+");
        let tokens = lexer.lex().unwrap();
        let expected_tokens = vec![
            Token::Identifier(String::from("h+")),
            Token::Plus,
            Token::Identifier(String::from("co2-c")),
            Token::IrreversibleArrow,
            Token::Coefficient(String::from("10")),
            Token::Identifier(String::from("fe3+")),
            Token::Eof,
        ];
        assert_eq!(tokens, expected_tokens);
    }

    #[test]
    fn test_unseparated_arrow() {
        let mut lexer = Lexer::new("A->B");
        assert_eq!(
            lexer.lex(),
            Err(LexerError::UnseparatedArrow(String::from("A->B")))
        );
    }

    #[test]
    fn test_control_character() {
        let mut lexer = Lexer::new("A\u{7}B -> C");
        assert_eq!(lexer.lex(), Err(LexerError::InvalidCharacter('\u{7}')));
    }
}
