use crate::io::equation_parse::token::Token;
use crate::io::equation_parse::{ParsedEquation, ReactionTerm};

use thiserror::Error;
/*
Equation Grammar:
equation -> side ARROW side ;
side -> ( term ( "+" term )* )? ;
term -> COEFFICIENT? IDENTIFIER ;
ARROW -> "<->" | "->" ;

e.g. 2 atp + h2o -> 2 adp + pi
 */

/// Reaction equation parser
pub struct EquationParser {
    /// Vector of tokens from the equation string
    tokens: Vec<Token>,
    /// Current token being processed
    current: usize,
}

impl EquationParser {
    /// Create a new EquationParser
    pub fn new(tokens: Vec<Token>) -> EquationParser {
        EquationParser { tokens, current: 0 }
    }

    // region Parsing Functions

    /// Parse the token vector into a [`ParsedEquation`]
    pub fn parse(&mut self) -> Result<ParsedEquation, ParseError> {
        let reactants = self.side()?;
        let reversible = if self.match_token(Token::ReversibleArrow) {
            true
        } else if self.match_token(Token::IrreversibleArrow) {
            false
        } else if self.is_at_end() {
            return Err(ParseError::MissingArrow);
        } else {
            return Err(ParseError::UnexpectedToken(self.peek().to_string()));
        };
        let products = self.side()?;
        if !self.is_at_end() {
            // A second arrow ends the right hand side early
            if self.peek().is_arrow() {
                return Err(ParseError::MultipleArrows);
            }
            return Err(ParseError::UnexpectedToken(self.peek().to_string()));
        }
        if reactants.is_empty() && products.is_empty() {
            return Err(ParseError::EmptyEquation);
        }
        Ok(ParsedEquation {
            reversible,
            reactants,
            products,
        })
    }

    fn side(&mut self) -> Result<Vec<ReactionTerm>, ParseError> {
        let mut terms = Vec::new();
        if self.check(&Token::Plus) {
            return Err(ParseError::ExpectedTerm);
        }
        if !self.at_term() {
            // Empty side, the arrow is at the start or end of the equation
            return Ok(terms);
        }
        terms.push(self.term()?);
        while self.match_token(Token::Plus) {
            if !self.at_term() {
                return Err(ParseError::ExpectedTerm);
            }
            terms.push(self.term()?);
        }
        Ok(terms)
    }

    fn term(&mut self) -> Result<ReactionTerm, ParseError> {
        let coefficient = match self.match_coefficient() {
            Some(raw) => EquationParser::coefficient_value(&raw)?,
            None => 1.,
        };
        match self.match_identifier() {
            Some(metabolite_id) => Ok(ReactionTerm {
                coefficient,
                metabolite_id,
            }),
            None => Err(ParseError::ExpectedIdentifier(self.peek().to_string())),
        }
    }

    fn coefficient_value(raw: &str) -> Result<f64, ParseError> {
        let value: f64 = raw
            .parse()
            .map_err(|_| ParseError::InvalidCoefficient(raw.to_string()))?;
        if !value.is_finite() {
            return Err(ParseError::InvalidCoefficient(raw.to_string()));
        }
        if value == 0. {
            return Err(ParseError::ZeroCoefficient(raw.to_string()));
        }
        Ok(value)
    }

    // endregion Parsing Functions

    // region parsing helper functions

    /// Check whether the current token can start a term
    fn at_term(&self) -> bool {
        matches!(self.peek(), Token::Coefficient(_) | Token::Identifier(_))
    }

    /// Check whether the token at the current position matches `token`, if it does
    /// advance [`self.current`] and return true, otherwise return false
    fn match_token(&mut self, token: Token) -> bool {
        if self.check(&token) {
            self.advance();
            return true;
        }
        false
    }

    /// Similar to [`match_token`], returns the raw coefficient text if the current token is
    /// a coefficient
    fn match_coefficient(&mut self) -> Option<String> {
        if let Token::Coefficient(raw) = self.peek() {
            let raw = raw.clone();
            self.advance();
            return Some(raw);
        }
        None
    }

    /// Similar to [`match_token`], returns the metabolite id if the current token is an
    /// identifier
    fn match_identifier(&mut self) -> Option<String> {
        if let Token::Identifier(id) = self.peek() {
            let id = id.clone();
            self.advance();
            return Some(id);
        }
        None
    }

    /// Check whether the current token matches the provided `token`
    fn check(&self, token: &Token) -> bool {
        if self.is_at_end() {
            return false;
        }
        self.peek() == token
    }

    /// Advance `self.current` one position unless at end of the token Vec
    fn advance(&mut self) {
        if !self.is_at_end() {
            self.current += 1;
        }
    }

    /// Check whether the parser is at the end of the token Vec
    fn is_at_end(&self) -> bool {
        *self.peek() == Token::Eof
    }

    /// Get the current token
    fn peek(&self) -> &Token {
        // The lexer always terminates the tokens with Eof
        self.tokens.get(self.current).unwrap_or(&Token::Eof)
    }

    // endregion parsing helper functions
}

/// Enum representing possible parse errors
#[derive(Debug, Error, PartialEq, Clone)]
pub enum ParseError {
    /// Neither `<->` nor `->` was found
    #[error("No reaction arrow found, expected `<->` or `->`")]
    MissingArrow,
    /// More than one arrow was found
    #[error("More than one reaction arrow found")]
    MultipleArrows,
    /// Both sides of the arrow are empty
    #[error("Equation has no metabolites on either side of the arrow")]
    EmptyEquation,
    /// A `+` was not followed (or preceded) by a term
    #[error("Expected a metabolite term next to `+`")]
    ExpectedTerm,
    /// A coefficient was not followed by a metabolite id
    #[error("Expected a metabolite id after the coefficient, found `{0}`")]
    ExpectedIdentifier(String),
    /// Token found where it is not allowed, e.g. two identifiers without a `+`
    #[error("Unexpected `{0}` in equation, check for a missing `+`")]
    UnexpectedToken(String),
    /// Coefficient could not be read as a number
    #[error("Invalid stoichiometric coefficient `{0}`")]
    InvalidCoefficient(String),
    /// Coefficient was zero
    #[error("Stoichiometric coefficient `{0}` is zero")]
    ZeroCoefficient(String),
}
