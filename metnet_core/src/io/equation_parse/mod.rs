//! Module for parsing reaction equation strings such as `2 A + B <-> C`

use thiserror::Error;

mod lexer;
pub mod parser;
mod token;

pub use lexer::LexerError;
pub use parser::ParseError;

/// One stoichiometric term of an equation side, the coefficient is always positive
#[derive(Debug, Clone, PartialEq)]
pub struct ReactionTerm {
    pub coefficient: f64,
    pub metabolite_id: String,
}

/// Result of parsing an equation
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedEquation {
    /// True if the equation used `<->`
    pub reversible: bool,
    /// Terms left of the arrow, in written order
    pub reactants: Vec<ReactionTerm>,
    /// Terms right of the arrow, in written order
    pub products: Vec<ReactionTerm>,
}

/// Parse a reaction equation into its direction and the terms on each side
///
/// # Parameters
/// - `input`: &str representing the equation, e.g. `"2 A + B <-> C"`
///
/// # Returns
/// Parse result which is
/// - `Ok`: the [`ParsedEquation`]
/// - `Err`: the EquationParseError describing the issue with the equation
///
/// # Note:
/// Metabolite ids are not checked against any catalog here.
///
/// # Examples
/// ```rust
/// use metnet_core::io::equation_parse::parse_equation;
/// let eq = parse_equation("2 atp + h2o -> 2 adp").unwrap();
/// assert!(!eq.reversible);
/// assert_eq!(eq.reactants[0].coefficient, 2.0);
/// assert_eq!(eq.products[0].metabolite_id, "adp");
/// ```
pub fn parse_equation(input: &str) -> Result<ParsedEquation, EquationParseError> {
    let mut lexer = lexer::Lexer::new(input);
    let tokens = lexer.lex()?;

    let mut parser = parser::EquationParser::new(tokens);
    let equation = parser.parse()?;
    Ok(equation)
}

/// Enum representing possible lex and parse errors
#[derive(Debug, Error, PartialEq, Clone)]
pub enum EquationParseError {
    /// Lexing Error
    #[error("Unable to split equation into tokens: {0}")]
    LexingError(#[from] LexerError),
    /// Parsing Error
    #[error("Unable to parse equation: {0}")]
    ParsingError(#[from] ParseError),
}
