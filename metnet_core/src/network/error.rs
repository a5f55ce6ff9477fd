use thiserror::Error;

use crate::lookup::LookupError;
use crate::network::bounds::BoundError;

/// Errors aborting the load of a metabolite or reaction file
///
/// Line numbers start at 1 and count blank lines.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("Malformed line {line}: {details}")]
    Format { line: usize, details: String },

    #[error("Line {line}: formula lookup for `{name}` failed: {source}")]
    Lookup {
        line: usize,
        name: String,
        #[source]
        source: LookupError,
    },

    #[error("Line {line}: reaction `{reaction}` references unknown metabolite `{metabolite}`")]
    UnknownMetabolite {
        line: usize,
        reaction: String,
        metabolite: String,
    },

    #[error("Line {line}: invalid bounds for reaction `{reaction}`: {source}")]
    Bound {
        line: usize,
        reaction: String,
        #[source]
        source: BoundError,
    },

    #[error("Line {line}: metabolite `{metabolite}` has a net coefficient of zero in reaction `{reaction}`")]
    NetZeroStoichiometry {
        line: usize,
        reaction: String,
        metabolite: String,
    },

    #[error("Line {line}: identifier `{id}` is already defined")]
    DuplicateIdentifier { line: usize, id: String },

    #[error("Unable to read input file: {0}")]
    UnableToRead(#[from] std::io::Error),
}

impl LoadError {
    pub fn format(line: usize, details: impl Into<String>) -> Self {
        Self::Format {
            line,
            details: details.into(),
        }
    }

    /// Line of the input which caused the error, None for read failures
    pub fn line(&self) -> Option<usize> {
        match self {
            LoadError::Format { line, .. }
            | LoadError::Lookup { line, .. }
            | LoadError::UnknownMetabolite { line, .. }
            | LoadError::Bound { line, .. }
            | LoadError::NetZeroStoichiometry { line, .. }
            | LoadError::DuplicateIdentifier { line, .. } => Some(*line),
            LoadError::UnableToRead(_) => None,
        }
    }
}

/// Errors raised when records are added to a registry directly
#[derive(Debug, Error, PartialEq, Clone)]
pub enum RegistryError {
    #[error("Reaction `{reaction}` references unknown metabolite `{metabolite}`")]
    UnknownMetabolite { reaction: String, metabolite: String },
    #[error("Identifier `{0}` is already defined")]
    DuplicateIdentifier(String),
    #[error("Reaction `{reaction}` has lower bound {lower} above upper bound {upper}")]
    InvertedBounds {
        reaction: String,
        lower: f64,
        upper: f64,
    },
    #[error("Reaction `{reaction}` has a zero coefficient for metabolite `{metabolite}`")]
    ZeroCoefficient { reaction: String, metabolite: String },
}
