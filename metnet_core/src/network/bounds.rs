//! Flux bound resolution for reaction lines
//!
//! A reaction line carries zero, one or two bound fields after its equation. Missing bounds
//! take defaults depending on the reaction direction:
//!
//! | fields         | reversible          | irreversible     |
//! |----------------|---------------------|------------------|
//! | none           | -1000, 1000         | 0, 1000          |
//! | lower only     | lower, 1000         | lower, 1000      |
//! | lower blank    | -1000, 1000         | 0, 1000          |
//! | upper blank    | 0, 1000             | 0, 1000          |
//! | both given     | lower, upper        | lower, upper     |
//!
//! The two blank rows follow [`BlankBoundPolicy::Positional`]: the given field is ignored, and
//! a blank upper field leaves the lower bound at its unset value of 0 whatever the direction.
//! With [`BlankBoundPolicy::FillMissing`] the given field is kept instead.
use log::warn;
use thiserror::Error;

use crate::configuration::{BlankBoundPolicy, Configuration};

/// Lower bound of a reaction whose lower field was never read
const UNSET_LOWER_BOUND: f64 = 0.;

/// Lower and upper flux bound of a reaction
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FluxBounds {
    pub lower: f64,
    pub upper: f64,
}

/// Resolve the flux bounds of a reaction
///
/// # Parameters
/// - `reversible`: whether the equation used the bidirectional arrow
/// - `fields`: the bound fields of the line, in order lower then upper, blank fields allowed
/// - `configuration`: provides the default bounds and the blank field policy
pub fn resolve_bounds(
    reversible: bool,
    fields: &[&str],
    configuration: &Configuration,
) -> Result<FluxBounds, BoundError> {
    let default_lower = configuration.default_lower_bound(reversible);
    let default_upper = configuration.upper_bound;
    let (lower, upper) = match fields {
        [] => (default_lower, default_upper),
        [lower] => (parse_bound(lower)?.unwrap_or(default_lower), default_upper),
        [lower, upper] => match (parse_bound(lower)?, parse_bound(upper)?) {
            (Some(lower), Some(upper)) => (lower, upper),
            (None, None) => (default_lower, default_upper),
            (lower, upper) => match configuration.blank_bounds {
                BlankBoundPolicy::Positional => {
                    if let Some(ignored) = lower.or(upper) {
                        warn!(
                            "Ignoring bound {} because the other bound field is blank",
                            ignored
                        );
                    }
                    // A blank upper field leaves the lower bound unset
                    match upper {
                        None => (UNSET_LOWER_BOUND, default_upper),
                        Some(_) => (default_lower, default_upper),
                    }
                }
                BlankBoundPolicy::FillMissing => {
                    (lower.unwrap_or(default_lower), upper.unwrap_or(default_upper))
                }
            },
        },
        _ => return Err(BoundError::TooManyFields(fields.len())),
    };
    if lower > upper {
        return Err(BoundError::Inverted { lower, upper });
    }
    Ok(FluxBounds { lower, upper })
}

/// Read a single bound field, a blank field gives None
fn parse_bound(field: &str) -> Result<Option<f64>, BoundError> {
    let field = field.trim();
    if field.is_empty() {
        return Ok(None);
    }
    match field.parse::<f64>() {
        Ok(value) if value.is_finite() => Ok(Some(value)),
        _ => Err(BoundError::InvalidValue(field.to_string())),
    }
}

#[derive(Debug, Error, PartialEq, Clone)]
pub enum BoundError {
    #[error("Lower bound {lower} is greater than upper bound {upper}")]
    Inverted { lower: f64, upper: f64 },
    #[error("Invalid bound value `{0}`")]
    InvalidValue(String),
    #[error("Expected at most 2 bound fields, found {0}")]
    TooManyFields(usize),
}
