//! Settings controlling how metabolite and reaction files are turned into a network
use serde::{Deserialize, Serialize};

/// Options used while building a network
///
/// Every field has a default, so a partial JSON document (or an empty `{}`) deserializes
/// into a usable configuration.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Configuration {
    /// Lower bound given to reversible reactions without an explicit lower bound
    pub lower_bound: f64,
    /// Upper bound given to reactions without an explicit upper bound
    pub upper_bound: f64,
    /// Magnitude below which a merged stoichiometric coefficient counts as zero
    pub tolerance: f64,
    /// What to do when an identifier is defined twice
    pub duplicates: DuplicatePolicy,
    /// How a bound line with one blank bound field is resolved
    pub blank_bounds: BlankBoundPolicy,
}

impl Default for Configuration {
    fn default() -> Self {
        Configuration {
            lower_bound: -1000.,
            upper_bound: 1000.,
            tolerance: 1e-09,
            duplicates: DuplicatePolicy::Overwrite,
            blank_bounds: BlankBoundPolicy::Positional,
        }
    }
}

impl Configuration {
    /// Read a configuration from a JSON file
    pub fn read_json<P: AsRef<std::path::Path>>(path: P) -> Result<Self, ConfigurationError> {
        let data = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&data)?)
    }

    /// Lower bound used when none is given, which depends on the reaction direction
    pub fn default_lower_bound(&self, reversible: bool) -> f64 {
        if reversible {
            self.lower_bound
        } else {
            0.
        }
    }
}

/// Enum used to specify how duplicated identifiers are handled
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DuplicatePolicy {
    /// The later definition replaces the earlier one
    #[default]
    Overwrite,
    /// A repeated identifier aborts the load
    Reject,
}

/// Enum used to specify how a reaction line with both bound fields, one of them blank, is read
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BlankBoundPolicy {
    /// Reproduce the positional rules of the reaction file format: the given field is
    /// ignored and the upper bound is set to the default upper bound. A blank lower field
    /// gives the directional default lower bound, a blank upper field leaves the lower bound
    /// at 0
    #[default]
    Positional,
    /// Only the blank field takes its default, the other field is kept
    FillMissing,
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigurationError {
    #[error("Unable to read configuration file")]
    UnableToRead(#[from] std::io::Error),
    #[error("Unable to parse configuration: {0}")]
    UnableToParse(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json() {
        let config: Configuration =
            serde_json::from_str(r#"{"duplicates": "reject", "upper_bound": 500.0}"#).unwrap();
        assert_eq!(config.duplicates, DuplicatePolicy::Reject);
        assert_eq!(config.upper_bound, 500.);
        assert_eq!(config.lower_bound, -1000.);
        assert_eq!(config.blank_bounds, BlankBoundPolicy::Positional);
    }

    #[test]
    fn directional_lower_bound() {
        let config = Configuration::default();
        assert_eq!(config.default_lower_bound(true), -1000.);
        assert_eq!(config.default_lower_bound(false), 0.);
    }
}
