//! This module provides the metabolite struct representing a metabolite

use derive_builder::Builder;

/// Represents a metabolite
#[derive(Builder, Debug, Clone, PartialEq)]
pub struct Metabolite {
    /// Used to identify the metabolite (must be unique)
    pub id: String,
    /// Human Readable name of the metabolite
    #[builder(default = "None")]
    pub name: Option<String>,
    /// Which compartment the metabolite is in
    #[builder(default = "None")]
    pub compartment: Option<String>,
    /// Chemical Formula of the metabolite
    #[builder(default = "None")]
    pub formula: Option<String>,
}

impl Metabolite {
    /// Create a new metabolite with only an id
    pub fn new_id_only(id: String) -> Metabolite {
        Metabolite {
            id,
            name: None,
            compartment: None,
            formula: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_defaults() {
        let met = MetaboliteBuilder::default()
            .id("atp".to_string())
            .formula(Some("C10H16N5O13P3".to_string()))
            .build()
            .unwrap();
        assert_eq!(met.id, "atp");
        assert_eq!(met.formula.unwrap(), "C10H16N5O13P3");
        assert!(met.name.is_none());
        assert!(met.compartment.is_none());
    }

    #[test]
    fn builder_requires_id() {
        assert!(MetaboliteBuilder::default().build().is_err());
    }
}
