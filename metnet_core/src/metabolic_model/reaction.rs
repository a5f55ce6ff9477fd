//! This module provides a struct for representing reactions
use std::fmt::{Display, Formatter};

use derive_builder::Builder;
use indexmap::IndexMap;

/// Represents a reaction in the metabolic model
#[derive(Builder, Debug, Clone, PartialEq)]
pub struct Reaction {
    /// Used to identify the reaction
    pub id: String,
    /// Metabolite stoichiometry of the reaction
    ///
    /// Keyed by metabolite id, consumed metabolites have negative coefficients and
    /// produced metabolites positive ones.
    #[builder(default = "IndexMap::new()")]
    pub metabolites: IndexMap<String, f64>,
    /// Human-readable reaction name
    #[builder(default = "None")]
    pub name: Option<String>,
    /// Lower flux bound
    #[builder(default = "0.")]
    pub lower_bound: f64,
    /// Upper flux bound
    #[builder(default = "1000.")]
    pub upper_bound: f64,
    /// Whether the reaction was written with the bidirectional arrow
    #[builder(default = "false")]
    pub reversible: bool,
}

impl Reaction {
    /// Add `coefficient` to the stoichiometry of `metabolite_id`
    ///
    /// Contributions for a metabolite already in the reaction are summed, so a metabolite
    /// written twice ends up with a single net coefficient.
    pub fn add_metabolite(&mut self, metabolite_id: &str, coefficient: f64) {
        *self
            .metabolites
            .entry(metabolite_id.to_string())
            .or_insert(0.) += coefficient;
    }

    /// Iterate over the consumed metabolites, with their (negative) coefficients
    pub fn reactants(&self) -> impl Iterator<Item = (&String, &f64)> {
        self.metabolites.iter().filter(|(_, c)| **c < 0.)
    }

    /// Iterate over the produced metabolites, with their (positive) coefficients
    pub fn products(&self) -> impl Iterator<Item = (&String, &f64)> {
        self.metabolites.iter().filter(|(_, c)| **c > 0.)
    }

    /// Render the reaction as an equation string, e.g. `2 A + B <-> C`
    ///
    /// # Note:
    /// Unit coefficients are omitted, and a side without metabolites is left empty
    pub fn equation(&self) -> String {
        let render = |terms: Vec<(&String, &f64)>| {
            terms
                .into_iter()
                .map(|(id, coef)| {
                    let coef = coef.abs();
                    if coef == 1. {
                        id.to_string()
                    } else {
                        format!("{} {}", coef, id)
                    }
                })
                .collect::<Vec<String>>()
                .join(" + ")
        };
        let arrow = if self.reversible { "<->" } else { "->" };
        let left = render(self.reactants().collect());
        let right = render(self.products().collect());
        format!("{} {} {}", left, arrow, right).trim().to_string()
    }
}

impl Display for Reaction {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.id, self.equation())
    }
}
