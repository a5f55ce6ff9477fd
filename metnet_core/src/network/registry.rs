//! This module provides the NetworkRegistry, which accumulates metabolites and reactions
use std::fs;
use std::path::Path;

use indexmap::IndexMap;
use log::{info, warn};
use nalgebra::DMatrix;

use crate::configuration::{Configuration, DuplicatePolicy};
use crate::lookup::FormulaResolver;
use crate::metabolic_model::metabolite::Metabolite;
use crate::metabolic_model::model::{stoichiometric_matrix, Model};
use crate::metabolic_model::reaction::Reaction;
use crate::network::assembler::build_reaction;
use crate::network::catalog::extend_catalog;
use crate::network::error::{LoadError, RegistryError};
use crate::network::input_lines;

/// Owns the metabolite catalog and the reactions built against it
#[derive(Debug, Clone, Default)]
pub struct NetworkRegistry {
    configuration: Configuration,
    /// Map of metabolite ids to Metabolite Objects
    metabolites: IndexMap<String, Metabolite>,
    /// Map of reaction ids to Reaction Objects
    reactions: IndexMap<String, Reaction>,
}

impl NetworkRegistry {
    pub fn new(configuration: Configuration) -> Self {
        Self {
            configuration,
            metabolites: IndexMap::new(),
            reactions: IndexMap::new(),
        }
    }

    pub fn configuration(&self) -> &Configuration {
        &self.configuration
    }

    pub fn metabolites(&self) -> &IndexMap<String, Metabolite> {
        &self.metabolites
    }

    pub fn reactions(&self) -> &IndexMap<String, Reaction> {
        &self.reactions
    }

    // region Loading

    /// Add the metabolites described by `source` to the catalog
    ///
    /// # Parameters
    /// - `source`: contents of a metabolite file, one `Identifier;DisplayName;Compartment`
    ///     record per line
    /// - `resolver`: used to find the formula of every metabolite
    ///
    /// # Returns
    /// The number of metabolites read, the catalog is unchanged on error
    pub fn load_metabolites<R: FormulaResolver + ?Sized>(
        &mut self,
        source: &str,
        resolver: &R,
    ) -> Result<usize, LoadError> {
        let count = extend_catalog(&mut self.metabolites, source, resolver, &self.configuration)?;
        info!(
            "Loaded {} metabolites, catalog now holds {}",
            count,
            self.metabolites.len()
        );
        Ok(count)
    }

    /// Read a metabolite file and add its metabolites to the catalog
    pub fn read_metabolites<P: AsRef<Path>, R: FormulaResolver + ?Sized>(
        &mut self,
        path: P,
        resolver: &R,
    ) -> Result<usize, LoadError> {
        let source = fs::read_to_string(path)?;
        self.load_metabolites(&source, resolver)
    }

    /// Build the reactions described by `source` and add them to the registry
    ///
    /// # Parameters
    /// - `source`: contents of a reaction file, one
    ///     `Identifier;DisplayName;Equation[;LowerBound[;UpperBound]]` record per line
    ///
    /// # Returns
    /// The number of reactions read, the registry is unchanged on error
    pub fn load_reactions(&mut self, source: &str) -> Result<usize, LoadError> {
        let mut staged = self.reactions.clone();
        let mut count = 0;
        for (line_number, line) in input_lines(source) {
            let reaction = build_reaction(line_number, line, &self.metabolites, &self.configuration)?;
            if staged.contains_key(&reaction.id) {
                match self.configuration.duplicates {
                    DuplicatePolicy::Reject => {
                        return Err(LoadError::DuplicateIdentifier {
                            line: line_number,
                            id: reaction.id,
                        })
                    }
                    DuplicatePolicy::Overwrite => warn!(
                        "Line {}: reaction {} redefined, replacing the earlier definition",
                        line_number, reaction.id
                    ),
                }
            }
            staged.insert(reaction.id.clone(), reaction);
            count += 1;
        }
        self.reactions = staged;
        info!(
            "Loaded {} reactions, registry now holds {}",
            count,
            self.reactions.len()
        );
        Ok(count)
    }

    /// Read a reaction file and add its reactions to the registry
    pub fn read_reactions<P: AsRef<Path>>(&mut self, path: P) -> Result<usize, LoadError> {
        let source = fs::read_to_string(path)?;
        self.load_reactions(&source)
    }

    // endregion Loading

    // region Direct insertion

    /// Add a metabolite to the catalog
    pub fn add_metabolite(&mut self, metabolite: Metabolite) -> Result<(), RegistryError> {
        self.check_duplicate(self.metabolites.contains_key(&metabolite.id), &metabolite.id)?;
        self.metabolites.insert(metabolite.id.clone(), metabolite);
        Ok(())
    }

    /// Add a reaction, every metabolite it uses must already be in the catalog
    ///
    /// The reaction is held to the same rules as a loaded one: its lower bound may not exceed
    /// its upper bound and no coefficient may be within the configured tolerance of zero. A
    /// reaction with an id already in the registry replaces it, unless the configuration
    /// rejects duplicates.
    pub fn add_reaction(&mut self, reaction: Reaction) -> Result<(), RegistryError> {
        if reaction.lower_bound > reaction.upper_bound {
            return Err(RegistryError::InvertedBounds {
                reaction: reaction.id.clone(),
                lower: reaction.lower_bound,
                upper: reaction.upper_bound,
            });
        }
        if let Some((met_id, _)) = reaction
            .metabolites
            .iter()
            .find(|(_, coef)| coef.abs() <= self.configuration.tolerance)
        {
            return Err(RegistryError::ZeroCoefficient {
                reaction: reaction.id.clone(),
                metabolite: met_id.clone(),
            });
        }
        if let Some(missing) = reaction
            .metabolites
            .keys()
            .find(|met_id| !self.metabolites.contains_key(*met_id))
        {
            return Err(RegistryError::UnknownMetabolite {
                reaction: reaction.id.clone(),
                metabolite: missing.clone(),
            });
        }
        self.check_duplicate(self.reactions.contains_key(&reaction.id), &reaction.id)?;
        self.reactions.insert(reaction.id.clone(), reaction);
        Ok(())
    }

    fn check_duplicate(&self, exists: bool, id: &str) -> Result<(), RegistryError> {
        if exists {
            match self.configuration.duplicates {
                DuplicatePolicy::Reject => {
                    return Err(RegistryError::DuplicateIdentifier(id.to_string()))
                }
                DuplicatePolicy::Overwrite => warn!("Replacing existing entry {}", id),
            }
        }
        Ok(())
    }

    // endregion Direct insertion

    // region Hand-off

    /// Get the full catalog and reaction collections
    pub fn export(&self) -> (&IndexMap<String, Metabolite>, &IndexMap<String, Reaction>) {
        (&self.metabolites, &self.reactions)
    }

    /// Create a [`Model`] from the registry contents
    ///
    /// When `id` is None the model id is `"{name}_1"`.
    pub fn build_model(&self, name: &str, id: Option<&str>) -> Model {
        let (metabolites, reactions) = self.export();
        Model::from_network(name, id, metabolites, reactions)
    }

    /// Build the metabolite by reaction stoichiometric matrix of the whole catalog
    pub fn compute_incidence_matrix(&self) -> DMatrix<f64> {
        let (metabolites, reactions) = self.export();
        stoichiometric_matrix(metabolites, reactions)
    }

    // endregion Hand-off
}
