//! This module provides the Model struct for representing an entire metabolic model
use indexmap::IndexMap;
use log::{debug, warn};
use nalgebra::DMatrix;
use nalgebra_sparse::{CooMatrix, CscMatrix};

use crate::metabolic_model::metabolite::Metabolite;
use crate::metabolic_model::reaction::Reaction;

/// Represents a metabolic network model, the hand-off point for matrix construction and
/// file export
#[derive(Clone, Debug, PartialEq)]
pub struct Model {
    /// Map of reaction ids to Reaction Objects
    pub reactions: IndexMap<String, Reaction>,
    /// Map of metabolite ids to Metabolite Objects
    pub metabolites: IndexMap<String, Metabolite>,
    /// Id associated with the Model
    pub id: Option<String>,
    /// Human readable name of the Model
    pub name: Option<String>,
}

impl Model {
    pub fn new_empty() -> Self {
        Model {
            reactions: IndexMap::new(),
            metabolites: IndexMap::new(),
            id: None,
            name: None,
        }
    }

    /// Create a model from a set of metabolites and reactions
    ///
    /// # Parameters
    /// - `name`: name of the model
    /// - `id`: id of the model, when None the id is `"{name}_1"`
    /// - `metabolites`: catalog the reactions were built against
    /// - `reactions`: reactions making up the model
    ///
    /// # Note:
    /// Only the metabolites which take part in at least one reaction are carried into the
    /// model, in catalog order.
    pub fn from_network(
        name: &str,
        id: Option<&str>,
        metabolites: &IndexMap<String, Metabolite>,
        reactions: &IndexMap<String, Reaction>,
    ) -> Self {
        let mut model = Model::new_empty();
        model.name = Some(name.to_string());
        model.id = Some(match id {
            Some(id) => id.to_string(),
            None => format!("{}_1", name),
        });
        for (met_id, met) in metabolites {
            if reactions
                .values()
                .any(|rxn| rxn.metabolites.contains_key(met_id))
            {
                model.add_metabolite(met.clone());
            } else {
                warn!("Metabolite {} is not used by any reaction, leaving it out of the model", met_id);
            }
        }
        for rxn in reactions.values() {
            model.add_reaction(rxn.clone());
        }
        debug!(
            "Created model {:?} with {} metabolites and {} reactions",
            model.id,
            model.metabolites.len(),
            model.reactions.len()
        );
        model
    }

    /// Add a metabolite to the model, replacing any metabolite with the same id
    pub fn add_metabolite(&mut self, metabolite: Metabolite) {
        let id = metabolite.id.clone();
        self.metabolites.insert(id, metabolite);
    }

    /// Add a reaction to the model
    ///
    /// # Parameters
    /// - reaction: Reaction to add
    ///
    /// # Note:
    /// Metabolites referenced by the reaction which are not yet in the model are added with
    /// only their id set.
    ///
    /// # Examples
    /// ```rust
    /// use metnet_core::metabolic_model::model::Model;
    /// use metnet_core::metabolic_model::reaction::ReactionBuilder;
    /// let mut model = Model::new_empty();
    /// let mut new_reaction = ReactionBuilder::default().id("new_reaction".to_string()).build().unwrap();
    /// new_reaction.add_metabolite("A", -1.);
    /// model.add_reaction(new_reaction);
    /// assert!(model.metabolites.contains_key("A"));
    /// ```
    pub fn add_reaction(&mut self, reaction: Reaction) {
        for met_id in reaction.metabolites.keys() {
            if !self.metabolites.contains_key(met_id) {
                self.add_metabolite(Metabolite::new_id_only(met_id.clone()));
            }
        }
        let id = reaction.id.clone();
        self.reactions.insert(id, reaction);
    }

    /// Create the dense stoichiometric matrix of the model
    ///
    /// Rows follow the order of [`Model::metabolites`], columns the order of
    /// [`Model::reactions`].
    pub fn stoichiometric_matrix(&self) -> DMatrix<f64> {
        stoichiometric_matrix(&self.metabolites, &self.reactions)
    }

    /// Create the stoichiometric matrix of the model in compressed sparse column form
    pub fn sparse_stoichiometric_matrix(&self) -> CscMatrix<f64> {
        let mut coo = CooMatrix::new(self.metabolites.len(), self.reactions.len());
        for (col, rxn) in self.reactions.values().enumerate() {
            for (met_id, coef) in &rxn.metabolites {
                if let Some(row) = self.metabolites.get_index_of(met_id) {
                    coo.push(row, col, *coef);
                }
            }
        }
        CscMatrix::from(&coo)
    }
}

/// Build the dense metabolite by reaction stoichiometric matrix of a network
///
/// Reaction terms referring to metabolites missing from `metabolites` are ignored.
pub fn stoichiometric_matrix(
    metabolites: &IndexMap<String, Metabolite>,
    reactions: &IndexMap<String, Reaction>,
) -> DMatrix<f64> {
    let mut matrix = DMatrix::zeros(metabolites.len(), reactions.len());
    for (col, rxn) in reactions.values().enumerate() {
        for (met_id, coef) in &rxn.metabolites {
            if let Some(row) = metabolites.get_index_of(met_id) {
                matrix[(row, col)] = *coef;
            }
        }
    }
    matrix
}

#[cfg(test)]
mod model_tests {
    use super::*;
    use crate::metabolic_model::metabolite::MetaboliteBuilder;
    use crate::metabolic_model::reaction::ReactionBuilder;

    fn setup_network() -> (IndexMap<String, Metabolite>, IndexMap<String, Reaction>) {
        let mut metabolites = IndexMap::new();
        for id in ["A", "B", "C", "unused"] {
            metabolites.insert(
                id.to_string(),
                MetaboliteBuilder::default()
                    .id(id.to_string())
                    .compartment(Some("c".to_string()))
                    .build()
                    .unwrap(),
            );
        }
        let mut r1 = ReactionBuilder::default()
            .id("R1".to_string())
            .build()
            .unwrap();
        r1.add_metabolite("A", -2.);
        r1.add_metabolite("B", 1.);
        let mut r2 = ReactionBuilder::default()
            .id("R2".to_string())
            .lower_bound(-1000.)
            .reversible(true)
            .build()
            .unwrap();
        r2.add_metabolite("B", -1.);
        r2.add_metabolite("C", 1.);
        let mut reactions = IndexMap::new();
        reactions.insert("R1".to_string(), r1);
        reactions.insert("R2".to_string(), r2);
        (metabolites, reactions)
    }

    #[test]
    fn from_network() {
        let (metabolites, reactions) = setup_network();
        let model = Model::from_network("toy", None, &metabolites, &reactions);
        assert_eq!(model.id.unwrap(), "toy_1");
        assert_eq!(model.name.unwrap(), "toy");
        let ids: Vec<&String> = model.metabolites.keys().collect();
        assert_eq!(ids, vec!["A", "B", "C"]);
        assert_eq!(model.reactions.len(), 2);

        let model = Model::from_network("toy", Some("toy_model"), &metabolites, &reactions);
        assert_eq!(model.id.unwrap(), "toy_model");
    }

    #[test]
    fn add_reaction_adds_missing_metabolites() {
        let mut model = Model::new_empty();
        let mut rxn = ReactionBuilder::default()
            .id("R".to_string())
            .build()
            .unwrap();
        rxn.add_metabolite("X", -1.);
        model.add_reaction(rxn);
        assert_eq!(model.metabolites["X"], Metabolite::new_id_only("X".to_string()));
    }

    #[test]
    fn dense_matrix() {
        let (metabolites, reactions) = setup_network();
        let model = Model::from_network("toy", None, &metabolites, &reactions);
        let s = model.stoichiometric_matrix();
        assert_eq!(s.shape(), (3, 2));
        assert_eq!(s[(0, 0)], -2.);
        assert_eq!(s[(1, 0)], 1.);
        assert_eq!(s[(1, 1)], -1.);
        assert_eq!(s[(2, 1)], 1.);
        assert_eq!(s[(2, 0)], 0.);
        assert_eq!(s[(0, 1)], 0.);
    }

    #[test]
    fn sparse_matrix_matches_dense() {
        let (metabolites, reactions) = setup_network();
        let model = Model::from_network("toy", None, &metabolites, &reactions);
        let sparse = model.sparse_stoichiometric_matrix();
        assert_eq!(sparse.nnz(), 4);
        assert_eq!(DMatrix::from(&sparse), model.stoichiometric_matrix());
    }
}
