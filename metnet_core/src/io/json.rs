//! Module providing JSON IO for metnet Models
use std::fs;
use std::path::Path;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::metabolic_model::metabolite::Metabolite;
use crate::metabolic_model::model::Model;
use crate::metabolic_model::reaction::{Reaction, ReactionBuilder, ReactionBuilderError};

// region JSON Model
/// Represents a JSON serialized model, used for reading and writing models in json format
///
/// The layout follows the COBRA JSON schema, fields it defines which a network model does
/// not carry (genes, notes, annotations) are ignored when reading.
#[derive(Serialize, Deserialize)]
struct JsonModel {
    metabolites: Vec<JsonMetabolite>,
    reactions: Vec<JsonReaction>,
    id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    compartments: Option<IndexMap<String, String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    version: Option<String>,
}

#[derive(Serialize, Deserialize)]
struct JsonMetabolite {
    id: String,
    name: Option<String>,
    compartment: Option<String>,
    formula: Option<String>,
}

#[derive(Serialize, Deserialize)]
struct JsonReaction {
    id: String,
    name: Option<String>,
    metabolites: IndexMap<String, f64>,
    lower_bound: f64,
    upper_bound: f64,
    /// Not part of the COBRA schema, when missing it is inferred from the lower bound
    #[serde(default, skip_serializing_if = "Option::is_none")]
    reversible: Option<bool>,
}
// endregion JSON Model

// region Conversions
impl From<JsonMetabolite> for Metabolite {
    fn from(m: JsonMetabolite) -> Self {
        Self {
            id: m.id,
            name: m.name,
            compartment: m.compartment,
            formula: m.formula,
        }
    }
}

impl From<Metabolite> for JsonMetabolite {
    fn from(m: Metabolite) -> Self {
        Self {
            id: m.id,
            name: m.name,
            compartment: m.compartment,
            formula: m.formula,
        }
    }
}

impl From<Reaction> for JsonReaction {
    fn from(r: Reaction) -> Self {
        Self {
            id: r.id,
            name: r.name,
            metabolites: r.metabolites,
            lower_bound: r.lower_bound,
            upper_bound: r.upper_bound,
            reversible: Some(r.reversible),
        }
    }
}

impl TryFrom<JsonReaction> for Reaction {
    type Error = ReactionBuilderError;

    fn try_from(r: JsonReaction) -> Result<Self, Self::Error> {
        let reversible = r.reversible.unwrap_or(r.lower_bound < 0.);
        ReactionBuilder::default()
            .id(r.id)
            .metabolites(r.metabolites)
            .name(r.name)
            .lower_bound(r.lower_bound)
            .upper_bound(r.upper_bound)
            .reversible(reversible)
            .build()
    }
}

impl Model {
    pub fn read_json<P: AsRef<Path>>(path: P) -> Result<Model, JsonError> {
        let model_str = fs::read_to_string(path)?;
        let json_model = serde_json::from_str::<JsonModel>(&model_str)?;
        Model::from_json(json_model)
    }

    pub fn write_json<P: AsRef<Path>>(&self, path: P) -> Result<(), JsonError> {
        let json_model = self.to_json();
        let model_string = serde_json::to_string_pretty(&json_model)?;
        fs::write(path, model_string)?;
        Ok(())
    }

    fn from_json(json_model: JsonModel) -> Result<Self, JsonError> {
        let mut model = Model::new_empty();
        model.id = json_model.id;
        model.name = json_model.name;
        json_model.metabolites.into_iter().for_each(|m| {
            model.add_metabolite(Metabolite::from(m));
        });
        for rxn in json_model.reactions {
            if let Some(met_id) = rxn
                .metabolites
                .keys()
                .find(|met_id| !model.metabolites.contains_key(*met_id))
            {
                return Err(JsonError::UnknownMetabolite {
                    reaction: rxn.id.clone(),
                    metabolite: met_id.clone(),
                });
            }
            model.add_reaction(Reaction::try_from(rxn)?);
        }
        Ok(model)
    }

    fn to_json(&self) -> JsonModel {
        let mut compartments: IndexMap<String, String> = IndexMap::new();
        for comp in self.metabolites.values().filter_map(|m| m.compartment.clone()) {
            compartments.entry(comp.clone()).or_insert(comp);
        }
        JsonModel {
            metabolites: self.metabolites.values().map(|m| m.clone().into()).collect(),
            reactions: self.reactions.values().map(|r| r.clone().into()).collect(),
            id: self.id.clone(),
            name: self.name.clone(),
            compartments: Some(compartments),
            version: Some("1".to_string()),
        }
    }
}

#[derive(Error, Debug)]
pub enum JsonError {
    #[error("Unable to read or write JSON file")]
    UnableToRead(#[from] std::io::Error),
    #[error("Unable to parse json due to {0}")]
    UnableToParse(#[from] serde_json::Error),
    #[error("Unable to build reaction")]
    UnableToBuildReaction(#[from] ReactionBuilderError),
    #[error("Reaction `{reaction}` references metabolite `{metabolite}` which is not in the model")]
    UnknownMetabolite { reaction: String, metabolite: String },
}

// endregion Conversions
