//! Module for reading and writing Models
use std::fmt::{Display, Formatter};
use std::path::Path;

use log::info;
use thiserror::Error;

use crate::metabolic_model::model::Model;

pub mod equation_parse;
pub mod json;
pub mod sbml;
pub mod tabular;

/// File formats a model can be written to and read from
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ModelFormat {
    /// SBML Level 3 with the flux balance constraints package
    #[default]
    Sbml,
    /// Tab separated stoichiometric matrix with bound rows
    Tabular,
    /// COBRA style JSON document
    Json,
}

impl ModelFormat {
    /// Guess the format from the extension of `path`
    pub fn from_path<P: AsRef<Path>>(path: P) -> Option<Self> {
        let extension = path.as_ref().extension()?.to_str()?.to_lowercase();
        match extension.as_str() {
            "xml" | "sbml" => Some(ModelFormat::Sbml),
            "tsv" | "tab" | "txt" => Some(ModelFormat::Tabular),
            "json" => Some(ModelFormat::Json),
            _ => None,
        }
    }

    /// Conventional file extension of the format
    pub fn extension(&self) -> &'static str {
        match self {
            ModelFormat::Sbml => "xml",
            ModelFormat::Tabular => "tsv",
            ModelFormat::Json => "json",
        }
    }

    /// Match a format name case-insensitively
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_lowercase().as_str() {
            "sbml" | "xml" => Some(ModelFormat::Sbml),
            "tabular" | "tsv" | "matlab" => Some(ModelFormat::Tabular),
            "json" => Some(ModelFormat::Json),
            _ => None,
        }
    }
}

/// Unknown format names fall back to SBML
impl From<&str> for ModelFormat {
    fn from(name: &str) -> Self {
        ModelFormat::from_name(name).unwrap_or_default()
    }
}

impl Display for ModelFormat {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            ModelFormat::Sbml => write!(f, "sbml"),
            ModelFormat::Tabular => write!(f, "tabular"),
            ModelFormat::Json => write!(f, "json"),
        }
    }
}

impl Model {
    /// Write the model to `path` in the given format
    pub fn write<P: AsRef<Path>>(&self, path: P, format: ModelFormat) -> Result<(), ModelIoError> {
        let path = path.as_ref();
        match format {
            ModelFormat::Sbml => self.write_sbml(path)?,
            ModelFormat::Tabular => self.write_tabular(path)?,
            ModelFormat::Json => self.write_json(path)?,
        }
        info!(
            "Wrote model {} as {} to {}",
            self.id.as_deref().unwrap_or_default(),
            format,
            path.display()
        );
        Ok(())
    }

    /// Read a model from `path` in the given format
    pub fn read<P: AsRef<Path>>(path: P, format: ModelFormat) -> Result<Model, ModelIoError> {
        Ok(match format {
            ModelFormat::Sbml => Model::read_sbml(path)?,
            ModelFormat::Tabular => Model::read_tabular(path)?,
            ModelFormat::Json => Model::read_json(path)?,
        })
    }
}

#[derive(Error, Debug)]
pub enum ModelIoError {
    #[error(transparent)]
    Sbml(#[from] sbml::SbmlError),
    #[error(transparent)]
    Tabular(#[from] tabular::TabularError),
    #[error(transparent)]
    Json(#[from] json::JsonError),
}

/// Model built from the glycolysis files in `test_data`, shared by the format tests
#[cfg(test)]
pub(crate) fn glycolysis_model() -> Model {
    use crate::lookup::table::TableResolver;
    use crate::network::NetworkRegistry;
    use std::path::PathBuf;

    let data = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("test_data");
    let formulas = TableResolver::read_file(data.join("formulas.txt")).unwrap();
    let mut registry = NetworkRegistry::default();
    registry
        .read_metabolites(data.join("glycolysis_metabolites.txt"), &formulas)
        .unwrap();
    registry
        .read_reactions(data.join("glycolysis_reactions.txt"))
        .unwrap();
    registry.build_model("glycolysis", None)
}
