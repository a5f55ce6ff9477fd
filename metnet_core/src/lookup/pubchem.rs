//! Formula lookup through the PubChem PUG REST service
use log::debug;
use reqwest::blocking::Client;
use serde_json::Value;
use url::Url;

use super::{FormulaResolver, LookupError};

const PUBCHEM_COMPOUND_NAME_URL: &str = "https://pubchem.ncbi.nlm.nih.gov/rest/pug/compound/name";

/// HTTP client trait for dependency injection
pub trait HttpClient {
    fn get_text(&self, url: &str) -> Result<String, reqwest::Error>;
}

// Implementation for the real reqwest client
impl HttpClient for Client {
    fn get_text(&self, url: &str) -> Result<String, reqwest::Error> {
        self.get(url).send()?.text()
    }
}

/// Looks up formulas by compound name on PubChem, the first matching compound wins
pub struct PubChemResolver<C: HttpClient> {
    client: C,
}

impl PubChemResolver<Client> {
    pub fn new() -> Self {
        Self {
            client: Client::new(),
        }
    }
}

impl Default for PubChemResolver<Client> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: HttpClient> PubChemResolver<C> {
    pub fn with_client(client: C) -> Self {
        Self { client }
    }

    /// Build the molecular formula property URL for a compound name
    pub fn construct_url(&self, name: &str) -> Result<Url, LookupError> {
        let mut url = Url::parse(PUBCHEM_COMPOUND_NAME_URL)?;
        url.path_segments_mut()
            .map_err(|_| LookupError::InvalidResponse {
                name: name.to_string(),
                details: "base URL cannot hold path segments".to_string(),
            })?
            .push(name)
            .extend(["property", "MolecularFormula", "JSON"]);
        Ok(url)
    }

    /// Pull the first molecular formula out of a PUG REST property table
    fn extract_formula(name: &str, body: &str) -> Result<String, LookupError> {
        let response: Value =
            serde_json::from_str(body).map_err(|err| LookupError::InvalidResponse {
                name: name.to_string(),
                details: err.to_string(),
            })?;
        // Unknown names come back as a `Fault` document instead of a property table
        response["PropertyTable"]["Properties"]
            .as_array()
            .and_then(|properties| properties.first())
            .and_then(|compound| compound["MolecularFormula"].as_str())
            .map(|formula| formula.to_string())
            .ok_or_else(|| LookupError::NotFound(name.to_string()))
    }
}

impl<C: HttpClient> FormulaResolver for PubChemResolver<C> {
    fn resolve(&self, name: &str) -> Result<String, LookupError> {
        let url = self.construct_url(name)?;
        debug!("Querying PubChem for {}: {}", name, url);
        let body = self.client.get_text(url.as_str())?;
        Self::extract_formula(name, &body)
    }
}
