//! Module providing chemical formula lookup for metabolites
//!
//! Formula resolution goes through the [`FormulaResolver`] trait so the catalog builder can
//! be given an offline table, a cached resolver, or (with the `pubchem` feature) the PubChem
//! web service.
use std::cell::RefCell;
use std::collections::HashMap;

use thiserror::Error;

#[cfg(feature = "pubchem")]
pub mod pubchem;
pub mod table;

/// Resolve a chemical name to a molecular formula
pub trait FormulaResolver {
    /// Look up the formula for `name`, failing if nothing matches
    fn resolve(&self, name: &str) -> Result<String, LookupError>;
}

impl<R: FormulaResolver + ?Sized> FormulaResolver for &R {
    fn resolve(&self, name: &str) -> Result<String, LookupError> {
        (**self).resolve(name)
    }
}

impl<R: FormulaResolver + ?Sized> FormulaResolver for Box<R> {
    fn resolve(&self, name: &str) -> Result<String, LookupError> {
        (**self).resolve(name)
    }
}

/// Wraps another resolver, remembering every successful lookup
pub struct CachedResolver<R: FormulaResolver> {
    inner: R,
    cache: RefCell<HashMap<String, String>>,
}

impl<R: FormulaResolver> CachedResolver<R> {
    pub fn new(inner: R) -> Self {
        Self {
            inner,
            cache: RefCell::new(HashMap::new()),
        }
    }

    /// Number of distinct names resolved so far
    pub fn cached(&self) -> usize {
        self.cache.borrow().len()
    }
}

impl<R: FormulaResolver> FormulaResolver for CachedResolver<R> {
    fn resolve(&self, name: &str) -> Result<String, LookupError> {
        if let Some(formula) = self.cache.borrow().get(name) {
            return Ok(formula.clone());
        }
        let formula = self.inner.resolve(name)?;
        self.cache
            .borrow_mut()
            .insert(name.to_string(), formula.clone());
        Ok(formula)
    }
}

/// Errors raised while resolving a formula
#[derive(Debug, Error)]
pub enum LookupError {
    #[error("No formula found for `{0}`")]
    NotFound(String),
    #[error("Unexpected lookup response for `{name}`: {details}")]
    InvalidResponse { name: String, details: String },
    #[error("Unable to read formula table: {0}")]
    UnableToRead(#[from] std::io::Error),
    #[error("Malformed formula table line {line}: {details}")]
    MalformedTable { line: usize, details: String },
    #[cfg(feature = "pubchem")]
    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),
    #[cfg(feature = "pubchem")]
    #[error("URL parsing error: {0}")]
    UrlError(#[from] url::ParseError),
}
