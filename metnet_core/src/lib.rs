//! Core rust implementation of metnet, a crate for building metabolic network models from
//! plain text metabolite and reaction lists.
//!
//! A [`network::NetworkRegistry`] reads a metabolite catalog, resolving chemical formulas
//! through a [`lookup::FormulaResolver`], then assembles reactions against it. The result can
//! be turned into a [`metabolic_model::model::Model`], which is written out as SBML, JSON or a
//! tabular stoichiometric matrix by the [`io`] module.

pub mod configuration;
pub mod io;
pub mod lookup;
pub mod metabolic_model;
pub mod network;
