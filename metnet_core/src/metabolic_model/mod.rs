//! This module provides the Model structure for representing a metabolic network.

pub mod metabolite;
pub mod model;
pub mod reaction;
