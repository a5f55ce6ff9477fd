//! Module turning metabolite and reaction text files into a metabolic network
//!
//! The metabolite catalog has to be loaded before any reaction which uses it. Each load is
//! all or nothing: the first bad line aborts it and leaves the registry as it was.

pub mod assembler;
pub mod bounds;
pub mod catalog;
pub mod error;
pub mod registry;

pub use error::{LoadError, RegistryError};
pub use registry::NetworkRegistry;

/// Iterate over the non-blank lines of an input file with their 1-based line numbers
pub(crate) fn input_lines(source: &str) -> impl Iterator<Item = (usize, &str)> {
    source
        .lines()
        .enumerate()
        .map(|(idx, line)| (idx + 1, line.trim()))
        .filter(|(_, line)| !line.is_empty())
}
