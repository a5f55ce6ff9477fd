//! Assembles reactions from `Identifier;DisplayName;Equation[;LowerBound[;UpperBound]]` lines
use indexmap::IndexMap;
use log::debug;
use thiserror::Error;

use crate::configuration::Configuration;
use crate::io::equation_parse::{parse_equation, ParsedEquation};
use crate::metabolic_model::metabolite::Metabolite;
use crate::metabolic_model::reaction::{Reaction, ReactionBuilder};
use crate::network::bounds::{resolve_bounds, BoundError, FluxBounds};
use crate::network::error::LoadError;

/// Fields of a single reaction line
#[derive(Debug, Clone, PartialEq)]
pub struct ReactionLine<'a> {
    pub id: &'a str,
    pub name: &'a str,
    pub equation: &'a str,
    /// Zero, one or two bound fields, possibly blank
    pub bounds: Vec<&'a str>,
}

/// Split a reaction line into its fields
pub fn parse_reaction_line(line: &str) -> Result<ReactionLine, String> {
    let fields: Vec<&str> = line.split(';').map(str::trim).collect();
    if !(3..=5).contains(&fields.len()) {
        return Err(format!(
            "expected `Identifier;DisplayName;Equation[;LowerBound[;UpperBound]]`, found {} fields",
            fields.len()
        ));
    }
    for (field, label) in fields.iter().zip(["identifier", "name", "equation"]) {
        if field.is_empty() {
            return Err(format!("reaction {} is empty", label));
        }
    }
    Ok(ReactionLine {
        id: fields[0],
        name: fields[1],
        equation: fields[2],
        bounds: fields[3..].to_vec(),
    })
}

/// Combine a parsed equation and its bounds into a reaction
///
/// Reactants get negative coefficients and products positive ones. A metabolite appearing
/// more than once has its contributions summed, and the reaction is rejected if that sum is
/// zero.
///
/// # Parameters
/// - `id`, `name`: identifier and display name of the reaction
/// - `equation`: parsed equation
/// - `bounds`: resolved flux bounds
/// - `catalog`: metabolites the equation terms must refer to
/// - `tolerance`: largest magnitude treated as a zero coefficient
pub fn assemble_reaction(
    id: &str,
    name: &str,
    equation: &ParsedEquation,
    bounds: FluxBounds,
    catalog: &IndexMap<String, Metabolite>,
    tolerance: f64,
) -> Result<Reaction, AssemblyError> {
    let mut reaction = ReactionBuilder::default()
        .id(id.to_string())
        .name(Some(name.to_string()))
        .lower_bound(bounds.lower)
        .upper_bound(bounds.upper)
        .reversible(equation.reversible)
        .build()
        .map_err(|e| AssemblyError::Build(e.to_string()))?;

    let signed_terms = equation
        .reactants
        .iter()
        .map(|term| (term, -1.))
        .chain(equation.products.iter().map(|term| (term, 1.)));
    for (term, sign) in signed_terms {
        if !catalog.contains_key(&term.metabolite_id) {
            return Err(AssemblyError::UnknownMetabolite(term.metabolite_id.clone()));
        }
        reaction.add_metabolite(&term.metabolite_id, sign * term.coefficient);
    }

    if let Some((met_id, _)) = reaction
        .metabolites
        .iter()
        .find(|(_, coef)| coef.abs() <= tolerance)
    {
        return Err(AssemblyError::NetZero(met_id.clone()));
    }
    Ok(reaction)
}

/// Build a reaction from one line of a reaction file
pub fn build_reaction(
    line_number: usize,
    line: &str,
    catalog: &IndexMap<String, Metabolite>,
    configuration: &Configuration,
) -> Result<Reaction, LoadError> {
    let fields = parse_reaction_line(line).map_err(|e| LoadError::format(line_number, e))?;
    let equation = parse_equation(fields.equation).map_err(|e| {
        LoadError::format(line_number, format!("`{}`: {}", fields.equation, e))
    })?;
    let bounds = resolve_bounds(equation.reversible, &fields.bounds, configuration).map_err(
        |source| match source {
            BoundError::Inverted { .. } => LoadError::Bound {
                line: line_number,
                reaction: fields.id.to_string(),
                source,
            },
            other => LoadError::format(line_number, other.to_string()),
        },
    )?;
    let reaction = assemble_reaction(
        fields.id,
        fields.name,
        &equation,
        bounds,
        catalog,
        configuration.tolerance,
    )
    .map_err(|e| match e {
        AssemblyError::UnknownMetabolite(metabolite) => LoadError::UnknownMetabolite {
            line: line_number,
            reaction: fields.id.to_string(),
            metabolite,
        },
        AssemblyError::NetZero(metabolite) => LoadError::NetZeroStoichiometry {
            line: line_number,
            reaction: fields.id.to_string(),
            metabolite,
        },
        AssemblyError::Build(details) => LoadError::format(line_number, details),
    })?;
    debug!("Line {}: built {}", line_number, reaction);
    Ok(reaction)
}

#[derive(Debug, Error, PartialEq, Clone)]
pub enum AssemblyError {
    #[error("Unknown metabolite `{0}`")]
    UnknownMetabolite(String),
    #[error("Metabolite `{0}` has a net coefficient of zero")]
    NetZero(String),
    #[error("Unable to build reaction: {0}")]
    Build(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn catalog() -> IndexMap<String, Metabolite> {
        ["A", "B", "C"]
            .into_iter()
            .map(|id| (id.to_string(), Metabolite::new_id_only(id.to_string())))
            .collect()
    }

    fn build(line: &str) -> Result<Reaction, LoadError> {
        build_reaction(7, line, &catalog(), &Configuration::default())
    }

    #[test]
    fn reaction_line() {
        let line = parse_reaction_line("R1;Reaction one;A -> B;0;10").unwrap();
        assert_eq!(line.id, "R1");
        assert_eq!(line.name, "Reaction one");
        assert_eq!(line.equation, "A -> B");
        assert_eq!(line.bounds, vec!["0", "10"]);
        let line = parse_reaction_line("R1;Reaction one;A -> B").unwrap();
        assert!(line.bounds.is_empty());
        let line = parse_reaction_line("R1;Reaction one;A -> B;;").unwrap();
        assert_eq!(line.bounds, vec!["", ""]);
        assert!(parse_reaction_line("R1;Reaction one").is_err());
        assert!(parse_reaction_line("R1;n;A -> B;1;2;3").is_err());
        assert!(parse_reaction_line("R1;n;;1;2").is_err());
    }

    #[test]
    fn reversible_reaction() {
        let rxn = build("R1;Isomerase;A <-> B").unwrap();
        assert!(rxn.reversible);
        assert_eq!(rxn.metabolites["A"], -1.);
        assert_eq!(rxn.metabolites["B"], 1.);
        assert_eq!(rxn.metabolites.len(), 2);
        assert_eq!(rxn.lower_bound, -1000.);
        assert_eq!(rxn.upper_bound, 1000.);
        assert_eq!(rxn.name.as_deref(), Some("Isomerase"));
    }

    #[test]
    fn irreversible_reaction() {
        let rxn = build("R2;Synthase;2.5A + B -> C").unwrap();
        assert!(!rxn.reversible);
        assert_eq!(rxn.metabolites["A"], -2.5);
        assert_eq!(rxn.metabolites["B"], -1.);
        assert_eq!(rxn.metabolites["C"], 1.);
        assert_eq!(rxn.lower_bound, 0.);
        assert_eq!(rxn.upper_bound, 1000.);
    }

    #[test]
    fn exchange_reactions() {
        let rxn = build("EX_B;B source;-> B").unwrap();
        assert_eq!(rxn.metabolites.len(), 1);
        assert_eq!(rxn.metabolites["B"], 1.);
        let rxn = build("EX_A;A sink;A ->;0;5").unwrap();
        assert_eq!(rxn.metabolites.len(), 1);
        assert_eq!(rxn.metabolites["A"], -1.);
        assert_eq!(rxn.upper_bound, 5.);
    }

    #[test]
    fn repeated_metabolite_is_merged() {
        let rxn = build("R3;Dimerise;A + A -> B").unwrap();
        assert_eq!(rxn.metabolites["A"], -2.);
        let rxn = build("R4;Autocatalysis;2A + B -> 3A").unwrap();
        assert_eq!(rxn.metabolites["A"], 1.);
        assert_eq!(rxn.metabolites["B"], -1.);
        assert_eq!(rxn.metabolites.len(), 2);
    }

    #[test]
    fn fractional_merge_uses_tolerance() {
        let rxn = build("R3;Fractions;0.1A + 0.2A -> B").unwrap();
        assert_relative_eq!(rxn.metabolites["A"], -0.3);
        assert!(matches!(
            build("R3;Fractions;0.1A + 0.2A -> 0.3A + B"),
            Err(LoadError::NetZeroStoichiometry { .. })
        ));
    }

    #[test]
    fn net_zero_is_rejected() {
        match build("R5;Futile;A -> A") {
            Err(LoadError::NetZeroStoichiometry {
                line,
                reaction,
                metabolite,
            }) => {
                assert_eq!(line, 7);
                assert_eq!(reaction, "R5");
                assert_eq!(metabolite, "A");
            }
            other => panic!("Expected net zero error, got {:?}", other),
        }
    }

    #[test]
    fn unknown_metabolite() {
        match build("R6;Missing;A -> Z") {
            Err(LoadError::UnknownMetabolite {
                line,
                reaction,
                metabolite,
            }) => {
                assert_eq!(line, 7);
                assert_eq!(reaction, "R6");
                assert_eq!(metabolite, "Z");
            }
            other => panic!("Expected unknown metabolite error, got {:?}", other),
        }
    }

    #[test]
    fn bound_errors() {
        assert!(matches!(
            build("R7;Backwards;A -> B;10;1"),
            Err(LoadError::Bound {
                source: BoundError::Inverted { .. },
                ..
            })
        ));
        assert!(matches!(
            build("R7;Garbage;A -> B;low;1"),
            Err(LoadError::Format { line: 7, .. })
        ));
    }

    #[test]
    fn equation_errors() {
        assert!(matches!(
            build("R8;No arrow;A + B"),
            Err(LoadError::Format { line: 7, .. })
        ));
        assert!(matches!(
            build("R8;Empty term;A +  + B -> C"),
            Err(LoadError::Format { line: 7, .. })
        ));
    }
}
