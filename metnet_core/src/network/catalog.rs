//! Builds the metabolite catalog from `Identifier;DisplayName;Compartment` lines
use indexmap::IndexMap;
use log::{debug, warn};

use crate::configuration::{Configuration, DuplicatePolicy};
use crate::lookup::FormulaResolver;
use crate::metabolic_model::metabolite::{Metabolite, MetaboliteBuilder};
use crate::network::error::LoadError;
use crate::network::input_lines;

/// Metabolites whose formula is looked up by identifier rather than by display name
const COMMON_NAME_METABOLITES: [&str; 6] = ["NAD", "NADH", "ATP", "AMP", "ADP", "PI"];

/// Inorganic phosphate is known to formula lookups under its full name
const PHOSPHATE_ID: &str = "PI";
const PHOSPHATE_LOOKUP_NAME: &str = "Phosphate";

/// Fields of a single metabolite line
#[derive(Debug, Clone, PartialEq)]
pub struct MetaboliteLine<'a> {
    pub id: &'a str,
    pub name: &'a str,
    pub compartment: &'a str,
}

/// Split a metabolite line into its three fields
pub fn parse_metabolite_line(line: &str) -> Result<MetaboliteLine, String> {
    let fields: Vec<&str> = line.split(';').map(str::trim).collect();
    match fields.as_slice() {
        [id, name, compartment] => {
            for (field, label) in [(id, "identifier"), (name, "name"), (compartment, "compartment")] {
                if field.is_empty() {
                    return Err(format!("metabolite {} is empty", label));
                }
            }
            Ok(MetaboliteLine {
                id: *id,
                name: *name,
                compartment: *compartment,
            })
        }
        _ => Err(format!(
            "expected `Identifier;DisplayName;Compartment`, found {} fields",
            fields.len()
        )),
    }
}

/// Name used to look up the formula of a metabolite
///
/// Cofactors such as ATP or NADH are found more reliably by their abbreviation, every other
/// metabolite is looked up by its display name.
pub fn lookup_name<'a>(id: &'a str, name: &'a str) -> &'a str {
    let upper = id.to_uppercase();
    if upper == PHOSPHATE_ID {
        PHOSPHATE_LOOKUP_NAME
    } else if COMMON_NAME_METABOLITES.contains(&upper.as_str()) {
        id
    } else {
        name
    }
}

/// Build a metabolite from one catalog line, resolving its formula
pub fn build_metabolite<R: FormulaResolver + ?Sized>(
    line_number: usize,
    line: &str,
    resolver: &R,
) -> Result<Metabolite, LoadError> {
    let fields = parse_metabolite_line(line).map_err(|e| LoadError::format(line_number, e))?;
    let query = lookup_name(fields.id, fields.name);
    let formula = resolver
        .resolve(query)
        .map_err(|source| LoadError::Lookup {
            line: line_number,
            name: query.to_string(),
            source,
        })?;
    debug!("Resolved {} ({}) to {}", fields.id, query, formula);
    MetaboliteBuilder::default()
        .id(fields.id.to_string())
        .name(Some(fields.name.to_string()))
        .compartment(Some(fields.compartment.to_string()))
        .formula(Some(formula))
        .build()
        .map_err(|e| LoadError::format(line_number, e.to_string()))
}

/// Add the metabolites of a catalog file to `catalog`
///
/// # Parameters
/// - `catalog`: catalog to extend, left untouched if any line fails
/// - `source`: contents of the metabolite file
/// - `resolver`: formula lookup
/// - `configuration`: decides whether a repeated identifier replaces the earlier entry or
///     aborts the load
///
/// # Returns
/// The number of metabolite lines read
pub fn extend_catalog<R: FormulaResolver + ?Sized>(
    catalog: &mut IndexMap<String, Metabolite>,
    source: &str,
    resolver: &R,
    configuration: &Configuration,
) -> Result<usize, LoadError> {
    let mut staged = catalog.clone();
    let mut count = 0;
    for (line_number, line) in input_lines(source) {
        let metabolite = build_metabolite(line_number, line, resolver)?;
        if staged.contains_key(&metabolite.id) {
            match configuration.duplicates {
                DuplicatePolicy::Reject => {
                    return Err(LoadError::DuplicateIdentifier {
                        line: line_number,
                        id: metabolite.id,
                    })
                }
                DuplicatePolicy::Overwrite => {
                    warn!(
                        "Line {}: metabolite {} redefined, replacing the earlier definition",
                        line_number, metabolite.id
                    )
                }
            }
        }
        staged.insert(metabolite.id.clone(), metabolite);
        count += 1;
    }
    *catalog = staged;
    Ok(count)
}

/// Build a new catalog from the contents of a metabolite file
pub fn build_catalog<R: FormulaResolver + ?Sized>(
    source: &str,
    resolver: &R,
    configuration: &Configuration,
) -> Result<IndexMap<String, Metabolite>, LoadError> {
    let mut catalog = IndexMap::new();
    extend_catalog(&mut catalog, source, resolver, configuration)?;
    Ok(catalog)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lookup::table::TableResolver;
    use crate::lookup::LookupError;

    fn resolver() -> TableResolver {
        [
            ("ATP", "C10H16N5O13P3"),
            ("ADP", "C10H15N5O10P2"),
            ("Phosphate", "O4P-3"),
            ("D-Glucose", "C6H12O6"),
            ("Water", "H2O"),
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn lookup_names() {
        assert_eq!(lookup_name("atp", "Adenosine triphosphate"), "atp");
        assert_eq!(lookup_name("NADH", "whatever"), "NADH");
        assert_eq!(lookup_name("Pi", "Orthophosphate"), "Phosphate");
        assert_eq!(lookup_name("pi", "Orthophosphate"), "Phosphate");
        assert_eq!(lookup_name("glc", "D-Glucose"), "D-Glucose");
        // Only exact matches use the identifier
        assert_eq!(lookup_name("atp_c", "ATP"), "ATP");
    }

    #[test]
    fn metabolite_line() {
        let line = parse_metabolite_line("glc;D-Glucose;c").unwrap();
        assert_eq!(
            line,
            MetaboliteLine {
                id: "glc",
                name: "D-Glucose",
                compartment: "c"
            }
        );
        assert!(parse_metabolite_line("glc;D-Glucose").is_err());
        assert!(parse_metabolite_line("glc;D-Glucose;c;extra").is_err());
        assert!(parse_metabolite_line("glc;;c").is_err());
        assert!(parse_metabolite_line(";D-Glucose;c").is_err());
    }

    #[test]
    fn build_catalog_from_lines() {
        let source = "glc;D-Glucose;c\natp;Adenosine triphosphate;c\n\nPi;Orthophosphate;c\n";
        let catalog = build_catalog(source, &resolver(), &Configuration::default()).unwrap();
        assert_eq!(catalog.len(), 3);
        let ids: Vec<&String> = catalog.keys().collect();
        assert_eq!(ids, vec!["glc", "atp", "Pi"]);
        let glc = &catalog["glc"];
        assert_eq!(glc.name.as_deref(), Some("D-Glucose"));
        assert_eq!(glc.compartment.as_deref(), Some("c"));
        assert_eq!(glc.formula.as_deref(), Some("C6H12O6"));
        assert_eq!(catalog["atp"].formula.as_deref(), Some("C10H16N5O13P3"));
        assert_eq!(catalog["Pi"].formula.as_deref(), Some("O4P-3"));
    }

    #[test]
    fn lookup_failure() {
        let source = "glc;D-Glucose;c\nfru;D-Fructose;c\n";
        match build_catalog(source, &resolver(), &Configuration::default()) {
            Err(LoadError::Lookup {
                line,
                name,
                source: LookupError::NotFound(_),
            }) => {
                assert_eq!(line, 2);
                assert_eq!(name, "D-Fructose");
            }
            other => panic!("Expected lookup error, got {:?}", other),
        }
    }

    #[test]
    fn format_failure_keeps_catalog() {
        let mut catalog =
            build_catalog("glc;D-Glucose;c", &resolver(), &Configuration::default()).unwrap();
        let result = extend_catalog(
            &mut catalog,
            "h2o;Water;c\natp;ATP",
            &resolver(),
            &Configuration::default(),
        );
        match result {
            Err(LoadError::Format { line, .. }) => assert_eq!(line, 2),
            other => panic!("Expected format error, got {:?}", other),
        }
        assert_eq!(catalog.len(), 1);
        assert!(!catalog.contains_key("h2o"));
    }

    #[test]
    fn duplicates() {
        let source = "glc;D-Glucose;c\nglc;Water;e\n";
        let catalog = build_catalog(source, &resolver(), &Configuration::default()).unwrap();
        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog["glc"].compartment.as_deref(), Some("e"));
        assert_eq!(catalog["glc"].formula.as_deref(), Some("H2O"));

        let strict = Configuration {
            duplicates: DuplicatePolicy::Reject,
            ..Configuration::default()
        };
        match build_catalog(source, &resolver(), &strict) {
            Err(LoadError::DuplicateIdentifier { line, id }) => {
                assert_eq!(line, 2);
                assert_eq!(id, "glc");
            }
            other => panic!("Expected duplicate error, got {:?}", other),
        }
    }
}
