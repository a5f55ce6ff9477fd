//! Module providing SBML IO for metnet Models
//!
//! Models are written as SBML Level 3 Version 1 documents using version 2 of the flux balance
//! constraints (fbc) package: metabolites become species carrying an `fbc:chemicalFormula`,
//! and reaction bounds are stored as global parameters referenced by
//! `fbc:lowerFluxBound`/`fbc:upperFluxBound`.
//!
//! Reading covers the subset of SBML produced by the writer, scanned with regular
//! expressions rather than a full XML parser.
use std::fmt::Write;
use std::fs;
use std::path::Path;

use indexmap::IndexMap;
use log::debug;
use regex::Regex;
use thiserror::Error;

use crate::metabolic_model::metabolite::{Metabolite, MetaboliteBuilder};
use crate::metabolic_model::model::Model;
use crate::metabolic_model::reaction::{Reaction, ReactionBuilder};

const SBML_NAMESPACE: &str = "http://www.sbml.org/sbml/level3/version1/core";
const FBC_NAMESPACE: &str = "http://www.sbml.org/sbml/level3/version1/fbc/version2";

const METABOLITE_PREFIX: &str = "M_";
const REACTION_PREFIX: &str = "R_";
const COMPARTMENT_PREFIX: &str = "C_";
/// Compartment given to species whose metabolite has none, never produced by [`to_sid`]
const UNASSIGNED_COMPARTMENT: &str = "unassigned";

// region Identifiers
/// Convert an identifier into a valid SBML SId
///
/// Characters outside `[A-Za-z0-9_]` are written as `__<code point>__`. An underscore is only
/// kept as is when neither neighbour is an underscore, so the id never contains `__` of its own.
fn to_sid(prefix: &str, id: &str) -> String {
    let chars: Vec<char> = id.chars().collect();
    let mut sid = String::from(prefix);
    for (idx, &c) in chars.iter().enumerate() {
        let lone_underscore = c == '_'
            && (idx == 0 || chars[idx - 1] != '_')
            && chars.get(idx + 1) != Some(&'_');
        if c.is_ascii_alphanumeric() || lone_underscore {
            sid.push(c);
        } else {
            sid.push_str(&format!("__{}__", c as u32));
        }
    }
    sid
}

/// Inverse of [`to_sid`]
fn from_sid(prefix: &str, sid: &str, escape: &Regex) -> String {
    let id = sid.strip_prefix(prefix).unwrap_or(sid);
    escape
        .replace_all(id, |caps: &regex::Captures| {
            caps[1]
                .parse::<u32>()
                .ok()
                .and_then(char::from_u32)
                .map(String::from)
                .unwrap_or_else(|| caps[0].to_string())
        })
        .into_owned()
}

fn escape_xml(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

fn unescape_xml(value: &str) -> String {
    value
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&apos;", "'")
        .replace("&amp;", "&")
}

fn format_number(value: f64) -> String {
    if value == f64::INFINITY {
        "INF".to_string()
    } else if value == f64::NEG_INFINITY {
        "-INF".to_string()
    } else {
        format!("{}", value)
    }
}

fn parse_number(value: &str) -> Result<f64, SbmlError> {
    match value.trim() {
        "INF" => Ok(f64::INFINITY),
        "-INF" => Ok(f64::NEG_INFINITY),
        other => other
            .parse::<f64>()
            .map_err(|_| SbmlError::Malformed(format!("`{}` is not a number", value))),
    }
}
// endregion Identifiers

// region Writing
impl Model {
    pub fn write_sbml<P: AsRef<Path>>(&self, path: P) -> Result<(), SbmlError> {
        fs::write(path, self.to_sbml()?)?;
        Ok(())
    }

    /// Render the model as an SBML document
    pub fn to_sbml(&self) -> Result<String, SbmlError> {
        let mut doc = String::new();
        writeln!(doc, r#"<?xml version="1.0" encoding="UTF-8"?>"#)?;
        writeln!(
            doc,
            r#"<sbml xmlns="{}" xmlns:fbc="{}" level="3" version="1" fbc:required="false">"#,
            SBML_NAMESPACE, FBC_NAMESPACE
        )?;
        write!(doc, "  <model")?;
        if let Some(id) = &self.id {
            write!(doc, r#" id="{}""#, to_sid("", id))?;
        }
        if let Some(name) = &self.name {
            write!(doc, r#" name="{}""#, escape_xml(name))?;
        }
        writeln!(doc, r#" fbc:strict="true">"#)?;

        self.write_compartments(&mut doc)?;
        self.write_species(&mut doc)?;
        self.write_bound_parameters(&mut doc)?;
        self.write_reactions(&mut doc)?;

        writeln!(doc, "  </model>")?;
        writeln!(doc, "</sbml>")?;
        Ok(doc)
    }

    fn compartment_sid(metabolite: &Metabolite) -> String {
        match &metabolite.compartment {
            Some(comp) => to_sid(COMPARTMENT_PREFIX, comp),
            None => UNASSIGNED_COMPARTMENT.to_string(),
        }
    }

    fn write_compartments(&self, doc: &mut String) -> Result<(), SbmlError> {
        let mut compartments: Vec<Option<&str>> = Vec::new();
        for met in self.metabolites.values() {
            let comp = met.compartment.as_deref();
            if !compartments.contains(&comp) {
                compartments.push(comp);
            }
        }
        if compartments.is_empty() {
            return Ok(());
        }
        writeln!(doc, "    <listOfCompartments>")?;
        for comp in compartments {
            match comp {
                Some(comp) => writeln!(
                    doc,
                    r#"      <compartment id="{}" name="{}" constant="true"/>"#,
                    to_sid(COMPARTMENT_PREFIX, comp),
                    escape_xml(comp)
                )?,
                None => writeln!(
                    doc,
                    r#"      <compartment id="{}" constant="true"/>"#,
                    UNASSIGNED_COMPARTMENT
                )?,
            }
        }
        writeln!(doc, "    </listOfCompartments>")?;
        Ok(())
    }

    fn write_species(&self, doc: &mut String) -> Result<(), SbmlError> {
        if self.metabolites.is_empty() {
            return Ok(());
        }
        writeln!(doc, "    <listOfSpecies>")?;
        for met in self.metabolites.values() {
            write!(
                doc,
                r#"      <species id="{}""#,
                to_sid(METABOLITE_PREFIX, &met.id)
            )?;
            if let Some(name) = &met.name {
                write!(doc, r#" name="{}""#, escape_xml(name))?;
            }
            write!(
                doc,
                r#" compartment="{}" hasOnlySubstanceUnits="false" boundaryCondition="false" constant="false""#,
                Model::compartment_sid(met)
            )?;
            if let Some(formula) = &met.formula {
                write!(doc, r#" fbc:chemicalFormula="{}""#, escape_xml(formula))?;
            }
            writeln!(doc, "/>")?;
        }
        writeln!(doc, "    </listOfSpecies>")?;
        Ok(())
    }

    fn write_bound_parameters(&self, doc: &mut String) -> Result<(), SbmlError> {
        if self.reactions.is_empty() {
            return Ok(());
        }
        writeln!(doc, "    <listOfParameters>")?;
        for rxn in self.reactions.values() {
            let sid = to_sid(REACTION_PREFIX, &rxn.id);
            for (suffix, value) in [("lower_bound", rxn.lower_bound), ("upper_bound", rxn.upper_bound)] {
                writeln!(
                    doc,
                    r#"      <parameter id="{}_{}" value="{}" constant="true"/>"#,
                    sid,
                    suffix,
                    format_number(value)
                )?;
            }
        }
        writeln!(doc, "    </listOfParameters>")?;
        Ok(())
    }

    fn write_reactions(&self, doc: &mut String) -> Result<(), SbmlError> {
        if self.reactions.is_empty() {
            return Ok(());
        }
        writeln!(doc, "    <listOfReactions>")?;
        for rxn in self.reactions.values() {
            let sid = to_sid(REACTION_PREFIX, &rxn.id);
            write!(doc, r#"      <reaction id="{}""#, sid)?;
            if let Some(name) = &rxn.name {
                write!(doc, r#" name="{}""#, escape_xml(name))?;
            }
            writeln!(
                doc,
                r#" reversible="{}" fast="false" fbc:lowerFluxBound="{sid}_lower_bound" fbc:upperFluxBound="{sid}_upper_bound">"#,
                rxn.reversible,
                sid = sid
            )?;
            for (list, terms) in [
                ("listOfReactants", rxn.reactants().collect::<Vec<_>>()),
                ("listOfProducts", rxn.products().collect::<Vec<_>>()),
            ] {
                if terms.is_empty() {
                    continue;
                }
                writeln!(doc, "        <{}>", list)?;
                for (met_id, coef) in terms {
                    writeln!(
                        doc,
                        r#"          <speciesReference species="{}" stoichiometry="{}" constant="true"/>"#,
                        to_sid(METABOLITE_PREFIX, met_id),
                        format_number(coef.abs())
                    )?;
                }
                writeln!(doc, "        </{}>", list)?;
            }
            writeln!(doc, "      </reaction>")?;
        }
        writeln!(doc, "    </listOfReactions>")?;
        Ok(())
    }
}
// endregion Writing

// region Reading
/// Regular expressions used to pick the model apart
struct SbmlScanner {
    model: Regex,
    attribute: Regex,
    compartment: Regex,
    species: Regex,
    parameter: Regex,
    reaction: Regex,
    reactants: Regex,
    products: Regex,
    species_reference: Regex,
    escape: Regex,
}

impl SbmlScanner {
    fn new() -> Result<Self, SbmlError> {
        Ok(Self {
            model: Regex::new(r"<model\b([^>]*)>")?,
            attribute: Regex::new(r#"([A-Za-z_][\w:.-]*)\s*=\s*"([^"]*)""#)?,
            compartment: Regex::new(r"<compartment\b([^>]*?)/?>")?,
            species: Regex::new(r"<species\b([^>]*?)/?>")?,
            parameter: Regex::new(r"<parameter\b([^>]*?)/?>")?,
            reaction: Regex::new(r"(?s)<reaction\b([^>]*)>(.*?)</reaction>")?,
            reactants: Regex::new(r"(?s)<listOfReactants>(.*?)</listOfReactants>")?,
            products: Regex::new(r"(?s)<listOfProducts>(.*?)</listOfProducts>")?,
            species_reference: Regex::new(r"<speciesReference\b([^>]*?)/?>")?,
            escape: Regex::new(r"__(\d+)__")?,
        })
    }

    /// Collect the attributes of a tag into a map, unescaping their values
    fn attributes(&self, tag: &str) -> IndexMap<String, String> {
        self.attribute
            .captures_iter(tag)
            .map(|caps| (caps[1].to_string(), unescape_xml(&caps[2])))
            .collect()
    }

    fn required<'a>(
        attributes: &'a IndexMap<String, String>,
        key: &str,
        element: &str,
    ) -> Result<&'a str, SbmlError> {
        attributes
            .get(key)
            .map(String::as_str)
            .ok_or_else(|| SbmlError::Malformed(format!("{} is missing `{}`", element, key)))
    }

    /// Signed coefficients of the species references in a reactant or product list
    fn terms(&self, list: &str, sign: f64) -> Result<Vec<(String, f64)>, SbmlError> {
        self.species_reference
            .captures_iter(list)
            .map(|caps| -> Result<(String, f64), SbmlError> {
                let attributes = self.attributes(&caps[1]);
                let species = Self::required(&attributes, "species", "speciesReference")?;
                let stoichiometry = match attributes.get("stoichiometry") {
                    Some(value) => parse_number(value)?,
                    None => 1.,
                };
                Ok((
                    from_sid(METABOLITE_PREFIX, species, &self.escape),
                    sign * stoichiometry,
                ))
            })
            .collect()
    }
}

impl Model {
    pub fn read_sbml<P: AsRef<Path>>(path: P) -> Result<Model, SbmlError> {
        let document = fs::read_to_string(path)?;
        Model::from_sbml(&document)
    }

    /// Parse a model from an SBML document written by [`Model::to_sbml`]
    pub fn from_sbml(document: &str) -> Result<Model, SbmlError> {
        let scanner = SbmlScanner::new()?;
        let mut model = Model::new_empty();

        let model_tag = scanner
            .model
            .captures(document)
            .ok_or_else(|| SbmlError::Malformed("no model element".to_string()))?;
        let attributes = scanner.attributes(&model_tag[1]);
        model.id = attributes.get("id").map(|id| from_sid("", id, &scanner.escape));
        model.name = attributes.get("name").cloned();

        // Compartment names are kept in the name attribute, the id is only a reference
        let mut compartment_names: IndexMap<String, String> = IndexMap::new();
        for caps in scanner.compartment.captures_iter(document) {
            let mut attributes = scanner.attributes(&caps[1]);
            let id = SbmlScanner::required(&attributes, "id", "compartment")?.to_string();
            if let Some(name) = attributes.shift_remove("name") {
                compartment_names.insert(id, name);
            }
        }

        for caps in scanner.species.captures_iter(document) {
            let attributes = scanner.attributes(&caps[1]);
            let id = from_sid(
                METABOLITE_PREFIX,
                SbmlScanner::required(&attributes, "id", "species")?,
                &scanner.escape,
            );
            let compartment = attributes
                .get("compartment")
                .filter(|sid| sid.as_str() != UNASSIGNED_COMPARTMENT)
                .map(|sid| match compartment_names.get(sid) {
                    Some(name) => name.clone(),
                    None => from_sid(COMPARTMENT_PREFIX, sid, &scanner.escape),
                });
            let metabolite = MetaboliteBuilder::default()
                .id(id)
                .name(attributes.get("name").cloned())
                .compartment(compartment)
                .formula(attributes.get("fbc:chemicalFormula").cloned())
                .build()
                .map_err(|e| SbmlError::Malformed(e.to_string()))?;
            model.add_metabolite(metabolite);
        }

        let mut parameters: IndexMap<String, f64> = IndexMap::new();
        for caps in scanner.parameter.captures_iter(document) {
            let attributes = scanner.attributes(&caps[1]);
            let id = SbmlScanner::required(&attributes, "id", "parameter")?;
            let value = parse_number(SbmlScanner::required(&attributes, "value", "parameter")?)?;
            parameters.insert(id.to_string(), value);
        }

        for caps in scanner.reaction.captures_iter(document) {
            let reaction = scanner.read_reaction(&caps[1], &caps[2], &parameters)?;
            if let Some(met_id) = reaction
                .metabolites
                .keys()
                .find(|met_id| !model.metabolites.contains_key(*met_id))
            {
                return Err(SbmlError::Malformed(format!(
                    "reaction `{}` references undeclared species `{}`",
                    reaction.id, met_id
                )));
            }
            model.add_reaction(reaction);
        }
        debug!(
            "Read SBML model with {} species and {} reactions",
            model.metabolites.len(),
            model.reactions.len()
        );
        Ok(model)
    }
}

impl SbmlScanner {
    fn read_reaction(
        &self,
        tag: &str,
        body: &str,
        parameters: &IndexMap<String, f64>,
    ) -> Result<Reaction, SbmlError> {
        let attributes = self.attributes(tag);
        let id = from_sid(
            REACTION_PREFIX,
            Self::required(&attributes, "id", "reaction")?,
            &self.escape,
        );
        let bound = |key: &str| -> Result<f64, SbmlError> {
            let parameter = Self::required(&attributes, key, "reaction")?;
            parameters.get(parameter).copied().ok_or_else(|| {
                SbmlError::Malformed(format!("undeclared flux bound parameter `{}`", parameter))
            })
        };
        let mut reaction = ReactionBuilder::default()
            .id(id)
            .name(attributes.get("name").cloned())
            .reversible(attributes.get("reversible").map(String::as_str) == Some("true"))
            .lower_bound(bound("fbc:lowerFluxBound")?)
            .upper_bound(bound("fbc:upperFluxBound")?)
            .build()
            .map_err(|e| SbmlError::Malformed(e.to_string()))?;

        for (list, sign) in [(&self.reactants, -1.), (&self.products, 1.)] {
            if let Some(caps) = list.captures(body) {
                for (met_id, coef) in self.terms(&caps[1], sign)? {
                    reaction.add_metabolite(&met_id, coef);
                }
            }
        }
        Ok(reaction)
    }
}
// endregion Reading

#[derive(Error, Debug)]
pub enum SbmlError {
    #[error("Unable to read or write SBML file")]
    UnableToRead(#[from] std::io::Error),
    #[error("Unable to render SBML document")]
    UnableToWrite(#[from] std::fmt::Error),
    #[error("Malformed SBML: {0}")]
    Malformed(String),
    #[error("Invalid SBML pattern")]
    Pattern(#[from] regex::Error),
}
