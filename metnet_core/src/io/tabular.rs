//! Module providing tabular IO for metnet Models
//!
//! The table is the stoichiometric matrix written as tab separated text:
//!
//! ```text
//! metabolite    R1      R2
//! lower_bound   0       -1000
//! upper_bound   1000    1000
//! A             -2      0
//! B             1       -1
//! ```
//!
//! Only identifiers, bounds and coefficients are kept. Reading marks a reaction as
//! reversible when its lower bound is negative.
use std::fs;
use std::path::Path;

use thiserror::Error;

use crate::metabolic_model::metabolite::Metabolite;
use crate::metabolic_model::model::Model;
use crate::metabolic_model::reaction::ReactionBuilder;

const CORNER: &str = "metabolite";
const LOWER_BOUND_ROW: &str = "lower_bound";
const UPPER_BOUND_ROW: &str = "upper_bound";

impl Model {
    pub fn write_tabular<P: AsRef<Path>>(&self, path: P) -> Result<(), TabularError> {
        fs::write(path, self.to_tabular())?;
        Ok(())
    }

    /// Render the stoichiometric matrix and bounds as tab separated text
    pub fn to_tabular(&self) -> String {
        let matrix = self.stoichiometric_matrix();
        let mut rows: Vec<String> = Vec::with_capacity(self.metabolites.len() + 3);
        rows.push(
            std::iter::once(CORNER.to_string())
                .chain(self.reactions.keys().cloned())
                .collect::<Vec<String>>()
                .join("\t"),
        );
        for (label, bound) in [
            (LOWER_BOUND_ROW, self.reactions.values().map(|r| r.lower_bound).collect::<Vec<f64>>()),
            (UPPER_BOUND_ROW, self.reactions.values().map(|r| r.upper_bound).collect()),
        ] {
            rows.push(tab_row(label, bound.into_iter()));
        }
        for (row, met_id) in self.metabolites.keys().enumerate() {
            rows.push(tab_row(met_id, matrix.row(row).iter().copied()));
        }
        let mut table = rows.join("\n");
        table.push('\n');
        table
    }

    pub fn read_tabular<P: AsRef<Path>>(path: P) -> Result<Model, TabularError> {
        let table = fs::read_to_string(path)?;
        Model::from_tabular(&table)
    }

    /// Parse a model from the text produced by [`Model::to_tabular`]
    pub fn from_tabular(table: &str) -> Result<Model, TabularError> {
        let mut lines = table
            .lines()
            .enumerate()
            .map(|(idx, line)| (idx + 1, line.trim_end_matches('\r')))
            .filter(|(_, line)| !line.trim().is_empty());

        let (mut last_line, header) = lines
            .next()
            .ok_or_else(|| TabularError::malformed(1, "empty table"))?;
        let reaction_ids: Vec<&str> = header.split('\t').skip(1).collect();

        let mut read_row = |expected: &str| -> Result<(usize, Vec<f64>), TabularError> {
            let (line, row) = lines.next().ok_or_else(|| {
                TabularError::malformed(last_line + 1, format!("missing `{}` row", expected))
            })?;
            last_line = line;
            let (label, values) = split_row(line, row, reaction_ids.len())?;
            if label != expected {
                return Err(TabularError::malformed(
                    line,
                    format!("expected `{}` row, found `{}`", expected, label),
                ));
            }
            Ok((line, values))
        };
        let (_, lower) = read_row(LOWER_BOUND_ROW)?;
        let (_, upper) = read_row(UPPER_BOUND_ROW)?;

        let mut reactions = Vec::with_capacity(reaction_ids.len());
        for ((id, lower_bound), upper_bound) in reaction_ids.iter().zip(lower).zip(upper) {
            let reaction = ReactionBuilder::default()
                .id(id.to_string())
                .lower_bound(lower_bound)
                .upper_bound(upper_bound)
                .reversible(lower_bound < 0.)
                .build()
                .map_err(|e| TabularError::malformed(1, e.to_string()))?;
            reactions.push(reaction);
        }

        let mut model = Model::new_empty();
        for (line, row) in lines {
            let (met_id, values) = split_row(line, row, reaction_ids.len())?;
            model.add_metabolite(Metabolite::new_id_only(met_id.to_string()));
            for (reaction, coef) in reactions.iter_mut().zip(values) {
                if coef != 0. {
                    reaction.add_metabolite(met_id, coef);
                }
            }
        }
        for reaction in reactions {
            model.add_reaction(reaction);
        }
        Ok(model)
    }
}

fn tab_row(label: &str, values: impl Iterator<Item = f64>) -> String {
    std::iter::once(label.to_string())
        .chain(values.map(|v| format!("{}", v)))
        .collect::<Vec<String>>()
        .join("\t")
}

/// Split a row into its label and numeric cells, checking the cell count against the header
fn split_row(line: usize, row: &str, width: usize) -> Result<(&str, Vec<f64>), TabularError> {
    let mut cells = row.split('\t');
    let label = cells.next().unwrap_or_default().trim();
    let values = cells
        .map(|cell| {
            cell.trim().parse::<f64>().map_err(|_| {
                TabularError::malformed(line, format!("`{}` is not a number", cell))
            })
        })
        .collect::<Result<Vec<f64>, TabularError>>()?;
    if values.len() != width {
        return Err(TabularError::malformed(
            line,
            format!("expected {} values, found {}", width, values.len()),
        ));
    }
    Ok((label, values))
}

#[derive(Error, Debug)]
pub enum TabularError {
    #[error("Unable to read or write table")]
    UnableToRead(#[from] std::io::Error),
    #[error("Malformed table at line {line}: {details}")]
    Malformed { line: usize, details: String },
}

impl TabularError {
    fn malformed(line: usize, details: impl Into<String>) -> Self {
        TabularError::Malformed {
            line,
            details: details.into(),
        }
    }
}

#[cfg(test)]
mod tabular_tests {
    use super::*;
    use crate::io::glycolysis_model;
    use tempfile::tempdir;

    #[test]
    fn table_layout() {
        let table = glycolysis_model().to_tabular();
        let lines: Vec<&str> = table.lines().collect();
        assert_eq!(lines[0], "metabolite\tEX_glc\tHEX1\tPGI\tPFK\tFBP");
        assert_eq!(lines[1], "lower_bound\t0\t0\t-1000\t0\t0");
        assert_eq!(lines[2], "upper_bound\t10\t1000\t1000\t1000\t1000");
        assert_eq!(lines[3], "glc\t1\t-1\t0\t0\t0");
        assert!(lines.contains(&"pi\t0\t0\t0\t0\t1"));
    }

    #[test]
    fn round_trip() {
        let model = glycolysis_model();
        let dir = tempdir().unwrap();
        let path = dir.path().join("glycolysis.tsv");
        model.write_tabular(&path).unwrap();
        let read = Model::read_tabular(&path).unwrap();
        let ids: Vec<&String> = read.metabolites.keys().collect();
        let expected: Vec<&String> = model.metabolites.keys().collect();
        assert_eq!(ids, expected);
        assert_eq!(read.stoichiometric_matrix(), model.stoichiometric_matrix());
        assert!(read.reactions["PGI"].reversible);
        assert!(!read.reactions["PFK"].reversible);
        assert_eq!(read.reactions["EX_glc"].upper_bound, 10.);
        assert!(read.reactions["PFK"].name.is_none());
    }

    #[test]
    fn malformed_tables() {
        assert!(matches!(
            Model::from_tabular(""),
            Err(TabularError::Malformed { line: 1, .. })
        ));
        let short_row = "metabolite\tR1\tR2\nlower_bound\t0\t0\nupper_bound\t1\t1\nA\t-1\n";
        assert!(matches!(
            Model::from_tabular(short_row),
            Err(TabularError::Malformed { line: 4, .. })
        ));
        let swapped = "metabolite\tR1\nupper_bound\t1\nlower_bound\t0\n";
        assert!(matches!(
            Model::from_tabular(swapped),
            Err(TabularError::Malformed { line: 2, .. })
        ));
        let text = "metabolite\tR1\nlower_bound\tlow\nupper_bound\t1\n";
        assert!(matches!(
            Model::from_tabular(text),
            Err(TabularError::Malformed { line: 2, .. })
        ));
    }

    #[test]
    fn missing_bound_rows() {
        match Model::from_tabular("metabolite\tR1\n") {
            Err(TabularError::Malformed { line, details }) => {
                assert_eq!(line, 2);
                assert!(details.contains("lower_bound"));
            }
            other => panic!("Expected malformed table, got {:?}", other),
        }
        match Model::from_tabular("metabolite\tR1\nlower_bound\t0\n") {
            Err(TabularError::Malformed { line, details }) => {
                assert_eq!(line, 3);
                assert!(details.contains("upper_bound"));
            }
            other => panic!("Expected malformed table, got {:?}", other),
        }
    }
}
