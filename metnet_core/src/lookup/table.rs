//! Offline formula lookup from an in-memory table
use std::fs;
use std::path::Path;

use indexmap::IndexMap;

use super::{FormulaResolver, LookupError};

/// Case-insensitive table of chemical names to formulas
///
/// Tables can be read from a text file with one `name;formula` pair per line, blank lines
/// and lines starting with `#` are skipped.
#[derive(Debug, Clone, Default)]
pub struct TableResolver {
    formulas: IndexMap<String, String>,
}

impl TableResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a formula, replacing any formula already stored for `name`
    pub fn insert(&mut self, name: &str, formula: &str) {
        self.formulas
            .insert(name.to_lowercase(), formula.to_string());
    }

    pub fn len(&self) -> usize {
        self.formulas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.formulas.is_empty()
    }

    /// Read a `name;formula` table file
    pub fn read_file<P: AsRef<Path>>(path: P) -> Result<Self, LookupError> {
        let data = fs::read_to_string(path)?;
        Self::parse(&data)
    }

    /// Parse the contents of a `name;formula` table
    pub fn parse(data: &str) -> Result<Self, LookupError> {
        let mut table = Self::new();
        for (idx, line) in data.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            match line.split(';').collect::<Vec<&str>>().as_slice() {
                [name, formula] if !name.trim().is_empty() && !formula.trim().is_empty() => {
                    table.insert(name.trim(), formula.trim())
                }
                _ => {
                    return Err(LookupError::MalformedTable {
                        line: idx + 1,
                        details: format!("expected `name;formula`, found `{}`", line),
                    })
                }
            }
        }
        Ok(table)
    }
}

impl<N: AsRef<str>, F: AsRef<str>> FromIterator<(N, F)> for TableResolver {
    fn from_iter<T: IntoIterator<Item = (N, F)>>(iter: T) -> Self {
        let mut table = Self::new();
        for (name, formula) in iter {
            table.insert(name.as_ref(), formula.as_ref());
        }
        table
    }
}

impl FormulaResolver for TableResolver {
    fn resolve(&self, name: &str) -> Result<String, LookupError> {
        self.formulas
            .get(&name.to_lowercase())
            .cloned()
            .ok_or_else(|| LookupError::NotFound(name.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn case_insensitive() {
        let table: TableResolver = [("D-Glucose", "C6H12O6")].into_iter().collect();
        assert_eq!(table.resolve("d-glucose").unwrap(), "C6H12O6");
        assert_eq!(table.resolve("D-GLUCOSE").unwrap(), "C6H12O6");
        assert!(matches!(
            table.resolve("fructose"),
            Err(LookupError::NotFound(name)) if name == "fructose"
        ));
    }

    #[test]
    fn parse_table() {
        let table = TableResolver::parse("# comment\n\nATP;C10H16N5O13P3\n Water ; H2O \n").unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.resolve("water").unwrap(), "H2O");
    }

    #[test]
    fn malformed_table() {
        match TableResolver::parse("ATP;C10H16N5O13P3\nwater\n") {
            Err(LookupError::MalformedTable { line, .. }) => assert_eq!(line, 2),
            _ => panic!("Table should not have parsed"),
        }
        assert!(TableResolver::parse("water;;H2O").is_err());
    }

    #[test]
    fn read_test_table() {
        let data_path = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
            .join("test_data")
            .join("formulas.txt");
        let table = TableResolver::read_file(data_path).unwrap();
        assert_eq!(table.resolve("Phosphate").unwrap(), "O4P-3");
        assert_eq!(table.resolve("D-Glucose").unwrap(), "C6H12O6");
    }
}
