use anyhow::{bail, Context, Result};
use log::{info, warn};

use metnet_core::configuration::{Configuration, DuplicatePolicy};
use metnet_core::io::ModelFormat;
use metnet_core::lookup::table::TableResolver;
use metnet_core::lookup::FormulaResolver;
use metnet_core::metabolic_model::model::Model;
use metnet_core::network::NetworkRegistry;

use crate::cli::{BuildOptions, Cli, LookupOptions};

const DEFAULT_MODEL_NAME: &str = "model";

pub fn run(cli: Cli) -> Result<()> {
    let configuration = configuration(&cli.build)?;
    let resolver = formula_resolver(&cli.lookup)?;

    let mut registry = NetworkRegistry::new(configuration);
    registry
        .read_metabolites(&cli.metabolites, &*resolver)
        .with_context(|| format!("Failed to load metabolites from {}", cli.metabolites.display()))?;
    registry
        .read_reactions(&cli.reactions)
        .with_context(|| format!("Failed to load reactions from {}", cli.reactions.display()))?;

    let name = cli
        .name
        .clone()
        .or_else(|| {
            cli.output
                .file_stem()
                .and_then(|stem| stem.to_str())
                .map(String::from)
        })
        .unwrap_or_else(|| DEFAULT_MODEL_NAME.to_string());
    let model = registry.build_model(&name, cli.id.as_deref());

    let format = output_format(&cli);
    model
        .write(&cli.output, format)
        .with_context(|| format!("Failed to write model to {}", cli.output.display()))?;
    info!(
        "Model {} written with {} metabolites and {} reactions",
        name,
        model.metabolites.len(),
        model.reactions.len()
    );

    if cli.print_matrix {
        print!("{}", render_matrix(&model));
    }
    Ok(())
}

fn configuration(options: &BuildOptions) -> Result<Configuration> {
    let mut configuration = match &options.config {
        Some(path) => Configuration::read_json(path)
            .with_context(|| format!("Failed to read configuration from {}", path.display()))?,
        None => Configuration::default(),
    };
    if options.strict_duplicates {
        configuration.duplicates = DuplicatePolicy::Reject;
    }
    Ok(configuration)
}

fn formula_resolver(options: &LookupOptions) -> Result<Box<dyn FormulaResolver>> {
    if options.pubchem {
        return pubchem_resolver();
    }
    match &options.formulas {
        Some(path) => {
            let table = TableResolver::read_file(path)
                .with_context(|| format!("Failed to read formula table {}", path.display()))?;
            info!("Read {} formulas from {}", table.len(), path.display());
            Ok(Box::new(table))
        }
        None => bail!("No formula source given, use --formulas FILE or --pubchem"),
    }
}

#[cfg(feature = "pubchem")]
fn pubchem_resolver() -> Result<Box<dyn FormulaResolver>> {
    use metnet_core::lookup::pubchem::PubChemResolver;
    use metnet_core::lookup::CachedResolver;

    Ok(Box::new(CachedResolver::new(PubChemResolver::new())))
}

#[cfg(not(feature = "pubchem"))]
fn pubchem_resolver() -> Result<Box<dyn FormulaResolver>> {
    bail!("metnet was built without PubChem support, rebuild with `--features pubchem`")
}

/// Explicit format first, then the output extension, then SBML
fn output_format(cli: &Cli) -> ModelFormat {
    match cli.format.as_deref() {
        Some(name) => ModelFormat::from_name(name).unwrap_or_else(|| {
            warn!("Unknown format `{}`, writing SBML", name);
            ModelFormat::Sbml
        }),
        None => ModelFormat::from_path(&cli.output).unwrap_or_default(),
    }
}

/// Tab separated stoichiometric matrix with metabolite and reaction labels
fn render_matrix(model: &Model) -> String {
    let matrix = model.stoichiometric_matrix();
    let mut out = String::new();
    out.push_str(
        &std::iter::once(String::new())
            .chain(model.reactions.keys().cloned())
            .collect::<Vec<String>>()
            .join("\t"),
    );
    out.push('\n');
    for (row, met_id) in model.metabolites.keys().enumerate() {
        out.push_str(met_id);
        for value in matrix.row(row).iter() {
            out.push('\t');
            out.push_str(&value.to_string());
        }
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use std::fs;
    use std::path::{Path, PathBuf};

    fn test_data(file: &str) -> PathBuf {
        PathBuf::from(env!("CARGO_MANIFEST_DIR"))
            .join("../metnet_core/test_data")
            .join(file)
    }

    fn cli(output: &Path, extra: &[&str]) -> Cli {
        let mut args: Vec<String> = vec![
            "metnet".to_string(),
            "--metabolites".to_string(),
            test_data("glycolysis_metabolites.txt").display().to_string(),
            "--reactions".to_string(),
            test_data("glycolysis_reactions.txt").display().to_string(),
            "--formulas".to_string(),
            test_data("formulas.txt").display().to_string(),
            "--output".to_string(),
            output.display().to_string(),
        ];
        args.extend(extra.iter().map(|s| s.to_string()));
        Cli::try_parse_from(args).unwrap()
    }

    #[test]
    fn writes_json_model() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("glycolysis.json");
        run(cli(&output, &[])).unwrap();
        let model = Model::read_json(&output).unwrap();
        assert_eq!(model.id.as_deref(), Some("glycolysis_1"));
        assert_eq!(model.reactions.len(), 5);
    }

    #[test]
    fn explicit_format_and_name() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("out.dat");
        run(cli(&output, &["--format", "tabular", "--name", "glyc", "--id", "g"])).unwrap();
        let table = fs::read_to_string(&output).unwrap();
        assert!(table.starts_with("metabolite\tEX_glc"));
    }

    #[test]
    fn format_selection() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(output_format(&cli(&dir.path().join("m.json"), &[])), ModelFormat::Json);
        assert_eq!(output_format(&cli(&dir.path().join("m"), &[])), ModelFormat::Sbml);
        assert_eq!(
            output_format(&cli(&dir.path().join("m.json"), &["-f", "matlab"])),
            ModelFormat::Tabular
        );
        assert_eq!(
            output_format(&cli(&dir.path().join("m.json"), &["-f", "nonsense"])),
            ModelFormat::Sbml
        );
    }

    #[test]
    fn missing_formula_source() {
        let options = LookupOptions {
            formulas: None,
            pubchem: false,
        };
        assert!(formula_resolver(&options).is_err());
    }

    #[test]
    fn strict_duplicates_flag() {
        let options = BuildOptions {
            config: None,
            strict_duplicates: true,
        };
        assert_eq!(
            configuration(&options).unwrap().duplicates,
            DuplicatePolicy::Reject
        );
    }

    #[test]
    fn matrix_rendering() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("glycolysis.xml");
        run(cli(&output, &[])).unwrap();
        let model = Model::read_sbml(&output).unwrap();
        let rendered = render_matrix(&model);
        let mut lines = rendered.lines();
        assert_eq!(lines.next(), Some("\tEX_glc\tHEX1\tPGI\tPFK\tFBP"));
        assert_eq!(lines.next(), Some("glc\t1\t-1\t0\t0\t0"));
    }
}
