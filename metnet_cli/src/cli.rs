use std::path::PathBuf;

use clap::{ArgAction, Args, Parser};

#[derive(Parser)]
#[command(
    name = "metnet",
    about = "Build a metabolic network model from metabolite and reaction lists",
    version,
    author
)]
pub struct Cli {
    /// Metabolite file, one `Identifier;DisplayName;Compartment` record per line
    #[arg(short, long, value_name = "FILE")]
    pub metabolites: PathBuf,

    /// Reaction file, one `Identifier;DisplayName;Equation[;LowerBound[;UpperBound]]` record per line
    #[arg(short, long, value_name = "FILE")]
    pub reactions: PathBuf,

    /// Where to write the model
    #[arg(short, long, value_name = "FILE")]
    pub output: PathBuf,

    /// Output format: sbml, tabular or json (inferred from the output extension if omitted)
    #[arg(short, long, value_name = "FORMAT")]
    pub format: Option<String>,

    /// Model name (defaults to the output file stem)
    #[arg(long, value_name = "NAME")]
    pub name: Option<String>,

    /// Model id (defaults to `<name>_1`)
    #[arg(long, value_name = "ID")]
    pub id: Option<String>,

    #[command(flatten)]
    pub lookup: LookupOptions,

    #[command(flatten)]
    pub build: BuildOptions,

    /// Print the stoichiometric matrix to stdout
    #[arg(long)]
    pub print_matrix: bool,

    /// Increase logging verbosity from warnings to info, debug and trace, repeatable
    #[arg(short, long, action = ArgAction::Count, conflicts_with = "quiet")]
    pub verbose: u8,

    /// Only log errors
    #[arg(short, long)]
    pub quiet: bool,
}

/// Where chemical formulas come from.
#[derive(Args)]
#[command(next_help_heading = "Formula Lookup")]
pub struct LookupOptions {
    /// Offline `name;formula` table
    #[arg(long, value_name = "FILE", conflicts_with = "pubchem")]
    pub formulas: Option<PathBuf>,

    /// Query the PubChem web service (requires the `pubchem` feature)
    #[arg(long)]
    pub pubchem: bool,
}

/// Options controlling how the input files are read.
#[derive(Args)]
#[command(next_help_heading = "Network Building")]
pub struct BuildOptions {
    /// JSON configuration file
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Fail on a repeated metabolite or reaction identifier instead of replacing it
    #[arg(long)]
    pub strict_duplicates: bool,
}

pub fn parse() -> Cli {
    Cli::parse()
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn command_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parse_full_command_line() {
        let cli = Cli::try_parse_from([
            "metnet",
            "-m",
            "mets.txt",
            "-r",
            "rxns.txt",
            "-o",
            "model.json",
            "--formulas",
            "formulas.txt",
            "--strict-duplicates",
            "-vv",
        ])
        .unwrap();
        assert_eq!(cli.metabolites, PathBuf::from("mets.txt"));
        assert_eq!(cli.output, PathBuf::from("model.json"));
        assert_eq!(cli.lookup.formulas, Some(PathBuf::from("formulas.txt")));
        assert!(cli.build.strict_duplicates);
        assert_eq!(cli.verbose, 2);
        assert!(cli.format.is_none());
    }

    #[test]
    fn formula_sources_conflict() {
        assert!(Cli::try_parse_from([
            "metnet", "-m", "a", "-r", "b", "-o", "c", "--formulas", "f", "--pubchem",
        ])
        .is_err());
    }
}
