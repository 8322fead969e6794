use chrono::NaiveDate;
use clap::{CommandFactory, Parser, Subcommand, ValueEnum, ValueHint};
use clap_complete::Shell;
use gci_algo::MissingCategoryPolicy;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "gci", author, version, about = "Grid carbon intensity from merit-order curves", long_about = None)]
pub struct Cli {
    /// Set the logging level
    #[arg(long, default_value = "info")]
    pub log_level: tracing::Level,

    /// Configuration file (defaults to ~/.gci/config.toml)
    #[arg(long, value_hint = ValueHint::FilePath)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Build and inspect per-year CO2 curve packages
    Curves {
        #[command(subcommand)]
        command: CurvesCommands,
    },
    /// Estimate CO2 intensity for a fuel-mix series
    Estimate {
        /// Fuel-mix CSV (wide or NYISO layout)
        #[arg(long, value_hint = ValueHint::FilePath)]
        fuel_mix: PathBuf,
        /// Basis year of the curve package to use
        #[arg(long)]
        year: Option<u16>,
        /// Directory holding curve packages
        #[arg(long, value_hint = ValueHint::DirPath)]
        basis_dir: Option<PathBuf>,
        /// Output CSV
        #[arg(short, long, value_hint = ValueHint::FilePath)]
        out: PathBuf,
        /// Fuel-mix readings per hour
        #[arg(long)]
        samples_per_hour: Option<f64>,
        /// How to treat categories without a usable curve
        #[arg(long)]
        missing_category: Option<MissingCategoryPolicy>,
        /// Also write total generation per timestamp
        #[arg(long)]
        with_total: bool,
    },
    /// Compare a year's estimated intensity with the published rate
    Calibrate {
        /// Basis year of the curves and of the fuel-mix samples compared
        #[arg(long)]
        year: Option<u16>,
        /// Fuel-mix CSV covering the year
        #[arg(long, value_hint = ValueHint::FilePath)]
        fuel_mix: PathBuf,
        /// Published BA emission rates (eGRID BA sheet as CSV)
        #[arg(long, value_hint = ValueHint::FilePath)]
        published: PathBuf,
        /// Balancing authority code
        #[arg(long)]
        region: Option<String>,
        /// Directory holding curve packages
        #[arg(long, value_hint = ValueHint::DirPath)]
        basis_dir: Option<PathBuf>,
    },
    /// Download NYISO real-time fuel-mix files
    Fetch {
        /// Last day to download (defaults to today)
        #[arg(long)]
        date: Option<NaiveDate>,
        /// Number of days ending at --date
        #[arg(long, default_value_t = 2)]
        days: u32,
        /// Keep only the 24 hours ending at the latest sample
        #[arg(long)]
        trailing_day: bool,
        /// Override the configured NYISO base URL
        #[arg(long)]
        base_url: Option<String>,
        /// Output CSV (wide layout)
        #[arg(short, long, value_hint = ValueHint::FilePath)]
        out: PathBuf,
    },
    /// Generate shell completion scripts
    Completions {
        /// Shell type
        #[arg(value_enum)]
        shell: Shell,
        /// Write output to a file instead of stdout
        #[arg(short, long)]
        out: Option<PathBuf>,
    },
}

#[derive(Subcommand, Debug)]
pub enum CurvesCommands {
    /// Build the curve package for a basis year
    Build {
        /// Basis year (eGRID reporting year)
        #[arg(long)]
        year: u16,
        /// eGRID plant registry (PLNT sheet as CSV)
        #[arg(long, value_hint = ValueHint::FilePath)]
        plants: PathBuf,
        /// Reference fuel-mix CSV for the same year
        #[arg(long, value_hint = ValueHint::FilePath)]
        fuel_mix: PathBuf,
        /// Balancing authority code
        #[arg(long)]
        region: Option<String>,
        /// Directory holding curve packages
        #[arg(long, value_hint = ValueHint::DirPath)]
        basis_dir: Option<PathBuf>,
        /// Published BA rates; runs the calibration check after building
        #[arg(long, value_hint = ValueHint::FilePath)]
        published: Option<PathBuf>,
    },
    /// Print a stored curve package
    Show {
        /// Basis year
        #[arg(long)]
        year: Option<u16>,
        /// Directory holding curve packages
        #[arg(long, value_hint = ValueHint::DirPath)]
        basis_dir: Option<PathBuf>,
        /// List every curve point
        #[arg(long)]
        points: bool,
        #[arg(long, value_enum, default_value_t = OutputFormat::Plain)]
        format: OutputFormat,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputFormat {
    Plain,
    Json,
}

pub fn build_cli_command() -> clap::Command {
    Cli::command()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_definition_is_consistent() {
        build_cli_command().debug_assert();
    }

    #[test]
    fn parses_estimate_overrides() {
        let cli = Cli::try_parse_from([
            "gci",
            "--log-level",
            "debug",
            "estimate",
            "--fuel-mix",
            "mix.csv",
            "--year",
            "2019",
            "-o",
            "co2.csv",
            "--missing-category",
            "zero-emissions",
        ])
        .unwrap();
        assert_eq!(cli.log_level, tracing::Level::DEBUG);
        match cli.command {
            Commands::Estimate {
                year,
                missing_category,
                samples_per_hour,
                ..
            } => {
                assert_eq!(year, Some(2019));
                assert_eq!(missing_category, Some(MissingCategoryPolicy::ZeroEmissions));
                assert_eq!(samples_per_hour, None);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn rejects_unknown_policy() {
        let parsed = Cli::try_parse_from([
            "gci",
            "estimate",
            "--fuel-mix",
            "mix.csv",
            "-o",
            "co2.csv",
            "--missing-category",
            "guess",
        ]);
        assert!(parsed.is_err());
    }
}
