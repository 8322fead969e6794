use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{debug, error};
use tracing_subscriber::FmtSubscriber;

use gci_cli::cli::{Cli, Commands, CurvesCommands};
use gci_cli::config::GciConfig;

mod commands;

use commands::{calibrate, completions, curves, estimate, fetch};

fn main() -> ExitCode {
    let cli = Cli::parse();

    let subscriber = FmtSubscriber::builder()
        .with_max_level(cli.log_level)
        .finish();
    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("failed to install log subscriber: {e}");
    }

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e:#}");
            ExitCode::FAILURE
        }
    }
}

fn load_config(cli: &Cli) -> Result<GciConfig> {
    let config = match &cli.config {
        Some(path) => GciConfig::load_from(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => GciConfig::load().context("loading config")?,
    };
    debug!(?config, "configuration resolved");
    Ok(config)
}

fn run(cli: Cli) -> Result<()> {
    if let Commands::Completions { shell, out } = &cli.command {
        return completions::handle(*shell, out.as_deref());
    }

    let config = load_config(&cli)?;
    let core = &config.core;

    match &cli.command {
        Commands::Curves { command } => match command {
            CurvesCommands::Build {
                year,
                plants,
                fuel_mix,
                region,
                basis_dir,
                published,
            } => curves::build(curves::BuildArgs {
                year: *year,
                plants,
                fuel_mix,
                region: region.as_deref().unwrap_or(&core.region),
                basis_dir: basis_dir.as_deref().unwrap_or(&core.basis_dir),
                published: published.as_deref(),
                options: config.estimator.options(),
            }),
            CurvesCommands::Show {
                year,
                basis_dir,
                points,
                format,
            } => curves::show(
                basis_dir.as_deref().unwrap_or(&core.basis_dir),
                year.unwrap_or(core.default_year),
                *points,
                *format,
            ),
        },
        Commands::Estimate {
            fuel_mix,
            year,
            basis_dir,
            out,
            samples_per_hour,
            missing_category,
            with_total,
        } => {
            let mut options = config.estimator.options();
            if let Some(n) = samples_per_hour {
                options.samples_per_hour = *n;
            }
            if let Some(policy) = missing_category {
                options.missing_category = *policy;
            }
            estimate::handle(
                fuel_mix,
                basis_dir.as_deref().unwrap_or(&core.basis_dir),
                year.unwrap_or(core.default_year),
                out,
                options,
                *with_total,
            )
        }
        Commands::Calibrate {
            year,
            fuel_mix,
            published,
            region,
            basis_dir,
        } => calibrate::handle(
            basis_dir.as_deref().unwrap_or(&core.basis_dir),
            year.unwrap_or(core.default_year),
            fuel_mix,
            published,
            region.as_deref().unwrap_or(&core.region),
            config.estimator.options(),
        ),
        Commands::Fetch {
            date,
            days,
            trailing_day,
            base_url,
            out,
        } => fetch::handle(
            base_url.as_deref().unwrap_or(&config.nyiso.base_url),
            date.unwrap_or_else(|| chrono::Local::now().date_naive()),
            *days,
            *trailing_day,
            out,
        ),
        Commands::Completions { .. } => Ok(()),
    }
}
