use std::io::{self, Write};
use std::path::Path;

use anyhow::{Context, Result};
use gci_algo::{build_curve_set, calibrate, Estimator, EstimatorOptions};
use gci_core::{CurveSet, FuelMixSeries};
use gci_io::{load_plant_registry, load_published_rate, read_fuel_mix};
use tabwriter::TabWriter;
use tracing::{info, warn};

use gci_cli::cli::OutputFormat;

use super::{install_cache, load_curves};

pub struct BuildArgs<'a> {
    pub year: u16,
    pub plants: &'a Path,
    pub fuel_mix: &'a Path,
    pub region: &'a str,
    pub basis_dir: &'a Path,
    pub published: Option<&'a Path>,
    pub options: EstimatorOptions,
}

pub fn build(args: BuildArgs<'_>) -> Result<()> {
    info!(
        year = args.year,
        region = args.region,
        "building CO2 curves from {} and {}",
        args.plants.display(),
        args.fuel_mix.display()
    );
    let plants = load_plant_registry(args.plants, args.region)
        .with_context(|| format!("loading plant registry {}", args.plants.display()))?;
    let reference = read_fuel_mix(args.fuel_mix)
        .with_context(|| format!("loading fuel mix {}", args.fuel_mix.display()))?;

    let set = build_curve_set(args.year, &plants, &reference);
    let set = install_cache(args.basis_dir)?
        .store(set)
        .with_context(|| format!("saving CO2 curves for {}", args.year))?;
    println!(
        "Built {} curves for {} from {} plants",
        set.curves.len(),
        args.year,
        plants.len()
    );

    if let Some(published) = args.published {
        check_against_published(&set, &reference, published, &args);
    }
    Ok(())
}

/// Calibration is diagnostic: any failure is logged and the build stands.
fn check_against_published(
    set: &CurveSet,
    reference: &FuelMixSeries,
    published: &Path,
    args: &BuildArgs<'_>,
) {
    let published_rate = match load_published_rate(published, args.region) {
        Ok(rate) => rate,
        Err(e) => {
            warn!(path = %published.display(), error = %e, "calibration skipped");
            return;
        }
    };
    let estimator = match Estimator::new(set, args.options) {
        Ok(estimator) => estimator,
        Err(e) => {
            warn!(error = %e, "calibration skipped");
            return;
        }
    };
    let series = estimator.estimate(reference);
    match calibrate(&series, i32::from(args.year), published_rate) {
        Some(report) => println!("{report}"),
        None => warn!(
            year = args.year,
            "no fuel-mix samples with a defined rate; calibration skipped"
        ),
    }
}

pub fn show(basis_dir: &Path, year: u16, points: bool, format: OutputFormat) -> Result<()> {
    let set = load_curves(basis_dir, year)?;
    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&*set)?);
            Ok(())
        }
        OutputFormat::Plain if points => print_points(&set),
        OutputFormat::Plain => print_summary(&set),
    }
}

fn print_summary(set: &CurveSet) -> Result<()> {
    println!("CO2 curves for {}", set.basis_year);
    let mut writer = TabWriter::new(io::stdout());
    writeln!(writer, "CATEGORY\tPOINTS\tMAX MW\tFIRST RATE\tLAST RATE")?;
    for (category, curve) in &set.curves {
        let (first, last) = match (curve.points().first(), curve.points().last()) {
            (Some(first), Some(last)) => (
                format!("{:.1}", first.rate),
                format!("{:.1}", last.rate),
            ),
            _ => ("-".to_string(), "-".to_string()),
        };
        let max = curve
            .max_capacity()
            .map(|mw| format!("{mw:.1}"))
            .unwrap_or_else(|| "-".to_string());
        writeln!(
            writer,
            "{category}\t{}\t{max}\t{first}\t{last}",
            curve.len()
        )?;
    }
    writer.flush()?;
    Ok(())
}

fn print_points(set: &CurveSet) -> Result<()> {
    let mut writer = TabWriter::new(io::stdout());
    writeln!(writer, "CATEGORY\tCUMULATIVE MW\tKG/MWH")?;
    for (category, curve) in &set.curves {
        for point in curve.points() {
            writeln!(
                writer,
                "{category}\t{:.3}\t{:.3}",
                point.cumulative_mw, point.rate
            )?;
        }
    }
    writer.flush()?;
    Ok(())
}
