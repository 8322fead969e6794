use std::path::Path;

use anyhow::{Context, Result};
use gci_algo::{Estimator, EstimatorOptions};
use gci_io::{read_fuel_mix, write_intensity};
use tracing::info;

use super::load_curves;

pub fn handle(
    fuel_mix: &Path,
    basis_dir: &Path,
    year: u16,
    out: &Path,
    options: EstimatorOptions,
    with_total: bool,
) -> Result<()> {
    let curves = load_curves(basis_dir, year)?;
    let series = read_fuel_mix(fuel_mix)
        .with_context(|| format!("loading fuel mix {}", fuel_mix.display()))?;
    let estimator = Estimator::new(&curves, options)?;
    info!(
        year,
        samples = series.len(),
        policy = ?options.missing_category,
        "estimating CO2 intensity"
    );
    let intensity = estimator.estimate(&series);
    write_intensity(&intensity, out, with_total)
        .with_context(|| format!("writing {}", out.display()))?;

    let undefined = intensity.iter().filter(|s| s.rate.is_none()).count();
    println!(
        "Estimated {} samples ({} undefined) -> {}",
        intensity.len(),
        undefined,
        out.display()
    );
    Ok(())
}
