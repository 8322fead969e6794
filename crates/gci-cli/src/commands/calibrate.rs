use std::path::Path;

use anyhow::{Context, Result};
use gci_algo::{calibrate, Estimator, EstimatorOptions};
use gci_io::{load_published_rate, read_fuel_mix};
use tracing::warn;

use super::load_curves;

/// Print the accuracy report. Inputs that cannot be read are errors, but a
/// comparison that cannot be made is only logged.
pub fn handle(
    basis_dir: &Path,
    year: u16,
    fuel_mix: &Path,
    published: &Path,
    region: &str,
    options: EstimatorOptions,
) -> Result<()> {
    let curves = load_curves(basis_dir, year)?;
    let series = read_fuel_mix(fuel_mix)
        .with_context(|| format!("loading fuel mix {}", fuel_mix.display()))?;
    let intensity = Estimator::new(&curves, options)?.estimate(&series);

    let published_rate = match load_published_rate(published, region) {
        Ok(rate) => rate,
        Err(e) => {
            warn!(path = %published.display(), region, error = %e, "calibration skipped");
            return Ok(());
        }
    };
    match calibrate(&intensity, i32::from(year), published_rate) {
        Some(report) => println!("{report}"),
        None => warn!(
            year,
            path = %fuel_mix.display(),
            "no samples with a defined rate in the basis year; calibration skipped"
        ),
    }
    Ok(())
}
