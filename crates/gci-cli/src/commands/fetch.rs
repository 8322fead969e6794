use std::path::Path;

use anyhow::{bail, Result};
use chrono::{Duration, NaiveDate};
#[cfg(feature = "native-io")]
use {
    anyhow::Context,
    gci_io::{sources::trailing_day, write_fuel_mix, NyisoFuelMixSource},
};

/// Dates `last - (days - 1) ..= last`, oldest first.
pub fn date_range(last: NaiveDate, days: u32) -> Vec<NaiveDate> {
    (0..i64::from(days))
        .rev()
        .map(|back| last - Duration::days(back))
        .collect()
}

#[cfg(feature = "native-io")]
pub fn handle(
    base_url: &str,
    last: NaiveDate,
    days: u32,
    keep_trailing_day: bool,
    out: &Path,
) -> Result<()> {
    if days == 0 {
        bail!("--days must be at least 1");
    }
    let source = NyisoFuelMixSource::new(base_url);
    let dates = date_range(last, days);
    let mut series = source
        .fetch(&dates)
        .with_context(|| format!("fetching NYISO fuel mix from {}", source.base_url()))?;
    if keep_trailing_day {
        series = trailing_day(&series);
    }
    write_fuel_mix(&series, out).with_context(|| format!("writing {}", out.display()))?;
    println!("Fetched {} samples -> {}", series.len(), out.display());
    Ok(())
}

#[cfg(not(feature = "native-io"))]
pub fn handle(
    _base_url: &str,
    _last: NaiveDate,
    _days: u32,
    _keep_trailing_day: bool,
    _out: &Path,
) -> Result<()> {
    bail!("gci was built without network support (enable the `native-io` feature)")
}
