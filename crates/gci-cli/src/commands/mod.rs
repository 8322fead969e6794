pub mod calibrate;
pub mod completions;
pub mod curves;
pub mod estimate;
pub mod fetch;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{anyhow, Context, Result};
use gci_core::CurveSet;
use gci_io::{CurveCache, CurveStore};

/// Curve set for `year` from `basis_dir`, through the process-wide cache.
pub(crate) fn load_curves(basis_dir: &Path, year: u16) -> Result<Arc<CurveSet>> {
    let cache = install_cache(basis_dir)?;
    cache
        .get(year)
        .with_context(|| format!("loading CO2 curves for {year}"))?
        .ok_or_else(|| {
            anyhow!(
                "no CO2 curves for {year} in {}; run `gci curves build --year {year}` first",
                cache.curve_store().basis_dir().display()
            )
        })
}

pub(crate) fn install_cache(basis_dir: &Path) -> Result<&'static CurveCache> {
    CurveCache::install(CurveStore::new(PathBuf::from(basis_dir)))
        .context("initializing curve cache")
}
