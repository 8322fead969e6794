//! eGRID plant registry loader
//!
//! Reads a CSV export of the eGRID `PLNTyy` sheet, keeps the plants of one
//! balancing authority and maps their primary fuel codes onto the grid
//! operator's fuel categories.

use std::collections::{BTreeSet, HashSet};
use std::path::Path;

use gci_core::{FuelCategory, GciError, GciResult, PlantRecord};
use polars::prelude::DataFrame;
use tracing::{debug, info};

use crate::frame::{f64_column, read_csv, require_columns, str_column};

/// ORIS plant code
pub const PLANT_ID: &str = "ORISPL";
/// Plant annual capacity factor
pub const CAPACITY_FACTOR: &str = "CAPFAC";
/// Plant nameplate capacity (MW)
pub const NAMEPLATE_CAPACITY: &str = "NAMEPCAP";
/// Plant primary fuel category
pub const FUEL_CODE: &str = "PLFUELCT";
/// Plant annual CO2 equivalent total output emission rate (kg/MWh, metric file)
pub const EMISSIONS_RATE: &str = "PLC2ERTA";
/// Balancing authority code
pub const REGION: &str = "BACODE";

const REQUIRED: [&str; 6] = [
    PLANT_ID,
    CAPACITY_FACTOR,
    NAMEPLATE_CAPACITY,
    FUEL_CODE,
    EMISSIONS_RATE,
    REGION,
];

pub fn load_plant_registry(path: &Path, region: &str) -> GciResult<Vec<PlantRecord>> {
    let df = read_csv(path)?;
    let plants = parse_plant_frame(&df, region)?;
    info!(
        path = %path.display(),
        region,
        plants = plants.len(),
        "loaded plant registry"
    );
    Ok(plants)
}

/// Convert a registry frame into plant records for `region`.
///
/// Missing capacity factors stay NaN; the curve builder ranks them last.
/// Missing capacities and emission rates are read as zero.
pub fn parse_plant_frame(df: &DataFrame, region: &str) -> GciResult<Vec<PlantRecord>> {
    require_columns(df, &REQUIRED, "plant registry")?;

    let regions = str_column(df, REGION)?;
    let ids = str_column(df, PLANT_ID)?;
    let fuels = str_column(df, FUEL_CODE)?;
    let factors = f64_column(df, CAPACITY_FACTOR)?;
    let capacities = f64_column(df, NAMEPLATE_CAPACITY)?;
    let rates = f64_column(df, EMISSIONS_RATE)?;

    let mut seen: HashSet<String> = HashSet::new();
    let mut unmapped: BTreeSet<String> = BTreeSet::new();
    let mut plants = Vec::new();

    for row in 0..df.height() {
        if regions[row].as_deref() != Some(region) {
            continue;
        }
        let plant_id = ids[row]
            .clone()
            .filter(|id| !id.is_empty())
            .ok_or_else(|| {
                GciError::DataFormat(format!("row {row}: plant has no {PLANT_ID}"))
            })?;
        if !seen.insert(plant_id.clone()) {
            return Err(GciError::DataFormat(format!(
                "duplicate plant id '{plant_id}' in registry"
            )));
        }

        let code = fuels[row].clone().unwrap_or_default();
        let Some(fuel) = FuelCategory::from_egrid_code(&code) else {
            unmapped.insert(code);
            continue;
        };

        plants.push(PlantRecord::new(
            plant_id,
            factors[row].unwrap_or(f64::NAN),
            capacities[row].unwrap_or(0.0),
            fuel,
            rates[row].unwrap_or(0.0),
        ));
    }

    if !unmapped.is_empty() {
        debug!(codes = ?unmapped, "skipped plants with unmapped fuel codes");
    }
    Ok(plants)
}
