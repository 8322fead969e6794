//! Fuel-mix time series readers and writer
//!
//! Two layouts are accepted:
//!
//! - **wide**: a `timestamp` column (RFC 3339) and one column of MW per
//!   fuel category
//! - **NYISO long**: `Time Stamp`, `Time Zone`, `Fuel Category`, `Gen MW`,
//!   one row per timestamp and category, as published in the real-time
//!   fuel-mix files
//!
//! In both, `Dual Fuel` generation is added to `Natural Gas`.

use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use chrono::{DateTime, FixedOffset, NaiveDateTime};
use gci_core::{
    FuelCategory, FuelMixSample, FuelMixSeries, GciError, GciResult, Megawatts, Timestamp,
    DUAL_FUEL,
};
use polars::prelude::*;
use tracing::{info, warn};

use crate::frame::{f64_column, read_csv, require_columns, str_column, write_csv_staged};

pub const TIMESTAMP: &str = "timestamp";

pub const NYISO_TIME_STAMP: &str = "Time Stamp";
pub const NYISO_TIME_ZONE: &str = "Time Zone";
pub const NYISO_FUEL_CATEGORY: &str = "Fuel Category";
pub const NYISO_GEN_MW: &str = "Gen MW";

/// Derived columns that may appear in wide files and carry no generation.
const BOOKKEEPING: [&str; 3] = ["total_mw", "total_mwh", "co2_rate"];

pub fn read_fuel_mix(path: &Path) -> GciResult<FuelMixSeries> {
    let df = read_csv(path)?;
    let names = df.get_column_names();
    let series = if names.contains(&NYISO_FUEL_CATEGORY) {
        parse_nyiso_frame(&df)?
    } else {
        parse_wide_frame(&df)?
    };
    info!(
        path = %path.display(),
        samples = series.len(),
        categories = series.categories().len(),
        "loaded fuel mix"
    );
    Ok(series)
}

/// Wide layout: one row per timestamp.
pub fn parse_wide_frame(df: &DataFrame) -> GciResult<FuelMixSeries> {
    require_columns(df, &[TIMESTAMP], "fuel-mix table")?;
    let timestamps = str_column(df, TIMESTAMP)?;

    let mut columns: Vec<(String, Vec<Option<f64>>)> = Vec::new();
    for name in df.get_column_names() {
        if name == TIMESTAMP || BOOKKEEPING.contains(&name) {
            continue;
        }
        columns.push((name.to_string(), f64_column(df, name)?));
    }

    let mut unknown = BTreeSet::new();
    let mut samples = Vec::with_capacity(df.height());
    for (row, raw_ts) in timestamps.iter().enumerate() {
        let raw_ts = raw_ts
            .as_deref()
            .ok_or_else(|| GciError::DataFormat(format!("row {row}: empty timestamp")))?;
        let timestamp = parse_timestamp(raw_ts)?;
        let raw: BTreeMap<String, f64> = columns
            .iter()
            .filter_map(|(name, values)| values[row].map(|v| (name.clone(), v)))
            .collect();
        samples.push(FuelMixSample {
            timestamp,
            generation: fold_categories(raw, &mut unknown),
        });
    }
    warn_unknown(&unknown);
    FuelMixSeries::new(samples)
}

/// NYISO long layout: pivot rows into one sample per timestamp.
pub fn parse_nyiso_frame(df: &DataFrame) -> GciResult<FuelMixSeries> {
    parse_nyiso_frames(std::slice::from_ref(df))
}

/// Pivot several NYISO files (typically one per day) into a single series.
pub fn parse_nyiso_frames(frames: &[DataFrame]) -> GciResult<FuelMixSeries> {
    let mut pivot: BTreeMap<Timestamp, BTreeMap<String, f64>> = BTreeMap::new();
    for df in frames {
        pivot_nyiso_rows(df, &mut pivot)?;
    }

    let mut unknown = BTreeSet::new();
    let samples = pivot
        .into_iter()
        .map(|(timestamp, raw)| FuelMixSample {
            timestamp,
            generation: fold_categories(raw, &mut unknown),
        })
        .collect();
    warn_unknown(&unknown);
    FuelMixSeries::new(samples)
}

fn pivot_nyiso_rows(
    df: &DataFrame,
    pivot: &mut BTreeMap<Timestamp, BTreeMap<String, f64>>,
) -> GciResult<()> {
    require_columns(
        df,
        &[
            NYISO_TIME_STAMP,
            NYISO_TIME_ZONE,
            NYISO_FUEL_CATEGORY,
            NYISO_GEN_MW,
        ],
        "NYISO fuel-mix file",
    )?;
    let stamps = str_column(df, NYISO_TIME_STAMP)?;
    let zones = str_column(df, NYISO_TIME_ZONE)?;
    let fuels = str_column(df, NYISO_FUEL_CATEGORY)?;
    let mw = f64_column(df, NYISO_GEN_MW)?;

    for row in 0..df.height() {
        let (Some(stamp), Some(zone), Some(fuel)) = (&stamps[row], &zones[row], &fuels[row]) else {
            return Err(GciError::DataFormat(format!(
                "row {row}: missing timestamp, time zone or fuel category"
            )));
        };
        let Some(value) = mw[row] else {
            continue;
        };
        let timestamp = parse_nyiso_timestamp(stamp, zone)?;
        let entry = pivot.entry(timestamp).or_default();
        if entry.insert(fuel.clone(), value).is_some() {
            return Err(GciError::DataFormat(format!(
                "duplicate '{fuel}' reading at {timestamp}"
            )));
        }
    }
    Ok(())
}

/// Write a series in the wide layout, one column per category seen.
pub fn write_fuel_mix(series: &FuelMixSeries, output: &Path) -> GciResult<()> {
    let categories = series.categories();
    let mut columns = vec![Series::new(
        TIMESTAMP,
        series
            .samples()
            .iter()
            .map(|s| s.timestamp.to_rfc3339())
            .collect::<Vec<_>>(),
    )];
    for category in categories {
        let values: Vec<Option<f64>> = series
            .samples()
            .iter()
            .map(|s| s.generation.get(&category).map(|mw| mw.value()))
            .collect();
        columns.push(Series::new(category.as_str(), values));
    }
    let mut df = DataFrame::new(columns)
        .map_err(crate::frame::polars_err("assembling fuel-mix table"))?;
    write_csv_staged(&mut df, output, "gci-fuel-mix")
}

/// Accepts RFC 3339 as well as the space-separated form pandas writes.
pub fn parse_timestamp(raw: &str) -> GciResult<Timestamp> {
    let raw = raw.trim();
    DateTime::parse_from_rfc3339(raw)
        .or_else(|_| DateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S%z"))
        .map_err(|e| GciError::DataFormat(format!("invalid timestamp '{raw}': {e}")))
}

/// NYISO stamps are local wall-clock time with an `EST` / `EDT` marker.
pub fn parse_nyiso_timestamp(stamp: &str, zone: &str) -> GciResult<Timestamp> {
    let offset_hours = match zone.trim() {
        "EST" => 5,
        "EDT" => 4,
        other => {
            return Err(GciError::DataFormat(format!(
                "unsupported NYISO time zone '{other}'; expected EST or EDT"
            )))
        }
    };
    let offset = FixedOffset::west_opt(offset_hours * 3600)
        .ok_or_else(|| GciError::DataFormat(format!("invalid offset for '{zone}'")))?;
    let naive = NaiveDateTime::parse_from_str(stamp.trim(), "%m/%d/%Y %H:%M:%S")
        .map_err(|e| GciError::DataFormat(format!("invalid NYISO time stamp '{stamp}': {e}")))?;
    naive
        .and_local_timezone(offset)
        .single()
        .ok_or_else(|| GciError::DataFormat(format!("ambiguous time stamp '{stamp} {zone}'")))
}

fn fold_categories(
    raw: BTreeMap<String, f64>,
    unknown: &mut BTreeSet<String>,
) -> BTreeMap<FuelCategory, Megawatts> {
    let mut generation: BTreeMap<FuelCategory, Megawatts> = BTreeMap::new();
    for (name, value) in raw {
        let category = if name.trim() == DUAL_FUEL {
            FuelCategory::NaturalGas
        } else {
            match name.parse::<FuelCategory>() {
                Ok(category) => category,
                Err(_) => {
                    unknown.insert(name);
                    continue;
                }
            }
        };
        *generation.entry(category).or_default() += Megawatts(value);
    }
    generation
}

fn warn_unknown(unknown: &BTreeSet<String>) {
    if !unknown.is_empty() {
        warn!(columns = ?unknown, "ignoring unrecognised fuel categories");
    }
}
