//! Published balancing-authority emission rates (eGRID `BAyy` sheet).

use std::path::Path;

use gci_core::{GciError, GciResult, KgCo2ePerMwh};
use polars::prelude::DataFrame;

use crate::frame::{f64_column, read_csv, require_columns, str_column};

pub const REGION: &str = "BACODE";
/// BA annual CO2 equivalent total output emission rate (kg/MWh)
pub const EMISSIONS_RATE: &str = "BAC2ERTA";

pub fn load_published_rate(path: &Path, region: &str) -> GciResult<KgCo2ePerMwh> {
    published_rate(&read_csv(path)?, region)
}

pub fn published_rate(df: &DataFrame, region: &str) -> GciResult<KgCo2ePerMwh> {
    require_columns(df, &[REGION, EMISSIONS_RATE], "published BA table")?;
    let regions = str_column(df, REGION)?;
    let rates = f64_column(df, EMISSIONS_RATE)?;
    regions
        .iter()
        .zip(rates)
        .find(|(code, _)| code.as_deref() == Some(region))
        .and_then(|(_, rate)| rate)
        .map(KgCo2ePerMwh)
        .ok_or_else(|| {
            GciError::DataFormat(format!("no {EMISSIONS_RATE} value for region '{region}'"))
        })
}
