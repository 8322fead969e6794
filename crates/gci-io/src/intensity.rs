//! Estimator output table: `timestamp,co2_rate[,total_mw]`, one row per
//! input timestamp. Undefined rates are empty cells.

use std::path::Path;

use gci_core::{GciResult, IntensitySeries};
use polars::prelude::*;

use crate::frame::{polars_err, write_csv_staged};

pub const CO2_RATE: &str = "co2_rate";
pub const TOTAL_MW: &str = "total_mw";

pub fn intensity_frame(series: &IntensitySeries, with_total: bool) -> GciResult<DataFrame> {
    let timestamps: Vec<String> = series.iter().map(|s| s.timestamp.to_rfc3339()).collect();
    let rates: Vec<Option<f64>> = series.iter().map(|s| s.rate.map(|r| r.value())).collect();
    let mut columns = vec![
        Series::new(crate::fuel_mix::TIMESTAMP, timestamps),
        Series::new(CO2_RATE, rates),
    ];
    if with_total {
        let totals: Vec<f64> = series.iter().map(|s| s.total_generation.value()).collect();
        columns.push(Series::new(TOTAL_MW, totals));
    }
    DataFrame::new(columns).map_err(polars_err("assembling intensity table"))
}

pub fn write_intensity(series: &IntensitySeries, output: &Path, with_total: bool) -> GciResult<()> {
    let mut df = intensity_frame(series, with_total)?;
    write_csv_staged(&mut df, output, "gci-estimate")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::DateTime;
    use gci_core::{IntensitySample, KgCo2ePerMwh, Megawatts};
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn writes_empty_cell_for_undefined_rate() {
        let ts = |s: &str| DateTime::parse_from_rfc3339(s).unwrap();
        let series = IntensitySeries {
            samples: vec![
                IntensitySample {
                    timestamp: ts("2019-01-01T00:00:00-05:00"),
                    rate: Some(KgCo2ePerMwh(250.5)),
                    total_generation: Megawatts(100.0),
                    skipped: vec![],
                },
                IntensitySample {
                    timestamp: ts("2019-01-01T00:05:00-05:00"),
                    rate: None,
                    total_generation: Megawatts(0.0),
                    skipped: vec![],
                },
            ],
        };
        let dir = tempdir().unwrap();
        let out = dir.path().join("co2.csv");
        write_intensity(&series, &out, false).unwrap();
        let text = fs::read_to_string(&out).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "timestamp,co2_rate");
        assert_eq!(lines[1], "2019-01-01T00:00:00-05:00,250.5");
        assert_eq!(lines[2], "2019-01-01T00:05:00-05:00,");

        let df = intensity_frame(&series, true).unwrap();
        assert_eq!(df.width(), 3);
        assert_eq!(df.height(), 2);
    }
}
