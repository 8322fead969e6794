//! NYISO real-time fuel-mix files
//!
//! NYISO publishes one CSV per day at `<base>/<YYYYMMDD>rtfuelmix.csv`, in
//! the long layout read by [`crate::fuel_mix::parse_nyiso_frame`].

use chrono::{Duration, NaiveDate};
#[cfg(feature = "native-io")]
use gci_core::GciError;
use gci_core::{FuelMixSeries, GciResult};
use polars::prelude::DataFrame;
#[cfg(feature = "native-io")]
use tracing::info;

use crate::frame::read_csv_bytes;
use crate::fuel_mix::parse_nyiso_frames;

pub const DEFAULT_BASE_URL: &str = "http://mis.nyiso.com/public/csv/rtfuelmix";

/// Fetcher for the daily NYISO fuel-mix files.
#[derive(Debug, Clone)]
pub struct NyisoFuelMixSource {
    base_url: String,
}

impl NyisoFuelMixSource {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url: String = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn url_for(&self, date: NaiveDate) -> String {
        format!("{}/{}rtfuelmix.csv", self.base_url, date.format("%Y%m%d"))
    }

    /// Download one day's file as a raw long-layout frame.
    #[cfg(feature = "native-io")]
    pub fn fetch_day(&self, date: NaiveDate) -> GciResult<DataFrame> {
        let url = self.url_for(date);
        let response = ureq::get(&url)
            .call()
            .map_err(|e| GciError::Other(format!("failed to fetch {url}: {e}")))?;
        let body = response
            .into_string()
            .map_err(|e| GciError::Other(format!("failed to read {url}: {e}")))?;
        info!(url = %url, bytes = body.len(), "fetched NYISO fuel mix");
        read_csv_bytes(body.into_bytes(), &url)
    }

    /// Download and merge the files for `dates` into one series.
    #[cfg(feature = "native-io")]
    pub fn fetch(&self, dates: &[NaiveDate]) -> GciResult<FuelMixSeries> {
        let frames = dates
            .iter()
            .map(|date| self.fetch_day(*date))
            .collect::<GciResult<Vec<_>>>()?;
        parse_nyiso_frames(&frames)
    }
}

impl Default for NyisoFuelMixSource {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}

/// Parse already-downloaded day files, each given as `(label, bytes)`.
pub fn parse_days(days: Vec<(String, Vec<u8>)>) -> GciResult<FuelMixSeries> {
    let frames = days
        .into_iter()
        .map(|(label, bytes)| read_csv_bytes(bytes, &label))
        .collect::<GciResult<Vec<DataFrame>>>()?;
    parse_nyiso_frames(&frames)
}

/// Samples within one day of the last timestamp, inclusive.
pub fn trailing_day(series: &FuelMixSeries) -> FuelMixSeries {
    match series.last_timestamp() {
        Some(last) => series.since(last - Duration::days(1)),
        None => series.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gci_core::{FuelCategory, Megawatts};

    fn day(rows: &[(&str, &str, &str, f64)]) -> Vec<u8> {
        let mut text = String::from("Time Stamp,Time Zone,Fuel Category,Gen MW\n");
        for (stamp, zone, fuel, mw) in rows {
            text.push_str(&format!("{stamp},{zone},{fuel},{mw}\n"));
        }
        text.into_bytes()
    }

    #[test]
    fn url_uses_compact_date() {
        let source = NyisoFuelMixSource::new("http://example.test/rtfuelmix/");
        let date = NaiveDate::from_ymd_opt(2019, 3, 7).unwrap();
        assert_eq!(
            source.url_for(date),
            "http://example.test/rtfuelmix/20190307rtfuelmix.csv"
        );
        assert_eq!(
            NyisoFuelMixSource::default().url_for(date),
            "http://mis.nyiso.com/public/csv/rtfuelmix/20190307rtfuelmix.csv"
        );
    }

    #[test]
    fn days_merge_and_trim_to_trailing_day() {
        let yesterday = day(&[
            ("01/01/2019 00:00:00", "EST", "Wind", 10.0),
            ("01/01/2019 12:00:00", "EST", "Wind", 11.0),
        ]);
        let today = day(&[
            ("01/02/2019 00:00:00", "EST", "Wind", 12.0),
            ("01/02/2019 06:00:00", "EST", "Wind", 13.0),
            ("01/02/2019 06:00:00", "EST", "Dual Fuel", 5.0),
        ]);
        let series = parse_days(vec![
            ("20190101".to_string(), yesterday),
            ("20190102".to_string(), today),
        ])
        .unwrap();
        assert_eq!(series.len(), 4);

        // 06:00 on the 2nd reaches back to 06:00 on the 1st
        let recent = trailing_day(&series);
        assert_eq!(recent.len(), 3);
        let last = &recent.samples()[2];
        assert_eq!(last.generation[&FuelCategory::NaturalGas], Megawatts(5.0));
        assert_eq!(last.generation[&FuelCategory::Wind], Megawatts(13.0));
    }

    #[test]
    fn trailing_day_of_empty_series_is_empty() {
        let empty = FuelMixSeries::new(Vec::new()).unwrap();
        assert!(trailing_day(&empty).is_empty());
    }
}
