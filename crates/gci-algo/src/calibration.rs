//! Calibration check against a published annual emissions rate.
//!
//! Purely diagnostic: nothing here returns an error.

use gci_core::{IntensitySeries, KgCo2ePerMwh};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CalibrationReport {
    pub year: i32,
    pub estimated_rate: KgCo2ePerMwh,
    pub published_rate: KgCo2ePerMwh,
    /// estimated / published; near 1.0 when the curves are well calibrated
    pub accuracy_ratio: f64,
    pub samples_used: usize,
}

impl std::fmt::Display for CalibrationReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Average CO2 intensity for {} estimated at {:.1}% of the published value ({:.1} vs {:.1} kg/MWh)",
            self.year,
            self.accuracy_ratio * 100.0,
            self.estimated_rate.value(),
            self.published_rate.value()
        )
    }
}

/// Generation-weighted mean intensity over the samples of `year` that have
/// a rate, with the number of samples used.
pub fn annual_weighted_rate(series: &IntensitySeries, year: i32) -> Option<(KgCo2ePerMwh, usize)> {
    let mut weighted = 0.0;
    let mut weight = 0.0;
    let mut used = 0;
    for sample in series.in_year(year) {
        if let Some(rate) = sample.rate {
            let mw = sample.total_generation.value();
            weighted += rate.value() * mw;
            weight += mw;
            used += 1;
        }
    }
    if weight > 0.0 {
        Some((KgCo2ePerMwh(weighted / weight), used))
    } else {
        None
    }
}

pub fn calibrate(
    series: &IntensitySeries,
    year: i32,
    published_rate: KgCo2ePerMwh,
) -> Option<CalibrationReport> {
    if !published_rate.is_finite() || published_rate.value() <= 0.0 {
        return None;
    }
    let (estimated_rate, samples_used) = annual_weighted_rate(series, year)?;
    Some(CalibrationReport {
        year,
        estimated_rate,
        published_rate,
        accuracy_ratio: estimated_rate.value() / published_rate.value(),
        samples_used,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::DateTime;
    use gci_core::{IntensitySample, Megawatts};

    fn sample(at: &str, rate: Option<f64>, mw: f64) -> IntensitySample {
        IntensitySample {
            timestamp: DateTime::parse_from_rfc3339(at).unwrap(),
            rate: rate.map(KgCo2ePerMwh),
            total_generation: Megawatts(mw),
            skipped: Vec::new(),
        }
    }

    fn series() -> IntensitySeries {
        IntensitySeries {
            samples: vec![
                sample("2018-12-31T23:55:00-05:00", Some(9999.0), 1000.0),
                sample("2019-01-01T00:00:00-05:00", Some(200.0), 300.0),
                sample("2019-01-01T00:05:00-05:00", Some(300.0), 100.0),
                sample("2019-01-01T00:10:00-05:00", None, 0.0),
            ],
        }
    }

    #[test]
    fn weights_by_generation_within_year() {
        let (rate, used) = annual_weighted_rate(&series(), 2019).unwrap();
        assert!((rate.value() - 225.0).abs() < 1e-9);
        assert_eq!(used, 2);
    }

    #[test]
    fn ratio_against_published() {
        let report = calibrate(&series(), 2019, KgCo2ePerMwh(250.0)).unwrap();
        assert!((report.accuracy_ratio - 0.9).abs() < 1e-9);
        assert!(report.to_string().contains("90.0%"));
    }

    #[test]
    fn absent_without_data_or_published_rate() {
        assert!(calibrate(&series(), 2020, KgCo2ePerMwh(250.0)).is_none());
        assert!(calibrate(&series(), 2019, KgCo2ePerMwh(0.0)).is_none());
        assert!(calibrate(&IntensitySeries::default(), 2019, KgCo2ePerMwh(1.0)).is_none());
    }
}
