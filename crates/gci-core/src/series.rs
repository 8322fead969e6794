//! Timestamped fuel-mix input and carbon-intensity output series.

use std::collections::BTreeMap;

use chrono::{DateTime, Datelike, FixedOffset};
use serde::{Deserialize, Serialize};

use crate::error::{GciError, GciResult};
use crate::fuel::FuelCategory;
use crate::units::{KgCo2ePerMwh, Megawatts};

pub type Timestamp = DateTime<FixedOffset>;

/// Instantaneous generation by fuel category at one timestamp.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FuelMixSample {
    pub timestamp: Timestamp,
    pub generation: BTreeMap<FuelCategory, Megawatts>,
}

impl FuelMixSample {
    pub fn new(timestamp: Timestamp) -> Self {
        Self {
            timestamp,
            generation: BTreeMap::new(),
        }
    }

    pub fn with(mut self, category: FuelCategory, mw: f64) -> Self {
        self.generation.insert(category, Megawatts(mw));
        self
    }

    pub fn total(&self) -> Megawatts {
        self.generation.values().sum()
    }
}

/// Fuel-mix samples in strictly increasing timestamp order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FuelMixSeries {
    samples: Vec<FuelMixSample>,
}

impl FuelMixSeries {
    /// Validate ordering and values. Timestamps must strictly increase and
    /// generation must be finite and non-negative.
    pub fn new(samples: Vec<FuelMixSample>) -> GciResult<Self> {
        if let Some(w) = samples.windows(2).find(|w| w[1].timestamp <= w[0].timestamp) {
            return Err(GciError::DataFormat(format!(
                "fuel-mix timestamps must strictly increase: {} is followed by {}",
                w[0].timestamp, w[1].timestamp
            )));
        }
        for sample in &samples {
            if let Some((category, mw)) = sample
                .generation
                .iter()
                .find(|(_, mw)| !mw.is_finite() || mw.value() < 0.0)
            {
                return Err(GciError::DataFormat(format!(
                    "invalid {category} generation {} at {}",
                    mw.value(),
                    sample.timestamp
                )));
            }
        }
        Ok(Self { samples })
    }

    pub fn samples(&self) -> &[FuelMixSample] {
        &self.samples
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Categories appearing anywhere in the series.
    pub fn categories(&self) -> Vec<FuelCategory> {
        let mut seen: Vec<FuelCategory> = self
            .samples
            .iter()
            .flat_map(|s| s.generation.keys().copied())
            .collect();
        seen.sort();
        seen.dedup();
        seen
    }

    /// Highest generation observed for each category across the series.
    pub fn peak_generation(&self) -> BTreeMap<FuelCategory, Megawatts> {
        let mut peaks: BTreeMap<FuelCategory, Megawatts> = BTreeMap::new();
        for sample in &self.samples {
            for (&category, &mw) in &sample.generation {
                peaks
                    .entry(category)
                    .and_modify(|peak| *peak = peak.max(mw))
                    .or_insert(mw);
            }
        }
        peaks
    }

    /// Keep only samples with `timestamp >= start`.
    pub fn since(&self, start: Timestamp) -> FuelMixSeries {
        FuelMixSeries {
            samples: self
                .samples
                .iter()
                .filter(|s| s.timestamp >= start)
                .cloned()
                .collect(),
        }
    }

    pub fn last_timestamp(&self) -> Option<Timestamp> {
        self.samples.last().map(|s| s.timestamp)
    }
}

/// Blended carbon intensity at one timestamp.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IntensitySample {
    pub timestamp: Timestamp,
    /// Blended rate; `None` when no generation contributed.
    pub rate: Option<KgCo2ePerMwh>,
    /// Generation that entered the rate computation.
    pub total_generation: Megawatts,
    /// Categories left out of this sample because their curve lookup failed.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub skipped: Vec<FuelCategory>,
}

/// Estimator output, aligned one-to-one with the input series.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IntensitySeries {
    pub samples: Vec<IntensitySample>,
}

impl IntensitySeries {
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, IntensitySample> {
        self.samples.iter()
    }

    /// Samples whose timestamp falls in `year` (in the sample's own offset).
    pub fn in_year(&self, year: i32) -> impl Iterator<Item = &IntensitySample> {
        self.samples.iter().filter(move |s| s.timestamp.year() == year)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ts(s: &str) -> Timestamp {
        DateTime::parse_from_rfc3339(s).unwrap()
    }

    #[test]
    fn rejects_out_of_order_and_duplicates() {
        let a = FuelMixSample::new(ts("2019-01-01T00:05:00-05:00"));
        let b = FuelMixSample::new(ts("2019-01-01T00:00:00-05:00"));
        assert!(FuelMixSeries::new(vec![a.clone(), b]).is_err());
        assert!(FuelMixSeries::new(vec![a.clone(), a]).is_err());
    }

    #[test]
    fn rejects_negative_generation() {
        let s = FuelMixSample::new(ts("2019-01-01T00:00:00-05:00")).with(FuelCategory::Wind, -1.0);
        assert!(FuelMixSeries::new(vec![s]).is_err());
    }

    #[test]
    fn peaks_and_categories() {
        let series = FuelMixSeries::new(vec![
            FuelMixSample::new(ts("2019-01-01T00:00:00-05:00"))
                .with(FuelCategory::NaturalGas, 50.0)
                .with(FuelCategory::Hydro, 10.0),
            FuelMixSample::new(ts("2019-01-01T00:05:00-05:00"))
                .with(FuelCategory::NaturalGas, 80.0)
                .with(FuelCategory::Hydro, 5.0),
        ])
        .unwrap();
        let peaks = series.peak_generation();
        assert_eq!(peaks[&FuelCategory::NaturalGas], Megawatts(80.0));
        assert_eq!(peaks[&FuelCategory::Hydro], Megawatts(10.0));
        assert_eq!(
            series.categories(),
            vec![FuelCategory::NaturalGas, FuelCategory::Hydro]
        );
    }

    #[test]
    fn since_trims_leading_samples() {
        let series = FuelMixSeries::new(vec![
            FuelMixSample::new(ts("2019-01-01T00:00:00-05:00")),
            FuelMixSample::new(ts("2019-01-02T00:00:00-05:00")),
            FuelMixSample::new(ts("2019-01-02T00:05:00-05:00")),
        ])
        .unwrap();
        let trimmed = series.since(ts("2019-01-02T00:00:00-05:00"));
        assert_eq!(trimmed.len(), 2);
    }
}
