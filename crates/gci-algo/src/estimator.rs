//! Blended carbon intensity from a fuel-mix time series
//!
//! At each timestamp every category's curve is read at the category's
//! instantaneous generation, and the rates are averaged weighted by the
//! energy each category delivered over the sampling interval.

use std::collections::BTreeSet;

use gci_core::{
    CurveSet, FuelCategory, FuelMixSample, FuelMixSeries, GciError, GciResult, IntensitySample,
    IntensitySeries, KgCo2e, KgCo2ePerMwh, MegawattHours, Megawatts,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Readings per hour on NYISO's 5-minute real-time cadence.
pub const DEFAULT_SAMPLES_PER_HOUR: f64 = 12.0;

/// What to do with a category whose curve lookup fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MissingCategoryPolicy {
    /// The whole timestamp gets no rate. Categories at 0 MW never count as
    /// missing.
    FailTimestamp,
    /// Drop the category's energy from numerator and denominator.
    #[default]
    ExcludeCategory,
    /// Count the category's energy in the denominator only, as if it
    /// emitted nothing.
    ZeroEmissions,
}

impl std::str::FromStr for MissingCategoryPolicy {
    type Err = GciError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "fail-timestamp" | "fail" => Ok(Self::FailTimestamp),
            "exclude-category" | "exclude" => Ok(Self::ExcludeCategory),
            "zero-emissions" | "zero" => Ok(Self::ZeroEmissions),
            other => Err(GciError::Config(format!(
                "unknown missing-category policy '{other}'; use fail-timestamp, exclude-category, or zero-emissions"
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EstimatorOptions {
    pub samples_per_hour: f64,
    pub missing_category: MissingCategoryPolicy,
}

impl Default for EstimatorOptions {
    fn default() -> Self {
        Self {
            samples_per_hour: DEFAULT_SAMPLES_PER_HOUR,
            missing_category: MissingCategoryPolicy::default(),
        }
    }
}

pub struct Estimator<'a> {
    curves: &'a CurveSet,
    options: EstimatorOptions,
}

impl<'a> Estimator<'a> {
    pub fn new(curves: &'a CurveSet, options: EstimatorOptions) -> GciResult<Self> {
        if !options.samples_per_hour.is_finite() || options.samples_per_hour <= 0.0 {
            return Err(GciError::Config(format!(
                "samples_per_hour must be positive, got {}",
                options.samples_per_hour
            )));
        }
        Ok(Self { curves, options })
    }

    /// One output sample per input sample, in the same order.
    pub fn estimate(&self, series: &FuelMixSeries) -> IntensitySeries {
        let mut reported: BTreeSet<FuelCategory> = BTreeSet::new();
        let samples = series
            .samples()
            .iter()
            .map(|sample| {
                let out = self.estimate_sample(sample);
                for &category in &out.skipped {
                    if reported.insert(category) {
                        warn!(
                            %category,
                            policy = ?self.options.missing_category,
                            "no usable curve for category"
                        );
                    }
                }
                out
            })
            .collect();
        IntensitySeries { samples }
    }

    pub fn estimate_sample(&self, sample: &FuelMixSample) -> IntensitySample {
        let mut emissions = KgCo2e::ZERO;
        let mut energy = MegawattHours::ZERO;
        let mut total_generation = Megawatts::ZERO;
        let mut skipped = Vec::new();

        for (&category, &generation) in &sample.generation {
            // contributes no energy whatever its curve, so never fails a lookup
            if generation.value() == 0.0 {
                continue;
            }
            let interval = generation.energy_per_sample(self.options.samples_per_hour);
            match self.curves.rate_at(category, generation) {
                Ok(rate) => {
                    emissions += rate * interval;
                    energy += interval;
                    total_generation += generation;
                }
                Err(e) => {
                    debug!(timestamp = %sample.timestamp, error = %e, "curve lookup failed");
                    skipped.push(category);
                    if self.options.missing_category == MissingCategoryPolicy::ZeroEmissions {
                        energy += interval;
                        total_generation += generation;
                    }
                }
            }
        }

        let failed = !skipped.is_empty()
            && self.options.missing_category == MissingCategoryPolicy::FailTimestamp;
        let rate = if failed || energy.value() <= 0.0 {
            None
        } else {
            Some(emissions / energy)
        };

        IntensitySample {
            timestamp: sample.timestamp,
            rate: rate.filter(|r: &KgCo2ePerMwh| r.is_finite()),
            total_generation,
            skipped,
        }
    }
}
