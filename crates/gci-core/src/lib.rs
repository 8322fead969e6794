//! # gci-core: Grid Carbon Intensity Core
//!
//! Shared data model for estimating the carbon intensity of grid
//! electricity from its fuel mix.
//!
//! - [`PlantRecord`]: one power plant from the eGRID registry
//! - [`FuelCategoryCurve`] / [`CurveSet`]: merit-order dispatch curves of
//!   cumulative capacity against blended emissions rate, per category
//! - [`FuelMixSeries`] / [`IntensitySeries`]: estimator input and output
//! - [`GciError`]: error taxonomy shared by every crate in the workspace
//!
//! ```
//! use gci_core::{CurvePoint, CurveSet, FuelCategory, FuelCategoryCurve, Megawatts};
//!
//! let mut curves = CurveSet::new(2019);
//! curves.insert(
//!     FuelCategory::NaturalGas,
//!     FuelCategoryCurve::from_points(vec![
//!         CurvePoint::new(53.3, 400.0),
//!         CurvePoint::new(80.0, 480.0),
//!     ])
//!     .unwrap(),
//! );
//! let rate = curves.rate_at(FuelCategory::NaturalGas, Megawatts(40.0)).unwrap();
//! assert_eq!(rate.value(), 400.0);
//! ```

pub mod curve;
pub mod error;
pub mod fuel;
pub mod series;
pub mod units;

use serde::{Deserialize, Serialize};

pub use curve::{CurvePoint, CurveSet, FuelCategoryCurve};
pub use error::{GciError, GciResult, LookupFailure};
pub use fuel::{FuelCategory, DUAL_FUEL};
pub use series::{FuelMixSample, FuelMixSeries, IntensitySample, IntensitySeries, Timestamp};
pub use units::{KgCo2e, KgCo2ePerMwh, MegawattHours, Megawatts};

/// A generating plant from the per-plant emissions registry, already
/// filtered to one balancing authority.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlantRecord {
    /// eGRID ORIS plant code
    pub plant_id: String,
    /// Annual capacity factor; NaN when the registry reports none
    pub capacity_factor: f64,
    /// Nameplate capacity
    pub capacity: Megawatts,
    pub fuel: FuelCategory,
    /// Annual CO2-equivalent output emission rate
    pub emissions_rate: KgCo2ePerMwh,
}

impl PlantRecord {
    pub fn new(
        plant_id: impl Into<String>,
        capacity_factor: f64,
        capacity_mw: f64,
        fuel: FuelCategory,
        emissions_rate: f64,
    ) -> Self {
        Self {
            plant_id: plant_id.into(),
            capacity_factor,
            capacity: Megawatts(capacity_mw),
            fuel,
            emissions_rate: KgCo2ePerMwh(emissions_rate),
        }
    }
}
