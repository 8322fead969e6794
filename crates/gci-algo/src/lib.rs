//! # gci-algo: Carbon Intensity Algorithms
//!
//! - [`curve_builder`]: merit-order dispatch curves per fuel category from
//!   the plant registry, scaled to observed peak generation
//! - [`estimator`]: blended intensity per timestamp by interpolating each
//!   category's curve at its instantaneous generation
//! - [`calibration`]: annual weighted mean against a published figure
//!
//! ## Example
//!
//! ```ignore
//! use gci_algo::{build_curve_set, Estimator, EstimatorOptions};
//!
//! let curves = build_curve_set(2019, &plants, &reference);
//! let intensity = Estimator::new(&curves, EstimatorOptions::default())?
//!     .estimate(&fuel_mix);
//! ```

pub mod calibration;
pub mod curve_builder;
pub mod estimator;

pub use calibration::{annual_weighted_rate, calibrate, CalibrationReport};
pub use curve_builder::{build_category_curve, build_curve_set};
pub use estimator::{Estimator, EstimatorOptions, MissingCategoryPolicy, DEFAULT_SAMPLES_PER_HOUR};
