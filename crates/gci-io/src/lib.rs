//! # gci-io: tables, packages and remote sources
//!
//! File formats around the estimator:
//!
//! | Data | Module | Format |
//! |------|--------|--------|
//! | eGRID plant registry | [`plants`] | CSV export of `PLNTyy` |
//! | Published BA rates | [`published`] | CSV export of `BAyy` |
//! | Fuel-mix series | [`fuel_mix`] | wide CSV or NYISO long CSV |
//! | Intensity series | [`intensity`] | `timestamp,co2_rate[,total_mw]` CSV |
//! | Curve packages | [`store`] | `co2_curves<year>.json` |
//!
//! ## Quick Start: build and persist curves
//!
//! ```rust,no_run
//! use std::path::Path;
//! use gci_io::{load_plant_registry, read_fuel_mix, CurveStore};
//!
//! fn main() -> gci_core::GciResult<()> {
//!     let plants = load_plant_registry(Path::new("egrid2019_plnt.csv"), "NYIS")?;
//!     let mix = read_fuel_mix(Path::new("fuel_mix_2019.csv"))?;
//!     println!("{} plants, {} samples", plants.len(), mix.len());
//!
//!     let store = CurveStore::new("basis");
//!     if store.load(2019)?.is_none() {
//!         println!("no curves for 2019 yet");
//!     }
//!     Ok(())
//! }
//! ```

mod frame;

pub mod fuel_mix;
pub mod intensity;
pub mod plants;
pub mod published;
pub mod sources;
pub mod store;

pub use fuel_mix::{read_fuel_mix, write_fuel_mix};
pub use intensity::write_intensity;
pub use plants::load_plant_registry;
pub use published::load_published_rate;
pub use sources::NyisoFuelMixSource;
pub use store::{CurveCache, CurveStore};
