//! Remote fuel-mix sources.

pub mod nyiso;

pub use nyiso::{trailing_day, NyisoFuelMixSource, DEFAULT_BASE_URL};
