//! Compile-time unit safety for generation and emissions quantities.
//!
//! Keeps instantaneous power (MW), interval energy (MWh), emissions mass
//! (kg CO2e) and emissions intensity (kg CO2e/MWh) from being mixed up.
//! All types are `#[repr(transparent)]` over `f64`.
//!
//! ```
//! use gci_core::units::{KgCo2ePerMwh, Megawatts};
//!
//! let energy = Megawatts(600.0).energy_per_sample(12.0);
//! let mass = KgCo2ePerMwh(400.0) * energy;
//! assert!(((mass / energy).value() - 400.0).abs() < 1e-9);
//! ```

use serde::{Deserialize, Serialize};
use std::ops::{Add, AddAssign, Div, Mul, Sub};

/// Macro to implement common arithmetic operations for unit types
macro_rules! impl_unit_ops {
    ($type:ty, $unit_name:literal) => {
        impl Add for $type {
            type Output = Self;
            fn add(self, rhs: Self) -> Self::Output {
                Self(self.0 + rhs.0)
            }
        }

        impl AddAssign for $type {
            fn add_assign(&mut self, rhs: Self) {
                self.0 += rhs.0;
            }
        }

        impl Sub for $type {
            type Output = Self;
            fn sub(self, rhs: Self) -> Self::Output {
                Self(self.0 - rhs.0)
            }
        }

        impl Mul<f64> for $type {
            type Output = Self;
            fn mul(self, rhs: f64) -> Self::Output {
                Self(self.0 * rhs)
            }
        }

        impl Div<f64> for $type {
            type Output = Self;
            fn div(self, rhs: f64) -> Self::Output {
                Self(self.0 / rhs)
            }
        }

        impl std::fmt::Display for $type {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{:.4} {}", self.0, $unit_name)
            }
        }

        impl $type {
            /// Create a new value
            #[inline]
            pub const fn new(value: f64) -> Self {
                Self(value)
            }

            /// Get the raw numeric value
            #[inline]
            pub const fn value(self) -> f64 {
                self.0
            }

            /// Check if value is finite
            #[inline]
            pub fn is_finite(self) -> bool {
                self.0.is_finite()
            }

            /// Maximum of two values
            #[inline]
            pub fn max(self, other: Self) -> Self {
                Self(self.0.max(other.0))
            }

            /// Zero value
            pub const ZERO: Self = Self(0.0);
        }

        impl std::iter::Sum for $type {
            fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
                Self(iter.map(|x| x.0).sum())
            }
        }

        impl<'a> std::iter::Sum<&'a $type> for $type {
            fn sum<I: Iterator<Item = &'a Self>>(iter: I) -> Self {
                Self(iter.map(|x| x.0).sum())
            }
        }
    };
}

/// Instantaneous generation in megawatts (MW)
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[repr(transparent)]
pub struct Megawatts(pub f64);

impl_unit_ops!(Megawatts, "MW");

/// Energy over one sampling interval in megawatt-hours (MWh)
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[repr(transparent)]
pub struct MegawattHours(pub f64);

impl_unit_ops!(MegawattHours, "MWh");

/// Emitted mass in kilograms of CO2 equivalent
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[repr(transparent)]
pub struct KgCo2e(pub f64);

impl_unit_ops!(KgCo2e, "kg CO2e");

/// Emissions intensity in kilograms of CO2 equivalent per MWh
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[repr(transparent)]
pub struct KgCo2ePerMwh(pub f64);

impl_unit_ops!(KgCo2ePerMwh, "kg/MWh CO2e");

impl Megawatts {
    /// Energy delivered over one sample when readings arrive
    /// `samples_per_hour` times an hour (12 for a 5-minute cadence).
    #[inline]
    pub fn energy_per_sample(self, samples_per_hour: f64) -> MegawattHours {
        MegawattHours(self.0 / samples_per_hour)
    }
}

impl Mul<MegawattHours> for KgCo2ePerMwh {
    type Output = KgCo2e;
    fn mul(self, rhs: MegawattHours) -> Self::Output {
        KgCo2e(self.0 * rhs.0)
    }
}

impl Div<MegawattHours> for KgCo2e {
    type Output = KgCo2ePerMwh;
    fn div(self, rhs: MegawattHours) -> Self::Output {
        KgCo2ePerMwh(self.0 / rhs.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_energy_per_sample() {
        let e = Megawatts(120.0).energy_per_sample(12.0);
        assert!((e.value() - 10.0).abs() < 1e-12);
    }

    #[test]
    fn test_mass_and_intensity() {
        let energy = MegawattHours(2.0);
        let mass = KgCo2ePerMwh(450.0) * energy;
        assert!((mass.value() - 900.0).abs() < 1e-12);
        assert!(((mass / energy).value() - 450.0).abs() < 1e-12);
    }

    #[test]
    fn test_sum_iterator() {
        let powers = vec![Megawatts(10.0), Megawatts(20.0), Megawatts(30.0)];
        let total: Megawatts = powers.iter().sum();
        assert_eq!(total.value(), 60.0);
    }

    #[test]
    fn test_display() {
        assert_eq!(format!("{}", Megawatts(100.0)), "100.0000 MW");
        assert_eq!(format!("{}", KgCo2ePerMwh(1.5)), "1.5000 kg/MWh CO2e");
    }
}
