//! Fuel categories reported by the grid operator and the mapping from eGRID
//! primary fuel codes onto them.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::GciError;

/// Coarse generation technology grouping used as the unit of curve
/// construction.
///
/// Names match the NYISO fuel-mix column headers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum FuelCategory {
    #[serde(rename = "Natural Gas")]
    NaturalGas,
    #[serde(rename = "Hydro")]
    Hydro,
    #[serde(rename = "Nuclear")]
    Nuclear,
    #[serde(rename = "Wind")]
    Wind,
    #[serde(rename = "Other Renewables")]
    OtherRenewables,
    #[serde(rename = "Other Fossil Fuels")]
    OtherFossilFuels,
}

/// NYISO category that is folded into [`FuelCategory::NaturalGas`]; dual
/// fuel units burn gas almost exclusively.
pub const DUAL_FUEL: &str = "Dual Fuel";

impl FuelCategory {
    pub const ALL: [FuelCategory; 6] = [
        FuelCategory::NaturalGas,
        FuelCategory::Hydro,
        FuelCategory::Nuclear,
        FuelCategory::Wind,
        FuelCategory::OtherRenewables,
        FuelCategory::OtherFossilFuels,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            FuelCategory::NaturalGas => "Natural Gas",
            FuelCategory::Hydro => "Hydro",
            FuelCategory::Nuclear => "Nuclear",
            FuelCategory::Wind => "Wind",
            FuelCategory::OtherRenewables => "Other Renewables",
            FuelCategory::OtherFossilFuels => "Other Fossil Fuels",
        }
    }

    /// Map an eGRID `PLFUELCT` primary fuel code onto a category.
    ///
    /// Several fossil subtypes collapse into `Other Fossil Fuels`. Codes
    /// outside the table return `None`.
    pub fn from_egrid_code(code: &str) -> Option<FuelCategory> {
        let category = match code.trim().to_ascii_uppercase().as_str() {
            "BIOMASS" => FuelCategory::OtherRenewables,
            "COAL" => FuelCategory::OtherFossilFuels,
            "GAS" => FuelCategory::NaturalGas,
            "HYDRO" => FuelCategory::Hydro,
            "NUCLEAR" => FuelCategory::Nuclear,
            "OIL" => FuelCategory::OtherFossilFuels,
            "OTHF" => FuelCategory::OtherFossilFuels,
            "SOLAR" => FuelCategory::OtherRenewables,
            "WIND" => FuelCategory::Wind,
            "OFSL" => FuelCategory::OtherFossilFuels,
            _ => return None,
        };
        Some(category)
    }
}

impl fmt::Display for FuelCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FuelCategory {
    type Err = GciError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        FuelCategory::ALL
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| GciError::DataFormat(format!("unknown fuel category '{trimmed}'")))
    }
}
