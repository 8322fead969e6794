//! Dispatch curves: cumulative dispatched capacity against blended
//! emissions rate, one per fuel category, grouped into a [`CurveSet`] for a
//! basis year.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{GciError, GciResult, LookupFailure};
use crate::fuel::FuelCategory;
use crate::units::{KgCo2ePerMwh, Megawatts};

/// One point on a dispatch curve. Serialized as a `[capacity, rate]` pair.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "(f64, f64)", into = "(f64, f64)")]
pub struct CurvePoint {
    /// Cumulative dispatched capacity (MW), rescaled to observed generation.
    pub cumulative_mw: f64,
    /// Capacity-weighted average emissions rate up to this point.
    pub rate: f64,
}

impl CurvePoint {
    pub fn new(cumulative_mw: f64, rate: f64) -> Self {
        Self {
            cumulative_mw,
            rate,
        }
    }
}

impl From<(f64, f64)> for CurvePoint {
    fn from((cumulative_mw, rate): (f64, f64)) -> Self {
        Self::new(cumulative_mw, rate)
    }
}

impl From<CurvePoint> for (f64, f64) {
    fn from(p: CurvePoint) -> Self {
        (p.cumulative_mw, p.rate)
    }
}

/// Ordered dispatch curve for one fuel category.
///
/// Cumulative capacity never decreases along the curve; this is checked on
/// construction and on deserialization.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<CurvePoint>", into = "Vec<CurvePoint>")]
pub struct FuelCategoryCurve {
    points: Vec<CurvePoint>,
}

impl FuelCategoryCurve {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn from_points(points: Vec<CurvePoint>) -> GciResult<Self> {
        if let Some(bad) = points
            .iter()
            .find(|p| !p.cumulative_mw.is_finite() || !p.rate.is_finite())
        {
            return Err(GciError::DataFormat(format!(
                "curve point ({}, {}) is not finite",
                bad.cumulative_mw, bad.rate
            )));
        }
        if let Some(w) = points
            .windows(2)
            .find(|w| w[1].cumulative_mw < w[0].cumulative_mw)
        {
            return Err(GciError::DataFormat(format!(
                "cumulative capacity decreases from {} to {}",
                w[0].cumulative_mw, w[1].cumulative_mw
            )));
        }
        Ok(Self { points })
    }

    pub fn points(&self) -> &[CurvePoint] {
        &self.points
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Largest cumulative capacity on the curve, the upper end of its domain.
    pub fn max_capacity(&self) -> Option<f64> {
        self.points.last().map(|p| p.cumulative_mw)
    }

    /// Piecewise-linear interpolation of the rate at `x` MW.
    ///
    /// Below the first point the first rate is returned, at or beyond the
    /// last point the last rate. Where several points share a capacity the
    /// right-most one wins. `None` for an empty curve.
    pub fn interpolate(&self, x: f64) -> Option<f64> {
        let first = self.points.first()?;
        let last = self.points.last()?;
        if x.is_nan() {
            return Some(f64::NAN);
        }
        if x < first.cumulative_mw {
            return Some(first.rate);
        }
        if x >= last.cumulative_mw {
            return Some(last.rate);
        }
        // first.x <= x < last.x, so lo is valid and lo + 1 exists
        let lo = self.points.partition_point(|p| p.cumulative_mw <= x) - 1;
        let (a, b) = (self.points[lo], self.points[lo + 1]);
        let t = (x - a.cumulative_mw) / (b.cumulative_mw - a.cumulative_mw);
        Some(a.rate + t * (b.rate - a.rate))
    }
}

impl TryFrom<Vec<CurvePoint>> for FuelCategoryCurve {
    type Error = GciError;

    fn try_from(points: Vec<CurvePoint>) -> Result<Self, Self::Error> {
        Self::from_points(points)
    }
}

impl From<FuelCategoryCurve> for Vec<CurvePoint> {
    fn from(curve: FuelCategoryCurve) -> Self {
        curve.points
    }
}

/// Per-category curves calibrated for one basis year.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CurveSet {
    pub basis_year: u16,
    pub curves: BTreeMap<FuelCategory, FuelCategoryCurve>,
}

impl CurveSet {
    pub fn new(basis_year: u16) -> Self {
        Self {
            basis_year,
            curves: BTreeMap::new(),
        }
    }

    pub fn insert(&mut self, category: FuelCategory, curve: FuelCategoryCurve) {
        self.curves.insert(category, curve);
    }

    pub fn get(&self, category: FuelCategory) -> Option<&FuelCategoryCurve> {
        self.curves.get(&category)
    }

    pub fn categories(&self) -> impl Iterator<Item = FuelCategory> + '_ {
        self.curves.keys().copied()
    }

    /// Rate for `category` at an instantaneous generation level.
    pub fn rate_at(&self, category: FuelCategory, generation: Megawatts) -> GciResult<KgCo2ePerMwh> {
        let curve = self.get(category).ok_or(GciError::Lookup {
            category,
            reason: LookupFailure::MissingCategory,
        })?;
        curve
            .interpolate(generation.value())
            .map(KgCo2ePerMwh)
            .ok_or(GciError::Lookup {
                category,
                reason: LookupFailure::EmptyCurve,
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gas_curve() -> FuelCategoryCurve {
        FuelCategoryCurve::from_points(vec![
            CurvePoint::new(160.0 / 3.0, 400.0),
            CurvePoint::new(80.0, 480.0),
        ])
        .unwrap()
    }

    #[test]
    fn interpolation_clamps_at_both_ends() {
        let curve = gas_curve();
        assert_eq!(curve.interpolate(40.0), Some(400.0));
        assert_eq!(curve.interpolate(-5.0), Some(400.0));
        assert_eq!(curve.interpolate(80.0), Some(480.0));
        assert_eq!(curve.interpolate(1e6), Some(480.0));
    }

    #[test]
    fn interpolation_is_linear_between_points() {
        let curve = FuelCategoryCurve::from_points(vec![
            CurvePoint::new(0.0, 100.0),
            CurvePoint::new(10.0, 200.0),
            CurvePoint::new(30.0, 300.0),
        ])
        .unwrap();
        assert!((curve.interpolate(5.0).unwrap() - 150.0).abs() < 1e-9);
        assert!((curve.interpolate(20.0).unwrap() - 250.0).abs() < 1e-9);
        assert_eq!(curve.interpolate(10.0), Some(200.0));
    }

    #[test]
    fn duplicate_capacity_resolves_right_most() {
        let curve = FuelCategoryCurve::from_points(vec![
            CurvePoint::new(0.0, 100.0),
            CurvePoint::new(10.0, 200.0),
            CurvePoint::new(10.0, 260.0),
            CurvePoint::new(20.0, 300.0),
        ])
        .unwrap();
        assert_eq!(curve.interpolate(10.0), Some(260.0));
        assert!((curve.interpolate(15.0).unwrap() - 280.0).abs() < 1e-9);
    }

    #[test]
    fn single_point_curve_is_constant() {
        let curve = FuelCategoryCurve::from_points(vec![CurvePoint::new(50.0, 12.0)]).unwrap();
        assert_eq!(curve.interpolate(0.0), Some(12.0));
        assert_eq!(curve.interpolate(50.0), Some(12.0));
        assert_eq!(curve.interpolate(90.0), Some(12.0));
    }

    #[test]
    fn decreasing_capacity_is_rejected() {
        let err = FuelCategoryCurve::from_points(vec![
            CurvePoint::new(10.0, 1.0),
            CurvePoint::new(5.0, 1.0),
        ])
        .unwrap_err();
        assert!(matches!(err, GciError::DataFormat(_)));
    }

    #[test]
    fn lookup_reports_missing_and_empty() {
        let mut set = CurveSet::new(2019);
        set.insert(FuelCategory::NaturalGas, gas_curve());
        set.insert(FuelCategory::Wind, FuelCategoryCurve::empty());

        let rate = set
            .rate_at(FuelCategory::NaturalGas, Megawatts(40.0))
            .unwrap();
        assert_eq!(rate.value(), 400.0);

        match set.rate_at(FuelCategory::Wind, Megawatts(1.0)) {
            Err(GciError::Lookup { reason, .. }) => assert_eq!(reason, LookupFailure::EmptyCurve),
            other => panic!("unexpected {other:?}"),
        }
        match set.rate_at(FuelCategory::Hydro, Megawatts(1.0)) {
            Err(GciError::Lookup { reason, .. }) => {
                assert_eq!(reason, LookupFailure::MissingCategory)
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn curve_set_json_shape() {
        let mut set = CurveSet::new(2019);
        set.insert(FuelCategory::NaturalGas, gas_curve());
        let json = serde_json::to_value(&set).unwrap();
        assert_eq!(json["basis_year"], 2019);
        assert_eq!(json["curves"]["Natural Gas"][1][0], 80.0);
        assert_eq!(json["curves"]["Natural Gas"][1][1], 480.0);
    }

    #[test]
    fn deserialization_validates_order() {
        let json = r#"{"basis_year":2019,"curves":{"Hydro":[[5.0,0.0],[1.0,0.0]]}}"#;
        assert!(serde_json::from_str::<CurveSet>(json).is_err());
    }
}
