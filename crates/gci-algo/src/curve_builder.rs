//! Merit-order dispatch curve construction
//!
//! Plants in a fuel category are assumed to be dispatched in order of
//! descending capacity factor. Walking that order gives, for each
//! cumulative capacity, the capacity-weighted average emissions rate of
//! everything dispatched so far. The capacity axis is then rescaled so the
//! curve spans `[0, observed peak]` for the category, correcting for the
//! gap between nameplate capacity and what the grid actually dispatches.

use std::cmp::Ordering;

use gci_core::{
    CurvePoint, CurveSet, FuelCategory, FuelCategoryCurve, FuelMixSeries, Megawatts, PlantRecord,
};
use tracing::{debug, info, warn};

/// Build one curve per category present in `reference`, calibrated to that
/// series' peak generation per category.
pub fn build_curve_set(year: u16, plants: &[PlantRecord], reference: &FuelMixSeries) -> CurveSet {
    let mut set = CurveSet::new(year);
    for (category, peak) in reference.peak_generation() {
        let curve = build_category_curve(category, plants, peak);
        if curve.is_empty() {
            warn!(%category, "no dispatchable plants; curve is empty");
        } else {
            info!(
                %category,
                points = curve.len(),
                peak_mw = peak.value(),
                "built dispatch curve"
            );
        }
        set.insert(category, curve);
    }
    set
}

/// Build the dispatch curve for a single category.
///
/// Returns an empty curve when no plant of the category has a non-zero
/// capacity factor or none has positive capacity.
pub fn build_category_curve(
    category: FuelCategory,
    plants: &[PlantRecord],
    observed_peak: Megawatts,
) -> FuelCategoryCurve {
    let mut ranked: Vec<&PlantRecord> = plants.iter().filter(|p| p.fuel == category).collect();
    // sort_by is stable: equal factors keep registry order
    ranked.sort_by(|a, b| merit_order(a.capacity_factor, b.capacity_factor));

    // Cumulative capacity runs over every ranked plant, including those
    // dropped below for a zero factor.
    let mut cumulative_mw = 0.0;
    let mut dispatched: Vec<(f64, &PlantRecord)> = Vec::with_capacity(ranked.len());
    for plant in ranked {
        cumulative_mw += plant.capacity.value();
        let factor = if plant.capacity_factor.is_nan() {
            0.0
        } else {
            plant.capacity_factor
        };
        if factor == 0.0 {
            continue;
        }
        dispatched.push((cumulative_mw, plant));
    }

    let mut cumulative_kg_per_h = 0.0;
    let mut raw: Vec<CurvePoint> = Vec::with_capacity(dispatched.len());
    for (cumulative_mw, plant) in dispatched {
        cumulative_kg_per_h += plant.emissions_rate.value() * plant.capacity.value();
        if cumulative_mw <= 0.0 {
            debug!(plant = %plant.plant_id, "skipping point with no cumulative capacity");
            continue;
        }
        raw.push(CurvePoint::new(
            cumulative_mw,
            cumulative_kg_per_h / cumulative_mw,
        ));
    }

    let max_mw = raw
        .iter()
        .map(|p| p.cumulative_mw)
        .fold(f64::NEG_INFINITY, f64::max);
    if raw.is_empty() || !max_mw.is_finite() || max_mw <= 0.0 {
        return FuelCategoryCurve::empty();
    }

    let scale = observed_peak.value() / max_mw;
    let points = raw
        .into_iter()
        .map(|p| CurvePoint::new(p.cumulative_mw * scale, p.rate))
        .collect();
    match FuelCategoryCurve::from_points(points) {
        Ok(curve) => curve,
        Err(e) => {
            warn!(%category, error = %e, "discarding malformed curve");
            FuelCategoryCurve::empty()
        }
    }
}

/// Descending capacity factor, NaN last.
fn merit_order(a: f64, b: f64) -> Ordering {
    match (a.is_nan(), b.is_nan()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        (false, false) => b.partial_cmp(&a).unwrap_or(Ordering::Equal),
    }
}
