//! Placement of the fixed-size reference can next to the scaled asset.

use glam::DVec3;
use serde::Serialize;

use crate::constants::{
    GLOBAL_SCALE, REFERENCE_DEFAULT_OFFSET, REFERENCE_GAP, REFERENCE_HEIGHT_MM,
    REFERENCE_MIN_GAP, REFERENCE_RADIUS_MM,
};
use crate::dimensions::Dimensions;

/// World-space placement and size of the reference can.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct ReferencePlacement {
    pub position: DVec3,
    pub height: f64,
    pub radius: f64,
}

/// Dimension describing the asset's footprint across the reference axis.
pub fn silhouette_dimension(feeder_type: &str) -> Option<&'static str> {
    match feeder_type {
        "bowl" | "linear" => Some("A"),
        _ => None,
    }
}

/// Signed X offset of the reference can. Always at least
/// [`REFERENCE_MIN_GAP`] to the left of the origin.
pub fn reference_offset(feeder_type: &str, dimensions: &Dimensions) -> f64 {
    let offset = silhouette_dimension(feeder_type)
        .and_then(|key| dimensions.get(key))
        .map_or(REFERENCE_DEFAULT_OFFSET, |value| {
            -(value * GLOBAL_SCALE / 2.0 + REFERENCE_GAP)
        });
    // f64::min ignores a NaN operand, so the clamp also holds for NaN
    offset.min(-REFERENCE_MIN_GAP)
}

pub fn reference_placement(feeder_type: &str, dimensions: &Dimensions) -> ReferencePlacement {
    let height = REFERENCE_HEIGHT_MM * GLOBAL_SCALE;
    ReferencePlacement {
        position: DVec3::new(reference_offset(feeder_type, dimensions), height / 2.0, 0.0),
        height,
        radius: REFERENCE_RADIUS_MM * GLOBAL_SCALE,
    }
}
