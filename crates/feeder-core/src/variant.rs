//! The full dimension-to-geometry pipeline.

use glam::DVec3;
use serde::Serialize;

use crate::constants::{default_model_path, global_scale_vec3, GLOBAL_SCALE, MODEL_ROOT};
use crate::dimensions::Dimensions;
use crate::rules::{RuleTable, SizeRule};
use crate::scale::{compute_scales, PartScales};
use crate::select::select;

/// Asset and scales for one `(feeder type, dimensions)` input.
///
/// Recomputed on every input change and superseded, never mutated.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ResolvedVariant {
    pub asset_file: String,
    pub root_scale: DVec3,
    pub part_scales: PartScales,
}

impl ResolvedVariant {
    /// Fallback for a feeder type with no matching size rule.
    pub fn fallback(feeder_type: &str) -> Self {
        Self {
            asset_file: default_model_path(feeder_type),
            root_scale: global_scale_vec3(),
            part_scales: PartScales::default(),
        }
    }
}

/// Uniform root scale for "simple mode" rules, which carry a `base_size`
/// and no part rules: the largest parsed selector value over the base.
fn root_scale(rule: &SizeRule, dimensions: &Dimensions) -> DVec3 {
    if !rule.parts.is_empty() {
        return global_scale_vec3();
    }
    let Some(base) = rule.base_size.filter(|b| *b > 0.0) else {
        return global_scale_vec3();
    };
    rule.selector
        .keys()
        .filter_map(|key| dimensions.get(key))
        .reduce(f64::max)
        .map_or(global_scale_vec3(), |size| {
            DVec3::splat(size / base * GLOBAL_SCALE)
        })
}

/// Resolve `feeder_type` and `dimensions` against `table`.
pub fn resolve(table: &RuleTable, feeder_type: &str, dimensions: &Dimensions) -> ResolvedVariant {
    let Some(selection) = select(table, feeder_type, dimensions) else {
        return ResolvedVariant::fallback(feeder_type);
    };
    let folder = table
        .feeder(feeder_type)
        .map_or(MODEL_ROOT, |f| f.folder());
    ResolvedVariant {
        asset_file: format!("{folder}{}", selection.rule.file),
        root_scale: root_scale(selection.rule, dimensions),
        part_scales: compute_scales(selection.rule, dimensions),
    }
}

impl RuleTable {
    pub fn resolve(&self, feeder_type: &str, dimensions: &Dimensions) -> ResolvedVariant {
        resolve(self, feeder_type, dimensions)
    }
}
