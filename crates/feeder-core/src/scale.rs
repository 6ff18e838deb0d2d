//! Per-part, per-axis scale derivation.
//!
//! For each axis rule the target size is the measured input plus a fixed
//! offset plus an overlap term, and the scale is that size over the part's
//! native size:
//!
//! ```text
//! compensation = hidden * (container / overlap_base)   // container parses
//!              = hidden                                // container missing
//!              = 0                                     // no overlap configured
//! ratio        = (input + offset + compensation) / base
//! ```
//!
//! The overlap term keeps the seam between a nested part and its container
//! closed when only the container's dimension grows. Ratios are not clamped.

use glam::DVec3;
use serde::Serialize;

use crate::dimensions::Dimensions;
use crate::rules::{Axis, AxisRule, SizeRule};

/// Scale vector for one named part.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PartScale {
    pub part: String,
    pub scale: DVec3,
}

/// Part scales in order of first appearance in the rule.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct PartScales(Vec<PartScale>);

impl PartScales {
    /// Scale for `part`; parts no rule mentioned stay at `[1, 1, 1]`.
    pub fn get(&self, part: &str) -> DVec3 {
        self.find(part).map_or(DVec3::ONE, |p| p.scale)
    }

    pub fn contains(&self, part: &str) -> bool {
        self.find(part).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = &PartScale> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    fn find(&self, part: &str) -> Option<&PartScale> {
        self.0.iter().find(|p| p.part == part)
    }

    fn accumulator(&mut self, part: &str) -> &mut DVec3 {
        let index = match self.0.iter().position(|p| p.part == part) {
            Some(i) => i,
            None => {
                self.0.push(PartScale {
                    part: part.to_string(),
                    scale: DVec3::ONE,
                });
                self.0.len() - 1
            }
        };
        &mut self.0[index].scale
    }
}

#[inline]
fn set_axis(scale: &mut DVec3, axis: Axis, value: f64) {
    match axis {
        Axis::X => scale.x = value,
        Axis::Y => scale.y = value,
        Axis::Z => scale.z = value,
    }
}

/// Extra length for the part segment hidden inside a container.
pub fn overlap_compensation(rule: &AxisRule, dimensions: &Dimensions) -> f64 {
    match (&rule.overlap_input, rule.overlap_base, rule.overlap_hidden) {
        (Some(input), Some(base), Some(hidden)) => match dimensions.get(input) {
            Some(container) if base > 0.0 => hidden * (container / base),
            _ => hidden,
        },
        _ => 0.0,
    }
}

/// Scale ratio for one axis rule, or `None` when its input does not parse.
pub fn axis_ratio(rule: &AxisRule, dimensions: &Dimensions) -> Option<f64> {
    if !(rule.base_size > 0.0) {
        return None;
    }
    let measured = dimensions.get(&rule.input)?;
    let target = measured + rule.fixed_offset + overlap_compensation(rule, dimensions);
    Some(target / rule.base_size)
}

/// Scale vectors for every part referenced by `rule`.
///
/// Later assignments to the same axis of the same part overwrite earlier
/// ones. An axis whose input is missing keeps whatever value it already has.
pub fn compute_scales(rule: &SizeRule, dimensions: &Dimensions) -> PartScales {
    let mut scales = PartScales::default();
    for part in &rule.parts {
        let scale = scales.accumulator(&part.target);
        for axis_rule in &part.axes {
            if let Some(ratio) = axis_ratio(axis_rule, dimensions) {
                set_axis(scale, axis_rule.axis, ratio);
            }
        }
    }
    scales
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::PartRule;

    const EPS: f64 = 1e-9;

    fn rule_with(parts: Vec<PartRule>) -> SizeRule {
        parts
            .into_iter()
            .fold(SizeRule::new(["C"], 0.0, 1000.0, "x.glb"), |r, p| r.with_part(p))
    }

    #[test]
    fn simple_ratio() {
        let rule = rule_with(vec![PartRule::new("A", vec![AxisRule::new(Axis::X, "B", 90.0)])]);
        let scales = compute_scales(&rule, &Dimensions::new().with("B", "120"));
        let s = scales.get("A");
        assert!((s.x - 4.0 / 3.0).abs() < EPS);
        assert_eq!(s.y, 1.0);
        assert_eq!(s.z, 1.0);
    }

    #[test]
    fn overlap_scales_with_container() {
        let axis = AxisRule::new(Axis::X, "B", 43.0).with_overlap("C", 1.0, 1.0);
        let dims = Dimensions::new().with("B", "40").with("C", "2");
        assert!((overlap_compensation(&axis, &dims) - 2.0).abs() < EPS);
        let ratio = axis_ratio(&axis, &dims).unwrap();
        assert!((ratio - 42.0 / 43.0).abs() < EPS);
    }

    #[test]
    fn overlap_falls_back_to_static_hidden_length() {
        let axis = AxisRule::new(Axis::X, "B", 43.0).with_overlap("C", 10.0, 3.0);
        let dims = Dimensions::new().with("B", "40").with("C", "unset");
        assert_eq!(overlap_compensation(&axis, &dims), 3.0);
        assert!((axis_ratio(&axis, &dims).unwrap() - 43.0 / 43.0).abs() < EPS);
    }

    #[test]
    fn partial_overlap_config_adds_nothing() {
        let mut axis = AxisRule::new(Axis::X, "B", 43.0).with_overlap("C", 1.0, 5.0);
        axis.overlap_base = None;
        let dims = Dimensions::new().with("B", "40").with("C", "2");
        assert_eq!(overlap_compensation(&axis, &dims), 0.0);
    }

    #[test]
    fn fixed_offset_is_added_before_division() {
        let axis = AxisRule::new(Axis::Y, "D", 50.0).with_offset(10.0);
        let dims = Dimensions::new().with("D", "40");
        assert!((axis_ratio(&axis, &dims).unwrap() - 1.0).abs() < EPS);
    }

    #[test]
    fn missing_input_leaves_axis_untouched() {
        let rule = rule_with(vec![
            PartRule::new("A", vec![AxisRule::new(Axis::X, "B", 100.0)]),
            PartRule::new("A", vec![AxisRule::new(Axis::X, "E", 100.0)]),
            PartRule::new("A", vec![AxisRule::new(Axis::Z, "E", 100.0)]),
        ]);
        let scales = compute_scales(&rule, &Dimensions::new().with("B", "150"));
        let s = scales.get("A");
        assert!((s.x - 1.5).abs() < EPS, "earlier value kept, not reset");
        assert_eq!(s.z, 1.0, "untouched axis stays at 1");
        assert_eq!(scales.len(), 1, "repeated part reuses its accumulator");
    }

    #[test]
    fn later_assignment_overwrites_earlier() {
        let rule = rule_with(vec![
            PartRule::new(
                "A",
                vec![AxisRule::new(Axis::X, "B", 100.0), AxisRule::new(Axis::X, "D", 100.0)],
            ),
            PartRule::new("C", vec![AxisRule::new(Axis::Y, "B", 50.0)]),
            PartRule::new("A", vec![AxisRule::new(Axis::X, "B", 200.0)]),
        ]);
        let dims = Dimensions::new().with("B", "100").with("D", "300");
        let scales = compute_scales(&rule, &dims);
        assert!((scales.get("A").x - 0.5).abs() < EPS);
        assert!((scales.get("C").y - 2.0).abs() < EPS);
        let order: Vec<_> = scales.iter().map(|p| p.part.as_str()).collect();
        assert_eq!(order, ["A", "C"]);
    }

    #[test]
    fn ratios_are_not_clamped() {
        let rule = rule_with(vec![PartRule::new(
            "A",
            vec![
                AxisRule::new(Axis::X, "B", 10.0),
                AxisRule::new(Axis::Y, "D", 10.0),
                AxisRule::new(Axis::Z, "E", 10.0),
            ],
        )]);
        let dims = Dimensions::new().with("B", "0").with("D", "-20").with("E", "1e6");
        let s = compute_scales(&rule, &dims).get("A");
        assert_eq!(s.x, 0.0);
        assert_eq!(s.y, -2.0);
        assert_eq!(s.z, 1e5);
    }

    #[test]
    fn unvalidated_zero_base_is_skipped() {
        let axis = AxisRule::new(Axis::X, "B", 0.0);
        assert_eq!(axis_ratio(&axis, &Dimensions::new().with("B", "10")), None);
    }

    #[test]
    fn part_without_axes_is_reported_at_identity() {
        let rule = rule_with(vec![PartRule::new("lid", vec![])]);
        let scales = compute_scales(&rule, &Dimensions::new());
        assert!(scales.contains("lid"));
        assert_eq!(scales.get("lid"), DVec3::ONE);
        assert_eq!(scales.get("unmentioned"), DVec3::ONE);
        assert!(!scales.contains("unmentioned"));
    }
}
