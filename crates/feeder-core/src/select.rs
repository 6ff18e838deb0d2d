//! First-match variant selection.

use crate::dimensions::Dimensions;
use crate::rules::{RuleTable, SizeRule};

/// The rule that matched and the selector key that satisfied it.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Selection<'t> {
    pub rule: &'t SizeRule,
    pub index: usize,
    pub key: &'t str,
    pub value: f64,
}

impl SizeRule {
    /// First selector key (authored order) whose parsed value lies in range.
    pub fn matching_key(&self, dimensions: &Dimensions) -> Option<(&str, f64)> {
        self.selector.keys().find_map(|key| {
            dimensions
                .get(key)
                .filter(|value| self.contains(*value))
                .map(|value| (key, value))
        })
    }
}

/// Scan `rules` in authored order and stop at the first satisfied rule.
/// Overlapping ranges are resolved purely by list position.
pub fn select_from<'t>(rules: &'t [SizeRule], dimensions: &Dimensions) -> Option<Selection<'t>> {
    rules.iter().enumerate().find_map(|(index, rule)| {
        rule.matching_key(dimensions).map(|(key, value)| Selection {
            rule,
            index,
            key,
            value,
        })
    })
}

/// Size rule for `feeder_type` matched by `dimensions`, if any.
pub fn select<'t>(
    table: &'t RuleTable,
    feeder_type: &str,
    dimensions: &Dimensions,
) -> Option<Selection<'t>> {
    let selection = select_from(table.rules_for(feeder_type), dimensions);
    match &selection {
        Some(s) => log::debug!(
            "[select] {feeder_type}: rule #{} ({}) via {}={}",
            s.index,
            s.rule.file,
            s.key,
            s.value
        ),
        None => log::debug!("[select] {feeder_type}: no size rule matched"),
    }
    selection
}
