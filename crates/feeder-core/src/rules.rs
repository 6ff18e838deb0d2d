//! Rule table types, TOML loading and load-time validation.
//!
//! The table is plain data: an ordered list of feeder types, each with an
//! ordered list of [`SizeRule`]s. Every level is a `Vec` because evaluation is
//! first-match-wins and must follow the authored order exactly.
//!
//! Two ways to obtain one:
//! - [`RuleTable::builtin`] - the table embedded in the binary
//! - [`RuleTable::load`] - a replacement table read from disk
//!
//! Both run [`RuleTable::validate`], which drops only the offending rule (or
//! axis rule) and reports a [`RuleDefect`] for it.

use std::fmt;
use std::path::Path;
use std::sync::OnceLock;

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::constants::MODEL_ROOT;
use crate::error::{RuleDefect, RuleTableError};

/// Default rules embedded in the binary at compile time.
const DEFAULT_RULES: &str = include_str!("../config/feeder_rules.toml");

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Axis {
    X,
    Y,
    Z,
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Axis::X => "x",
            Axis::Y => "y",
            Axis::Z => "z",
        };
        f.write_str(name)
    }
}

/// How one axis of one part follows one input dimension.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct AxisRule {
    pub axis: Axis,
    /// Dimension that drives this axis.
    pub input: String,
    /// Native size of the part along `axis` at scale 1 (millimetres).
    #[serde(rename = "base")]
    pub base_size: f64,
    /// Constant added to the measured value before dividing.
    #[serde(default, rename = "offset")]
    pub fixed_offset: f64,
    /// Container dimension whose growth also stretches the hidden segment.
    #[serde(default)]
    pub overlap_input: Option<String>,
    /// Container's native size for `overlap_input`.
    #[serde(default)]
    pub overlap_base: Option<f64>,
    /// Length of this part hidden inside the container at scale 1.
    #[serde(default)]
    pub overlap_hidden: Option<f64>,
}

impl AxisRule {
    pub fn new(axis: Axis, input: impl Into<String>, base_size: f64) -> Self {
        Self {
            axis,
            input: input.into(),
            base_size,
            fixed_offset: 0.0,
            overlap_input: None,
            overlap_base: None,
            overlap_hidden: None,
        }
    }

    pub fn with_offset(mut self, fixed_offset: f64) -> Self {
        self.fixed_offset = fixed_offset;
        self
    }

    pub fn with_overlap(mut self, input: impl Into<String>, base: f64, hidden: f64) -> Self {
        self.overlap_input = Some(input.into());
        self.overlap_base = Some(base);
        self.overlap_hidden = Some(hidden);
        self
    }
}

/// Scaling instructions for one named node of the asset.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct PartRule {
    pub target: String,
    #[serde(default)]
    pub axes: Vec<AxisRule>,
}

impl PartRule {
    pub fn new(target: impl Into<String>, axes: Vec<AxisRule>) -> Self {
        Self {
            target: target.into(),
            axes,
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum SelectorRepr {
    One(String),
    Many(Vec<String>),
}

/// Dimension names checked, in order, against a rule's range.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(from = "SelectorRepr")]
pub struct Selector(SmallVec<[String; 2]>);

impl Selector {
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<SelectorRepr> for Selector {
    fn from(repr: SelectorRepr) -> Self {
        match repr {
            SelectorRepr::One(key) => Selector(smallvec::smallvec![key]),
            SelectorRepr::Many(keys) => Selector(keys.into_iter().collect()),
        }
    }
}

impl<S: Into<String>> FromIterator<S> for Selector {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Selector(iter.into_iter().map(Into::into).collect())
    }
}

/// One size variant: a selector range mapped to an asset and its part scaling.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct SizeRule {
    #[serde(rename = "select")]
    pub selector: Selector,
    pub min: f64,
    pub max: f64,
    pub file: String,
    /// Uniform root scaling reference, used only when `parts` is empty.
    #[serde(default)]
    pub base_size: Option<f64>,
    #[serde(default, rename = "part")]
    pub parts: Vec<PartRule>,
}

impl SizeRule {
    pub fn new<S: Into<String>>(
        selector: impl IntoIterator<Item = S>,
        min: f64,
        max: f64,
        file: impl Into<String>,
    ) -> Self {
        Self {
            selector: selector.into_iter().collect(),
            min,
            max,
            file: file.into(),
            base_size: None,
            parts: Vec::new(),
        }
    }

    pub fn with_base_size(mut self, base_size: f64) -> Self {
        self.base_size = Some(base_size);
        self
    }

    pub fn with_part(mut self, part: PartRule) -> Self {
        self.parts.push(part);
        self
    }

    #[inline]
    pub fn contains(&self, value: f64) -> bool {
        self.min <= value && value <= self.max
    }
}

/// All size rules for one feeder type, in authored order.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct FeederRules {
    #[serde(rename = "type")]
    pub feeder_type: String,
    /// Folder prefix joined with a matched rule's `file`.
    #[serde(default)]
    pub folder: Option<String>,
    #[serde(default, rename = "rule")]
    pub rules: Vec<SizeRule>,
}

impl FeederRules {
    pub fn new(feeder_type: impl Into<String>, rules: Vec<SizeRule>) -> Self {
        Self {
            feeder_type: feeder_type.into(),
            folder: None,
            rules,
        }
    }

    pub fn with_folder(mut self, folder: impl Into<String>) -> Self {
        self.folder = Some(folder.into());
        self
    }

    pub fn folder(&self) -> &str {
        self.folder.as_deref().unwrap_or(MODEL_ROOT)
    }
}

#[derive(Deserialize)]
struct TableFile {
    #[serde(default)]
    feeder: Vec<FeederRules>,
}

/// A validated table together with the defects dropped while building it.
#[derive(Clone, Debug)]
pub struct TableLoad {
    pub table: RuleTable,
    pub defects: Vec<RuleDefect>,
}

/// Process-wide, read-only size rule table.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RuleTable {
    feeders: Vec<FeederRules>,
}

impl RuleTable {
    /// The embedded table. Parsed and validated on first use.
    ///
    /// # Panics
    /// Panics if the embedded TOML is invalid (a build-time bug, covered by tests).
    pub fn builtin() -> &'static RuleTable {
        static BUILTIN: OnceLock<RuleTable> = OnceLock::new();
        BUILTIN.get_or_init(|| {
            RuleTable::from_toml_str(DEFAULT_RULES)
                .expect("embedded feeder_rules.toml must be valid TOML")
                .table
        })
    }

    /// Read and validate a table from a TOML file.
    pub fn load(path: &Path) -> Result<TableLoad, RuleTableError> {
        let content = std::fs::read_to_string(path).map_err(|source| RuleTableError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let load = Self::from_toml_str(&content)?;
        log::info!(
            "[rules] loaded {} feeder types from {} ({} defects)",
            load.table.feeders.len(),
            path.display(),
            load.defects.len()
        );
        Ok(load)
    }

    /// Parse and validate a table from TOML text.
    pub fn from_toml_str(content: &str) -> Result<TableLoad, RuleTableError> {
        let file: TableFile = toml::from_str(content)?;
        Ok(Self::validate(file.feeder))
    }

    /// Build a table from already-constructed feeders, dropping defective
    /// rules. Each defect is logged and returned.
    pub fn validate(feeders: Vec<FeederRules>) -> TableLoad {
        let mut defects = Vec::new();
        let mut kept: Vec<FeederRules> = Vec::with_capacity(feeders.len());

        for mut feeder in feeders {
            if kept.iter().any(|f| f.feeder_type == feeder.feeder_type) {
                defects.push(RuleDefect::DuplicateFeeder {
                    feeder: feeder.feeder_type,
                });
                continue;
            }
            let rules = std::mem::take(&mut feeder.rules);
            feeder.rules = rules
                .into_iter()
                .enumerate()
                .filter_map(|(index, rule)| {
                    validate_rule(&feeder.feeder_type, index, rule, &mut defects)
                })
                .collect();
            kept.push(feeder);
        }

        for defect in &defects {
            log::warn!("[rules] {defect}");
        }
        TableLoad {
            table: RuleTable { feeders: kept },
            defects,
        }
    }

    /// Size rules for `feeder_type`; empty for unknown types.
    pub fn rules_for(&self, feeder_type: &str) -> &[SizeRule] {
        self.feeder(feeder_type)
            .map(|f| f.rules.as_slice())
            .unwrap_or(&[])
    }

    pub fn feeder(&self, feeder_type: &str) -> Option<&FeederRules> {
        self.feeders.iter().find(|f| f.feeder_type == feeder_type)
    }

    pub fn feeders(&self) -> &[FeederRules] {
        &self.feeders
    }
}

fn validate_rule(
    feeder: &str,
    index: usize,
    mut rule: SizeRule,
    defects: &mut Vec<RuleDefect>,
) -> Option<SizeRule> {
    let file = || rule.file.clone();
    if rule.selector.is_empty() {
        defects.push(RuleDefect::EmptySelector {
            feeder: feeder.to_string(),
            index,
            file: file(),
        });
        return None;
    }
    if !rule.min.is_finite() || !rule.max.is_finite() {
        defects.push(RuleDefect::NonFiniteRange {
            feeder: feeder.to_string(),
            index,
            file: file(),
            min: rule.min,
            max: rule.max,
        });
        return None;
    }
    if rule.min > rule.max {
        defects.push(RuleDefect::InvertedRange {
            feeder: feeder.to_string(),
            index,
            file: file(),
            min: rule.min,
            max: rule.max,
        });
        return None;
    }
    if let Some(value) = rule.base_size {
        if !(value > 0.0) {
            defects.push(RuleDefect::NonPositiveRootBase {
                feeder: feeder.to_string(),
                index,
                file: file(),
                value,
            });
            return None;
        }
    }

    for part in &mut rule.parts {
        let axes = std::mem::take(&mut part.axes);
        part.axes = axes
            .into_iter()
            .filter(|axis_rule| {
                let defect = if !(axis_rule.base_size > 0.0) {
                    Some(RuleDefect::NonPositiveBase {
                        feeder: feeder.to_string(),
                        index,
                        file: rule.file.clone(),
                        part: part.target.clone(),
                        axis: axis_rule.axis,
                        value: axis_rule.base_size,
                    })
                } else {
                    axis_rule
                        .overlap_base
                        .filter(|b| !(*b > 0.0))
                        .map(|value| RuleDefect::NonPositiveOverlapBase {
                            feeder: feeder.to_string(),
                            index,
                            file: rule.file.clone(),
                            part: part.target.clone(),
                            axis: axis_rule.axis,
                            value,
                        })
                };
                match defect {
                    Some(d) => {
                        defects.push(d);
                        false
                    }
                    None => true,
                }
            })
            .collect();
    }
    Some(rule)
}
