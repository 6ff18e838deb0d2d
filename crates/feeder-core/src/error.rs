use std::path::PathBuf;

use thiserror::Error;

use crate::rules::Axis;

/// Failure to obtain a rule table at all. Per-rule problems are reported as
/// [`RuleDefect`]s instead and never abort a load.
#[derive(Debug, Error)]
pub enum RuleTableError {
    #[error("failed to read rule table {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid rule table: {0}")]
    Parse(#[from] toml::de::Error),
}

/// A configuration defect found while validating a rule table.
///
/// `index` is the authored position of the size rule inside its feeder's
/// list, counted from zero.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RuleDefect {
    #[error("feeder {feeder} declared more than once; later entry ignored")]
    DuplicateFeeder { feeder: String },

    #[error("{feeder} rule #{index} ({file}): selector names no dimension")]
    EmptySelector {
        feeder: String,
        index: usize,
        file: String,
    },

    #[error("{feeder} rule #{index} ({file}): range bounds must be finite, got {min}..={max}")]
    NonFiniteRange {
        feeder: String,
        index: usize,
        file: String,
        min: f64,
        max: f64,
    },

    #[error("{feeder} rule #{index} ({file}): inverted range {min}..={max}")]
    InvertedRange {
        feeder: String,
        index: usize,
        file: String,
        min: f64,
        max: f64,
    },

    #[error("{feeder} rule #{index} ({file}): base_size must be positive, got {value}")]
    NonPositiveRootBase {
        feeder: String,
        index: usize,
        file: String,
        value: f64,
    },

    #[error("{feeder} rule #{index} ({file}) part {part} axis {axis}: base must be positive, got {value}")]
    NonPositiveBase {
        feeder: String,
        index: usize,
        file: String,
        part: String,
        axis: Axis,
        value: f64,
    },

    #[error("{feeder} rule #{index} ({file}) part {part} axis {axis}: overlap_base must be positive, got {value}")]
    NonPositiveOverlapBase {
        feeder: String,
        index: usize,
        file: String,
        part: String,
        axis: Axis,
        value: f64,
    },
}

/// An operator-entered value outside the accepted bounds for its dimension.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LimitViolation {
    #[error("dimension {dimension} is too small: {value} < {min}")]
    TooSmall {
        dimension: String,
        value: f64,
        min: f64,
    },

    #[error("dimension {dimension} is too large: {value} > {max}")]
    TooLarge {
        dimension: String,
        value: f64,
        max: f64,
    },
}
