//! Boundary validation of operator input.
//!
//! This sits in front of the engine, not inside it: the engine accepts any
//! value and never clamps. Limits only reject a value before it reaches a
//! [`Dimensions`](crate::Dimensions) snapshot.

use crate::constants::{DEFAULT_LIMIT_MAX, DEFAULT_LIMIT_MIN};
use crate::dimensions::parse_measurement;
use crate::error::LimitViolation;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Limits {
    pub min: f64,
    pub max: f64,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            min: DEFAULT_LIMIT_MIN,
            max: DEFAULT_LIMIT_MAX,
        }
    }
}

type Bound = (&'static str, Option<f64>, Option<f64>);

const FEEDER_LIMITS: &[(&str, &[Bound])] = &[
    (
        "bowl",
        &[
            ("A", Some(120.0), Some(800.0)),
            ("B", Some(120.0), Some(800.0)),
            ("C", Some(10.0), Some(150.0)),
        ],
    ),
    (
        "linear",
        &[("C", Some(68.0), Some(200.0)), ("D", Some(50.0), Some(500.0))],
    ),
    ("hopper", &[("C", Some(100.0), Some(2000.0))]),
    ("set-a", &[("B", None, Some(150.0))]),
    ("set-b", &[("C", None, Some(150.0))]),
    ("set-c", &[("A", None, Some(150.0))]),
];

/// Accepted range for one dimension of one feeder type.
pub fn limits_for(feeder_type: &str, dimension: &str) -> Limits {
    let default = Limits::default();
    FEEDER_LIMITS
        .iter()
        .find(|(ty, _)| *ty == feeder_type)
        .and_then(|(_, bounds)| bounds.iter().find(|(name, _, _)| *name == dimension))
        .map_or(default, |(_, min, max)| Limits {
            min: min.unwrap_or(default.min),
            max: max.unwrap_or(default.max),
        })
}

/// Check raw operator text against the limits.
///
/// Blank text is accepted (it clears the value). Text that does not parse
/// is passed through; the engine treats it as absent.
pub fn check_dimension(
    feeder_type: &str,
    dimension: &str,
    raw: &str,
) -> Result<(), LimitViolation> {
    let Some(value) = parse_measurement(raw) else {
        return Ok(());
    };
    let limits = limits_for(feeder_type, dimension);
    if value < limits.min {
        return Err(LimitViolation::TooSmall {
            dimension: dimension.to_string(),
            value,
            min: limits.min,
        });
    }
    if value > limits.max {
        return Err(LimitViolation::TooLarge {
            dimension: dimension.to_string(),
            value,
            max: limits.max,
        });
    }
    Ok(())
}
