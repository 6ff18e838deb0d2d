//! Parametric feeder mapping engine.
//!
//! Given a feeder type and operator-entered dimensions, pick the pre-built
//! asset variant from an ordered rule table and derive a per-part, per-axis
//! scale for it. Also frames the camera and places a reference object.
//! Everything here is pure computation over an immutable [`RuleTable`].

pub mod constants;
pub mod dimensions;
pub mod error;
pub mod focus;
pub mod limits;
pub mod reference;
pub mod rules;
pub mod scale;
pub mod select;
pub mod variant;

pub use constants::*;
pub use dimensions::{parse_measurement, Dimensions};
pub use error::{LimitViolation, RuleDefect, RuleTableError};
pub use focus::{compute_focus, Camera, Focus};
pub use limits::{check_dimension, limits_for, Limits};
pub use reference::{reference_offset, reference_placement, ReferencePlacement};
pub use rules::{Axis, AxisRule, FeederRules, PartRule, RuleTable, Selector, SizeRule, TableLoad};
pub use scale::{compute_scales, PartScale, PartScales};
pub use select::{select, Selection};
pub use variant::{resolve, ResolvedVariant};
