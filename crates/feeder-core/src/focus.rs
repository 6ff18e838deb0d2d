//! Camera framing per feeder type.
//!
//! A static base `{position, target}` pair is picked by the first table key
//! contained in the feeder type, the position is pushed out by a zoom
//! multiplier and the target is lifted by a dimension-derived height.

use glam::{DMat4, DVec3};
use serde::Serialize;

use crate::constants::{
    CAMERA_DEFAULT_TARGET_HEIGHT, CAMERA_FOVY_DEGREES, CAMERA_ZFAR, CAMERA_ZNEAR,
    CAMERA_ZOOM_MULTIPLIER, GLOBAL_SCALE,
};
use crate::dimensions::Dimensions;

// (key, position, target); order decides which key wins for compound names
const FOCUS_TABLE: [(&str, [f64; 3], [f64; 3]); 6] = [
    ("bowl", [0.01, 0.28, 0.60], [-0.02, -0.08, 0.0]),
    ("linear", [0.5, 0.3, 0.5], [0.0, 0.0, 0.0]),
    ("hopper", [-0.4, 0.3, 0.5], [0.0, 0.0, 0.0]),
    ("set-a", [0.0, 0.4, 1.0], [0.0, 0.0, 0.0]),
    ("set-b", [-0.5, 0.4, 1.0], [0.0, 0.0, 0.0]),
    ("set-c", [-0.5, 0.5, 1.4], [0.0, 0.0, 0.0]),
];

/// Camera position and look-at target in world space.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct Focus {
    pub position: DVec3,
    pub target: DVec3,
}

/// Unscaled table entry for `feeder_type`.
pub fn base_focus(feeder_type: &str) -> Option<Focus> {
    FOCUS_TABLE
        .iter()
        .find(|(key, _, _)| feeder_type.contains(key))
        .map(|(_, position, target)| Focus {
            position: DVec3::from_array(*position),
            target: DVec3::from_array(*target),
        })
}

/// Vertical lift applied to the base target.
pub fn target_height(feeder_type: &str, dimensions: &Dimensions) -> f64 {
    match feeder_type {
        "bowl" => dimensions
            .get("A")
            .map_or(CAMERA_DEFAULT_TARGET_HEIGHT, |a| a * GLOBAL_SCALE / 2.0),
        _ => CAMERA_DEFAULT_TARGET_HEIGHT,
    }
}

/// Framing for the current inputs; `None` leaves the camera where it is.
pub fn compute_focus(feeder_type: &str, dimensions: &Dimensions) -> Option<Focus> {
    let base = base_focus(feeder_type)?;
    let lift = target_height(feeder_type, dimensions);
    Some(Focus {
        position: base.position * CAMERA_ZOOM_MULTIPLIER,
        target: base.target + DVec3::Y * lift,
    })
}

/// Simple right-handed camera description with perspective projection.
#[derive(Clone, Debug, PartialEq)]
pub struct Camera {
    pub eye: DVec3,
    pub target: DVec3,
    pub up: DVec3,
    pub aspect: f64,
    pub fovy_radians: f64,
    pub znear: f64,
    pub zfar: f64,
}

impl Camera {
    pub fn from_focus(focus: Focus, aspect: f64) -> Self {
        Self {
            eye: focus.position,
            target: focus.target,
            up: DVec3::Y,
            aspect,
            fovy_radians: CAMERA_FOVY_DEGREES.to_radians(),
            znear: CAMERA_ZNEAR,
            zfar: CAMERA_ZFAR,
        }
    }

    /// Compute the clip-space projection matrix.
    pub fn projection_matrix(&self) -> DMat4 {
        DMat4::perspective_rh(self.fovy_radians, self.aspect, self.znear, self.zfar)
    }
    /// Compute the view matrix that transforms world to view space.
    pub fn view_matrix(&self) -> DMat4 {
        DMat4::look_at_rh(self.eye, self.target, self.up)
    }
}
