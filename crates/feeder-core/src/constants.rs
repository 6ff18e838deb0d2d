use glam::DVec3;

// Shared scene tuning constants used by the engine and every front-end.

// Units
pub const GLOBAL_SCALE: f64 = 0.001; // scene units per millimetre

// Asset lookup
pub const MODEL_ROOT: &str = "/models/"; // folder used when a feeder declares none
pub const DEFAULT_MODEL_EXTENSION: &str = "glb";

// Reference can (millimetres)
pub const REFERENCE_HEIGHT_MM: f64 = 115.0;
pub const REFERENCE_RADIUS_MM: f64 = 33.0;

// Reference placement (scene units)
pub const REFERENCE_GAP: f64 = 0.08; // clearance added beyond the asset's half-width
pub const REFERENCE_MIN_GAP: f64 = 0.08; // never closer to the origin than this
pub const REFERENCE_DEFAULT_OFFSET: f64 = -0.1; // used when no silhouette dimension parses

// Camera framing
pub const CAMERA_ZOOM_MULTIPLIER: f64 = 1.7;
pub const CAMERA_DEFAULT_TARGET_HEIGHT: f64 = 0.12;
pub const CAMERA_FOVY_DEGREES: f64 = 50.0;
pub const CAMERA_ZNEAR: f64 = 0.01;
pub const CAMERA_ZFAR: f64 = 100.0;

// Input limits applied when a feeder/dimension pair has no explicit bound
pub const DEFAULT_LIMIT_MIN: f64 = 0.0;
pub const DEFAULT_LIMIT_MAX: f64 = 10_000.0;

#[inline]
pub fn global_scale_vec3() -> DVec3 {
    DVec3::splat(GLOBAL_SCALE)
}

#[inline]
pub fn default_model_path(feeder_type: &str) -> String {
    format!("{MODEL_ROOT}{feeder_type}.{DEFAULT_MODEL_EXTENSION}")
}
