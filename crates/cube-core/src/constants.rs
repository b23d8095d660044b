use std::time::Duration;

// Shared tuning constants used by both the core logic and the native
// frontend.

// Grid and surface geometry. The window renders at GRID * WINDOW_SCALE; in
// LED mode the surface is exactly GRID-sized so pixels map 1:1.
pub const GRID_WIDTH: u32 = 64;
pub const GRID_HEIGHT: u32 = 32;
pub const WINDOW_SCALE: u32 = 18;

// Camera
pub const FOV_DEGREES: f32 = 45.0;
pub const CAMERA_EYE_Z: f32 = 3.0;
pub const Z_NEAR: f32 = 1.0;
pub const Z_FAR: f32 = 100.0;

// Pacing
pub const TARGET_FPS: f64 = 60.0;
pub const SAMPLE_WINDOW_SECS: f64 = 5.0; // achieved-FPS reporting window
pub const MAX_TICKS_PER_STEP: u32 = 4; // catch-up cap when falling behind
pub const YIELD_HINT: Duration = Duration::from_millis(1);

// Motion defaults, in position units (fractions of a revolution for the
// rotation axes) per tick at the target tick rate.
pub const ROTATION_MAX_VELOCITY: f64 = 0.002;
pub const ROTATION_ACCELERATION: f64 = 0.0001;
pub const WANDER_MAX_VELOCITY: f64 = 0.003;
pub const WANDER_ACCELERATION: f64 = 0.0002;
pub const RETARGET_TICKS_MIN: u32 = 30;
pub const RETARGET_TICKS_MAX: u32 = 90;
pub const WANDER_AMPLITUDE: [f64; 3] = [0.6, 0.4, 0.6];
pub const WANDER_CENTER: f64 = 0.5;
