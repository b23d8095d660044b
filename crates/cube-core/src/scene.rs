//! Camera and model-transform composition shared with the native frontend.
//!
//! These types intentionally avoid referencing platform-specific APIs so the
//! matrix math stays host-testable.

use glam::{Mat4, Vec3};

use crate::constants::{CAMERA_EYE_Z, FOV_DEGREES, Z_FAR, Z_NEAR};
use crate::motion::Pose;

/// Simple right-handed camera description with perspective projection. The
/// camera is static for the lifetime of the program; only the model transform
/// changes per frame.
#[derive(Clone, Debug)]
pub struct Camera {
    pub eye: Vec3,
    pub target: Vec3,
    pub up: Vec3,
    pub aspect: f32,
    pub fovy_radians: f32,
    pub znear: f32,
    pub zfar: f32,
}

impl Camera {
    /// The fixed picube view: eye on +Z looking at the origin.
    pub fn fixed(aspect: f32) -> Self {
        Self {
            eye: Vec3::new(0.0, 0.0, CAMERA_EYE_Z),
            target: Vec3::ZERO,
            up: Vec3::Y,
            aspect,
            fovy_radians: FOV_DEGREES.to_radians(),
            znear: Z_NEAR,
            zfar: Z_FAR,
        }
    }

    /// Compute the clip-space projection matrix.
    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fovy_radians, self.aspect, self.znear, self.zfar)
    }

    /// Compute the view matrix that transforms world to view space.
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.eye, self.target, self.up)
    }
}

/// Model transform for the cube: translate(wander) × rotZ × rotY × rotX.
///
/// The order is fixed; rotation composition is non-commutative and the visual
/// result depends on reproducing it exactly. Rotation fractions in [0, 1) map
/// to degrees via ×360.
pub fn model_matrix(pose: &Pose, wander_offset: [f64; 3]) -> Mat4 {
    let rx = (pose.rotation[0] * 360.0).to_radians() as f32;
    let ry = (pose.rotation[1] * 360.0).to_radians() as f32;
    let rz = (pose.rotation[2] * 360.0).to_radians() as f32;
    let t = Vec3::new(
        wander_offset[0] as f32,
        wander_offset[1] as f32,
        wander_offset[2] as f32,
    );
    Mat4::from_translation(t)
        * Mat4::from_rotation_z(rz)
        * Mat4::from_rotation_y(ry)
        * Mat4::from_rotation_x(rx)
}
