// Tests pinning down the camera and model-transform math.

use cube_core::{model_matrix, Camera, Pose};
use glam::{Mat4, Vec3, Vec4};

fn approx(a: Vec3, b: Vec3) {
    assert!(
        a.abs_diff_eq(b, 1e-5),
        "expected {b:?}, got {a:?}"
    );
}

fn pose(rotation: [f64; 3]) -> Pose {
    Pose {
        rotation,
        wander: [0.0; 3],
    }
}

#[test]
fn identity_pose_is_identity_transform() {
    let m = model_matrix(&pose([0.0; 3]), [0.0; 3]);
    assert!(m.abs_diff_eq(Mat4::IDENTITY, 1e-6));
}

#[test]
fn wander_only_translates() {
    let m = model_matrix(&pose([0.0; 3]), [0.25, -0.5, 0.125]);
    let p = m.transform_point3(Vec3::new(1.0, 2.0, 3.0));
    approx(p, Vec3::new(1.25, 1.5, 3.125));
}

#[test]
fn quarter_turn_about_x_sends_y_to_z() {
    // Rotation fractions map to degrees via x360: 0.25 is a 90 degree turn.
    let m = model_matrix(&pose([0.25, 0.0, 0.0]), [0.0; 3]);
    approx(m.transform_point3(Vec3::Y), Vec3::Z);
    approx(m.transform_point3(Vec3::X), Vec3::X);
}

#[test]
fn composition_order_is_translate_rz_ry_rx() {
    let rotation = [0.11, 0.37, 0.82];
    let wander = [0.3, -0.2, 0.45];
    let m = model_matrix(&pose(rotation), wander);

    let rx = (rotation[0] * 360.0).to_radians() as f32;
    let ry = (rotation[1] * 360.0).to_radians() as f32;
    let rz = (rotation[2] * 360.0).to_radians() as f32;
    let expected = Mat4::from_translation(Vec3::new(
        wander[0] as f32,
        wander[1] as f32,
        wander[2] as f32,
    )) * Mat4::from_rotation_z(rz)
        * Mat4::from_rotation_y(ry)
        * Mat4::from_rotation_x(rx);
    assert!(m.abs_diff_eq(expected, 1e-6));

    // The reversed rotation order must give a different matrix; the test
    // would be vacuous otherwise.
    let reversed = Mat4::from_translation(Vec3::new(
        wander[0] as f32,
        wander[1] as f32,
        wander[2] as f32,
    )) * Mat4::from_rotation_x(rx)
        * Mat4::from_rotation_y(ry)
        * Mat4::from_rotation_z(rz);
    assert!(!m.abs_diff_eq(reversed, 1e-4));
}

#[test]
fn full_turn_is_identity() {
    let m = model_matrix(&pose([1.0, 1.0, 1.0]), [0.0; 3]);
    assert!(m.abs_diff_eq(Mat4::IDENTITY, 1e-5));
}

#[test]
fn fixed_camera_looks_down_negative_z() {
    let camera = Camera::fixed(2.0);
    let view = camera.view_matrix();
    // The eye maps to the view-space origin and the target ends up in front
    // of the camera (negative Z in a right-handed view space).
    approx(view.transform_point3(camera.eye), Vec3::ZERO);
    let target_view = view.transform_point3(camera.target);
    assert!(target_view.z < 0.0);
    assert!(target_view.x.abs() < 1e-6 && target_view.y.abs() < 1e-6);
}

#[test]
fn projection_maps_near_plane_to_clip_front() {
    let camera = Camera::fixed(2.0);
    let proj = camera.projection_matrix();
    // wgpu clip space: z=0 at the near plane.
    let near = proj * Vec4::new(0.0, 0.0, -camera.znear, 1.0);
    assert!((near.z / near.w).abs() < 1e-6);
    let far = proj * Vec4::new(0.0, 0.0, -camera.zfar, 1.0);
    assert!((far.z / far.w - 1.0).abs() < 1e-4);
}
