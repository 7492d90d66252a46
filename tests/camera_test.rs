use approx::assert_abs_diff_eq;
use pose_ngin::{
    Point3, Vector3,
    camera::{Camera, CameraMode},
};

use crate::common::test_utils::assert_point_eq;
mod common;

fn origin_camera() -> Camera {
    Camera::new(Point3::new(0.0, 0.0, 0.0), CameraMode::FirstPerson)
}

#[test]
fn should_start_looking_down_negative_z() {
    let camera = Camera::default();
    assert_eq!(camera.mode(), CameraMode::FirstPerson);
    assert_point_eq(camera.position(), Point3::new(-2.0, 5.0, 20.0));
    let forward = camera.forward();
    assert_abs_diff_eq!(forward.x, 0.0, epsilon = 1e-6);
    assert_abs_diff_eq!(forward.z, -1.0, epsilon = 1e-6);
}

#[test]
fn should_walk_and_strafe_relative_to_heading() {
    let mut camera = Camera::default();
    camera.move_forward(1.0);
    assert_point_eq(camera.position(), Point3::new(-2.0, 5.0, 19.0));
    camera.move_right(1.0);
    assert_point_eq(camera.position(), Point3::new(-1.0, 5.0, 19.0));
    camera.move_left(1.0);
    camera.move_backward(1.0);
    assert_point_eq(camera.position(), Point3::new(-2.0, 5.0, 20.0));
}

#[test]
fn should_clamp_pitch() {
    let mut camera = origin_camera();
    camera.rotate_x(120.0);
    assert_eq!(camera.pitch(), 89.0);
    camera.rotate_x(-400.0);
    assert_eq!(camera.pitch(), -89.0);
}

#[test]
fn should_ease_towards_target_then_snap() {
    let mut camera = origin_camera();
    let target = Point3::new(4.0, 0.0, 0.0);
    camera.move_to_smooth(target, 1.0, 4.0);
    assert_abs_diff_eq!(camera.position().x, 1.0, epsilon = 1e-5);
    camera.move_to_smooth(target, 1.0, 4.0);
    assert_abs_diff_eq!(camera.position().x, 2.5, epsilon = 1e-5);
    camera.move_to_smooth(target, 1.0, 4.0);
    camera.move_to_smooth(target, 1.0, 4.0);
    assert_abs_diff_eq!(camera.position().x, 4.0, epsilon = 1e-5);

    // a fresh ease starts slow again
    camera.reset_moving_animation();
    camera.move_to_smooth(Point3::new(0.0, 0.0, 0.0), 1.0, 4.0);
    assert_abs_diff_eq!(camera.position().x, 3.0, epsilon = 1e-5);
}

#[test]
fn should_ease_heading() {
    let mut camera = origin_camera();
    camera.head_to_smooth(0.0, 90.0, 0.0, 2.0, 4.0);
    assert_abs_diff_eq!(camera.yaw(), 45.0, epsilon = 1e-4);
    camera.head_to_smooth(0.0, 90.0, 0.0, 2.0, 4.0);
    assert_abs_diff_eq!(camera.yaw(), 90.0, epsilon = 1e-4);
    assert_abs_diff_eq!(camera.forward().z, 1.0, epsilon = 1e-5);

    camera.reset_heading_animation();
    camera.head_to(10.0, 0.0, 0.0);
    assert_eq!(camera.pitch(), 10.0);
    assert!(camera.forward().y > 0.0);
}

#[test]
fn should_flag_moves_until_taken() {
    let mut camera = origin_camera();
    assert!(camera.take_moved());
    assert!(!camera.take_moved());
    camera.rotate_y(5.0);
    assert!(camera.take_moved());
    camera.move_to(Point3::new(1.0, 0.0, 0.0));
    assert!(camera.take_moved());
    assert!(!camera.take_moved());
}

#[test]
fn should_turn_up_vector_with_roll() {
    let mut camera = origin_camera();
    camera.rotate_z(90.0);
    assert_abs_diff_eq!(camera.up().x, -1.0, epsilon = 1e-6);
    assert_abs_diff_eq!(camera.up().y, 0.0, epsilon = 1e-6);
}

#[test]
fn should_look_at_target_in_third_person() {
    let mut camera = origin_camera();
    camera.target(Point3::new(5.0, 5.0, 5.0));
    assert_abs_diff_eq!(camera.forward().x, 1.0, epsilon = 1e-6);

    camera.set_third_person(Point3::new(0.0, 0.0, 5.0), Point3::new(0.0, 0.0, 0.0));
    assert_eq!(camera.mode(), CameraMode::ThirdPerson);
    assert_abs_diff_eq!(camera.forward().z, -1.0, epsilon = 1e-6);
    let seen = camera.view_matrix() * Point3::new(0.0, 0.0, 0.0).to_homogeneous();
    assert_abs_diff_eq!(seen.z, -5.0, epsilon = 1e-5);

    camera.target(Point3::new(5.0, 0.0, 5.0));
    assert_abs_diff_eq!(camera.forward().x, 1.0, epsilon = 1e-6);
}

#[test]
fn should_derive_angles_when_switching_to_first_person() {
    let mut camera = Camera::default();
    camera.set_third_person(Point3::new(0.0, 0.0, 5.0), Point3::new(0.0, 0.0, 0.0));
    camera.set_first_person(Point3::new(1.0, 2.0, 3.0), Vector3::new(0.0, 0.0, 2.0));
    assert_eq!(camera.mode(), CameraMode::FirstPerson);
    assert_abs_diff_eq!(camera.yaw(), 90.0, epsilon = 1e-4);
    assert_abs_diff_eq!(camera.forward().z, 1.0, epsilon = 1e-5);
    assert_point_eq(camera.position(), Point3::new(1.0, 2.0, 3.0));
}

#[test]
fn should_put_points_ahead_on_negative_view_z() {
    let camera = Camera::default();
    let ahead = camera.view_matrix() * Point3::new(-2.0, 5.0, 10.0).to_homogeneous();
    assert_abs_diff_eq!(ahead.x, 0.0, epsilon = 1e-4);
    assert_abs_diff_eq!(ahead.y, 0.0, epsilon = 1e-4);
    assert_abs_diff_eq!(ahead.z, -10.0, epsilon = 1e-4);
}
