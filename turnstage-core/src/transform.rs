/// Model transform helpers for the turntable scene
use nalgebra::{Matrix4, Vector3};

/// Rotation of the model about the vertical axis
pub fn yaw_matrix(angle: f32) -> Matrix4<f32> {
    Matrix4::new_rotation(Vector3::new(0.0, angle, 0.0))
}

/// Model matrix placing the rotated model at `offset` in world space
pub fn model_matrix(angle: f32, offset: Vector3<f32>) -> Matrix4<f32> {
    Matrix4::new_translation(&offset) * yaw_matrix(angle)
}
