//! 4x4 transformation matrix constructors.

use nalgebra::{Matrix4, Vector3};

/// Builders for the transforms the scene model composes.
///
/// All composition in this crate is by post-multiplication: `m * Transform::translation(..)`
/// applies the translation in the local space of `m`.
pub struct Transform;

impl Transform {
    /// Create a rotation matrix about the vertical (Y) axis, in radians.
    pub fn rotation_y(angle: f32) -> Matrix4<f32> {
        Matrix4::new_rotation(Vector3::new(0.0, angle, 0.0))
    }

    /// Create an anisotropic scale matrix.
    pub fn scaling(sx: f32, sy: f32, sz: f32) -> Matrix4<f32> {
        Matrix4::new_nonuniform_scaling(&Vector3::new(sx, sy, sz))
    }

    /// Create a translation matrix.
    pub fn translation(x: f32, y: f32, z: f32) -> Matrix4<f32> {
        Matrix4::new_translation(&Vector3::new(x, y, z))
    }
}
