//! Signed angle between two vectors about a reference normal.

use std::f32::consts::PI;

use glam::Vec3;

use crate::error::Result;
use crate::vector::{checked_direction, DEFAULT_EPSILON};

/// Signed angle from `vector_a` to `vector_b`, measured about `normal`.
///
/// The result lies in `(-π, π]`. Its sign is that of `normal · (b × a)` (with
/// `a` and `b` normalized), the convention IK pole angles use. Opposite vectors
/// always give `+π`.
///
/// # Errors
///
/// Returns [`BoneMathError::DegenerateInput`](crate::BoneMathError::DegenerateInput)
/// if any argument has a near-zero or non-finite length.
pub fn signed_angle(vector_a: Vec3, vector_b: Vec3, normal: Vec3) -> Result<f32> {
    signed_angle_with_epsilon(vector_a, vector_b, normal, DEFAULT_EPSILON)
}

/// [`signed_angle`] with an explicit degeneracy threshold.
pub fn signed_angle_with_epsilon(
    vector_a: Vec3,
    vector_b: Vec3,
    normal: Vec3,
    epsilon: f32,
) -> Result<f32> {
    let dir_a = checked_direction(vector_a, "vector_a", epsilon)?;
    let dir_b = checked_direction(vector_b, "vector_b", epsilon)?;
    let normal = checked_direction(normal, "normal", epsilon)?;

    let cos_component = dir_a.dot(dir_b);
    let sin_component = normal.dot(dir_b.cross(dir_a));
    let angle = sin_component.atan2(cos_component);

    // atan2(-0.0, -1.0) lands on -π
    if angle <= -PI {
        Ok(PI)
    } else {
        Ok(angle)
    }
}
