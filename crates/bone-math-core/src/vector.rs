use glam::Vec3;

use crate::error::{BoneMathError, Result};

/// Lengths at or below this are treated as zero.
pub const DEFAULT_EPSILON: f32 = 1e-6;

/// Normalize `vector`, failing when it has no usable direction.
///
/// `name` identifies the vector in the returned [`BoneMathError::DegenerateInput`].
pub fn checked_direction(vector: Vec3, name: &'static str, epsilon: f32) -> Result<Vec3> {
    let degenerate = |length| BoneMathError::DegenerateInput {
        vector: name,
        length,
    };
    if !vector.is_finite() {
        return Err(degenerate(vector.length()));
    }

    // Normalize a copy scaled by its largest component so the squared length
    // cannot overflow for large finite vectors.
    let scale = vector.abs().max_element();
    if scale == 0.0 {
        return Err(degenerate(0.0));
    }
    let scaled = vector / scale;
    let scaled_length = scaled.length();
    let length = scale * scaled_length;
    if length <= epsilon {
        return Err(degenerate(length));
    }
    Ok(scaled / scaled_length)
}

/// Unsigned angle between two vectors, in `[0, π]`.
pub fn angle_between(vector_a: Vec3, vector_b: Vec3) -> Result<f32> {
    let dir_a = checked_direction(vector_a, "vector_a", DEFAULT_EPSILON)?;
    let dir_b = checked_direction(vector_b, "vector_b", DEFAULT_EPSILON)?;
    Ok(dir_a.cross(dir_b).length().atan2(dir_a.dot(dir_b)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f32::consts::{FRAC_PI_2, FRAC_PI_4, PI};

    #[test]
    fn direction_has_unit_length() {
        let dir = checked_direction(Vec3::new(3.0, -4.0, 12.0), "v", DEFAULT_EPSILON).unwrap();
        assert_relative_eq!(dir.length(), 1.0, epsilon = 1e-6);
        assert_relative_eq!(dir.x, 3.0 / 13.0, epsilon = 1e-6);
    }

    #[test]
    fn zero_vector_is_rejected() {
        let err = checked_direction(Vec3::ZERO, "chain_axis", DEFAULT_EPSILON).unwrap_err();
        assert_eq!(
            err,
            BoneMathError::DegenerateInput {
                vector: "chain_axis",
                length: 0.0
            }
        );
    }

    #[test]
    fn tiny_vector_is_rejected() {
        assert!(checked_direction(Vec3::splat(1e-8), "v", DEFAULT_EPSILON).is_err());
        assert!(checked_direction(Vec3::splat(1e-3), "v", DEFAULT_EPSILON).is_ok());
    }

    #[test]
    fn non_finite_vector_is_rejected() {
        assert!(checked_direction(Vec3::new(f32::NAN, 0.0, 1.0), "v", DEFAULT_EPSILON).is_err());
        assert!(checked_direction(Vec3::new(f32::INFINITY, 0.0, 0.0), "v", DEFAULT_EPSILON).is_err());
    }

    #[test]
    fn huge_finite_vector_keeps_its_direction() {
        let dir = checked_direction(Vec3::new(1e20, 0.0, 0.0), "v", DEFAULT_EPSILON).unwrap();
        assert_eq!(dir, Vec3::X);

        let dir = checked_direction(Vec3::splat(3e38), "v", DEFAULT_EPSILON).unwrap();
        assert_relative_eq!(dir.length(), 1.0, epsilon = 1e-6);
        assert_relative_eq!(dir.x, 1.0 / 3.0f32.sqrt(), epsilon = 1e-6);

        let dir = checked_direction(Vec3::new(-2e25, 0.0, 2e25), "v", DEFAULT_EPSILON).unwrap();
        assert_relative_eq!(dir.z, std::f32::consts::FRAC_1_SQRT_2, epsilon = 1e-6);
    }

    #[test]
    fn angle_between_known_values() {
        assert_relative_eq!(angle_between(Vec3::X, Vec3::Y).unwrap(), FRAC_PI_2, epsilon = 1e-6);
        assert_relative_eq!(
            angle_between(Vec3::X, Vec3::new(1.0, 1.0, 0.0)).unwrap(),
            FRAC_PI_4,
            epsilon = 1e-6
        );
        assert_relative_eq!(angle_between(Vec3::Z, -Vec3::Z).unwrap(), PI, epsilon = 1e-6);
        assert_eq!(angle_between(Vec3::Y, Vec3::Y * 5.0).unwrap(), 0.0);
    }
}
