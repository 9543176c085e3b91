use glam::{Mat4, Quat, Vec3};
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::vector::{checked_direction, DEFAULT_EPSILON};

/// Position and local axes of a bone, captured at a single instant.
///
/// `y_axis` runs along the bone from head to tail. `x_axis` and `z_axis` span the
/// plane the bone bends in.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct BoneFrame {
    pub head: Vec3,
    pub x_axis: Vec3,
    pub y_axis: Vec3,
    pub z_axis: Vec3,
}

impl BoneFrame {
    pub fn new(head: Vec3, x_axis: Vec3, y_axis: Vec3, z_axis: Vec3) -> Self {
        Self {
            head,
            x_axis,
            y_axis,
            z_axis,
        }
    }

    /// Read a frame from a bone matrix. Scale is divided out of the axis columns.
    pub fn from_matrix(matrix: Mat4) -> Self {
        Self {
            head: matrix.w_axis.truncate(),
            x_axis: matrix.x_axis.truncate().normalize_or_zero(),
            y_axis: matrix.y_axis.truncate().normalize_or_zero(),
            z_axis: matrix.z_axis.truncate().normalize_or_zero(),
        }
    }

    /// Build the frame of a bone running from `head` to `tail`, rolled by `roll`
    /// radians about its own length.
    pub fn from_head_tail_roll(head: Vec3, tail: Vec3, roll: f32) -> Result<Self> {
        let y_axis = checked_direction(tail - head, "bone_axis", DEFAULT_EPSILON)?;
        let rotation = Quat::from_axis_angle(y_axis, roll) * Quat::from_rotation_arc(Vec3::Y, y_axis);

        Ok(Self {
            head,
            x_axis: rotation * Vec3::X,
            y_axis,
            z_axis: rotation * Vec3::Z,
        })
    }

    pub fn to_matrix(&self) -> Mat4 {
        Mat4::from_cols(
            self.x_axis.extend(0.0),
            self.y_axis.extend(0.0),
            self.z_axis.extend(0.0),
            self.head.extend(1.0),
        )
    }

    /// Tail position of a bone of the given length.
    pub fn tail(&self, length: f32) -> Vec3 {
        self.head + self.y_axis * length
    }

    pub fn is_orthonormal(&self, tolerance: f32) -> bool {
        let unit = |axis: Vec3| (axis.length() - 1.0).abs() <= tolerance;
        unit(self.x_axis)
            && unit(self.y_axis)
            && unit(self.z_axis)
            && self.x_axis.dot(self.y_axis).abs() <= tolerance
            && self.y_axis.dot(self.z_axis).abs() <= tolerance
            && self.z_axis.dot(self.x_axis).abs() <= tolerance
    }
}

impl Default for BoneFrame {
    fn default() -> Self {
        Self {
            head: Vec3::ZERO,
            x_axis: Vec3::X,
            y_axis: Vec3::Y,
            z_axis: Vec3::Z,
        }
    }
}

impl From<Mat4> for BoneFrame {
    fn from(matrix: Mat4) -> Self {
        Self::from_matrix(matrix)
    }
}
