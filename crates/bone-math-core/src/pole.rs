//! Pole angle of an IK chain.
//!
//! The pole angle is the signed angle between the start bone's X axis and the
//! pole direction projected onto the start bone's X/Z plane, measured about the
//! start bone's Y axis. Writing it into the IK constraint makes the solved chain
//! keep its rest-pose bend when the pole target is introduced.

use glam::Vec3;
use log::trace;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::frame::BoneFrame;
use crate::signed_angle::signed_angle_with_epsilon;
use crate::vector::{checked_direction, DEFAULT_EPSILON};

/// Configuration for [`PoleAngleSolver`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PoleAngleConfig {
    /// Vectors this short (or cross products this close to parallel) are degenerate.
    pub epsilon: f32,
}

impl Default for PoleAngleConfig {
    fn default() -> Self {
        Self {
            epsilon: DEFAULT_EPSILON,
        }
    }
}

/// Stateless pole angle solver.
#[derive(Debug, Clone, Copy, Default)]
pub struct PoleAngleSolver {
    config: PoleAngleConfig,
}

impl PoleAngleSolver {
    pub const fn new(config: PoleAngleConfig) -> Self {
        Self { config }
    }

    pub fn with_defaults() -> Self {
        Self::new(PoleAngleConfig::default())
    }

    pub fn config(&self) -> &PoleAngleConfig {
        &self.config
    }

    /// Compute the pole angle in radians, in `(-π, π]`.
    ///
    /// `start_frame` belongs to the first bone of the chain, `end_position` is the
    /// tail of the last bone and `pole_position` is the pole target, all in the
    /// same space.
    ///
    /// # Errors
    ///
    /// Returns [`BoneMathError::DegenerateInput`](crate::BoneMathError::DegenerateInput)
    /// when the chain has no length, the pole sits on the chain base, the pole lies
    /// on the chain axis, or the bend plane normal runs along the start bone's Y axis.
    pub fn solve(&self, start_frame: &BoneFrame, end_position: Vec3, pole_position: Vec3) -> Result<f32> {
        let epsilon = self.config.epsilon;

        // Unit directions keep the parallel checks below independent of rig scale.
        let chain_axis = checked_direction(end_position - start_frame.head, "chain_axis", epsilon)?;
        let pole_axis = checked_direction(pole_position - start_frame.head, "pole_axis", epsilon)?;
        let bend_normal = checked_direction(chain_axis.cross(pole_axis), "bend_normal", epsilon)?;
        let projected_pole =
            checked_direction(bend_normal.cross(start_frame.y_axis), "projected_pole", epsilon)?;

        let angle = signed_angle_with_epsilon(start_frame.x_axis, projected_pole, start_frame.y_axis, epsilon)?;
        trace!(
            "pole angle {angle:.6} rad (chain axis {chain_axis}, projected pole {projected_pole})"
        );
        Ok(angle)
    }
}

/// Compute the pole angle with the default configuration.
pub fn get_pole_angle(start_frame: &BoneFrame, end_position: Vec3, pole_position: Vec3) -> Result<f32> {
    PoleAngleSolver::with_defaults().solve(start_frame, end_position, pole_position)
}
