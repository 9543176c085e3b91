//! Core geometry for computing the pole angle of an IK bone chain.
//!
//! Everything in this crate is a pure function of its arguments: callers capture
//! a [`BoneFrame`] for the first bone of the chain, the tail position of the last
//! bone and the pole target position, and get back the signed angle (radians)
//! to store in the IK constraint.
//!
//! ```text
//! BoneFrame + end + pole ──► PoleAngleSolver ──► signed_angle ──► radians
//! ```
//!
//! The inputs are only meaningful when captured from a consistent pose, ideally
//! the rest pose. Switching the host into that pose is the caller's job.

pub mod error;
pub mod frame;
pub mod pole;
pub mod signed_angle;
pub mod vector;

pub use error::{BoneMathError, Result};
pub use frame::BoneFrame;
pub use pole::{get_pole_angle, PoleAngleConfig, PoleAngleSolver};
pub use signed_angle::{signed_angle, signed_angle_with_epsilon};
pub use vector::{angle_between, checked_direction, DEFAULT_EPSILON};
