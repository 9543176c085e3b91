//! Host-side integration for pole angle calculation.
//!
//! Provides a small armature model, IK chain discovery over any
//! [`BoneHierarchy`], and the batch [`CalculatePoleAngle`] operator that feeds
//! rest-pose snapshots into [`bone_math_core`] and writes the results back into
//! each bone's IK constraint.

pub mod armature;
pub mod chain;
pub mod constraint;
pub mod error;
pub mod operator;

pub use armature::{Armature, Bone, BoneHierarchy, BoneId, PosePosition, PosePositionGuard};
pub use chain::find_chain_start;
pub use constraint::{Constraint, IkConstraint, PoleTarget};
pub use error::{Result, RigError};
pub use operator::{
    BoneSelection, CalculatePoleAngle, CalculatePoleAngleConfig, CalculationReport, DegeneratePolicy,
    InteractionMode, OperatorStatus, RigContext, SkipReason,
};
