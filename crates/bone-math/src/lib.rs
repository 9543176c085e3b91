//! Bone Math - pole angles for inverse kinematics bone chains
//!
//! Bone Math computes the pole angle an IK constraint needs so that adding a pole
//! target leaves the chain in its rest-pose bend. The math lives in
//! [`core`]; [`rig`] models the armature it is read from and runs the batch
//! calculation.

pub use bone_math_core as core;
pub use bone_math_rig as rig;

pub mod prelude {
    pub use crate::core::{
        get_pole_angle, signed_angle, BoneFrame, BoneMathError, PoleAngleConfig, PoleAngleSolver,
    };
    pub use crate::rig::{
        Armature, BoneHierarchy, BoneId, BoneSelection, CalculatePoleAngle, CalculatePoleAngleConfig,
        Constraint, DegeneratePolicy, IkConstraint, PoleTarget, RigContext, RigError,
    };
    pub use glam;
}
