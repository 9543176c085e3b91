use bone_math_core::BoneMathError;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum RigError {
    #[error("No armature in context")]
    NoArmature,

    #[error("Pole angles can only be calculated in pose mode")]
    NotInPoseMode,

    #[error("Unknown bone selection `{0}` (expected active, selected or all)")]
    UnknownSelection(String),

    #[error("Bone `{bone}` has degenerate chain geometry")]
    Degenerate {
        bone: String,
        #[source]
        source: BoneMathError,
    },
}

pub type Result<T> = std::result::Result<T, RigError>;
