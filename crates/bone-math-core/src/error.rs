use thiserror::Error;

#[derive(Error, Debug, Clone, Copy, PartialEq)]
pub enum BoneMathError {
    #[error("Degenerate input: `{vector}` has a near-zero or non-finite length ({length})")]
    DegenerateInput { vector: &'static str, length: f32 },
}

pub type Result<T> = std::result::Result<T, BoneMathError>;
