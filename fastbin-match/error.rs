#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum MatchError {
    #[error("Invalid distance gate: {0} (must be a non-negative number)")]
    InvalidDistanceGate(f32),
}

pub type MatchResult<T> = Result<T, MatchError>;
