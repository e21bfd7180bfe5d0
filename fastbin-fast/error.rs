#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum FastError {
    #[error("Invalid arc length: {0} (must be 1-16)")]
    InvalidArcLength(usize),
}

pub type FastResult<T> = Result<T, FastError>;
