#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum BriefError {
    #[error("Invalid patch size: {0} (must be odd and at least 3)")]
    InvalidPatchSize(usize),

    #[error("Sampling pattern has {actual} pairs, expected {expected}")]
    InvalidPatternLength { expected: usize, actual: usize },

    #[error("Sampling offset ({dx}, {dy}) outside half-width {half_width}")]
    PatternOutOfBounds { dx: i32, dy: i32, half_width: usize },

    #[error("Keypoint {index} at ({x}, {y}) outside {width}x{height} image")]
    KeypointOutOfBounds {
        index: usize,
        x: usize,
        y: usize,
        width: usize,
        height: usize,
    },

    #[error("Sampling distribution: {0}")]
    Distribution(#[from] rand_distr::NormalError),
}

pub type BriefResult<T> = Result<T, BriefError>;
