/// Errors raised while building or validating image buffers.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    #[error("Image data length mismatch: expected {expected_len}, got {actual_len}")]
    InvalidImageData { expected_len: usize, actual_len: usize },

    #[error("Image dimensions {width}x{height} overflow the address space")]
    DimensionOverflow { width: usize, height: usize },
}

pub type CoreResult<T> = Result<T, CoreError>;
