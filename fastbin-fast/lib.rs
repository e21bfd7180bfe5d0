mod config;
mod corner_detection;
mod detector;
mod error;
mod types;
mod utils;

pub use config::DetectorConfig;
pub use corner_detection::CornerDetector;
pub use detector::FastDetector;
pub use error::{FastError, FastResult};
pub use types::RingLabel;
pub use utils::{has_run_of, longest_circular_run, RING_SIZE};
