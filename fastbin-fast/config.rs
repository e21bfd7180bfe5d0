use crate::error::{FastError, FastResult};
use crate::utils::RING_SIZE;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Ring test parameters
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct DetectorConfig {
    /// Minimum intensity difference `t` for a ring sample to count as bright or dark
    pub intensity_threshold: u8,
    /// Minimum run length `N` of equal labels around the ring
    pub arc_length: usize,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            intensity_threshold: 15,
            arc_length: 11,
        }
    }
}

impl DetectorConfig {
    pub fn new(intensity_threshold: u8, arc_length: usize) -> Self {
        Self {
            intensity_threshold,
            arc_length,
        }
    }

    /// Validate configuration parameters
    pub fn validate(&self) -> FastResult<()> {
        if self.arc_length == 0 || self.arc_length > RING_SIZE {
            return Err(FastError::InvalidArcLength(self.arc_length));
        }
        Ok(())
    }

    /// Generate human-readable summary
    pub fn summary(&self) -> String {
        format!("t={}, N={}", self.intensity_threshold, self.arc_length)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cfg = DetectorConfig::default();
        assert_eq!(cfg.intensity_threshold, 15);
        assert_eq!(cfg.arc_length, 11);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn test_invalid_arc_length() {
        assert_eq!(
            DetectorConfig::new(15, 0).validate(),
            Err(FastError::InvalidArcLength(0))
        );
        assert_eq!(
            DetectorConfig::new(15, 17).validate(),
            Err(FastError::InvalidArcLength(17))
        );
        assert!(DetectorConfig::new(0, 16).validate().is_ok());
    }
}
