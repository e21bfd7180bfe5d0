use fastbin_core::{GrayImage, Image, Keypoint, RING_RADIUS};
use log::debug;
use crate::config::DetectorConfig;
use crate::corner_detection::CornerDetector;
use crate::error::FastResult;

/// Ring-test keypoint scanner.
///
/// Holds no per-image state: every call preprocesses its input and scans it
/// from scratch.
#[derive(Debug, Clone)]
pub struct FastDetector {
    cfg: DetectorConfig,
}

impl Default for FastDetector {
    fn default() -> Self {
        Self {
            cfg: DetectorConfig::default(),
        }
    }
}

impl FastDetector {
    /// Creates a new detector with validation
    pub fn new(cfg: DetectorConfig) -> FastResult<Self> {
        cfg.validate()?;
        Ok(Self { cfg })
    }

    /// Grayscale conversion followed by 5x5 smoothing.
    pub fn preprocess(img: &Image) -> GrayImage {
        img.to_gray().gaussian_blur_5x5()
    }

    /// Detect keypoints on a color or grayscale image
    pub fn detect_keypoints(&self, img: &Image) -> Vec<Keypoint> {
        self.detect_keypoints_preprocessed(&Self::preprocess(img))
    }

    /// Scan an already smoothed grayscale image.
    ///
    /// Every pixel passing the ring test yields a keypoint, in row-major order.
    /// No suppression is applied, so a corner usually produces a small cluster.
    pub fn detect_keypoints_preprocessed(&self, gray: &GrayImage) -> Vec<Keypoint> {
        if gray.is_empty() {
            debug!("empty image, no keypoints");
            return Vec::new();
        }

        let padded = gray.pad_replicate(RING_RADIUS);
        let mut keypoints = Vec::new();

        for y in 0..gray.height() {
            for x in 0..gray.width() {
                if CornerDetector::is_corner(
                    &padded,
                    x + RING_RADIUS,
                    y + RING_RADIUS,
                    self.cfg.arc_length,
                    self.cfg.intensity_threshold,
                ) {
                    keypoints.push(Keypoint::new(x, y));
                }
            }
        }

        debug!(
            "detected {} keypoints on {}x{} ({})",
            keypoints.len(),
            gray.width(),
            gray.height(),
            self.cfg.summary()
        );
        keypoints
    }

    /// Get detector configuration
    pub fn config(&self) -> &DetectorConfig {
        &self.cfg
    }
}
