mod config;

use std::path::Path;

use fastbin_brief::{BriefError, BriefExtractor, PatternConfig, SamplingPattern};
use fastbin_core::{CoreError, Descriptor, Feature2D, Image, Keypoint};
use fastbin_fast::{DetectorConfig, FastDetector, FastError};
use fastbin_match::MatchError;
use log::debug;

pub use config::{PipelineBuilder, PipelineConfig};
pub use fastbin_brief;
pub use fastbin_core;
pub use fastbin_fast;
pub use fastbin_match;

#[derive(thiserror::Error, Debug)]
pub enum PipelineError {
    #[error("Image error: {0}")]
    Image(#[from] CoreError),
    #[error("FAST error: {0}")]
    Fast(#[from] FastError),
    #[error("Descriptor error: {0}")]
    Brief(#[from] BriefError),
    #[error("Matcher error: {0}")]
    Match(#[from] MatchError),
    #[error("Image decoding error: {0}")]
    Decode(#[from] image::ImageError),
    #[cfg(feature = "serde")]
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[cfg(feature = "serde")]
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[cfg(feature = "serde")]
    #[error("TOML parse error: {0}")]
    TomlDe(#[from] toml::de::Error),
    #[cfg(feature = "serde")]
    #[error("TOML write error: {0}")]
    TomlSer(#[from] toml::ser::Error),
}

pub type PipelineResult<T> = Result<T, PipelineError>;

/// FAST_Binary feature pipeline: ring-test keypoints described by the
/// random-pair comparison descriptor.
///
/// Detection is stateless. The sampling pattern is generated on first use and
/// kept for the lifetime of the value, so descriptors from one `FastBinary`
/// are comparable with each other but not with those of another instance
/// unless both were built with the same seed.
#[derive(Debug, Clone, Default)]
pub struct FastBinary {
    detector: FastDetector,
    extractor: BriefExtractor,
}

impl FastBinary {
    pub fn new(detector_cfg: DetectorConfig, pattern_cfg: PatternConfig) -> PipelineResult<Self> {
        Ok(Self {
            detector: FastDetector::new(detector_cfg)?,
            extractor: BriefExtractor::new(pattern_cfg)?,
        })
    }

    pub fn detector(&self) -> &FastDetector {
        &self.detector
    }

    pub fn extractor(&self) -> &BriefExtractor {
        &self.extractor
    }

    /// Generates the sampling pattern now instead of on the first `compute`.
    pub fn initialize_pattern(&self) -> PipelineResult<&SamplingPattern> {
        Ok(self.extractor.initialize_pattern()?)
    }
}

impl Feature2D for FastBinary {
    type Error = PipelineError;

    fn detect(&self, image: &Image) -> Vec<Keypoint> {
        self.detector.detect_keypoints(image)
    }

    fn compute(&self, image: &Image, keypoints: &[Keypoint]) -> PipelineResult<Vec<Descriptor>> {
        Ok(self.extractor.compute(image, keypoints)?)
    }

    /// Same result as `detect` followed by `compute`, smoothing the image once.
    fn detect_and_compute(&self, image: &Image) -> PipelineResult<(Vec<Keypoint>, Vec<Descriptor>)> {
        let gray = FastDetector::preprocess(image);
        let keypoints = self.detector.detect_keypoints_preprocessed(&gray);
        let descriptors = self.extractor.compute_preprocessed(&gray, &keypoints)?;
        debug!("{}: {} keypoints described", self.name(), keypoints.len());
        Ok((keypoints, descriptors))
    }

    fn name(&self) -> &'static str {
        "FAST_Binary"
    }
}

/// Decodes an image file into a three-channel [`Image`].
pub fn load_image<P: AsRef<Path>>(path: P) -> PipelineResult<Image> {
    let rgb = image::open(path)?.to_rgb8();
    let (width, height) = rgb.dimensions();
    Ok(Image::rgb(width as usize, height as usize, rgb.into_raw())?)
}
