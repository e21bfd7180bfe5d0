mod error;
mod image;

pub use error::{CoreError, CoreResult};
pub use image::{GrayImage, Image, PixelFormat};

/// Radius of the 16-sample ring examined around every candidate pixel
pub const RING_RADIUS: usize = 3;

/// Words per descriptor
pub const DESCRIPTOR_WORDS: usize = 16;

/// Bits per descriptor (one per sampling pair)
pub const DESCRIPTOR_BITS: usize = DESCRIPTOR_WORDS * 16;

/// Key-point ≙ ring-test corner at an integer pixel of the original frame
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Keypoint {
    pub x: usize,
    pub y: usize,
    pub size: f32,
}

impl Keypoint {
    /// Nominal size shared by every detected keypoint
    pub const SIZE: f32 = (RING_RADIUS + 3) as f32;

    pub fn new(x: usize, y: usize) -> Self {
        Self { x, y, size: Self::SIZE }
    }
}

/// 256-bit binary descriptor = 16 words of 16 bits
pub type Descriptor = [u16; DESCRIPTOR_WORDS];

/// Best training candidate for one query descriptor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DMatch {
    pub query_idx: usize,
    pub train_idx: usize,
    pub distance: u32,
}

/// Detection and description capability.
///
/// `detect` never fails: an empty image simply has no keypoints. `compute`
/// reports keypoints that do not belong to the image.
pub trait Feature2D {
    type Error: std::error::Error;

    /// Keypoints in row-major scan order. Recomputed from scratch on every call.
    fn detect(&self, image: &Image) -> Vec<Keypoint>;

    /// One descriptor per keypoint, in keypoint order.
    fn compute(&self, image: &Image, keypoints: &[Keypoint]) -> Result<Vec<Descriptor>, Self::Error>;

    fn detect_and_compute(&self, image: &Image) -> Result<(Vec<Keypoint>, Vec<Descriptor>), Self::Error> {
        let keypoints = self.detect(image);
        let descriptors = self.compute(image, &keypoints)?;
        Ok((keypoints, descriptors))
    }

    fn name(&self) -> &'static str;
}

/// Matching capability against registered training descriptors.
///
/// Results are sparse and positional: entry `i` answers query `i`, `None`
/// when no candidate passed the distance gate.
pub trait DescriptorMatcher {
    /// Registers a training set.
    fn add(&mut self, descriptors: Vec<Descriptor>);

    /// Drops every registered training set.
    fn clear(&mut self);

    /// Always one entry per query, all `None` when no training set is registered.
    fn match_descriptors(&self, query: &[Descriptor]) -> Vec<Option<DMatch>>;

    fn radius_match(&self, query: &[Descriptor], max_distance: f32) -> Vec<Option<DMatch>>;

    fn is_mask_supported(&self) -> bool {
        false
    }
}
