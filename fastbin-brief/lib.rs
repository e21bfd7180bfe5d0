mod error;
mod pattern;

use std::cell::OnceCell;

use fastbin_core::{Descriptor, GrayImage, Image, Keypoint, DESCRIPTOR_WORDS};
use log::debug;

pub use error::{BriefError, BriefResult};
pub use pattern::{PatternConfig, SamplePair, SamplingPattern, PATTERN_PAIRS};

/// Descriptor extractor owning a lazily generated [`SamplingPattern`].
///
/// The pattern is generated on the first call to [`initialize_pattern`] (which
/// every `compute*` call goes through) and reused for the lifetime of the
/// extractor. The cell is not synchronized, so an extractor is `!Sync`: share
/// it across threads only behind your own lock.
///
/// [`initialize_pattern`]: BriefExtractor::initialize_pattern
#[derive(Debug, Clone)]
pub struct BriefExtractor {
    cfg: PatternConfig,
    pattern: OnceCell<SamplingPattern>,
}

impl Default for BriefExtractor {
    fn default() -> Self {
        Self {
            cfg: PatternConfig::default(),
            pattern: OnceCell::new(),
        }
    }
}

impl BriefExtractor {
    pub fn new(cfg: PatternConfig) -> BriefResult<Self> {
        cfg.validate()?;
        Ok(Self {
            cfg,
            pattern: OnceCell::new(),
        })
    }

    /// Extractor that uses `pattern` instead of generating one.
    pub fn with_pattern(pattern: SamplingPattern) -> Self {
        Self {
            cfg: PatternConfig {
                patch_size: 2 * pattern.half_width() + 1,
                seed: None,
            },
            pattern: OnceCell::from(pattern),
        }
    }

    /// Generates the sampling pattern if it is absent. Idempotent.
    pub fn initialize_pattern(&self) -> BriefResult<&SamplingPattern> {
        if let Some(pattern) = self.pattern.get() {
            return Ok(pattern);
        }

        let generated = SamplingPattern::generate(&self.cfg)?;
        debug!(
            "generated sampling pattern: {} pairs, S={}, seed={:?}",
            generated.pairs().len(),
            self.cfg.patch_size,
            self.cfg.seed
        );
        Ok(self.pattern.get_or_init(|| generated))
    }

    pub fn pattern(&self) -> Option<&SamplingPattern> {
        self.pattern.get()
    }

    pub fn config(&self) -> &PatternConfig {
        &self.cfg
    }

    /// Grayscale + 5x5 smoothing, then [`compute_preprocessed`](Self::compute_preprocessed).
    pub fn compute(&self, img: &Image, kps: &[Keypoint]) -> BriefResult<Vec<Descriptor>> {
        let gray = img.to_gray().gaussian_blur_5x5();
        self.compute_preprocessed(&gray, kps)
    }

    /// One descriptor per keypoint, in keypoint order.
    ///
    /// Bit `15 - j` of word `w` is set when the sample at the first point of
    /// pair `16 * w + j` is strictly darker than the sample at the second.
    pub fn compute_preprocessed(&self, gray: &GrayImage, kps: &[Keypoint]) -> BriefResult<Vec<Descriptor>> {
        let pattern = self.initialize_pattern()?;

        for (index, kp) in kps.iter().enumerate() {
            if kp.x >= gray.width() || kp.y >= gray.height() {
                return Err(BriefError::KeypointOutOfBounds {
                    index,
                    x: kp.x,
                    y: kp.y,
                    width: gray.width(),
                    height: gray.height(),
                });
            }
        }

        let border = pattern.half_width() + 1;
        let padded = gray.pad_replicate(border);

        let descriptors: Vec<Descriptor> = kps
            .iter()
            .map(|kp| describe(&padded, pattern, kp.x + border, kp.y + border))
            .collect();

        debug!("computed {} descriptors", descriptors.len());
        Ok(descriptors)
    }
}

fn describe(padded: &GrayImage, pattern: &SamplingPattern, cx: usize, cy: usize) -> Descriptor {
    let sample = |(dx, dy): (i32, i32)| {
        padded.get((cx as i32 + dx) as usize, (cy as i32 + dy) as usize)
    };

    let mut d = [0u16; DESCRIPTOR_WORDS];
    for (word, pairs) in d.iter_mut().zip(pattern.pairs().chunks_exact(16)) {
        for (j, pair) in pairs.iter().enumerate() {
            if sample(pair.a) < sample(pair.b) {
                *word |= 1 << (15 - j);
            }
        }
    }
    d
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Horizontal ramp, 8 intensity levels per column
    fn create_ramp_image(width: usize, height: usize) -> Image {
        let data = (0..height)
            .flat_map(|_| (0..width).map(|x| (x * 8) as u8))
            .collect();
        Image::gray(width, height, data).unwrap()
    }

    fn create_textured_image(width: usize, height: usize) -> Image {
        let data = (0..width * height)
            .map(|i| {
                let (x, y) = (i % width, i / width);
                (((x * 37) ^ (y * 91)) % 251) as u8
            })
            .collect();
        Image::gray(width, height, data).unwrap()
    }

    fn tie_pair() -> SamplePair {
        SamplePair { a: (0, 5), b: (0, -5) }
    }

    #[test]
    fn test_pattern_generated_lazily_once() {
        let extractor = BriefExtractor::new(PatternConfig::default()).unwrap();
        assert!(extractor.pattern().is_none());

        let img = create_textured_image(40, 40);
        let kps = [Keypoint::new(10, 10), Keypoint::new(20, 30)];
        let first = extractor.compute(&img, &kps).unwrap();
        let pattern = extractor.pattern().unwrap().clone();

        let other = create_ramp_image(32, 32);
        let _ = extractor.compute(&other, &[Keypoint::new(1, 1)]).unwrap();
        let second = extractor.compute(&img, &kps).unwrap();

        assert_eq!(extractor.pattern(), Some(&pattern));
        assert_eq!(first, second);
    }

    #[test]
    fn test_initialize_is_idempotent() {
        let extractor = BriefExtractor::default();
        let a = extractor.initialize_pattern().unwrap().clone();
        let b = extractor.initialize_pattern().unwrap();
        assert_eq!(&a, b);
    }

    #[test]
    fn test_empty_keypoints_still_initialize() {
        let extractor = BriefExtractor::default();
        let img = Image::gray(0, 0, Vec::new()).unwrap();
        assert!(extractor.compute(&img, &[]).unwrap().is_empty());
        assert!(extractor.pattern().is_some());
    }

    #[test]
    fn test_descriptor_count_and_order() {
        let extractor = BriefExtractor::new(PatternConfig::seeded(3)).unwrap();
        let img = create_textured_image(48, 48);
        let kps: Vec<Keypoint> = (0..6).map(|i| Keypoint::new(5 + 6 * i, 40 - 5 * i)).collect();

        let all = extractor.compute(&img, &kps).unwrap();
        assert_eq!(all.len(), kps.len());
        for (kp, d) in kps.iter().zip(&all) {
            assert_eq!(&extractor.compute(&img, &[*kp]).unwrap()[0], d);
        }
    }

    #[test]
    fn test_same_seed_same_descriptors() {
        let img = create_textured_image(48, 48);
        let kps = [Keypoint::new(24, 24), Keypoint::new(0, 47)];
        let a = BriefExtractor::new(PatternConfig::seeded(11)).unwrap();
        let b = BriefExtractor::new(PatternConfig::seeded(11)).unwrap();
        assert_eq!(a.compute(&img, &kps).unwrap(), b.compute(&img, &kps).unwrap());
    }

    #[test]
    fn test_bit_order_and_ties() {
        let mut pairs = vec![tie_pair(); PATTERN_PAIRS];
        // word 0, j = 0: left darker than right on a ramp
        pairs[0] = SamplePair { a: (-1, 0), b: (1, 0) };
        // word 0, j = 1: reversed comparison
        pairs[1] = SamplePair { a: (1, 0), b: (-1, 0) };
        // word 15, j = 15
        pairs[255] = SamplePair { a: (-12, 3), b: (12, -3) };
        let extractor = BriefExtractor::with_pattern(SamplingPattern::from_pairs(pairs, 12).unwrap());

        let img = create_ramp_image(32, 32);
        let d = extractor.compute(&img, &[Keypoint::new(16, 16)]).unwrap()[0];

        assert_eq!(d[0], 0x8000);
        assert_eq!(d[15], 0x0001);
        assert!(d[1..15].iter().all(|&w| w == 0));
    }

    #[test]
    fn test_flat_image_gives_zero_descriptor() {
        let extractor = BriefExtractor::default();
        let img = Image::filled(30, 30, 90).unwrap();
        let d = extractor.compute(&img, &[Keypoint::new(0, 0), Keypoint::new(29, 29)]).unwrap();
        assert_eq!(d, vec![[0u16; DESCRIPTOR_WORDS]; 2]);
    }

    #[test]
    fn test_keypoint_out_of_bounds() {
        let extractor = BriefExtractor::default();
        let img = Image::filled(10, 10, 0).unwrap();
        let result = extractor.compute(&img, &[Keypoint::new(2, 2), Keypoint::new(10, 3)]);
        assert!(matches!(
            result,
            Err(BriefError::KeypointOutOfBounds { index: 1, x: 10, y: 3, .. })
        ));
    }

    #[test]
    fn test_with_pattern_config() {
        let pattern = SamplingPattern::generate(&PatternConfig::seeded(5)).unwrap();
        let extractor = BriefExtractor::with_pattern(pattern.clone());
        assert_eq!(extractor.config().patch_size, 25);
        assert_eq!(extractor.pattern(), Some(&pattern));
    }
}
