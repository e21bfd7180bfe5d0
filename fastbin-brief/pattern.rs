use fastbin_core::DESCRIPTOR_BITS;
use rand::rngs::StdRng;
use rand::SeedableRng;
use rand_distr::{Distribution, Normal};
use crate::error::{BriefError, BriefResult};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// One comparison per descriptor bit
pub const PATTERN_PAIRS: usize = DESCRIPTOR_BITS;

/// Sampling pattern parameters
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct PatternConfig {
    /// Side `S` of the square neighborhood the offsets fall in
    pub patch_size: usize,
    /// Fixed seed for reproducible patterns, OS entropy when `None`
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub seed: Option<u64>,
}

impl Default for PatternConfig {
    fn default() -> Self {
        Self {
            patch_size: 25,
            seed: None,
        }
    }
}

impl PatternConfig {
    pub fn seeded(seed: u64) -> Self {
        Self {
            seed: Some(seed),
            ..Self::default()
        }
    }

    pub fn half_width(&self) -> usize {
        self.patch_size / 2
    }

    pub fn validate(&self) -> BriefResult<()> {
        if self.patch_size < 3 || self.patch_size % 2 == 0 {
            return Err(BriefError::InvalidPatchSize(self.patch_size));
        }
        Ok(())
    }
}

/// Two offsets whose intensities are compared for one descriptor bit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SamplePair {
    pub a: (i32, i32),
    pub b: (i32, i32),
}

/// Ordered set of [`PATTERN_PAIRS`] offset pairs, immutable once built
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SamplingPattern {
    pairs: Vec<SamplePair>,
    half_width: usize,
}

impl SamplingPattern {
    /// Draws `2 * PATTERN_PAIRS` points.
    ///
    /// Each coordinate is sampled from N(0, S/2), truncated to an integer and
    /// reduced modulo `S/2 + 1`, which keeps it within `[-S/2, S/2]`. Points
    /// are paired in generation order.
    pub fn generate(cfg: &PatternConfig) -> BriefResult<Self> {
        cfg.validate()?;

        let half_width = cfg.half_width();
        let modulus = half_width as i32 + 1;
        let normal = Normal::new(0.0f32, cfg.patch_size as f32 / 2.0)?;
        let mut rng = match cfg.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        let mut point = || {
            let x = normal.sample(&mut rng) as i32 % modulus;
            let y = normal.sample(&mut rng) as i32 % modulus;
            (x, y)
        };

        let pairs = (0..PATTERN_PAIRS)
            .map(|_| {
                let a = point();
                let b = point();
                SamplePair { a, b }
            })
            .collect();

        Ok(Self { pairs, half_width })
    }

    /// Wraps an explicit pattern, checking its length and extent.
    pub fn from_pairs(pairs: Vec<SamplePair>, half_width: usize) -> BriefResult<Self> {
        if pairs.len() != PATTERN_PAIRS {
            return Err(BriefError::InvalidPatternLength {
                expected: PATTERN_PAIRS,
                actual: pairs.len(),
            });
        }

        let limit = half_width as i32;
        for pair in &pairs {
            for (dx, dy) in [pair.a, pair.b] {
                if dx.abs() > limit || dy.abs() > limit {
                    return Err(BriefError::PatternOutOfBounds { dx, dy, half_width });
                }
            }
        }

        Ok(Self { pairs, half_width })
    }

    pub fn pairs(&self) -> &[SamplePair] {
        &self.pairs
    }

    /// Largest absolute offset any pair may use
    pub fn half_width(&self) -> usize {
        self.half_width
    }
}
