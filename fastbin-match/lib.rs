mod error;

use fastbin_core::{DMatch, Descriptor, DescriptorMatcher};
use log::{debug, warn};

pub use error::{MatchError, MatchResult};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Number of differing bits between two descriptors (0-256)
#[inline]
pub fn hamming_distance(a: &Descriptor, b: &Descriptor) -> u32 {
    a.iter().zip(b.iter()).map(|(x, y)| (x ^ y).count_ones()).sum()
}

/// Matcher parameters
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct MatcherConfig {
    /// Absolute Hamming ceiling: a best candidate is kept only when its distance
    /// is strictly below this value. Not a best/second-best ratio.
    pub distance_gate: f32,
}

impl Default for MatcherConfig {
    fn default() -> Self {
        Self { distance_gate: 1.5 }
    }
}

impl MatcherConfig {
    pub fn validate(&self) -> MatchResult<()> {
        if self.distance_gate.is_nan() || self.distance_gate < 0.0 {
            return Err(MatchError::InvalidDistanceGate(self.distance_gate));
        }
        Ok(())
    }
}

/// Brute-force nearest-neighbour matcher over Hamming distance.
///
/// Several training sets may be registered but only the first one is
/// searched. Masks are not supported.
#[derive(Debug, Clone, Default)]
pub struct HammingMatcher {
    cfg: MatcherConfig,
    train: Vec<Vec<Descriptor>>,
}

impl HammingMatcher {
    pub fn new(cfg: MatcherConfig) -> MatchResult<Self> {
        cfg.validate()?;
        Ok(Self {
            cfg,
            train: Vec::new(),
        })
    }

    pub fn set_distance_gate(&mut self, gate: f32) -> MatchResult<()> {
        let cfg = MatcherConfig { distance_gate: gate };
        cfg.validate()?;
        self.cfg = cfg;
        Ok(())
    }

    pub fn distance_gate(&self) -> f32 {
        self.cfg.distance_gate
    }

    /// The training set that queries are matched against
    pub fn train_descriptors(&self) -> Option<&[Descriptor]> {
        self.train.first().map(Vec::as_slice)
    }

    /// Copy of this matcher, optionally without its training data
    pub fn clone_matcher(&self, empty_train_data: bool) -> Self {
        let mut copy = self.clone();
        if empty_train_data {
            copy.clear();
        }
        copy
    }

    fn nearest(train: &[Descriptor], query_idx: usize, query: &Descriptor, gate: f32) -> Option<DMatch> {
        let mut best: Option<(usize, u32)> = None;
        for (train_idx, candidate) in train.iter().enumerate() {
            let distance = hamming_distance(query, candidate);
            if best.is_none_or(|(_, d)| distance < d) {
                best = Some((train_idx, distance));
            }
        }

        best.filter(|&(_, distance)| (distance as f32) < gate)
            .map(|(train_idx, distance)| DMatch {
                query_idx,
                train_idx,
                distance,
            })
    }
}

impl DescriptorMatcher for HammingMatcher {
    fn add(&mut self, descriptors: Vec<Descriptor>) {
        if !self.train.is_empty() {
            warn!(
                "training set #{} registered, only the first set is searched",
                self.train.len() + 1
            );
        }
        self.train.push(descriptors);
    }

    fn clear(&mut self) {
        self.train.clear();
    }

    fn match_descriptors(&self, query: &[Descriptor]) -> Vec<Option<DMatch>> {
        let train = match self.train_descriptors() {
            Some(train) if !train.is_empty() => train,
            _ => {
                debug!("no training descriptors, {} queries unmatched", query.len());
                return vec![None; query.len()];
            }
        };

        let gate = self.cfg.distance_gate;
        let matches: Vec<Option<DMatch>> = query
            .iter()
            .enumerate()
            .map(|(i, q)| Self::nearest(train, i, q, gate))
            .collect();

        debug!(
            "matched {}/{} queries against {} training descriptors (gate {})",
            matches.iter().flatten().count(),
            query.len(),
            train.len(),
            gate
        );
        matches
    }

    /// Same as [`match_descriptors`](DescriptorMatcher::match_descriptors):
    /// `max_distance` is not used, the distance gate applies.
    fn radius_match(&self, query: &[Descriptor], max_distance: f32) -> Vec<Option<DMatch>> {
        warn!(
            "radius_match ignores max_distance {}, using nearest neighbour with gate {}",
            max_distance, self.cfg.distance_gate
        );
        self.match_descriptors(query)
    }
}
