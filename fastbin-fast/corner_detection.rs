use fastbin_core::{GrayImage, RING_RADIUS};
use crate::types::RingLabel;
use crate::utils::{has_run_of, RING_SIZE};

/// Circular neighborhood corner test
pub struct CornerDetector;

impl CornerDetector {
    /// Radius-3 ring offsets `(dx, dy)`, clockwise from the top
    pub const RING_OFFSETS: [(i32, i32); RING_SIZE] = [
        (0, -3), (1, -3), (2, -2), (3, -1),
        (3, 0), (3, 1), (2, 2), (1, 3),
        (0, 3), (-1, 3), (-2, 2), (-3, 1),
        (-3, 0), (-3, -1), (-2, -2), (-1, -3),
    ];

    /// Top, right, bottom and left samples, read first
    pub const CARDINAL: [usize; 4] = [0, 4, 8, 12];

    const SECONDARY: [usize; 12] = [1, 2, 3, 5, 6, 7, 9, 10, 11, 13, 14, 15];

    /// Cardinal samples of one polarity needed to read the rest of the ring
    pub const MIN_CARDINAL: usize = RING_RADIUS;

    /// Labels the ring around `(x, y)` of a padded image.
    ///
    /// Returns `None` when fewer than [`Self::MIN_CARDINAL`] cardinal samples
    /// are bright and fewer than that many are dark; the secondary samples are
    /// not read in that case.
    ///
    /// `(x, y)` must lie at least [`RING_RADIUS`] pixels inside `padded`.
    pub fn ring_labels(
        padded: &GrayImage,
        x: usize,
        y: usize,
        threshold: u8,
    ) -> Option<[RingLabel; RING_SIZE]> {
        debug_assert!(x >= RING_RADIUS && x + RING_RADIUS < padded.width());
        debug_assert!(y >= RING_RADIUS && y + RING_RADIUS < padded.height());

        let center = padded.get(x, y);
        let sample = |idx: usize| {
            let (dx, dy) = Self::RING_OFFSETS[idx];
            let value = padded.get((x as i32 + dx) as usize, (y as i32 + dy) as usize);
            RingLabel::classify(value, center, threshold)
        };

        let mut labels = [RingLabel::Unset; RING_SIZE];
        let mut bright = 0;
        let mut dark = 0;

        for &idx in &Self::CARDINAL {
            labels[idx] = sample(idx);
            match labels[idx] {
                RingLabel::Bright => bright += 1,
                RingLabel::Dark => dark += 1,
                RingLabel::Unset => {}
            }
        }

        if bright < Self::MIN_CARDINAL && dark < Self::MIN_CARDINAL {
            return None;
        }

        for &idx in &Self::SECONDARY {
            labels[idx] = sample(idx);
        }

        Some(labels)
    }

    /// Whether `(x, y)` of a padded image passes the ring test with arc length
    /// `arc_length` and intensity threshold `threshold`.
    #[inline]
    pub fn is_corner(padded: &GrayImage, x: usize, y: usize, arc_length: usize, threshold: u8) -> bool {
        Self::ring_labels(padded, x, y, threshold)
            .map(|labels| has_run_of(&labels, arc_length))
            .unwrap_or(false)
    }
}
