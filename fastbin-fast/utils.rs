/// Utility functions for the ring corner test

use crate::types::RingLabel;

/// Number of samples on the ring
pub const RING_SIZE: usize = 16;

/// Length of the longest run of equal consecutive labels around the ring.
///
/// Positions `1..2 * RING_SIZE - 2` are scanned with modular indexing so runs
/// that wrap past the last sample are counted. `Unset` is a label like any
/// other: a ring of unclassified samples forms a run too.
pub fn longest_circular_run(labels: &[RingLabel; RING_SIZE]) -> usize {
    let mut longest = 1;
    let mut current = 1;

    for k in 1..(2 * RING_SIZE - 2) {
        if labels[k % RING_SIZE] == labels[(k - 1) % RING_SIZE] {
            current += 1;
        } else {
            current = 1;
        }
        longest = longest.max(current);
    }

    longest
}

/// Check if the longest circular run reaches `min_count`
pub fn has_run_of(labels: &[RingLabel; RING_SIZE], min_count: usize) -> bool {
    longest_circular_run(labels) >= min_count
}
