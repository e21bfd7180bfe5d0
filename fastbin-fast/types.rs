/// Classification of one ring sample against the centre pixel
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RingLabel {
    Bright,
    Dark,
    Unset,
}

impl RingLabel {
    /// `Bright` above `center + t`, `Dark` below `center - t`, `Unset` otherwise.
    #[inline]
    pub fn classify(sample: u8, center: u8, threshold: u8) -> Self {
        let (sample, center, t) = (sample as i32, center as i32, threshold as i32);
        if sample > center + t {
            RingLabel::Bright
        } else if sample < center - t {
            RingLabel::Dark
        } else {
            RingLabel::Unset
        }
    }
}
