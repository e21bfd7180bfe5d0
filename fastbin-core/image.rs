use crate::error::{CoreError, CoreResult};

/// Channel layout of an input [`Image`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PixelFormat {
    Gray,
    Rgb,
    Bgr,
}

impl PixelFormat {
    pub fn channels(self) -> usize {
        match self {
            PixelFormat::Gray => 1,
            PixelFormat::Rgb | PixelFormat::Bgr => 3,
        }
    }
}

fn expected_len(width: usize, height: usize, channels: usize) -> CoreResult<usize> {
    width
        .checked_mul(height)
        .and_then(|n| n.checked_mul(channels))
        .ok_or(CoreError::DimensionOverflow { width, height })
}

/// Row-major, interleaved 8-bit input image.
///
/// The pipeline only ever reads from an `Image`; grayscale, blurred and padded
/// copies are produced as separate [`GrayImage`] buffers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Image {
    width: usize,
    height: usize,
    format: PixelFormat,
    data: Vec<u8>,
}

impl Image {
    /// Wraps `data`, checking that its length matches `width * height * channels`.
    pub fn new(width: usize, height: usize, format: PixelFormat, data: Vec<u8>) -> CoreResult<Self> {
        let expected_len = expected_len(width, height, format.channels())?;
        if data.len() != expected_len {
            return Err(CoreError::InvalidImageData {
                expected_len,
                actual_len: data.len(),
            });
        }
        Ok(Self { width, height, format, data })
    }

    pub fn gray(width: usize, height: usize, data: Vec<u8>) -> CoreResult<Self> {
        Self::new(width, height, PixelFormat::Gray, data)
    }

    pub fn rgb(width: usize, height: usize, data: Vec<u8>) -> CoreResult<Self> {
        Self::new(width, height, PixelFormat::Rgb, data)
    }

    pub fn bgr(width: usize, height: usize, data: Vec<u8>) -> CoreResult<Self> {
        Self::new(width, height, PixelFormat::Bgr, data)
    }

    /// Uniform grayscale image.
    pub fn filled(width: usize, height: usize, value: u8) -> CoreResult<Self> {
        let len = expected_len(width, height, PixelFormat::Gray.channels())?;
        Ok(Self {
            width,
            height,
            format: PixelFormat::Gray,
            data: vec![value; len],
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn format(&self) -> PixelFormat {
        self.format
    }

    pub fn as_raw(&self) -> &[u8] {
        &self.data
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Luma conversion with fixed-point weights 0.299 R + 0.587 G + 0.114 B.
    pub fn to_gray(&self) -> GrayImage {
        const WR: u32 = 4899;
        const WG: u32 = 9617;
        const WB: u32 = 1868;
        const SHIFT: u32 = 14;

        let data = match self.format {
            PixelFormat::Gray => self.data.clone(),
            PixelFormat::Rgb | PixelFormat::Bgr => self
                .data
                .chunks_exact(3)
                .map(|px| {
                    let (r, g, b) = match self.format {
                        PixelFormat::Rgb => (px[0], px[1], px[2]),
                        _ => (px[2], px[1], px[0]),
                    };
                    let luma = WR * r as u32 + WG * g as u32 + WB * b as u32 + (1 << (SHIFT - 1));
                    (luma >> SHIFT) as u8
                })
                .collect(),
        };

        GrayImage {
            width: self.width,
            height: self.height,
            data,
        }
    }
}

/// Single-channel working buffer derived from an [`Image`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GrayImage {
    width: usize,
    height: usize,
    data: Vec<u8>,
}

/// Reflect-101 border index (`gfedcb|abcdefgh|gfedcba`).
fn reflect_101(i: isize, n: usize) -> usize {
    if n == 1 {
        return 0;
    }
    let n = n as isize;
    let mut i = i;
    while i < 0 || i >= n {
        if i < 0 {
            i = -i;
        }
        if i >= n {
            i = 2 * (n - 1) - i;
        }
    }
    i as usize
}

impl GrayImage {
    pub fn new(width: usize, height: usize, data: Vec<u8>) -> CoreResult<Self> {
        let expected_len = expected_len(width, height, 1)?;
        if data.len() != expected_len {
            return Err(CoreError::InvalidImageData {
                expected_len,
                actual_len: data.len(),
            });
        }
        Ok(Self { width, height, data })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn as_raw(&self) -> &[u8] {
        &self.data
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Pixel at column `x`, row `y`. Panics when out of bounds.
    #[inline]
    pub fn get(&self, x: usize, y: usize) -> u8 {
        self.data[y * self.width + x]
    }

    /// 5x5 Gaussian smoothing with the binomial kernel `[1 4 6 4 1] / 16` on each
    /// axis, reflect-101 borders.
    pub fn gaussian_blur_5x5(&self) -> GrayImage {
        const KERNEL: [u32; 5] = [1, 4, 6, 4, 1];

        if self.is_empty() {
            return self.clone();
        }

        let (w, h) = (self.width, self.height);

        let mut horizontal = vec![0u32; w * h];
        for y in 0..h {
            let row = &self.data[y * w..(y + 1) * w];
            for x in 0..w {
                let mut acc = 0u32;
                for (k, &weight) in KERNEL.iter().enumerate() {
                    let xx = reflect_101(x as isize + k as isize - 2, w);
                    acc += weight * row[xx] as u32;
                }
                horizontal[y * w + x] = acc;
            }
        }

        let mut data = vec![0u8; w * h];
        for y in 0..h {
            for x in 0..w {
                let mut acc = 0u32;
                for (k, &weight) in KERNEL.iter().enumerate() {
                    let yy = reflect_101(y as isize + k as isize - 2, h);
                    acc += weight * horizontal[yy * w + x];
                }
                data[y * w + x] = ((acc + 128) >> 8) as u8;
            }
        }

        GrayImage { width: w, height: h, data }
    }

    /// Copy grown by `border` pixels on every side, replicating edge pixels.
    ///
    /// An empty image has no edge to replicate and stays empty.
    pub fn pad_replicate(&self, border: usize) -> GrayImage {
        if self.is_empty() {
            return GrayImage {
                width: 0,
                height: 0,
                data: Vec::new(),
            };
        }

        let (w, h) = (self.width, self.height);
        let (pw, ph) = (w + 2 * border, h + 2 * border);
        let mut data = Vec::with_capacity(pw * ph);

        for py in 0..ph {
            let y = py.saturating_sub(border).min(h - 1);
            let row = &self.data[y * w..(y + 1) * w];
            data.extend(std::iter::repeat(row[0]).take(border));
            data.extend_from_slice(row);
            data.extend(std::iter::repeat(row[w - 1]).take(border));
        }

        GrayImage { width: pw, height: ph, data }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_image_data() {
        let result = Image::rgb(4, 4, vec![0; 16]);
        assert_eq!(
            result,
            Err(CoreError::InvalidImageData {
                expected_len: 48,
                actual_len: 16
            })
        );
    }

    #[test]
    fn test_filled_checks_dimensions() {
        let img = Image::filled(3, 2, 7).unwrap();
        assert_eq!(img.as_raw(), &[7u8; 6][..]);
        assert_eq!(img.format(), PixelFormat::Gray);

        assert_eq!(
            Image::filled(usize::MAX, 2, 0),
            Err(CoreError::DimensionOverflow {
                width: usize::MAX,
                height: 2
            })
        );
    }

    #[test]
    fn test_zero_sized_image_is_valid() {
        let img = Image::gray(0, 10, Vec::new()).unwrap();
        assert!(img.is_empty());
        assert!(img.to_gray().gaussian_blur_5x5().pad_replicate(3).is_empty());
    }

    #[test]
    fn test_gray_conversion_channel_order() {
        let rgb = Image::rgb(1, 1, vec![255, 0, 0]).unwrap().to_gray();
        let bgr = Image::bgr(1, 1, vec![0, 0, 255]).unwrap().to_gray();
        assert_eq!(rgb.get(0, 0), 76);
        assert_eq!(rgb, bgr);

        let white = Image::rgb(1, 1, vec![255, 255, 255]).unwrap().to_gray();
        assert_eq!(white.get(0, 0), 255);
    }

    #[test]
    fn test_blur_preserves_uniform_image() {
        let img = Image::filled(9, 7, 123).unwrap().to_gray();
        assert_eq!(img.gaussian_blur_5x5(), img);
    }

    #[test]
    fn test_blur_does_not_mutate_source() {
        let mut data = vec![0u8; 25];
        data[12] = 255;
        let img = GrayImage::new(5, 5, data.clone()).unwrap();
        let blurred = img.gaussian_blur_5x5();
        assert_eq!(img.as_raw(), data.as_slice());
        // Centre weight is 36/256 of the impulse.
        assert_eq!(blurred.get(2, 2), 36);
        assert_eq!(blurred.get(0, 0), 4);
    }

    #[test]
    fn test_reflect_101() {
        assert_eq!(reflect_101(-1, 5), 1);
        assert_eq!(reflect_101(-2, 5), 2);
        assert_eq!(reflect_101(5, 5), 3);
        assert_eq!(reflect_101(6, 5), 2);
        assert_eq!(reflect_101(-2, 2), 0);
        assert_eq!(reflect_101(3, 1), 0);
    }

    #[test]
    fn test_pad_replicate() {
        let img = GrayImage::new(2, 2, vec![1, 2, 3, 4]).unwrap();
        let padded = img.pad_replicate(2);
        assert_eq!((padded.width(), padded.height()), (6, 6));
        assert_eq!(padded.get(0, 0), 1);
        assert_eq!(padded.get(5, 0), 2);
        assert_eq!(padded.get(0, 5), 3);
        assert_eq!(padded.get(5, 5), 4);
        assert_eq!(padded.get(2, 2), 1);
        assert_eq!(padded.get(3, 3), 4);
    }
}
