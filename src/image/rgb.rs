//! Owned three-channel f64 image, the working format of the whole core.
//!
//! Decoded 8-bit images are normalised to `[0, 1]` at the I/O boundary and
//! stay in this type until they are written back.
use super::gray::ImageF64;
use super::traits::{ImageView, ImageViewMut};
use crate::error::{HazeError, Result};

pub type Rgb = [f64; 3];

#[derive(Clone, Debug, PartialEq)]
pub struct ImageRgbF64 {
    pub w: usize,
    pub h: usize,
    pub data: Vec<Rgb>,
}

impl ImageRgbF64 {
    pub fn new(w: usize, h: usize) -> Self {
        Self::filled(w, h, [0.0; 3])
    }

    pub fn filled(w: usize, h: usize, value: Rgb) -> Self {
        Self {
            w,
            h,
            data: vec![value; w * h],
        }
    }

    pub fn from_fn(w: usize, h: usize, mut f: impl FnMut(usize, usize) -> Rgb) -> Self {
        let mut data = Vec::with_capacity(w * h);
        for y in 0..h {
            for x in 0..w {
                data.push(f(x, y));
            }
        }
        Self { w, h, data }
    }

    #[inline]
    pub fn idx(&self, x: usize, y: usize) -> usize {
        y * self.w + x
    }

    #[inline]
    pub fn get(&self, x: usize, y: usize) -> Rgb {
        self.data[self.idx(x, y)]
    }

    #[inline]
    pub fn set(&mut self, x: usize, y: usize, v: Rgb) {
        let i = self.idx(x, y);
        self.data[i] = v;
    }

    /// Extract channel `c` (0, 1 or 2) as a single-channel map.
    pub fn channel(&self, c: usize) -> ImageF64 {
        ImageF64 {
            w: self.w,
            h: self.h,
            data: self.data.iter().map(|px| px[c]).collect(),
        }
    }
}

impl ImageView for ImageRgbF64 {
    type Pixel = Rgb;

    #[inline]
    fn width(&self) -> usize {
        self.w
    }
    #[inline]
    fn height(&self) -> usize {
        self.h
    }
    #[inline]
    fn pixels(&self) -> &[Rgb] {
        &self.data
    }
}

impl ImageViewMut for ImageRgbF64 {
    #[inline]
    fn pixels_mut(&mut self) -> &mut [Rgb] {
        &mut self.data
    }
}

/// Interleaved float buffer with an arbitrary channel count, as handed over by
/// a decoder before the pipeline has checked it.
#[derive(Clone, Debug)]
pub struct InterleavedImage {
    pub w: usize,
    pub h: usize,
    pub channels: usize,
    pub data: Vec<f64>,
}

impl InterleavedImage {
    pub fn new(w: usize, h: usize, channels: usize, data: Vec<f64>) -> Self {
        Self {
            w,
            h,
            channels,
            data,
        }
    }

    /// Convert to the three-channel working format.
    ///
    /// Fails with `InvalidArgument` when the buffer does not hold exactly three
    /// channels or its length disagrees with `w × h × channels`.
    pub fn into_rgb(self) -> Result<ImageRgbF64> {
        if self.channels != 3 {
            return Err(HazeError::invalid(format!(
                "image has incorrect type: expected 3 channels, got {}",
                self.channels
            )));
        }
        if self.data.len() != self.w * self.h * 3 {
            return Err(HazeError::invalid(format!(
                "image has incorrect size: {}x{}x3 needs {} values, got {}",
                self.w,
                self.h,
                self.w * self.h * 3,
                self.data.len()
            )));
        }
        let data = self
            .data
            .chunks_exact(3)
            .map(|c| [c[0], c[1], c[2]])
            .collect();
        Ok(ImageRgbF64 {
            w: self.w,
            h: self.h,
            data,
        })
    }
}
