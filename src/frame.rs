//! Owned RGB8 frame buffers.
//!
//! `Frame` is the pixel container every source produces. It is deliberately
//! small: interleaved RGB bytes plus dimensions, with conversions to and from
//! the `image` crate for loading backgrounds and saving shots. Rasterization
//! and noise injection mutate frames in place through the accessors here.

use anyhow::{anyhow, Context, Result};
use image::RgbImage;
use std::path::Path;

use crate::FrameSize;

/// An owned RGB8 frame: `width * height * 3` interleaved bytes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Frame {
    data: Vec<u8>,
    width: u32,
    height: u32,
}

impl Frame {
    /// A zero-filled (black) frame of the given size.
    pub fn zeros(size: FrameSize) -> Self {
        Self {
            data: vec![0u8; byte_len(size)],
            width: size.width,
            height: size.height,
        }
    }

    /// A frame filled with a uniform color.
    pub fn filled(size: FrameSize, color: [u8; 3]) -> Self {
        let mut frame = Self::zeros(size);
        for px in frame.data.chunks_exact_mut(3) {
            px.copy_from_slice(&color);
        }
        frame
    }

    /// A 0x0 frame, returned alongside `ok = false` by failed reads.
    pub fn empty() -> Self {
        Self {
            data: Vec::new(),
            width: 0,
            height: 0,
        }
    }

    /// Wrap raw interleaved RGB bytes. The buffer length must match the
    /// dimensions exactly.
    pub fn from_raw(data: Vec<u8>, size: FrameSize) -> Result<Self> {
        let expected = byte_len(size);
        if data.len() != expected {
            return Err(anyhow!(
                "frame buffer length {} does not match {} ({} bytes)",
                data.len(),
                size,
                expected
            ));
        }
        Ok(Self {
            data,
            width: size.width,
            height: size.height,
        })
    }

    /// Decode an image file into a frame.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let img = image::open(path)
            .with_context(|| format!("load background image {}", path.display()))?;
        Ok(Self::from_rgb_image(img.to_rgb8()))
    }

    pub fn from_rgb_image(img: RgbImage) -> Self {
        let (width, height) = img.dimensions();
        Self {
            data: img.into_raw(),
            width,
            height,
        }
    }

    /// Copy this frame into an `image::RgbImage` (for encoding or resizing).
    pub fn to_rgb_image(&self) -> RgbImage {
        RgbImage::from_raw(self.width, self.height, self.data.clone())
            .unwrap_or_else(|| RgbImage::new(self.width, self.height))
    }

    /// Resample to a new size (bilinear).
    pub fn resized(&self, size: FrameSize) -> Frame {
        if self.size() == Some(size) {
            return self.clone();
        }
        let resized = image::imageops::resize(
            &self.to_rgb_image(),
            size.width,
            size.height,
            image::imageops::FilterType::Triangle,
        );
        Self::from_rgb_image(resized)
    }

    /// Encode as PNG (or whatever the extension names) at `path`.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        self.to_rgb_image()
            .save(path)
            .with_context(|| format!("save frame to {}", path.display()))
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Dimensions as a `FrameSize`, or `None` for the empty frame.
    pub fn size(&self) -> Option<FrameSize> {
        FrameSize::new(self.width, self.height).ok()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    pub fn as_bytes_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    /// The RGB triple at (x, y). Panics if out of bounds.
    pub fn pixel(&self, x: u32, y: u32) -> [u8; 3] {
        let i = self.offset(x, y);
        [self.data[i], self.data[i + 1], self.data[i + 2]]
    }

    pub fn pixel_mut(&mut self, x: u32, y: u32) -> &mut [u8] {
        let i = self.offset(x, y);
        &mut self.data[i..i + 3]
    }

    /// Blend `color` over the pixel at (x, y) with the given coverage in
    /// `0.0..=1.0`. Used by the rasterizer for anti-aliased edges.
    pub fn blend_pixel(&mut self, x: u32, y: u32, color: [u8; 3], coverage: f64) {
        let cov = coverage.clamp(0.0, 1.0);
        let px = self.pixel_mut(x, y);
        for c in 0..3 {
            let mixed = f64::from(px[c]) * (1.0 - cov) + f64::from(color[c]) * cov;
            px[c] = mixed.round().clamp(0.0, 255.0) as u8;
        }
    }

    fn offset(&self, x: u32, y: u32) -> usize {
        assert!(x < self.width && y < self.height, "pixel out of bounds");
        (y as usize * self.width as usize + x as usize) * 3
    }
}

/// Buffer length for a frame of the given size. Computed in `usize` so that
/// grammar-valid but enormous sizes cannot wrap in `u32`.
fn byte_len(size: FrameSize) -> usize {
    size.width as usize * size.height as usize * 3
}
