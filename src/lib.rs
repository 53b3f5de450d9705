//! synthcap
//!
//! A uniform video-source abstraction. Every source, whether it is a real
//! capture device, a video file, or a procedural generator, exposes the same
//! two-method contract: `read()` pulls the next frame, `is_opened()` reports
//! whether the source is usable at all.
//!
//! # Module Structure
//!
//! - `frame`: owned RGB8 frame buffers
//! - `source`: the `FrameSource` capability trait
//! - `geom`: camera pose helpers (look-at, rotation vectors)
//! - `camera`: pinhole projection with lens distortion
//! - `raster`: anti-aliased convex polygon fill
//! - `noise`: saturating Gaussian sensor-noise injection
//! - `synth`: procedural generators (base, chess, book, cube)
//! - `capture`: device/file capture sources
//! - `factory`: descriptor parsing, presets, and fallback resolution
//!
//! The descriptor grammar is `<kind>[:<key>=<value>]*` where `<kind>` is an
//! integer device index, a file path, or the literal `synth`. See
//! [`factory::create_capture`].

use anyhow::{anyhow, Result};

pub mod camera;
pub mod capture;
pub mod factory;
pub mod frame;
pub mod geom;
pub mod noise;
pub mod raster;
pub mod source;
pub mod synth;

pub use capture::CaptureSource;
pub use factory::{create_capture, parse_descriptor, preset, ParsedDescriptor, SourceKind};
pub use frame::Frame;
pub use geom::CameraPose;
pub use source::{BoxedSource, FrameSource};
pub use synth::{SynthConfig, SynthSource};

/// Default frame size when neither a `size` parameter nor a background image
/// pins the dimensions.
pub const DEFAULT_FRAME_SIZE: FrameSize = FrameSize {
    width: 640,
    height: 480,
};

/// Frame dimensions in pixels. Both components are always greater than zero.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FrameSize {
    pub width: u32,
    pub height: u32,
}

impl FrameSize {
    pub fn new(width: u32, height: u32) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(anyhow!("frame size must be positive, got {width}x{height}"));
        }
        Ok(Self { width, height })
    }

    /// Parse a `<W>x<H>` size string, e.g. `"640x480"`.
    pub fn parse(s: &str) -> Result<Self> {
        let (w, h) = s
            .split_once('x')
            .ok_or_else(|| anyhow!("size must be <W>x<H>, got {s:?}"))?;
        let width: u32 = w
            .parse()
            .map_err(|_| anyhow!("invalid width in size {s:?}"))?;
        let height: u32 = h
            .parse()
            .map_err(|_| anyhow!("invalid height in size {s:?}"))?;
        Self::new(width, height)
    }
}

impl Default for FrameSize {
    fn default() -> Self {
        DEFAULT_FRAME_SIZE
    }
}

impl std::fmt::Display for FrameSize {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}
