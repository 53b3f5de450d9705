//! Animated textured scenes (book/cube).
//!
//! The book and cube generators wrap an animated-scene engine: something
//! that hands back one fully rendered frame per call. The integration
//! contract is the `SceneEngine` trait; the wrapper only adds sensor noise
//! on top. `PlanarSceneEngine` is the built-in implementation: it slides a
//! textured patch over the background along a deterministic Lissajous path,
//! optionally shearing the patch rows to fake a perspective deformation.

use anyhow::{anyhow, Result};

use crate::frame::Frame;
use crate::FrameSize;

const TIME_STEP: f64 = 1.0 / 30.0;

/// An injected rendering engine: one finished frame per call.
pub trait SceneEngine {
    fn frame_size(&self) -> FrameSize;
    fn next_frame(&mut self) -> Frame;
}

/// Built-in planar scene animation.
///
/// The foreground patch is either a supplied overlay image or, when none is
/// given, a copy of the background's central region. Motion and deformation
/// are pure functions of the simulated time, so the sequence is repeatable.
pub struct PlanarSceneEngine {
    background: Frame,
    patch: Frame,
    deformation: bool,
    speed: f64,
    t: f64,
}

impl PlanarSceneEngine {
    pub fn new(
        background: Frame,
        foreground: Option<Frame>,
        deformation: bool,
        speed: f64,
    ) -> Result<Self> {
        let size = background
            .size()
            .ok_or_else(|| anyhow!("scene background has no pixels"))?;
        let patch = match foreground {
            Some(fg) => {
                // Keep the overlay within a quarter of the frame.
                let max = FrameSize::new((size.width / 2).max(1), (size.height / 2).max(1))?;
                if fg.width() > max.width || fg.height() > max.height {
                    fg.resized(max)
                } else {
                    fg
                }
            }
            None => central_patch(&background),
        };
        if !speed.is_finite() {
            return Err(anyhow!("scene speed must be finite"));
        }
        Ok(Self {
            background,
            patch,
            deformation,
            speed,
            t: 0.0,
        })
    }
}

impl SceneEngine for PlanarSceneEngine {
    fn frame_size(&self) -> FrameSize {
        self.background.size().unwrap_or_default()
    }

    fn next_frame(&mut self) -> Frame {
        let t = self.t;
        self.t += self.speed * TIME_STEP;

        let mut frame = self.background.clone();
        let (bw, bh) = (f64::from(frame.width()), f64::from(frame.height()));
        let (pw, ph) = (f64::from(self.patch.width()), f64::from(self.patch.height()));

        // Lissajous path around the frame center, clamped so the patch
        // stays inside.
        let margin_x = ((bw - pw) / 2.0).max(0.0);
        let margin_y = ((bh - ph) / 2.0).max(0.0);
        let x0 = (bw - pw) / 2.0 + margin_x * 0.6 * (1.1 * t).sin();
        let y0 = (bh - ph) / 2.0 + margin_y * 0.6 * (1.7 * t).cos();

        let shear_amp = if self.deformation { pw * 0.15 } else { 0.0 };
        blit_patch(&mut frame, &self.patch, x0, y0, shear_amp, t);
        frame
    }
}

/// Copy `patch` over `dst` at (x0, y0), with an optional per-row horizontal
/// shear. Rows and columns falling outside the destination are clipped.
fn blit_patch(dst: &mut Frame, patch: &Frame, x0: f64, y0: f64, shear_amp: f64, t: f64) {
    let ph = patch.height();
    for py in 0..ph {
        let dy = y0.round() as i64 + i64::from(py);
        if dy < 0 || dy >= i64::from(dst.height()) {
            continue;
        }
        let row_phase = f64::from(py) / f64::from(ph.max(1));
        let shear = shear_amp * (2.0 * t + row_phase * std::f64::consts::PI).sin();
        let row_x0 = (x0 + shear).round() as i64;
        for px in 0..patch.width() {
            let dx = row_x0 + i64::from(px);
            if dx < 0 || dx >= i64::from(dst.width()) {
                continue;
            }
            let color = patch.pixel(px, py);
            dst.pixel_mut(dx as u32, dy as u32).copy_from_slice(&color);
        }
    }
}

/// The central half-size region of `frame`, used as the default animated
/// patch when no foreground overlay is supplied.
fn central_patch(frame: &Frame) -> Frame {
    let w = (frame.width() / 2).max(1);
    let h = (frame.height() / 2).max(1);
    let x0 = (frame.width() - w) / 2;
    let y0 = (frame.height() - h) / 2;
    let mut patch = Frame::zeros(FrameSize { width: w, height: h });
    for y in 0..h {
        for x in 0..w {
            let color = frame.pixel(x0 + x, y0 + y);
            patch.pixel_mut(x, y).copy_from_slice(&color);
        }
    }
    patch
}
