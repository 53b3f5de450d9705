//! Saturating Gaussian sensor-noise injection.
//!
//! Synthetic sources add a per-pixel, per-channel sample from a zero-mean
//! Gaussian with standard deviation `255 * sigma`. The sum clamps to the
//! 8-bit range instead of wrapping. `sigma = 0` is the identity and draws
//! nothing from the RNG, keeping noiseless sources bit-deterministic.

use anyhow::{anyhow, Result};
use rand::rngs::StdRng;
use rand::SeedableRng;
use rand_distr::{Distribution, Normal};

use crate::frame::Frame;

/// Per-source noise state: the distribution plus an owned RNG.
pub struct NoiseInjector {
    normal: Option<Normal<f64>>,
    rng: StdRng,
}

impl NoiseInjector {
    /// `sigma` is the noise level relative to full scale; the Gaussian's
    /// standard deviation is `255 * sigma`. Negative levels are rejected.
    pub fn new(sigma: f64) -> Result<Self> {
        if !sigma.is_finite() || sigma < 0.0 {
            return Err(anyhow!("noise level must be a non-negative real, got {sigma}"));
        }
        let normal = if sigma > 0.0 {
            Some(
                Normal::new(0.0, 255.0 * sigma)
                    .map_err(|e| anyhow!("invalid noise distribution: {e}"))?,
            )
        } else {
            None
        };
        Ok(Self {
            normal,
            rng: StdRng::from_entropy(),
        })
    }

    /// Add noise to every channel of every pixel, saturating at 0 and 255.
    pub fn apply(&mut self, frame: &mut Frame) {
        let Some(normal) = self.normal else {
            return;
        };
        for byte in frame.as_bytes_mut() {
            *byte = add_clamped(*byte, normal.sample(&mut self.rng));
        }
    }
}

/// Saturating add of a real-valued noise sample to an 8-bit channel.
pub(crate) fn add_clamped(value: u8, noise: f64) -> u8 {
    (f64::from(value) + noise).round().clamp(0.0, 255.0) as u8
}
