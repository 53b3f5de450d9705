//! Procedural frame sources.
//!
//! `SynthSource` is the common body of every synthetic generator: it owns
//! the frame size, an optional background image, and the noise injector.
//! What gets drawn on top is a tagged scene variant selected by the factory's
//! class registry:
//!
//! - `Static`: nothing — a plain noisy-background (or noisy-black) source
//! - `Chess`: a moving projected checkerboard (see [`chess`])
//! - `Textured`: an animated-scene engine whose output is taken as the whole
//!   frame (book/cube, see [`scene`])
//!
//! Synthetic sources are always "opened" and every `read` succeeds.

pub mod chess;
pub mod scene;

use anyhow::{anyhow, Result};

use crate::frame::Frame;
use crate::noise::NoiseInjector;
use crate::source::FrameSource;
use crate::FrameSize;

use chess::ChessScene;
use scene::{PlanarSceneEngine, SceneEngine};

/// Parsed synthetic-source configuration. Built from descriptor parameters
/// by the factory; every field has a documented default and unknown keys are
/// ignored.
#[derive(Clone, Debug)]
pub struct SynthConfig {
    /// Generator class (`chess`, `book`, `cube`). Unrecognized or absent
    /// names select the base generator.
    pub class: Option<String>,
    /// Explicit frame size. Defaults to the background's size, or 640x480.
    pub size: Option<FrameSize>,
    /// Background image path. Must load if given.
    pub bg: Option<String>,
    /// Foreground overlay path for the textured scenes.
    pub fg: Option<String>,
    /// Noise level relative to full scale (stddev `255 * noise`). Default 0.
    pub noise: f64,
    /// Animation speed multiplier for the textured scenes. Default 1.
    pub speed: f64,
}

impl Default for SynthConfig {
    fn default() -> Self {
        Self {
            class: None,
            size: None,
            bg: None,
            fg: None,
            noise: 0.0,
            speed: 1.0,
        }
    }
}

impl SynthConfig {
    /// Build a config from `key=value` descriptor parameters. Values that
    /// fail to parse are construction errors; unknown keys are ignored.
    pub fn from_params(params: &[(String, String)]) -> Result<Self> {
        let mut config = Self::default();
        for (key, value) in params {
            match key.as_str() {
                "class" => config.class = Some(value.clone()),
                "size" => config.size = Some(FrameSize::parse(value)?),
                "bg" => config.bg = Some(value.clone()),
                "fg" => config.fg = Some(value.clone()),
                "noise" => {
                    config.noise = value
                        .parse()
                        .map_err(|_| anyhow!("noise must be a real number, got {value:?}"))?;
                }
                "speed" => {
                    config.speed = value
                        .parse()
                        .map_err(|_| anyhow!("speed must be a real number, got {value:?}"))?;
                }
                other => log::debug!("ignoring unrecognized synth parameter {other:?}"),
            }
        }
        Ok(config)
    }
}

enum Scene {
    Static,
    Chess(ChessScene),
    Textured(Box<dyn SceneEngine>),
}

/// A procedural frame source. See the module docs for the scene variants.
pub struct SynthSource {
    frame_size: FrameSize,
    background: Option<Frame>,
    noise: NoiseInjector,
    scene: Scene,
}

impl SynthSource {
    /// The base generator: background (or black) plus noise, no scene.
    pub fn new(config: SynthConfig) -> Result<Self> {
        let (frame_size, background, noise) = base_parts(&config)?;
        Ok(Self {
            frame_size,
            background,
            noise,
            scene: Scene::Static,
        })
    }

    /// The projected-checkerboard generator.
    pub fn chess(config: SynthConfig) -> Result<Self> {
        let (frame_size, background, noise) = base_parts(&config)?;
        Ok(Self {
            frame_size,
            background,
            noise,
            scene: Scene::Chess(ChessScene::new(frame_size)),
        })
    }

    /// Textured planar scene: a foreground overlay animated over the
    /// background, no deformation.
    pub fn book(config: SynthConfig) -> Result<Self> {
        Self::textured(config, false)
    }

    /// Textured scene with perspective-style deformation of the patch.
    pub fn cube(config: SynthConfig) -> Result<Self> {
        Self::textured(config, true)
    }

    fn textured(config: SynthConfig, deformation: bool) -> Result<Self> {
        let (frame_size, background, noise) = base_parts(&config)?;
        let background =
            background.ok_or_else(|| anyhow!("textured scenes require a bg parameter"))?;
        let foreground = match &config.fg {
            Some(path) => Some(Frame::load(path)?),
            None => None,
        };
        let engine = PlanarSceneEngine::new(background, foreground, deformation, config.speed)?;
        Ok(Self {
            frame_size,
            background: None,
            noise,
            scene: Scene::Textured(Box::new(engine)),
        })
    }

    pub fn frame_size(&self) -> FrameSize {
        self.frame_size
    }
}

fn base_parts(config: &SynthConfig) -> Result<(FrameSize, Option<Frame>, NoiseInjector)> {
    let mut background = match &config.bg {
        Some(path) => Some(Frame::load(path)?),
        None => None,
    };
    let frame_size = match (config.size, &background) {
        (Some(size), _) => size,
        (None, Some(bg)) => bg
            .size()
            .ok_or_else(|| anyhow!("background image has no pixels"))?,
        (None, None) => FrameSize::default(),
    };
    if let Some(bg) = background.take() {
        background = Some(bg.resized(frame_size));
    }
    let noise = NoiseInjector::new(config.noise)?;
    Ok((frame_size, background, noise))
}

impl FrameSource for SynthSource {
    fn read(&mut self) -> (bool, Frame) {
        let mut frame = match &mut self.scene {
            Scene::Textured(engine) => engine.next_frame(),
            Scene::Static => match &self.background {
                Some(bg) => bg.clone(),
                None => Frame::zeros(self.frame_size),
            },
            Scene::Chess(chess) => {
                let mut buf = match &self.background {
                    Some(bg) => bg.clone(),
                    None => Frame::zeros(self.frame_size),
                };
                chess.render(&mut buf);
                buf
            }
        };
        self.noise.apply(&mut frame);
        (true, frame)
    }

    fn is_opened(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(size: &str, noise: f64) -> SynthConfig {
        SynthConfig {
            size: Some(FrameSize::parse(size).unwrap()),
            noise,
            ..SynthConfig::default()
        }
    }

    #[test]
    fn base_source_is_always_opened() {
        let source = SynthSource::new(SynthConfig::default()).unwrap();
        assert!(source.is_opened());
        assert_eq!(source.frame_size(), FrameSize::default());
    }

    #[test]
    fn base_source_without_noise_is_bit_deterministic() {
        let mut source = SynthSource::new(config("64x48", 0.0)).unwrap();
        let (ok1, f1) = source.read();
        let (ok2, f2) = source.read();
        assert!(ok1 && ok2);
        assert_eq!(f1, f2);
    }

    #[test]
    fn frames_match_the_configured_size() {
        let mut source = SynthSource::new(config("320x240", 0.1)).unwrap();
        for _ in 0..10 {
            let (ok, frame) = source.read();
            assert!(ok);
            assert_eq!(frame.size(), FrameSize::new(320, 240).ok());
        }
    }

    #[test]
    fn missing_background_fails_construction() {
        let cfg = SynthConfig {
            bg: Some("/nonexistent/definitely_missing.png".to_string()),
            ..SynthConfig::default()
        };
        assert!(SynthSource::new(cfg).is_err());
    }

    #[test]
    fn background_is_resized_to_explicit_size() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bg.png");
        Frame::filled(FrameSize::new(16, 16).unwrap(), [50, 60, 70])
            .save(&path)
            .unwrap();

        let cfg = SynthConfig {
            bg: Some(path.to_string_lossy().into_owned()),
            size: Some(FrameSize::new(32, 24).unwrap()),
            ..SynthConfig::default()
        };
        let mut source = SynthSource::new(cfg).unwrap();
        let (ok, frame) = source.read();
        assert!(ok);
        assert_eq!(frame.size(), FrameSize::new(32, 24).ok());
        assert_eq!(frame.pixel(16, 12), [50, 60, 70]);
    }

    #[test]
    fn background_size_pins_frame_size_when_no_size_given() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bg.png");
        Frame::filled(FrameSize::new(20, 30).unwrap(), [1, 2, 3])
            .save(&path)
            .unwrap();

        let cfg = SynthConfig {
            bg: Some(path.to_string_lossy().into_owned()),
            ..SynthConfig::default()
        };
        let source = SynthSource::new(cfg).unwrap();
        assert_eq!(source.frame_size(), FrameSize::new(20, 30).unwrap());
    }

    #[test]
    fn chess_source_is_deterministic_without_noise() {
        let mut a = SynthSource::chess(config("96x72", 0.0)).unwrap();
        let mut b = SynthSource::chess(config("96x72", 0.0)).unwrap();
        for _ in 0..5 {
            let (_, fa) = a.read();
            let (_, fb) = b.read();
            assert_eq!(fa, fb);
        }
    }

    #[test]
    fn chess_frames_advance_over_time() {
        let mut source = SynthSource::chess(config("96x72", 0.0)).unwrap();
        let (_, first) = source.read();
        let (_, second) = source.read();
        assert_ne!(first, second, "simulated time must advance the scene");
    }

    #[test]
    fn textured_scene_requires_background() {
        assert!(SynthSource::book(config("64x48", 0.0)).is_err());
        assert!(SynthSource::cube(config("64x48", 0.0)).is_err());
    }

    #[test]
    fn book_and_cube_render_at_background_size() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bg.png");
        Frame::filled(FrameSize::new(40, 32).unwrap(), [90, 90, 90])
            .save(&path)
            .unwrap();

        for build in [SynthSource::book, SynthSource::cube] {
            let cfg = SynthConfig {
                bg: Some(path.to_string_lossy().into_owned()),
                size: Some(FrameSize::new(48, 36).unwrap()),
                ..SynthConfig::default()
            };
            let mut source = build(cfg).unwrap();
            assert!(source.is_opened());
            let (ok, frame) = source.read();
            assert!(ok);
            assert_eq!(frame.size(), FrameSize::new(48, 36).ok());
        }
    }

    #[test]
    fn unknown_params_are_ignored() {
        let params = vec![
            ("class".to_string(), "chess".to_string()),
            ("wobble".to_string(), "9".to_string()),
        ];
        let config = SynthConfig::from_params(&params).unwrap();
        assert_eq!(config.class.as_deref(), Some("chess"));
    }

    #[test]
    fn bad_noise_value_fails_parse() {
        let params = vec![("noise".to_string(), "loud".to_string())];
        assert!(SynthConfig::from_params(&params).is_err());
    }
}
