//! Descriptor parsing and source resolution.
//!
//! A source descriptor is a colon-delimited string: the first token names
//! the source kind (an integer device index, a file path, or the literal
//! `synth`), the rest are `key=value` parameters:
//!
//! ```text
//! 0
//! c:videos/clip.mp4:size=640x480
//! synth:class=chess:bg=data/lena.jpg:noise=0.1:size=640x480
//! ```
//!
//! `create_capture` resolves a descriptor to a boxed source. Resolution is
//! deliberately forgiving: an unknown `class` degrades to the base
//! generator, and a source that fails to open triggers exactly one fallback
//! hop before an unopened source is handed back to the caller. Only
//! malformed parameter tokens fail a descriptor's parse outright.

use anyhow::{anyhow, Result};

use crate::capture::CaptureSource;
use crate::source::{BoxedSource, FrameSource};
use crate::synth::{SynthConfig, SynthSource};
use crate::FrameSize;

/// The first descriptor token, decoded.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SourceKind {
    /// Integer camera index.
    Device(u32),
    /// Video file path.
    Path(String),
    /// Procedural source.
    Synth,
}

/// A descriptor split into kind and `key=value` parameters.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParsedDescriptor {
    pub kind: SourceKind,
    pub params: Vec<(String, String)>,
}

/// Split a descriptor into kind and parameters.
///
/// A single-letter first token followed by more tokens is re-merged as a
/// filesystem drive-letter path, so `c:clip.mp4` parses as one path, not as
/// kind `c` with a stray parameter. The same re-merge applies to URL-style
/// schemes (`stub://camera`). Empty parameter tokens are skipped; a
/// non-empty token without `=` is an error.
pub fn parse_descriptor(descriptor: &str) -> Result<ParsedDescriptor> {
    let mut chunks: Vec<String> = descriptor.trim().split(':').map(str::to_string).collect();

    let merge_first_two = chunks.len() > 1
        && ((chunks[0].len() == 1 && chunks[0].chars().all(|c| c.is_ascii_alphabetic()))
            || chunks[1].starts_with("//"));
    if merge_first_two {
        let merged = format!("{}:{}", chunks[0], chunks[1]);
        chunks.drain(0..2);
        chunks.insert(0, merged);
    }

    let first = chunks
        .first()
        .filter(|token| !token.is_empty())
        .ok_or_else(|| anyhow!("empty source descriptor"))?;

    let kind = if first == "synth" {
        SourceKind::Synth
    } else if let Ok(index) = first.parse::<u32>() {
        SourceKind::Device(index)
    } else {
        SourceKind::Path(first.clone())
    };

    let mut params = Vec::new();
    for token in &chunks[1..] {
        if token.is_empty() {
            continue;
        }
        let (key, value) = token.split_once('=').ok_or_else(|| {
            anyhow!("malformed parameter {token:?} in {descriptor:?} (expected key=value)")
        })?;
        params.push((key.to_string(), value.to_string()));
    }

    Ok(ParsedDescriptor { kind, params })
}

/// Canonical descriptor for a named preset, or `None` for unknown names.
///
/// Presets reference images under the data directory (`SYNTHCAP_DATA`
/// environment variable, default `data`); a preset whose image is missing
/// simply fails to open and resolution falls through.
pub fn preset(name: &str) -> Option<String> {
    let data = std::env::var("SYNTHCAP_DATA").unwrap_or_else(|_| "data".to_string());
    match name {
        "empty" => Some("synth:".to_string()),
        "lena" => Some(format!("synth:bg={data}/lena.jpg:noise=0.1")),
        "chess" => Some(format!(
            "synth:class=chess:bg={data}/lena.jpg:noise=0.1:size=640x480"
        )),
        "book" => Some(format!(
            "synth:class=book:bg={data}/graf1.png:noise=0.1:size=640x480"
        )),
        "cube" => Some(format!(
            "synth:class=cube:bg={data}/pca_test1.jpg:noise=0.0:size=640x480"
        )),
        _ => None,
    }
}

/// Resolve a descriptor to a source, with at most one fallback hop.
///
/// The primary descriptor is attempted first; if it parses badly, fails to
/// construct, or yields an unopened source, a diagnostic is logged and the
/// fallback (if any) is attempted once, with no further fallback. The result
/// may still be unopened — callers check `is_opened()`.
pub fn create_capture(descriptor: &str, fallback: Option<&str>) -> BoxedSource {
    let mut attempts = vec![descriptor];
    attempts.extend(fallback);

    let mut last_unopened: Option<BoxedSource> = None;
    for desc in attempts {
        match resolve_once(desc) {
            Ok(source) => {
                if source.is_opened() {
                    return source;
                }
                log::warn!("unable to open video source: {desc}");
                last_unopened = Some(source);
            }
            Err(err) => {
                log::warn!("unable to open video source {desc}: {err:#}");
            }
        }
    }

    last_unopened.unwrap_or_else(|| Box::new(CaptureSource::unavailable(descriptor)))
}

/// One resolution attempt, no fallback.
fn resolve_once(descriptor: &str) -> Result<BoxedSource> {
    let parsed = parse_descriptor(descriptor)?;
    match parsed.kind {
        SourceKind::Synth => {
            let config = SynthConfig::from_params(&parsed.params)?;
            Ok(Box::new(build_synth(config)?))
        }
        SourceKind::Device(index) => {
            let mut cap = CaptureSource::open_device(index);
            apply_size_param(&mut cap, &parsed.params)?;
            Ok(Box::new(cap))
        }
        SourceKind::Path(path) => {
            let mut cap = CaptureSource::open_path(&path);
            apply_size_param(&mut cap, &parsed.params)?;
            Ok(Box::new(cap))
        }
    }
}

/// The synth class registry: class name to constructor. Unknown names
/// degrade to the base generator rather than failing.
fn build_synth(config: SynthConfig) -> Result<SynthSource> {
    match config.class.as_deref() {
        Some("chess") => SynthSource::chess(config),
        Some("book") => SynthSource::book(config),
        Some("cube") => SynthSource::cube(config),
        Some(other) => {
            log::debug!("unknown synth class {other:?}, using base generator");
            SynthSource::new(config)
        }
        None => SynthSource::new(config),
    }
}

fn apply_size_param(cap: &mut CaptureSource, params: &[(String, String)]) -> Result<()> {
    if let Some((_, value)) = params.iter().find(|(key, _)| key == "size") {
        cap.request_size(FrameSize::parse(value)?);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn synth_kind_parses() {
        let parsed = parse_descriptor("synth:class=chess:noise=0.1").unwrap();
        assert_eq!(parsed.kind, SourceKind::Synth);
        assert_eq!(
            parsed.params,
            vec![
                ("class".to_string(), "chess".to_string()),
                ("noise".to_string(), "0.1".to_string()),
            ]
        );
    }

    #[test]
    fn integer_kind_parses_as_device() {
        let parsed = parse_descriptor("2").unwrap();
        assert_eq!(parsed.kind, SourceKind::Device(2));
        assert!(parsed.params.is_empty());
    }

    #[test]
    fn path_kind_parses() {
        let parsed = parse_descriptor("videos/clip.mp4").unwrap();
        assert_eq!(parsed.kind, SourceKind::Path("videos/clip.mp4".to_string()));
    }

    #[test]
    fn drive_letter_is_merged_into_the_path() {
        let parsed = parse_descriptor("c:path/to/video.mp4").unwrap();
        assert_eq!(
            parsed.kind,
            SourceKind::Path("c:path/to/video.mp4".to_string())
        );
        assert!(parsed.params.is_empty());
    }

    #[test]
    fn drive_letter_path_keeps_trailing_params() {
        let parsed = parse_descriptor("c:clip.avi:size=320x240").unwrap();
        assert_eq!(parsed.kind, SourceKind::Path("c:clip.avi".to_string()));
        assert_eq!(
            parsed.params,
            vec![("size".to_string(), "320x240".to_string())]
        );
    }

    #[test]
    fn url_scheme_is_merged_into_the_path() {
        let parsed = parse_descriptor("stub://camera:size=320x240").unwrap();
        assert_eq!(parsed.kind, SourceKind::Path("stub://camera".to_string()));
        assert_eq!(
            parsed.params,
            vec![("size".to_string(), "320x240".to_string())]
        );
    }

    #[test]
    fn malformed_parameter_fails_the_parse() {
        assert!(parse_descriptor("synth:noise").is_err());
        assert!(parse_descriptor("0:oops").is_err());
    }

    #[test]
    fn empty_trailing_token_is_tolerated() {
        let parsed = parse_descriptor("synth:").unwrap();
        assert_eq!(parsed.kind, SourceKind::Synth);
        assert!(parsed.params.is_empty());
    }

    #[test]
    fn empty_descriptor_is_rejected() {
        assert!(parse_descriptor("").is_err());
        assert!(parse_descriptor("   ").is_err());
    }

    #[test]
    fn unknown_class_degrades_to_base_generator() {
        let mut source = create_capture("synth:class=starfield:size=64x48", None);
        assert!(source.is_opened());
        let (ok, frame) = source.read();
        assert!(ok);
        assert_eq!(frame.size(), FrameSize::new(64, 48).ok());
    }

    #[test]
    fn presets_resolve_to_synth_descriptors() {
        for name in ["empty", "lena", "chess", "book", "cube"] {
            let descriptor = preset(name).unwrap();
            assert!(descriptor.starts_with("synth"), "{descriptor}");
            parse_descriptor(&descriptor).unwrap();
        }
        assert!(preset("nope").is_none());
    }
}
