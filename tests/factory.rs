//! End-to-end resolution tests: descriptor grammar, fallback behavior, and
//! sustained reads from resolved sources.

use synthcap::{create_capture, FrameSize, FrameSource};

#[test]
fn chess_descriptor_resolves_and_streams() {
    let mut source = create_capture("synth:class=chess:size=320x240:noise=0.1", None);
    assert!(source.is_opened());
    for _ in 0..200 {
        let (ok, frame) = source.read();
        assert!(ok);
        assert_eq!(frame.size(), FrameSize::new(320, 240).ok());
    }
}

#[test]
fn oversized_synthetic_frames_read_without_wrapping() {
    // The pixel count here exceeds u32; buffer arithmetic must not wrap, and
    // an opened synthetic source must still never fail a read.
    let mut source = create_capture("synth:size=40000x40000", None);
    assert!(source.is_opened());
    let (ok, frame) = source.read();
    assert!(ok);
    assert_eq!(frame.size(), FrameSize::new(40_000, 40_000).ok());
    assert_eq!(frame.as_bytes().len(), 40_000usize * 40_000 * 3);
}

#[test]
fn failing_source_falls_back_once() {
    // The primary cannot open (no decoder for real files); the fallback is a
    // synthetic source that always opens.
    let mut source = create_capture(
        "/no/such/video.mp4",
        Some("synth:class=chess:size=160x120"),
    );
    assert!(source.is_opened());
    let (ok, frame) = source.read();
    assert!(ok);
    assert_eq!(frame.size(), FrameSize::new(160, 120).ok());
}

#[test]
fn failing_fallback_terminates_unopened() {
    // Both attempts fail; resolution must stop after the single fallback hop
    // and hand back an unopened source instead of looping.
    let mut source = create_capture("/missing/a.mp4", Some("/missing/b.mp4"));
    assert!(!source.is_opened());
    let (ok, frame) = source.read();
    assert!(!ok);
    assert!(frame.is_empty());
}

#[test]
fn malformed_descriptor_uses_the_fallback() {
    // A parameter without '=' fails the primary's parse, which counts as an
    // open failure and triggers the hop.
    let mut source = create_capture("synth:noise", Some("synth:size=64x48"));
    assert!(source.is_opened());
    let (ok, frame) = source.read();
    assert!(ok);
    assert_eq!(frame.size(), FrameSize::new(64, 48).ok());
}

#[test]
fn bad_background_counts_as_open_failure() {
    let mut source = create_capture(
        "synth:bg=/definitely/not/here.png",
        Some("synth:size=64x48"),
    );
    assert!(source.is_opened());
    let (_, frame) = source.read();
    assert_eq!(frame.size(), FrameSize::new(64, 48).ok());
}

#[test]
fn stub_capture_descriptor_honors_size_param() {
    let mut source = create_capture("stub://camera:size=128x96", None);
    assert!(source.is_opened());
    let (ok, frame) = source.read();
    assert!(ok);
    assert_eq!(frame.size(), FrameSize::new(128, 96).ok());
}

#[test]
fn drive_letter_descriptor_is_one_path() {
    // Parses as a single path (which then fails to open, with no fallback).
    let source = create_capture("c:path/to/video.mp4", None);
    assert!(!source.is_opened());
}

#[test]
fn background_descriptor_streams_identical_frames_without_noise() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("bg.png");
    synthcap::Frame::filled(FrameSize::new(24, 18).unwrap(), [200, 100, 50])
        .save(&path)
        .unwrap();

    let descriptor = format!("synth:bg={}", path.to_string_lossy());
    let mut source = create_capture(&descriptor, None);
    assert!(source.is_opened());
    let (_, first) = source.read();
    let (_, second) = source.read();
    assert_eq!(first, second);
    assert_eq!(first.size(), FrameSize::new(24, 18).ok());
    assert_eq!(first.pixel(10, 10), [200, 100, 50]);
}
