//! synthcap - grab frames from one or more video source descriptors.
//!
//! Headless demo of the source abstraction: resolves every descriptor
//! (falling back to the chess preset when a source cannot open), pulls a
//! bounded number of frames from each, and optionally saves them as
//! sequentially numbered shots per source index.

use anyhow::{anyhow, Result};
use clap::Parser;
use std::fs;
use std::path::PathBuf;

use synthcap::{create_capture, preset, BoxedSource, FrameSource};

#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Source descriptors: device index, file path, or synth:<params>.
    sources: Vec<String>,
    /// Directory for saved shots.
    #[arg(long, default_value = ".")]
    shotdir: PathBuf,
    /// Number of frames to grab from each source.
    #[arg(long, default_value_t = 30)]
    frames: u32,
    /// Save every grabbed frame as shot_<source>_<frame>.png.
    #[arg(long)]
    save: bool,
    /// Fallback preset when a source fails to open.
    #[arg(long, default_value = "chess")]
    fallback: String,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let fallback = preset(&args.fallback)
        .ok_or_else(|| anyhow!("unknown fallback preset {:?}", args.fallback))?;

    let sources = if args.sources.is_empty() {
        vec!["0".to_string()]
    } else {
        args.sources.clone()
    };

    let mut caps: Vec<BoxedSource> = sources
        .iter()
        .map(|descriptor| create_capture(descriptor, Some(&fallback)))
        .collect();

    for (i, (descriptor, cap)) in sources.iter().zip(&caps).enumerate() {
        if !cap.is_opened() {
            log::warn!("source {i} ({descriptor}) did not open; reads will fail");
        }
    }

    if args.save {
        fs::create_dir_all(&args.shotdir)?;
    }

    let mut shot_idx = 0u32;
    for _ in 0..args.frames {
        for (i, cap) in caps.iter_mut().enumerate() {
            let (ok, frame) = cap.read();
            if !ok {
                log::debug!("source {i}: read failed");
                continue;
            }
            if args.save {
                let path = args.shotdir.join(format!("shot_{i}_{shot_idx:03}.png"));
                frame.save(&path)?;
                log::info!("{} saved", path.display());
            }
        }
        shot_idx += 1;
    }

    Ok(())
}
