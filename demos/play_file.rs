//! Plays a 16-bit PCM WAV file through the default output device.
//!
//! Usage: cargo run --example play_file --features playback -- <file.wav> [start] [end]
//!
//! The optional start and end arguments trim the file (in seconds). Press
//! Enter to stop early.

use anyhow::{Context, Result};
use std::io::stdin;
use std::thread;
use undulate::{RenderOptions, Signal, SignalExt, play_default, read_wav};

fn main() -> Result<()> {
    env_logger::init();
    let mut args = std::env::args().skip(1);
    let path = args.next().context("usage: play_file <file.wav> [start] [end]")?;

    let file = read_wav(&path)?;
    let duration = file.duration();
    let start: f64 = args.next().map(|s| s.parse::<f64>()).transpose()?.unwrap_or(0.0);
    let end: f64 = args.next().map(|s| s.parse::<f64>()).transpose()?.unwrap_or(duration);
    println!(
        "{path}: {} channels at {} Hz, {duration:.2} s",
        file.channels(),
        file.format().sample_rate
    );

    let clip = file.trim(start, end.min(duration))?.fade_out(0.05).to_stereo()?;
    let handle = play_default(clip, RenderOptions::default())?;

    // Cancel from the keyboard while the main thread waits for completion
    let cancel = handle.canceller();
    thread::spawn(move || {
        let mut line = String::new();
        if stdin().read_line(&mut line).is_ok() {
            cancel();
        }
    });

    handle.wait()?;
    println!("Done");
    Ok(())
}
