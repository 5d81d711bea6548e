//! Renders a short composed phrase to a WAV file.
//!
//! Usage: cargo run --example render_wav -- [output.wav]

use anyhow::Result;
use undulate::{RenderOptions, SignalExt, mix, save_wav, segmented_linear, sinusoid, square_wave};

fn main() -> Result<()> {
    env_logger::init();
    let path = std::env::args().nth(1).unwrap_or_else(|| "phrase.wav".to_string());

    // Two notes one after the other, shaped by fades
    let first = sinusoid(1.0, 440.0).fade_in(0.05).fade_out(0.2);
    let second = sinusoid(1.0, 660.0).fade_in(0.05).fade_out(0.4);
    let melody = first.append(second)?;

    // A quiet buzz that swells in the middle
    let swell = segmented_linear(&[0.0, 1.0, 0.3, 1.0, 0.0])?;
    let buzz = square_wave(2.0, 110.0, 0.5).gain(0.2).multiply(swell)?;

    let phrase = mix(melody.gain(0.6), buzz)?.to_stereo()?.pan(0.3)?;

    let options = RenderOptions::default();
    let frames = save_wav(phrase, &path, options)?;
    println!(
        "Wrote {frames} frames ({:.2} s) to {path}",
        frames as f64 / options.sample_rate as f64
    );
    Ok(())
}
