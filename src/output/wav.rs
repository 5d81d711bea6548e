//! Serializing signals to WAV containers.

use super::options::RenderOptions;
use super::pcm::{PcmReader, decode_samples};
use crate::{Result, Signal};
use std::fs::File;
use std::io::{BufWriter, Read, Seek, Write};
use std::path::Path;

/// Renders a signal into a 16-bit PCM WAV stream.
///
/// The signal is pulled through a [`PcmReader`] one block at a time, so only
/// `options.block_frames` frames are ever held in memory.
///
/// # Returns
///
/// The number of frames written
pub fn write_wav<S, W>(signal: S, writer: W, options: RenderOptions) -> Result<u64>
where
    S: Signal,
    W: Write + Seek,
{
    let mut reader = PcmReader::new(signal, options)?;
    let format = reader.format();
    let spec = hound::WavSpec {
        channels: format.channels,
        sample_rate: format.sample_rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };
    let mut wav = hound::WavWriter::new(writer, spec)?;

    let mut block = vec![0u8; options.block_frames.max(1) * format.frame_bytes()];
    loop {
        let n = reader.read(&mut block)?;
        if n == 0 {
            break;
        }
        for sample in decode_samples(&block[..n]) {
            wav.write_sample(sample)?;
        }
    }
    wav.finalize()?;
    Ok(reader.total_frames())
}

/// Renders a signal into a WAV file at `path`.
///
/// # Examples
///
/// ```no_run
/// use undulate::{save_wav, sinusoid, RenderOptions};
///
/// save_wav(sinusoid(1.0, 440.0), "tone.wav", RenderOptions::default()).unwrap();
/// ```
pub fn save_wav<S, P>(signal: S, path: P, options: RenderOptions) -> Result<u64>
where
    S: Signal,
    P: AsRef<Path>,
{
    let path = path.as_ref();
    let file = BufWriter::new(File::create(path)?);
    let frames = write_wav(signal, file, options)?;
    log::debug!("wrote {frames} frames to {}", path.display());
    Ok(frames)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{constant, linear};
    use std::io::Cursor;

    #[test]
    fn test_write_wav_header_and_samples() {
        let options = RenderOptions::default()
            .with_sample_rate(8000)
            .with_oversample(1)
            .with_block_frames(3);
        let mut buffer = Cursor::new(Vec::new());
        let frames = write_wav(constant(0.01, 0.5, 2), &mut buffer, options).unwrap();
        assert_eq!(frames, 80);

        buffer.set_position(0);
        let mut reader = hound::WavReader::new(buffer).unwrap();
        let spec = reader.spec();
        assert_eq!(spec.channels, 2);
        assert_eq!(spec.sample_rate, 8000);
        assert_eq!(spec.bits_per_sample, 16);
        assert_eq!(reader.duration(), 80);
        assert!(reader.samples::<i16>().all(|s| s.unwrap() == 16383));
    }

    #[test]
    fn test_save_wav_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ramp.wav");
        let options = RenderOptions::default().with_sample_rate(1000);
        let frames = save_wav(linear(0.5, -1.0, 1.0, 1), &path, options).unwrap();
        assert_eq!(frames, 500);

        let reader = hound::WavReader::open(&path).unwrap();
        assert_eq!(reader.duration(), 500);
    }
}
