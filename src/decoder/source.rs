//! Forward-only PCM sources that a streaming signal can decode from.

use crate::Result;
use std::io::{Cursor, Read};
use std::sync::Arc;

#[cfg(feature = "wav")]
use crate::Error;
#[cfg(feature = "wav")]
use std::{
    fs::File,
    io::{BufReader, Take},
    path::{Path, PathBuf},
};

/// Bytes per sample in every PCM stream this crate decodes.
pub const BYTES_PER_SAMPLE: usize = 2;

/// Layout of a 16-bit little-endian interleaved PCM stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PcmFormat {
    /// Frames per second.
    pub sample_rate: u32,
    /// Samples per frame.
    pub channels: u16,
}

impl PcmFormat {
    /// Creates a new format descriptor.
    pub fn new(sample_rate: u32, channels: u16) -> Self {
        Self {
            sample_rate,
            channels,
        }
    }

    /// Size of one frame in bytes.
    pub fn frame_bytes(&self) -> usize {
        self.channels as usize * BYTES_PER_SAMPLE
    }
}

/// A source of PCM that can be opened, read forward, and reopened from the start.
///
/// Each call to `open` must yield a fresh stream positioned at the first
/// frame; reading the same source twice must produce the same bytes.
pub trait PcmOpener: Send + Sync {
    /// The forward-readable stream of 16-bit little-endian interleaved frames.
    type Stream: Read + Send;

    /// Layout of the frames the stream produces.
    fn format(&self) -> PcmFormat;

    /// Opens a new stream at frame zero.
    fn open(&self) -> Result<Self::Stream>;

    /// Duration in seconds from container metadata, if the container has it.
    ///
    /// When this returns `None` the duration is found by decoding the whole
    /// stream once.
    fn duration_hint(&self) -> Option<f64> {
        None
    }
}

/// PCM bytes held in memory.
///
/// # Examples
///
/// ```
/// use undulate::{PcmBuffer, PcmFormat, PcmOpener};
///
/// let pcm = PcmBuffer::from_samples(PcmFormat::new(8000, 1), &[0, 16384, -16384]);
/// assert_eq!(pcm.duration_hint(), Some(3.0 / 8000.0));
/// ```
#[derive(Debug, Clone)]
pub struct PcmBuffer {
    format: PcmFormat,
    bytes: Arc<[u8]>,
}

impl PcmBuffer {
    /// Wraps already-encoded little-endian PCM bytes.
    pub fn new(format: PcmFormat, bytes: impl Into<Arc<[u8]>>) -> Self {
        Self {
            format,
            bytes: bytes.into(),
        }
    }

    /// Encodes interleaved samples into a buffer.
    pub fn from_samples(format: PcmFormat, samples: &[i16]) -> Self {
        let bytes: Vec<u8> = samples.iter().flat_map(|s| s.to_le_bytes()).collect();
        Self::new(format, bytes)
    }

    /// Number of whole frames in the buffer.
    pub fn frames(&self) -> usize {
        self.bytes.len() / self.format.frame_bytes().max(1)
    }
}

/// Read handle over a shared byte buffer.
pub struct SharedBytes(Arc<[u8]>);

impl AsRef<[u8]> for SharedBytes {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl PcmOpener for PcmBuffer {
    type Stream = Cursor<SharedBytes>;

    fn format(&self) -> PcmFormat {
        self.format
    }

    fn open(&self) -> Result<Self::Stream> {
        Ok(Cursor::new(SharedBytes(Arc::clone(&self.bytes))))
    }

    fn duration_hint(&self) -> Option<f64> {
        Some(self.frames() as f64 / self.format.sample_rate as f64)
    }
}

/// A 16-bit integer PCM WAV file on disk.
#[cfg(feature = "wav")]
#[derive(Debug, Clone)]
pub struct WavFile {
    path: PathBuf,
    format: PcmFormat,
    frames: u32,
}

#[cfg(feature = "wav")]
impl WavFile {
    /// Reads the header of a WAV file.
    ///
    /// # Errors
    ///
    /// Returns `DecodeFailure` if the file cannot be parsed or is not 16-bit
    /// integer PCM.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let reader = hound::WavReader::open(&path)
            .map_err(|e| Error::DecodeFailure(format!("{}: {e}", path.display())))?;
        let spec = reader.spec();
        if spec.sample_format != hound::SampleFormat::Int || spec.bits_per_sample != 16 {
            return Err(Error::DecodeFailure(format!(
                "{}: expected 16-bit integer PCM, found {}-bit {:?}",
                path.display(),
                spec.bits_per_sample,
                spec.sample_format
            )));
        }
        Ok(Self {
            format: PcmFormat::new(spec.sample_rate, spec.channels),
            frames: reader.duration(),
            path,
        })
    }

    /// Path of the underlying file.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[cfg(feature = "wav")]
impl PcmOpener for WavFile {
    type Stream = Take<BufReader<File>>;

    fn format(&self) -> PcmFormat {
        self.format
    }

    fn open(&self) -> Result<Self::Stream> {
        let reader = hound::WavReader::open(&self.path)
            .map_err(|e| Error::DecodeFailure(format!("{}: {e}", self.path.display())))?;
        let data_bytes = reader.len() as u64 * BYTES_PER_SAMPLE as u64;
        Ok(reader.into_inner().take(data_bytes))
    }

    fn duration_hint(&self) -> Option<f64> {
        Some(self.frames as f64 / self.format.sample_rate as f64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frame_bytes() {
        assert_eq!(PcmFormat::new(44100, 2).frame_bytes(), 4);
        assert_eq!(PcmFormat::new(8000, 1).frame_bytes(), 2);
    }

    #[test]
    fn test_buffer_reopens_from_start() {
        let pcm = PcmBuffer::from_samples(PcmFormat::new(4, 1), &[1, 2, 3, 4]);
        let mut first = Vec::new();
        pcm.open().unwrap().read_to_end(&mut first).unwrap();
        let mut second = Vec::new();
        pcm.open().unwrap().read_to_end(&mut second).unwrap();
        assert_eq!(first, second);
        assert_eq!(first, vec![1, 0, 2, 0, 3, 0, 4, 0]);
        assert_eq!(pcm.frames(), 4);
        assert_eq!(pcm.duration_hint(), Some(1.0));
    }

    #[cfg(feature = "wav")]
    #[test]
    fn test_wav_file_rejects_float() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("float.wav");
        let spec = hound::WavSpec {
            channels: 1,
            sample_rate: 8000,
            bits_per_sample: 32,
            sample_format: hound::SampleFormat::Float,
        };
        let mut writer = hound::WavWriter::create(&path, spec).unwrap();
        writer.write_sample(0.5f32).unwrap();
        writer.finalize().unwrap();

        assert!(matches!(WavFile::open(&path), Err(Error::DecodeFailure(_))));
    }

    #[cfg(feature = "wav")]
    #[test]
    fn test_wav_file_stream_is_raw_pcm() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pcm.wav");
        let spec = hound::WavSpec {
            channels: 2,
            sample_rate: 8000,
            bits_per_sample: 16,
            sample_format: hound::SampleFormat::Int,
        };
        let mut writer = hound::WavWriter::create(&path, spec).unwrap();
        for s in [1i16, -1, 256, -256] {
            writer.write_sample(s).unwrap();
        }
        writer.finalize().unwrap();

        let wav = WavFile::open(&path).unwrap();
        assert_eq!(wav.format(), PcmFormat::new(8000, 2));
        assert_eq!(wav.duration_hint(), Some(2.0 / 8000.0));

        let mut bytes = Vec::new();
        wav.open().unwrap().read_to_end(&mut bytes).unwrap();
        let samples: Vec<i16> = bytes
            .chunks_exact(2)
            .map(|b| i16::from_le_bytes([b[0], b[1]]))
            .collect();
        assert_eq!(samples, vec![1, -1, 256, -256]);
    }
}
