//! Lazy encoding of signals into 16-bit little-endian PCM bytes.

use super::options::RenderOptions;
use crate::decoder::{BYTES_PER_SAMPLE, PcmFormat};
use crate::{Error, Frame, Result, Signal, oversample};
use std::io::{self, Read};

/// Largest magnitude written for a full-scale sample.
pub const FULL_SCALE: f64 = 32767.0;

/// Appends a frame to `out` as clamped 16-bit little-endian samples.
///
/// # Examples
///
/// ```
/// use undulate::encode_frame;
///
/// let mut bytes = Vec::new();
/// encode_frame(&[1.0, -2.0], &mut bytes);
/// assert_eq!(bytes, [0xff, 0x7f, 0x01, 0x80]);
/// ```
pub fn encode_frame(frame: &[f64], out: &mut Vec<u8>) {
    for &value in frame {
        let quantized = (value * FULL_SCALE).clamp(-FULL_SCALE, FULL_SCALE) as i16;
        out.extend_from_slice(&quantized.to_le_bytes());
    }
}

/// Renders the oversampled frame at output position `index`.
pub fn render_frame<S: Signal + ?Sized>(
    signal: &S,
    index: u64,
    options: &RenderOptions,
) -> Result<Frame> {
    let t = index as f64 / options.sample_rate as f64;
    oversample(signal, t, options.oversample.max(1), options.oversample_step())
}

/// Renders every output frame of a signal into memory.
pub fn render_frames<S: Signal + ?Sized>(signal: &S, options: &RenderOptions) -> Result<Vec<Frame>> {
    (0..options.frames_for(signal.duration()))
        .map(|index| render_frame(signal, index, options))
        .collect()
}

/// A pull-based byte stream over a signal.
///
/// Bytes are rendered only when read, so a container writer or device can
/// consume a signal of any length without it ever being materialized. The
/// stream ends once `duration * sample_rate` frames have been produced.
///
/// `mark` and `reset` save and restore the read position so a consumer can
/// re-read a range; the signal is simply sampled again.
///
/// # Examples
///
/// ```
/// use std::io::Read;
/// use undulate::{PcmReader, RenderOptions, constant};
///
/// let options = RenderOptions::default().with_sample_rate(10);
/// let mut reader = PcmReader::new(constant(1.0, 0.5, 2), options).unwrap();
/// assert_eq!(reader.total_bytes(), 40);
///
/// let mut bytes = Vec::new();
/// reader.read_to_end(&mut bytes).unwrap();
/// assert_eq!(bytes.len(), 40);
/// assert_eq!(reader.available(), 0);
/// ```
pub struct PcmReader<S: Signal> {
    signal: S,
    options: RenderOptions,
    format: PcmFormat,
    total_bytes: u64,
    position: u64,
    mark: u64,
    scratch: Vec<u8>,
}

impl<S: Signal> PcmReader<S> {
    /// Creates a reader positioned at the first byte.
    ///
    /// # Errors
    ///
    /// Returns `UnsupportedChannelCount` if the signal has more channels
    /// than a PCM stream can carry.
    pub fn new(signal: S, options: RenderOptions) -> Result<Self> {
        let channels = u16::try_from(signal.channels())
            .map_err(|_| Error::UnsupportedChannelCount(signal.channels()))?;
        let format = PcmFormat::new(options.sample_rate, channels);
        let total_bytes = options.frames_for(signal.duration()) * format.frame_bytes() as u64;
        Ok(Self {
            signal,
            options,
            format,
            total_bytes,
            position: 0,
            mark: 0,
            scratch: Vec::new(),
        })
    }

    /// Layout of the bytes this reader produces.
    pub fn format(&self) -> PcmFormat {
        self.format
    }

    /// Total number of bytes the stream will produce.
    pub fn total_bytes(&self) -> u64 {
        self.total_bytes
    }

    /// Total number of frames the stream will produce.
    pub fn total_frames(&self) -> u64 {
        self.total_bytes / self.format.frame_bytes() as u64
    }

    /// Current read position in bytes.
    pub fn position(&self) -> u64 {
        self.position
    }

    /// Bytes left before the end of the stream.
    pub fn available(&self) -> u64 {
        self.total_bytes - self.position
    }

    /// Remembers the current position for a later `reset`.
    pub fn mark(&mut self) {
        self.mark = self.position;
    }

    /// Returns to the last marked position, or the start if none was marked.
    pub fn reset(&mut self) {
        self.position = self.mark;
    }

    /// Skips up to `n` bytes without rendering them.
    ///
    /// # Returns
    ///
    /// The number of bytes actually skipped
    pub fn skip(&mut self, n: u64) -> u64 {
        let skipped = n.min(self.available());
        self.position += skipped;
        skipped
    }

    /// Turns the reader into an iterator of encoded chunks of at most `chunk_bytes` bytes.
    pub fn chunks(self, chunk_bytes: usize) -> PcmChunks<S> {
        PcmChunks {
            reader: self,
            chunk_bytes: chunk_bytes.max(1),
        }
    }

    /// Gets back the signal.
    pub fn into_inner(self) -> S {
        self.signal
    }
}

impl<S: Signal> Read for PcmReader<S> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let len = (buf.len() as u64).min(self.available()) as usize;
        if len == 0 {
            return Ok(0);
        }

        let frame_bytes = self.format.frame_bytes() as u64;
        let first = self.position / frame_bytes;
        let last = (self.position + len as u64 - 1) / frame_bytes;

        self.scratch.clear();
        for index in first..=last {
            let frame = render_frame(&self.signal, index, &self.options).map_err(io::Error::other)?;
            encode_frame(&frame, &mut self.scratch);
        }

        let offset = (self.position - first * frame_bytes) as usize;
        buf[..len].copy_from_slice(&self.scratch[offset..offset + len]);
        self.position += len as u64;
        Ok(len)
    }
}

/// Iterator over encoded chunks of a [`PcmReader`].
pub struct PcmChunks<S: Signal> {
    reader: PcmReader<S>,
    chunk_bytes: usize,
}

impl<S: Signal> Iterator for PcmChunks<S> {
    type Item = io::Result<Vec<u8>>;

    fn next(&mut self) -> Option<Self::Item> {
        let mut chunk = vec![0; self.chunk_bytes];
        match self.reader.read(&mut chunk) {
            Ok(0) => None,
            Ok(n) => {
                chunk.truncate(n);
                Some(Ok(chunk))
            }
            Err(e) => Some(Err(e)),
        }
    }
}

/// Decodes little-endian PCM bytes into samples.
pub(crate) fn decode_samples(bytes: &[u8]) -> impl Iterator<Item = i16> + '_ {
    bytes
        .chunks_exact(BYTES_PER_SAMPLE)
        .map(|b| i16::from_le_bytes([b[0], b[1]]))
}
