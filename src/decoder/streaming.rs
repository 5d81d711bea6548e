//! A signal backed by a forward-only PCM decode stream.
//!
//! # Design Overview
//!
//! Containers usually only expose a stream that can be read forwards, while
//! signals are sampled at arbitrary times. `StreamingSignal` bridges the two
//! with a sliding window of decoded frames:
//!
//! 1. **Hit**: the requested frame is inside the window, nothing is read.
//! 2. **Forward gap**: frames between the stream position and the requested
//!    frame are read and dropped in bounded chunks, then the window is refilled
//!    starting at the requested frame.
//! 3. **Backward seek**: the stream is closed and reopened from the start,
//!    then handled as a forward gap.
//!
//! Forward and local access is cheap; going backwards costs a full reopen, so
//! callers should prefer increasing query times.
//!
//! If a discard comes up short or a refill reads nothing, the window is
//! invalidated and queries return silence until a backward seek rewinds the
//! stream. Mid-stream I/O errors are treated the same way and logged rather
//! than propagated, so a damaged file degrades to silence instead of aborting
//! a render.
//!
//! All mutable state lives behind one `Mutex` per instance, so a signal can
//! be shared between threads, but concurrent readers will fight over the
//! window and should be avoided.

use super::source::{BYTES_PER_SAMPLE, PcmFormat, PcmOpener};
use crate::{Error, Frame, Result, Signal};
use std::io::{self, ErrorKind, Read};
use std::sync::{Mutex, MutexGuard, PoisonError};

/// Window and discard sizing for a streaming signal.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DecoderOptions {
    /// Seconds of audio decoded into the window on every refill.
    pub window_seconds: f64,
    /// Frames read per chunk while discarding a forward gap.
    pub discard_chunk_frames: usize,
}

impl Default for DecoderOptions {
    fn default() -> Self {
        Self {
            window_seconds: 10.0,
            discard_chunk_frames: 4096,
        }
    }
}

impl DecoderOptions {
    /// Sets the window length in seconds.
    pub fn with_window_seconds(mut self, seconds: f64) -> Self {
        self.window_seconds = seconds;
        self
    }

    /// Sets the discard chunk size in frames.
    pub fn with_discard_chunk_frames(mut self, frames: usize) -> Self {
        self.discard_chunk_frames = frames;
        self
    }
}

/// Where the decode cursor stands after the last query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecoderState {
    /// No window has been decoded since the stream was (re)opened.
    Unpositioned,
    /// The window holds decoded frames.
    Positioned,
    /// The stream ran out or failed; queries return silence until a rewind.
    Exhausted,
    /// The stream and window were released by `close`.
    Closed,
}

/// Inclusive range of frames held in the window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Window {
    start: u64,
    end: u64,
}

impl Window {
    fn contains(&self, frame: u64) -> bool {
        self.start <= frame && frame <= self.end
    }
}

/// Mutable decode state guarded by the signal's lock.
struct DecodeCursor<R> {
    stream: Option<R>,
    /// Frames consumed from `stream` so far.
    position: u64,
    buffer: Vec<u8>,
    scratch: Vec<u8>,
    window: Option<Window>,
    state: DecoderState,
}

impl<R: Read> DecodeCursor<R> {
    fn new(stream: R) -> Self {
        Self {
            stream: Some(stream),
            position: 0,
            buffer: Vec::new(),
            scratch: Vec::new(),
            window: None,
            state: DecoderState::Unpositioned,
        }
    }

    fn invalidate(&mut self) {
        self.window = None;
        self.state = DecoderState::Exhausted;
    }

    fn release(&mut self) {
        self.stream = None;
        self.buffer = Vec::new();
        self.scratch = Vec::new();
        self.window = None;
        self.position = 0;
        self.state = DecoderState::Closed;
    }

    fn frame_at(&self, frame: u64, format: PcmFormat) -> Option<Frame> {
        let window = self.window?;
        if !window.contains(frame) {
            return None;
        }
        let offset = (frame - window.start) as usize * format.frame_bytes();
        let bytes = self.buffer.get(offset..offset + format.frame_bytes())?;
        Some(
            bytes
                .chunks_exact(BYTES_PER_SAMPLE)
                .map(|b| i16::from_le_bytes([b[0], b[1]]) as f64 / 32768.0)
                .collect(),
        )
    }
}

/// A signal that decodes PCM lazily from a reopenable source.
///
/// The duration is fixed when the signal is opened: from the source's
/// metadata when it has any, otherwise by decoding the stream once.
///
/// # Examples
///
/// ```
/// use undulate::{PcmBuffer, PcmFormat, StreamingSignal, Signal, sample};
///
/// let pcm = PcmBuffer::from_samples(PcmFormat::new(4, 1), &[0, 16384, -16384, 0]);
/// let signal = StreamingSignal::open(pcm).unwrap();
/// assert_eq!(signal.duration(), 1.0);
/// assert_eq!(sample(&signal, 0.25), vec![0.5]);
/// assert_eq!(sample(&signal, 0.5), vec![-0.5]);
/// ```
pub struct StreamingSignal<O: PcmOpener> {
    opener: O,
    format: PcmFormat,
    duration: f64,
    total_frames: u64,
    window_frames: usize,
    discard_chunk_frames: usize,
    cursor: Mutex<DecodeCursor<O::Stream>>,
}

impl<O: PcmOpener> StreamingSignal<O> {
    /// Opens a streaming signal with default window sizing.
    pub fn open(opener: O) -> Result<Self> {
        Self::with_options(opener, DecoderOptions::default())
    }

    /// Opens a streaming signal.
    ///
    /// # Errors
    ///
    /// Returns `DecodeFailure` if the format is unusable or the source cannot
    /// be opened or read while measuring its duration.
    pub fn with_options(opener: O, options: DecoderOptions) -> Result<Self> {
        let format = opener.format();
        if format.channels == 0 || format.sample_rate == 0 {
            return Err(Error::DecodeFailure(format!(
                "unusable PCM format: {} channels at {} Hz",
                format.channels, format.sample_rate
            )));
        }
        let rate = format.sample_rate as f64;

        let stream = opener.open()?;
        let (duration, stream) = match opener.duration_hint() {
            Some(duration) => (duration, stream),
            None => {
                let frames = count_frames(stream, format)?;
                (frames as f64 / rate, opener.open()?)
            }
        };

        let window_frames = (options.window_seconds * rate).ceil().max(1.0) as usize;
        log::debug!(
            "opened PCM stream: {} channels at {} Hz, {:.3}s, window of {} frames",
            format.channels,
            format.sample_rate,
            duration,
            window_frames
        );

        Ok(Self {
            opener,
            format,
            duration,
            total_frames: (duration * rate).round() as u64,
            window_frames,
            discard_chunk_frames: options.discard_chunk_frames.max(1),
            cursor: Mutex::new(DecodeCursor::new(stream)),
        })
    }

    /// Layout of the underlying PCM.
    pub fn format(&self) -> PcmFormat {
        self.format
    }

    /// Current state of the decode cursor.
    pub fn state(&self) -> DecoderState {
        self.lock().state
    }

    /// Releases the decode stream and window.
    ///
    /// After closing, every query returns silence. Closing twice is a no-op.
    /// Dropping the signal releases the same resources.
    pub fn close(&self) {
        let mut cursor = self.lock();
        if cursor.state != DecoderState::Closed {
            log::debug!("closing PCM stream");
            cursor.release();
        }
    }

    fn lock(&self) -> MutexGuard<'_, DecodeCursor<O::Stream>> {
        // The cursor is left consistent between statements, so a poisoned lock is still usable.
        self.cursor.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Moves the window so it covers `frame`, reading or reopening as needed.
    fn position(&self, cursor: &mut DecodeCursor<O::Stream>, frame: u64) -> Result<()> {
        if cursor.window.is_some_and(|w| w.contains(frame)) {
            return Ok(());
        }

        let behind = match cursor.window {
            Some(window) => frame < window.start,
            None => frame < cursor.position,
        };
        if !behind && cursor.stream.is_none() {
            // A failed stream stays silent from the failure point onwards.
            return Err(Error::StreamExhausted {
                requested: frame - cursor.position + 1,
                available: 0,
            });
        }
        if behind {
            log::debug!("rewinding PCM stream to reach frame {frame}");
            cursor.stream = None;
            cursor.stream = Some(self.opener.open()?);
            cursor.position = 0;
        }
        cursor.window = None;
        cursor.state = DecoderState::Unpositioned;

        let frame_bytes = self.format.frame_bytes();
        let DecodeCursor {
            stream,
            position,
            buffer,
            scratch,
            ..
        } = &mut *cursor;
        let Some(stream) = stream.as_mut() else {
            return Ok(());
        };

        let gap = frame - *position;
        if gap > 0 {
            scratch.resize(self.discard_chunk_frames * frame_bytes, 0);
            let skipped = discard(stream, gap * frame_bytes as u64, scratch);
            *position += skipped.as_ref().map_or(0, |n| n / frame_bytes as u64);
            let skipped = skipped?;
            if skipped < gap * frame_bytes as u64 {
                return Err(Error::StreamExhausted {
                    requested: gap,
                    available: skipped / frame_bytes as u64,
                });
            }
        }

        buffer.resize(self.window_frames * frame_bytes, 0);
        let read = read_full(stream, buffer)?;
        let frames = (read / frame_bytes) as u64;
        *position += frames;
        if frames == 0 {
            return Err(Error::StreamExhausted {
                requested: self.window_frames as u64,
                available: 0,
            });
        }

        log::trace!("decoded window of {frames} frames starting at {frame}");
        cursor.window = Some(Window {
            start: frame,
            end: frame + frames - 1,
        });
        cursor.state = DecoderState::Positioned;
        Ok(())
    }
}

impl<O: PcmOpener> Signal for StreamingSignal<O> {
    fn duration(&self) -> f64 {
        self.duration
    }

    fn channels(&self) -> usize {
        self.format.channels as usize
    }

    fn amplitudes_at(&self, t: f64) -> Frame {
        let silent = || vec![0.0; self.format.channels as usize];
        let frame = frame_index(t, self.format.sample_rate);
        if !(frame >= 0.0 && frame < self.total_frames as f64) {
            return silent();
        }
        let frame = frame as u64;

        let mut cursor = self.lock();
        if cursor.state == DecoderState::Closed {
            return silent();
        }
        if let Err(err) = self.position(&mut cursor, frame) {
            match err {
                Error::StreamExhausted { .. } => log::debug!("{err} at frame {frame}"),
                _ => {
                    log::warn!("decode error at frame {frame}, returning silence: {err}");
                    // The stream offset is unknown after a failed read.
                    cursor.stream = None;
                    cursor.position = frame;
                }
            }
            cursor.invalidate();
        }
        cursor.frame_at(frame, self.format).unwrap_or_else(silent)
    }
}

impl<O: PcmOpener> Drop for StreamingSignal<O> {
    fn drop(&mut self) {
        self.close();
    }
}

/// Opens a 16-bit WAV file as a streaming signal.
#[cfg(feature = "wav")]
pub fn read_wav<P: AsRef<std::path::Path>>(
    path: P,
) -> Result<StreamingSignal<super::source::WavFile>> {
    StreamingSignal::open(super::source::WavFile::open(path)?)
}

/// Maps a time to the frame that contains it.
///
/// `index / rate` can land an ulp short of `index` when multiplied back, so
/// products within a relative 1e-9 of the next integer round up to it.
fn frame_index(t: f64, sample_rate: u32) -> f64 {
    let position = t * sample_rate as f64;
    (position + position.abs().max(1.0) * FRAME_EPSILON).floor()
}

const FRAME_EPSILON: f64 = 1e-9;

fn count_frames<R: Read>(mut stream: R, format: PcmFormat) -> Result<u64> {
    let bytes = io::copy(&mut stream, &mut io::sink())
        .map_err(|e| Error::DecodeFailure(format!("failed to measure PCM stream: {e}")))?;
    Ok(bytes / format.frame_bytes() as u64)
}

/// Reads and drops up to `bytes` bytes, one scratch-sized chunk at a time.
fn discard<R: Read>(stream: &mut R, bytes: u64, scratch: &mut [u8]) -> io::Result<u64> {
    let mut remaining = bytes;
    while remaining > 0 {
        let want = remaining.min(scratch.len() as u64) as usize;
        match stream.read(&mut scratch[..want]) {
            Ok(0) => break,
            Ok(n) => remaining -= n as u64,
            Err(e) if e.kind() == ErrorKind::Interrupted => {}
            Err(e) => return Err(e),
        }
    }
    Ok(bytes - remaining)
}

/// Reads until `buffer` is full or the stream ends.
fn read_full<R: Read>(stream: &mut R, buffer: &mut [u8]) -> io::Result<usize> {
    let mut filled = 0;
    while filled < buffer.len() {
        match stream.read(&mut buffer[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == ErrorKind::Interrupted => {}
            Err(e) => return Err(e),
        }
    }
    Ok(filled)
}
