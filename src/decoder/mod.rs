//! Decoding PCM sources into signals.
//!
//! This module contains the reopenable source abstraction and the windowed
//! streaming signal built on top of it.

mod source;
mod streaming;

#[cfg(feature = "wav")]
pub use source::WavFile;
pub use source::{BYTES_PER_SAMPLE, PcmBuffer, PcmFormat, PcmOpener, SharedBytes};
#[cfg(feature = "wav")]
pub use streaming::read_wav;
pub use streaming::{DecoderOptions, DecoderState, StreamingSignal};
