//! Undulate - continuous-time audio signals for Rust
//!
//! A [`Signal`] is sound as a function of time: it has a duration, a fixed
//! channel count, and can be asked for its amplitudes at any instant. Signals
//! are built by composing generators with combinators, backed by decoded PCM
//! through [`StreamingSignal`], and turned back into discrete samples by the
//! output adapters, which oversample every frame.
//!
//! # Examples
//!
//! ```
//! use undulate::{RenderOptions, Signal, SignalExt, render_frames, sinusoid};
//!
//! let tone = sinusoid(1.0, 440.0)
//!     .fade_in(0.1)
//!     .fade_out(0.1)
//!     .gain(0.5)
//!     .to_stereo()
//!     .unwrap();
//! assert_eq!(tone.channels(), 2);
//!
//! let options = RenderOptions::default().with_sample_rate(8000);
//! assert_eq!(render_frames(&tone, &options).unwrap().len(), 8000);
//! ```

pub mod combinators;
pub mod decoder;
pub mod error;
pub mod generators;
pub mod inspect;
pub mod output;
pub mod oversample;
pub mod signals;

// Re-export commonly used types at the crate root
pub use combinators::{
    SignalExt, append, fade_in, fade_out, gain, mix, multiplex, multiply, pan, segmented_linear,
    timeshift, to_stereo, trim,
};
pub use decoder::{DecoderOptions, DecoderState, PcmBuffer, PcmFormat, PcmOpener, StreamingSignal};
pub use error::{Error, Result};
pub use generators::{constant, linear, silence, sinusoid, square_wave, white_noise};
pub use output::{
    AudioSink, PcmReader, PlaybackHandle, RenderOptions, encode_frame, play, render_frame,
    render_frames,
};
pub use oversample::oversample;
pub use signals::{BoxedSignal, FnSignal, Frame, Signal, channel_count, make_signal, sample};

#[cfg(feature = "wav")]
pub use decoder::{WavFile, read_wav};
#[cfg(feature = "playback")]
pub use output::{CpalSink, play_default};
#[cfg(feature = "wav")]
pub use output::{save_wav, write_wav};
