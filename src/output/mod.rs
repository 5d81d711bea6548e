//! Rendering signals to PCM bytes, WAV files and audio devices.

mod options;
mod pcm;
mod playback;

#[cfg(feature = "playback")]
mod device;
#[cfg(feature = "wav")]
mod wav;

pub use options::RenderOptions;
pub use pcm::{FULL_SCALE, PcmChunks, PcmReader, encode_frame, render_frame, render_frames};
pub use playback::{AudioSink, PlaybackHandle, play};

#[cfg(feature = "playback")]
pub use device::{CpalSink, play_default};
#[cfg(feature = "wav")]
pub use wav::{save_wav, write_wav};
