//! Live playback: a background thread rendering a signal into an audio sink.

use super::options::RenderOptions;
use super::pcm::PcmReader;
use crate::decoder::PcmFormat;
use crate::{Error, Result, Signal};
use std::io::Read;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::{self, JoinHandle};

/// A device that accepts a stream of 16-bit little-endian PCM bytes.
///
/// Sinks are opened on the playback thread by the opener passed to [`play`],
/// so implementations do not need to be `Send`.
pub trait AudioSink {
    /// Begins rendering written bytes.
    fn start(&mut self) -> Result<()>;

    /// Queues bytes for the device. May block until there is room.
    fn write(&mut self, bytes: &[u8]) -> Result<()>;

    /// Blocks until everything written so far has been rendered.
    fn flush(&mut self) -> Result<()> {
        Ok(())
    }

    /// Stops rendering.
    fn stop(&mut self) -> Result<()>;

    /// Releases the device.
    fn close(&mut self) -> Result<()>;
}

/// Handle to a running playback.
///
/// Dropping the handle detaches the playback; it keeps running until the
/// signal ends.
pub struct PlaybackHandle {
    cancel: Arc<AtomicBool>,
    thread: Option<JoinHandle<Result<()>>>,
}

impl PlaybackHandle {
    /// Asks the playback to stop.
    ///
    /// The flag is checked between blocks, so the device stops within one
    /// block of audio rather than immediately.
    pub fn cancel(&self) {
        self.cancel.store(true, Ordering::Release);
    }

    /// Returns a callback that cancels the playback when invoked.
    pub fn canceller(&self) -> impl Fn() + Send + Sync + 'static {
        let cancel = Arc::clone(&self.cancel);
        move || cancel.store(true, Ordering::Release)
    }

    /// Returns true once the playback thread has exited.
    pub fn is_finished(&self) -> bool {
        self.thread.as_ref().is_none_or(JoinHandle::is_finished)
    }

    /// Cancels the playback and waits for the device to be released.
    pub fn stop(mut self) -> Result<()> {
        self.cancel();
        self.join()
    }

    /// Waits for the playback to finish on its own.
    pub fn wait(mut self) -> Result<()> {
        self.join()
    }

    fn join(&mut self) -> Result<()> {
        match self.thread.take() {
            Some(thread) => thread
                .join()
                .map_err(|_| Error::Device("playback thread panicked".to_string()))?,
            None => Ok(()),
        }
    }
}

/// Plays a signal on a background thread.
///
/// `open_sink` is called on the playback thread with the output format.
/// The thread renders `options.block_frames` frames at a time from byte
/// zero and writes each block to the sink until the whole signal has been
/// written or the returned handle is cancelled. The sink is always stopped
/// and closed before the thread exits.
pub fn play<S, K, F>(signal: S, open_sink: F, options: RenderOptions) -> Result<PlaybackHandle>
where
    S: Signal + 'static,
    K: AudioSink,
    F: FnOnce(PcmFormat) -> Result<K> + Send + 'static,
{
    let reader = PcmReader::new(signal, options)?;
    let cancel = Arc::new(AtomicBool::new(false));
    let flag = Arc::clone(&cancel);
    let thread = thread::Builder::new()
        .name("undulate-playback".to_string())
        .spawn(move || run(reader, open_sink, options, &flag))?;
    Ok(PlaybackHandle {
        cancel,
        thread: Some(thread),
    })
}

fn run<S, K, F>(
    mut reader: PcmReader<S>,
    open_sink: F,
    options: RenderOptions,
    cancel: &AtomicBool,
) -> Result<()>
where
    S: Signal,
    K: AudioSink,
    F: FnOnce(PcmFormat) -> Result<K>,
{
    let format = reader.format();
    let mut sink = open_sink(format)?;
    log::debug!(
        "playback started: {} frames, {} channels at {} Hz",
        reader.total_frames(),
        format.channels,
        format.sample_rate
    );

    let played = sink.start().and_then(|()| pump(&mut reader, &mut sink, options, cancel));
    let played = match played {
        Ok(true) => sink.flush(),
        Ok(false) => {
            log::debug!("playback cancelled at byte {}", reader.position());
            Ok(())
        }
        Err(err) => Err(err),
    };
    let stopped = sink.stop();
    let closed = sink.close();
    played.and(stopped).and(closed)
}

/// Streams blocks into the sink. Returns false if cancelled.
fn pump<S: Signal, K: AudioSink>(
    reader: &mut PcmReader<S>,
    sink: &mut K,
    options: RenderOptions,
    cancel: &AtomicBool,
) -> Result<bool> {
    let mut block = vec![0u8; options.block_frames.max(1) * reader.format().frame_bytes()];
    loop {
        if cancel.load(Ordering::Acquire) {
            return Ok(false);
        }
        let n = reader.read(&mut block)?;
        if n == 0 {
            return Ok(true);
        }
        sink.write(&block[..n])?;
    }
}
