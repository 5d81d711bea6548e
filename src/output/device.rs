//! Audio device sink backed by cpal.

use super::options::RenderOptions;
use super::pcm::decode_samples;
use super::playback::{AudioSink, PlaybackHandle, play};
use crate::decoder::PcmFormat;
use crate::{Error, Result, Signal};
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{FromSample, Sample, SampleFormat, SizedSample, StreamConfig};
use ringbuf::traits::{Consumer, Observer, Producer, Split};
use ringbuf::{HeapCons, HeapProd, HeapRb};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::{Duration, Instant};

/// Samples buffered between the playback thread and the device callback.
const RING_BUFFER_SIZE: usize = 16_384;

/// How long `write` and `flush` wait for the device to drain the buffer.
const DRAIN_POLL: Duration = Duration::from_millis(5);

/// Sink for the default output device.
///
/// Written samples are queued in a ring buffer that the device callback
/// drains. When the buffer runs dry the device plays silence.
///
/// If the stream reports an error, or the device stops draining the buffer
/// for longer than it takes to play a full buffer, `write` and `flush` fail
/// with `Device` instead of waiting forever.
pub struct CpalSink {
    producer: HeapProd<i16>,
    stream: Option<cpal::Stream>,
    failed: Arc<AtomicBool>,
    stall_timeout: Duration,
}

impl CpalSink {
    /// Opens the default output device with the given format.
    ///
    /// # Errors
    ///
    /// Returns `Device` if no output device exists or it rejects the format.
    pub fn open_default(format: PcmFormat) -> Result<Self> {
        let host = cpal::default_host();
        let device = host
            .default_output_device()
            .ok_or_else(|| Error::Device("no output device available".to_string()))?;
        log::info!(
            "opening {} on {}",
            device.name().unwrap_or_else(|_| "unknown device".to_string()),
            host.id().name()
        );

        let sample_format = device.default_output_config().map_err(device_error)?.sample_format();
        let config = StreamConfig {
            channels: format.channels,
            sample_rate: cpal::SampleRate(format.sample_rate),
            buffer_size: cpal::BufferSize::Default,
        };

        let (producer, consumer) = HeapRb::<i16>::new(RING_BUFFER_SIZE).split();
        let failed = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&failed);
        let stream = match sample_format {
            SampleFormat::F32 => build_stream::<f32>(&device, &config, consumer, flag)?,
            SampleFormat::I16 => build_stream::<i16>(&device, &config, consumer, flag)?,
            SampleFormat::U16 => build_stream::<u16>(&device, &config, consumer, flag)?,
            other => {
                return Err(Error::Device(format!("unsupported sample format: {other}")));
            }
        };

        Ok(Self {
            producer,
            stream: Some(stream),
            failed,
            stall_timeout: stall_timeout(format),
        })
    }

    fn stream(&self) -> Result<&cpal::Stream> {
        self.stream
            .as_ref()
            .ok_or_else(|| Error::Device("sink is closed".to_string()))
    }
}

impl AudioSink for CpalSink {
    fn start(&mut self) -> Result<()> {
        self.stream()?.play().map_err(device_error)
    }

    fn write(&mut self, bytes: &[u8]) -> Result<()> {
        self.stream()?;
        let samples: Vec<i16> = decode_samples(bytes).collect();
        push_all(&mut self.producer, &samples, &self.failed, self.stall_timeout)
    }

    fn flush(&mut self) -> Result<()> {
        self.stream()?;
        drain(&self.producer, &self.failed, self.stall_timeout)
    }

    fn stop(&mut self) -> Result<()> {
        match &self.stream {
            Some(stream) => stream.pause().map_err(device_error),
            None => Ok(()),
        }
    }

    fn close(&mut self) -> Result<()> {
        if self.stream.take().is_some() {
            log::debug!("output stream closed");
        }
        Ok(())
    }
}

/// Time to play a full ring buffer, plus slack for device latency.
fn stall_timeout(format: PcmFormat) -> Duration {
    let samples_per_second = format.sample_rate.max(1) as f64 * format.channels.max(1) as f64;
    Duration::from_secs_f64(RING_BUFFER_SIZE as f64 / samples_per_second) + Duration::from_millis(500)
}

fn check_failed(failed: &AtomicBool) -> Result<()> {
    if failed.load(Ordering::Acquire) {
        Err(Error::Device("output stream failed".to_string()))
    } else {
        Ok(())
    }
}

/// Pushes every sample, waiting for room while the device drains.
fn push_all<P>(producer: &mut P, samples: &[i16], failed: &AtomicBool, timeout: Duration) -> Result<()>
where
    P: Producer<Item = i16>,
{
    let mut pending = samples;
    let mut last_progress = Instant::now();
    while !pending.is_empty() {
        check_failed(failed)?;
        let pushed = producer.push_slice(pending);
        pending = &pending[pushed..];
        if pushed > 0 {
            last_progress = Instant::now();
        } else if last_progress.elapsed() > timeout {
            return Err(Error::Device("output device stopped consuming samples".to_string()));
        }
        if !pending.is_empty() {
            thread::sleep(DRAIN_POLL);
        }
    }
    Ok(())
}

/// Waits until the device has consumed everything queued.
fn drain<P>(producer: &P, failed: &AtomicBool, timeout: Duration) -> Result<()>
where
    P: Observer<Item = i16>,
{
    let mut queued = producer.occupied_len();
    let mut last_progress = Instant::now();
    while queued > 0 {
        check_failed(failed)?;
        thread::sleep(DRAIN_POLL);
        let now = producer.occupied_len();
        if now < queued {
            last_progress = Instant::now();
        } else if last_progress.elapsed() > timeout {
            return Err(Error::Device("output device stopped consuming samples".to_string()));
        }
        queued = now;
    }
    Ok(())
}

fn build_stream<T>(
    device: &cpal::Device,
    config: &StreamConfig,
    mut consumer: HeapCons<i16>,
    failed: Arc<AtomicBool>,
) -> Result<cpal::Stream>
where
    T: SizedSample + FromSample<i16>,
{
    let mut scratch = Vec::new();
    device
        .build_output_stream(
            config,
            move |data: &mut [T], _: &cpal::OutputCallbackInfo| {
                scratch.resize(data.len(), 0i16);
                let popped = consumer.pop_slice(&mut scratch);
                for (out, &value) in data.iter_mut().zip(&scratch[..popped]) {
                    *out = T::from_sample(value);
                }
                data[popped..].fill(T::EQUILIBRIUM);
            },
            move |err| {
                log::error!("output stream error: {err}");
                failed.store(true, Ordering::Release);
            },
            None,
        )
        .map_err(device_error)
}

fn device_error(err: impl std::fmt::Display) -> Error {
    Error::Device(err.to_string())
}

/// Plays a signal on the default output device.
///
/// # Examples
///
/// ```no_run
/// use undulate::{RenderOptions, play_default, sinusoid};
///
/// let handle = play_default(sinusoid(2.0, 440.0), RenderOptions::default()).unwrap();
/// handle.wait().unwrap();
/// ```
pub fn play_default<S: Signal + 'static>(signal: S, options: RenderOptions) -> Result<PlaybackHandle> {
    play(signal, CpalSink::open_default, options)
}
