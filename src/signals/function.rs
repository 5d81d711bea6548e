//! Signals backed by an arbitrary generator function.

use super::signal::{Frame, Signal};
use crate::{Error, Result};

/// A signal whose amplitudes come from a closure of time.
///
/// The channel count is fixed once, at construction, by probing the
/// generator at `t = 0.0`.
pub struct FnSignal<F> {
    duration: f64,
    channels: usize,
    generator: F,
}

impl<F> FnSignal<F>
where
    F: Fn(f64) -> Frame + Send + Sync,
{
    /// Creates a new function-backed signal.
    ///
    /// # Errors
    ///
    /// Returns `InvalidSignal` if the first sample at `t = 0.0` is an empty frame,
    /// or if the duration is negative or not finite.
    pub fn new(duration: f64, generator: F) -> Result<Self> {
        if !duration.is_finite() || duration < 0.0 {
            return Err(Error::InvalidSignal(format!(
                "duration must be a non-negative number of seconds, got {duration}"
            )));
        }
        let channels = generator(0.0).len();
        if channels == 0 {
            return Err(Error::InvalidSignal(
                "generator produced an empty frame".to_string(),
            ));
        }
        Ok(Self {
            duration,
            channels,
            generator,
        })
    }
}

impl<F> Signal for FnSignal<F>
where
    F: Fn(f64) -> Frame + Send + Sync,
{
    fn duration(&self) -> f64 {
        self.duration
    }

    fn channels(&self) -> usize {
        self.channels
    }

    fn amplitudes_at(&self, t: f64) -> Frame {
        (self.generator)(t)
    }
}

/// Builds a signal of the given duration from a generator function.
///
/// # Examples
///
/// ```
/// use undulate::{make_signal, sample, Signal};
///
/// let ramp = make_signal(2.0, |t| vec![t / 2.0]).unwrap();
/// assert_eq!(ramp.channels(), 1);
/// assert_eq!(sample(&ramp, 1.0), vec![0.5]);
/// ```
pub fn make_signal<F>(duration: f64, generator: F) -> Result<FnSignal<F>>
where
    F: Fn(f64) -> Frame + Send + Sync,
{
    FnSignal::new(duration, generator)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sample;

    #[test]
    fn test_first_sample_fixes_channels() {
        let s = make_signal(1.0, |t| vec![t, t, t]).unwrap();
        assert_eq!(s.channels(), 3);
        assert_eq!(s.duration(), 1.0);
    }

    #[test]
    fn test_empty_first_sample_is_rejected() {
        let result = make_signal(1.0, |_| Vec::new());
        assert!(matches!(result, Err(Error::InvalidSignal(_))));
    }

    #[test]
    fn test_negative_duration_is_rejected() {
        let result = make_signal(-1.0, |_| vec![0.0]);
        assert!(matches!(result, Err(Error::InvalidSignal(_))));
    }

    #[test]
    fn test_out_of_range_uses_sampled_channels() {
        let s = make_signal(1.0, |_| vec![1.0, 1.0]).unwrap();
        assert_eq!(sample(&s, 2.0), vec![0.0, 0.0]);
    }
}
