//! Core signal trait and the sampling contract.
//!
//! This module provides the fundamental `Signal` trait that represents a
//! duration-bounded, multi-channel amplitude function of continuous time,
//! together with `sample`, the bounds-checked entry point every consumer
//! goes through.

use std::sync::Arc;

/// One amplitude per channel at a single instant.
pub type Frame = Vec<f64>;

/// A boxed, shareable signal.
pub type BoxedSignal = Box<dyn Signal>;

/// Common interface for all continuous-time signals.
///
/// A signal is queried at arbitrary time offsets rather than iterated. Every
/// implementation reports a fixed duration and channel count; the values it
/// returns are not clamped to [-1.0, 1.0], clamping only happens when the
/// signal is encoded for output.
///
/// Implementors only answer `amplitudes_at` for times inside their own
/// range. Callers should use [`sample`] (or [`SignalExt::sample`](crate::SignalExt::sample)),
/// which returns silence outside `[0, duration]`.
pub trait Signal: Send + Sync {
    /// Length of the signal in seconds.
    fn duration(&self) -> f64;

    /// Number of channels in every frame this signal produces.
    fn channels(&self) -> usize;

    /// Raw, unchecked query of the signal at `t` seconds.
    ///
    /// # Returns
    ///
    /// A frame of exactly `channels()` amplitudes
    fn amplitudes_at(&self, t: f64) -> Frame;
}

/// Samples a signal at `t`, returning silence outside `[0, duration]`.
///
/// This is the only sanctioned way to query a signal from outside its own
/// implementation. The bounds check is what lets combinators ignore inputs
/// that are shorter than the combined signal.
///
/// # Examples
///
/// ```
/// use undulate::{sample, silence};
///
/// let s = silence(2.0, 2);
/// assert_eq!(sample(&s, 1.0), vec![0.0, 0.0]);
/// assert_eq!(sample(&s, 3.0), vec![0.0, 0.0]);
/// ```
pub fn sample<S: Signal + ?Sized>(signal: &S, t: f64) -> Frame {
    if (0.0..=signal.duration()).contains(&t) {
        signal.amplitudes_at(t)
    } else {
        vec![0.0; signal.channels()]
    }
}

/// Returns the channel count of a signal.
pub fn channel_count<S: Signal + ?Sized>(signal: &S) -> usize {
    signal.channels()
}

impl<S: Signal + ?Sized> Signal for Box<S> {
    fn duration(&self) -> f64 {
        (**self).duration()
    }

    fn channels(&self) -> usize {
        (**self).channels()
    }

    fn amplitudes_at(&self, t: f64) -> Frame {
        (**self).amplitudes_at(t)
    }
}

impl<S: Signal + ?Sized> Signal for Arc<S> {
    fn duration(&self) -> f64 {
        (**self).duration()
    }

    fn channels(&self) -> usize {
        (**self).channels()
    }

    fn amplitudes_at(&self, t: f64) -> Frame {
        (**self).amplitudes_at(t)
    }
}

impl<S: Signal + ?Sized> Signal for &S {
    fn duration(&self) -> f64 {
        (**self).duration()
    }

    fn channels(&self) -> usize {
        (**self).channels()
    }

    fn amplitudes_at(&self, t: f64) -> Frame {
        (**self).amplitudes_at(t)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Ramp that would return garbage outside its range if queried raw.
    struct Ramp;

    impl Signal for Ramp {
        fn duration(&self) -> f64 {
            1.0
        }

        fn channels(&self) -> usize {
            2
        }

        fn amplitudes_at(&self, t: f64) -> Frame {
            vec![t, -t]
        }
    }

    #[test]
    fn test_sample_in_range() {
        assert_eq!(sample(&Ramp, 0.5), vec![0.5, -0.5]);
        assert_eq!(sample(&Ramp, 0.0), vec![0.0, -0.0]);
    }

    #[test]
    fn test_sample_out_of_range_is_silent() {
        assert_eq!(sample(&Ramp, -0.1), vec![0.0, 0.0]);
        assert_eq!(sample(&Ramp, 1.5), vec![0.0, 0.0]);
    }

    #[test]
    fn test_sample_at_duration_is_inclusive() {
        assert_eq!(sample(&Ramp, 1.0), vec![1.0, -1.0]);
    }

    #[test]
    fn test_pointer_impls_delegate() {
        let boxed: BoxedSignal = Box::new(Ramp);
        let shared = Arc::new(Ramp);
        assert_eq!(channel_count(&boxed), 2);
        assert_eq!(sample(&shared, 0.25), vec![0.25, -0.25]);
        assert_eq!((&Ramp).duration(), 1.0);
    }
}
