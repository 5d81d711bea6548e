//! Primitive signal generators: constants, ramps and test tones.
//!
//! Every generator here is a pure function of time. They are the leaves that
//! combinators are built on.

use crate::{Frame, Signal};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::f64::consts::PI;

/// A signal holding the same value on every channel for its whole duration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Constant {
    duration: f64,
    value: f64,
    channels: usize,
}

impl Constant {
    /// Creates a new constant signal.
    ///
    /// Negative durations are treated as zero and a channel count of zero
    /// is raised to one.
    pub fn new(duration: f64, value: f64, channels: usize) -> Self {
        Self {
            duration: duration.max(0.0),
            value,
            channels: channels.max(1),
        }
    }
}

impl Signal for Constant {
    fn duration(&self) -> f64 {
        self.duration
    }

    fn channels(&self) -> usize {
        self.channels
    }

    fn amplitudes_at(&self, _t: f64) -> Frame {
        vec![self.value; self.channels]
    }
}

/// Creates a constant signal.
pub fn constant(duration: f64, value: f64, channels: usize) -> Constant {
    Constant::new(duration, value, channels)
}

/// Creates `channels` channels of silence lasting `duration` seconds.
///
/// # Examples
///
/// ```
/// use undulate::{sample, silence, Signal};
///
/// let s = silence(2.0, 2);
/// assert_eq!(s.duration(), 2.0);
/// assert_eq!(sample(&s, 1.0), vec![0.0, 0.0]);
/// ```
pub fn silence(duration: f64, channels: usize) -> Constant {
    Constant::new(duration, 0.0, channels)
}

/// A straight-line ramp from `start` to `end`, broadcast to every channel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Linear {
    duration: f64,
    start: f64,
    end: f64,
    channels: usize,
}

impl Linear {
    /// Creates a new ramp.
    pub fn new(duration: f64, start: f64, end: f64, channels: usize) -> Self {
        Self {
            duration: duration.max(0.0),
            start,
            end,
            channels: channels.max(1),
        }
    }

    fn value_at(&self, t: f64) -> f64 {
        if self.duration > 0.0 {
            self.start + (self.end - self.start) * t / self.duration
        } else {
            self.end
        }
    }
}

impl Signal for Linear {
    fn duration(&self) -> f64 {
        self.duration
    }

    fn channels(&self) -> usize {
        self.channels
    }

    fn amplitudes_at(&self, t: f64) -> Frame {
        vec![self.value_at(t); self.channels]
    }
}

/// Creates a linear ramp.
///
/// # Examples
///
/// ```
/// use undulate::{linear, sample};
///
/// let ramp = linear(2.0, 0.0, 1.0, 1);
/// assert_eq!(sample(&ramp, 1.0), vec![0.5]);
/// ```
pub fn linear(duration: f64, start: f64, end: f64, channels: usize) -> Linear {
    Linear::new(duration, start, end, channels)
}

/// A mono sine wave at a fixed frequency.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sinusoid {
    duration: f64,
    frequency: f64,
}

impl Sinusoid {
    /// Creates a new sine wave.
    ///
    /// # Arguments
    ///
    /// * `duration` - Length in seconds
    /// * `frequency` - Frequency in Hz
    pub fn new(duration: f64, frequency: f64) -> Self {
        Self {
            duration: duration.max(0.0),
            frequency,
        }
    }

    /// Gets the frequency of the wave in Hz.
    pub fn frequency(&self) -> f64 {
        self.frequency
    }
}

impl Signal for Sinusoid {
    fn duration(&self) -> f64 {
        self.duration
    }

    fn channels(&self) -> usize {
        1
    }

    fn amplitudes_at(&self, t: f64) -> Frame {
        vec![(2.0 * PI * self.frequency * t).sin()]
    }
}

/// Creates a mono sine wave.
pub fn sinusoid(duration: f64, frequency: f64) -> Sinusoid {
    Sinusoid::new(duration, frequency)
}

/// A mono square wave alternating between 1.0 and -1.0.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SquareWave {
    duration: f64,
    frequency: f64,
    duty: f64,
}

impl SquareWave {
    /// Creates a new square wave.
    ///
    /// # Arguments
    ///
    /// * `duration` - Length in seconds
    /// * `frequency` - Frequency in Hz
    /// * `duty` - Fraction of each cycle spent high, clamped to [0, 1]
    pub fn new(duration: f64, frequency: f64, duty: f64) -> Self {
        Self {
            duration: duration.max(0.0),
            frequency,
            duty: duty.clamp(0.0, 1.0),
        }
    }
}

impl Signal for SquareWave {
    fn duration(&self) -> f64 {
        self.duration
    }

    fn channels(&self) -> usize {
        1
    }

    fn amplitudes_at(&self, t: f64) -> Frame {
        let phase = (t * self.frequency).fract();
        vec![if phase < self.duty { 1.0 } else { -1.0 }]
    }
}

/// Creates a mono square wave.
pub fn square_wave(duration: f64, frequency: f64, duty: f64) -> SquareWave {
    SquareWave::new(duration, frequency, duty)
}

/// Deterministic mono white noise.
///
/// Time is quantized to `rate` steps per second and every step draws one
/// value uniformly from [-1.0, 1.0] with an RNG seeded from the step index,
/// so the same `t` always yields the same amplitude regardless of query order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WhiteNoise {
    duration: f64,
    seed: u64,
    rate: f64,
}

impl WhiteNoise {
    /// Creates a new white noise signal.
    ///
    /// # Arguments
    ///
    /// * `duration` - Length in seconds
    /// * `seed` - Seed selecting the noise sequence
    /// * `rate` - Number of distinct values per second (e.g., 44100.0)
    pub fn new(duration: f64, seed: u64, rate: f64) -> Self {
        Self {
            duration: duration.max(0.0),
            seed,
            rate: rate.max(1.0),
        }
    }
}

impl Signal for WhiteNoise {
    fn duration(&self) -> f64 {
        self.duration
    }

    fn channels(&self) -> usize {
        1
    }

    fn amplitudes_at(&self, t: f64) -> Frame {
        let step = (t * self.rate).floor() as u64;
        let mut rng = StdRng::seed_from_u64(self.seed ^ step.wrapping_mul(0x9E37_79B9_7F4A_7C15));
        vec![rng.gen_range(-1.0..=1.0)]
    }
}

/// Creates deterministic mono white noise.
pub fn white_noise(duration: f64, seed: u64, rate: f64) -> WhiteNoise {
    WhiteNoise::new(duration, seed, rate)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sample;

    const EPSILON: f64 = 1e-10;

    fn approx_eq(a: f64, b: f64) -> bool {
        (a - b).abs() < EPSILON
    }

    #[test]
    fn test_silence() {
        let s = silence(2.0, 2);
        assert_eq!(s.duration(), 2.0);
        assert_eq!(s.channels(), 2);
        assert_eq!(sample(&s, 1.0), vec![0.0, 0.0]);
        assert_eq!(sample(&s, 3.0), vec![0.0, 0.0]);
    }

    #[test]
    fn test_constant() {
        let c = constant(1.0, 0.25, 3);
        assert_eq!(sample(&c, 0.5), vec![0.25, 0.25, 0.25]);
        assert_eq!(sample(&c, 1.5), vec![0.0, 0.0, 0.0]);
    }

    #[test]
    fn test_linear_endpoints() {
        let ramp = linear(4.0, 1.0, -1.0, 2);
        assert_eq!(sample(&ramp, 0.0), vec![1.0, 1.0]);
        assert_eq!(sample(&ramp, 2.0), vec![0.0, 0.0]);
        assert_eq!(sample(&ramp, 4.0), vec![-1.0, -1.0]);
    }

    #[test]
    fn test_zero_length_linear_is_finite() {
        let ramp = linear(0.0, 0.0, 1.0, 1);
        assert_eq!(sample(&ramp, 0.0), vec![1.0]);
    }

    #[test]
    fn test_sinusoid() {
        let s = sinusoid(1.0, 1.0);
        assert_eq!(s.channels(), 1);
        assert!(approx_eq(sample(&s, 0.25)[0], 1.0));
        assert!(approx_eq(sample(&s, 0.5)[0], 0.0));
        assert!(approx_eq(sample(&s, 0.75)[0], -1.0));
    }

    #[test]
    fn test_square_wave_duty() {
        let sq = square_wave(1.0, 1.0, 0.25);
        assert_eq!(sample(&sq, 0.1), vec![1.0]);
        assert_eq!(sample(&sq, 0.5), vec![-1.0]);
    }

    #[test]
    fn test_white_noise_is_deterministic() {
        let noise = white_noise(1.0, 42, 1000.0);
        let first: Vec<f64> = (0..100).map(|i| sample(&noise, i as f64 / 100.0)[0]).collect();
        let second: Vec<f64> = (0..100)
            .rev()
            .map(|i| sample(&noise, i as f64 / 100.0)[0])
            .collect::<Vec<_>>()
            .into_iter()
            .rev()
            .collect();
        assert_eq!(first, second);
        assert!(first.iter().all(|v| (-1.0..=1.0).contains(v)));
        assert!(first.iter().any(|&v| v != first[0]));
    }

    #[test]
    fn test_white_noise_differs_by_seed() {
        let a = white_noise(1.0, 1, 1000.0);
        let b = white_noise(1.0, 2, 1000.0);
        let differs = (0..50).any(|i| {
            let t = i as f64 / 50.0;
            sample(&a, t) != sample(&b, t)
        });
        assert!(differs);
    }
}
