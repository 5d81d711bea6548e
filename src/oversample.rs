//! Oversampling: averaging closely spaced samples into one output frame.

use crate::{Error, Frame, Result, Signal, sample};

/// Averages `n` samples of a signal taken at `t, t + delta_t, t + 2 * delta_t, ...`.
///
/// Every output path renders through this function to smooth out the
/// artifacts of quantizing a continuous signal onto a discrete clock. The
/// sample times are strictly increasing, which keeps streaming sources on
/// their cheap forward path.
///
/// # Errors
///
/// Returns `InvalidSpec` if `n` is zero and `ChannelMismatch` if the signal
/// produces a frame whose length differs from its reported channel count.
///
/// # Examples
///
/// ```
/// use undulate::{linear, oversample};
///
/// let ramp = linear(1.0, 0.0, 1.0, 1);
/// let frame = oversample(&ramp, 0.0, 2, 0.5).unwrap();
/// assert_eq!(frame, vec![0.25]);
/// ```
pub fn oversample<S: Signal + ?Sized>(signal: &S, t: f64, n: usize, delta_t: f64) -> Result<Frame> {
    if n == 0 {
        return Err(Error::invalid_spec("oversampling needs at least one sample"));
    }
    let channels = signal.channels();
    let mut sums = vec![0.0; channels];
    for i in 0..n {
        let frame = sample(signal, t + i as f64 * delta_t);
        if frame.len() != channels {
            return Err(Error::channel_mismatch(channels, frame.len()));
        }
        for (sum, value) in sums.iter_mut().zip(frame) {
            *sum += value;
        }
    }
    let count = n as f64;
    Ok(sums.into_iter().map(|sum| sum / count).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{make_signal, sinusoid};

    const EPSILON: f64 = 1e-10;

    fn approx_eq(a: f64, b: f64) -> bool {
        (a - b).abs() < EPSILON
    }

    #[test]
    fn test_single_sample_matches_sample() {
        let tone = sinusoid(1.0, 3.0);
        for i in 0..10 {
            let t = i as f64 / 10.0;
            assert_eq!(oversample(&tone, t, 1, 0.001).unwrap(), sample(&tone, t));
        }
    }

    #[test]
    fn test_averages_per_channel() {
        let s = make_signal(1.0, |t| vec![t, 2.0 * t]).unwrap();
        let frame = oversample(&s, 0.1, 4, 0.1).unwrap();
        // mean of 0.1, 0.2, 0.3, 0.4
        assert!(approx_eq(frame[0], 0.25));
        assert!(approx_eq(frame[1], 0.5));
    }

    #[test]
    fn test_samples_past_end_count_as_silence() {
        let s = make_signal(1.0, |_| vec![1.0]).unwrap();
        let frame = oversample(&s, 0.5, 4, 0.25).unwrap();
        // 0.5, 0.75 and 1.0 are in range, 1.25 is not
        assert!(approx_eq(frame[0], 0.75));
    }

    #[test]
    fn test_zero_samples_rejected() {
        let tone = sinusoid(1.0, 1.0);
        assert!(matches!(
            oversample(&tone, 0.0, 0, 0.1),
            Err(Error::InvalidSpec(_))
        ));
    }

    #[test]
    fn test_malformed_signal_detected() {
        struct Liar;

        impl Signal for Liar {
            fn duration(&self) -> f64 {
                1.0
            }

            fn channels(&self) -> usize {
                2
            }

            fn amplitudes_at(&self, t: f64) -> Frame {
                if t < 0.5 { vec![0.0, 0.0] } else { vec![0.0] }
            }
        }

        assert!(oversample(&Liar, 0.0, 2, 0.1).is_ok());
        assert!(matches!(
            oversample(&Liar, 0.4, 3, 0.1),
            Err(Error::ChannelMismatch {
                expected: 2,
                found: 1
            })
        ));
    }
}
