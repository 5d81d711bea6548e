//! Tabulating signals for charts and debugging.

use crate::{Error, Result, Signal, sample};

/// Evaluates `f` every `step` seconds from `start` through `end`.
///
/// Times are computed as `start + i * step` so long traces do not drift.
///
/// # Errors
///
/// Returns `InvalidSpec` if `step` is not a positive finite number.
///
/// # Examples
///
/// ```
/// use undulate::inspect::trace;
///
/// let points = trace(|t| 2.0 * t, 0.0, 1.0, 0.5).unwrap();
/// assert_eq!(points, vec![(0.0, 0.0), (0.5, 1.0), (1.0, 2.0)]);
/// ```
pub fn trace<F>(f: F, start: f64, end: f64, step: f64) -> Result<Vec<(f64, f64)>>
where
    F: Fn(f64) -> f64,
{
    if !(step.is_finite() && step > 0.0) {
        return Err(Error::invalid_spec(format!("trace step must be positive, got {step}")));
    }
    if end < start {
        return Ok(Vec::new());
    }
    let count = ((end - start) / step + 1e-9).floor() as usize + 1;
    Ok((0..count)
        .map(|i| {
            let t = start + i as f64 * step;
            (t, f(t))
        })
        .collect())
}

/// Traces one channel of a signal through the sampling boundary.
///
/// Points outside the signal's duration read as zero.
pub fn channel_trace<S: Signal + ?Sized>(
    signal: &S,
    channel: usize,
    start: f64,
    end: f64,
    step: f64,
) -> Result<Vec<(f64, f64)>> {
    let channels = signal.channels();
    if channel >= channels {
        return Err(Error::invalid_spec(format!(
            "channel {channel} out of range for a {channels}-channel signal"
        )));
    }
    trace(|t| sample(signal, t)[channel], start, end, step)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{append, constant, linear};

    #[test]
    fn test_trace_includes_end() {
        let points = trace(|t| t * t, 0.0, 1.0, 0.25).unwrap();
        assert_eq!(points.len(), 5);
        assert_eq!(points[4], (1.0, 1.0));
    }

    #[test]
    fn test_trace_empty_range() {
        assert!(trace(|t| t, 1.0, 0.0, 0.1).unwrap().is_empty());
    }

    #[test]
    fn test_trace_rejects_bad_step() {
        assert!(matches!(trace(|t| t, 0.0, 1.0, 0.0), Err(Error::InvalidSpec(_))));
        assert!(matches!(trace(|t| t, 0.0, 1.0, -0.5), Err(Error::InvalidSpec(_))));
        assert!(matches!(
            trace(|t| t, 0.0, 1.0, f64::NAN),
            Err(Error::InvalidSpec(_))
        ));
    }

    #[test]
    fn test_channel_trace_reads_silence_outside() {
        let s = append(constant(0.5, 1.0, 2), linear(0.5, 0.0, 1.0, 2)).unwrap();
        let points = channel_trace(&s, 1, -0.5, 1.5, 0.5).unwrap();
        let values: Vec<f64> = points.iter().map(|&(_, v)| v).collect();
        assert_eq!(values, vec![0.0, 1.0, 1.0, 1.0, 0.0]);
    }

    #[test]
    fn test_channel_trace_rejects_missing_channel() {
        let s = constant(1.0, 1.0, 1);
        assert!(matches!(
            channel_trace(&s, 1, 0.0, 1.0, 0.1),
            Err(Error::InvalidSpec(_))
        ));
    }
}
