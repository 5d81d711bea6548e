//! Signal combinators for composing and transforming signals.
//!
//! Every combinator is pure: it owns its inputs, never mutates them, and
//! queries them only through [`sample`], so inputs shorter than the combined
//! signal simply contribute silence. Channel and argument checks happen when
//! the combinator is built, not when it is sampled.

use crate::generators::{Constant, Linear, constant, linear, silence};
use crate::{BoxedSignal, Error, Frame, Result, Signal, sample};

fn require_channels(expected: usize, found: usize) -> Result<()> {
    if expected == found {
        Ok(())
    } else {
        Err(Error::channel_mismatch(expected, found))
    }
}

/// Sums two signals channel by channel.
///
/// The result lasts as long as the longer input.
///
/// # Examples
///
/// ```
/// use undulate::{combinators::Mix, constant, sample, Signal};
///
/// let mixed = Mix::new(constant(1.0, 0.25, 1), constant(2.0, 0.5, 1)).unwrap();
/// assert_eq!(mixed.duration(), 2.0);
/// assert_eq!(sample(&mixed, 0.5), vec![0.75]);
/// assert_eq!(sample(&mixed, 1.5), vec![0.5]);
/// ```
pub struct Mix<A: Signal, B: Signal> {
    a: A,
    b: B,
}

impl<A: Signal, B: Signal> Mix<A, B> {
    /// Creates a new Mix combinator.
    pub fn new(a: A, b: B) -> Result<Self> {
        require_channels(a.channels(), b.channels())?;
        Ok(Self { a, b })
    }
}

impl<A: Signal, B: Signal> Signal for Mix<A, B> {
    fn duration(&self) -> f64 {
        self.a.duration().max(self.b.duration())
    }

    fn channels(&self) -> usize {
        self.a.channels()
    }

    fn amplitudes_at(&self, t: f64) -> Frame {
        sample(&self.a, t)
            .into_iter()
            .zip(sample(&self.b, t))
            .map(|(a, b)| a + b)
            .collect()
    }
}

/// Multiplies two signals channel by channel (amplitude modulation).
///
/// The result lasts as long as the shorter input.
///
/// # Examples
///
/// ```
/// use undulate::{combinators::Multiply, constant, sample, Signal};
///
/// let product = Multiply::new(constant(1.0, 0.5, 1), constant(3.0, 4.0, 1)).unwrap();
/// assert_eq!(product.duration(), 1.0);
/// assert_eq!(sample(&product, 0.5), vec![2.0]);
/// ```
pub struct Multiply<A: Signal, B: Signal> {
    a: A,
    b: B,
}

impl<A: Signal, B: Signal> Multiply<A, B> {
    /// Creates a new Multiply combinator.
    pub fn new(a: A, b: B) -> Result<Self> {
        require_channels(a.channels(), b.channels())?;
        Ok(Self { a, b })
    }
}

impl<A: Signal, B: Signal> Signal for Multiply<A, B> {
    fn duration(&self) -> f64 {
        self.a.duration().min(self.b.duration())
    }

    fn channels(&self) -> usize {
        self.a.channels()
    }

    fn amplitudes_at(&self, t: f64) -> Frame {
        sample(&self.a, t)
            .into_iter()
            .zip(sample(&self.b, t))
            .map(|(a, b)| a * b)
            .collect()
    }
}

/// Scales every channel of a signal by a fixed factor.
pub struct Gain<S: Signal> {
    pub source: S,
    pub gain: f64,
}

impl<S: Signal> Signal for Gain<S> {
    fn duration(&self) -> f64 {
        self.source.duration()
    }

    fn channels(&self) -> usize {
        self.source.channels()
    }

    fn amplitudes_at(&self, t: f64) -> Frame {
        sample(&self.source, t)
            .into_iter()
            .map(|v| v * self.gain)
            .collect()
    }
}

/// Cross-feeds the two channels of a stereo signal.
///
/// An amount of 0.0 leaves the signal untouched, 1.0 swaps the channels and
/// 0.5 sends the average of both to each side.
///
/// # Examples
///
/// ```
/// use undulate::{combinators::Pan, make_signal, sample};
///
/// let wide = make_signal(1.0, |_| vec![1.0, 0.0]).unwrap();
/// let swapped = Pan::new(wide, 1.0).unwrap();
/// assert_eq!(sample(&swapped, 0.5), vec![0.0, 1.0]);
/// ```
pub struct Pan<S: Signal> {
    source: S,
    amount: f64,
}

impl<S: Signal> Pan<S> {
    /// Creates a new Pan combinator. The amount is clamped to [0, 1].
    pub fn new(source: S, amount: f64) -> Result<Self> {
        require_channels(2, source.channels())?;
        Ok(Self {
            source,
            amount: amount.clamp(0.0, 1.0),
        })
    }
}

impl<S: Signal> Signal for Pan<S> {
    fn duration(&self) -> f64 {
        self.source.duration()
    }

    fn channels(&self) -> usize {
        2
    }

    fn amplitudes_at(&self, t: f64) -> Frame {
        let frame = sample(&self.source, t);
        let (a, b) = (frame[0], frame[1]);
        let amount = self.amount;
        vec![
            a * (1.0 - amount) + b * amount,
            a * amount + b * (1.0 - amount),
        ]
    }
}

/// The section of a signal between `start` and `end`, shifted to begin at zero.
///
/// # Examples
///
/// ```
/// use undulate::{combinators::Trim, linear, sample, Signal};
///
/// let clip = Trim::new(linear(4.0, 0.0, 4.0, 1), 1.0, 3.0).unwrap();
/// assert_eq!(clip.duration(), 2.0);
/// assert_eq!(sample(&clip, 0.5), vec![1.5]);
/// ```
pub struct Trim<S: Signal> {
    source: S,
    start: f64,
    end: f64,
}

impl<S: Signal> Trim<S> {
    /// Creates a new Trim combinator.
    ///
    /// # Errors
    ///
    /// Returns `InvalidSpec` unless `0 <= start <= end`.
    pub fn new(source: S, start: f64, end: f64) -> Result<Self> {
        if !(start >= 0.0 && start <= end) {
            return Err(Error::invalid_spec(format!(
                "trim bounds must satisfy 0 <= start <= end, got {start}..{end}"
            )));
        }
        Ok(Self { source, start, end })
    }
}

impl<S: Signal> Signal for Trim<S> {
    fn duration(&self) -> f64 {
        self.end - self.start
    }

    fn channels(&self) -> usize {
        self.source.channels()
    }

    fn amplitudes_at(&self, t: f64) -> Frame {
        sample(&self.source, t + self.start)
    }
}

/// Plays one signal after another.
///
/// The boundary instant belongs to the first signal.
///
/// # Examples
///
/// ```
/// use undulate::{combinators::Append, constant, sample, Signal};
///
/// let joined = Append::new(constant(1.0, 0.25, 1), constant(2.0, 0.75, 1)).unwrap();
/// assert_eq!(joined.duration(), 3.0);
/// assert_eq!(sample(&joined, 1.0), vec![0.25]);
/// assert_eq!(sample(&joined, 2.0), vec![0.75]);
/// ```
pub struct Append<A: Signal, B: Signal> {
    first: A,
    second: B,
}

impl<A: Signal, B: Signal> Append<A, B> {
    /// Creates a new Append combinator.
    pub fn new(first: A, second: B) -> Result<Self> {
        require_channels(first.channels(), second.channels())?;
        Ok(Self { first, second })
    }
}

impl<A: Signal, B: Signal> Signal for Append<A, B> {
    fn duration(&self) -> f64 {
        self.first.duration() + self.second.duration()
    }

    fn channels(&self) -> usize {
        self.first.channels()
    }

    fn amplitudes_at(&self, t: f64) -> Frame {
        let boundary = self.first.duration();
        if t <= boundary {
            sample(&self.first, t)
        } else {
            sample(&self.second, t - boundary)
        }
    }
}

/// Copies a mono signal onto several channels.
///
/// # Examples
///
/// ```
/// use undulate::{combinators::Multiplex, constant, sample, Signal};
///
/// let wide = Multiplex::new(constant(1.0, 0.5, 1), 3).unwrap();
/// assert_eq!(wide.channels(), 3);
/// assert_eq!(sample(&wide, 0.5), vec![0.5, 0.5, 0.5]);
/// ```
pub struct Multiplex<S: Signal> {
    source: S,
    channels: usize,
}

impl<S: Signal> Multiplex<S> {
    /// Creates a new Multiplex combinator.
    ///
    /// # Errors
    ///
    /// Returns `ChannelMismatch` if the source is not mono, and `InvalidSpec`
    /// if `channels` is zero.
    pub fn new(source: S, channels: usize) -> Result<Self> {
        require_channels(1, source.channels())?;
        if channels == 0 {
            return Err(Error::invalid_spec("cannot multiplex onto zero channels"));
        }
        Ok(Self { source, channels })
    }
}

impl<S: Signal> Signal for Multiplex<S> {
    fn duration(&self) -> f64 {
        self.source.duration()
    }

    fn channels(&self) -> usize {
        self.channels
    }

    fn amplitudes_at(&self, t: f64) -> Frame {
        vec![sample(&self.source, t)[0]; self.channels]
    }
}

/// A signal coerced to two channels.
pub enum Stereo<S: Signal> {
    /// A mono source copied to both sides.
    Mono(Multiplex<S>),
    /// A source that was already stereo.
    Stereo(S),
}

impl<S: Signal> Signal for Stereo<S> {
    fn duration(&self) -> f64 {
        match self {
            Stereo::Mono(s) => s.duration(),
            Stereo::Stereo(s) => s.duration(),
        }
    }

    fn channels(&self) -> usize {
        2
    }

    fn amplitudes_at(&self, t: f64) -> Frame {
        match self {
            Stereo::Mono(s) => sample(s, t),
            Stereo::Stereo(s) => sample(s, t),
        }
    }
}

/// Creates a signal that mixes two inputs.
pub fn mix<A: Signal, B: Signal>(a: A, b: B) -> Result<Mix<A, B>> {
    Mix::new(a, b)
}

/// Creates a signal that multiplies two inputs.
pub fn multiply<A: Signal, B: Signal>(a: A, b: B) -> Result<Multiply<A, B>> {
    Multiply::new(a, b)
}

/// Scales a signal by `gain`.
pub fn gain<S: Signal>(source: S, gain: f64) -> Gain<S> {
    Gain { source, gain }
}

/// Pans a stereo signal.
pub fn pan<S: Signal>(source: S, amount: f64) -> Result<Pan<S>> {
    Pan::new(source, amount)
}

/// Extracts the part of a signal between `start` and `end` seconds.
pub fn trim<S: Signal>(source: S, start: f64, end: f64) -> Result<Trim<S>> {
    Trim::new(source, start, end)
}

/// Concatenates two signals.
pub fn append<A: Signal, B: Signal>(first: A, second: B) -> Result<Append<A, B>> {
    Append::new(first, second)
}

/// Copies a mono signal onto `channels` channels.
pub fn multiplex<S: Signal>(source: S, channels: usize) -> Result<Multiplex<S>> {
    Multiplex::new(source, channels)
}

/// Delays a signal by `amount` seconds of leading silence.
pub fn timeshift<S: Signal>(source: S, amount: f64) -> Result<Append<Constant, S>> {
    if !(amount >= 0.0) {
        return Err(Error::invalid_spec(format!(
            "timeshift amount must be non-negative, got {amount}"
        )));
    }
    let lead = silence(amount, source.channels());
    Ok(Append {
        first: lead,
        second: source,
    })
}

/// Ramps a signal up from silence over its first `fade` seconds.
///
/// Fades longer than the signal are shortened to its duration.
pub fn fade_in<S: Signal>(source: S, fade: f64) -> Multiply<S, Append<Linear, Constant>> {
    let duration = source.duration();
    let fade = fade.max(0.0).min(duration.max(0.0));
    let channels = source.channels();
    let envelope = Append {
        first: linear(fade, 0.0, 1.0, channels),
        second: constant(duration - fade, 1.0, channels),
    };
    Multiply {
        a: source,
        b: envelope,
    }
}

/// Ramps a signal down to silence over its last `fade` seconds.
///
/// Fades longer than the signal are shortened to its duration.
pub fn fade_out<S: Signal>(source: S, fade: f64) -> Multiply<S, Append<Constant, Linear>> {
    let duration = source.duration();
    let fade = fade.max(0.0).min(duration.max(0.0));
    let channels = source.channels();
    let envelope = Append {
        first: constant(duration - fade, 1.0, channels),
        second: linear(fade, 1.0, 0.0, channels),
    };
    Multiply {
        a: source,
        b: envelope,
    }
}

/// Coerces a signal to stereo.
///
/// # Errors
///
/// Returns `UnsupportedChannelCount` for anything other than mono or stereo.
pub fn to_stereo<S: Signal>(source: S) -> Result<Stereo<S>> {
    match source.channels() {
        1 => Ok(Stereo::Mono(Multiplex {
            source,
            channels: 2,
        })),
        2 => Ok(Stereo::Stereo(source)),
        n => Err(Error::UnsupportedChannelCount(n)),
    }
}

/// Builds a mono envelope out of consecutive linear segments.
///
/// The values interleave amplitudes and durations:
/// `[a0, d0, a1, d1, a2, ...]` ramps from `a0` to `a1` over `d0` seconds,
/// then from `a1` to `a2` over `d1` seconds, and so on.
///
/// # Errors
///
/// Returns `InvalidSpec` unless there is an odd number of at least five
/// values and every duration is non-negative.
///
/// # Examples
///
/// ```
/// use undulate::{segmented_linear, Signal};
///
/// let env = segmented_linear(&[1.0, 30.0, 0.0, 10.0, 0.0, 0.5, 1.0]).unwrap();
/// assert_eq!(env.duration(), 40.5);
/// assert_eq!(env.channels(), 1);
/// ```
pub fn segmented_linear(points: &[f64]) -> Result<BoxedSignal> {
    if points.len() < 5 || points.len() % 2 == 0 {
        return Err(Error::invalid_spec(format!(
            "segmented linear envelope needs an odd number of at least 5 values, got {}",
            points.len()
        )));
    }
    let mut envelope: Option<BoxedSignal> = None;
    for (from, duration, to) in points.windows(3).step_by(2).map(|w| (w[0], w[1], w[2])) {
        if !(duration >= 0.0) {
            return Err(Error::invalid_spec(format!(
                "segment duration must be non-negative, got {duration}"
            )));
        }
        let segment = linear(duration, from, to, 1);
        envelope = Some(match envelope {
            None => Box::new(segment),
            Some(prev) => Box::new(Append {
                first: prev,
                second: segment,
            }),
        });
    }
    envelope.ok_or_else(|| Error::invalid_spec("segmented linear envelope has no segments"))
}

/// Extension trait providing combinator methods on any Signal.
///
/// This trait is automatically implemented for all types that implement `Signal`,
/// providing a fluent API for chaining signal operations together.
///
/// # Examples
///
/// ```
/// use undulate::{sinusoid, SignalExt};
///
/// let tone = sinusoid(2.0, 440.0)
///     .gain(0.5)
///     .fade_in(0.1)
///     .fade_out(0.1)
///     .timeshift(1.0)
///     .unwrap()
///     .to_stereo()
///     .unwrap();
/// assert_eq!(tone.sample(5.0), vec![0.0, 0.0]);
/// ```
pub trait SignalExt: Signal {
    /// Samples this signal, returning silence outside its range.
    fn sample(&self, t: f64) -> Frame {
        sample(self, t)
    }

    /// Mixes this signal with another signal.
    fn mix<S: Signal>(self, other: S) -> Result<Mix<Self, S>>
    where
        Self: Sized,
    {
        Mix::new(self, other)
    }

    /// Multiplies this signal with another signal.
    fn multiply<S: Signal>(self, other: S) -> Result<Multiply<Self, S>>
    where
        Self: Sized,
    {
        Multiply::new(self, other)
    }

    /// Applies a gain factor to this signal.
    fn gain(self, gain: f64) -> Gain<Self>
    where
        Self: Sized,
    {
        Gain { source: self, gain }
    }

    /// Pans this stereo signal.
    fn pan(self, amount: f64) -> Result<Pan<Self>>
    where
        Self: Sized,
    {
        Pan::new(self, amount)
    }

    /// Keeps only the part of this signal between `start` and `end`.
    fn trim(self, start: f64, end: f64) -> Result<Trim<Self>>
    where
        Self: Sized,
    {
        Trim::new(self, start, end)
    }

    /// Plays another signal after this one.
    fn append<S: Signal>(self, other: S) -> Result<Append<Self, S>>
    where
        Self: Sized,
    {
        Append::new(self, other)
    }

    /// Delays this signal by `amount` seconds.
    fn timeshift(self, amount: f64) -> Result<Append<Constant, Self>>
    where
        Self: Sized,
    {
        timeshift(self, amount)
    }

    /// Fades this signal in over `fade` seconds.
    fn fade_in(self, fade: f64) -> Multiply<Self, Append<Linear, Constant>>
    where
        Self: Sized,
    {
        fade_in(self, fade)
    }

    /// Fades this signal out over its last `fade` seconds.
    fn fade_out(self, fade: f64) -> Multiply<Self, Append<Constant, Linear>>
    where
        Self: Sized,
    {
        fade_out(self, fade)
    }

    /// Copies this mono signal onto `channels` channels.
    fn multiplex(self, channels: usize) -> Result<Multiplex<Self>>
    where
        Self: Sized,
    {
        Multiplex::new(self, channels)
    }

    /// Coerces this signal to stereo.
    fn to_stereo(self) -> Result<Stereo<Self>>
    where
        Self: Sized,
    {
        to_stereo(self)
    }

    /// Boxes this signal so differently typed signals can be stored together.
    fn boxed(self) -> BoxedSignal
    where
        Self: Sized + 'static,
    {
        Box::new(self)
    }
}

// Blanket implementation for all Signal types
impl<T: Signal + ?Sized> SignalExt for T {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generators::sinusoid;
    use crate::make_signal;

    const EPSILON: f64 = 1e-10;

    fn approx_eq(a: f64, b: f64) -> bool {
        (a - b).abs() < EPSILON
    }

    fn stereo_ramp() -> impl Signal {
        make_signal(1.0, |t| vec![t, 1.0 - t]).unwrap()
    }

    #[test]
    fn test_mix_lengths() {
        let mixed = mix(sinusoid(1.0, 1.0), sinusoid(2.0, 1.0)).unwrap();
        assert_eq!(mixed.duration(), 2.0);
        let alone = sinusoid(2.0, 1.0);
        assert_eq!(sample(&mixed, 1.5), sample(&alone, 1.5));
    }

    #[test]
    fn test_mix_channel_mismatch() {
        let result = mix(constant(1.0, 0.0, 1), constant(1.0, 0.0, 2));
        assert!(matches!(
            result,
            Err(Error::ChannelMismatch {
                expected: 1,
                found: 2
            })
        ));
    }

    #[test]
    fn test_multiply_takes_shorter_duration() {
        let product = multiply(constant(1.0, 2.0, 1), constant(3.0, 3.0, 1)).unwrap();
        assert_eq!(product.duration(), 1.0);
        assert_eq!(sample(&product, 0.5), vec![6.0]);
    }

    #[test]
    fn test_gain() {
        let loud = gain(constant(1.0, 0.5, 2), 3.0);
        assert_eq!(sample(&loud, 0.5), vec![1.5, 1.5]);
    }

    #[test]
    fn test_pan_identity_and_swap() {
        for t in [0.0, 0.25, 0.5, 0.9] {
            let original = sample(&stereo_ramp(), t);
            let same = pan(stereo_ramp(), 0.0).unwrap();
            assert_eq!(sample(&same, t), original);

            let swapped = pan(stereo_ramp(), 1.0).unwrap();
            assert_eq!(sample(&swapped, t), vec![original[1], original[0]]);
        }
    }

    #[test]
    fn test_pan_center_averages() {
        let centered = pan(stereo_ramp(), 0.5).unwrap();
        let frame = sample(&centered, 0.25);
        assert!(approx_eq(frame[0], 0.5));
        assert!(approx_eq(frame[1], 0.5));
    }

    #[test]
    fn test_pan_requires_stereo() {
        let result = pan(constant(1.0, 0.0, 1), 0.5);
        assert!(matches!(result, Err(Error::ChannelMismatch { .. })));
    }

    #[test]
    fn test_trim() {
        let ramp = linear(10.0, 0.0, 10.0, 1);
        let trimmed = trim(ramp, 2.0, 5.0).unwrap();
        assert_eq!(trimmed.duration(), 3.0);
        for t in [0.0, 1.0, 2.5, 3.0] {
            assert_eq!(sample(&trimmed, t), sample(&ramp, t + 2.0));
        }
        assert_eq!(sample(&trimmed, 3.5), vec![0.0]);
    }

    #[test]
    fn test_trim_rejects_inverted_bounds() {
        assert!(matches!(
            trim(constant(1.0, 0.0, 1), 0.5, 0.2),
            Err(Error::InvalidSpec(_))
        ));
    }

    #[test]
    fn test_append() {
        let first = constant(1.0, 1.0, 1);
        let second = linear(2.0, 0.0, 2.0, 1);
        let joined = append(first, second).unwrap();
        assert_eq!(joined.duration(), 3.0);
        assert_eq!(sample(&joined, 0.5), sample(&first, 0.5));
        assert_eq!(sample(&joined, 1.0), sample(&first, 1.0));
        assert_eq!(sample(&joined, 2.0), sample(&second, 1.0));
        assert_eq!(sample(&joined, 3.5), vec![0.0]);
    }

    #[test]
    fn test_timeshift() {
        let shifted = timeshift(constant(1.0, 0.5, 2), 2.0).unwrap();
        assert_eq!(shifted.duration(), 3.0);
        assert_eq!(shifted.channels(), 2);
        assert_eq!(sample(&shifted, 1.0), vec![0.0, 0.0]);
        assert_eq!(sample(&shifted, 2.5), vec![0.5, 0.5]);
        assert!(timeshift(constant(1.0, 0.5, 2), -1.0).is_err());
    }

    #[test]
    fn test_fade_in_and_out() {
        let faded_in = fade_in(constant(4.0, 1.0, 1), 2.0);
        assert_eq!(faded_in.duration(), 4.0);
        assert!(approx_eq(sample(&faded_in, 0.0)[0], 0.0));
        assert!(approx_eq(sample(&faded_in, 1.0)[0], 0.5));
        assert!(approx_eq(sample(&faded_in, 3.0)[0], 1.0));

        let faded_out = fade_out(constant(4.0, 1.0, 1), 2.0);
        assert_eq!(faded_out.duration(), 4.0);
        assert!(approx_eq(sample(&faded_out, 1.0)[0], 1.0));
        assert!(approx_eq(sample(&faded_out, 3.0)[0], 0.5));
        assert!(approx_eq(sample(&faded_out, 4.0)[0], 0.0));
    }

    #[test]
    fn test_fade_longer_than_signal() {
        let faded = fade_in(constant(1.0, 1.0, 1), 5.0);
        assert_eq!(faded.duration(), 1.0);
        assert!(approx_eq(sample(&faded, 0.5)[0], 0.5));
    }

    #[test]
    fn test_fades_tolerate_malformed_durations() {
        struct Reported(f64);

        impl Signal for Reported {
            fn duration(&self) -> f64 {
                self.0
            }

            fn channels(&self) -> usize {
                1
            }

            fn amplitudes_at(&self, _t: f64) -> Frame {
                vec![1.0]
            }
        }

        for duration in [-1.0, f64::NAN] {
            let faded_in = fade_in(Reported(duration), 0.5);
            assert_eq!(sample(&faded_in, 0.25), vec![0.0]);
            let faded_out = fade_out(Reported(duration), 0.5);
            assert_eq!(sample(&faded_out, 0.25), vec![0.0]);
        }
    }

    #[test]
    fn test_append_channel_mismatch() {
        assert!(matches!(
            append(constant(1.0, 0.0, 2), constant(1.0, 0.0, 1)),
            Err(Error::ChannelMismatch {
                expected: 2,
                found: 1
            })
        ));
    }

    #[test]
    fn test_multiply_channel_mismatch() {
        assert!(matches!(
            multiply(constant(1.0, 0.0, 1), constant(1.0, 0.0, 3)),
            Err(Error::ChannelMismatch {
                expected: 1,
                found: 3
            })
        ));
    }

    #[test]
    fn test_multiplex() {
        let mono = sinusoid(1.0, 3.0);
        let wide = multiplex(mono, 2).unwrap();
        assert_eq!(wide.channels(), 2);
        for i in 0..20 {
            let t = i as f64 / 20.0;
            let source = sample(&mono, t)[0];
            assert_eq!(sample(&wide, t), vec![source, source]);
        }
    }

    #[test]
    fn test_multiplex_requires_mono() {
        let result = multiplex(constant(1.0, 0.0, 2), 4);
        assert!(matches!(
            result,
            Err(Error::ChannelMismatch {
                expected: 1,
                found: 2
            })
        ));
    }

    #[test]
    fn test_to_stereo() {
        let from_mono = to_stereo(constant(1.0, 0.25, 1)).unwrap();
        assert_eq!(sample(&from_mono, 0.5), vec![0.25, 0.25]);

        let from_stereo = to_stereo(stereo_ramp()).unwrap();
        assert_eq!(sample(&from_stereo, 0.25), vec![0.25, 0.75]);

        assert!(matches!(
            to_stereo(constant(1.0, 0.0, 3)),
            Err(Error::UnsupportedChannelCount(3))
        ));
    }

    #[test]
    fn test_segmented_linear() {
        let env = segmented_linear(&[1.0, 30.0, 0.0, 10.0, 0.0, 0.5, 1.0]).unwrap();
        assert_eq!(env.duration(), 40.5);
        assert_eq!(env.channels(), 1);
        assert!(approx_eq(sample(&env, 15.0)[0], 0.5));
        assert!(approx_eq(sample(&env, 35.0)[0], 0.0));
        assert!(approx_eq(sample(&env, 40.25)[0], 0.5));
    }

    #[test]
    fn test_segmented_linear_rejects_malformed_points() {
        assert!(matches!(
            segmented_linear(&[0.0, 1.0, 1.0]),
            Err(Error::InvalidSpec(_))
        ));
        assert!(matches!(
            segmented_linear(&[0.0, 1.0, 1.0, 2.0]),
            Err(Error::InvalidSpec(_))
        ));
        assert!(matches!(
            segmented_linear(&[0.0, -1.0, 1.0, 2.0, 0.0]),
            Err(Error::InvalidSpec(_))
        ));
    }

    #[test]
    fn test_signal_ext_chaining() {
        let signal = constant(2.0, 1.0, 1)
            .gain(0.5)
            .append(constant(1.0, 0.25, 1))
            .unwrap()
            .multiplex(2)
            .unwrap();
        assert_eq!(signal.duration(), 3.0);
        assert_eq!(signal.sample(1.0), vec![0.5, 0.5]);
        assert_eq!(signal.sample(2.5), vec![0.25, 0.25]);
    }

    #[test]
    fn test_boxed_dyn_sampling() {
        let boxed = constant(1.0, 0.5, 1).boxed();
        assert_eq!(boxed.sample(0.5), vec![0.5]);
        assert_eq!(boxed.sample(2.0), vec![0.0]);
    }
}
