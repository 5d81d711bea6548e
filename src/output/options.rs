//! Rendering configuration shared by every output path.

/// How a signal is turned into a discrete PCM stream.
///
/// # Examples
///
/// ```
/// use undulate::RenderOptions;
///
/// let options = RenderOptions::default()
///     .with_sample_rate(48000)
///     .with_oversample(8);
/// assert_eq!(options.sample_rate, 48000);
/// assert_eq!(options.frames_for(0.5), 24000);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderOptions {
    /// Output frames per second.
    pub sample_rate: u32,
    /// Sub-samples averaged into each output frame.
    pub oversample: usize,
    /// Frames rendered per playback block.
    pub block_frames: usize,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            sample_rate: 44_100,
            oversample: 4,
            block_frames: 4096,
        }
    }
}

impl RenderOptions {
    /// Sets the output sample rate.
    pub fn with_sample_rate(mut self, sample_rate: u32) -> Self {
        self.sample_rate = sample_rate;
        self
    }

    /// Sets the number of sub-samples per output frame.
    pub fn with_oversample(mut self, oversample: usize) -> Self {
        self.oversample = oversample;
        self
    }

    /// Sets the number of frames per playback block.
    pub fn with_block_frames(mut self, block_frames: usize) -> Self {
        self.block_frames = block_frames;
        self
    }

    /// Time between sub-samples within one output frame.
    pub fn oversample_step(&self) -> f64 {
        1.0 / (self.sample_rate as f64 * self.oversample.max(1) as f64)
    }

    /// Number of output frames needed to cover `duration` seconds.
    pub fn frames_for(&self, duration: f64) -> u64 {
        (duration * self.sample_rate as f64).round().max(0.0) as u64
    }
}
