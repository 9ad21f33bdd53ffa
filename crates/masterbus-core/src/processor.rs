//! Engine lifecycle contract shared by every stage in the chain.

/// A stereo block processor with a prepare/process/reset lifecycle.
///
/// Implemented by each engine in the mastering chain. The host owns the
/// buffers and calls [`process`](Self::process) with equal-length left
/// and right slices; engines modify them in place.
///
/// # Lifecycle
///
/// 1. [`prepare`](Self::prepare) before the first block and after any
///    sample-rate change. Allocation happens here, never in `process`.
/// 2. [`process`](Self::process) once per block on the audio thread.
/// 3. [`reset`](Self::reset) clears all internal state (delay lines,
///    envelopes) without touching parameters.
pub trait StereoProcessor {
    /// Readies the processor for a sample rate and maximum block size.
    fn prepare(&mut self, sample_rate: f32, max_block_size: usize);

    /// Processes one block in place. Both slices have the same length.
    fn process(&mut self, left: &mut [f32], right: &mut [f32]);

    /// Clears internal state. Parameters are unaffected.
    fn reset(&mut self);

    /// Reported latency in samples at the current settings.
    fn latency_samples(&self) -> usize {
        0
    }
}
