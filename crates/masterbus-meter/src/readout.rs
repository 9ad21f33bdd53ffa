//! Published meter values, shared across threads.

use masterbus_core::MeterCell;

/// Display value used when a measurement has no signal yet.
pub const SILENCE_LUFS: f32 = -100.0;

/// The meter's output surface: one atomic cell per published value.
///
/// The analysis thread stores into these cells as blocks complete; a
/// display-cadence reader loads them whenever it repaints. Cells are
/// independent, so a reader may observe values from slightly different
/// instants, which is fine for metering.
#[derive(Debug)]
pub struct LoudnessReadout {
    /// 400 ms window loudness, LUFS.
    pub momentary_lufs: MeterCell,
    /// 3 s window loudness, LUFS.
    pub short_term_lufs: MeterCell,
    /// Gated programme loudness, LUFS.
    pub integrated_lufs: MeterCell,
    /// Sample peak with ballistic decay, dBFS.
    pub peak_db: MeterCell,
    /// Highest sample peak seen since reset, dBFS.
    pub true_peak_db: MeterCell,
    /// Stereo correlation, -1 to +1.
    pub correlation: MeterCell,
    /// L/R energy balance, -1 (left) to +1 (right).
    pub balance: MeterCell,
    /// EBU R128 loudness range, LU.
    pub loudness_range: MeterCell,
    /// Loudness range capped at 20 LU for display.
    pub dynamic_range: MeterCell,
}

impl LoudnessReadout {
    /// Creates a readout in the silent state.
    pub const fn new() -> Self {
        Self {
            momentary_lufs: MeterCell::new(SILENCE_LUFS),
            short_term_lufs: MeterCell::new(SILENCE_LUFS),
            integrated_lufs: MeterCell::new(SILENCE_LUFS),
            peak_db: MeterCell::new(SILENCE_LUFS),
            true_peak_db: MeterCell::new(SILENCE_LUFS),
            correlation: MeterCell::new(1.0),
            balance: MeterCell::new(0.0),
            loudness_range: MeterCell::new(0.0),
            dynamic_range: MeterCell::new(0.0),
        }
    }
}

impl Default for LoudnessReadout {
    fn default() -> Self {
        Self::new()
    }
}
