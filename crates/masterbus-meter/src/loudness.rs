//! K-weighted loudness measurement per ITU-R BS.1770-4 / EBU R128.
//!
//! The meter runs three measurements from one K-weighted power stream:
//! momentary (400 ms), short-term (3 s), and gated integrated loudness
//! built from 100 ms blocks. Alongside loudness it tracks sample peak
//! (with ballistic decay), a since-reset peak hold, stereo correlation,
//! and L/R balance.

use std::collections::VecDeque;

use libm::{log10f, powf, sqrtf, tanf};
use masterbus_core::{Biquad, BiquadCoeffs, coeffs, linear_to_db};

use crate::readout::{LoudnessReadout, SILENCE_LUFS};

/// Blocks quieter than this LUFS never enter the integrated measurement.
pub const ABSOLUTE_GATE_LUFS: f32 = -70.0;

/// Relative gate offset below the ungated mean, dB.
pub const RELATIVE_GATE_DB: f32 = -10.0;

/// BS.1770 channel-weighting offset applied to every loudness value.
const LUFS_OFFSET: f32 = -0.691;

/// Floor applied before log10 so silence reads -100.691 LUFS, not -inf.
const MEAN_SQUARE_FLOOR: f32 = 1e-10;

const MOMENTARY_WINDOW_SECONDS: f32 = 0.4;
const SHORT_TERM_WINDOW_SECONDS: f32 = 3.0;
const GATING_BLOCK_SECONDS: f32 = 0.1;

/// LRA percentiles are meaningless until this many gated blocks exist.
const MIN_LRA_BLOCKS: usize = 10;

#[inline]
fn lufs_from_mean_square(mean_square: f32) -> f32 {
    LUFS_OFFSET + 10.0 * log10f(mean_square.max(MEAN_SQUARE_FLOOR))
}

/// Stage 1 of the K-weighting pre-filter: a high shelf modelling the
/// acoustic effect of the head (BS.1770-4 table 1 response).
///
/// Designed from the published analog prototype (f0 = 1681.97 Hz,
/// G = +3.999 dB, Q = 0.7072) via bilinear transform, so the response
/// holds at any sample rate instead of hard-coding the 48 kHz
/// coefficient table.
fn k_shelf(sample_rate: f32) -> BiquadCoeffs {
    let f0 = 1681.97f32;
    let gain_db = 3.999f32;
    let q = 0.7072f32;

    let k = tanf(core::f32::consts::PI * f0 / sample_rate);
    let vh = powf(10.0, gain_db / 20.0);
    let vb = powf(vh, 0.5);

    let a0 = 1.0 + k / q + k * k;
    BiquadCoeffs {
        b0: (vh + vb * k / q + k * k) / a0,
        b1: 2.0 * (k * k - vh) / a0,
        b2: (vh - vb * k / q + k * k) / a0,
        a1: 2.0 * (k * k - 1.0) / a0,
        a2: (1.0 - k / q + k * k) / a0,
    }
}

/// Two-stage K-weighting filter state for one channel.
#[derive(Debug, Clone)]
struct KWeighting {
    shelf: Biquad,
    high_pass: Biquad,
}

impl KWeighting {
    fn new() -> Self {
        Self {
            shelf: Biquad::new(),
            high_pass: Biquad::new(),
        }
    }

    fn prepare(&mut self, sample_rate: f32) {
        self.shelf.set_coeffs(k_shelf(sample_rate));
        // Stage 2: high-pass modelling B-weighting's low cut
        self.high_pass
            .set_coeffs(coeffs::high_pass(38.1355, 0.5003, sample_rate));
    }

    #[inline]
    fn process(&mut self, input: f32) -> f32 {
        self.high_pass.process(self.shelf.process(input))
    }

    fn reset(&mut self) {
        self.shelf.reset();
        self.high_pass.reset();
    }
}

/// BS.1770 loudness meter over a stereo stream.
///
/// `process` only observes the signal. Results are published into a
/// [`LoudnessReadout`] of atomic cells, so a display thread can read
/// them without locking while the analysis thread keeps writing.
#[derive(Debug)]
pub struct LoudnessMeter {
    k_weight_left: KWeighting,
    k_weight_right: KWeighting,

    /// Per-sample K-weighted power, trimmed to 400 ms.
    momentary_window: VecDeque<f32>,
    /// Per-sample K-weighted power, trimmed to 3 s.
    short_term_window: VecDeque<f32>,
    momentary_capacity: usize,
    short_term_capacity: usize,

    /// Mean-square values of blocks that passed the absolute gate.
    integrated_blocks: Vec<f32>,
    /// LUFS of the same blocks, kept for the LRA percentiles.
    lra_blocks: Vec<f32>,

    block_capacity: usize,
    current_block_sum: f32,
    current_block_samples: usize,

    readout: LoudnessReadout,
    sample_rate: f32,
}

impl LoudnessMeter {
    /// Creates a meter ready to run at `sample_rate`.
    pub fn new(sample_rate: f32) -> Self {
        let mut meter = Self {
            k_weight_left: KWeighting::new(),
            k_weight_right: KWeighting::new(),
            momentary_window: VecDeque::new(),
            short_term_window: VecDeque::new(),
            momentary_capacity: 0,
            short_term_capacity: 0,
            integrated_blocks: Vec::new(),
            lra_blocks: Vec::new(),
            block_capacity: 0,
            current_block_sum: 0.0,
            current_block_samples: 0,
            readout: LoudnessReadout::new(),
            sample_rate,
        };
        meter.prepare(sample_rate);
        meter
    }

    /// Recomputes filters and window sizes for `sample_rate`, then
    /// resets all state. Allocates here so `process` never does.
    pub fn prepare(&mut self, sample_rate: f32) {
        self.sample_rate = sample_rate;
        self.k_weight_left.prepare(sample_rate);
        self.k_weight_right.prepare(sample_rate);

        self.momentary_capacity = (sample_rate * MOMENTARY_WINDOW_SECONDS) as usize;
        self.short_term_capacity = (sample_rate * SHORT_TERM_WINDOW_SECONDS) as usize;
        self.block_capacity = (sample_rate * GATING_BLOCK_SECONDS) as usize;

        self.momentary_window.reserve(self.momentary_capacity + 1);
        self.short_term_window.reserve(self.short_term_capacity + 1);

        self.reset();
    }

    /// The published measurement cells. Safe to hand to a display
    /// thread while `process` keeps running.
    pub fn readout(&self) -> &LoudnessReadout {
        &self.readout
    }

    /// Clears every measurement back to the silent state.
    pub fn reset(&mut self) {
        self.momentary_window.clear();
        self.short_term_window.clear();
        self.integrated_blocks.clear();
        self.lra_blocks.clear();

        self.k_weight_left.reset();
        self.k_weight_right.reset();

        self.current_block_sum = 0.0;
        self.current_block_samples = 0;

        self.readout.momentary_lufs.store(SILENCE_LUFS);
        self.readout.short_term_lufs.store(SILENCE_LUFS);
        self.readout.integrated_lufs.store(SILENCE_LUFS);
        self.readout.peak_db.store(SILENCE_LUFS);
        self.readout.true_peak_db.store(SILENCE_LUFS);
        self.readout.correlation.store(1.0);
        self.readout.balance.store(0.0);
        self.readout.loudness_range.store(0.0);
        self.readout.dynamic_range.store(0.0);
    }

    /// Restarts only the integrated/LRA measurement, leaving the
    /// momentary, short-term, peak, and image measurements running.
    pub fn reset_integrated(&mut self) {
        self.integrated_blocks.clear();
        self.lra_blocks.clear();
        self.current_block_sum = 0.0;
        self.current_block_samples = 0;
        self.readout.integrated_lufs.store(SILENCE_LUFS);
        self.readout.loudness_range.store(0.0);
        self.readout.dynamic_range.store(0.0);
    }

    /// Analyzes one stereo block. Does not modify the signal.
    ///
    /// If the slices differ in length, the excess of the longer one is
    /// ignored.
    pub fn process(&mut self, left: &[f32], right: &[f32]) {
        let num_samples = left.len().min(right.len());
        if num_samples == 0 {
            return;
        }
        let left = &left[..num_samples];
        let right = &right[..num_samples];

        self.update_peaks(left, right);
        self.update_image(left, right);

        // K-weight and accumulate per-sample power for the sliding
        // windows and the current 100 ms gating block.
        let mut block_power_sum = 0.0f32;
        for (&l, &r) in left.iter().zip(right.iter()) {
            let wl = self.k_weight_left.process(l);
            let wr = self.k_weight_right.process(r);
            let power = (wl * wl + wr * wr) * 0.5;

            self.momentary_window.push_back(power);
            self.short_term_window.push_back(power);
            block_power_sum += power;
        }
        while self.momentary_window.len() > self.momentary_capacity {
            self.momentary_window.pop_front();
        }
        while self.short_term_window.len() > self.short_term_capacity {
            self.short_term_window.pop_front();
        }

        self.readout
            .momentary_lufs
            .store(window_lufs(&self.momentary_window));
        self.readout
            .short_term_lufs
            .store(window_lufs(&self.short_term_window));

        self.current_block_sum += block_power_sum;
        self.current_block_samples += num_samples;

        if self.current_block_samples >= self.block_capacity {
            let block_mean_square = self.current_block_sum / self.current_block_samples as f32;
            let block_lufs = lufs_from_mean_square(block_mean_square);

            if block_lufs > ABSOLUTE_GATE_LUFS {
                self.integrated_blocks.push(block_mean_square);
                self.lra_blocks.push(block_lufs);
            }

            self.current_block_sum = 0.0;
            self.current_block_samples = 0;

            self.update_integrated();
        }
    }

    /// Sample peak with slow decay, and a since-reset peak hold.
    fn update_peaks(&mut self, left: &[f32], right: &[f32]) {
        let mut max_abs = 0.0f32;
        for (&l, &r) in left.iter().zip(right.iter()) {
            max_abs = max_abs.max(l.abs()).max(r.abs());
        }
        let new_peak_db = linear_to_db(max_abs);

        let current = self.readout.peak_db.load();
        if new_peak_db > current {
            self.readout.peak_db.store(new_peak_db);
        } else {
            self.readout.peak_db.store(current * 0.99 + new_peak_db * 0.01);
        }

        // Peak hold only ever rises. Sample peak stands in for an
        // oversampled inter-sample peak here.
        if new_peak_db > self.readout.true_peak_db.load() {
            self.readout.true_peak_db.store(new_peak_db);
        }
    }

    /// Stereo correlation and L/R balance over the block.
    fn update_image(&mut self, left: &[f32], right: &[f32]) {
        let mut sum_lr = 0.0f32;
        let mut sum_l2 = 0.0f32;
        let mut sum_r2 = 0.0f32;
        for (&l, &r) in left.iter().zip(right.iter()) {
            sum_lr += l * r;
            sum_l2 += l * l;
            sum_r2 += r * r;
        }

        let denominator = sqrtf(sum_l2 * sum_r2);
        let correlation = if denominator > 1e-4 {
            (sum_lr / denominator).clamp(-1.0, 1.0)
        } else {
            0.0
        };
        self.readout.correlation.store(correlation);

        let n = left.len() as f32;
        let rms_l = sqrtf(sum_l2 / n);
        let rms_r = sqrtf(sum_r2 / n);
        let total = rms_l + rms_r;
        let balance = if total > 1e-4 {
            (rms_r - rms_l) / total
        } else {
            0.0
        };
        self.readout.balance.store(balance);
    }

    /// BS.1770-4 two-pass gated integration, plus EBU R128 LRA from the
    /// 10th/95th percentiles of the gated block loudnesses.
    fn update_integrated(&mut self) {
        if self.integrated_blocks.is_empty() {
            self.readout.integrated_lufs.store(SILENCE_LUFS);
            return;
        }

        // First pass: ungated mean sets the relative threshold.
        let sum_all: f32 = self.integrated_blocks.iter().sum();
        let ungated_mean = sum_all / self.integrated_blocks.len() as f32;
        let relative_gate = lufs_from_mean_square(ungated_mean) + RELATIVE_GATE_DB;

        // Second pass: only blocks above the threshold contribute.
        let mut gated_sum = 0.0f32;
        let mut gated_count = 0usize;
        for &mean_square in &self.integrated_blocks {
            if lufs_from_mean_square(mean_square) > relative_gate {
                gated_sum += mean_square;
                gated_count += 1;
            }
        }

        if gated_count > 0 {
            let gated_mean = gated_sum / gated_count as f32;
            self.readout
                .integrated_lufs
                .store(lufs_from_mean_square(gated_mean));

            if self.lra_blocks.len() > MIN_LRA_BLOCKS {
                let mut sorted = self.lra_blocks.clone();
                sorted.sort_by(f32::total_cmp);

                let low_idx = sorted.len() / 10;
                let high_idx = sorted.len() * 95 / 100;
                let lra = sorted[high_idx] - sorted[low_idx];
                self.readout.loudness_range.store(lra);
                self.readout.dynamic_range.store(lra.min(20.0));
            }
        }
    }

    /// Momentary loudness, LUFS.
    pub fn momentary_lufs(&self) -> f32 {
        self.readout.momentary_lufs.load()
    }

    /// Short-term loudness, LUFS.
    pub fn short_term_lufs(&self) -> f32 {
        self.readout.short_term_lufs.load()
    }

    /// Gated integrated loudness, LUFS.
    pub fn integrated_lufs(&self) -> f32 {
        self.readout.integrated_lufs.load()
    }

    /// Sample peak with decay, dBFS.
    pub fn peak_db(&self) -> f32 {
        self.readout.peak_db.load()
    }

    /// Highest sample peak since reset, dBFS.
    pub fn true_peak_db(&self) -> f32 {
        self.readout.true_peak_db.load()
    }

    /// Stereo correlation, -1 to +1.
    pub fn correlation(&self) -> f32 {
        self.readout.correlation.load()
    }

    /// L/R balance, -1 (left) to +1 (right).
    pub fn balance(&self) -> f32 {
        self.readout.balance.load()
    }

    /// EBU R128 loudness range, LU.
    pub fn loudness_range(&self) -> f32 {
        self.readout.loudness_range.load()
    }

    /// Loudness range capped at 20 LU.
    pub fn dynamic_range(&self) -> f32 {
        self.readout.dynamic_range.load()
    }
}

fn window_lufs(window: &VecDeque<f32>) -> f32 {
    if window.is_empty() {
        return SILENCE_LUFS;
    }
    let sum: f32 = window.iter().sum();
    lufs_from_mean_square(sum / window.len() as f32)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_RATE: f32 = 48000.0;
    const BLOCK: usize = 512;

    fn sine(amplitude: f32, freq: f32, seconds: f32) -> Vec<f32> {
        let n = (SAMPLE_RATE * seconds) as usize;
        (0..n)
            .map(|i| {
                let t = i as f32 / SAMPLE_RATE;
                amplitude * (2.0 * std::f32::consts::PI * freq * t).sin()
            })
            .collect()
    }

    fn feed(meter: &mut LoudnessMeter, left: &[f32], right: &[f32]) {
        for (l, r) in left.chunks(BLOCK).zip(right.chunks(BLOCK)) {
            meter.process(l, r);
        }
    }

    #[test]
    fn test_full_scale_sine_reads_near_minus_three_lufs() {
        // BS.1770 calibration point: a 0 dBFS 1 kHz sine in both
        // channels measures close to -3 LUFS.
        let signal = sine(1.0, 1000.0, 4.0);
        let mut meter = LoudnessMeter::new(SAMPLE_RATE);
        feed(&mut meter, &signal, &signal);

        assert!(
            (meter.short_term_lufs() - (-3.0)).abs() < 0.5,
            "short-term: {}",
            meter.short_term_lufs()
        );
        assert!(
            (meter.momentary_lufs() - (-3.0)).abs() < 0.5,
            "momentary: {}",
            meter.momentary_lufs()
        );
        assert!(
            (meter.integrated_lufs() - (-3.0)).abs() < 0.5,
            "integrated: {}",
            meter.integrated_lufs()
        );
    }

    #[test]
    fn test_quieter_signal_reads_proportionally_lower() {
        let loud = sine(0.5, 1000.0, 2.0);
        let quiet = sine(0.05, 1000.0, 2.0);

        let mut meter = LoudnessMeter::new(SAMPLE_RATE);
        feed(&mut meter, &loud, &loud);
        let loud_lufs = meter.short_term_lufs();

        meter.reset();
        feed(&mut meter, &quiet, &quiet);
        let quiet_lufs = meter.short_term_lufs();

        // 20 dB amplitude difference
        assert!(
            (loud_lufs - quiet_lufs - 20.0).abs() < 0.5,
            "loud {loud_lufs}, quiet {quiet_lufs}"
        );
    }

    #[test]
    fn test_absolute_gate_excludes_near_silence() {
        let signal = sine(0.1, 1000.0, 2.0);
        // Roughly -83 LUFS, below the -70 absolute gate
        let faint = sine(1e-4, 1000.0, 2.0);

        let mut meter = LoudnessMeter::new(SAMPLE_RATE);
        feed(&mut meter, &signal, &signal);
        let before = meter.integrated_lufs();

        feed(&mut meter, &faint, &faint);
        let after = meter.integrated_lufs();

        // Gated blocks must not drag the integrated value down.
        assert!(
            (before - after).abs() < 0.2,
            "integrated moved from {before} to {after}"
        );
    }

    #[test]
    fn test_reset_integrated_keeps_running_measurements() {
        let signal = sine(0.5, 1000.0, 2.0);
        let mut meter = LoudnessMeter::new(SAMPLE_RATE);
        feed(&mut meter, &signal, &signal);

        let momentary = meter.momentary_lufs();
        let short_term = meter.short_term_lufs();
        let peak = meter.peak_db();
        let correlation = meter.correlation();
        assert!(meter.integrated_lufs() > -10.0);

        meter.reset_integrated();

        assert_eq!(meter.integrated_lufs(), SILENCE_LUFS);
        assert_eq!(meter.loudness_range(), 0.0);
        assert_eq!(meter.momentary_lufs().to_bits(), momentary.to_bits());
        assert_eq!(meter.short_term_lufs().to_bits(), short_term.to_bits());
        assert_eq!(meter.peak_db().to_bits(), peak.to_bits());
        assert_eq!(meter.correlation().to_bits(), correlation.to_bits());
    }

    #[test]
    fn test_reset_returns_to_silence() {
        let signal = sine(0.8, 1000.0, 1.0);
        let mut meter = LoudnessMeter::new(SAMPLE_RATE);
        feed(&mut meter, &signal, &signal);

        meter.reset();

        assert_eq!(meter.momentary_lufs(), SILENCE_LUFS);
        assert_eq!(meter.short_term_lufs(), SILENCE_LUFS);
        assert_eq!(meter.integrated_lufs(), SILENCE_LUFS);
        assert_eq!(meter.peak_db(), SILENCE_LUFS);
        assert_eq!(meter.true_peak_db(), SILENCE_LUFS);
        assert_eq!(meter.correlation(), 1.0);
        assert_eq!(meter.balance(), 0.0);
    }

    #[test]
    fn test_peak_decays_but_hold_does_not() {
        let loud = sine(1.0, 1000.0, 0.2);
        let quiet = sine(0.01, 1000.0, 2.0);

        let mut meter = LoudnessMeter::new(SAMPLE_RATE);
        feed(&mut meter, &loud, &loud);
        let peak_after_loud = meter.peak_db();
        let hold_after_loud = meter.true_peak_db();

        feed(&mut meter, &quiet, &quiet);

        assert!(
            meter.peak_db() < peak_after_loud - 3.0,
            "peak did not decay: {} vs {}",
            meter.peak_db(),
            peak_after_loud
        );
        assert_eq!(meter.true_peak_db().to_bits(), hold_after_loud.to_bits());
    }

    #[test]
    fn test_correlation_tracks_phase_relationship() {
        let signal = sine(0.5, 440.0, 0.5);
        let inverted: Vec<f32> = signal.iter().map(|x| -x).collect();

        let mut meter = LoudnessMeter::new(SAMPLE_RATE);
        meter.process(&signal, &signal);
        assert!(meter.correlation() > 0.99, "in phase: {}", meter.correlation());

        meter.process(&signal, &inverted);
        assert!(meter.correlation() < -0.99, "out of phase: {}", meter.correlation());
    }

    #[test]
    fn test_balance_follows_channel_energy() {
        let signal = sine(0.5, 440.0, 0.5);
        let silence = vec![0.0f32; signal.len()];

        let mut meter = LoudnessMeter::new(SAMPLE_RATE);
        meter.process(&silence, &signal);
        assert!(meter.balance() > 0.9, "right only: {}", meter.balance());

        meter.process(&signal, &silence);
        assert!(meter.balance() < -0.9, "left only: {}", meter.balance());
    }

    #[test]
    fn test_loudness_range_needs_enough_blocks() {
        // Under 1.1 s of gated blocks, LRA percentiles stay unset.
        let signal = sine(0.5, 1000.0, 0.8);
        let mut meter = LoudnessMeter::new(SAMPLE_RATE);
        feed(&mut meter, &signal, &signal);
        assert_eq!(meter.loudness_range(), 0.0);
    }

    #[test]
    fn test_loudness_range_spans_level_steps() {
        // Alternate -6 and -26 dB passages; LRA should land near 20 LU.
        let loud = sine(0.5, 1000.0, 3.0);
        let quiet = sine(0.05, 1000.0, 3.0);

        let mut meter = LoudnessMeter::new(SAMPLE_RATE);
        feed(&mut meter, &loud, &loud);
        feed(&mut meter, &quiet, &quiet);
        feed(&mut meter, &loud, &loud);
        feed(&mut meter, &quiet, &quiet);

        let lra = meter.loudness_range();
        assert!(lra > 10.0, "expected a wide range, got {lra}");
        assert_eq!(meter.dynamic_range(), lra.min(20.0));
    }

    #[test]
    fn test_empty_block_is_ignored() {
        let mut meter = LoudnessMeter::new(SAMPLE_RATE);
        meter.process(&[], &[]);
        assert_eq!(meter.momentary_lufs(), SILENCE_LUFS);
    }
}
