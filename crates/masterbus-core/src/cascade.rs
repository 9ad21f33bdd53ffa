//! High-pass / low-pass filters with selectable slope.
//!
//! Used for the EQ's outer high-pass and low-pass sections.

use crate::biquad::Biquad;
use crate::coeffs::{self, butterworth_q};

/// One biquad stage per slope step.
const MAX_STAGES: usize = 4;

/// Direction of a [`CascadeFilter`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CascadeType {
    /// Attenuates below the corner frequency.
    HighPass,
    /// Attenuates above the corner frequency.
    LowPass,
}

/// High- or low-pass filter with a 6/12/18/24 dB/oct slope selector.
///
/// The slope is selected by `order` (1 to 4). The filter runs `order`
/// second-order sections in series, each with a per-stage Q from the
/// Butterworth alignment table indexed by `(order, stage)`. The table
/// and the stage count are fixed design choices kept for output parity
/// with existing sessions, not a general Butterworth factorization.
///
/// One instance filters one channel.
#[derive(Debug, Clone)]
pub struct CascadeFilter {
    filter_type: CascadeType,
    stages: [Biquad; MAX_STAGES],
    frequency: f32,
    order: usize,
    sample_rate: f32,
}

impl CascadeFilter {
    /// Creates a filter with a 1 kHz corner and a 12 dB/oct slope.
    pub fn new(filter_type: CascadeType, sample_rate: f32) -> Self {
        let mut filter = Self {
            filter_type,
            stages: [Biquad::new(), Biquad::new(), Biquad::new(), Biquad::new()],
            frequency: 1000.0,
            order: 2,
            sample_rate,
        };
        filter.update_coefficients();
        filter
    }

    /// Sets the corner frequency and slope order.
    ///
    /// Frequency is clamped to \[10 Hz, 0.45 * sample_rate\] and order
    /// to \[1, 4\]. Takes effect immediately, no crossfade.
    pub fn set_parameters(&mut self, frequency: f32, order: usize) {
        self.frequency = frequency.clamp(10.0, self.sample_rate * 0.45);
        self.order = order.clamp(1, 4);
        self.update_coefficients();
    }

    /// Current corner frequency in Hz.
    pub fn frequency(&self) -> f32 {
        self.frequency
    }

    /// Current slope order (1 to 4).
    pub fn order(&self) -> usize {
        self.order
    }

    /// Current slope selector in dB per octave (6, 12, 18, or 24).
    pub fn slope_db_per_octave(&self) -> usize {
        self.order * 6
    }

    /// Updates the sample rate, re-clamping the corner frequency.
    pub fn set_sample_rate(&mut self, sample_rate: f32) {
        self.sample_rate = sample_rate;
        self.frequency = self.frequency.clamp(10.0, sample_rate * 0.45);
        self.update_coefficients();
    }

    /// Processes one sample through stages `0..order` in series.
    #[inline]
    pub fn process(&mut self, input: f32) -> f32 {
        let mut sample = input;
        for stage in &mut self.stages[..self.order] {
            sample = stage.process(sample);
        }
        sample
    }

    /// Clears the delay lines of all stages.
    pub fn reset(&mut self) {
        for stage in &mut self.stages {
            stage.reset();
        }
    }

    /// Combined magnitude response at `freq`, linear gain.
    pub fn magnitude_at(&self, freq: f32) -> f32 {
        let mut magnitude = 1.0;
        for stage in &self.stages[..self.order] {
            magnitude *= stage.coeffs().magnitude_at(freq, self.sample_rate);
        }
        magnitude
    }

    fn update_coefficients(&mut self) {
        for (i, stage) in self.stages[..self.order].iter_mut().enumerate() {
            let q = butterworth_q(self.order, i);
            let c = match self.filter_type {
                CascadeType::HighPass => coeffs::high_pass(self.frequency, q, self.sample_rate),
                CascadeType::LowPass => coeffs::low_pass(self.frequency, q, self.sample_rate),
            };
            stage.set_coeffs(c);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::linear_to_db;

    #[test]
    fn test_highpass_blocks_dc() {
        let mut filter = CascadeFilter::new(CascadeType::HighPass, 48000.0);
        filter.set_parameters(100.0, 2);

        let mut output = 1.0;
        for _ in 0..48000 {
            output = filter.process(1.0);
        }

        // DC fully rejected after settling
        assert!(output.abs() < 1e-3, "DC leaked through: {}", output);
    }

    #[test]
    fn test_lowpass_passes_dc() {
        let mut filter = CascadeFilter::new(CascadeType::LowPass, 48000.0);
        filter.set_parameters(1000.0, 4);

        let mut output = 0.0;
        for _ in 0..48000 {
            output = filter.process(1.0);
        }

        assert!((output - 1.0).abs() < 0.01, "DC attenuated: {}", output);
    }

    #[test]
    fn test_parameter_clamping() {
        let mut filter = CascadeFilter::new(CascadeType::LowPass, 48000.0);

        filter.set_parameters(1.0, 0);
        assert_eq!(filter.frequency(), 10.0);
        assert_eq!(filter.order(), 1);

        filter.set_parameters(100_000.0, 9);
        assert_eq!(filter.frequency(), 48000.0 * 0.45);
        assert_eq!(filter.order(), 4);
        assert_eq!(filter.slope_db_per_octave(), 24);
    }

    #[test]
    fn test_higher_order_attenuates_more() {
        // Two octaves below a high-pass corner, order 4 must attenuate
        // clearly more than order 2
        let mut gentle = CascadeFilter::new(CascadeType::HighPass, 48000.0);
        gentle.set_parameters(400.0, 2);
        let mut steep = CascadeFilter::new(CascadeType::HighPass, 48000.0);
        steep.set_parameters(400.0, 4);

        let gentle_db = linear_to_db(gentle.magnitude_at(100.0));
        let steep_db = linear_to_db(steep.magnitude_at(100.0));

        assert!(
            steep_db < gentle_db - 6.0,
            "order 4 {} dB vs order 2 {} dB at 100 Hz",
            steep_db,
            gentle_db
        );
    }

    #[test]
    fn test_order_two_corner_response() {
        // Order 2 runs two Q=0.7071 sections, so the corner sits at -6 dB
        let mut filter = CascadeFilter::new(CascadeType::LowPass, 48000.0);
        filter.set_parameters(1000.0, 2);

        let corner_db = linear_to_db(filter.magnitude_at(1000.0));
        assert!(
            (corner_db + 6.0).abs() < 0.5,
            "expected ~-6 dB at corner, got {}",
            corner_db
        );
    }

    #[test]
    fn test_passband_stays_flat() {
        let mut filter = CascadeFilter::new(CascadeType::HighPass, 48000.0);
        filter.set_parameters(30.0, 2);

        // Well above the corner, response stays within a fraction of a dB
        let db = linear_to_db(filter.magnitude_at(1000.0));
        assert!(db.abs() < 0.5, "passband not flat: {} dB", db);
    }

    #[test]
    fn test_reset_reproduces_output() {
        let mut filter = CascadeFilter::new(CascadeType::HighPass, 48000.0);
        filter.set_parameters(80.0, 3);

        let input: Vec<f32> = (0..512).map(|i| (i as f32 * 0.13).sin()).collect();

        let first: Vec<f32> = input.iter().map(|&x| filter.process(x)).collect();
        filter.reset();
        let second: Vec<f32> = input.iter().map(|&x| filter.process(x)).collect();

        for (a, b) in first.iter().zip(second.iter()) {
            assert_eq!(a.to_bits(), b.to_bits());
        }
    }
}
