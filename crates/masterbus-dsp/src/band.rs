//! Single-biquad EQ bands with validation and bypass logic.

use masterbus_core::{Biquad, coeffs};

/// A peaking EQ band around a center frequency.
///
/// Pass-through when disabled or when the gain is within 0.01 dB of
/// flat, so a zeroed band costs nothing and adds no phase shift.
#[derive(Debug, Clone)]
pub struct ParametricBand {
    filter: Biquad,
    frequency: f32,
    gain_db: f32,
    q: f32,
    enabled: bool,
    sample_rate: f32,
}

impl ParametricBand {
    /// Creates a flat band at 1 kHz, Q 1.0, enabled.
    pub fn new(sample_rate: f32) -> Self {
        let mut band = Self {
            filter: Biquad::new(),
            frequency: 1000.0,
            gain_db: 0.0,
            q: 1.0,
            enabled: true,
            sample_rate,
        };
        band.update_coefficients();
        band
    }

    /// Sets center frequency, gain, and Q together.
    ///
    /// Frequency clamps to \[20 Hz, 0.45 * sample_rate\], gain to
    /// +/-18 dB, Q to \[0.1, 10\].
    pub fn set_parameters(&mut self, frequency: f32, gain_db: f32, q: f32) {
        self.frequency = frequency.clamp(20.0, self.sample_rate * 0.45);
        self.gain_db = gain_db.clamp(-18.0, 18.0);
        self.q = q.clamp(0.1, 10.0);
        self.update_coefficients();
    }

    /// Enables or disables the band.
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    /// Whether the band is enabled.
    pub fn enabled(&self) -> bool {
        self.enabled
    }

    /// Center frequency in Hz.
    pub fn frequency(&self) -> f32 {
        self.frequency
    }

    /// Gain in dB.
    pub fn gain_db(&self) -> f32 {
        self.gain_db
    }

    /// Q factor.
    pub fn q(&self) -> f32 {
        self.q
    }

    /// Updates the sample rate and re-clamps the frequency.
    pub fn set_sample_rate(&mut self, sample_rate: f32) {
        self.sample_rate = sample_rate;
        self.frequency = self.frequency.clamp(20.0, sample_rate * 0.45);
        self.update_coefficients();
    }

    /// True when the band currently alters the signal.
    #[inline]
    fn active(&self) -> bool {
        self.enabled && self.gain_db.abs() >= 0.01
    }

    /// Processes one sample, pass-through when inactive.
    #[inline]
    pub fn process(&mut self, input: f32) -> f32 {
        if !self.active() {
            return input;
        }
        self.filter.process(input)
    }

    /// Clears the filter delay line.
    pub fn reset(&mut self) {
        self.filter.reset();
    }

    /// Magnitude response at `freq`, linear gain. 1.0 when inactive.
    pub fn magnitude_at(&self, freq: f32) -> f32 {
        if !self.active() {
            return 1.0;
        }
        self.filter.coeffs().magnitude_at(freq, self.sample_rate)
    }

    fn update_coefficients(&mut self) {
        let c = coeffs::peaking(self.frequency, self.q, self.gain_db, self.sample_rate);
        self.filter.set_coeffs(c);
    }
}

/// Which end of the spectrum a [`ShelfBand`] shapes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShelfType {
    /// Boost/cut below the corner frequency.
    Low,
    /// Boost/cut above the corner frequency.
    High,
}

/// A low or high shelf band (slope fixed at 1.0).
///
/// Same bypass rule as [`ParametricBand`]: pass-through when disabled
/// or within 0.01 dB of flat.
#[derive(Debug, Clone)]
pub struct ShelfBand {
    filter: Biquad,
    shelf_type: ShelfType,
    frequency: f32,
    gain_db: f32,
    enabled: bool,
    sample_rate: f32,
}

impl ShelfBand {
    /// Creates a flat shelf, enabled, at 100 Hz (low) or 8 kHz (high).
    pub fn new(shelf_type: ShelfType, sample_rate: f32) -> Self {
        let frequency = match shelf_type {
            ShelfType::Low => 100.0,
            ShelfType::High => 8000.0,
        };
        let mut band = Self {
            filter: Biquad::new(),
            shelf_type,
            frequency,
            gain_db: 0.0,
            enabled: true,
            sample_rate,
        };
        band.update_coefficients();
        band
    }

    /// Sets corner frequency and gain.
    ///
    /// Frequency clamps to \[20 Hz, 0.45 * sample_rate\], gain to
    /// +/-12 dB.
    pub fn set_parameters(&mut self, frequency: f32, gain_db: f32) {
        self.frequency = frequency.clamp(20.0, self.sample_rate * 0.45);
        self.gain_db = gain_db.clamp(-12.0, 12.0);
        self.update_coefficients();
    }

    /// Enables or disables the shelf.
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    /// Whether the shelf is enabled.
    pub fn enabled(&self) -> bool {
        self.enabled
    }

    /// Corner frequency in Hz.
    pub fn frequency(&self) -> f32 {
        self.frequency
    }

    /// Gain in dB.
    pub fn gain_db(&self) -> f32 {
        self.gain_db
    }

    /// Updates the sample rate and re-clamps the frequency.
    pub fn set_sample_rate(&mut self, sample_rate: f32) {
        self.sample_rate = sample_rate;
        self.frequency = self.frequency.clamp(20.0, sample_rate * 0.45);
        self.update_coefficients();
    }

    #[inline]
    fn active(&self) -> bool {
        self.enabled && self.gain_db.abs() >= 0.01
    }

    /// Processes one sample, pass-through when inactive.
    #[inline]
    pub fn process(&mut self, input: f32) -> f32 {
        if !self.active() {
            return input;
        }
        self.filter.process(input)
    }

    /// Clears the filter delay line.
    pub fn reset(&mut self) {
        self.filter.reset();
    }

    /// Magnitude response at `freq`, linear gain. 1.0 when inactive.
    pub fn magnitude_at(&self, freq: f32) -> f32 {
        if !self.active() {
            return 1.0;
        }
        self.filter.coeffs().magnitude_at(freq, self.sample_rate)
    }

    fn update_coefficients(&mut self) {
        let c = match self.shelf_type {
            ShelfType::Low => {
                coeffs::low_shelf(self.frequency, self.gain_db, 1.0, self.sample_rate)
            }
            ShelfType::High => {
                coeffs::high_shelf(self.frequency, self.gain_db, 1.0, self.sample_rate)
            }
        };
        self.filter.set_coeffs(c);
    }
}
