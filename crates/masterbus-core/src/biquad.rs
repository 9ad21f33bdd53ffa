//! Biquad (bi-quadratic) filter section.
//!
//! A single second-order IIR section holding its own delay state.
//! Coefficients come from the designers in [`crate::coeffs`].

use crate::coeffs::BiquadCoeffs;

/// Second-order IIR filter section.
///
/// Implements the Direct Form I structure:
/// ```text
/// y[n] = b0*x[n] + b1*x[n-1] + b2*x[n-2]
///                - a1*y[n-1] - a2*y[n-2]
/// ```
///
/// The delay state is exclusively owned by this instance; one filter
/// per logical channel, never shared.
#[derive(Debug, Clone)]
pub struct Biquad {
    coeffs: BiquadCoeffs,

    /// Input delay line: x[n-1], x[n-2]
    x1: f32,
    x2: f32,

    /// Output delay line: y[n-1], y[n-2]
    y1: f32,
    y2: f32,
}

impl Biquad {
    /// Creates a new biquad with passthrough coefficients.
    ///
    /// Initial state: `y[n] = x[n]` (no filtering)
    pub fn new() -> Self {
        Self {
            coeffs: BiquadCoeffs::default(),
            x1: 0.0,
            x2: 0.0,
            y1: 0.0,
            y2: 0.0,
        }
    }

    /// Replaces the active coefficient set.
    ///
    /// Legal to call between samples for live parameter automation. No
    /// crossfade is performed, so a discontinuity is possible at the
    /// instant of the change; parameter smoothing is the caller's
    /// responsibility.
    pub fn set_coeffs(&mut self, coeffs: BiquadCoeffs) {
        self.coeffs = coeffs;
    }

    /// Returns the active coefficients.
    pub fn coeffs(&self) -> &BiquadCoeffs {
        &self.coeffs
    }

    /// Processes a single sample through the filter.
    #[inline]
    pub fn process(&mut self, input: f32) -> f32 {
        let c = &self.coeffs;
        let output =
            c.b0 * input + c.b1 * self.x1 + c.b2 * self.x2 - c.a1 * self.y1 - c.a2 * self.y2;

        self.x2 = self.x1;
        self.x1 = input;
        self.y2 = self.y1;
        self.y1 = output;

        output
    }

    /// Clears the delay lines without changing coefficients.
    pub fn reset(&mut self) {
        self.x1 = 0.0;
        self.x2 = 0.0;
        self.y1 = 0.0;
        self.y2 = 0.0;
    }
}

impl Default for Biquad {
    fn default() -> Self {
        Self::new()
    }
}
