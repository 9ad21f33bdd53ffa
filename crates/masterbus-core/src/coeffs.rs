//! Biquad coefficient calculation.
//!
//! Pure, stateless designers using the RBJ Audio EQ Cookbook formulas.
//! All results are pre-divided by a0, so the runtime recurrence needs no
//! division. The designers never fail: degenerate inputs (Q near zero,
//! frequency near Nyquist) produce large-but-finite coefficients, and
//! range clamping is the responsibility of the band/filter setters.

use core::f32::consts::PI;
use libm::{cosf, sinf, sqrtf};

/// Second-order section coefficients with a0 normalized to 1.
///
/// The filter recurrence is:
/// ```text
/// y[n] = b0*x[n] + b1*x[n-1] + b2*x[n-2] - a1*y[n-1] - a2*y[n-2]
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BiquadCoeffs {
    /// Feedforward coefficients
    pub b0: f32,
    /// Feedforward z^-1
    pub b1: f32,
    /// Feedforward z^-2
    pub b2: f32,
    /// Feedback z^-1 (already divided by a0)
    pub a1: f32,
    /// Feedback z^-2 (already divided by a0)
    pub a2: f32,
}

impl Default for BiquadCoeffs {
    /// Identity (passthrough) coefficients.
    fn default() -> Self {
        Self {
            b0: 1.0,
            b1: 0.0,
            b2: 0.0,
            a1: 0.0,
            a2: 0.0,
        }
    }
}

impl BiquadCoeffs {
    /// Evaluate the section's magnitude response |H(e^jw)| at `freq` Hz.
    ///
    /// Used for display-side frequency response queries; not called from
    /// the audio path.
    pub fn magnitude_at(&self, freq: f32, sample_rate: f32) -> f32 {
        let w = 2.0 * PI * freq / sample_rate;
        let (cos1, sin1) = (cosf(w), sinf(w));
        let (cos2, sin2) = (cosf(2.0 * w), sinf(2.0 * w));

        // H(e^jw) = (b0 + b1 e^-jw + b2 e^-2jw) / (1 + a1 e^-jw + a2 e^-2jw)
        let num_re = self.b0 + self.b1 * cos1 + self.b2 * cos2;
        let num_im = -self.b1 * sin1 - self.b2 * sin2;
        let den_re = 1.0 + self.a1 * cos1 + self.a2 * cos2;
        let den_im = -self.a1 * sin1 - self.a2 * sin2;

        let num = num_re * num_re + num_im * num_im;
        let den = den_re * den_re + den_im * den_im;
        if den > 0.0 { sqrtf(num / den) } else { 0.0 }
    }
}

/// Calculate low-pass filter coefficients (RBJ cookbook).
///
/// # Arguments
///
/// * `frequency` - Cutoff frequency in Hz (caller clamps below Nyquist)
/// * `q` - Q factor (0.7071 for Butterworth response)
/// * `sample_rate` - Sample rate in Hz
pub fn low_pass(frequency: f32, q: f32, sample_rate: f32) -> BiquadCoeffs {
    let w0 = 2.0 * PI * frequency / sample_rate;
    let cos_w0 = cosf(w0);
    let sin_w0 = sinf(w0);
    let alpha = sin_w0 / (2.0 * q);

    let a0 = 1.0 + alpha;
    BiquadCoeffs {
        b0: ((1.0 - cos_w0) / 2.0) / a0,
        b1: (1.0 - cos_w0) / a0,
        b2: ((1.0 - cos_w0) / 2.0) / a0,
        a1: (-2.0 * cos_w0) / a0,
        a2: (1.0 - alpha) / a0,
    }
}

/// Calculate high-pass filter coefficients (RBJ cookbook).
pub fn high_pass(frequency: f32, q: f32, sample_rate: f32) -> BiquadCoeffs {
    let w0 = 2.0 * PI * frequency / sample_rate;
    let cos_w0 = cosf(w0);
    let sin_w0 = sinf(w0);
    let alpha = sin_w0 / (2.0 * q);

    let a0 = 1.0 + alpha;
    BiquadCoeffs {
        b0: ((1.0 + cos_w0) / 2.0) / a0,
        b1: (-(1.0 + cos_w0)) / a0,
        b2: ((1.0 + cos_w0) / 2.0) / a0,
        a1: (-2.0 * cos_w0) / a0,
        a2: (1.0 - alpha) / a0,
    }
}

/// Calculate peaking EQ coefficients (RBJ cookbook).
///
/// Boosts or cuts around a center frequency. `gain_db` positive = boost.
pub fn peaking(frequency: f32, q: f32, gain_db: f32, sample_rate: f32) -> BiquadCoeffs {
    use libm::powf;

    let a = powf(10.0, gain_db / 40.0); // sqrt(10^(dB/20))
    let w0 = 2.0 * PI * frequency / sample_rate;
    let cos_w0 = cosf(w0);
    let sin_w0 = sinf(w0);
    let alpha = sin_w0 / (2.0 * q);

    let a0 = 1.0 + alpha / a;
    BiquadCoeffs {
        b0: (1.0 + alpha * a) / a0,
        b1: (-2.0 * cos_w0) / a0,
        b2: (1.0 - alpha * a) / a0,
        a1: (-2.0 * cos_w0) / a0,
        a2: (1.0 - alpha / a) / a0,
    }
}

/// Calculate low-shelf coefficients (RBJ cookbook, shelf slope form).
///
/// `slope` is the shelf slope parameter S; 1.0 gives the steepest shelf
/// that stays monotonic.
pub fn low_shelf(frequency: f32, gain_db: f32, slope: f32, sample_rate: f32) -> BiquadCoeffs {
    use libm::powf;

    let a = powf(10.0, gain_db / 40.0);
    let w0 = 2.0 * PI * frequency / sample_rate;
    let cos_w0 = cosf(w0);
    let sin_w0 = sinf(w0);
    let alpha = sin_w0 / 2.0 * sqrtf((a + 1.0 / a) * (1.0 / slope - 1.0) + 2.0);
    let sqrt_a_2alpha = 2.0 * sqrtf(a) * alpha;

    let a0 = (a + 1.0) + (a - 1.0) * cos_w0 + sqrt_a_2alpha;
    BiquadCoeffs {
        b0: (a * ((a + 1.0) - (a - 1.0) * cos_w0 + sqrt_a_2alpha)) / a0,
        b1: (2.0 * a * ((a - 1.0) - (a + 1.0) * cos_w0)) / a0,
        b2: (a * ((a + 1.0) - (a - 1.0) * cos_w0 - sqrt_a_2alpha)) / a0,
        a1: (-2.0 * ((a - 1.0) + (a + 1.0) * cos_w0)) / a0,
        a2: ((a + 1.0) + (a - 1.0) * cos_w0 - sqrt_a_2alpha) / a0,
    }
}

/// Calculate high-shelf coefficients (RBJ cookbook, shelf slope form).
pub fn high_shelf(frequency: f32, gain_db: f32, slope: f32, sample_rate: f32) -> BiquadCoeffs {
    use libm::powf;

    let a = powf(10.0, gain_db / 40.0);
    let w0 = 2.0 * PI * frequency / sample_rate;
    let cos_w0 = cosf(w0);
    let sin_w0 = sinf(w0);
    let alpha = sin_w0 / 2.0 * sqrtf((a + 1.0 / a) * (1.0 / slope - 1.0) + 2.0);
    let sqrt_a_2alpha = 2.0 * sqrtf(a) * alpha;

    let a0 = (a + 1.0) - (a - 1.0) * cos_w0 + sqrt_a_2alpha;
    BiquadCoeffs {
        b0: (a * ((a + 1.0) + (a - 1.0) * cos_w0 + sqrt_a_2alpha)) / a0,
        b1: (-2.0 * a * ((a - 1.0) + (a + 1.0) * cos_w0)) / a0,
        b2: (a * ((a + 1.0) + (a - 1.0) * cos_w0 - sqrt_a_2alpha)) / a0,
        a1: (2.0 * ((a - 1.0) - (a + 1.0) * cos_w0)) / a0,
        a2: ((a + 1.0) - (a - 1.0) * cos_w0 - sqrt_a_2alpha) / a0,
    }
}

/// Stage Q values for cascaded Butterworth sections.
///
/// The table is a fixed compatibility choice, not a general formula:
/// orders outside 1-4 fall back to 0.7071.
///
/// | Order | Stage 0 | Stage 1 |
/// |-------|---------|---------|
/// | 1     | 0.7071  | -       |
/// | 2     | 0.7071  | -       |
/// | 3     | 1.0     | 0.5     |
/// | 4     | 0.5412  | 1.3065  |
pub fn butterworth_q(order: usize, stage: usize) -> f32 {
    match order {
        1 | 2 => 0.7071,
        3 => {
            if stage == 0 {
                1.0
            } else {
                0.5
            }
        }
        4 => {
            if stage == 0 {
                0.5412
            } else {
                1.3065
            }
        }
        _ => 0.7071,
    }
}
