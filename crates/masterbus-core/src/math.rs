//! Mathematical utility functions for the mastering DSP.
//!
//! All functions are allocation-free and suitable for `no_std`.
//!
//! # Level Conversions
//!
//! - [`db_to_linear`] / [`linear_to_db`] - Convert between dB and linear gain
//!
//! # Time Constants
//!
//! - [`smoothing_coefficient`] - One-pole coefficient from a time constant,
//!   used by envelope followers and auto-release tracking
//!
//! # Stereo Utilities
//!
//! - [`mid_side_encode`] / [`mid_side_decode`] - M/S matrix
//! - [`wet_dry_mix`] - Parallel-processing blend

use libm::{expf, log10f};

/// Convert linear gain to decibels.
///
/// Non-positive input is floored to -100 dB instead of producing
/// -inf/NaN, so envelope and metering code can feed silence through
/// without special-casing.
///
/// # Example
/// ```rust
/// use masterbus_core::linear_to_db;
///
/// assert!((linear_to_db(1.0) - 0.0).abs() < 0.001);
/// assert!((linear_to_db(0.5) - (-6.02)).abs() < 0.01);
/// assert_eq!(linear_to_db(0.0), -100.0);
/// ```
#[inline]
pub fn linear_to_db(linear: f32) -> f32 {
    if linear > 0.0 {
        20.0 * log10f(linear)
    } else {
        -100.0
    }
}

/// Convert decibels to linear gain.
///
/// # Example
/// ```rust
/// use masterbus_core::db_to_linear;
///
/// assert!((db_to_linear(0.0) - 1.0).abs() < 0.001);
/// assert!((db_to_linear(-6.02) - 0.5).abs() < 0.01);
/// ```
#[inline]
pub fn db_to_linear(db: f32) -> f32 {
    // 10^(dB/20) = e^(dB * ln(10)/20)
    const FACTOR: f32 = core::f32::consts::LN_10 / 20.0;
    expf(db * FACTOR)
}

/// One-pole smoothing coefficient for a given time constant.
///
/// Returns `c` such that `y += c * (x - y)` reaches ~63% of a step in
/// `time_ms`. A non-positive time yields 1.0 (instant tracking).
///
/// `c = 1 - exp(-1 / (sample_rate * time_ms * 0.001))`
#[inline]
pub fn smoothing_coefficient(sample_rate: f32, time_ms: f32) -> f32 {
    if time_ms <= 0.0 {
        return 1.0;
    }
    1.0 - expf(-1.0 / (sample_rate * time_ms * 0.001))
}

/// Encode a left/right pair into mid/side.
///
/// `mid = (l + r) / 2`, `side = (l - r) / 2`.
#[inline]
pub fn mid_side_encode(left: f32, right: f32) -> (f32, f32) {
    ((left + right) * 0.5, (left - right) * 0.5)
}

/// Decode a mid/side pair back to left/right.
///
/// Inverse of [`mid_side_encode`]: `l = m + s`, `r = m - s`.
#[inline]
pub fn mid_side_decode(mid: f32, side: f32) -> (f32, f32) {
    (mid + side, mid - side)
}

/// Crossfade between dry and wet signals.
///
/// Equivalent to `dry * (1 - mix) + wet * mix` but uses one fewer
/// multiply: `dry + (wet - dry) * mix`.
///
/// # Arguments
///
/// * `dry` - Unprocessed signal
/// * `wet` - Processed signal
/// * `mix` - Blend factor in \[0.0, 1.0\]: 0.0 = all dry, 1.0 = all wet
#[inline]
pub fn wet_dry_mix(dry: f32, wet: f32, mix: f32) -> f32 {
    dry + (wet - dry) * mix
}

/// Linearly remap `value` from `[in_min, in_max]` to `[out_min, out_max]`.
///
/// No clamping is performed; out-of-range input extrapolates.
#[inline]
pub fn map_range(value: f32, in_min: f32, in_max: f32, out_min: f32, out_max: f32) -> f32 {
    out_min + (out_max - out_min) * (value - in_min) / (in_max - in_min)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_db_linear_roundtrip() {
        let original = 0.5;
        let db = linear_to_db(original);
        let back = db_to_linear(db);
        assert!(
            (original - back).abs() < 1e-5,
            "Roundtrip failed: {} -> {} -> {}",
            original,
            db,
            back
        );
    }

    #[test]
    fn test_db_known_values() {
        // 0 dB = 1.0 linear
        assert!((db_to_linear(0.0) - 1.0).abs() < 1e-6);
        // -6 dB ≈ 0.5 linear
        assert!((db_to_linear(-6.0206) - 0.5).abs() < 0.001);
        // +6 dB ≈ 2.0 linear
        assert!((db_to_linear(6.0206) - 2.0).abs() < 0.001);
    }

    #[test]
    fn test_linear_to_db_floor() {
        // Silence and negative input floor at -100 dB, never NaN/-inf
        assert_eq!(linear_to_db(0.0), -100.0);
        assert_eq!(linear_to_db(-1.0), -100.0);
        assert!(linear_to_db(1e-9).is_finite());
    }

    #[test]
    fn test_smoothing_coefficient_bounds() {
        let c = smoothing_coefficient(48000.0, 10.0);
        assert!(c > 0.0 && c < 1.0, "got {}", c);

        // Instant for zero/negative time
        assert_eq!(smoothing_coefficient(48000.0, 0.0), 1.0);
        assert_eq!(smoothing_coefficient(48000.0, -5.0), 1.0);

        // Longer time constant -> smaller coefficient
        let slow = smoothing_coefficient(48000.0, 100.0);
        assert!(slow < c);
    }

    #[test]
    fn test_mid_side_roundtrip() {
        let (l, r) = (0.8, -0.3);
        let (m, s) = mid_side_encode(l, r);
        let (l2, r2) = mid_side_decode(m, s);
        assert!((l - l2).abs() < 1e-6);
        assert!((r - r2).abs() < 1e-6);
    }

    #[test]
    fn test_mid_side_mono_has_no_side() {
        let (_, s) = mid_side_encode(0.5, 0.5);
        assert_eq!(s, 0.0);
    }

    #[test]
    fn test_wet_dry_mix() {
        // All dry
        assert_eq!(wet_dry_mix(1.0, 0.5, 0.0), 1.0);
        // All wet
        assert_eq!(wet_dry_mix(1.0, 0.5, 1.0), 0.5);
        // Equivalent to dry*(1-mix)+wet*mix
        let (dry, wet, mix) = (0.3, 0.8, 0.7);
        let expected = dry * (1.0 - mix) + wet * mix;
        assert!((wet_dry_mix(dry, wet, mix) - expected).abs() < 1e-6);
    }

    #[test]
    fn test_map_range() {
        assert_eq!(map_range(0.5, 0.0, 1.0, 50.0, 500.0), 275.0);
        assert_eq!(map_range(0.0, 0.0, 1.0, 50.0, 500.0), 50.0);
        assert_eq!(map_range(1.0, 0.0, 1.0, 50.0, 500.0), 500.0);
    }
}
