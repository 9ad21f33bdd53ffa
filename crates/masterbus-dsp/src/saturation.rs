//! Saturation coloring stages for the compressor output.

use libm::tanhf;

/// Closed set of saturation characters, dispatched by value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SaturationMode {
    /// Transparent, no coloration.
    #[default]
    Clean,
    /// Subtle harmonic warmth, symmetric soft saturation.
    Glue,
    /// Transient emphasis, asymmetric tanh drive.
    Punch,
    /// Tube-style asymmetric soft clip with a slow second-harmonic tail.
    Vintage,
}

impl SaturationMode {
    /// Maps a parameter value (0 to 3) to a mode. Out-of-range values
    /// clamp to the nearest mode.
    pub fn from_param(value: f32) -> Self {
        match value as i32 {
            i32::MIN..=0 => Self::Clean,
            1 => Self::Glue,
            2 => Self::Punch,
            3..=i32::MAX => Self::Vintage,
        }
    }

    /// Parameter value for this mode.
    pub fn to_param(self) -> f32 {
        match self {
            Self::Clean => 0.0,
            Self::Glue => 1.0,
            Self::Punch => 2.0,
            Self::Vintage => 3.0,
        }
    }
}

/// Saturation stage with the slow filter state used by
/// [`SaturationMode::Vintage`].
///
/// One instance is shared across both channels, processed left then
/// right each sample, so the vintage harmonic tail blends the pair the
/// same way on every run.
#[derive(Debug, Clone, Default)]
pub struct Saturator {
    /// One-pole state feeding the vintage second-harmonic contribution.
    state: f32,
}

impl Saturator {
    /// Creates a saturator with cleared state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Applies the selected saturation curve to one sample.
    #[inline]
    pub fn process(&mut self, sample: f32, mode: SaturationMode) -> f32 {
        match mode {
            SaturationMode::Clean => sample,
            SaturationMode::Glue => tanhf(sample * 1.1) * 0.91,
            SaturationMode::Punch => {
                let x = sample * 1.2;
                if x > 0.0 {
                    tanhf(x) * 0.95
                } else {
                    tanhf(x * 0.8) * 1.05
                }
            }
            SaturationMode::Vintage => {
                let x = sample * 1.3;
                let mut out = if x > 0.0 {
                    x / (1.0 + (x * 0.5).abs())
                } else {
                    x / (1.0 + (x * 0.7).abs())
                };

                // Slow tracker adds a subtle second harmonic
                self.state = self.state * 0.99 + out * 0.01;
                out += self.state * 0.02;
                out
            }
        }
    }

    /// Clears the vintage filter state.
    pub fn reset(&mut self) {
        self.state = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_is_identity() {
        let mut sat = Saturator::new();
        for i in 0..64 {
            let x = (i as f32 - 32.0) * 0.05;
            assert_eq!(sat.process(x, SaturationMode::Clean), x);
        }
    }

    #[test]
    fn test_glue_bounds_output() {
        let mut sat = Saturator::new();
        // tanh-based curve never exceeds its 0.91 ceiling
        for i in 0..100 {
            let x = i as f32 * 0.5;
            let y = sat.process(x, SaturationMode::Glue);
            assert!(y.abs() <= 0.91 + 1e-6);
        }
    }

    #[test]
    fn test_punch_is_asymmetric() {
        let mut sat = Saturator::new();
        let pos = sat.process(0.8, SaturationMode::Punch);
        let neg = sat.process(-0.8, SaturationMode::Punch);
        assert!(
            (pos + neg).abs() > 1e-4,
            "expected asymmetry, got {} / {}",
            pos,
            neg
        );
    }

    #[test]
    fn test_vintage_state_decays_after_reset() {
        let mut sat = Saturator::new();
        for _ in 0..1000 {
            sat.process(0.7, SaturationMode::Vintage);
        }
        sat.reset();

        // First sample after reset has no harmonic tail
        let mut fresh = Saturator::new();
        let a = sat.process(0.3, SaturationMode::Vintage);
        let b = fresh.process(0.3, SaturationMode::Vintage);
        assert_eq!(a.to_bits(), b.to_bits());
    }

    #[test]
    fn test_mode_param_roundtrip() {
        for mode in [
            SaturationMode::Clean,
            SaturationMode::Glue,
            SaturationMode::Punch,
            SaturationMode::Vintage,
        ] {
            assert_eq!(SaturationMode::from_param(mode.to_param()), mode);
        }
        assert_eq!(SaturationMode::from_param(-1.0), SaturationMode::Clean);
        assert_eq!(SaturationMode::from_param(99.0), SaturationMode::Vintage);
    }
}
