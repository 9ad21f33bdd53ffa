//! Lock-free metering cell for audio-thread to UI-thread publishing.

use core::sync::atomic::{AtomicU32, Ordering};

/// A single `f32` value shared across threads without locking.
///
/// The audio thread stores, a display-cadence reader loads. Values are
/// transported as raw bits through an [`AtomicU32`] with relaxed
/// ordering: each cell is an independent measurement, and no reader
/// needs a consistent snapshot across multiple cells. A reader may see
/// values from different instants for different cells, which is
/// acceptable for metering.
#[derive(Debug)]
pub struct MeterCell {
    bits: AtomicU32,
}

impl MeterCell {
    /// Creates a cell holding `value`.
    pub const fn new(value: f32) -> Self {
        Self {
            bits: AtomicU32::new(value.to_bits()),
        }
    }

    /// Publishes a new value. Wait-free, safe from the audio thread.
    #[inline]
    pub fn store(&self, value: f32) {
        self.bits.store(value.to_bits(), Ordering::Relaxed);
    }

    /// Reads the most recently published value.
    #[inline]
    pub fn load(&self) -> f32 {
        f32::from_bits(self.bits.load(Ordering::Relaxed))
    }
}

impl Default for MeterCell {
    fn default() -> Self {
        Self::new(0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_load_roundtrip() {
        let cell = MeterCell::new(0.0);
        cell.store(-23.5);
        assert_eq!(cell.load(), -23.5);

        cell.store(1.0);
        assert_eq!(cell.load(), 1.0);
    }

    #[test]
    fn test_initial_value() {
        let cell = MeterCell::new(-100.0);
        assert_eq!(cell.load(), -100.0);
    }

    #[test]
    fn test_preserves_exact_bits() {
        let cell = MeterCell::default();
        let value = 0.1f32; // not exactly representable, bits must survive
        cell.store(value);
        assert_eq!(cell.load().to_bits(), value.to_bits());
    }
}
