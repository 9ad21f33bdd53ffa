//! Masterbus Meter - BS.1770 / EBU R128 loudness analysis
//!
//! Implements the loudness measurement stack at the end of the mastering
//! chain:
//!
//! - [`LoudnessMeter`] - K-weighted momentary, short-term, and gated
//!   integrated loudness, loudness range, peak, correlation, and balance
//! - [`LoudnessReadout`] - atomic cells the meter publishes into, read
//!   at display cadence from another thread
//!
//! The meter observes the signal, it never modifies it: [`LoudnessMeter::process`]
//! takes shared slices. Allocation happens only in `prepare`; the
//! per-block path is allocation-free.

pub mod loudness;
pub mod readout;

pub use loudness::{ABSOLUTE_GATE_LUFS, LoudnessMeter, RELATIVE_GATE_DB};
pub use readout::LoudnessReadout;
