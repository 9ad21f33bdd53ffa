//! Masterbus DSP - the mastering chain's processing engines
//!
//! Two stereo engines built on the primitives in `masterbus-core`:
//!
//! - [`MasteringEq`] - high/low-pass sections, low/high shelves, and four
//!   parametric bands per channel, with minimum-phase and mid/side modes
//! - [`MasteringCompressor`] - sidechain-filtered dynamics with stereo
//!   linking, program-dependent release, soft knee, saturation coloring,
//!   and parallel mix
//!
//! Both implement [`StereoProcessor`](masterbus_core::StereoProcessor)
//! for the block lifecycle and
//! [`ParameterInfo`](masterbus_core::ParameterInfo) for session capture
//! and recall.

#![cfg_attr(not(feature = "std"), no_std)]

pub mod band;
pub mod compressor;
pub mod eq;
pub mod saturation;

pub use band::{ParametricBand, ShelfBand, ShelfType};
pub use compressor::MasteringCompressor;
pub use eq::{EqMode, MasteringEq};
pub use saturation::{SaturationMode, Saturator};
