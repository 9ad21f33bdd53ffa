//! Masterbus Core - DSP primitives for the mastering signal chain
//!
//! This crate provides the foundational building blocks shared by the
//! mastering EQ, compressor, and loudness meter, designed for real-time
//! audio processing with zero allocation in the audio path.
//!
//! # Core Abstractions
//!
//! ## Filters
//!
//! - [`BiquadCoeffs`] - Second-order section coefficients (a0-normalized)
//!   with RBJ cookbook designers for low/high-pass, peaking, and shelves
//! - [`Biquad`] - Direct Form I biquad section holding its own delay state
//! - [`CascadeFilter`] - Butterworth high/low-pass with selectable
//!   6/12/18/24 dB/oct slope, built from cascaded biquad stages
//!
//! ## Dynamics
//!
//! - [`EnvelopeFollower`] - Asymmetric one-pole attack/release smoothing
//!
//! ## Cross-Thread Publishing
//!
//! - [`MeterCell`] - Relaxed atomic f32 cell for audio-thread metering
//!   writes consumed by a UI-cadence reader
//!
//! ## Engine Contract
//!
//! - [`StereoProcessor`] - prepare/process/reset lifecycle shared by all
//!   engines in the chain
//! - [`ParameterInfo`] - Index-based parameter introspection for preset
//!   capture and host automation
//!
//! ## Utilities
//!
//! - Math functions: [`db_to_linear`], [`linear_to_db`],
//!   [`smoothing_coefficient`], [`mid_side_encode`], etc.
//!
//! # no_std Support
//!
//! This crate is `no_std` compatible. Disable the default `std` feature:
//!
//! ```toml
//! [dependencies]
//! masterbus-core = { version = "0.1", default-features = false }
//! ```
//!
//! # Design Principles
//!
//! - **Real-time safe**: No allocations in audio processing paths
//! - **No dependencies on std**: Pure `no_std` with `libm` for math
//! - **Defensive numerics**: degenerate inputs are clamped or floored,
//!   never propagated as NaN/Inf and never surfaced as errors

#![cfg_attr(not(feature = "std"), no_std)]

pub mod biquad;
pub mod cascade;
pub mod coeffs;
pub mod envelope;
pub mod math;
pub mod meter_cell;
pub mod param_info;
pub mod processor;

pub use biquad::Biquad;
pub use cascade::{CascadeFilter, CascadeType};
pub use coeffs::{
    BiquadCoeffs, butterworth_q, high_pass, high_shelf, low_pass, low_shelf, peaking,
};
pub use envelope::EnvelopeFollower;
pub use math::{
    db_to_linear, linear_to_db, map_range, mid_side_decode, mid_side_encode,
    smoothing_coefficient, wet_dry_mix,
};
pub use meter_cell::MeterCell;
pub use param_info::{ParamDescriptor, ParamId, ParamUnit, ParameterInfo};
pub use processor::StereoProcessor;
