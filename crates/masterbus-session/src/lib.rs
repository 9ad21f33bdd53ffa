//! Masterbus Session - persistence for the mastering chain
//!
//! This crate owns everything that outlives a processing run:
//!
//! - [`ParamMap`] - flat `string_id -> value` snapshot of every engine
//!   parameter, captured and restored through `ParameterInfo`
//! - [`Session`] - named TOML file wrapping a [`ParamMap`]
//! - [`SlotBank`] / [`SlotId`] - four in-memory A/B/C/D snapshots for
//!   settings comparison, recalled bit-for-bit
//! - [`SessionError`] - what can go wrong doing any of the above

pub mod error;
pub mod params;
pub mod session;
pub mod slots;

pub use error::SessionError;
pub use params::ParamMap;
pub use session::Session;
pub use slots::{SlotBank, SlotId};
