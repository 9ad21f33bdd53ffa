//! Parameter introspection for discoverable engine parameters.
//!
//! Each engine exposes its controls through [`ParameterInfo`], giving
//! session capture, slot recall, and CLI overrides a uniform way to read
//! and write any parameter without knowing the engine's concrete type.
//!
//! The system uses index-based access. Every parameter carries a
//! [`ParamDescriptor`] with display metadata, its valid range, and two
//! stable identifiers:
//!
//! - [`ParamId`] — numeric ID for host automation
//! - `string_id` — human-readable ID used as the key in session files
//!
//! # Example
//!
//! ```rust
//! use masterbus_core::{ParamDescriptor, ParamId, ParameterInfo};
//!
//! struct OutputStage {
//!     trim_db: f32,
//! }
//!
//! impl ParameterInfo for OutputStage {
//!     fn param_count(&self) -> usize { 1 }
//!
//!     fn param_info(&self, index: usize) -> Option<ParamDescriptor> {
//!         match index {
//!             0 => Some(ParamDescriptor::gain_db("Output Trim", "Trim", -12.0, 12.0, 0.0)
//!                 .with_id(ParamId(900), "out_trim")),
//!             _ => None,
//!         }
//!     }
//!
//!     fn get_param(&self, index: usize) -> f32 {
//!         match index {
//!             0 => self.trim_db,
//!             _ => 0.0,
//!         }
//!     }
//!
//!     fn set_param(&mut self, index: usize, value: f32) {
//!         if index == 0 {
//!             self.trim_db = value.clamp(-12.0, 12.0);
//!         }
//!     }
//! }
//! ```

/// Stable parameter identifier that survives reordering.
///
/// Once assigned, a `ParamId` must never change for a given parameter.
/// Each engine gets a base ID; its params are sequential from there.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ParamId(pub u32);

/// Unit type for parameter display and formatting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParamUnit {
    /// Decibels (dB) - gain, threshold, and level parameters.
    Decibels,
    /// Hertz (Hz) - frequency parameters.
    Hertz,
    /// Milliseconds (ms) - attack, release, and other time parameters.
    Milliseconds,
    /// Percentage (%) - mix, link, and other normalized parameters.
    Percent,
    /// Ratio (n:1) - compressor ratio.
    Ratio,
    /// No unit - dimensionless parameters (Q, mode selectors, toggles).
    None,
}

impl ParamUnit {
    /// Returns the unit suffix string for display.
    pub const fn suffix(&self) -> &'static str {
        match self {
            ParamUnit::Decibels => " dB",
            ParamUnit::Hertz => " Hz",
            ParamUnit::Milliseconds => " ms",
            ParamUnit::Percent => "%",
            ParamUnit::Ratio => ":1",
            ParamUnit::None => "",
        }
    }
}

/// Describes a single parameter's metadata for display and validation.
///
/// `short_name` should stay at 8 characters or less for narrow meter
/// displays. `step` is the recommended increment for encoder control.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParamDescriptor {
    /// Full parameter name for display (e.g., "Sidechain HPF").
    pub name: &'static str,

    /// Short name for narrow displays, max 8 characters.
    pub short_name: &'static str,

    /// Unit type for formatting the parameter value.
    pub unit: ParamUnit,

    /// Minimum allowed value.
    pub min: f32,

    /// Maximum allowed value.
    pub max: f32,

    /// Default value on initialization or reset.
    pub default: f32,

    /// Recommended step increment for encoder-based control.
    pub step: f32,

    /// Stable numeric ID. Default: `ParamId(0)` (unassigned).
    pub id: ParamId,

    /// Stable string ID used as the session-file key.
    ///
    /// Convention: `"engine_param"` (e.g., `"comp_thresh"`, `"eq_b2_freq"`).
    pub string_id: &'static str,
}

impl ParamDescriptor {
    /// Gain parameter in decibels.
    pub fn gain_db(
        name: &'static str,
        short_name: &'static str,
        min: f32,
        max: f32,
        default: f32,
    ) -> Self {
        Self {
            name,
            short_name,
            unit: ParamUnit::Decibels,
            min,
            max,
            default,
            step: 0.5,
            id: ParamId(0),
            string_id: "",
        }
    }

    /// Time parameter in milliseconds.
    pub fn time_ms(
        name: &'static str,
        short_name: &'static str,
        min: f32,
        max: f32,
        default: f32,
    ) -> Self {
        Self {
            name,
            short_name,
            unit: ParamUnit::Milliseconds,
            min,
            max,
            default,
            step: 1.0,
            id: ParamId(0),
            string_id: "",
        }
    }

    /// Frequency parameter in Hertz.
    pub fn freq_hz(
        name: &'static str,
        short_name: &'static str,
        min: f32,
        max: f32,
        default: f32,
    ) -> Self {
        Self {
            name,
            short_name,
            unit: ParamUnit::Hertz,
            min,
            max,
            default,
            step: 1.0,
            id: ParamId(0),
            string_id: "",
        }
    }

    /// Percentage parameter (0-100).
    pub fn percent(name: &'static str, short_name: &'static str, default: f32) -> Self {
        Self {
            name,
            short_name,
            unit: ParamUnit::Percent,
            min: 0.0,
            max: 100.0,
            default,
            step: 1.0,
            id: ParamId(0),
            string_id: "",
        }
    }

    /// Dimensionless parameter with an explicit range (Q, ratio-like).
    pub fn unitless(
        name: &'static str,
        short_name: &'static str,
        min: f32,
        max: f32,
        default: f32,
    ) -> Self {
        Self {
            name,
            short_name,
            unit: ParamUnit::None,
            min,
            max,
            default,
            step: 0.1,
            id: ParamId(0),
            string_id: "",
        }
    }

    /// On/off toggle stored as 0.0 / 1.0.
    pub fn toggle(name: &'static str, short_name: &'static str, default_on: bool) -> Self {
        Self {
            name,
            short_name,
            unit: ParamUnit::None,
            min: 0.0,
            max: 1.0,
            default: if default_on { 1.0 } else { 0.0 },
            step: 1.0,
            id: ParamId(0),
            string_id: "",
        }
    }

    /// Sets the stable numeric ID and string ID.
    ///
    /// Builder pattern — call after a factory method.
    pub const fn with_id(mut self, id: ParamId, string_id: &'static str) -> Self {
        self.id = id;
        self.string_id = string_id;
        self
    }

    /// Clamps a value to this parameter's valid range.
    #[inline]
    pub fn clamp(&self, value: f32) -> f32 {
        if value < self.min {
            self.min
        } else if value > self.max {
            self.max
        } else {
            value
        }
    }

    /// Converts a plain value to normalized \[0.0, 1.0\].
    #[inline]
    pub fn normalize(&self, value: f32) -> f32 {
        let range = self.max - self.min;
        if range == 0.0 {
            return 0.0;
        }
        (value - self.min) / range
    }

    /// Converts a normalized value back to the plain range.
    #[inline]
    pub fn denormalize(&self, normalized: f32) -> f32 {
        self.min + normalized * (self.max - self.min)
    }
}

/// Trait for engines that expose introspectable parameters.
///
/// Parameters are accessed by zero-based index, stable for the lifetime
/// of the engine instance. Implementations clamp incoming values to the
/// descriptor range and silently ignore out-of-bounds indices.
pub trait ParameterInfo {
    /// Returns the number of parameters this engine exposes.
    fn param_count(&self) -> usize;

    /// Returns the descriptor for the parameter at the given index.
    ///
    /// Returns `None` if `index >= param_count()`.
    fn param_info(&self, index: usize) -> Option<ParamDescriptor>;

    /// Gets the current value of the parameter at the given index.
    ///
    /// Returns `0.0` for out-of-bounds indices.
    fn get_param(&self, index: usize) -> f32;

    /// Sets the value of the parameter at the given index.
    ///
    /// Values are clamped to the descriptor range; out-of-bounds
    /// indices are ignored.
    fn set_param(&mut self, index: usize, value: f32);

    /// Find a parameter index by display name (case-insensitive).
    ///
    /// Matches against both [`ParamDescriptor::name`] and
    /// [`ParamDescriptor::short_name`].
    fn find_param_by_name(&self, name: &str) -> Option<usize> {
        for i in 0..self.param_count() {
            if let Some(desc) = self.param_info(i)
                && (desc.name.eq_ignore_ascii_case(name)
                    || desc.short_name.eq_ignore_ascii_case(name))
            {
                return Some(i);
            }
        }
        None
    }

    /// Finds a parameter index by its stable string ID.
    ///
    /// O(n) scan, meant for session load paths, not audio.
    fn param_index_by_string_id(&self, string_id: &str) -> Option<usize> {
        (0..self.param_count()).find(|&i| {
            self.param_info(i)
                .is_some_and(|d| d.string_id == string_id)
        })
    }

    /// Returns the stable [`ParamId`] for the parameter at the given index.
    fn param_id(&self, index: usize) -> Option<ParamId> {
        self.param_info(index).map(|d| d.id)
    }

    /// Finds a parameter index by its stable [`ParamId`].
    fn param_index_by_id(&self, id: ParamId) -> Option<usize> {
        (0..self.param_count()).find(|&i| self.param_info(i).is_some_and(|d| d.id == id))
    }
}
