//! The EQ -> compressor chain the commands drive.

use masterbus_core::{ParameterInfo, StereoProcessor};
use masterbus_dsp::{EqMode, MasteringCompressor, MasteringEq};
use masterbus_session::{ParamMap, Session};

/// Both engines in processing order, with one place to apply
/// parameters addressed by string ID or display name.
pub struct MasteringChain {
    /// Multi-band EQ, first in the chain.
    pub eq: MasteringEq,
    /// Compressor, after the EQ.
    pub comp: MasteringCompressor,
}

impl MasteringChain {
    /// Creates both engines at their defaults.
    pub fn new(sample_rate: f32) -> Self {
        Self {
            eq: MasteringEq::new(sample_rate),
            comp: MasteringCompressor::new(sample_rate),
        }
    }

    /// Applies every recognized parameter from a loaded session.
    pub fn apply_session(&mut self, session: &Session) -> usize {
        session.params.apply_to(&mut self.eq) + session.params.apply_to(&mut self.comp)
    }

    /// Sets one parameter by string ID (`comp_thresh`) or display name
    /// (`Threshold`), whichever engine owns it.
    pub fn set_named_param(&mut self, key: &str, value: f32) -> anyhow::Result<()> {
        if let Some(i) = self
            .eq
            .param_index_by_string_id(key)
            .or_else(|| self.eq.find_param_by_name(key))
        {
            self.eq.set_param(i, value);
            return Ok(());
        }
        if let Some(i) = self
            .comp
            .param_index_by_string_id(key)
            .or_else(|| self.comp.find_param_by_name(key))
        {
            self.comp.set_param(i, value);
            return Ok(());
        }
        anyhow::bail!("unknown parameter: '{key}'");
    }

    /// Prepares both engines and logs anything the settings imply.
    pub fn prepare(&mut self, sample_rate: f32, max_block_size: usize) {
        if self.eq.mode() == EqMode::LinearPhase && !self.eq.is_linear_phase_implemented() {
            tracing::warn!("linear-phase EQ is not implemented; processing minimum-phase instead");
        }
        self.eq.prepare(sample_rate, max_block_size);
        self.comp.prepare(sample_rate, max_block_size);
    }

    /// Runs one block through EQ then compressor, in place.
    pub fn process_block(&mut self, left: &mut [f32], right: &mut [f32]) {
        self.eq.process(left, right);
        self.comp.process(left, right);
    }

    /// Captures every parameter of both engines.
    pub fn capture_params(&self) -> ParamMap {
        let mut map = ParamMap::capture(&self.eq);
        map.extend_from(&self.comp);
        map
    }
}
