//! Mastering equalizer.
//!
//! Per-channel signal path:
//!
//! ```text
//! HPF -> Low Shelf -> Band 1..4 -> High Shelf -> LPF -> Output Trim
//! ```
//!
//! Two full filter chains are held, one per channel. In mid/side mode
//! the chains process the mid and side signals instead of left/right,
//! so each half of the stereo image gets its own curve.

use masterbus_core::{
    CascadeFilter, CascadeType, ParamDescriptor, ParamId, ParameterInfo, StereoProcessor,
    db_to_linear, linear_to_db, mid_side_decode, mid_side_encode,
};

use crate::band::{ParametricBand, ShelfBand, ShelfType};

/// Number of parametric bands per channel.
pub const NUM_BANDS: usize = 4;

const BAND_DEFAULT_FREQ: [f32; NUM_BANDS] = [80.0, 300.0, 1000.0, 4000.0];

const BAND_FREQ_NAMES: [&str; NUM_BANDS] = ["Band 1 Freq", "Band 2 Freq", "Band 3 Freq", "Band 4 Freq"];
const BAND_GAIN_NAMES: [&str; NUM_BANDS] = ["Band 1 Gain", "Band 2 Gain", "Band 3 Gain", "Band 4 Gain"];
const BAND_Q_NAMES: [&str; NUM_BANDS] = ["Band 1 Q", "Band 2 Q", "Band 3 Q", "Band 4 Q"];
const BAND_ENABLE_NAMES: [&str; NUM_BANDS] =
    ["Band 1 Enable", "Band 2 Enable", "Band 3 Enable", "Band 4 Enable"];
const BAND_FREQ_IDS: [&str; NUM_BANDS] = ["eq_b1_freq", "eq_b2_freq", "eq_b3_freq", "eq_b4_freq"];
const BAND_GAIN_IDS: [&str; NUM_BANDS] = ["eq_b1_gain", "eq_b2_gain", "eq_b3_gain", "eq_b4_gain"];
const BAND_Q_IDS: [&str; NUM_BANDS] = ["eq_b1_q", "eq_b2_q", "eq_b3_q", "eq_b4_q"];
const BAND_ENABLE_IDS: [&str; NUM_BANDS] =
    ["eq_b1_enable", "eq_b2_enable", "eq_b3_enable", "eq_b4_enable"];

/// Processing mode for the whole EQ.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EqMode {
    /// Independent per-channel IIR processing (default).
    #[default]
    MinimumPhase,
    /// Encode to mid/side, run channel 0 on mid and channel 1 on side.
    MidSide,
    /// Declared but not implemented; processing runs minimum-phase.
    /// Hosts should check [`MasteringEq::is_linear_phase_implemented`]
    /// and surface the fallback instead of hiding it.
    LinearPhase,
}

impl EqMode {
    /// Maps a parameter value (0 to 2) to a mode.
    pub fn from_param(value: f32) -> Self {
        match value as i32 {
            i32::MIN..=0 => Self::MinimumPhase,
            1 => Self::MidSide,
            2..=i32::MAX => Self::LinearPhase,
        }
    }

    /// Parameter value for this mode.
    pub fn to_param(self) -> f32 {
        match self {
            Self::MinimumPhase => 0.0,
            Self::MidSide => 1.0,
            Self::LinearPhase => 2.0,
        }
    }
}

/// One channel's complete filter chain.
#[derive(Debug, Clone)]
struct ChannelChain {
    high_pass: CascadeFilter,
    low_pass: CascadeFilter,
    low_shelf: ShelfBand,
    high_shelf: ShelfBand,
    bands: [ParametricBand; NUM_BANDS],
}

impl ChannelChain {
    fn new(sample_rate: f32) -> Self {
        let mut chain = Self {
            high_pass: CascadeFilter::new(CascadeType::HighPass, sample_rate),
            low_pass: CascadeFilter::new(CascadeType::LowPass, sample_rate),
            low_shelf: ShelfBand::new(ShelfType::Low, sample_rate),
            high_shelf: ShelfBand::new(ShelfType::High, sample_rate),
            bands: [
                ParametricBand::new(sample_rate),
                ParametricBand::new(sample_rate),
                ParametricBand::new(sample_rate),
                ParametricBand::new(sample_rate),
            ],
        };

        chain.high_pass.set_parameters(20.0, 2);
        chain.low_pass.set_parameters(20000.0, 2);
        for (band, &freq) in chain.bands.iter_mut().zip(BAND_DEFAULT_FREQ.iter()) {
            band.set_parameters(freq, 0.0, 1.0);
        }
        chain
    }

    #[inline]
    fn process_sample(&mut self, input: f32, hpf_on: bool, lpf_on: bool) -> f32 {
        let mut sample = input;
        if hpf_on {
            sample = self.high_pass.process(sample);
        }
        sample = self.low_shelf.process(sample);
        for band in &mut self.bands {
            sample = band.process(sample);
        }
        sample = self.high_shelf.process(sample);
        if lpf_on {
            sample = self.low_pass.process(sample);
        }
        sample
    }

    fn set_sample_rate(&mut self, sample_rate: f32) {
        self.high_pass.set_sample_rate(sample_rate);
        self.low_pass.set_sample_rate(sample_rate);
        self.low_shelf.set_sample_rate(sample_rate);
        self.high_shelf.set_sample_rate(sample_rate);
        for band in &mut self.bands {
            band.set_sample_rate(sample_rate);
        }
    }

    fn reset(&mut self) {
        self.high_pass.reset();
        self.low_pass.reset();
        self.low_shelf.reset();
        self.high_shelf.reset();
        for band in &mut self.bands {
            band.reset();
        }
    }
}

/// Complete mastering EQ engine.
///
/// ## Parameter Indices (`ParameterInfo`)
///
/// | Index | Name | Range | Default |
/// |-------|------|-------|---------|
/// | 0-2 | HPF Freq / Slope / Enable | 10-300 Hz, 6-24 dB/oct | 20 Hz, 12, off |
/// | 3-5 | LPF Freq / Slope / Enable | 5-22 kHz, 6-24 dB/oct | 20 kHz, 12, off |
/// | 6-8 | Low Shelf Freq / Gain / Enable | 20-500 Hz, +/-12 dB | 100 Hz, 0, on |
/// | 9-11 | High Shelf Freq / Gain / Enable | 2-20 kHz, +/-12 dB | 8 kHz, 0, on |
/// | 12-27 | Band 1-4 Freq / Gain / Q / Enable | 20-20k Hz, +/-18 dB, 0.1-10 | 80/300/1k/4k, 0, 1.0, on |
/// | 28 | Mode | 0-2 | 0 (minimum phase) |
/// | 29 | Output Gain | +/-12 dB | 0 |
/// | 30 | Bypass | 0-1 | 0 |
#[derive(Debug, Clone)]
pub struct MasteringEq {
    chains: [ChannelChain; 2],
    hpf_enabled: bool,
    lpf_enabled: bool,
    mode: EqMode,
    bypassed: bool,
    output_gain_db: f32,
    output_gain_linear: f32,
    sample_rate: f32,
}

impl MasteringEq {
    /// Creates an EQ with all sections flat at the given sample rate.
    pub fn new(sample_rate: f32) -> Self {
        Self {
            chains: [ChannelChain::new(sample_rate), ChannelChain::new(sample_rate)],
            hpf_enabled: false,
            lpf_enabled: false,
            mode: EqMode::MinimumPhase,
            bypassed: false,
            output_gain_db: 0.0,
            output_gain_linear: 1.0,
            sample_rate,
        }
    }

    /// Sets the high-pass corner frequency (10 Hz to 300 Hz).
    pub fn set_high_pass_frequency(&mut self, freq: f32) {
        let freq = freq.clamp(10.0, 300.0);
        for chain in &mut self.chains {
            let order = chain.high_pass.order();
            chain.high_pass.set_parameters(freq, order);
        }
    }

    /// Sets the high-pass slope in dB/oct (6, 12, 18, or 24).
    pub fn set_high_pass_slope(&mut self, slope_db: usize) {
        let order = (slope_db / 6).clamp(1, 4);
        for chain in &mut self.chains {
            let freq = chain.high_pass.frequency();
            chain.high_pass.set_parameters(freq, order);
        }
    }

    /// Enables or disables the high-pass section.
    pub fn set_high_pass_enabled(&mut self, enabled: bool) {
        self.hpf_enabled = enabled;
    }

    /// Sets the low-pass corner frequency (5 kHz to 22 kHz).
    pub fn set_low_pass_frequency(&mut self, freq: f32) {
        let freq = freq.clamp(5000.0, 22000.0);
        for chain in &mut self.chains {
            let order = chain.low_pass.order();
            chain.low_pass.set_parameters(freq, order);
        }
    }

    /// Sets the low-pass slope in dB/oct (6, 12, 18, or 24).
    pub fn set_low_pass_slope(&mut self, slope_db: usize) {
        let order = (slope_db / 6).clamp(1, 4);
        for chain in &mut self.chains {
            let freq = chain.low_pass.frequency();
            chain.low_pass.set_parameters(freq, order);
        }
    }

    /// Enables or disables the low-pass section.
    pub fn set_low_pass_enabled(&mut self, enabled: bool) {
        self.lpf_enabled = enabled;
    }

    /// Sets the low shelf corner frequency (20 Hz to 500 Hz).
    pub fn set_low_shelf_frequency(&mut self, freq: f32) {
        let freq = freq.clamp(20.0, 500.0);
        for chain in &mut self.chains {
            let gain = chain.low_shelf.gain_db();
            chain.low_shelf.set_parameters(freq, gain);
        }
    }

    /// Sets the low shelf gain (+/-12 dB).
    pub fn set_low_shelf_gain(&mut self, gain_db: f32) {
        for chain in &mut self.chains {
            let freq = chain.low_shelf.frequency();
            chain.low_shelf.set_parameters(freq, gain_db);
        }
    }

    /// Enables or disables the low shelf.
    pub fn set_low_shelf_enabled(&mut self, enabled: bool) {
        for chain in &mut self.chains {
            chain.low_shelf.set_enabled(enabled);
        }
    }

    /// Sets the high shelf corner frequency (2 kHz to 20 kHz).
    pub fn set_high_shelf_frequency(&mut self, freq: f32) {
        let freq = freq.clamp(2000.0, 20000.0);
        for chain in &mut self.chains {
            let gain = chain.high_shelf.gain_db();
            chain.high_shelf.set_parameters(freq, gain);
        }
    }

    /// Sets the high shelf gain (+/-12 dB).
    pub fn set_high_shelf_gain(&mut self, gain_db: f32) {
        for chain in &mut self.chains {
            let freq = chain.high_shelf.frequency();
            chain.high_shelf.set_parameters(freq, gain_db);
        }
    }

    /// Enables or disables the high shelf.
    pub fn set_high_shelf_enabled(&mut self, enabled: bool) {
        for chain in &mut self.chains {
            chain.high_shelf.set_enabled(enabled);
        }
    }

    /// Sets a parametric band's center frequency. Out-of-range band
    /// indices are ignored.
    pub fn set_band_frequency(&mut self, band: usize, freq: f32) {
        if band >= NUM_BANDS {
            return;
        }
        for chain in &mut self.chains {
            let b = &mut chain.bands[band];
            let (gain, q) = (b.gain_db(), b.q());
            b.set_parameters(freq, gain, q);
        }
    }

    /// Sets a parametric band's gain.
    pub fn set_band_gain(&mut self, band: usize, gain_db: f32) {
        if band >= NUM_BANDS {
            return;
        }
        for chain in &mut self.chains {
            let b = &mut chain.bands[band];
            let (freq, q) = (b.frequency(), b.q());
            b.set_parameters(freq, gain_db, q);
        }
    }

    /// Sets a parametric band's Q.
    pub fn set_band_q(&mut self, band: usize, q: f32) {
        if band >= NUM_BANDS {
            return;
        }
        for chain in &mut self.chains {
            let b = &mut chain.bands[band];
            let (freq, gain) = (b.frequency(), b.gain_db());
            b.set_parameters(freq, gain, q);
        }
    }

    /// Enables or disables a parametric band.
    pub fn set_band_enabled(&mut self, band: usize, enabled: bool) {
        if band >= NUM_BANDS {
            return;
        }
        for chain in &mut self.chains {
            chain.bands[band].set_enabled(enabled);
        }
    }

    /// Selects the processing mode.
    pub fn set_mode(&mut self, mode: EqMode) {
        self.mode = mode;
    }

    /// Current processing mode.
    pub fn mode(&self) -> EqMode {
        self.mode
    }

    /// Whether [`EqMode::LinearPhase`] runs a real linear-phase path.
    ///
    /// Currently always `false`: the mode is accepted but degrades to
    /// minimum-phase processing. Hosts selecting it should warn the
    /// user rather than pretend the curve is phase-linear.
    pub fn is_linear_phase_implemented(&self) -> bool {
        false
    }

    /// Bypasses the whole EQ.
    pub fn set_bypass(&mut self, bypassed: bool) {
        self.bypassed = bypassed;
    }

    /// Whether the EQ is bypassed.
    pub fn bypassed(&self) -> bool {
        self.bypassed
    }

    /// Sets the output trim (+/-12 dB).
    pub fn set_output_gain(&mut self, gain_db: f32) {
        self.output_gain_db = gain_db.clamp(-12.0, 12.0);
        self.output_gain_linear = db_to_linear(self.output_gain_db);
    }

    /// Fills `response` with the EQ's magnitude response in dB, sampled
    /// at logarithmically spaced frequencies from 20 Hz to 20 kHz.
    ///
    /// Evaluates channel 0's chain; in mid/side mode this is the mid
    /// curve. Disabled sections contribute 0 dB. The output trim is
    /// included.
    pub fn magnitude_response(&self, response: &mut [f32]) {
        let n = response.len();
        if n == 0 {
            return;
        }
        let chain = &self.chains[0];
        for (i, out) in response.iter_mut().enumerate() {
            let t = if n > 1 { i as f32 / (n - 1) as f32 } else { 0.0 };
            let freq = 20.0 * libm::powf(1000.0, t);

            let mut db = 0.0;
            if self.hpf_enabled {
                db += linear_to_db(chain.high_pass.magnitude_at(freq));
            }
            db += linear_to_db(chain.low_shelf.magnitude_at(freq));
            for band in &chain.bands {
                db += linear_to_db(band.magnitude_at(freq));
            }
            db += linear_to_db(chain.high_shelf.magnitude_at(freq));
            if self.lpf_enabled {
                db += linear_to_db(chain.low_pass.magnitude_at(freq));
            }
            db += self.output_gain_db;

            *out = db;
        }
    }
}

impl StereoProcessor for MasteringEq {
    fn prepare(&mut self, sample_rate: f32, _max_block_size: usize) {
        self.sample_rate = sample_rate;
        for chain in &mut self.chains {
            chain.set_sample_rate(sample_rate);
        }
        self.reset();
    }

    fn process(&mut self, left: &mut [f32], right: &mut [f32]) {
        if self.bypassed {
            return;
        }

        match self.mode {
            // Linear phase is not implemented and runs the
            // minimum-phase path
            EqMode::MinimumPhase | EqMode::LinearPhase => {
                for sample in left.iter_mut() {
                    *sample = self.chains[0].process_sample(
                        *sample,
                        self.hpf_enabled,
                        self.lpf_enabled,
                    );
                }
                for sample in right.iter_mut() {
                    *sample = self.chains[1].process_sample(
                        *sample,
                        self.hpf_enabled,
                        self.lpf_enabled,
                    );
                }
            }
            EqMode::MidSide => {
                let [mid_chain, side_chain] = &mut self.chains;
                for (l, r) in left.iter_mut().zip(right.iter_mut()) {
                    let (mid, side) = mid_side_encode(*l, *r);
                    let mid = mid_chain.process_sample(mid, self.hpf_enabled, self.lpf_enabled);
                    let side = side_chain.process_sample(side, self.hpf_enabled, self.lpf_enabled);
                    let (out_l, out_r) = mid_side_decode(mid, side);
                    *l = out_l;
                    *r = out_r;
                }
            }
        }

        if (self.output_gain_linear - 1.0).abs() > 1e-4 {
            for sample in left.iter_mut() {
                *sample *= self.output_gain_linear;
            }
            for sample in right.iter_mut() {
                *sample *= self.output_gain_linear;
            }
        }
    }

    fn reset(&mut self) {
        for chain in &mut self.chains {
            chain.reset();
        }
    }
}

impl ParameterInfo for MasteringEq {
    fn param_count(&self) -> usize {
        31
    }

    fn param_info(&self, index: usize) -> Option<ParamDescriptor> {
        let desc = match index {
            0 => ParamDescriptor::freq_hz("HPF Freq", "HPF", 10.0, 300.0, 20.0)
                .with_id(ParamId(100), "eq_hpf_freq"),
            1 => ParamDescriptor::unitless("HPF Slope", "HPF Slp", 6.0, 24.0, 12.0)
                .with_id(ParamId(101), "eq_hpf_slope"),
            2 => ParamDescriptor::toggle("HPF Enable", "HPF On", false)
                .with_id(ParamId(102), "eq_hpf_enable"),
            3 => ParamDescriptor::freq_hz("LPF Freq", "LPF", 5000.0, 22000.0, 20000.0)
                .with_id(ParamId(103), "eq_lpf_freq"),
            4 => ParamDescriptor::unitless("LPF Slope", "LPF Slp", 6.0, 24.0, 12.0)
                .with_id(ParamId(104), "eq_lpf_slope"),
            5 => ParamDescriptor::toggle("LPF Enable", "LPF On", false)
                .with_id(ParamId(105), "eq_lpf_enable"),
            6 => ParamDescriptor::freq_hz("Low Shelf Freq", "LShelf", 20.0, 500.0, 100.0)
                .with_id(ParamId(106), "eq_lshelf_freq"),
            7 => ParamDescriptor::gain_db("Low Shelf Gain", "LSh Gain", -12.0, 12.0, 0.0)
                .with_id(ParamId(107), "eq_lshelf_gain"),
            8 => ParamDescriptor::toggle("Low Shelf Enable", "LSh On", true)
                .with_id(ParamId(108), "eq_lshelf_enable"),
            9 => ParamDescriptor::freq_hz("High Shelf Freq", "HShelf", 2000.0, 20000.0, 8000.0)
                .with_id(ParamId(109), "eq_hshelf_freq"),
            10 => ParamDescriptor::gain_db("High Shelf Gain", "HSh Gain", -12.0, 12.0, 0.0)
                .with_id(ParamId(110), "eq_hshelf_gain"),
            11 => ParamDescriptor::toggle("High Shelf Enable", "HSh On", true)
                .with_id(ParamId(111), "eq_hshelf_enable"),
            12..=27 => {
                let band = (index - 12) / 4;
                let field = (index - 12) % 4;
                let id = ParamId(112 + (index - 12) as u32);
                match field {
                    0 => ParamDescriptor::freq_hz(
                        BAND_FREQ_NAMES[band],
                        "Freq",
                        20.0,
                        20000.0,
                        BAND_DEFAULT_FREQ[band],
                    )
                    .with_id(id, BAND_FREQ_IDS[band]),
                    1 => ParamDescriptor::gain_db(BAND_GAIN_NAMES[band], "Gain", -18.0, 18.0, 0.0)
                        .with_id(id, BAND_GAIN_IDS[band]),
                    2 => ParamDescriptor::unitless(BAND_Q_NAMES[band], "Q", 0.1, 10.0, 1.0)
                        .with_id(id, BAND_Q_IDS[band]),
                    _ => ParamDescriptor::toggle(BAND_ENABLE_NAMES[band], "Enable", true)
                        .with_id(id, BAND_ENABLE_IDS[band]),
                }
            }
            28 => ParamDescriptor::unitless("EQ Mode", "Mode", 0.0, 2.0, 0.0)
                .with_id(ParamId(128), "eq_mode"),
            29 => ParamDescriptor::gain_db("Output Gain", "Out Gain", -12.0, 12.0, 0.0)
                .with_id(ParamId(129), "eq_out_gain"),
            30 => ParamDescriptor::toggle("EQ Bypass", "Bypass", false)
                .with_id(ParamId(130), "eq_bypass"),
            _ => return None,
        };
        Some(desc)
    }

    fn get_param(&self, index: usize) -> f32 {
        let chain = &self.chains[0];
        match index {
            0 => chain.high_pass.frequency(),
            1 => chain.high_pass.slope_db_per_octave() as f32,
            2 => f32::from(u8::from(self.hpf_enabled)),
            3 => chain.low_pass.frequency(),
            4 => chain.low_pass.slope_db_per_octave() as f32,
            5 => f32::from(u8::from(self.lpf_enabled)),
            6 => chain.low_shelf.frequency(),
            7 => chain.low_shelf.gain_db(),
            8 => f32::from(u8::from(chain.low_shelf.enabled())),
            9 => chain.high_shelf.frequency(),
            10 => chain.high_shelf.gain_db(),
            11 => f32::from(u8::from(chain.high_shelf.enabled())),
            12..=27 => {
                let band = &chain.bands[(index - 12) / 4];
                match (index - 12) % 4 {
                    0 => band.frequency(),
                    1 => band.gain_db(),
                    2 => band.q(),
                    _ => f32::from(u8::from(band.enabled())),
                }
            }
            28 => self.mode.to_param(),
            29 => self.output_gain_db,
            30 => f32::from(u8::from(self.bypassed)),
            _ => 0.0,
        }
    }

    fn set_param(&mut self, index: usize, value: f32) {
        match index {
            0 => self.set_high_pass_frequency(value),
            1 => self.set_high_pass_slope(value as usize),
            2 => self.set_high_pass_enabled(value >= 0.5),
            3 => self.set_low_pass_frequency(value),
            4 => self.set_low_pass_slope(value as usize),
            5 => self.set_low_pass_enabled(value >= 0.5),
            6 => self.set_low_shelf_frequency(value),
            7 => self.set_low_shelf_gain(value),
            8 => self.set_low_shelf_enabled(value >= 0.5),
            9 => self.set_high_shelf_frequency(value),
            10 => self.set_high_shelf_gain(value),
            11 => self.set_high_shelf_enabled(value >= 0.5),
            12..=27 => {
                let band = (index - 12) / 4;
                match (index - 12) % 4 {
                    0 => self.set_band_frequency(band, value),
                    1 => self.set_band_gain(band, value),
                    2 => self.set_band_q(band, value),
                    _ => self.set_band_enabled(band, value >= 0.5),
                }
            }
            28 => self.set_mode(EqMode::from_param(value)),
            29 => self.set_output_gain(value),
            30 => self.set_bypass(value >= 0.5),
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    extern crate alloc;
    use super::*;
    use alloc::vec;

    fn sine(n: usize, step: f32) -> alloc::vec::Vec<f32> {
        (0..n).map(|i| libm::sinf(i as f32 * step) * 0.5).collect()
    }

    #[test]
    fn test_flat_eq_is_passthrough() {
        let mut eq = MasteringEq::new(48000.0);
        eq.prepare(48000.0, 256);

        let mut left = sine(256, 0.05);
        let mut right = sine(256, 0.07);
        let (dry_l, dry_r) = (left.clone(), right.clone());

        eq.process(&mut left, &mut right);

        // All sections flat or disabled: output identical to input
        for i in 0..256 {
            assert_eq!(left[i].to_bits(), dry_l[i].to_bits());
            assert_eq!(right[i].to_bits(), dry_r[i].to_bits());
        }
    }

    #[test]
    fn test_bypass_short_circuits() {
        let mut eq = MasteringEq::new(48000.0);
        eq.set_band_gain(0, 12.0);
        eq.set_output_gain(6.0);
        eq.set_bypass(true);
        eq.prepare(48000.0, 64);

        let mut left = sine(64, 0.1);
        let mut right = left.clone();
        let dry = left.clone();

        eq.process(&mut left, &mut right);
        for i in 0..64 {
            assert_eq!(left[i].to_bits(), dry[i].to_bits());
        }
    }

    #[test]
    fn test_output_trim_scales_signal() {
        let mut eq = MasteringEq::new(48000.0);
        eq.set_output_gain(-6.0206); // half amplitude
        eq.prepare(48000.0, 64);

        let mut left = vec![0.8f32; 64];
        let mut right = vec![0.8f32; 64];
        eq.process(&mut left, &mut right);

        assert!((left[32] - 0.4).abs() < 0.001, "got {}", left[32]);
        assert!((right[32] - 0.4).abs() < 0.001);
    }

    #[test]
    fn test_mid_side_mono_input_unaffected_by_side_settings() {
        let mut eq = MasteringEq::new(48000.0);
        eq.set_mode(EqMode::MidSide);
        eq.prepare(48000.0, 128);

        // Mono input has zero side signal; boosting through the shared
        // band settings affects the mid path identically for L and R
        eq.set_band_gain(1, 6.0);

        let mut left = sine(128, 0.04);
        let mut right = left.clone();
        eq.process(&mut left, &mut right);

        for i in 0..128 {
            assert!(
                (left[i] - right[i]).abs() < 1e-6,
                "mono input decoded asymmetrically at {}",
                i
            );
        }
    }

    #[test]
    fn test_linear_phase_mode_matches_minimum_phase() {
        let mut min_phase = MasteringEq::new(48000.0);
        min_phase.set_band_gain(2, 4.0);
        min_phase.prepare(48000.0, 256);

        let mut linear = MasteringEq::new(48000.0);
        linear.set_band_gain(2, 4.0);
        linear.set_mode(EqMode::LinearPhase);
        linear.prepare(48000.0, 256);

        assert!(!linear.is_linear_phase_implemented());

        let mut l1 = sine(256, 0.02);
        let mut r1 = sine(256, 0.03);
        let mut l2 = l1.clone();
        let mut r2 = r1.clone();

        min_phase.process(&mut l1, &mut r1);
        linear.process(&mut l2, &mut r2);

        for i in 0..256 {
            assert_eq!(l1[i].to_bits(), l2[i].to_bits());
            assert_eq!(r1[i].to_bits(), r2[i].to_bits());
        }
    }

    #[test]
    fn test_magnitude_response_flat_is_zero_db() {
        let eq = MasteringEq::new(48000.0);
        let mut response = [1.0f32; 64];
        eq.magnitude_response(&mut response);
        for &db in &response {
            assert!(db.abs() < 1e-3, "flat EQ reported {} dB", db);
        }
    }

    #[test]
    fn test_magnitude_response_shows_boost() {
        let mut eq = MasteringEq::new(48000.0);
        eq.set_band_frequency(2, 1000.0);
        eq.set_band_gain(2, 6.0);

        let mut response = [0.0f32; 512];
        eq.magnitude_response(&mut response);

        // 1 kHz sits at t = log_1000(50) of the sweep; just scan for the max
        let peak = response.iter().cloned().fold(f32::MIN, f32::max);
        assert!((peak - 6.0).abs() < 0.3, "peak {} dB", peak);
    }

    #[test]
    fn test_param_roundtrip_via_descriptors() {
        let mut eq = MasteringEq::new(48000.0);

        for i in 0..eq.param_count() {
            let desc = eq.param_info(i).unwrap();
            eq.set_param(i, desc.default);
        }
        for i in 0..eq.param_count() {
            let desc = eq.param_info(i).unwrap();
            let value = eq.get_param(i);
            assert!(
                (value - desc.default).abs() < 1e-6,
                "param {} ({}) default {} read back {}",
                i,
                desc.name,
                desc.default,
                value
            );
        }
    }

    #[test]
    fn test_hpf_removes_dc() {
        let mut eq = MasteringEq::new(48000.0);
        eq.set_high_pass_enabled(true);
        eq.set_high_pass_frequency(100.0);
        eq.prepare(48000.0, 1024);

        let mut left = vec![1.0f32; 48000];
        let mut right = vec![1.0f32; 48000];
        for chunk in 0..(48000 / 1024) {
            let start = chunk * 1024;
            eq.process(&mut left[start..start + 1024], &mut right[start..start + 1024]);
        }

        assert!(left[47000].abs() < 1e-3, "DC remains: {}", left[47000]);
    }
}
