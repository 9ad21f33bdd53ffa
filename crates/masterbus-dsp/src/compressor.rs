//! Mastering dynamics compressor.
//!
//! # Signal Flow (per sample, up to 2 channels)
//!
//! ```text
//! Input -> [M/S encode] -> Sidechain HPF -> Rectify -> Stereo Link
//!       -> Envelope (attack / fixed-or-auto release) -> Gain Computer
//!       -> Gain + Makeup -> Saturation -> [M/S decode] -> Wet/Dry Mix
//! ```
//!
//! The sidechain path drives detection only; the audio path is scaled
//! by the computed gain, never filtered.

use masterbus_core::{
    Biquad, EnvelopeFollower, MeterCell, ParamDescriptor, ParamId, ParamUnit, ParameterInfo,
    StereoProcessor, coeffs, db_to_linear, linear_to_db, mid_side_decode, mid_side_encode,
    smoothing_coefficient, wet_dry_mix,
};

use crate::saturation::{SaturationMode, Saturator};

/// Program-dependent release bounds in milliseconds.
const MIN_AUTO_RELEASE_MS: f32 = 50.0;
const MAX_AUTO_RELEASE_MS: f32 = 500.0;

/// Time constant of the auto-release level tracker.
const AUTO_RELEASE_SMOOTHING_MS: f32 = 100.0;

const SIDECHAIN_HPF_Q: f32 = 0.707;

/// Static gain curve: threshold, ratio, and knee.
#[derive(Debug, Clone)]
struct GainComputer {
    threshold_db: f32,
    ratio: f32,
    knee_db: f32,
}

impl GainComputer {
    fn new() -> Self {
        Self {
            threshold_db: -20.0,
            ratio: 4.0,
            knee_db: 0.0,
        }
    }

    /// Gain reduction in dB for a detector level in dB. Non-negative.
    ///
    /// Hard knee when `knee_db` is zero. Inside the knee window the
    /// effective ratio blends quadratically from 1:1 up to the full
    /// ratio, so the curve meets the hard-knee line at the knee's end.
    #[inline]
    fn compute_reduction_db(&self, input_db: f32) -> f32 {
        if self.knee_db > 0.0 {
            let half_knee = self.knee_db / 2.0;
            let knee_start = self.threshold_db - half_knee;
            let knee_end = self.threshold_db + half_knee;

            if input_db < knee_start {
                0.0
            } else if input_db > knee_end {
                (input_db - self.threshold_db) * (1.0 - 1.0 / self.ratio)
            } else {
                let knee_ratio = (input_db - knee_start) / self.knee_db;
                let current_ratio = 1.0 + (self.ratio - 1.0) * knee_ratio * knee_ratio;
                (input_db - self.threshold_db) * (1.0 - 1.0 / current_ratio)
            }
        } else if input_db > self.threshold_db {
            (input_db - self.threshold_db) * (1.0 - 1.0 / self.ratio)
        } else {
            0.0
        }
    }
}

/// Mastering compressor engine.
///
/// ## Parameter Indices (`ParameterInfo`)
///
/// | Index | Name | Range | Default |
/// |-------|------|-------|---------|
/// | 0 | Threshold | -40-0 dB | -20 |
/// | 1 | Ratio | 1-10 | 4 |
/// | 2 | Attack | 0.1-100 ms | 10 |
/// | 3 | Release | 50-2000 ms | 100 |
/// | 4 | Knee | 0-20 dB | 0 |
/// | 5 | Makeup | 0-12 dB | 0 |
/// | 6 | Mix | 0-100 % | 100 |
/// | 7 | Stereo Link | 0-100 % | 100 |
/// | 8 | Sidechain HPF | 20-300 Hz | 60 |
/// | 9 | Sidechain Listen | 0-1 | 0 |
/// | 10 | Auto Release | 0-1 | 0 |
/// | 11 | Mode | 0-3 | 0 (clean) |
/// | 12 | Mid/Side | 0-1 | 0 |
/// | 13 | Bypass | 0-1 | 0 |
#[derive(Debug)]
pub struct MasteringCompressor {
    gain_computer: GainComputer,
    env_left: EnvelopeFollower,
    env_right: EnvelopeFollower,
    saturator: Saturator,

    sc_hpf_left: Biquad,
    sc_hpf_right: Biquad,
    sc_hpf_freq: f32,

    release_ms: f32,
    release_coeff: f32,
    makeup_db: f32,
    makeup_linear: f32,
    mix: f32,
    stereo_link: f32,

    auto_release: bool,
    auto_release_env: f32,
    auto_smooth_coeff: f32,

    sidechain_listen: bool,
    mid_side: bool,
    bypassed: bool,
    mode: SaturationMode,

    sample_rate: f32,

    gain_reduction: MeterCell,
    input_level: MeterCell,
    output_level: MeterCell,
}

impl MasteringCompressor {
    /// Creates a compressor with default settings.
    pub fn new(sample_rate: f32) -> Self {
        let mut comp = Self {
            gain_computer: GainComputer::new(),
            env_left: EnvelopeFollower::with_times(sample_rate, 10.0, 100.0),
            env_right: EnvelopeFollower::with_times(sample_rate, 10.0, 100.0),
            saturator: Saturator::new(),
            sc_hpf_left: Biquad::new(),
            sc_hpf_right: Biquad::new(),
            sc_hpf_freq: 60.0,
            release_ms: 100.0,
            release_coeff: 0.0,
            makeup_db: 0.0,
            makeup_linear: 1.0,
            mix: 1.0,
            stereo_link: 1.0,
            auto_release: false,
            auto_release_env: 0.0,
            auto_smooth_coeff: 0.0,
            sidechain_listen: false,
            mid_side: false,
            bypassed: false,
            mode: SaturationMode::Clean,
            sample_rate,
            gain_reduction: MeterCell::new(0.0),
            input_level: MeterCell::new(0.0),
            output_level: MeterCell::new(0.0),
        };
        comp.update_coefficients();
        comp
    }

    /// Sets the threshold in dB (-40 to 0).
    pub fn set_threshold_db(&mut self, threshold_db: f32) {
        self.gain_computer.threshold_db = threshold_db.clamp(-40.0, 0.0);
    }

    /// Sets the compression ratio (1:1 to 10:1).
    pub fn set_ratio(&mut self, ratio: f32) {
        self.gain_computer.ratio = ratio.clamp(1.0, 10.0);
    }

    /// Sets the attack time in milliseconds (0.1 to 100).
    pub fn set_attack_ms(&mut self, attack_ms: f32) {
        let attack_ms = attack_ms.clamp(0.1, 100.0);
        self.env_left.set_attack_ms(attack_ms);
        self.env_right.set_attack_ms(attack_ms);
    }

    /// Sets the release time in milliseconds (50 to 2000).
    ///
    /// Ignored while auto-release is active.
    pub fn set_release_ms(&mut self, release_ms: f32) {
        self.release_ms = release_ms.clamp(50.0, 2000.0);
        self.release_coeff = self.env_left.release_coefficient(self.release_ms);
    }

    /// Sets the soft-knee width in dB (0 = hard knee, up to 20).
    pub fn set_knee_db(&mut self, knee_db: f32) {
        self.gain_computer.knee_db = knee_db.clamp(0.0, 20.0);
    }

    /// Sets the makeup gain in dB (0 to 12).
    pub fn set_makeup_gain_db(&mut self, gain_db: f32) {
        self.makeup_db = gain_db.clamp(0.0, 12.0);
        self.makeup_linear = db_to_linear(self.makeup_db);
    }

    /// Sets the wet/dry mix in percent (0 = dry, 100 = fully compressed).
    pub fn set_mix_percent(&mut self, mix_percent: f32) {
        self.mix = (mix_percent / 100.0).clamp(0.0, 1.0);
    }

    /// Sets the stereo link amount in percent.
    ///
    /// 0 % runs fully independent left/right detection, 100 % shares a
    /// single max-of-both envelope. Intermediate values blend the left
    /// level toward the channel maximum.
    pub fn set_stereo_link_percent(&mut self, link_percent: f32) {
        self.stereo_link = (link_percent / 100.0).clamp(0.0, 1.0);
    }

    /// Sets the sidechain high-pass corner (20 to 300 Hz).
    pub fn set_sidechain_hpf(&mut self, freq: f32) {
        self.sc_hpf_freq = freq.clamp(20.0, 300.0);
        let c = coeffs::high_pass(self.sc_hpf_freq, SIDECHAIN_HPF_Q, self.sample_rate);
        self.sc_hpf_left.set_coeffs(c);
        self.sc_hpf_right.set_coeffs(c);
    }

    /// Routes the filtered sidechain signal to the output for auditioning.
    pub fn set_sidechain_listen(&mut self, enabled: bool) {
        self.sidechain_listen = enabled;
    }

    /// Enables program-dependent release.
    pub fn set_auto_release(&mut self, enabled: bool) {
        self.auto_release = enabled;
    }

    /// Compresses mid/side components instead of left/right.
    pub fn set_mid_side(&mut self, enabled: bool) {
        self.mid_side = enabled;
    }

    /// Selects the saturation character.
    pub fn set_mode(&mut self, mode: SaturationMode) {
        self.mode = mode;
    }

    /// Current saturation mode.
    pub fn mode(&self) -> SaturationMode {
        self.mode
    }

    /// Bypasses the whole compressor.
    pub fn set_bypass(&mut self, bypassed: bool) {
        self.bypassed = bypassed;
    }

    /// Peak gain reduction of the last processed block, in dB (>= 0).
    pub fn gain_reduction_db(&self) -> f32 {
        self.gain_reduction.load()
    }

    /// Peak input level of the last processed block, linear.
    pub fn input_level(&self) -> f32 {
        self.input_level.load()
    }

    /// Peak output level of the last processed block, linear.
    pub fn output_level(&self) -> f32 {
        self.output_level.load()
    }

    fn update_coefficients(&mut self) {
        self.env_left.set_sample_rate(self.sample_rate);
        self.env_right.set_sample_rate(self.sample_rate);
        self.release_coeff = self.env_left.release_coefficient(self.release_ms);
        self.auto_smooth_coeff = smoothing_coefficient(self.sample_rate, AUTO_RELEASE_SMOOTHING_MS);

        let c = coeffs::high_pass(self.sc_hpf_freq, SIDECHAIN_HPF_Q, self.sample_rate);
        self.sc_hpf_left.set_coeffs(c);
        self.sc_hpf_right.set_coeffs(c);
    }

    /// Release coefficient mapped from a slow-tracked copy of the
    /// detector level. Louder sustained input releases faster.
    #[inline]
    fn auto_release_coefficient(&mut self, level: f32) -> f32 {
        self.auto_release_env += self.auto_smooth_coeff * (level - self.auto_release_env);
        let release_ms = MAX_AUTO_RELEASE_MS
            - (MAX_AUTO_RELEASE_MS - MIN_AUTO_RELEASE_MS) * self.auto_release_env.min(1.0);
        self.env_left.release_coefficient(release_ms)
    }
}

impl StereoProcessor for MasteringCompressor {
    fn prepare(&mut self, sample_rate: f32, _max_block_size: usize) {
        self.sample_rate = sample_rate;
        self.update_coefficients();
        self.reset();
    }

    fn process(&mut self, left: &mut [f32], right: &mut [f32]) {
        if self.bypassed {
            return;
        }

        let mut in_level = 0.0f32;
        for (l, r) in left.iter().zip(right.iter()) {
            in_level = in_level.max(l.abs()).max(r.abs());
        }
        self.input_level.store(in_level);

        let mut max_reduction = 0.0f32;

        for (l, r) in left.iter_mut().zip(right.iter_mut()) {
            let dry_left = *l;
            let dry_right = *r;

            let (mut in_left, mut in_right) = (dry_left, dry_right);
            if self.mid_side {
                let (mid, side) = mid_side_encode(in_left, in_right);
                in_left = mid;
                in_right = side;
            }

            let sc_left = self.sc_hpf_left.process(in_left);
            let sc_right = self.sc_hpf_right.process(in_right);

            if self.sidechain_listen {
                *l = sc_left;
                *r = sc_right;
                continue;
            }

            let level_left = sc_left.abs();
            let level_right = sc_right.abs();

            let max_level = level_left.max(level_right);
            let linked_level = if self.stereo_link >= 1.0 {
                max_level
            } else {
                // Asymmetric blend toward the louder channel
                level_left + self.stereo_link * (max_level - level_left)
            };

            let release_coeff = if self.auto_release {
                self.auto_release_coefficient(linked_level)
            } else {
                self.release_coeff
            };

            let (reduction_left, reduction_right);
            if self.stereo_link > 0.0 {
                let envelope = self.env_left.process_with_release(linked_level, release_coeff);
                let reduction = self
                    .gain_computer
                    .compute_reduction_db(linear_to_db(envelope));
                reduction_left = reduction;
                reduction_right = reduction;
            } else {
                let env_l = self.env_left.process_with_release(level_left, release_coeff);
                let env_r = self
                    .env_right
                    .process_with_release(level_right, release_coeff);
                reduction_left = self.gain_computer.compute_reduction_db(linear_to_db(env_l));
                reduction_right = self.gain_computer.compute_reduction_db(linear_to_db(env_r));
            }

            max_reduction = max_reduction.max(reduction_left.max(reduction_right));

            let gain_left = db_to_linear(-reduction_left);
            let gain_right = db_to_linear(-reduction_right);

            let mut out_left = in_left * gain_left * self.makeup_linear;
            let mut out_right = in_right * gain_right * self.makeup_linear;

            if self.mode != SaturationMode::Clean {
                out_left = self.saturator.process(out_left, self.mode);
                out_right = self.saturator.process(out_right, self.mode);
            }

            if self.mid_side {
                let (out_l, out_r) = mid_side_decode(out_left, out_right);
                out_left = out_l;
                out_right = out_r;
            }

            *l = wet_dry_mix(dry_left, out_left, self.mix);
            *r = wet_dry_mix(dry_right, out_right, self.mix);
        }

        self.gain_reduction.store(max_reduction);

        let mut out_level = 0.0f32;
        for (l, r) in left.iter().zip(right.iter()) {
            out_level = out_level.max(l.abs()).max(r.abs());
        }
        self.output_level.store(out_level);
    }

    fn reset(&mut self) {
        self.env_left.reset();
        self.env_right.reset();
        self.saturator.reset();
        self.sc_hpf_left.reset();
        self.sc_hpf_right.reset();
        self.auto_release_env = 0.0;
        self.gain_reduction.store(0.0);
    }
}

impl ParameterInfo for MasteringCompressor {
    fn param_count(&self) -> usize {
        14
    }

    fn param_info(&self, index: usize) -> Option<ParamDescriptor> {
        let desc = match index {
            0 => ParamDescriptor::gain_db("Threshold", "Thresh", -40.0, 0.0, -20.0)
                .with_id(ParamId(300), "comp_thresh"),
            1 => ParamDescriptor {
                unit: ParamUnit::Ratio,
                ..ParamDescriptor::unitless("Ratio", "Ratio", 1.0, 10.0, 4.0)
            }
            .with_id(ParamId(301), "comp_ratio"),
            2 => ParamDescriptor::time_ms("Attack", "Attack", 0.1, 100.0, 10.0)
                .with_id(ParamId(302), "comp_attack"),
            3 => ParamDescriptor::time_ms("Release", "Release", 50.0, 2000.0, 100.0)
                .with_id(ParamId(303), "comp_release"),
            4 => ParamDescriptor::gain_db("Knee", "Knee", 0.0, 20.0, 0.0)
                .with_id(ParamId(304), "comp_knee"),
            5 => ParamDescriptor::gain_db("Makeup Gain", "Makeup", 0.0, 12.0, 0.0)
                .with_id(ParamId(305), "comp_makeup"),
            6 => ParamDescriptor::percent("Mix", "Mix", 100.0).with_id(ParamId(306), "comp_mix"),
            7 => ParamDescriptor::percent("Stereo Link", "Link", 100.0)
                .with_id(ParamId(307), "comp_link"),
            8 => ParamDescriptor::freq_hz("Sidechain HPF", "SC HPF", 20.0, 300.0, 60.0)
                .with_id(ParamId(308), "comp_sc_hpf"),
            9 => ParamDescriptor::toggle("Sidechain Listen", "SC Lstn", false)
                .with_id(ParamId(309), "comp_sc_listen"),
            10 => ParamDescriptor::toggle("Auto Release", "Auto Rel", false)
                .with_id(ParamId(310), "comp_auto_release"),
            11 => ParamDescriptor::unitless("Mode", "Mode", 0.0, 3.0, 0.0)
                .with_id(ParamId(311), "comp_mode"),
            12 => ParamDescriptor::toggle("Mid/Side", "M/S", false)
                .with_id(ParamId(312), "comp_mid_side"),
            13 => ParamDescriptor::toggle("Bypass", "Bypass", false)
                .with_id(ParamId(313), "comp_bypass"),
            _ => return None,
        };
        Some(desc)
    }

    fn get_param(&self, index: usize) -> f32 {
        match index {
            0 => self.gain_computer.threshold_db,
            1 => self.gain_computer.ratio,
            2 => self.env_left.attack_ms(),
            3 => self.release_ms,
            4 => self.gain_computer.knee_db,
            5 => self.makeup_db,
            6 => self.mix * 100.0,
            7 => self.stereo_link * 100.0,
            8 => self.sc_hpf_freq,
            9 => f32::from(u8::from(self.sidechain_listen)),
            10 => f32::from(u8::from(self.auto_release)),
            11 => self.mode.to_param(),
            12 => f32::from(u8::from(self.mid_side)),
            13 => f32::from(u8::from(self.bypassed)),
            _ => 0.0,
        }
    }

    fn set_param(&mut self, index: usize, value: f32) {
        match index {
            0 => self.set_threshold_db(value),
            1 => self.set_ratio(value),
            2 => self.set_attack_ms(value),
            3 => self.set_release_ms(value),
            4 => self.set_knee_db(value),
            5 => self.set_makeup_gain_db(value),
            6 => self.set_mix_percent(value),
            7 => self.set_stereo_link_percent(value),
            8 => self.set_sidechain_hpf(value),
            9 => self.set_sidechain_listen(value >= 0.5),
            10 => self.set_auto_release(value >= 0.5),
            11 => self.set_mode(SaturationMode::from_param(value)),
            12 => self.set_mid_side(value >= 0.5),
            13 => self.set_bypass(value >= 0.5),
            _ => {}
        }
    }
}
