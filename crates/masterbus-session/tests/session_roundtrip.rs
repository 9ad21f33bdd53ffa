//! End-to-end persistence tests against the real engines.

use masterbus_core::ParameterInfo;
use masterbus_dsp::{MasteringCompressor, MasteringEq};
use masterbus_session::{ParamMap, Session, SlotBank, SlotId};

const SAMPLE_RATE: f32 = 48000.0;

fn dial_in(eq: &mut MasteringEq, comp: &mut MasteringCompressor) {
    eq.set_band_frequency(0, 85.0);
    eq.set_band_gain(0, -1.5);
    eq.set_band_q(0, 1.2);
    eq.set_band_frequency(2, 2500.0);
    eq.set_band_gain(2, 2.1);
    eq.set_low_shelf_gain(1.3);
    eq.set_output_gain(-0.7);
    comp.set_threshold_db(-17.5);
    comp.set_ratio(2.5);
    comp.set_attack_ms(12.0);
    comp.set_release_ms(180.0);
    comp.set_knee_db(6.0);
    comp.set_mix_percent(85.0);
}

fn capture_chain(eq: &MasteringEq, comp: &MasteringCompressor) -> ParamMap {
    let mut map = ParamMap::capture(eq);
    map.extend_from(comp);
    map
}

#[test]
fn chain_capture_covers_every_parameter() {
    let eq = MasteringEq::new(SAMPLE_RATE);
    let comp = MasteringCompressor::new(SAMPLE_RATE);
    let map = capture_chain(&eq, &comp);
    assert_eq!(map.len(), eq.param_count() + comp.param_count());
}

#[test]
fn slot_recall_is_bit_for_bit() {
    let mut eq = MasteringEq::new(SAMPLE_RATE);
    let mut comp = MasteringCompressor::new(SAMPLE_RATE);
    dial_in(&mut eq, &mut comp);

    let before: Vec<u32> = (0..eq.param_count())
        .map(|i| eq.get_param(i).to_bits())
        .chain((0..comp.param_count()).map(|i| comp.get_param(i).to_bits()))
        .collect();

    let mut bank = SlotBank::new();
    bank.store(SlotId::A, capture_chain(&eq, &comp));

    // Mangle everything, then recall A
    eq.set_band_frequency(0, 500.0);
    eq.set_band_gain(0, 9.0);
    eq.set_output_gain(6.0);
    comp.set_threshold_db(-40.0);
    comp.set_ratio(10.0);

    let snapshot = bank.recall(SlotId::A).expect("slot A was stored");
    snapshot.apply_to(&mut eq);
    snapshot.apply_to(&mut comp);

    let after: Vec<u32> = (0..eq.param_count())
        .map(|i| eq.get_param(i).to_bits())
        .chain((0..comp.param_count()).map(|i| comp.get_param(i).to_bits()))
        .collect();

    assert_eq!(before, after, "recall must restore exact stored bits");
}

#[test]
fn session_file_roundtrip_restores_chain() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("master.toml");

    let mut eq = MasteringEq::new(SAMPLE_RATE);
    let mut comp = MasteringCompressor::new(SAMPLE_RATE);
    dial_in(&mut eq, &mut comp);

    Session::new("Roundtrip")
        .with_params(capture_chain(&eq, &comp))
        .save(&path)
        .unwrap();

    let mut eq2 = MasteringEq::new(SAMPLE_RATE);
    let mut comp2 = MasteringCompressor::new(SAMPLE_RATE);
    let loaded = Session::load(&path).unwrap();
    loaded.params.apply_to(&mut eq2);
    loaded.params.apply_to(&mut comp2);

    for i in 0..eq.param_count() {
        assert_eq!(
            eq.get_param(i).to_bits(),
            eq2.get_param(i).to_bits(),
            "eq param {i} changed across save/load"
        );
    }
    for i in 0..comp.param_count() {
        assert_eq!(
            comp.get_param(i).to_bits(),
            comp2.get_param(i).to_bits(),
            "comp param {i} changed across save/load"
        );
    }
}

#[test]
fn engines_ignore_each_others_keys() {
    let eq = MasteringEq::new(SAMPLE_RATE);
    let comp = MasteringCompressor::new(SAMPLE_RATE);
    let map = capture_chain(&eq, &comp);

    let mut eq2 = MasteringEq::new(SAMPLE_RATE);
    let mut comp2 = MasteringCompressor::new(SAMPLE_RATE);
    assert_eq!(map.apply_to(&mut eq2), eq.param_count());
    assert_eq!(map.apply_to(&mut comp2), comp.param_count());
}
