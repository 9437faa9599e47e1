use wavekit_core::{
    collect_preset_params, generate, PresetKind, PresetParams, ScriptedPrompt,
};

fn voltages(params: &PresetParams, resolution: usize) -> Vec<f64> {
    generate(params, resolution)
        .unwrap()
        .iter()
        .map(|p| p.voltage)
        .collect()
}

#[test]
fn test_every_preset_spans_the_domain() {
    let params = [
        PresetParams::Sine {
            midpoint: 1.5,
            max_amplitude: 3.0,
        },
        PresetParams::Sawtooth { start: 0.0, end: 3.0 },
        PresetParams::Triangle { min: 0.0, max: 3.0 },
        PresetParams::Square { low: 0.0, high: 3.0 },
    ];
    for p in params {
        let set = generate(&p, 100).unwrap();
        assert_eq!(set.len(), 100, "{}", p.kind());
        assert_eq!(set.get(0).unwrap().position, 0.0);
        assert_eq!(set.get(99).unwrap().position, 100.0);
        assert!(set.iter().all(|pt| (0.0..=3.0).contains(&pt.voltage)));
    }
}

#[test]
fn test_sine_starts_and_ends_at_midpoint() {
    let v = voltages(
        &PresetParams::Sine {
            midpoint: 1.5,
            max_amplitude: 3.0,
        },
        101,
    );
    assert!((v[0] - 1.5).abs() < 1e-12);
    assert!((v[25] - 3.0).abs() < 1e-12);
    assert!((v[75] - 0.0).abs() < 1e-12);
    assert!((v[100] - 1.5).abs() < 1e-9);
}

#[test]
fn test_sine_is_clamped_to_output_range() {
    // The trough would sit at -2.0 V.
    let v = voltages(
        &PresetParams::Sine {
            midpoint: 0.5,
            max_amplitude: 3.0,
        },
        101,
    );
    assert_eq!(v[75], 0.0);
    assert!(v.iter().all(|x| *x >= 0.0));
}

#[test]
fn test_sawtooth_ramps_linearly() {
    let v = voltages(&PresetParams::Sawtooth { start: 3.0, end: 1.0 }, 5);
    let expected = [3.0, 2.5, 2.0, 1.5, 1.0];
    for (got, want) in v.iter().zip(expected) {
        assert!((got - want).abs() < 1e-12);
    }
}

#[test]
fn test_triangle_peaks_in_the_middle() {
    let v = voltages(&PresetParams::Triangle { min: 0.5, max: 2.5 }, 5);
    let expected = [0.5, 1.5, 2.5, 1.5, 0.5];
    for (got, want) in v.iter().zip(expected) {
        assert!((got - want).abs() < 1e-12);
    }
}

#[test]
fn test_square_alternates_every_ten_percent() {
    let v = voltages(&PresetParams::Square { low: 0.5, high: 2.0 }, 11);
    assert_eq!(
        v,
        vec![0.5, 2.0, 0.5, 2.0, 0.5, 2.0, 0.5, 2.0, 0.5, 2.0, 0.5]
    );
}

#[test]
fn test_generate_rejects_bad_input() {
    let params = PresetParams::Square { low: 0.0, high: 3.0 };
    assert!(generate(&params, 1).unwrap_err().is_validation());

    let params = PresetParams::Triangle { min: -1.0, max: 3.0 };
    assert!(generate(&params, 10).unwrap_err().is_validation());
}

#[test]
fn test_collect_asks_both_questions_in_order() {
    let mut prompt = ScriptedPrompt::new([Some(0.5), Some(2.5)]);
    let params = collect_preset_params(PresetKind::Sawtooth, &mut prompt).unwrap();
    assert_eq!(params, PresetParams::Sawtooth { start: 0.5, end: 2.5 });
}

#[test]
fn test_collect_aborts_on_any_cancel() {
    for kind in PresetKind::ALL {
        let mut first = ScriptedPrompt::new([None, Some(1.0)]);
        assert_eq!(collect_preset_params(kind, &mut first), None);

        let mut second = ScriptedPrompt::new([Some(1.0), None]);
        assert_eq!(collect_preset_params(kind, &mut second), None);
    }
}

#[test]
fn test_collect_treats_out_of_range_answer_as_cancel() {
    let mut prompt = ScriptedPrompt::new([Some(1.0), Some(4.2)]);
    assert_eq!(collect_preset_params(PresetKind::Square, &mut prompt), None);
}

#[test]
fn test_question_labels() {
    let [low, high] = PresetKind::Square.questions();
    assert_eq!(low.title, "Square Wave");
    assert_eq!(low.label, "Enter Low Amplitude (0-3):");
    assert_eq!(high.label, "Enter High Amplitude (0-3):");
    assert_eq!((low.min, low.max), (0.0, 3.0));
}
