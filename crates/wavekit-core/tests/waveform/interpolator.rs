use wavekit_core::interpolator::{evaluate, smooth_around_point, value_at};
use wavekit_core::{ControlPoint, PointSet};

fn set_of(pairs: &[(f64, f64)]) -> PointSet {
    PointSet::from_points(pairs.iter().map(|&p| ControlPoint::from(p)).collect()).unwrap()
}

#[test]
fn test_scenario_upsert_then_evaluate() {
    let mut set = PointSet::new();
    set.upsert(50.0, 2.0).unwrap();
    assert_eq!(set.as_pairs(), vec![(0.0, 1.5), (50.0, 2.0), (100.0, 1.5)]);

    let curve = evaluate(&set, 3).unwrap();
    let pairs: Vec<(f64, f64)> = curve
        .samples()
        .iter()
        .map(|s| (s.position, s.voltage))
        .collect();
    assert_eq!(pairs, vec![(0.0, 1.5), (50.0, 2.0), (100.0, 1.5)]);
}

#[test]
fn test_evaluate_is_exact_on_control_points() {
    let set = set_of(&[
        (0.0, 0.123),
        (25.0, 2.917),
        (50.0, 0.333),
        (75.0, 1.777),
        (100.0, 2.999),
    ]);
    let curve = evaluate(&set, 5).unwrap();
    let voltages: Vec<f64> = curve.voltages().collect();
    assert_eq!(voltages, vec![0.123, 2.917, 0.333, 1.777, 2.999]);

    for point in set.iter() {
        assert_eq!(value_at(&set, point.position), point.voltage);
    }
}

#[test]
fn test_evaluate_interpolates_linearly() {
    let set = set_of(&[(0.0, 0.0), (100.0, 3.0)]);
    let curve = evaluate(&set, 11).unwrap();
    assert_eq!(curve.len(), 11);
    for (i, sample) in curve.samples().iter().enumerate() {
        assert!((sample.position - i as f64 * 10.0).abs() < 1e-9);
        assert!((sample.voltage - i as f64 * 0.3).abs() < 1e-9);
    }
}

#[test]
fn test_evaluate_rejects_resolution_below_two() {
    let set = PointSet::new();
    assert!(evaluate(&set, 1).unwrap_err().is_validation());
    assert!(evaluate(&set, 0).unwrap_err().is_validation());
    assert_eq!(evaluate(&set, 2).unwrap().len(), 2);
}

#[test]
fn test_smooth_refuses_boundary_points() {
    let mut set = set_of(&[(0.0, 1.0), (50.0, 3.0), (100.0, 1.0)]);
    let before = set.clone();

    assert_eq!(smooth_around_point(&mut set, 0, 5), None);
    assert_eq!(smooth_around_point(&mut set, 2, 5), None);
    assert_eq!(smooth_around_point(&mut set, 7, 5), None);
    assert_eq!(set, before);
}

#[test]
fn test_smooth_replaces_neighbourhood_with_quadratic_samples() {
    let mut set = set_of(&[(0.0, 0.0), (50.0, 3.0), (100.0, 0.0)]);
    let range = smooth_around_point(&mut set, 1, 5).unwrap();
    assert_eq!(range, 0..=4);

    let expected = [(0.0, 0.0), (25.0, 2.25), (50.0, 3.0), (75.0, 2.25), (100.0, 0.0)];
    assert_eq!(set.len(), expected.len());
    for (point, (x, y)) in set.iter().zip(expected) {
        assert!((point.position - x).abs() < 1e-9);
        assert!((point.voltage - y).abs() < 1e-9);
    }
}

#[test]
fn test_smooth_leaves_outer_points_untouched() {
    let mut set = set_of(&[
        (0.0, 1.0),
        (20.0, 1.2),
        (40.0, 2.5),
        (60.0, 1.1),
        (100.0, 1.0),
    ]);
    let range = smooth_around_point(&mut set, 2, 5).unwrap();
    assert_eq!(range, 1..=5);
    assert_eq!(set.len(), 7);
    assert_eq!(set.get(0), Some(&ControlPoint::new(0.0, 1.0)));
    assert_eq!(set.get(6), Some(&ControlPoint::new(100.0, 1.0)));

    let first = set.get(1).unwrap();
    let last = set.get(5).unwrap();
    assert!((first.position - 20.0).abs() < 1e-9 && (first.voltage - 1.2).abs() < 1e-9);
    assert!((last.position - 60.0).abs() < 1e-9 && (last.voltage - 1.1).abs() < 1e-9);
}

#[test]
fn test_smooth_clamps_negative_voltages() {
    let mut set = set_of(&[(0.0, 3.0), (10.0, 0.0), (100.0, 3.0)]);
    smooth_around_point(&mut set, 1, 5).unwrap();
    assert!(set.iter().all(|p| p.voltage >= 0.0));
    assert_eq!(set.get(2).map(|p| p.voltage), Some(0.0));
}

#[test]
fn test_smooth_sample_count_is_clamped() {
    let mut set = set_of(&[(0.0, 0.0), (50.0, 3.0), (100.0, 0.0)]);
    let range = smooth_around_point(&mut set, 1, 3).unwrap();
    assert_eq!(range, 0..=2);
    assert_eq!(set.len(), 3);

    let mut set = set_of(&[(0.0, 0.0), (50.0, 3.0), (100.0, 0.0)]);
    smooth_around_point(&mut set, 1, 40).unwrap();
    assert_eq!(set.len(), 5);
}
