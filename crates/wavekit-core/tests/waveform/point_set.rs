use wavekit_core::point_set::UpsertPolicy;
use wavekit_core::{ControlPoint, PointSet};

fn assert_well_formed(set: &PointSet) {
    let points = set.points();
    assert!(points.len() >= 2);
    assert_eq!(points[0].position, 0.0);
    assert_eq!(points[points.len() - 1].position, 100.0);
    assert!(points.windows(2).all(|w| w[0].position < w[1].position));
}

#[test]
fn test_new_has_default_boundaries() {
    let set = PointSet::new();
    assert_eq!(set.as_pairs(), vec![(0.0, 1.5), (100.0, 1.5)]);
}

#[test]
fn test_upsert_inserts_in_order() {
    let mut set = PointSet::new();
    assert_eq!(set.upsert(50.0, 2.0).unwrap(), 1);
    assert_eq!(set.as_pairs(), vec![(0.0, 1.5), (50.0, 2.0), (100.0, 1.5)]);

    assert_eq!(set.upsert(25.0, 0.5).unwrap(), 1);
    assert_eq!(set.upsert(75.0, 2.5).unwrap(), 3);
    assert_eq!(set.len(), 5);
    assert_well_formed(&set);
}

#[test]
fn test_upsert_replaces_existing_voltage() {
    let mut set = PointSet::new();
    set.upsert(50.0, 2.0).unwrap();
    set.upsert(50.0, 0.7).unwrap();
    assert_eq!(set.len(), 3);
    assert_eq!(set.get(1), Some(&ControlPoint::new(50.0, 0.7)));
}

#[test]
fn test_upsert_snaps_near_ends_onto_boundaries() {
    let mut set = PointSet::new();
    assert_eq!(set.upsert(0.6, 2.2).unwrap(), 0);
    assert_eq!(set.upsert(99.4, 0.4).unwrap(), 1);
    assert_eq!(set.as_pairs(), vec![(0.0, 2.2), (100.0, 0.4)]);

    // Out-of-range positions are clamped onto the boundary as well.
    set.upsert(-12.0, 1.0).unwrap();
    set.upsert(140.0, 1.0).unwrap();
    assert_eq!(set.len(), 2);
}

#[test]
fn test_upsert_just_inside_tolerance_is_interior() {
    let mut set = PointSet::new();
    set.upsert(1.0, 2.0).unwrap();
    set.upsert(99.0, 2.0).unwrap();
    assert_eq!(set.len(), 4);
}

#[test]
fn test_upsert_with_linked_boundaries() {
    let mut set = PointSet::new();
    let policy = UpsertPolicy {
        link_boundaries: true,
        ..UpsertPolicy::default()
    };
    set.upsert_with(0.2, 2.5, &policy).unwrap();
    assert_eq!(set.as_pairs(), vec![(0.0, 2.5), (100.0, 2.5)]);

    set.upsert_with(100.0, 0.5, &policy).unwrap();
    assert_eq!(set.as_pairs(), vec![(0.0, 0.5), (100.0, 0.5)]);

    // Interior points are not mirrored.
    set.upsert_with(50.0, 3.0, &policy).unwrap();
    assert_eq!(set.as_pairs(), vec![(0.0, 0.5), (50.0, 3.0), (100.0, 0.5)]);
}

#[test]
fn test_upsert_rejects_non_finite() {
    let mut set = PointSet::new();
    assert!(set.upsert(f64::NAN, 1.0).unwrap_err().is_validation());
    assert!(set.upsert(10.0, f64::INFINITY).unwrap_err().is_validation());
    assert_eq!(set, PointSet::new());
}

#[test]
fn test_remove_near_erases_all_hits() {
    let mut set = PointSet::new();
    set.upsert(50.0, 2.0).unwrap();
    set.upsert(51.0, 2.5).unwrap();
    set.upsert(80.0, 2.0).unwrap();

    assert_eq!(set.remove_near(50.5, 2.2, 2.0), 2);
    assert_eq!(set.as_pairs(), vec![(0.0, 1.5), (80.0, 2.0), (100.0, 1.5)]);
}

#[test]
fn test_remove_near_needs_both_axes_within_tolerance() {
    let mut set = PointSet::new();
    set.upsert(50.0, 0.5).unwrap();
    assert_eq!(set.remove_near(50.0, 2.9, 2.0), 0);
    assert_eq!(set.len(), 3);
}

#[test]
fn test_remove_near_regenerates_boundaries() {
    let mut set = PointSet::new();
    set.upsert(0.0, 2.8).unwrap();
    set.upsert(100.0, 0.2).unwrap();

    assert_eq!(set.remove_near(1.0, 2.5, 2.0), 1);
    assert_eq!(set.get(0), Some(&ControlPoint::new(0.0, 1.5)));

    assert_eq!(set.remove_near(99.0, 0.0, 2.0), 1);
    assert_eq!(set.as_pairs(), vec![(0.0, 1.5), (100.0, 1.5)]);
}

#[test]
fn test_remove_by_position_refuses_boundaries() {
    let mut set = PointSet::new();
    set.upsert(30.0, 1.0).unwrap();
    let before = set.clone();

    assert!(set
        .remove_by_position(0.0)
        .unwrap_err()
        .is_invariant_violation());
    assert!(set
        .remove_by_position(100.0)
        .unwrap_err()
        .is_invariant_violation());
    assert_eq!(set, before);
}

#[test]
fn test_remove_by_position_interior() {
    let mut set = PointSet::new();
    set.upsert(30.0, 1.0).unwrap();
    assert_eq!(set.remove_by_position(30.0).unwrap(), 1);
    assert_eq!(set.remove_by_position(30.0).unwrap(), 0);
    assert_eq!(set.len(), 2);
}

#[test]
fn test_replace_all_is_all_or_nothing() {
    let mut set = PointSet::new();
    set.upsert(40.0, 2.0).unwrap();
    let before = set.clone();

    let missing_end = vec![ControlPoint::new(0.0, 1.0), ControlPoint::new(60.0, 1.0)];
    assert!(set.replace_all(missing_end).is_err());
    assert_eq!(set, before);

    let duplicate = vec![
        ControlPoint::new(0.0, 1.0),
        ControlPoint::new(50.0, 1.0),
        ControlPoint::new(50.0, 2.0),
        ControlPoint::new(100.0, 1.0),
    ];
    assert!(set.replace_all(duplicate).is_err());
    assert_eq!(set, before);

    let valid = vec![
        ControlPoint::new(0.0, 0.0),
        ControlPoint::new(50.0, 3.0),
        ControlPoint::new(100.0, 0.0),
    ];
    set.replace_all(valid).unwrap();
    assert_eq!(set.as_pairs(), vec![(0.0, 0.0), (50.0, 3.0), (100.0, 0.0)]);
}

#[test]
fn test_clear_resets_to_defaults() {
    let mut set = PointSet::new();
    set.upsert(10.0, 0.1).unwrap();
    set.upsert(0.0, 3.0).unwrap();
    set.clear();
    assert_eq!(set, PointSet::new());
}

#[test]
fn test_set_position_moves_and_reorders() {
    let mut set = PointSet::new();
    set.upsert(20.0, 1.0).unwrap();
    set.upsert(60.0, 2.0).unwrap();

    assert_eq!(set.set_position(1, 80.0).unwrap(), 2);
    assert_eq!(
        set.as_pairs(),
        vec![(0.0, 1.5), (60.0, 2.0), (80.0, 1.0), (100.0, 1.5)]
    );

    assert!(set.set_position(0, 10.0).unwrap_err().is_invariant_violation());
    assert!(set.set_position(1, 80.0).unwrap_err().is_validation());
    assert!(set.set_position(1, 100.0).unwrap_err().is_validation());
}
