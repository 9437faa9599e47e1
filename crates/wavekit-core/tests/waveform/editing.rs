use wavekit_core::{EditingRules, GridSettings, PointSet, UpsertPolicy};

fn snapping_rules() -> EditingRules {
    EditingRules {
        grid: GridSettings {
            snap: true,
            ..GridSettings::default()
        },
        ..EditingRules::default()
    }
}

#[test]
fn test_primary_gesture_without_snapping_keeps_raw_coordinates() {
    let rules = EditingRules::default();
    let mut set = PointSet::new();
    let index = rules.primary_gesture(&mut set, 23.4, 1.37).unwrap();
    assert_eq!(index, 1);
    assert_eq!(set.as_pairs()[1], (23.4, 1.37));
}

#[test]
fn test_primary_gesture_snaps_to_grid() {
    let rules = snapping_rules();
    let mut set = PointSet::new();
    rules.primary_gesture(&mut set, 23.4, 1.37).unwrap();
    assert_eq!(set.as_pairs()[1], (20.0, 1.5));
}

#[test]
fn test_primary_gesture_snaps_only_enabled_axes() {
    let mut rules = snapping_rules();
    rules.grid.y_enabled = false;
    let mut set = PointSet::new();
    rules.primary_gesture(&mut set, 47.0, 1.37).unwrap();
    assert_eq!(set.as_pairs()[1], (50.0, 1.37));
}

#[test]
fn test_primary_gesture_near_ends_updates_boundaries() {
    let rules = EditingRules::default();
    let mut set = PointSet::new();
    assert_eq!(rules.primary_gesture(&mut set, 0.8, 2.0).unwrap(), 0);
    assert_eq!(rules.primary_gesture(&mut set, 99.3, 0.5).unwrap(), 1);
    assert_eq!(set.as_pairs(), vec![(0.0, 2.0), (100.0, 0.5)]);
}

#[test]
fn test_primary_gesture_clamps_voltage() {
    let rules = EditingRules::default();
    let mut set = PointSet::new();
    rules.primary_gesture(&mut set, 40.0, 3.6).unwrap();
    rules.primary_gesture(&mut set, 60.0, -0.4).unwrap();
    assert_eq!(set.as_pairs()[1], (40.0, 3.0));
    assert_eq!(set.as_pairs()[2], (60.0, 0.0));
}

#[test]
fn test_secondary_gesture_uses_erase_tolerance() {
    let rules = EditingRules::default();
    let mut set = PointSet::new();
    rules.primary_gesture(&mut set, 40.0, 1.0).unwrap();
    assert_eq!(rules.secondary_gesture(&mut set, 43.0, 1.0), 0);
    assert_eq!(rules.secondary_gesture(&mut set, 41.5, 1.5), 1);
    assert_eq!(set.len(), 2);
}

#[test]
fn test_edit_voltage_requires_grid_value() {
    let rules = EditingRules::default();
    let mut set = PointSet::new();
    set.upsert(50.0, 1.0).unwrap();

    rules.edit_voltage(&mut set, 1, 2.5).unwrap();
    assert_eq!(set.get(1).unwrap().voltage, 2.5);

    let before = set.clone();
    assert!(rules.edit_voltage(&mut set, 1, 2.3).unwrap_err().is_validation());
    assert!(rules.edit_voltage(&mut set, 1, 3.5).unwrap_err().is_validation());
    assert!(rules.edit_voltage(&mut set, 1, -0.5).unwrap_err().is_validation());
    assert_eq!(set, before);
}

#[test]
fn test_edit_voltage_with_fine_grid() {
    let mut rules = EditingRules::default();
    rules.grid.y_interval = 0.1;
    let mut set = PointSet::new();
    rules.edit_voltage(&mut set, 0, 0.3).unwrap();
    assert_eq!(set.get(0).unwrap().voltage, 0.3);
    assert!(rules.edit_voltage(&mut set, 0, 0.35).is_err());
}

#[test]
fn test_edit_voltage_without_grid_only_checks_range() {
    let mut rules = EditingRules::default();
    rules.grid.y_enabled = false;
    let mut set = PointSet::new();
    rules.edit_voltage(&mut set, 1, 2.345).unwrap();
    assert_eq!(set.get(1).unwrap().voltage, 2.345);
    assert!(rules.edit_voltage(&mut set, 1, 3.01).is_err());
}

#[test]
fn test_edit_voltage_mirrors_linked_boundaries() {
    let rules = EditingRules {
        upsert: UpsertPolicy {
            link_boundaries: true,
            ..UpsertPolicy::default()
        },
        ..EditingRules::default()
    };
    let mut set = PointSet::new();
    set.upsert(50.0, 2.0).unwrap();

    rules.edit_voltage(&mut set, 2, 0.5).unwrap();
    assert_eq!(set.as_pairs(), vec![(0.0, 0.5), (50.0, 2.0), (100.0, 0.5)]);

    rules.edit_voltage(&mut set, 0, 3.0).unwrap();
    assert_eq!(set.get(2).unwrap().voltage, 3.0);

    // Interior rows are never mirrored.
    rules.edit_voltage(&mut set, 1, 1.0).unwrap();
    assert_eq!(set.as_pairs(), vec![(0.0, 3.0), (50.0, 1.0), (100.0, 3.0)]);
}

#[test]
fn test_resolution_request_defaults_to_a_valid_count() {
    let rules = EditingRules::default();
    let request = rules.resolution_request(2);
    assert_eq!(request.title, "Change Resolution");
    assert_eq!((request.min, request.max, request.default), (10, 100, 10));
    assert_eq!(rules.resolution_request(37).default, 36);
    assert_eq!(rules.resolution_request(500).default, 100);
}

#[test]
fn test_edit_position_refuses_boundaries() {
    let rules = EditingRules::default();
    let mut set = PointSet::new();
    assert!(rules
        .edit_position(&mut set, 0, 5.0)
        .unwrap_err()
        .is_invariant_violation());
    assert!(rules
        .edit_position(&mut set, 1, 95.0)
        .unwrap_err()
        .is_invariant_violation());
}

#[test]
fn test_validate_resolution() {
    let rules = EditingRules::default();
    assert_eq!(rules.validate_resolution(10).unwrap(), 10);
    assert_eq!(rules.validate_resolution(64).unwrap(), 64);
    assert_eq!(rules.validate_resolution(100).unwrap(), 100);
    assert!(rules.validate_resolution(8).is_err());
    assert!(rules.validate_resolution(33).is_err());
    assert!(rules.validate_resolution(102).is_err());
}
