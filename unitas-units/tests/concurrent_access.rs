//! Concurrent readers and writers on one registry

use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;

use unitas_units::{Measure, UnitDef, UnitRegistry, UnitSystem};

#[test]
fn test_readers_see_consistent_snapshots() {
    let registry = UnitRegistry::with_builtin();
    let done = AtomicBool::new(false);

    thread::scope(|scope| {
        scope.spawn(|| {
            for round in 0..200 {
                let key = format!("tmp{}", round % 5);
                registry
                    .define_unit(
                        "Length",
                        UnitDef::new(&key, "temporary", UnitSystem::Other).factor(1.0 + round as f64),
                    )
                    .unwrap();
                if round % 2 == 0 {
                    registry.unregister_unit("Length", &key).unwrap();
                }
            }
            done.store(true, Ordering::SeqCst);
        });

        for _ in 0..4 {
            scope.spawn(|| {
                while !done.load(Ordering::SeqCst) {
                    let units = registry.units_of("Length").unwrap();
                    for (key, unit) in units.iter() {
                        assert_eq!(key, unit.key());
                        assert!(unit.to_standard(1.0) > 0.0);
                    }
                    let km = Measure::of(&registry, 1.0, "Length", "km").unwrap();
                    assert_eq!(km.si(), 1000.0);
                }
            });
        }
    });

    let remaining = registry.units_of("Length").unwrap();
    assert!(remaining.keys().filter(|k| k.starts_with("tmp")).count() <= 5);
}

#[test]
fn test_snapshot_survives_reset() {
    let registry = UnitRegistry::with_builtin();
    registry
        .define_unit(
            "Length",
            UnitDef::new("fur", "furlong", UnitSystem::Imperial).factor(201.168),
        )
        .unwrap();
    let before = registry.snapshot();
    let furlong = registry.unit("Length", "fur").unwrap();

    registry.reset();

    assert!(registry.unit("Length", "fur").is_err());
    assert!(registry.unit("Length", "km").is_ok());
    assert!(before
        .quantity("Length")
        .unwrap()
        .units
        .iter()
        .any(|u| u.key == "fur"));
    assert_eq!(furlong.to_standard(1.0), 201.168);
}

#[test]
fn test_global_registry_shared_across_threads() {
    let handles: Vec<_> = (0..4)
        .map(|i| {
            thread::spawn(move || {
                let registry = UnitRegistry::global();
                let value = Measure::of(registry, i as f64, "Mass", "g").unwrap();
                value.si()
            })
        })
        .collect();
    let total: f64 = handles.into_iter().map(|h| h.join().unwrap()).sum();
    assert!((total - 0.006).abs() < 1e-15);
}
