//! Property-based tests for dimensional algebra and the registry.
//!
//! Uses proptest to verify the algebraic identities and registry invariants
//! hold for arbitrary dimensions, factors and values.

use std::collections::HashSet;

use proptest::prelude::*;
use unitas_units::{
    codes, DimensionVector, Measure, UnitDef, UnitRegistry, UnitSystem,
};

fn dimension() -> impl Strategy<Value = DimensionVector> {
    prop::array::uniform9(-6i8..=6).prop_map(DimensionVector::new)
}

fn relative_close(a: f64, b: f64, tolerance: f64) -> bool {
    (a - b).abs() <= tolerance * a.abs().max(b.abs()).max(1e-300)
}

// =============================================================================
// Dimension Vector Properties
// =============================================================================

proptest! {
    /// (a + b) - b = a
    #[test]
    fn prop_plus_minus_inverse(a in dimension(), b in dimension()) {
        prop_assert_eq!(a.plus(&b).minus(&b), a);
    }

    /// a + b = b + a
    #[test]
    fn prop_plus_commutative(a in dimension(), b in dimension()) {
        prop_assert_eq!(a.plus(&b), b.plus(&a));
    }

    /// -(-a) = a and a - a is dimensionless
    #[test]
    fn prop_negate_involution(a in dimension()) {
        prop_assert_eq!(a.negate().negate(), a);
        prop_assert!(a.minus(&a).is_dimensionless());
        prop_assert_eq!(DimensionVector::DIMENSIONLESS.minus(&a), a.negate());
    }

    /// The canonical rendering parses back to the same vector
    #[test]
    fn prop_canonical_string_round_trip(a in dimension()) {
        let rendered = a.to_string();
        let parsed: DimensionVector = rendered.parse().unwrap();
        prop_assert_eq!(parsed, a, "rendered as {}", rendered);
    }
}

// =============================================================================
// Derivation Properties
// =============================================================================

proptest! {
    /// from_standard(to_standard(v)) = v for derived linear units
    #[test]
    fn prop_linear_round_trip(factor in 1e-6f64..1e6, value in -1e6f64..1e6) {
        let registry = UnitRegistry::with_builtin();
        let meter = registry.unit("Length", "m").unwrap();
        let derived = meter.derive_linear(factor, "x", "x", UnitSystem::Other).unwrap();
        let back = derived.from_standard(derived.to_standard(value));
        prop_assert!(relative_close(back, value, 1e-9), "{} -> {}", value, back);
    }

    /// Round trip through an offset-linear unit derived from an absolute unit
    #[test]
    fn prop_offset_round_trip(
        factor in 1e-3f64..1e3,
        offset in -1e3f64..1e3,
        value in -1e4f64..1e4,
    ) {
        let registry = UnitRegistry::with_builtin();
        let kelvin = registry.unit("AbsoluteTemperature", "K").unwrap();
        let relative = registry
            .unit("Temperature", "K")
            .unwrap()
            .derive_linear(factor, "x", "x", UnitSystem::Other)
            .unwrap();
        let derived = kelvin
            .derive_linear_offset(factor, offset, &relative, "x", "x", UnitSystem::Other)
            .unwrap();
        let back = derived.from_standard(derived.to_standard(value));
        prop_assert!((back - value).abs() <= 1e-9 * value.abs().max(offset.abs() / factor).max(1.0));
    }

    /// Deriving twice multiplies the factors
    #[test]
    fn prop_derivation_composes(f1 in 1e-3f64..1e3, f2 in 1e-3f64..1e3) {
        let registry = UnitRegistry::with_builtin();
        let meter = registry.unit("Length", "m").unwrap();
        let once = meter.derive_linear(f1, "a", "a", UnitSystem::Other).unwrap();
        let twice = once.derive_linear(f2, "b", "b", UnitSystem::Other).unwrap();
        prop_assert!(relative_close(twice.to_standard(1.0), f1 * f2, 1e-12));
    }

    /// Non-positive factors are always rejected
    #[test]
    fn prop_non_positive_factor_rejected(factor in -1e6f64..=0.0) {
        let registry = UnitRegistry::with_builtin();
        let meter = registry.unit("Length", "m").unwrap();
        let err = meter.derive_linear(factor, "x", "x", UnitSystem::Other).unwrap_err();
        prop_assert_eq!(err.code(), codes::INVALID_FACTOR);
    }
}

// =============================================================================
// Algebra Properties
// =============================================================================

const RELATIVE_QUANTITIES: [(&str, &str); 8] = [
    ("Length", "ft"),
    ("Duration", "h"),
    ("Mass", "lb"),
    ("Force", "kN"),
    ("Pressure", "bar"),
    ("Speed", "km/h"),
    ("Illuminance", "lx"),
    ("Energy", "kWh"),
];

proptest! {
    /// reciprocal(reciprocal(x)) = x
    #[test]
    fn prop_reciprocal_involution(index in 0usize..RELATIVE_QUANTITIES.len(), value in 1e-3f64..1e3) {
        let registry = UnitRegistry::with_builtin();
        let resolver = registry.resolver();
        let (quantity, token) = RELATIVE_QUANTITIES[index];
        let x = Measure::of(&registry, value, quantity, token).unwrap();

        let inverse = resolver.reciprocal(&x).unwrap();
        prop_assert_eq!(inverse.dimension(), x.dimension().negate());
        let back = resolver.reciprocal(&inverse).unwrap();
        prop_assert_eq!(back.dimension(), x.dimension());
        prop_assert_eq!(back.quantity_name(), Some(quantity));
        prop_assert!(relative_close(back.si(), x.si(), 1e-12));
    }

    /// (a * b) / b = a, in canonical units
    #[test]
    fn prop_multiply_divide_inverse(
        i in 0usize..RELATIVE_QUANTITIES.len(),
        j in 0usize..RELATIVE_QUANTITIES.len(),
        a in 1e-3f64..1e3,
        b in 1e-3f64..1e3,
    ) {
        let registry = UnitRegistry::with_builtin();
        let resolver = registry.resolver();
        let lhs = Measure::of(&registry, a, RELATIVE_QUANTITIES[i].0, RELATIVE_QUANTITIES[i].1).unwrap();
        let rhs = Measure::of(&registry, b, RELATIVE_QUANTITIES[j].0, RELATIVE_QUANTITIES[j].1).unwrap();

        let product = resolver.multiply(&lhs, &rhs).unwrap();
        prop_assert_eq!(product.dimension(), lhs.dimension().plus(&rhs.dimension()));
        let back = resolver.divide(&product, &rhs).unwrap();
        prop_assert_eq!(back.quantity_name(), Some(RELATIVE_QUANTITIES[i].0));
        prop_assert!(relative_close(back.si(), lhs.si(), 1e-12));
    }
}

// =============================================================================
// Registry Properties
// =============================================================================

proptest! {
    /// Every dimension is claimed by at most one quantity
    #[test]
    fn prop_registry_injective(dimensions in prop::collection::vec(dimension(), 1..20)) {
        let registry = UnitRegistry::new();
        let mut accepted = HashSet::new();
        for (i, dimension) in dimensions.iter().enumerate() {
            let name = format!("Q{}", i);
            let result = registry.register_quantity(
                &name,
                *dimension,
                UnitDef::new(&format!("u{}", i), "unit", UnitSystem::Other),
            );
            match result {
                Ok(_) => prop_assert!(accepted.insert(*dimension)),
                Err(err) => {
                    prop_assert_eq!(err.code(), codes::DUPLICATE_QUANTITY);
                    prop_assert!(accepted.contains(dimension));
                    prop_assert!(registry.lookup_by_name(&name).is_none());
                }
            }
        }
        prop_assert_eq!(registry.quantities().len(), accepted.len());
        for dimension in &accepted {
            let quantity = registry.lookup_by_dimension(*dimension).unwrap();
            prop_assert_eq!(quantity.dimension(), *dimension);
        }
    }

    /// No two units of a quantity share an abbreviation
    #[test]
    fn prop_abbreviations_unique(
        defs in prop::collection::vec((0usize..6, prop::collection::vec(0usize..8, 0..3)), 1..12)
    ) {
        let registry = UnitRegistry::with_builtin();
        let pool = ["zz", "yy", "xx", "ww", "vv", "uu", "tt", "ss"];
        for (key, abbreviations) in defs {
            let abbreviations: Vec<&str> = abbreviations.iter().map(|i| pool[*i]).collect();
            let def = UnitDef::new(&format!("k{}", key), "test unit", UnitSystem::Other)
                .abbreviations(&abbreviations)
                .factor(1.0 + key as f64);
            if let Err(err) = registry.define_unit("Length", def) {
                prop_assert_eq!(err.code(), codes::DUPLICATE_ABBREVIATION);
            }
        }

        let units = registry.units_of("Length").unwrap();
        let mut seen = HashSet::new();
        for unit in units.values() {
            for abbreviation in unit.abbreviations() {
                prop_assert!(seen.insert(abbreviation.clone()), "duplicate {}", abbreviation);
            }
        }
    }
}

#[test]
fn test_builtin_abbreviations_unique() {
    let registry = UnitRegistry::with_builtin();
    for quantity in registry.quantities() {
        let mut seen = HashSet::new();
        for unit in quantity.units().values() {
            for abbreviation in unit.abbreviations() {
                assert!(
                    seen.insert(abbreviation.clone()),
                    "{} has duplicate abbreviation {}",
                    quantity.name(),
                    abbreviation
                );
            }
        }
    }
}

#[test]
fn test_builtin_dimensions_round_trip() {
    let registry = UnitRegistry::with_builtin();
    for quantity in registry.quantities() {
        let rendered = quantity.dimension().to_string();
        assert_eq!(rendered.parse::<DimensionVector>().unwrap(), quantity.dimension());
    }
}
