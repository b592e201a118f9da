//! Values with units

use std::cmp::Ordering;
use std::fmt;

use unitas_core::{DimensionVector, UnitError};

use crate::{Scalar, Unit, UnitRegistry};

/// A value in a unit.
///
/// Equality and ordering compare canonical values, so `1 km == 1000 m`.
/// Values of incompatible units are neither equal nor ordered.
#[derive(Debug, Clone)]
pub struct Measure {
    value: f64,
    unit: Unit,
}

impl Measure {
    pub fn new(value: f64, unit: Unit) -> Self {
        Measure { value, unit }
    }

    /// Value in `quantity`, with the unit resolved from an abbreviation
    pub fn of(
        registry: &UnitRegistry,
        value: f64,
        quantity: &str,
        token: &str,
    ) -> Result<Self, UnitError> {
        Ok(Measure::new(value, registry.resolve_abbreviation(quantity, token)?))
    }

    pub fn value(&self) -> f64 {
        self.value
    }

    pub fn unit(&self) -> &Unit {
        &self.unit
    }

    pub fn quantity_name(&self) -> &str {
        self.unit.quantity_name()
    }

    pub fn dimension(&self) -> DimensionVector {
        self.unit.dimension()
    }

    pub fn is_absolute(&self) -> bool {
        self.unit.is_absolute()
    }

    /// Value in the quantity's standard unit
    pub fn si(&self) -> f64 {
        self.unit.to_standard(self.value)
    }

    /// Convert to another unit
    pub fn in_unit(&self, target: &Unit) -> Result<Measure, UnitError> {
        Ok(Measure::new(self.unit.convert(self.value, target)?, target.clone()))
    }

    /// Sum of two relative values, in this value's unit
    pub fn plus(&self, other: &Measure) -> Result<Measure, UnitError> {
        self.require_relative("add", other)?;
        let rhs = other.unit.convert(other.value, &self.unit)?;
        Ok(self.with_value(self.value + rhs))
    }

    /// Difference of two relative values, in this value's unit
    pub fn minus(&self, other: &Measure) -> Result<Measure, UnitError> {
        self.require_relative("subtract", other)?;
        let rhs = other.unit.convert(other.value, &self.unit)?;
        Ok(self.with_value(self.value - rhs))
    }

    /// Absolute value shifted by a relative value: 20 °C + 5 K = 25 °C
    pub fn plus_relative(&self, difference: &Measure) -> Result<Measure, UnitError> {
        let step = self.relative_step(difference)?;
        Ok(self.with_value(self.value + step))
    }

    /// Absolute value shifted back by a relative value
    pub fn minus_relative(&self, difference: &Measure) -> Result<Measure, UnitError> {
        let step = self.relative_step(difference)?;
        Ok(self.with_value(self.value - step))
    }

    /// Difference of two absolute values as a relative value in this value's
    /// paired relative unit: 25 °C - 20 °C = 5 °C (difference)
    pub fn minus_absolute(&self, other: &Measure) -> Result<Measure, UnitError> {
        if !self.is_absolute() || !other.is_absolute() {
            return Err(UnitError::invalid_operand(format!(
                "{} - {}: both values must be absolute",
                self, other
            )));
        }
        if self.dimension() != other.dimension() {
            return Err(UnitError::mismatch(self.unit.describe(), other.unit.describe()));
        }
        let relative = self.paired_unit()?;
        let difference = self.si() - other.si();
        Ok(Measure::new(relative.from_standard(difference), relative.clone()))
    }

    /// Multiply a relative value by a plain number
    pub fn scale_by(&self, factor: f64) -> Result<Measure, UnitError> {
        if self.is_absolute() {
            return Err(UnitError::invalid_operand(format!(
                "absolute value {} cannot be scaled",
                self
            )));
        }
        Ok(self.with_value(self.value * factor))
    }

    pub fn min(&self, other: &Measure) -> Result<Measure, UnitError> {
        match self.compare(other)? {
            Ordering::Greater => Ok(other.clone()),
            _ => Ok(self.clone()),
        }
    }

    pub fn max(&self, other: &Measure) -> Result<Measure, UnitError> {
        match self.compare(other)? {
            Ordering::Less => Ok(other.clone()),
            _ => Ok(self.clone()),
        }
    }

    /// Linear interpolation between `zero` (ratio 0) and `one` (ratio 1),
    /// expressed in `zero`'s unit
    pub fn interpolate(zero: &Measure, one: &Measure, ratio: f64) -> Result<Measure, UnitError> {
        let end = one.unit.convert(one.value, &zero.unit)?;
        Ok(zero.with_value(zero.value + (end - zero.value) * ratio))
    }

    /// Ordering of two compatible values; `DimensionMismatch` otherwise
    pub fn compare(&self, other: &Measure) -> Result<Ordering, UnitError> {
        if !self.unit.is_compatible(&other.unit) {
            return Err(UnitError::mismatch(self.unit.describe(), other.unit.describe()));
        }
        self.si()
            .partial_cmp(&other.si())
            .ok_or_else(|| UnitError::invalid_operand("cannot compare NaN values"))
    }

    /// Product resolved against [`UnitRegistry::global`].
    ///
    /// A measure does not remember which registry built it, so a result
    /// dimension that only a local registry claims comes back raw. Use
    /// `registry.resolver().multiply(..)` to resolve against a local registry.
    pub fn times(&self, other: &Measure) -> Result<Scalar, UnitError> {
        UnitRegistry::global().resolver().multiply(self, other)
    }

    /// Quotient resolved against [`UnitRegistry::global`]; see [`times`](Self::times)
    pub fn divided_by(&self, other: &Measure) -> Result<Scalar, UnitError> {
        UnitRegistry::global().resolver().divide(self, other)
    }

    fn with_value(&self, value: f64) -> Measure {
        Measure::new(value, self.unit.clone())
    }

    fn require_relative(&self, action: &str, other: &Measure) -> Result<(), UnitError> {
        if self.is_absolute() || other.is_absolute() {
            return Err(UnitError::invalid_operand(format!(
                "cannot {} {} and {}: use the absolute/relative operations",
                action, self, other
            )));
        }
        Ok(())
    }

    fn paired_unit(&self) -> Result<&Unit, UnitError> {
        self.unit.relative_unit().ok_or_else(|| {
            UnitError::invalid_operand(format!("unit '{}' has no paired relative unit", self.unit.key()))
        })
    }

    /// `difference` expressed in this value's paired relative unit
    fn relative_step(&self, difference: &Measure) -> Result<f64, UnitError> {
        if !self.is_absolute() || difference.is_absolute() {
            return Err(UnitError::invalid_operand(format!(
                "{} and {}: expected an absolute and a relative value",
                self, difference
            )));
        }
        difference.unit.convert(difference.value, self.paired_unit()?)
    }
}

impl PartialEq for Measure {
    fn eq(&self, other: &Self) -> bool {
        self.unit.is_compatible(&other.unit) && self.si() == other.si()
    }
}

impl PartialOrd for Measure {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        self.compare(other).ok()
    }
}

impl fmt::Display for Measure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let abbreviation = self.unit.default_abbreviation();
        if abbreviation.is_empty() {
            write!(f, "{}", self.value)
        } else {
            write!(f, "{} {}", self.value, abbreviation)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use unitas_core::codes;

    fn registry() -> UnitRegistry {
        UnitRegistry::with_builtin()
    }

    fn measure(registry: &UnitRegistry, value: f64, quantity: &str, token: &str) -> Measure {
        Measure::of(registry, value, quantity, token).unwrap()
    }

    #[test]
    fn test_times_uses_global_registry() {
        let local = registry();
        local
            .register_quantity(
                "MassLength",
                DimensionVector::MASS.plus(&DimensionVector::LENGTH),
                crate::UnitDef::new("kgm", "kilogram meter", unitas_core::UnitSystem::SiDerived),
            )
            .unwrap();
        let mass = measure(&local, 2.0, "Mass", "kg");
        let length = measure(&local, 3.0, "Length", "m");

        let global = mass.times(&length).unwrap();
        assert!(global.is_raw());
        assert_eq!(global.si(), 6.0);

        let resolved = local.resolver().multiply(&mass, &length).unwrap();
        assert_eq!(resolved.quantity_name(), Some("MassLength"));
    }

    #[test]
    fn test_equality_across_units() {
        let r = registry();
        assert_eq!(measure(&r, 1.0, "Length", "km"), measure(&r, 1000.0, "Length", "m"));
        assert_ne!(measure(&r, 1.0, "Length", "m"), measure(&r, 1.0, "Duration", "s"));
        assert!(measure(&r, 1.0, "Length", "mi") > measure(&r, 1.0, "Length", "km"));
    }

    #[test]
    fn test_in_unit() {
        let r = registry();
        let ft = r.unit("Length", "ft").unwrap();
        let converted = measure(&r, 1.0, "Length", "m").in_unit(&ft).unwrap();
        assert_abs_diff_eq!(converted.value(), 3.280839895, epsilon = 1e-9);
        assert_eq!(converted.to_string(), format!("{} ft", converted.value()));
    }

    #[test]
    fn test_plus_minus() {
        let r = registry();
        let sum = measure(&r, 1.0, "Length", "km")
            .plus(&measure(&r, 500.0, "Length", "m"))
            .unwrap();
        assert_abs_diff_eq!(sum.value(), 1.5, epsilon = 1e-12);
        assert_eq!(sum.unit().key(), "km");

        let err = measure(&r, 1.0, "Length", "m")
            .plus(&measure(&r, 1.0, "Duration", "s"))
            .unwrap_err();
        assert_eq!(err.code(), codes::DIMENSION_MISMATCH);
    }

    #[test]
    fn test_absolute_arithmetic() {
        let r = registry();
        let twenty = measure(&r, 20.0, "AbsoluteTemperature", "degC");
        let five_k = measure(&r, 5.0, "Temperature", "K");

        let shifted = twenty.plus_relative(&five_k).unwrap();
        assert_abs_diff_eq!(shifted.value(), 25.0, epsilon = 1e-9);
        assert_eq!(shifted.unit().key(), "degC");

        let back = shifted.minus_relative(&five_k).unwrap();
        assert_abs_diff_eq!(back.value(), 20.0, epsilon = 1e-9);

        let difference = shifted.minus_absolute(&twenty).unwrap();
        assert_abs_diff_eq!(difference.value(), 5.0, epsilon = 1e-9);
        assert!(!difference.is_absolute());
        assert_eq!(difference.quantity_name(), "Temperature");

        let err = twenty.plus(&twenty).unwrap_err();
        assert_eq!(err.code(), codes::INVALID_OPERAND);
    }

    #[test]
    fn test_fahrenheit_difference() {
        let r = registry();
        let freezing = measure(&r, 32.0, "AbsoluteTemperature", "degF");
        let boiling = measure(&r, 100.0, "AbsoluteTemperature", "degC");
        let span = boiling.minus_absolute(&freezing).unwrap();
        assert_abs_diff_eq!(span.value(), 100.0, epsilon = 1e-9);
        let in_f = span.in_unit(&r.unit("Temperature", "degF").unwrap()).unwrap();
        assert_abs_diff_eq!(in_f.value(), 180.0, epsilon = 1e-9);
    }

    #[test]
    fn test_min_max_interpolate() {
        let r = registry();
        let a = measure(&r, 1.0, "Length", "km");
        let b = measure(&r, 900.0, "Length", "m");
        assert_eq!(a.min(&b).unwrap().unit().key(), "m");
        assert_eq!(a.max(&b).unwrap().unit().key(), "km");

        let mid = Measure::interpolate(&a, &measure(&r, 3000.0, "Length", "m"), 0.5).unwrap();
        assert_abs_diff_eq!(mid.value(), 2.0, epsilon = 1e-12);
    }

    #[test]
    fn test_scale_by() {
        let r = registry();
        let doubled = measure(&r, 3.0, "Force", "N").scale_by(2.0).unwrap();
        assert_eq!(doubled.value(), 6.0);
        assert!(measure(&r, 3.0, "AbsoluteTemperature", "K").scale_by(2.0).is_err());
    }
}
