//! Unit representation with scales and derivation

use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use unitas_core::{
    check_factor, DimensionVector, Scale, SiPrefix, SiPrefixes, UnitError, UnitSystem,
};

/// Relative tolerance when pairing an absolute unit with its relative unit
const PAIRING_TOLERANCE: f64 = 1e-9;

/// How a unit came into existence
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum UnitOrigin {
    /// Built from a [`UnitDef`] (built-in catalogue or a host's own table)
    Defined,
    /// Derived by a caller with `derive_linear`, `derive_linear_offset` or
    /// a non-automatic `derive_si`
    Derived,
    /// Generated from an SI prefix. Interchangeable with every other generated
    /// unit of the same quantity, base and prefix.
    Generated { base_key: String, prefix: SiPrefix },
}

/// Definition of a unit before it is bound to a quantity
#[derive(Debug, Clone, PartialEq)]
pub struct UnitDef {
    pub key: String,
    pub name: String,
    pub abbreviations: Vec<String>,
    pub system: UnitSystem,
    pub scale: Scale,
    pub si_prefixes: SiPrefixes,
    pub prefix_power: f64,
    /// Key of the paired relative unit, for units of absolute quantities.
    /// Defaults to the unit's own key.
    pub relative_key: Option<String>,
}

impl UnitDef {
    pub fn new(key: &str, name: &str, system: UnitSystem) -> Self {
        UnitDef {
            key: key.to_string(),
            name: name.to_string(),
            abbreviations: Vec::new(),
            system,
            scale: Scale::IDENTITY,
            si_prefixes: SiPrefixes::None,
            prefix_power: 1.0,
            relative_key: None,
        }
    }

    /// Accepted abbreviations; the first one is the display abbreviation.
    pub fn abbreviations(mut self, abbreviations: &[&str]) -> Self {
        self.abbreviations = abbreviations.iter().map(|a| a.to_string()).collect();
        self
    }

    /// Linear scale: one unit equals `factor` standard units.
    /// Validated when the unit is registered.
    pub fn factor(mut self, factor: f64) -> Self {
        self.scale = Scale::Linear { factor };
        self
    }

    /// Offset-linear scale: value_si = value * factor + offset
    pub fn offset(mut self, factor: f64, offset: f64) -> Self {
        self.scale = Scale::OffsetLinear { factor, offset };
        self
    }

    /// Generate SI-prefixed variants on registration. `power` is applied to
    /// the prefix factor, e.g. 2 for area units (km2 = (1e3)^2 m2).
    pub fn si_prefixes(mut self, prefixes: SiPrefixes, power: f64) -> Self {
        self.si_prefixes = prefixes;
        self.prefix_power = power;
        self
    }

    pub fn relative(mut self, key: &str) -> Self {
        self.relative_key = Some(key.to_string());
        self
    }

    /// Bind the definition to a quantity, validating its scale.
    pub(crate) fn into_unit(
        self,
        quantity: &str,
        dimension: DimensionVector,
        absolute: bool,
        relative: Option<Unit>,
    ) -> Result<Unit, UnitError> {
        let scale = match self.scale {
            Scale::Linear { factor } => Scale::linear(factor)?,
            Scale::OffsetLinear { factor, offset } => Scale::offset_linear(factor, offset)?,
        };
        let scale = if absolute {
            scale.as_offset()
        } else if scale.is_offset() {
            return Err(UnitError::invalid_operand(format!(
                "unit '{}' has an offset scale but quantity {} is not absolute",
                self.key, quantity
            )));
        } else {
            scale
        };
        if let Some(relative) = &relative {
            check_pairing(scale.factor(), relative)?;
        }

        Ok(Unit::from_inner(UnitInner {
            abbreviations: with_key(self.abbreviations, &self.key),
            key: self.key,
            name: self.name,
            quantity: quantity.to_string(),
            dimension,
            scale,
            system: self.system,
            origin: UnitOrigin::Defined,
            si_prefixes: self.si_prefixes,
            prefix_power: self.prefix_power,
            relative,
        }))
    }
}

/// An absolute unit and its relative unit must share the factor.
fn check_pairing(factor: f64, relative: &Unit) -> Result<(), UnitError> {
    if relative.is_absolute() {
        return Err(UnitError::invalid_operand(format!(
            "paired unit '{}' must be a relative unit",
            relative.key()
        )));
    }
    if ((relative.scale().factor() - factor) / factor).abs() > PAIRING_TOLERANCE {
        return Err(UnitError::InvalidFactor {
            what: "factor",
            value: factor,
            reason: "factor does not match the paired relative unit",
        });
    }
    Ok(())
}

/// The key is always an accepted abbreviation.
fn with_key(mut abbreviations: Vec<String>, key: &str) -> Vec<String> {
    if !abbreviations.iter().any(|a| a == key) {
        abbreviations.push(key.to_string());
    }
    abbreviations
}

struct UnitInner {
    key: String,
    name: String,
    abbreviations: Vec<String>,
    quantity: String,
    dimension: DimensionVector,
    scale: Scale,
    system: UnitSystem,
    origin: UnitOrigin,
    si_prefixes: SiPrefixes,
    prefix_power: f64,
    relative: Option<Unit>,
}

/// A named, scaled member of a quantity.
///
/// Cheap to clone. A `Unit` owns everything it needs to convert values, so it
/// stays valid after it is unregistered from its quantity.
#[derive(Clone)]
pub struct Unit {
    inner: Arc<UnitInner>,
}

impl Unit {
    fn from_inner(inner: UnitInner) -> Self {
        Unit {
            inner: Arc::new(inner),
        }
    }

    /// Stable registry identity, e.g. "km"
    pub fn key(&self) -> &str {
        &self.inner.key
    }

    pub fn name(&self) -> &str {
        &self.inner.name
    }

    /// All accepted abbreviations, display abbreviation first
    pub fn abbreviations(&self) -> &[String] {
        &self.inner.abbreviations
    }

    pub fn default_abbreviation(&self) -> &str {
        self.inner
            .abbreviations
            .first()
            .map(String::as_str)
            .unwrap_or(&self.inner.key)
    }

    /// Name of the quantity this unit belongs to
    pub fn quantity_name(&self) -> &str {
        &self.inner.quantity
    }

    pub fn dimension(&self) -> DimensionVector {
        self.inner.dimension
    }

    pub fn scale(&self) -> &Scale {
        &self.inner.scale
    }

    pub fn system(&self) -> UnitSystem {
        self.inner.system
    }

    pub fn origin(&self) -> &UnitOrigin {
        &self.inner.origin
    }

    pub fn si_prefixes(&self) -> SiPrefixes {
        self.inner.si_prefixes
    }

    /// Paired relative unit of an absolute unit (°C absolute -> °C difference)
    pub fn relative_unit(&self) -> Option<&Unit> {
        self.inner.relative.as_ref()
    }

    /// Units of absolute quantities carry an offset scale
    pub fn is_absolute(&self) -> bool {
        self.inner.scale.is_offset()
    }

    pub fn is_generated(&self) -> bool {
        matches!(self.inner.origin, UnitOrigin::Generated { .. })
    }

    /// Convert a value from this unit to the standard unit
    pub fn to_standard(&self, value: f64) -> f64 {
        self.inner.scale.to_standard(value)
    }

    /// Convert a value from the standard unit to this unit
    pub fn from_standard(&self, value: f64) -> f64 {
        self.inner.scale.from_standard(value)
    }

    /// Check if values of both units can be converted into each other
    pub fn is_compatible(&self, other: &Unit) -> bool {
        self.dimension() == other.dimension() && self.is_absolute() == other.is_absolute()
    }

    /// Convert a value from this unit to another unit
    pub fn convert(&self, value: f64, target: &Unit) -> Result<f64, UnitError> {
        if !self.is_compatible(target) {
            return Err(UnitError::mismatch(target.describe(), self.describe()));
        }
        Ok(target.from_standard(self.to_standard(value)))
    }

    /// "Length [m]", used in diagnostics
    pub(crate) fn describe(&self) -> String {
        format!("{} [{}]", self.inner.quantity, self.inner.dimension)
    }

    /// Derive a unit whose value is `factor` times this unit.
    pub fn derive_linear(
        &self,
        factor: f64,
        key: &str,
        name: &str,
        system: UnitSystem,
    ) -> Result<Unit, UnitError> {
        if self.is_absolute() {
            return Err(UnitError::invalid_operand(format!(
                "cannot derive a linear unit from absolute unit '{}', use derive_linear_offset",
                self.key()
            )));
        }
        let scale = self.inner.scale.rescaled(factor)?;
        Ok(self.sibling(
            key.to_string(),
            name.to_string(),
            vec![key.to_string()],
            system,
            scale,
            UnitOrigin::Derived,
            None,
        ))
    }

    /// Derive an absolute unit whose value `u` equals `u * factor + offset`
    /// in this unit, paired with `relative` for differences.
    pub fn derive_linear_offset(
        &self,
        factor: f64,
        offset: f64,
        relative: &Unit,
        key: &str,
        name: &str,
        system: UnitSystem,
    ) -> Result<Unit, UnitError> {
        if !self.is_absolute() {
            return Err(UnitError::invalid_operand(format!(
                "unit '{}' is not absolute, use derive_linear",
                self.key()
            )));
        }
        if relative.is_absolute() {
            return Err(UnitError::invalid_operand(format!(
                "paired unit '{}' must be a relative unit",
                relative.key()
            )));
        }
        if relative.dimension() != self.dimension() {
            return Err(UnitError::mismatch(self.describe(), relative.describe()));
        }

        let scale = self.inner.scale.compose_offset(factor, offset)?;
        check_pairing(scale.factor(), relative)?;

        Ok(self.sibling(
            key.to_string(),
            name.to_string(),
            vec![key.to_string()],
            system,
            scale,
            UnitOrigin::Derived,
            Some(relative.clone()),
        ))
    }

    /// Apply an SI prefix, raising the prefix factor to `power`
    /// (2 for area units, 3 for volume units).
    ///
    /// Units created with `auto_generated` compare equal to every other
    /// auto-generated unit with the same quantity, base and prefix; all other
    /// units compare by identity.
    pub fn derive_si(
        &self,
        prefix: SiPrefix,
        power: f64,
        auto_generated: bool,
    ) -> Result<Unit, UnitError> {
        if self.is_absolute() {
            return Err(UnitError::invalid_operand(format!(
                "cannot apply an SI prefix to absolute unit '{}'",
                self.key()
            )));
        }
        let factor = check_factor(prefix.factor().powf(power))?;
        let scale = self.inner.scale.rescaled(factor)?;

        let key = format!("{}{}", prefix.key(), self.key());
        let abbreviations = self
            .abbreviations()
            .iter()
            .map(|a| format!("{}{}", prefix.abbreviation(), a))
            .collect();

        Ok(self.sibling(
            key.clone(),
            format!("{}{}", prefix.name(), self.name()),
            with_key(abbreviations, &key),
            self.system(),
            scale,
            self.prefixed_origin(prefix, auto_generated),
            None,
        ))
    }

    /// Apply an SI prefix to the denominator of a reciprocal unit: /m -> /km.
    pub fn derive_per_si(
        &self,
        prefix: SiPrefix,
        power: f64,
        auto_generated: bool,
    ) -> Result<Unit, UnitError> {
        let base = self
            .key()
            .strip_prefix("1/")
            .or_else(|| self.key().strip_prefix('/'))
            .ok_or_else(|| {
                UnitError::invalid_operand(format!("unit '{}' is not a reciprocal unit", self.key()))
            })?;
        if self.is_absolute() {
            return Err(UnitError::invalid_operand(format!(
                "cannot apply an SI prefix to absolute unit '{}'",
                self.key()
            )));
        }
        let factor = check_factor(prefix.factor().powf(power))?;
        let scale = self.inner.scale.rescaled(1.0 / factor)?;

        let key = format!("/{}{}", prefix.key(), base);
        let abbreviations = self
            .abbreviations()
            .iter()
            .filter_map(|a| {
                if let Some(rest) = a.strip_prefix("1/") {
                    Some(format!("1/{}{}", prefix.abbreviation(), rest))
                } else {
                    a.strip_prefix('/')
                        .map(|rest| format!("/{}{}", prefix.abbreviation(), rest))
                }
            })
            .collect();
        let name = match self.name().strip_prefix("per ") {
            Some(rest) => format!("per {}{}", prefix.name(), rest),
            None => format!("{}{}", prefix.name(), self.name()),
        };

        Ok(self.sibling(
            key.clone(),
            name,
            with_key(abbreviations, &key),
            self.system(),
            scale,
            self.prefixed_origin(prefix, auto_generated),
            None,
        ))
    }

    /// The prefixed variants requested by this unit's [`SiPrefixes`] policy.
    pub(crate) fn si_prefixed_variants(&self) -> Result<Vec<Unit>, UnitError> {
        let power = self.inner.prefix_power;
        match self.inner.si_prefixes {
            SiPrefixes::None => Ok(Vec::new()),
            SiPrefixes::Unit => SiPrefix::ALL
                .iter()
                .map(|p| self.derive_si(*p, power, true))
                .collect(),
            SiPrefixes::Kilo => {
                let base = self.kilo_base()?;
                SiPrefix::ALL
                    .iter()
                    .filter(|p| **p != SiPrefix::KILO)
                    .map(|p| base.derive_si(*p, power, true))
                    .collect()
            }
            SiPrefixes::PerUnit => SiPrefix::ALL
                .iter()
                .map(|p| self.derive_per_si(*p, power, true))
                .collect(),
        }
    }

    /// kg -> g: the unprefixed base of a kilo-prefixed unit
    fn kilo_base(&self) -> Result<Unit, UnitError> {
        let key = self.key().strip_prefix('k').ok_or_else(|| {
            UnitError::invalid_operand(format!("unit '{}' is not kilo-prefixed", self.key()))
        })?;
        let name = self.name().strip_prefix("kilo").unwrap_or(self.name());
        let abbreviations = self
            .abbreviations()
            .iter()
            .filter_map(|a| a.strip_prefix('k').map(str::to_string))
            .collect();
        let scale = self
            .inner
            .scale
            .rescaled(1.0 / SiPrefix::KILO.factor().powf(self.inner.prefix_power))?;

        Ok(self.sibling(
            key.to_string(),
            name.to_string(),
            with_key(abbreviations, key),
            self.system(),
            scale,
            UnitOrigin::Derived,
            None,
        ))
    }

    fn prefixed_origin(&self, prefix: SiPrefix, auto_generated: bool) -> UnitOrigin {
        if auto_generated {
            UnitOrigin::Generated {
                base_key: self.key().to_string(),
                prefix,
            }
        } else {
            UnitOrigin::Derived
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn sibling(
        &self,
        key: String,
        name: String,
        abbreviations: Vec<String>,
        system: UnitSystem,
        scale: Scale,
        origin: UnitOrigin,
        relative: Option<Unit>,
    ) -> Unit {
        Unit::from_inner(UnitInner {
            key,
            name,
            abbreviations,
            quantity: self.inner.quantity.clone(),
            dimension: self.inner.dimension,
            scale,
            system,
            origin,
            si_prefixes: SiPrefixes::None,
            prefix_power: 1.0,
            relative,
        })
    }
}

impl PartialEq for Unit {
    fn eq(&self, other: &Self) -> bool {
        if Arc::ptr_eq(&self.inner, &other.inner) {
            return true;
        }
        match (&self.inner.origin, &other.inner.origin) {
            (
                UnitOrigin::Generated { base_key: a, prefix: pa },
                UnitOrigin::Generated { base_key: b, prefix: pb },
            ) => a == b && pa == pb && self.inner.quantity == other.inner.quantity,
            _ => false,
        }
    }
}

impl Eq for Unit {}

impl Hash for Unit {
    fn hash<H: Hasher>(&self, state: &mut H) {
        match &self.inner.origin {
            UnitOrigin::Generated { base_key, prefix } => {
                self.inner.quantity.hash(state);
                base_key.hash(state);
                prefix.hash(state);
            }
            _ => (Arc::as_ptr(&self.inner) as usize).hash(state),
        }
    }
}

impl fmt::Debug for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Unit")
            .field("key", &self.inner.key)
            .field("quantity", &self.inner.quantity)
            .field("scale", &self.inner.scale)
            .field("origin", &self.inner.origin)
            .finish()
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.default_abbreviation())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use std::collections::HashSet;

    fn meter() -> Unit {
        UnitDef::new("m", "meter", UnitSystem::SiBase)
            .into_unit("Length", DimensionVector::LENGTH, false, None)
            .unwrap()
    }

    fn second() -> Unit {
        UnitDef::new("s", "second", UnitSystem::SiBase)
            .into_unit("Duration", DimensionVector::TIME, false, None)
            .unwrap()
    }

    fn kelvin_difference() -> Unit {
        UnitDef::new("K", "kelvin", UnitSystem::SiBase)
            .into_unit("Temperature", DimensionVector::TEMPERATURE, false, None)
            .unwrap()
    }

    fn kelvin_absolute() -> Unit {
        UnitDef::new("K", "kelvin", UnitSystem::SiBase)
            .into_unit(
                "AbsoluteTemperature",
                DimensionVector::TEMPERATURE,
                true,
                Some(kelvin_difference()),
            )
            .unwrap()
    }

    #[test]
    fn test_key_is_an_abbreviation() {
        let ft = UnitDef::new("ft", "foot", UnitSystem::Imperial)
            .abbreviations(&["'"])
            .factor(0.3048)
            .into_unit("Length", DimensionVector::LENGTH, false, None)
            .unwrap();
        assert_eq!(ft.default_abbreviation(), "'");
        assert_eq!(ft.abbreviations(), &["'".to_string(), "ft".to_string()]);
        assert_eq!(meter().abbreviations(), &["m".to_string()]);
    }

    #[test]
    fn test_invalid_definition() {
        let result = UnitDef::new("bad", "bad", UnitSystem::Other)
            .factor(0.0)
            .into_unit("Length", DimensionVector::LENGTH, false, None);
        assert_eq!(result.unwrap_err().code(), unitas_core::codes::INVALID_FACTOR);

        let result = UnitDef::new("degC", "celsius", UnitSystem::SiDerived)
            .offset(1.0, 273.15)
            .into_unit("Temperature", DimensionVector::TEMPERATURE, false, None);
        assert!(result.is_err());
    }

    #[test]
    fn test_convert() {
        let m = meter();
        let ft = m.derive_linear(0.3048, "ft", "foot", UnitSystem::Imperial).unwrap();
        assert_abs_diff_eq!(ft.convert(10.0, &m).unwrap(), 3.048, epsilon = 1e-12);
        assert_abs_diff_eq!(m.convert(3.048, &ft).unwrap(), 10.0, epsilon = 1e-12);

        let err = m.convert(1.0, &second()).unwrap_err();
        assert_eq!(err.code(), unitas_core::codes::DIMENSION_MISMATCH);
    }

    #[test]
    fn test_derive_linear() {
        let m = meter();
        let km = m.derive_linear(1000.0, "km", "kilometer", UnitSystem::SiDerived).unwrap();
        let mm_from_km = km.derive_linear(1e-6, "mm", "millimeter", UnitSystem::SiDerived).unwrap();
        assert_abs_diff_eq!(mm_from_km.to_standard(1.0), 1e-3, epsilon = 1e-15);
        assert_eq!(km.origin(), &UnitOrigin::Derived);
        assert_eq!(km.quantity_name(), "Length");

        for bad in [0.0, -3.0, f64::NAN, f64::INFINITY] {
            assert!(m.derive_linear(bad, "x", "x", UnitSystem::Other).is_err());
        }
    }

    #[test]
    fn test_derive_linear_rejects_absolute() {
        let err = kelvin_absolute()
            .derive_linear(2.0, "x", "x", UnitSystem::Other)
            .unwrap_err();
        assert_eq!(err.code(), unitas_core::codes::INVALID_OPERAND);
    }

    #[test]
    fn test_derive_linear_offset_rankine() {
        let rankine_difference = kelvin_difference()
            .derive_linear(5.0 / 9.0, "degR", "degree Rankine", UnitSystem::Imperial)
            .unwrap();
        let rankine = kelvin_absolute()
            .derive_linear_offset(
                5.0 / 9.0,
                0.0,
                &rankine_difference,
                "degR",
                "degree Rankine",
                UnitSystem::Imperial,
            )
            .unwrap();
        assert!(rankine.is_absolute());
        assert_abs_diff_eq!(rankine.to_standard(491.67), 273.15, epsilon = 1e-4);
        assert_eq!(rankine.relative_unit(), Some(&rankine_difference));
    }

    #[test]
    fn test_derive_linear_offset_validation() {
        let kelvin = kelvin_absolute();
        let difference = kelvin_difference();

        // factor disagrees with the paired unit
        let err = kelvin
            .derive_linear_offset(2.0, 0.0, &difference, "x", "x", UnitSystem::Other)
            .unwrap_err();
        assert_eq!(err.code(), unitas_core::codes::INVALID_FACTOR);

        let err = kelvin
            .derive_linear_offset(1.0, f64::NAN, &difference, "x", "x", UnitSystem::Other)
            .unwrap_err();
        assert_eq!(err.code(), unitas_core::codes::INVALID_FACTOR);

        let err = kelvin
            .derive_linear_offset(1.0, 0.0, &meter(), "x", "x", UnitSystem::Other)
            .unwrap_err();
        assert_eq!(err.code(), unitas_core::codes::DIMENSION_MISMATCH);

        let err = difference
            .derive_linear_offset(1.0, 0.0, &difference, "x", "x", UnitSystem::Other)
            .unwrap_err();
        assert_eq!(err.code(), unitas_core::codes::INVALID_OPERAND);
    }

    #[test]
    fn test_derive_si() {
        let km = meter().derive_si(SiPrefix::KILO, 1.0, true).unwrap();
        assert_eq!(km.key(), "km");
        assert_eq!(km.name(), "kilometer");
        assert_eq!(km.to_standard(1.0), 1000.0);

        let mum = meter().derive_si(SiPrefix::MICRO, 1.0, true).unwrap();
        assert_eq!(mum.key(), "mum");
        assert_eq!(mum.default_abbreviation(), "μm");
        assert!(mum.abbreviations().contains(&"mum".to_string()));
    }

    #[test]
    fn test_derive_si_with_power() {
        let m2 = UnitDef::new("m2", "square meter", UnitSystem::SiDerived)
            .abbreviations(&["m2", "m²"])
            .into_unit("Area", DimensionVector::AREA, false, None)
            .unwrap();
        let km2 = m2.derive_si(SiPrefix::KILO, 2.0, true).unwrap();
        assert_eq!(km2.key(), "km2");
        assert_eq!(km2.abbreviations(), &["km2".to_string(), "km²".to_string()]);
        assert_abs_diff_eq!(km2.to_standard(1.0), 1e6, epsilon = 1e-6);
    }

    #[test]
    fn test_generated_units_equal_by_prefix() {
        let m = meter();
        let a = m.derive_si(SiPrefix::KILO, 1.0, true).unwrap();
        let b = m.derive_si(SiPrefix::KILO, 1.0, true).unwrap();
        assert_eq!(a, b);

        let mut set = HashSet::new();
        set.insert(a.clone());
        assert!(set.contains(&b));

        let c = m.derive_si(SiPrefix::MEGA, 1.0, true).unwrap();
        assert_ne!(a, c);
    }

    #[test]
    fn test_non_generated_units_equal_by_identity() {
        let m = meter();
        let a = m.derive_si(SiPrefix::KILO, 1.0, false).unwrap();
        let b = m.derive_si(SiPrefix::KILO, 1.0, false).unwrap();
        assert_ne!(a, b);
        assert_eq!(a, a.clone());

        let x = m.derive_linear(1.23, "x", "x", UnitSystem::Other).unwrap();
        let y = m.derive_linear(1.23, "x", "x", UnitSystem::Other).unwrap();
        assert_eq!(x.scale(), y.scale());
        assert_ne!(x, y);
    }

    #[test]
    fn test_per_unit_prefix() {
        let per_meter = UnitDef::new("/m", "per meter", UnitSystem::SiDerived)
            .abbreviations(&["/m", "1/m"])
            .into_unit("LinearDensity", DimensionVector::LENGTH.negate(), false, None)
            .unwrap();
        let per_km = per_meter.derive_per_si(SiPrefix::KILO, 1.0, true).unwrap();
        assert_eq!(per_km.key(), "/km");
        assert_eq!(per_km.name(), "per kilometer");
        assert_eq!(per_km.abbreviations(), &["/km".to_string(), "1/km".to_string()]);
        assert_abs_diff_eq!(per_km.to_standard(1.0), 1e-3, epsilon = 1e-18);

        assert!(meter().derive_per_si(SiPrefix::KILO, 1.0, true).is_err());
    }

    #[test]
    fn test_kilo_variants() {
        let kg = UnitDef::new("kg", "kilogram", UnitSystem::SiBase)
            .si_prefixes(SiPrefixes::Kilo, 1.0)
            .into_unit("Mass", DimensionVector::MASS, false, None)
            .unwrap();
        let variants = kg.si_prefixed_variants().unwrap();
        assert_eq!(variants.len(), SiPrefix::ALL.len() - 1);

        let mg = variants.iter().find(|u| u.key() == "mg").unwrap();
        assert_eq!(mg.name(), "milligram");
        assert_abs_diff_eq!(mg.to_standard(1.0), 1e-6, epsilon = 1e-20);
        assert!(variants.iter().all(|u| u.key() != "kg"));
    }
}
