//! Built-in catalogue - the standard quantities and their common units

use std::f64::consts::PI;

use unitas_core::{DimensionVector, SiPrefixes, UnitError, UnitSystem};

use crate::{UnitDef, UnitRegistry};

use SiPrefixes::{Kilo, PerUnit, Unit as Prefixed};
use UnitSystem::{
    Cgs, CgsEmu, Imperial, Other, SiAccepted, SiBase, SiDerived, UsCustomary,
};

const FOOT: f64 = 0.3048;
const INCH: f64 = 0.0254;
const POUND: f64 = 0.45359237;
const DEGREE: f64 = PI / 180.0;
const STANDARD_GRAVITY: f64 = 9.80665;
const GALLON_US: f64 = 3.785411784e-3;

/// Install every built-in quantity and unit
pub(crate) fn install(registry: &UnitRegistry) -> Result<(), UnitError> {
    install_base_quantities(registry)?;
    install_geometry(registry)?;
    install_mechanics(registry)?;
    install_electromagnetism(registry)?;
    install_flow(registry)?;
    install_photometry(registry)?;
    install_absolute_quantities(registry)?;
    Ok(())
}

fn define_all<I>(registry: &UnitRegistry, quantity: &str, defs: I) -> Result<(), UnitError>
where
    I: IntoIterator<Item = UnitDef>,
{
    for def in defs {
        registry.define_unit(quantity, def)?;
    }
    Ok(())
}

/// Standard unit of a quantity with every SI prefix
fn prefixed(key: &str, name: &str, system: UnitSystem) -> UnitDef {
    UnitDef::new(key, name, system).si_prefixes(Prefixed, 1.0)
}

fn install_base_quantities(registry: &UnitRegistry) -> Result<(), UnitError> {
    registry.register_quantity(
        "Dimensionless",
        DimensionVector::DIMENSIONLESS,
        UnitDef::new("", "unit", SiDerived),
    )?;
    define_all(
        registry,
        "Dimensionless",
        [
            UnitDef::new("%", "percent", Other).factor(0.01),
            UnitDef::new("ppm", "parts per million", Other).factor(1e-6),
            UnitDef::new("ppb", "parts per billion", Other).factor(1e-9),
        ],
    )?;

    registry.register_quantity("Length", DimensionVector::LENGTH, prefixed("m", "meter", SiBase))?;
    define_all(
        registry,
        "Length",
        [
            UnitDef::new("in", "inch", Imperial).abbreviations(&["in", "\""]).factor(INCH),
            UnitDef::new("ft", "foot", Imperial).abbreviations(&["ft", "'"]).factor(FOOT),
            UnitDef::new("yd", "yard", Imperial).factor(0.9144),
            UnitDef::new("mi", "mile", Imperial).factor(1609.344),
            UnitDef::new("NM", "nautical mile", Other).abbreviations(&["NM", "nmi"]).factor(1852.0),
            UnitDef::new("AU", "astronomical unit", SiAccepted)
                .abbreviations(&["AU", "au"])
                .factor(149_597_870_700.0),
            UnitDef::new("ly", "light year", Other).factor(9_460_730_472_580_800.0),
            UnitDef::new("pc", "parsec", Other).factor(3.085_677_581_491_367e16),
            UnitDef::new("angstrom", "angstrom", Other)
                .abbreviations(&["Å"])
                .factor(1e-10),
        ],
    )?;

    registry.register_quantity(
        "Mass",
        DimensionVector::MASS,
        UnitDef::new("kg", "kilogram", SiBase).si_prefixes(Kilo, 1.0),
    )?;
    define_all(
        registry,
        "Mass",
        [
            UnitDef::new("g", "gram", SiBase).factor(1e-3),
            UnitDef::new("t", "tonne", SiAccepted).abbreviations(&["t", "tonne"]).factor(1000.0),
            UnitDef::new("lb", "pound", Imperial).abbreviations(&["lb", "lbs"]).factor(POUND),
            UnitDef::new("oz", "ounce", Imperial).factor(POUND / 16.0),
            UnitDef::new("st", "stone", Imperial).factor(POUND * 14.0),
            UnitDef::new("gr", "grain", Imperial).factor(6.479_891e-5),
            UnitDef::new("Da", "dalton", SiAccepted)
                .abbreviations(&["Da", "u"])
                .factor(1.660_539_066_60e-27),
        ],
    )?;

    registry.register_quantity("Duration", DimensionVector::TIME, prefixed("s", "second", SiBase))?;
    define_all(
        registry,
        "Duration",
        [
            UnitDef::new("min", "minute", SiAccepted).factor(60.0),
            UnitDef::new("h", "hour", SiAccepted).abbreviations(&["h", "hr"]).factor(3600.0),
            UnitDef::new("day", "day", SiAccepted).abbreviations(&["day", "d"]).factor(86_400.0),
            UnitDef::new("wk", "week", Other).factor(604_800.0),
            UnitDef::new("yr", "year", Other).abbreviations(&["yr", "a"]).factor(31_556_952.0),
        ],
    )?;

    registry.register_quantity(
        "Temperature",
        DimensionVector::TEMPERATURE,
        prefixed("K", "kelvin", SiBase),
    )?;
    define_all(
        registry,
        "Temperature",
        [
            UnitDef::new("degC", "degree Celsius", SiDerived).abbreviations(&["°C", "degC"]),
            UnitDef::new("degF", "degree Fahrenheit", Imperial)
                .abbreviations(&["°F", "degF"])
                .factor(5.0 / 9.0),
            UnitDef::new("degR", "degree Rankine", Imperial)
                .abbreviations(&["°R", "degR"])
                .factor(5.0 / 9.0),
            UnitDef::new("degRe", "degree Reaumur", Other)
                .abbreviations(&["°Ré", "degRe"])
                .factor(1.25),
        ],
    )?;

    registry.register_quantity(
        "ElectricalCurrent",
        DimensionVector::CURRENT,
        prefixed("A", "ampere", SiBase),
    )?;
    registry.register_quantity(
        "AmountOfSubstance",
        DimensionVector::AMOUNT,
        prefixed("mol", "mole", SiBase),
    )?;
    registry.register_quantity(
        "LuminousIntensity",
        DimensionVector::LUMINOUS_INTENSITY,
        prefixed("cd", "candela", SiBase),
    )?;

    registry.register_quantity("Angle", DimensionVector::ANGLE, prefixed("rad", "radian", SiDerived))?;
    define_all(
        registry,
        "Angle",
        [
            UnitDef::new("deg", "degree", SiAccepted).abbreviations(&["°", "deg"]).factor(DEGREE),
            UnitDef::new("arcmin", "arcminute", SiAccepted).factor(DEGREE / 60.0),
            UnitDef::new("arcsec", "arcsecond", SiAccepted).factor(DEGREE / 3600.0),
            UnitDef::new("grad", "gradian", Other).abbreviations(&["grad", "gon"]).factor(PI / 200.0),
            UnitDef::new("rev", "revolution", Other).abbreviations(&["rev", "turn"]).factor(2.0 * PI),
        ],
    )?;

    registry.register_quantity(
        "SolidAngle",
        DimensionVector::SOLID_ANGLE,
        UnitDef::new("sr", "steradian", SiDerived),
    )?;
    define_all(
        registry,
        "SolidAngle",
        [UnitDef::new("deg2", "square degree", Other)
            .abbreviations(&["deg2", "sq.deg"])
            .factor(DEGREE * DEGREE)],
    )?;
    Ok(())
}

fn install_geometry(registry: &UnitRegistry) -> Result<(), UnitError> {
    registry.register_quantity(
        "Area",
        DimensionVector::AREA,
        UnitDef::new("m2", "square meter", SiDerived)
            .abbreviations(&["m2", "m²"])
            .si_prefixes(Prefixed, 2.0),
    )?;
    define_all(
        registry,
        "Area",
        [
            UnitDef::new("a", "are", Other).factor(100.0),
            UnitDef::new("ha", "hectare", SiAccepted).factor(1e4),
            UnitDef::new("in2", "square inch", Imperial)
                .abbreviations(&["in2", "in²", "sq.in"])
                .factor(INCH * INCH),
            UnitDef::new("ft2", "square foot", Imperial)
                .abbreviations(&["ft2", "ft²", "sq.ft"])
                .factor(FOOT * FOOT),
            UnitDef::new("yd2", "square yard", Imperial)
                .abbreviations(&["yd2", "yd²"])
                .factor(0.9144 * 0.9144),
            UnitDef::new("ac", "acre", Imperial)
                .abbreviations(&["ac", "acre"])
                .factor(4046.856_422_4),
            UnitDef::new("mi2", "square mile", Imperial)
                .abbreviations(&["mi2", "mi²"])
                .factor(1609.344 * 1609.344),
        ],
    )?;

    registry.register_quantity(
        "Volume",
        DimensionVector::VOLUME,
        UnitDef::new("m3", "cubic meter", SiDerived)
            .abbreviations(&["m3", "m³"])
            .si_prefixes(Prefixed, 3.0),
    )?;
    define_all(
        registry,
        "Volume",
        [
            UnitDef::new("L", "liter", SiAccepted)
                .abbreviations(&["L", "l"])
                .factor(1e-3)
                .si_prefixes(Prefixed, 1.0),
            UnitDef::new("in3", "cubic inch", Imperial)
                .abbreviations(&["in3", "in³"])
                .factor(INCH * INCH * INCH),
            UnitDef::new("ft3", "cubic foot", Imperial)
                .abbreviations(&["ft3", "ft³"])
                .factor(FOOT * FOOT * FOOT),
            UnitDef::new("gal(US)", "gallon (US)", UsCustomary).factor(GALLON_US),
            UnitDef::new("qt(US)", "quart (US)", UsCustomary).factor(GALLON_US / 4.0),
            UnitDef::new("pt(US)", "pint (US)", UsCustomary).factor(GALLON_US / 8.0),
            UnitDef::new("fl.oz(US)", "fluid ounce (US)", UsCustomary).factor(GALLON_US / 128.0),
            UnitDef::new("gal(UK)", "gallon (UK)", Imperial).factor(4.546_09e-3),
            UnitDef::new("bbl", "barrel", Other).factor(GALLON_US * 42.0),
        ],
    )?;

    registry.register_quantity(
        "LinearDensity",
        DimensionVector::LENGTH.negate(),
        UnitDef::new("/m", "per meter", SiDerived)
            .abbreviations(&["/m", "1/m"])
            .si_prefixes(PerUnit, 1.0),
    )?;
    define_all(
        registry,
        "LinearDensity",
        [
            UnitDef::new("/in", "per inch", Imperial)
                .abbreviations(&["/in", "1/in"])
                .factor(1.0 / INCH),
            UnitDef::new("/ft", "per foot", Imperial)
                .abbreviations(&["/ft", "1/ft"])
                .factor(1.0 / FOOT),
        ],
    )?;
    Ok(())
}

fn install_mechanics(registry: &UnitRegistry) -> Result<(), UnitError> {
    registry.register_quantity(
        "Speed",
        DimensionVector::SPEED,
        UnitDef::new("m/s", "meter per second", SiDerived),
    )?;
    define_all(
        registry,
        "Speed",
        [
            UnitDef::new("km/h", "kilometer per hour", SiDerived)
                .abbreviations(&["km/h", "kph"])
                .factor(1.0 / 3.6),
            UnitDef::new("mi/h", "mile per hour", Imperial)
                .abbreviations(&["mi/h", "mph"])
                .factor(0.447_04),
            UnitDef::new("ft/s", "foot per second", Imperial).factor(FOOT),
            UnitDef::new("kn", "knot", Other).abbreviations(&["kn", "kt"]).factor(1852.0 / 3600.0),
        ],
    )?;

    registry.register_quantity(
        "Acceleration",
        DimensionVector::ACCELERATION,
        UnitDef::new("m/s2", "meter per second squared", SiDerived).abbreviations(&["m/s2", "m/s²"]),
    )?;
    define_all(
        registry,
        "Acceleration",
        [
            UnitDef::new("g0", "standard gravity", Other)
                .abbreviations(&["g0", "gₙ"])
                .factor(STANDARD_GRAVITY),
            UnitDef::new("Gal", "gal", Cgs).factor(0.01),
            UnitDef::new("ft/s2", "foot per second squared", Imperial)
                .abbreviations(&["ft/s2", "ft/s²"])
                .factor(FOOT),
        ],
    )?;

    registry.register_quantity("Force", DimensionVector::FORCE, prefixed("N", "newton", SiDerived))?;
    define_all(
        registry,
        "Force",
        [
            UnitDef::new("kgf", "kilogram-force", Other).factor(STANDARD_GRAVITY),
            UnitDef::new("lbf", "pound-force", Imperial).factor(POUND * STANDARD_GRAVITY),
            UnitDef::new("dyn", "dyne", Cgs).factor(1e-5),
        ],
    )?;

    registry.register_quantity("Energy", DimensionVector::ENERGY, prefixed("J", "joule", SiDerived))?;
    define_all(
        registry,
        "Energy",
        [
            UnitDef::new("Wh", "watt-hour", SiAccepted)
                .factor(3600.0)
                .si_prefixes(Prefixed, 1.0),
            UnitDef::new("eV", "electronvolt", SiAccepted)
                .factor(1.602_176_634e-19)
                .si_prefixes(Prefixed, 1.0),
            UnitDef::new("cal", "calorie", Other).factor(4.184),
            UnitDef::new("kcal", "kilocalorie", Other).abbreviations(&["kcal", "Cal"]).factor(4184.0),
            UnitDef::new("BTU", "British thermal unit", Imperial)
                .abbreviations(&["BTU", "Btu"])
                .factor(1055.055_852_62),
            UnitDef::new("erg", "erg", Cgs).factor(1e-7),
        ],
    )?;

    registry.register_quantity("Power", DimensionVector::POWER, prefixed("W", "watt", SiDerived))?;
    define_all(
        registry,
        "Power",
        [
            UnitDef::new("hp", "horsepower", Imperial).factor(745.699_871_582_270_2),
            UnitDef::new("hp(M)", "metric horsepower", Other)
                .abbreviations(&["hp(M)", "PS"])
                .factor(735.498_75),
            UnitDef::new("erg/s", "erg per second", Cgs).factor(1e-7),
        ],
    )?;

    registry.register_quantity(
        "Pressure",
        DimensionVector::PRESSURE,
        prefixed("Pa", "pascal", SiDerived),
    )?;
    define_all(
        registry,
        "Pressure",
        [
            UnitDef::new("bar", "bar", Other).factor(1e5).si_prefixes(Prefixed, 1.0),
            UnitDef::new("atm", "standard atmosphere", Other).factor(101_325.0),
            UnitDef::new("psi", "pound per square inch", Imperial)
                .factor(POUND * STANDARD_GRAVITY / (INCH * INCH)),
            UnitDef::new("mmHg", "millimeter of mercury", Other).factor(133.322_387_415),
            UnitDef::new("Torr", "torr", Other)
                .abbreviations(&["Torr", "torr"])
                .factor(101_325.0 / 760.0),
        ],
    )?;

    registry.register_quantity(
        "Frequency",
        DimensionVector::FREQUENCY,
        prefixed("Hz", "hertz", SiDerived),
    )?;

    registry.register_quantity(
        "Momentum",
        DimensionVector::FORCE.plus(&DimensionVector::TIME),
        UnitDef::new("kgm/s", "kilogram meter per second", SiDerived)
            .abbreviations(&["kg.m/s", "kgm/s", "N.s"]),
    )?;

    registry.register_quantity(
        "AngularVelocity",
        DimensionVector::ANGLE.minus(&DimensionVector::TIME),
        UnitDef::new("rad/s", "radian per second", SiDerived),
    )?;
    define_all(
        registry,
        "AngularVelocity",
        [
            UnitDef::new("deg/s", "degree per second", SiAccepted)
                .abbreviations(&["°/s", "deg/s"])
                .factor(DEGREE),
            UnitDef::new("rpm", "revolution per minute", Other)
                .abbreviations(&["rpm", "rev/min"])
                .factor(2.0 * PI / 60.0),
        ],
    )?;

    registry.register_quantity(
        "AngularAcceleration",
        DimensionVector::ANGLE.minus(&DimensionVector::TIME.pow(2)),
        UnitDef::new("rad/s2", "radian per second squared", SiDerived)
            .abbreviations(&["rad/s2", "rad/s²"]),
    )?;
    define_all(
        registry,
        "AngularAcceleration",
        [UnitDef::new("deg/s2", "degree per second squared", SiAccepted)
            .abbreviations(&["°/s2", "deg/s2"])
            .factor(DEGREE)],
    )?;
    Ok(())
}

fn install_electromagnetism(registry: &UnitRegistry) -> Result<(), UnitError> {
    registry.register_quantity(
        "ElectricalCharge",
        DimensionVector::CHARGE,
        prefixed("C", "coulomb", SiDerived),
    )?;
    define_all(
        registry,
        "ElectricalCharge",
        [
            UnitDef::new("Ah", "ampere-hour", Other).factor(3600.0),
            UnitDef::new("mAh", "milliampere-hour", Other).factor(3.6),
        ],
    )?;

    registry.register_quantity(
        "ElectricalPotential",
        DimensionVector::POTENTIAL,
        prefixed("V", "volt", SiDerived),
    )?;
    registry.register_quantity(
        "ElectricalResistance",
        DimensionVector::RESISTANCE,
        UnitDef::new("ohm", "ohm", SiDerived)
            .abbreviations(&["Ω", "ohm"])
            .si_prefixes(Prefixed, 1.0),
    )?;
    registry.register_quantity(
        "ElectricalCapacitance",
        DimensionVector::si(-1, -2, 4, 2, 0, 0, 0),
        prefixed("F", "farad", SiDerived),
    )?;
    registry.register_quantity(
        "ElectricalConductance",
        DimensionVector::si(-1, -2, 3, 2, 0, 0, 0),
        prefixed("S", "siemens", SiDerived),
    )?;
    registry.register_quantity(
        "MagneticFlux",
        DimensionVector::si(1, 2, -2, -1, 0, 0, 0),
        prefixed("Wb", "weber", SiDerived),
    )?;
    registry.register_quantity(
        "MagneticFluxDensity",
        DimensionVector::si(1, 0, -2, -1, 0, 0, 0),
        prefixed("T", "tesla", SiDerived),
    )?;
    define_all(
        registry,
        "MagneticFluxDensity",
        [UnitDef::new("G", "gauss", CgsEmu).factor(1e-4)],
    )?;
    registry.register_quantity(
        "ElectricalInductance",
        DimensionVector::si(1, 2, -2, -2, 0, 0, 0),
        prefixed("H", "henry", SiDerived),
    )?;
    Ok(())
}

fn install_flow(registry: &UnitRegistry) -> Result<(), UnitError> {
    registry.register_quantity(
        "Density",
        DimensionVector::MASS.minus(&DimensionVector::VOLUME),
        UnitDef::new("kg/m3", "kilogram per cubic meter", SiDerived)
            .abbreviations(&["kg/m3", "kg/m³"]),
    )?;
    define_all(
        registry,
        "Density",
        [
            UnitDef::new("g/cm3", "gram per cubic centimeter", SiDerived)
                .abbreviations(&["g/cm3", "g/cm³", "g/mL"])
                .factor(1000.0),
            UnitDef::new("g/L", "gram per liter", SiAccepted).factor(1.0),
            UnitDef::new("lb/ft3", "pound per cubic foot", Imperial)
                .factor(POUND / (FOOT * FOOT * FOOT)),
        ],
    )?;

    registry.register_quantity(
        "FlowVolume",
        DimensionVector::VOLUME.minus(&DimensionVector::TIME),
        UnitDef::new("m3/s", "cubic meter per second", SiDerived).abbreviations(&["m3/s", "m³/s"]),
    )?;
    define_all(
        registry,
        "FlowVolume",
        [
            UnitDef::new("m3/h", "cubic meter per hour", SiAccepted)
                .abbreviations(&["m3/h", "m³/h"])
                .factor(1.0 / 3600.0),
            UnitDef::new("L/s", "liter per second", SiAccepted).factor(1e-3),
            UnitDef::new("L/min", "liter per minute", SiAccepted).factor(1e-3 / 60.0),
            UnitDef::new("gal(US)/min", "gallon (US) per minute", UsCustomary)
                .abbreviations(&["gal(US)/min", "gpm"])
                .factor(GALLON_US / 60.0),
        ],
    )?;

    registry.register_quantity(
        "FlowMass",
        DimensionVector::MASS.minus(&DimensionVector::TIME),
        UnitDef::new("kg/s", "kilogram per second", SiDerived),
    )?;
    define_all(
        registry,
        "FlowMass",
        [
            UnitDef::new("g/s", "gram per second", SiDerived).factor(1e-3),
            UnitDef::new("kg/h", "kilogram per hour", SiAccepted).factor(1.0 / 3600.0),
            UnitDef::new("lb/s", "pound per second", Imperial).factor(POUND),
        ],
    )?;

    registry.register_quantity(
        "CatalyticActivity",
        DimensionVector::AMOUNT.minus(&DimensionVector::TIME),
        prefixed("kat", "katal", SiDerived),
    )?;
    Ok(())
}

fn install_photometry(registry: &UnitRegistry) -> Result<(), UnitError> {
    registry.register_quantity(
        "LuminousFlux",
        DimensionVector::LUMINOUS_FLUX,
        prefixed("lm", "lumen", SiDerived),
    )?;
    registry.register_quantity(
        "Illuminance",
        DimensionVector::ILLUMINANCE,
        prefixed("lx", "lux", SiDerived),
    )?;
    define_all(
        registry,
        "Illuminance",
        [
            UnitDef::new("fc", "footcandle", Imperial).factor(1.0 / (FOOT * FOOT)),
            UnitDef::new("ph", "phot", Cgs).factor(1e4),
        ],
    )?;
    Ok(())
}

/// Absolute quantities pair every unit with the same-key unit of the
/// relative quantity.
fn install_absolute_quantities(registry: &UnitRegistry) -> Result<(), UnitError> {
    registry.register_absolute_quantity(
        "AbsoluteTemperature",
        "Temperature",
        UnitDef::new("K", "kelvin", SiBase),
    )?;
    define_all(
        registry,
        "AbsoluteTemperature",
        [
            UnitDef::new("degC", "degree Celsius", SiDerived)
                .abbreviations(&["°C", "degC"])
                .offset(1.0, 273.15),
            UnitDef::new("degF", "degree Fahrenheit", Imperial)
                .abbreviations(&["°F", "degF"])
                .offset(5.0 / 9.0, 459.67 * 5.0 / 9.0),
            UnitDef::new("degR", "degree Rankine", Imperial)
                .abbreviations(&["°R", "degR"])
                .offset(5.0 / 9.0, 0.0),
            UnitDef::new("degRe", "degree Reaumur", Other)
                .abbreviations(&["°Ré", "degRe"])
                .offset(1.25, 273.15),
        ],
    )?;

    // seconds since the Unix epoch
    registry.register_absolute_quantity("Time", "Duration", UnitDef::new("s", "second", SiBase))?;
    define_all(
        registry,
        "Time",
        [
            UnitDef::new("min", "minute", SiAccepted).factor(60.0),
            UnitDef::new("h", "hour", SiAccepted).abbreviations(&["h", "hr"]).factor(3600.0),
            UnitDef::new("day", "day", SiAccepted)
                .abbreviations(&["day", "d"])
                .factor(86_400.0),
        ],
    )?;

    registry.register_absolute_quantity("Position", "Length", UnitDef::new("m", "meter", SiBase))?;
    define_all(
        registry,
        "Position",
        [
            UnitDef::new("ft", "foot", Imperial).abbreviations(&["ft", "'"]).factor(FOOT),
            UnitDef::new("yd", "yard", Imperial).factor(0.9144),
            UnitDef::new("mi", "mile", Imperial).factor(1609.344),
        ],
    )?;

    registry.register_absolute_quantity(
        "Direction",
        "Angle",
        UnitDef::new("rad", "radian", SiDerived),
    )?;
    define_all(
        registry,
        "Direction",
        [UnitDef::new("deg", "degree", SiAccepted)
            .abbreviations(&["°", "deg"])
            .factor(DEGREE)],
    )?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::RegistryConfig;
    use approx::assert_relative_eq;

    #[test]
    fn test_install_succeeds() {
        let registry = UnitRegistry::new();
        install(&registry).unwrap();
        assert_eq!(registry.quantities().len(), 41);
    }

    #[test]
    fn test_install_without_prefixes() {
        let config = RegistryConfig {
            install_builtin: false,
            generate_si_prefixes: false,
            ..Default::default()
        };
        let registry = UnitRegistry::from_config(&config);
        install(&registry).unwrap();
        assert!(registry.unit("Length", "km").is_err());
        assert!(registry.unit("Position", "mi").is_ok());
    }

    #[test]
    fn test_common_conversions() {
        let registry = UnitRegistry::with_builtin();
        let convert = |quantity: &str, value: f64, from: &str, to: &str| {
            let from = registry.resolve_abbreviation(quantity, from).unwrap();
            let to = registry.resolve_abbreviation(quantity, to).unwrap();
            from.convert(value, &to).unwrap()
        };
        assert_relative_eq!(convert("Length", 1.0, "mi", "km"), 1.609344, max_relative = 1e-12);
        assert_relative_eq!(convert("Mass", 1.0, "lb", "g"), 453.59237, max_relative = 1e-12);
        assert_relative_eq!(convert("Mass", 1.0, "t", "Mg"), 1.0, max_relative = 1e-12);
        assert_relative_eq!(convert("Volume", 1.0, "gal(US)", "L"), 3.785411784, max_relative = 1e-12);
        assert_relative_eq!(convert("Volume", 1.0, "L", "cm3"), 1000.0, max_relative = 1e-12);
        assert_relative_eq!(convert("Area", 1.0, "km²", "ha"), 100.0, max_relative = 1e-12);
        assert_relative_eq!(convert("Energy", 1.0, "kWh", "MJ"), 3.6, max_relative = 1e-12);
        assert_relative_eq!(convert("Pressure", 1.0, "atm", "hPa"), 1013.25, max_relative = 1e-12);
        assert_relative_eq!(convert("Pressure", 1.0, "psi", "kPa"), 6.894757293168361, max_relative = 1e-9);
        assert_relative_eq!(convert("Speed", 100.0, "km/h", "m/s"), 27.777777777777, max_relative = 1e-12);
        assert_relative_eq!(convert("Angle", 180.0, "°", "rad"), PI, max_relative = 1e-12);
        assert_relative_eq!(convert("LinearDensity", 1.0, "/km", "/m"), 1e-3, max_relative = 1e-12);
        assert_relative_eq!(
            convert("AbsoluteTemperature", 100.0, "°C", "°F"),
            212.0,
            max_relative = 1e-12
        );
        assert_relative_eq!(
            convert("AbsoluteTemperature", 491.67, "degR", "K"),
            273.15,
            max_relative = 1e-6
        );
    }

    #[test]
    fn test_dimension_index() {
        let registry = UnitRegistry::with_builtin();
        let cases = [
            (DimensionVector::FORCE, "Force"),
            (DimensionVector::PRESSURE, "Pressure"),
            (DimensionVector::TEMPERATURE, "Temperature"),
            (DimensionVector::TIME, "Duration"),
            (DimensionVector::LENGTH, "Length"),
            (DimensionVector::ANGLE, "Angle"),
            (DimensionVector::LUMINOUS_FLUX, "LuminousFlux"),
        ];
        for (dimension, name) in cases {
            assert_eq!(registry.lookup_by_dimension(dimension).unwrap().name(), name);
        }
    }

    #[test]
    fn test_generated_kilowatt_hour() {
        let registry = UnitRegistry::with_builtin();
        let kwh = registry.unit("Energy", "kWh").unwrap();
        assert!(kwh.is_generated());
        assert_eq!(kwh.name(), "kilowatt-hour");
    }

    #[test]
    fn test_absolute_units_are_paired() {
        let registry = UnitRegistry::with_builtin();
        for quantity in ["AbsoluteTemperature", "Time", "Position", "Direction"] {
            let q = registry.quantity(quantity).unwrap();
            let relative = q.relative().unwrap();
            for unit in q.units().values() {
                let paired = unit.relative_unit().unwrap();
                assert_eq!(paired.quantity_name(), relative.name());
                assert_eq!(paired.scale().factor(), unit.scale().factor());
            }
        }
    }
}
