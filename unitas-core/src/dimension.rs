//! Dimensional analysis types
//!
//! Each physical quantity has a dimension represented as a 9-element vector:
//! the seven SI base exponents [kg, m, s, A, K, mol, cd] followed by two
//! auxiliary exponents for plane angle (rad) and solid angle (sr). Angles are
//! not SI base units, but tracking them keeps rad/s apart from Hz.

use std::fmt;
use std::ops::{Add, Neg, Sub};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::UnitError;

/// Component indices into a [`DimensionVector`]
pub mod index {
    pub const MASS: usize = 0;
    pub const LENGTH: usize = 1;
    pub const TIME: usize = 2;
    pub const CURRENT: usize = 3;
    pub const TEMPERATURE: usize = 4;
    pub const AMOUNT: usize = 5;
    pub const LUMINOUS_INTENSITY: usize = 6;
    pub const ANGLE: usize = 7;
    pub const SOLID_ANGLE: usize = 8;
}

/// Number of components, SI base exponents first
pub const COMPONENTS: usize = 9;

/// Number of true SI base exponents
pub const SI_BASE_COMPONENTS: usize = 7;

/// Largest exponent magnitude accepted when parsing dimension text
pub const MAX_PARSED_EXPONENT: i8 = 20;

const SYMBOLS: [&str; COMPONENTS] = ["kg", "m", "s", "A", "K", "mol", "cd", "rad", "sr"];

// Angles render first: "s" followed by "rad" would otherwise read as "sr" + "ad".
const RENDER_ORDER: [usize; COMPONENTS] = [
    index::ANGLE,
    index::SOLID_ANGLE,
    index::MASS,
    index::LENGTH,
    index::TIME,
    index::CURRENT,
    index::TEMPERATURE,
    index::AMOUNT,
    index::LUMINOUS_INTENSITY,
];

// Longest tokens first so "mol" wins over "m" and "sr" over "s".
const PARSE_ORDER: [(usize, &str); COMPONENTS] = [
    (index::AMOUNT, "mol"),
    (index::ANGLE, "rad"),
    (index::MASS, "kg"),
    (index::LUMINOUS_INTENSITY, "cd"),
    (index::SOLID_ANGLE, "sr"),
    (index::LENGTH, "m"),
    (index::TIME, "s"),
    (index::CURRENT, "A"),
    (index::TEMPERATURE, "K"),
];

/// The dimension of a physical quantity as exponents of the SI base
/// dimensions plus angle and solid angle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct DimensionVector {
    exponents: [i8; COMPONENTS],
}

impl DimensionVector {
    /// Dimensionless quantity (all exponents zero)
    pub const DIMENSIONLESS: DimensionVector = DimensionVector::si(0, 0, 0, 0, 0, 0, 0);

    pub const MASS: DimensionVector = DimensionVector::si(1, 0, 0, 0, 0, 0, 0);
    pub const LENGTH: DimensionVector = DimensionVector::si(0, 1, 0, 0, 0, 0, 0);
    pub const TIME: DimensionVector = DimensionVector::si(0, 0, 1, 0, 0, 0, 0);
    pub const CURRENT: DimensionVector = DimensionVector::si(0, 0, 0, 1, 0, 0, 0);
    pub const TEMPERATURE: DimensionVector = DimensionVector::si(0, 0, 0, 0, 1, 0, 0);
    pub const AMOUNT: DimensionVector = DimensionVector::si(0, 0, 0, 0, 0, 1, 0);
    pub const LUMINOUS_INTENSITY: DimensionVector = DimensionVector::si(0, 0, 0, 0, 0, 0, 1);
    pub const ANGLE: DimensionVector = DimensionVector::new([0, 0, 0, 0, 0, 0, 0, 1, 0]);
    pub const SOLID_ANGLE: DimensionVector = DimensionVector::new([0, 0, 0, 0, 0, 0, 0, 0, 1]);

    /// Area [m2]
    pub const AREA: DimensionVector = DimensionVector::si(0, 2, 0, 0, 0, 0, 0);

    /// Volume [m3]
    pub const VOLUME: DimensionVector = DimensionVector::si(0, 3, 0, 0, 0, 0, 0);

    /// Speed [m/s]
    pub const SPEED: DimensionVector = DimensionVector::si(0, 1, -1, 0, 0, 0, 0);

    /// Acceleration [m/s2]
    pub const ACCELERATION: DimensionVector = DimensionVector::si(0, 1, -2, 0, 0, 0, 0);

    /// Frequency [1/s]
    pub const FREQUENCY: DimensionVector = DimensionVector::si(0, 0, -1, 0, 0, 0, 0);

    /// Force [kgm/s2]
    pub const FORCE: DimensionVector = DimensionVector::si(1, 1, -2, 0, 0, 0, 0);

    /// Energy [kgm2/s2]
    pub const ENERGY: DimensionVector = DimensionVector::si(1, 2, -2, 0, 0, 0, 0);

    /// Power [kgm2/s3]
    pub const POWER: DimensionVector = DimensionVector::si(1, 2, -3, 0, 0, 0, 0);

    /// Pressure [kg/ms2]
    pub const PRESSURE: DimensionVector = DimensionVector::si(1, -1, -2, 0, 0, 0, 0);

    /// Electric charge [sA]
    pub const CHARGE: DimensionVector = DimensionVector::si(0, 0, 1, 1, 0, 0, 0);

    /// Electric potential [kgm2/s3A]
    pub const POTENTIAL: DimensionVector = DimensionVector::si(1, 2, -3, -1, 0, 0, 0);

    /// Electric resistance [kgm2/s3A2]
    pub const RESISTANCE: DimensionVector = DimensionVector::si(1, 2, -3, -2, 0, 0, 0);

    /// Luminous flux [srcd]
    pub const LUMINOUS_FLUX: DimensionVector = DimensionVector::new([0, 0, 0, 0, 0, 0, 1, 0, 1]);

    /// Illuminance [srcd/m2]
    pub const ILLUMINANCE: DimensionVector = DimensionVector::new([0, -2, 0, 0, 0, 0, 1, 0, 1]);

    /// Create a dimension from all nine exponents
    /// (kg, m, s, A, K, mol, cd, rad, sr).
    pub const fn new(exponents: [i8; COMPONENTS]) -> Self {
        DimensionVector { exponents }
    }

    /// Create a dimension from the seven SI base exponents, without angles.
    pub const fn si(kg: i8, m: i8, s: i8, a: i8, k: i8, mol: i8, cd: i8) -> Self {
        DimensionVector {
            exponents: [kg, m, s, a, k, mol, cd, 0, 0],
        }
    }

    /// Copy of this dimension with the angle and solid-angle exponents replaced.
    pub const fn with_angles(self, rad: i8, sr: i8) -> Self {
        let mut exponents = self.exponents;
        exponents[index::ANGLE] = rad;
        exponents[index::SOLID_ANGLE] = sr;
        DimensionVector { exponents }
    }

    pub fn exponents(&self) -> [i8; COMPONENTS] {
        self.exponents
    }

    /// Exponent at `index` (see the [`index`] module)
    pub fn exponent(&self, index: usize) -> i8 {
        self.exponents[index]
    }

    /// Check if this is a dimensionless quantity
    pub fn is_dimensionless(&self) -> bool {
        self.exponents.iter().all(|&e| e == 0)
    }

    /// Multiply dimensions (add exponents)
    pub fn plus(&self, other: &DimensionVector) -> DimensionVector {
        self.zip_with(other, "plus", i8::checked_add)
    }

    /// Divide dimensions (subtract exponents)
    pub fn minus(&self, other: &DimensionVector) -> DimensionVector {
        self.zip_with(other, "minus", i8::checked_sub)
    }

    /// [`plus`](Self::plus) that reports overflow instead of panicking
    pub fn checked_plus(&self, other: &DimensionVector) -> Option<DimensionVector> {
        self.checked_zip(other, i8::checked_add)
    }

    /// [`minus`](Self::minus) that reports overflow instead of panicking
    pub fn checked_minus(&self, other: &DimensionVector) -> Option<DimensionVector> {
        self.checked_zip(other, i8::checked_sub)
    }

    /// Invert dimensions (negate exponents)
    pub fn negate(&self) -> DimensionVector {
        self.map(|e| e.checked_neg(), "negate")
    }

    /// Raise to integer power (multiply exponents)
    pub fn pow(&self, exp: i8) -> DimensionVector {
        self.map(|e| e.checked_mul(exp), "pow")
    }

    /// Render the dimension in the given format.
    pub fn to_canonical_string(&self, format: &DimensionFormat<'_>) -> String {
        let mut numerator = Vec::new();
        let mut denominator = Vec::new();

        for &i in RENDER_ORDER.iter() {
            if !format.include_angles && i >= SI_BASE_COMPONENTS {
                continue;
            }
            let exp = self.exponents[i];
            if exp == 0 {
                continue;
            }
            if format.divided && exp < 0 {
                denominator.push(render_term(SYMBOLS[i], -i32::from(exp), format.power_prefix));
            } else {
                numerator.push(render_term(SYMBOLS[i], i32::from(exp), format.power_prefix));
            }
        }

        let numerator = if numerator.is_empty() {
            "1".to_string()
        } else {
            numerator.join(format.separator)
        };

        if denominator.is_empty() {
            numerator
        } else {
            format!("{}/{}", numerator, denominator.join(format.separator))
        }
    }

    // Exponent overflow is a programming error: real dimensions stay within a
    // few tens.
    fn zip_with(
        &self,
        other: &DimensionVector,
        op_name: &str,
        op: fn(i8, i8) -> Option<i8>,
    ) -> DimensionVector {
        let mut result = [0i8; COMPONENTS];
        for (i, slot) in result.iter_mut().enumerate() {
            *slot = op(self.exponents[i], other.exponents[i]).unwrap_or_else(|| {
                panic!(
                    "dimension exponent overflow in {}({}, {}) at {}",
                    op_name, self, other, SYMBOLS[i]
                )
            });
        }
        DimensionVector { exponents: result }
    }

    fn checked_zip(
        &self,
        other: &DimensionVector,
        op: fn(i8, i8) -> Option<i8>,
    ) -> Option<DimensionVector> {
        let mut result = [0i8; COMPONENTS];
        for (i, slot) in result.iter_mut().enumerate() {
            *slot = op(self.exponents[i], other.exponents[i])?;
        }
        Some(DimensionVector { exponents: result })
    }

    fn map(&self, op: impl Fn(i8) -> Option<i8>, op_name: &str) -> DimensionVector {
        let mut result = [0i8; COMPONENTS];
        for (i, slot) in result.iter_mut().enumerate() {
            *slot = op(self.exponents[i]).unwrap_or_else(|| {
                panic!("dimension exponent overflow in {}({}) at {}", op_name, self, SYMBOLS[i])
            });
        }
        DimensionVector { exponents: result }
    }
}

fn render_term(symbol: &str, exp: i32, power_prefix: &str) -> String {
    if exp == 1 {
        symbol.to_string()
    } else {
        format!("{}{}{}", symbol, power_prefix, exp)
    }
}

/// Options for rendering a [`DimensionVector`] as text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DimensionFormat<'a> {
    /// Render the rad and sr exponents
    pub include_angles: bool,
    /// Put negative exponents behind a single '/' instead of writing them negative
    pub divided: bool,
    /// Text placed between base symbols
    pub separator: &'a str,
    /// Text placed between a symbol and its exponent
    pub power_prefix: &'a str,
}

impl DimensionFormat<'static> {
    /// Stable registry/debugging form, e.g. `kgm/s2` for force
    pub const CANONICAL: DimensionFormat<'static> = DimensionFormat {
        include_angles: true,
        divided: true,
        separator: "",
        power_prefix: "",
    };

    /// Synthesized SI unit string, e.g. `kg.m/s2` for force
    pub const SI_UNIT: DimensionFormat<'static> = DimensionFormat {
        include_angles: true,
        divided: true,
        separator: ".",
        power_prefix: "",
    };

    /// Exponent form for diagnostics, e.g. `kg m s^-2` for force
    pub const EXPONENTIAL: DimensionFormat<'static> = DimensionFormat {
        include_angles: true,
        divided: false,
        separator: " ",
        power_prefix: "^",
    };
}

impl Default for DimensionFormat<'static> {
    fn default() -> Self {
        DimensionFormat::CANONICAL
    }
}

impl fmt::Display for DimensionVector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_canonical_string(&DimensionFormat::CANONICAL))
    }
}

impl Default for DimensionVector {
    fn default() -> Self {
        Self::DIMENSIONLESS
    }
}

impl Add for DimensionVector {
    type Output = DimensionVector;

    fn add(self, rhs: DimensionVector) -> DimensionVector {
        self.plus(&rhs)
    }
}

impl Sub for DimensionVector {
    type Output = DimensionVector;

    fn sub(self, rhs: DimensionVector) -> DimensionVector {
        self.minus(&rhs)
    }
}

impl Neg for DimensionVector {
    type Output = DimensionVector;

    fn neg(self) -> DimensionVector {
        self.negate()
    }
}

/// Parses the renderings produced by [`DimensionVector::to_canonical_string`]
/// (`kgm/s2`, `kg.m/s2`, `kg m s^-2`). Terms may be separated by `.`, `·`,
/// `*` or spaces, and a single parenthesized denominator is accepted.
impl FromStr for DimensionVector {
    type Err = UnitError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let input = s.trim();
        if input.is_empty() || input == "1" {
            return Ok(DimensionVector::DIMENSIONLESS);
        }

        let mut exponents = [0i8; COMPONENTS];
        let mut parts = input.splitn(2, '/');
        let numerator = parts.next().unwrap_or("");
        parse_terms(input, numerator, 1, &mut exponents)?;

        if let Some(denominator) = parts.next() {
            if denominator.contains('/') {
                return Err(syntax_error(input, "more than one '/'"));
            }
            if denominator.trim().is_empty() {
                return Err(syntax_error(input, "empty denominator"));
            }
            parse_terms(input, denominator, -1, &mut exponents)?;
        }

        let limit = MAX_PARSED_EXPONENT.unsigned_abs();
        if let Some(i) = exponents.iter().position(|e| e.unsigned_abs() > limit) {
            return Err(syntax_error(
                input,
                format!(
                    "exponent {} of {} is outside -{max}..={max}",
                    exponents[i],
                    SYMBOLS[i],
                    max = MAX_PARSED_EXPONENT
                ),
            ));
        }

        Ok(DimensionVector { exponents })
    }
}

fn syntax_error(input: &str, reason: impl Into<String>) -> UnitError {
    UnitError::DimensionSyntax {
        input: input.to_string(),
        reason: reason.into(),
    }
}

fn is_separator(c: char) -> bool {
    matches!(c, '.' | '·' | '*' | ' ')
}

fn parse_terms(
    input: &str,
    part: &str,
    sign: i8,
    exponents: &mut [i8; COMPONENTS],
) -> Result<(), UnitError> {
    let part = part.trim().trim_start_matches('(').trim_end_matches(')');
    if part == "1" {
        return Ok(());
    }

    let mut rest = part;
    loop {
        rest = rest.trim_start_matches(is_separator);
        if rest.is_empty() {
            return Ok(());
        }

        let (index, symbol) = PARSE_ORDER
            .iter()
            .find(|(_, symbol)| rest.starts_with(symbol))
            .ok_or_else(|| syntax_error(input, format!("unknown base symbol at '{}'", rest)))?;
        rest = &rest[symbol.len()..];
        rest = rest.strip_prefix('^').unwrap_or(rest);

        let digits = rest
            .char_indices()
            .take_while(|&(i, c)| c.is_ascii_digit() || (i == 0 && c == '-'))
            .count();
        let exponent: i8 = if digits == 0 {
            1
        } else {
            rest[..digits]
                .parse()
                .map_err(|_| syntax_error(input, format!("invalid exponent '{}'", &rest[..digits])))?
        };
        rest = &rest[digits..];

        exponents[*index] = sign
            .checked_mul(exponent)
            .and_then(|e| exponents[*index].checked_add(e))
            .ok_or_else(|| syntax_error(input, "exponent out of range"))?;
    }
}
