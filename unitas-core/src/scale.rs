//! Scales: conversion between a unit's local value and the canonical SI value

use serde::{Deserialize, Serialize};

use crate::UnitError;

/// Conversion rule between a unit and its quantity's standard unit.
///
/// `Linear` covers almost every unit. `OffsetLinear` is reserved for
/// quantities whose zero point is not physically absolute (temperature,
/// clock time, position, direction).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Scale {
    /// value_si = value * factor
    Linear { factor: f64 },
    /// value_si = value * factor + offset
    OffsetLinear { factor: f64, offset: f64 },
}

impl Scale {
    /// Scale of a standard unit
    pub const IDENTITY: Scale = Scale::Linear { factor: 1.0 };

    /// Multiplicative scale; the factor must be finite and strictly positive.
    pub fn linear(factor: f64) -> Result<Self, UnitError> {
        Ok(Scale::Linear {
            factor: check_factor(factor)?,
        })
    }

    /// Offset-affine scale; the factor must be finite and strictly positive,
    /// the offset finite.
    pub fn offset_linear(factor: f64, offset: f64) -> Result<Self, UnitError> {
        Ok(Scale::OffsetLinear {
            factor: check_factor(factor)?,
            offset: check_offset(offset)?,
        })
    }

    /// Convert a value from the unit to the standard unit
    pub fn to_standard(&self, value: f64) -> f64 {
        match *self {
            Scale::Linear { factor } => value * factor,
            Scale::OffsetLinear { factor, offset } => value * factor + offset,
        }
    }

    /// Convert a value from the standard unit to the unit
    pub fn from_standard(&self, value: f64) -> f64 {
        match *self {
            Scale::Linear { factor } => value / factor,
            Scale::OffsetLinear { factor, offset } => (value - offset) / factor,
        }
    }

    pub fn factor(&self) -> f64 {
        match *self {
            Scale::Linear { factor } | Scale::OffsetLinear { factor, .. } => factor,
        }
    }

    /// Additive offset; zero for linear scales
    pub fn offset(&self) -> f64 {
        match *self {
            Scale::Linear { .. } => 0.0,
            Scale::OffsetLinear { offset, .. } => offset,
        }
    }

    pub fn is_linear(&self) -> bool {
        matches!(self, Scale::Linear { .. })
    }

    pub fn is_offset(&self) -> bool {
        matches!(self, Scale::OffsetLinear { .. })
    }

    /// True for the scale of a standard unit (factor 1, no offset)
    pub fn is_base_scale(&self) -> bool {
        self.factor() == 1.0 && self.offset() == 0.0
    }

    /// The same kind of scale with its factor multiplied by `factor`.
    ///
    /// The offset, if any, is kept: one local unit of the result is `factor`
    /// local units of `self`, measured from the same origin.
    pub fn rescaled(&self, factor: f64) -> Result<Scale, UnitError> {
        let factor = check_factor(factor)?;
        let combined = check_factor(self.factor() * factor)?;
        Ok(match *self {
            Scale::Linear { .. } => Scale::Linear { factor: combined },
            Scale::OffsetLinear { offset, .. } => Scale::OffsetLinear {
                factor: combined,
                offset,
            },
        })
    }

    /// Offset-linear scale for a unit whose local value `u` equals
    /// `u * factor + offset` in the unit described by `self`.
    pub fn compose_offset(&self, factor: f64, offset: f64) -> Result<Scale, UnitError> {
        let factor = check_factor(factor)?;
        let offset = check_offset(offset)?;
        Scale::offset_linear(
            self.factor() * factor,
            self.factor() * offset + self.offset(),
        )
    }

    /// The same conversion expressed as an offset-linear scale
    pub fn as_offset(&self) -> Scale {
        Scale::OffsetLinear {
            factor: self.factor(),
            offset: self.offset(),
        }
    }
}

impl Default for Scale {
    fn default() -> Self {
        Scale::IDENTITY
    }
}

/// Validate a multiplicative factor
pub fn check_factor(factor: f64) -> Result<f64, UnitError> {
    if factor.is_nan() {
        return Err(UnitError::InvalidFactor {
            what: "factor",
            value: factor,
            reason: "factor is NaN",
        });
    }
    if factor.is_infinite() {
        return Err(UnitError::InvalidFactor {
            what: "factor",
            value: factor,
            reason: "factor must be finite",
        });
    }
    if factor <= 0.0 {
        return Err(UnitError::InvalidFactor {
            what: "factor",
            value: factor,
            reason: "factor must be strictly positive",
        });
    }
    Ok(factor)
}

/// Validate an additive offset
pub fn check_offset(offset: f64) -> Result<f64, UnitError> {
    if !offset.is_finite() {
        return Err(UnitError::InvalidFactor {
            what: "offset",
            value: offset,
            reason: "offset must be finite",
        });
    }
    Ok(offset)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_linear_round_trip() {
        let km = Scale::linear(1000.0).unwrap();
        assert_eq!(km.to_standard(5.0), 5000.0);
        assert_eq!(km.from_standard(5000.0), 5.0);
        assert!(km.is_linear());
        assert!(!km.is_base_scale());
        assert!(Scale::IDENTITY.is_base_scale());
    }

    #[test]
    fn test_offset_linear() {
        let celsius = Scale::offset_linear(1.0, 273.15).unwrap();
        assert_abs_diff_eq!(celsius.to_standard(100.0), 373.15, epsilon = 1e-12);
        assert_abs_diff_eq!(celsius.from_standard(273.15), 0.0, epsilon = 1e-12);

        let fahrenheit = Scale::offset_linear(5.0 / 9.0, 459.67 * 5.0 / 9.0).unwrap();
        assert_abs_diff_eq!(fahrenheit.to_standard(32.0), 273.15, epsilon = 1e-9);
        assert_abs_diff_eq!(fahrenheit.from_standard(373.15), 212.0, epsilon = 1e-9);
    }

    #[test]
    fn test_invalid_factors() {
        for bad in [0.0, -1.0, f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
            let err = Scale::linear(bad).unwrap_err();
            assert_eq!(err.code(), crate::codes::INVALID_FACTOR, "factor {}", bad);
        }
        assert!(Scale::offset_linear(1.0, f64::NAN).is_err());
        assert!(Scale::offset_linear(1.0, -459.67).is_ok());
    }

    #[test]
    fn test_rescaled() {
        let km = Scale::linear(1000.0).unwrap();
        let mm_from_km = km.rescaled(1e-6).unwrap();
        assert_abs_diff_eq!(mm_from_km.factor(), 1e-3, epsilon = 1e-15);
        assert!(km.rescaled(-2.0).is_err());
        assert!(km.rescaled(f64::MAX).is_err());
    }

    #[test]
    fn test_compose_offset() {
        // degree Rankine measured from absolute kelvin
        let kelvin = Scale::offset_linear(1.0, 0.0).unwrap();
        let rankine = kelvin.compose_offset(5.0 / 9.0, 0.0).unwrap();
        assert_abs_diff_eq!(rankine.to_standard(491.67), 273.15, epsilon = 1e-4);

        // degree Fahrenheit measured from degree Celsius: F = C * 9/5 + 32
        let celsius = Scale::offset_linear(1.0, 273.15).unwrap();
        let fahrenheit = celsius.compose_offset(5.0 / 9.0, -32.0 * 5.0 / 9.0).unwrap();
        assert_abs_diff_eq!(fahrenheit.to_standard(212.0), 373.15, epsilon = 1e-9);
    }

    #[test]
    fn test_serde_tagged() {
        let json = serde_json::to_string(&Scale::Linear { factor: 2.0 }).unwrap();
        assert_eq!(json, r#"{"kind":"linear","factor":2.0}"#);
    }
}
