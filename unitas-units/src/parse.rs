//! Value parsing - "<number><optional space><unit token>"

use unitas_core::{DimensionVector, UnitError};

use crate::{Measure, Scalar, UnitRegistry};

/// Parse a value of `quantity` such as "5 km", "-3.2e3m" or "20 degC".
///
/// The token is resolved against the quantity's abbreviations. Failures
/// name the offending token and the quantity.
pub fn parse_measure(registry: &UnitRegistry, quantity: &str, text: &str) -> Result<Measure, UnitError> {
    let (value, token) = split_number(text).ok_or_else(|| parse_error(text, quantity, text.trim()))?;
    let unit = registry.resolve_abbreviation(quantity, token).map_err(|err| match err {
        UnitError::UnitNotFound { .. } => parse_error(text, quantity, token),
        other => other,
    })?;
    Ok(Measure::new(value, unit))
}

/// Parse a value in SI base units such as "5 kg.m/s2" or "2 1/s".
///
/// The result is named when a quantity claims the dimension.
pub fn parse_scalar(registry: &UnitRegistry, text: &str) -> Result<Scalar, UnitError> {
    let (value, token) = split_number(text).ok_or_else(|| parse_error(text, "SI", text.trim()))?;
    let dimension = if token.is_empty() {
        DimensionVector::DIMENSIONLESS
    } else {
        token.parse::<DimensionVector>()?
    };
    Ok(registry.resolver().resolve(dimension, value))
}

/// Parse a conversion request like "km->mi", "C→F" or "ft to m"
pub fn parse_conversion(text: &str) -> Option<(&str, &str)> {
    ["->", "→", " to ", " in "].iter().find_map(|separator| {
        let (from, to) = text.split_once(separator)?;
        let (from, to) = (from.trim(), to.trim());
        if from.is_empty() || to.is_empty() || to.contains(separator) {
            None
        } else {
            Some((from, to))
        }
    })
}

/// Split leading number from the rest; the rest is trimmed.
pub(crate) fn split_number(text: &str) -> Option<(f64, &str)> {
    let text = text.trim();
    let bytes = text.as_bytes();
    let mut end = 0;

    if matches!(bytes.first(), Some(b'+' | b'-')) {
        end += 1;
    }
    let mantissa_start = end;
    while end < bytes.len() && (bytes[end].is_ascii_digit() || bytes[end] == b'.') {
        end += 1;
    }
    if !bytes[mantissa_start..end].iter().any(u8::is_ascii_digit) {
        return None;
    }

    // 'e' starts an exponent only when digits follow: "2eV" is 2 electronvolts
    if matches!(bytes.get(end), Some(b'e' | b'E')) {
        let mut exp_end = end + 1;
        if matches!(bytes.get(exp_end), Some(b'+' | b'-')) {
            exp_end += 1;
        }
        if bytes.get(exp_end).is_some_and(u8::is_ascii_digit) {
            while exp_end < bytes.len() && bytes[exp_end].is_ascii_digit() {
                exp_end += 1;
            }
            end = exp_end;
        }
    }

    let value = text[..end].parse::<f64>().ok()?;
    Some((value, text[end..].trim()))
}

fn parse_error(input: &str, quantity: &str, token: &str) -> UnitError {
    UnitError::Parse {
        input: input.to_string(),
        quantity: quantity.to_string(),
        token: token.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use unitas_core::codes;

    #[test]
    fn test_split_number() {
        assert_eq!(split_number("5 m"), Some((5.0, "m")));
        assert_eq!(split_number("100kg"), Some((100.0, "kg")));
        assert_eq!(split_number("-3.14 rad"), Some((-3.14, "rad")));
        assert_eq!(split_number("1.5e3 m"), Some((1500.0, "m")));
        assert_eq!(split_number("2e-3s"), Some((0.002, "s")));
        assert_eq!(split_number("2eV"), Some((2.0, "eV")));
        assert_eq!(split_number(".5 L"), Some((0.5, "L")));
        assert_eq!(split_number("42"), Some((42.0, "")));
        assert_eq!(split_number("m"), None);
        assert_eq!(split_number("-"), None);
        assert_eq!(split_number("1.2.3 m"), None);
    }

    #[test]
    fn test_parse_measure() {
        let registry = UnitRegistry::with_builtin();
        let m = parse_measure(&registry, "Length", "5 km").unwrap();
        assert_eq!(m.value(), 5.0);
        assert_eq!(m.unit().key(), "km");

        let e = parse_measure(&registry, "Energy", "2eV").unwrap();
        assert_eq!(e.unit().key(), "eV");
    }

    #[test]
    fn test_parse_measure_unknown_token() {
        let registry = UnitRegistry::with_builtin();
        let err = parse_measure(&registry, "Volume", "3 fl.oz(UK)").unwrap_err();
        assert_eq!(err.code(), codes::PARSE_ERROR);
        assert_eq!(
            err,
            UnitError::Parse {
                input: "3 fl.oz(UK)".to_string(),
                quantity: "Volume".to_string(),
                token: "fl.oz(UK)".to_string(),
            }
        );

        let err = parse_measure(&registry, "Nope", "3 m").unwrap_err();
        assert_eq!(err.code(), codes::QUANTITY_NOT_FOUND);
    }

    #[test]
    fn test_parse_scalar() {
        let registry = UnitRegistry::with_builtin();
        let force = parse_scalar(&registry, "5 kg.m/s2").unwrap();
        assert_eq!(force.quantity_name(), Some("Force"));
        assert_eq!(force.si(), 5.0);

        let raw = parse_scalar(&registry, "2 s2").unwrap();
        assert!(raw.is_raw());

        let err = parse_scalar(&registry, "2 furlong").unwrap_err();
        assert_eq!(err.code(), codes::DIMENSION_SYNTAX);
    }

    #[test]
    fn test_parse_conversion() {
        assert_eq!(parse_conversion("km->mi"), Some(("km", "mi")));
        assert_eq!(parse_conversion("degC→degF"), Some(("degC", "degF")));
        assert_eq!(parse_conversion("ft to m"), Some(("ft", "m")));
        assert_eq!(parse_conversion("km"), None);
    }
}
