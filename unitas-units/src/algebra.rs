//! Dimensional algebra
//!
//! Multiplication and division work on canonical SI values. The result
//! dimension is looked up in the registry: a registered quantity yields a
//! [`Measure`] in its standard unit, anything else a raw [`SiScalar`] tagged
//! only by its dimension.

use std::fmt;

use serde::Serialize;
use tracing::trace;
use unitas_core::{DimensionFormat, DimensionVector, UnitError};

use crate::{Measure, UnitRegistry};

/// Anything that can take part in multiplication and division
pub trait Operand {
    fn dimension(&self) -> DimensionVector;

    /// Value in SI units; absolute values are rejected
    fn canonical_value(&self) -> Result<f64, UnitError>;

    /// Human-readable form for diagnostics
    fn describe(&self) -> String;
}

impl Operand for Measure {
    fn dimension(&self) -> DimensionVector {
        Measure::dimension(self)
    }

    fn canonical_value(&self) -> Result<f64, UnitError> {
        if self.is_absolute() {
            return Err(UnitError::invalid_operand(format!(
                "absolute value {} of {} cannot be multiplied or divided",
                self,
                self.quantity_name()
            )));
        }
        Ok(self.si())
    }

    fn describe(&self) -> String {
        format!("{} ({})", self, self.quantity_name())
    }
}

impl Operand for f64 {
    fn dimension(&self) -> DimensionVector {
        DimensionVector::DIMENSIONLESS
    }

    fn canonical_value(&self) -> Result<f64, UnitError> {
        Ok(*self)
    }

    fn describe(&self) -> String {
        self.to_string()
    }
}

/// A value in SI units with no named quantity
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SiScalar {
    pub value: f64,
    pub dimension: DimensionVector,
}

impl SiScalar {
    pub fn new(value: f64, dimension: DimensionVector) -> Self {
        SiScalar { value, dimension }
    }

    /// Synthesized SI unit string such as "kg.m/s2"
    pub fn unit_string(&self) -> String {
        self.dimension.to_canonical_string(&DimensionFormat::SI_UNIT)
    }
}

impl Operand for SiScalar {
    fn dimension(&self) -> DimensionVector {
        self.dimension
    }

    fn canonical_value(&self) -> Result<f64, UnitError> {
        Ok(self.value)
    }

    fn describe(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for SiScalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.dimension.is_dimensionless() {
            write!(f, "{}", self.value)
        } else {
            write!(f, "{} {}", self.value, self.unit_string())
        }
    }
}

/// Result of an algebra operation
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    /// The result dimension belongs to a registered quantity
    Named(Measure),
    /// No quantity claims the result dimension
    Raw(SiScalar),
}

impl Scalar {
    pub fn dimension(&self) -> DimensionVector {
        match self {
            Scalar::Named(m) => m.dimension(),
            Scalar::Raw(s) => s.dimension,
        }
    }

    /// Value in SI units
    pub fn si(&self) -> f64 {
        match self {
            Scalar::Named(m) => m.si(),
            Scalar::Raw(s) => s.value,
        }
    }

    pub fn quantity_name(&self) -> Option<&str> {
        match self {
            Scalar::Named(m) => Some(m.quantity_name()),
            Scalar::Raw(_) => None,
        }
    }

    pub fn as_measure(&self) -> Option<&Measure> {
        match self {
            Scalar::Named(m) => Some(m),
            Scalar::Raw(_) => None,
        }
    }

    pub fn is_raw(&self) -> bool {
        matches!(self, Scalar::Raw(_))
    }

    /// The result as a value of `expected`, or `DimensionMismatch`
    pub fn coerce(self, expected: &str) -> Result<Measure, UnitError> {
        match self {
            Scalar::Named(m) if m.quantity_name() == expected => Ok(m),
            Scalar::Named(m) => Err(UnitError::mismatch(expected, m.unit().describe())),
            Scalar::Raw(s) => Err(UnitError::mismatch(
                expected,
                format!("unnamed quantity [{}]", s.dimension),
            )),
        }
    }
}

impl Operand for Scalar {
    fn dimension(&self) -> DimensionVector {
        Scalar::dimension(self)
    }

    fn canonical_value(&self) -> Result<f64, UnitError> {
        match self {
            Scalar::Named(m) => m.canonical_value(),
            Scalar::Raw(s) => s.canonical_value(),
        }
    }

    fn describe(&self) -> String {
        match self {
            Scalar::Named(m) => m.describe(),
            Scalar::Raw(s) => s.describe(),
        }
    }
}

impl From<Measure> for Scalar {
    fn from(m: Measure) -> Self {
        Scalar::Named(m)
    }
}

impl From<SiScalar> for Scalar {
    fn from(s: SiScalar) -> Self {
        Scalar::Raw(s)
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::Named(m) => write!(f, "{}", m),
            Scalar::Raw(s) => write!(f, "{}", s),
        }
    }
}

/// Resolves products and quotients against a registry
#[derive(Debug, Clone, Copy)]
pub struct Resolver<'r> {
    registry: &'r UnitRegistry,
}

impl<'r> Resolver<'r> {
    pub fn new(registry: &'r UnitRegistry) -> Self {
        Resolver { registry }
    }

    pub fn multiply<A, B>(&self, lhs: &A, rhs: &B) -> Result<Scalar, UnitError>
    where
        A: Operand + ?Sized,
        B: Operand + ?Sized,
    {
        let value = lhs.canonical_value()? * rhs.canonical_value()?;
        let dimension = lhs
            .dimension()
            .checked_plus(&rhs.dimension())
            .ok_or_else(|| overflow("multiply", lhs, rhs))?;
        trace!(lhs = %lhs.describe(), rhs = %rhs.describe(), %dimension, "multiply");
        Ok(self.resolve(dimension, value))
    }

    pub fn divide<A, B>(&self, lhs: &A, rhs: &B) -> Result<Scalar, UnitError>
    where
        A: Operand + ?Sized,
        B: Operand + ?Sized,
    {
        let value = lhs.canonical_value()? / rhs.canonical_value()?;
        let dimension = lhs
            .dimension()
            .checked_minus(&rhs.dimension())
            .ok_or_else(|| overflow("divide", lhs, rhs))?;
        trace!(lhs = %lhs.describe(), rhs = %rhs.describe(), %dimension, "divide");
        Ok(self.resolve(dimension, value))
    }

    /// Dimensionless 1 divided by `operand`
    pub fn reciprocal<A>(&self, operand: &A) -> Result<Scalar, UnitError>
    where
        A: Operand + ?Sized,
    {
        self.divide(&1.0_f64, operand)
    }

    /// Product that must belong to the quantity named `expected`
    pub fn multiply_as<A, B>(&self, lhs: &A, rhs: &B, expected: &str) -> Result<Measure, UnitError>
    where
        A: Operand + ?Sized,
        B: Operand + ?Sized,
    {
        self.multiply(lhs, rhs)?.coerce(expected)
    }

    /// Quotient that must belong to the quantity named `expected`
    pub fn divide_as<A, B>(&self, lhs: &A, rhs: &B, expected: &str) -> Result<Measure, UnitError>
    where
        A: Operand + ?Sized,
        B: Operand + ?Sized,
    {
        self.divide(lhs, rhs)?.coerce(expected)
    }

    /// Wrap an SI value of `dimension` in the quantity that claims it
    pub fn resolve(&self, dimension: DimensionVector, value: f64) -> Scalar {
        match self.registry.lookup_by_dimension(dimension) {
            Some(quantity) => {
                trace!(quantity = quantity.name(), "resolved");
                Scalar::Named(Measure::new(value, quantity.standard_unit().clone()))
            }
            None => Scalar::Raw(SiScalar::new(value, dimension)),
        }
    }
}

fn overflow<A, B>(op: &str, lhs: &A, rhs: &B) -> UnitError
where
    A: Operand + ?Sized,
    B: Operand + ?Sized,
{
    UnitError::invalid_operand(format!(
        "dimension exponent overflow in {} of {} and {}",
        op,
        lhs.describe(),
        rhs.describe()
    ))
}
