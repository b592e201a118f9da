//! Unitas Units - Unit registry and dimensional algebra
//!
//! Values carry a physical unit and arithmetic between them is checked for
//! dimensional consistency: length times length yields area, force divided
//! by area yields pressure, incompatible combinations are rejected.
//!
//! - `UnitRegistry`: dimension -> quantity index and per-quantity unit catalogues
//! - `Unit`: scaled member of a quantity, derivable by factor, offset or SI prefix
//! - `Resolver`: multiplication and division with result-type lookup
//! - `Measure`: value with unit
//! - `Localizer`: localized unit text on top of the canonical abbreviations
//!
//! Built-in quantities:
//! - Base (Length, Mass, Duration, Temperature, ElectricalCurrent, ...)
//! - Geometry (Area, Volume, LinearDensity)
//! - Mechanics (Speed, Force, Energy, Power, Pressure, Frequency, ...)
//! - Electromagnetism (ElectricalCharge, ElectricalPotential, MagneticFlux, ...)
//! - Flow (Density, FlowVolume, FlowMass, CatalyticActivity)
//! - Photometry (LuminousFlux, Illuminance)
//! - Absolute (AbsoluteTemperature, Time, Position, Direction)

mod algebra;
mod builtin;
mod config;
mod locale;
mod measure;
mod parse;
mod quantity;
mod registry;
mod unit;

pub use algebra::{Operand, Resolver, Scalar, SiScalar};
pub use config::RegistryConfig;
pub use locale::{CatalogueKey, LocaleCatalogue, LocaleText, Localizer, TextField, ValidationReport};
pub use measure::Measure;
pub use parse::{parse_conversion, parse_measure, parse_scalar};
pub use quantity::Quantity;
pub use registry::{QuantitySummary, RegistrySnapshot, UnitRegistry, UnitSummary};
pub use unit::{Unit, UnitDef, UnitOrigin};

pub use unitas_core::{
    codes, DimensionFormat, DimensionVector, Scale, SiPrefix, SiPrefixes, UnitError, UnitSystem,
};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::{
        DimensionVector, Measure, Operand, Quantity, Scalar, SiPrefix, SiPrefixes, Unit, UnitDef,
        UnitError, UnitRegistry, UnitSystem,
    };
}
