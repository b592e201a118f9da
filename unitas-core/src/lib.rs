//! Unitas Core - Fundamental types
//!
//! This crate provides the building blocks of the unit engine:
//! - `DimensionVector`: exponents over the SI base dimensions plus angles
//! - `Scale`: linear and offset-linear conversion to the standard unit
//! - `SiPrefix`: the standard magnitude prefixes
//! - `UnitError`: the error taxonomy shared by every crate

mod dimension;
mod error;
mod prefix;
mod scale;
mod system;

pub use dimension::{
    index, DimensionFormat, DimensionVector, COMPONENTS, MAX_PARSED_EXPONENT, SI_BASE_COMPONENTS,
};
pub use error::{codes, UnitError};
pub use prefix::{SiPrefix, SiPrefixes};
pub use scale::{check_factor, check_offset, Scale};
pub use system::UnitSystem;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::{DimensionVector, Scale, SiPrefix, SiPrefixes, UnitError, UnitSystem};
}
