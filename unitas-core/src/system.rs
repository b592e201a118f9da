//! Unit systems

use std::fmt;

use serde::{Deserialize, Serialize};

/// The system a unit belongs to. Informational only: conversion never
/// depends on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnitSystem {
    SiBase,
    SiDerived,
    SiAccepted,
    Mts,
    Cgs,
    CgsEsu,
    CgsEmu,
    Imperial,
    UsCustomary,
    Other,
}

impl UnitSystem {
    pub fn abbreviation(&self) -> &'static str {
        match self {
            UnitSystem::SiBase => "SI",
            UnitSystem::SiDerived => "SI",
            UnitSystem::SiAccepted => "SI-accepted",
            UnitSystem::Mts => "MTS",
            UnitSystem::Cgs => "CGS",
            UnitSystem::CgsEsu => "CGS-ESU",
            UnitSystem::CgsEmu => "CGS-EMU",
            UnitSystem::Imperial => "Imperial",
            UnitSystem::UsCustomary => "US",
            UnitSystem::Other => "other",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            UnitSystem::SiBase => "SI base unit",
            UnitSystem::SiDerived => "SI derived unit",
            UnitSystem::SiAccepted => "unit accepted for use with SI",
            UnitSystem::Mts => "metre-tonne-second system",
            UnitSystem::Cgs => "centimetre-gram-second system",
            UnitSystem::CgsEsu => "CGS electrostatic system",
            UnitSystem::CgsEmu => "CGS electromagnetic system",
            UnitSystem::Imperial => "Imperial system",
            UnitSystem::UsCustomary => "US customary system",
            UnitSystem::Other => "other system",
        }
    }

    pub fn is_si(&self) -> bool {
        matches!(self, UnitSystem::SiBase | UnitSystem::SiDerived)
    }
}

impl fmt::Display for UnitSystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.abbreviation())
    }
}
