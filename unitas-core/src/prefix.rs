//! SI magnitude prefixes

use serde::{Deserialize, Serialize};

/// A standard SI prefix such as kilo (10^3) or micro (10^-6).
///
/// `key` is the ASCII spelling used inside unit keys ("mu" for micro),
/// `abbreviation` the display spelling ("μ").
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SiPrefix {
    key: &'static str,
    abbreviation: &'static str,
    name: &'static str,
    exponent: i32,
}

impl SiPrefix {
    pub const QUETTA: SiPrefix = SiPrefix::new("Q", "Q", "quetta", 30);
    pub const RONNA: SiPrefix = SiPrefix::new("R", "R", "ronna", 27);
    pub const YOTTA: SiPrefix = SiPrefix::new("Y", "Y", "yotta", 24);
    pub const ZETTA: SiPrefix = SiPrefix::new("Z", "Z", "zetta", 21);
    pub const EXA: SiPrefix = SiPrefix::new("E", "E", "exa", 18);
    pub const PETA: SiPrefix = SiPrefix::new("P", "P", "peta", 15);
    pub const TERA: SiPrefix = SiPrefix::new("T", "T", "tera", 12);
    pub const GIGA: SiPrefix = SiPrefix::new("G", "G", "giga", 9);
    pub const MEGA: SiPrefix = SiPrefix::new("M", "M", "mega", 6);
    pub const KILO: SiPrefix = SiPrefix::new("k", "k", "kilo", 3);
    pub const HECTO: SiPrefix = SiPrefix::new("h", "h", "hecto", 2);
    pub const DECA: SiPrefix = SiPrefix::new("da", "da", "deca", 1);
    pub const DECI: SiPrefix = SiPrefix::new("d", "d", "deci", -1);
    pub const CENTI: SiPrefix = SiPrefix::new("c", "c", "centi", -2);
    pub const MILLI: SiPrefix = SiPrefix::new("m", "m", "milli", -3);
    pub const MICRO: SiPrefix = SiPrefix::new("mu", "μ", "micro", -6);
    pub const NANO: SiPrefix = SiPrefix::new("n", "n", "nano", -9);
    pub const PICO: SiPrefix = SiPrefix::new("p", "p", "pico", -12);
    pub const FEMTO: SiPrefix = SiPrefix::new("f", "f", "femto", -15);
    pub const ATTO: SiPrefix = SiPrefix::new("a", "a", "atto", -18);
    pub const ZEPTO: SiPrefix = SiPrefix::new("z", "z", "zepto", -21);
    pub const YOCTO: SiPrefix = SiPrefix::new("y", "y", "yocto", -24);
    pub const RONTO: SiPrefix = SiPrefix::new("r", "r", "ronto", -27);
    pub const QUECTO: SiPrefix = SiPrefix::new("q", "q", "quecto", -30);

    /// All prefixes, largest first
    pub const ALL: [SiPrefix; 24] = [
        SiPrefix::QUETTA,
        SiPrefix::RONNA,
        SiPrefix::YOTTA,
        SiPrefix::ZETTA,
        SiPrefix::EXA,
        SiPrefix::PETA,
        SiPrefix::TERA,
        SiPrefix::GIGA,
        SiPrefix::MEGA,
        SiPrefix::KILO,
        SiPrefix::HECTO,
        SiPrefix::DECA,
        SiPrefix::DECI,
        SiPrefix::CENTI,
        SiPrefix::MILLI,
        SiPrefix::MICRO,
        SiPrefix::NANO,
        SiPrefix::PICO,
        SiPrefix::FEMTO,
        SiPrefix::ATTO,
        SiPrefix::ZEPTO,
        SiPrefix::YOCTO,
        SiPrefix::RONTO,
        SiPrefix::QUECTO,
    ];

    const fn new(
        key: &'static str,
        abbreviation: &'static str,
        name: &'static str,
        exponent: i32,
    ) -> Self {
        SiPrefix {
            key,
            abbreviation,
            name,
            exponent,
        }
    }

    pub fn key(&self) -> &'static str {
        self.key
    }

    pub fn abbreviation(&self) -> &'static str {
        self.abbreviation
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Power of ten
    pub fn exponent(&self) -> i32 {
        self.exponent
    }

    /// Multiplier, e.g. 1e3 for kilo
    pub fn factor(&self) -> f64 {
        // 1/10^n keeps 1e-3, 1e-6, ... exact
        if self.exponent >= 0 {
            10f64.powi(self.exponent)
        } else {
            1.0 / 10f64.powi(-self.exponent)
        }
    }

    /// Look up a prefix by its ASCII key ("k", "mu", "da")
    pub fn by_key(key: &str) -> Option<SiPrefix> {
        Self::ALL.iter().copied().find(|p| p.key == key)
    }

    /// Look up a prefix by its display abbreviation; "u" is accepted for micro.
    pub fn by_abbreviation(abbreviation: &str) -> Option<SiPrefix> {
        if abbreviation == "u" || abbreviation == "µ" {
            return Some(SiPrefix::MICRO);
        }
        Self::ALL.iter().copied().find(|p| p.abbreviation == abbreviation)
    }
}

/// Which prefixed variants are generated when a unit is registered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SiPrefixes {
    /// No prefixed variants
    #[default]
    None,
    /// Prefixes apply to the unit itself: m -> km, mm, μm, ...
    Unit,
    /// The unit is already kilo-prefixed: kg -> g base -> mg, μg, Mg, ...
    Kilo,
    /// The unit is a reciprocal: /m -> /km, /mm, ...
    PerUnit,
}
