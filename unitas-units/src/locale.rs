//! Localized unit text
//!
//! The registry is the source of truth for canonical abbreviations. A
//! [`LocaleCatalogue`] adds localized abbreviations, names and display
//! strings keyed by `unit.<Quantity>.<UnitKey>.<abbr|name|display>`, and a
//! [`Localizer`] resolves localized tokens back to canonical units.

use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::warn;
use unitas_core::UnitError;

use crate::parse::split_number;
use crate::{Measure, Unit, UnitRegistry};

const KEY_PREFIX: &str = "unit.";

/// Which text of a unit an entry localizes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextField {
    Abbr,
    Name,
    Display,
}

impl TextField {
    pub fn as_str(&self) -> &'static str {
        match self {
            TextField::Abbr => "abbr",
            TextField::Name => "name",
            TextField::Display => "display",
        }
    }
}

impl FromStr for TextField {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "abbr" => Ok(TextField::Abbr),
            "name" => Ok(TextField::Name),
            "display" => Ok(TextField::Display),
            _ => Err(()),
        }
    }
}

/// Parsed catalogue key.
///
/// The quantity ends at the first dot after the prefix and the field starts
/// after the last dot, so unit keys may contain dots ("fl.oz(US)").
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CatalogueKey {
    pub quantity: String,
    pub unit_key: String,
    pub field: TextField,
}

impl CatalogueKey {
    pub fn new(quantity: &str, unit_key: &str, field: TextField) -> Self {
        CatalogueKey {
            quantity: quantity.to_string(),
            unit_key: unit_key.to_string(),
            field,
        }
    }
}

impl FromStr for CatalogueKey {
    type Err = UnitError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = |reason: &str| UnitError::CatalogueValidation {
            key: s.to_string(),
            reason: reason.to_string(),
        };
        let rest = s
            .strip_prefix(KEY_PREFIX)
            .ok_or_else(|| invalid("key must start with 'unit.'"))?;
        let (quantity, rest) = rest
            .split_once('.')
            .ok_or_else(|| invalid("missing unit key"))?;
        let (unit_key, field) = rest
            .rsplit_once('.')
            .ok_or_else(|| invalid("missing text field"))?;
        let field = field
            .parse::<TextField>()
            .map_err(|_| invalid("text field must be abbr, name or display"))?;
        if quantity.is_empty() {
            return Err(invalid("empty quantity name"));
        }
        Ok(CatalogueKey::new(quantity, unit_key, field))
    }
}

impl fmt::Display for CatalogueKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{}.{}.{}",
            KEY_PREFIX,
            self.quantity,
            self.unit_key,
            self.field.as_str()
        )
    }
}

/// Source of localized text
pub trait LocaleText {
    fn text(&self, quantity: &str, unit_key: &str, field: TextField, locale: &str) -> Option<String>;
}

impl<F> LocaleText for F
where
    F: Fn(&str, &str, TextField, &str) -> Option<String>,
{
    fn text(&self, quantity: &str, unit_key: &str, field: TextField, locale: &str) -> Option<String> {
        self(quantity, unit_key, field, locale)
    }
}

/// In-memory catalogue: locale -> catalogue key -> text
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LocaleCatalogue {
    locales: BTreeMap<String, BTreeMap<String, String>>,
}

/// Outcome of [`LocaleCatalogue::validate`]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationReport {
    /// Entries checked against a registered quantity
    pub checked: usize,
    /// Keys skipped because their quantity is not registered
    pub skipped: Vec<String>,
}

impl LocaleCatalogue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, locale: &str, key: &CatalogueKey, text: &str) {
        self.locales
            .entry(locale.to_string())
            .or_default()
            .insert(key.to_string(), text.to_string());
    }

    /// Build from `(locale, key, text)` triples, rejecting malformed keys
    pub fn from_entries<'a, I>(entries: I) -> Result<Self, UnitError>
    where
        I: IntoIterator<Item = (&'a str, &'a str, &'a str)>,
    {
        let mut catalogue = LocaleCatalogue::new();
        for (locale, key, text) in entries {
            let key = key.parse::<CatalogueKey>()?;
            catalogue.insert(locale, &key, text);
        }
        Ok(catalogue)
    }

    pub fn locales(&self) -> impl Iterator<Item = &str> {
        self.locales.keys().map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.locales.values().all(BTreeMap::is_empty)
    }

    /// Check every entry against the registry.
    ///
    /// Entries for unregistered quantities are skipped with a warning.
    /// Malformed keys and unknown units of a registered quantity are errors.
    /// A localized abbreviation must name exactly one unit of its quantity
    /// in its locale.
    pub fn validate(&self, registry: &UnitRegistry) -> Result<ValidationReport, UnitError> {
        let mut report = ValidationReport::default();
        for (locale, entries) in &self.locales {
            let mut claimed: HashMap<(String, &str), String> = HashMap::new();
            for (raw_key, text) in entries {
                let key = raw_key.parse::<CatalogueKey>()?;
                let Some(quantity) = registry.lookup_by_name(&key.quantity) else {
                    warn!(locale = %locale, key = %raw_key, "skipping entry for unregistered quantity");
                    report.skipped.push(raw_key.clone());
                    continue;
                };
                let unit = quantity.unit(&key.unit_key).ok_or_else(|| {
                    UnitError::CatalogueValidation {
                        key: raw_key.clone(),
                        reason: format!("unknown unit '{}' for quantity {}", key.unit_key, key.quantity),
                    }
                })?;
                if key.field == TextField::Abbr {
                    if let Some(other) = quantity.resolve_abbreviation(text) {
                        if other != unit {
                            return Err(UnitError::CatalogueValidation {
                                key: raw_key.clone(),
                                reason: format!(
                                    "abbreviation '{}' already names unit '{}'",
                                    text,
                                    other.key()
                                ),
                            });
                        }
                    }
                    let owner = (key.quantity.clone(), text.as_str());
                    if let Some(first) = claimed.get(&owner) {
                        if *first != key.unit_key {
                            return Err(UnitError::CatalogueValidation {
                                key: raw_key.clone(),
                                reason: format!(
                                    "localized abbreviation '{}' is used by units '{}' and '{}'",
                                    text, first, key.unit_key
                                ),
                            });
                        }
                    }
                    claimed.insert(owner, key.unit_key.clone());
                }
                report.checked += 1;
            }
        }
        Ok(report)
    }
}

impl LocaleText for LocaleCatalogue {
    fn text(&self, quantity: &str, unit_key: &str, field: TextField, locale: &str) -> Option<String> {
        let key = CatalogueKey::new(quantity, unit_key, field).to_string();
        self.locales.get(locale)?.get(&key).cloned()
    }
}

/// Registry text bound to a localized text source and a locale.
///
/// Any [`LocaleText`] works as the source, including a plain closure.
/// Missing localized text falls back to the canonical text.
pub struct Localizer<'a, T: LocaleText + ?Sized = LocaleCatalogue> {
    registry: &'a UnitRegistry,
    text: &'a T,
    locale: String,
}

impl<'a, T: LocaleText + ?Sized> Localizer<'a, T> {
    pub fn new(registry: &'a UnitRegistry, text: &'a T, locale: &str) -> Self {
        Localizer {
            registry,
            text,
            locale: locale.to_string(),
        }
    }

    /// Localizer for the registry's configured default locale
    pub fn with_default_locale(registry: &'a UnitRegistry, text: &'a T) -> Self {
        let locale = registry.config().default_locale.clone();
        Localizer {
            registry,
            text,
            locale,
        }
    }

    pub fn locale(&self) -> &str {
        &self.locale
    }

    pub fn abbreviation(&self, unit: &Unit) -> String {
        self.localized(unit, TextField::Abbr)
            .unwrap_or_else(|| unit.default_abbreviation().to_string())
    }

    pub fn name(&self, unit: &Unit) -> String {
        self.localized(unit, TextField::Name)
            .unwrap_or_else(|| unit.name().to_string())
    }

    /// Display text; falls back to the localized abbreviation
    pub fn display(&self, unit: &Unit) -> String {
        self.localized(unit, TextField::Display)
            .unwrap_or_else(|| self.abbreviation(unit))
    }

    /// Unit for a localized token: localized abbreviations first, then the
    /// canonical abbreviations.
    ///
    /// A token that is the localized abbreviation of more than one unit is
    /// an error rather than a guess.
    pub fn resolve(&self, quantity: &str, token: &str) -> Result<Unit, UnitError> {
        let units = self.registry.units_of(quantity)?;
        let mut matches = units.values().filter(|unit| {
            self.localized(unit, TextField::Abbr).as_deref() == Some(token)
        });
        match (matches.next(), matches.next()) {
            (Some(unit), None) => Ok(unit.clone()),
            (Some(first), Some(second)) => Err(UnitError::CatalogueValidation {
                key: CatalogueKey::new(quantity, second.key(), TextField::Abbr).to_string(),
                reason: format!(
                    "localized abbreviation '{}' is used by units '{}' and '{}' in locale {}",
                    token,
                    first.key(),
                    second.key(),
                    self.locale
                ),
            }),
            (None, _) => self.registry.resolve_abbreviation(quantity, token),
        }
    }

    /// "5 km" with the localized display text
    pub fn format(&self, measure: &Measure) -> String {
        let text = self.display(measure.unit());
        if text.is_empty() {
            measure.value().to_string()
        } else {
            format!("{} {}", measure.value(), text)
        }
    }

    /// Parse "<number> <localized token>"
    pub fn parse(&self, quantity: &str, text: &str) -> Result<Measure, UnitError> {
        let parse_error = |token: &str| UnitError::Parse {
            input: text.to_string(),
            quantity: quantity.to_string(),
            token: token.to_string(),
        };
        let (value, token) = split_number(text).ok_or_else(|| parse_error(text.trim()))?;
        let unit = self.resolve(quantity, token).map_err(|err| match err {
            UnitError::UnitNotFound { .. } => parse_error(token),
            other => other,
        })?;
        Ok(Measure::new(value, unit))
    }

    fn localized(&self, unit: &Unit, field: TextField) -> Option<String> {
        self.text
            .text(unit.quantity_name(), unit.key(), field, &self.locale)
            .filter(|text| !text.is_empty())
    }
}
