//! Quantities and their unit catalogues

use std::collections::BTreeMap;
use std::fmt;
use std::sync::{Arc, PoisonError, RwLock};

use tracing::debug;
use unitas_core::{DimensionVector, SiPrefix, UnitError};

use crate::{Unit, UnitOrigin};

/// A named physical quantity with its registered units.
///
/// The unit map is copy-on-write: readers get a stable `Arc` snapshot,
/// writers swap in a new map under the lock.
pub struct Quantity {
    name: String,
    dimension: DimensionVector,
    relative: Option<Arc<Quantity>>,
    standard: Unit,
    units: RwLock<Arc<BTreeMap<String, Unit>>>,
}

impl Quantity {
    pub(crate) fn new(
        name: &str,
        dimension: DimensionVector,
        relative: Option<Arc<Quantity>>,
        standard: Unit,
    ) -> Self {
        let mut units = BTreeMap::new();
        units.insert(standard.key().to_string(), standard.clone());
        Quantity {
            name: name.to_string(),
            dimension,
            relative,
            standard,
            units: RwLock::new(Arc::new(units)),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn dimension(&self) -> DimensionVector {
        self.dimension
    }

    /// Paired relative quantity of an absolute quantity (Time -> Duration)
    pub fn relative(&self) -> Option<&Arc<Quantity>> {
        self.relative.as_ref()
    }

    pub fn is_absolute(&self) -> bool {
        self.relative.is_some()
    }

    /// The SI unit with scale factor 1
    pub fn standard_unit(&self) -> &Unit {
        &self.standard
    }

    /// Snapshot of the registered units, keyed by unit key
    pub fn units(&self) -> Arc<BTreeMap<String, Unit>> {
        Arc::clone(&self.units.read().unwrap_or_else(PoisonError::into_inner))
    }

    pub fn unit(&self, key: &str) -> Option<Unit> {
        self.units().get(key).cloned()
    }

    pub fn len(&self) -> usize {
        self.units().len()
    }

    pub fn is_empty(&self) -> bool {
        self.units().is_empty()
    }

    /// Match `token` against every unit's abbreviation set.
    ///
    /// Exact matches win. Otherwise a generated prefixed unit also answers to
    /// other spellings of its prefix, so "um" and "µm" find "μm".
    pub fn resolve_abbreviation(&self, token: &str) -> Option<Unit> {
        let units = self.units();
        if let Some(unit) = units.get(token) {
            return Some(unit.clone());
        }
        units
            .values()
            .find(|u| u.abbreviations().iter().any(|a| a == token))
            .or_else(|| resolve_prefixed(&units, token))
            .cloned()
    }

    /// Register a unit.
    ///
    /// A unit with an existing key replaces it. A generated unit never
    /// displaces an explicit one and is skipped instead (returns `Ok(false)`);
    /// an explicit unit evicts generated units it collides with.
    pub(crate) fn insert(&self, unit: Unit) -> Result<bool, UnitError> {
        self.check_member(&unit)?;
        if unit.key() == self.standard.key() && unit.is_generated() {
            return Ok(false);
        }
        if unit.key() == self.standard.key() && unit != self.standard {
            return Err(UnitError::invalid_operand(format!(
                "cannot replace standard unit '{}' of {}",
                unit.key(),
                self.name
            )));
        }

        let mut guard = self.units.write().unwrap_or_else(PoisonError::into_inner);
        let mut evicted = Vec::new();
        for existing in guard.values() {
            let same_key = existing.key() == unit.key();
            let shared = if same_key {
                None
            } else {
                shared_abbreviation(existing, &unit)
            };
            if !same_key && shared.is_none() {
                continue;
            }
            if unit.is_generated() && !existing.is_generated() {
                debug!(
                    quantity = %self.name,
                    unit = unit.key(),
                    collides_with = existing.key(),
                    "skipping generated unit"
                );
                return Ok(false);
            }
            if let Some(abbreviation) = shared {
                if existing.is_generated() {
                    evicted.push(existing.key().to_string());
                } else {
                    return Err(UnitError::DuplicateAbbreviation {
                        quantity: self.name.clone(),
                        abbreviation: abbreviation.to_string(),
                        existing_key: existing.key().to_string(),
                    });
                }
            }
        }

        let mut next = BTreeMap::clone(&guard);
        for key in &evicted {
            next.remove(key);
            debug!(quantity = %self.name, unit = %key, "evicted generated unit");
        }
        next.insert(unit.key().to_string(), unit);
        *guard = Arc::new(next);
        Ok(true)
    }

    /// Unregister a unit. The standard unit cannot be removed.
    pub(crate) fn remove(&self, key: &str) -> Result<Unit, UnitError> {
        if key == self.standard.key() {
            return Err(UnitError::invalid_operand(format!(
                "cannot remove standard unit '{}' of {}",
                key, self.name
            )));
        }
        let mut guard = self.units.write().unwrap_or_else(PoisonError::into_inner);
        let mut next = BTreeMap::clone(&guard);
        let removed = next
            .remove(key)
            .ok_or_else(|| UnitError::unit_not_found(key, &self.name))?;
        *guard = Arc::new(next);
        Ok(removed)
    }

    fn check_member(&self, unit: &Unit) -> Result<(), UnitError> {
        if unit.quantity_name() != self.name {
            return Err(UnitError::invalid_operand(format!(
                "unit '{}' belongs to {}, not {}",
                unit.key(),
                unit.quantity_name(),
                self.name
            )));
        }
        if unit.dimension() != self.dimension {
            return Err(UnitError::mismatch(
                format!("{} [{}]", self.name, self.dimension),
                unit.describe(),
            ));
        }
        if unit.is_absolute() != self.is_absolute() {
            return Err(UnitError::invalid_operand(format!(
                "unit '{}' is {} but quantity {} is {}",
                unit.key(),
                absoluteness(unit.is_absolute()),
                self.name,
                absoluteness(self.is_absolute())
            )));
        }
        Ok(())
    }
}

fn absoluteness(absolute: bool) -> &'static str {
    if absolute {
        "absolute"
    } else {
        "relative"
    }
}

fn resolve_prefixed<'u>(units: &'u BTreeMap<String, Unit>, token: &str) -> Option<&'u Unit> {
    // prefixes are one or two characters long
    token.char_indices().skip(1).take(2).find_map(|(split, _)| {
        let (head, tail) = token.split_at(split);
        let prefix = SiPrefix::by_abbreviation(head).or_else(|| SiPrefix::by_key(head))?;
        units.values().find(|unit| match unit.origin() {
            UnitOrigin::Generated { base_key, prefix: p } => {
                *p == prefix
                    && units
                        .get(base_key)
                        .is_some_and(|base| base.abbreviations().iter().any(|a| a == tail))
            }
            _ => false,
        })
    })
}

fn shared_abbreviation<'a>(existing: &Unit, incoming: &'a Unit) -> Option<&'a str> {
    incoming
        .abbreviations()
        .iter()
        .find(|a| existing.abbreviations().contains(a))
        .map(String::as_str)
}

impl fmt::Debug for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Quantity")
            .field("name", &self.name)
            .field("dimension", &self.dimension)
            .field("relative", &self.relative.as_ref().map(|q| q.name()))
            .field("standard", &self.standard.key())
            .field("units", &self.len())
            .finish()
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}
