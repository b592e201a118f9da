//! Quantity registry
//!
//! Maps every dimension vector to exactly one relative quantity and every
//! quantity name to its catalogue of units. Absolute quantities are reachable
//! by name only, so the dimension index stays injective.

use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, LazyLock, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use serde::Serialize;
use tracing::{debug, error};
use unitas_core::{DimensionVector, Scale, UnitError, UnitSystem};

use crate::{builtin, Quantity, RegistryConfig, Resolver, Unit, UnitDef};

static GLOBAL: LazyLock<UnitRegistry> = LazyLock::new(|| {
    let config = RegistryConfig::from_env();
    debug!(?config, "initializing global unit registry");
    UnitRegistry::from_config(&config)
});

#[derive(Default)]
struct Catalogue {
    by_name: BTreeMap<String, Arc<Quantity>>,
    by_dimension: HashMap<DimensionVector, Arc<Quantity>>,
}

/// Registry of quantities and units
pub struct UnitRegistry {
    config: RegistryConfig,
    catalogue: RwLock<Catalogue>,
}

impl UnitRegistry {
    /// Registry without the built-in catalogue
    pub fn new() -> Self {
        Self::from_config(&RegistryConfig::bare())
    }

    /// Registry with the standard quantities and units installed
    pub fn with_builtin() -> Self {
        Self::from_config(&RegistryConfig::default())
    }

    pub fn from_config(config: &RegistryConfig) -> Self {
        let registry = UnitRegistry {
            config: config.clone(),
            catalogue: RwLock::new(Catalogue::default()),
        };
        registry.install();
        registry
    }

    /// Process-wide registry, configured from the environment on first use
    pub fn global() -> &'static UnitRegistry {
        &GLOBAL
    }

    pub fn config(&self) -> &RegistryConfig {
        &self.config
    }

    /// Drop every registration and reinstall the configured initial state.
    ///
    /// Quantities and units obtained before the reset stay usable.
    pub fn reset(&self) {
        let fresh = UnitRegistry::from_config(&self.config);
        let catalogue = fresh
            .catalogue
            .into_inner()
            .unwrap_or_else(PoisonError::into_inner);
        *self.write() = catalogue;
        debug!("unit registry reset");
    }

    fn install(&self) {
        if !self.config.install_builtin {
            return;
        }
        if let Err(err) = builtin::install(self) {
            error!(error = %err, "built-in unit catalogue is inconsistent");
        }
    }

    fn read(&self) -> RwLockReadGuard<'_, Catalogue> {
        self.catalogue.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Catalogue> {
        self.catalogue.write().unwrap_or_else(PoisonError::into_inner)
    }

    // ========== Registration ==========

    /// Register a relative quantity with its standard unit.
    ///
    /// Fails with `DuplicateName` if the name is taken and with
    /// `DuplicateQuantity` if another quantity already claims the dimension.
    pub fn register_quantity(
        &self,
        name: &str,
        dimension: DimensionVector,
        standard: UnitDef,
    ) -> Result<Arc<Quantity>, UnitError> {
        let mut catalogue = self.write();
        if catalogue.by_name.contains_key(name) {
            return Err(UnitError::DuplicateName {
                name: name.to_string(),
            });
        }
        if let Some(existing) = catalogue.by_dimension.get(&dimension) {
            return Err(UnitError::DuplicateQuantity {
                dimension,
                existing: existing.name().to_string(),
                attempted: name.to_string(),
            });
        }

        let standard = standard.into_unit(name, dimension, false, None)?;
        check_standard_scale(&standard)?;
        let variants = self.prefixed_variants(&standard)?;
        let quantity = Arc::new(Quantity::new(name, dimension, None, standard));
        for variant in variants {
            quantity.insert(variant)?;
        }

        catalogue
            .by_name
            .insert(name.to_string(), Arc::clone(&quantity));
        catalogue
            .by_dimension
            .insert(dimension, Arc::clone(&quantity));
        debug!(quantity = name, %dimension, "registered quantity");
        Ok(quantity)
    }

    /// Register an absolute quantity paired with an existing relative one.
    ///
    /// The standard unit's paired relative unit is looked up by
    /// `UnitDef::relative`, or by the standard unit's own key.
    pub fn register_absolute_quantity(
        &self,
        name: &str,
        relative: &str,
        standard: UnitDef,
    ) -> Result<Arc<Quantity>, UnitError> {
        let mut catalogue = self.write();
        if catalogue.by_name.contains_key(name) {
            return Err(UnitError::DuplicateName {
                name: name.to_string(),
            });
        }
        let relative_quantity = catalogue
            .by_name
            .get(relative)
            .cloned()
            .ok_or_else(|| UnitError::quantity_not_found(relative))?;
        if relative_quantity.is_absolute() {
            return Err(UnitError::invalid_operand(format!(
                "{} is absolute and cannot be paired with {}",
                relative, name
            )));
        }

        let relative_unit = paired_unit(&relative_quantity, &standard)?;
        let standard =
            standard.into_unit(name, relative_quantity.dimension(), true, Some(relative_unit))?;
        check_standard_scale(&standard)?;
        let quantity = Arc::new(Quantity::new(
            name,
            relative_quantity.dimension(),
            Some(relative_quantity),
            standard,
        ));

        catalogue
            .by_name
            .insert(name.to_string(), Arc::clone(&quantity));
        debug!(quantity = name, relative, "registered absolute quantity");
        Ok(quantity)
    }

    /// Register a constructed unit (typically from a `derive_*` call).
    ///
    /// A unit with the same key replaces the registered one; an abbreviation
    /// already used by a different unit is rejected.
    pub fn register_unit(&self, quantity: &str, unit: Unit) -> Result<(), UnitError> {
        let quantity = self.quantity(quantity)?;
        let key = unit.key().to_string();
        if quantity.insert(unit)? {
            debug!(quantity = quantity.name(), unit = %key, "registered unit");
        }
        Ok(())
    }

    /// Build a unit from its definition and register it, together with its
    /// SI-prefixed variants when prefix generation is enabled.
    pub fn define_unit(&self, quantity: &str, def: UnitDef) -> Result<Unit, UnitError> {
        let quantity = self.quantity(quantity)?;
        let relative = match quantity.relative() {
            Some(relative_quantity) => Some(paired_unit(relative_quantity, &def)?),
            None => None,
        };
        let unit = def.into_unit(
            quantity.name(),
            quantity.dimension(),
            quantity.is_absolute(),
            relative,
        )?;
        let variants = self.prefixed_variants(&unit)?;

        quantity.insert(unit.clone())?;
        debug!(quantity = quantity.name(), unit = unit.key(), "defined unit");
        for variant in variants {
            quantity.insert(variant)?;
        }
        Ok(unit)
    }

    /// Remove a unit from its quantity. Existing `Unit` handles keep working.
    pub fn unregister_unit(&self, quantity: &str, key: &str) -> Result<Unit, UnitError> {
        let quantity = self.quantity(quantity)?;
        let removed = quantity.remove(key)?;
        debug!(quantity = quantity.name(), unit = key, "unregistered unit");
        Ok(removed)
    }

    fn prefixed_variants(&self, unit: &Unit) -> Result<Vec<Unit>, UnitError> {
        if self.config.generate_si_prefixes {
            unit.si_prefixed_variants()
        } else {
            Ok(Vec::new())
        }
    }

    // ========== Lookup ==========

    /// The relative quantity claiming `dimension`
    pub fn lookup_by_dimension(&self, dimension: DimensionVector) -> Option<Arc<Quantity>> {
        self.read().by_dimension.get(&dimension).cloned()
    }

    pub fn lookup_by_name(&self, name: &str) -> Option<Arc<Quantity>> {
        self.read().by_name.get(name).cloned()
    }

    /// Like [`lookup_by_name`](Self::lookup_by_name), failing with `QuantityNotFound`
    pub fn quantity(&self, name: &str) -> Result<Arc<Quantity>, UnitError> {
        self.lookup_by_name(name)
            .ok_or_else(|| UnitError::quantity_not_found(name))
    }

    /// All quantities, ordered by name
    pub fn quantities(&self) -> Vec<Arc<Quantity>> {
        self.read().by_name.values().cloned().collect()
    }

    pub fn unit(&self, quantity: &str, key: &str) -> Result<Unit, UnitError> {
        self.quantity(quantity)?
            .unit(key)
            .ok_or_else(|| UnitError::unit_not_found(key, quantity))
    }

    /// Snapshot of a quantity's units
    pub fn units_of(&self, quantity: &str) -> Result<Arc<BTreeMap<String, Unit>>, UnitError> {
        Ok(self.quantity(quantity)?.units())
    }

    /// Exact match of `token` against the abbreviations of the quantity's units
    pub fn resolve_abbreviation(&self, quantity: &str, token: &str) -> Result<Unit, UnitError> {
        self.quantity(quantity)?
            .resolve_abbreviation(token)
            .ok_or_else(|| UnitError::unit_not_found(token, quantity))
    }

    /// The canonical abbreviations of a unit, display abbreviation first
    pub fn canonical_abbreviations_of(
        &self,
        quantity: &str,
        unit_key: &str,
    ) -> Result<Vec<String>, UnitError> {
        Ok(self.unit(quantity, unit_key)?.abbreviations().to_vec())
    }

    /// Algebra over this registry
    pub fn resolver(&self) -> Resolver<'_> {
        Resolver::new(self)
    }

    /// Owned copy of the registry contents
    pub fn snapshot(&self) -> RegistrySnapshot {
        RegistrySnapshot {
            quantities: self.quantities().iter().map(|q| QuantitySummary::of(q)).collect(),
        }
    }
}

impl Default for UnitRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for UnitRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let catalogue = self.read();
        f.debug_struct("UnitRegistry")
            .field("config", &self.config)
            .field("quantities", &catalogue.by_name.len())
            .finish()
    }
}

fn check_standard_scale(unit: &Unit) -> Result<(), UnitError> {
    if unit.scale().is_base_scale() {
        Ok(())
    } else {
        Err(UnitError::InvalidFactor {
            what: "factor",
            value: unit.scale().factor(),
            reason: "a standard unit must have factor 1 and no offset",
        })
    }
}

fn paired_unit(relative: &Quantity, def: &UnitDef) -> Result<Unit, UnitError> {
    let key = def.relative_key.as_deref().unwrap_or(&def.key);
    relative
        .unit(key)
        .ok_or_else(|| UnitError::unit_not_found(key, relative.name()))
}

/// Owned copy of the registry contents
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RegistrySnapshot {
    pub quantities: Vec<QuantitySummary>,
}

impl RegistrySnapshot {
    pub fn quantity(&self, name: &str) -> Option<&QuantitySummary> {
        self.quantities.iter().find(|q| q.name == name)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QuantitySummary {
    pub name: String,
    pub dimension: DimensionVector,
    pub relative: Option<String>,
    pub standard_unit: String,
    pub units: Vec<UnitSummary>,
}

impl QuantitySummary {
    pub fn of(quantity: &Quantity) -> Self {
        QuantitySummary {
            name: quantity.name().to_string(),
            dimension: quantity.dimension(),
            relative: quantity.relative().map(|q| q.name().to_string()),
            standard_unit: quantity.standard_unit().key().to_string(),
            units: quantity.units().values().map(UnitSummary::of).collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UnitSummary {
    pub key: String,
    pub name: String,
    pub abbreviations: Vec<String>,
    pub system: UnitSystem,
    pub scale: Scale,
    pub generated: bool,
}

impl UnitSummary {
    pub fn of(unit: &Unit) -> Self {
        UnitSummary {
            key: unit.key().to_string(),
            name: unit.name().to_string(),
            abbreviations: unit.abbreviations().to_vec(),
            system: unit.system(),
            scale: *unit.scale(),
            generated: unit.is_generated(),
        }
    }
}
