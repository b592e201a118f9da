//! Registry configuration

use serde::{Deserialize, Serialize};

/// Environment variable toggling the built-in catalogue
const ENV_BUILTIN: &str = "UNITAS_BUILTIN";
/// Environment variable toggling SI-prefix generation
const ENV_SI_PREFIXES: &str = "UNITAS_SI_PREFIXES";
/// Environment variable naming the default locale
const ENV_LOCALE: &str = "UNITAS_LOCALE";

/// Initial state of a [`UnitRegistry`](crate::UnitRegistry).
///
/// `reset()` reinstalls exactly this state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegistryConfig {
    /// Install the standard quantities and units
    pub install_builtin: bool,
    /// Register SI-prefixed variants for units that declare a prefix policy
    pub generate_si_prefixes: bool,
    /// Locale used by a `Localizer` when the host does not pick one
    pub default_locale: String,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        RegistryConfig {
            install_builtin: true,
            generate_si_prefixes: true,
            default_locale: "en".to_string(),
        }
    }
}

impl RegistryConfig {
    /// No built-in catalogue; prefix generation stays on for defined units
    pub fn bare() -> Self {
        RegistryConfig {
            install_builtin: false,
            ..Default::default()
        }
    }

    /// Defaults overridden by `UNITAS_BUILTIN`, `UNITAS_SI_PREFIXES` and
    /// `UNITAS_LOCALE`.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = RegistryConfig::default();
        if let Some(flag) = lookup(ENV_BUILTIN).as_deref().and_then(parse_flag) {
            config.install_builtin = flag;
        }
        if let Some(flag) = lookup(ENV_SI_PREFIXES).as_deref().and_then(parse_flag) {
            config.generate_si_prefixes = flag;
        }
        if let Some(locale) = lookup(ENV_LOCALE) {
            let locale = locale.trim();
            if !locale.is_empty() {
                config.default_locale = locale.to_string();
            }
        }
        config
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
