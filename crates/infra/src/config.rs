//! Basket configuration: instance names and their permitted stowable types.
//!
//! ```json
//! {
//!   "default_instance": "basket",
//!   "instances": {
//!     "basket": ["Product", "GiftCard"],
//!     "wishlist": []
//!   }
//! }
//! ```
//!
//! An instance that is absent, or maps to an empty list, accepts every type.

use std::collections::BTreeMap;
use std::path::Path;

use anyhow::Context;
use serde::{Deserialize, Serialize};

use stow_basket::{AllowListPolicy, DEFAULT_INSTANCE};

/// Inline JSON configuration (takes precedence over the file).
pub const INSTANCES_ENV: &str = "STOW_BASKET_INSTANCES";
/// Path to a JSON configuration file.
pub const CONFIG_PATH_ENV: &str = "STOW_BASKET_CONFIG";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BasketConfig {
    #[serde(default = "default_instance")]
    pub default_instance: String,

    #[serde(default)]
    pub instances: BTreeMap<String, Vec<String>>,
}

fn default_instance() -> String {
    DEFAULT_INSTANCE.to_string()
}

impl Default for BasketConfig {
    fn default() -> Self {
        Self {
            default_instance: default_instance(),
            instances: BTreeMap::new(),
        }
    }
}

impl BasketConfig {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn from_file(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("reading basket config {}", path.display()))?;
        Self::from_json(&raw).with_context(|| format!("parsing basket config {}", path.display()))
    }

    /// Load from `STOW_BASKET_INSTANCES` (inline JSON) or `STOW_BASKET_CONFIG`
    /// (file path); defaults when neither is set.
    pub fn from_env() -> anyhow::Result<Self> {
        if let Ok(inline) = std::env::var(INSTANCES_ENV) {
            return Self::from_json(&inline).with_context(|| format!("parsing {INSTANCES_ENV}"));
        }
        if let Ok(path) = std::env::var(CONFIG_PATH_ENV) {
            return Self::from_file(path);
        }
        tracing::debug!("no basket configuration in environment; all instances unrestricted");
        Ok(Self::default())
    }

    /// Builder-style: restrict `instance` to `types`.
    pub fn with_instance<I, T>(mut self, instance: impl Into<String>, types: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        self.instances
            .insert(instance.into(), types.into_iter().map(Into::into).collect());
        self
    }

    pub fn policy(&self) -> AllowListPolicy {
        self.instances
            .iter()
            .map(|(instance, types)| (instance.clone(), types.clone()))
            .collect()
    }
}
