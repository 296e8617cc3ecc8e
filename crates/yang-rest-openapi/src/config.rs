//! Generator settings, loadable from YAML.
//!
//! Externalizes the per-model knobs (model type, version, document title,
//! addressing parameter name) so they live next to the model plugin instead
//! of being hardcoded in Rust source.
//!
//! # File format
//!
//! ```yaml
//! # openapi/settings.yaml
//! model_type: testdevice
//! model_version: 1.0.x
//! title: testdevice-1.0.x
//!
//! # Name of the path parameter selecting the device (default: target).
//! target_alias: target
//!
//! contact:
//!   name: Open Networking Foundation
//!   url: https://opennetworking.org
//!   email: info@opennetworking.org
//! license:
//!   name: Apache-2.0
//!   url: https://www.apache.org/licenses/LICENSE-2.0
//! ```

use std::path::Path;

use serde::Deserialize;

use crate::document::{Contact, License};
use crate::error::{Error, Result};

/// Default model version when none is configured.
pub const DEFAULT_MODEL_VERSION: &str = "0.0.1";

/// Default name of the device-selecting path parameter.
pub const DEFAULT_TARGET_ALIAS: &str = "target";

/// Generator settings as supplied by the caller.
///
/// Every field is optional here; [`GeneratorSettings::resolve`] fills in the
/// defaults and rejects a missing `model_type`. Empty strings count as unset.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct GeneratorSettings {
    /// Model type, e.g. `testdevice`. Required.
    pub model_type: Option<String>,

    /// Model version, e.g. `1.0.x`.
    pub model_version: Option<String>,

    /// `info.title` of the generated document.
    pub title: Option<String>,

    /// `info.description` of the generated document.
    pub description: Option<String>,

    /// Name of the path parameter that selects the device.
    pub target_alias: Option<String>,

    /// `info.contact` of the generated document.
    pub contact: Option<Contact>,

    /// `info.license` of the generated document.
    pub license: Option<License>,
}

/// Settings with all defaults applied.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedSettings {
    /// Model type.
    pub model_type: String,
    /// Model version.
    pub model_version: String,
    /// Document title.
    pub title: String,
    /// Document description.
    pub description: String,
    /// Device-selecting path parameter name.
    pub target_alias: String,
    /// Optional contact block.
    pub contact: Option<Contact>,
    /// Optional license block.
    pub license: Option<License>,
}

impl ResolvedSettings {
    /// Prefix shared by every path: `/{model type}/v{version}/{{alias}}`.
    #[must_use]
    pub fn path_prefix(&self) -> String {
        format!(
            "/{}/v{}/{{{}}}",
            self.model_type.to_lowercase(),
            self.model_version,
            self.target_alias
        )
    }
}

impl GeneratorSettings {
    /// Settings for the given model type, everything else defaulted.
    #[must_use]
    pub fn new(model_type: &str) -> Self {
        Self {
            model_type: Some(model_type.to_string()),
            ..Self::default()
        }
    }

    /// Load settings from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let settings: Self = serde_yaml_ng::from_str(&content)?;
        Ok(settings)
    }

    /// Set the model type.
    #[must_use]
    pub fn model_type(mut self, model_type: &str) -> Self {
        self.model_type = Some(model_type.to_string());
        self
    }

    /// Set the model version.
    #[must_use]
    pub fn model_version(mut self, version: &str) -> Self {
        self.model_version = Some(version.to_string());
        self
    }

    /// Set the document title.
    #[must_use]
    pub fn title(mut self, title: &str) -> Self {
        self.title = Some(title.to_string());
        self
    }

    /// Set the document description.
    #[must_use]
    pub fn description(mut self, description: &str) -> Self {
        self.description = Some(description.to_string());
        self
    }

    /// Set the device-selecting path parameter name.
    #[must_use]
    pub fn target_alias(mut self, alias: &str) -> Self {
        self.target_alias = Some(alias.to_string());
        self
    }

    /// Set the contact block.
    #[must_use]
    pub fn contact(mut self, contact: Contact) -> Self {
        self.contact = Some(contact);
        self
    }

    /// Set the license block.
    #[must_use]
    pub fn license(mut self, license: License) -> Self {
        self.license = Some(license);
        self
    }

    /// Apply defaults.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingSetting`] when `model_type` is unset or empty.
    pub fn resolve(&self) -> Result<ResolvedSettings> {
        let set = |v: &Option<String>| v.as_deref().filter(|s| !s.is_empty()).map(str::to_string);

        let model_type = set(&self.model_type).ok_or(Error::MissingSetting {
            setting: "model_type",
        })?;

        Ok(ResolvedSettings {
            model_version: set(&self.model_version)
                .unwrap_or_else(|| DEFAULT_MODEL_VERSION.to_string()),
            title: set(&self.title)
                .unwrap_or_else(|| format!("{model_type} onos-config model plugin")),
            description: set(&self.description).unwrap_or_else(|| {
                format!(
                    "OpenAPI 3 specification is generated from {model_type} onos-config model plugin"
                )
            }),
            target_alias: set(&self.target_alias)
                .unwrap_or_else(|| DEFAULT_TARGET_ALIAS.to_string()),
            contact: self.contact.clone(),
            license: self.license.clone(),
            model_type,
        })
    }
}
