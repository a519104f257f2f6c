#![deny(missing_docs)]

//! # Generator Settings
//!
//! Document-level configuration and the [`BuildContext`] threaded through
//! every compilation. The context is immutable once built, so independent
//! builds may share it across threads.

use crate::error::{AppError, AppResult};
use serde::{Deserialize, Serialize};

fn default_target_alias() -> String {
    "target".to_string()
}

fn default_target_owner() -> String {
    "onos-config".to_string()
}

/// Settings of one generated document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct GeneratorSettings {
    /// Model family, e.g. `sdn-fabric`. Lower-cased into the path prefix.
    pub model_type: String,
    /// Model version, e.g. `0.1.x`.
    pub model_version: String,
    /// Document title; defaults to `"<model_type> <model_version>"`.
    #[serde(default)]
    pub title: Option<String>,
    /// Document description.
    #[serde(default)]
    pub description: Option<String>,
    /// Name of the target path parameter.
    #[serde(default = "default_target_alias")]
    pub target_alias: String,
    /// System owning the target, shown in the parameter description.
    #[serde(default = "default_target_owner")]
    pub target_owner: String,
}

impl GeneratorSettings {
    /// Creates settings with the required fields.
    pub fn new(model_type: impl Into<String>, model_version: impl Into<String>) -> Self {
        Self {
            model_type: model_type.into(),
            model_version: model_version.into(),
            title: None,
            description: None,
            target_alias: default_target_alias(),
            target_owner: default_target_owner(),
        }
    }

    /// Sets the document title.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Sets the document description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Sets the target parameter name.
    pub fn with_target_alias(mut self, alias: impl Into<String>) -> Self {
        self.target_alias = alias.into();
        self
    }

    /// Sets the owner mentioned in the target parameter description.
    pub fn with_target_owner(mut self, owner: impl Into<String>) -> Self {
        self.target_owner = owner.into();
        self
    }

    /// Parses settings from YAML text.
    pub fn from_yaml_str(yaml: &str) -> AppResult<Self> {
        let settings: GeneratorSettings = serde_yaml::from_str(yaml)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Rejects empty identifiers and aliases that cannot be a path placeholder.
    pub fn validate(&self) -> AppResult<()> {
        for (field, value) in [
            ("model-type", &self.model_type),
            ("model-version", &self.model_version),
            ("target-alias", &self.target_alias),
        ] {
            if value.trim().is_empty() {
                return Err(AppError::General(format!("Setting '{}' must not be empty", field)));
            }
        }
        if self.target_alias.contains(['{', '}', '/']) {
            return Err(AppError::General(format!(
                "Setting 'target-alias' must be a bare name, got '{}'",
                self.target_alias
            )));
        }
        Ok(())
    }

    /// `/<model_type lower-cased>/v<model_version>/{<target_alias>}`
    pub fn path_prefix(&self) -> String {
        format!(
            "/{}/v{}/{{{}}}",
            self.model_type.to_lowercase(),
            self.model_version,
            self.target_alias
        )
    }

    /// The document title.
    pub fn resolved_title(&self) -> String {
        self.title
            .clone()
            .unwrap_or_else(|| format!("{} {}", self.model_type, self.model_version))
    }
}

/// Configuration read (never written) by every builder step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildContext {
    /// Name of the target path parameter.
    pub target_alias: String,
    /// Owner text of the target parameter description.
    pub target_owner: String,
    /// Path prefix excluded from component names and operation ids.
    pub naming_root: String,
}

impl BuildContext {
    /// A context with the default owner and no naming root.
    pub fn new(target_alias: impl Into<String>) -> Self {
        Self {
            target_alias: target_alias.into(),
            target_owner: default_target_owner(),
            naming_root: String::new(),
        }
    }

    /// Sets the target owner.
    pub fn with_target_owner(mut self, owner: impl Into<String>) -> Self {
        self.target_owner = owner.into();
        self
    }

    /// Sets the naming root.
    pub fn with_naming_root(mut self, root: impl Into<String>) -> Self {
        self.naming_root = root.into();
        self
    }

    /// Description of the injected target parameter.
    pub fn target_description(&self) -> String {
        format!("{} (target in {})", self.target_alias, self.target_owner)
    }
}

impl From<&GeneratorSettings> for BuildContext {
    fn from(settings: &GeneratorSettings) -> Self {
        BuildContext::new(settings.target_alias.clone())
            .with_target_owner(settings.target_owner.clone())
            .with_naming_root(settings.path_prefix())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_settings_from_yaml_with_defaults() {
        let yaml = r#"
model-type: SDN-Fabric
model-version: 0.1.x
description: Fabric configuration
"#;
        let settings = GeneratorSettings::from_yaml_str(yaml).unwrap();
        assert_eq!(settings.target_alias, "target");
        assert_eq!(settings.target_owner, "onos-config");
        assert_eq!(settings.path_prefix(), "/sdn-fabric/v0.1.x/{target}");
        assert_eq!(settings.resolved_title(), "SDN-Fabric 0.1.x");
    }

    #[test]
    fn test_invalid_settings_rejected() {
        assert!(GeneratorSettings::from_yaml_str("model-type: x\n").is_err());
        assert!(GeneratorSettings::from_yaml_str(
            "model-type: x\nmodel-version: '1'\ntarget-alias: '{t}'\n"
        )
        .is_err());
        assert!(GeneratorSettings::new(" ", "1").validate().is_err());
    }

    #[test]
    fn test_context_from_settings() {
        let settings = GeneratorSettings::new("aether", "2.1.x")
            .with_target_alias("enterprise-id")
            .with_target_owner("roc");
        let ctx = BuildContext::from(&settings);
        assert_eq!(ctx.naming_root, "/aether/v2.1.x/{enterprise-id}");
        assert_eq!(ctx.target_description(), "enterprise-id (target in roc)");
    }
}
