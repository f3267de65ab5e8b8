//! Plugin configuration.
//!
//! Copyright (c) 2025 Posit, PBC
//!
//! The plugin reads two settings, once, when it is created:
//!
//! - `path`: where stylesheets live, relative to the host's base URL
//!   (defaults to [`DEFAULT_STYLE_PATH`])
//! - `rootPath`: the absolute URL the site is deployed under. Only optimizing
//!   builds need it, so it is checked lazily by [`PluginConfig::require_root_path`].
//!
//! In a config file they sit under a `style` key:
//!
//! ```yaml
//! style:
//!   path: ../scss/
//!   rootPath: https://cdn.example.com/app/
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};
use style_runtime::HostRuntime;

use crate::error::StyleError;

/// Conventional stylesheet directory, relative to the module base URL.
pub const DEFAULT_STYLE_PATH: &str = "../scss/";

fn default_path() -> String {
    DEFAULT_STYLE_PATH.to_string()
}

/// Resolved plugin configuration. Immutable once the plugin is created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PluginConfig {
    /// Stylesheet base path
    #[serde(default = "default_path")]
    pub path: String,

    /// Deployment root used to rewrite relative URLs in optimized output
    #[serde(default)]
    pub root_path: Option<String>,
}

impl Default for PluginConfig {
    fn default() -> Self {
        Self {
            path: default_path(),
            root_path: None,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct ConfigFile {
    #[serde(default)]
    style: Option<PluginConfig>,
}

impl PluginConfig {
    /// Parse the `style` section of a YAML document.
    ///
    /// An empty document or a missing section yields the defaults.
    pub fn from_yaml_str(content: &str) -> Result<Self, StyleError> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        let file: ConfigFile =
            serde_yaml::from_str(content).map_err(|e| StyleError::Config(e.to_string()))?;
        Ok(file.style.unwrap_or_default())
    }

    /// Read and parse a YAML config file through the host.
    pub fn load(host: &dyn HostRuntime, path: &Path) -> Result<Self, StyleError> {
        let content = host
            .file_read_string(path)
            .map_err(|e| StyleError::Config(format!("{}: {}", path.display(), e)))?;
        Self::from_yaml_str(&content)
    }

    /// Override the stylesheet base path.
    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = path.into();
        self
    }

    /// Override the deployment root.
    pub fn with_root_path(mut self, root_path: impl Into<String>) -> Self {
        self.root_path = Some(root_path.into());
        self
    }

    /// The deployment root, or a configuration error if it is unset or empty.
    pub fn require_root_path(&self) -> Result<&str, StyleError> {
        self.root_path
            .as_deref()
            .filter(|root| !root.is_empty())
            .ok_or(StyleError::MissingRootPath)
    }
}
