//! Command implementations for the stylesheet CLI
//!
//! Each command module handles the CLI interface and delegates to
//! style-loader for actual implementation.

pub mod build;
pub mod inject;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use style_loader::PluginConfig;
use style_runtime::NativeHost;

use crate::CommonArgs;

/// Build the host and plugin configuration from the shared flags.
///
/// Flags override values from the config file.
pub fn resolve(common: &CommonArgs) -> Result<(NativeHost, PluginConfig)> {
    let host = match &common.base_dir {
        Some(dir) => NativeHost::new(PathBuf::from(dir)),
        None => NativeHost::from_cwd()
            .map_err(|e| anyhow::anyhow!("Failed to get current directory: {}", e))?,
    };

    let mut config = match &common.config {
        Some(file) => PluginConfig::load(&host, Path::new(file))
            .with_context(|| format!("Failed to load config {}", file))?,
        None => PluginConfig::default(),
    };
    if let Some(path) = &common.path {
        config = config.with_path(path.clone());
    }
    if let Some(root_path) = &common.root_path {
        config = config.with_root_path(root_path.clone());
    }

    tracing::debug!(?config, base_dir = %host.base_dir().display(), "Resolved configuration");
    Ok((host, config))
}
