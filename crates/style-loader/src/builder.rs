//! Build-time compiler and the build map it fills.
//!
//! Copyright (c) 2025 Posit, PBC

use std::sync::Mutex;

use hashlink::LinkedHashMap;

use crate::compile::CompileOptions;
use crate::error::StyleError;
use crate::plugin::StylePlugin;

/// Compiled CSS per module name, in the order modules finished building.
///
/// Entries are only ever added, by successful build-mode loads. The lock is
/// never held across an await point.
#[derive(Debug, Default)]
pub struct BuildSession {
    entries: Mutex<LinkedHashMap<String, String>>,
}

impl BuildSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn record(&self, name: &str, css: String) {
        if let Ok(mut entries) = self.entries.lock() {
            entries.insert(name.to_string(), css);
        }
    }

    /// Compiled CSS for `name`, if it was built.
    pub fn get(&self, name: &str) -> Option<String> {
        self.entries
            .lock()
            .ok()
            .and_then(|entries| entries.get(name).cloned())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries
            .lock()
            .map(|entries| entries.contains_key(name))
            .unwrap_or(false)
    }

    pub fn len(&self) -> usize {
        self.entries.lock().map(|entries| entries.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// `(name, css)` pairs in build order.
    pub fn entries(&self) -> Vec<(String, String)> {
        self.entries
            .lock()
            .map(|entries| {
                entries
                    .iter()
                    .map(|(name, css)| (name.clone(), css.clone()))
                    .collect()
            })
            .unwrap_or_default()
    }
}

impl StylePlugin<'_> {
    /// Compile `name` for an optimizing build and record it in the session.
    ///
    /// Fails with [`StyleError::MissingRootPath`] before any I/O when no
    /// deployment root is configured. Failed builds leave the map untouched.
    pub async fn build(&self, name: &str) -> Result<String, StyleError> {
        let root_path = self.config().require_root_path()?;

        let base = self.base_url()?;
        let url = format!("{}{}", base, name);

        let source = self.fetch_source(&url).await.inspect_err(|e| {
            tracing::warn!(name, error = %e, "Stylesheet fetch failed");
        })?;

        tracing::debug!(name, root_path, "Compiling stylesheet for production");
        let options = CompileOptions::production(&url, &base, root_path);
        let css = self
            .compiler
            .compile(&source, &options)
            .await
            .inspect_err(|e| tracing::warn!(name, error = %e, "Stylesheet compile failed"))?;

        self.session().record(name, css.clone());
        tracing::info!(name, bytes = css.len(), "Built stylesheet");
        Ok(css)
    }
}
