//! Runtime loader: fetch, compile for development, inject.
//!
//! Copyright (c) 2025 Posit, PBC

use crate::compile::CompileOptions;
use crate::error::StyleError;
use crate::plugin::StylePlugin;

impl StylePlugin<'_> {
    /// Load `name` for live use and inject the result into the sink.
    ///
    /// Every successful call injects one more style element, even for a name
    /// that was loaded before. Failures inject nothing.
    pub async fn load_runtime(&self, name: &str) -> Result<String, StyleError> {
        let base = self.base_url()?;
        let url = format!("{}{}", base, name);

        let source = self.fetch_source(&url).await.inspect_err(|e| {
            tracing::warn!(name, error = %e, "Stylesheet fetch failed");
        })?;

        tracing::debug!(name, "Compiling stylesheet for development");
        let options = CompileOptions::development(&url, &base);
        let css = self
            .compiler
            .compile(&source, &options)
            .await
            .inspect_err(|e| tracing::warn!(name, error = %e, "Stylesheet compile failed"))?;

        self.sink.inject(&css);
        tracing::debug!(name, bytes = css.len(), "Injected stylesheet");
        Ok(css)
    }
}
