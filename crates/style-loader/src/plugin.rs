//! The plugin facade the host module system talks to.
//!
//! Copyright (c) 2025 Posit, PBC
//!
//! A host calls [`StylePlugin::load`] once per requested stylesheet and, while
//! bundling, [`StylePlugin::write`] once per module name. Everything else in
//! this crate hangs off those two entry points:
//!
//! - `load` with `is_build == false` → runtime loader (compile, inject)
//! - `load` with `is_build == true`  → build-time compiler (compile, record)
//! - `write` → artifact writer over the session's build map
//!
//! # Example
//!
//! ```rust,ignore
//! use style_loader::{GrassCompiler, LoadRequest, PluginConfig, StylePlugin};
//! use style_runtime::{DocumentSink, NativeHost};
//!
//! let host = NativeHost::new("/app/js");
//! let compiler = GrassCompiler::new(&host);
//! let sink = DocumentSink::new();
//! let config = PluginConfig::default().with_root_path("https://cdn.example.com/app/");
//!
//! let plugin = StylePlugin::new(config, &host, &compiler, &sink);
//! let css = pollster::block_on(plugin.load("main.scss", &LoadRequest::build()))?;
//! let module = plugin.write("style", "main.scss");
//! ```

use style_runtime::{HostRuntime, StyleSink};

use crate::builder::BuildSession;
use crate::compile::StyleCompiler;
use crate::config::PluginConfig;
use crate::error::StyleError;

/// Module id the plugin is registered under by default.
pub const PLUGIN_NAME: &str = "style";

/// Per-request flags passed by the host alongside a module name.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadRequest {
    /// `true` while an optimizing build is running
    pub is_build: bool,
}

impl LoadRequest {
    /// A live, in-page load.
    pub fn runtime() -> Self {
        Self { is_build: false }
    }

    /// A load issued by the optimizing build.
    pub fn build() -> Self {
        Self { is_build: true }
    }
}

/// Stylesheet loader plugin bound to one host, compiler, and sink.
///
/// The plugin owns its [`BuildSession`]: a fresh plugin starts with an empty
/// build map, so separate build runs never share state.
pub struct StylePlugin<'a> {
    config: PluginConfig,
    pub(crate) host: &'a dyn HostRuntime,
    pub(crate) compiler: &'a dyn StyleCompiler,
    pub(crate) sink: &'a dyn StyleSink,
    session: BuildSession,
}

impl<'a> StylePlugin<'a> {
    pub fn new(
        config: PluginConfig,
        host: &'a dyn HostRuntime,
        compiler: &'a dyn StyleCompiler,
        sink: &'a dyn StyleSink,
    ) -> Self {
        Self {
            config,
            host,
            compiler,
            sink,
            session: BuildSession::new(),
        }
    }

    pub fn config(&self) -> &PluginConfig {
        &self.config
    }

    /// The build map populated by build-mode loads.
    pub fn session(&self) -> &BuildSession {
        &self.session
    }

    /// Load one stylesheet, resolving with its compiled CSS.
    ///
    /// Routes on `request.is_build`. The returned future completes exactly
    /// once, with either the CSS or the first error encountered.
    pub async fn load(&self, name: &str, request: &LoadRequest) -> Result<String, StyleError> {
        if request.is_build {
            self.build(name).await
        } else {
            self.load_runtime(name).await
        }
    }

    /// Emit the wrapper module for `module_name`, if it was built.
    pub fn write(&self, plugin_name: &str, module_name: &str) -> Option<String> {
        self.session.write(plugin_name, module_name)
    }

    /// Absolute URL of the stylesheet directory.
    pub(crate) fn base_url(&self) -> Result<String, StyleError> {
        self.host
            .to_url(&self.config.path)
            .map_err(|source| StyleError::Resolve {
                path: self.config.path.clone(),
                source,
            })
    }

    pub(crate) async fn fetch_source(&self, url: &str) -> Result<String, StyleError> {
        tracing::debug!(url, "Fetching stylesheet");
        self.host
            .fetch_text(url)
            .await
            .map_err(|source| StyleError::Fetch {
                url: url.to_string(),
                source,
            })
    }
}
