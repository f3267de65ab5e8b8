//! Stylesheet loader plugin.
//!
//! Copyright (c) 2025 Posit, PBC
//!
//! This crate provides:
//! - Plugin configuration (base path, deployment root)
//! - A compiler adapter over grass (SCSS)
//! - Runtime loading with CSS injection into a sink
//! - Optimizing builds that record CSS in a per-session build map
//! - Wrapper-module generation for built stylesheets

mod builder;
mod compile;
mod config;
mod error;
mod loader;
mod plugin;
mod writer;

pub use builder::BuildSession;
#[cfg(not(target_arch = "wasm32"))]
pub use compile::GrassCompiler;
pub use compile::{
    CompileOptions, Environment, ImportMode, StyleCompiler, rewrite_relative_urls,
};
pub use config::{DEFAULT_STYLE_PATH, PluginConfig};
pub use error::{CompileError, StyleError};
pub use plugin::{LoadRequest, PLUGIN_NAME, StylePlugin};
pub use writer::{INJECT_FUNCTION, js_escape, wrapper_module};
