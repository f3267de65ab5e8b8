/*
 * inject.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * Inject command implementation
 */

//! Inject command implementation.
//!
//! Development-mode loading outside a browser: each stylesheet is compiled
//! and handed to a `DocumentSink`, whose style elements are then spliced into
//! an HTML page's head.

use std::path::Path;

use anyhow::{Context, Result};
use style_loader::{GrassCompiler, LoadRequest, StylePlugin};
use style_runtime::{DocumentSink, HostRuntime};
use tracing::info;

use crate::CommonArgs;

/// Arguments for the inject command
#[derive(Debug)]
pub struct InjectArgs {
    pub common: CommonArgs,
    /// Module names, in injection order
    pub names: Vec<String>,
    /// Page to inject into
    pub html: Option<String>,
    /// Destination page (defaults to updating `html` in place)
    pub output: Option<String>,
}

/// Execute the inject command
pub fn execute(args: InjectArgs) -> Result<()> {
    let (host, config) = super::resolve(&args.common)?;
    let compiler = GrassCompiler::new(&host);
    let sink = DocumentSink::new();
    let plugin = StylePlugin::new(config, &host, &compiler, &sink);

    let request = LoadRequest::runtime();
    let mut compiled = Vec::with_capacity(args.names.len());
    for name in &args.names {
        let css = pollster::block_on(plugin.load(name, &request))
            .with_context(|| format!("Failed to load stylesheet {}", name))?;
        compiled.push(css);
    }

    let Some(html) = &args.html else {
        print!("{}", compiled.join("\n"));
        return Ok(());
    };

    let page = host
        .file_read_string(Path::new(html))
        .map_err(|e| anyhow::anyhow!("Failed to read page {}: {}", html, e))?;
    let rendered = sink.render_into(&page);

    let destination = args.output.as_deref().unwrap_or(html);
    host.file_write(Path::new(destination), rendered.as_bytes())
        .map_err(|e| anyhow::anyhow!("Failed to write page {}: {}", destination, e))?;

    info!(
        styles = sink.style_elements().len(),
        page = %destination,
        "Injected stylesheets"
    );
    Ok(())
}
