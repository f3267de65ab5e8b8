/*
 * build.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * Build command implementation
 */

//! Build command implementation.
//!
//! Plays the optimizer's part: every requested stylesheet goes through
//! `load` in build mode, then `write` is called once per module name and the
//! wrapper modules are concatenated into a single bundle.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use style_loader::{GrassCompiler, LoadRequest, StyleError, StylePlugin};
use style_runtime::{HostRuntime, RecordingSink};
use tracing::{error, info};
use walkdir::WalkDir;

use crate::CommonArgs;

/// Arguments for the build command
#[derive(Debug)]
pub struct BuildArgs {
    pub common: CommonArgs,
    /// Module names to build
    pub names: Vec<String>,
    /// Also build everything under the stylesheet directory
    pub all: bool,
    /// Module id used in the generated `define` calls
    pub plugin_name: String,
    /// Bundle destination (stdout when absent)
    pub output: Option<String>,
}

/// Execute the build command
pub fn execute(args: BuildArgs) -> Result<()> {
    let (host, config) = super::resolve(&args.common)?;
    // Fail fast: nothing can be built without a deployment root
    config.require_root_path()?;

    let compiler = GrassCompiler::new(&host);
    let sink = RecordingSink::new();
    let plugin = StylePlugin::new(config, &host, &compiler, &sink);

    let mut names = args.names.clone();
    if args.all {
        let dir = host
            .to_url(&plugin.config().path)
            .map_err(|e| anyhow::anyhow!("Failed to resolve stylesheet directory: {}", e))?;
        for name in discover_stylesheets(Path::new(&dir))? {
            if !names.contains(&name) {
                names.push(name);
            }
        }
    }
    if names.is_empty() {
        anyhow::bail!("No stylesheets to build. Pass module names or use --all.");
    }

    let request = LoadRequest::build();
    let mut failures = 0usize;
    for name in &names {
        match pollster::block_on(plugin.load(name, &request)) {
            Ok(_) => {}
            Err(StyleError::MissingRootPath) => {
                return Err(StyleError::MissingRootPath.into());
            }
            Err(e) => {
                error!("{}", e);
                failures += 1;
            }
        }
    }
    if failures > 0 {
        anyhow::bail!("{} of {} stylesheets failed to build", failures, names.len());
    }

    let bundle: String = names
        .iter()
        .filter_map(|name| plugin.write(&args.plugin_name, name))
        .collect();

    match &args.output {
        Some(output) => {
            host.file_write(Path::new(output), bundle.as_bytes())
                .map_err(|e| anyhow::anyhow!("Failed to write bundle {}: {}", output, e))?;
            info!(
                modules = plugin.session().len(),
                output = %output,
                "Wrote stylesheet bundle"
            );
        }
        None => print!("{}", bundle),
    }

    Ok(())
}

/// Module names of every non-partial `.scss` file under `dir`, sorted.
///
/// Names are relative to `dir` and always use `/` separators, matching what
/// a module system would request.
fn discover_stylesheets(dir: &Path) -> Result<Vec<String>> {
    let mut names = Vec::new();
    for entry in WalkDir::new(dir).sort_by_file_name() {
        let entry = entry.with_context(|| format!("Failed to scan {}", dir.display()))?;
        if !entry.file_type().is_file() {
            continue;
        }
        let path = entry.path();
        let is_partial = path
            .file_name()
            .and_then(|n| n.to_str())
            .is_some_and(|n| n.starts_with('_'));
        if is_partial || path.extension().and_then(|e| e.to_str()) != Some("scss") {
            continue;
        }
        let relative: PathBuf = path.strip_prefix(dir).unwrap_or(path).to_path_buf();
        let name = relative
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/");
        names.push(name);
    }
    Ok(names)
}
