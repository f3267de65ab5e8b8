//! Filesystem adapter that lets grass resolve imports through a host.
//!
//! Copyright (c) 2025 Posit, PBC
//!
//! grass reads every stylesheet through its `Fs` trait. `HostFs` implements
//! that trait on top of a `HostRuntime`, with an in-memory overlay for the
//! root stylesheet whose text has already been fetched.

use std::fmt::Debug;
use std::io;
use std::path::{Path, PathBuf};

use crate::traits::HostRuntime;

/// Adapter that implements `grass::Fs` using a `HostRuntime`.
///
/// The root stylesheet is served from memory, everything else from the host.
pub struct HostFs<'a> {
    host: &'a dyn HostRuntime,
    root: PathBuf,
    source: &'a str,
}

impl<'a> HostFs<'a> {
    /// Create a HostFs that answers reads of `root` with `source` instead of
    /// asking the host.
    pub fn new(host: &'a dyn HostRuntime, root: impl Into<PathBuf>, source: &'a str) -> Self {
        Self {
            host,
            root: root.into(),
            source,
        }
    }

    fn overlay_for(&self, path: &Path) -> Option<&'a str> {
        (self.root.as_path() == path).then_some(self.source)
    }
}

impl Debug for HostFs<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HostFs")
            .field("host", &"<HostRuntime>")
            .field("root", &self.root)
            .finish()
    }
}

impl grass::Fs for HostFs<'_> {
    fn is_dir(&self, path: &Path) -> bool {
        self.host.is_dir(path).unwrap_or(false)
    }

    fn is_file(&self, path: &Path) -> bool {
        if self.overlay_for(path).is_some() {
            return true;
        }
        self.host.is_file(path).unwrap_or(false)
    }

    fn read(&self, path: &Path) -> io::Result<Vec<u8>> {
        if let Some(source) = self.overlay_for(path) {
            return Ok(source.as_bytes().to_vec());
        }
        self.host
            .file_read(path)
            .map_err(|e| io::Error::other(e.to_string()))
    }
}
