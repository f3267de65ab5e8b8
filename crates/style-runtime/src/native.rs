/*
 * native.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * NativeHost implementation backed by the local filesystem.
 *
 * Module-relative base paths resolve against a base directory, the same way
 * a browser module system resolves them against its base URL. Remote URLs are
 * not fetched; only local paths and `file://` URLs are.
 */

use async_trait::async_trait;
use std::path::{Path, PathBuf};

use crate::traits::{HostRuntime, PathKind, RuntimeError, RuntimeResult, normalize_components};

const FILE_SCHEME: &str = "file://";

/// Filesystem-backed host rooted at a base directory.
#[derive(Debug, Clone)]
pub struct NativeHost {
    base_dir: PathBuf,
}

impl NativeHost {
    /// Create a host that resolves relative paths against `base_dir`.
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
        }
    }

    /// Create a host rooted at the process working directory.
    pub fn from_cwd() -> RuntimeResult<Self> {
        Ok(Self::new(std::env::current_dir()?))
    }

    /// The directory relative paths resolve against.
    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    fn local_path(url: &str) -> RuntimeResult<&Path> {
        if let Some(path) = url.strip_prefix(FILE_SCHEME) {
            return Ok(Path::new(path));
        }
        if has_scheme(url) {
            return Err(RuntimeError::NotSupported(format!(
                "remote fetch of {} (NativeHost only reads local files)",
                url
            )));
        }
        Ok(Path::new(url))
    }
}

/// `true` for strings like `https://...` or `data:...`.
fn has_scheme(url: &str) -> bool {
    match url.split_once(':') {
        Some((scheme, _)) => {
            scheme.len() > 1
                && scheme
                    .chars()
                    .all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
        }
        None => false,
    }
}

#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
impl HostRuntime for NativeHost {
    fn to_url(&self, base: &str) -> RuntimeResult<String> {
        if has_scheme(base) {
            return Ok(base.to_string());
        }

        let joined = normalize_components(&self.base_dir.join(base));
        let mut url = joined.to_string_lossy().into_owned();
        if base.ends_with('/') && !url.ends_with('/') {
            url.push('/');
        }
        Ok(url)
    }

    async fn fetch_text(&self, url: &str) -> RuntimeResult<String> {
        let path = Self::local_path(url)?;
        tracing::trace!(path = %path.display(), "Reading stylesheet source");
        self.file_read_string(path)
    }

    fn file_read(&self, path: &Path) -> RuntimeResult<Vec<u8>> {
        Ok(std::fs::read(path)?)
    }

    fn file_write(&self, path: &Path, contents: &[u8]) -> RuntimeResult<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        Ok(std::fs::write(path, contents)?)
    }

    fn path_exists(&self, path: &Path, kind: Option<PathKind>) -> RuntimeResult<bool> {
        let Ok(metadata) = std::fs::metadata(path) else {
            return Ok(false);
        };
        Ok(match kind {
            None => true,
            Some(PathKind::File) => metadata.is_file(),
            Some(PathKind::Directory) => metadata.is_dir(),
        })
    }
}
