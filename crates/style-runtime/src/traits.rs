/*
 * traits.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * Defines the HostRuntime trait and supporting types for the host abstraction layer.
 *
 * The stylesheet plugin never touches the filesystem or network directly.
 * Everything goes through a host:
 * - NativeHost: filesystem-backed host rooted at a base directory
 * - test hosts: in-memory stubs that record and script fetches
 */

use async_trait::async_trait;
use std::io;
use std::path::{Path, PathBuf};

/// Result type for runtime operations
pub type RuntimeResult<T> = Result<T, RuntimeError>;

/// Errors that can occur during host operations
#[derive(Debug)]
pub enum RuntimeError {
    /// Standard I/O error
    Io(io::Error),

    /// Operation not supported on this host (e.g., remote fetch on NativeHost)
    NotSupported(String),

    /// Network operation failed
    Network(String),

    /// Fetched content was not valid UTF-8
    InvalidUtf8(String),
}

impl std::fmt::Display for RuntimeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RuntimeError::Io(e) => write!(f, "I/O error: {}", e),
            RuntimeError::NotSupported(msg) => write!(f, "Operation not supported: {}", msg),
            RuntimeError::Network(msg) => write!(f, "Network error: {}", msg),
            RuntimeError::InvalidUtf8(msg) => write!(f, "Invalid UTF-8: {}", msg),
        }
    }
}

impl std::error::Error for RuntimeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RuntimeError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for RuntimeError {
    fn from(e: io::Error) -> Self {
        RuntimeError::Io(e)
    }
}

/// Type of filesystem path
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathKind {
    /// Regular file
    File,
    /// Directory
    Directory,
}

/// Capabilities the host module system lends to the stylesheet plugin.
///
/// Two groups of operations live here:
///
/// - URL resolution and text fetching (`to_url`, `fetch_text`), used once per
///   requested stylesheet to obtain its raw source.
/// - Synchronous file access (`file_read`, `path_exists`), used by the
///   compiler while it resolves `@use`/`@import` rules. The compiler cannot
///   suspend mid-parse, so these must not be async.
///
/// ## Async Trait Send Bounds
///
/// On native targets, async methods produce `Send` futures.
/// On WASM, async methods produce `?Send` futures.
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
pub trait HostRuntime: Send + Sync {
    // ═══════════════════════════════════════════════════════════════════════
    // URL RESOLUTION
    // ═══════════════════════════════════════════════════════════════════════

    /// Resolve a module-relative base path to an absolute URL.
    ///
    /// A trailing `/` on `base` is preserved so callers can append a module
    /// name directly.
    fn to_url(&self, base: &str) -> RuntimeResult<String>;

    // ═══════════════════════════════════════════════════════════════════════
    // FETCH
    // ═══════════════════════════════════════════════════════════════════════

    /// Fetch the text content at `url`.
    ///
    /// Default implementation reads the URL as a local path.
    async fn fetch_text(&self, url: &str) -> RuntimeResult<String> {
        self.file_read_string(Path::new(url))
    }

    // ═══════════════════════════════════════════════════════════════════════
    // FILE OPERATIONS
    // ═══════════════════════════════════════════════════════════════════════

    /// Read entire file contents as bytes.
    fn file_read(&self, path: &Path) -> RuntimeResult<Vec<u8>>;

    /// Read file as string with UTF-8 encoding.
    fn file_read_string(&self, path: &Path) -> RuntimeResult<String> {
        let bytes = self.file_read(path)?;
        String::from_utf8(bytes)
            .map_err(|e| RuntimeError::InvalidUtf8(format!("{}: {}", path.display(), e)))
    }

    /// Write bytes to file (creates or overwrites).
    fn file_write(&self, path: &Path, contents: &[u8]) -> RuntimeResult<()>;

    /// Check if path exists, optionally filtering by type.
    fn path_exists(&self, path: &Path, kind: Option<PathKind>) -> RuntimeResult<bool>;

    /// Check if path exists and is a file.
    fn is_file(&self, path: &Path) -> RuntimeResult<bool> {
        self.path_exists(path, Some(PathKind::File))
    }

    /// Check if path exists and is a directory.
    fn is_dir(&self, path: &Path) -> RuntimeResult<bool> {
        self.path_exists(path, Some(PathKind::Directory))
    }
}

/// Lexically normalize a path: drop `.` components and fold `..` into
/// their parent. Never touches the filesystem.
pub fn normalize_components(path: &Path) -> PathBuf {
    use std::path::Component;

    let mut normalized = PathBuf::new();
    for component in path.components() {
        match component {
            Component::ParentDir => {
                let at_parent = matches!(
                    normalized.components().next_back(),
                    None | Some(Component::ParentDir)
                );
                if at_parent || !normalized.pop() {
                    normalized.push("..");
                }
            }
            Component::CurDir => {}
            other => normalized.push(other),
        }
    }
    normalized
}
