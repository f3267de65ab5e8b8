/*
 * style-runtime
 * Copyright (c) 2025 Posit, PBC
 *
 * Host abstraction layer for the stylesheet loader.
 *
 * This crate provides the capabilities a host module system lends to the
 * stylesheet plugin, so the plugin can run against different hosts:
 *
 * - HostRuntime: URL resolution, text fetch, and synchronous file access
 * - NativeHost: filesystem-backed host (default for native targets)
 * - StyleSink: where development builds inject compiled CSS
 * - HostFs: grass filesystem adapter over any HostRuntime
 */

mod native;
mod sink;
mod traits;

#[cfg(not(target_arch = "wasm32"))]
pub mod sass_native;

// Re-export core types (API surface)
pub use traits::{HostRuntime, PathKind, RuntimeError, RuntimeResult, normalize_components};

// Re-export host implementations
pub use native::NativeHost;

// Re-export sinks
pub use sink::{DocumentSink, RecordingSink, StyleSink};

#[cfg(not(target_arch = "wasm32"))]
pub use sass_native::HostFs;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_native_host_file_roundtrip() {
        let temp = tempfile::tempdir().unwrap();
        let host = NativeHost::new(temp.path());

        let file_path = temp.path().join("nested/test.scss");
        host.file_write(&file_path, b".x {}").unwrap();

        assert!(host.path_exists(&file_path, None).unwrap());
        assert_eq!(host.file_read_string(&file_path).unwrap(), ".x {}");
    }
}
