//! Compiler adapter.
//!
//! Copyright (c) 2025 Posit, PBC
//!
//! The plugin never parses stylesheets itself. It hands already-fetched
//! source text plus a [`CompileOptions`] record to a [`StyleCompiler`] and
//! gets CSS or a [`CompileError`] back.
//!
//! [`GrassCompiler`] is the native backend. It maps the options onto grass:
//!
//! | option        | grass                                              |
//! |---------------|----------------------------------------------------|
//! | `filename`    | root path for `from_path`, served from memory      |
//! | `paths`       | load paths                                         |
//! | `compress`    | `OutputStyle::Compressed` / `Expanded`             |
//! | `env`         | production runs quiet (no `@warn`/`@debug` output) |
//! | `root_path`   | post-pass prefixing relative `url()` values        |
//! | `import_mode` | grass resolves imports synchronously either way    |

use std::path::PathBuf;

use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use style_runtime::HostRuntime;

use crate::error::CompileError;

/// Build environment tag handed to the compiler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Development,
    Production,
}

impl Environment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Environment::Development => "development",
            Environment::Production => "production",
        }
    }
}

/// How the compiler may resolve `@import`/`@use` rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImportMode {
    /// Imports must resolve without further async round-trips (builds)
    Sync,
    /// Imports may be resolved asynchronously (live loads)
    Async,
}

/// Options for a single compile call. Built fresh per request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompileOptions {
    /// URL of the stylesheet; used in errors and for relative imports
    pub filename: String,
    pub import_mode: ImportMode,
    pub env: Environment,
    /// Extra directories searched for imports
    pub paths: Vec<PathBuf>,
    /// Prefix for relative URLs in the generated CSS
    pub root_path: Option<String>,
    pub compress: bool,
}

impl CompileOptions {
    /// Options for a live, in-page load.
    ///
    /// Relative URLs resolve against the stylesheet directory itself so they
    /// keep working against the serving host.
    pub fn development(filename: impl Into<String>, base_url: &str) -> Self {
        Self {
            filename: filename.into(),
            import_mode: ImportMode::Async,
            env: Environment::Development,
            paths: vec![PathBuf::from(base_url)],
            root_path: Some(base_url.to_string()),
            compress: false,
        }
    }

    /// Options for an optimizing build targeting `root_path`.
    pub fn production(filename: impl Into<String>, base_url: &str, root_path: &str) -> Self {
        Self {
            filename: filename.into(),
            import_mode: ImportMode::Sync,
            env: Environment::Production,
            paths: vec![PathBuf::from(base_url)],
            root_path: Some(root_path.to_string()),
            compress: true,
        }
    }
}

/// An external stylesheet compiler.
///
/// Implementations receive the full source text; they perform no fetch of
/// their own for the root stylesheet.
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
pub trait StyleCompiler: Send + Sync {
    async fn compile(&self, source: &str, options: &CompileOptions)
    -> Result<String, CompileError>;
}

/// SCSS compiler backed by grass, resolving imports through a host.
#[cfg(not(target_arch = "wasm32"))]
pub struct GrassCompiler<'a> {
    host: &'a dyn HostRuntime,
}

#[cfg(not(target_arch = "wasm32"))]
impl<'a> GrassCompiler<'a> {
    pub fn new(host: &'a dyn HostRuntime) -> Self {
        Self { host }
    }

    /// Compile synchronously. The async trait method delegates here.
    pub fn compile_blocking(
        &self,
        source: &str,
        options: &CompileOptions,
    ) -> Result<String, CompileError> {
        use grass::{Options, OutputStyle};
        use style_runtime::HostFs;

        // grass joins imports onto the root as plain paths
        let root = local_path(&options.filename);
        let load_paths: Vec<PathBuf> = options
            .paths
            .iter()
            .map(|path| match path.to_str() {
                Some(url) => PathBuf::from(local_path(url)),
                None => path.clone(),
            })
            .collect();

        let fs = HostFs::new(self.host, root, source);

        let style = if options.compress {
            OutputStyle::Compressed
        } else {
            OutputStyle::Expanded
        };

        let grass_options = Options::default()
            .fs(&fs)
            .load_paths(load_paths.as_slice())
            .style(style)
            .quiet(options.env == Environment::Production);

        let css = grass::from_path(root, &grass_options)
            .map_err(|e| grass_error(&options.filename, root, *e))?;

        Ok(match options.root_path.as_deref() {
            Some(root) if !root.is_empty() => rewrite_relative_urls(&css, root),
            _ => css,
        })
    }
}

#[cfg(not(target_arch = "wasm32"))]
#[async_trait]
impl StyleCompiler for GrassCompiler<'_> {
    async fn compile(
        &self,
        source: &str,
        options: &CompileOptions,
    ) -> Result<String, CompileError> {
        self.compile_blocking(source, options)
    }
}

/// Local filesystem path for a `file://` URL; anything else is returned as is.
#[cfg(not(target_arch = "wasm32"))]
fn local_path(url: &str) -> &str {
    url.strip_prefix("file://").unwrap_or(url)
}

/// Turn the compiler's own failure value into a located error.
///
/// Failures in the root stylesheet are reported under `filename`, the URL the
/// source was fetched from, rather than the local `root` grass compiled.
#[cfg(not(target_arch = "wasm32"))]
fn grass_error(filename: &str, root: &str, error: grass::Error) -> CompileError {
    match error.kind() {
        grass::ErrorKind::ParseError { message, loc, .. } => {
            // grass names in-memory roots "stdin"
            let file = match loc.file.name() {
                "stdin" => filename,
                name if name == root => filename,
                name => name,
            };
            CompileError::located(file, loc.begin.line + 1, loc.begin.column + 1, message)
        }
        grass::ErrorKind::IoError(e) => CompileError::unlocated(filename, e.to_string()),
        grass::ErrorKind::FromUtf8Error(message) => CompileError::unlocated(filename, message),
        _ => CompileError::unlocated(filename, "unknown compiler error"),
    }
}

/// A `url()` token, or a string literal or comment that must be skipped.
///
/// Alternatives are tried leftmost-first, so `url(` text inside a string or a
/// comment is consumed by those branches and never reaches the `url` group.
static URL_FUNCTION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(concat!(
        r#""(?:[^"\\]|\\.)*"|'(?:[^'\\]|\\.)*'|/\*(?s:.*?)\*/|"#,
        r#"(?P<url>url\(\s*(?:"([^"]*)"|'([^']*)'|([^)'"\s]*))\s*\))"#,
    ))
    .expect("url() pattern is valid")
});

/// Prefix every relative `url()` reference in `css` with `root`.
///
/// Root-relative (`/x`), fragment (`#x`), empty, and scheme-qualified
/// (`https:`, `data:`) references are kept as they are, and so is `url(`
/// text inside string literals and comments.
///
/// Only plain `url()` forms are rewritten. `src()`, the string arguments of
/// `image-set()`, and unquoted URLs containing an escaped `)` pass through
/// unchanged.
pub fn rewrite_relative_urls(css: &str, root: &str) -> String {
    URL_FUNCTION
        .replace_all(css, |caps: &Captures<'_>| {
            if caps.name("url").is_none() {
                return caps[0].to_string();
            }
            let (quote, url) = if let Some(m) = caps.get(2) {
                ("\"", m.as_str())
            } else if let Some(m) = caps.get(3) {
                ("'", m.as_str())
            } else {
                ("", caps.get(4).map_or("", |m| m.as_str()))
            };

            if is_relative_url(url) {
                format!("url({quote}{root}{url}{quote})")
            } else {
                caps[0].to_string()
            }
        })
        .into_owned()
}

fn is_relative_url(url: &str) -> bool {
    if url.is_empty() || url.starts_with('/') || url.starts_with('#') {
        return false;
    }
    match url.split_once(':') {
        Some((scheme, _)) => !scheme
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.')),
        None => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use style_runtime::NativeHost;

    fn compile(source: &str, options: &CompileOptions) -> Result<String, CompileError> {
        let host = NativeHost::new("/");
        GrassCompiler::new(&host).compile_blocking(source, options)
    }

    #[test]
    fn test_development_options() {
        let options = CompileOptions::development("/app/scss/a.scss", "/app/scss/");
        assert_eq!(options.env, Environment::Development);
        assert_eq!(options.import_mode, ImportMode::Async);
        assert!(!options.compress);
        assert_eq!(options.root_path.as_deref(), Some("/app/scss/"));
        assert_eq!(options.paths, vec![PathBuf::from("/app/scss/")]);
    }

    #[test]
    fn test_production_options() {
        let options =
            CompileOptions::production("/app/scss/a.scss", "/app/scss/", "https://cdn/app/");
        assert_eq!(options.env.as_str(), "production");
        assert_eq!(options.import_mode, ImportMode::Sync);
        assert!(options.compress);
        assert_eq!(options.root_path.as_deref(), Some("https://cdn/app/"));
    }

    #[test]
    fn test_compile_expanded_and_compressed() {
        let source = "$primary: #007bff;\n.btn {\n  color: $primary;\n  .icon { margin: 0; }\n}\n";

        let dev = compile(source, &CompileOptions::development("/v/a.scss", "/v/")).unwrap();
        assert!(dev.contains(".btn"));
        assert!(dev.contains(".btn .icon"));
        assert!(dev.contains("#007bff"));

        let prod =
            compile(source, &CompileOptions::production("/v/a.scss", "/v/", "/r/")).unwrap();
        assert!(prod.contains(".btn{color:#007bff}"));
        assert!(prod.contains(".btn .icon{margin:0}"));
        assert!(prod.len() < dev.len());
    }

    #[test]
    fn test_compile_is_deterministic() {
        let source = ".a { .b { color: red; } }";
        let options = CompileOptions::production("/v/a.scss", "/v/", "/r/");
        assert_eq!(
            compile(source, &options).unwrap(),
            compile(source, &options).unwrap()
        );
    }

    #[test]
    fn test_compile_error_is_located() {
        let source = ".ok { color: red; }\n.btn { color: $undefined-variable; }\n";
        let err = compile(source, &CompileOptions::development("/v/broken.scss", "/v/"))
            .unwrap_err();

        assert_eq!(err.filename, "/v/broken.scss");
        assert_eq!(err.line, Some(2));
        assert!(err.column.is_some());
        assert!(err.message.contains("Undefined variable"));
        assert!(
            err.to_string()
                .starts_with("Stylesheet parse error in /v/broken.scss on line 2")
        );
    }

    #[test]
    fn test_imports_resolve_through_host() {
        let temp = tempfile::tempdir().unwrap();
        std::fs::write(temp.path().join("_vars.scss"), "$accent: teal;").unwrap();
        let base = format!("{}/", temp.path().display());
        let filename = format!("{}main.scss", base);

        let host = NativeHost::new(temp.path());
        let css = GrassCompiler::new(&host)
            .compile_blocking(
                "@import 'vars';\n.a { color: $accent; }",
                &CompileOptions::production(filename, &base, "/r/"),
            )
            .unwrap();
        assert_eq!(css.trim(), ".a{color:teal}");
    }

    #[test]
    fn test_imports_resolve_under_file_url() {
        let temp = tempfile::tempdir().unwrap();
        std::fs::write(temp.path().join("_vars.scss"), "$accent: teal;").unwrap();
        let base = format!("file://{}/", temp.path().display());
        let filename = format!("{}main.scss", base);

        let host = NativeHost::new(temp.path());
        let css = GrassCompiler::new(&host)
            .compile_blocking(
                "@import 'vars';\n.a { color: $accent; }",
                &CompileOptions::production(filename, &base, "/r/"),
            )
            .unwrap();
        assert_eq!(css.trim(), ".a{color:teal}");
    }

    #[test]
    fn test_file_url_errors_keep_the_fetched_url() {
        let temp = tempfile::tempdir().unwrap();
        let base = format!("file://{}/", temp.path().display());
        let filename = format!("{}broken.scss", base);

        let host = NativeHost::new(temp.path());
        let err = GrassCompiler::new(&host)
            .compile_blocking(
                ".a { color: $nope; }",
                &CompileOptions::development(filename.clone(), &base),
            )
            .unwrap_err();
        assert_eq!(err.filename, filename);
        assert_eq!(err.line, Some(1));
    }

    #[test]
    fn test_missing_import_is_an_error() {
        let err = compile(
            "@import 'does-not-exist';",
            &CompileOptions::development("/v/a.scss", "/v/"),
        )
        .unwrap_err();
        assert!(err.message.contains("Can't find stylesheet to import"));
    }

    #[test]
    fn test_compile_rewrites_relative_urls() {
        let source = ".logo { background: url(\"img/logo.png\"); }";
        let css = compile(
            source,
            &CompileOptions::production("/v/a.scss", "/v/", "https://cdn.example.com/app/"),
        )
        .unwrap();
        assert!(css.contains("url(\"https://cdn.example.com/app/img/logo.png\")"));
    }

    #[test]
    fn test_rewrite_relative_urls() {
        let css = concat!(
            ".a{background:url(img/a.png)}",
            ".b{background:url('img/b.png')}",
            ".c{background:url( \"c.png\" )}",
            ".d{background:url(/abs/d.png)}",
            ".e{background:url(https://x.test/e.png)}",
            ".f{background:url(data:image/png;base64,AAAA)}",
            ".g{filter:url(#svg)}",
        );

        let out = rewrite_relative_urls(css, "/root/");
        assert!(out.contains("url(/root/img/a.png)"));
        assert!(out.contains("url('/root/img/b.png')"));
        assert!(out.contains("url(\"/root/c.png\")"));
        assert!(out.contains("url(/abs/d.png)"));
        assert!(out.contains("url(https://x.test/e.png)"));
        assert!(out.contains("url(data:image/png;base64,AAAA)"));
        assert!(out.contains("url(#svg)"));
    }

    #[test]
    fn test_rewrite_skips_strings_and_comments() {
        let css = concat!(
            ".a{content:\"see url(x.png)\"}",
            ".b{content:'url(y.png)';background:url(z.png)}",
            "/* url(old.png) */",
            ".c{content:\"say \\\"url(q.png)\\\"\"}",
        );

        let out = rewrite_relative_urls(css, "/root/");
        assert!(out.contains(".a{content:\"see url(x.png)\"}"));
        assert!(out.contains("content:'url(y.png)'"));
        assert!(out.contains("background:url(/root/z.png)"));
        assert!(out.contains("/* url(old.png) */"));
        assert!(out.contains("url(q.png)"));
        assert!(!out.contains("/root/q.png"));
        assert!(!out.contains("/root/x.png"));
    }
}
