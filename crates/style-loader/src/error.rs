//! Error types for stylesheet loading.
//!
//! Copyright (c) 2025 Posit, PBC

use style_runtime::RuntimeError;
use thiserror::Error;

/// Errors that can occur while loading, building or configuring stylesheets.
///
/// Every variant is terminal for the request that produced it.
#[derive(Debug, Error)]
pub enum StyleError {
    /// Build mode was requested without a deployment root.
    ///
    /// Raised before any I/O happens for the module.
    #[error(
        "To use an optimizing stylesheet build, you must specify style.rootPath as an absolute URL"
    )]
    MissingRootPath,

    /// The configured base path could not be turned into a URL
    #[error("Failed to resolve stylesheet path '{path}': {source}")]
    Resolve {
        path: String,
        #[source]
        source: RuntimeError,
    },

    /// Retrieving the raw stylesheet text failed
    #[error("Failed to fetch stylesheet {url}: {source}")]
    Fetch {
        url: String,
        #[source]
        source: RuntimeError,
    },

    /// The compiler rejected the stylesheet
    #[error(transparent)]
    Compile(#[from] CompileError),

    /// Configuration could not be read or parsed
    #[error("Invalid stylesheet configuration: {0}")]
    Config(String),
}

/// A compiler failure, located in the stylesheet that caused it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompileError {
    /// File the error was reported in (the requested stylesheet or one of its imports)
    pub filename: String,
    /// 1-based line, when the compiler reported a position
    pub line: Option<usize>,
    /// 1-based column, when the compiler reported a position
    pub column: Option<usize>,
    pub message: String,
}

impl CompileError {
    /// Error with a source position.
    pub fn located(
        filename: impl Into<String>,
        line: usize,
        column: usize,
        message: impl Into<String>,
    ) -> Self {
        Self {
            filename: filename.into(),
            line: Some(line),
            column: Some(column),
            message: message.into(),
        }
    }

    /// Error without a source position (I/O, encoding).
    pub fn unlocated(filename: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            filename: filename.into(),
            line: None,
            column: None,
            message: message.into(),
        }
    }
}

impl std::fmt::Display for CompileError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match (self.line, self.column) {
            (Some(line), Some(column)) => write!(
                f,
                "Stylesheet parse error in {} on line {}, column {}: {}",
                self.filename, line, column, self.message
            ),
            _ => write!(f, "Stylesheet error in {}: {}", self.filename, self.message),
        }
    }
}

impl std::error::Error for CompileError {}
