//! Artifact writer: serializes the build map into wrapper modules.
//!
//! Copyright (c) 2025 Posit, PBC
//!
//! Each built stylesheet becomes a small module definition. Requiring
//! `"<plugin>!<module>"` at runtime then hands the baked CSS straight to the
//! plugin's injection routine, with no fetch and no compile:
//!
//! ```text
//! define('style!main.scss', ['style'], function (style) { return style._injectCSS('.a{color:red}');});
//! ```

use crate::builder::BuildSession;

/// Name of the runtime injection routine the wrapper modules call.
pub const INJECT_FUNCTION: &str = "_injectCSS";

/// Escape `content` for a single-quoted JavaScript string literal.
pub fn js_escape(content: &str) -> String {
    let mut out = String::with_capacity(content.len());
    for c in content.chars() {
        match c {
            '\'' => out.push_str("\\'"),
            '\\' => out.push_str("\\\\"),
            '\u{000C}' => out.push_str("\\f"),
            '\u{0008}' => out.push_str("\\b"),
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            '\r' => out.push_str("\\r"),
            '\u{2028}' => out.push_str("\\u2028"),
            '\u{2029}' => out.push_str("\\u2029"),
            c => out.push(c),
        }
    }
    out
}

/// The wrapper module for one compiled stylesheet.
pub fn wrapper_module(plugin_name: &str, module_name: &str, css: &str) -> String {
    let plugin = js_escape(plugin_name);
    format!(
        "define('{plugin}!{module}', ['{plugin}'], function (style) {{ return style.{inject}('{css}');}});\n",
        module = js_escape(module_name),
        inject = INJECT_FUNCTION,
        css = js_escape(css),
    )
}

impl BuildSession {
    /// Wrapper module for `module_name`, or `None` when it was never built
    /// (or its build failed).
    pub fn write(&self, plugin_name: &str, module_name: &str) -> Option<String> {
        self.get(module_name)
            .map(|css| wrapper_module(plugin_name, module_name, &css))
    }

    /// Wrapper modules for every built stylesheet, in build order.
    pub fn write_all(&self, plugin_name: &str) -> String {
        self.entries()
            .iter()
            .map(|(name, css)| wrapper_module(plugin_name, name, css))
            .collect()
    }
}
