/*
 * sink.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * Style injection sinks.
 *
 * A sink is where compiled CSS ends up during development loads. In a
 * browser that is a new <style> element appended to document.head; here it
 * is any StyleSink implementation:
 * - DocumentSink: collects style elements and splices them into an HTML head
 * - RecordingSink: keeps the injected CSS for inspection
 */

use std::sync::Mutex;

/// Receives compiled CSS for immediate use.
///
/// Each call corresponds to one new style element. Sinks never deduplicate:
/// injecting the same CSS twice yields two elements.
pub trait StyleSink: Send + Sync {
    fn inject(&self, css: &str);
}

/// Sink that records every injection in order.
#[derive(Debug, Default)]
pub struct RecordingSink {
    injected: Mutex<Vec<String>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of everything injected so far.
    pub fn injected(&self) -> Vec<String> {
        self.injected
            .lock()
            .map(|guard| guard.clone())
            .unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.injected.lock().map(|guard| guard.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl StyleSink for RecordingSink {
    fn inject(&self, css: &str) {
        if let Ok(mut guard) = self.injected.lock() {
            guard.push(css.to_string());
        }
    }
}

/// Sink that builds `<style>` elements for an HTML document head.
///
/// Elements are kept in injection order. `render_into` splices them into an
/// existing page just before `</head>`, which is where `appendChild` on the
/// head would have placed them.
#[derive(Debug, Default)]
pub struct DocumentSink {
    elements: Mutex<Vec<String>>,
}

impl DocumentSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// The `<style>` elements created so far, as markup.
    pub fn style_elements(&self) -> Vec<String> {
        self.elements
            .lock()
            .map(|guard| guard.clone())
            .unwrap_or_default()
    }

    /// Insert every collected style element into `html`.
    ///
    /// Elements go right before the closing head tag (matched
    /// case-insensitively). Pages without one get a head element prepended.
    pub fn render_into(&self, html: &str) -> String {
        let markup: String = self
            .style_elements()
            .iter()
            .map(|element| format!("{}\n", element))
            .collect();

        match find_ascii_case_insensitive(html, "</head>") {
            Some(index) => {
                let mut out = String::with_capacity(html.len() + markup.len());
                out.push_str(&html[..index]);
                out.push_str(&markup);
                out.push_str(&html[index..]);
                out
            }
            None => format!("<head>\n{}</head>\n{}", markup, html),
        }
    }
}

impl StyleSink for DocumentSink {
    fn inject(&self, css: &str) {
        let element = format!("<style>\n{}\n</style>", escape_style_text(css));
        if let Ok(mut guard) = self.elements.lock() {
            guard.push(element);
        }
    }
}

/// Style element content is raw text; only a closing tag can break out of it.
fn escape_style_text(css: &str) -> String {
    let mut out = String::with_capacity(css.len());
    let mut rest = css;
    while let Some(index) = find_ascii_case_insensitive(rest, "</style") {
        out.push_str(&rest[..index]);
        out.push_str("<\\/");
        rest = &rest[index + 2..];
    }
    out.push_str(rest);
    out
}

fn find_ascii_case_insensitive(haystack: &str, needle: &str) -> Option<usize> {
    haystack
        .as_bytes()
        .windows(needle.len())
        .position(|window| window.eq_ignore_ascii_case(needle.as_bytes()))
}
