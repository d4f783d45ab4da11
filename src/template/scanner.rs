//! Placeholder discovery.
//!
//! Recognizes `{{expr}}` tokens and the `{{#field}}` / `{{/field}}` loop
//! markers. Scanning never fails: unbalanced braces simply yield no token.

use regex::{Captures, Regex};
use std::collections::BTreeSet;
use std::sync::OnceLock;

use crate::model::Document;

/// Placeholder and loop-marker scanner.
#[derive(Debug, Clone)]
pub struct Scanner {
    placeholder: Regex,
    loop_start: Regex,
}

impl Scanner {
    /// Create a scanner with compiled patterns.
    pub fn new() -> Self {
        Self {
            placeholder: Regex::new(r"\{\{([^}]+)\}\}").unwrap(),
            loop_start: Regex::new(r"\{\{#(\w+)\}\}").unwrap(),
        }
    }

    /// Shared scanner instance.
    pub fn shared() -> &'static Scanner {
        static SCANNER: OnceLock<Scanner> = OnceLock::new();
        SCANNER.get_or_init(Scanner::new)
    }

    /// Every trimmed token in `text`, loop markers included, in order.
    ///
    /// Tokens without a field path, such as `{{ }}` or `{{|upper}}`, are
    /// not placeholders and are skipped.
    pub fn tokens<'t>(&self, text: &'t str) -> Vec<&'t str> {
        self.placeholder
            .captures_iter(text)
            .filter_map(|c| c.get(1))
            .map(|m| m.as_str().trim())
            .filter(|t| !path_part(t).is_empty())
            .collect()
    }

    /// Distinct field paths in `text`, formatter suffix removed.
    pub fn scan(&self, text: &str) -> BTreeSet<String> {
        self.tokens(text)
            .into_iter()
            .filter(|t| !is_loop_marker(t))
            .map(|t| path_part(t).to_string())
            .collect()
    }

    /// Field names of all loop start markers in `text`.
    pub fn loop_fields(&self, text: &str) -> Vec<String> {
        self.loop_start
            .captures_iter(text)
            .map(|c| c[1].to_string())
            .collect()
    }

    /// Field name of the first loop start marker in `text`.
    pub fn first_loop(&self, text: &str) -> Option<String> {
        self.loop_start.captures(text).map(|c| c[1].to_string())
    }

    /// Whether `text` contains a loop start marker.
    pub fn has_loops(&self, text: &str) -> bool {
        self.loop_start.is_match(text)
    }

    /// Replace every field placeholder in `text` using `resolve`.
    ///
    /// `resolve` receives the trimmed expression. Loop markers are left as
    /// literal text. Replacement is a single pass, so resolved values are
    /// never scanned again.
    pub fn replace<F>(&self, text: &str, mut resolve: F) -> String
    where
        F: FnMut(&str) -> String,
    {
        self.placeholder
            .replace_all(text, |caps: &Captures| {
                let expr = caps[1].trim();
                if is_loop_marker(expr) || path_part(expr).is_empty() {
                    caps[0].to_string()
                } else {
                    resolve(expr)
                }
            })
            .into_owned()
    }

    /// Distinct field paths across every paragraph of `doc`.
    pub fn scan_document(&self, doc: &Document) -> BTreeSet<String> {
        doc.all_paragraphs()
            .into_iter()
            .flat_map(|p| self.scan(&p.text()))
            .collect()
    }
}

impl Default for Scanner {
    fn default() -> Self {
        Self::new()
    }
}

/// Whether a trimmed token is a loop start or end marker.
pub fn is_loop_marker(token: &str) -> bool {
    token.starts_with('#') || token.starts_with('/')
}

/// Remove the start and end markers of loop `field` from `text`.
pub fn strip_loop_markers(text: &str, field: &str) -> String {
    text.replace(&format!("{{{{#{}}}}}", field), "")
        .replace(&format!("{{{{/{}}}}}", field), "")
}

/// Path portion of an expression: everything before the first `|`, trimmed.
pub fn path_part(expr: &str) -> &str {
    expr.split('|').next().unwrap_or(expr).trim()
}

/// Distinct field paths in `text` (formatters stripped, loop markers excluded).
pub fn scan(text: &str) -> BTreeSet<String> {
    Scanner::shared().scan(text)
}

/// Distinct field paths used anywhere in `doc`.
pub fn extract_placeholders(doc: &Document) -> BTreeSet<String> {
    Scanner::shared().scan_document(doc)
}
