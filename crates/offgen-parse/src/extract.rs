//! Tagged declaration extraction.
//!
//! Pattern-based scan, not a C parser: after the tag comes everything up to
//! the first `(` (return type and name), then everything up to the first `)`
//! (argument list). Nested parentheses in the argument list therefore end up
//! truncated; the decomposer rejects them as function pointer arguments.

use regex::Regex;
use thiserror::Error;

use crate::declarator::is_ident_char;

/// Tag is not usable as a marker token.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid tag '{0}': must be a C identifier")]
pub struct InvalidTag(pub String);

/// One tagged occurrence, as found in the text.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RawMatch {
    /// Byte offset of the tag within the unit.
    pub offset: usize,
    /// Declaration text after the tag, through the closing parenthesis.
    /// Example: `int add(int a, int b)`
    pub full_declaration: String,
    /// Text between the parentheses, verbatim.
    /// Example: `int a, int b`
    pub arg_list: String,
}

impl RawMatch {
    /// 1-based line of the tag within `text` (the unit this match came from).
    #[must_use]
    pub fn line(&self, text: &str) -> usize {
        let end = self.offset.min(text.len());
        text[..end].matches('\n').count() + 1
    }

    /// Declaration head: return type and symbol name, without the argument list.
    #[must_use]
    pub fn head(&self) -> &str {
        self.full_declaration.split('(').next().unwrap_or_default()
    }
}

/// Scanner for one tag token.
#[derive(Clone, Debug)]
pub struct Extractor {
    tag: String,
    pattern: Regex,
}

impl Extractor {
    /// Create an extractor for `tag`.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidTag`] unless `tag` is a C identifier.
    pub fn new(tag: &str) -> Result<Self, InvalidTag> {
        if !is_identifier(tag) {
            return Err(InvalidTag(tag.to_string()));
        }
        // The head must start with a non-space character, so a tag directly
        // followed by `(` never matches.
        let pattern = Regex::new(&format!(
            r"\b{}\b\s*([^(\s][^(]*)\(([^)]*)\)",
            regex::escape(tag)
        ))
        .map_err(|_| InvalidTag(tag.to_string()))?;

        Ok(Self {
            tag: tag.to_string(),
            pattern,
        })
    }

    /// Tag this extractor scans for.
    #[must_use]
    pub fn tag(&self) -> &str {
        &self.tag
    }

    /// Find every tagged declaration in `text`, in source order.
    ///
    /// Tags inside preprocessor directives (`#define __tag`) are not
    /// declarations and are skipped.
    #[must_use]
    pub fn extract(&self, text: &str) -> Vec<RawMatch> {
        let mut matches = Vec::new();
        let mut pos = 0;

        while let Some(caps) = self.pattern.captures_at(text, pos) {
            let (Some(whole), Some(head), Some(args)) = (caps.get(0), caps.get(1), caps.get(2))
            else {
                break;
            };

            if in_directive(text, whole.start()) {
                pos = whole.start() + self.tag.len();
                continue;
            }

            matches.push(RawMatch {
                offset: whole.start(),
                full_declaration: text[head.start()..whole.end()].trim().to_string(),
                arg_list: args.as_str().to_string(),
            });
            pos = whole.end();
        }

        matches
    }
}

/// Check whether `s` is a valid C identifier.
#[must_use]
pub fn is_identifier(s: &str) -> bool {
    !s.is_empty() && !s.starts_with(|c: char| c.is_ascii_digit()) && s.chars().all(is_ident_char)
}

/// Check whether the line containing `offset` is a preprocessor directive.
fn in_directive(text: &str, offset: usize) -> bool {
    let line_start = text[..offset].rfind('\n').map_or(0, |i| i + 1);
    text[line_start..offset].trim_start().starts_with('#')
}
