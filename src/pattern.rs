//! Catch-all pattern compilation and matching.
//!
//! A catch-all pattern is an email-address shape where `*` stands for one or
//! more characters that are not `@`: `*@example.com`, `user+*@example.com`,
//! `*-dev@*.example.com`. Literals match exactly, case-insensitively, and the
//! match is anchored at both ends.

use regex::RegexBuilder;
use tracing::debug;

use crate::error::{IdentityError, PatternErrorKind, Result};

/// A catch-all pattern compiled for repeated matching.
///
/// Immutable once built and cheap to clone (the inner regex is reference
/// counted), so instances can be shared freely across threads.
#[derive(Debug, Clone)]
pub enum CompiledPattern {
    /// Empty pattern string: the identity has no catch-all configured
    Disabled,
    /// Malformed pattern, degrades to never-matching
    Invalid(PatternErrorKind),
    /// Ready to match
    Valid(regex::Regex),
}

impl CompiledPattern {
    /// Test an address against this pattern. `Disabled` and `Invalid`
    /// always return `false`.
    pub fn is_match(&self, address: &str) -> bool {
        match self {
            CompiledPattern::Valid(re) => re.is_match(address.trim()),
            CompiledPattern::Disabled | CompiledPattern::Invalid(_) => false,
        }
    }

    pub fn is_valid(&self) -> bool {
        matches!(self, CompiledPattern::Valid(_))
    }

    pub fn is_disabled(&self) -> bool {
        matches!(self, CompiledPattern::Disabled)
    }
}

/// Compile a catch-all pattern string.
///
/// Never fails: the empty string yields [`CompiledPattern::Disabled`] and a
/// malformed pattern yields [`CompiledPattern::Invalid`], both of which match
/// nothing. Use [`try_compile`] when compilation errors should be surfaced.
pub fn compile(pattern: &str) -> CompiledPattern {
    match try_compile(pattern) {
        Ok(compiled) => compiled,
        Err(IdentityError::InvalidPattern { kind, pattern, .. }) => {
            debug!(pattern = %pattern, ?kind, "catch-all pattern is invalid, will never match");
            CompiledPattern::Invalid(kind)
        }
        // try_compile only produces InvalidPattern
        Err(_) => CompiledPattern::Invalid(PatternErrorKind::Regex),
    }
}

/// Strict variant of [`compile`] for configuration surfaces that validate
/// user input before storing it.
pub fn try_compile(pattern: &str) -> Result<CompiledPattern> {
    if pattern.is_empty() {
        return Ok(CompiledPattern::Disabled);
    }

    // Exactly one '@' separates local part from domain part.
    let at_count = pattern.bytes().filter(|&b| b == b'@').count();
    if at_count != 1 {
        let kind = if at_count == 0 {
            PatternErrorKind::MissingAt
        } else {
            PatternErrorKind::MultipleAt
        };
        return Err(IdentityError::InvalidPattern {
            kind,
            pattern: pattern.to_string(),
            message: "pattern must contain exactly one '@'".to_string(),
        });
    }

    let re = RegexBuilder::new(&translate(pattern))
        .case_insensitive(true)
        .build()
        .map_err(|e| IdentityError::InvalidPattern {
            kind: PatternErrorKind::Regex,
            pattern: pattern.to_string(),
            message: e.to_string(),
        })?;

    Ok(CompiledPattern::Valid(re))
}

/// Test an address against a pattern, compiling through the process-wide
/// cache. Fails closed: invalid or disabled patterns return `false`.
pub fn matches(pattern: &str, address: &str) -> bool {
    crate::cache::get_or_compile(pattern).is_match(address)
}

/// Translate a catch-all pattern into an anchored regex.
///
/// Literal runs are escaped verbatim; each `*` becomes `[^@]+` so a wildcard
/// spans one or more characters but never crosses the local/domain boundary.
fn translate(pattern: &str) -> String {
    let mut out = String::with_capacity(pattern.len() + 8);
    out.push_str(r"\A");
    for segment in split_keeping_stars(pattern) {
        match segment {
            "*" => out.push_str("[^@]+"),
            literal => out.push_str(&regex::escape(literal)),
        }
    }
    out.push_str(r"\z");
    out
}

/// Split a pattern into `*` tokens and literal runs, preserving order.
fn split_keeping_stars(pattern: &str) -> impl Iterator<Item = &str> {
    let mut rest = pattern;
    std::iter::from_fn(move || {
        if rest.is_empty() {
            return None;
        }
        let segment = match rest.find('*') {
            Some(0) => &rest[..1],
            Some(pos) => &rest[..pos],
            None => rest,
        };
        rest = &rest[segment.len()..];
        Some(segment)
    })
}
