//! Header address extraction.
//!
//! Walks a message's headers in a configurable priority order and pulls out
//! every recipient address as an ordered list of hints for identity
//! selection. Header access goes through the [`HeaderSource`] capability so
//! the engine stays independent of any particular message representation.

use std::collections::HashMap;

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

use crate::types::{AddressHint, DEFAULT_HEADER_PRIORITY};

/// Address inside an angle-bracket route: `"Display Name" <user@host>`.
static ANGLE_ADDR: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"<\s*([^<>\s]+)\s*>").expect("ANGLE_ADDR: hardcoded regex is invalid")
});

/// Read access to a message's headers.
///
/// An absent header yields an empty vec, never an error. A header may repeat
/// (multiple `Delivered-To` lines); implementations return all occurrences in
/// encounter order.
pub trait HeaderSource {
    fn header_values(&self, name: &str) -> Vec<String>;
}

/// Header names compare ASCII-case-insensitively, per RFC 5322.
impl HeaderSource for HashMap<String, Vec<String>> {
    fn header_values(&self, name: &str) -> Vec<String> {
        self.iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, values)| values.clone())
            .unwrap_or_default()
    }
}

impl<T: HeaderSource + ?Sized> HeaderSource for &T {
    fn header_values(&self, name: &str) -> Vec<String> {
        (**self).header_values(name)
    }
}

/// Extract address hints from `source`, walking `priority` in order.
///
/// Each raw header value is parsed as a comma-separated address list; each
/// entry may be a bare address or a display-name form with the address in
/// angle brackets. Malformed entries are skipped without aborting the rest.
/// Output order is headers in priority order, values in encounter order,
/// entries left to right; duplicates across headers are kept, since
/// consumers take the first structural match anyway.
pub fn extract_hints(priority: &[&str], source: impl HeaderSource) -> Vec<AddressHint> {
    let mut hints = Vec::new();

    for name in priority {
        for raw in source.header_values(name) {
            for entry in split_address_list(&raw) {
                match parse_entry(entry) {
                    Some(address) => hints.push(AddressHint::from_header(address, *name)),
                    None => {
                        debug!(header = *name, entry, "skipping unparseable address entry");
                    }
                }
            }
        }
    }

    hints
}

/// [`extract_hints`] with the default envelope-first priority order.
pub fn extract_hints_default(source: impl HeaderSource) -> Vec<AddressHint> {
    extract_hints(&DEFAULT_HEADER_PRIORITY, source)
}

/// Split an address-list header value on commas, honoring double-quoted
/// display names and angle-bracket routes (a comma inside either does not
/// split).
fn split_address_list(value: &str) -> impl Iterator<Item = &str> {
    let mut entries = Vec::new();
    let mut start = 0;
    let mut in_quotes = false;
    let mut in_angles = false;

    for (pos, ch) in value.char_indices() {
        match ch {
            '"' => in_quotes = !in_quotes,
            '<' if !in_quotes => in_angles = true,
            '>' if !in_quotes => in_angles = false,
            ',' if !in_quotes && !in_angles => {
                entries.push(&value[start..pos]);
                start = pos + 1;
            }
            _ => {}
        }
    }
    entries.push(&value[start..]);

    entries.into_iter().map(str::trim).filter(|e| !e.is_empty())
}

/// Pull the bare address out of a single list entry.
///
/// Returns `None` for entries with no plausible address, such as group
/// syntax (`undisclosed-recipients:;`) or an empty angle pair.
fn parse_entry(entry: &str) -> Option<&str> {
    let candidate = match ANGLE_ADDR.captures(entry) {
        Some(caps) => caps.get(1).map(|m| m.as_str())?,
        None => entry.trim(),
    };

    // Minimal address shape: non-empty local part and domain part.
    let (local, domain) = candidate.split_once('@')?;
    if local.is_empty() || domain.is_empty() {
        return None;
    }
    Some(candidate)
}
