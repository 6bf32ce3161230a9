//! Identity Engine - sender identity resolution for email composers
//!
//! Given the recipient headers of a message and the configured sender
//! identities, this library decides which identity (and which concrete
//! address) to compose a reply or forward with:
//! - Envelope-aware hint extraction with a configurable header priority
//! - Exact email matching, case-insensitive
//! - Wildcard "catch-all" patterns (`*@example.com`, `user+*@example.com`)
//! - Deterministic tie-breaks across identities and hints
//! - Process-wide caching of compiled patterns
//!
//! # Example
//!
//! ```rust
//! use std::collections::HashMap;
//! use identity_engine::{
//!     extract_hints_default, select_identity, Identity, MatchKind, SelectOptions,
//! };
//!
//! let identities = vec![
//!     Identity::with_email(1, "me@work.example"),
//!     Identity {
//!         id: 2,
//!         email: Some("me@shop.example".into()),
//!         catch_all: Some("*@shop.example".into()),
//!         ..Default::default()
//!     },
//! ];
//!
//! let mut headers = HashMap::new();
//! headers.insert(
//!     "Delivered-To".to_string(),
//!     vec!["orders+acme@shop.example".to_string()],
//! );
//!
//! let hints = extract_hints_default(&headers);
//! let result = select_identity(&identities, &hints, &SelectOptions::new());
//!
//! assert_eq!(result.kind, MatchKind::CatchAll);
//! assert_eq!(result.identity.unwrap().id, 2);
//! // The compose flow shows this as the From address.
//! assert_eq!(result.matched_address.as_deref(), Some("orders+acme@shop.example"));
//! ```
//!
//! # Pattern Syntax
//!
//! A catch-all pattern is an address shape with exactly one `@`. Literal
//! characters match exactly, case-insensitively; each `*` matches one or
//! more characters other than `@`. The match is anchored at both ends.
//!
//! | Pattern | Matches | Does not match |
//! |---------|---------|----------------|
//! | `*@example.com` | `anything@example.com` | `a@sub.example.com` |
//! | `user+*@example.com` | `user+tag@example.com` | `other+tag@example.com` |
//! | `admin@*.example.com` | `admin@eu.example.com` | `admin@example.com` |
//!
//! The empty pattern is disabled and an otherwise malformed pattern is
//! invalid; both match nothing and neither is ever an error at match time.

pub mod cache;
pub mod error;
pub mod extract;
pub mod pattern;
pub mod select;
pub mod types;

// Re-export commonly used items
pub use cache::{clear as clear_pattern_cache, get_or_compile, DEFAULT_CACHE_SIZE};
pub use error::{IdentityError, PatternErrorKind, Result};
pub use extract::{extract_hints, extract_hints_default, HeaderSource};
pub use pattern::{compile, matches, try_compile, CompiledPattern};
pub use select::{select_for_headers, select_identity, SelectOptions};
pub use types::{
    AddressHint, Identity, IdentityMatch, MatchKind, DEFAULT_HEADER_PRIORITY,
};
