use serde::{Deserialize, Serialize};

/// Default header priority for hint extraction.
///
/// Envelope-level headers come first: they record the address the message was
/// actually delivered to, which beats the addressing headers when a user owns
/// several aliases at one account.
pub const DEFAULT_HEADER_PRIORITY: [&str; 5] = [
    "Delivered-To",
    "X-Envelope-To",
    "X-Original-To",
    "To",
    "Cc",
];

/// Immutable snapshot of a configured sender identity.
///
/// Lifecycle (creation, editing, deletion) belongs to an external identity
/// store; matching only reads `email` and `catch_all`. `id` and `name` are
/// opaque metadata carried through for the consumer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    /// Store-assigned identifier
    #[serde(default)]
    pub id: u64,
    /// Display name
    #[serde(default)]
    pub name: String,
    /// Configured email address, compared case-insensitively
    #[serde(default)]
    pub email: Option<String>,
    /// Wildcard catch-all pattern, e.g. `*@example.com`
    #[serde(default)]
    pub catch_all: Option<String>,
}

impl Identity {
    /// Create an identity with just an email address.
    pub fn with_email(id: u64, email: impl Into<String>) -> Self {
        Self {
            id,
            email: Some(email.into()),
            ..Default::default()
        }
    }

    /// Create an identity with just a catch-all pattern.
    pub fn with_catch_all(id: u64, pattern: impl Into<String>) -> Self {
        Self {
            id,
            catch_all: Some(pattern.into()),
            ..Default::default()
        }
    }

    /// The configured email, if present and non-empty.
    pub(crate) fn email_nonempty(&self) -> Option<&str> {
        self.email.as_deref().filter(|e| !e.is_empty())
    }

    /// The configured catch-all pattern, if present and non-empty.
    pub(crate) fn catch_all_nonempty(&self) -> Option<&str> {
        self.catch_all.as_deref().filter(|p| !p.is_empty())
    }
}

/// A candidate address extracted from message headers.
///
/// `address` is trimmed and lower-cased at construction so all downstream
/// comparisons are plain equality. The originating header is kept for
/// diagnostics only and never consulted by matching.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddressHint {
    pub address: String,
    pub header: Option<String>,
}

impl AddressHint {
    /// Create a hint from a raw address, normalizing it for comparison.
    pub fn new(address: &str) -> Self {
        Self {
            address: address.trim().to_lowercase(),
            header: None,
        }
    }

    /// Create a hint that records its originating header.
    pub fn from_header(address: &str, header: impl Into<String>) -> Self {
        Self {
            address: address.trim().to_lowercase(),
            header: Some(header.into()),
        }
    }
}

impl From<&str> for AddressHint {
    fn from(address: &str) -> Self {
        Self::new(address)
    }
}

/// How an identity was selected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchKind {
    /// Identity email equals a hint, case-insensitively
    Exact,
    /// Identity catch-all pattern matched a hint
    CatchAll,
    /// No structural match; a default or first identity was returned
    Fallback,
    /// Empty identity list, nothing to return
    None,
}

/// Result of identity selection.
///
/// When `kind` is [`MatchKind::CatchAll`], `matched_address` carries the
/// concrete hint the pattern matched; the compose flow uses it to override
/// the visible From address.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdentityMatch {
    pub identity: Option<Identity>,
    pub matched_address: Option<String>,
    pub kind: MatchKind,
}

impl IdentityMatch {
    pub(crate) fn exact(identity: &Identity, address: &str) -> Self {
        Self {
            identity: Some(identity.clone()),
            matched_address: Some(address.to_string()),
            kind: MatchKind::Exact,
        }
    }

    pub(crate) fn catch_all(identity: &Identity, address: &str) -> Self {
        Self {
            identity: Some(identity.clone()),
            matched_address: Some(address.to_string()),
            kind: MatchKind::CatchAll,
        }
    }

    pub(crate) fn fallback(identity: Option<&Identity>) -> Self {
        Self {
            identity: identity.cloned(),
            matched_address: None,
            kind: MatchKind::Fallback,
        }
    }

    pub(crate) fn none() -> Self {
        Self {
            identity: None,
            matched_address: None,
            kind: MatchKind::None,
        }
    }
}
