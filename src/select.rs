//! Identity selection.
//!
//! Resolves which configured sender identity answers for a message, given
//! the address hints extracted from its headers. Exact email matches always
//! outrank catch-all matches; the phase structure below guarantees it by
//! running the exact pass over every hint before any pattern is consulted.

use tracing::trace;

use crate::cache;
use crate::extract::{extract_hints, HeaderSource};
use crate::types::{AddressHint, Identity, IdentityMatch};

/// Fallback behavior when no hint matches any identity.
#[derive(Debug, Clone, Default)]
pub struct SelectOptions {
    /// When set, fall back to `default_identity` instead of the first
    /// identity in the list.
    pub use_fallback_default: bool,
    /// The store's default identity, consulted only with
    /// `use_fallback_default`.
    pub default_identity: Option<Identity>,
}

impl SelectOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fall back to the given default identity.
    pub fn with_default(identity: Identity) -> Self {
        Self {
            use_fallback_default: true,
            default_identity: Some(identity),
        }
    }
}

/// Select the identity to compose with.
///
/// Phases, in order:
/// 1. No identities: nothing to select.
/// 2. A single identity is trivially best; hints are not consulted.
/// 3. Exact pass, hint-major: the highest-priority hint that equals any
///    identity's email (case-insensitively) wins, identity list order
///    breaking ties within one hint.
/// 4. Catch-all pass, identity-major: the first identity whose pattern
///    matches any hint wins, taking its highest-priority matching hint.
///    The nesting is deliberately opposite to the exact pass so that
///    identity order breaks ties between overlapping patterns.
/// 5. Fallback per `opts`.
///
/// Never panics or errors: malformed patterns simply never match.
pub fn select_identity(
    identities: &[Identity],
    hints: &[AddressHint],
    opts: &SelectOptions,
) -> IdentityMatch {
    if identities.is_empty() {
        return IdentityMatch::none();
    }

    if identities.len() == 1 {
        return IdentityMatch::fallback(Some(&identities[0]));
    }

    // Phase A: exact match. Runs to completion over all hints before any
    // catch-all is tried, so a lower-priority exact match still beats a
    // higher-priority pattern match.
    for hint in hints {
        for identity in identities {
            if let Some(email) = identity.email_nonempty() {
                if email.eq_ignore_ascii_case(&hint.address) {
                    trace!(identity = identity.id, address = %hint.address, "exact match");
                    return IdentityMatch::exact(identity, &hint.address);
                }
            }
        }
    }

    // Phase B: catch-all match. Identity-major so list order decides between
    // identities whose patterns both cover some hint; hint-major within one
    // identity so it binds to its highest-priority matching address.
    for identity in identities {
        if let Some(pattern) = identity.catch_all_nonempty() {
            let compiled = cache::get_or_compile(pattern);
            for hint in hints {
                if compiled.is_match(&hint.address) {
                    trace!(identity = identity.id, address = %hint.address, "catch-all match");
                    return IdentityMatch::catch_all(identity, &hint.address);
                }
            }
        }
    }

    // Phase C: fallback.
    if opts.use_fallback_default {
        IdentityMatch::fallback(opts.default_identity.as_ref())
    } else {
        IdentityMatch::fallback(identities.first())
    }
}

/// Extract hints from `source` and select an identity in one call.
///
/// This is the compose-flow entry point for replies and forwards.
pub fn select_for_headers(
    identities: &[Identity],
    priority: &[&str],
    source: impl HeaderSource,
    opts: &SelectOptions,
) -> IdentityMatch {
    let hints = extract_hints(priority, source);
    select_identity(identities, &hints, opts)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::MatchKind;

    fn hints(addresses: &[&str]) -> Vec<AddressHint> {
        addresses.iter().copied().map(AddressHint::from).collect()
    }

    #[test]
    fn test_empty_identities_is_none() {
        let result = select_identity(&[], &hints(&["a@x.com"]), &SelectOptions::new());
        assert_eq!(result.kind, MatchKind::None);
        assert!(result.identity.is_none());
        assert!(result.matched_address.is_none());
    }

    #[test]
    fn test_single_identity_short_circuits() {
        // One identity wins unconditionally; hints are not even consulted,
        // so a hint matching nothing changes nothing.
        let identities = vec![Identity::with_email(1, "me@x.com")];
        let result = select_identity(&identities, &hints(&["other@y.com"]), &SelectOptions::new());
        assert_eq!(result.kind, MatchKind::Fallback);
        assert_eq!(result.identity.as_ref().unwrap().id, 1);
        assert!(result.matched_address.is_none());
    }

    #[test]
    fn test_exact_match_is_case_insensitive() {
        let identities = vec![
            Identity::with_email(1, "user@a.com"),
            Identity::with_email(2, "other@a.com"),
        ];
        let result = select_identity(&identities, &hints(&["USER@A.com"]), &SelectOptions::new());
        assert_eq!(result.kind, MatchKind::Exact);
        assert_eq!(result.identity.as_ref().unwrap().id, 1);
        assert_eq!(result.matched_address.as_deref(), Some("user@a.com"));
    }

    #[test]
    fn test_exact_outranks_catch_all_across_hint_priority() {
        // Identity 1's pattern covers the first (highest-priority) hint, but
        // identity 2 exact-matches the second hint. Exact still wins.
        let identities = vec![
            Identity::with_catch_all(1, "*@a.com"),
            Identity::with_email(2, "victim@b.com"),
        ];
        let result = select_identity(
            &identities,
            &hints(&["anything@a.com", "victim@b.com"]),
            &SelectOptions::new(),
        );
        assert_eq!(result.kind, MatchKind::Exact);
        assert_eq!(result.identity.as_ref().unwrap().id, 2);
        assert_eq!(result.matched_address.as_deref(), Some("victim@b.com"));
    }

    #[test]
    fn test_exact_hint_priority_beats_identity_order() {
        // Hint-major nesting: the first hint picks identity 2 even though
        // identity 1 exact-matches a later hint.
        let identities = vec![
            Identity::with_email(1, "second@x.com"),
            Identity::with_email(2, "first@x.com"),
        ];
        let result = select_identity(
            &identities,
            &hints(&["first@x.com", "second@x.com"]),
            &SelectOptions::new(),
        );
        assert_eq!(result.identity.as_ref().unwrap().id, 2);
    }

    #[test]
    fn test_catch_all_match_reports_matched_address() {
        let identities = vec![
            Identity::with_email(1, "me@x.com"),
            Identity {
                id: 2,
                email: Some("me@x.com".into()),
                catch_all: Some("*@x.com".into()),
                ..Default::default()
            },
        ];
        let result = select_identity(
            &identities,
            &hints(&["anything@x.com"]),
            &SelectOptions::new(),
        );
        assert_eq!(result.kind, MatchKind::CatchAll);
        assert_eq!(result.matched_address.as_deref(), Some("anything@x.com"));
    }

    #[test]
    fn test_identity_order_breaks_catch_all_ties() {
        let identities = vec![
            Identity::with_catch_all(1, "*@a.com"),
            Identity::with_catch_all(2, "*@a.com"),
        ];
        let result = select_identity(&identities, &hints(&["x@a.com"]), &SelectOptions::new());
        assert_eq!(result.kind, MatchKind::CatchAll);
        assert_eq!(result.identity.as_ref().unwrap().id, 1);
    }

    #[test]
    fn test_catch_all_selects_by_domain() {
        let identities = vec![
            Identity::with_catch_all(1, "*@a.com"),
            Identity::with_catch_all(2, "*@b.com"),
        ];
        let result = select_identity(&identities, &hints(&["x@b.com"]), &SelectOptions::new());
        assert_eq!(result.kind, MatchKind::CatchAll);
        assert_eq!(result.identity.as_ref().unwrap().id, 2);
        assert_eq!(result.matched_address.as_deref(), Some("x@b.com"));
    }

    #[test]
    fn test_identity_binds_its_highest_priority_hint() {
        // Hint-minor within one identity: both hints match the pattern, the
        // first one is reported.
        let identities = vec![
            Identity::with_catch_all(1, "*@a.com"),
            Identity::with_catch_all(2, "*@b.com"),
        ];
        let result = select_identity(
            &identities,
            &hints(&["one@a.com", "two@a.com"]),
            &SelectOptions::new(),
        );
        assert_eq!(result.matched_address.as_deref(), Some("one@a.com"));
    }

    #[test]
    fn test_invalid_pattern_never_matches() {
        let identities = vec![
            Identity::with_catch_all(1, "not-a-pattern"),
            Identity::with_catch_all(2, "*@a.com"),
        ];
        let result = select_identity(&identities, &hints(&["x@a.com"]), &SelectOptions::new());
        assert_eq!(result.identity.as_ref().unwrap().id, 2);
    }

    #[test]
    fn test_fallback_to_first_identity() {
        let identities = vec![
            Identity::with_email(1, "a@x.com"),
            Identity::with_email(2, "b@x.com"),
        ];
        let result = select_identity(&identities, &[], &SelectOptions::new());
        assert_eq!(result.kind, MatchKind::Fallback);
        assert_eq!(result.identity.as_ref().unwrap().id, 1);
        assert!(result.matched_address.is_none());
    }

    #[test]
    fn test_fallback_to_default_identity() {
        let identities = vec![
            Identity::with_email(1, "a@x.com"),
            Identity::with_email(2, "b@x.com"),
        ];
        let opts = SelectOptions::with_default(Identity::with_email(7, "default@x.com"));
        let result = select_identity(&identities, &hints(&["nobody@y.com"]), &opts);
        assert_eq!(result.kind, MatchKind::Fallback);
        assert_eq!(result.identity.as_ref().unwrap().id, 7);
    }

    #[test]
    fn test_fallback_default_may_be_none() {
        let identities = vec![
            Identity::with_email(1, "a@x.com"),
            Identity::with_email(2, "b@x.com"),
        ];
        let opts = SelectOptions {
            use_fallback_default: true,
            default_identity: None,
        };
        let result = select_identity(&identities, &[], &opts);
        assert_eq!(result.kind, MatchKind::Fallback);
        assert!(result.identity.is_none());
    }

    #[test]
    fn test_empty_email_never_exact_matches() {
        let identities = vec![
            Identity {
                id: 1,
                email: Some(String::new()),
                ..Default::default()
            },
            Identity::with_email(2, "x@a.com"),
        ];
        let result = select_identity(&identities, &hints(&["x@a.com"]), &SelectOptions::new());
        assert_eq!(result.identity.as_ref().unwrap().id, 2);
    }

    #[test]
    fn test_exact_only_lists_keep_legacy_behavior() {
        // With no catch-all configured anywhere, the algorithm reduces to
        // the exact pass plus fallback.
        let identities = vec![
            Identity::with_email(1, "a@x.com"),
            Identity::with_email(2, "b@x.com"),
        ];

        let matched = select_identity(&identities, &hints(&["b@x.com"]), &SelectOptions::new());
        assert_eq!(matched.kind, MatchKind::Exact);
        assert_eq!(matched.identity.as_ref().unwrap().id, 2);

        let unmatched = select_identity(&identities, &hints(&["c@y.com"]), &SelectOptions::new());
        assert_eq!(unmatched.kind, MatchKind::Fallback);
        assert_eq!(unmatched.identity.as_ref().unwrap().id, 1);
    }
}
