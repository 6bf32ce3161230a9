use thiserror::Error;

/// Classifies catch-all pattern compilation failures for programmatic matching.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatternErrorKind {
    /// Pattern contains no `@` separator
    MissingAt,
    /// Pattern contains more than one `@` separator
    MultipleAt,
    /// The translated regex failed to build (oversized pattern, etc.)
    Regex,
}

/// Identity engine error types.
///
/// The matching pipeline itself never propagates these: malformed patterns
/// degrade to never-matching and malformed address entries are skipped.
/// They surface only through the strict diagnostic APIs
/// ([`try_compile`](crate::pattern::try_compile)) so that configuration
/// surfaces can report mistakes to the user.
#[derive(Error, Debug)]
pub enum IdentityError {
    #[error("Invalid catch-all pattern '{pattern}': {message}")]
    InvalidPattern {
        kind: PatternErrorKind,
        pattern: String,
        message: String,
    },

    #[error("Unparseable address entry: {0}")]
    AddressParse(String),
}

pub type Result<T> = std::result::Result<T, IdentityError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pattern_error_kind_is_matchable() {
        // Consumers should be able to programmatically match error sub-types
        // instead of parsing error message strings.
        let err = IdentityError::InvalidPattern {
            kind: PatternErrorKind::MultipleAt,
            pattern: "a@b@c.com".into(),
            message: "pattern must contain exactly one '@'".into(),
        };
        match &err {
            IdentityError::InvalidPattern { kind, .. } => {
                assert!(matches!(kind, PatternErrorKind::MultipleAt));
            }
            _ => panic!("expected InvalidPattern"),
        }
    }

    #[test]
    fn test_pattern_error_display_includes_pattern() {
        let err = IdentityError::InvalidPattern {
            kind: PatternErrorKind::MissingAt,
            pattern: "no-at-sign".into(),
            message: "pattern must contain exactly one '@'".into(),
        };
        let display = format!("{}", err);
        assert!(display.contains("no-at-sign"), "got: {}", display);
    }

    #[test]
    fn test_address_parse_display() {
        let err = IdentityError::AddressParse("<<broken".into());
        assert!(format!("{}", err).contains("<<broken"));
    }
}
