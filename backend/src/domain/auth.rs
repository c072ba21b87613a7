//! Authentication primitives.
//!
//! Credentials never reach this service: the hosted identity provider hands
//! the browser an opaque session token, and sign-in exchanges it for a
//! [`VerifiedIdentity`](super::VerifiedIdentity).

use std::fmt;

use zeroize::Zeroizing;

/// Maximum accepted token length; provider tokens are compact JWTs.
pub const SESSION_TOKEN_MAX: usize = 4096;

/// Validation errors for [`SessionToken`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SessionTokenError {
    #[error("session token must not be empty")]
    Empty,
    #[error("session token must not contain whitespace")]
    ContainsWhitespace,
    #[error("session token must be at most {max} characters")]
    TooLong { max: usize },
}

/// Provider-issued session token, wiped from memory on drop.
///
/// # Examples
/// ```
/// use backend::domain::SessionToken;
///
/// let token = SessionToken::parse("  eyJhbGciOi.abc.def ").expect("token");
/// assert_eq!(token.expose(), "eyJhbGciOi.abc.def");
/// assert!(SessionToken::parse("").is_err());
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct SessionToken(Zeroizing<String>);

impl SessionToken {
    /// Trim and validate a raw token.
    pub fn parse(raw: &str) -> Result<Self, SessionTokenError> {
        let token = raw.trim();
        if token.is_empty() {
            return Err(SessionTokenError::Empty);
        }
        if token.chars().any(char::is_whitespace) {
            return Err(SessionTokenError::ContainsWhitespace);
        }
        if token.len() > SESSION_TOKEN_MAX {
            return Err(SessionTokenError::TooLong {
                max: SESSION_TOKEN_MAX,
            });
        }
        Ok(Self(Zeroizing::new(token.to_owned())))
    }

    /// Raw token for the outbound verification call.
    #[must_use]
    pub fn expose(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Debug for SessionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SessionToken(***)")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("", SessionTokenError::Empty)]
    #[case("   ", SessionTokenError::Empty)]
    #[case("abc def", SessionTokenError::ContainsWhitespace)]
    fn invalid_tokens(#[case] raw: &str, #[case] expected: SessionTokenError) {
        assert_eq!(SessionToken::parse(raw), Err(expected));
    }

    #[rstest]
    fn overlong_token_is_rejected() {
        let raw = "a".repeat(SESSION_TOKEN_MAX + 1);
        assert_eq!(
            SessionToken::parse(&raw),
            Err(SessionTokenError::TooLong {
                max: SESSION_TOKEN_MAX
            })
        );
    }

    #[rstest]
    fn debug_output_hides_the_token() {
        let token = SessionToken::parse("secret-token").expect("token");
        assert_eq!(format!("{token:?}"), "SessionToken(***)");
    }
}
