//! Session Tokens
//!
//! HS256-signed JWTs carrying the user id (`sub`) and email. Lifetime comes
//! from configuration in the `<n>[s|m|h|d]` notation (`"1d"`, `"12h"`) or a
//! plain number of seconds.

use std::time::Duration;

use chrono::{DateTime, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TokenError {
    #[error("Token creation failed: {0}")]
    Creation(String),

    #[error("Token validation failed: {0}")]
    Invalid(String),

    #[error("Token expired")]
    Expired,

    #[error("Invalid token lifetime: {0}")]
    InvalidTtl(String),
}

/// Claims embedded in a session token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionClaims {
    /// User id
    pub sub: String,
    pub email: String,
    pub iat: i64,
    pub exp: i64,
}

/// A freshly signed token
#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

/// Issues and validates session tokens with a shared secret
#[derive(Clone)]
pub struct TokenSigner {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    ttl: Duration,
}

impl TokenSigner {
    pub fn new(secret: &[u8], ttl: Duration) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            ttl,
        }
    }

    pub fn issue(&self, subject: &str, email: &str) -> Result<IssuedToken, TokenError> {
        let now = Utc::now();
        let ttl = chrono::Duration::from_std(self.ttl)
            .map_err(|e| TokenError::InvalidTtl(e.to_string()))?;
        let expires_at = now
            .checked_add_signed(ttl)
            .ok_or_else(|| TokenError::InvalidTtl(format!("{:?}", self.ttl)))?;

        let claims = SessionClaims {
            sub: subject.to_string(),
            email: email.to_string(),
            iat: now.timestamp(),
            exp: expires_at.timestamp(),
        };

        let token = encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| TokenError::Creation(e.to_string()))?;

        Ok(IssuedToken { token, expires_at })
    }

    pub fn verify(&self, token: &str) -> Result<SessionClaims, TokenError> {
        decode::<SessionClaims>(token, &self.decoding_key, &Validation::default())
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => TokenError::Expired,
                _ => TokenError::Invalid(e.to_string()),
            })
    }
}

impl std::fmt::Debug for TokenSigner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenSigner")
            .field("secret", &"[REDACTED]")
            .field("ttl", &self.ttl)
            .finish()
    }
}

/// Parse a token lifetime such as `"1d"`, `"12h"`, `"30m"`, `"45s"` or `"3600"`
pub fn parse_ttl(s: &str) -> Result<Duration, TokenError> {
    let s = s.trim();
    let invalid = || TokenError::InvalidTtl(s.to_string());

    let (digits, unit_secs) = match s.char_indices().last() {
        Some((idx, 'd')) => (&s[..idx], 86_400),
        Some((idx, 'h')) => (&s[..idx], 3_600),
        Some((idx, 'm')) => (&s[..idx], 60),
        Some((idx, 's')) => (&s[..idx], 1),
        Some(_) => (s, 1),
        None => return Err(invalid()),
    };

    let value: u64 = digits.trim().parse().map_err(|_| invalid())?;
    if value == 0 {
        return Err(invalid());
    }

    value
        .checked_mul(unit_secs)
        .map(Duration::from_secs)
        .ok_or_else(invalid)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_ttl() {
        assert_eq!(parse_ttl("1d").unwrap(), Duration::from_secs(86_400));
        assert_eq!(parse_ttl("12h").unwrap(), Duration::from_secs(43_200));
        assert_eq!(parse_ttl("30m").unwrap(), Duration::from_secs(1_800));
        assert_eq!(parse_ttl("45s").unwrap(), Duration::from_secs(45));
        assert_eq!(parse_ttl("3600").unwrap(), Duration::from_secs(3_600));

        assert!(parse_ttl("").is_err());
        assert!(parse_ttl("0").is_err());
        assert!(parse_ttl("d").is_err());
        assert!(parse_ttl("1w").is_err());
    }

    #[test]
    fn test_parse_ttl_overflow() {
        let huge = format!("{}d", u64::MAX);
        assert!(matches!(parse_ttl(&huge), Err(TokenError::InvalidTtl(s)) if s == huge));
    }

    #[test]
    fn test_issue_past_calendar_end() {
        // about a million years
        let signer = TokenSigner::new(b"secret", Duration::from_secs(1_000_000 * 365 * 86_400));
        assert!(matches!(
            signer.issue("user-1", "a@example.com"),
            Err(TokenError::InvalidTtl(_))
        ));
    }

    #[test]
    fn test_issue_and_verify() {
        let signer = TokenSigner::new(b"test-secret", Duration::from_secs(3600));
        let issued = signer.issue("user-1", "a@example.com").unwrap();

        let claims = signer.verify(&issued.token).unwrap();
        assert_eq!(claims.sub, "user-1");
        assert_eq!(claims.email, "a@example.com");
        assert_eq!(claims.exp, issued.expires_at.timestamp());
        assert_eq!(claims.exp - claims.iat, 3600);
    }

    #[test]
    fn test_wrong_secret_is_rejected() {
        let signer = TokenSigner::new(b"secret-a", Duration::from_secs(60));
        let other = TokenSigner::new(b"secret-b", Duration::from_secs(60));
        let issued = signer.issue("user-1", "a@example.com").unwrap();

        assert!(matches!(
            other.verify(&issued.token),
            Err(TokenError::Invalid(_))
        ));
        assert!(signer.verify("not.a.token").is_err());
    }

    #[test]
    fn test_expired_token() {
        let signer = TokenSigner::new(b"secret", Duration::from_secs(60));
        let now = Utc::now().timestamp();
        let claims = SessionClaims {
            sub: "user-1".into(),
            email: "a@example.com".into(),
            iat: now - 7200,
            exp: now - 3600,
        };
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(b"secret"),
        )
        .unwrap();

        assert!(matches!(signer.verify(&token), Err(TokenError::Expired)));
    }
}
