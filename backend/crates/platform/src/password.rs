//! Password Hashing and Verification
//!
//! - Argon2id hashing for every password written by this service
//! - Verification of legacy bcrypt hashes (`$2a$` / `$2b$` / `$2y$`) carried
//!   over from the previous system
//! - Zeroization of clear text
//! - Constant-time comparison (delegated to argon2 / bcrypt)
//!
//! An account can hold two hashes at once: the current one and a legacy one.
//! [`match_either`] checks the current hash first and only then the legacy
//! hash, and reports which one matched so the caller can migrate the record.

use std::fmt;

use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier, password_hash::SaltString};
use rand::rngs::OsRng;
use thiserror::Error;
use unicode_normalization::UnicodeNormalization;
use zeroize::{Zeroize, ZeroizeOnDrop};

// ============================================================================
// Error Types
// ============================================================================

/// Password hashing errors
#[derive(Debug, Error)]
pub enum PasswordHashError {
    #[error("Password hashing failed: {0}")]
    HashingFailed(String),

    #[error("Invalid password hash format")]
    InvalidHashFormat,
}

// ============================================================================
// Clear Text Password (Zeroized on drop)
// ============================================================================

/// Clear text password with automatic memory zeroization
///
/// Does not implement `Clone`; `Debug` output is redacted.
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct ClearTextPassword(String);

impl ClearTextPassword {
    /// Wrap a password, NFKC-normalized
    ///
    /// No length or character rules are applied; callers decide what counts
    /// as blank.
    pub fn new(raw: String) -> Self {
        Self(raw.nfkc().collect())
    }

    pub(crate) fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }

    /// Hash the password using Argon2id
    ///
    /// ## Arguments
    /// * `pepper` - Optional application-wide secret appended before hashing
    pub fn hash(&self, pepper: Option<&[u8]>) -> Result<HashedPassword, PasswordHashError> {
        let password_bytes = peppered(self, pepper);
        let salt = SaltString::generate(&mut OsRng);

        let hash = Argon2::default()
            .hash_password(&password_bytes, &salt)
            .map_err(|e| PasswordHashError::HashingFailed(e.to_string()))?;

        Ok(HashedPassword {
            hash: hash.to_string(),
            scheme: HashScheme::Argon2,
        })
    }
}

impl fmt::Debug for ClearTextPassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ClearTextPassword")
            .field(&"[REDACTED]")
            .finish()
    }
}

// ============================================================================
// Hashed Password (Safe to store)
// ============================================================================

/// Algorithm family of a stored hash
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HashScheme {
    /// PHC string produced by the `argon2` crate
    Argon2,
    /// Modular-crypt bcrypt hash from the previous system
    Bcrypt,
}

/// A stored password hash
#[derive(Clone, PartialEq, Eq)]
pub struct HashedPassword {
    hash: String,
    scheme: HashScheme,
}

impl HashedPassword {
    /// Parse a stored hash (e.g., from the database)
    ///
    /// Accepts Argon2 PHC strings and bcrypt hashes.
    pub fn from_stored(s: impl Into<String>) -> Result<Self, PasswordHashError> {
        let hash = s.into();

        if is_bcrypt(&hash) {
            return Ok(Self {
                hash,
                scheme: HashScheme::Bcrypt,
            });
        }

        PasswordHash::new(&hash).map_err(|_| PasswordHashError::InvalidHashFormat)?;

        Ok(Self {
            hash,
            scheme: HashScheme::Argon2,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.hash
    }

    pub fn scheme(&self) -> HashScheme {
        self.scheme
    }

    /// Verify a password against this hash
    ///
    /// The pepper only applies to Argon2 hashes; bcrypt hashes were issued
    /// without one.
    pub fn verify(&self, password: &ClearTextPassword, pepper: Option<&[u8]>) -> bool {
        match self.scheme {
            HashScheme::Bcrypt => bcrypt::verify(password.as_bytes(), &self.hash).unwrap_or(false),
            HashScheme::Argon2 => {
                let Ok(parsed_hash) = PasswordHash::new(&self.hash) else {
                    return false;
                };
                Argon2::default()
                    .verify_password(&peppered(password, pepper), &parsed_hash)
                    .is_ok()
            }
        }
    }

    /// True if the hash is not Argon2id
    pub fn needs_rehash(&self) -> bool {
        match self.scheme {
            HashScheme::Bcrypt => true,
            HashScheme::Argon2 => match PasswordHash::new(&self.hash) {
                Ok(parsed) => parsed.algorithm != argon2::Algorithm::Argon2id.ident(),
                Err(_) => true,
            },
        }
    }
}

impl fmt::Debug for HashedPassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HashedPassword")
            .field("scheme", &self.scheme)
            .field("hash", &"[HASH]")
            .finish()
    }
}

// ============================================================================
// Two-hash verification
// ============================================================================

/// Which of the two stored hashes accepted the password
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HashMatch {
    Current,
    Legacy,
}

/// Check `current` first, then `legacy`
///
/// Returns `None` only when neither hash matches. Absent hashes never match.
pub fn match_either(
    password: &ClearTextPassword,
    current: Option<&HashedPassword>,
    legacy: Option<&HashedPassword>,
    pepper: Option<&[u8]>,
) -> Option<HashMatch> {
    if current.is_some_and(|h| h.verify(password, pepper)) {
        return Some(HashMatch::Current);
    }
    if legacy.is_some_and(|h| h.verify(password, pepper)) {
        return Some(HashMatch::Legacy);
    }
    None
}

// ============================================================================
// Helper Functions
// ============================================================================

fn peppered(password: &ClearTextPassword, pepper: Option<&[u8]>) -> Vec<u8> {
    let mut bytes = password.as_bytes().to_vec();
    if let Some(p) = pepper {
        bytes.extend_from_slice(p);
    }
    bytes
}

fn is_bcrypt(hash: &str) -> bool {
    hash.len() == 60
        && (hash.starts_with("$2a$") || hash.starts_with("$2b$") || hash.starts_with("$2y$"))
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn pw(s: &str) -> ClearTextPassword {
        ClearTextPassword::new(s.to_string())
    }

    #[test]
    fn test_new_normalizes_without_policy() {
        // fullwidth digits fold to ASCII under NFKC
        let hashed = pw("abc\u{FF11}").hash(None).unwrap();
        assert!(hashed.verify(&pw("abc1"), None));
    }

    #[test]
    fn test_short_passwords_hash() {
        let hashed = pw("abc").hash(None).unwrap();
        assert!(hashed.verify(&pw("abc"), None));
    }

    #[test]
    fn test_hash_and_verify() {
        let password = pw("TestPassword123!");
        let hashed = password.hash(None).unwrap();

        assert_eq!(hashed.scheme(), HashScheme::Argon2);
        assert!(!hashed.needs_rehash());
        assert!(hashed.verify(&password, None));
        assert!(!hashed.verify(&pw("WrongPassword123!"), None));
    }

    #[test]
    fn test_hash_with_pepper() {
        let password = pw("TestPassword123!");
        let pepper = b"my_secret_pepper";
        let hashed = password.hash(Some(pepper)).unwrap();

        assert!(hashed.verify(&password, Some(pepper)));
        assert!(!hashed.verify(&password, None));
        assert!(!hashed.verify(&password, Some(b"wrong_pepper")));
    }

    #[test]
    fn test_from_stored_accepts_argon2_and_bcrypt() {
        let argon = pw("TestPassword123!").hash(None).unwrap();
        let restored = HashedPassword::from_stored(argon.as_str()).unwrap();
        assert!(restored.verify(&pw("TestPassword123!"), None));

        let bcrypt_hash = bcrypt::hash("legacy-secret", 4).unwrap();
        let legacy = HashedPassword::from_stored(bcrypt_hash).unwrap();
        assert_eq!(legacy.scheme(), HashScheme::Bcrypt);
        assert!(legacy.needs_rehash());
        assert!(legacy.verify(&pw("legacy-secret"), None));
        // pepper is ignored for bcrypt
        assert!(legacy.verify(&pw("legacy-secret"), Some(b"pepper")));
        assert!(!legacy.verify(&pw("other"), None));
    }

    #[test]
    fn test_from_stored_rejects_garbage() {
        assert!(HashedPassword::from_stored("not_a_valid_hash").is_err());
        assert!(HashedPassword::from_stored("").is_err());
    }

    #[test]
    fn test_match_either() {
        let current = pw("current-password").hash(None).unwrap();
        let legacy = HashedPassword::from_stored(bcrypt::hash("old-password", 4).unwrap()).unwrap();

        assert_eq!(
            match_either(&pw("current-password"), Some(&current), Some(&legacy), None),
            Some(HashMatch::Current)
        );
        assert_eq!(
            match_either(&pw("old-password"), Some(&current), Some(&legacy), None),
            Some(HashMatch::Legacy)
        );
        assert_eq!(
            match_either(&pw("neither"), Some(&current), Some(&legacy), None),
            None
        );
    }

    #[test]
    fn test_match_either_with_missing_hashes() {
        let current = pw("current-password").hash(None).unwrap();

        assert_eq!(
            match_either(&pw("current-password"), None, Some(&current), None),
            Some(HashMatch::Legacy)
        );
        assert_eq!(match_either(&pw("current-password"), None, None, None), None);
    }

    #[test]
    fn test_debug_redaction() {
        let password = pw("secret");
        let debug_output = format!("{:?}", password);
        assert!(debug_output.contains("REDACTED"));
        assert!(!debug_output.contains("secret"));

        let hashed = password.hash(None).unwrap();
        assert!(!format!("{:?}", hashed).contains("argon2"));
    }
}
