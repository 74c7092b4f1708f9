//! Password Hashes
//!
//! A user record holds the hash written by this service and, for accounts
//! carried over from the previous system, a legacy hash. Login accepts either;
//! a legacy match migrates the record to a single fresh hash.

use platform::password::{ClearTextPassword, HashMatch, HashedPassword, match_either};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PasswordHashes {
    current: HashedPassword,
    legacy: Option<HashedPassword>,
}

impl PasswordHashes {
    pub fn new(current: HashedPassword) -> Self {
        Self {
            current,
            legacy: None,
        }
    }

    pub fn with_legacy(current: HashedPassword, legacy: Option<HashedPassword>) -> Self {
        Self { current, legacy }
    }

    pub fn current(&self) -> &HashedPassword {
        &self.current
    }

    pub fn legacy(&self) -> Option<&HashedPassword> {
        self.legacy.as_ref()
    }

    /// Which hash, if any, accepts the password
    pub fn verify(&self, password: &ClearTextPassword, pepper: Option<&[u8]>) -> Option<HashMatch> {
        match_either(password, Some(&self.current), self.legacy.as_ref(), pepper)
    }

    /// Replace both hashes with a single new one
    pub fn rotate(&mut self, current: HashedPassword) {
        self.current = current;
        self.legacy = None;
    }
}
