//! Phone Number Value Object
//!
//! Exactly ten ASCII digits, no separators or country prefix.

use serde::{Deserialize, Serialize};

use crate::error::{AccountError, AccountResult};

pub const PHONE_NUMBER_LENGTH: usize = 10;

pub const INVALID_PHONE_NUMBER: &str = "Phone number must be exactly 10 digits";

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PhoneNumber(String);

impl PhoneNumber {
    pub fn new(phone: impl AsRef<str>) -> AccountResult<Self> {
        let phone = phone.as_ref().trim();

        if phone.len() != PHONE_NUMBER_LENGTH || !phone.bytes().all(|b| b.is_ascii_digit()) {
            return Err(AccountError::validation(INVALID_PHONE_NUMBER));
        }

        Ok(Self(phone.to_string()))
    }

    pub fn from_db(phone: impl Into<String>) -> Self {
        Self(phone.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for PhoneNumber {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
