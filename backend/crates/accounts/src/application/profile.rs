//! Profile Input Validation
//!
//! Create and update accept the same profile fields and reject them the same
//! way, in this order: blank field, email format, phone format.

use kernel::id::{RoleId, UserId};

use crate::domain::entity::user::Profile;
use crate::domain::value_object::{email::Email, phone_number::PhoneNumber};
use crate::error::{AccountError, AccountResult};

pub const ALL_FIELDS_REQUIRED: &str = "All fields are required";

/// Raw profile fields as received
#[derive(Debug, Clone, Default)]
pub struct ProfileInput {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone_number: String,
    /// Identifier of the acting user
    pub created_by: String,
}

impl ProfileInput {
    pub(crate) fn fields(&self) -> [&str; 5] {
        [
            self.first_name.as_str(),
            self.last_name.as_str(),
            self.email.as_str(),
            self.phone_number.as_str(),
            self.created_by.as_str(),
        ]
    }

    /// Validate into a [`Profile`] and the acting user's identifier
    pub(crate) fn validate(self) -> AccountResult<(Profile, String)> {
        require_all(&self.fields())?;

        let email = Email::new(&self.email)?;
        let phone_number = PhoneNumber::new(&self.phone_number)?;

        Ok((
            Profile {
                first_name: self.first_name.trim().to_string(),
                last_name: self.last_name.trim().to_string(),
                email,
                phone_number,
            },
            self.created_by.trim().to_string(),
        ))
    }
}

/// Reject if any field is empty or whitespace
pub(crate) fn require_all(fields: &[&str]) -> AccountResult<()> {
    if fields.iter().any(|f| f.trim().is_empty()) {
        return Err(AccountError::validation(ALL_FIELDS_REQUIRED));
    }
    Ok(())
}

/// Unparseable ids cannot name an existing user
pub(crate) fn parse_user_id(id: &str) -> AccountResult<UserId> {
    UserId::parse(id).map_err(|_| AccountError::UserNotFound)
}

pub(crate) fn parse_role_id(id: &str) -> AccountResult<RoleId> {
    RoleId::parse(id).map_err(|_| AccountError::RoleNotFound)
}
