//! Repository Traits
//!
//! Interfaces for data persistence. Implementations are in the
//! infrastructure layer.

use kernel::id::UserId;

use crate::domain::entity::{role::Role, user::User};
use crate::domain::value_object::{email::Email, phone_number::PhoneNumber};
use crate::error::AccountResult;

/// User repository trait
#[trait_variant::make(UserRepository: Send)]
pub trait LocalUserRepository {
    /// Insert a new user
    async fn create(&self, user: &User) -> AccountResult<()>;

    async fn find_by_id(&self, id: &UserId) -> AccountResult<Option<User>>;

    async fn find_by_email(&self, email: &Email) -> AccountResult<Option<User>>;

    /// True if any user has this email or this phone number
    async fn exists_by_email_or_phone(
        &self,
        email: &Email,
        phone_number: &PhoneNumber,
    ) -> AccountResult<bool>;

    /// Same as [`exists_by_email_or_phone`](Self::exists_by_email_or_phone),
    /// ignoring the user with id `id`
    async fn exists_by_email_or_phone_excluding(
        &self,
        id: &UserId,
        email: &Email,
        phone_number: &PhoneNumber,
    ) -> AccountResult<bool>;

    /// One page of users in creation order
    async fn list(&self, offset: u64, limit: u64) -> AccountResult<Vec<User>>;

    async fn count(&self) -> AccountResult<u64>;

    /// Case-insensitive substring match on full name or email
    async fn search(&self, term: &str) -> AccountResult<Vec<User>>;

    /// Persist every mutable field of an existing user
    async fn update(&self, user: &User) -> AccountResult<()>;

    /// Overwrite the embedded role list
    async fn replace_roles(&self, id: &UserId, roles: &[Role]) -> AccountResult<()>;

    /// Returns the number of deleted records (0 or 1)
    async fn delete(&self, id: &UserId) -> AccountResult<u64>;

    async fn delete_all(&self) -> AccountResult<u64>;
}
