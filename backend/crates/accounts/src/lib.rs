//! Accounts Backend Module
//!
//! Clean Architecture structure:
//! - `domain/` - Entities, value objects, repository traits
//! - `application/` - Use cases and configuration
//! - `infra/` - PostgreSQL and in-memory stores, avatar storage
//! - `presentation/` - HTTP handlers, DTOs, router
//!
//! ## Features
//! - User records with profile, activation flag and avatar
//! - Email + password login with a signed session cookie
//! - Role ledger embedded in each user
//! - Avatars on local disk or in Cloudinary
//!
//! ## Security Model
//! - Passwords hashed with Argon2id; bcrypt hashes from the previous system
//!   are still accepted and replaced on the next successful login
//! - Session tokens are HS256 JWTs; the stored token must match on logout
//! - Login failures are reported uniformly as "Invalid credentials"

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;
pub mod presentation;

// Re-exports for convenience
pub use application::config::{AccountsConfig, StorageConfig};
pub use error::{AccountError, AccountResult};
pub use infra::{AssetStore, InMemoryUserRepository, PgUserRepository};
pub use presentation::router::{accounts_router, accounts_router_generic};

// Re-export kernel error types for unified error handling
pub use kernel::error::{
    app_error::{AppError, AppResult},
    kind::ErrorKind,
};

// Convenience re-exports
pub mod config {
    pub use crate::application::config::*;
}

pub mod models {
    pub use crate::domain::entity::*;
    pub use crate::domain::value_object::*;
    pub use crate::presentation::dto::*;
}

pub mod handlers {
    pub use crate::presentation::handlers::*;
}

pub mod router {
    pub use crate::presentation::router::*;
}
