//! Infrastructure Layer
//!
//! Database implementations and external service integrations.

pub mod assets;
pub mod memory;
pub mod postgres;

pub use assets::{AssetStore, LocalAssets};
pub use memory::InMemoryUserRepository;
pub use postgres::PgUserRepository;
