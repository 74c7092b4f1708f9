//! Application Layer
//!
//! Use cases and application services.

pub mod config;
pub mod create_user;
pub mod delete_user;
pub mod profile;
pub mod query_users;
pub mod role_ledger;
pub mod sign_in;
pub mod sign_out;
pub mod update_user;

// Re-exports
pub use config::{AccountsConfig, StorageConfig};
pub use create_user::{CreateUserInput, CreateUserUseCase};
pub use delete_user::{DeleteOutcome, DeleteUserUseCase};
pub use profile::ProfileInput;
pub use query_users::{QueryUsersUseCase, UserPage};
pub use role_ledger::{AddRoleInput, RoleLedgerUseCase, UpdateRoleInput};
pub use sign_in::{SignInInput, SignInOutput, SignInUseCase};
pub use sign_out::SignOutUseCase;
pub use update_user::{UpdateFieldInput, UpdateUserInput, UpdateUserUseCase};
