//! Presentation Layer
//!
//! HTTP handlers, DTOs, multipart parsing and router.

pub mod dto;
pub mod handlers;
pub mod router;
pub mod upload;

pub use handlers::AccountsAppState;
pub use router::{accounts_router, accounts_router_generic};
