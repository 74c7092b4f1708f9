//! Role Entity
//!
//! A named set of module permissions embedded in its parent user. Roles have
//! no lifecycle of their own; they are created, changed and removed through
//! the owning [`User`](super::user::User).

use kernel::id::RoleId;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Role {
    /// Unique within the owning user's role list
    pub id: RoleId,
    pub role: String,
    pub modules: Vec<String>,
}

impl Role {
    pub fn new(role: impl Into<String>, modules: Vec<String>) -> Self {
        Self {
            id: RoleId::new(),
            role: role.into(),
            modules,
        }
    }
}
