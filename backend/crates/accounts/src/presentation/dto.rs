//! API DTOs (Data Transfer Objects)

use chrono::{DateTime, Utc};
use kernel::id::UserId;
use serde::{Deserialize, Serialize};

use crate::domain::entity::{role::Role, user::User};
use crate::domain::value_object::avatar::UserLogo;

// ============================================================================
// User
// ============================================================================

/// User as returned to clients
///
/// Password hashes are never part of this shape.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserView {
    pub id: UserId,
    pub first_name: String,
    pub last_name: String,
    pub full_name: String,
    pub email: String,
    pub phone_number: String,
    pub is_active: bool,
    pub is_two_step: bool,
    pub login_count: i64,
    pub last_login: Option<DateTime<Utc>>,
    pub last_logout: Option<DateTime<Utc>>,
    pub otp: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub created_by: String,
    pub updated_by: Option<String>,
    pub user_logo: UserLogo,
    pub roles: Vec<Role>,
    pub token: String,
    pub active_role: Option<String>,
}

impl From<User> for UserView {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            first_name: user.first_name,
            last_name: user.last_name,
            full_name: user.full_name,
            email: user.email.as_str().to_string(),
            phone_number: user.phone_number.as_str().to_string(),
            is_active: user.is_active,
            is_two_step: user.is_two_step,
            login_count: user.login_count,
            last_login: user.last_login,
            last_logout: user.last_logout,
            otp: user.otp,
            created_at: user.created_at,
            updated_at: user.updated_at,
            created_by: user.created_by,
            updated_by: user.updated_by,
            user_logo: user.user_logo,
            roles: user.roles,
            token: user.token,
            active_role: user.active_role,
        }
    }
}

/// One page of users plus the total
#[derive(Debug, Clone, Serialize)]
pub struct UserPageResponse {
    pub data: Vec<UserView>,
    pub count: u64,
}

#[derive(Debug, Clone, Serialize)]
pub struct DeleteResponse {
    pub message: &'static str,
    pub count: u64,
}

impl DeleteResponse {
    pub fn new(count: u64) -> Self {
        Self {
            message: "User deleted successfully",
            count,
        }
    }
}

/// Password change or activation toggle
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateFieldRequest {
    pub id: String,
    pub password: Option<String>,
    pub is_active: Option<bool>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub search: String,
}

// ============================================================================
// Roles
// ============================================================================

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddRoleRequest {
    pub user_id: String,
    #[serde(default)]
    pub role: String,
    #[serde(default)]
    pub modules: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateRoleRequest {
    pub user_id: String,
    /// Role id
    pub id: String,
    #[serde(default)]
    pub role: String,
    #[serde(default)]
    pub modules: Vec<String>,
}
