//! Role Ledger Use Case
//!
//! Add, update, delete and list the roles embedded in a user. Every mutation
//! reads the user, changes the list and writes the whole list back; the last
//! writer wins.

use std::sync::Arc;

use crate::application::profile::{ALL_FIELDS_REQUIRED, parse_role_id, parse_user_id};
use crate::domain::entity::{role::Role, user::User};
use crate::domain::repository::UserRepository;
use crate::error::{AccountError, AccountResult};

pub struct AddRoleInput {
    pub user_id: String,
    pub role: String,
    pub modules: Vec<String>,
}

pub struct UpdateRoleInput {
    pub user_id: String,
    pub role_id: String,
    pub role: String,
    pub modules: Vec<String>,
}

pub struct RoleLedgerUseCase<R>
where
    R: UserRepository,
{
    repo: Arc<R>,
}

impl<R> RoleLedgerUseCase<R>
where
    R: UserRepository,
{
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    /// Append a role with a fresh id; returns the full list
    pub async fn add(&self, input: AddRoleInput) -> AccountResult<Vec<Role>> {
        let role = required_name(input.role)?;
        let mut user = self.load(&input.user_id).await?;

        let role_id = user.add_role(role, input.modules).id;
        self.repo.replace_roles(&user.id, &user.roles).await?;

        tracing::info!(user_id = %user.id, role_id = %role_id, "Role added");

        Ok(user.roles)
    }

    /// Change a role in place; id and position are kept
    pub async fn update(&self, input: UpdateRoleInput) -> AccountResult<Vec<Role>> {
        let role = required_name(input.role)?;
        let mut user = self.load(&input.user_id).await?;
        let role_id = parse_role_id(&input.role_id)?;

        if !user.update_role(&role_id, role, input.modules) {
            return Err(AccountError::RoleNotFound);
        }
        self.repo.replace_roles(&user.id, &user.roles).await?;

        tracing::info!(user_id = %user.id, role_id = %role_id, "Role updated");

        Ok(user.roles)
    }

    /// Remove a role; the stored list is untouched if the id is unknown
    pub async fn delete(&self, user_id: &str, role_id: &str) -> AccountResult<Vec<Role>> {
        let mut user = self.load(user_id).await?;
        let role_id = parse_role_id(role_id)?;

        if !user.remove_role(&role_id) {
            return Err(AccountError::RoleNotFound);
        }
        self.repo.replace_roles(&user.id, &user.roles).await?;

        tracing::info!(user_id = %user.id, role_id = %role_id, "Role deleted");

        Ok(user.roles)
    }

    pub async fn list(&self, user_id: &str) -> AccountResult<Vec<Role>> {
        Ok(self.load(user_id).await?.roles)
    }

    async fn load(&self, user_id: &str) -> AccountResult<User> {
        let id = parse_user_id(user_id)?;
        self.repo
            .find_by_id(&id)
            .await?
            .ok_or(AccountError::UserNotFound)
    }
}

fn required_name(role: String) -> AccountResult<String> {
    let role = role.trim();
    if role.is_empty() {
        return Err(AccountError::validation(ALL_FIELDS_REQUIRED));
    }
    Ok(role.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::test_support::fixture;
    use kernel::id::{RoleId, UserId};

    fn add(user_id: &UserId, role: &str, modules: &[&str]) -> AddRoleInput {
        AddRoleInput {
            user_id: user_id.to_string(),
            role: role.into(),
            modules: modules.iter().map(|m| m.to_string()).collect(),
        }
    }

    #[tokio::test]
    async fn test_add_then_update_keeps_id_and_length() {
        let fx = fixture();
        let user = fx.create_user("jane@example.com", "1234567890", "password123").await;
        let ledger = RoleLedgerUseCase::new(fx.repo.clone());

        ledger.add(add(&user.id, "Viewer", &["reports"])).await.unwrap();
        let roles = ledger.add(add(&user.id, "Admin", &["users"])).await.unwrap();
        assert_eq!(roles.len(), 2);
        let admin_id = roles[1].id;

        let roles = ledger
            .update(UpdateRoleInput {
                user_id: user.id.to_string(),
                role_id: admin_id.to_string(),
                role: "Admin".into(),
                modules: vec!["users".into(), "roles".into()],
            })
            .await
            .unwrap();
        assert_eq!(roles.len(), 2);

        let listed = ledger.list(&user.id.to_string()).await.unwrap();
        assert_eq!(listed.len(), 2);
        assert_eq!(listed[1].id, admin_id);
        assert_eq!(listed[1].modules, vec!["users", "roles"]);
    }

    #[tokio::test]
    async fn test_delete_unknown_role_leaves_list() {
        let fx = fixture();
        let user = fx.create_user("jane@example.com", "1234567890", "password123").await;
        let ledger = RoleLedgerUseCase::new(fx.repo.clone());
        let roles = ledger.add(add(&user.id, "Viewer", &[])).await.unwrap();

        let err = ledger
            .delete(&user.id.to_string(), &RoleId::new().to_string())
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Role not found");
        assert_eq!(ledger.list(&user.id.to_string()).await.unwrap(), roles);

        let remaining = ledger
            .delete(&user.id.to_string(), &roles[0].id.to_string())
            .await
            .unwrap();
        assert!(remaining.is_empty());
    }

    #[tokio::test]
    async fn test_unknown_user_and_role() {
        let fx = fixture();
        let user = fx.create_user("jane@example.com", "1234567890", "password123").await;
        let ledger = RoleLedgerUseCase::new(fx.repo.clone());

        let err = ledger.list(&UserId::new().to_string()).await.unwrap_err();
        assert_eq!(err.to_string(), "User not found");

        let err = ledger
            .update(UpdateRoleInput {
                user_id: user.id.to_string(),
                role_id: "RO42".into(),
                role: "Admin".into(),
                modules: vec![],
            })
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Role not found");

        let err = ledger.add(add(&user.id, "  ", &[])).await.unwrap_err();
        assert_eq!(err.status_code(), 400);
    }
}
