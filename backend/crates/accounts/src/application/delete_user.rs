//! Delete User Use Case

use std::sync::Arc;

use crate::application::profile::parse_user_id;
use crate::domain::repository::UserRepository;
use crate::error::{AccountError, AccountResult};
use crate::infra::assets::AssetStore;

/// Number of removed records
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeleteOutcome {
    pub count: u64,
}

pub struct DeleteUserUseCase<R>
where
    R: UserRepository,
{
    repo: Arc<R>,
    assets: Arc<AssetStore>,
}

impl<R> DeleteUserUseCase<R>
where
    R: UserRepository,
{
    pub fn new(repo: Arc<R>, assets: Arc<AssetStore>) -> Self {
        Self { repo, assets }
    }

    /// Remove the user's avatar, then the record
    pub async fn delete(&self, id: &str) -> AccountResult<DeleteOutcome> {
        let id = parse_user_id(id)?;
        let user = self
            .repo
            .find_by_id(&id)
            .await?
            .ok_or(AccountError::UserNotFound)?;

        self.assets.remove(&user.user_logo.url).await?;
        let count = self.repo.delete(&id).await?;

        tracing::info!(user_id = %id, "User deleted");

        Ok(DeleteOutcome { count })
    }

    /// Remove every record; avatars are left in place
    pub async fn delete_all(&self) -> AccountResult<DeleteOutcome> {
        let count = self.repo.delete_all().await?;
        Ok(DeleteOutcome { count })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::test_support::fixture;

    #[tokio::test]
    async fn test_delete_user() {
        let fx = fixture();
        let user = fx.create_user("jane@example.com", "1234567890", "password123").await;
        let use_case = DeleteUserUseCase::new(fx.repo.clone(), fx.assets.clone());

        let outcome = use_case.delete(&user.id.to_string()).await.unwrap();
        assert_eq!(outcome.count, 1);

        let err = use_case.delete(&user.id.to_string()).await.unwrap_err();
        assert_eq!(err.to_string(), "User not found");
    }

    #[tokio::test]
    async fn test_delete_all() {
        let fx = fixture();
        fx.create_user("a@example.com", "1111111111", "password123").await;
        fx.create_user("b@example.com", "2222222222", "password123").await;
        let use_case = DeleteUserUseCase::new(fx.repo.clone(), fx.assets.clone());

        assert_eq!(use_case.delete_all().await.unwrap().count, 2);
        assert_eq!(use_case.delete_all().await.unwrap().count, 0);
    }
}
