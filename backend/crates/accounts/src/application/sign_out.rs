//! Sign Out Use Case
//!
//! Clears the stored session token of the user a token belongs to.

use std::sync::Arc;

use kernel::id::UserId;

use crate::application::config::AccountsConfig;
use crate::domain::repository::UserRepository;
use crate::error::{AccountError, AccountResult};

pub struct SignOutUseCase<R>
where
    R: UserRepository,
{
    repo: Arc<R>,
    config: Arc<AccountsConfig>,
}

impl<R> SignOutUseCase<R>
where
    R: UserRepository,
{
    pub fn new(repo: Arc<R>, config: Arc<AccountsConfig>) -> Self {
        Self { repo, config }
    }

    /// Fails with `SessionInvalid` unless `token` is the user's current token
    pub async fn execute(&self, token: &str) -> AccountResult<()> {
        let claims = self.config.token_signer().verify(token)?;
        let id = UserId::parse(&claims.sub).map_err(|_| AccountError::SessionInvalid)?;

        let mut user = self
            .repo
            .find_by_id(&id)
            .await?
            .ok_or(AccountError::SessionInvalid)?;

        if user.token != token {
            return Err(AccountError::SessionInvalid);
        }

        user.record_logout();
        self.repo.update(&user).await?;

        tracing::info!(user_id = %user.id, "User signed out");

        Ok(())
    }
}
