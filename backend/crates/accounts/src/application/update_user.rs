//! Update User Use Case
//!
//! Profile updates (with optional avatar replacement) and the single-field
//! update used for password resets and activation.

use std::sync::Arc;

use platform::password::ClearTextPassword;

use crate::application::config::AccountsConfig;
use crate::application::profile::{ProfileInput, parse_user_id};
use crate::domain::entity::user::User;
use crate::domain::repository::UserRepository;
use crate::domain::value_object::avatar::UploadedFile;
use crate::error::{AccountError, AccountResult};
use crate::infra::assets::AssetStore;

pub struct UpdateUserInput {
    pub id: String,
    /// `created_by` names the acting user and becomes `updated_by`
    pub profile: ProfileInput,
    pub avatar: Option<UploadedFile>,
    pub base_url: String,
}

/// Either a new password or a new active flag; the password wins if both
/// are present
#[derive(Debug, Default)]
pub struct UpdateFieldInput {
    pub id: String,
    pub password: Option<String>,
    pub is_active: Option<bool>,
}

pub struct UpdateUserUseCase<R>
where
    R: UserRepository,
{
    repo: Arc<R>,
    assets: Arc<AssetStore>,
    config: Arc<AccountsConfig>,
}

impl<R> UpdateUserUseCase<R>
where
    R: UserRepository,
{
    pub fn new(repo: Arc<R>, assets: Arc<AssetStore>, config: Arc<AccountsConfig>) -> Self {
        Self {
            repo,
            assets,
            config,
        }
    }

    /// Replace the profile and, when a file is given, the avatar
    ///
    /// The old avatar is removed only after the new record is stored; a
    /// failed write removes the new upload instead.
    pub async fn update(&self, input: UpdateUserInput) -> AccountResult<User> {
        let (profile, updated_by) = input.profile.validate()?;

        let id = parse_user_id(&input.id)?;
        let mut user = self
            .repo
            .find_by_id(&id)
            .await?
            .ok_or(AccountError::UserNotFound)?;

        if self
            .repo
            .exists_by_email_or_phone_excluding(&user.id, &profile.email, &profile.phone_number)
            .await?
        {
            return Err(AccountError::DuplicateUser);
        }

        let replaced_logo = match input.avatar {
            Some(file) => {
                let user_logo = self.assets.upload(file, &input.base_url).await?;
                let old = user.user_logo.clone();
                user.set_user_logo(user_logo);
                Some(old)
            }
            None => None,
        };

        user.set_profile(profile, updated_by);

        if let Err(e) = self.repo.update(&user).await {
            if replaced_logo.is_some() {
                if let Err(cleanup) = self.assets.remove(&user.user_logo.url).await {
                    tracing::warn!(error = %cleanup, "Failed to remove avatar of rejected update");
                }
            }
            return Err(e);
        }

        if let Some(old) = replaced_logo {
            if let Err(e) = self.assets.remove(&old.url).await {
                tracing::warn!(user_id = %user.id, error = %e, "Failed to remove replaced avatar");
            }
        }

        tracing::info!(user_id = %user.id, "User updated");

        Ok(user)
    }

    pub async fn update_field(&self, input: UpdateFieldInput) -> AccountResult<User> {
        let id = parse_user_id(&input.id)?;
        let mut user = self
            .repo
            .find_by_id(&id)
            .await?
            .ok_or(AccountError::UserNotFound)?;

        match (input.password.filter(|p| !p.trim().is_empty()), input.is_active) {
            (Some(password), _) => {
                let password = ClearTextPassword::new(password);
                let mut passwords = user.passwords.clone();
                passwords.rotate(password.hash(self.config.pepper())?);
                user.set_passwords(passwords);
                tracing::info!(user_id = %user.id, "Password changed");
            }
            (None, Some(is_active)) => {
                user.set_active(is_active);
                tracing::info!(user_id = %user.id, is_active, "Active flag changed");
            }
            (None, None) => {
                return Err(AccountError::validation(
                    "Either password or isActive is required",
                ));
            }
        }

        self.repo.update(&user).await?;

        Ok(user)
    }
}
