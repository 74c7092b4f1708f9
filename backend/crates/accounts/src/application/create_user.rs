//! Create User Use Case
//!
//! Registers a new account with an optional avatar.

use std::sync::Arc;

use platform::password::ClearTextPassword;

use crate::application::config::AccountsConfig;
use crate::application::profile::{ProfileInput, require_all};
use crate::domain::entity::user::User;
use crate::domain::repository::UserRepository;
use crate::domain::value_object::avatar::{UploadedFile, UserLogo};
use crate::domain::value_object::password_hashes::PasswordHashes;
use crate::error::{AccountError, AccountResult};
use crate::infra::assets::AssetStore;

/// Create user input
pub struct CreateUserInput {
    pub profile: ProfileInput,
    pub password: String,
    pub avatar: Option<UploadedFile>,
    /// `{scheme}://{host}` of the request, for locally served avatars
    pub base_url: String,
}

/// Create user use case
pub struct CreateUserUseCase<R>
where
    R: UserRepository,
{
    repo: Arc<R>,
    assets: Arc<AssetStore>,
    config: Arc<AccountsConfig>,
}

impl<R> CreateUserUseCase<R>
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

    pub async fn execute(&self, input: CreateUserInput) -> AccountResult<User> {
        let mut required = input.profile.fields().to_vec();
        required.push(&input.password);
        require_all(&required)?;

        let (profile, created_by) = input.profile.validate()?;

        if self
            .repo
            .exists_by_email_or_phone(&profile.email, &profile.phone_number)
            .await?
        {
            return Err(AccountError::DuplicateUser);
        }

        let password = ClearTextPassword::new(input.password);

        let user_logo = match input.avatar {
            Some(file) => self.assets.upload(file, &input.base_url).await?,
            None => UserLogo::default(),
        };

        let hash = password.hash(self.config.pepper())?;
        let user = User::new(profile, PasswordHashes::new(hash), created_by, user_logo);

        if let Err(e) = self.repo.create(&user).await {
            if let Err(cleanup) = self.assets.remove(&user.user_logo.url).await {
                tracing::warn!(error = %cleanup, "Failed to remove avatar of rejected user");
            }
            return Err(e);
        }

        tracing::info!(
            user_id = %user.id,
            created_by = %user.created_by,
            "User created"
        );

        Ok(user)
    }
}
