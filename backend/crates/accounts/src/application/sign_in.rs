//! Sign In Use Case
//!
//! Authenticates a user by email and password and issues a session token.

use std::sync::Arc;

use platform::password::{ClearTextPassword, HashMatch};
use platform::token::IssuedToken;

use crate::application::config::AccountsConfig;
use crate::domain::entity::user::User;
use crate::domain::repository::UserRepository;
use crate::domain::value_object::email::Email;
use crate::error::{AccountError, AccountResult};

/// Sign in input
pub struct SignInInput {
    /// Email address
    pub username: String,
    pub password: String,
}

/// Sign in output
#[derive(Debug)]
pub struct SignInOutput {
    /// The user as stored after the login was recorded
    pub user: User,
    pub token: IssuedToken,
}

/// Sign in use case
pub struct SignInUseCase<R>
where
    R: UserRepository,
{
    repo: Arc<R>,
    config: Arc<AccountsConfig>,
}

impl<R> SignInUseCase<R>
where
    R: UserRepository,
{
    pub fn new(repo: Arc<R>, config: Arc<AccountsConfig>) -> Self {
        Self { repo, config }
    }

    pub async fn execute(&self, input: SignInInput) -> AccountResult<SignInOutput> {
        let email = Email::new(&input.username).map_err(|_| AccountError::InvalidCredentials)?;

        let mut user = self
            .repo
            .find_by_email(&email)
            .await?
            .ok_or(AccountError::InvalidCredentials)?;

        let password = ClearTextPassword::new(input.password);
        let matched = user
            .passwords
            .verify(&password, self.config.pepper())
            .ok_or(AccountError::InvalidCredentials)?;

        // Accounts that still sign in with their legacy hash move to a single
        // current hash
        if matched == HashMatch::Legacy || user.passwords.current().needs_rehash() {
            let mut passwords = user.passwords.clone();
            passwords.rotate(password.hash(self.config.pepper())?);
            user.set_passwords(passwords);
            tracing::info!(user_id = %user.id, "Migrated password hash");
        }

        let token = self
            .config
            .token_signer()
            .issue(&user.id.to_string(), user.email.as_str())?;

        user.record_login(token.token.clone());
        self.repo.update(&user).await?;

        tracing::info!(
            user_id = %user.id,
            login_count = user.login_count,
            "User signed in"
        );

        Ok(SignInOutput { user, token })
    }
}
