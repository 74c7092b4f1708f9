//! Query Users Use Case
//!
//! Lookup by id, paged listing and search.

use std::sync::Arc;

use crate::application::profile::parse_user_id;
use crate::domain::entity::user::User;
use crate::domain::repository::UserRepository;
use crate::error::{AccountError, AccountResult};

pub const DEFAULT_PAGE: u64 = 1;
pub const DEFAULT_LIMIT: u64 = 10;

/// One page of users plus the total number of users
#[derive(Debug)]
pub struct UserPage {
    pub users: Vec<User>,
    pub count: u64,
}

pub struct QueryUsersUseCase<R>
where
    R: UserRepository,
{
    repo: Arc<R>,
}

impl<R> QueryUsersUseCase<R>
where
    R: UserRepository,
{
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    pub async fn get(&self, id: &str) -> AccountResult<User> {
        let id = parse_user_id(id)?;
        self.repo
            .find_by_id(&id)
            .await?
            .ok_or(AccountError::UserNotFound)
    }

    /// Missing or zero `page` / `limit` fall back to 1 / 10
    pub async fn list(&self, page: Option<u64>, limit: Option<u64>) -> AccountResult<UserPage> {
        let page = page.filter(|&p| p > 0).unwrap_or(DEFAULT_PAGE);
        let limit = limit.filter(|&l| l > 0).unwrap_or(DEFAULT_LIMIT);
        let offset = (page - 1).saturating_mul(limit);

        let users = self.repo.list(offset, limit).await?;
        let count = self.repo.count().await?;

        Ok(UserPage { users, count })
    }

    pub async fn search(&self, term: &str) -> AccountResult<Vec<User>> {
        self.repo.search(term.trim()).await
    }
}
