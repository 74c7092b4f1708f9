//! In-Memory Repository
//!
//! Backs the service when no database is configured and drives the use-case
//! and router tests. Enforces the same email / phone uniqueness that the
//! PostgreSQL schema does with unique indexes.

use std::sync::Arc;

use kernel::id::UserId;
use tokio::sync::RwLock;

use crate::domain::entity::{role::Role, user::User};
use crate::domain::repository::UserRepository;
use crate::domain::value_object::{email::Email, phone_number::PhoneNumber};
use crate::error::{AccountError, AccountResult};

#[derive(Clone, Default)]
pub struct InMemoryUserRepository {
    users: Arc<RwLock<Vec<User>>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

fn conflicts(existing: &User, candidate: &User) -> bool {
    existing.id != candidate.id
        && (existing.email == candidate.email || existing.phone_number == candidate.phone_number)
}

impl UserRepository for InMemoryUserRepository {
    async fn create(&self, user: &User) -> AccountResult<()> {
        let mut users = self.users.write().await;
        if users.iter().any(|u| conflicts(u, user)) {
            return Err(AccountError::DuplicateUser);
        }
        users.push(user.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: &UserId) -> AccountResult<Option<User>> {
        let users = self.users.read().await;
        Ok(users.iter().find(|u| &u.id == id).cloned())
    }

    async fn find_by_email(&self, email: &Email) -> AccountResult<Option<User>> {
        let users = self.users.read().await;
        Ok(users.iter().find(|u| &u.email == email).cloned())
    }

    async fn exists_by_email_or_phone(
        &self,
        email: &Email,
        phone_number: &PhoneNumber,
    ) -> AccountResult<bool> {
        let users = self.users.read().await;
        Ok(users
            .iter()
            .any(|u| &u.email == email || &u.phone_number == phone_number))
    }

    async fn exists_by_email_or_phone_excluding(
        &self,
        id: &UserId,
        email: &Email,
        phone_number: &PhoneNumber,
    ) -> AccountResult<bool> {
        let users = self.users.read().await;
        Ok(users
            .iter()
            .filter(|u| &u.id != id)
            .any(|u| &u.email == email || &u.phone_number == phone_number))
    }

    async fn list(&self, offset: u64, limit: u64) -> AccountResult<Vec<User>> {
        let users = self.users.read().await;
        Ok(users
            .iter()
            .skip(usize::try_from(offset).unwrap_or(usize::MAX))
            .take(usize::try_from(limit).unwrap_or(usize::MAX))
            .cloned()
            .collect())
    }

    async fn count(&self) -> AccountResult<u64> {
        Ok(self.users.read().await.len() as u64)
    }

    async fn search(&self, term: &str) -> AccountResult<Vec<User>> {
        let needle = term.to_lowercase();
        let users = self.users.read().await;
        Ok(users
            .iter()
            .filter(|u| {
                u.full_name.to_lowercase().contains(&needle)
                    || u.email.as_str().contains(&needle)
            })
            .cloned()
            .collect())
    }

    async fn update(&self, user: &User) -> AccountResult<()> {
        let mut users = self.users.write().await;
        if users.iter().any(|u| conflicts(u, user)) {
            return Err(AccountError::DuplicateUser);
        }
        let slot = users
            .iter_mut()
            .find(|u| u.id == user.id)
            .ok_or(AccountError::UserNotFound)?;
        *slot = user.clone();
        Ok(())
    }

    async fn replace_roles(&self, id: &UserId, roles: &[Role]) -> AccountResult<()> {
        let mut users = self.users.write().await;
        let slot = users
            .iter_mut()
            .find(|u| &u.id == id)
            .ok_or(AccountError::UserNotFound)?;
        slot.roles = roles.to_vec();
        Ok(())
    }

    async fn delete(&self, id: &UserId) -> AccountResult<u64> {
        let mut users = self.users.write().await;
        let before = users.len();
        users.retain(|u| &u.id != id);
        Ok((before - users.len()) as u64)
    }

    async fn delete_all(&self) -> AccountResult<u64> {
        let mut users = self.users.write().await;
        let deleted = users.len() as u64;
        users.clear();
        Ok(deleted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entity::user::tests::sample_user;

    #[tokio::test]
    async fn test_create_rejects_duplicate_email_or_phone() {
        let repo = InMemoryUserRepository::new();
        repo.create(&sample_user("a@example.com", "1111111111"))
            .await
            .unwrap();

        let same_email = sample_user("a@example.com", "2222222222");
        assert!(matches!(
            repo.create(&same_email).await,
            Err(AccountError::DuplicateUser)
        ));

        let same_phone = sample_user("b@example.com", "1111111111");
        assert!(matches!(
            repo.create(&same_phone).await,
            Err(AccountError::DuplicateUser)
        ));

        assert_eq!(repo.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_exists_excluding_ignores_self() {
        let repo = InMemoryUserRepository::new();
        let a = sample_user("a@example.com", "1111111111");
        let b = sample_user("b@example.com", "2222222222");
        repo.create(&a).await.unwrap();
        repo.create(&b).await.unwrap();

        assert!(
            !repo
                .exists_by_email_or_phone_excluding(&a.id, &a.email, &a.phone_number)
                .await
                .unwrap()
        );
        assert!(
            repo.exists_by_email_or_phone_excluding(&a.id, &b.email, &a.phone_number)
                .await
                .unwrap()
        );
    }

    #[tokio::test]
    async fn test_list_pages() {
        let repo = InMemoryUserRepository::new();
        for i in 0..15 {
            let user = sample_user(&format!("u{i}@example.com"), &format!("{:010}", i));
            repo.create(&user).await.unwrap();
        }

        assert_eq!(repo.list(0, 10).await.unwrap().len(), 10);
        let second = repo.list(10, 10).await.unwrap();
        assert_eq!(second.len(), 5);
        assert_eq!(second[0].email.as_str(), "u10@example.com");
        assert!(repo.list(20, 10).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_search_matches_name_or_email_only() {
        let repo = InMemoryUserRepository::new();
        let mut user = sample_user("jane@example.com", "1111111111");
        user.full_name = "Jane Doe".to_string();
        repo.create(&user).await.unwrap();

        assert_eq!(repo.search("DOE").await.unwrap().len(), 1);
        assert_eq!(repo.search("example.COM").await.unwrap().len(), 1);
        assert!(repo.search("argon2").await.unwrap().is_empty());
        assert!(repo.search("1111").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_delete() {
        let repo = InMemoryUserRepository::new();
        let user = sample_user("a@example.com", "1111111111");
        repo.create(&user).await.unwrap();
        repo.create(&sample_user("b@example.com", "2222222222"))
            .await
            .unwrap();

        assert_eq!(repo.delete(&user.id).await.unwrap(), 1);
        assert_eq!(repo.delete(&user.id).await.unwrap(), 0);
        assert_eq!(repo.delete_all().await.unwrap(), 1);
        assert_eq!(repo.count().await.unwrap(), 0);
    }
}
