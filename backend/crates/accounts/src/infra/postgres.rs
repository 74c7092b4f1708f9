//! PostgreSQL Repository Implementation

use chrono::{DateTime, Utc};
use kernel::id::UserId;
use platform::password::HashedPassword;
use sqlx::PgPool;
use sqlx::types::Json;
use uuid::Uuid;

use crate::domain::entity::{role::Role, user::User};
use crate::domain::repository::UserRepository;
use crate::domain::value_object::{
    avatar::UserLogo, email::Email, password_hashes::PasswordHashes, phone_number::PhoneNumber,
};
use crate::error::{AccountError, AccountResult};

const USER_COLUMNS: &str = r#"
    id,
    first_name,
    last_name,
    full_name,
    email,
    phone_number,
    password_hash,
    legacy_password_hash,
    is_active,
    is_two_step,
    login_count,
    last_login,
    last_logout,
    otp,
    created_at,
    updated_at,
    created_by,
    updated_by,
    logo_url,
    logo_file_name,
    roles,
    token,
    active_role
"#;

/// PostgreSQL-backed user repository
#[derive(Clone)]
pub struct PgUserRepository {
    pool: PgPool,
}

impl PgUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

impl UserRepository for PgUserRepository {
    async fn create(&self, user: &User) -> AccountResult<()> {
        sqlx::query(
            r#"
            INSERT INTO users (
                id,
                first_name,
                last_name,
                full_name,
                email,
                phone_number,
                password_hash,
                legacy_password_hash,
                is_active,
                is_two_step,
                login_count,
                last_login,
                last_logout,
                otp,
                created_at,
                updated_at,
                created_by,
                updated_by,
                logo_url,
                logo_file_name,
                roles,
                token,
                active_role
            ) VALUES (
                $1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12,
                $13, $14, $15, $16, $17, $18, $19, $20, $21, $22, $23
            )
            "#,
        )
        .bind(user.id.as_uuid())
        .bind(&user.first_name)
        .bind(&user.last_name)
        .bind(&user.full_name)
        .bind(user.email.as_str())
        .bind(user.phone_number.as_str())
        .bind(user.passwords.current().as_str())
        .bind(user.passwords.legacy().map(HashedPassword::as_str))
        .bind(user.is_active)
        .bind(user.is_two_step)
        .bind(user.login_count)
        .bind(user.last_login)
        .bind(user.last_logout)
        .bind(&user.otp)
        .bind(user.created_at)
        .bind(user.updated_at)
        .bind(&user.created_by)
        .bind(user.updated_by.as_deref())
        .bind(&user.user_logo.url)
        .bind(&user.user_logo.file_name)
        .bind(Json(&user.roles))
        .bind(&user.token)
        .bind(user.active_role.as_deref())
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn find_by_id(&self, id: &UserId) -> AccountResult<Option<User>> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1");
        let row = sqlx::query_as::<_, UserRow>(&sql)
            .bind(id.as_uuid())
            .fetch_optional(&self.pool)
            .await?;

        row.map(UserRow::into_user).transpose()
    }

    async fn find_by_email(&self, email: &Email) -> AccountResult<Option<User>> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE email = $1");
        let row = sqlx::query_as::<_, UserRow>(&sql)
            .bind(email.as_str())
            .fetch_optional(&self.pool)
            .await?;

        row.map(UserRow::into_user).transpose()
    }

    async fn exists_by_email_or_phone(
        &self,
        email: &Email,
        phone_number: &PhoneNumber,
    ) -> AccountResult<bool> {
        let exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM users WHERE email = $1 OR phone_number = $2)",
        )
        .bind(email.as_str())
        .bind(phone_number.as_str())
        .fetch_one(&self.pool)
        .await?;

        Ok(exists)
    }

    async fn exists_by_email_or_phone_excluding(
        &self,
        id: &UserId,
        email: &Email,
        phone_number: &PhoneNumber,
    ) -> AccountResult<bool> {
        let exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM users WHERE id <> $1 AND (email = $2 OR phone_number = $3))",
        )
        .bind(id.as_uuid())
        .bind(email.as_str())
        .bind(phone_number.as_str())
        .fetch_one(&self.pool)
        .await?;

        Ok(exists)
    }

    async fn list(&self, offset: u64, limit: u64) -> AccountResult<Vec<User>> {
        let sql = format!(
            "SELECT {USER_COLUMNS} FROM users ORDER BY created_at, id LIMIT $1 OFFSET $2"
        );
        let rows = sqlx::query_as::<_, UserRow>(&sql)
            .bind(i64::try_from(limit).unwrap_or(i64::MAX))
            .bind(i64::try_from(offset).unwrap_or(i64::MAX))
            .fetch_all(&self.pool)
            .await?;

        rows.into_iter().map(UserRow::into_user).collect()
    }

    async fn count(&self) -> AccountResult<u64> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM users")
            .fetch_one(&self.pool)
            .await?;

        Ok(count.max(0) as u64)
    }

    async fn search(&self, term: &str) -> AccountResult<Vec<User>> {
        let sql = format!(
            "SELECT {USER_COLUMNS} FROM users \
             WHERE full_name ILIKE $1 OR email ILIKE $1 \
             ORDER BY created_at, id"
        );
        let rows = sqlx::query_as::<_, UserRow>(&sql)
            .bind(format!("%{}%", escape_like(term)))
            .fetch_all(&self.pool)
            .await?;

        rows.into_iter().map(UserRow::into_user).collect()
    }

    async fn update(&self, user: &User) -> AccountResult<()> {
        let result = sqlx::query(
            r#"
            UPDATE users SET
                first_name = $2,
                last_name = $3,
                full_name = $4,
                email = $5,
                phone_number = $6,
                password_hash = $7,
                legacy_password_hash = $8,
                is_active = $9,
                is_two_step = $10,
                login_count = $11,
                last_login = $12,
                last_logout = $13,
                otp = $14,
                updated_at = $15,
                updated_by = $16,
                logo_url = $17,
                logo_file_name = $18,
                roles = $19,
                token = $20,
                active_role = $21
            WHERE id = $1
            "#,
        )
        .bind(user.id.as_uuid())
        .bind(&user.first_name)
        .bind(&user.last_name)
        .bind(&user.full_name)
        .bind(user.email.as_str())
        .bind(user.phone_number.as_str())
        .bind(user.passwords.current().as_str())
        .bind(user.passwords.legacy().map(HashedPassword::as_str))
        .bind(user.is_active)
        .bind(user.is_two_step)
        .bind(user.login_count)
        .bind(user.last_login)
        .bind(user.last_logout)
        .bind(&user.otp)
        .bind(user.updated_at)
        .bind(user.updated_by.as_deref())
        .bind(&user.user_logo.url)
        .bind(&user.user_logo.file_name)
        .bind(Json(&user.roles))
        .bind(&user.token)
        .bind(user.active_role.as_deref())
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AccountError::UserNotFound);
        }

        Ok(())
    }

    async fn replace_roles(&self, id: &UserId, roles: &[Role]) -> AccountResult<()> {
        let result = sqlx::query("UPDATE users SET roles = $2 WHERE id = $1")
            .bind(id.as_uuid())
            .bind(Json(roles))
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AccountError::UserNotFound);
        }

        Ok(())
    }

    async fn delete(&self, id: &UserId) -> AccountResult<u64> {
        let deleted = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id.as_uuid())
            .execute(&self.pool)
            .await?
            .rows_affected();

        Ok(deleted)
    }

    async fn delete_all(&self) -> AccountResult<u64> {
        let deleted = sqlx::query("DELETE FROM users")
            .execute(&self.pool)
            .await?
            .rows_affected();

        tracing::info!(users_deleted = deleted, "Deleted all users");

        Ok(deleted)
    }
}

/// Escape `%`, `_` and `\` so the term matches literally inside ILIKE
fn escape_like(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len());
    for ch in term.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped
}

// ============================================================================
// Row Types
// ============================================================================

#[derive(sqlx::FromRow)]
struct UserRow {
    id: Uuid,
    first_name: String,
    last_name: String,
    full_name: String,
    email: String,
    phone_number: String,
    password_hash: String,
    legacy_password_hash: Option<String>,
    is_active: bool,
    is_two_step: bool,
    login_count: i64,
    last_login: Option<DateTime<Utc>>,
    last_logout: Option<DateTime<Utc>>,
    otp: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    created_by: String,
    updated_by: Option<String>,
    logo_url: String,
    logo_file_name: String,
    roles: Json<Vec<Role>>,
    token: String,
    active_role: Option<String>,
}

impl UserRow {
    fn into_user(self) -> AccountResult<User> {
        let current = HashedPassword::from_stored(self.password_hash).map_err(|_| {
            AccountError::Internal(format!("Malformed password hash for user {}", self.id))
        })?;

        let legacy = self
            .legacy_password_hash
            .filter(|h| !h.is_empty())
            .and_then(|h| match HashedPassword::from_stored(h) {
                Ok(hash) => Some(hash),
                Err(_) => {
                    tracing::warn!(user_id = %self.id, "Ignoring malformed legacy password hash");
                    None
                }
            });

        Ok(User {
            id: UserId::from_uuid(self.id),
            first_name: self.first_name,
            last_name: self.last_name,
            full_name: self.full_name,
            email: Email::from_db(self.email),
            phone_number: PhoneNumber::from_db(self.phone_number),
            passwords: PasswordHashes::with_legacy(current, legacy),
            is_active: self.is_active,
            is_two_step: self.is_two_step,
            login_count: self.login_count,
            last_login: self.last_login,
            last_logout: self.last_logout,
            otp: self.otp,
            created_at: self.created_at,
            updated_at: self.updated_at,
            created_by: self.created_by,
            updated_by: self.updated_by,
            user_logo: UserLogo::new(self.logo_url, self.logo_file_name),
            roles: self.roles.0,
            token: self.token,
            active_role: self.active_role,
        })
    }
}
