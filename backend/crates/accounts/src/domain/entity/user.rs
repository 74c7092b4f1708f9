//! User Entity
//!
//! The account record: profile, credentials, login bookkeeping, avatar and
//! the embedded role list.

use chrono::{DateTime, Utc};
use kernel::id::{RoleId, UserId};

use crate::domain::entity::role::Role;
use crate::domain::value_object::{
    avatar::UserLogo, email::Email, password_hashes::PasswordHashes,
    person_name::full_name, phone_number::PhoneNumber,
};

/// Validated profile fields shared by create and update
#[derive(Debug, Clone)]
pub struct Profile {
    pub first_name: String,
    pub last_name: String,
    pub email: Email,
    pub phone_number: PhoneNumber,
}

#[derive(Debug, Clone)]
pub struct User {
    pub id: UserId,
    pub first_name: String,
    pub last_name: String,
    /// Title-cased `"first last"`
    pub full_name: String,
    pub email: Email,
    pub phone_number: PhoneNumber,
    pub passwords: PasswordHashes,
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
    /// Current session token; empty when signed out
    pub token: String,
    pub active_role: Option<String>,
}

impl User {
    /// Create a new, inactive user without roles
    pub fn new(
        profile: Profile,
        passwords: PasswordHashes,
        created_by: impl Into<String>,
        user_logo: UserLogo,
    ) -> Self {
        let now = Utc::now();

        Self {
            id: UserId::new(),
            full_name: full_name(&profile.first_name, &profile.last_name),
            first_name: profile.first_name,
            last_name: profile.last_name,
            email: profile.email,
            phone_number: profile.phone_number,
            passwords,
            is_active: false,
            is_two_step: false,
            login_count: 0,
            last_login: None,
            last_logout: None,
            otp: String::new(),
            created_at: now,
            updated_at: now,
            created_by: created_by.into(),
            updated_by: None,
            user_logo,
            roles: Vec::new(),
            token: String::new(),
            active_role: None,
        }
    }

    /// Replace profile fields and record who changed them
    pub fn set_profile(&mut self, profile: Profile, updated_by: impl Into<String>) {
        self.full_name = full_name(&profile.first_name, &profile.last_name);
        self.first_name = profile.first_name;
        self.last_name = profile.last_name;
        self.email = profile.email;
        self.phone_number = profile.phone_number;
        self.updated_by = Some(updated_by.into());
        self.touch();
    }

    pub fn set_user_logo(&mut self, user_logo: UserLogo) {
        self.user_logo = user_logo;
        self.touch();
    }

    pub fn set_active(&mut self, is_active: bool) {
        self.is_active = is_active;
        self.touch();
    }

    pub fn set_passwords(&mut self, passwords: PasswordHashes) {
        self.passwords = passwords;
        self.touch();
    }

    /// Record a successful login
    ///
    /// The first role becomes the active role if none is set yet.
    pub fn record_login(&mut self, token: impl Into<String>) {
        let now = Utc::now();
        self.token = token.into();
        self.login_count += 1;
        self.last_login = Some(now);
        if self.active_role.as_deref().is_none_or(str::is_empty) {
            self.active_role = self.roles.first().map(|r| r.role.clone());
        }
    }

    pub fn record_logout(&mut self) {
        self.token.clear();
        self.last_logout = Some(Utc::now());
    }

    // ------------------------------------------------------------------------
    // Role list
    // ------------------------------------------------------------------------

    /// Append a role with a fresh id
    pub fn add_role(&mut self, role: impl Into<String>, modules: Vec<String>) -> &Role {
        let mut new_role = Role::new(role, modules);
        while self.roles.iter().any(|r| r.id == new_role.id) {
            new_role.id = RoleId::new();
        }
        self.roles.push(new_role);
        &self.roles[self.roles.len() - 1]
    }

    /// Replace name and modules of a role in place; false if no such role
    pub fn update_role(&mut self, id: &RoleId, role: impl Into<String>, modules: Vec<String>) -> bool {
        match self.roles.iter_mut().find(|r| &r.id == id) {
            Some(existing) => {
                existing.role = role.into();
                existing.modules = modules;
                true
            }
            None => false,
        }
    }

    /// Remove a role by id; false (and list untouched) if no such role
    pub fn remove_role(&mut self, id: &RoleId) -> bool {
        let before = self.roles.len();
        self.roles.retain(|r| &r.id != id);
        self.roles.len() < before
    }

    fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}
