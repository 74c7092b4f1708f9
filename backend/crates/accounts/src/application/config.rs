//! Application Configuration
//!
//! Configuration for the Accounts application layer.

use std::path::PathBuf;
use std::time::Duration;

use platform::cloudinary::CloudinaryConfig;
use platform::cookie::CookieConfig;
use platform::token::TokenSigner;

/// Re-export SameSite from platform
pub use platform::cookie::SameSite;

/// Accounts application configuration
#[derive(Clone)]
pub struct AccountsConfig {
    /// Session cookie name
    pub session_cookie_name: String,
    /// HS256 secret for session tokens
    pub token_secret: Vec<u8>,
    /// Token lifetime (also the cookie Max-Age)
    pub token_ttl: Duration,
    /// Whether to require Secure cookie
    pub cookie_secure: bool,
    /// SameSite policy
    pub cookie_same_site: SameSite,
    /// Password pepper (optional, application-wide secret)
    pub password_pepper: Option<Vec<u8>>,
}

impl Default for AccountsConfig {
    fn default() -> Self {
        Self {
            session_cookie_name: "token".to_string(),
            token_secret: Vec::new(),
            token_ttl: Duration::from_secs(24 * 3600), // 1 day
            cookie_secure: true,
            cookie_same_site: SameSite::Lax,
            password_pepper: None,
        }
    }
}

impl AccountsConfig {
    /// Create config with a random token secret (for development)
    pub fn with_random_secret() -> Self {
        use rand::RngCore;
        let mut secret = vec![0u8; 32];
        rand::rng().fill_bytes(&mut secret);
        Self {
            token_secret: secret,
            ..Default::default()
        }
    }

    /// Create config for development (insecure cookie)
    pub fn development() -> Self {
        Self {
            cookie_secure: false,
            ..Self::with_random_secret()
        }
    }

    pub fn token_signer(&self) -> TokenSigner {
        TokenSigner::new(&self.token_secret, self.token_ttl)
    }

    pub fn session_cookie(&self) -> CookieConfig {
        CookieConfig {
            name: self.session_cookie_name.clone(),
            secure: self.cookie_secure,
            http_only: true,
            same_site: self.cookie_same_site,
            path: "/".to_string(),
            max_age_secs: Some(self.token_ttl.as_secs()),
        }
    }

    /// Get password pepper as slice
    pub fn pepper(&self) -> Option<&[u8]> {
        self.password_pepper.as_deref()
    }
}

impl std::fmt::Debug for AccountsConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AccountsConfig")
            .field("session_cookie_name", &self.session_cookie_name)
            .field("token_secret", &"[REDACTED]")
            .field("token_ttl", &self.token_ttl)
            .field("cookie_secure", &self.cookie_secure)
            .field("cookie_same_site", &self.cookie_same_site)
            .field("password_pepper", &self.password_pepper.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

/// Where avatars are stored
#[derive(Debug, Clone)]
pub struct StorageConfig {
    /// `true` stores on local disk, `false` in Cloudinary
    pub local_upload: bool,
    pub upload_dir: PathBuf,
    pub cloudinary: Option<CloudinaryConfig>,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            local_upload: false,
            upload_dir: PathBuf::from("public/temp"),
            cloudinary: None,
        }
    }
}

impl StorageConfig {
    /// Local storage under the given directory
    pub fn local(upload_dir: impl Into<PathBuf>) -> Self {
        Self {
            local_upload: true,
            upload_dir: upload_dir.into(),
            cloudinary: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_cookie_follows_config() {
        let config = AccountsConfig {
            token_ttl: Duration::from_secs(3600),
            ..AccountsConfig::development()
        };

        let cookie = config.session_cookie().build_set_cookie("abc");
        assert!(cookie.starts_with("token=abc"));
        assert!(cookie.contains("Max-Age=3600"));
        assert!(!cookie.contains("Secure"));
        assert!(cookie.contains("HttpOnly"));
    }

    #[test]
    fn test_random_secrets_differ() {
        let a = AccountsConfig::with_random_secret();
        let b = AccountsConfig::with_random_secret();
        assert_eq!(a.token_secret.len(), 32);
        assert_ne!(a.token_secret, b.token_secret);
        assert!(!format!("{:?}", a).contains(&format!("{:?}", a.token_secret)));
    }
}
