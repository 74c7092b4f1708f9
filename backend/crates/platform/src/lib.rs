//! Platform Crate - Technical Infrastructure
//!
//! This crate provides shared technical foundations:
//! - Password hashing (Argon2id) with verification of legacy bcrypt hashes
//! - Signed session tokens (HS256 JWT)
//! - Cookie management
//! - Cloudinary object-store client

pub mod cloudinary;
pub mod cookie;
pub mod password;
pub mod token;
