//! Value Object Module

pub mod avatar;
pub mod email;
pub mod password_hashes;
pub mod person_name;
pub mod phone_number;
