//! Platform Crate - Technical Infrastructure
//!
//! This crate provides shared technical foundations:
//! - Cryptographic utilities (HMAC-SHA256, base64url, secure randomness)
//! - Password hashing (Argon2id)
//! - Bearer credential extraction from HTTP headers

pub mod bearer;
pub mod crypto;
pub mod password;
