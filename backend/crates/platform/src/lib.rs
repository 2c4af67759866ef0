//! Platform Crate - Technical Infrastructure
//!
//! This crate provides shared technical foundations:
//! - Cryptographic utilities (SHA-256, HMAC-SHA256, Base64)
//! - Password policy and Argon2id hashing
//! - Cookie building and parsing
//! - Client identification from request headers

pub mod client;
pub mod cookie;
pub mod crypto;
pub mod password;
