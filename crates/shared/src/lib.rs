//! Shared utilities for the recruit portal backend.
//!
//! This crate provides common functionality used across all other crates:
//! - Password hashing with Argon2id and temporary-password generation
//! - Link-code generation and keyed digests
//! - Cursor-based pagination helpers

pub mod crypto;
pub mod pagination;
pub mod password;
