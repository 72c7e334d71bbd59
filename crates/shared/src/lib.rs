//! Shared utilities and common types for the SplitLedger backend.
//!
//! This crate provides common functionality used across all other crates:
//! - Invite token generation
//! - Common validation logic

pub mod token;
pub mod validation;
