//! Domain layer for the SplitLedger backend.
//!
//! This crate contains:
//! - Request/response DTOs for the HTTP API
//! - Domain enums (invite status, group roles, income categories)
//! - Validation rules applied at the service boundary

pub mod models;
