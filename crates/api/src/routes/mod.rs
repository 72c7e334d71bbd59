//! API route handlers.

pub mod auth;
pub mod expenses;
pub mod groups;
pub mod health;
pub mod income;
pub mod investments;
pub mod invites;
pub mod users;
