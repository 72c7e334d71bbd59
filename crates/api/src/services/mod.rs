//! External service clients.

pub mod classifier;
pub mod email;
pub mod identity;
pub mod stocks;
