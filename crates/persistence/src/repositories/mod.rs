//! Repository implementations.

pub mod expense;
pub mod group;
pub mod income;
pub mod investment;
pub mod invite;
pub mod user;

pub use expense::ExpenseRepository;
pub use group::GroupRepository;
pub use income::IncomeRepository;
pub use investment::InvestmentRepository;
pub use invite::{default_invite_expiration, AcceptOutcome, InviteRepository};
pub use user::UserRepository;
