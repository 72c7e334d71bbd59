//! Database entity definitions.
//!
//! Entities are direct mappings to database rows.

pub mod expense;
pub mod group;
pub mod income;
pub mod investment;
pub mod invite;
pub mod user;

pub use expense::{ExpenseEntity, ExpenseWithPayerEntity};
pub use group::{GroupEntity, GroupMemberEntity, MemberWithUserEntity, UserGroupEntity};
pub use income::{IncomeEntity, IncomeWithUserEntity};
pub use investment::{InvestmentEntity, InvestmentWithUserEntity};
pub use invite::{GroupInviteEntity, InviteWithDetailsEntity};
pub use user::UserEntity;
