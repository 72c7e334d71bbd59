//! Domain models for SplitLedger.

pub mod auth;
pub mod expense;
pub mod group;
pub mod income;
pub mod invite;
pub mod investment;
pub mod user;

pub use auth::{LoginData, ValidateTokenRequest};
pub use expense::{
    ClassificationResult, ClassifyExpenseRequest, CreateExpenseRequest, ExpenseResponse,
    OcrExpenseRequest, OcrExpenseResult, UpdateExpenseRequest,
};
pub use group::{
    AddMemberRequest, CreateGroupRequest, GroupDetailResponse, GroupResponse, GroupRole,
    MemberResponse, UpdateGroupRequest, UpdateMemberRoleRequest, UserGroupResponse,
};
pub use income::{CreateIncomeRequest, IncomeCategory, IncomeResponse, UpdateIncomeRequest};
pub use invite::{
    CreateInviteRequest, InviteDetail, InviteStatus, InviteSummary, INVITE_EXPIRY_DAYS,
};
pub use investment::{validate_ticker, CreateInvestmentRequest, InvestmentResponse};
pub use user::{UpdateUserRequest, UserResponse};
