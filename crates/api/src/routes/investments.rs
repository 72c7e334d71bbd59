//! Investment tracking and market data routes.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use chrono::NaiveDate;
use domain::models::{validate_ticker, CreateInvestmentRequest, InvestmentResponse};
use persistence::repositories::{GroupRepository, InvestmentRepository};
use serde::Deserialize;
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::CurrentUser;
use crate::response::{ApiResponse, EmptyResponse};
use crate::services::stocks::{StocksError, TickerMatch, TickerQuote};

/// GET /api/v1/groups/:group_id/investments
pub async fn list_group_investments(
    State(state): State<AppState>,
    CurrentUser(caller): CurrentUser,
    Path(group_id): Path<Uuid>,
) -> Result<Json<ApiResponse<Vec<InvestmentResponse>>>, ApiError> {
    let group_repo = GroupRepository::new(state.pool.clone());
    if !group_repo.is_member(group_id, caller.id).await? {
        return Err(ApiError::Forbidden(
            "You are not a member of this group".to_string(),
        ));
    }

    let investment_repo = InvestmentRepository::new(state.pool.clone());
    let positions = investment_repo.list_by_group(group_id).await?;

    Ok(Json(ApiResponse::list(
        positions.into_iter().map(InvestmentResponse::from).collect(),
    )))
}

/// POST /api/v1/investments
pub async fn create_investment(
    State(state): State<AppState>,
    CurrentUser(caller): CurrentUser,
    Json(request): Json<CreateInvestmentRequest>,
) -> Result<impl IntoResponse, ApiError> {
    request.validate()?;

    let group_repo = GroupRepository::new(state.pool.clone());
    if !group_repo.is_member(request.group_id, caller.id).await? {
        return Err(ApiError::Forbidden(
            "You are not a member of this group".to_string(),
        ));
    }

    let investment_repo = InvestmentRepository::new(state.pool.clone());
    let position = investment_repo
        .create(
            request.group_id,
            &request.ticker,
            request.name.trim(),
            request.quantity,
            request.purchase_price,
            request.purchase_date,
            caller.id,
        )
        .await?;

    info!(
        investment_id = %position.id,
        group_id = %position.group_id,
        ticker = %position.ticker,
        added_by = %caller.id,
        "Recorded investment position"
    );

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::ok(InvestmentResponse::from(position))),
    ))
}

/// DELETE /api/v1/investments/:investment_id
///
/// Removable by the member who added it, or by an admin/moderator.
pub async fn delete_investment(
    State(state): State<AppState>,
    CurrentUser(caller): CurrentUser,
    Path(investment_id): Path<Uuid>,
) -> Result<Json<EmptyResponse>, ApiError> {
    let investment_repo = InvestmentRepository::new(state.pool.clone());
    let existing = investment_repo
        .find_by_id(investment_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Investment not found".to_string()))?;

    let group_repo = GroupRepository::new(state.pool.clone());
    let role = group_repo
        .member_role(existing.group_id, caller.id)
        .await?
        .ok_or_else(|| ApiError::Forbidden("You are not a member of this group".to_string()))?;

    if existing.added_by != caller.id && !role.can_manage_members() {
        return Err(ApiError::Forbidden(
            "Only the contributor or a group manager can delete this position".to_string(),
        ));
    }

    if !investment_repo.delete(investment_id).await? {
        return Err(ApiError::NotFound("Investment not found".to_string()));
    }

    info!(investment_id = %investment_id, deleted_by = %caller.id, "Deleted investment");

    Ok(Json(EmptyResponse::new("Investment deleted")))
}

#[derive(Debug, Deserialize)]
pub struct TickerSearchQuery {
    pub query: String,
}

/// GET /api/v1/stocks/search?query=...
pub async fn search_tickers(
    State(state): State<AppState>,
    CurrentUser(_caller): CurrentUser,
    Query(params): Query<TickerSearchQuery>,
) -> Result<Json<ApiResponse<Vec<TickerMatch>>>, ApiError> {
    let term = params.query.trim();
    if term.is_empty() {
        return Err(ApiError::Validation(
            "Search query must not be empty".to_string(),
        ));
    }

    let matches = state.stocks.search(term).await.map_err(stocks_error)?;

    Ok(Json(ApiResponse::list(matches)))
}

#[derive(Debug, Deserialize)]
pub struct TickerPriceQuery {
    /// Optional trading day (YYYY-MM-DD); omitted means the live price.
    pub date: Option<NaiveDate>,
}

/// GET /api/v1/stocks/:ticker/price?date=YYYY-MM-DD
pub async fn get_ticker_price(
    State(state): State<AppState>,
    CurrentUser(_caller): CurrentUser,
    Path(ticker): Path<String>,
    Query(params): Query<TickerPriceQuery>,
) -> Result<Json<ApiResponse<TickerQuote>>, ApiError> {
    let ticker = ticker.to_uppercase();
    validate_ticker(&ticker).map_err(|_| ApiError::Validation("Invalid ticker".to_string()))?;

    let quote = match params.date {
        Some(date) => state.stocks.quote_at(&ticker, date).await,
        None => state.stocks.quote(&ticker).await,
    }
    .map_err(stocks_error)?;

    Ok(Json(ApiResponse::ok(quote)))
}

fn stocks_error(err: StocksError) -> ApiError {
    match err {
        StocksError::TickerNotFound(ticker) => {
            ApiError::NotFound(format!("Ticker not found: {ticker}"))
        }
        StocksError::NotConfigured => {
            ApiError::Upstream("Market data service not configured".to_string())
        }
        StocksError::Upstream(msg) => ApiError::Upstream(msg),
    }
}
