use axum::{
    middleware,
    routing::{delete, get, post, put},
    Router,
};
use sqlx::PgPool;
use std::sync::Arc;
use std::time::Duration;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::Config;
use crate::middleware::{
    metrics_handler, metrics_middleware, optional_auth, rate_limit_middleware, require_auth,
    security_headers_middleware, trace_id, RateLimiterState,
};
use crate::routes::{auth, expenses, groups, health, income, investments, invites, users};
use crate::services::{
    classifier::ClassifierService, email::EmailService, identity::IdentityService,
    stocks::StockService,
};

#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub config: Arc<Config>,
    pub rate_limiter: Option<Arc<RateLimiterState>>,
    pub identity: IdentityService,
    pub email: EmailService,
    pub stocks: StockService,
    pub classifier: ClassifierService,
}

pub fn create_app(config: Config, pool: PgPool) -> Router {
    let config = Arc::new(config);

    // Rate limiting is disabled when the configured limit is 0
    let rate_limiter = if config.security.rate_limit_per_minute > 0 {
        Some(Arc::new(RateLimiterState::new(
            config.security.rate_limit_per_minute,
        )))
    } else {
        None
    };

    let state = AppState {
        pool,
        config: config.clone(),
        rate_limiter,
        identity: IdentityService::new(&config.identity),
        email: EmailService::new(config.email.clone()),
        stocks: StockService::new(&config.stocks),
        classifier: ClassifierService::new(&config.classifier),
    };

    // Build CORS layer based on configuration
    let cors = if config.security.cors_origins.is_empty() {
        // Default: allow any origin (for development)
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        use tower_http::cors::AllowOrigin;
        let origins: Vec<_> = config
            .security
            .cors_origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();
        CorsLayer::new()
            .allow_origin(AllowOrigin::list(origins))
            .allow_methods(Any)
            .allow_headers(Any)
    };

    // Protected routes (require a verified bearer token)
    // Middleware order: auth runs first, then rate limiting (keyed by user)
    let protected_routes = Router::new()
        // Session and profile
        .route("/api/v1/users", get(users::list_users))
        .route("/api/v1/users/me", get(users::get_profile))
        .route("/api/v1/users/me", put(users::update_profile))
        .route("/api/v1/users/:user_id", get(users::get_user))
        .route("/api/v1/users/:user_id", delete(users::delete_user))
        // Groups
        .route("/api/v1/groups", post(groups::create_group))
        .route("/api/v1/groups/mine", get(groups::list_my_groups))
        .route("/api/v1/groups/:group_id", put(groups::update_group))
        .route("/api/v1/groups/:group_id", delete(groups::delete_group))
        .route(
            "/api/v1/groups/:group_id/details",
            get(groups::get_group_details),
        )
        // Membership
        .route("/api/v1/groups/:group_id/members", get(groups::list_members))
        .route("/api/v1/groups/:group_id/members", post(groups::add_member))
        .route("/api/v1/groups/:group_id/join", post(groups::join_group))
        .route(
            "/api/v1/groups/:group_id/members/:user_id",
            delete(groups::remove_member),
        )
        .route(
            "/api/v1/groups/:group_id/members/:user_id/role",
            put(groups::update_member_role),
        )
        .route("/api/v1/groups/:group_id/leave", post(groups::leave_group))
        // Invitations
        .route(
            "/api/v1/groups/:group_id/invites",
            post(invites::create_invite),
        )
        .route("/api/v1/invites/pending", get(invites::list_pending_invites))
        .route("/api/v1/invites/:token", get(invites::get_invite))
        .route("/api/v1/invites/:token/accept", post(invites::accept_invite))
        // Expenses
        .route(
            "/api/v1/groups/:group_id/expenses",
            get(expenses::list_group_expenses),
        )
        .route("/api/v1/expenses", post(expenses::create_expense))
        .route("/api/v1/expenses/classify", post(expenses::classify_expense))
        .route("/api/v1/expenses/ocr", post(expenses::ocr_expense))
        .route("/api/v1/expenses/:expense_id", put(expenses::update_expense))
        .route(
            "/api/v1/expenses/:expense_id",
            delete(expenses::delete_expense),
        )
        // Income
        .route(
            "/api/v1/groups/:group_id/income",
            get(income::list_group_income),
        )
        .route("/api/v1/income", post(income::create_income))
        .route("/api/v1/income/:income_id", put(income::update_income))
        .route("/api/v1/income/:income_id", delete(income::delete_income))
        // Investments
        .route(
            "/api/v1/groups/:group_id/investments",
            get(investments::list_group_investments),
        )
        .route("/api/v1/investments", post(investments::create_investment))
        .route(
            "/api/v1/investments/:investment_id",
            delete(investments::delete_investment),
        )
        .route("/api/v1/stocks/search", get(investments::search_tickers))
        .route(
            "/api/v1/stocks/:ticker/price",
            get(investments::get_ticker_price),
        )
        // Rate limiting runs after auth (needs the user id from auth)
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            rate_limit_middleware,
        ))
        // Auth runs first (outermost layer = runs first)
        .route_layer(middleware::from_fn_with_state(state.clone(), require_auth));

    // Decline works without a session; the invite token is the capability.
    // When a session is present the recipient check still applies.
    let decline_routes = Router::new()
        .route(
            "/api/v1/invites/:token/decline",
            post(invites::decline_invite),
        )
        .route_layer(middleware::from_fn_with_state(state.clone(), optional_auth));

    // Public routes (no authentication required)
    let public_routes = Router::new()
        .route("/api/health", get(health::health_check))
        .route("/api/health/ready", get(health::ready))
        .route("/api/health/live", get(health::live))
        .route("/api/v1/auth/validate", post(auth::validate_token))
        // Group directory reads are public; everything under them is not
        .route("/api/v1/groups", get(groups::list_groups))
        .route("/api/v1/groups/:group_id", get(groups::get_group))
        .route("/metrics", get(metrics_handler));

    // Merge all routes
    Router::new()
        .merge(public_routes)
        .merge(decline_routes)
        .merge(protected_routes)
        // Global middleware (order matters: bottom layers run first)
        .layer(middleware::from_fn(security_headers_middleware))
        .layer(CompressionLayer::new())
        .layer(TimeoutLayer::new(Duration::from_secs(
            config.server.request_timeout_secs,
        )))
        .layer(middleware::from_fn(metrics_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(trace_id))
        .layer(cors)
        .with_state(state)
}
