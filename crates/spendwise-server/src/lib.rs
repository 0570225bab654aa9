//! Spendwise Web Server
//!
//! Axum-based REST API for the Spendwise expense tracker.
//!
//! - Stateless analytics endpoints that work on the posted transactions
//! - An in-memory ledger (expenses, income, budgets) with a report endpoint
//! - AI endpoints that fall back to the rule-based engine
//! - Configurable CORS and security headers on every response

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, FromRequest},
    http::{header, HeaderValue, Method, StatusCode},
    response::{IntoResponse, Response},
    routing::{delete, get, post},
    Json, Router,
};
use chrono::NaiveDate;
use serde::Serialize;
use tower_http::{
    cors::{Any, CorsLayer},
    services::ServeDir,
    set_header::SetResponseHeaderLayer,
    trace::TraceLayer,
};
use tracing::{error, info, warn};

use spendwise_core::{AIBackend, AIClient, Advisor, AnalyticsConfig, AnalyticsEngine, LedgerStore};

mod handlers;

/// Server configuration
#[derive(Clone, Default)]
pub struct ServerConfig {
    /// Allowed CORS origins (empty = same-origin only, `*` = any origin)
    pub allowed_origins: Vec<String>,
    /// Fixed "today" for analytics (tests and demos); `None` uses the local date
    pub fixed_today: Option<NaiveDate>,
}

/// Shared application state
pub struct AppState {
    pub store: LedgerStore,
    pub advisor: Advisor,
    pub config: ServerConfig,
}

impl AppState {
    /// Reference date for month-scoped analytics
    pub fn today(&self) -> NaiveDate {
        self.config
            .fixed_today
            .unwrap_or_else(|| chrono::Local::now().date_naive())
    }

    pub fn engine(&self) -> &AnalyticsEngine {
        self.advisor.engine()
    }
}

/// Simple success response
#[derive(Serialize)]
pub struct SuccessResponse {
    pub success: bool,
}

/// JSON body extractor whose rejections use the API error shape
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct ApiJson<T>(pub T);

/// Create the application router
pub fn create_router(
    store: LedgerStore,
    advisor: Advisor,
    static_dir: Option<&str>,
    config: ServerConfig,
) -> Router {
    let state = Arc::new(AppState {
        store,
        advisor,
        config: config.clone(),
    });

    let api_routes = Router::new()
        .route("/", get(handlers::root))
        .route("/health", get(handlers::health))
        // Ledger
        .route(
            "/expenses",
            get(handlers::list_expenses).post(handlers::create_expense),
        )
        .route("/expenses/:id", delete(handlers::delete_expense))
        .route(
            "/income",
            get(handlers::list_income).post(handlers::create_income),
        )
        .route("/income/:id", delete(handlers::delete_income))
        .route(
            "/budgets",
            get(handlers::list_budgets).post(handlers::create_budget),
        )
        .route("/budgets/:id", delete(handlers::delete_budget))
        .route("/ledger/report", get(handlers::ledger_report))
        // Stateless analytics
        .route("/expenses/analytics", post(handlers::expense_analytics))
        .route("/budget/alerts", post(handlers::budget_alerts))
        .route("/budget/status", post(handlers::budget_status))
        .route("/health-score", post(handlers::health_score))
        .route("/savings/advice", post(handlers::savings_advice))
        // AI with rule-based fallback
        .route("/expenses/predict", post(handlers::predict_expenses))
        .route("/expenses/categorize", get(handlers::categorize_expense))
        .route("/expenses/insights", post(handlers::spending_insights));

    let methods = [Method::GET, Method::POST, Method::DELETE, Method::OPTIONS];
    let cors = if config.allowed_origins.iter().any(|o| o == "*") {
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(methods)
            .allow_headers([header::CONTENT_TYPE])
    } else if config.allowed_origins.is_empty() {
        CorsLayer::new()
            .allow_methods(methods)
            .allow_headers([header::CONTENT_TYPE])
    } else {
        let origins: Vec<HeaderValue> = config
            .allowed_origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();
        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods(methods)
            .allow_headers([header::CONTENT_TYPE])
    };

    let mut app = Router::new()
        .nest("/api", api_routes)
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .layer(SetResponseHeaderLayer::overriding(
            header::X_CONTENT_TYPE_OPTIONS,
            HeaderValue::from_static("nosniff"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::X_FRAME_OPTIONS,
            HeaderValue::from_static("DENY"),
        ));

    if let Some(dir) = static_dir {
        app = app.fallback_service(ServeDir::new(dir));
    }

    app
}

/// Build the advisor from config and the AI environment variables
pub async fn build_advisor(config: AnalyticsConfig) -> anyhow::Result<Advisor> {
    let timeout = config.ai_timeout;
    let ai = match AIClient::from_env(timeout) {
        Ok(client) => {
            check_ai_connection(&client).await;
            Some(client)
        }
        Err(e) => {
            info!("ℹ️  AI backend not configured ({}), using rule-based analytics", e);
            None
        }
    };
    Ok(Advisor::new(AnalyticsEngine::with_config(config), ai)?)
}

pub async fn serve_with_config(
    store: LedgerStore,
    advisor: Advisor,
    host: &str,
    port: u16,
    static_dir: Option<&str>,
    config: ServerConfig,
) -> anyhow::Result<()> {
    if config.allowed_origins.iter().any(|o| o == "*") {
        warn!("⚠️  CORS allows any origin - do not expose to an untrusted network!");
    }

    let app = create_router(store, advisor, static_dir, config);
    let addr = format!("{}:{}", host, port);

    info!("Starting server at http://{}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

async fn check_ai_connection(client: &AIClient) {
    if client.health_check().await {
        info!(
            "✅ AI backend connected: {} {} (model: {})",
            client.kind(),
            client.host(),
            client.model()
        );
    } else {
        warn!(
            "⚠️  AI backend configured but not responding: {} {} (rule-based fallback in use)",
            client.kind(),
            client.host()
        );
    }
}

// ============================================================================
// Error Handling
// ============================================================================

/// Application error type with proper HTTP status codes
#[derive(Debug)]
pub struct AppError {
    status: StatusCode,
    message: String,
    internal: Option<anyhow::Error>,
}

impl AppError {
    pub fn bad_request(msg: &str) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: msg.to_string(),
            internal: None,
        }
    }

    pub fn not_found(msg: &str) -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            message: msg.to_string(),
            internal: None,
        }
    }

    pub fn conflict(msg: &str) -> Self {
        Self {
            status: StatusCode::CONFLICT,
            message: msg.to_string(),
            internal: None,
        }
    }

    pub fn internal(err: anyhow::Error) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            // Return generic message to client
            message: "An internal error occurred".to_string(),
            // Keep full error for logging
            internal: Some(err),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Log the full internal error if present
        if let Some(err) = &self.internal {
            error!(error = %err, "Internal error");
        }

        let body = Json(serde_json::json!({
            "error": self.message
        }));

        (self.status, body).into_response()
    }
}

impl From<spendwise_core::Error> for AppError {
    fn from(err: spendwise_core::Error) -> Self {
        use spendwise_core::Error;
        match err {
            Error::InvalidData(msg) => Self::bad_request(&msg),
            Error::NotFound(what) => Self::not_found(&format!("Not found: {}", what)),
            Error::Conflict(msg) => Self::conflict(&msg),
            other => Self::internal(other.into()),
        }
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        Self::internal(err)
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: rejection.body_text(),
            internal: None,
        }
    }
}
