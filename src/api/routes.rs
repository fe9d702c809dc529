//! API Routes
//!
//! HTTP endpoint definitions.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};

use crate::domain::{OperationContext, Transaction, UserRecord};
use crate::error::AppError;
use crate::handlers::{
    CreateTransactionCommand, CreateTransactionHandler, RegisterUserCommand,
    RegisterUserHandler, TransactionQueries,
};

use super::AppState;

// =========================================================================
// Request/Response types
// =========================================================================

#[derive(Deserialize, Serialize)]
pub struct RegisterRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct CreateTransactionRequest {
    pub amount: f64,
    pub description: String,
    pub user_id: i64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RootResponse {
    pub message: String,
}

// =========================================================================
// API Router
// =========================================================================

/// Create the API router
pub fn create_router() -> Router<AppState> {
    Router::new()
        .route("/", get(read_root))
        .route("/register", post(register))
        .route("/transactions", post(create_transaction).get(list_transactions))
        .route("/users/:user_id/transactions", get(list_user_transactions))
}

// =========================================================================
// GET /
// =========================================================================

async fn read_root() -> Json<RootResponse> {
    Json(RootResponse {
        message: "FinTech API is running".to_string(),
    })
}

// =========================================================================
// POST /register
// =========================================================================

/// Register a new user
async fn register(
    State(state): State<AppState>,
    context: OperationContext,
    Json(request): Json<RegisterRequest>,
) -> Result<Json<UserRecord>, AppError> {
    let handler = RegisterUserHandler::new(state.store, state.hasher, state.telemetry);
    let command = RegisterUserCommand::new(request.username, request.password);

    let user = handler.execute(command, &context).await?;

    Ok(Json(user))
}

// =========================================================================
// POST /transactions
// =========================================================================

/// Log a transaction for an existing user
async fn create_transaction(
    State(state): State<AppState>,
    context: OperationContext,
    Json(request): Json<CreateTransactionRequest>,
) -> Result<Json<Transaction>, AppError> {
    let handler = CreateTransactionHandler::new(state.store, state.telemetry);
    let command =
        CreateTransactionCommand::new(request.amount, request.description, request.user_id);

    let transaction = handler.execute(command, &context).await?;

    Ok(Json(transaction))
}

// =========================================================================
// GET /transactions
// =========================================================================

async fn list_transactions(
    State(state): State<AppState>,
) -> Result<Json<Vec<Transaction>>, AppError> {
    let transactions = TransactionQueries::new(state.store).list_all().await?;
    Ok(Json(transactions))
}

// =========================================================================
// GET /users/:user_id/transactions
// =========================================================================

async fn list_user_transactions(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
) -> Result<Json<Vec<Transaction>>, AppError> {
    let transactions = TransactionQueries::new(state.store)
        .list_for_user(user_id)
        .await?;
    Ok(Json(transactions))
}

// =========================================================================
// GET /health
// =========================================================================

/// Health check endpoint
pub async fn health_check(State(state): State<AppState>) -> (StatusCode, &'static str) {
    match state.store.verify_connection().await {
        Ok(()) => (StatusCode::OK, "OK"),
        Err(e) => {
            tracing::warn!(error = %e, "Health check failed");
            (StatusCode::SERVICE_UNAVAILABLE, "UNAVAILABLE")
        }
    }
}
