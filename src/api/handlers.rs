use crate::{
    api::{AppService, models::*},
    core::{
        errors::LedgerError,
        models::{
            audit::AppLog,
            group::Group,
            payment::Payment,
            recurring_payment::{NewRecurringPayment, RecurringPaymentDefinition},
            transaction::{GroupTransaction, NewGroupTransaction},
        },
        services::GroupBalances,
    },
};
use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    routing::{get, post},
};
use chrono::Utc;
use http::header;
use std::sync::Arc;

pub fn api_routes(service: Arc<AppService>) -> Router {
    Router::new()
        .route("/bookings/run", post(run_scheduled_bookings))
        .route("/recurring-payments", post(create_recurring_payment))
        .route("/recurring-payments/{id}", get(get_recurring_payment))
        .route("/recurring-payments/{id}/payments", get(list_booked_payments))
        .route("/groups", post(create_group))
        .route("/groups/{group_id}", get(get_group))
        .route(
            "/groups/{group_id}/transactions",
            post(add_group_transaction).get(list_group_transactions),
        )
        .route("/groups/{group_id}/balances", get(get_group_balances))
        .route("/logs", get(get_app_logs))
        .with_state(service)
}

fn bearer_token(headers: &HeaderMap) -> Result<&str, LedgerError> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
        .ok_or(LedgerError::Unauthorized)
}

#[utoipa::path(
    post,
    path = "/api/bookings/run",
    params(RunBookingsQuery),
    responses(
        (status = 200, description = "Run finished; per-definition failures are listed", body = BookingRunResponse),
        (status = 401, description = "Missing or wrong trigger secret", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    security(("Bearer" = []))
)]
async fn run_scheduled_bookings(
    State(service): State<Arc<AppService>>,
    headers: HeaderMap,
    Query(query): Query<RunBookingsQuery>,
) -> Result<Json<BookingRunResponse>, ApiError> {
    let capability = service.authorize_trigger(bearer_token(&headers)?)?;
    let now = query.now.unwrap_or_else(Utc::now);
    let report = service.run_scheduled_bookings(now, &capability).await?;
    Ok(Json(report.into()))
}

#[utoipa::path(
    post,
    path = "/api/recurring-payments",
    request_body = NewRecurringPayment,
    responses(
        (status = 201, description = "Recurring payment created", body = RecurringPaymentDefinition),
        (status = 400, description = "Bad request", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
async fn create_recurring_payment(
    State(service): State<Arc<AppService>>,
    Json(req): Json<NewRecurringPayment>,
) -> Result<(StatusCode, Json<RecurringPaymentDefinition>), ApiError> {
    let definition = service.create_recurring_payment(req).await?;
    Ok((StatusCode::CREATED, Json(definition)))
}

#[utoipa::path(
    get,
    path = "/api/recurring-payments/{id}",
    params(("id" = String, Path, description = "ID of the recurring payment")),
    responses(
        (status = 200, description = "Recurring payment", body = RecurringPaymentDefinition),
        (status = 404, description = "Recurring payment not found", body = ErrorResponse)
    )
)]
async fn get_recurring_payment(
    State(service): State<Arc<AppService>>,
    Path(id): Path<String>,
) -> Result<Json<RecurringPaymentDefinition>, ApiError> {
    let definition = service
        .get_recurring_payment(&id)
        .await?
        .ok_or(LedgerError::RecurringPaymentNotFound(id))?;
    Ok(Json(definition))
}

#[utoipa::path(
    get,
    path = "/api/recurring-payments/{id}/payments",
    params(("id" = String, Path, description = "ID of the recurring payment")),
    responses(
        (status = 200, description = "Payments booked from this definition", body = Vec<Payment>),
        (status = 404, description = "Recurring payment not found", body = ErrorResponse)
    )
)]
async fn list_booked_payments(
    State(service): State<Arc<AppService>>,
    Path(id): Path<String>,
) -> Result<Json<Vec<Payment>>, ApiError> {
    let payments = service.list_booked_payments(&id).await?;
    Ok(Json(payments))
}

#[utoipa::path(
    post,
    path = "/api/groups",
    request_body = CreateGroupRequest,
    responses(
        (status = 201, description = "Group created", body = Group),
        (status = 400, description = "Bad request", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
async fn create_group(
    State(service): State<Arc<AppService>>,
    Json(req): Json<CreateGroupRequest>,
) -> Result<(StatusCode, Json<Group>), ApiError> {
    let group = service.create_group(req.name, &req.owner_id, req.member_ids).await?;
    Ok((StatusCode::CREATED, Json(group)))
}

#[utoipa::path(
    get,
    path = "/api/groups/{group_id}",
    params(("group_id" = String, Path, description = "ID of the group")),
    responses(
        (status = 200, description = "Group", body = Group),
        (status = 404, description = "Group not found", body = ErrorResponse)
    )
)]
async fn get_group(
    State(service): State<Arc<AppService>>,
    Path(group_id): Path<String>,
) -> Result<Json<Group>, ApiError> {
    let group = service
        .get_group(&group_id)
        .await?
        .ok_or(LedgerError::GroupNotFound(group_id))?;
    Ok(Json(group))
}

#[utoipa::path(
    post,
    path = "/api/groups/{group_id}/transactions",
    params(("group_id" = String, Path, description = "ID of the group")),
    request_body = NewGroupTransaction,
    responses(
        (status = 201, description = "Transaction appended", body = GroupTransaction),
        (status = 400, description = "Invalid amount or participants", body = ErrorResponse),
        (status = 403, description = "User is not a group member", body = ErrorResponse),
        (status = 404, description = "Group not found", body = ErrorResponse)
    )
)]
async fn add_group_transaction(
    State(service): State<Arc<AppService>>,
    Path(group_id): Path<String>,
    Json(req): Json<NewGroupTransaction>,
) -> Result<(StatusCode, Json<GroupTransaction>), ApiError> {
    let transaction = service.add_group_transaction(&group_id, req).await?;
    Ok((StatusCode::CREATED, Json(transaction)))
}

#[utoipa::path(
    get,
    path = "/api/groups/{group_id}/transactions",
    params(("group_id" = String, Path, description = "ID of the group")),
    responses(
        (status = 200, description = "Ledger in creation order", body = Vec<GroupTransaction>),
        (status = 404, description = "Group not found", body = ErrorResponse)
    )
)]
async fn list_group_transactions(
    State(service): State<Arc<AppService>>,
    Path(group_id): Path<String>,
) -> Result<Json<Vec<GroupTransaction>>, ApiError> {
    let transactions = service.list_group_transactions(&group_id).await?;
    Ok(Json(transactions))
}

#[utoipa::path(
    get,
    path = "/api/groups/{group_id}/balances",
    params(("group_id" = String, Path, description = "ID of the group")),
    responses(
        (status = 200, description = "Per-member balances", body = GroupBalances),
        (status = 400, description = "Ledger holds an unsplittable transaction", body = ErrorResponse),
        (status = 404, description = "Group not found", body = ErrorResponse)
    )
)]
async fn get_group_balances(
    State(service): State<Arc<AppService>>,
    Path(group_id): Path<String>,
) -> Result<Json<GroupBalances>, ApiError> {
    let balances = service.get_group_balances(&group_id).await?;
    Ok(Json(balances))
}

#[utoipa::path(
    get,
    path = "/api/logs",
    params(LogsQuery),
    responses(
        (status = 200, description = "Action log", body = Vec<AppLog>),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
async fn get_app_logs(
    State(service): State<Arc<AppService>>,
    Query(query): Query<LogsQuery>,
) -> Result<Json<Vec<AppLog>>, ApiError> {
    let logs = service.get_app_logs(query.action.as_deref()).await?;
    Ok(Json(logs))
}
