use axum::{Json, http::StatusCode, response::IntoResponse};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::core::errors::LedgerError;
use crate::core::models::payment::Payment;
use crate::core::scheduler::BookingRunReport;

#[derive(Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct RunBookingsQuery {
    /// Evaluation instant; defaults to the current time.
    #[param(value_type = Option<String>)]
    pub now: Option<DateTime<Utc>>,
}

#[derive(Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct LogsQuery {
    /// Only entries recorded under this action name.
    pub action: Option<String>,
}

#[derive(Serialize, ToSchema)]
pub struct BookingFailureResponse {
    pub definition_id: String,
    pub error: String,
}

#[derive(Serialize, ToSchema)]
pub struct BookingRunResponse {
    pub booked: Vec<Payment>,
    pub failures: Vec<BookingFailureResponse>,
    pub skipped: usize,
    pub evaluated: usize,
}

impl From<BookingRunReport> for BookingRunResponse {
    fn from(report: BookingRunReport) -> Self {
        BookingRunResponse {
            booked: report.booked,
            failures: report
                .failures
                .into_iter()
                .map(|f| BookingFailureResponse {
                    definition_id: f.definition_id,
                    error: f.error.to_string(),
                })
                .collect(),
            skipped: report.skipped,
            evaluated: report.evaluated,
        }
    }
}

#[derive(Deserialize, ToSchema)]
pub struct CreateGroupRequest {
    pub name: String,
    pub owner_id: String,
    #[serde(default)]
    pub member_ids: Vec<String>,
}

#[derive(Serialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
}

pub struct ApiError(pub LedgerError);

impl From<LedgerError> for ApiError {
    fn from(err: LedgerError) -> Self {
        ApiError(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let status = match &self.0 {
            LedgerError::InvalidAmount(_)
            | LedgerError::InvalidInterval(_)
            | LedgerError::InconsistentParticipants(_)
            | LedgerError::InvalidInput(..) => StatusCode::BAD_REQUEST,
            LedgerError::GroupNotFound(_) | LedgerError::RecurringPaymentNotFound(_) => StatusCode::NOT_FOUND,
            LedgerError::NotGroupMember(_) => StatusCode::FORBIDDEN,
            LedgerError::Unauthorized => StatusCode::UNAUTHORIZED,
            LedgerError::PersistenceConflict(_) => StatusCode::CONFLICT,
            LedgerError::InstantOutOfRange
            | LedgerError::ConservationViolated { .. }
            | LedgerError::StorageError(_)
            | LedgerError::LoggingError(_)
            | LedgerError::InternalServerError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, Json(ErrorResponse { error: self.0.to_string() })).into_response()
    }
}
