use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chess_trainer_core::Error;
use serde::Serialize;
use tracing::warn;

/// A core error rendered as `{"error": "..."}`
#[derive(Debug)]
pub struct ApiError(pub Error);

#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self.0 {
            Error::InvalidFen(_) | Error::InvalidElo(_) => StatusCode::BAD_REQUEST,
            Error::IllegalMove(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Error::ConcurrentDispatchRejected => StatusCode::CONFLICT,
            Error::EngineUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<Error> for ApiError {
    fn from(error: Error) -> Self {
        Self(error)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            warn!(error = %self.0, "request failed");
        }
        (status, Json(ErrorBody { error: self.0.to_string() })).into_response()
    }
}
