//! HTTP adapter mapping for domain errors.
//!
//! Keeps the domain error type HTTP-agnostic while letting Actix handlers
//! turn domain failures into the uniform `{"error": "..."}` JSON shape and
//! a status code derived from the error class.

use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use serde::{Deserialize, Serialize};
use tracing::error;
use utoipa::ToSchema;

use crate::domain::{Error, ErrorCode};

/// Wire shape for every non-2xx response body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ErrorBody {
    /// Human-readable description of the failure.
    #[schema(example = "Entry not found")]
    pub error: String,
}

fn status_for(code: ErrorCode) -> StatusCode {
    match code {
        ErrorCode::InvalidRequest => StatusCode::BAD_REQUEST,
        ErrorCode::Unauthorized => StatusCode::UNAUTHORIZED,
        ErrorCode::Forbidden => StatusCode::FORBIDDEN,
        ErrorCode::NotFound => StatusCode::NOT_FOUND,
        ErrorCode::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// Internal failures carry backend detail in their message; log it and
/// send a fixed phrase instead.
fn public_message(error: &Error) -> String {
    if matches!(error.code(), ErrorCode::InternalError) {
        error!(detail = %error.message(), "internal error reached the HTTP boundary");
        "Internal server error".to_owned()
    } else {
        error.message().to_owned()
    }
}

impl ResponseError for Error {
    fn status_code(&self) -> StatusCode {
        status_for(self.code())
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(ErrorBody {
            error: public_message(self),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::body::to_bytes;
    use rstest::rstest;

    #[rstest]
    #[case(Error::invalid_request("Invalid request body"), StatusCode::BAD_REQUEST)]
    #[case(Error::unauthorized("No token provided"), StatusCode::UNAUTHORIZED)]
    #[case(Error::forbidden("Insufficient permissions"), StatusCode::FORBIDDEN)]
    #[case(Error::not_found("Entry not found"), StatusCode::NOT_FOUND)]
    #[case(Error::internal("boom"), StatusCode::INTERNAL_SERVER_ERROR)]
    fn maps_codes_to_statuses(#[case] error: Error, #[case] expected: StatusCode) {
        assert_eq!(error.status_code(), expected);
    }

    #[actix_rt::test]
    async fn client_errors_keep_their_message() {
        let response = Error::not_found("Entry not found").error_response();
        let bytes = to_bytes(response.into_body()).await.expect("body");
        let body: ErrorBody = serde_json::from_slice(&bytes).expect("json");
        assert_eq!(body.error, "Entry not found");
    }

    #[actix_rt::test]
    async fn internal_detail_is_redacted() {
        let response = Error::internal("store backend failed: connection refused").error_response();
        let bytes = to_bytes(response.into_body()).await.expect("body");
        let body: ErrorBody = serde_json::from_slice(&bytes).expect("json");
        assert_eq!(body.error, "Internal server error");
    }
}
