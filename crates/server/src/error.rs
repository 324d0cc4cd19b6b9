use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use ledger::LedgerError;
use mint::MintError;
use offchain::StoreError;
use serde::Serialize;
use serde_json::json;
use tracing::error;

/// Closed error classification for the HTTP surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ErrorKind {
    Validation,
    Upload,
    LedgerSubmission,
    LedgerQuery,
    MetadataFetch,
    Internal,
}

/// Error envelope returned by every endpoint: a kind from the closed
/// enumeration plus a message.
#[derive(Debug)]
pub struct ApiError {
    pub kind: ErrorKind,
    pub message: String,
}

impl ApiError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self {
            kind: ErrorKind::Validation,
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self {
            kind: ErrorKind::Internal,
            message: message.into(),
        }
    }

    pub fn status(&self) -> StatusCode {
        match self.kind {
            ErrorKind::Validation => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        error!("Request failed ({:?}): {}", self.kind, self.message);
        (
            self.status(),
            Json(json!({
                "kind": self.kind,
                "error": self.message,
            })),
        )
            .into_response()
    }
}

impl From<StoreError> for ApiError {
    fn from(e: StoreError) -> Self {
        let kind = match e {
            StoreError::Fetch(_) | StoreError::InvalidDocument { .. } => ErrorKind::MetadataFetch,
            _ => ErrorKind::Upload,
        };
        Self {
            kind,
            message: e.to_string(),
        }
    }
}

impl From<LedgerError> for ApiError {
    fn from(e: LedgerError) -> Self {
        let kind = if e.is_query_failure() {
            ErrorKind::LedgerQuery
        } else {
            ErrorKind::LedgerSubmission
        };
        Self {
            kind,
            message: e.to_string(),
        }
    }
}

impl From<MintError> for ApiError {
    fn from(e: MintError) -> Self {
        match e {
            MintError::Upload(store) => store.into(),
            MintError::Ledger(ledger) => ledger.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_maps_to_400() {
        assert_eq!(
            ApiError::validation("missing field").status(),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn ledger_errors_split_into_query_and_submission() {
        let query: ApiError = LedgerError::Query("node down".to_string()).into();
        assert_eq!(query.kind, ErrorKind::LedgerQuery);

        let submit: ApiError = LedgerError::Transaction {
            message: "simulation failed".to_string(),
            signature: None,
        }
        .into();
        assert_eq!(submit.kind, ErrorKind::LedgerSubmission);
        assert_eq!(submit.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn store_errors_split_into_upload_and_fetch() {
        let upload: ApiError = StoreError::Upload("publisher 500".to_string()).into();
        assert_eq!(upload.kind, ErrorKind::Upload);

        let fetch: ApiError = StoreError::Fetch("aggregator 404".to_string()).into();
        assert_eq!(fetch.kind, ErrorKind::MetadataFetch);
    }
}
