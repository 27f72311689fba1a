use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use featmgr_core::error::CoreError;
use serde_json::{Map, Value};

/// Application-level error type for HTTP handlers.
///
/// Wraps [`CoreError`] for domain errors and adds HTTP-specific variants.
/// Implements [`IntoResponse`] to produce the same `{ success, message }`
/// envelope as successful responses, plus an error `code`.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A domain-level error from `featmgr_core` without operation context.
    ///
    /// Handlers attach context with [`OperationContext::during`]; this
    /// variant backs the `From<CoreError>` conversion so a bare `?` on a
    /// `CoreResult` still renders the envelope.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// A domain error raised by a named operation, with the request
    /// parameters to echo back to the client.
    #[error("{operation}: {source}")]
    Operation {
        operation: &'static str,
        #[source]
        source: CoreError,
        echo: Map<String, Value>,
    },

    /// A bad request with a human-readable message.
    #[error("Bad request: {0}")]
    BadRequest(String),
}

// Extractor rejections (malformed JSON, non-numeric path or query IDs)
// render through the same envelope as every other failure.

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}

impl From<PathRejection> for AppError {
    fn from(rejection: PathRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

/// Attach an operation name and echoed parameters to a core result.
pub trait OperationContext<T> {
    /// `echo` should be a JSON object; other values are ignored.
    fn during(self, operation: &'static str, echo: Value) -> AppResult<T>;
}

impl<T> OperationContext<T> for Result<T, CoreError> {
    fn during(self, operation: &'static str, echo: Value) -> AppResult<T> {
        self.map_err(|source| AppError::Operation {
            operation,
            source,
            echo: match echo {
                Value::Object(map) => map,
                _ => Map::new(),
            },
        })
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message, echo) = match self {
            AppError::Core(core) => {
                let (status, code, message) = classify_core_error(&core, None);
                (status, code, message, Map::new())
            }
            AppError::Operation {
                operation,
                source,
                echo,
            } => {
                let (status, code, message) = classify_core_error(&source, Some(operation));
                (status, code, message, echo)
            }
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg, Map::new()),
        };

        let mut body = Map::new();
        body.insert("success".into(), Value::Bool(false));
        body.insert("message".into(), Value::String(message));
        body.insert("code".into(), Value::String(code.into()));
        for (key, value) in echo {
            body.entry(key).or_insert(value);
        }

        (status, axum::Json(Value::Object(body))).into_response()
    }
}

/// Classify a core error into an HTTP status, error code, and message.
///
/// - Input errors map to 400, missing entities to 404, conflicts to 409.
/// - Store failures map to 500 with a sanitized message naming the operation.
fn classify_core_error(
    err: &CoreError,
    operation: Option<&'static str>,
) -> (StatusCode, &'static str, String) {
    match err {
        CoreError::NotFound { entity, .. } => (
            StatusCode::NOT_FOUND,
            "NOT_FOUND",
            format!("{entity} not found"),
        ),
        CoreError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
        CoreError::InvalidId { .. } | CoreError::InvalidProductId(_) => {
            (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", err.to_string())
        }
        CoreError::Conflict(msg) => (StatusCode::CONFLICT, "CONFLICT", msg.clone()),
        CoreError::Persistence(msg) | CoreError::Internal(msg) => {
            tracing::error!(operation = operation.unwrap_or("unknown"), error = %msg, "Operation failed");
            let message = match operation {
                Some(operation) => format!("Error occurred when trying to {operation}"),
                None => "An internal error occurred".to_string(),
            };
            (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR", message)
        }
    }
}
