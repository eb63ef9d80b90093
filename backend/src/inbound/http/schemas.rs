//! OpenAPI schema definitions for domain types.
//!
//! Domain types remain framework-agnostic by not deriving `ToSchema`. The
//! wrappers here mirror the serialised shape of their domain counterparts so
//! the generated document matches what clients receive.

use utoipa::ToSchema;

use crate::inbound::http::books::BookResponse;

/// OpenAPI schema for [`crate::domain::ErrorCode`].
#[derive(ToSchema)]
#[schema(as = crate::domain::ErrorCode)]
pub enum ErrorCodeSchema {
    /// Input failed validation.
    #[schema(rename = "validation_failed")]
    ValidationFailed,
    /// The email is already registered.
    #[schema(rename = "duplicate_identity")]
    DuplicateIdentity,
    /// Login email or password did not match.
    #[schema(rename = "invalid_credentials")]
    InvalidCredentials,
    /// No valid bearer token accompanied the request.
    #[schema(rename = "unauthenticated")]
    Unauthenticated,
    /// The resource belongs to another account.
    #[schema(rename = "forbidden")]
    Forbidden,
    /// The requested resource does not exist.
    #[schema(rename = "not_found")]
    NotFound,
    /// An unexpected error occurred on the server.
    #[schema(rename = "server_fault")]
    ServerFault,
}

/// OpenAPI schema for [`crate::domain::Error`].
#[derive(ToSchema)]
#[schema(as = crate::domain::Error)]
#[schema(rename_all = "camelCase")]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct ErrorSchema {
    /// Stable machine-readable error code.
    #[schema(example = "validation_failed")]
    code: ErrorCodeSchema,
    /// Human-readable message returned to clients.
    #[schema(example = "title must not be empty")]
    message: String,
    /// Correlation identifier, also sent as the `Trace-Id` header.
    #[schema(example = "3fa85f64-5717-4562-b3fc-2c963f66afa6")]
    trace_id: Option<String>,
    /// Field and reason for validation failures.
    details: Option<serde_json::Value>,
}

/// OpenAPI schema for a page of books.
#[derive(ToSchema)]
#[schema(as = BookPage)]
#[schema(rename_all = "camelCase")]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct BookPageSchema {
    data: Vec<BookResponse>,
    #[schema(example = 1)]
    current_page: u32,
    #[schema(example = 10)]
    per_page: u32,
    total: u64,
    #[schema(example = 1)]
    last_page: u64,
}
