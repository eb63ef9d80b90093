//! Account API handlers.
//!
//! ```text
//! POST /api/v1/register {"name":"Ada","email":"ada@example.com","password":"pw123456"}
//! POST /api/v1/login {"email":"ada@example.com","password":"pw123456"}
//! ```
//!
//! Both endpoints answer with the account and a freshly minted bearer token.

use actix_web::{HttpResponse, post, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::ports::IssuedCredentials;
use crate::domain::{Account, LoginCredentials, Registration, validation_error};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::state::HttpState;

/// Registration request body for `POST /api/v1/register`.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    #[schema(example = "Ada Lovelace")]
    pub name: String,
    #[schema(example = "ada@example.com")]
    pub email: String,
    #[schema(example = "pw123456", min_length = 8)]
    pub password: String,
    /// Must equal `password` when supplied.
    pub password_confirmation: Option<String>,
}

/// Login request body for `POST /api/v1/login`.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    #[schema(example = "ada@example.com")]
    pub email: String,
    #[schema(example = "pw123456")]
    pub password: String,
}

/// Public view of an account.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    #[schema(example = "3fa85f64-5717-4562-b3fc-2c963f66afa6")]
    pub id: String,
    pub name: String,
    pub email: String,
    pub created_at: String,
}

impl From<&Account> for UserResponse {
    fn from(account: &Account) -> Self {
        Self {
            id: account.id().to_string(),
            name: account.name().to_string(),
            email: account.identity().to_string(),
            created_at: account.created_at().to_rfc3339(),
        }
    }
}

/// Account plus its bearer token.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CredentialsResponse {
    pub user: UserResponse,
    /// Opaque bearer token for the `Authorization` header.
    pub token: String,
}

impl From<IssuedCredentials> for CredentialsResponse {
    fn from(issued: IssuedCredentials) -> Self {
        Self {
            user: UserResponse::from(&issued.account),
            token: issued.token.expose().to_owned(),
        }
    }
}

/// Create an account and sign it in.
#[utoipa::path(
    post,
    path = "/api/v1/register",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Account created", body = CredentialsResponse),
        (status = 422, description = "Invalid input or email already registered", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["accounts"],
    operation_id = "register",
    security([])
)]
#[post("/register")]
pub async fn register(
    state: web::Data<HttpState>,
    payload: web::Json<RegisterRequest>,
) -> ApiResult<HttpResponse> {
    let request = payload.into_inner();
    let registration = Registration::try_from_parts(
        &request.name,
        &request.email,
        &request.password,
        request.password_confirmation.as_deref(),
    )
    .map_err(validation_error)?;
    let issued = state.credentials.register(registration).await?;
    Ok(HttpResponse::Created().json(CredentialsResponse::from(issued)))
}

/// Exchange an email and password for a bearer token.
#[utoipa::path(
    post,
    path = "/api/v1/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login success", body = CredentialsResponse),
        (status = 401, description = "Invalid credentials", body = ErrorSchema),
        (status = 422, description = "Blank email or password", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["accounts"],
    operation_id = "login",
    security([])
)]
#[post("/login")]
pub async fn login(
    state: web::Data<HttpState>,
    payload: web::Json<LoginRequest>,
) -> ApiResult<web::Json<CredentialsResponse>> {
    let credentials = LoginCredentials::try_from_parts(&payload.email, &payload.password)
        .map_err(validation_error)?;
    let issued = state.credentials.login(&credentials).await?;
    Ok(web::Json(CredentialsResponse::from(issued)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Error, ErrorCode};
    use crate::inbound::http::test_utils::{TEST_PASSWORD, TestHarness, harness};
    use actix_web::http::StatusCode;
    use actix_web::test as actix_test;
    use rstest::rstest;
    use serde_json::{Value, json};

    fn register_body(email: &str, password: &str) -> Value {
        json!({ "name": "Ada Lovelace", "email": email, "password": password })
    }

    #[rstest]
    #[actix_web::test]
    async fn register_returns_created_account_and_token(harness: TestHarness) {
        let app = actix_test::init_service(harness.app()).await;

        let req = actix_test::TestRequest::post()
            .uri("/api/v1/register")
            .set_json(register_body(" A@X.com ", TEST_PASSWORD))
            .to_request();
        let res = actix_test::call_service(&app, req).await;

        assert_eq!(res.status(), StatusCode::CREATED);
        let body: CredentialsResponse = actix_test::read_body_json(res).await;
        assert_eq!(body.user.email, "a@x.com");
        assert_eq!(body.user.name, "Ada Lovelace");
        assert_eq!(body.token.len(), 64);
    }

    #[rstest]
    #[actix_web::test]
    async fn register_never_echoes_the_password(harness: TestHarness) {
        let app = actix_test::init_service(harness.app()).await;

        let req = actix_test::TestRequest::post()
            .uri("/api/v1/register")
            .set_json(register_body("a@x.com", TEST_PASSWORD))
            .to_request();
        let body = actix_test::call_and_read_body(&app, req).await;

        let text = std::str::from_utf8(&body).expect("utf8 body");
        assert!(!text.contains(TEST_PASSWORD));
        assert!(!text.contains("argon2"));
    }

    #[rstest]
    #[actix_web::test]
    async fn duplicate_registration_is_unprocessable(harness: TestHarness) {
        harness.register("a@x.com").await;
        let app = actix_test::init_service(harness.app()).await;

        let req = actix_test::TestRequest::post()
            .uri("/api/v1/register")
            .set_json(register_body("A@x.com", TEST_PASSWORD))
            .to_request();
        let res = actix_test::call_service(&app, req).await;

        assert_eq!(res.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let body: Error = actix_test::read_body_json(res).await;
        assert_eq!(body.code(), ErrorCode::DuplicateIdentity);
        assert_eq!(body.details(), Some(&json!({"field": "email", "code": "taken"})));
    }

    #[rstest]
    #[case(json!({"name": " ", "email": "a@x.com", "password": "pw123456"}), "name", "empty")]
    #[case(json!({"name": "Ada", "email": "ax.com", "password": "pw123456"}), "email", "malformed")]
    #[case(json!({"name": "Ada", "email": "a@x.com", "password": "short"}), "password", "too_short")]
    #[case(
        json!({"name": "Ada", "email": "a@x.com", "password": "pw123456", "passwordConfirmation": "pw654321"}),
        "passwordConfirmation",
        "mismatch"
    )]
    #[actix_web::test]
    async fn register_reports_the_offending_field(
        harness: TestHarness,
        #[case] body: Value,
        #[case] field: &str,
        #[case] code: &str,
    ) {
        let app = actix_test::init_service(harness.app()).await;

        let req = actix_test::TestRequest::post()
            .uri("/api/v1/register")
            .set_json(body)
            .to_request();
        let res = actix_test::call_service(&app, req).await;

        assert_eq!(res.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let error: Error = actix_test::read_body_json(res).await;
        assert_eq!(error.code(), ErrorCode::ValidationFailed);
        assert_eq!(error.details(), Some(&json!({"field": field, "code": code})));
    }

    #[rstest]
    #[actix_web::test]
    async fn login_issues_a_fresh_token(harness: TestHarness) {
        let registered = harness.register("a@x.com").await;
        let app = actix_test::init_service(harness.app()).await;

        let req = actix_test::TestRequest::post()
            .uri("/api/v1/login")
            .set_json(json!({"email": "a@x.com", "password": TEST_PASSWORD}))
            .to_request();
        let res = actix_test::call_service(&app, req).await;

        assert_eq!(res.status(), StatusCode::OK);
        let body: CredentialsResponse = actix_test::read_body_json(res).await;
        assert_eq!(body.user.id, registered.account.id().to_string());
        assert_ne!(body.token, registered.token.expose());
    }

    #[rstest]
    #[case("a@x.com", "wrong")]
    #[case("nobody@x.com", TEST_PASSWORD)]
    #[case("not-an-email", TEST_PASSWORD)]
    #[actix_web::test]
    async fn login_failures_are_indistinguishable(
        harness: TestHarness,
        #[case] email: &str,
        #[case] password: &str,
    ) {
        harness.register("a@x.com").await;
        let app = actix_test::init_service(harness.app()).await;

        let req = actix_test::TestRequest::post()
            .uri("/api/v1/login")
            .set_json(json!({"email": email, "password": password}))
            .to_request();
        let res = actix_test::call_service(&app, req).await;

        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
        let error: Error = actix_test::read_body_json(res).await;
        assert_eq!(error.code(), ErrorCode::InvalidCredentials);
        assert_eq!(error.message(), "invalid email or password");
    }

    #[rstest]
    #[actix_web::test]
    async fn login_with_blank_password_is_a_validation_error(harness: TestHarness) {
        let app = actix_test::init_service(harness.app()).await;

        let req = actix_test::TestRequest::post()
            .uri("/api/v1/login")
            .set_json(json!({"email": "a@x.com", "password": ""}))
            .to_request();
        let res = actix_test::call_service(&app, req).await;

        assert_eq!(res.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let error: Error = actix_test::read_body_json(res).await;
        assert_eq!(error.details(), Some(&json!({"field": "password", "code": "empty"})));
    }

    #[rstest]
    #[actix_web::test]
    async fn malformed_json_is_a_validation_error(harness: TestHarness) {
        let app = actix_test::init_service(harness.app()).await;

        let req = actix_test::TestRequest::post()
            .uri("/api/v1/login")
            .insert_header(("content-type", "application/json"))
            .set_payload("{\"email\": ")
            .to_request();
        let res = actix_test::call_service(&app, req).await;

        assert_eq!(res.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let error: Error = actix_test::read_body_json(res).await;
        assert_eq!(error.code(), ErrorCode::ValidationFailed);
        assert!(error.trace_id().is_some());
    }
}
