//! Handler tests for the book endpoints over the in-memory store.

use super::*;
use crate::domain::ErrorCode;
use crate::domain::ports::IssuedCredentials;
use crate::inbound::http::test_utils::{TEST_TOKEN_TTL_MINUTES, TestHarness, harness};
use actix_web::dev::{Service, ServiceResponse};
use actix_web::http::StatusCode;
use actix_web::http::header::AUTHORIZATION;
use actix_web::test as actix_test;
use chrono::TimeDelta;
use rstest::rstest;
use serde_json::{Value, json};

fn bearer(issued: &IssuedCredentials) -> (actix_web::http::header::HeaderName, String) {
    (AUTHORIZATION, format!("Bearer {}", issued.token.expose()))
}

async fn create(
    app: &impl Service<actix_http::Request, Response = ServiceResponse, Error = actix_web::Error>,
    owner: &IssuedCredentials,
    title: &str,
) -> BookResponse {
    let req = actix_test::TestRequest::post()
        .uri("/api/v1/books")
        .insert_header(bearer(owner))
        .set_json(json!({"title": title, "author": "Frank Herbert", "publishedYear": 1965}))
        .to_request();
    let res = actix_test::call_service(app, req).await;
    assert_eq!(res.status(), StatusCode::CREATED);
    actix_test::read_body_json(res).await
}

async fn error_of(res: ServiceResponse) -> Error {
    actix_test::read_body_json(res).await
}

#[rstest]
#[actix_web::test]
async fn create_sets_owner_from_the_caller(harness: TestHarness) {
    let owner = harness.register("a@x.com").await;
    let app = actix_test::init_service(harness.app()).await;

    let book = create(&app, &owner, "Dune").await;

    assert_eq!(book.owner_id, owner.account.id().to_string());
    assert_eq!(book.title, "Dune");
    assert_eq!(book.published_year, Some(1965));
    assert_eq!(book.isbn, None);
    assert_eq!(book.created_at, book.updated_at);
}

#[rstest]
#[actix_web::test]
async fn create_ignores_a_client_supplied_owner(harness: TestHarness) {
    let owner = harness.register("a@x.com").await;
    let other = harness.register("b@x.com").await;
    let app = actix_test::init_service(harness.app()).await;

    let req = actix_test::TestRequest::post()
        .uri("/api/v1/books")
        .insert_header(bearer(&owner))
        .set_json(json!({
            "title": "Dune",
            "author": "Frank Herbert",
            "ownerId": other.account.id().to_string()
        }))
        .to_request();
    let book: BookResponse = actix_test::call_and_read_body_json(&app, req).await;

    assert_eq!(book.owner_id, owner.account.id().to_string());
}

#[rstest]
#[case(json!({"title": " ", "author": "A"}), "title", "empty")]
#[case(json!({"title": "T", "author": ""}), "author", "empty")]
#[case(json!({"title": "T", "author": "A", "isbn": "12-34"}), "isbn", "malformed")]
#[case(json!({"title": "T", "author": "A", "publishedYear": 10000}), "publishedYear", "out_of_range")]
#[actix_web::test]
async fn create_rejects_invalid_drafts(
    harness: TestHarness,
    #[case] body: Value,
    #[case] field: &str,
    #[case] code: &str,
) {
    let owner = harness.register("a@x.com").await;
    let app = actix_test::init_service(harness.app()).await;

    let req = actix_test::TestRequest::post()
        .uri("/api/v1/books")
        .insert_header(bearer(&owner))
        .set_json(body)
        .to_request();
    let res = actix_test::call_service(&app, req).await;

    assert_eq!(res.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let error = error_of(res).await;
    assert_eq!(error.code(), ErrorCode::ValidationFailed);
    assert_eq!(error.details(), Some(&json!({"field": field, "code": code})));
}

#[rstest]
#[case("GET", "/api/v1/books")]
#[case("POST", "/api/v1/books")]
#[case("GET", "/api/v1/books/3fa85f64-5717-4562-b3fc-2c963f66afa6")]
#[case("PUT", "/api/v1/books/3fa85f64-5717-4562-b3fc-2c963f66afa6")]
#[case("DELETE", "/api/v1/books/3fa85f64-5717-4562-b3fc-2c963f66afa6")]
#[actix_web::test]
async fn every_book_endpoint_requires_a_token(
    harness: TestHarness,
    #[case] method: &str,
    #[case] uri: &str,
) {
    let app = actix_test::init_service(harness.app()).await;

    let req = actix_test::TestRequest::default()
        .method(method.parse().expect("valid method"))
        .uri(uri)
        .set_json(json!({"title": "T", "author": "A"}))
        .to_request();
    let res = actix_test::call_service(&app, req).await;

    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(error_of(res).await.code(), ErrorCode::Unauthenticated);
}

#[rstest]
#[actix_web::test]
async fn expired_tokens_are_rejected(harness: TestHarness) {
    let owner = harness.register("a@x.com").await;
    harness
        .clock
        .advance(TimeDelta::minutes(i64::from(TEST_TOKEN_TTL_MINUTES)));
    let app = actix_test::init_service(harness.app()).await;

    let req = actix_test::TestRequest::get()
        .uri("/api/v1/books")
        .insert_header(bearer(&owner))
        .to_request();
    let res = actix_test::call_service(&app, req).await;

    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
}

#[rstest]
#[actix_web::test]
async fn other_accounts_are_forbidden(harness: TestHarness) {
    let owner = harness.register("a@x.com").await;
    let intruder = harness.register("b@x.com").await;
    let app = actix_test::init_service(harness.app()).await;
    let book = create(&app, &owner, "Dune").await;
    let uri = format!("/api/v1/books/{}", book.id);

    for req in [
        actix_test::TestRequest::get().uri(&uri),
        actix_test::TestRequest::put()
            .uri(&uri)
            .set_json(json!({"title": "Mine now"})),
        actix_test::TestRequest::delete().uri(&uri),
    ] {
        let res =
            actix_test::call_service(&app, req.insert_header(bearer(&intruder)).to_request())
                .await;
        assert_eq!(res.status(), StatusCode::FORBIDDEN);
        assert_eq!(error_of(res).await.code(), ErrorCode::Forbidden);
    }

    let req = actix_test::TestRequest::get()
        .uri(&uri)
        .insert_header(bearer(&owner))
        .to_request();
    let unchanged: BookResponse = actix_test::call_and_read_body_json(&app, req).await;
    assert_eq!(unchanged.title, "Dune");
}

#[rstest]
#[case("3fa85f64-5717-4562-b3fc-2c963f66afa6")]
#[case("not-a-uuid")]
#[actix_web::test]
async fn unknown_or_malformed_ids_are_not_found(harness: TestHarness, #[case] id: &str) {
    let owner = harness.register("a@x.com").await;
    let app = actix_test::init_service(harness.app()).await;

    let req = actix_test::TestRequest::get()
        .uri(&format!("/api/v1/books/{id}"))
        .insert_header(bearer(&owner))
        .to_request();
    let res = actix_test::call_service(&app, req).await;

    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    assert_eq!(error_of(res).await.code(), ErrorCode::NotFound);
}

#[rstest]
#[actix_web::test]
async fn update_changes_only_supplied_fields(harness: TestHarness) {
    let owner = harness.register("a@x.com").await;
    let app = actix_test::init_service(harness.app()).await;
    let book = create(&app, &owner, "Dune").await;
    harness.clock.advance(TimeDelta::minutes(5));

    let req = actix_test::TestRequest::put()
        .uri(&format!("/api/v1/books/{}", book.id))
        .insert_header(bearer(&owner))
        .set_json(json!({"isbn": "978-0441013593", "publishedYear": null}))
        .to_request();
    let res = actix_test::call_service(&app, req).await;

    assert_eq!(res.status(), StatusCode::OK);
    let updated: BookResponse = actix_test::read_body_json(res).await;
    assert_eq!(updated.title, "Dune");
    assert_eq!(updated.isbn.as_deref(), Some("978-0441013593"));
    assert_eq!(updated.published_year, None);
    assert_eq!(updated.owner_id, book.owner_id);
    assert_ne!(updated.updated_at, book.updated_at);
}

#[rstest]
#[actix_web::test]
async fn empty_update_is_a_validation_error(harness: TestHarness) {
    let owner = harness.register("a@x.com").await;
    let app = actix_test::init_service(harness.app()).await;
    let book = create(&app, &owner, "Dune").await;

    let req = actix_test::TestRequest::put()
        .uri(&format!("/api/v1/books/{}", book.id))
        .insert_header(bearer(&owner))
        .set_json(json!({}))
        .to_request();
    let res = actix_test::call_service(&app, req).await;

    assert_eq!(res.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let error = error_of(res).await;
    assert_eq!(error.details(), Some(&json!({"field": null, "code": "no_changes"})));
}

#[rstest]
#[case::stranger(true, StatusCode::FORBIDDEN, ErrorCode::Forbidden)]
#[case::unknown_book(false, StatusCode::NOT_FOUND, ErrorCode::NotFound)]
#[actix_web::test]
async fn empty_update_checks_access_before_content(
    harness: TestHarness,
    #[case] existing: bool,
    #[case] status: StatusCode,
    #[case] code: ErrorCode,
) {
    let owner = harness.register("a@x.com").await;
    let intruder = harness.register("b@x.com").await;
    let app = actix_test::init_service(harness.app()).await;
    let id = if existing {
        create(&app, &owner, "Dune").await.id
    } else {
        "3fa85f64-5717-4562-b3fc-2c963f66afa6".to_owned()
    };

    let req = actix_test::TestRequest::put()
        .uri(&format!("/api/v1/books/{id}"))
        .insert_header(bearer(&intruder))
        .set_json(json!({}))
        .to_request();
    let res = actix_test::call_service(&app, req).await;

    assert_eq!(res.status(), status);
    assert_eq!(error_of(res).await.code(), code);
}

#[rstest]
#[actix_web::test]
async fn delete_answers_no_content_then_not_found(harness: TestHarness) {
    let owner = harness.register("a@x.com").await;
    let app = actix_test::init_service(harness.app()).await;
    let book = create(&app, &owner, "Dune").await;
    let uri = format!("/api/v1/books/{}", book.id);

    let req = actix_test::TestRequest::delete()
        .uri(&uri)
        .insert_header(bearer(&owner))
        .to_request();
    let res = actix_test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::NO_CONTENT);
    assert!(actix_test::read_body(res).await.is_empty());

    let req = actix_test::TestRequest::get()
        .uri(&uri)
        .insert_header(bearer(&owner))
        .to_request();
    let res = actix_test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

#[rstest]
#[actix_web::test]
async fn listing_is_scoped_and_paginated(harness: TestHarness) {
    let owner = harness.register("a@x.com").await;
    let other = harness.register("b@x.com").await;
    let app = actix_test::init_service(harness.app()).await;
    for n in 0..12 {
        create(&app, &owner, &format!("Book {n:02}")).await;
        harness.clock.advance(TimeDelta::seconds(1));
    }
    create(&app, &other, "Not yours").await;

    let req = actix_test::TestRequest::get()
        .uri("/api/v1/books")
        .insert_header(bearer(&owner))
        .to_request();
    let first: Value = actix_test::call_and_read_body_json(&app, req).await;
    assert_eq!(first["total"], json!(12));
    assert_eq!(first["perPage"], json!(10));
    assert_eq!(first["currentPage"], json!(1));
    assert_eq!(first["lastPage"], json!(2));
    assert_eq!(first["data"].as_array().map(Vec::len), Some(10));
    assert_eq!(first["data"][0]["title"], json!("Book 00"));

    let req = actix_test::TestRequest::get()
        .uri("/api/v1/books?page=2&perPage=10")
        .insert_header(bearer(&owner))
        .to_request();
    let second: Value = actix_test::call_and_read_body_json(&app, req).await;
    let titles: Vec<&str> = second["data"]
        .as_array()
        .expect("data array")
        .iter()
        .filter_map(|book| book["title"].as_str())
        .collect();
    assert_eq!(titles, ["Book 10", "Book 11"]);
}

#[rstest]
#[case("page=0", "page")]
#[case("perPage=0", "perPage")]
#[case("perPage=101", "perPage")]
#[actix_web::test]
async fn out_of_range_pages_are_rejected(
    harness: TestHarness,
    #[case] query: &str,
    #[case] field: &str,
) {
    let owner = harness.register("a@x.com").await;
    let app = actix_test::init_service(harness.app()).await;

    let req = actix_test::TestRequest::get()
        .uri(&format!("/api/v1/books?{query}"))
        .insert_header(bearer(&owner))
        .to_request();
    let res = actix_test::call_service(&app, req).await;

    assert_eq!(res.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let error = error_of(res).await;
    assert_eq!(
        error.details(),
        Some(&json!({"field": field, "code": "out_of_range"}))
    );
}

#[rstest]
#[actix_web::test]
async fn unparseable_query_is_a_validation_error(harness: TestHarness) {
    let owner = harness.register("a@x.com").await;
    let app = actix_test::init_service(harness.app()).await;

    let req = actix_test::TestRequest::get()
        .uri("/api/v1/books?page=first")
        .insert_header(bearer(&owner))
        .to_request();
    let res = actix_test::call_service(&app, req).await;

    assert_eq!(res.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[rstest]
#[case(json!({}), UpdateBookRequest::default())]
#[case(json!({"isbn": null}), UpdateBookRequest { isbn: Some(None), ..UpdateBookRequest::default() })]
#[case(
    json!({"publishedYear": 1999}),
    UpdateBookRequest { published_year: Some(Some(1999)), ..UpdateBookRequest::default() }
)]
fn update_request_distinguishes_null_from_absent(
    #[case] body: Value,
    #[case] expected: UpdateBookRequest,
) {
    let parsed: UpdateBookRequest = serde_json::from_value(body).expect("valid body");
    assert_eq!(parsed.isbn, expected.isbn);
    assert_eq!(parsed.published_year, expected.published_year);
    assert_eq!(parsed.title, expected.title);
}
