//! Book API handlers.
//!
//! ```text
//! GET    /api/v1/books?page=1&perPage=10
//! POST   /api/v1/books {"title":"Dune","author":"Frank Herbert"}
//! GET    /api/v1/books/{id}
//! PUT    /api/v1/books/{id} {"isbn":null}
//! DELETE /api/v1/books/{id}
//! ```
//!
//! Every endpoint requires a bearer token. Ids that are not UUIDs cannot name
//! a stored book and are answered with `404`, exactly like unknown ids.

use actix_web::{HttpResponse, delete, get, post, put, web};
use pagination::{Page, PageRequest, PageRequestError};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::json;
use utoipa::{IntoParams, ToSchema};

use crate::domain::{Book, BookChanges, BookDraft, BookId, Error, validation_error};
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::Authenticated;
use crate::inbound::http::schemas::{BookPageSchema, ErrorSchema};
use crate::inbound::http::state::HttpState;

/// Query parameters for `GET /api/v1/books`.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct BookListQuery {
    /// One-based page number; defaults to 1.
    #[param(minimum = 1)]
    pub page: Option<u32>,
    /// Page size; defaults to 10, at most 100.
    #[param(minimum = 1, maximum = 100)]
    pub per_page: Option<u32>,
}

impl BookListQuery {
    fn to_page_request(&self) -> Result<PageRequest, Error> {
        PageRequest::from_query(self.page, self.per_page).map_err(|err| {
            let field = match err {
                PageRequestError::PageOutOfRange => "page",
                PageRequestError::PerPageOutOfRange { .. } => "perPage",
            };
            Error::validation_failed(err.to_string())
                .with_details(json!({ "field": field, "code": "out_of_range" }))
        })
    }
}

/// Request body for `POST /api/v1/books`.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateBookRequest {
    #[schema(example = "Dune")]
    pub title: String,
    #[schema(example = "Frank Herbert")]
    pub author: String,
    #[schema(example = "978-0441013593")]
    pub isbn: Option<String>,
    #[schema(example = 1965)]
    pub published_year: Option<i32>,
}

/// Request body for `PUT /api/v1/books/{id}`.
///
/// Omitted fields are left alone. `isbn` and `publishedYear` may be sent as
/// `null` to clear them.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateBookRequest {
    pub title: Option<String>,
    pub author: Option<String>,
    #[serde(default, deserialize_with = "present")]
    #[schema(value_type = Option<String>)]
    pub isbn: Option<Option<String>>,
    #[serde(default, deserialize_with = "present")]
    #[schema(value_type = Option<i32>)]
    pub published_year: Option<Option<i32>>,
}

/// Distinguish an explicit `null` from an absent field.
fn present<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// Public view of a book.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BookResponse {
    #[schema(example = "3fa85f64-5717-4562-b3fc-2c963f66afa6")]
    pub id: String,
    pub owner_id: String,
    pub title: String,
    pub author: String,
    pub isbn: Option<String>,
    pub published_year: Option<i32>,
    pub created_at: String,
    pub updated_at: String,
}

impl From<Book> for BookResponse {
    fn from(book: Book) -> Self {
        Self {
            id: book.id.to_string(),
            owner_id: book.owner_id.to_string(),
            title: book.title.into(),
            author: book.author.into(),
            isbn: book.isbn.map(Into::into),
            published_year: book.published_year.map(|year| year.get()),
            created_at: book.created_at.to_rfc3339(),
            updated_at: book.updated_at.to_rfc3339(),
        }
    }
}

fn parse_book_id(raw: &str) -> Result<BookId, Error> {
    BookId::new(raw).map_err(|_| Error::not_found("book not found"))
}

/// List the caller's books, oldest first.
#[utoipa::path(
    get,
    path = "/api/v1/books",
    params(BookListQuery),
    responses(
        (status = 200, description = "One page of the caller's books", body = BookPageSchema),
        (status = 401, description = "Missing or invalid bearer token", body = ErrorSchema),
        (status = 422, description = "Invalid page selection", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["books"],
    operation_id = "listBooks"
)]
#[get("/books")]
pub async fn list_books(
    state: web::Data<HttpState>,
    caller: Authenticated,
    query: web::Query<BookListQuery>,
) -> ApiResult<web::Json<Page<BookResponse>>> {
    let request = query.to_page_request()?;
    let page = state
        .books_query
        .list_books(&caller.into_inner(), request)
        .await?;
    Ok(web::Json(page.map(BookResponse::from)))
}

/// Create a book owned by the caller.
#[utoipa::path(
    post,
    path = "/api/v1/books",
    request_body = CreateBookRequest,
    responses(
        (status = 201, description = "Book created", body = BookResponse),
        (status = 401, description = "Missing or invalid bearer token", body = ErrorSchema),
        (status = 422, description = "Invalid book", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["books"],
    operation_id = "createBook"
)]
#[post("/books")]
pub async fn create_book(
    state: web::Data<HttpState>,
    caller: Authenticated,
    payload: web::Json<CreateBookRequest>,
) -> ApiResult<HttpResponse> {
    let request = payload.into_inner();
    let draft = BookDraft::try_from_parts(
        &request.title,
        &request.author,
        request.isbn.as_deref(),
        request.published_year,
    )
    .map_err(validation_error)?;
    let book = state.books.create_book(&caller.into_inner(), draft).await?;
    Ok(HttpResponse::Created().json(BookResponse::from(book)))
}

/// Fetch one of the caller's books.
#[utoipa::path(
    get,
    path = "/api/v1/books/{id}",
    params(("id" = String, Path, description = "Book identifier")),
    responses(
        (status = 200, description = "The book", body = BookResponse),
        (status = 401, description = "Missing or invalid bearer token", body = ErrorSchema),
        (status = 403, description = "Book belongs to another account", body = ErrorSchema),
        (status = 404, description = "Book not found", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["books"],
    operation_id = "getBook"
)]
#[get("/books/{id}")]
pub async fn get_book(
    state: web::Data<HttpState>,
    caller: Authenticated,
    path: web::Path<String>,
) -> ApiResult<web::Json<BookResponse>> {
    let id = parse_book_id(&path)?;
    let book = state.books_query.get_book(&caller.into_inner(), id).await?;
    Ok(web::Json(BookResponse::from(book)))
}

/// Partially update one of the caller's books.
#[utoipa::path(
    put,
    path = "/api/v1/books/{id}",
    params(("id" = String, Path, description = "Book identifier")),
    request_body = UpdateBookRequest,
    responses(
        (status = 200, description = "The updated book", body = BookResponse),
        (status = 401, description = "Missing or invalid bearer token", body = ErrorSchema),
        (status = 403, description = "Book belongs to another account", body = ErrorSchema),
        (status = 404, description = "Book not found", body = ErrorSchema),
        (status = 422, description = "Invalid or empty update", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["books"],
    operation_id = "updateBook"
)]
#[put("/books/{id}")]
pub async fn update_book(
    state: web::Data<HttpState>,
    caller: Authenticated,
    path: web::Path<String>,
    payload: web::Json<UpdateBookRequest>,
) -> ApiResult<web::Json<BookResponse>> {
    let id = parse_book_id(&path)?;
    let request = payload.into_inner();
    let changes = BookChanges::try_from_parts(
        request.title.as_deref(),
        request.author.as_deref(),
        request.isbn.as_ref().map(Option::as_deref),
        request.published_year,
    )
    .map_err(validation_error)?;
    let book = state
        .books
        .update_book(&caller.into_inner(), id, changes)
        .await?;
    Ok(web::Json(BookResponse::from(book)))
}

/// Delete one of the caller's books.
#[utoipa::path(
    delete,
    path = "/api/v1/books/{id}",
    params(("id" = String, Path, description = "Book identifier")),
    responses(
        (status = 204, description = "Book deleted"),
        (status = 401, description = "Missing or invalid bearer token", body = ErrorSchema),
        (status = 403, description = "Book belongs to another account", body = ErrorSchema),
        (status = 404, description = "Book not found", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["books"],
    operation_id = "deleteBook"
)]
#[delete("/books/{id}")]
pub async fn delete_book(
    state: web::Data<HttpState>,
    caller: Authenticated,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let id = parse_book_id(&path)?;
    state.books.delete_book(&caller.into_inner(), id).await?;
    Ok(HttpResponse::NoContent().finish())
}

#[cfg(test)]
mod tests;
