//! HTTP inbound adapter exposing REST endpoints.
//!
//! [`configure_api`] registers every `/api/v1` route together with the JSON
//! and query extractor settings, so the server and tests mount the same
//! surface.

pub mod accounts;
pub mod auth;
pub mod books;
pub mod error;
pub mod health;
pub mod schemas;
pub mod state;
#[cfg(test)]
pub mod test_utils;

use actix_web::web;

pub use error::ApiResult;

/// Register API routes and extractor configuration on a scope.
///
/// # Examples
/// ```
/// use actix_web::{App, web};
/// use bookshelf::inbound::http::configure_api;
///
/// let app = App::new().service(web::scope("/api/v1").configure(configure_api));
/// ```
pub fn configure_api(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(error::json_error_handler))
        .app_data(web::QueryConfig::default().error_handler(error::query_error_handler))
        .service(accounts::register)
        .service(accounts::login)
        .service(books::list_books)
        .service(books::create_book)
        .service(books::get_book)
        .service(books::update_book)
        .service(books::delete_book);
}
