//! Bearer-token extraction for HTTP handlers.
//!
//! Handlers that need a caller take [`Authenticated`] as an argument; the
//! extractor reads `Authorization: Bearer <token>` and resolves it through the
//! [`ResourceGuard`](crate::domain::ports::ResourceGuard) held in
//! [`HttpState`]. A missing header is passed to the guard as `None`, so the
//! guard alone decides what counts as authenticated.

use actix_web::http::header::{AUTHORIZATION, HeaderMap};
use actix_web::{FromRequest, HttpRequest, dev::Payload, web};
use futures_util::future::LocalBoxFuture;

use crate::domain::{Account, BearerToken, Error};
use crate::inbound::http::state::HttpState;

const BEARER_SCHEME: &str = "bearer";

/// Parse the bearer token from request headers.
///
/// The scheme name is matched case-insensitively. Any other scheme, a header
/// that is not visible ASCII, or an empty token yields `None`.
///
/// # Examples
/// ```
/// use actix_web::http::header::{AUTHORIZATION, HeaderMap, HeaderValue};
/// use bookshelf::inbound::http::auth::bearer_token;
///
/// let mut headers = HeaderMap::new();
/// headers.insert(AUTHORIZATION, HeaderValue::from_static("Bearer abc123"));
/// assert_eq!(bearer_token(&headers).map(|t| t.expose().to_owned()), Some("abc123".into()));
/// ```
pub fn bearer_token(headers: &HeaderMap) -> Option<BearerToken> {
    let value = headers.get(AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.trim().split_once(' ')?;
    if !scheme.eq_ignore_ascii_case(BEARER_SCHEME) {
        return None;
    }
    BearerToken::parse(token)
}

/// The account behind the request's bearer token.
#[derive(Debug, Clone)]
pub struct Authenticated(pub Account);

impl Authenticated {
    /// Unwrap the authenticated account.
    pub fn into_inner(self) -> Account {
        self.0
    }
}

impl FromRequest for Authenticated {
    type Error = actix_web::Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let token = bearer_token(req.headers());
        let state = req.app_data::<web::Data<HttpState>>().cloned();
        Box::pin(async move {
            let state = state
                .ok_or_else(|| Error::server_fault("HTTP state is not configured"))?;
            let account = state.guard.authenticate(token.as_ref()).await?;
            Ok(Self(account))
        })
    }
}
