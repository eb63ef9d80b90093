//! Driving port for book reads.

use async_trait::async_trait;
use pagination::{Page, PageRequest};

use crate::domain::{Account, Book, BookId, Error};

/// Read books on behalf of an authenticated account.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BookQuery: Send + Sync {
    /// Page through the account's own books.
    async fn list_books(&self, account: &Account, page: PageRequest) -> Result<Page<Book>, Error>;

    /// Fetch one book, which must belong to the account.
    async fn get_book(&self, account: &Account, id: BookId) -> Result<Book, Error>;
}
