//! Port abstraction for book persistence adapters and their errors.
use async_trait::async_trait;
use pagination::PageRequest;

use crate::domain::{AccountId, Book, BookId};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by book repository adapters.
    pub enum BookPersistenceError {
        /// Repository connection could not be established.
        Connection { message: String } => "book repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "book repository query failed: {message}",
    }
}

/// One slice of an owner's books plus the owner's total count.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BookSlice {
    pub books: Vec<Book>,
    pub total: u64,
}

/// Storage for books.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BookRepository: Send + Sync {
    /// Fetch a book by identifier regardless of owner.
    async fn find_by_id(&self, id: &BookId) -> Result<Option<Book>, BookPersistenceError>;

    /// Insert a new book.
    async fn create(&self, book: &Book) -> Result<(), BookPersistenceError>;

    /// Overwrite the mutable fields of an existing book.
    ///
    /// Returns `false` when the book no longer exists.
    async fn update(&self, book: &Book) -> Result<bool, BookPersistenceError>;

    /// Remove a book. Returns `false` when it did not exist.
    async fn delete(&self, id: &BookId) -> Result<bool, BookPersistenceError>;

    /// List an owner's books ordered by creation time then id.
    async fn list_by_owner(
        &self,
        owner_id: &AccountId,
        page: PageRequest,
    ) -> Result<BookSlice, BookPersistenceError>;
}
