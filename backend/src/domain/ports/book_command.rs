//! Driving port for book mutations.

use async_trait::async_trait;

use crate::domain::{Account, Book, BookChanges, BookDraft, BookId, Error};

/// Create, update, and delete books on behalf of an authenticated account.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BookCommand: Send + Sync {
    /// Persist a new book owned by `account`.
    async fn create_book(&self, account: &Account, draft: BookDraft) -> Result<Book, Error>;

    /// Apply a partial update to one of the account's books.
    async fn update_book(
        &self,
        account: &Account,
        id: BookId,
        changes: BookChanges,
    ) -> Result<Book, Error>;

    /// Delete one of the account's books.
    async fn delete_book(&self, account: &Account, id: BookId) -> Result<(), Error>;
}
