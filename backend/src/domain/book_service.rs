//! Book service implementing the book command and query ports.
//!
//! Every operation on an existing book looks it up first and then checks
//! ownership, so an unknown id is `NotFound` and another account's book is
//! `Forbidden`. Those checks run before an update's changes are inspected.
use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use pagination::{Page, PageRequest};
use tracing::debug;

use crate::domain::ports::{BookCommand, BookPersistenceError, BookQuery, BookRepository};
use crate::domain::{
    Account, Book, BookChanges, BookDraft, BookId, BookValidationError, Error, ensure_owner,
    validation_error,
};

fn map_book_error(error: BookPersistenceError) -> Error {
    let (BookPersistenceError::Connection { message }
    | BookPersistenceError::Query { message }) = error;
    debug!(%message, "book repository failure");
    Error::server_fault(format!("book repository failure: {message}"))
}

fn book_not_found() -> Error {
    Error::not_found("book not found")
}

/// Book use-cases over a [`BookRepository`].
#[derive(Clone)]
pub struct BookService<R> {
    books: Arc<R>,
    clock: Arc<dyn Clock>,
}

impl<R> BookService<R> {
    /// Create a new book service.
    pub fn new(books: Arc<R>, clock: Arc<dyn Clock>) -> Self {
        Self { books, clock }
    }
}

impl<R: BookRepository> BookService<R> {
    async fn owned_book(&self, account: &Account, id: &BookId) -> Result<Book, Error> {
        let book = self
            .books
            .find_by_id(id)
            .await
            .map_err(map_book_error)?
            .ok_or_else(book_not_found)?;
        ensure_owner(account, &book)?;
        Ok(book)
    }
}

#[async_trait]
impl<R: BookRepository> BookQuery for BookService<R> {
    async fn list_books(&self, account: &Account, page: PageRequest) -> Result<Page<Book>, Error> {
        let slice = self
            .books
            .list_by_owner(account.id(), page)
            .await
            .map_err(map_book_error)?;
        Ok(Page::new(slice.books, page, slice.total))
    }

    async fn get_book(&self, account: &Account, id: BookId) -> Result<Book, Error> {
        self.owned_book(account, &id).await
    }
}

#[async_trait]
impl<R: BookRepository> BookCommand for BookService<R> {
    async fn create_book(&self, account: &Account, draft: BookDraft) -> Result<Book, Error> {
        let book = Book::create(draft, *account.id(), self.clock.utc());
        self.books.create(&book).await.map_err(map_book_error)?;
        Ok(book)
    }

    async fn update_book(
        &self,
        account: &Account,
        id: BookId,
        changes: BookChanges,
    ) -> Result<Book, Error> {
        let mut book = self.owned_book(account, &id).await?;
        if changes.is_empty() {
            return Err(validation_error(BookValidationError::NoChanges));
        }
        book.apply(changes, self.clock.utc());
        let updated = self.books.update(&book).await.map_err(map_book_error)?;
        if !updated {
            return Err(book_not_found());
        }
        Ok(book)
    }

    async fn delete_book(&self, account: &Account, id: BookId) -> Result<(), Error> {
        self.owned_book(account, &id).await?;
        let deleted = self.books.delete(&id).await.map_err(map_book_error)?;
        if !deleted {
            return Err(book_not_found());
        }
        Ok(())
    }
}
