//! PostgreSQL-backed `BookRepository` implementation using Diesel ORM.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use pagination::PageRequest;
use tracing::warn;

use crate::domain::ports::{BookPersistenceError, BookRepository, BookSlice};
use crate::domain::{
    AccountId, Author, Book, BookId, BookValidationError, Isbn, PublishedYear, Title,
};

use super::diesel_error_mapping::{DieselFailure, classify_diesel_error};
use super::models::{BookRow, BookUpdate, NewBookRow};
use super::pool::{DbPool, PoolError};
use super::schema::books;

/// Diesel-backed implementation of the `BookRepository` port.
#[derive(Clone)]
pub struct DieselBookRepository {
    pool: DbPool,
}

impl DieselBookRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> BookPersistenceError {
    BookPersistenceError::connection(error.into_message())
}

fn map_diesel_error(error: diesel::result::Error) -> BookPersistenceError {
    match classify_diesel_error(&error) {
        (DieselFailure::Connection, message) => BookPersistenceError::connection(message),
        (DieselFailure::UniqueViolation | DieselFailure::Query, message) => {
            BookPersistenceError::query(message)
        }
    }
}

fn row_to_book(row: BookRow) -> Result<Book, BookPersistenceError> {
    let id = row.id;
    let invalid = |err: BookValidationError| {
        warn!(book_id = %id, %err, "stored book failed validation");
        BookPersistenceError::query("stored book failed validation")
    };
    Ok(Book {
        id: BookId::from_uuid(row.id),
        owner_id: AccountId::from_uuid(row.owner_id),
        title: Title::new(row.title).map_err(invalid)?,
        author: Author::new(row.author).map_err(invalid)?,
        isbn: row.isbn.map(Isbn::new).transpose().map_err(invalid)?,
        published_year: row
            .published_year
            .map(PublishedYear::new)
            .transpose()
            .map_err(invalid)?,
        created_at: row.created_at,
        updated_at: row.updated_at,
    })
}

/// Convert an unsigned page bound into a SQL `BIGINT`.
fn to_sql_bound(value: u64) -> Result<i64, BookPersistenceError> {
    i64::try_from(value).map_err(|_| BookPersistenceError::query("page bound out of range"))
}

#[async_trait]
impl BookRepository for DieselBookRepository {
    async fn find_by_id(&self, id: &BookId) -> Result<Option<Book>, BookPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = books::table
            .find(*id.as_uuid())
            .select(BookRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        row.map(row_to_book).transpose()
    }

    async fn create(&self, book: &Book) -> Result<(), BookPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let new_row = NewBookRow {
            id: *book.id.as_uuid(),
            owner_id: *book.owner_id.as_uuid(),
            title: book.title.as_ref(),
            author: book.author.as_ref(),
            isbn: book.isbn.as_ref().map(AsRef::as_ref),
            published_year: book.published_year.map(PublishedYear::get),
            created_at: book.created_at,
            updated_at: book.updated_at,
        };
        diesel::insert_into(books::table)
            .values(&new_row)
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(())
    }

    async fn update(&self, book: &Book) -> Result<bool, BookPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let changes = BookUpdate {
            title: book.title.as_ref(),
            author: book.author.as_ref(),
            isbn: book.isbn.as_ref().map(AsRef::as_ref),
            published_year: book.published_year.map(PublishedYear::get),
            updated_at: book.updated_at,
        };
        let affected = diesel::update(books::table.find(*book.id.as_uuid()))
            .set(&changes)
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(affected > 0)
    }

    async fn delete(&self, id: &BookId) -> Result<bool, BookPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let affected = diesel::delete(books::table.find(*id.as_uuid()))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(affected > 0)
    }

    async fn list_by_owner(
        &self,
        owner_id: &AccountId,
        page: PageRequest,
    ) -> Result<BookSlice, BookPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let owner = *owner_id.as_uuid();
        let total: i64 = books::table
            .filter(books::owner_id.eq(owner))
            .count()
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        let rows = books::table
            .filter(books::owner_id.eq(owner))
            .order((books::created_at.asc(), books::id.asc()))
            .limit(to_sql_bound(page.limit())?)
            .offset(to_sql_bound(page.offset())?)
            .select(BookRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        let books = rows
            .into_iter()
            .map(row_to_book)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(BookSlice {
            books,
            total: u64::try_from(total).unwrap_or_default(),
        })
    }
}
