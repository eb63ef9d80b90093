//! Book resource owned by exactly one account.
//!
//! The owner is fixed when the book is created from the authenticated
//! caller and is never reassigned afterwards; [`BookChanges`] has no owner
//! field for that reason.

use std::fmt;
use std::sync::OnceLock;

use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::account::AccountId;
use super::validation::FieldViolation;

/// Maximum length of titles and author names.
pub const BOOK_TEXT_MAX: usize = 255;
/// Latest year accepted as a publication year.
pub const PUBLISHED_YEAR_MAX: i32 = 9_999;

/// Anything with an owning account that the resource guard can check.
pub trait OwnedResource {
    /// Account that owns the resource.
    fn owner_id(&self) -> &AccountId;
}

/// Validation errors raised by book value constructors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BookValidationError {
    InvalidId,
    EmptyTitle,
    TitleTooLong { max: usize },
    EmptyAuthor,
    AuthorTooLong { max: usize },
    MalformedIsbn,
    PublishedYearOutOfRange { max: i32 },
    NoChanges,
}

impl FieldViolation for BookValidationError {
    fn field(&self) -> Option<&'static str> {
        match self {
            Self::InvalidId => Some("id"),
            Self::EmptyTitle | Self::TitleTooLong { .. } => Some("title"),
            Self::EmptyAuthor | Self::AuthorTooLong { .. } => Some("author"),
            Self::MalformedIsbn => Some("isbn"),
            Self::PublishedYearOutOfRange { .. } => Some("publishedYear"),
            Self::NoChanges => None,
        }
    }

    fn reason(&self) -> &'static str {
        match self {
            Self::InvalidId | Self::MalformedIsbn => "malformed",
            Self::EmptyTitle | Self::EmptyAuthor => "empty",
            Self::TitleTooLong { .. } | Self::AuthorTooLong { .. } => "too_long",
            Self::PublishedYearOutOfRange { .. } => "out_of_range",
            Self::NoChanges => "no_changes",
        }
    }
}

impl fmt::Display for BookValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidId => write!(f, "book id must be a valid UUID"),
            Self::EmptyTitle => write!(f, "title must not be empty"),
            Self::TitleTooLong { max } => write!(f, "title must be at most {max} characters"),
            Self::EmptyAuthor => write!(f, "author must not be empty"),
            Self::AuthorTooLong { max } => write!(f, "author must be at most {max} characters"),
            Self::MalformedIsbn => write!(
                f,
                "isbn must be an ISBN-10 or ISBN-13, optionally hyphenated"
            ),
            Self::PublishedYearOutOfRange { max } => {
                write!(f, "published year must be between 0 and {max}")
            }
            Self::NoChanges => write!(f, "update must change at least one field"),
        }
    }
}

impl std::error::Error for BookValidationError {}

/// Stable book identifier stored as a UUID.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct BookId(Uuid);

impl BookId {
    /// Parse a book id from its path-segment form.
    pub fn new(id: impl AsRef<str>) -> Result<Self, BookValidationError> {
        Uuid::parse_str(id.as_ref())
            .map(Self)
            .map_err(|_| BookValidationError::InvalidId)
    }

    /// Generate a new random [`BookId`].
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    /// Wrap a UUID read back from storage.
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Access the underlying UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for BookId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<BookId> for String {
    fn from(value: BookId) -> Self {
        value.0.to_string()
    }
}

impl TryFrom<String> for BookId {
    type Error = BookValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

fn bounded_text(
    raw: &str,
    empty: BookValidationError,
    too_long: BookValidationError,
) -> Result<String, BookValidationError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(empty);
    }
    if trimmed.chars().count() > BOOK_TEXT_MAX {
        return Err(too_long);
    }
    Ok(trimmed.to_owned())
}

/// Book title: trimmed, 1..=255 characters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Title(String);

impl Title {
    /// Validate and construct a [`Title`].
    pub fn new(raw: impl AsRef<str>) -> Result<Self, BookValidationError> {
        bounded_text(
            raw.as_ref(),
            BookValidationError::EmptyTitle,
            BookValidationError::TitleTooLong { max: BOOK_TEXT_MAX },
        )
        .map(Self)
    }
}

/// Author name: trimmed, 1..=255 characters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Author(String);

impl Author {
    /// Validate and construct an [`Author`].
    pub fn new(raw: impl AsRef<str>) -> Result<Self, BookValidationError> {
        bounded_text(
            raw.as_ref(),
            BookValidationError::EmptyAuthor,
            BookValidationError::AuthorTooLong { max: BOOK_TEXT_MAX },
        )
        .map(Self)
    }
}

/// Longest hyphenated ISBN accepted; matches the storage column.
pub const ISBN_MAX: usize = 17;

static ISBN_RE: OnceLock<Regex> = OnceLock::new();

fn isbn_regex() -> &'static Regex {
    ISBN_RE.get_or_init(|| {
        // Single hyphens may separate any two characters but never lead or trail.
        let pattern = r"^(?:\d(?:-?\d){8}-?[\dX]|\d(?:-?\d){12})$";
        Regex::new(pattern)
            .unwrap_or_else(|error| panic!("isbn regex failed to compile: {error}"))
    })
}

/// ISBN-10 or ISBN-13 text, with or without hyphens.
///
/// Only the shape is checked: ten digits (the last may be `X`) or thirteen
/// digits, optionally separated by single hyphens, at most [`ISBN_MAX`]
/// characters in all. Check digits are not verified.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Isbn(String);

impl Isbn {
    /// Validate and construct an [`Isbn`]. A lower-case `x` is upper-cased.
    pub fn new(raw: impl AsRef<str>) -> Result<Self, BookValidationError> {
        let candidate = raw.as_ref().trim().to_uppercase();
        if candidate.len() > ISBN_MAX || !isbn_regex().is_match(&candidate) {
            return Err(BookValidationError::MalformedIsbn);
        }
        Ok(Self(candidate))
    }
}

/// Publication year in `0..=9999`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "i32", into = "i32")]
pub struct PublishedYear(i32);

impl PublishedYear {
    /// Validate and construct a [`PublishedYear`].
    pub fn new(year: i32) -> Result<Self, BookValidationError> {
        if !(0..=PUBLISHED_YEAR_MAX).contains(&year) {
            return Err(BookValidationError::PublishedYearOutOfRange {
                max: PUBLISHED_YEAR_MAX,
            });
        }
        Ok(Self(year))
    }

    /// Year as an integer.
    pub fn get(self) -> i32 {
        self.0
    }
}

macro_rules! string_newtype_impls {
    ($($name:ident),+) => {
        $(
            impl AsRef<str> for $name {
                fn as_ref(&self) -> &str {
                    self.0.as_str()
                }
            }

            impl fmt::Display for $name {
                fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                    f.write_str(self.as_ref())
                }
            }

            impl From<$name> for String {
                fn from(value: $name) -> Self {
                    value.0
                }
            }

            impl TryFrom<String> for $name {
                type Error = BookValidationError;

                fn try_from(value: String) -> Result<Self, Self::Error> {
                    Self::new(value)
                }
            }
        )+
    };
}

string_newtype_impls!(Title, Author, Isbn);

impl From<PublishedYear> for i32 {
    fn from(value: PublishedYear) -> Self {
        value.0
    }
}

impl TryFrom<i32> for PublishedYear {
    type Error = BookValidationError;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Validated fields for a new book.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookDraft {
    pub title: Title,
    pub author: Author,
    pub isbn: Option<Isbn>,
    pub published_year: Option<PublishedYear>,
}

impl BookDraft {
    /// Validate raw draft fields in form order.
    pub fn try_from_parts(
        title: &str,
        author: &str,
        isbn: Option<&str>,
        published_year: Option<i32>,
    ) -> Result<Self, BookValidationError> {
        Ok(Self {
            title: Title::new(title)?,
            author: Author::new(author)?,
            isbn: isbn.map(Isbn::new).transpose()?,
            published_year: published_year.map(PublishedYear::new).transpose()?,
        })
    }
}

/// Partial update of a book.
///
/// The outer `Option` says whether a field is being changed; for the
/// optional columns the inner `Option` allows clearing the value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BookChanges {
    pub title: Option<Title>,
    pub author: Option<Author>,
    pub isbn: Option<Option<Isbn>>,
    pub published_year: Option<Option<PublishedYear>>,
}

impl BookChanges {
    /// Validate the fields that are present.
    ///
    /// An empty set is accepted here; the book service rejects it once the
    /// caller is known to own the book.
    pub fn try_from_parts(
        title: Option<&str>,
        author: Option<&str>,
        isbn: Option<Option<&str>>,
        published_year: Option<Option<i32>>,
    ) -> Result<Self, BookValidationError> {
        Ok(Self {
            title: title.map(Title::new).transpose()?,
            author: author.map(Author::new).transpose()?,
            isbn: isbn
                .map(|value| value.map(Isbn::new).transpose())
                .transpose()?,
            published_year: published_year
                .map(|value| value.map(PublishedYear::new).transpose())
                .transpose()?,
        })
    }

    /// Whether no field would change.
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.author.is_none()
            && self.isbn.is_none()
            && self.published_year.is_none()
    }
}

/// A stored book.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Book {
    pub id: BookId,
    pub owner_id: AccountId,
    pub title: Title,
    pub author: Author,
    pub isbn: Option<Isbn>,
    pub published_year: Option<PublishedYear>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Book {
    /// Materialise a draft as a new book owned by `owner_id`.
    pub fn create(draft: BookDraft, owner_id: AccountId, now: DateTime<Utc>) -> Self {
        let BookDraft {
            title,
            author,
            isbn,
            published_year,
        } = draft;
        Self {
            id: BookId::random(),
            owner_id,
            title,
            author,
            isbn,
            published_year,
            created_at: now,
            updated_at: now,
        }
    }

    /// Apply `changes`, leaving the id and owner untouched.
    pub fn apply(&mut self, changes: BookChanges, now: DateTime<Utc>) {
        let BookChanges {
            title,
            author,
            isbn,
            published_year,
        } = changes;
        if let Some(title) = title {
            self.title = title;
        }
        if let Some(author) = author {
            self.author = author;
        }
        if let Some(isbn) = isbn {
            self.isbn = isbn;
        }
        if let Some(published_year) = published_year {
            self.published_year = published_year;
        }
        self.updated_at = now;
    }
}

impl OwnedResource for Book {
    fn owner_id(&self) -> &AccountId {
        &self.owner_id
    }
}

#[cfg(test)]
mod tests {
    //! Validation and mutation coverage for books.
    use super::*;
    use chrono::Duration;
    use rstest::{fixture, rstest};

    #[fixture]
    fn book() -> Book {
        let draft = BookDraft::try_from_parts("Dune", "Frank Herbert", Some("978-0441013593"), Some(1965))
            .expect("valid draft");
        Book::create(draft, AccountId::random(), DateTime::<Utc>::UNIX_EPOCH)
    }

    #[rstest]
    #[case("0441013597")]
    #[case("978-0-441-01359-3")]
    #[case("080442957x")]
    #[case("0-8044-2957-X")]
    fn accepts_isbn_shapes(#[case] raw: &str) {
        assert!(Isbn::new(raw).is_ok());
    }

    #[rstest]
    #[case("123")]
    #[case("978-0-441-01359-3-12")]
    #[case("97804410135A3")]
    #[case("X080442957")]
    #[case("----------")]
    #[case("-0441013597")]
    #[case("0441013597-")]
    #[case("044--1013597")]
    #[case("97-80-44-10-13-59-3")]
    #[case("97804410135X")]
    fn rejects_malformed_isbns(#[case] raw: &str) {
        assert_eq!(Isbn::new(raw), Err(BookValidationError::MalformedIsbn));
    }

    #[rstest]
    #[case(-1)]
    #[case(10_000)]
    fn rejects_out_of_range_years(#[case] year: i32) {
        assert_eq!(
            PublishedYear::new(year),
            Err(BookValidationError::PublishedYearOutOfRange {
                max: PUBLISHED_YEAR_MAX
            })
        );
    }

    #[rstest]
    #[case("", "Author", "title")]
    #[case("Title", "  ", "author")]
    fn draft_reports_offending_field(
        #[case] title: &str,
        #[case] author: &str,
        #[case] field: &str,
    ) {
        let err = BookDraft::try_from_parts(title, author, None, None)
            .expect_err("invalid draft must fail");
        assert_eq!(err.field(), Some(field));
    }

    #[rstest]
    fn overlong_title_is_rejected() {
        let err = Title::new("t".repeat(BOOK_TEXT_MAX + 1)).expect_err("too long");
        assert_eq!(err, BookValidationError::TitleTooLong { max: BOOK_TEXT_MAX });
    }

    #[rstest]
    fn absent_fields_parse_to_empty_changes() {
        let changes =
            BookChanges::try_from_parts(None, None, None, None).expect("nothing to validate");
        assert!(changes.is_empty());
    }

    #[rstest]
    fn apply_updates_fields_but_not_owner(mut book: Book) {
        let owner = book.owner_id;
        let id = book.id;
        let later = book.created_at + Duration::hours(1);
        let changes = BookChanges::try_from_parts(Some("Dune Messiah"), None, Some(None), None)
            .expect("valid changes");

        book.apply(changes, later);

        assert_eq!(book.title.as_ref(), "Dune Messiah");
        assert_eq!(book.author.as_ref(), "Frank Herbert");
        assert!(book.isbn.is_none());
        assert_eq!(book.published_year.map(PublishedYear::get), Some(1965));
        assert_eq!(book.owner_id, owner);
        assert_eq!(book.id, id);
        assert_eq!(book.updated_at, later);
    }

    #[rstest]
    fn book_serialises_in_camel_case(book: Book) {
        let value = serde_json::to_value(&book).expect("serialise book");
        assert_eq!(value["publishedYear"], 1965);
        assert_eq!(value["ownerId"], book.owner_id.to_string());
        assert!(value.get("updatedAt").is_some());
    }
}
