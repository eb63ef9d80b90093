//! In-process store implementing every repository port.
//!
//! Used when no database is configured and by HTTP tests. All maps sit
//! behind one mutex, so each port call is atomic with respect to the others;
//! in particular the identity uniqueness check and insert cannot interleave.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use pagination::PageRequest;

use crate::domain::ports::{
    AccessTokenPersistenceError, AccessTokenRepository, AccountPersistenceError,
    AccountRepository, BookPersistenceError, BookRepository, BookSlice,
};
use crate::domain::{
    AccessToken, Account, AccountId, Book, BookId, Identity, StoredAccount, TokenDigest,
};

#[derive(Default)]
struct State {
    accounts: HashMap<AccountId, StoredAccount>,
    identities: HashMap<Identity, AccountId>,
    tokens: HashMap<TokenDigest, AccessToken>,
    books: HashMap<BookId, Book>,
}

/// Mutex-guarded maps of accounts, tokens, and books.
#[derive(Default)]
pub struct InMemoryStore {
    state: Mutex<State>,
}

const POISONED: &str = "in-memory store lock poisoned";

impl InMemoryStore {
    fn lock(&self) -> Option<MutexGuard<'_, State>> {
        self.state.lock().ok()
    }
}

#[async_trait]
impl AccountRepository for InMemoryStore {
    async fn find_by_identity(
        &self,
        identity: &Identity,
    ) -> Result<Option<StoredAccount>, AccountPersistenceError> {
        let state = self
            .lock()
            .ok_or_else(|| AccountPersistenceError::connection(POISONED))?;
        Ok(state
            .identities
            .get(identity)
            .and_then(|id| state.accounts.get(id))
            .cloned())
    }

    async fn find_by_id(&self, id: &AccountId) -> Result<Option<Account>, AccountPersistenceError> {
        let state = self
            .lock()
            .ok_or_else(|| AccountPersistenceError::connection(POISONED))?;
        Ok(state.accounts.get(id).map(|stored| stored.account.clone()))
    }

    async fn create(&self, stored: &StoredAccount) -> Result<(), AccountPersistenceError> {
        let mut state = self
            .lock()
            .ok_or_else(|| AccountPersistenceError::connection(POISONED))?;
        let identity = stored.account.identity();
        if state.identities.contains_key(identity) {
            return Err(AccountPersistenceError::duplicate_identity());
        }
        let id = *stored.account.id();
        state.identities.insert(identity.clone(), id);
        state.accounts.insert(id, stored.clone());
        Ok(())
    }
}

#[async_trait]
impl AccessTokenRepository for InMemoryStore {
    async fn store(&self, token: &AccessToken) -> Result<(), AccessTokenPersistenceError> {
        let mut state = self
            .lock()
            .ok_or_else(|| AccessTokenPersistenceError::connection(POISONED))?;
        // Tokens are issued at the service clock's "now"; anything expired by
        // then can never authenticate again.
        state
            .tokens
            .retain(|_, existing| !existing.is_expired_at(token.created_at));
        state.tokens.insert(token.digest.clone(), token.clone());
        Ok(())
    }

    async fn find_by_digest(
        &self,
        digest: &TokenDigest,
    ) -> Result<Option<AccessToken>, AccessTokenPersistenceError> {
        let state = self
            .lock()
            .ok_or_else(|| AccessTokenPersistenceError::connection(POISONED))?;
        Ok(state.tokens.get(digest).cloned())
    }
}

#[async_trait]
impl BookRepository for InMemoryStore {
    async fn find_by_id(&self, id: &BookId) -> Result<Option<Book>, BookPersistenceError> {
        let state = self
            .lock()
            .ok_or_else(|| BookPersistenceError::connection(POISONED))?;
        Ok(state.books.get(id).cloned())
    }

    async fn create(&self, book: &Book) -> Result<(), BookPersistenceError> {
        let mut state = self
            .lock()
            .ok_or_else(|| BookPersistenceError::connection(POISONED))?;
        state.books.insert(book.id, book.clone());
        Ok(())
    }

    async fn update(&self, book: &Book) -> Result<bool, BookPersistenceError> {
        let mut state = self
            .lock()
            .ok_or_else(|| BookPersistenceError::connection(POISONED))?;
        let Some(existing) = state.books.get_mut(&book.id) else {
            return Ok(false);
        };
        let owner_id = existing.owner_id;
        let created_at = existing.created_at;
        *existing = Book {
            owner_id,
            created_at,
            ..book.clone()
        };
        Ok(true)
    }

    async fn delete(&self, id: &BookId) -> Result<bool, BookPersistenceError> {
        let mut state = self
            .lock()
            .ok_or_else(|| BookPersistenceError::connection(POISONED))?;
        Ok(state.books.remove(id).is_some())
    }

    async fn list_by_owner(
        &self,
        owner_id: &AccountId,
        page: PageRequest,
    ) -> Result<BookSlice, BookPersistenceError> {
        let state = self
            .lock()
            .ok_or_else(|| BookPersistenceError::connection(POISONED))?;
        let mut owned: Vec<&Book> = state
            .books
            .values()
            .filter(|book| book.owner_id == *owner_id)
            .collect();
        owned.sort_by(|a, b| {
            a.created_at
                .cmp(&b.created_at)
                .then_with(|| a.id.as_uuid().cmp(b.id.as_uuid()))
        });
        let total = owned.len() as u64;
        let skip = usize::try_from(page.offset()).unwrap_or(usize::MAX);
        let take = usize::try_from(page.limit()).unwrap_or(usize::MAX);
        let books = owned.into_iter().skip(skip).take(take).cloned().collect();
        Ok(BookSlice { books, total })
    }
}

#[cfg(test)]
mod tests {
    //! Behavioural coverage for the in-memory store.
    use super::*;
    use crate::domain::{BearerToken, BookDraft, DisplayName, SecretHash, TokenPolicy};
    use crate::test_support::fixture_timestamp;
    use chrono::TimeDelta;
    use rstest::{fixture, rstest};

    #[fixture]
    fn store() -> InMemoryStore {
        InMemoryStore::default()
    }

    fn stored(email: &str) -> StoredAccount {
        StoredAccount {
            account: Account::new(
                AccountId::random(),
                DisplayName::new("Reader").expect("valid name"),
                Identity::new(email).expect("valid identity"),
                fixture_timestamp(),
            ),
            secret_hash: SecretHash::new("$argon2id$stub"),
        }
    }

    fn book(owner: AccountId, minutes: i64) -> Book {
        let draft = BookDraft::try_from_parts("Title", "Author", None, None).expect("valid draft");
        Book::create(draft, owner, fixture_timestamp() + TimeDelta::minutes(minutes))
    }

    #[rstest]
    #[tokio::test]
    async fn duplicate_identity_is_rejected(store: InMemoryStore) {
        AccountRepository::create(&store, &stored("a@x.com"))
            .await
            .expect("first insert");
        let err = AccountRepository::create(&store, &stored("a@x.com"))
            .await
            .expect_err("second insert");
        assert_eq!(err, AccountPersistenceError::duplicate_identity());
    }

    #[rstest]
    #[tokio::test]
    async fn accounts_are_found_by_identity_and_id(store: InMemoryStore) {
        let account = stored("a@x.com");
        AccountRepository::create(&store, &account)
            .await
            .expect("insert");
        let identity = Identity::new("A@X.COM").expect("valid identity");

        let by_identity = store.find_by_identity(&identity).await.expect("lookup");
        let by_id = AccountRepository::find_by_id(&store, account.account.id())
            .await
            .expect("lookup");

        assert_eq!(by_identity, Some(account.clone()));
        assert_eq!(by_id, Some(account.account));
    }

    #[rstest]
    #[tokio::test]
    async fn listing_is_scoped_ordered_and_paged(store: InMemoryStore) {
        let owner = AccountId::random();
        let other = AccountId::random();
        for minutes in [3, 1, 2] {
            BookRepository::create(&store, &book(owner, minutes))
                .await
                .expect("insert");
        }
        BookRepository::create(&store, &book(other, 0))
            .await
            .expect("insert");

        let first = store
            .list_by_owner(&owner, PageRequest::new(1, 2).expect("valid page"))
            .await
            .expect("list");
        let second = store
            .list_by_owner(&owner, PageRequest::new(2, 2).expect("valid page"))
            .await
            .expect("list");

        assert_eq!(first.total, 3);
        assert_eq!(first.books.len(), 2);
        assert!(first.books[0].created_at < first.books[1].created_at);
        assert_eq!(second.books.len(), 1);
        assert!(first.books.iter().chain(&second.books).all(|b| b.owner_id == owner));
    }

    #[rstest]
    #[tokio::test]
    async fn update_and_delete_report_missing_books(store: InMemoryStore) {
        let missing = book(AccountId::random(), 0);
        assert!(!store.update(&missing).await.expect("update"));
        assert!(!store.delete(&missing.id).await.expect("delete"));
    }

    #[rstest]
    #[tokio::test]
    async fn update_never_moves_a_book_to_another_owner(store: InMemoryStore) {
        let original = book(AccountId::random(), 0);
        BookRepository::create(&store, &original)
            .await
            .expect("insert");
        let hijack = Book {
            owner_id: AccountId::random(),
            ..original.clone()
        };

        assert!(store.update(&hijack).await.expect("update"));

        let reloaded = BookRepository::find_by_id(&store, &original.id)
            .await
            .expect("lookup")
            .expect("present");
        assert_eq!(reloaded.owner_id, original.owner_id);
    }

    async fn is_stored(store: &InMemoryStore, token: &BearerToken) -> bool {
        AccessTokenRepository::find_by_digest(store, &token.digest())
            .await
            .expect("lookup")
            .is_some()
    }

    #[rstest]
    #[tokio::test]
    async fn storing_a_token_prunes_expired_records(store: InMemoryStore) {
        let owner = AccountId::random();
        let issued_at = fixture_timestamp();
        let five_minutes = TokenPolicy::from_minutes(5);
        let short_lived = BearerToken::mint();
        let permanent = BearerToken::mint();
        let later = BearerToken::mint();
        for record in [
            five_minutes.issue(&short_lived, owner, issued_at),
            TokenPolicy::never_expires().issue(&permanent, owner, issued_at),
        ] {
            AccessTokenRepository::store(&store, &record)
                .await
                .expect("store token");
        }

        let next = five_minutes.issue(&later, owner, issued_at + TimeDelta::minutes(10));
        AccessTokenRepository::store(&store, &next)
            .await
            .expect("store later token");

        assert!(!is_stored(&store, &short_lived).await);
        assert!(is_stored(&store, &permanent).await);
        assert!(is_stored(&store, &later).await);
    }
}
