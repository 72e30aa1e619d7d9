//! In-process document store used for local runs and tests.

use async_trait::async_trait;
use parking_lot::RwLock;

use crate::{Book, BookEnrichment, BookKey, DocumentStore, StoreError, User};

#[derive(Debug, Default)]
struct Collections {
    books: Vec<Book>,
    users: Vec<User>,
    offline: bool,
}

impl Collections {
    fn check_online(&self) -> Result<(), StoreError> {
        if self.offline {
            return Err(StoreError::Unavailable("memory store is offline".to_string()));
        }
        Ok(())
    }
}

/// Keeps both collections in memory, preserving insertion order.
#[derive(Debug, Default)]
pub struct MemoryStore {
    inner: RwLock<Collections>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a user document directly, bypassing registration.
    pub fn with_user(self, user: User) -> Self {
        self.inner.write().users.push(user);
        self
    }

    /// Test hook: make every subsequent operation fail with
    /// [`StoreError::Unavailable`].
    #[cfg(any(test, feature = "testing"))]
    pub fn set_offline(&self, offline: bool) {
        self.inner.write().offline = offline;
    }

    /// Test hook: delete an account out from under any session that refers to it.
    #[cfg(any(test, feature = "testing"))]
    pub fn remove_user(&self, username: &str) -> bool {
        let mut inner = self.inner.write();
        let before = inner.users.len();
        inner.users.retain(|user| user.username != username);
        inner.users.len() != before
    }

    /// Snapshot of every stored book including enrichment fields.
    pub fn books(&self) -> Vec<Book> {
        self.inner.read().books.clone()
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn insert_book(&self, title: &str, author: &str) -> Result<(), StoreError> {
        let mut inner = self.inner.write();
        inner.check_online()?;
        inner.books.push(Book::new(title, author));
        Ok(())
    }

    async fn update_book_fields(
        &self,
        key: &BookKey,
        fields: &BookEnrichment,
    ) -> Result<u64, StoreError> {
        let mut inner = self.inner.write();
        inner.check_online()?;
        let mut matched = 0;
        for book in inner.books.iter_mut().filter(|book| book.matches(key)) {
            book.apply(fields);
            matched += 1;
        }
        Ok(matched)
    }

    async fn find_all_books(&self) -> Result<Vec<Book>, StoreError> {
        let inner = self.inner.read();
        inner.check_online()?;
        Ok(inner.books.clone())
    }

    async fn find_user_by_username(&self, username: &str) -> Result<Option<User>, StoreError> {
        let inner = self.inner.read();
        inner.check_online()?;
        Ok(inner
            .users
            .iter()
            .find(|user| user.username == username)
            .cloned())
    }

    async fn find_user_by_id(&self, id: &str) -> Result<Option<User>, StoreError> {
        let inner = self.inner.read();
        inner.check_online()?;
        Ok(inner.users.iter().find(|user| user.id == id).cloned())
    }

    async fn insert_user(&self, username: &str, password_hash: &str) -> Result<User, StoreError> {
        let mut inner = self.inner.write();
        inner.check_online()?;
        // Uniqueness is checked under the same write lock as the insert.
        if inner.users.iter().any(|user| user.username == username) {
            return Err(StoreError::DuplicateUsername(username.to_string()));
        }
        let user = User::new(username, password_hash);
        inner.users.push(user.clone());
        Ok(user)
    }
}
