//! MongoDB-backed document store.

use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::{
    bson::{self, doc, Document},
    error::{ErrorKind, WriteFailure},
    options::IndexOptions,
    Client, Collection, IndexModel,
};

use crate::{Book, BookEnrichment, BookKey, DocumentStore, StoreError, User};

const BOOKS_COLLECTION: &str = "books";
const USERS_COLLECTION: &str = "users";
const DUPLICATE_KEY_CODE: i32 = 11000;

/// Document store over the `books` and `users` collections of one database.
#[derive(Clone)]
pub struct MongoStore {
    books: Collection<Book>,
    users: Collection<User>,
}

impl MongoStore {
    /// Connect to `uri`, select database `name`, and ensure required indexes exist.
    pub async fn connect(uri: &str, name: &str) -> Result<Self, StoreError> {
        let client = Client::with_uri_str(uri).await?;
        let database = client.database(name);

        let store = Self {
            books: database.collection(BOOKS_COLLECTION),
            users: database.collection(USERS_COLLECTION),
        };
        store.ensure_indexes().await?;

        tracing::info!(database = name, "connected to MongoDB");
        Ok(store)
    }

    async fn ensure_indexes(&self) -> Result<(), StoreError> {
        let username_unique = IndexModel::builder()
            .keys(doc! { "username": 1 })
            .options(IndexOptions::builder().unique(true).build())
            .build();
        self.users.create_index(username_unique).await?;
        Ok(())
    }
}

/// Build the `$set` document for an enrichment, or `None` when nothing would change.
fn enrichment_update(fields: &BookEnrichment) -> Result<Option<Document>, StoreError> {
    if fields.is_empty() {
        return Ok(None);
    }
    let set = bson::to_document(fields)?;
    Ok(Some(doc! { "$set": set }))
}

fn is_duplicate_key(err: &mongodb::error::Error) -> bool {
    matches!(
        err.kind.as_ref(),
        ErrorKind::Write(WriteFailure::WriteError(write_error))
            if write_error.code == DUPLICATE_KEY_CODE
    )
}

#[async_trait]
impl DocumentStore for MongoStore {
    async fn insert_book(&self, title: &str, author: &str) -> Result<(), StoreError> {
        self.books.insert_one(Book::new(title, author)).await?;
        Ok(())
    }

    async fn update_book_fields(
        &self,
        key: &BookKey,
        fields: &BookEnrichment,
    ) -> Result<u64, StoreError> {
        let Some(update) = enrichment_update(fields)? else {
            return Ok(0);
        };
        let filter = doc! { "title": key.title.as_str(), "author": key.author.as_str() };
        let result = self.books.update_many(filter, update).await?;
        Ok(result.matched_count)
    }

    async fn find_all_books(&self) -> Result<Vec<Book>, StoreError> {
        let cursor = self.books.find(doc! {}).sort(doc! { "_id": 1 }).await?;
        Ok(cursor.try_collect().await?)
    }

    async fn find_user_by_username(&self, username: &str) -> Result<Option<User>, StoreError> {
        Ok(self.users.find_one(doc! { "username": username }).await?)
    }

    async fn find_user_by_id(&self, id: &str) -> Result<Option<User>, StoreError> {
        Ok(self.users.find_one(doc! { "_id": id }).await?)
    }

    async fn insert_user(&self, username: &str, password_hash: &str) -> Result<User, StoreError> {
        let user = User::new(username, password_hash);
        match self.users.insert_one(&user).await {
            Ok(_) => Ok(user),
            Err(err) if is_duplicate_key(&err) => {
                Err(StoreError::DuplicateUsername(username.to_string()))
            }
            Err(err) => Err(err.into()),
        }
    }
}
