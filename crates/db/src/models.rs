use serde::{Deserialize, Serialize};
use uuid::{Timestamp, Uuid};

/// A stored catalog entry from the `books` collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Book {
    pub title: String,
    pub author: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub authors: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub publisher: Option<String>,
    #[serde(
        default,
        rename = "publishedDate",
        skip_serializing_if = "Option::is_none"
    )]
    pub published_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Book {
    /// A freshly submitted book with no enrichment fields.
    pub fn new(title: impl Into<String>, author: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            author: author.into(),
            authors: None,
            publisher: None,
            published_date: None,
            description: None,
        }
    }

    pub fn matches(&self, key: &BookKey) -> bool {
        self.title == key.title && self.author == key.author
    }

    /// Overwrite the fields present in `fields`, leaving the rest untouched.
    pub fn apply(&mut self, fields: &BookEnrichment) {
        if let Some(authors) = &fields.authors {
            self.authors = Some(authors.clone());
        }
        if let Some(publisher) = &fields.publisher {
            self.publisher = Some(publisher.clone());
        }
        if let Some(published_date) = &fields.published_date {
            self.published_date = Some(published_date.clone());
        }
        if let Some(description) = &fields.description {
            self.description = Some(description.clone());
        }
    }
}

/// The client-supplied `(title, author)` pair identifying a book.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookKey {
    pub title: String,
    pub author: String,
}

impl BookKey {
    pub fn new(title: impl Into<String>, author: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            author: author.into(),
        }
    }
}

/// Bibliographic fields copied onto a stored book after a metadata lookup.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BookEnrichment {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub authors: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub publisher: Option<String>,
    #[serde(rename = "publishedDate", skip_serializing_if = "Option::is_none")]
    pub published_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl BookEnrichment {
    pub fn is_empty(&self) -> bool {
        self.authors.is_none()
            && self.publisher.is_none()
            && self.published_date.is_none()
            && self.description.is_none()
    }
}

/// A registered account from the `users` collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    #[serde(rename = "_id")]
    pub id: String,
    pub username: String,
    /// bcrypt hash, never the plain-text password
    pub password: String,
    #[serde(default)]
    pub favorite_books: Vec<String>,
}

impl User {
    /// Build a new account with a time-ordered identifier.
    pub fn new(username: impl Into<String>, password_hash: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v7(Timestamp::now(uuid::NoContext)).to_string(),
            username: username.into(),
            password: password_hash.into(),
            favorite_books: Vec::new(),
        }
    }
}
