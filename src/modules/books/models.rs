use serde::{Deserialize, Serialize};
use serde_json::json;
use shelf_db::{Book, BookEnrichment};
use shelf_http::error::AppError;
use shelf_metadata::VolumeInfo;
use utoipa::{IntoParams, ToSchema};

pub(crate) const MISSING_FIELDS: &str = "Title and author are required.";

/// Form body accepted by `POST /add`.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct AddBookForm {
    /// Title of the book
    pub title: Option<String>,
    /// Author of the book
    pub author: Option<String>,
}

/// A validated submission; both fields are non-blank and trimmed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewBook {
    pub title: String,
    pub author: String,
}

impl AddBookForm {
    pub fn validate(self) -> Result<NewBook, AppError> {
        let title = non_blank(self.title);
        let author = non_blank(self.author);

        match (title, author) {
            (Some(title), Some(author)) => Ok(NewBook { title, author }),
            (title, author) => {
                let mut details = Vec::new();
                if title.is_none() {
                    details.push(json!({"field": "title", "error": "required"}));
                }
                if author.is_none() {
                    details.push(json!({"field": "author", "error": "required"}));
                }
                Err(AppError::validation(details, MISSING_FIELDS))
            }
        }
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Projection returned by `GET /list`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct BookSummary {
    pub title: String,
    pub author: String,
}

impl From<Book> for BookSummary {
    fn from(book: Book) -> Self {
        Self {
            title: book.title,
            author: book.author,
        }
    }
}

/// Query string of `GET /search`; `query` wins over `q`.
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct SearchParams {
    /// Free-text search query
    pub query: Option<String>,
    /// Short alias for `query`
    pub q: Option<String>,
}

impl SearchParams {
    pub fn term(&self) -> Option<&str> {
        [self.query.as_deref(), self.q.as_deref()]
            .into_iter()
            .flatten()
            .map(str::trim)
            .find(|term| !term.is_empty())
    }
}

/// Fields copied from the first search result onto the stored book.
pub(crate) fn enrichment_from(volume: VolumeInfo) -> BookEnrichment {
    BookEnrichment {
        authors: Some(volume.authors).filter(|authors| !authors.is_empty()),
        publisher: volume.publisher,
        published_date: volume.published_date,
        description: volume.description,
    }
}
