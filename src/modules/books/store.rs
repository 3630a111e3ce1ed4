//! In-memory book collection and the invariants it enforces.

use std::sync::Arc;

use thiserror::Error;
use tokio::sync::RwLock;

use super::generators::{Clock, IdGenerator};
use super::models::{Book, BookFilter, BookPayload, BookSummary};

/// Store handle shared between request handlers.
pub type SharedBookStore = Arc<RwLock<BookStore>>;

/// Why a create or update payload was rejected
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("missing name")]
    MissingName,
    #[error("readPage exceeds pageCount")]
    ReadPageExceedsPageCount,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("book '{0}' not found")]
    NotFound(String),
    #[error("store inconsistency: {0}")]
    Internal(String),
}

/// Ordered collection of books. Iteration order is insertion order.
pub struct BookStore {
    books: Vec<Book>,
    ids: Box<dyn IdGenerator>,
    clock: Box<dyn Clock>,
}

impl BookStore {
    pub fn new(ids: impl IdGenerator + 'static, clock: impl Clock + 'static) -> Self {
        Self {
            books: Vec::new(),
            ids: Box::new(ids),
            clock: Box::new(clock),
        }
    }

    /// Wrap the store for sharing across handlers
    pub fn shared(self) -> SharedBookStore {
        Arc::new(RwLock::new(self))
    }

    pub fn len(&self) -> usize {
        self.books.len()
    }

    pub fn is_empty(&self) -> bool {
        self.books.is_empty()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.position(id).is_some()
    }

    /// Validate `payload`, append it as a new book and return its id.
    pub fn add(&mut self, payload: BookPayload) -> Result<String, StoreError> {
        let (name, payload) = validate(payload)?;

        let id = self.ids.generate();
        let now = self.clock.now();
        self.books.push(Book {
            id: id.clone(),
            name,
            year: payload.year,
            author: payload.author,
            summary: payload.summary,
            publisher: payload.publisher,
            finished: payload.page_count == payload.read_page,
            page_count: payload.page_count,
            read_page: payload.read_page,
            reading: payload.reading,
            inserted_at: now,
            updated_at: now,
        });

        if !self.contains(&id) {
            return Err(StoreError::Internal(format!(
                "book '{}' missing after insert",
                id
            )));
        }

        tracing::debug!(book_id = %id, "book added");
        Ok(id)
    }

    /// Summaries of every book matching `filter`, in collection order.
    pub fn list(&self, filter: &BookFilter) -> Vec<BookSummary> {
        self.books
            .iter()
            .filter(|book| filter.matches(book))
            .map(BookSummary::from)
            .collect()
    }

    pub fn get(&self, id: &str) -> Result<Book, StoreError> {
        self.books
            .iter()
            .find(|book| book.id == id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(id.to_string()))
    }

    /// Replace every mutable field of book `id`.
    ///
    /// Existence is checked before the payload is validated.
    pub fn update(&mut self, id: &str, payload: BookPayload) -> Result<(), StoreError> {
        let index = self
            .position(id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;
        let (name, payload) = validate(payload)?;
        let now = self.clock.now();

        let book = &mut self.books[index];
        book.name = name;
        book.year = payload.year;
        book.author = payload.author;
        book.summary = payload.summary;
        book.publisher = payload.publisher;
        book.page_count = payload.page_count;
        book.read_page = payload.read_page;
        book.finished = payload.page_count == payload.read_page;
        book.reading = payload.reading;
        book.updated_at = now;

        tracing::debug!(book_id = %id, "book updated");
        Ok(())
    }

    pub fn delete(&mut self, id: &str) -> Result<(), StoreError> {
        let index = self
            .position(id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;
        self.books.remove(index);

        tracing::debug!(book_id = %id, "book deleted");
        Ok(())
    }

    fn position(&self, id: &str) -> Option<usize> {
        self.books.iter().position(|book| book.id == id)
    }
}

/// Split a payload into its required name and the remaining fields.
fn validate(mut payload: BookPayload) -> Result<(String, BookPayload), ValidationError> {
    let name = match payload.name.take() {
        Some(name) if !name.is_empty() => name,
        _ => return Err(ValidationError::MissingName),
    };
    if payload.read_page > payload.page_count {
        return Err(ValidationError::ReadPageExceedsPageCount);
    }
    Ok((name, payload))
}
