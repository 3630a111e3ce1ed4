use serde::{Deserialize, Serialize};
use serde_json::Value;
use time::OffsetDateTime;

/// A book held on the shelf.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Book {
    /// Unique identifier, assigned at creation
    pub id: String,
    pub name: String,
    /// Descriptive fields are stored exactly as sent
    pub year: Option<Value>,
    pub author: Option<Value>,
    pub summary: Option<Value>,
    pub publisher: Option<Value>,
    /// Total number of pages
    pub page_count: u32,
    /// Pages read so far, never above `page_count`
    pub read_page: u32,
    /// Always `page_count == read_page`
    pub finished: bool,
    pub reading: bool,
    #[serde(with = "time::serde::rfc3339")]
    pub inserted_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

/// Client-supplied fields for creating or replacing a book.
///
/// `name` stays optional here so a missing name reaches the store as a
/// validation failure rather than a decoding error.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookPayload {
    pub name: Option<String>,
    pub year: Option<Value>,
    pub author: Option<Value>,
    pub summary: Option<Value>,
    pub publisher: Option<Value>,
    #[serde(default)]
    pub page_count: u32,
    #[serde(default)]
    pub read_page: u32,
    #[serde(default)]
    pub reading: bool,
}

/// Projection returned by the list operation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookSummary {
    pub id: String,
    pub name: String,
    pub publisher: Option<Value>,
}

impl From<&Book> for BookSummary {
    fn from(book: &Book) -> Self {
        Self {
            id: book.id.clone(),
            name: book.name.clone(),
            publisher: book.publisher.clone(),
        }
    }
}

/// Optional predicates for listing books; all present ones must hold.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BookFilter {
    /// Case-insensitive substring of the book name
    pub name: Option<String>,
    pub reading: Option<bool>,
    pub finished: Option<bool>,
}

impl BookFilter {
    pub fn matches(&self, book: &Book) -> bool {
        if let Some(needle) = &self.name {
            if !book.name.to_lowercase().contains(&needle.to_lowercase()) {
                return false;
            }
        }
        if self.reading.is_some_and(|reading| book.reading != reading) {
            return false;
        }
        if self.finished.is_some_and(|finished| book.finished != finished) {
            return false;
        }
        true
    }
}

/// `data` of a successful create
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookCreated {
    pub book_id: String,
}

/// `data` of a successful list
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookList {
    pub books: Vec<BookSummary>,
}

/// `data` of a successful lookup
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookDetail {
    pub book: Book,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn book(name: &str, reading: bool, finished: bool) -> Book {
        Book {
            id: name.to_lowercase(),
            name: name.to_string(),
            year: Some(json!(2010)),
            author: Some(json!("J. K. Rowling")),
            summary: None,
            publisher: Some(json!("Bloomsbury")),
            page_count: 100,
            read_page: if finished { 100 } else { 10 },
            finished,
            reading,
            inserted_at: OffsetDateTime::UNIX_EPOCH,
            updated_at: OffsetDateTime::UNIX_EPOCH,
        }
    }

    #[test]
    fn empty_filter_matches_everything() {
        assert!(BookFilter::default().matches(&book("Anything", false, false)));
    }

    #[test]
    fn name_filter_ignores_case() {
        let harry = book("Harry Potter", false, false);
        for needle in ["HARRY", "harry", "potter", "y P"] {
            let filter = BookFilter {
                name: Some(needle.to_string()),
                ..BookFilter::default()
            };
            assert!(filter.matches(&harry), "{needle} should match");
        }
        let filter = BookFilter {
            name: Some("hobbit".to_string()),
            ..BookFilter::default()
        };
        assert!(!filter.matches(&harry));
    }

    #[test]
    fn filters_combine_with_and() {
        let filter = BookFilter {
            name: Some("harry".to_string()),
            reading: Some(true),
            finished: Some(false),
        };
        assert!(filter.matches(&book("Harry Potter", true, false)));
        assert!(!filter.matches(&book("Harry Potter", false, false)));
        assert!(!filter.matches(&book("Harry Potter", true, true)));
        assert!(!filter.matches(&book("Dune", true, false)));
    }

    #[test]
    fn book_serializes_with_camel_case_and_rfc3339() {
        let value = serde_json::to_value(book("Dune", true, false)).unwrap();
        assert_eq!(value["pageCount"], 100);
        assert_eq!(value["readPage"], 10);
        assert_eq!(value["insertedAt"], "1970-01-01T00:00:00Z");
        assert_eq!(value["summary"], Value::Null);
    }

    #[test]
    fn payload_defaults_omitted_fields() {
        let payload: BookPayload = serde_json::from_value(json!({ "name": "Dune" })).unwrap();
        assert_eq!(payload.name.as_deref(), Some("Dune"));
        assert_eq!(payload.page_count, 0);
        assert_eq!(payload.read_page, 0);
        assert!(!payload.reading);
        assert!(payload.publisher.is_none());
    }

    #[test]
    fn descriptive_fields_accept_any_json() {
        let payload: BookPayload = serde_json::from_value(json!({
            "name": "Dune",
            "year": "1965",
            "author": ["Frank Herbert"],
            "publisher": 42
        }))
        .unwrap();
        assert_eq!(payload.year, Some(json!("1965")));
        assert_eq!(payload.author, Some(json!(["Frank Herbert"])));
        assert_eq!(payload.publisher, Some(json!(42)));
        assert!(payload.summary.is_none());
    }

    #[test]
    fn payload_rejects_negative_page_numbers() {
        let result = serde_json::from_value::<BookPayload>(json!({ "name": "Dune", "pageCount": -1 }));
        assert!(result.is_err());
    }
}
