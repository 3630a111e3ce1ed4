pub mod generators;
pub mod models;
pub mod routes;
pub mod store;

use async_trait::async_trait;
use axum::Router;
use bookshelf_kernel::{settings::BooksSettings, InitCtx, Module};
use serde_json::json;

use generators::{NanoIdGenerator, SystemClock};
use store::{BookStore, SharedBookStore};

/// Books module: the in-memory shelf and its HTTP surface
pub struct BooksModule {
    store: SharedBookStore,
}

impl BooksModule {
    pub fn new(store: BookStore) -> Self {
        Self {
            store: store.shared(),
        }
    }
}

#[async_trait]
impl Module for BooksModule {
    fn name(&self) -> &'static str {
        "books"
    }

    async fn init(&self, ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        tracing::info!(
            module = self.name(),
            environment = ?ctx.settings.environment,
            id_length = ctx.settings.books.id_length,
            "books module initialized"
        );
        Ok(())
    }

    fn routes(&self) -> Router {
        routes::router(self.store.clone())
    }

    /// Books are served from `/books`, outside the `/api` namespace.
    fn route_prefix(&self) -> Option<String> {
        None
    }

    fn openapi(&self) -> Option<serde_json::Value> {
        Some(openapi_fragment())
    }

    async fn start(&self, _ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        tracing::info!(module = self.name(), "books module started");
        Ok(())
    }

    async fn stop(&self) -> anyhow::Result<()> {
        let discarded = self.store.read().await.len();
        tracing::info!(module = self.name(), discarded, "books module stopped");
        Ok(())
    }
}

/// Create the books module from its settings
pub fn create_module(settings: &BooksSettings) -> anyhow::Result<std::sync::Arc<dyn Module>> {
    anyhow::ensure!(
        settings.id_length > 0,
        "books.id_length must be at least 1"
    );
    let store = BookStore::new(NanoIdGenerator::new(settings.id_length), SystemClock);
    Ok(std::sync::Arc::new(BooksModule::new(store)))
}

fn envelope_response(description: &str) -> serde_json::Value {
    json!({
        "description": description,
        "content": {
            "application/json": {
                "schema": { "$ref": "#/components/schemas/Envelope" }
            }
        }
    })
}

fn openapi_fragment() -> serde_json::Value {
    let book_id_param = json!({
        "name": "bookId",
        "in": "path",
        "required": true,
        "schema": { "type": "string" }
    });
    let flag_param = |name: &str, description: &str| {
        json!({
            "name": name,
            "in": "query",
            "required": false,
            "description": description,
            "schema": { "type": "string", "enum": ["0", "1"] }
        })
    };
    let payload_body = json!({
        "required": true,
        "content": {
            "application/json": {
                "schema": { "$ref": "#/components/schemas/BookPayload" }
            }
        }
    });

    json!({
        "paths": {
            "/books": {
                "post": {
                    "summary": "Add a book",
                    "tags": ["Books"],
                    "requestBody": payload_body,
                    "responses": {
                        "201": envelope_response("Book added; data.bookId holds the new id"),
                        "400": envelope_response("Missing name, readPage above pageCount, or malformed body"),
                        "500": envelope_response("Book could not be stored")
                    }
                },
                "get": {
                    "summary": "List books",
                    "tags": ["Books"],
                    "parameters": [
                        {
                            "name": "name",
                            "in": "query",
                            "required": false,
                            "description": "Case-insensitive substring of the book name",
                            "schema": { "type": "string" }
                        },
                        flag_param("reading", "1 for books being read, 0 otherwise"),
                        flag_param("finished", "1 for finished books, 0 otherwise")
                    ],
                    "responses": {
                        "200": envelope_response("data.books holds BookSummary entries")
                    }
                }
            },
            "/books/{bookId}": {
                "get": {
                    "summary": "Get a book",
                    "tags": ["Books"],
                    "parameters": [book_id_param.clone()],
                    "responses": {
                        "200": envelope_response("data.book holds the Book"),
                        "404": envelope_response("Book not found")
                    }
                },
                "put": {
                    "summary": "Replace a book",
                    "tags": ["Books"],
                    "parameters": [book_id_param.clone()],
                    "requestBody": payload_body,
                    "responses": {
                        "200": envelope_response("Book updated"),
                        "400": envelope_response("Missing name, readPage above pageCount, or malformed body"),
                        "404": envelope_response("Id not found")
                    }
                },
                "delete": {
                    "summary": "Delete a book",
                    "tags": ["Books"],
                    "parameters": [book_id_param],
                    "responses": {
                        "200": envelope_response("Book deleted"),
                        "404": envelope_response("Id not found")
                    }
                }
            }
        },
        "components": {
            "schemas": {
                "Book": {
                    "type": "object",
                    "properties": {
                        "id": { "type": "string", "description": "Unique identifier for the book" },
                        "name": { "type": "string" },
                        "year": { "description": "Stored as sent, usually an integer" },
                        "author": { "description": "Stored as sent" },
                        "summary": { "description": "Stored as sent" },
                        "publisher": { "description": "Stored as sent" },
                        "pageCount": { "type": "integer", "minimum": 0 },
                        "readPage": { "type": "integer", "minimum": 0 },
                        "finished": { "type": "boolean", "description": "pageCount == readPage" },
                        "reading": { "type": "boolean" },
                        "insertedAt": { "type": "string", "format": "date-time" },
                        "updatedAt": { "type": "string", "format": "date-time" }
                    },
                    "required": [
                        "id", "name", "pageCount", "readPage", "finished",
                        "reading", "insertedAt", "updatedAt"
                    ]
                },
                "BookPayload": {
                    "type": "object",
                    "properties": {
                        "name": { "type": "string" },
                        "year": {},
                        "author": {},
                        "summary": {},
                        "publisher": {},
                        "pageCount": { "type": "integer", "minimum": 0 },
                        "readPage": { "type": "integer", "minimum": 0 },
                        "reading": { "type": "boolean" }
                    },
                    "required": ["name"]
                },
                "BookSummary": {
                    "type": "object",
                    "properties": {
                        "id": { "type": "string" },
                        "name": { "type": "string" },
                        "publisher": {}
                    },
                    "required": ["id", "name"]
                }
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_zero_length_ids() {
        let settings = BooksSettings { id_length: 0 };
        assert!(create_module(&settings).is_err());
    }

    #[test]
    fn mounts_at_root() {
        let module = BooksModule::new(BookStore::new(NanoIdGenerator::default(), SystemClock));
        assert_eq!(module.name(), "books");
        assert!(module.route_prefix().is_none());
    }

    #[test]
    fn openapi_covers_every_operation() {
        let spec = openapi_fragment();
        for method in ["post", "get"] {
            assert!(spec["paths"]["/books"][method].is_object());
        }
        for method in ["get", "put", "delete"] {
            assert!(spec["paths"]["/books/{bookId}"][method].is_object());
        }
        assert!(spec["components"]["schemas"]["Book"].is_object());
    }
}
