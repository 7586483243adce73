pub mod models;
pub mod repository;
pub mod routes;
pub mod seed;

use std::sync::Arc;

use async_trait::async_trait;
use axum::Router;
use cozy_db::DocumentStore;
use cozy_kernel::{InitCtx, Migration, Module};
use serde_json::json;

use repository::{BookRepository, COLLECTION};

/// Book inventory: list, add, edit and delete book records.
pub struct BooksModule {
    repository: BookRepository,
}

impl BooksModule {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self {
            repository: BookRepository::new(store),
        }
    }

    /// Lookup indexes on title and author.
    pub fn index_migrations() -> Vec<Migration> {
        vec![
            Migration {
                id: "001_books_title_index",
                collection: COLLECTION,
                index_field: "title",
            },
            Migration {
                id: "002_books_author_index",
                collection: COLLECTION,
                index_field: "author",
            },
        ]
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
            backend = self.repository.store().backend(),
            "books module initialized"
        );
        Ok(())
    }

    fn routes(&self) -> Option<Router> {
        Some(routes::router(self.repository.clone()))
    }

    fn openapi(&self) -> Option<serde_json::Value> {
        let failure = |description: &str| {
            json!({
                "description": description,
                "content": {
                    "application/json": {
                        "schema": { "$ref": "#/components/schemas/ErrorResponse" }
                    }
                }
            })
        };
        let message = json!({
            "description": "OK",
            "content": {
                "application/json": {
                    "schema": { "$ref": "#/components/schemas/BookMessage" }
                }
            }
        });
        let id_param = json!([{
            "name": "id",
            "in": "path",
            "required": true,
            "schema": { "type": "string" }
        }]);
        let fields_body = json!({
            "required": true,
            "content": {
                "application/json": {
                    "schema": { "$ref": "#/components/schemas/BookFields" }
                }
            }
        });

        Some(json!({
            "paths": {
                "/": {
                    "get": {
                        "summary": "List books",
                        "tags": ["Books"],
                        "responses": {
                            "200": {
                                "description": "Every stored book",
                                "content": {
                                    "application/json": {
                                        "schema": {
                                            "type": "array",
                                            "items": { "$ref": "#/components/schemas/Book" }
                                        }
                                    }
                                }
                            },
                            "500": failure("Failed to fetch books")
                        }
                    },
                    "post": {
                        "summary": "Add a book",
                        "tags": ["Books"],
                        "requestBody": fields_body.clone(),
                        "responses": {
                            "200": message.clone(),
                            "500": failure("Failed to add book")
                        }
                    }
                },
                "/{id}": {
                    "put": {
                        "summary": "Merge fields into a book",
                        "tags": ["Books"],
                        "parameters": id_param.clone(),
                        "requestBody": fields_body,
                        "responses": {
                            "200": message.clone(),
                            "500": failure("Failed to update book")
                        }
                    },
                    "delete": {
                        "summary": "Delete a book",
                        "tags": ["Books"],
                        "parameters": id_param,
                        "responses": {
                            "200": message,
                            "500": failure("Failed to delete book")
                        }
                    }
                }
            },
            "components": {
                "schemas": {
                    "Book": {
                        "type": "object",
                        "properties": {
                            "_id": { "type": "string", "description": "Store-assigned identifier" },
                            "title": { "type": "string" },
                            "author": { "type": "string" },
                            "price": { "type": "number", "minimum": 0 },
                            "quantity": { "type": "integer", "minimum": 0 },
                            "createdAt": { "type": "string", "format": "date-time" }
                        },
                        "required": ["_id"],
                        "additionalProperties": true
                    },
                    "BookFields": {
                        "type": "object",
                        "properties": {
                            "title": { "type": "string" },
                            "author": { "type": "string" },
                            "price": { "type": ["number", "string"] },
                            "quantity": { "type": ["integer", "string"] }
                        },
                        "additionalProperties": false
                    },
                    "BookMessage": {
                        "type": "object",
                        "properties": {
                            "message": { "type": "string" },
                            "id": { "type": "string" }
                        },
                        "required": ["message"]
                    }
                }
            }
        }))
    }

    fn migrations(&self) -> Vec<Migration> {
        Self::index_migrations()
    }

    async fn start(&self, _ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        tracing::info!(module = self.name(), "books module started");
        Ok(())
    }

    async fn stop(&self) -> anyhow::Result<()> {
        tracing::info!(module = self.name(), "books module stopped");
        Ok(())
    }
}

/// Create a new instance of the books module
pub fn create_module(store: Arc<dyn DocumentStore>) -> Arc<dyn Module> {
    Arc::new(BooksModule::new(store))
}
