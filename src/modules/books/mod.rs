pub mod models;
pub mod routes;

use std::sync::Arc;

use anyhow::Context;
use async_trait::async_trait;
use axum::Router;
use bookstore_catalog::{CatalogStore, GenreAllowList};
use bookstore_kernel::{settings::CatalogSettings, InitCtx, Module};
use serde_json::json;

/// Catalog of books, served over the store it owns a handle to
pub struct BooksModule {
    store: Arc<CatalogStore>,
}

impl BooksModule {
    pub fn new(store: Arc<CatalogStore>) -> Self {
        Self { store }
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
            genres = ?self.store.allowed_genres(),
            "books module initialized"
        );
        Ok(())
    }

    fn routes(&self) -> Router {
        routes::router(self.store.clone())
    }

    fn openapi(&self) -> Option<serde_json::Value> {
        let error = |description: &str| {
            json!({
                "description": description,
                "content": {
                    "application/json": {
                        "schema": { "$ref": "#/components/schemas/ErrorResponse" }
                    }
                }
            })
        };
        let id_param = json!({
            "name": "id",
            "in": "path",
            "required": true,
            "schema": { "type": "string", "format": "uuid" }
        });
        let filter_param = |name: &str, description: &str| {
            json!({
                "name": name,
                "in": "query",
                "required": false,
                "description": description,
                "schema": { "type": "string" }
            })
        };

        let collection = json!({
            "get": {
                "summary": "List books",
                "tags": ["Books"],
                "parameters": [
                    filter_param("genre", "Exact genre, case-insensitive"),
                    filter_param("author", "Substring of the author, case-insensitive"),
                    filter_param("title", "Substring of the title, case-insensitive")
                ],
                "responses": {
                    "200": {
                        "description": "Books in insertion order",
                        "content": {
                            "application/json": {
                                "schema": {
                                    "type": "array",
                                    "items": { "$ref": "#/components/schemas/Book" }
                                }
                            }
                        }
                    }
                }
            },
            "post": {
                "summary": "Create a book",
                "tags": ["Books"],
                "requestBody": {
                    "required": true,
                    "content": {
                        "application/json": {
                            "schema": { "$ref": "#/components/schemas/CreateBook" }
                        }
                    }
                },
                "responses": {
                    "201": {
                        "description": "Book created",
                        "content": {
                            "application/json": {
                                "schema": { "$ref": "#/components/schemas/Book" }
                            }
                        }
                    },
                    "400": error("Invalid request or genre outside the allow-list"),
                    "409": error("A book with the same title and author exists")
                }
            }
        });
        let genres = json!({
            "get": {
                "summary": "List allowed genres",
                "tags": ["Books"],
                "responses": {
                    "200": {
                        "description": "Allowed genre labels",
                        "content": {
                            "application/json": {
                                "schema": { "type": "array", "items": { "type": "string" } }
                            }
                        }
                    }
                }
            }
        });
        let item = json!({
            "get": {
                "summary": "Get a book",
                "tags": ["Books"],
                "parameters": [id_param.clone()],
                "responses": {
                    "200": {
                        "description": "The book",
                        "content": {
                            "application/json": {
                                "schema": { "$ref": "#/components/schemas/Book" }
                            }
                        }
                    },
                    "404": error("Book not found")
                }
            },
            "put": {
                "summary": "Update a book",
                "tags": ["Books"],
                "parameters": [id_param.clone()],
                "requestBody": {
                    "required": true,
                    "content": {
                        "application/json": {
                            "schema": { "$ref": "#/components/schemas/UpdateBook" }
                        }
                    }
                },
                "responses": {
                    "204": { "description": "Book updated" },
                    "400": error("Invalid request or genre outside the allow-list"),
                    "404": error("Book not found"),
                    "409": error("Another book has the same title and author")
                }
            },
            "delete": {
                "summary": "Delete a book",
                "tags": ["Books"],
                "parameters": [id_param],
                "responses": {
                    "204": { "description": "Book deleted" },
                    "404": error("Book not found")
                }
            }
        });
        let schemas = json!({
            "Book": {
                "type": "object",
                "properties": {
                    "id": { "type": "string", "format": "uuid" },
                    "title": { "type": "string" },
                    "author": { "type": "string" },
                    "genre": { "type": "string" },
                    "price": { "type": "number", "minimum": 0 },
                    "stock": { "type": "integer", "minimum": 0 },
                    "createdAt": { "type": "string", "format": "date-time" },
                    "updatedAt": { "type": "string", "format": "date-time" }
                },
                "required": [
                    "id", "title", "author", "genre", "price", "stock", "createdAt", "updatedAt"
                ]
            },
            "CreateBook": {
                "type": "object",
                "properties": {
                    "title": { "type": "string", "minLength": 2, "maxLength": 120 },
                    "author": { "type": "string", "minLength": 2, "maxLength": 120 },
                    "genre": { "type": "string" },
                    "price": { "type": "number", "minimum": 0 },
                    "stock": { "type": "integer", "minimum": 0 }
                },
                "required": ["title", "author", "genre", "price", "stock"]
            },
            "UpdateBook": {
                "type": "object",
                "properties": {
                    "title": { "type": ["string", "null"], "minLength": 2, "maxLength": 120 },
                    "author": { "type": ["string", "null"], "minLength": 2, "maxLength": 120 },
                    "genre": { "type": ["string", "null"] },
                    "price": { "type": ["number", "null"], "minimum": 0 },
                    "stock": { "type": ["integer", "null"], "minimum": 0 }
                }
            }
        });

        Some(json!({
            "paths": {
                "/": collection,
                "/genres": genres,
                "/{id}": item
            },
            "components": { "schemas": schemas }
        }))
    }

    async fn start(&self, _ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        tracing::info!(
            module = self.name(),
            books = self.store.len(),
            "books module started"
        );
        Ok(())
    }

    async fn stop(&self) -> anyhow::Result<()> {
        tracing::info!(
            module = self.name(),
            books = self.store.len(),
            "books module stopped"
        );
        Ok(())
    }
}

/// Build the catalog store described by the `catalog` settings section
pub fn build_store(settings: &CatalogSettings) -> anyhow::Result<CatalogStore> {
    let genres = match &settings.genres {
        Some(labels) => GenreAllowList::new(labels.clone()),
        None => Ok(GenreAllowList::default()),
    };
    let genres = genres.context("invalid catalog.genres setting")?;
    Ok(CatalogStore::new(genres))
}

/// Create a new instance of the books module
pub fn create_module(store: Arc<CatalogStore>) -> Arc<dyn Module> {
    Arc::new(BooksModule::new(store))
}
