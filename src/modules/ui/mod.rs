//! Browser front end: a single page driving the books API.

use std::sync::Arc;

use async_trait::async_trait;
use axum::{response::Html, routing::get, Router};
use cozy_kernel::Module;

const INDEX_HTML: &str = include_str!("index.html");

pub struct UiModule;

#[async_trait]
impl Module for UiModule {
    fn name(&self) -> &'static str {
        "ui"
    }

    fn public_routes(&self) -> Option<Router> {
        Some(Router::new().route("/", get(index)))
    }
}

async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

pub fn create_module() -> Arc<dyn Module> {
    Arc::new(UiModule)
}
