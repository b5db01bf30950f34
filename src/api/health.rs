use std::sync::Arc;

use axum::{Extension, response::Json};
use serde_json::{Value, json};

use crate::session::Session;

pub async fn health(Extension(session): Extension<Arc<Session>>) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "authorized": session.is_authorized().await
    }))
}
