use axum::{
    Extension, Router,
    routing::{get, put},
};
use std::{net::SocketAddr, sync::Arc};

use crate::{Res, api, info, session::Session};

/// Routes of the proxy, bound to one shared session.
pub fn router(session: Arc<Session>) -> Router {
    Router::new()
        .route("/health", get(api::health))
        .route("/spotify", get(api::snapshot))
        .route("/spotify/auth", get(api::authorize))
        .route("/spotify/callback", get(api::callback))
        .route("/spotify/pause", get(api::pause))
        .route("/spotify/play/{track_id}", put(api::play))
        .layer(Extension(session))
}

pub async fn start_api_server(session: Arc<Session>, addr: SocketAddr) -> Res<()> {
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Server running on {}", listener.local_addr()?);
    axum::serve(listener, router(session)).await?;
    Ok(())
}
