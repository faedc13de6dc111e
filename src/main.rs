mod category;
mod cleanup;
mod compositor;
mod config;
mod controller;
mod error;
mod routes;
mod session;
mod slots;
mod state;
mod store;

use std::sync::Arc;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt::init();

    let config = config::AppConfig::from_env().expect("invalid configuration");

    let store = store::UploadThingStore::new(&config.file_host).expect("file store init failed");
    let images = compositor::source::HttpImageSource::new(config.allowed_image_hosts.clone(), config.file_host.timeouts)
        .expect("image source init failed");
    let state = state::AppState::new(Arc::new(store), Arc::new(images));

    // Pick up files left over from an earlier run (non-fatal).
    match state.session.lock().await.load_gallery().await {
        Ok(filled) => tracing::info!(filled, "initial gallery loaded"),
        Err(e) => tracing::warn!(error = %e, "initial gallery load failed; starting empty"),
    }

    let app = routes::app(state);
    let port = config.port;
    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{port}"))
        .await
        .expect("failed to bind");

    tracing::info!(%port, hosts = ?config.allowed_image_hosts, "collage listening");
    axum::serve(listener, app).await.expect("server failed");
}
