//! Router assembly and server lifecycle.

use crate::config::{ServerSettings, Settings};
use crate::handlers::{
    chat::chat,
    health::health_check,
    language::change_language,
    metrics::metrics,
    pages::{chatbot, disease, index},
};
use crate::middleware::session_context_middleware;
use crate::services::{ChatRelay, CompletionProvider, DiseaseCatalog, GroqProvider, Translations};
use crate::AppState;
use axum::{
    extract::DefaultBodyLimit,
    middleware::from_fn,
    routing::{get, post},
    Router,
};
use secrecy::ExposeSecret;
use service_core::error::AppError;
use service_core::middleware::{
    metrics_middleware, request_id_middleware, security_headers_middleware, REQUEST_ID_HEADER,
};
use sha2::{Digest, Sha512};
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::signal;
use tower_http::compression::CompressionLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tower_sessions::cookie::Key;
use tower_sessions::{Expiry, MemoryStore, SessionManagerLayer};

/// Stretch the configured secret to the 64 bytes cookie signing needs.
fn session_key(server: &ServerSettings) -> Key {
    let digest = Sha512::digest(server.session_secret.expose_secret().as_bytes());
    Key::from(digest.as_slice())
}

pub fn build_router(state: AppState, settings: &Settings) -> Router {
    let session_layer = SessionManagerLayer::new(MemoryStore::default())
        .with_secure(settings.server.secure_cookies)
        .with_expiry(Expiry::OnSessionEnd)
        .with_signed(session_key(&settings.server));

    let upload_limit = match settings.chat.max_upload_bytes {
        Some(limit) => DefaultBodyLimit::max(limit),
        None => DefaultBodyLimit::disable(),
    };

    Router::new()
        .route("/", get(index))
        .route("/change_language/:lang", get(change_language))
        .route("/disease/:disease_name", get(disease))
        .route("/chatbot", get(chatbot))
        .route("/api/chat", post(chat).layer(upload_limit))
        .route("/health", get(health_check))
        .route("/metrics", get(metrics))
        .nest_service("/static", ServeDir::new(&settings.server.static_dir))
        .layer(from_fn(session_context_middleware))
        .layer(session_layer)
        .layer(from_fn(metrics_middleware))
        .layer(from_fn(security_headers_middleware))
        .layer(CompressionLayer::new())
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &axum::http::Request<_>| {
                let request_id = request
                    .headers()
                    .get(REQUEST_ID_HEADER)
                    .and_then(|value| value.to_str().ok())
                    .unwrap_or("-");

                tracing::info_span!(
                    "http_request",
                    request_id = %request_id,
                    method = %request.method(),
                    uri = %request.uri(),
                    version = ?request.version(),
                )
            }),
        )
        .layer(from_fn(request_id_middleware))
        .with_state(state)
}

/// Application container for managing server lifecycle.
pub struct Application {
    port: u16,
    listener: TcpListener,
    router: Router,
}

impl Application {
    /// Build with the Groq provider described by `settings.chat`.
    pub async fn build(settings: Settings) -> Result<Self, AppError> {
        let provider = GroqProvider::new(&settings.chat)
            .map_err(|e| AppError::Config(anyhow::Error::new(e)))?;

        if !provider.has_api_key() {
            tracing::warn!(
                "{} is not set; chat requests will be rejected upstream",
                crate::config::API_KEY_ENV
            );
        }

        Self::build_with_provider(settings, Arc::new(provider)).await
    }

    /// Build with any completion backend. Port 0 binds a random port.
    pub async fn build_with_provider(
        settings: Settings,
        provider: Arc<dyn CompletionProvider>,
    ) -> Result<Self, AppError> {
        let catalog = DiseaseCatalog::embedded()
            .map_err(|e| AppError::Config(anyhow::Error::new(e)))?;
        let translations = Translations::embedded()
            .map_err(|e| AppError::Config(anyhow::Error::new(e)))?;

        let state = AppState::new(
            Arc::new(catalog),
            Arc::new(translations),
            Arc::new(ChatRelay::new(provider)),
        );
        let router = build_router(state, &settings);

        let address = format!("{}:{}", settings.server.host, settings.server.port);
        let listener = TcpListener::bind(&address).await.map_err(|e| {
            tracing::error!("Failed to bind TCP listener to {}: {}", address, e);
            AppError::from(e)
        })?;
        let port = listener.local_addr()?.port();

        tracing::info!("medinfo-web listening on {}:{}", settings.server.host, port);

        Ok(Self {
            port,
            listener,
            router,
        })
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub async fn run_until_stopped(self) -> std::io::Result<()> {
        axum::serve(self.listener, self.router)
            .with_graceful_shutdown(shutdown_signal())
            .await
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
