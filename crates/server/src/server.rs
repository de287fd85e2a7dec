use axum::{
    Json, Router,
    extract::DefaultBodyLimit,
    http::{HeaderName, HeaderValue},
    routing::{get, post},
};
use axum_extra::headers::{Error as AxumError, Header};
use serde::Serialize;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use std::sync::Arc;

use crate::{campaigns, contributions};
use engine::Engine;

static IDEMPOTENCY_HEADER: HeaderName = HeaderName::from_static("idempotency-key");

const DEFAULT_MAX_BODY_BYTES: usize = 10 * 1024 * 1024;

#[derive(Clone)]
pub struct ServerState {
    pub engine: Arc<Engine>,
}

/// HTTP-level knobs that do not belong to the engine.
#[derive(Clone, Debug)]
pub struct ServerOptions {
    /// Allowed CORS origins. Empty allows any origin.
    pub cors_origins: Vec<String>,
    pub max_body_bytes: usize,
}

impl Default for ServerOptions {
    fn default() -> Self {
        Self {
            cors_origins: Vec::new(),
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
        }
    }
}

/// `TypedHeader` for the client-chosen retry key of a contribution.
///
/// When present it takes precedence over `idempotencyKey` in the body.
#[derive(Debug)]
pub(crate) struct IdempotencyKey(pub(crate) String);

impl Header for IdempotencyKey {
    fn name() -> &'static HeaderName {
        &IDEMPOTENCY_HEADER
    }

    fn decode<'i, I>(values: &mut I) -> Result<Self, AxumError>
    where
        Self: Sized,
        I: Iterator<Item = &'i HeaderValue>,
    {
        let value = values.next().ok_or_else(AxumError::invalid)?;
        let Ok(value) = value.to_str() else {
            return Err(AxumError::invalid());
        };

        Ok(IdempotencyKey(value.to_string()))
    }

    fn encode<E: Extend<HeaderValue>>(&self, values: &mut E) {
        match HeaderValue::from_str(&self.0) {
            Ok(value) => values.extend(std::iter::once(value)),
            Err(_) => tracing::error!("failed to encode idempotency-key header"),
        }
    }
}

#[derive(Serialize)]
struct Health {
    status: &'static str,
}

async fn health() -> Json<Health> {
    Json(Health { status: "ok" })
}

fn cors(origins: &[String]) -> CorsLayer {
    if origins.is_empty() || origins.iter().any(|o| o == "*") {
        return CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any);
    }

    let allowed = origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("ignoring invalid CORS origin {origin:?}");
                None
            }
        })
        .collect::<Vec<_>>();

    CorsLayer::new()
        .allow_origin(allowed)
        .allow_methods(Any)
        .allow_headers(Any)
}

pub fn router(engine: Arc<Engine>, options: &ServerOptions) -> Router {
    let state = ServerState { engine };

    let api = Router::new()
        .route(
            "/campaigns",
            post(campaigns::create).get(campaigns::list),
        )
        .route(
            "/campaigns/{id}",
            get(campaigns::get).put(campaigns::update),
        )
        .route("/campaigns/{id}/contribute", post(contributions::contribute))
        .route(
            "/campaigns/{id}/contributions",
            get(contributions::list_for_campaign),
        )
        .route("/contributions", get(contributions::list));

    Router::new()
        .route("/health", get(health))
        .nest("/api", api)
        .layer(DefaultBodyLimit::max(options.max_body_bytes))
        .layer(cors(&options.cors_origins))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Serves the API on `listener` until `shutdown` resolves, then drains
/// in-flight requests.
pub async fn run_with_listener<F>(
    engine: Engine,
    listener: tokio::net::TcpListener,
    options: ServerOptions,
    shutdown: F,
) -> Result<(), std::io::Error>
where
    F: Future<Output = ()> + Send + 'static,
{
    let addr = listener.local_addr()?;
    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, router(Arc::new(engine), &options))
        .with_graceful_shutdown(shutdown)
        .await
}
