use crate::{
    api::handlers::health,
    storage,
    tasks::{OwnedTasks, PgTaskStore},
    users::{PgUserStore, UserStore},
};
use anyhow::{Context, Result, anyhow};
use axum::{
    Extension, Router,
    body::Body,
    extract::MatchedPath,
    http::{
        HeaderName, HeaderValue, Method, Request,
        header::{AUTHORIZATION, CONTENT_TYPE},
    },
    routing::options,
};
use std::sync::Arc;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    request_id::PropagateRequestIdLayer,
    set_header::SetRequestHeaderLayer,
    trace::TraceLayer,
};
use tracing::{Span, error, info, info_span};
use ulid::Ulid;
use url::Url;
use utoipa_axum::router::OpenApiRouter;

pub(crate) mod handlers;
// OpenAPI router wiring and route registration live in openapi.rs.
mod openapi;

pub use handlers::auth::{AuthConfig, AuthState};
pub use openapi::openapi;

/// Build the API router with all documented routes registered.
#[must_use]
pub fn router() -> OpenApiRouter {
    openapi::api_router()
}

/// Assemble the full application: documented routes, middleware, and the
/// shared state every handler pulls from `Extension`.
#[must_use]
pub fn app(
    auth_state: Arc<AuthState>,
    users: Arc<dyn UserStore>,
    tasks: OwnedTasks,
    cors_origin: Option<HeaderValue>,
) -> Router {
    // The OpenAPI document is served separately by the `openapi` binary.
    let (router, _openapi) = router().split_for_parts();
    router
        .route("/health", options(health::health))
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestHeaderLayer::if_not_present(
                    HeaderName::from_static("x-request-id"),
                    |_req: &_| HeaderValue::from_str(Ulid::new().to_string().as_str()).ok(),
                ))
                .layer(PropagateRequestIdLayer::new(HeaderName::from_static(
                    "x-request-id",
                )))
                .layer(TraceLayer::new_for_http().make_span_with(make_span))
                .layer(cors_layer(cors_origin))
                .layer(Extension(auth_state))
                .layer(Extension(users))
                .layer(Extension(tasks)),
        )
}

/// Start the server
/// # Errors
/// Return error if the auth settings are rejected or the server fails to start
pub async fn new(
    port: u16,
    dsn: &str,
    auth_config: &AuthConfig,
    cors_origin: Option<&str>,
) -> Result<()> {
    // Refuse weak token or hashing settings before touching the database.
    let auth_state = Arc::new(AuthState::new(auth_config)?);
    let cors_origin = cors_origin.map(frontend_origin).transpose()?;

    let pool = storage::connect(dsn).await?;
    let users: Arc<dyn UserStore> = Arc::new(PgUserStore::new(pool.clone()));
    let tasks = OwnedTasks::new(Arc::new(PgTaskStore::new(pool)));

    let app = app(auth_state, users, tasks, cors_origin);

    let listener = TcpListener::bind(format!("::0:{port}")).await?;

    info!("Listening on [::]:{}", port);

    axum::serve(listener, app.into_make_service())
        .with_graceful_shutdown(async {
            if let Err(err) = tokio::signal::ctrl_c().await {
                error!("Failed to listen for shutdown signal: {err}");
            }
            info!("Gracefully shutdown");
        })
        .await?;

    Ok(())
}

fn make_span(request: &Request<Body>) -> Span {
    let request_id = request
        .headers()
        .get("x-request-id")
        .and_then(|val| val.to_str().ok())
        .unwrap_or("none");
    let matched_path = request
        .extensions()
        .get::<MatchedPath>()
        .map_or_else(|| request.uri().path(), MatchedPath::as_str);

    info_span!(
        "http.request",
        http.method = %request.method(),
        http.route = matched_path,
        request_id
    )
}

fn cors_layer(origin: Option<HeaderValue>) -> CorsLayer {
    let cors = CorsLayer::new()
        .allow_headers([CONTENT_TYPE, AUTHORIZATION])
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE]);
    // Without a configured origin no cross-origin request is allowed.
    match origin {
        Some(origin) => cors.allow_origin(AllowOrigin::exact(origin)),
        None => cors,
    }
}

fn frontend_origin(frontend_url: &str) -> Result<HeaderValue> {
    let parsed =
        Url::parse(frontend_url).with_context(|| format!("Invalid CORS origin: {frontend_url}"))?;
    let host = parsed
        .host_str()
        .ok_or_else(|| anyhow!("CORS origin must include a valid host: {frontend_url}"))?;
    let port = parsed
        .port()
        .map_or_else(String::new, |port| format!(":{port}"));
    let origin = format!("{}://{}{}", parsed.scheme(), host, port);
    HeaderValue::from_str(&origin).context("Failed to build CORS origin header")
}
