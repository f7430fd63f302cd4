/// Application state and router builder
///
/// # Example
///
/// ```no_run
/// use notegreen_api::{app::AppState, config::Config};
/// use notegreen_shared::db::pool::create_pool;
///
/// # async fn example() -> anyhow::Result<()> {
/// let config = Config::from_env()?;
/// let pool = create_pool(config.database.pool_config()).await?;
/// let state = AppState::new(pool, config);
/// let app = notegreen_api::app::build_router(state);
/// # Ok(())
/// # }
/// ```

use crate::{config::Config, middleware::security::SecurityHeadersLayer, routes};
use axum::{
    http::{header, HeaderValue, Method},
    routing::{get, post},
    Router,
};
use sqlx::SqlitePool;
use std::{path::Path, sync::Arc, time::Duration};
use tower_http::{
    compression::CompressionLayer,
    cors::CorsLayer,
    services::{ServeDir, ServeFile},
    set_header::SetResponseHeaderLayer,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

/// Shared application state
///
/// Cloned for each request handler via Axum's `State` extractor.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub db: SqlitePool,

    /// Application configuration
    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(db: SqlitePool, config: Config) -> Self {
        Self {
            db,
            config: Arc::new(config),
        }
    }
}

/// Builds the complete Axum router with all routes and middleware
///
/// # Architecture
///
/// ```text
/// /
/// ├── /health                     # Health check
/// ├── /api/
/// │   ├── /notes                  # GET (?q=), POST
/// │   │   └── /:id                # GET, PUT, DELETE
/// │   ├── /folders                # GET, POST
/// │   │   └── /:id                # PUT, DELETE
/// │   │       └── /notes          # GET (`null` = unfiled notes)
/// │   ├── /tags                   # GET, POST
/// │   │   └── /:id                # PUT, DELETE
/// │   │       └── /notes          # GET
/// │   └── /users                  # POST (register)
/// │       └── /login              # POST
/// └── /*                          # Web client (when STATIC_DIR is set)
/// ```
///
/// Unknown `/api` paths get a JSON 404.
///
/// # Middleware Stack
///
/// Applied in order (bottom to top):
/// 1. Security headers
/// 2. CORS
/// 3. Logging (tower-http TraceLayer)
/// 4. Response compression
pub fn build_router(state: AppState) -> Router {
    let note_routes = Router::new()
        .route(
            "/",
            get(routes::notes::list_notes).post(routes::notes::create_note),
        )
        .route(
            "/:id",
            get(routes::notes::get_note)
                .put(routes::notes::update_note)
                .delete(routes::notes::delete_note),
        );

    let folder_routes = Router::new()
        .route(
            "/",
            get(routes::folders::list_folders).post(routes::folders::create_folder),
        )
        .route(
            "/:id",
            axum::routing::put(routes::folders::update_folder)
                .delete(routes::folders::delete_folder),
        )
        .route("/:id/notes", get(routes::folders::list_folder_notes));

    let tag_routes = Router::new()
        .route("/", get(routes::tags::list_tags).post(routes::tags::create_tag))
        .route(
            "/:id",
            axum::routing::put(routes::tags::update_tag).delete(routes::tags::delete_tag),
        )
        .route("/:id/notes", get(routes::tags::list_tag_notes));

    let user_routes = Router::new()
        .route("/", post(routes::users::register))
        .route("/login", post(routes::users::login));

    let api_routes = Router::new()
        .nest("/notes", note_routes)
        .nest("/folders", folder_routes)
        .nest("/tags", tag_routes)
        .nest("/users", user_routes)
        .fallback(routes::api_not_found);

    let mut router = Router::new()
        .route("/health", get(routes::health::health_check))
        .nest("/api", api_routes);

    if let Some(static_dir) = &state.config.api.static_dir {
        router = router.merge(static_routes(static_dir));
    }

    router
        .layer(CompressionLayer::new())
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(cors_layer(&state.config))
        .layer(SecurityHeadersLayer::new(state.config.api.production))
        .with_state(state)
}

/// Serves the built web client
///
/// The service worker and manifest are revalidated on every load so a new
/// cache version reaches clients; other paths fall back to `index.html` so
/// client-side routes survive a reload.
fn static_routes(static_dir: &Path) -> Router<AppState> {
    let no_cache =
        SetResponseHeaderLayer::overriding(header::CACHE_CONTROL, HeaderValue::from_static("no-cache"));

    let spa = ServeDir::new(static_dir).fallback(ServeFile::new(static_dir.join("index.html")));

    Router::new()
        .route_service("/sw.js", ServeFile::new(static_dir.join("sw.js")))
        .route_service("/manifest.json", ServeFile::new(static_dir.join("manifest.json")))
        .route_layer(no_cache)
        .fallback_service(spa)
}

fn cors_layer(config: &Config) -> CorsLayer {
    if config.allows_any_origin() {
        return CorsLayer::permissive();
    }

    let origins: Vec<HeaderValue> = config
        .api
        .cors_origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE])
        .max_age(Duration::from_secs(3600))
}
