use std::sync::Arc;

use axum::{
    extract::DefaultBodyLimit,
    http::{
        header::{AUTHORIZATION, CONTENT_TYPE},
        HeaderValue, Method,
    },
    middleware,
    routing::{delete, get, post, put},
    Router,
};
use sqlx::PgPool;
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    services::ServeDir,
    trace::TraceLayer,
};

use crate::auth::{TokenIssuer, TokenVerifier};
use crate::config::AppConfig;
use crate::database::{CategoryRepository, CredentialStore, MovieRepository, PgCredentialStore};
use crate::handlers::{self, elevated, public};
use crate::middleware::require_admin;
use crate::services::{image_store::PUBLIC_PREFIX, ImageStore};

/// Everything a handler needs, built once at startup
#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    pub credentials: Arc<dyn CredentialStore>,
    pub issuer: Arc<TokenIssuer>,
    pub verifier: Arc<TokenVerifier>,
    pub images: Arc<ImageStore>,
    pub config: Arc<AppConfig>,
}

impl AppState {
    pub fn new(config: AppConfig, db: PgPool) -> Self {
        let ttl = config.security.token_ttl();

        Self {
            credentials: Arc::new(PgCredentialStore::new(db.clone())),
            issuer: Arc::new(TokenIssuer::new(&config.security.jwt_secret, ttl)),
            verifier: Arc::new(TokenVerifier::new(&config.security.jwt_secret)),
            images: Arc::new(ImageStore::new(&config.uploads)),
            config: Arc::new(config),
            db,
        }
    }

    pub fn categories(&self) -> CategoryRepository {
        CategoryRepository::new(self.db.clone())
    }

    pub fn movies(&self) -> MovieRepository {
        MovieRepository::new(self.db.clone())
    }
}

pub fn router(state: AppState) -> Router {
    let config = state.config.clone();

    let mut app = Router::new()
        .route("/health", get(handlers::health))
        .merge(public_routes())
        .merge(admin_routes(state.clone()))
        .nest_service(PUBLIC_PREFIX, ServeDir::new(state.images.dir()))
        .layer(DefaultBodyLimit::max(config.api.max_request_size_bytes))
        .layer(cors_layer(&config.security.cors_origins));

    if config.api.enable_request_logging {
        app = app.layer(TraceLayer::new_for_http());
    }

    app.with_state(state)
}

fn public_routes() -> Router<AppState> {
    Router::new()
        .route("/login", post(public::auth::login_post))
        .route("/usuario", post(public::auth::register_post))
        .route("/obtenerCategorias", get(public::categories::list))
        .route("/obtenerCategoria/:id", get(public::categories::show))
        .route("/obtenerPeliculas", get(public::movies::list))
        .route("/obtenerPelicula/:id", get(public::movies::show))
        .route("/obtenerPeliculasEnCategoria/:categoria", get(public::movies::in_category))
        .route("/buscarPelicula/:nombre", get(public::movies::search))
}

/// Routes behind the gate: verify, then authorize, then the handler
fn admin_routes(state: AppState) -> Router<AppState> {
    Router::new()
        // Users
        .route("/usuarios", get(elevated::users::list))
        .route(
            "/usuario/:id",
            get(elevated::users::show)
                .put(elevated::users::update)
                .delete(elevated::users::remove),
        )
        // Categories
        .route("/categoria/:nombre", post(elevated::categories::create))
        .route("/editarCategoria/:id", put(elevated::categories::rename))
        .route("/eliminarCategoria/:id", delete(elevated::categories::remove))
        // Movies
        .route("/crearPelicula", post(elevated::movies::create))
        .route("/actualizarPelicula/:id", put(elevated::movies::update))
        .route("/borrarPelicula/:id", delete(elevated::movies::remove))
        .route_layer(middleware::from_fn_with_state(state, require_admin))
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    if origins.iter().any(|origin| origin == "*") {
        return CorsLayer::permissive();
    }

    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin {:?}", origin);
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(allowed))
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE, Method::OPTIONS])
        .allow_headers([AUTHORIZATION, CONTENT_TYPE])
}
