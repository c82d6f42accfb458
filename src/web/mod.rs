//! JSON API.

pub mod handlers;

use crate::auth::{self, AuthConfig, AuthError, AuthService, JwtAuth};
use crate::config::Config;
use crate::error::Error;
use crate::models::{Affectation, Company, Driver, Employee, UserAccount};
use crate::store::{DocumentStore, PlanningRepository, Repository};
use axum::{
    body::Body,
    extract::DefaultBodyLimit,
    http::{Request, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    routing::{get, post, put},
    Json, Router,
};
use serde_json::json;
use std::sync::Arc;
use tokio::sync::RwLock;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::error;

use self::handlers::{affectations, auth as auth_handlers, planning, records, reports, users};

/// Routes reachable without a session
const PUBLIC_PATHS: &[&str] = &["/health", "/api/auth/login"];

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<RwLock<Config>>,
    /// Auth service for JWT operations
    pub auth_service: Arc<AuthService>,
    pub planning: PlanningRepository,
    pub employees: Repository<Employee>,
    pub drivers: Repository<Driver>,
    pub companies: Repository<Company>,
    pub affectations: Repository<Affectation>,
    pub users: Repository<UserAccount>,
}

impl AppState {
    pub fn new(config: Config, store: Arc<dyn DocumentStore>) -> Self {
        let users = Repository::new(Arc::clone(&store));
        let auth_service = Arc::new(AuthService::new(AuthConfig::from(&config), users.clone()));

        Self {
            config: Arc::new(RwLock::new(config)),
            auth_service,
            planning: PlanningRepository::new(Arc::clone(&store)),
            employees: Repository::new(Arc::clone(&store)),
            drivers: Repository::new(Arc::clone(&store)),
            companies: Repository::new(Arc::clone(&store)),
            affectations: Repository::new(Arc::clone(&store)),
            users,
        }
    }
}

/// Error returned by API handlers
#[derive(Debug)]
pub enum ApiError {
    Auth(AuthError),
    App(Error),
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        ApiError::Auth(err)
    }
}

impl From<Error> for ApiError {
    fn from(err: Error) -> Self {
        ApiError::App(err)
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::Auth(err) => err.into_response(),
            ApiError::App(err) => err.into_response(),
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = match &self {
            Error::NotFound(_) => StatusCode::NOT_FOUND,
            Error::Validation(_) => StatusCode::BAD_REQUEST,
            Error::Auth(_) => StatusCode::UNAUTHORIZED,
            _ => {
                error!("Request failed: {:?}", self);
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}

/// Authentication middleware
async fn auth_middleware(
    req: Request<Body>,
    next: Next,
    auth_service: Arc<AuthService>,
) -> Result<Response, AuthError> {
    // Public routes are always allowed
    if PUBLIC_PATHS.contains(&req.uri().path()) {
        return Ok(next.run(req).await);
    }

    let (parts, body) = req.into_parts();
    let token = auth::extract_token(&parts)?;
    let claims = auth_service.session(&token).await?;

    // Reconstruct the request with auth data
    let mut req = Request::from_parts(parts, body);
    req.extensions_mut().insert(JwtAuth { claims });

    Ok(next.run(req).await)
}

/// Build the API router
pub fn build_router(state: AppState) -> Router {
    // Create middleware with auth service
    let auth_service_for_middleware = Arc::clone(&state.auth_service);
    let auth_middleware = move |req: Request<Body>, next: Next| {
        auth_middleware(req, next, Arc::clone(&auth_service_for_middleware))
    };

    Router::new()
        .route("/health", get(auth_handlers::health_handler))
        .route("/api/auth/login", post(auth_handlers::login_handler))
        .route("/api/auth/me", get(auth_handlers::me_handler))
        .route(
            "/api/planning",
            get(planning::get_planning)
                .put(planning::import_planning)
                .delete(planning::clear_planning),
        )
        .route(
            "/api/planning/filters",
            get(planning::get_filters).put(planning::save_filters),
        )
        .route("/api/planning/dashboard", get(planning::dashboard))
        .route("/api/planning/missing", get(planning::missing_employees))
        .route("/api/planning/filtrer-agents", post(planning::filter_employees))
        .route(
            "/api/agents",
            get(records::list_records::<Employee>).post(records::create_record::<Employee>),
        )
        .route(
            "/api/agents/{id}",
            put(records::update_record::<Employee>).delete(records::delete_record::<Employee>),
        )
        .route(
            "/api/chauffeurs",
            get(records::list_records::<Driver>).post(records::create_record::<Driver>),
        )
        .route(
            "/api/chauffeurs/{id}",
            put(records::update_record::<Driver>).delete(records::delete_record::<Driver>),
        )
        .route(
            "/api/societes",
            get(records::list_records::<Company>).post(records::create_record::<Company>),
        )
        .route(
            "/api/societes/{id}",
            put(records::update_record::<Company>).delete(records::delete_record::<Company>),
        )
        .route(
            "/api/affectations",
            get(affectations::list_affectations).post(affectations::create_affectation),
        )
        .route("/api/affectations/recap", get(affectations::recap))
        .route("/api/affectations/validation", get(affectations::validation))
        .route("/api/affectations/heures", get(affectations::hours))
        .route(
            "/api/affectations/{id}",
            put(affectations::update_affectation).delete(affectations::delete_affectation),
        )
        .route(
            "/api/affectations/{id}/paiement",
            put(affectations::update_payment_status),
        )
        .route(
            "/api/affectations/{id}/repartition",
            get(affectations::company_split),
        )
        .route("/api/rapports/financier", get(reports::financial))
        .route(
            "/api/config/pricing",
            get(reports::get_pricing).put(reports::update_pricing),
        )
        .route("/api/users", get(users::list_users).post(users::create_user))
        .route("/api/users/{id}", axum::routing::delete(users::delete_user))
        // Apply auth middleware
        .layer(axum::middleware::from_fn(auth_middleware))
        // Other middlewares
        .layer(DefaultBodyLimit::max(10 * 1024 * 1024)) // 10MB limit
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
