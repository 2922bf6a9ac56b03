use std::sync::Arc;

use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::config::AppConfig;
use crate::database::{DatabaseError, Document, StoreHandle};
use crate::filter::{FindQuery, SortDirection, SortKey, ID_FIELD};
use crate::handlers::{protected, public};
use crate::middleware::jwt_auth_middleware;
use crate::services::{ConsumeService, ControlService, CreateService, GradeService, TestRunService};

/// Reference documents read once at startup and served by `/api/config`
#[derive(Debug, Clone, Default)]
pub struct ReferenceData {
    pub enumerators: Vec<Document>,
    pub versions: Vec<Document>,
}

impl ReferenceData {
    pub async fn load(store: &StoreHandle, config: &AppConfig) -> Result<Self, DatabaseError> {
        let all = FindQuery::all().sort(vec![SortKey::new(ID_FIELD, SortDirection::Asc)]);
        let enumerators = store.find(&config.collections.enumerators, &all).await?;
        let versions = store.find(&config.collections.versions, &all).await?;
        tracing::info!(
            "Loaded {} enumerators and {} versions",
            enumerators.len(),
            versions.len()
        );
        Ok(Self { enumerators, versions })
    }
}

/// Everything a handler needs, constructed once in `main` and cloned per request
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub store: StoreHandle,
    pub reference: Arc<ReferenceData>,
    pub controls: Arc<ControlService>,
    pub creates: Arc<CreateService>,
    pub consumes: Arc<ConsumeService>,
    pub grades: Arc<GradeService>,
    pub testruns: Arc<TestRunService>,
}

impl AppState {
    pub fn new(config: AppConfig, store: StoreHandle, reference: ReferenceData) -> Self {
        let names = &config.collections;
        Self {
            controls: Arc::new(ControlService::new(store.clone(), &names.control)),
            creates: Arc::new(CreateService::new(store.clone(), &names.create)),
            consumes: Arc::new(ConsumeService::new(store.clone(), &names.consume)),
            grades: Arc::new(GradeService::new(store.clone(), &names.grade)),
            testruns: Arc::new(TestRunService::new(store.clone(), &names.testrun)),
            reference: Arc::new(reference),
            store,
            config: Arc::new(config),
        }
    }

    /// Build the state after reading reference data from the store
    pub async fn load(config: AppConfig, store: StoreHandle) -> Result<Self, DatabaseError> {
        let reference = ReferenceData::load(&store, &config).await?;
        Ok(Self::new(config, store, reference))
    }
}

pub fn router(state: AppState) -> Router {
    let mut app = Router::new()
        // Public
        .route("/", get(public::health::root))
        .route("/health", get(public::health::health));

    if state.config.security.enable_login {
        app = app.route("/dev-login", post(public::dev_login::post));
    }

    let app = app
        .merge(api_routes(state.clone()))
        .layer(TraceLayer::new_for_http());

    let app = if state.config.server.enable_cors {
        app.layer(CorsLayer::permissive())
    } else {
        app
    };

    app.with_state(state)
}

fn api_routes(state: AppState) -> Router<AppState> {
    use protected::{config, consume, control, create, grade, testrun};

    Router::new()
        .route("/api/config", get(config::get))
        .route("/api/control", get(control::list).post(control::post))
        .route("/api/control/:id", get(control::get).patch(control::patch))
        .route("/api/create", get(create::list).post(create::post))
        .route("/api/create/:id", get(create::get))
        .route("/api/consume", get(consume::list))
        .route("/api/consume/:id", get(consume::get))
        .route("/api/grade", get(grade::list))
        .route("/api/grade/:id", get(grade::get))
        .route("/api/testrun", get(testrun::list).post(testrun::post))
        .route("/api/testrun/:id", get(testrun::get).patch(testrun::patch))
        .route_layer(middleware::from_fn_with_state(state, jwt_auth_middleware))
}
