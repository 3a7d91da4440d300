use crate::config::Config;
use crate::dataset::Dataset;
use crate::error::{MapError, Result};
use crate::filter::FilterState;
use crate::grouping::LayerId;
use crate::infra::leaflet::render_page;
use crate::infra::scene::SceneRenderer;
use crate::types::RestaurantRecord;
use crate::view::MapView;
use axum::{
    extract::{Query, State},
    http::{Method, StatusCode},
    response::{Html, IntoResponse, Json, Response},
    routing::get,
    Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tracing::{info, warn};

#[derive(Clone)]
pub struct AppState {
    pub dataset: Arc<Dataset>,
    pub page: Arc<String>,
}

impl AppState {
    pub fn new(dataset: Arc<Dataset>, config: &Config) -> Result<Self> {
        let page = render_page(dataset.clone(), &config.map)?;
        Ok(Self {
            dataset,
            page: Arc::new(page),
        })
    }
}

/// Query of `/api/restaurants`. Layer lists are comma-separated layer names.
#[derive(Debug, Default, Deserialize)]
pub struct RestaurantQuery {
    pub cuisine: Option<String>,
    pub show: Option<String>,
    pub hide: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct RestaurantsResponse {
    pub filter: FilterState,
    pub count: usize,
    pub restaurants: Vec<RestaurantRecord>,
}

#[derive(Debug, Serialize)]
pub struct LayerSummary {
    pub name: &'static str,
    pub color: &'static str,
    pub shown_by_default: bool,
    pub restaurants: Vec<String>,
}

struct ApiError(MapError);

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match self.0 {
            MapError::UnknownLayer(_) => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        warn!("Request failed: {}", self.0);
        (
            status,
            Json(serde_json::json!({ "error": self.0.to_string() })),
        )
            .into_response()
    }
}

impl From<MapError> for ApiError {
    fn from(err: MapError) -> Self {
        Self(err)
    }
}

fn parse_layers(list: Option<&str>) -> Result<Vec<LayerId>> {
    list.map(|list| {
        list.split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(|s| s.parse::<LayerId>())
            .collect()
    })
    .unwrap_or_else(|| Ok(Vec::new()))
}

async fn health() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "healthy",
        "service": "dining-map",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

async fn index(State(state): State<AppState>) -> Html<String> {
    Html((*state.page).clone())
}

async fn restaurants(
    State(state): State<AppState>,
    Query(query): Query<RestaurantQuery>,
) -> std::result::Result<Json<RestaurantsResponse>, ApiError> {
    let show = parse_layers(query.show.as_deref())?;
    let hide = parse_layers(query.hide.as_deref())?;

    // One view per request; nothing is shared between handlers
    let mut view = MapView::init(state.dataset.clone(), SceneRenderer::new())?;
    for layer in show {
        view.set_layer_visible(layer, true)?;
    }
    for layer in hide {
        view.set_layer_visible(layer, false)?;
    }
    if let Some(tag) = query.cuisine.as_deref() {
        view.apply_filter(tag);
    }

    let restaurants: Vec<RestaurantRecord> = view.visible_records().cloned().collect();
    Ok(Json(RestaurantsResponse {
        filter: view.filter_state().clone(),
        count: restaurants.len(),
        restaurants,
    }))
}

async fn layers(State(state): State<AppState>) -> Json<Vec<LayerSummary>> {
    let groups = crate::grouping::CategoryGroups::build(&state.dataset);
    let summaries = LayerId::all()
        .map(|layer| LayerSummary {
            name: layer.name(),
            color: layer.color(),
            shown_by_default: layer.shown_by_default(),
            restaurants: groups
                .layer(layer)
                .iter()
                .filter_map(|id| state.dataset.get(*id))
                .map(|r| r.name.clone())
                .collect(),
        })
        .collect();
    Json(summaries)
}

pub fn create_server(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET])
        .allow_headers(Any);

    Router::new()
        .route("/", get(index))
        .route("/health", get(health))
        .route("/api/restaurants", get(restaurants))
        .route("/api/layers", get(layers))
        .layer(cors)
        .with_state(state)
}

/// Bind and serve until the process is stopped.
pub async fn run_server(config: &Config, dataset: Arc<Dataset>) -> Result<()> {
    if let Some(port) = config.server.metrics_port {
        crate::metrics::init_metrics(&config.server.host, port);
    }

    let state = AppState::new(dataset, config)?;
    let app = create_server(state);

    let bind_addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    info!("Dining map listening on http://{}", bind_addr);
    axum::serve(listener, app).await?;
    Ok(())
}
