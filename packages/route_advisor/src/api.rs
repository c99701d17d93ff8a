//! HTTP surface of the route advisor. Handlers share a single read-only
//! [`RoadGraph`], so requests never contend with one another.

use std::collections::BTreeMap;
use std::sync::Arc;

use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::http::{Method, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::json;
use tower_http::cors::{Any, CorsLayer};
use tracing::{debug, error, info};

use crate::common::config::UserRouteRequest;
use crate::common::graph_data::Coordinates;
use crate::common::road_graph::RoadGraph;
use crate::error::RouteError;
use crate::routing::astar::find_route;
use crate::routing::breakdown::RouteResult;
use crate::routing::cost::CostModel;

#[derive(Clone)]
pub struct AppState {
    pub graph: Arc<RoadGraph>,
    pub costs: CostModel,
}

#[derive(Debug, PartialEq)]
pub enum ApiError {
    BadRequest(String),
    NotFound(String),
    InternalServerError(String),
}

impl From<RouteError> for ApiError {
    fn from(error: RouteError) -> Self {
        match error {
            RouteError::UnknownCity { .. } => {
                ApiError::BadRequest(error.to_string())
            }
            RouteError::Unreachable { .. } => {
                ApiError::NotFound("No route found".to_string())
            }
            other => ApiError::InternalServerError(other.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::BadRequest(message) => (StatusCode::BAD_REQUEST, message),
            ApiError::NotFound(message) => (StatusCode::NOT_FOUND, message),
            ApiError::InternalServerError(message) => {
                error!(error = %message, "request failed");
                (StatusCode::INTERNAL_SERVER_ERROR, message)
            }
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}

async fn health_check() -> impl IntoResponse {
    let msg = "Hello World!";

    let json_response = json!({
        "status": "success",
        "message": msg
    });

    Json(json_response)
}

async fn get_cities(State(state): State<AppState>) -> Json<Vec<String>> {
    let cities = state
        .graph
        .city_names()
        .into_iter()
        .map(str::to_string)
        .collect();

    Json(cities)
}

async fn get_city_coords(
    State(state): State<AppState>,
) -> Json<BTreeMap<String, Coordinates>> {
    let coords = state
        .graph
        .cities()
        .map(|city| {
            (
                city.name.clone(),
                Coordinates {
                    lat: city.lat,
                    lon: city.lon,
                },
            )
        })
        .collect();

    Json(coords)
}

fn missing_endpoints() -> ApiError {
    ApiError::BadRequest("Missing 'start' or 'end'".to_string())
}

/// Bodies which are absent, not JSON, or of the wrong shape are treated the
/// same as a request with no cities in it
async fn post_route(
    State(state): State<AppState>,
    payload: Result<Json<UserRouteRequest>, JsonRejection>,
) -> Result<Json<RouteResult>, ApiError> {
    let request = match payload {
        Ok(Json(request)) => request,
        Err(rejection) => {
            debug!(reason = %rejection, "unreadable route request");
            UserRouteRequest::default()
        }
    };

    let (start, end) = request.endpoints().ok_or_else(missing_endpoints)?;

    let result = find_route(&state.graph, &state.costs, start, end)?;

    info!(
        start,
        end,
        legs = result.breakdown.legs.len(),
        minutes = result.breakdown.estimated_total_time_min,
        "route served"
    );

    Ok(Json(result))
}

/// Build the router for the service, with CORS open to any origin
pub fn app(state: AppState) -> Router {
    let cors_layer = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST])
        .allow_origin(Any)
        .allow_headers(Any);

    Router::new()
        .route("/healthcheck", get(health_check))
        .route("/api/cities", get(get_cities))
        .route("/api/city_coords", get(get_city_coords))
        .route("/api/route", post(post_route))
        .layer(cors_layer)
        .with_state(state)
}
