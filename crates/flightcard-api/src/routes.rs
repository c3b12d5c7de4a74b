use std::sync::Arc;

use axum::extract::{Path, State};
use axum::routing::get;
use axum::{Json, Router};
use chrono::Utc;
use flightcard_core::derive::DerivedState;
use flightcard_core::provider::AviationStackClient;
use flightcard_core::query::normalize;
use flightcard_core::{Flight, FlightResolver, ResolutionOutcome};
use serde::Serialize;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::error::AppError;

#[derive(Clone)]
pub struct AppState {
    resolver: Arc<FlightResolver<AviationStackClient>>,
}

impl AppState {
    pub fn new(resolver: FlightResolver<AviationStackClient>) -> Self {
        Self {
            resolver: Arc::new(resolver),
        }
    }
}

pub fn app_router(state: AppState) -> Router {
    Router::new()
        .route("/healthz", get(healthz))
        .route("/v1/flights/{query}", get(lookup_flight))
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_headers(Any)
                .allow_methods(Any),
        )
        .with_state(state)
}

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: &'static str,
    timestamp: i64,
}

async fn healthz() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        timestamp: Utc::now().timestamp(),
    })
}

#[derive(Debug, Serialize)]
struct SelectedFlight {
    flight: Flight,
    derived: DerivedState,
}

#[derive(Debug, Serialize)]
struct FlightLookupResponse {
    query: String,
    flights: Vec<Flight>,
    selected: SelectedFlight,
}

async fn lookup_flight(
    State(state): State<AppState>,
    Path(raw_query): Path<String>,
) -> Result<Json<FlightLookupResponse>, AppError> {
    let query = normalize(&raw_query);
    if query.is_empty() {
        return Err(AppError::bad_request("flight number must not be empty"));
    }

    let outcome = state.resolver.resolve(&query).await;
    let message = outcome.user_message().unwrap_or_default();
    match outcome {
        ResolutionOutcome::Found(flights) => {
            let Some(flight) = flights.first().cloned() else {
                return Err(AppError::not_found(message));
            };
            let derived = DerivedState::compute(&flight, Utc::now());
            Ok(Json(FlightLookupResponse {
                query,
                flights,
                selected: SelectedFlight { flight, derived },
            }))
        }
        ResolutionOutcome::NotFound => Err(AppError::not_found(message)),
        ResolutionOutcome::ResolutionFailed(reason) => {
            tracing::debug!(%query, %reason, "Resolution failed");
            Err(AppError::external(message))
        }
    }
}
