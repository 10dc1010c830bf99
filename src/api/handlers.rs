//! Request handlers for the API endpoints.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Query, State};

use super::AppState;
use super::types::{ApiError, FeederQuery, ProfileQuery, TargetsQuery};
use crate::runner::{county_targets, study_settings};
use crate::sim::feeder::FeederStudy;
use crate::sim::selection::TargetList;
use crate::sim::types::ProfilePoint;

/// `GET /counties` → sorted county names.
pub async fn get_counties(State(state): State<Arc<AppState>>) -> Json<Vec<String>> {
    Json(state.inputs.table.counties())
}

/// Runs a feeder study.
///
/// `GET /feeder?county=X&adoption_pct=N` → 200 + `FeederStudy` JSON
/// `GET /feeder?adoption_pct=150` → 400
/// `GET /feeder?county=Nowhere` → 404
pub async fn get_feeder(
    State(state): State<Arc<AppState>>,
    Query(query): Query<FeederQuery>,
) -> Result<Json<FeederStudy>, ApiError> {
    let county = resolve_county(&state, query.county)?;
    let settings = study_settings(&state.config, query.adoption_pct);
    let study = FeederStudy::run(&state.inputs.table, &county, &state.inputs.profile, &settings)?;
    Ok(Json(study))
}

/// Returns the intervention list for a county.
///
/// `GET /targets?county=X&limit=N` → 200 + `TargetList` JSON
pub async fn get_targets(
    State(state): State<Arc<AppState>>,
    Query(query): Query<TargetsQuery>,
) -> Result<Json<TargetList>, ApiError> {
    let county = resolve_county(&state, query.county)?;
    let limit = query.limit.unwrap_or(state.config.targeting.limit);
    let list = county_targets(&state.config, &state.inputs, &county, limit)?;
    Ok(Json(list))
}

/// Returns archetype profile points, optionally filtered by time range.
///
/// `GET /profile?from=T1&to=T2` → inclusive range
/// `GET /profile?from=later&to=earlier` → 400
pub async fn get_profile(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ProfileQuery>,
) -> Result<Json<Vec<ProfilePoint>>, ApiError> {
    if let (Some(from), Some(to)) = (query.from, query.to) {
        if from > to {
            return Err(ApiError::BadRequest(format!(
                "`from` ({from}) must be <= `to` ({to})"
            )));
        }
    }
    let window = state.inputs.profile.window(query.from, query.to);
    Ok(Json(window.points))
}

fn resolve_county(state: &AppState, county: Option<String>) -> Result<String, ApiError> {
    county
        .or_else(|| state.inputs.default_county())
        .ok_or_else(|| ApiError::NotFound("no counties loaded".to_string()))
}
