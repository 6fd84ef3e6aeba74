use axum::{Json, extract::State};

use crate::{AppState, error::Result, models::Stats, queries::stats_queries};

pub async fn get_stats(State(state): State<AppState>) -> Result<Json<Stats>> {
    let stats = stats_queries::get_stats(&state.db).await?;
    Ok(Json(stats))
}
