use crate::config::AppConfig;
use crate::types::EducationRecord;
use anyhow::Result;
use axum::{
    extract::{Query, State},
    response::Json,
    routing::get,
    Router,
};
use serde::Deserialize;
use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;

pub struct AppState {
    pub records: HashMap<u32, EducationRecord>,
}

#[derive(Deserialize)]
pub struct QueryParams {
    fips: u32,
}

/// Serve the generated site plus a per-county education lookup.
pub async fn start_server(config: AppConfig, records: Vec<EducationRecord>) -> Result<()> {
    let by_fips: HashMap<u32, EducationRecord> =
        records.into_iter().map(|r| (r.fips, r)).collect();
    println!("Indexed {} education records for the API", by_fips.len());

    let state = Arc::new(AppState { records: by_fips });

    let addr = SocketAddr::from(([127, 0, 0, 1], config.server.port));
    println!("Starting server on http://{}", addr);

    let app = Router::new()
        .route("/api/county", get(county_handler))
        .nest_service("/", ServeDir::new(&config.output.site_dir))
        .layer(CorsLayer::permissive())
        .with_state(state);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

async fn county_handler(
    State(state): State<Arc<AppState>>,
    Query(params): Query<QueryParams>,
) -> Json<Option<EducationRecord>> {
    Json(state.records.get(&params.fips).cloned())
}
