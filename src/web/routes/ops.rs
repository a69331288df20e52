use axum::{extract::State, Json};
use serde_json::{json, Value};

use crate::{
    web::{Error, WebResult},
    AppState,
};

/// Liveness probe, doesn't touch the database.
pub async fn health_check() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

#[tracing::instrument(name = "Testing the database connection", skip(app_state))]
pub async fn test_connect(State(app_state): State<AppState>) -> WebResult<Json<Value>> {
    app_state
        .database_mgr
        .ping()
        .await
        .map_err(Error::ConnectTest)?;

    Ok(Json(
        json!({ "message": "Connected successfully to PostgreSQL!" }),
    ))
}
