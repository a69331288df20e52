use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, State,
    },
    http::StatusCode,
    Json,
};
use tracing::info;

use crate::{
    database::{EmailBmc, EmailRecord},
    web::{
        types::{DeserEmail, ValidEmail},
        WebResult,
    },
    AppState,
};

#[tracing::instrument(name = "Listing email records", skip(app_state))]
pub async fn list_emails(State(app_state): State<AppState>) -> WebResult<Json<Vec<EmailRecord>>> {
    let records = EmailBmc::list(&app_state.database_mgr).await?;
    Ok(Json(records))
}

#[tracing::instrument(name = "Getting an email record", skip(app_state, id))]
pub async fn get_email(
    State(app_state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
) -> WebResult<Json<EmailRecord>> {
    let Path(id) = id?;
    let record = EmailBmc::get(&app_state.database_mgr, id).await?;
    Ok(Json(record))
}

#[tracing::instrument(name = "Adding a new email record", skip(app_state, payload))]
pub async fn create_email(
    State(app_state): State<AppState>,
    payload: Result<Json<DeserEmail>, JsonRejection>,
) -> WebResult<(StatusCode, Json<EmailRecord>)> {
    // Validate before the store sees anything.
    let Json(payload) = payload?;
    let email = ValidEmail::try_from(payload)?;

    let record = EmailBmc::create(&app_state.database_mgr, &email).await?;
    info!("New email record added: {}", record.id);

    Ok((StatusCode::CREATED, Json(record)))
}

#[tracing::instrument(name = "Updating an email record", skip(app_state, id, payload))]
pub async fn update_email(
    State(app_state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
    payload: Result<Json<DeserEmail>, JsonRejection>,
) -> WebResult<StatusCode> {
    let Path(id) = id?;
    let Json(payload) = payload?;
    let email = ValidEmail::try_from(payload)?;

    EmailBmc::update(&app_state.database_mgr, id, &email).await?;
    info!("Email record updated: {id}");

    Ok(StatusCode::NO_CONTENT)
}

#[tracing::instrument(name = "Removing an email record", skip(app_state, id))]
pub async fn delete_email(
    State(app_state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
) -> WebResult<StatusCode> {
    let Path(id) = id?;

    EmailBmc::delete(&app_state.database_mgr, id).await?;
    info!("Email record removed: {id}");

    Ok(StatusCode::NO_CONTENT)
}
