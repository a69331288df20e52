use axum::{
    extract::State,
    http::header::{CONTENT_DISPOSITION, CONTENT_TYPE},
    response::IntoResponse,
};
use tracing::info;

use crate::{database::EmailBmc, export, web::WebResult, AppState};

pub const EXPORT_FILENAME: &str = "emails.csv";

#[tracing::instrument(name = "Exporting email records as CSV", skip(app_state))]
pub async fn export_emails(State(app_state): State<AppState>) -> WebResult<impl IntoResponse> {
    let records = EmailBmc::snapshot(&app_state.database_mgr).await?;
    let csv = export::to_csv(&records)?;
    info!("Exported {} email records", records.len());

    Ok((
        [
            (CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (
                CONTENT_DISPOSITION,
                format!("attachment; filename={EXPORT_FILENAME}"),
            ),
        ],
        csv,
    ))
}
