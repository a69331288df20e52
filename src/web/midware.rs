use std::sync::Arc;

use axum::{
    http::{Method, Uri},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use uuid::Uuid;

use crate::web::{log, Error, REQUEST_ID_HEADER};

/// Turns a web `Error` stashed in the response extensions into its status code and a JSON body
/// `{"detail": ..., "req_id": ...}`, and logs the request.
pub async fn response_mapper(req_method: Method, uri: Uri, resp: Response) -> Response {
    // Reuse the id the request id layer assigned so the body, header and log line match.
    let uuid = resp
        .headers()
        .get(REQUEST_ID_HEADER)
        .and_then(|id| id.to_str().ok())
        .and_then(|id| Uuid::parse_str(id).ok())
        .unwrap_or_else(Uuid::new_v4);

    let web_error = resp.extensions().get::<Arc<Error>>().map(|er| er.as_ref());
    let client_status_and_error = web_error.map(Error::status_code_and_client_error);

    if let Some(er) = web_error {
        match client_status_and_error.as_ref().map(|(st, _)| st.is_server_error()) {
            Some(true) => tracing::error!("SERVER ERROR: {er:?} ID: {uuid}"),
            _ => tracing::debug!("CLIENT ERROR: {er:?} ID: {uuid}"),
        }
    }

    let err_resp = client_status_and_error.as_ref().map(|(status, cl_err)| {
        let client_error_body = json!({
            "detail": cl_err.to_string(),
            "req_id": uuid.to_string(),
        });

        let mut err_resp = (*status, Json(client_error_body)).into_response();
        if let Some(req_id) = resp.headers().get(REQUEST_ID_HEADER) {
            err_resp
                .headers_mut()
                .insert(REQUEST_ID_HEADER, req_id.clone());
        }
        err_resp
    });

    log::log_request(
        uuid,
        req_method,
        uri,
        resp.status(),
        web_error,
        client_status_and_error,
    );

    err_resp.unwrap_or(resp)
}
