use std::sync::Arc;

use axum::{
    extract::rejection::{JsonRejection, PathRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use strum_macros::AsRefStr;

use crate::{database, export, web::types::DataParsingError};

pub type WebResult<T> = core::result::Result<T, Error>;

#[derive(Debug, AsRefStr, thiserror::Error)]
pub enum Error {
    #[error("invalid request body: {0}")]
    InvalidBody(String),
    #[error("invalid path parameter: {0}")]
    InvalidPath(String),
    #[error("no route matches path: {0}")]
    RouteNotFound(String),
    #[error("method {method} is not allowed on path: {path}")]
    MethodNotAllowed { method: String, path: String },
    #[error("the database did not answer the connection test: {0}")]
    ConnectTest(#[source] database::Error),

    #[error("data parsing error: {0}")]
    DataParsing(#[from] DataParsingError),
    #[error("database error: {0}")]
    Database(#[from] database::Error),
    #[error("export error: {0}")]
    Export(#[from] export::Error),
}

impl From<JsonRejection> for Error {
    fn from(rejection: JsonRejection) -> Self {
        Error::InvalidBody(rejection.body_text())
    }
}

impl From<PathRejection> for Error {
    fn from(rejection: PathRejection) -> Self {
        Error::InvalidPath(rejection.body_text())
    }
}

impl Error {
    pub fn status_code_and_client_error(&self) -> (StatusCode, ClientError) {
        use ClientError::*;

        match self {
            Error::InvalidBody(msg) | Error::InvalidPath(msg) => {
                (StatusCode::UNPROCESSABLE_ENTITY, InvalidInput(msg.clone()))
            }
            Error::DataParsing(data_er) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                InvalidInput(data_er.to_string()),
            ),
            Error::RouteNotFound(_) => (StatusCode::NOT_FOUND, NotFound),
            Error::MethodNotAllowed { .. } => (StatusCode::METHOD_NOT_ALLOWED, MethodNotAllowed),
            Error::ConnectTest(_) => (StatusCode::SERVICE_UNAVAILABLE, CannotConnect),
            Error::Database(db_er) => match db_er {
                database::Error::EmailNotFound { .. } => (StatusCode::NOT_FOUND, EmailNotFound),
                database::Error::EmailTaken { .. } => {
                    (StatusCode::CONFLICT, EmailAlreadyRegistered)
                }
                database::Error::Unavailable(_) => (StatusCode::SERVICE_UNAVAILABLE, CannotConnect),
                _ => (StatusCode::INTERNAL_SERVER_ERROR, ServiceError),
            },
            Error::Export(_) => (StatusCode::INTERNAL_SERVER_ERROR, ServiceError),
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        tracing::debug!("{:<12} - into_response(Error: {self:?})", "INTO_RESP");

        // Construct a response
        let mut res = StatusCode::INTERNAL_SERVER_ERROR.into_response();

        // Insert the Error into response so that it can be retrieved later.
        res.extensions_mut().insert(Arc::new(self));

        res
    }
}

/// The only error information that is sent to the client, in the `detail` field of the body.
#[derive(Debug, AsRefStr, derive_more::Display)]
pub enum ClientError {
    #[display("Invalid input: {_0}")]
    InvalidInput(String),
    #[display("Not Found")]
    NotFound,
    #[display("Method Not Allowed")]
    MethodNotAllowed,
    #[display("Email not found")]
    EmailNotFound,
    #[display("Email already registered")]
    EmailAlreadyRegistered,
    #[display("Cannot connect to PostgreSQL")]
    CannotConnect,
    #[display("Service error")]
    ServiceError,
}
