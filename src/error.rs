use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;
use tracing::error;

/// Failures coming back from the two store collaborators.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("sample store: {0}")]
    Sample(#[from] mongodb::error::Error),

    #[error("membership store: {0}")]
    Membership(#[from] redis::RedisError),

    #[error("store unavailable: {0}")]
    Unavailable(&'static str),
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("userId or data is not valid")]
    NoValidSamples,

    #[error("userId or date not found")]
    MissingDayParams,

    #[error("userId or pageNumber not found")]
    MissingPageParams,

    #[error("userId not found")]
    MissingUserId,

    #[error("internal error")]
    Store(#[from] StoreError),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match self {
            // store detail goes to the log, never to the client
            AppError::Store(ref err) => {
                error!("store failure: {err}");
                StatusCode::INTERNAL_SERVER_ERROR
            }
            _ => StatusCode::BAD_REQUEST,
        };

        (status, self.to_string()).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_errors_map_to_bad_request() {
        for err in [
            AppError::NoValidSamples,
            AppError::MissingDayParams,
            AppError::MissingPageParams,
            AppError::MissingUserId,
        ] {
            assert_eq!(err.into_response().status(), StatusCode::BAD_REQUEST);
        }
    }

    #[test]
    fn store_errors_map_to_internal_error() {
        let response = AppError::Store(StoreError::Unavailable("down")).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
