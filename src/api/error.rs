use actix_web::http::{StatusCode, header};
use actix_web::{HttpResponse, ResponseError};
use serde::Serialize;
use thiserror::Error;

use super::auth::AuthError;
use crate::faucet::{FaucetError, TransferError};

#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Faucet(#[from] FaucetError),

    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error("{0}")]
    Transfer(#[from] TransferError),

    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    Forbidden(&'static str),
}

#[derive(Serialize)]
struct ErrorBody<'a> {
    error: &'a str,
    message: String,
}

impl ApiError {
    fn code(&self) -> &'static str {
        match self {
            ApiError::Faucet(e) => e.code(),
            ApiError::Auth(AuthError::Malformed(_)) => "MALFORMED_REQUEST",
            ApiError::Auth(AuthError::BadSignature) => "BAD_SIGNATURE",
            ApiError::Auth(AuthError::Expired { .. }) => "EXPIRED",
            ApiError::Auth(AuthError::Replayed) => "REPLAYED",
            ApiError::Transfer(_) => "TRANSFER_FAILED",
            ApiError::BadRequest(_) => "BAD_REQUEST",
            ApiError::Forbidden(_) => "FORBIDDEN",
        }
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Faucet(FaucetError::NotOwner) => StatusCode::FORBIDDEN,
            ApiError::Faucet(FaucetError::Paused) => StatusCode::SERVICE_UNAVAILABLE,
            ApiError::Faucet(FaucetError::CooldownActive { .. }) => StatusCode::TOO_MANY_REQUESTS,
            ApiError::Faucet(FaucetError::InsufficientFunds) => StatusCode::SERVICE_UNAVAILABLE,
            ApiError::Faucet(FaucetError::TransferFailed(_)) => StatusCode::CONFLICT,
            ApiError::Auth(AuthError::Malformed(_)) => StatusCode::BAD_REQUEST,
            ApiError::Auth(_) => StatusCode::UNAUTHORIZED,
            ApiError::Transfer(_) => StatusCode::CONFLICT,
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let mut res = HttpResponse::build(self.status_code());
        if let ApiError::Faucet(FaucetError::CooldownActive { retry_after }) = self {
            res.insert_header((header::RETRY_AFTER, retry_after.to_string()));
        }
        res.json(ErrorBody {
            error: self.code(),
            message: self.to_string(),
        })
    }
}
