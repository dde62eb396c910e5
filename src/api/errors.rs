// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ErrorResponse {
    pub error_type: String,
    pub message: String,
    pub request_id: Option<String>,
}

/// Errors surfaced by the request layer. The conversation and sentiment
/// cores absorb their own failures; these cover malformed input and the
/// rare case where the surface itself cannot serve.
#[derive(Debug, Clone)]
pub enum ApiError {
    InvalidRequest(String),
    ServiceUnavailable(String),
    InternalError(String),
}

impl ApiError {
    pub fn to_response(&self, request_id: Option<String>) -> ErrorResponse {
        let (error_type, message) = match self {
            ApiError::InvalidRequest(msg) => ("invalid_request", msg.clone()),
            ApiError::ServiceUnavailable(msg) => ("service_unavailable", msg.clone()),
            ApiError::InternalError(msg) => ("internal_error", msg.clone()),
        };

        ErrorResponse {
            error_type: error_type.to_string(),
            message,
            request_id,
        }
    }

    pub fn status_code(&self) -> u16 {
        match self {
            ApiError::InvalidRequest(_) => 400,
            ApiError::ServiceUnavailable(_) => 503,
            ApiError::InternalError(_) => 500,
        }
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::InvalidRequest(msg) => write!(f, "Invalid request: {}", msg),
            ApiError::ServiceUnavailable(msg) => write!(f, "Service unavailable: {}", msg),
            ApiError::InternalError(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl std::error::Error for ApiError {}
