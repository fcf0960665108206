//! Uniform response envelopes.
//!
//! Every result handed to a transport is wrapped as
//! `{success, data?, error?, timestamp}`; list results additionally carry
//! `pagination`. Building an envelope has no side effects beyond reading
//! the clock.

use std::fmt;

use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::clock::Timestamp;
use crate::pagination::{total_pages, Page, PageRequest};

/// Machine-readable error codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    BadRequest,
    NotFound,
    InternalServerError,
}

impl ErrorCode {
    /// The wire name, e.g. `"NOT_FOUND"`.
    pub const fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::BadRequest => "BAD_REQUEST",
            ErrorCode::NotFound => "NOT_FOUND",
            ErrorCode::InternalServerError => "INTERNAL_SERVER_ERROR",
        }
    }

    /// Matching HTTP status.
    pub const fn http_status(&self) -> u16 {
        match self {
            ErrorCode::BadRequest => 400,
            ErrorCode::NotFound => 404,
            ErrorCode::InternalServerError => 500,
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error body of a failed envelope.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiError {
    pub code: ErrorCode,
    pub message: String,
}

/// Envelope for a single result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<ApiError>,
    pub timestamp: Timestamp,
}

/// Page metadata.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub page: u32,
    pub page_size: u32,
    pub total_items: u64,
    pub total_pages: u64,
}

/// Envelope for one page of a list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaginatedResponse<T> {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Vec<T>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<ApiError>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pagination: Option<Pagination>,
    pub timestamp: Timestamp,
}

/// Wrap a successful result.
pub fn wrap_result<T>(data: T) -> ApiResponse<T> {
    ApiResponse {
        success: true,
        data: Some(data),
        error: None,
        timestamp: Utc::now(),
    }
}

/// Wrap a failure.
pub fn wrap_error<T>(code: ErrorCode, message: impl Into<String>) -> ApiResponse<T> {
    ApiResponse {
        success: false,
        data: None,
        error: Some(ApiError {
            code,
            message: message.into(),
        }),
        timestamp: Utc::now(),
    }
}

/// Wrap one page of items with its metadata.
pub fn wrap_page<T>(items: Vec<T>, request: PageRequest, total_items: u64) -> PaginatedResponse<T> {
    PaginatedResponse {
        success: true,
        data: Some(items),
        error: None,
        pagination: Some(Pagination {
            page: request.page(),
            page_size: request.page_size(),
            total_items,
            total_pages: total_pages(total_items, request.page_size()),
        }),
        timestamp: Utc::now(),
    }
}

/// Wrap a failed list request.
pub fn wrap_page_error<T>(code: ErrorCode, message: impl Into<String>) -> PaginatedResponse<T> {
    PaginatedResponse {
        success: false,
        data: None,
        error: Some(ApiError {
            code,
            message: message.into(),
        }),
        pagination: None,
        timestamp: Utc::now(),
    }
}

impl<T> From<Page<T>> for PaginatedResponse<T> {
    fn from(page: Page<T>) -> Self {
        wrap_page(page.items, page.request, page.total_items)
    }
}
