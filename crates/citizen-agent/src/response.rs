//! Rendering Agent results as status codes and JSON envelopes.
//!
//! The transport writes `status` and, if present, `body` verbatim.

use serde::Serialize;
use tracing::error;

use citizen_agent_core::{
    wrap_error, wrap_page_error, wrap_result, ApiResponse, ErrorCode, Page, PaginatedResponse,
};

use crate::error::{AgentError, Result};

pub const OK: u16 = 200;
pub const CREATED: u16 = 201;
pub const NO_CONTENT: u16 = 204;

/// A rendered response: HTTP-style status plus optional JSON body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rendered {
    pub status: u16,
    pub body: Option<String>,
}

/// Wrap a single-value result in an envelope.
pub fn respond<T>(result: Result<T>) -> ApiResponse<T> {
    match result {
        Ok(data) => wrap_result(data),
        Err(e) => error_envelope(&e),
    }
}

/// Wrap a page result in a paginated envelope.
pub fn respond_page<T>(result: Result<Page<T>>) -> PaginatedResponse<T> {
    match result {
        Ok(page) => page.into(),
        Err(e) => {
            let (code, message) = report(&e);
            wrap_page_error(code, message)
        }
    }
}

/// The error envelope for `error`.
pub fn error_envelope<T>(error: &AgentError) -> ApiResponse<T> {
    let (code, message) = report(error);
    wrap_error(code, message)
}

/// Code and public message for `error`. Internal failures are logged here
/// since their details never reach the envelope.
fn report(error: &AgentError) -> (ErrorCode, String) {
    let code = error.code();
    if code == ErrorCode::InternalServerError {
        error!(%error, "internal failure");
    }
    (code, error.public_message())
}

/// Render a single-value result; `success_status` is used on success.
pub fn render<T: Serialize>(result: Result<T>, success_status: u16) -> Rendered {
    let status = match &result {
        Ok(_) => success_status,
        Err(e) => e.code().http_status(),
    };
    to_rendered(status, &respond(result))
}

/// Render a page result.
pub fn render_page<T: Serialize>(result: Result<Page<T>>) -> Rendered {
    let status = match &result {
        Ok(_) => OK,
        Err(e) => e.code().http_status(),
    };
    to_rendered(status, &respond_page(result))
}

/// Render a result with no payload: 204 and an empty body on success.
pub fn render_empty(result: Result<()>) -> Rendered {
    match result {
        Ok(()) => Rendered {
            status: NO_CONTENT,
            body: None,
        },
        Err(e) => to_rendered(e.code().http_status(), &error_envelope::<()>(&e)),
    }
}

fn to_rendered<E: Serialize>(status: u16, envelope: &E) -> Rendered {
    match serde_json::to_string(envelope) {
        Ok(body) => Rendered {
            status,
            body: Some(body),
        },
        Err(e) => {
            let error = AgentError::from(e);
            let fallback = serde_json::to_string(&error_envelope::<()>(&error)).ok();
            Rendered {
                status: error.code().http_status(),
                body: fallback,
            }
        }
    }
}
