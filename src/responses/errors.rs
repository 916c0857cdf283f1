use crate::errors::ServerError;
use crate::templates::components::error::render_error;
use astra::Response;

pub use crate::errors::ResultResp;

/// Convert a ServerError into a proper HTML response
pub fn error_to_response(err: ServerError) -> Response {
    let status = err.status();
    if status >= 500 {
        tracing::error!(status, error = %err, "request failed");
    } else {
        tracing::debug!(status, error = %err, "request rejected");
    }

    match err {
        ServerError::NotFound => render_error(status, "Not Found"),
        ServerError::BadRequest(msg) => render_error(status, &msg),
        ServerError::Unauthorized(msg) => render_error(status, &msg),
        ServerError::Forbidden => render_error(status, "You do not have access to this page."),
        // Internal details stay in the log.
        ServerError::DbError(_)
        | ServerError::XlsxError(_)
        | ServerError::MailError(_)
        | ServerError::ConfigError(_)
        | ServerError::InternalError => render_error(status, "Internal Server Error"),
    }
}
