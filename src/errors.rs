use astra::Response;
use thiserror::Error;

/// Errors originating from either the server logic
/// (routing, missing resources, auth) or downstream layers (DB, mail, xlsx).
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("Not Found")]
    NotFound,
    #[error("Bad Request: {0}")]
    BadRequest(String),
    #[error("Unauthorized: {0}")]
    Unauthorized(String),
    #[error("Forbidden")]
    Forbidden,
    #[error("Database Error: {0}")]
    DbError(String),
    #[error("Spreadsheet Error: {0}")]
    XlsxError(String),
    #[error("Mail Error: {0}")]
    MailError(String),
    /// Bad startup settings; never produced while serving a request.
    #[error("Config Error: {0}")]
    ConfigError(String),
    #[error("Internal Server Error")]
    InternalError,
}

impl ServerError {
    pub fn status(&self) -> u16 {
        match self {
            ServerError::NotFound => 404,
            ServerError::BadRequest(_) => 400,
            ServerError::Unauthorized(_) => 401,
            ServerError::Forbidden => 403,
            ServerError::DbError(_)
            | ServerError::XlsxError(_)
            | ServerError::MailError(_)
            | ServerError::ConfigError(_)
            | ServerError::InternalError => 500,
        }
    }
}

// Type alias commonly used by route handlers.
pub type ResultResp = Result<Response, ServerError>;
