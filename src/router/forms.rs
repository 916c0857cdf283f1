// src/router/forms.rs
use std::collections::HashMap;
use std::io::Read;

use astra::Request;
use url::form_urlencoded;

use crate::errors::ServerError;

/// Upper bound on an urlencoded body we are willing to buffer.
const MAX_FORM_BYTES: u64 = 64 * 1024;

/// Decoded `application/x-www-form-urlencoded` fields (body or query string).
#[derive(Debug, Default)]
pub struct Form(HashMap<String, String>);

impl Form {
    pub fn parse(bytes: &[u8]) -> Self {
        Form(form_urlencoded::parse(bytes).into_owned().collect())
    }

    pub fn from_query(req: &Request) -> Self {
        req.uri()
            .query()
            .map(|q| Self::parse(q.as_bytes()))
            .unwrap_or_default()
    }

    /// Consumes the request.
    pub fn from_body(req: Request) -> Result<Self, ServerError> {
        let mut body = req.into_body();
        let mut buf = Vec::new();
        body.reader()
            .take(MAX_FORM_BYTES + 1)
            .read_to_end(&mut buf)
            .map_err(|e| ServerError::BadRequest(format!("could not read form body: {e}")))?;

        if buf.len() as u64 > MAX_FORM_BYTES {
            return Err(ServerError::BadRequest("Form too large.".into()));
        }
        Ok(Self::parse(&buf))
    }

    /// Raw value, or `""` when the field is absent.
    pub fn get(&self, key: &str) -> &str {
        self.0.get(key).map(String::as_str).unwrap_or("")
    }

    /// Trimmed value, `None` when absent or blank.
    pub fn opt(&self, key: &str) -> Option<&str> {
        Some(self.get(key).trim()).filter(|v| !v.is_empty())
    }

    /// Optional non-negative integer field.
    pub fn opt_count(&self, key: &str) -> Result<Option<i64>, ServerError> {
        match self.opt(key) {
            None => Ok(None),
            Some(raw) => raw
                .parse::<i64>()
                .ok()
                .filter(|n| *n >= 0)
                .map(Some)
                .ok_or_else(|| ServerError::BadRequest(format!("{key} must be a non-negative number."))),
        }
    }

    /// Required integer id field.
    pub fn id(&self, key: &str) -> Result<i64, ServerError> {
        self.opt(key)
            .and_then(|raw| raw.parse().ok())
            .ok_or_else(|| ServerError::BadRequest(format!("missing or invalid {key}")))
    }
}

/// A numeric path segment. Anything else is simply a missing resource.
pub fn path_id(segment: &str) -> Result<i64, ServerError> {
    segment.parse().map_err(|_| ServerError::NotFound)
}
