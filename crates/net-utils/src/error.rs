use std::collections::HashMap;
use std::fmt;

use bytes::Bytes;
use reqwest::StatusCode;
use serde_json::Value;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    NotFound(ErrorPayload),
    #[error(transparent)]
    BadRequest(ErrorPayload),
    #[error(transparent)]
    PreconditionFailed(ErrorPayload),
    /// 5XX responses.
    #[error(transparent)]
    Server(ErrorPayload),
    #[error(transparent)]
    Reqwest(#[from] reqwest::Error),
    #[error(transparent)]
    Auth(#[from] gcp_auth_provider::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl Error {
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }

    /// The HTTP status Google responded with, if this error came from a response.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::NotFound(payload)
            | Self::BadRequest(payload)
            | Self::PreconditionFailed(payload)
            | Self::Server(payload) => Some(payload.code),
            Self::Reqwest(err) => err.status().map(|status| status.as_u16()),
            _ => None,
        }
    }
}

/// Validates that the response is a 2XX status and returns it back as [`Ok`],
/// or consumes the response and builds the appropriate [`Error`].
pub async fn validate_response(resp: reqwest::Response) -> Result<reqwest::Response, Error> {
    let status = resp.status();

    if status.is_success() {
        return Ok(resp);
    }

    macro_rules! extract_error {
        ($kind:ident : $status:expr, $resp:expr) => {{
            let bytes = $resp.bytes().await?;
            Error::$kind(ErrorPayload::from_raw_parts($status, bytes))
        }};
    }

    match status.as_u16() {
        404 => Err(extract_error!(NotFound: status, resp)),
        412 => Err(extract_error!(PreconditionFailed: status, resp)),
        400..=499 => Err(extract_error!(BadRequest: status, resp)),
        500..=599 => Err(extract_error!(Server: status, resp)),
        _ => resp.error_for_status().map_err(Error::Reqwest),
    }
}

impl ErrorPayload {
    pub(crate) fn from_raw_parts(status: StatusCode, payload: Bytes) -> Self {
        // use the leading non-whitespace byte to hint at what kind of payload it might be.
        let leading_byte = payload.trim_ascii_start().first().copied();

        match leading_byte {
            // likely a nested google-format error message
            Some(b'{') => match serde_json::from_slice::<NestedPayload>(&payload) {
                Ok(NestedPayload { error }) => error,
                Err(error) => {
                    tracing::warn!(
                        message = "failed to deserialize error json, falling back to raw text",
                        ?error
                    );
                    Self::from_message(status.as_u16(), &payload)
                }
            },
            Some(b'[') => match serde_json::from_slice::<Vec<ErrorDetail>>(&payload) {
                Ok(errors) => Self::from_errors(status, errors),
                Err(_) => Self::from_message(status.as_u16(), &payload),
            },
            Some(_) => Self::from_message(status.as_u16(), &payload),
            // empty body, use the status text so there's something non-empty.
            None => Self::from_status(status),
        }
    }

    fn from_errors(status: StatusCode, errors: Vec<ErrorDetail>) -> Self {
        match errors.first() {
            Some(detail) => Self {
                code: status.as_u16(),
                message: detail.message.clone(),
                errors,
            },
            None => Self::from_status(status),
        }
    }

    fn from_status(status: StatusCode) -> Self {
        Self {
            code: status.as_u16(),
            message: String::from(status.canonical_reason().unwrap_or(status.as_str())),
            errors: vec![],
        }
    }

    fn from_message(code: u16, message: &[u8]) -> Self {
        Self {
            code,
            message: String::from_utf8_lossy(message).into_owned(),
            errors: vec![],
        }
    }
}

/// Generic error payloads sent back from Google.
#[derive(Debug, serde::Deserialize)]
pub struct ErrorPayload {
    code: u16,
    message: String,
    #[serde(default)]
    errors: Vec<ErrorDetail>,
}

impl ErrorPayload {
    pub const fn code(&self) -> u16 {
        self.code
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn errors(&self) -> &[ErrorDetail] {
        &self.errors
    }

    /// The `reason` of the first detailed error, i.e `"notFound"` or `"duplicate"`.
    pub fn reason(&self) -> Option<&str> {
        self.errors.first().map(ErrorDetail::reason)
    }
}

#[derive(serde::Deserialize)]
pub struct ErrorDetail {
    message: String,
    #[serde(default)]
    reason: String,
    #[serde(default, flatten)]
    misc: HashMap<String, Value>,
}

impl fmt::Debug for ErrorDetail {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut dbg = f.debug_struct("ErrorDetail");

        dbg.field("message", &self.message);
        dbg.field("reason", &self.reason);

        for (name, value) in self.misc.iter() {
            dbg.field(name, value);
        }

        dbg.finish()
    }
}

impl ErrorDetail {
    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn reason(&self) -> &str {
        &self.reason
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.misc.get(key)
    }
}

impl fmt::Display for ErrorPayload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "error code {}: {}", self.code, self.message)?;

        // if there's more errors than just the 1, say so
        if self.errors.len() > 1 {
            write!(f, " and {} others...", self.errors.len() - 1)
        } else {
            Ok(())
        }
    }
}

impl std::error::Error for ErrorPayload {}

#[derive(serde::Deserialize)]
struct NestedPayload {
    error: ErrorPayload,
}
