use std::fmt;

use reqwest::StatusCode;

#[derive(Debug)]
pub enum Error {
    Io(std::io::Error),
    Json(serde_json::Error),
    Http(reqwest::Error),
    Base64(base64::DecodeError),
    /// Refresh endpoint answered with a non-success status; carries the body.
    Refresh(StatusCode, String),
    /// Refresh endpoint answered 2xx but the body had no usable `accessToken`.
    InvalidResponse(String, String),
    /// Compact token is structurally unusable (segments, claims).
    Token(String),
    Storage(String),
    Config(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Io(err) => write!(f, "I/O error: {err}"),
            Error::Json(err) => write!(f, "JSON error: {err}"),
            Error::Http(err) => write!(f, "HTTP error: {err}"),
            Error::Base64(err) => write!(f, "base64 decode error: {err}"),
            Error::Refresh(status, body) => {
                write!(f, "refresh endpoint returned {status}: {body}")
            }
            Error::InvalidResponse(_, reason) => {
                write!(f, "invalid refresh response: {reason}")
            }
            Error::Token(msg) => write!(f, "invalid token: {msg}"),
            Error::Storage(msg) => write!(f, "storage error: {msg}"),
            Error::Config(msg) => write!(f, "configuration error: {msg}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Io(err) => Some(err),
            Error::Json(err) => Some(err),
            Error::Http(err) => Some(err),
            Error::Base64(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io(err)
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Json(err)
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        Error::Http(err)
    }
}

impl From<base64::DecodeError> for Error {
    fn from(err: base64::DecodeError) -> Self {
        Error::Base64(err)
    }
}

impl Error {
    /// Response body captured from the refresh endpoint, when there was one.
    pub fn response_body(&self) -> Option<&str> {
        match self {
            Error::Refresh(_, body) | Error::InvalidResponse(body, _) => Some(body.as_str()),
            _ => None,
        }
    }

    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Error::Refresh(status, _) => Some(*status),
            Error::Http(err) => err.status(),
            _ => None,
        }
    }
}
