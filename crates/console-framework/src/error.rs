//! # Console Errors
//!
//! This module defines the error types shared by every layer of the console core.
//! Transport and status failures are [`GatewayError`]s; everything a screen stores and
//! renders is a [`ConsoleError`], which adds client-side validation failures that never
//! reach the network.

/// Errors produced while talking to the backend.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum GatewayError {
    /// No response was received (connection refused, timeout, TLS failure...).
    #[error("Network error: {0}")]
    Network(String),

    /// The server answered with a non-2xx status other than 401.
    #[error("HTTP {status}: {message}")]
    Http { status: u16, message: String },

    /// The server answered 401. The session client has already redirected to login.
    #[error("Session expired")]
    Unauthenticated,

    /// A request body could not be encoded or a response body could not be decoded.
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl GatewayError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, GatewayError::Http { status: 404, .. })
    }

    pub fn is_unauthenticated(&self) -> bool {
        matches!(self, GatewayError::Unauthenticated)
    }
}

impl From<serde_json::Error> for GatewayError {
    fn from(e: serde_json::Error) -> Self {
        GatewayError::Serialization(e.to_string())
    }
}

/// Errors surfaced to a browsing screen.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConsoleError {
    #[error(transparent)]
    Gateway(#[from] GatewayError),

    /// Rejected client-side before any request was issued.
    #[error("{0}")]
    Validation(String),
}

/// Coarse classification used by presentation code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Network,
    Http,
    Unauthenticated,
    NotFound,
    Validation,
}

impl ConsoleError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ConsoleError::Validation(_) => ErrorKind::Validation,
            ConsoleError::Gateway(GatewayError::Unauthenticated) => ErrorKind::Unauthenticated,
            ConsoleError::Gateway(e) if e.is_not_found() => ErrorKind::NotFound,
            ConsoleError::Gateway(GatewayError::Http { .. }) => ErrorKind::Http,
            ConsoleError::Gateway(GatewayError::Serialization(_)) => ErrorKind::Http,
            ConsoleError::Gateway(GatewayError::Network(_)) => ErrorKind::Network,
        }
    }

    /// Whether this error is rendered as an inline banner.
    ///
    /// A 401 is handled by the login redirect and never shown.
    pub fn is_displayable(&self) -> bool {
        self.kind() != ErrorKind::Unauthenticated
    }

    /// The human message for the inline banner.
    pub fn message(&self) -> String {
        match self {
            ConsoleError::Gateway(GatewayError::Http { message, .. }) => message.clone(),
            other => other.to_string(),
        }
    }
}

/// Errors returned by [`SessionClient::login`](crate::SessionClient::login).
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum AuthError {
    /// The backend refused the credentials.
    #[error("Login rejected: {0}")]
    Rejected(String),

    #[error(transparent)]
    Gateway(#[from] GatewayError),
}

/// Errors raised while reading [`ConsoleConfig`](crate::ConsoleConfig).
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {key}: {value:?}")]
    Invalid { key: String, value: String },
}
