//! Error types for the admin client
//!
//! Service calls return a structured [`ApiError`] whose [`ErrorKind`] is
//! derived from the HTTP status. Presentation code switches on the kind to
//! pick the (German) message shown to the user.

use thiserror::Error;

/// Classification of a failed service call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// 401: missing or expired session
    Unauthorized,
    /// 403: authenticated but not allowed
    Forbidden,
    /// 404
    NotFound,
    /// 409: e.g. deleting an activity that still has students enrolled
    Conflict,
    /// 400 / 422: the server rejected the payload
    Validation,
    /// 5xx
    Server,
    /// Transport failure, no response received
    Network,
    /// Anything else
    Unknown,
}

impl ErrorKind {
    /// Map an HTTP status code to an error kind
    pub fn from_status(status: u16) -> Self {
        match status {
            400 | 422 => ErrorKind::Validation,
            401 => ErrorKind::Unauthorized,
            403 => ErrorKind::Forbidden,
            404 => ErrorKind::NotFound,
            409 => ErrorKind::Conflict,
            500..=599 => ErrorKind::Server,
            _ => ErrorKind::Unknown,
        }
    }
}

/// Error returned by the REST service layer
#[derive(Debug, Clone, Error)]
#[error("{kind:?} ({status:?}): {message}")]
pub struct ApiError {
    pub kind: ErrorKind,
    /// HTTP status, if a response was received
    pub status: Option<u16>,
    /// Raw message from the server or transport
    pub message: String,
}

impl ApiError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self { kind, status: None, message: message.into() }
    }

    pub fn from_status(status: u16, message: impl Into<String>) -> Self {
        Self {
            kind: ErrorKind::from_status(status),
            status: Some(status),
            message: message.into(),
        }
    }

    pub fn network(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Network, message)
    }

    /// Localized message for the error banner / notice
    pub fn user_message(&self) -> String {
        match self.kind {
            ErrorKind::Unauthorized => {
                "Sie sind nicht angemeldet. Bitte melden Sie sich erneut an.".into()
            }
            ErrorKind::Forbidden => "Sie haben keine Berechtigung für diese Aktion.".into(),
            ErrorKind::NotFound => "Der Eintrag wurde nicht gefunden.".into(),
            ErrorKind::Conflict => {
                if self.message.is_empty() {
                    "Der Eintrag wird noch verwendet und kann nicht geändert werden.".into()
                } else {
                    format!("Konflikt: {}", self.message)
                }
            }
            ErrorKind::Validation => {
                if self.message.is_empty() {
                    "Ungültige Eingabe.".into()
                } else {
                    format!("Ungültige Eingabe: {}", self.message)
                }
            }
            ErrorKind::Server => "Serverfehler. Bitte versuchen Sie es später erneut.".into(),
            ErrorKind::Network => "Verbindung zum Server fehlgeschlagen.".into(),
            ErrorKind::Unknown => {
                if self.message.is_empty() {
                    GENERIC_ERROR.into()
                } else {
                    self.message.clone()
                }
            }
        }
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        match err.status() {
            Some(status) => ApiError::from_status(status.as_u16(), err.to_string()),
            None if err.is_decode() => ApiError::new(ErrorKind::Unknown, err.to_string()),
            None => ApiError::network(err.to_string()),
        }
    }
}

/// Fallback shown when nothing more specific is known
pub const GENERIC_ERROR: &str = "Ein unerwarteter Fehler ist aufgetreten.";

/// Top-level error type
#[derive(Debug, Error)]
pub enum AdminError {
    #[error("api error: {0}")]
    Api(#[from] ApiError),

    /// Client-side validation failure, already localized
    #[error("{0}")]
    Validation(String),

    #[error("config error: {0}")]
    Config(String),

    #[error("unknown entity: {0}")]
    UnknownEntity(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl AdminError {
    /// Message suitable for the inline error banner
    pub fn user_message(&self) -> String {
        match self {
            AdminError::Api(err) => err.user_message(),
            AdminError::Validation(msg) => msg.clone(),
            other => other.to_string(),
        }
    }
}

/// Result type for the admin client
pub type AdminResult<T> = Result<T, AdminError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_from_status() {
        assert_eq!(ErrorKind::from_status(400), ErrorKind::Validation);
        assert_eq!(ErrorKind::from_status(401), ErrorKind::Unauthorized);
        assert_eq!(ErrorKind::from_status(403), ErrorKind::Forbidden);
        assert_eq!(ErrorKind::from_status(404), ErrorKind::NotFound);
        assert_eq!(ErrorKind::from_status(409), ErrorKind::Conflict);
        assert_eq!(ErrorKind::from_status(503), ErrorKind::Server);
        assert_eq!(ErrorKind::from_status(418), ErrorKind::Unknown);
    }

    #[test]
    fn test_user_message_by_kind() {
        let err = ApiError::from_status(403, "forbidden");
        assert_eq!(err.user_message(), "Sie haben keine Berechtigung für diese Aktion.");

        let err = ApiError::from_status(409, "students enrolled");
        assert_eq!(err.user_message(), "Konflikt: students enrolled");

        let err = ApiError::new(ErrorKind::Unknown, "");
        assert_eq!(err.user_message(), GENERIC_ERROR);

        let err = ApiError::new(ErrorKind::Unknown, "boom");
        assert_eq!(err.user_message(), "boom");
    }

    #[test]
    fn test_admin_error_validation_passthrough() {
        let err = AdminError::Validation("Name ist erforderlich.".into());
        assert_eq!(err.user_message(), "Name ist erforderlich.");
    }
}
