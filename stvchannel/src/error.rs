//! Gestion des erreurs pour le client SimpleTV

use serde::Serialize;
use thiserror::Error;

/// Type Result personnalisé pour stvchannel
pub type Result<T> = std::result::Result<T, StvError>;

/// Erreurs possibles lors de l'utilisation du client SimpleTV
#[derive(Error, Debug)]
pub enum StvError {
    /// Nom d'utilisateur ou mot de passe absent
    #[error("Username and password must both be set")]
    MissingCredentials,

    /// Erreur d'authentification (401/403)
    #[error("Authentication failed: {0}")]
    Unauthorized(String),

    /// Erreur de l'API SimpleTV (statut HTTP non-2xx hors 401/403)
    #[error("SimpleTV API error (code {code}): {message}")]
    ApiError { code: u16, message: String },

    /// Erreur de transport HTTP
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Erreur de parsing JSON
    #[error("JSON parsing error: {0}")]
    JsonParse(#[from] serde_json::Error),

    /// URL invalide (base URL configurée ou segment de chemin)
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// Serveur absent de la session (la liste des serveurs n'a pas été chargée)
    #[error("Unknown media server: {0}")]
    UnknownServer(String),

    /// Erreur de configuration (anyhow)
    #[error("Configuration error: {0}")]
    Config(#[from] anyhow::Error),

    /// Erreur générique
    #[error("SimpleTV error: {0}")]
    Other(String),
}

/// Catégorie d'erreur présentée à l'utilisateur
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// Credentials absents
    MissingCredentials,
    /// Credentials refusés par l'API
    AuthenticationFailed,
    /// Tout autre problème réseau, HTTP ou de format
    NetworkProblem,
    /// Serveur inconnu de la session
    UnknownServer,
}

impl StvError {
    /// Crée une erreur API depuis un code de statut HTTP et un message
    pub fn from_status_code(code: u16, message: impl Into<String>) -> Self {
        match code {
            401 | 403 => Self::Unauthorized(message.into()),
            _ => Self::ApiError {
                code,
                message: message.into(),
            },
        }
    }

    /// Vérifie si l'erreur est une erreur de credentials (401/403)
    pub fn is_auth_error(&self) -> bool {
        matches!(self, StvError::Unauthorized(_))
    }

    /// Ramène l'erreur à la taxonomie présentée à l'utilisateur
    pub fn kind(&self) -> ErrorKind {
        match self {
            StvError::MissingCredentials => ErrorKind::MissingCredentials,
            StvError::Unauthorized(_) => ErrorKind::AuthenticationFailed,
            StvError::UnknownServer(_) => ErrorKind::UnknownServer,
            _ => ErrorKind::NetworkProblem,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_code_mapping() {
        assert!(StvError::from_status_code(401, "nope").is_auth_error());
        assert!(StvError::from_status_code(403, "nope").is_auth_error());
        assert!(matches!(
            StvError::from_status_code(500, "boom"),
            StvError::ApiError { code: 500, .. }
        ));
    }

    #[test]
    fn test_kind() {
        assert_eq!(StvError::MissingCredentials.kind(), ErrorKind::MissingCredentials);
        assert_eq!(
            StvError::from_status_code(403, "").kind(),
            ErrorKind::AuthenticationFailed
        );
        assert_eq!(
            StvError::from_status_code(404, "").kind(),
            ErrorKind::NetworkProblem
        );
        assert_eq!(
            StvError::UnknownServer("x".into()).kind(),
            ErrorKind::UnknownServer
        );
        assert_eq!(
            StvError::Other("x".into()).kind(),
            ErrorKind::NetworkProblem
        );
    }
}
