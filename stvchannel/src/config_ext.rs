//! Extension pour intégrer la configuration SimpleTV dans stvconfig
//!
//! Ce module fournit le trait `SimpleTvConfigExt` qui ajoute à
//! `stvconfig::Config` les méthodes de gestion du compte SimpleTV et des
//! paramètres du client API.

use std::time::Duration;

use anyhow::{Result, anyhow};
use serde_yaml::Value;
use stvconfig::Config;
use tracing::warn;

use crate::api::{DEFAULT_BASE_URL, DEFAULT_PING_TIMEOUT_SECS, DEFAULT_REQUEST_TIMEOUT_SECS, SimpleTvApi};
use crate::cache::{DEFAULT_TTL_SECS, DIRECTORY_TTL_SECS};
use crate::channel::SimpleTvChannel;
use crate::models::Credentials;
use crate::session::Session;

/// Trait d'extension pour gérer la configuration SimpleTV dans stvconfig
///
/// # Exemple
///
/// ```rust,ignore
/// use stvconfig::get_config;
/// use stvchannel::SimpleTvConfigExt;
///
/// let config = get_config();
/// if let Some(credentials) = config.get_simpletv_credentials()? {
///     println!("SimpleTV user: {}", credentials.username());
/// }
/// ```
pub trait SimpleTvConfigExt {
    /// Nom d'utilisateur, `None` s'il n'est pas renseigné
    fn get_simpletv_username(&self) -> Result<Option<String>>;

    /// Mot de passe en clair, `None` s'il n'est pas renseigné
    ///
    /// # Errors
    ///
    /// Retourne une erreur si le mot de passe chiffré ne peut pas être
    /// déchiffré (fichier copié depuis une autre machine)
    fn get_simpletv_password(&self) -> Result<Option<String>>;

    /// Credentials complets, `None` si l'un des deux champs manque
    fn get_simpletv_credentials(&self) -> Result<Option<Credentials>>;

    /// Enregistre les credentials, le mot de passe étant chiffré
    fn set_simpletv_credentials(&self, credentials: &Credentials) -> Result<()>;

    /// Efface le nom d'utilisateur et le mot de passe
    fn clear_simpletv_credentials(&self) -> Result<()>;

    /// URL de base de l'API
    fn get_simpletv_base_url(&self) -> Result<String>;

    fn set_simpletv_base_url(&self, url: &str) -> Result<()>;

    /// TTL du cache des listings
    fn get_simpletv_cache_ttl(&self) -> Result<Duration>;

    /// TTL du cache de l'annuaire des serveurs
    fn get_simpletv_directory_cache_ttl(&self) -> Result<Duration>;

    /// Timeout du ping des serveurs
    fn get_simpletv_ping_timeout(&self) -> Result<Duration>;

    /// Timeout des requêtes à l'API
    fn get_simpletv_request_timeout(&self) -> Result<Duration>;
}

fn optional_string(config: &Config, path: &[&str]) -> Option<String> {
    match config.get_value(path) {
        Ok(Value::String(s)) if !s.is_empty() => Some(s),
        Ok(_) => None,  // Wrong type or empty
        Err(_) => None, // Not configured
    }
}

fn seconds(config: &Config, key: &str, default: u64) -> Result<Duration> {
    let secs = match config.get_value(&["simpletv", "api", key]) {
        Ok(Value::Number(n)) => n
            .as_u64()
            .ok_or_else(|| anyhow!("simpletv.api.{} must be a positive integer", key))?,
        Ok(Value::String(s)) => s
            .trim()
            .parse()
            .map_err(|e| anyhow!("simpletv.api.{} is not a number: {}", key, e))?,
        Ok(_) | Err(_) => default,
    };
    Ok(Duration::from_secs(secs))
}

impl SimpleTvConfigExt for Config {
    fn get_simpletv_username(&self) -> Result<Option<String>> {
        Ok(optional_string(self, &["accounts", "simpletv", "username"]))
    }

    fn get_simpletv_password(&self) -> Result<Option<String>> {
        match optional_string(self, &["accounts", "simpletv", "password"]) {
            // Déchiffrement automatique si le mot de passe est chiffré
            Some(stored) => stvconfig::encryption::get_password(&stored)
                .map(Some)
                .map_err(|e| anyhow!("Failed to decrypt password: {}", e)),
            None => Ok(None),
        }
    }

    fn get_simpletv_credentials(&self) -> Result<Option<Credentials>> {
        let username = self.get_simpletv_username()?;
        let password = self.get_simpletv_password()?;
        Ok(match (username, password) {
            (Some(username), Some(password)) => Some(Credentials::new(username, password)),
            _ => None,
        })
    }

    fn set_simpletv_credentials(&self, credentials: &Credentials) -> Result<()> {
        let password = match stvconfig::encryption::encrypt_password(credentials.password()) {
            Ok(encrypted) => encrypted,
            Err(e) => {
                warn!("Cannot encrypt password, storing it in clear: {}", e);
                credentials.password().to_string()
            }
        };

        self.set_value(
            &["accounts", "simpletv", "username"],
            Value::String(credentials.username().to_string()),
        )?;
        self.set_value(&["accounts", "simpletv", "password"], Value::String(password))
    }

    fn clear_simpletv_credentials(&self) -> Result<()> {
        self.set_value(
            &["accounts", "simpletv", "username"],
            Value::String(String::new()),
        )?;
        self.set_value(
            &["accounts", "simpletv", "password"],
            Value::String(String::new()),
        )
    }

    fn get_simpletv_base_url(&self) -> Result<String> {
        Ok(optional_string(self, &["simpletv", "api", "base_url"])
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string()))
    }

    fn set_simpletv_base_url(&self, url: &str) -> Result<()> {
        self.set_value(
            &["simpletv", "api", "base_url"],
            Value::String(url.to_string()),
        )
    }

    fn get_simpletv_cache_ttl(&self) -> Result<Duration> {
        seconds(self, "cache_ttl_secs", DEFAULT_TTL_SECS)
    }

    fn get_simpletv_directory_cache_ttl(&self) -> Result<Duration> {
        seconds(self, "directory_cache_ttl_secs", DIRECTORY_TTL_SECS)
    }

    fn get_simpletv_ping_timeout(&self) -> Result<Duration> {
        seconds(self, "ping_timeout_secs", DEFAULT_PING_TIMEOUT_SECS)
    }

    fn get_simpletv_request_timeout(&self) -> Result<Duration> {
        seconds(self, "request_timeout_secs", DEFAULT_REQUEST_TIMEOUT_SECS)
    }
}

impl SimpleTvApi {
    /// Crée le client API à partir de la configuration
    pub fn from_config(config: &Config) -> crate::Result<Self> {
        SimpleTvApi::builder()
            .base_url(config.get_simpletv_base_url()?)
            .request_timeout(config.get_simpletv_request_timeout()?)
            .ping_timeout(config.get_simpletv_ping_timeout()?)
            .cache_ttl(config.get_simpletv_cache_ttl()?)
            .directory_cache_ttl(config.get_simpletv_directory_cache_ttl()?)
            .build()
    }
}

impl SimpleTvChannel {
    /// Crée le channel à partir de la configuration
    pub fn from_config(config: &Config) -> crate::Result<Self> {
        Ok(Self::with_api(SimpleTvApi::from_config(config)?))
    }
}

impl Session {
    /// Session initialisée avec les credentials enregistrés, s'il y en a
    pub fn from_config(config: &Config) -> crate::Result<Self> {
        Ok(match config.get_simpletv_credentials()? {
            Some(credentials) => Session::with_credentials(credentials),
            None => Session::new(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn config() -> (TempDir, Config) {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_config(dir.path().to_str().unwrap()).unwrap();
        (dir, config)
    }

    #[test]
    fn test_defaults() {
        let (_dir, config) = config();
        assert_eq!(config.get_simpletv_username().unwrap(), None);
        assert!(config.get_simpletv_credentials().unwrap().is_none());
        assert_eq!(config.get_simpletv_base_url().unwrap(), DEFAULT_BASE_URL);
        assert_eq!(config.get_simpletv_cache_ttl().unwrap(), Duration::from_secs(300));
        assert_eq!(
            config.get_simpletv_directory_cache_ttl().unwrap(),
            Duration::from_secs(3600)
        );
        assert_eq!(config.get_simpletv_ping_timeout().unwrap(), Duration::from_secs(5));
        assert_eq!(
            config.get_simpletv_request_timeout().unwrap(),
            Duration::from_secs(30)
        );
    }

    #[test]
    fn test_credentials_round_trip() {
        let (_dir, config) = config();
        config
            .set_simpletv_credentials(&Credentials::new("joe", "secret"))
            .unwrap();

        let stored = config
            .get_value(&["accounts", "simpletv", "password"])
            .unwrap();
        if stvconfig::encryption::is_encrypted(stored.as_str().unwrap()) {
            assert_ne!(stored.as_str(), Some("secret"));
        }

        let credentials = config.get_simpletv_credentials().unwrap().unwrap();
        assert_eq!(credentials.username(), "joe");
        assert_eq!(credentials.password(), "secret");

        config.clear_simpletv_credentials().unwrap();
        assert!(config.get_simpletv_credentials().unwrap().is_none());
    }

    #[test]
    fn test_plain_password_accepted() {
        let (_dir, config) = config();
        config
            .set_value(&["accounts", "simpletv", "username"], Value::String("joe".into()))
            .unwrap();
        config
            .set_value(&["accounts", "simpletv", "password"], Value::String("plain".into()))
            .unwrap();

        let session = Session::from_config(&config).unwrap();
        assert!(session.has_credentials());
        assert_eq!(
            session.credentials().map(|c| c.password()),
            Some("plain")
        );
    }

    #[test]
    fn test_numeric_strings_and_bad_values() {
        let (_dir, config) = config();
        config
            .set_value(&["simpletv", "api", "ping_timeout_secs"], Value::String("2".into()))
            .unwrap();
        assert_eq!(config.get_simpletv_ping_timeout().unwrap(), Duration::from_secs(2));

        config
            .set_value(&["simpletv", "api", "cache_ttl_secs"], Value::String("soon".into()))
            .unwrap();
        assert!(config.get_simpletv_cache_ttl().is_err());
    }

    #[test]
    fn test_api_from_config() {
        let (_dir, config) = config();
        config.set_simpletv_base_url("http://127.0.0.1:9/").unwrap();
        let api = SimpleTvApi::from_config(&config).unwrap();
        assert_eq!(api.base_url().as_str(), "http://127.0.0.1:9/");
    }
}
