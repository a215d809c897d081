//! Structures de données pour représenter les objets SimpleTV
//!
//! Les réponses de l'API ne sont pas typées : chaque champ est lu de façon
//! tolérante (clé absente, `null`, nombre transmis en chaîne...) et retombe sur
//! une valeur par défaut plutôt que de faire échouer toute la réponse.

use base64::{Engine, engine::general_purpose::STANDARD};
use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::fmt;

use crate::images::Thumb;
use crate::strings::StringKey;

/// Désérialise n'importe quel type, en retombant sur `Default` si la valeur
/// JSON n'a pas la forme attendue
pub(crate) fn lenient<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    let value = Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).unwrap_or_default())
}

/// Chaîne tolérante : les nombres et booléens sont convertis, le reste donne ""
pub(crate) fn lenient_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => s,
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        _ => String::new(),
    })
}

/// Entier positif tolérant : nombre JSON ou chaîne numérique, sinon `None`
pub(crate) fn lenient_u64<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(value_as_u64(&Value::deserialize(deserializer)?))
}

/// Booléen tolérant : `true`, `1`, `"true"`, `"1"`
pub(crate) fn lenient_bool<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Bool(b) => b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => matches!(s.trim().to_ascii_lowercase().as_str(), "true" | "1"),
        _ => false,
    })
}

/// Liste tolérante : les éléments mal formés sont ignorés, un non-tableau
/// donne une liste vide
pub(crate) fn lenient_vec<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Array(items) => items
            .into_iter()
            .filter_map(|item| serde_json::from_value(item).ok())
            .collect(),
        _ => Vec::new(),
    })
}

pub(crate) fn value_as_u64(value: &Value) -> Option<u64> {
    match value {
        Value::Number(n) => n.as_u64().or_else(|| {
            n.as_f64()
                .filter(|f| f.is_finite() && *f >= 0.0)
                .map(|f| f as u64)
        }),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Credentials du compte SimpleTV
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    username: String,
    password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn password(&self) -> &str {
        &self.password
    }

    /// Vrai si le nom d'utilisateur et le mot de passe sont tous deux renseignés
    pub fn is_complete(&self) -> bool {
        !self.username.is_empty() && !self.password.is_empty()
    }

    /// Valeur du header `Authorization` (HTTP Basic)
    pub fn basic_authorization(&self) -> String {
        let token = STANDARD.encode(format!("{}:{}", self.username, self.password));
        format!("Basic {}", token)
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"********")
            .finish()
    }
}

/// Représente un DVR (media server) du compte
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Server {
    /// Identifiant du serveur
    pub id: String,
    /// Nom donné par l'utilisateur
    pub name: String,
    /// Modèle matériel (ex: `STV_2000`)
    pub model: String,
    /// URL de ping sur le réseau local
    pub ping_url: String,
    /// Base des URLs de streaming sur le réseau local
    pub local_url: String,
    /// Base des URLs de streaming via le relais internet
    pub remote_url: String,
    /// Résultat du ping au moment du listing
    pub is_local: bool,
    /// Date du ping
    pub probed_at: Option<DateTime<Utc>>,
}

impl Server {
    /// Base des URLs de streaming selon la joignabilité du serveur
    pub fn stream_base(&self) -> &str {
        if self.is_local {
            &self.local_url
        } else {
            &self.remote_url
        }
    }

    /// `Local` ou `Remote`
    pub fn tagline(&self) -> &'static str {
        if self.is_local {
            StringKey::Local.text()
        } else {
            StringKey::Remote.text()
        }
    }
}

/// Entrée de la liste des serveurs
#[derive(Debug, Clone, Serialize)]
pub struct ServerEntry {
    pub server: Server,
    pub tagline: &'static str,
    pub thumb: Thumb,
}

/// Entrée de la liste des groupes (émissions) d'un serveur
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupEntry {
    /// Identifiant du groupe
    pub id: String,
    /// Clé stable `simpletv/group/<id>`
    pub rating_key: String,
    pub title: String,
    pub summary: String,
    /// Nombre d'épisodes enregistrés, `None` si inconnu
    pub episode_count: Option<u32>,
    pub thumb: Thumb,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Deserialize)]
    struct Sample {
        #[serde(default, deserialize_with = "lenient_string")]
        text: String,
        #[serde(default, deserialize_with = "lenient_u64")]
        count: Option<u64>,
        #[serde(default, deserialize_with = "lenient_bool")]
        flag: bool,
        #[serde(default, deserialize_with = "lenient_vec")]
        items: Vec<u32>,
    }

    #[test]
    fn test_lenient_fields() {
        let p: Sample =
            serde_json::from_str(r#"{"text": 12, "count": "7", "flag": 1, "items": [1, "x", 3]}"#)
                .unwrap();
        assert_eq!(p.text, "12");
        assert_eq!(p.count, Some(7));
        assert!(p.flag);
        assert_eq!(p.items, vec![1, 3]);
    }

    #[test]
    fn test_lenient_defaults() {
        let p: Sample =
            serde_json::from_str(r#"{"text": null, "count": "abc", "items": {}}"#).unwrap();
        assert_eq!(p.text, "");
        assert_eq!(p.count, None);
        assert!(!p.flag);
        assert!(p.items.is_empty());
    }

    #[test]
    fn test_value_as_u64() {
        assert_eq!(value_as_u64(&serde_json::json!(45)), Some(45));
        assert_eq!(value_as_u64(&serde_json::json!(45.9)), Some(45));
        assert_eq!(value_as_u64(&serde_json::json!(-3)), None);
        assert_eq!(value_as_u64(&serde_json::json!(" 12 ")), Some(12));
        assert_eq!(value_as_u64(&serde_json::json!(null)), None);
    }

    #[test]
    fn test_basic_authorization() {
        let creds = Credentials::new("user", "pass");
        assert_eq!(creds.basic_authorization(), "Basic dXNlcjpwYXNz");
        assert!(creds.is_complete());
        assert!(!Credentials::new("user", "").is_complete());
        assert!(!Credentials::new("", "pass").is_complete());
    }

    #[test]
    fn test_debug_hides_password() {
        let rendered = format!("{:?}", Credentials::new("user", "hunter2"));
        assert!(rendered.contains("user"));
        assert!(!rendered.contains("hunter2"));
    }

    #[test]
    fn test_stream_base() {
        let mut server = Server {
            id: "s1".into(),
            name: "Living room".into(),
            model: "STV_2000".into(),
            ping_url: "http://10.0.0.2/ping".into(),
            local_url: "http://10.0.0.2/".into(),
            remote_url: "https://relay.example.com/s1".into(),
            is_local: false,
            probed_at: None,
        };
        assert_eq!(server.stream_base(), "https://relay.example.com/s1");
        assert_eq!(server.tagline(), "Remote");

        server.is_local = true;
        assert_eq!(server.stream_base(), "http://10.0.0.2/");
        assert_eq!(server.tagline(), "Local");
    }
}
