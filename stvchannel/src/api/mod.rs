//! Couche d'accès à l'API REST SimpleTV
//!
//! Ce module fournit une interface bas-niveau : construction des URLs,
//! headers communs, cache des réponses et traduction des statuts HTTP en
//! [`StvError`]. Les endpoints sont répartis par domaine dans les
//! sous-modules.

pub mod auth;
pub mod content;
pub mod directory;

use crate::cache::{CachePolicy, ResponseCache};
use crate::error::{Result, StvError};
use reqwest::header::{ACCEPT, AUTHORIZATION, HeaderMap, HeaderValue};
use reqwest::{Client, Response};
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, warn};
use url::Url;

/// URL de base de l'API SimpleTV
pub const DEFAULT_BASE_URL: &str = "https://stv-p-api1-prod.rsslabs.net";

/// Version annoncée au service
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Timeout par défaut des requêtes
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Timeout du ping des serveurs locaux
pub const DEFAULT_PING_TIMEOUT_SECS: u64 = 5;

/// Paramètres communs des requêtes de contenu
const CONTENT_QUERY: [(&str, &str); 3] = [
    ("composition", "mediaserver"),
    ("state", "library"),
    ("errorstate", "success"),
];

/// Client API bas-niveau pour communiquer avec SimpleTV
#[derive(Clone)]
pub struct SimpleTvApi {
    /// Client HTTP
    client: Client,
    /// URL de base du service
    base_url: Url,
    /// Timeout du ping
    ping_timeout: Duration,
    /// Cache des réponses JSON
    cache: ResponseCache,
}

impl SimpleTvApi {
    /// Crée une instance avec les paramètres par défaut
    pub fn new() -> Result<Self> {
        Self::builder().build()
    }

    pub fn builder() -> ApiBuilder {
        ApiBuilder::default()
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn ping_timeout(&self) -> Duration {
        self.ping_timeout
    }

    /// Vide le cache des réponses
    pub fn clear_cache(&self) {
        debug!("Clearing response cache");
        self.cache.clear_all();
    }

    /// Construit l'URL d'un endpoint à partir de segments de chemin.
    ///
    /// Chaque segment est encodé, un `/` dans un identifiant ne crée donc pas
    /// de nouveau niveau.
    pub(crate) fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| StvError::Other(format!("Invalid base URL: {}", self.base_url)))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// URL d'un listing de contenu, avec sa plage d'éléments
    pub(crate) fn content_endpoint(&self, segments: &[&str], page: &str) -> Result<Url> {
        let mut url = self.endpoint(segments)?;
        url.query_pairs_mut()
            .extend_pairs(CONTENT_QUERY)
            .append_pair("page", page);
        Ok(url)
    }

    /// Envoie une requête GET et vérifie le statut
    async fn send(&self, url: Url, authorization: Option<&str>) -> Result<Response> {
        debug!("GET {}", url);

        let mut request = self.client.get(url);
        if let Some(auth) = authorization {
            request = request.header(AUTHORIZATION, auth);
        }

        let response = request.send().await?;
        Self::check_status(response).await
    }

    /// Traduit un statut non-2xx en erreur
    async fn check_status(response: Response) -> Result<Response> {
        let status = response.status();
        debug!("Response status: {}", status);

        if status.is_success() {
            return Ok(response);
        }

        let error_text = response.text().await.unwrap_or_default();
        warn!("API error ({}): {}", status.as_u16(), error_text);
        Err(StvError::from_status_code(status.as_u16(), error_text))
    }

    /// GET JSON, en passant par le cache selon `policy`
    pub(crate) async fn get_json(
        &self,
        url: Url,
        authorization: Option<&str>,
        policy: CachePolicy,
    ) -> Result<Value> {
        let key = ResponseCache::key(url.as_str(), authorization);

        if let Some(value) = self.cache.get(policy, &key).await {
            debug!("Cache hit for {}", url);
            return Ok(value);
        }

        let response = self.send(url, authorization).await?;
        let text = response.text().await?;

        let value: Value = serde_json::from_str(&text).map_err(|e| {
            warn!("Failed to parse response: {}", e);
            StvError::JsonParse(e)
        })?;

        self.cache.put(policy, key, value.clone()).await;
        Ok(value)
    }
}

/// Builder de [`SimpleTvApi`]
#[derive(Debug, Clone)]
pub struct ApiBuilder {
    base_url: String,
    request_timeout: Duration,
    ping_timeout: Duration,
    cache_ttl: Duration,
    directory_cache_ttl: Duration,
}

impl Default for ApiBuilder {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            request_timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
            ping_timeout: Duration::from_secs(DEFAULT_PING_TIMEOUT_SECS),
            cache_ttl: Duration::from_secs(crate::cache::DEFAULT_TTL_SECS),
            directory_cache_ttl: Duration::from_secs(crate::cache::DIRECTORY_TTL_SECS),
        }
    }
}

impl ApiBuilder {
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    pub fn request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    pub fn ping_timeout(mut self, timeout: Duration) -> Self {
        self.ping_timeout = timeout;
        self
    }

    pub fn cache_ttl(mut self, ttl: Duration) -> Self {
        self.cache_ttl = ttl;
        self
    }

    pub fn directory_cache_ttl(mut self, ttl: Duration) -> Self {
        self.directory_cache_ttl = ttl;
        self
    }

    pub fn build(self) -> Result<SimpleTvApi> {
        let base_url = Url::parse(&self.base_url)?;

        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert("x-rssinc-clienttype", HeaderValue::from_static("rokuplayer"));
        headers.insert("x-rssinc-playerversion", HeaderValue::from_static(VERSION));

        let client = Client::builder()
            .timeout(self.request_timeout)
            .user_agent(format!("SimpleTV channel ({})", VERSION))
            .default_headers(headers)
            .build()?;

        Ok(SimpleTvApi {
            client,
            base_url,
            ping_timeout: self.ping_timeout,
            cache: ResponseCache::with_ttls(self.cache_ttl, self.directory_cache_ttl),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_base_url() {
        let api = SimpleTvApi::new().unwrap();
        assert_eq!(api.base_url().as_str(), "https://stv-p-api1-prod.rsslabs.net/");
        assert_eq!(api.ping_timeout(), Duration::from_secs(5));
    }

    #[test]
    fn test_endpoint_encodes_segments() {
        let api = SimpleTvApi::new().unwrap();
        let url = api.endpoint(&["auth", "users", "joe smith@x.com"]).unwrap();
        assert_eq!(
            url.as_str(),
            "https://stv-p-api1-prod.rsslabs.net/auth/users/joe%20smith@x.com"
        );
    }

    #[test]
    fn test_endpoint_keeps_base_path() {
        let api = SimpleTvApi::builder()
            .base_url("http://localhost:8080/stv/")
            .build()
            .unwrap();
        let url = api.endpoint(&["system", "ond"]).unwrap();
        assert_eq!(url.as_str(), "http://localhost:8080/stv/system/ond");
    }

    #[test]
    fn test_content_endpoint_query() {
        let api = SimpleTvApi::new().unwrap();
        let url = api
            .content_endpoint(&["content", "ond", "contentmap", "s1", "groups"], "51-100")
            .unwrap();
        assert_eq!(
            url.query(),
            Some("composition=mediaserver&state=library&errorstate=success&page=51-100")
        );
    }

    #[test]
    fn test_invalid_base_url() {
        let result = SimpleTvApi::builder().base_url("not a url").build();
        assert!(matches!(result, Err(StvError::InvalidUrl(_))));
    }
}
