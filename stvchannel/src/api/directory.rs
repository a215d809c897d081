//! Annuaire des media servers du compte

use super::SimpleTvApi;
use crate::cache::CachePolicy;
use crate::error::{Result, StvError};
use crate::models::{Server, lenient, lenient_string, lenient_vec};
use chrono::Utc;
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, warn};

/// Réponse de l'endpoint /system/ond/system/mediaservers/1
#[derive(Debug, Default, Deserialize)]
struct DirectoryResponse {
    #[serde(rename = "MediaServer", default, deserialize_with = "lenient_vec")]
    media_servers: Vec<MediaServerResponse>,
}

#[derive(Debug, Default, Deserialize)]
struct MediaServerResponse {
    #[serde(rename = "_id", default, deserialize_with = "lenient_string")]
    id: String,
    #[serde(rename = "SysConfig", default, deserialize_with = "lenient")]
    sys_config: SysConfigResponse,
    #[serde(rename = "SysInfo", default, deserialize_with = "lenient")]
    sys_info: SysInfoResponse,
    #[serde(rename = "StreamServer", default, deserialize_with = "lenient")]
    stream_server: StreamServerResponse,
}

#[derive(Debug, Default, Deserialize)]
struct SysConfigResponse {
    #[serde(rename = "Name", default, deserialize_with = "lenient_string")]
    name: String,
}

#[derive(Debug, Default, Deserialize)]
struct SysInfoResponse {
    #[serde(rename = "Model", default, deserialize_with = "lenient_string")]
    model: String,
}

#[derive(Debug, Default, Deserialize)]
struct StreamServerResponse {
    #[serde(rename = "LocalPingURL", default, deserialize_with = "lenient_string")]
    ping_url: String,
    #[serde(rename = "LocalStreamBaseURL", default, deserialize_with = "lenient_string")]
    local_url: String,
    #[serde(rename = "RemoteStreamBaseURL", default, deserialize_with = "lenient_string")]
    remote_url: String,
}

impl SimpleTvApi {
    /// Liste les media servers du compte (cache d'une heure)
    ///
    /// Les serveurs sont retournés non sondés (`is_local == false`), voir
    /// [`SimpleTvApi::ping`].
    pub async fn list_servers(&self, authorization: &str) -> Result<Vec<Server>> {
        let url = self.endpoint(&["system", "ond", "system", "mediaservers", "1"])?;
        let value = self
            .get_json(url, Some(authorization), CachePolicy::Directory)
            .await?;

        parse_servers(value)
    }

    /// Sonde l'URL de ping locale d'un serveur
    ///
    /// Vrai si la réponse est un 2xx avec un corps non vide. Un timeout, une
    /// erreur de transport ou un statut d'erreur donnent faux. Le header
    /// `Authorization` du compte n'est pas envoyé et rien n'est mis en cache.
    pub async fn ping(&self, ping_url: &str) -> bool {
        debug!("Pinging {}", ping_url);

        let response = match self
            .client
            .get(ping_url)
            .timeout(self.ping_timeout)
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => {
                warn!("Ping of {} failed: {}", ping_url, e);
                return false;
            }
        };

        if !response.status().is_success() {
            warn!("Ping of {} returned {}", ping_url, response.status());
            return false;
        }

        match response.text().await {
            Ok(body) => !body.is_empty(),
            Err(e) => {
                warn!("Ping of {} failed while reading body: {}", ping_url, e);
                false
            }
        }
    }

    /// Sonde chaque serveur, dans l'ordre, et renseigne `is_local`
    pub async fn probe_servers(&self, servers: &mut [Server]) {
        for server in servers.iter_mut() {
            server.is_local = self.ping(&server.ping_url).await;
            server.probed_at = Some(Utc::now());
            debug!(
                "Server {} ({}) is {}",
                server.name,
                server.id,
                server.tagline()
            );
        }
    }
}

fn parse_servers(value: Value) -> Result<Vec<Server>> {
    if !value.is_object() {
        return Err(StvError::Other("Unexpected media server response".to_string()));
    }
    let response: DirectoryResponse = serde_json::from_value(value)?;

    let servers = response
        .media_servers
        .into_iter()
        .filter_map(|entry| {
            if entry.id.is_empty() {
                warn!("Skipping media server without id");
                return None;
            }
            Some(Server {
                id: entry.id,
                name: entry.sys_config.name,
                model: entry.sys_info.model,
                ping_url: entry.stream_server.ping_url,
                local_url: entry.stream_server.local_url,
                remote_url: entry.stream_server.remote_url,
                is_local: false,
                probed_at: None,
            })
        })
        .collect();

    Ok(servers)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_servers() {
        let servers = parse_servers(json!({
            "MediaServer": [
                {
                    "_id": "abc",
                    "SysConfig": {"Name": "Den"},
                    "SysInfo": {"Model": "STV_2000"},
                    "StreamServer": {
                        "LocalPingURL": "http://10.0.0.2/ping",
                        "LocalStreamBaseURL": "http://10.0.0.2",
                        "RemoteStreamBaseURL": "https://relay/abc/"
                    }
                },
                {"SysConfig": {"Name": "No id"}},
                {"_id": "def", "SysConfig": null}
            ]
        }))
        .unwrap();

        assert_eq!(servers.len(), 2);
        assert_eq!(servers[0].id, "abc");
        assert_eq!(servers[0].name, "Den");
        assert_eq!(servers[0].model, "STV_2000");
        assert_eq!(servers[0].remote_url, "https://relay/abc/");
        assert!(!servers[0].is_local);
        assert_eq!(servers[1].id, "def");
        assert_eq!(servers[1].name, "");
    }

    #[test]
    fn test_parse_servers_unexpected_shape() {
        assert!(parse_servers(json!([1, 2])).is_err());
        assert!(parse_servers(json!({"MediaServer": "nope"})).unwrap().is_empty());
    }
}
