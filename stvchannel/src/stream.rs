//! Construction des URL de flux

use crate::models::Server;

/// Joint `base` et `suffix` avec exactement un `/` entre les deux.
///
/// Seul le `/` final manquant de `base` est ajouté, `suffix` est pris tel quel.
pub fn join_url(base: &str, suffix: &str) -> String {
    if base.ends_with('/') {
        format!("{}{}", base, suffix)
    } else {
        format!("{}/{}", base, suffix)
    }
}

/// URL jouable d'un flux de `server` : base locale si le serveur a répondu
/// au ping lors du listing, base du relais sinon.
pub fn stream_url(server: &Server, suffix: &str) -> String {
    join_url(server.stream_base(), suffix)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn server(is_local: bool) -> Server {
        Server {
            id: "s1".into(),
            name: "Den".into(),
            model: "STV_1000".into(),
            ping_url: "http://192.168.1.20/ping".into(),
            local_url: "http://192.168.1.20".into(),
            remote_url: "https://relay.example.com/s1/".into(),
            is_local,
            probed_at: None,
        }
    }

    #[test]
    fn test_join_url() {
        assert_eq!(join_url("http://x/", "a/b"), "http://x/a/b");
        assert_eq!(join_url("http://x", "a/b"), "http://x/a/b");
    }

    #[test]
    fn test_local_server_uses_local_base() {
        assert_eq!(
            stream_url(&server(true), "hls/1234.m3u8"),
            "http://192.168.1.20/hls/1234.m3u8"
        );
    }

    #[test]
    fn test_remote_server_uses_relay_base() {
        assert_eq!(
            stream_url(&server(false), "hls/1234.m3u8"),
            "https://relay.example.com/s1/hls/1234.m3u8"
        );
    }
}
