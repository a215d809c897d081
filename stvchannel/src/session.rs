//! État de navigation partagé entre les handlers
//!
//! Une [`Session`] porte les credentials validés, le header `Authorization`
//! qui en découle et la table des serveurs obtenue au dernier listing. Elle
//! est passée explicitement à chaque handler.

use indexmap::IndexMap;

use crate::error::{Result, StvError};
use crate::models::{Credentials, Server};

#[derive(Debug, Clone, Default)]
pub struct Session {
    credentials: Option<Credentials>,
    authorization: Option<String>,
    servers: IndexMap<String, Server>,
}

impl Session {
    /// Session vide : pas de credentials, pas de serveurs
    pub fn new() -> Self {
        Self::default()
    }

    /// Session initialisée avec des credentials déjà enregistrés.
    ///
    /// Le header `Authorization` n'est posé que si les deux champs sont
    /// renseignés.
    pub fn with_credentials(credentials: Credentials) -> Self {
        let authorization = credentials
            .is_complete()
            .then(|| credentials.basic_authorization());

        Self {
            credentials: Some(credentials),
            authorization,
            servers: IndexMap::new(),
        }
    }

    /// Vrai si un nom d'utilisateur et un mot de passe sont présents
    pub fn has_credentials(&self) -> bool {
        self.credentials
            .as_ref()
            .is_some_and(Credentials::is_complete)
    }

    pub fn credentials(&self) -> Option<&Credentials> {
        self.credentials.as_ref()
    }

    /// Header `Authorization` courant
    pub fn authorization(&self) -> Option<&str> {
        self.authorization.as_deref()
    }

    /// Enregistre des credentials validés et le header correspondant
    pub fn set_credentials(&mut self, credentials: Credentials) {
        self.authorization = Some(credentials.basic_authorization());
        self.credentials = Some(credentials);
    }

    /// Oublie les credentials et le header
    pub fn clear_credentials(&mut self) {
        self.credentials = None;
        self.authorization = None;
    }

    /// Remplace entièrement la table des serveurs
    pub fn replace_servers(&mut self, servers: impl IntoIterator<Item = Server>) {
        self.servers = servers
            .into_iter()
            .map(|server| (server.id.clone(), server))
            .collect();
    }

    /// Recherche un serveur listé précédemment
    pub fn server(&self, id: &str) -> Result<&Server> {
        self.servers
            .get(id)
            .ok_or_else(|| StvError::UnknownServer(id.to_string()))
    }

    /// Serveurs dans l'ordre du dernier listing
    pub fn servers(&self) -> impl Iterator<Item = &Server> {
        self.servers.values()
    }

    pub fn server_count(&self) -> usize {
        self.servers.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn server(id: &str) -> Server {
        Server {
            id: id.into(),
            name: format!("DVR {}", id),
            model: "STV_2000".into(),
            ping_url: String::new(),
            local_url: String::new(),
            remote_url: String::new(),
            is_local: false,
            probed_at: None,
        }
    }

    #[test]
    fn test_empty_session() {
        let session = Session::new();
        assert!(!session.has_credentials());
        assert!(session.authorization().is_none());
        assert_eq!(session.server_count(), 0);
    }

    #[test]
    fn test_with_credentials() {
        let session = Session::with_credentials(Credentials::new("user", "pass"));
        assert!(session.has_credentials());
        assert_eq!(session.authorization(), Some("Basic dXNlcjpwYXNz"));

        let partial = Session::with_credentials(Credentials::new("user", ""));
        assert!(!partial.has_credentials());
        assert!(partial.authorization().is_none());
    }

    #[test]
    fn test_replace_servers_keeps_order_and_drops_old() {
        let mut session = Session::new();
        session.replace_servers(vec![server("a"), server("b")]);
        session.replace_servers(vec![server("c"), server("b")]);

        let ids: Vec<&str> = session.servers().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, vec!["c", "b"]);
        assert!(session.server("a").is_err());
        assert_eq!(session.server("b").unwrap().name, "DVR b");
    }

    #[test]
    fn test_unknown_server() {
        let session = Session::new();
        assert!(matches!(
            session.server("nope"),
            Err(StvError::UnknownServer(id)) if id == "nope"
        ));
    }
}
