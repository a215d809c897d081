//! Handlers de navigation du channel SimpleTV
//!
//! Chaque handler correspond à une action de navigation : valider les
//! credentials, lister les serveurs, les émissions d'un serveur puis les
//! épisodes d'une émission. Les handlers ne retournent jamais d'erreur : un
//! échec est replié en [`Message`].

use crate::api::SimpleTvApi;
use crate::episode::{EpisodeDescriptor, EpisodeFields, describe_episode};
use crate::error::{Result, StvError};
use crate::images::{poster_image, server_thumb};
use crate::models::{Credentials, GroupEntry, ServerEntry};
use crate::paging::{PAGE_SIZE, PageRange};
use crate::response::{ChannelResponse, Listing, Message, MessageKind};
use crate::session::Session;
use crate::stream::stream_url;
use crate::strings::StringKey;
use tracing::{info, warn};

/// Point d'entrée du channel
#[derive(Clone)]
pub struct SimpleTvChannel {
    api: SimpleTvApi,
}

impl SimpleTvChannel {
    /// Channel sur l'API de production, paramètres par défaut
    pub fn new() -> Result<Self> {
        Ok(Self::with_api(SimpleTvApi::new()?))
    }

    pub fn with_api(api: SimpleTvApi) -> Self {
        Self { api }
    }

    pub fn api(&self) -> &SimpleTvApi {
        &self.api
    }

    /// Valide des credentials et, en cas de succès, les installe dans la
    /// session et vide le cache des réponses.
    pub async fn validate_credentials(
        &self,
        session: &mut Session,
        username: &str,
        password: &str,
    ) -> Message {
        let credentials = Credentials::new(username, password);
        if !credentials.is_complete() {
            return Message::from_keys(
                MessageKind::MissingCredentials,
                StringKey::Error,
                StringKey::EmptyCredentials,
            );
        }

        match self.api.verify_credentials(&credentials).await {
            Ok(()) => {
                session.set_credentials(credentials);
                self.api.clear_cache();
                Message::from_keys(MessageKind::Success, StringKey::Success, StringKey::PrefsSaved)
            }
            Err(StvError::Unauthorized(_)) | Err(StvError::ApiError { .. }) => {
                Message::from_keys(
                    MessageKind::AuthenticationFailed,
                    StringKey::Error,
                    StringKey::BadAuth,
                )
            }
            Err(e) => Message::from_error(&e),
        }
    }

    /// Liste les media servers du compte
    ///
    /// Sans credentials, la liste est vide et porte un avis invitant à les
    /// renseigner. La table des serveurs de la session est remplacée sauf en
    /// cas d'échec.
    pub async fn main_menu(&self, session: &mut Session) -> ChannelResponse<ServerEntry> {
        let title = StringKey::MediaServerTitle.text();

        let Some(authorization) = session.authorization().map(str::to_string) else {
            info!("No SimpleTV credentials configured");
            session.replace_servers(Vec::new());
            let notice =
                Message::from_keys(MessageKind::MissingCredentials, StringKey::Error, StringKey::SetAuth);
            return ChannelResponse::Listing(Listing::new(title, Vec::new()).with_notice(notice));
        };

        let mut servers = match self.api.list_servers(&authorization).await {
            Ok(servers) => servers,
            Err(e) => {
                warn!("Failed to list media servers: {}", e);
                return e.into();
            }
        };

        self.api.probe_servers(&mut servers).await;

        let entries: Vec<ServerEntry> = servers
            .iter()
            .map(|server| ServerEntry {
                server: server.clone(),
                tagline: server.tagline(),
                thumb: server_thumb(&server.model),
            })
            .collect();

        info!("Found {} media servers", entries.len());
        session.replace_servers(servers);

        ChannelResponse::Listing(Listing::new(title, entries))
    }

    /// Liste une page des émissions enregistrées sur un serveur
    pub async fn library_groups(
        &self,
        session: &Session,
        server_id: &str,
        page: u32,
    ) -> ChannelResponse<GroupEntry> {
        let server = match session.server(server_id) {
            Ok(server) => server,
            Err(e) => {
                warn!("{}", e);
                return e.into();
            }
        };
        let range = PageRange::for_page(page);

        let result = self
            .api
            .list_groups(&server.id, &range, session.authorization())
            .await;
        let group_page = match result {
            Ok(group_page) => group_page,
            Err(e) => {
                warn!("Failed to list groups of {}: {}", server.id, e);
                return e.into();
            }
        };

        let has_more = group_page
            .total_count
            .is_some_and(|total| total > range.end);

        let mut listing = Listing::new(server.name.clone(), group_page.groups);
        if let Some(next) = range.next_page().filter(|_| has_more) {
            listing = listing.with_next_page(next, StringKey::MoreGroups);
        }

        if listing.is_empty() {
            return ChannelResponse::Message(Message::from_keys(
                MessageKind::Empty,
                StringKey::EmptyTitle,
                StringKey::EmptyLibrary,
            ));
        }

        info!(
            "Listed {} groups on {} (page {})",
            listing.items.len(),
            server.name,
            range.page
        );
        ChannelResponse::Listing(listing)
    }

    /// Liste une page des épisodes enregistrés d'une émission
    ///
    /// `name` est le nom de l'émission, utilisé comme titre du listing.
    pub async fn group_episodes(
        &self,
        session: &Session,
        server_id: &str,
        group_id: &str,
        name: &str,
        page: u32,
    ) -> ChannelResponse<EpisodeDescriptor> {
        let server = match session.server(server_id) {
            Ok(server) => server,
            Err(e) => {
                warn!("{}", e);
                return e.into();
            }
        };
        let range = PageRange::for_page(page);

        let result = self
            .api
            .list_episodes(&server.id, group_id, &range, session.authorization())
            .await;
        let episode_page = match result {
            Ok(episode_page) => episode_page,
            Err(e) => {
                warn!("Failed to list episodes of {}: {}", group_id, e);
                return e.into();
            }
        };

        // un total multiple de PAGE_SIZE donne une dernière page vide
        let has_more = episode_page.raw_count >= PAGE_SIZE as usize;

        let episodes: Vec<EpisodeDescriptor> = episode_page
            .episodes
            .into_iter()
            .map(|record| {
                describe_episode(EpisodeFields {
                    url: stream_url(server, &record.location),
                    thumb: poster_image(&record.images),
                    instance_id: record.instance_id,
                    title: record.title,
                    summary: record.summary,
                    show: name.to_string(),
                    season: record.season,
                    episode: record.episode,
                    duration: record.duration,
                })
            })
            .collect();

        let mut listing = Listing::new(name, episodes);
        if let Some(next) = range.next_page().filter(|_| has_more) {
            listing = listing.with_next_page(next, StringKey::MoreItems);
        }

        if listing.is_empty() {
            return ChannelResponse::Message(Message::new(
                MessageKind::Empty,
                name,
                StringKey::EmptyGroup.text(),
            ));
        }

        info!(
            "Listed {} episodes of {} (page {})",
            listing.items.len(),
            name,
            range.page
        );
        ChannelResponse::Listing(listing)
    }
}
