//! Listings de contenu : groupes (émissions) et épisodes enregistrés

use super::SimpleTvApi;
use crate::cache::CachePolicy;
use crate::episode::resolve_duration;
use crate::error::{Result, StvError};
use crate::images::{ImageInfo, poster_image};
use crate::models::{GroupEntry, lenient, lenient_string, lenient_u64, lenient_vec, value_as_u64};
use crate::paging::PageRange;
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, warn};

/// Réponse de l'endpoint .../groups
#[derive(Debug, Default, Deserialize)]
struct GroupsResponse {
    #[serde(rename = "Groups", default, deserialize_with = "lenient_vec")]
    groups: Vec<GroupResponse>,
    #[serde(rename = "GroupsCount", default, deserialize_with = "lenient_u64")]
    groups_count: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
struct GroupResponse {
    #[serde(rename = "ID", default, deserialize_with = "lenient_string")]
    id: String,
    #[serde(rename = "Title", default, deserialize_with = "lenient_string")]
    title: String,
    #[serde(rename = "Description", default, deserialize_with = "lenient_string")]
    description: String,
    #[serde(rename = "Images", default, deserialize_with = "lenient_vec")]
    images: Vec<ImageInfo>,
    /// États par serveur, indexés par identifiant de serveur
    #[serde(rename = "States", default)]
    states: Value,
}

/// Élément de l'endpoint .../iteminstances
#[derive(Debug, Default, Deserialize)]
struct ItemResponse {
    #[serde(rename = "Title", default, deserialize_with = "lenient_string")]
    title: String,
    #[serde(rename = "Description", default, deserialize_with = "lenient_string")]
    description: String,
    #[serde(rename = "EpisodeSeasonNo", default, deserialize_with = "lenient_string")]
    season: String,
    #[serde(rename = "EpisodeSeasonSequence", default, deserialize_with = "lenient_string")]
    episode: String,
    #[serde(rename = "Images", default, deserialize_with = "lenient_vec")]
    images: Vec<ImageInfo>,
    #[serde(rename = "Instances", default, deserialize_with = "lenient_vec")]
    instances: Vec<InstanceResponse>,
}

#[derive(Debug, Default, Deserialize)]
struct InstanceResponse {
    #[serde(rename = "ID", default, deserialize_with = "lenient_string")]
    id: String,
    #[serde(rename = "Duration", default, deserialize_with = "lenient_u64")]
    duration: Option<u64>,
    #[serde(rename = "InstanceState", default, deserialize_with = "lenient")]
    state: InstanceStateResponse,
}

#[derive(Debug, Default, Deserialize)]
struct InstanceStateResponse {
    #[serde(rename = "RecordedDuration", default, deserialize_with = "lenient_u64")]
    recorded_duration: Option<u64>,
    #[serde(rename = "Streams", default, deserialize_with = "lenient_vec")]
    streams: Vec<StreamResponse>,
}

#[derive(Debug, Default, Deserialize)]
struct StreamResponse {
    #[serde(rename = "Location", default, deserialize_with = "lenient_string")]
    location: String,
}

/// Une page de groupes
#[derive(Debug, Clone)]
pub struct GroupPage {
    pub groups: Vec<GroupEntry>,
    /// Nombre total de groupes annoncé par le serveur
    pub total_count: Option<u64>,
}

/// Épisode tel que listé par l'API, avant résolution de l'URL de stream
#[derive(Debug, Clone, PartialEq)]
pub struct EpisodeRecord {
    pub instance_id: String,
    pub title: String,
    pub summary: String,
    pub season: String,
    pub episode: String,
    /// Durée en secondes (enregistrée, sinon nominale)
    pub duration: Option<u64>,
    /// Emplacement du stream, relatif à la base du serveur
    pub location: String,
    pub images: Vec<ImageInfo>,
}

/// Une page d'épisodes
#[derive(Debug, Clone)]
pub struct EpisodePage {
    pub episodes: Vec<EpisodeRecord>,
    /// Nombre d'éléments bruts renvoyés, y compris ceux ignorés
    pub raw_count: usize,
}

impl SimpleTvApi {
    /// Liste une page des groupes de la bibliothèque d'un serveur
    pub async fn list_groups(
        &self,
        server_id: &str,
        range: &PageRange,
        authorization: Option<&str>,
    ) -> Result<GroupPage> {
        let url = self.content_endpoint(
            &["content", "ond", "contentmap", server_id, "groups"],
            &range.query_value(),
        )?;
        let value = self
            .get_json(url, authorization, CachePolicy::Default)
            .await?;

        let page = parse_groups(value, server_id)?;
        debug!(
            "Got {} groups for server {} (total: {:?})",
            page.groups.len(),
            server_id,
            page.total_count
        );
        Ok(page)
    }

    /// Liste une page des épisodes enregistrés d'un groupe
    pub async fn list_episodes(
        &self,
        server_id: &str,
        group_id: &str,
        range: &PageRange,
        authorization: Option<&str>,
    ) -> Result<EpisodePage> {
        let url = self.content_endpoint(
            &[
                "content",
                "ond",
                "contentmap",
                server_id,
                "group",
                group_id,
                "iteminstances",
            ],
            &range.query_value(),
        )?;
        let value = self
            .get_json(url, authorization, CachePolicy::Default)
            .await?;

        let page = parse_episodes(value)?;
        debug!(
            "Got {} episodes ({} raw items) for group {}",
            page.episodes.len(),
            page.raw_count,
            group_id
        );
        Ok(page)
    }
}

/// `States[<server id>].LibraryCount`, `None` si absent ou invalide
fn library_count(states: &Value, server_id: &str) -> Option<u32> {
    states
        .get(server_id)
        .and_then(|state| state.get("LibraryCount"))
        .and_then(value_as_u64)
        .and_then(|count| u32::try_from(count).ok())
}

fn parse_groups(value: Value, server_id: &str) -> Result<GroupPage> {
    if !value.is_object() {
        return Err(StvError::Other("Unexpected groups response".to_string()));
    }
    let response: GroupsResponse = serde_json::from_value(value)?;

    let groups = response
        .groups
        .into_iter()
        .map(|group| GroupEntry {
            rating_key: format!("simpletv/group/{}", group.id),
            episode_count: library_count(&group.states, server_id),
            thumb: poster_image(&group.images),
            id: group.id,
            title: group.title,
            summary: group.description,
        })
        .collect();

    Ok(GroupPage {
        groups,
        total_count: response.groups_count,
    })
}

fn parse_episodes(value: Value) -> Result<EpisodePage> {
    let Value::Array(items) = value else {
        return Err(StvError::Other("Unexpected item instances response".to_string()));
    };
    let raw_count = items.len();

    let episodes = items
        .into_iter()
        .filter_map(|item| {
            let item: ItemResponse = serde_json::from_value(item).ok()?;
            let Some(instance) = item.instances.into_iter().next() else {
                warn!("Skipping \"{}\": no recorded instance", item.title);
                return None;
            };
            let Some(location) = instance
                .state
                .streams
                .into_iter()
                .next()
                .map(|stream| stream.location)
                .filter(|location| !location.is_empty())
            else {
                warn!("Skipping \"{}\": no stream location", item.title);
                return None;
            };

            Some(EpisodeRecord {
                instance_id: instance.id,
                title: item.title,
                summary: item.description,
                season: item.season,
                episode: item.episode,
                duration: resolve_duration(instance.state.recorded_duration, instance.duration),
                location,
                images: item.images,
            })
        })
        .collect();

    Ok(EpisodePage {
        episodes,
        raw_count,
    })
}
