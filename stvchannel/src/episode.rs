//! Descripteurs d'épisodes et items jouables.
//!
//! Un épisode se construit en deux temps. Le listing d'une émission ne
//! produit que des [`EpisodeDescriptor`] : des liens légers et sérialisables
//! qui portent tout ce qu'il faut pour lire l'épisode plus tard.
//! [`resolve_episode`] transforme un descripteur en [`PlayableItem`], avec sa
//! partie média, au moment où la lecture est demandée.

use serde::Serialize;

use crate::images::Thumb;

/// Champs bruts d'un épisode, tels que collectés dans un listing
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EpisodeFields {
    pub instance_id: String,
    pub title: String,
    pub summary: String,
    /// Nom affiché de l'émission (groupe)
    pub show: String,
    /// Numéro de saison tel qu'envoyé par l'API, non interprété
    pub season: String,
    /// Numéro d'épisode dans la saison, non interprété
    pub episode: String,
    /// Durée en secondes, `None` si inconnue
    pub duration: Option<u64>,
    /// URL absolue du flux
    pub url: String,
    pub thumb: Thumb,
}

/// Représentation d'un épisode dans un listing
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EpisodeDescriptor {
    /// Clé stable `simpletv/instance/<instance id>`
    pub rating_key: String,
    pub title: String,
    pub summary: String,
    pub show: String,
    pub season: Option<u32>,
    pub index: Option<u32>,
    pub duration_ms: Option<u64>,
    pub thumb: Thumb,
    /// Champs nécessaires à la résolution
    pub fields: EpisodeFields,
}

/// Protocole de streaming d'une partie média
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StreamProtocol {
    /// HTTP Live Streaming
    Hls,
}

/// Partie jouable d'un objet média
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MediaPart {
    pub url: String,
    pub protocol: StreamProtocol,
    pub duration_ms: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MediaObject {
    pub parts: Vec<MediaPart>,
    pub duration_ms: Option<u64>,
    pub optimized_for_streaming: bool,
}

/// Épisode résolu, prêt à être confié à un lecteur
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlayableItem {
    pub rating_key: String,
    pub title: String,
    pub summary: String,
    pub show: String,
    pub season: Option<u32>,
    pub index: Option<u32>,
    pub duration_ms: Option<u64>,
    pub thumb: Thumb,
    pub media: MediaObject,
}

impl PlayableItem {
    /// URL de la première partie média
    pub fn stream_url(&self) -> Option<&str> {
        self.media.parts.first().map(|part| part.url.as_str())
    }
}

/// Interprète saison et épisode ensemble : si l'un des deux n'est pas un
/// entier, aucun n'est conservé.
pub fn parse_season_episode(season: &str, episode: &str) -> (Option<u32>, Option<u32>) {
    match (season.trim().parse::<u32>(), episode.trim().parse::<u32>()) {
        (Ok(se), Ok(ep)) => (Some(se), Some(ep)),
        _ => (None, None),
    }
}

/// Durée enregistrée si connue, durée nominale sinon. Zéro vaut inconnu aux
/// deux niveaux : le résultat n'est jamais `Some(0)`.
pub fn resolve_duration(recorded: Option<u64>, nominal: Option<u64>) -> Option<u64> {
    recorded
        .filter(|d| *d > 0)
        .or_else(|| nominal.filter(|d| *d > 0))
}

/// Secondes vers millisecondes, une durée non représentable devient inconnue
fn to_millis(duration: Option<u64>) -> Option<u64> {
    duration.and_then(|secs| secs.checked_mul(1000))
}

/// Phase de listing : construit le descripteur affiché dans un listing d'épisodes.
pub fn describe_episode(fields: EpisodeFields) -> EpisodeDescriptor {
    let (season, index) = parse_season_episode(&fields.season, &fields.episode);

    EpisodeDescriptor {
        rating_key: format!("simpletv/instance/{}", fields.instance_id),
        title: fields.title.clone(),
        summary: fields.summary.clone(),
        show: fields.show.clone(),
        season,
        index,
        duration_ms: to_millis(fields.duration),
        thumb: fields.thumb.clone(),
        fields,
    }
}

/// Phase de résolution : construit l'item jouable et son unique partie HLS.
pub fn resolve_episode(descriptor: &EpisodeDescriptor) -> PlayableItem {
    let fields = &descriptor.fields;
    let (season, index) = parse_season_episode(&fields.season, &fields.episode);
    let duration_ms = to_millis(fields.duration);

    PlayableItem {
        rating_key: descriptor.rating_key.clone(),
        title: fields.title.clone(),
        summary: fields.summary.clone(),
        show: fields.show.clone(),
        season,
        index,
        duration_ms,
        thumb: fields.thumb.clone(),
        media: MediaObject {
            parts: vec![MediaPart {
                url: fields.url.clone(),
                protocol: StreamProtocol::Hls,
                duration_ms,
            }],
            duration_ms,
            optimized_for_streaming: true,
        },
    }
}
