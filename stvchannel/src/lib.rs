//! # stvchannel - Client du service Simple.TV
//!
//! Cette crate fournit un client Rust pour l'API d'annuaire et de streaming
//! Simple.TV : liste des DVR (media servers) d'un compte, navigation dans les
//! émissions et épisodes enregistrés, et résolution des URLs HLS.
//!
//! ## Vue d'ensemble
//!
//! - Validation des credentials du compte (HTTP Basic)
//! - Annuaire des media servers, chacun sondé pour savoir s'il est joignable
//!   sur le réseau local ou seulement via le relais internet
//! - Listings paginés des émissions (groupes) et des épisodes
//! - Résolution en deux temps des épisodes : descripteur léger au listing,
//!   item jouable à la lecture
//! - Cache en mémoire des réponses JSON
//!
//! ## Architecture
//!
//! - `SimpleTvChannel` : handlers de navigation, qui retournent toujours une
//!   [`ChannelResponse`] (listing ou message)
//! - `Session` : credentials, header d'authentification et table des serveurs
//! - `api` : couche d'accès à l'API REST
//! - `cache` : cache en mémoire avec TTL
//! - `episode`, `images`, `stream`, `paging` : fonctions pures
//!
//! ```text
//! stvchannel/
//! ├── src/
//! │   ├── lib.rs
//! │   ├── channel.rs          # Handlers de navigation
//! │   ├── session.rs          # État de navigation
//! │   ├── response.rs         # Listings et messages
//! │   ├── api/
//! │   │   ├── mod.rs          # Client API
//! │   │   ├── auth.rs         # Vérification des credentials
//! │   │   ├── directory.rs    # Annuaire et ping des serveurs
//! │   │   └── content.rs      # Groupes et épisodes
//! │   ├── cache.rs
//! │   ├── config_ext.rs       # Intégration stvconfig
//! │   ├── episode.rs
//! │   ├── error.rs
//! │   ├── images.rs
//! │   ├── models.rs
//! │   ├── paging.rs
//! │   ├── stream.rs
//! │   └── strings.rs          # Catalogue des messages
//! ```
//!
//! ## Utilisation
//!
//! ```rust,no_run
//! use stvchannel::{ChannelResponse, Session, SimpleTvChannel};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let channel = SimpleTvChannel::new()?;
//!     let mut session = Session::new();
//!
//!     let message = channel
//!         .validate_credentials(&mut session, "user@example.com", "password")
//!         .await;
//!     println!("{}: {}", message.header, message.text);
//!
//!     if let ChannelResponse::Listing(servers) = channel.main_menu(&mut session).await {
//!         for entry in servers.items {
//!             println!("{} ({})", entry.server.name, entry.tagline);
//!         }
//!     }
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod cache;
pub mod channel;
pub mod config_ext;
pub mod episode;
pub mod error;
pub mod images;
pub mod models;
pub mod paging;
pub mod response;
pub mod session;
pub mod stream;
pub mod strings;

pub use api::SimpleTvApi;
pub use channel::SimpleTvChannel;
pub use config_ext::SimpleTvConfigExt;
pub use episode::{EpisodeDescriptor, PlayableItem, describe_episode, resolve_episode};
pub use error::{ErrorKind, Result, StvError};
pub use images::Thumb;
pub use models::{Credentials, GroupEntry, Server, ServerEntry};
pub use paging::{PAGE_SIZE, PageRange};
pub use response::{ChannelResponse, Listing, Message, MessageKind, NextPage};
pub use session::Session;
pub use strings::StringKey;
