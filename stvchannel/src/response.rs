//! Réponses des handlers du channel.
//!
//! Un handler produit soit un [`Listing`] d'entrées, soit un [`Message`]
//! unique (confirmation, état vide ou erreur). Les erreurs ne sortent jamais
//! d'un handler sous forme d'`Err` : elles deviennent un message.

use serde::Serialize;

use crate::error::{ErrorKind, StvError};
use crate::images::{ART, Thumb};
use crate::strings::StringKey;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageKind {
    Success,
    MissingCredentials,
    AuthenticationFailed,
    NetworkProblem,
    UnknownServer,
    /// Rien à afficher, ce n'est pas une erreur
    Empty,
}

impl MessageKind {
    pub fn is_error(self) -> bool {
        !matches!(self, MessageKind::Success | MessageKind::Empty)
    }
}

impl From<ErrorKind> for MessageKind {
    fn from(kind: ErrorKind) -> Self {
        match kind {
            ErrorKind::MissingCredentials => MessageKind::MissingCredentials,
            ErrorKind::AuthenticationFailed => MessageKind::AuthenticationFailed,
            ErrorKind::NetworkProblem => MessageKind::NetworkProblem,
            ErrorKind::UnknownServer => MessageKind::UnknownServer,
        }
    }
}

/// Message de type boîte de dialogue
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Message {
    pub kind: MessageKind,
    pub header: String,
    pub text: String,
}

impl Message {
    pub fn new(kind: MessageKind, header: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            kind,
            header: header.into(),
            text: text.into(),
        }
    }

    /// Message construit à partir des clés du catalogue
    pub fn from_keys(kind: MessageKind, header: StringKey, text: StringKey) -> Self {
        Self::new(kind, header.text(), text.text())
    }

    /// Message utilisateur correspondant à une erreur de la bibliothèque
    pub fn from_error(error: &StvError) -> Self {
        let kind = MessageKind::from(error.kind());
        let text = match kind {
            MessageKind::MissingCredentials => StringKey::SetAuth,
            MessageKind::AuthenticationFailed => StringKey::BadAuth,
            MessageKind::UnknownServer => StringKey::UnknownServer,
            _ => StringKey::NetworkProblem,
        };
        Self::from_keys(kind, StringKey::Error, text)
    }
}

/// Lien vers la page suivante d'un listing
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NextPage {
    pub page: u32,
    pub title: String,
}

/// Liste titrée d'entrées
#[derive(Debug, Clone, Serialize)]
pub struct Listing<T> {
    pub title: String,
    pub art: Thumb,
    pub items: Vec<T>,
    pub next_page: Option<NextPage>,
    /// Message affiché avec les entrées
    pub notice: Option<Message>,
}

impl<T> Listing<T> {
    pub fn new(title: impl Into<String>, items: Vec<T>) -> Self {
        Self {
            title: title.into(),
            art: Thumb::Asset(ART),
            items,
            next_page: None,
            notice: None,
        }
    }

    pub fn with_next_page(mut self, page: u32, title: StringKey) -> Self {
        self.next_page = Some(NextPage {
            page,
            title: title.text().to_string(),
        });
        self
    }

    pub fn with_notice(mut self, notice: Message) -> Self {
        self.notice = Some(notice);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty() && self.next_page.is_none()
    }
}

/// Résultat d'un handler de navigation
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ChannelResponse<T> {
    Listing(Listing<T>),
    Message(Message),
}

impl<T> ChannelResponse<T> {
    pub fn listing(&self) -> Option<&Listing<T>> {
        match self {
            ChannelResponse::Listing(listing) => Some(listing),
            ChannelResponse::Message(_) => None,
        }
    }

    pub fn into_listing(self) -> Option<Listing<T>> {
        match self {
            ChannelResponse::Listing(listing) => Some(listing),
            ChannelResponse::Message(_) => None,
        }
    }

    pub fn message(&self) -> Option<&Message> {
        match self {
            ChannelResponse::Listing(_) => None,
            ChannelResponse::Message(message) => Some(message),
        }
    }

    /// Vrai si la réponse est un message d'erreur
    pub fn is_error(&self) -> bool {
        self.message().is_some_and(|m| m.kind.is_error())
    }

    /// Message d'erreur porté par la réponse, y compris la notice d'un
    /// listing (absence de credentials par exemple)
    pub fn failure(&self) -> Option<&Message> {
        let message = match self {
            ChannelResponse::Listing(listing) => listing.notice.as_ref(),
            ChannelResponse::Message(message) => Some(message),
        };
        message.filter(|message| message.kind.is_error())
    }
}

impl<T> From<StvError> for ChannelResponse<T> {
    fn from(error: StvError) -> Self {
        ChannelResponse::Message(Message::from_error(&error))
    }
}
