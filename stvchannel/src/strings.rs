//! Catalogue des messages (textes en anglais).
//!
//! Les clés sont celles des messages utilisateur du channel. Un front-end qui
//! a ses propres traductions peut se baser sur la clé et ignorer le texte.

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum StringKey {
    Error,
    Success,
    EmptyCredentials,
    BadAuth,
    SetAuth,
    PrefsSaved,
    PrefsTitle,
    NetworkProblem,
    MediaServerTitle,
    EmptyTitle,
    EmptyLibrary,
    EmptyGroup,
    MoreGroups,
    MoreItems,
    Local,
    Remote,
    UnknownServer,
}

impl StringKey {
    pub fn text(self) -> &'static str {
        match self {
            StringKey::Error => "Error",
            StringKey::Success => "Success",
            StringKey::EmptyCredentials => "Please enter both a username and a password.",
            StringKey::BadAuth => "The username or password is incorrect.",
            StringKey::SetAuth => "Please set your SimpleTV username and password.",
            StringKey::PrefsSaved => "Your preferences have been saved.",
            StringKey::PrefsTitle => "Preferences",
            StringKey::NetworkProblem => {
                "Unable to reach the SimpleTV service. Please try again later."
            }
            StringKey::MediaServerTitle => "Media Servers",
            StringKey::EmptyTitle => "Empty",
            StringKey::EmptyLibrary => "There are no recordings in this library.",
            StringKey::EmptyGroup => "There are no recorded episodes of this show.",
            StringKey::MoreGroups => "More Shows...",
            StringKey::MoreItems => "More Episodes...",
            StringKey::Local => "Local",
            StringKey::Remote => "Remote",
            StringKey::UnknownServer => {
                "This media server is not known yet. Please list the media servers first."
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_texts_are_not_empty() {
        for key in [
            StringKey::Error,
            StringKey::BadAuth,
            StringKey::NetworkProblem,
            StringKey::EmptyLibrary,
            StringKey::EmptyGroup,
            StringKey::UnknownServer,
        ] {
            assert!(!key.text().is_empty(), "{:?}", key);
        }
    }
}
