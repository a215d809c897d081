//! Sélection des visuels.
//!
//! Une vignette est soit une URL d'image fournie par l'API, soit l'une des
//! images livrées avec le channel.

use serde::{Deserialize, Serialize};

use crate::models::{lenient_bool, lenient_string, lenient_u64};

/// Image de fond
pub const ART: &str = "art-default.jpg";
/// Icône du channel, utilisée quand aucune image candidate n'existe
pub const ICON: &str = "icon-default.png";
/// Remplaçant d'un visuel absent ou générique
pub const MISSING: &str = "no-image.png";
/// DVR de première génération
pub const GEN1: &str = "gen1.jpg";
/// DVR de deuxième génération
pub const GEN2: &str = "gen2.jpg";

/// Largeur de l'affiche retenue
pub const POSTER_WIDTH: u64 = 300;

/// Référence de vignette
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "source", content = "value", rename_all = "snake_case")]
pub enum Thumb {
    /// Image livrée avec le channel
    Asset(&'static str),
    /// URL d'une image distante
    Remote(String),
}

impl Thumb {
    /// Nom de l'asset ou URL, pour l'affichage
    pub fn as_str(&self) -> &str {
        match self {
            Thumb::Asset(name) => name,
            Thumb::Remote(url) => url,
        }
    }
}

/// Descripteur d'image tel que renvoyé dans les tableaux `Images`
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ImageInfo {
    #[serde(rename = "Width", default, deserialize_with = "lenient_u64")]
    pub width: Option<u64>,
    #[serde(rename = "IsGeneric", default, deserialize_with = "lenient_bool")]
    pub is_generic: bool,
    #[serde(rename = "ImageUrl", default, deserialize_with = "lenient_string")]
    pub url: String,
}

/// Choisit l'affiche de 300px parmi `images`.
///
/// Une affiche générique donne [`MISSING`], l'absence de candidate de 300px
/// donne [`ICON`].
pub fn poster_image(images: &[ImageInfo]) -> Thumb {
    match images.iter().find(|i| i.width == Some(POSTER_WIDTH)) {
        Some(image) if image.is_generic => Thumb::Asset(MISSING),
        Some(image) => Thumb::Remote(image.url.clone()),
        None => Thumb::Asset(ICON),
    }
}

/// Vignette d'un modèle de DVR
pub fn server_thumb(model: &str) -> Thumb {
    match model {
        "STV_1000" => Thumb::Asset(GEN1),
        "STV_2000" => Thumb::Asset(GEN2),
        _ => Thumb::Asset(MISSING),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn image(width: u64, generic: bool, url: &str) -> ImageInfo {
        ImageInfo {
            width: Some(width),
            is_generic: generic,
            url: url.to_string(),
        }
    }

    #[test]
    fn test_poster_picks_300() {
        let images = vec![
            image(150, false, "http://img/150.jpg"),
            image(300, false, "http://img/300.jpg"),
            image(600, false, "http://img/600.jpg"),
        ];
        assert_eq!(
            poster_image(&images),
            Thumb::Remote("http://img/300.jpg".into())
        );
    }

    #[test]
    fn test_generic_poster_is_missing_asset() {
        let images = vec![image(300, true, "http://img/generic.jpg")];
        assert_eq!(poster_image(&images), Thumb::Asset(MISSING));
    }

    #[test]
    fn test_no_poster_is_icon() {
        let images = vec![image(150, false, "http://img/150.jpg")];
        assert_eq!(poster_image(&images), Thumb::Asset(ICON));
        assert_eq!(poster_image(&[]), Thumb::Asset(ICON));
    }

    #[test]
    fn test_first_300_wins() {
        let images = vec![
            image(300, true, "http://img/a.jpg"),
            image(300, false, "http://img/b.jpg"),
        ];
        assert_eq!(poster_image(&images), Thumb::Asset(MISSING));
    }

    #[test]
    fn test_image_info_is_lenient() {
        let images: Vec<ImageInfo> = serde_json::from_str(
            r#"[{"Width": "300", "IsGeneric": "false", "ImageUrl": "http://img/x.jpg"},
                {"Width": null}]"#,
        )
        .unwrap();
        assert_eq!(poster_image(&images), Thumb::Remote("http://img/x.jpg".into()));
        assert_eq!(images[1].width, None);
    }

    #[test]
    fn test_server_thumb() {
        assert_eq!(server_thumb("STV_1000"), Thumb::Asset(GEN1));
        assert_eq!(server_thumb("STV_2000"), Thumb::Asset(GEN2));
        assert_eq!(server_thumb("STV_9000"), Thumb::Asset(MISSING));
        assert_eq!(server_thumb(""), Thumb::Asset(MISSING));
    }
}
