//! Parsers récursifs des sous-arbres KML
//!
//! Chaque module consomme exactement les événements de son propre sous-arbre
//! et rend la main curseur positionné sur son tag fermant.

pub mod color;
pub mod container;
pub mod coordinate;
pub mod document;
pub mod feature;
pub mod geometry;
pub mod style;

use std::collections::HashMap;

use crate::reader::{EventKind, KmlReader};
use crate::KmlError;

/// Tags non supportés, sautés sans interprétation avec leurs descendants
pub(crate) const UNSUPPORTED_TAGS: &[&str] = &[
    "altitude",
    "altitudeModeGroup",
    "altitudeMode",
    "begin",
    "bottomFov",
    "cookie",
    "displayName",
    "displayMode",
    "end",
    "expires",
    "extrude",
    "flyToView",
    "gridOrigin",
    "httpQuery",
    "leftFov",
    "linkDescription",
    "linkName",
    "linkSnippet",
    "listItemType",
    "maxSnippetLines",
    "maxSessionLength",
    "message",
    "minAltitude",
    "minFadeExtent",
    "minLodPixels",
    "minRefreshPeriod",
    "maxAltitude",
    "maxFadeExtent",
    "maxLodPixels",
    "maxHeight",
    "maxWidth",
    "near",
    "NetworkLink",
    "NetworkLinkControl",
    "overlayXY",
    "range",
    "refreshMode",
    "refreshInterval",
    "refreshVisibility",
    "rightFov",
    "roll",
    "rotationXY",
    "screenXY",
    "shape",
    "sourceHref",
    "state",
    "targetHref",
    "tessellate",
    "tileSize",
    "topFov",
    "viewBoundScale",
    "viewFormat",
    "viewRefreshMode",
    "viewRefreshTime",
    "when",
];

/// Propriétés scalaires reconnues d'un container ou d'un placemark
pub(crate) const FEATURE_PROPERTIES: &[&str] = &[
    "name",
    "description",
    "visibility",
    "open",
    "address",
    "phoneNumber",
];

/// Parse une valeur numérique dans un élément reconnu
///
/// Contenu malformé d'un élément reconnu: terminal, pas de récupération.
pub(crate) fn parse_number<T: std::str::FromStr>(tag: &str, text: &str) -> Result<T, KmlError> {
    text.trim()
        .parse()
        .map_err(|_| KmlError::invalid_number(tag, text))
}

pub(crate) fn is_unsupported(name: &str) -> bool {
    UNSUPPORTED_TAGS.contains(&name)
}

pub(crate) fn is_container(name: &str) -> bool {
    name == "Folder" || name == "Document"
}

/// Lit un sous-arbre `ExtendedData`: seule la forme non typée `Data`/`value`
/// est supportée (`name` comme clé en attente, `value` comme valeur); les
/// références `SimpleData`/schema ne sont pas reconnues
pub(crate) fn read_extended_data(
    reader: &mut KmlReader<'_>,
) -> Result<HashMap<String, String>, KmlError> {
    let mut properties = HashMap::new();
    let mut pending_key: Option<String> = None;

    loop {
        match reader.kind() {
            EventKind::EndTag if reader.name() == "ExtendedData" => break,
            EventKind::StartTag => {
                if reader.name() == "Data" {
                    pending_key = reader.attribute("name")?;
                } else if reader.name() == "value" {
                    if let Some(key) = pending_key.take() {
                        properties.insert(key, reader.read_text()?);
                    }
                }
            }
            EventKind::EndDocument => return Err(KmlError::UnexpectedEof),
            _ => {}
        }
        reader.next()?;
    }

    Ok(properties)
}
