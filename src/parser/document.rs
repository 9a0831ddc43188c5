//! Point d'entrée du parse: parcours du document complet

use tracing::{debug, trace};

use crate::parser::{container, feature, is_container, is_unsupported, style};
use crate::reader::{EventKind, KmlReader};
use crate::types::KmlDocument;
use crate::KmlError;

/// Parcourt un document KML entier et agrège les éléments de premier niveau
///
/// Le wrapper `<kml>` et les tags inconnus sont traversés sans interprétation;
/// seuls les containers, placemarks, styles, style maps et ground overlays
/// alimentent le document. Un style par défaut est enregistré sous la clé
/// vide pour les placemarks sans `styleUrl`.
pub fn parse(reader: &mut KmlReader<'_>) -> Result<KmlDocument, KmlError> {
    let mut document = KmlDocument::default();

    while reader.kind() != EventKind::EndDocument {
        if reader.kind() == EventKind::StartTag {
            let name = reader.name().to_string();
            if is_unsupported(&name) {
                trace!(tag = %name, "skipping unsupported element");
                reader.skip()?;
            } else if is_container(&name) {
                document.containers.push(container::parse(reader)?);
            } else if name == "Style" {
                let parsed = style::parse_style(reader)?;
                let style_id = parsed.style_id.clone().unwrap_or_default();
                document.styles.insert(style_id, parsed);
            } else if name == "StyleMap" {
                document.style_maps.extend(style::parse_style_map(reader)?);
            } else if name == "Placemark" {
                document.placemarks.push(feature::parse_placemark(reader)?);
            } else if name == "GroundOverlay" {
                document
                    .ground_overlays
                    .push(feature::parse_ground_overlay(reader)?);
            }
        }
        reader.next()?;
    }

    document.styles.entry(String::new()).or_default();

    debug!(
        placemarks = document.placemarks.len(),
        containers = document.containers.len(),
        styles = document.styles.len(),
        style_maps = document.style_maps.len(),
        ground_overlays = document.ground_overlays.len(),
        "kml document parsed"
    );

    Ok(document)
}
