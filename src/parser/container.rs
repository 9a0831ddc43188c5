//! Parser récursif des containers `Folder` et `Document`

use tracing::trace;

use crate::parser::{
    feature, is_container, is_unsupported, read_extended_data, style, FEATURE_PROPERTIES,
};
use crate::reader::{EventKind, KmlReader};
use crate::types::Container;
use crate::KmlError;

/// Parse un sous-arbre `Folder` ou `Document`
///
/// Le curseur entre sur le tag ouvrant du container et en ressort sur son
/// tag fermant. Les containers imbriqués sont parsés récursivement, chacun
/// entièrement clos avant d'être rattaché au parent.
pub(crate) fn parse(reader: &mut KmlReader<'_>) -> Result<Container, KmlError> {
    let closing_tag = reader.name().to_string();
    let mut container = Container {
        container_id: reader.attribute("id")?,
        ..Container::default()
    };

    // Avancer d'abord, sinon le tag ouvrant lui-même matche le dispatch
    reader.next()?;

    loop {
        match reader.kind() {
            EventKind::EndTag if reader.name() == closing_tag => break,
            EventKind::StartTag => {
                let name = reader.name().to_string();
                if is_unsupported(&name) {
                    trace!(tag = %name, "skipping unsupported element");
                    reader.skip()?;
                } else if is_container(&name) {
                    container.containers.push(parse(reader)?);
                } else if FEATURE_PROPERTIES.contains(&name.as_str()) {
                    container.properties.insert(name, reader.read_text()?);
                } else if name == "StyleMap" {
                    container.style_maps.extend(style::parse_style_map(reader)?);
                } else if name == "Style" {
                    let parsed = style::parse_style(reader)?;
                    if let Some(style_id) = parsed.style_id.clone() {
                        container.styles.insert(style_id, parsed);
                    }
                } else if name == "Placemark" {
                    container.placemarks.push(feature::parse_placemark(reader)?);
                } else if name == "ExtendedData" {
                    container.properties.extend(read_extended_data(reader)?);
                } else if name == "GroundOverlay" {
                    container
                        .ground_overlays
                        .push(feature::parse_ground_overlay(reader)?);
                }
            }
            EventKind::EndDocument => return Err(KmlError::UnexpectedEof),
            _ => {}
        }
        reader.next()?;
    }

    Ok(container)
}
