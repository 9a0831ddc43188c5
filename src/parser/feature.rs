//! Parser des features: `Placemark` et `GroundOverlay`

use std::collections::HashMap;

use geo::{coord, Rect};

use crate::parser::{geometry, parse_number, read_extended_data, style, FEATURE_PROPERTIES};
use crate::reader::{EventKind, KmlReader};
use crate::types::{GroundOverlay, Placemark};
use crate::KmlError;

/// Propriétés scalaires reconnues d'un GroundOverlay
///
/// `drawOrder` et `visibility` sont interceptés avant la liste par leurs
/// branches dédiées.
const OVERLAY_PROPERTIES: &[&str] = &[
    "name",
    "description",
    "drawOrder",
    "visibility",
    "open",
    "address",
    "phoneNumber",
    "color",
];

const COMPASS_POINTS: &[&str] = &["north", "south", "east", "west"];

/// Parse un sous-arbre `Placemark`
///
/// Une seule géométrie est conservée: si l'entrée en répète, la dernière
/// reconnue écrase les précédentes. La référence `styleUrl` reste non
/// résolue; la résolution appartient à l'appelant.
pub(crate) fn parse_placemark(reader: &mut KmlReader<'_>) -> Result<Placemark, KmlError> {
    let mut placemark = Placemark::default();

    loop {
        match reader.kind() {
            EventKind::EndTag if reader.name() == "Placemark" => break,
            EventKind::StartTag => {
                let name = reader.name().to_string();
                if name == "styleUrl" {
                    placemark.style_url = Some(reader.read_text()?);
                } else if geometry::is_geometry(&name) {
                    placemark.geometry = geometry::parse(reader)?;
                } else if FEATURE_PROPERTIES.contains(&name.as_str()) {
                    placemark.properties.insert(name, reader.read_text()?);
                } else if name == "ExtendedData" {
                    placemark.properties.extend(read_extended_data(reader)?);
                } else if name == "Style" {
                    placemark.inline_style = Some(style::parse_style(reader)?);
                }
            }
            EventKind::EndDocument => return Err(KmlError::UnexpectedEof),
            _ => {}
        }
        reader.next()?;
    }

    Ok(placemark)
}

/// Parse un sous-arbre `GroundOverlay`
///
/// Les quatre points cardinaux sont obligatoires pour construire l'emprise;
/// le premier absent fait échouer le parse. La rotation est stockée négée
/// (convention de signe KML inversée par rapport au modèle).
pub(crate) fn parse_ground_overlay(reader: &mut KmlReader<'_>) -> Result<GroundOverlay, KmlError> {
    let mut image_url: Option<String> = None;
    let mut draw_order = 0.0f32;
    let mut visibility = 1i32;
    let mut rotation = 0.0f32;
    let mut properties = HashMap::new();
    let mut compass_points: HashMap<String, f64> = HashMap::new();

    loop {
        match reader.kind() {
            EventKind::EndTag if reader.name() == "GroundOverlay" => break,
            EventKind::StartTag => {
                let name = reader.name().to_string();
                if name == "Icon" {
                    if let Some(url) = read_image_url(reader)? {
                        image_url.get_or_insert(url);
                    }
                } else if name == "drawOrder" {
                    let text = reader.read_text()?;
                    draw_order = parse_number("drawOrder", &text)?;
                } else if name == "visibility" {
                    let text = reader.read_text()?;
                    visibility = parse_number("visibility", &text)?;
                } else if name == "ExtendedData" {
                    properties.extend(read_extended_data(reader)?);
                } else if name == "rotation" {
                    let text = reader.read_text()?;
                    rotation = -parse_number::<f32>("rotation", &text)?;
                } else if COMPASS_POINTS.contains(&name.as_str()) {
                    let text = reader.read_text()?;
                    let value = parse_number(&name, &text)?;
                    compass_points.insert(name, value);
                } else if OVERLAY_PROPERTIES.contains(&name.as_str()) {
                    properties.insert(name, reader.read_text()?);
                }
            }
            EventKind::EndDocument => return Err(KmlError::UnexpectedEof),
            _ => {}
        }
        reader.next()?;
    }

    let bounds = create_bounds(&compass_points)?;

    Ok(GroundOverlay {
        image_url,
        bounds,
        draw_order,
        visibility: visibility != 0,
        rotation,
        properties,
    })
}

/// Lit l'URL d'image dans le `href` imbriqué sous `Icon`; la première gagne
fn read_image_url(reader: &mut KmlReader<'_>) -> Result<Option<String>, KmlError> {
    let mut url = None;
    loop {
        match reader.kind() {
            EventKind::EndTag if reader.name() == "Icon" => break,
            EventKind::StartTag if reader.name() == "href" => {
                let text = reader.read_text()?;
                url.get_or_insert(text);
            }
            EventKind::EndDocument => return Err(KmlError::UnexpectedEof),
            _ => {}
        }
        reader.next()?;
    }
    Ok(url)
}

/// Emprise sud-ouest / nord-est depuis les quatre points cardinaux
fn create_bounds(compass_points: &HashMap<String, f64>) -> Result<Rect, KmlError> {
    let read = |point: &'static str| {
        compass_points
            .get(point)
            .copied()
            .ok_or(KmlError::MissingBoundsField(point))
    };
    let north = read("north")?;
    let south = read("south")?;
    let east = read("east")?;
    let west = read("west")?;

    Ok(Rect::new(
        coord! { x: west, y: south },
        coord! { x: east, y: north },
    ))
}
