//! Parser des sous-arbres géométrie
//!
//! Dispatch sur le nom d'élément: Point, LineString, Polygon, Track,
//! MultiGeometry et MultiTrack; les variantes composites recursent.

use chrono::NaiveDateTime;
use geo::Coord;

use crate::parser::coordinate::{parse_tuple, parse_tuple_sequence, TUPLE_SEPARATOR};
use crate::parser::read_extended_data;
use crate::reader::{EventKind, KmlReader};
use crate::types::{Geometry, LineString, MultiGeometry, MultiTrack, Point, Polygon, Track};
use crate::KmlError;

/// Motif ISO-8601 des éléments `when` d'un Track, toujours en UTC
const TRACK_TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";

/// Séparateur des éléments `coord` d'un Track
const TRACK_TUPLE_SEPARATOR: char = ' ';

const GEOMETRY_TAGS: &[&str] = &[
    "Point",
    "LineString",
    "Polygon",
    "MultiGeometry",
    "Track",
    "MultiTrack",
];

pub(crate) fn is_geometry(name: &str) -> bool {
    GEOMETRY_TAGS.contains(&name)
}

/// Parse l'élément géométrie courant en une variante de [`Geometry`]
///
/// Curseur attendu sur le tag ouvrant de la géométrie, rendu sur son tag
/// fermant. Un nom non reconnu est sauté et produit `None`.
pub(crate) fn parse(reader: &mut KmlReader<'_>) -> Result<Option<Geometry>, KmlError> {
    let geometry = match reader.name() {
        "Point" => Some(Geometry::Point(parse_point(reader)?)),
        "LineString" => Some(Geometry::LineString(parse_line_string(reader)?)),
        "Polygon" => Some(Geometry::Polygon(parse_polygon(reader)?)),
        "Track" => Some(Geometry::Track(parse_track(reader)?)),
        "MultiGeometry" => Some(Geometry::MultiGeometry(parse_multi_geometry(reader)?)),
        "MultiTrack" => Some(Geometry::MultiTrack(parse_multi_track(reader)?)),
        _ => {
            reader.skip()?;
            None
        }
    };
    Ok(geometry)
}

/// Parse un élément `Point`: un seul noeud `coordinates`, un seul tuple
fn parse_point(reader: &mut KmlReader<'_>) -> Result<Point, KmlError> {
    let mut parsed = None;

    loop {
        match reader.kind() {
            EventKind::EndTag if reader.name() == "Point" => break,
            EventKind::StartTag if reader.name() == "coordinates" => {
                let text = reader.read_text()?;
                parsed = Some(parse_tuple(&text, TUPLE_SEPARATOR)?);
            }
            EventKind::EndDocument => return Err(KmlError::UnexpectedEof),
            _ => {}
        }
        reader.next()?;
    }

    let (coordinate, altitude) =
        parsed.ok_or_else(|| KmlError::MalformedCoordinate("Point without coordinates".into()))?;
    Ok(Point {
        coordinate,
        altitude,
    })
}

/// Parse un élément `LineString`
///
/// Les altitudes ne sont ajoutées que lorsque le tuple en porte une; la liste
/// d'altitudes peut donc être plus courte que celle des coordonnées.
fn parse_line_string(reader: &mut KmlReader<'_>) -> Result<LineString, KmlError> {
    let mut line = LineString::default();

    loop {
        match reader.kind() {
            EventKind::EndTag if reader.name() == "LineString" => break,
            EventKind::StartTag if reader.name() == "coordinates" => {
                let text = reader.read_text()?;
                for (coordinate, altitude) in parse_tuple_sequence(&text)? {
                    line.coordinates.push(coordinate);
                    if let Some(altitude) = altitude {
                        line.altitudes.push(altitude);
                    }
                }
            }
            EventKind::EndDocument => return Err(KmlError::UnexpectedEof),
            _ => {}
        }
        reader.next()?;
    }

    Ok(line)
}

/// Parse un élément `Polygon`: exactement une boundary extérieure (la
/// dernière gagne si l'entrée en répète), zéro ou plusieurs boundaries
/// intérieures dans l'ordre du document
fn parse_polygon(reader: &mut KmlReader<'_>) -> Result<Polygon, KmlError> {
    // Indique dans quel type de boundary on se trouve; inconnu tant qu'aucun
    // tag de boundary n'a été lu
    let mut in_outer_boundary: Option<bool> = None;
    let mut polygon = Polygon::default();

    loop {
        match reader.kind() {
            EventKind::EndTag if reader.name() == "Polygon" => break,
            EventKind::StartTag => match reader.name() {
                "outerBoundaryIs" | "innerBoundaryIs" => {
                    in_outer_boundary = Some(reader.name() == "outerBoundaryIs");
                }
                "coordinates" => {
                    let text = reader.read_text()?;
                    let ring: Vec<Coord> = parse_tuple_sequence(&text)?
                        .into_iter()
                        .map(|(coordinate, _)| coordinate)
                        .collect();
                    match in_outer_boundary {
                        Some(true) => polygon.outer_boundary = ring,
                        Some(false) => polygon.inner_boundaries.push(ring),
                        None => return Err(KmlError::MissingBoundaryContext),
                    }
                }
                _ => {}
            },
            EventKind::EndDocument => return Err(KmlError::UnexpectedEof),
            _ => {}
        }
        reader.next()?;
    }

    Ok(polygon)
}

/// Parse un élément `Track`: tuples `coord` séparés par des espaces,
/// timestamps `when` ISO-8601, ExtendedData libre
///
/// Timestamps et coordonnées sont des séquences parallèles; leur cohérence de
/// longueur n'est pas validée ici.
fn parse_track(reader: &mut KmlReader<'_>) -> Result<Track, KmlError> {
    let mut track = Track::default();

    loop {
        match reader.kind() {
            EventKind::EndTag if reader.name() == "Track" => break,
            EventKind::StartTag => match reader.name() {
                "coord" => {
                    let text = reader.read_text()?;
                    let (coordinate, altitude) = parse_tuple(&text, TRACK_TUPLE_SEPARATOR)?;
                    track.coordinates.push(coordinate);
                    if let Some(altitude) = altitude {
                        track.altitudes.push(altitude);
                    }
                }
                "when" => {
                    let text = reader.read_text()?;
                    let timestamp =
                        NaiveDateTime::parse_from_str(text.trim(), TRACK_TIMESTAMP_FORMAT)
                            .map_err(|_| KmlError::InvalidTimestamp(text.clone()))?;
                    track.timestamps.push(timestamp.and_utc().timestamp_millis());
                }
                "ExtendedData" => {
                    track.properties.extend(read_extended_data(reader)?);
                }
                _ => {}
            },
            EventKind::EndDocument => return Err(KmlError::UnexpectedEof),
            _ => {}
        }
        reader.next()?;
    }

    Ok(track)
}

/// Parse un élément `MultiGeometry` en recursant sur chaque enfant reconnu
fn parse_multi_geometry(reader: &mut KmlReader<'_>) -> Result<MultiGeometry, KmlError> {
    let mut geometries = Vec::new();

    // Avancer d'abord, sinon le tag MultiGeometry lui-même matche le dispatch
    reader.next()?;
    loop {
        match reader.kind() {
            EventKind::EndTag if reader.name() == "MultiGeometry" => break,
            EventKind::StartTag if is_geometry(reader.name()) => {
                if let Some(geometry) = parse(reader)? {
                    geometries.push(geometry);
                }
            }
            EventKind::EndDocument => return Err(KmlError::UnexpectedEof),
            _ => {}
        }
        reader.next()?;
    }

    Ok(MultiGeometry::new(geometries))
}

/// Parse un élément `MultiTrack` en recursant sur chaque enfant `Track`
fn parse_multi_track(reader: &mut KmlReader<'_>) -> Result<MultiTrack, KmlError> {
    let mut tracks = Vec::new();

    reader.next()?;
    loop {
        match reader.kind() {
            EventKind::EndTag if reader.name() == "MultiTrack" => break,
            EventKind::StartTag if reader.name() == "Track" => {
                tracks.push(parse_track(reader)?);
            }
            EventKind::EndDocument => return Err(KmlError::UnexpectedEof),
            _ => {}
        }
        reader.next()?;
    }

    Ok(MultiTrack { tracks })
}
