//! Codec des tuples de coordonnées KML
//!
//! Un tuple s'écrit `longitude,latitude[,altitude]` dans les noeuds texte
//! `coordinates`, et `longitude latitude altitude` (séparateur espace) dans
//! les éléments `coord` des tracks.

use geo::{coord, Coord};

use crate::KmlError;

/// Séparateur des noeuds `coordinates`
pub(crate) const TUPLE_SEPARATOR: char = ',';

/// Parse un tuple `lon<sep>lat[<sep>alt]`
///
/// La longitude vient en premier dans le texte source. Les champs vides en
/// fin de tuple sont ignorés (certains exports terminent par un séparateur).
///
/// # Errors
///
/// `MalformedCoordinate` si moins de deux champs ou si un champ n'est pas
/// numérique.
pub fn parse_tuple(text: &str, separator: char) -> Result<(Coord, Option<f64>), KmlError> {
    let mut fields: Vec<&str> = text.split(separator).collect();
    while fields.last().is_some_and(|field| field.is_empty()) {
        fields.pop();
    }

    if fields.len() < 2 {
        return Err(KmlError::MalformedCoordinate(text.to_string()));
    }

    let lon = parse_f64(fields[0], text)?;
    let lat = parse_f64(fields[1], text)?;
    let altitude = if fields.len() > 2 {
        Some(parse_f64(fields[2], text)?)
    } else {
        None
    };

    Ok((coord! { x: lon, y: lat }, altitude))
}

/// Parse un noeud texte `coordinates` complet: trim, découpe sur les suites
/// de blancs, un tuple `,`-séparé par token
pub fn parse_tuple_sequence(text: &str) -> Result<Vec<(Coord, Option<f64>)>, KmlError> {
    text.trim()
        .split_whitespace()
        .map(|token| parse_tuple(token, TUPLE_SEPARATOR))
        .collect()
}

/// Parse f64 via fast-float, 4-10x plus rapide que std::parse sur ce profil
/// de données
#[inline]
fn parse_f64(field: &str, tuple: &str) -> Result<f64, KmlError> {
    fast_float::parse(field.trim()).map_err(|_| KmlError::MalformedCoordinate(tuple.to_string()))
}
