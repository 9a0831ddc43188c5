//! Types d'erreurs pour le crate kml-parse

use thiserror::Error;

/// Erreurs pouvant survenir lors du parsing KML
#[derive(Debug, Error)]
pub enum KmlError {
    /// XML mal formé, propagé depuis la source d'événements
    #[error("malformed XML: {0}")]
    Xml(#[from] quick_xml::Error),

    /// Attribut XML illisible
    #[error("malformed XML attribute: {0}")]
    Attr(#[from] quick_xml::events::attributes::AttrError),

    /// Fin de document atteinte alors qu'un élément est encore ouvert
    #[error("unexpected end of document")]
    UnexpectedEof,

    /// Tuple de coordonnées incomplet ou non numérique
    #[error("malformed coordinate tuple: {0:?}")]
    MalformedCoordinate(String),

    /// Valeur `when` d'un Track ne respectant pas le motif ISO-8601 attendu
    #[error("invalid timestamp: {0:?}")]
    InvalidTimestamp(String),

    /// `coordinates` d'un Polygon rencontré avant tout tag de boundary
    #[error("polygon coordinates found outside of any boundary element")]
    MissingBoundaryContext,

    /// GroundOverlay incomplet: un des quatre points cardinaux manque
    #[error("ground overlay is missing the {0} bound")]
    MissingBoundsField(&'static str),

    /// Couleur compactée invalide (longueur ou chiffres hexadécimaux)
    #[error("invalid packed color: {0:?}")]
    InvalidColor(String),

    /// Valeur numérique invalide dans un élément reconnu
    #[error("invalid numeric value for {tag}: {value:?}")]
    InvalidNumber { tag: String, value: String },
}

impl KmlError {
    /// Crée une erreur de valeur numérique invalide avec contexte
    pub fn invalid_number(tag: impl Into<String>, value: impl Into<String>) -> Self {
        Self::InvalidNumber {
            tag: tag.into(),
            value: value.into(),
        }
    }
}
