//! # kml-parse
//!
//! Parser pour le format KML (Keyhole Markup Language) utilisé par Google Earth
//! et la plupart des outils SIG grand public.
//!
//! ## Features
//!
//! - Parsing événementiel avec `quick-xml`, sans arbre DOM intermédiaire
//! - Containers `Folder`/`Document` récursifs, placemarks, ground overlays
//! - Géométries `Point`, `LineString`, `Polygon`, `MultiGeometry` et les
//!   extensions `gx:Track`/`gx:MultiTrack`
//! - Styles (`IconStyle`, `LineStyle`, `PolyStyle`, `BalloonStyle`) et
//!   résolution des `StyleMap`
//! - Types `geo` pour l'interopérabilité avec l'écosystème Rust géospatial
//!
//! ## Usage
//!
//! ```rust,ignore
//! use kml_parse::parse_str;
//!
//! let document = parse_str(&std::fs::read_to_string("carte.kml")?)?;
//!
//! for placemark in &document.placemarks {
//!     if let Some(style) = placemark
//!         .style_url
//!         .as_deref()
//!         .and_then(|url| document.resolve_style(url))
//!     {
//!         println!("{:?} -> echelle {}", placemark.geometry, style.icon_scale);
//!     }
//! }
//! ```

pub mod error;
pub mod parser;
pub mod reader;
pub mod types;

pub use error::KmlError;
pub use reader::KmlReader;
pub use types::{
    Container, Geometry, GroundOverlay, KmlDocument, LineString, MultiGeometry, MultiTrack,
    Placemark, Point, Polygon, Style, Track,
};

/// Parse un document KML complet depuis une chaîne.
///
/// # Returns
///
/// Un [`KmlDocument`] contenant les placemarks et containers de premier
/// niveau, les styles et style maps indexés par id, et les ground overlays.
/// Un style par défaut est toujours présent sous la clé vide.
///
/// # Errors
///
/// Retourne [`KmlError`] si le XML est malformé, tronqué, ou si un élément
/// reconnu porte un contenu invalide (coordonnées, couleurs, bornes).
pub fn parse_str(kml: &str) -> Result<KmlDocument, KmlError> {
    let mut reader = KmlReader::from_str(kml);
    parser::document::parse(&mut reader)
}
