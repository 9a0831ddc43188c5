//! Types de données pour le crate kml-parse

use std::collections::{HashMap, HashSet};

use geo::{Coord, Rect};

/// Résultat du parsing d'un document KML complet
///
/// Les références de style (`styleUrl`) des placemarks restent non résolues:
/// le contrat est en deux phases (parser, puis résoudre via [`KmlDocument::resolve_style`]).
#[derive(Debug, Default)]
pub struct KmlDocument {
    /// Placemarks de premier niveau, dans l'ordre du document
    pub placemarks: Vec<Placemark>,

    /// Containers de premier niveau (Folder / Document)
    pub containers: Vec<Container>,

    /// Styles indexés par id préfixé `#`; l'id vide désigne le style par défaut,
    /// toujours présent après le parsing
    pub styles: HashMap<String, Style>,

    /// StyleMaps: id de map -> id du style référencé par la paire `normal`
    pub style_maps: HashMap<String, String>,

    /// GroundOverlays de premier niveau
    pub ground_overlays: Vec<GroundOverlay>,
}

impl KmlDocument {
    /// Résout une référence de style en suivant au besoin l'indirection StyleMap
    pub fn resolve_style(&self, style_url: &str) -> Option<&Style> {
        match self.style_maps.get(style_url) {
            Some(mapped) => self.styles.get(mapped),
            None => self.styles.get(style_url),
        }
    }
}

/// Géométrie KML, variante fermée
///
/// Chaque variante rapporte un tag de type via [`Geometry::geometry_type`].
#[derive(Debug, Clone, PartialEq)]
pub enum Geometry {
    Point(Point),
    LineString(LineString),
    Polygon(Polygon),
    MultiGeometry(MultiGeometry),
    Track(Track),
    MultiTrack(MultiTrack),
}

impl Geometry {
    /// Tag de type de la géométrie
    ///
    /// Pour `MultiGeometry` c'est le label d'affichage, modifiable via
    /// [`MultiGeometry::set_geometry_type`], jamais utilisé pour le dispatch.
    pub fn geometry_type(&self) -> &str {
        match self {
            Geometry::Point(_) => "Point",
            Geometry::LineString(_) => "LineString",
            Geometry::Polygon(_) => "Polygon",
            Geometry::MultiGeometry(multi) => multi.geometry_type(),
            Geometry::Track(_) => "Track",
            Geometry::MultiTrack(_) => "MultiTrack",
        }
    }
}

/// Point avec altitude optionnelle
///
/// La coordonnée suit la convention `geo`: `x` = longitude, `y` = latitude.
#[derive(Debug, Clone, PartialEq)]
pub struct Point {
    pub coordinate: Coord,

    pub altitude: Option<f64>,
}

/// Suite ordonnée de coordonnées avec altitudes optionnelles
///
/// Une altitude n'est ajoutée que lorsque le tuple source en porte une:
/// `altitudes` peut donc être plus court que `coordinates`. Comportement
/// documenté du format, préservé tel quel.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LineString {
    pub coordinates: Vec<Coord>,

    pub altitudes: Vec<f64>,
}

/// Polygone: exactement une boundary extérieure, zéro ou plusieurs trous
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Polygon {
    pub outer_boundary: Vec<Coord>,

    pub inner_boundaries: Vec<Vec<Coord>>,
}

impl Polygon {
    /// Tous les rings, boundary extérieure en premier
    pub fn rings(&self) -> Vec<&[Coord]> {
        let mut rings: Vec<&[Coord]> = Vec::with_capacity(1 + self.inner_boundaries.len());
        rings.push(&self.outer_boundary);
        for inner in &self.inner_boundaries {
            rings.push(inner);
        }
        rings
    }
}

/// Collection hétérogène de géométries
#[derive(Debug, Clone, PartialEq)]
pub struct MultiGeometry {
    pub geometries: Vec<Geometry>,

    /// Label d'affichage: "MultiGeometry" par défaut, ou "MultiPoint",
    /// "MultiLineString", "MultiPolygon" selon le contenu
    geometry_type: String,
}

impl MultiGeometry {
    pub fn new(geometries: Vec<Geometry>) -> Self {
        Self {
            geometries,
            geometry_type: "MultiGeometry".to_string(),
        }
    }

    pub fn geometry_type(&self) -> &str {
        &self.geometry_type
    }

    pub fn set_geometry_type(&mut self, geometry_type: impl Into<String>) {
        self.geometry_type = geometry_type.into();
    }
}

/// Track gx: coordonnées et timestamps en séquences parallèles
///
/// Les longueurs de `coordinates` et `timestamps` ne sont pas validées l'une
/// contre l'autre par le parser; c'est au consommateur de décider.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Track {
    pub coordinates: Vec<Coord>,

    pub altitudes: Vec<f64>,

    /// Millisecondes depuis l'epoch, UTC
    pub timestamps: Vec<i64>,

    pub properties: HashMap<String, String>,
}

/// Collection de tracks
#[derive(Debug, Clone, PartialEq)]
pub struct MultiTrack {
    pub tracks: Vec<Track>,
}

impl MultiTrack {
    /// Expose les tracks sous forme de MultiGeometry
    pub fn as_multi_geometry(&self) -> MultiGeometry {
        MultiGeometry::new(self.tracks.iter().cloned().map(Geometry::Track).collect())
    }
}

/// Placemark: géométrie, propriétés et style
#[derive(Debug, Clone, Default)]
pub struct Placemark {
    /// Référence de style lue depuis `styleUrl`, non résolue (sert aussi
    /// d'identité à la feature)
    pub style_url: Option<String>,

    /// Dernière géométrie reconnue dans le Placemark
    pub geometry: Option<Geometry>,

    /// Propriétés scalaires et ExtendedData fusionnées (clé -> valeur)
    pub properties: HashMap<String, String>,

    /// Style inline, prioritaire sur la référence `styleUrl`
    pub inline_style: Option<Style>,
}

impl Placemark {
    /// Valeur d'une propriété, si elle existe
    pub fn property(&self, key: &str) -> Option<&str> {
        self.properties.get(key).map(String::as_str)
    }

    pub fn has_property(&self, key: &str) -> bool {
        self.properties.contains_key(key)
    }

    pub fn has_geometry(&self) -> bool {
        self.geometry.is_some()
    }
}

/// Image drapée sur une emprise géographique
#[derive(Debug, Clone)]
pub struct GroundOverlay {
    /// URL de l'image, depuis `Icon/href`
    pub image_url: Option<String>,

    /// Emprise: coin sud-ouest / nord-est (`x` = longitude, `y` = latitude)
    pub bounds: Rect,

    /// Ordre de dessin (z-index), 0.0 par défaut
    pub draw_order: f32,

    /// Visible par défaut
    pub visibility: bool,

    /// Rotation, stockée négée par rapport à la valeur KML (convention de
    /// signe inversée)
    pub rotation: f32,

    pub properties: HashMap<String, String>,
}

impl GroundOverlay {
    pub fn property(&self, key: &str) -> Option<&str> {
        self.properties.get(key).map(String::as_str)
    }

    pub fn has_property(&self, key: &str) -> bool {
        self.properties.contains_key(key)
    }
}

/// Container Folder/Document, récursif
///
/// Construit de bas en haut: chaque container imbriqué est entièrement parsé
/// et clos avant d'être rattaché à la liste de son parent.
#[derive(Debug, Clone, Default)]
pub struct Container {
    /// Attribut `id` du tag ouvrant, s'il existe
    pub container_id: Option<String>,

    pub properties: HashMap<String, String>,

    /// Styles portant un id; les styles anonymes sont écartés
    pub styles: HashMap<String, Style>,

    /// StyleMaps locales: id de map -> id de style référencé
    pub style_maps: HashMap<String, String>,

    pub placemarks: Vec<Placemark>,

    /// Containers imbriqués, dans l'ordre du document
    pub containers: Vec<Container>,

    pub ground_overlays: Vec<GroundOverlay>,
}

impl Container {
    pub fn property(&self, key: &str) -> Option<&str> {
        self.properties.get(key).map(String::as_str)
    }

    pub fn has_containers(&self) -> bool {
        !self.containers.is_empty()
    }
}

/// Style KML (IconStyle / LineStyle / PolyStyle / BalloonStyle)
///
/// Les setters enregistrent le nom du sous-style dans l'ensemble des styles
/// explicitement définis, ce qui permet de distinguer "valeur par défaut" de
/// "valeur configurée" via [`Style::is_style_set`].
#[derive(Debug, Clone)]
pub struct Style {
    /// Id préfixé `#` pour correspondre à la syntaxe `styleUrl`
    pub style_id: Option<String>,

    /// Remplissage du polygone
    pub fill: bool,

    /// Contour du polygone
    pub outline: bool,

    /// URL de l'icône du marqueur
    pub icon_url: Option<String>,

    /// Échelle de l'icône, 1.0 par défaut
    pub icon_scale: f64,

    /// Rotation du marqueur en degrés
    pub heading: f32,

    /// Point d'ancrage du marqueur, fractions (x, y); (0.5, 1.0) par défaut
    pub anchor: (f32, f32),

    /// Couleur du marqueur réduite à un angle de teinte HSV
    pub marker_hue: f32,

    /// Couleur de contour (lignes et polygones), ARGB
    pub outline_color: Option<u32>,

    /// Couleur de remplissage du polygone, ARGB
    pub fill_color: Option<u32>,

    /// Largeur de trait
    pub width: f32,

    pub icon_random_color_mode: bool,

    pub line_random_color_mode: bool,

    pub poly_random_color_mode: bool,

    /// Contenu du BalloonStyle (clé "text")
    pub balloon_options: HashMap<String, String>,

    /// Noms des sous-styles explicitement définis
    styles_set: HashSet<&'static str>,
}

impl Default for Style {
    fn default() -> Self {
        Self {
            style_id: None,
            fill: true,
            outline: true,
            icon_url: None,
            icon_scale: 1.0,
            heading: 0.0,
            anchor: (0.5, 1.0),
            marker_hue: 0.0,
            outline_color: None,
            fill_color: None,
            width: 1.0,
            icon_random_color_mode: false,
            line_random_color_mode: false,
            poly_random_color_mode: false,
            balloon_options: HashMap::new(),
            styles_set: HashSet::new(),
        }
    }
}

impl Style {
    /// Vérifie si un sous-style donné a été explicitement défini
    pub fn is_style_set(&self, style: &str) -> bool {
        self.styles_set.contains(style)
    }

    pub fn has_fill(&self) -> bool {
        self.fill
    }

    pub fn has_outline(&self) -> bool {
        self.outline
    }

    pub fn has_balloon_style(&self) -> bool {
        !self.balloon_options.is_empty()
    }

    pub(crate) fn set_fill(&mut self, fill: bool) {
        self.fill = fill;
        self.styles_set.insert("fill");
    }

    pub(crate) fn set_outline(&mut self, outline: bool) {
        self.outline = outline;
        self.styles_set.insert("outline");
    }

    pub(crate) fn set_icon_url(&mut self, icon_url: String) {
        self.icon_url = Some(icon_url);
        self.styles_set.insert("iconUrl");
    }

    pub(crate) fn set_icon_scale(&mut self, scale: f64) {
        self.icon_scale = scale;
        self.styles_set.insert("iconScale");
    }

    pub(crate) fn set_heading(&mut self, heading: f32) {
        self.heading = heading;
        self.styles_set.insert("heading");
    }

    /// Seules les unités `"fraction"` sont honorées; les autres retombent sur
    /// l'ancre par défaut (0.5, 1.0)
    pub(crate) fn set_hot_spot(&mut self, x: f32, y: f32, x_units: &str, y_units: &str) {
        let mut anchor = (0.5, 1.0);
        if x_units == "fraction" {
            anchor.0 = x;
        }
        if y_units == "fraction" {
            anchor.1 = y;
        }
        self.anchor = anchor;
        self.styles_set.insert("hotSpot");
    }

    pub(crate) fn set_marker_hue(&mut self, hue: f32) {
        self.marker_hue = hue;
        self.styles_set.insert("markerColor");
    }

    pub(crate) fn set_outline_color(&mut self, color: u32) {
        self.outline_color = Some(color);
        self.styles_set.insert("outlineColor");
    }

    pub(crate) fn set_fill_color(&mut self, color: u32) {
        self.fill_color = Some(color);
        self.styles_set.insert("fillColor");
    }

    pub(crate) fn set_width(&mut self, width: f32) {
        self.width = width;
        self.styles_set.insert("width");
    }

    pub(crate) fn set_icon_color_mode(&mut self, color_mode: &str) {
        self.icon_random_color_mode = color_mode == "random";
        self.styles_set.insert("iconColorMode");
    }

    pub(crate) fn set_line_color_mode(&mut self, color_mode: &str) {
        self.line_random_color_mode = color_mode == "random";
        self.styles_set.insert("lineColorMode");
    }

    pub(crate) fn set_poly_color_mode(&mut self, color_mode: &str) {
        self.poly_random_color_mode = color_mode == "random";
        self.styles_set.insert("polyColorMode");
    }

    pub(crate) fn set_balloon_text(&mut self, text: String) {
        self.balloon_options.insert("text".to_string(), text);
    }
}
