//! Parser des sous-arbres `Style` et `StyleMap`

use std::collections::HashMap;

use crate::parser::color::{convert_packed_color, hue, to_opaque_argb};
use crate::parser::parse_number;
use crate::reader::{EventKind, KmlReader};
use crate::types::Style;
use crate::KmlError;

/// Parse un sous-arbre `Style` (IconStyle / LineStyle / PolyStyle /
/// BalloonStyle)
///
/// L'attribut `id`, s'il existe, est stocké préfixé de `#` pour correspondre
/// à la syntaxe des références `styleUrl`.
pub(crate) fn parse_style(reader: &mut KmlReader<'_>) -> Result<Style, KmlError> {
    let mut style = Style::default();
    if let Some(id) = reader.attribute("id")? {
        style.style_id = Some(format!("#{id}"));
    }

    loop {
        match reader.kind() {
            EventKind::EndTag if reader.name() == "Style" => break,
            EventKind::StartTag => match reader.name() {
                "IconStyle" => parse_icon_style(reader, &mut style)?,
                "LineStyle" => parse_line_style(reader, &mut style)?,
                "PolyStyle" => parse_poly_style(reader, &mut style)?,
                "BalloonStyle" => parse_balloon_style(reader, &mut style)?,
                _ => {}
            },
            EventKind::EndDocument => return Err(KmlError::UnexpectedEof),
            _ => {}
        }
        reader.next()?;
    }

    Ok(style)
}

/// Parse un sous-arbre `StyleMap` et retourne ses entrées `id -> référence`
///
/// Seule la paire dont le `key` vaut `"normal"` est conservée; une paire
/// `"highlight"` est volontairement écartée.
pub(crate) fn parse_style_map(
    reader: &mut KmlReader<'_>,
) -> Result<HashMap<String, String>, KmlError> {
    let style_id = format!("#{}", reader.attribute("id")?.unwrap_or_default());
    let mut style_map = HashMap::new();
    // Armé par un <key>normal</key>, désarmé par le styleUrl qui suit
    let mut normal_pair = false;

    loop {
        match reader.kind() {
            EventKind::EndTag if reader.name() == "StyleMap" => break,
            EventKind::StartTag => {
                if reader.name() == "key" {
                    // Un key autre que "normal" est ignoré sans désarmer
                    if reader.read_text()? == "normal" {
                        normal_pair = true;
                    }
                } else if reader.name() == "styleUrl" && normal_pair {
                    style_map.insert(style_id.clone(), reader.read_text()?);
                    normal_pair = false;
                }
            }
            EventKind::EndDocument => return Err(KmlError::UnexpectedEof),
            _ => {}
        }
        reader.next()?;
    }

    Ok(style_map)
}

/// IconStyle: heading, Icon/href, hotSpot, scale, couleur réduite en teinte,
/// colorMode
fn parse_icon_style(reader: &mut KmlReader<'_>, style: &mut Style) -> Result<(), KmlError> {
    loop {
        match reader.kind() {
            EventKind::EndTag if reader.name() == "IconStyle" => break,
            EventKind::StartTag => match reader.name() {
                "heading" => {
                    let text = reader.read_text()?;
                    style.set_heading(parse_number("heading", &text)?);
                }
                "Icon" => parse_icon_url(reader, style)?,
                "hotSpot" => {
                    let x = reader.attribute("x")?;
                    let y = reader.attribute("y")?;
                    let x_units = reader.attribute("xunits")?;
                    let y_units = reader.attribute("yunits")?;
                    // Appliqué seulement si les quatre attributs sont là et
                    // que les valeurs sont numériques
                    if let (Some(x), Some(y), Some(x_units), Some(y_units)) =
                        (x, y, x_units, y_units)
                    {
                        if let (Ok(x), Ok(y)) = (x.trim().parse::<f32>(), y.trim().parse::<f32>())
                        {
                            style.set_hot_spot(x, y, &x_units, &y_units);
                        }
                    }
                }
                "scale" => {
                    let text = reader.read_text()?;
                    style.set_icon_scale(parse_number("scale", &text)?);
                }
                "color" => {
                    let text = reader.read_text()?;
                    let argb = to_opaque_argb(&convert_packed_color(&text)?)?;
                    style.set_marker_hue(hue(argb));
                }
                "colorMode" => {
                    let text = reader.read_text()?;
                    style.set_icon_color_mode(&text);
                }
                _ => {}
            },
            EventKind::EndDocument => return Err(KmlError::UnexpectedEof),
            _ => {}
        }
        reader.next()?;
    }
    Ok(())
}

/// Lit l'URL d'icône dans le `href` imbriqué sous `Icon`
fn parse_icon_url(reader: &mut KmlReader<'_>, style: &mut Style) -> Result<(), KmlError> {
    loop {
        match reader.kind() {
            EventKind::EndTag if reader.name() == "Icon" => break,
            EventKind::StartTag if reader.name() == "href" => {
                style.set_icon_url(reader.read_text()?);
            }
            EventKind::EndDocument => return Err(KmlError::UnexpectedEof),
            _ => {}
        }
        reader.next()?;
    }
    Ok(())
}

/// LineStyle: couleur de contour, largeur, colorMode
fn parse_line_style(reader: &mut KmlReader<'_>, style: &mut Style) -> Result<(), KmlError> {
    loop {
        match reader.kind() {
            EventKind::EndTag if reader.name() == "LineStyle" => break,
            EventKind::StartTag => match reader.name() {
                "color" => {
                    let text = reader.read_text()?;
                    style.set_outline_color(to_opaque_argb(&convert_packed_color(&text)?)?);
                }
                "width" => {
                    let text = reader.read_text()?;
                    style.set_width(parse_number("width", &text)?);
                }
                "colorMode" => {
                    let text = reader.read_text()?;
                    style.set_line_color_mode(&text);
                }
                _ => {}
            },
            EventKind::EndDocument => return Err(KmlError::UnexpectedEof),
            _ => {}
        }
        reader.next()?;
    }
    Ok(())
}

/// PolyStyle: couleur de remplissage, flags outline et fill, colorMode
fn parse_poly_style(reader: &mut KmlReader<'_>, style: &mut Style) -> Result<(), KmlError> {
    loop {
        match reader.kind() {
            EventKind::EndTag if reader.name() == "PolyStyle" => break,
            EventKind::StartTag => match reader.name() {
                "color" => {
                    let text = reader.read_text()?;
                    style.set_fill_color(to_opaque_argb(&convert_packed_color(&text)?)?);
                }
                "outline" => {
                    let text = reader.read_text()?;
                    style.set_outline(parse_kml_bool(&text));
                }
                "fill" => {
                    let text = reader.read_text()?;
                    style.set_fill(parse_kml_bool(&text));
                }
                "colorMode" => {
                    let text = reader.read_text()?;
                    style.set_poly_color_mode(&text);
                }
                _ => {}
            },
            EventKind::EndDocument => return Err(KmlError::UnexpectedEof),
            _ => {}
        }
        reader.next()?;
    }
    Ok(())
}

/// BalloonStyle: seul le contenu `text` est conservé
fn parse_balloon_style(reader: &mut KmlReader<'_>, style: &mut Style) -> Result<(), KmlError> {
    loop {
        match reader.kind() {
            EventKind::EndTag if reader.name() == "BalloonStyle" => break,
            EventKind::StartTag if reader.name() == "text" => {
                style.set_balloon_text(reader.read_text()?);
            }
            EventKind::EndDocument => return Err(KmlError::UnexpectedEof),
            _ => {}
        }
        reader.next()?;
    }
    Ok(())
}

/// Les booléens KML s'écrivent `1`/`0` ou `true`/`false`
fn parse_kml_bool(text: &str) -> bool {
    let text = text.trim();
    text == "1" || text == "true"
}

#[cfg(test)]
mod tests {
    use super::*;

    fn style_from(kml: &str) -> Style {
        let mut reader = KmlReader::from_str(kml);
        reader.next().unwrap();
        parse_style(&mut reader).unwrap()
    }

    #[test]
    fn test_parse_style_id_prefixed() {
        let style = style_from(r#"<Style id="golf"></Style>"#);
        assert_eq!(style.style_id.as_deref(), Some("#golf"));

        let anonymous = style_from("<Style></Style>");
        assert_eq!(anonymous.style_id, None);
    }

    #[test]
    fn test_parse_icon_style() {
        let style = style_from(
            r#"<Style id="s">
                <IconStyle>
                    <scale>1.5</scale>
                    <heading>45</heading>
                    <color>7f0000ff</color>
                    <colorMode>random</colorMode>
                    <Icon><href>http://example.com/icon.png</href></Icon>
                    <hotSpot x="0.25" y="0.75" xunits="fraction" yunits="fraction"/>
                </IconStyle>
            </Style>"#,
        );
        assert_eq!(style.icon_scale, 1.5);
        assert_eq!(style.heading, 45.0);
        // AABBGGRR 7f0000ff: rouge pur, teinte 0
        assert_eq!(style.marker_hue, 0.0);
        assert!(style.icon_random_color_mode);
        assert_eq!(style.icon_url.as_deref(), Some("http://example.com/icon.png"));
        assert_eq!(style.anchor, (0.25, 0.75));
        assert!(style.is_style_set("iconScale"));
        assert!(style.is_style_set("heading"));
        assert!(style.is_style_set("hotSpot"));
        assert!(style.is_style_set("markerColor"));
    }

    #[test]
    fn test_parse_hot_spot_missing_attributes_is_ignored() {
        let style = style_from(r#"<Style><IconStyle><hotSpot x="0.2"/></IconStyle></Style>"#);
        assert_eq!(style.anchor, (0.5, 1.0));
        assert!(!style.is_style_set("hotSpot"));
    }

    #[test]
    fn test_parse_line_style() {
        let style = style_from(
            "<Style><LineStyle><color>7fff0000</color><width>4</width></LineStyle></Style>",
        );
        // 7fff0000 = AABBGGRR bleu, recombiné opaque
        assert_eq!(style.outline_color, Some(0xff0000ff));
        assert_eq!(style.width, 4.0);
        assert!(style.is_style_set("outlineColor"));
        assert!(style.is_style_set("width"));
    }

    #[test]
    fn test_parse_poly_style() {
        let style = style_from(
            "<Style><PolyStyle>\
                <color>7f00ff00</color><fill>0</fill><outline>1</outline>\
                <colorMode>normal</colorMode>\
            </PolyStyle></Style>",
        );
        assert_eq!(style.fill_color, Some(0xff00ff00));
        assert!(!style.fill);
        assert!(style.outline);
        assert!(!style.poly_random_color_mode);
        assert!(style.is_style_set("polyColorMode"));
    }

    #[test]
    fn test_parse_balloon_style() {
        let style = style_from(
            "<Style><BalloonStyle><text>$[name]</text></BalloonStyle></Style>",
        );
        assert!(style.has_balloon_style());
        assert_eq!(
            style.balloon_options.get("text").map(String::as_str),
            Some("$[name]")
        );
    }

    #[test]
    fn test_parse_style_invalid_width() {
        let mut reader =
            KmlReader::from_str("<Style><LineStyle><width>wide</width></LineStyle></Style>");
        reader.next().unwrap();
        assert!(matches!(
            parse_style(&mut reader),
            Err(KmlError::InvalidNumber { .. })
        ));
    }

    #[test]
    fn test_parse_style_map_keeps_normal_ignores_highlight() {
        let kml = r#"<StyleMap id="m">
            <Pair><key>highlight</key><styleUrl>#loud</styleUrl></Pair>
            <Pair><key>normal</key><styleUrl>#foo</styleUrl></Pair>
        </StyleMap>"#;
        let mut reader = KmlReader::from_str(kml);
        reader.next().unwrap();
        let style_map = parse_style_map(&mut reader).unwrap();
        assert_eq!(style_map.len(), 1);
        assert_eq!(style_map.get("#m").map(String::as_str), Some("#foo"));
    }

    #[test]
    fn test_parse_style_map_without_normal_pair() {
        let kml = r#"<StyleMap id="m">
            <Pair><key>highlight</key><styleUrl>#loud</styleUrl></Pair>
        </StyleMap>"#;
        let mut reader = KmlReader::from_str(kml);
        reader.next().unwrap();
        assert!(parse_style_map(&mut reader).unwrap().is_empty());
    }

    #[test]
    fn test_parse_style_map_stays_armed_past_non_normal_key() {
        // Une paire normal sans styleUrl suivie d'une paire highlight: le
        // key highlight ne désarme pas, le styleUrl suivant est retenu
        let kml = r#"<StyleMap id="m">
            <Pair><key>normal</key></Pair>
            <Pair><key>highlight</key><styleUrl>#h</styleUrl></Pair>
        </StyleMap>"#;
        let mut reader = KmlReader::from_str(kml);
        reader.next().unwrap();
        let style_map = parse_style_map(&mut reader).unwrap();
        assert_eq!(style_map.get("#m").map(String::as_str), Some("#h"));
    }
}
