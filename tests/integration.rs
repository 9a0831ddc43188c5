//! Tests d'intégration sur des documents KML complets

use kml_parse::{parse_str, Geometry, KmlError};

#[test]
fn test_parse_minimal_placemark() {
    let kml = r#"<?xml version="1.0" encoding="UTF-8"?>
        <kml xmlns="http://www.opengis.net/kml/2.2">
            <Placemark>
                <name>Test</name>
                <Point><coordinates>-122.0,37.0</coordinates></Point>
            </Placemark>
        </kml>"#;

    let document = parse_str(kml).unwrap();

    assert_eq!(document.placemarks.len(), 1);
    let placemark = &document.placemarks[0];
    assert_eq!(placemark.property("name"), Some("Test"));
    match placemark.geometry.as_ref().unwrap() {
        Geometry::Point(point) => {
            assert_eq!(point.coordinate.x, -122.0);
            assert_eq!(point.coordinate.y, 37.0);
            assert!(point.altitude.is_none());
        }
        other => panic!("expected a point, got {:?}", other),
    }
}

#[test]
fn test_document_without_style_gets_default() {
    let kml = "<kml><Placemark><name>x</name></Placemark></kml>";

    let document = parse_str(kml).unwrap();

    assert_eq!(document.styles.len(), 1);
    let default = &document.styles[""];
    assert!(default.has_fill());
    assert!(default.has_outline());
    assert_eq!(default.icon_scale, 1.0);
    assert_eq!(default.anchor, (0.5, 1.0));
}

#[test]
fn test_unsupported_subtrees_skipped_at_any_depth() {
    let kml = r#"<kml>
        <NetworkLink>
            <Link><href>http://example.com/feed.kml</href></Link>
        </NetworkLink>
        <Folder>
            <Region>
                <LatLonAltBox><north>1</north></LatLonAltBox>
            </Region>
            <Placemark>
                <LookAt><longitude>2</longitude><latitude>48</latitude></LookAt>
                <Point><coordinates>2.35,48.85</coordinates></Point>
            </Placemark>
        </Folder>
    </kml>"#;

    let document = parse_str(kml).unwrap();

    assert_eq!(document.containers.len(), 1);
    let folder = &document.containers[0];
    assert_eq!(folder.placemarks.len(), 1);
    assert!(folder.placemarks[0].has_geometry());
}

#[test]
fn test_style_map_resolution() {
    let kml = r#"<kml>
        <Style id="foo">
            <LineStyle><width>5</width></LineStyle>
        </Style>
        <Style id="loud">
            <LineStyle><width>9</width></LineStyle>
        </Style>
        <StyleMap id="map">
            <Pair><key>highlight</key><styleUrl>#loud</styleUrl></Pair>
            <Pair><key>normal</key><styleUrl>#foo</styleUrl></Pair>
        </StyleMap>
        <Placemark>
            <styleUrl>#map</styleUrl>
            <Point><coordinates>0,0</coordinates></Point>
        </Placemark>
    </kml>"#;

    let document = parse_str(kml).unwrap();

    assert_eq!(
        document.style_maps.get("#map").map(String::as_str),
        Some("#foo")
    );
    let resolved = document.resolve_style("#map").unwrap();
    assert_eq!(resolved.width, 5.0);

    // Une référence directe passe sans indirection
    assert_eq!(document.resolve_style("#loud").unwrap().width, 9.0);
    assert!(document.resolve_style("#absent").is_none());
}

#[test]
fn test_nested_containers_with_features() {
    let kml = r#"<kml><Document>
        <name>Racine</name>
        <Folder id="a">
            <name>A</name>
            <Placemark><Point><coordinates>1,1</coordinates></Point></Placemark>
            <Folder id="b">
                <Placemark>
                    <LineString>
                        <coordinates>0,0 1,1,10 2,2</coordinates>
                    </LineString>
                </Placemark>
            </Folder>
        </Folder>
        <GroundOverlay>
            <Icon><href>http://example.com/tile.png</href></Icon>
            <LatLonBox>
                <north>49.0</north><south>48.0</south>
                <east>3.0</east><west>2.0</west>
                <rotation>15</rotation>
            </LatLonBox>
        </GroundOverlay>
    </Document></kml>"#;

    let document = parse_str(kml).unwrap();

    let root = &document.containers[0];
    assert_eq!(root.property("name"), Some("Racine"));
    assert_eq!(root.ground_overlays.len(), 1);

    let overlay = &root.ground_overlays[0];
    assert_eq!(overlay.image_url.as_deref(), Some("http://example.com/tile.png"));
    assert_eq!(overlay.rotation, -15.0);
    assert_eq!(overlay.bounds.min().x, 2.0);
    assert_eq!(overlay.bounds.max().y, 49.0);

    let folder_a = &root.containers[0];
    assert_eq!(folder_a.container_id.as_deref(), Some("a"));
    assert_eq!(folder_a.placemarks.len(), 1);

    let folder_b = &folder_a.containers[0];
    match folder_b.placemarks[0].geometry.as_ref().unwrap() {
        Geometry::LineString(line) => {
            assert_eq!(line.coordinates.len(), 3);
            // Altitudes éparses: seul le deuxième sommet en porte une
            assert_eq!(line.altitudes, vec![10.0]);
        }
        other => panic!("expected a line string, got {:?}", other),
    }
}

#[test]
fn test_inline_style_color_conversion() {
    let kml = r#"<kml><Placemark>
        <Style>
            <LineStyle><color>7fff0000</color></LineStyle>
        </Style>
        <Point><coordinates>0,0</coordinates></Point>
    </Placemark></kml>"#;

    let document = parse_str(kml).unwrap();

    let style = document.placemarks[0].inline_style.as_ref().unwrap();
    // AABBGGRR -> RRGGBB, alpha écarté, puis repack opaque
    assert_eq!(style.outline_color, Some(0xff0000ff));
}

#[test]
fn test_multi_geometry_placemark() {
    let kml = r#"<kml><Placemark>
        <MultiGeometry>
            <Point><coordinates>1,2</coordinates></Point>
            <LineString><coordinates>0,0 1,1</coordinates></LineString>
        </MultiGeometry>
    </Placemark></kml>"#;

    let document = parse_str(kml).unwrap();

    match document.placemarks[0].geometry.as_ref().unwrap() {
        Geometry::MultiGeometry(multi) => {
            assert_eq!(multi.geometries.len(), 2);
            assert_eq!(multi.geometries[0].geometry_type(), "Point");
            assert_eq!(multi.geometries[1].geometry_type(), "LineString");
        }
        other => panic!("expected a multi geometry, got {:?}", other),
    }
}

#[test]
fn test_malformed_coordinate_is_fatal() {
    let kml = "<kml><Placemark><Point><coordinates>abc</coordinates></Point></Placemark></kml>";

    assert!(matches!(
        parse_str(kml),
        Err(KmlError::MalformedCoordinate(_))
    ));
}

#[test]
fn test_truncated_document_is_fatal() {
    let kml = "<kml><Folder><Placemark><name>coupe";

    assert!(parse_str(kml).is_err());
}
