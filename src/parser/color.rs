//! Codec des couleurs compactées KML
//!
//! KML encode les couleurs en `AABBGGRR` (alpha, bleu, vert, rouge sur deux
//! chiffres hexadécimaux chacun), ou `BBGGRR` sur six chiffres sans alpha.

use rand::Rng;

use crate::KmlError;

/// Convertit `AABBGGRR` (ou `BBGGRR`) vers `RRGGBB`
///
/// L'alpha d'une entrée sur huit chiffres est écarté par la réorganisation;
/// un appelant qui en a besoin le recombine lui-même.
///
/// Quirk connu: certains exporteurs omettent le zéro de tête et émettent un
/// espace à la place. Si le premier chiffre du résultat est un espace, il est
/// réécrit en `0`. Comportement environnemental à reproduire tel quel.
///
/// # Errors
///
/// `InvalidColor` si l'entrée ne fait ni six ni huit caractères.
pub fn convert_packed_color(color: &str) -> Result<String, KmlError> {
    if !color.is_ascii() {
        return Err(KmlError::InvalidColor(color.to_string()));
    }

    let mut converted = match color.len() {
        8 => format!("{}{}{}", &color[6..8], &color[4..6], &color[2..4]),
        6 => format!("{}{}{}", &color[4..6], &color[2..4], &color[0..2]),
        _ => return Err(KmlError::InvalidColor(color.to_string())),
    };

    if converted.starts_with(' ') {
        converted.replace_range(0..1, "0");
    }

    Ok(converted)
}

/// Valeur ARGB opaque depuis les six chiffres hex produits par
/// [`convert_packed_color`]
pub fn to_opaque_argb(rgb: &str) -> Result<u32, KmlError> {
    let value =
        u32::from_str_radix(rgb, 16).map_err(|_| KmlError::InvalidColor(rgb.to_string()))?;
    Ok(0xff00_0000 | value)
}

/// Mode couleur "random" de KML: chaque canal non nul est remplacé par un
/// tirage uniforme dans `[0, canal)`, un canal nul reste nul
///
/// Retourne une couleur opaque.
pub fn randomize_color(color: u32) -> u32 {
    let mut rng = rand::rng();

    let mut red = (color >> 16) & 0xff;
    let mut green = (color >> 8) & 0xff;
    let mut blue = color & 0xff;

    if red != 0 {
        red = rng.random_range(0..red);
    }
    if green != 0 {
        green = rng.random_range(0..green);
    }
    if blue != 0 {
        blue = rng.random_range(0..blue);
    }

    0xff00_0000 | (red << 16) | (green << 8) | blue
}

/// Teinte HSV en degrés `[0, 360)` d'une couleur ARGB
///
/// C'est la forme sous laquelle la couleur de marqueur d'un IconStyle est
/// conservée dans le modèle.
pub fn hue(color: u32) -> f32 {
    let red = ((color >> 16) & 0xff) as f32 / 255.0;
    let green = ((color >> 8) & 0xff) as f32 / 255.0;
    let blue = (color & 0xff) as f32 / 255.0;

    let max = red.max(green).max(blue);
    let min = red.min(green).min(blue);
    let delta = max - min;

    if delta == 0.0 {
        return 0.0;
    }

    let hue = if max == red {
        ((green - blue) / delta).rem_euclid(6.0)
    } else if max == green {
        (blue - red) / delta + 2.0
    } else {
        (red - green) / delta + 4.0
    } * 60.0;

    if hue < 0.0 {
        hue + 360.0
    } else {
        hue
    }
}
