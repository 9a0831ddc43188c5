//! Curseur d'événements XML au-dessus de quick-xml
//!
//! Expose exactement la surface dont les parsers ont besoin: type de
//! l'événement courant, nom local du tag, lecture d'attribut, "lire le texte
//! jusqu'au tag fermant", avancer, et saut d'un sous-arbre complet. Pas de
//! DOM, pas d'accès aléatoire, pas de retour en arrière.

use quick_xml::events::{BytesEnd, BytesStart, Event};
use quick_xml::Reader;

use crate::KmlError;

/// Type de l'événement courant du curseur
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    /// Position initiale, avant le premier appel à `next`
    StartDocument,
    StartTag,
    EndTag,
    Text,
    EndDocument,
}

enum CurrentEvent<'s> {
    StartDocument,
    Start(BytesStart<'s>),
    End(BytesEnd<'s>),
    Text(String),
    Eof,
}

/// Curseur mutable partagé par tous les parsers
///
/// Contrat: chaque routine de parsing entre positionnée sur son propre tag
/// ouvrant et rend la main positionnée sur son propre tag fermant. Seul le
/// driver de niveau document avance entre deux éléments frères.
pub struct KmlReader<'s> {
    reader: Reader<&'s [u8]>,
    current: CurrentEvent<'s>,
}

impl<'s> KmlReader<'s> {
    /// Crée un curseur sur un document KML complet
    pub fn from_str(source: &'s str) -> Self {
        let mut reader = Reader::from_str(source);
        let config = reader.config_mut();
        config.trim_text(true);
        // Les éléments vides <tag/> deviennent une paire ouvrant/fermant,
        // comme les voient les parsers pull classiques
        config.expand_empty_elements = true;

        Self {
            reader,
            current: CurrentEvent::StartDocument,
        }
    }

    /// Type de l'événement courant
    pub fn kind(&self) -> EventKind {
        match self.current {
            CurrentEvent::StartDocument => EventKind::StartDocument,
            CurrentEvent::Start(_) => EventKind::StartTag,
            CurrentEvent::End(_) => EventKind::EndTag,
            CurrentEvent::Text(_) => EventKind::Text,
            CurrentEvent::Eof => EventKind::EndDocument,
        }
    }

    /// Nom local (sans préfixe de namespace) du tag courant
    ///
    /// Chaîne vide si l'événement courant n'est pas un tag.
    pub fn name(&self) -> &str {
        let raw = match &self.current {
            CurrentEvent::Start(start) => start.local_name().into_inner(),
            CurrentEvent::End(end) => end.local_name().into_inner(),
            _ => return "",
        };
        std::str::from_utf8(raw).unwrap_or("")
    }

    /// Valeur d'un attribut du tag ouvrant courant
    pub fn attribute(&self, name: &str) -> Result<Option<String>, KmlError> {
        let CurrentEvent::Start(start) = &self.current else {
            return Ok(None);
        };

        for attribute in start.attributes() {
            let attribute = attribute?;
            if attribute.key.local_name().into_inner() == name.as_bytes() {
                return Ok(Some(attribute.unescape_value()?.into_owned()));
            }
        }
        Ok(None)
    }

    /// Avance au prochain événement significatif et retourne son type
    ///
    /// Les déclarations, commentaires et instructions de traitement sont
    /// transparents pour les parsers.
    pub fn next(&mut self) -> Result<EventKind, KmlError> {
        loop {
            match self.reader.read_event()? {
                Event::Start(start) => {
                    self.current = CurrentEvent::Start(start);
                    break;
                }
                Event::End(end) => {
                    self.current = CurrentEvent::End(end);
                    break;
                }
                Event::Text(text) => {
                    self.current = CurrentEvent::Text(text.unescape()?.into_owned());
                    break;
                }
                Event::CData(data) => {
                    let text = String::from_utf8_lossy(&data.into_inner()).into_owned();
                    self.current = CurrentEvent::Text(text);
                    break;
                }
                Event::Eof => {
                    self.current = CurrentEvent::Eof;
                    break;
                }
                // Decl, Comment, PI, DocType
                _ => continue,
            }
        }
        Ok(self.kind())
    }

    /// Lit le contenu texte de l'élément courant et laisse le curseur sur son
    /// tag fermant
    ///
    /// Un éventuel sous-élément parasite est traversé sans être interprété.
    pub fn read_text(&mut self) -> Result<String, KmlError> {
        let mut text = String::new();
        let mut depth = 0u32;
        loop {
            match self.reader.read_event()? {
                Event::Start(_) => depth += 1,
                Event::End(end) => {
                    if depth == 0 {
                        self.current = CurrentEvent::End(end);
                        break;
                    }
                    depth -= 1;
                }
                Event::Text(t) if depth == 0 => text.push_str(&t.unescape()?),
                Event::CData(data) if depth == 0 => {
                    text.push_str(&String::from_utf8_lossy(&data.into_inner()));
                }
                Event::Eof => return Err(KmlError::UnexpectedEof),
                _ => {}
            }
        }
        Ok(text)
    }

    /// Saute le sous-arbre de l'élément courant: compteur de profondeur
    /// incrémenté sur chaque tag ouvrant, décrémenté sur chaque tag fermant,
    /// arrêt quand la profondeur revient à zéro
    ///
    /// Laisse le curseur sur le tag fermant de l'élément sauté.
    pub fn skip(&mut self) -> Result<(), KmlError> {
        debug_assert!(matches!(self.current, CurrentEvent::Start(_)));

        let mut depth = 1u32;
        loop {
            match self.reader.read_event()? {
                Event::Start(_) => depth += 1,
                Event::End(end) => {
                    depth -= 1;
                    if depth == 0 {
                        self.current = CurrentEvent::End(end);
                        return Ok(());
                    }
                }
                Event::Eof => return Err(KmlError::UnexpectedEof),
                _ => {}
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_sequence() {
        let mut reader = KmlReader::from_str("<kml><name>abc</name></kml>");
        assert_eq!(reader.kind(), EventKind::StartDocument);
        assert_eq!(reader.next().unwrap(), EventKind::StartTag);
        assert_eq!(reader.name(), "kml");
        assert_eq!(reader.next().unwrap(), EventKind::StartTag);
        assert_eq!(reader.name(), "name");
        assert_eq!(reader.read_text().unwrap(), "abc");
        assert_eq!(reader.kind(), EventKind::EndTag);
        assert_eq!(reader.name(), "name");
        assert_eq!(reader.next().unwrap(), EventKind::EndTag);
        assert_eq!(reader.name(), "kml");
        assert_eq!(reader.next().unwrap(), EventKind::EndDocument);
    }

    #[test]
    fn test_attribute_lookup() {
        let mut reader = KmlReader::from_str(r#"<Style id="s1" other="x"/>"#);
        reader.next().unwrap();
        assert_eq!(reader.attribute("id").unwrap().as_deref(), Some("s1"));
        assert_eq!(reader.attribute("missing").unwrap(), None);
    }

    #[test]
    fn test_empty_element_expands_to_pair() {
        let mut reader = KmlReader::from_str("<root><empty/></root>");
        reader.next().unwrap();
        assert_eq!(reader.next().unwrap(), EventKind::StartTag);
        assert_eq!(reader.name(), "empty");
        assert_eq!(reader.next().unwrap(), EventKind::EndTag);
        assert_eq!(reader.name(), "empty");
    }

    #[test]
    fn test_read_text_unescapes_entities() {
        let mut reader = KmlReader::from_str("<name>a &amp; b</name>");
        reader.next().unwrap();
        assert_eq!(reader.read_text().unwrap(), "a & b");
    }

    #[test]
    fn test_read_text_of_empty_element() {
        let mut reader = KmlReader::from_str("<root><name/></root>");
        reader.next().unwrap();
        reader.next().unwrap();
        assert_eq!(reader.read_text().unwrap(), "");
        assert_eq!(reader.kind(), EventKind::EndTag);
    }

    #[test]
    fn test_skip_nested_subtree() {
        let mut reader =
            KmlReader::from_str("<root><skipme><a><b>deep</b></a></skipme><next/></root>");
        reader.next().unwrap();
        reader.next().unwrap();
        assert_eq!(reader.name(), "skipme");
        reader.skip().unwrap();
        assert_eq!(reader.kind(), EventKind::EndTag);
        assert_eq!(reader.name(), "skipme");
        assert_eq!(reader.next().unwrap(), EventKind::StartTag);
        assert_eq!(reader.name(), "next");
    }

    #[test]
    fn test_local_name_strips_namespace_prefix() {
        let mut reader = KmlReader::from_str("<gx:Track>x</gx:Track>");
        reader.next().unwrap();
        assert_eq!(reader.name(), "Track");
    }
}
