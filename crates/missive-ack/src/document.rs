//! Thin wrapper over `xmltree` giving the pipeline tag lookups by qualified
//! name (`sem:AcqSta`) in document order.

use std::fs;
use std::io::Read;
use std::path::Path;

use xmltree::{Element, EmitterConfig, XMLNode};

#[derive(Debug, thiserror::Error)]
pub enum XmlError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },
    #[error("malformed XML: {0}")]
    Parse(#[from] xmltree::ParseError),
    #[error("failed to serialize XML: {0}")]
    Serialize(#[from] xmltree::Error),
    #[error("failed to write {path}: {source}")]
    Persist {
        path: String,
        source: std::io::Error,
    },
}

/// Parsed XML document. Missives and acknowledgements share this type.
#[derive(Debug, Clone, PartialEq)]
pub struct XmlDocument {
    root: Element,
}

impl XmlDocument {
    pub fn parse<R: Read>(reader: R) -> Result<Self, XmlError> {
        let root = Element::parse(reader)?;
        Ok(Self { root })
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, XmlError> {
        let path = path.as_ref();
        let bytes = fs::read(path).map_err(|source| XmlError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Self::parse(bytes.as_slice())
    }

    pub fn from_root(root: Element) -> Self {
        Self { root }
    }

    pub fn root(&self) -> &Element {
        &self.root
    }

    pub fn into_root(self) -> Element {
        self.root
    }

    /// First element matching `tag` in document order.
    pub fn find(&self, tag: &str) -> Option<&Element> {
        find_first(&self.root, tag)
    }

    /// Trimmed text of the first element matching `tag`. An element without
    /// text yields an empty string; a missing element yields `None`.
    pub fn first_text(&self, tag: &str) -> Option<String> {
        self.find(tag).map(element_text)
    }

    /// Replaces the content of the first element matching `tag` with `value`.
    /// Returns `false` when no such element exists.
    pub fn set_text(&mut self, tag: &str, value: &str) -> bool {
        match find_first_mut(&mut self.root, tag) {
            Some(element) => {
                element.children = vec![XMLNode::Text(value.to_string())];
                true
            }
            None => false,
        }
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>, XmlError> {
        let mut buffer = Vec::new();
        let config = EmitterConfig::new().perform_indent(true);
        self.root.write_with_config(&mut buffer, config)?;
        Ok(buffer)
    }

    /// Serializes fully before touching `path` so a failed write never leaves
    /// a partial document behind.
    pub fn write_to<P: AsRef<Path>>(&self, path: P) -> Result<(), XmlError> {
        let path = path.as_ref();
        let bytes = self.to_bytes()?;
        fs::write(path, bytes).map_err(|source| XmlError::Persist {
            path: path.display().to_string(),
            source,
        })
    }
}

/// Element children of `element`, skipping text and comments.
pub fn child_elements(element: &Element) -> impl Iterator<Item = &Element> {
    element.children.iter().filter_map(XMLNode::as_element)
}

pub fn element_text(element: &Element) -> String {
    element
        .get_text()
        .map(|text| text.trim().to_string())
        .unwrap_or_default()
}

fn matches(element: &Element, tag: &str) -> bool {
    match tag.split_once(':') {
        Some((prefix, local)) => {
            element.name == local && element.prefix.as_deref() == Some(prefix)
        }
        None => element.prefix.is_none() && element.name == tag,
    }
}

fn find_first<'a>(element: &'a Element, tag: &str) -> Option<&'a Element> {
    if matches(element, tag) {
        return Some(element);
    }
    child_elements(element).find_map(|child| find_first(child, tag))
}

fn find_first_mut<'a>(element: &'a mut Element, tag: &str) -> Option<&'a mut Element> {
    if matches(element, tag) {
        return Some(element);
    }
    for child in element.children.iter_mut() {
        if let XMLNode::Element(child) = child {
            if let Some(found) = find_first_mut(child, tag) {
                return Some(found);
            }
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<sem:Missive xmlns:sem="urn:sepamail:missive">
  <sem:Header>
    <sem:MsvTyp>Nominal</sem:MsvTyp>
    <sem:Rcv>
      <sem:Bic> BICVERT1XXX </sem:Bic>
      <sem:Iban>QX12BICVERT1XXX0000000000000000001</sem:Iban>
    </sem:Rcv>
  </sem:Header>
  <Status/>
</sem:Missive>"#;

    #[test]
    fn finds_tags_by_qualified_name() {
        let document = XmlDocument::parse(SAMPLE.as_bytes()).expect("sample parses");
        assert_eq!(document.first_text("sem:MsvTyp").as_deref(), Some("Nominal"));
        assert_eq!(document.first_text("sem:Bic").as_deref(), Some("BICVERT1XXX"));
        assert!(document.first_text("MsvTyp").is_none(), "prefix is significant");
        assert!(document.first_text("other:MsvTyp").is_none());
    }

    #[test]
    fn unprefixed_tag_matches_unprefixed_element() {
        let document = XmlDocument::parse(SAMPLE.as_bytes()).expect("sample parses");
        assert_eq!(document.first_text("Status").as_deref(), Some(""));
    }

    #[test]
    fn set_text_replaces_content_and_reports_missing_tags() {
        let mut document = XmlDocument::parse(SAMPLE.as_bytes()).expect("sample parses");
        assert!(document.set_text("Status", "ACK"));
        assert!(!document.set_text("sem:Missing", "value"));

        let reparsed = XmlDocument::parse(document.to_bytes().expect("serializes").as_slice())
            .expect("output parses");
        assert_eq!(reparsed.first_text("Status").as_deref(), Some("ACK"));
        assert_eq!(reparsed.first_text("sem:MsvTyp").as_deref(), Some("Nominal"));
    }

    #[test]
    fn unprefixed_name_never_touches_prefixed_element() {
        let mut document = XmlDocument::parse(SAMPLE.as_bytes()).expect("sample parses");
        assert!(document.find("MsvTyp").is_none());
        assert!(!document.set_text("MsvTyp", "Refusal"));
        assert_eq!(document.first_text("sem:MsvTyp").as_deref(), Some("Nominal"));
    }

    #[test]
    fn rejects_malformed_input() {
        let result = XmlDocument::parse("<sem:Missive><open></sem:Missive>".as_bytes());
        assert!(matches!(result, Err(XmlError::Parse(_))));
    }

    #[test]
    fn from_path_reports_missing_file() {
        let result = XmlDocument::from_path("/nonexistent/missive.xml");
        assert!(matches!(result, Err(XmlError::Read { .. })));
    }
}
