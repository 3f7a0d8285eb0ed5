use std::path::{Path, PathBuf};

use tracing::debug;
use xmltree::{Element, XMLNode};

use crate::document::{XmlDocument, XmlError};

/// Maps a source missive onto a named acknowledgement template, producing an
/// acknowledgement shell whose status/return-code/warning tags are still
/// empty.
pub trait TemplateTransform {
    fn transform(
        &self,
        source: &XmlDocument,
        template_name: &str,
    ) -> Result<XmlDocument, TransformError>;
}

#[derive(Debug, thiserror::Error)]
pub enum TransformError {
    #[error("template name '{0}' must be a plain file name")]
    InvalidTemplateName(String),
    #[error("unable to load template: {0}")]
    Template(#[from] XmlError),
    #[error("unterminated placeholder in template text {0:?}")]
    UnterminatedPlaceholder(String),
}

/// Templates are XML files in one directory. Text nodes and attribute values
/// may reference source fields as `{{sem:Tag}}`; each placeholder is replaced
/// by the trimmed text of the first matching source element, or nothing when
/// the source lacks it.
#[derive(Debug, Clone)]
pub struct TemplateDirectory {
    root: PathBuf,
}

impl TemplateDirectory {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn template_path(&self, template_name: &str) -> Result<PathBuf, TransformError> {
        let name = Path::new(template_name);
        let plain = name.components().count() == 1 && name.file_name().is_some();
        if !plain {
            return Err(TransformError::InvalidTemplateName(template_name.to_string()));
        }
        Ok(self.root.join(name))
    }
}

impl TemplateTransform for TemplateDirectory {
    fn transform(
        &self,
        source: &XmlDocument,
        template_name: &str,
    ) -> Result<XmlDocument, TransformError> {
        let path = self.template_path(template_name)?;
        debug!(template = %path.display(), "applying acknowledgement template");
        let mut root = XmlDocument::from_path(&path)?.into_root();
        expand_element(&mut root, source)?;
        Ok(XmlDocument::from_root(root))
    }
}

fn expand_element(element: &mut Element, source: &XmlDocument) -> Result<(), TransformError> {
    for value in element.attributes.values_mut() {
        if value.contains("{{") {
            *value = expand(value, source)?;
        }
    }
    for child in element.children.iter_mut() {
        match child {
            XMLNode::Element(inner) => expand_element(inner, source)?,
            XMLNode::Text(text) if text.contains("{{") => *text = expand(text, source)?,
            _ => {}
        }
    }
    Ok(())
}

fn expand(text: &str, source: &XmlDocument) -> Result<String, TransformError> {
    let mut output = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(start) = rest.find("{{") {
        output.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        let end = after
            .find("}}")
            .ok_or_else(|| TransformError::UnterminatedPlaceholder(text.to_string()))?;
        let tag = after[..end].trim();
        match source.first_text(tag) {
            Some(value) => output.push_str(&value),
            None => debug!(tag, "template placeholder has no source value"),
        }
        rest = &after[end + 2..];
    }
    output.push_str(rest);
    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    const SOURCE: &str = r#"<sem:Missive xmlns:sem="urn:sepamail:missive">
  <sem:MsvId>MSV-7</sem:MsvId>
  <sem:MsvTyp>Nominal</sem:MsvTyp>
</sem:Missive>"#;

    fn source() -> XmlDocument {
        XmlDocument::parse(SOURCE.as_bytes()).expect("source parses")
    }

    #[test]
    fn expands_text_and_attribute_placeholders() {
        let dir = tempfile::tempdir().expect("tempdir");
        fs::write(
            dir.path().join("ack.xml"),
            r#"<sem:Ack xmlns:sem="urn:sepamail:missive" ref="{{sem:MsvId}}">
  <sem:OrgMsvId>{{ sem:MsvId }}</sem:OrgMsvId>
  <sem:Note>type {{sem:MsvTyp}}, origin {{sem:Origin}}</sem:Note>
  <sem:AcqSta/>
</sem:Ack>"#,
        )
        .expect("template written");

        let shell = TemplateDirectory::new(dir.path())
            .transform(&source(), "ack.xml")
            .expect("transform succeeds");

        assert_eq!(shell.first_text("sem:OrgMsvId").as_deref(), Some("MSV-7"));
        assert_eq!(
            shell.first_text("sem:Note").as_deref(),
            Some("type Nominal, origin")
        );
        assert_eq!(shell.root().attributes.get("ref").map(String::as_str), Some("MSV-7"));
        assert_eq!(shell.first_text("sem:AcqSta").as_deref(), Some(""));
    }

    #[test]
    fn rejects_template_names_with_paths() {
        let templates = TemplateDirectory::new("templates");
        for name in ["../secrets.xml", "nested/ack.xml", "", ".."] {
            assert!(
                matches!(
                    templates.transform(&source(), name),
                    Err(TransformError::InvalidTemplateName(_))
                ),
                "{name:?} should be rejected"
            );
        }
    }

    #[test]
    fn missing_template_is_a_template_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let result = TemplateDirectory::new(dir.path()).transform(&source(), "absent.xml");
        assert!(matches!(result, Err(TransformError::Template(XmlError::Read { .. }))));
    }

    #[test]
    fn unterminated_placeholder_is_reported() {
        let dir = tempfile::tempdir().expect("tempdir");
        fs::write(dir.path().join("broken.xml"), "<Ack>{{sem:MsvId</Ack>").expect("written");
        let result = TemplateDirectory::new(dir.path()).transform(&source(), "broken.xml");
        assert!(matches!(result, Err(TransformError::UnterminatedPlaceholder(_))));
    }
}
