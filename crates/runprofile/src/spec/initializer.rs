use crate::model::{KeywordSpec, LibrarySpec, SpecFormat, SpecSource, DEFAULT_DOC_FORMAT};
use serde::Deserialize;
use std::fs;
use tracing::{debug, warn};

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct LibdocDocument {
    #[serde(default)]
    name: String,
    #[serde(default)]
    version: String,
    #[serde(default)]
    doc: String,
    #[serde(default)]
    doc_format: Option<String>,
    #[serde(default)]
    keywords: Vec<LibdocKeyword>,
}

#[derive(Deserialize)]
struct LibdocKeyword {
    name: String,
    #[serde(default)]
    args: Vec<LibdocArg>,
    #[serde(default)]
    doc: String,
    #[serde(default)]
    shortdoc: Option<String>,
}

/// Older spec files list arguments as strings, newer ones as objects.
#[derive(Deserialize)]
#[serde(untagged)]
enum LibdocArg {
    Plain(String),
    Detailed { repr: String },
}

impl LibdocArg {
    fn into_repr(self) -> String {
        match self {
            Self::Plain(repr) | Self::Detailed { repr } => repr,
        }
    }
}

/// Why a spec source could not be read as libdoc output.
#[derive(Debug, thiserror::Error)]
pub enum SpecParseError {
    #[error("invalid libdoc json: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid xml: {0}")]
    Xml(#[from] roxmltree::Error),
    #[error("expected <keywordspec> root element, found <{0}>")]
    NotLibdoc(String),
}

/// Parses libdoc output in the given format.
pub fn parse_libdoc(content: &str, format: SpecFormat) -> Result<LibrarySpec, SpecParseError> {
    match format {
        SpecFormat::Json => Ok(parse_libdoc_json(content)?),
        SpecFormat::Xml => parse_libdoc_xml(content),
    }
}

/// Parses a libdoc JSON spec document.
pub fn parse_libdoc_json(content: &str) -> Result<LibrarySpec, serde_json::Error> {
    let document: LibdocDocument = serde_json::from_str(content)?;
    let doc_format = document
        .doc_format
        .unwrap_or_else(|| DEFAULT_DOC_FORMAT.to_string());
    let keywords = document
        .keywords
        .into_iter()
        .map(|kw| {
            let args = kw.args.into_iter().map(LibdocArg::into_repr).collect();
            let mut keyword = KeywordSpec::new(kw.name, args, kw.doc);
            if let Some(shortdoc) = kw.shortdoc {
                keyword.shortdoc = shortdoc;
            }
            keyword.doc_format.clone_from(&doc_format);
            keyword
        })
        .collect();
    Ok(LibrarySpec {
        name: document.name,
        version: document.version,
        doc: document.doc,
        keywords,
    })
}

/// Parses a libdoc XML spec. Accepts the current layout, with keywords
/// wrapped in `<keywords>` and `repr` attributes on `<arg>`, as well as the
/// older flat layout where `<arg>` holds the argument as text.
pub fn parse_libdoc_xml(content: &str) -> Result<LibrarySpec, SpecParseError> {
    let document = roxmltree::Document::parse(content)?;
    let root = document.root_element();
    if !root.has_tag_name("keywordspec") {
        return Err(SpecParseError::NotLibdoc(
            root.tag_name().name().to_string(),
        ));
    }
    let doc_format = root.attribute("format").unwrap_or(DEFAULT_DOC_FORMAT);
    let version = child_text(root, "version")
        .or_else(|| root.attribute("version").map(str::to_string))
        .unwrap_or_default();
    let keywords = root
        .descendants()
        .filter(|node| node.has_tag_name("kw"))
        .map(|kw| {
            let args = kw
                .children()
                .filter(|node| node.has_tag_name("arguments"))
                .flat_map(|arguments| arguments.children())
                .filter(|node| node.has_tag_name("arg"))
                .map(arg_repr)
                .collect();
            let mut keyword = KeywordSpec::new(
                kw.attribute("name").unwrap_or_default(),
                args,
                child_text(kw, "doc").unwrap_or_default(),
            );
            if let Some(shortdoc) = child_text(kw, "shortdoc") {
                keyword.shortdoc = shortdoc;
            }
            keyword.doc_format = doc_format.to_string();
            keyword
        })
        .collect();
    Ok(LibrarySpec {
        name: root.attribute("name").unwrap_or_default().to_string(),
        version,
        doc: child_text(root, "doc").unwrap_or_default(),
        keywords,
    })
}

fn child_text(node: roxmltree::Node<'_, '_>, tag: &str) -> Option<String> {
    node.children()
        .find(|child| child.has_tag_name(tag))
        .map(text_content)
}

fn text_content(node: roxmltree::Node<'_, '_>) -> String {
    node.descendants()
        .filter(roxmltree::Node::is_text)
        .filter_map(|text| text.text())
        .collect()
}

/// Current libdoc writes `repr`; older files hold the argument as text.
fn arg_repr(arg: roxmltree::Node<'_, '_>) -> String {
    arg.attribute("repr")
        .map_or_else(|| text_content(arg).trim().to_string(), str::to_string)
}

/// Default initializer: reads libdoc XML or JSON, by the source's format.
#[derive(Clone, Copy, Debug, Default)]
pub struct LibdocInitializer;

impl LibdocInitializer {
    #[must_use]
    pub fn initialize(&self, source: &SpecSource, name: &str) -> Option<LibrarySpec> {
        let content = match source {
            SpecSource::File { path, .. } => match fs::read_to_string(path) {
                Ok(content) => content,
                Err(err) => {
                    warn!(library = name, %source, error = %err, "failed to read spec file");
                    return None;
                }
            },
            SpecSource::Inline { content, .. } => content.clone(),
        };
        match parse_libdoc(&content, source.format()) {
            Ok(mut spec) => {
                if spec.name.is_empty() {
                    spec.name = name.to_string();
                }
                debug!(library = name, %source, keywords = spec.keywords.len(), "spec initialized");
                Some(spec)
            }
            Err(err) => {
                warn!(library = name, %source, error = %err, "failed to parse spec");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_plain_and_detailed_arguments() {
        let spec = parse_libdoc_json(
            r#"{
                "name": "LibSpecLibrary",
                "keywords": [
                    {"name": "Normal Keyword", "args": ["foo"], "doc": "Docs.\n\nMore."},
                    {"name": "Multiarg Keyword", "args": [
                        {"name": "arg1", "repr": "arg1"},
                        {"name": "arg2", "repr": "arg2=default value", "kind": "POSITIONAL_OR_NAMED"}
                    ]}
                ]
            }"#,
        );
        let spec = spec.ok();
        let keywords = spec.map(|s| s.keywords).unwrap_or_default();
        assert_eq!(keywords.len(), 2);
        assert_eq!(keywords.first().map(|k| k.shortdoc.as_str()), Some("Docs."));
        assert_eq!(
            keywords.get(1).map(KeywordSpec::args_repr),
            Some("[ arg1 | arg2=default value ]".to_string())
        );
    }

    #[test]
    fn xml_with_foreign_root_is_rejected() {
        let source = SpecSource::Inline {
            label: "x".to_string(),
            format: SpecFormat::Xml,
            content: "<robot generator=\"Rebot\"/>".to_string(),
        };
        assert!(matches!(
            parse_libdoc_xml("<robot/>"),
            Err(SpecParseError::NotLibdoc(tag)) if tag == "robot"
        ));
        assert_eq!(LibdocInitializer.initialize(&source, "x"), None);
    }

    #[test]
    fn xml_version_falls_back_to_attribute() {
        let spec = parse_libdoc_xml(r#"<keywordspec name="Lib" version="2.1" format="HTML"><kw name="Go"/></keywordspec>"#);
        let spec = spec.ok().unwrap_or_default();
        assert_eq!(spec.version, "2.1");
        assert_eq!(spec.keywords.len(), 1);
        assert_eq!(spec.keywords.first().map(|k| k.doc_format.as_str()), Some("HTML"));
        assert_eq!(spec.keywords.first().map(KeywordSpec::args_repr), Some("[  ]".to_string()));
    }
}
