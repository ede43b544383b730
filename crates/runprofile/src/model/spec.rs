use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

/// Documentation format used when a spec does not declare one.
pub const DEFAULT_DOC_FORMAT: &str = "ROBOT";

/// On-disk format of a library spec file, derived from its extension.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpecFormat {
    Xml,
    Json,
}

impl SpecFormat {
    #[must_use]
    pub fn extension(self) -> &'static str {
        match self {
            Self::Xml => "xml",
            Self::Json => "json",
        }
    }

    #[must_use]
    pub fn from_path(path: &Path) -> Option<Self> {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("xml") => Some(Self::Xml),
            Some("json") => Some(Self::Json),
            _ => None,
        }
    }
}

/// Located, not yet parsed, keyword specification.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SpecSource {
    File { path: PathBuf, format: SpecFormat },
    Inline {
        label: String,
        format: SpecFormat,
        content: String,
    },
}

impl SpecSource {
    /// File handle with the format inferred from the extension.
    #[must_use]
    pub fn file(path: impl Into<PathBuf>) -> Option<Self> {
        let path = path.into();
        let format = SpecFormat::from_path(&path)?;
        Some(Self::File { path, format })
    }

    #[must_use]
    pub fn format(&self) -> SpecFormat {
        match self {
            Self::File { format, .. } | Self::Inline { format, .. } => *format,
        }
    }
}

impl fmt::Display for SpecSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::File { path, .. } => write!(f, "{}", path.display()),
            Self::Inline { label, .. } => write!(f, "<inline:{label}>"),
        }
    }
}

/// A parsed library specification.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LibrarySpec {
    pub name: String,
    #[serde(default)]
    pub version: String,
    #[serde(default)]
    pub doc: String,
    #[serde(default)]
    pub keywords: Vec<KeywordSpec>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeywordSpec {
    pub name: String,
    pub args: Vec<String>,
    pub doc: String,
    pub shortdoc: String,
    pub doc_format: String,
}

impl KeywordSpec {
    /// Builds a keyword, deriving the short doc from the first doc line.
    #[must_use]
    pub fn new(name: impl Into<String>, args: Vec<String>, doc: impl Into<String>) -> Self {
        let doc = doc.into();
        let shortdoc = doc.lines().next().unwrap_or_default().to_string();
        Self {
            name: name.into(),
            args,
            doc,
            shortdoc,
            doc_format: DEFAULT_DOC_FORMAT.to_string(),
        }
    }

    /// Argument list as shown in keyword completion, e.g.
    /// `[ arg1 | arg2=default value | *args ]`.
    #[must_use]
    pub fn args_repr(&self) -> String {
        format!("[ {} ]", self.args.join(" | "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn args_repr_matches_completion_format() {
        let kw = KeywordSpec::new(
            "Multiarg Keyword",
            vec![
                "arg1".to_string(),
                "arg2=default value".to_string(),
                "*args".to_string(),
            ],
            "",
        );
        assert_eq!(kw.args_repr(), "[ arg1 | arg2=default value | *args ]");
        assert_eq!(KeywordSpec::new("Empty", Vec::new(), "").args_repr(), "[  ]");
    }

    #[test]
    fn shortdoc_is_first_doc_line() {
        let kw = KeywordSpec::new(
            "Normal Keyword",
            Vec::new(),
            "This is kw documentation.\n\nThis is more docs.",
        );
        assert_eq!(kw.shortdoc, "This is kw documentation.");
        assert_eq!(kw.doc_format, "ROBOT");
    }

    #[test]
    fn spec_source_infers_format_from_extension() {
        assert_eq!(
            SpecSource::file("/specs/BuiltIn.json").map(|s| s.format()),
            Some(SpecFormat::Json)
        );
        assert_eq!(SpecSource::file("/specs/BuiltIn.txt"), None);
    }
}
