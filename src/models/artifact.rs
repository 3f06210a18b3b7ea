use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;

/// How many leading characters of content participate in identity hashing.
const ID_PREFIX_LEN: usize = 50;

/// Rendering category for an artifact, derived from the declared MIME-style
/// type through a fixed alias table. Unrecognized declarations pass through
/// verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ArtifactKind {
    Code,
    Markdown,
    Html,
    Svg,
    Mermaid,
    React,
    Image,
    Other(String),
}

impl ArtifactKind {
    /// Map a declared type string through the alias table.
    pub fn from_declared(raw: &str) -> Self {
        match raw {
            "application/vnd.ant.code" | "code" => ArtifactKind::Code,
            "text/markdown" | "markdown" => ArtifactKind::Markdown,
            "text/html" | "html" => ArtifactKind::Html,
            "image/svg+xml" | "svg" => ArtifactKind::Svg,
            "application/vnd.ant.mermaid" | "mermaid" => ArtifactKind::Mermaid,
            "application/vnd.ant.react" | "react" => ArtifactKind::React,
            "image" => ArtifactKind::Image,
            other => ArtifactKind::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            ArtifactKind::Code => "code",
            ArtifactKind::Markdown => "markdown",
            ArtifactKind::Html => "html",
            ArtifactKind::Svg => "svg",
            ArtifactKind::Mermaid => "mermaid",
            ArtifactKind::React => "react",
            ArtifactKind::Image => "image",
            ArtifactKind::Other(raw) => raw,
        }
    }
}

impl fmt::Display for ArtifactKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<String> for ArtifactKind {
    fn from(raw: String) -> Self {
        ArtifactKind::from_declared(&raw)
    }
}

impl From<ArtifactKind> for String {
    fn from(kind: ArtifactKind) -> Self {
        kind.as_str().to_string()
    }
}

/// A structured content block emitted by the assistant and rendered outside
/// the chat transcript. Immutable once parsed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Artifact {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: ArtifactKind,
    pub title: String,
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
}

impl Artifact {
    /// Build an artifact from a parsed block. The id hashes the content
    /// prefix, length, kind, and ordinal position in the message, so
    /// reparsing unchanged text yields the same identity.
    pub fn new<S: Into<String>, T: Into<String>>(
        kind: ArtifactKind,
        title: S,
        content: T,
        language: Option<String>,
        index: usize,
    ) -> Self {
        let content = content.into();
        let id = stable_id(&content, &kind, index);
        Artifact {
            id,
            kind,
            title: title.into(),
            content,
            language,
        }
    }
}

fn stable_id(content: &str, kind: &ArtifactKind, index: usize) -> String {
    let prefix: String = content.chars().take(ID_PREFIX_LEN).collect();
    let mut hasher = Sha256::new();
    hasher.update(prefix.as_bytes());
    hasher.update(content.len().to_le_bytes());
    hasher.update(kind.as_str().as_bytes());
    hasher.update(index.to_le_bytes());
    let digest = hasher.finalize();
    format!("artifact-{}", &hex::encode(digest)[..12])
}
