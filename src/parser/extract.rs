use lazy_static::lazy_static;
use regex::Regex;

use crate::models::artifact::{Artifact, ArtifactKind};
use crate::parser::lint::{self, ImportWarning};

lazy_static! {
    static ref ARTIFACT_BLOCK: Regex = Regex::new(
        r#"(?s)<artifact\s+type="(?P<type>[^"]*)"\s+title="(?P<title>[^"]*)"(?:\s+language="(?P<language>[^"]*)")?\s*>(?P<body>.*?)</artifact>"#
    )
    .unwrap();
}

/// Result of scanning a complete message text for artifact blocks.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractedMessage {
    pub artifacts: Vec<Artifact>,
    /// The message text with every matched block removed, byte for byte.
    pub clean_content: String,
    /// Advisory findings from the import scan; never block extraction.
    pub warnings: Vec<ImportWarning>,
}

/// Extract every complete artifact block from the text.
///
/// Best effort: a partial, unterminated, or malformed block is
/// simply not matched and remains in `clean_content` as plain text. The
/// in-progress detector is the signal for blocks still streaming in.
pub fn extract_artifacts(text: &str) -> ExtractedMessage {
    let mut artifacts = Vec::new();
    let mut warnings = Vec::new();
    let mut clean_content = String::with_capacity(text.len());
    let mut cursor = 0;

    for (index, caps) in ARTIFACT_BLOCK.captures_iter(text).enumerate() {
        let block = caps.get(0).unwrap();
        let kind = ArtifactKind::from_declared(&caps["type"]);
        let title = &caps["title"];
        let body = caps["body"].trim().to_string();
        let language = caps.name("language").map(|m| m.as_str().to_string());

        warnings.extend(lint::scan_imports(title, &body));
        artifacts.push(Artifact::new(kind, title, body, language, index));

        clean_content.push_str(&text[cursor..block.start()]);
        cursor = block.end();
    }
    clean_content.push_str(&text[cursor..]);

    ExtractedMessage {
        artifacts,
        clean_content,
        warnings,
    }
}
