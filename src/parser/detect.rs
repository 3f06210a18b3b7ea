use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // An opening tag is `<artifact` followed by whitespace or `>`; a bare
    // `<artifact` at the end of the buffer or `<artifactx` is not a tag.
    static ref OPENING_TAG: Regex = Regex::new(r"<artifact[\s>]").unwrap();
}

const CLOSING_TAG: &str = "</artifact>";

/// Count artifact blocks that have opened but not yet closed in the text so
/// far. Never negative: a stray closing tag with no opener contributes
/// nothing.
///
/// This is a balance heuristic over the raw stream, not a parser: tags quoted
/// inside fenced code examples are counted the same as real ones.
pub fn in_progress_artifacts(text: &str) -> usize {
    let opens = OPENING_TAG.find_iter(text).count();
    let closes = text.matches(CLOSING_TAG).count();
    opens.saturating_sub(closes)
}
