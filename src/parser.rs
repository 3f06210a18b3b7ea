//! Artifact tag parsing over streamed assistant text.
//!
//! Parsing is pure and re-run from the full accumulated text on every update:
//! the detector reports blocks whose opening tag has streamed in but whose
//! closing tag has not, and the extractor lifts complete blocks into
//! [`crate::models::artifact::Artifact`] records. Neither ever fails a
//! render; text that does not match is left untouched.
pub mod detect;
pub mod extract;
pub mod lint;
