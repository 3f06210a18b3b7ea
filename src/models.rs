//! These models represent the objects passed between the chat transcript and
//! the artifact canvas:
//! - chat messages, streamed in from the reply endpoint as text deltas
//! - artifacts, extracted from completed `<artifact>` blocks in message text
//!
//! Message content is owned by the transcript and only ever replaced
//! wholesale with the latest accumulated text; artifacts are immutable once
//! parsed and carry an identity derived from their content.
pub mod artifact;
pub mod message;
pub mod role;
