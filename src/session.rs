use anyhow::Result;
use futures::stream::BoxStream;
use futures::StreamExt;

use crate::models::artifact::Artifact;
use crate::models::message::ChatMessage;
use crate::parser::{detect, extract};
use crate::registry::ArtifactRegistry;

/// Progress of an assistant turn after applying one streamed delta.
#[derive(Debug, Clone, PartialEq)]
pub struct StreamUpdate {
    pub message_id: String,
    /// Artifact blocks opened but not yet closed at this point in the stream.
    pub in_progress: usize,
    /// Ids of every complete artifact parsed from the text so far.
    pub artifact_ids: Vec<String>,
}

/// Rendering view of a message: the text with artifact blocks removed, plus
/// the artifacts themselves.
#[derive(Debug, Clone, PartialEq)]
pub struct MessageView {
    pub clean_content: String,
    pub artifacts: Vec<Artifact>,
    pub in_progress: usize,
}

/// A chat transcript wired to an artifact registry.
///
/// All mutation happens synchronously per incoming delta; parsing is pure and
/// re-run over the full accumulated text each time, so an aborted stream just
/// leaves the message at its last accumulated state with nothing to clean up.
pub struct ChatSession {
    messages: Vec<ChatMessage>,
    registry: ArtifactRegistry,
}

impl ChatSession {
    pub fn new(registry: ArtifactRegistry) -> Self {
        ChatSession {
            messages: Vec::new(),
            registry,
        }
    }

    /// Append a user message, returning its id.
    pub fn push_user<S: Into<String>>(&mut self, content: S) -> String {
        let message = ChatMessage::user(content);
        let id = message.id.clone();
        self.messages.push(message);
        id
    }

    /// Create a stream that applies each incoming delta to a new assistant
    /// message and yields the resulting parse state.
    ///
    /// Per delta: the accumulated text replaces the message content
    /// wholesale, the parser re-runs over the full text, and every complete
    /// artifact is added to the registry tagged with the message id.
    /// Re-adding an unchanged artifact refreshes its recency, matching the
    /// registry's touch semantics.
    pub fn stream_reply<'a>(
        &'a mut self,
        mut deltas: BoxStream<'a, Result<String>>,
    ) -> BoxStream<'a, Result<StreamUpdate>> {
        let message = ChatMessage::assistant();
        let message_id = message.id.clone();
        self.messages.push(message);

        Box::pin(async_stream::try_stream! {
            let mut buffer = String::new();
            while let Some(delta) = deltas.next().await {
                let delta = delta?;
                buffer.push_str(&delta);
                yield self.apply_text(&message_id, buffer.clone());
            }
        })
    }

    /// Replace a message's content with the given text and reconcile the
    /// registry with the artifacts parsed from it.
    pub fn apply_text<S: Into<String>>(&mut self, message_id: &str, text: S) -> StreamUpdate {
        let text = text.into();
        let in_progress = detect::in_progress_artifacts(&text);
        let extracted = extract::extract_artifacts(&text);

        match self.messages.iter_mut().find(|m| m.id == message_id) {
            Some(message) => message.replace_content(text),
            None => tracing::warn!("dropping delta for unknown message {}", message_id),
        }

        let mut artifact_ids = Vec::with_capacity(extracted.artifacts.len());
        for artifact in extracted.artifacts {
            artifact_ids.push(artifact.id.clone());
            self.registry.add(artifact, Some(message_id.to_string()));
        }

        StreamUpdate {
            message_id: message_id.to_string(),
            in_progress,
            artifact_ids,
        }
    }

    /// Rendering view of a message by id.
    pub fn message_view(&self, message_id: &str) -> Option<MessageView> {
        let message = self.messages.iter().find(|m| m.id == message_id)?;
        let extracted = extract::extract_artifacts(&message.content);
        Some(MessageView {
            clean_content: extracted.clean_content,
            artifacts: extracted.artifacts,
            in_progress: detect::in_progress_artifacts(&message.content),
        })
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn registry(&self) -> &ArtifactRegistry {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut ArtifactRegistry {
        &mut self.registry
    }
}
