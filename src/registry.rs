//! Bounded registry of the artifacts open in the side canvas.
//!
//! Eviction is by smallest `added_at`, i.e. insertion/update time rather than
//! access time: activating an artifact does not protect it from eviction.
use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::clock::Clock;
use crate::errors::{RegistryError, RegistryResult};
use crate::models::artifact::Artifact;
use crate::store::SessionStore;

/// Most artifacts that can be open at once; adding beyond this evicts the
/// entry with the smallest `added_at`.
pub const MAX_OPEN_ARTIFACTS: usize = 5;

/// Storage key for the persisted registry snapshot.
pub const ARTIFACT_STATE_KEY: &str = "easel-artifact-state";

/// An artifact open in the canvas, with its UI bookkeeping.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OpenArtifact {
    pub artifact: Artifact,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message_id: Option<String>,
    pub is_minimized: bool,
    pub position: usize,
    pub added_at: i64,
}

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Snapshot {
    artifacts: BTreeMap<String, OpenArtifact>,
    active_artifact_id: Option<String>,
}

/// Bounded, session-persisted registry of open artifacts.
///
/// Constructed from an injected store and clock so state can be rebuilt
/// fresh per test. Entries are held in insertion order; with a capacity of
/// five, linear scans are the whole indexing strategy.
pub struct ArtifactRegistry {
    entries: Vec<OpenArtifact>,
    active: Option<String>,
    store: Box<dyn SessionStore>,
    clock: Box<dyn Clock>,
}

impl ArtifactRegistry {
    /// Create a registry, restoring any snapshot the store holds. A snapshot
    /// that fails to parse is discarded and removed from the store rather
    /// than surfaced as an error.
    pub fn new(store: Box<dyn SessionStore>, clock: Box<dyn Clock>) -> Self {
        let mut registry = ArtifactRegistry {
            entries: Vec::new(),
            active: None,
            store,
            clock,
        };
        registry.restore();
        registry
    }

    /// Insert a new artifact or touch an existing one.
    ///
    /// An existing id has its payload updated and its `added_at` refreshed; a
    /// new id at capacity first evicts the oldest entry, which is returned.
    /// The new entry becomes active only when no valid active entry existed
    /// beforehand.
    pub fn add(&mut self, artifact: Artifact, message_id: Option<String>) -> Option<OpenArtifact> {
        let now = self.clock.now_millis();

        if let Some(entry) = self
            .entries
            .iter_mut()
            .find(|e| e.artifact.id == artifact.id)
        {
            entry.artifact = artifact;
            entry.message_id = message_id;
            entry.added_at = now;
            self.persist();
            return None;
        }

        let mut evicted = None;
        if self.entries.len() >= MAX_OPEN_ARTIFACTS {
            evicted = self.evict_oldest();
        }

        let had_active = self
            .active
            .as_deref()
            .map_or(false, |id| self.contains(id));
        let entry = OpenArtifact {
            artifact,
            message_id,
            is_minimized: false,
            position: self.entries.len(),
            added_at: now,
        };
        if !had_active {
            self.active = Some(entry.artifact.id.clone());
        }
        self.entries.push(entry);
        self.persist();
        evicted
    }

    /// Close an artifact. Unknown ids are a stale-reference no-op for
    /// callers, visible here as `NotFound`.
    pub fn remove(&mut self, id: &str) -> RegistryResult<OpenArtifact> {
        let index = self
            .entries
            .iter()
            .position(|e| e.artifact.id == id)
            .ok_or_else(|| RegistryError::NotFound(id.to_string()))?;
        let removed = self.entries.remove(index);
        if self.active.as_deref() == Some(id) {
            self.active = self.entries.first().map(|e| e.artifact.id.clone());
        }
        self.renumber();
        self.persist();
        Ok(removed)
    }

    /// Point the canvas at an artifact. Does not refresh `added_at`: the
    /// active artifact can still be the next eviction candidate.
    pub fn set_active(&mut self, id: &str) -> RegistryResult<()> {
        if !self.contains(id) {
            return Err(RegistryError::NotFound(id.to_string()));
        }
        self.active = Some(id.to_string());
        self.persist();
        Ok(())
    }

    /// Flip an artifact's minimized flag, returning the new state.
    pub fn toggle_minimized(&mut self, id: &str) -> RegistryResult<bool> {
        let entry = self
            .entries
            .iter_mut()
            .find(|e| e.artifact.id == id)
            .ok_or_else(|| RegistryError::NotFound(id.to_string()))?;
        entry.is_minimized = !entry.is_minimized;
        let minimized = entry.is_minimized;
        self.persist();
        Ok(minimized)
    }

    /// Drop every entry, the active pointer, and the persisted snapshot.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.active = None;
        if let Err(e) = self.store.remove(ARTIFACT_STATE_KEY) {
            warn!("failed to clear persisted artifact state: {}", e);
        }
    }

    pub fn active_id(&self) -> Option<&str> {
        self.active.as_deref()
    }

    pub fn get(&self, id: &str) -> Option<&OpenArtifact> {
        self.entries.iter().find(|e| e.artifact.id == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.entries.iter().any(|e| e.artifact.id == id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &OpenArtifact> {
        self.entries.iter()
    }

    fn evict_oldest(&mut self) -> Option<OpenArtifact> {
        if self.entries.is_empty() {
            return None;
        }
        // Strict comparison keeps the first-scanned entry on ties, so equal
        // timestamps evict in insertion order.
        let mut oldest = 0;
        for (index, entry) in self.entries.iter().enumerate().skip(1) {
            if entry.added_at < self.entries[oldest].added_at {
                oldest = index;
            }
        }
        let evicted = self.entries.remove(oldest);
        if self.active.as_deref() == Some(evicted.artifact.id.as_str()) {
            self.active = self.entries.first().map(|e| e.artifact.id.clone());
        }
        self.renumber();
        Some(evicted)
    }

    fn renumber(&mut self) {
        for (index, entry) in self.entries.iter_mut().enumerate() {
            entry.position = index;
        }
    }

    fn restore(&mut self) {
        let raw = match self.store.get(ARTIFACT_STATE_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => return,
            Err(e) => {
                warn!("failed to read persisted artifact state: {}", e);
                return;
            }
        };

        match serde_json::from_str::<Snapshot>(&raw) {
            Ok(snapshot) => {
                let mut entries: Vec<OpenArtifact> = snapshot.artifacts.into_values().collect();
                // JSON maps carry no order; `position` does.
                entries.sort_by_key(|e| (e.position, e.added_at));
                entries.truncate(MAX_OPEN_ARTIFACTS);
                self.active = snapshot
                    .active_artifact_id
                    .filter(|id| entries.iter().any(|e| &e.artifact.id == id));
                self.entries = entries;
                self.renumber();
            }
            Err(e) => {
                warn!("discarding corrupt artifact state snapshot: {}", e);
                if let Err(e) = self.store.remove(ARTIFACT_STATE_KEY) {
                    warn!("failed to remove corrupt artifact state: {}", e);
                }
            }
        }
    }

    fn persist(&self) {
        let snapshot = Snapshot {
            artifacts: self
                .entries
                .iter()
                .map(|e| (e.artifact.id.clone(), e.clone()))
                .collect(),
            active_artifact_id: self.active.clone(),
        };
        match serde_json::to_string(&snapshot) {
            Ok(raw) => {
                if let Err(e) = self.store.set(ARTIFACT_STATE_KEY, &raw) {
                    warn!("failed to persist artifact state: {}", e);
                }
            }
            Err(e) => warn!("failed to serialize artifact state: {}", e),
        }
    }
}
