use super::event::EventKind;
use super::types::{EntityId, Ticks};
use serde::Serialize;

/// What a trace entry records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TraceKind {
    /// A scheduled event fired
    Fired(EventKind),
    /// A product entered the location
    Entered { product: EntityId },
    /// A product was destroyed at the location
    Destroyed { product: EntityId },
    /// A source generation found its target full
    Dropped,
}

/// One observable step of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TraceEntry {
    pub time: Ticks,
    pub entity: EntityId,
    pub kind: TraceKind,
}

/// Accumulates trace entries during a run.
#[derive(Debug, Default)]
pub struct TraceLog {
    entries: Vec<TraceEntry>,
    max_entries: usize,
    enabled: bool,
}

impl TraceLog {
    /// Create a trace log with the given maximum size (0 = unlimited)
    pub fn new(enabled: bool, max_entries: usize) -> Self {
        Self {
            entries: Vec::new(),
            max_entries,
            enabled,
        }
    }

    /// Append an entry, dropping the oldest entries past the capacity
    pub fn push(&mut self, entry: TraceEntry) {
        if !self.enabled {
            return;
        }
        self.entries.push(entry);
        if self.max_entries > 0 && self.entries.len() > self.max_entries {
            let drain_count = self.entries.len() - self.max_entries;
            self.entries.drain(..drain_count);
        }
    }

    pub fn record(&mut self, time: Ticks, entity: EntityId, kind: TraceKind) {
        self.push(TraceEntry { time, entity, kind });
    }

    pub fn entries(&self) -> &[TraceEntry] {
        &self.entries
    }

    /// Entries recorded at the given tick
    pub fn entries_at(&self, time: Ticks) -> Vec<&TraceEntry> {
        self.entries.iter().filter(|e| e.time == time).collect()
    }

    /// Entries recorded against the given entity
    pub fn entries_for(&self, entity: EntityId) -> Vec<&TraceEntry> {
        self.entries.iter().filter(|e| e.entity == entity).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
