// Copyright 2026 Hypermesh Foundation. All rights reserved.
// Macro-Monopoly Simulation Suite - Event Log

use serde::{Deserialize, Serialize};

// ─── Log Category ────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum LogCategory {
    Info,
    CardDraw,
    EconomicEvent,
    Warning,
    Error,
    Success,
}

// ─── Event Entry ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventEntry {
    pub category: LogCategory,
    pub message: String,
}

// ─── Event Log ───────────────────────────────────────────────────────────────

/// Append-only stream of human-readable event messages, consumed by any
/// logger or UI. The engine never reads it back.
#[derive(Debug, Clone, Default, Serialize)]
pub struct EventLog {
    entries: Vec<EventEntry>,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, category: LogCategory, message: impl Into<String>) {
        self.entries.push(EventEntry {
            category,
            message: message.into(),
        });
    }

    pub fn info(&mut self, message: impl Into<String>) {
        self.push(LogCategory::Info, message);
    }

    pub fn entries(&self) -> &[EventEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
