//! Note-store DTOs.
//!
//! Field names follow the note store's camelCase wire format. Identifiers
//! are opaque server-issued strings; nothing here is cached between calls.

use serde::{Deserialize, Serialize};

/// The account the token belongs to, returned by the connection handshake.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub username: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notebook {
    pub guid: String,
    pub name: String,
    #[serde(default)]
    pub default_notebook: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Note {
    pub guid: String,
    pub title: String,
    #[serde(default)]
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notebook_guid: Option<String>,
    /// Creation time in milliseconds since the epoch, as stamped by the server.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created: Option<i64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NoteSortOrder {
    #[default]
    Created,
    Updated,
    Relevance,
    UpdateSequenceNumber,
    Title,
}

/// Selects which notes a search returns.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NoteFilter {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notebook_guid: Option<String>,
    pub order: NoteSortOrder,
    pub ascending: bool,
}

impl NoteFilter {
    /// Notes in `notebook_guid`, oldest first.
    pub fn in_notebook(notebook_guid: impl Into<String>) -> Self {
        Self {
            notebook_guid: Some(notebook_guid.into()),
            order: NoteSortOrder::Created,
            ascending: true,
        }
    }
}

/// Request payload for a note search.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FindNotes {
    pub filter: NoteFilter,
    pub offset: u32,
    pub max_notes: u32,
}

/// One page of search results.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NoteList {
    pub start_index: u32,
    /// Number of notes matching the filter across all pages.
    pub total_notes: u32,
    pub notes: Vec<Note>,
}

impl NoteList {
    /// Offset of the following page, or `None` when this page is the last.
    pub fn next_offset(&self) -> Option<u32> {
        let end = self.start_index.saturating_add(self.notes.len() as u32);
        (end < self.total_notes && !self.notes.is_empty()).then_some(end)
    }
}

/// Request payload for creating a note.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateNote {
    pub title: String,
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notebook_guid: Option<String>,
}

/// Request payload for creating a notebook.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateNotebook {
    pub name: String,
}

/// Outcome of `delete_all_notes_in_notebook`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct BulkDeleteReport {
    pub deleted: usize,
    /// Notes whose deletion failed; only populated under
    /// `DeletePolicy::ContinueOnError`.
    pub failed: Vec<String>,
    /// Notes still in the notebook beyond this call's batch. Non-zero means
    /// the caller must invoke the delete again to drain the notebook.
    pub remaining: u32,
}
