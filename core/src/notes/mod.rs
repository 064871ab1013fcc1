//! Client for the remote note store: notebooks, notes, bulk deletion.

pub mod api;
pub mod client;
pub mod types;

pub use api::{wrap_content, NoteStoreApi};
pub use client::NoteStoreClient;
pub use types::{
    BulkDeleteReport, CreateNote, CreateNotebook, FindNotes, Note, NoteFilter, NoteList, NoteSortOrder, Notebook,
    User,
};
