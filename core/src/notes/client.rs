//! High-level note-store operations over an authenticated session.

use tracing::{debug, info, instrument, warn};

use crate::config::{DeletePolicy, NoteStoreConfig};
use crate::error::{ApiError, Error, TransportError};
use crate::http::{HttpRequest, HttpResponse};
use crate::notes::api::{wrap_content, NoteStoreApi};
use crate::notes::types::{
    BulkDeleteReport, CreateNote, CreateNotebook, FindNotes, Note, NoteFilter, NoteList, Notebook, User,
};
use crate::transport::Transport;

/// Note and notebook operations against one account.
///
/// A value of this type only exists once the handshake succeeded, so every
/// method talks to a validated session. Each call is a fresh round trip;
/// nothing fetched is cached.
pub struct NoteStoreClient<T> {
    api: NoteStoreApi,
    transport: T,
    user: User,
    list_page_size: u32,
    delete_batch_size: u32,
    delete_policy: DeletePolicy,
}

impl<T: Transport> NoteStoreClient<T> {
    /// Validate `config`, then confirm the token by fetching the current user.
    ///
    /// Fails with `Error::Configuration` without touching the network when
    /// the token is empty or the placeholder, and with `Error::RemoteCall`
    /// (operation `handshake`) when the service rejects it or is unreachable.
    pub fn connect(config: &NoteStoreConfig, transport: T) -> Result<Self, Error> {
        config.validate()?;
        let api = NoteStoreApi::new(config.endpoint(), &config.token);
        debug!(endpoint = config.endpoint(), "connecting to note store");

        let user = transport
            .execute(api.build_get_user())
            .map_err(ApiError::from)
            .and_then(|response| api.parse_get_user(response))
            .map_err(|cause| Error::remote("handshake", cause))?;
        info!(username = %user.username, "authenticated to note store");

        Ok(Self {
            api,
            transport,
            user,
            list_page_size: config.list_page_size,
            delete_batch_size: config.delete_batch_size,
            delete_policy: config.delete_policy,
        })
    }

    /// The account resolved during the handshake.
    pub fn user(&self) -> &User {
        &self.user
    }

    fn call<R>(
        &self,
        request: HttpRequest,
        parse: impl FnOnce(&NoteStoreApi, HttpResponse) -> Result<R, ApiError>,
    ) -> Result<R, ApiError> {
        let response = self.transport.execute(request)?;
        parse(&self.api, response)
    }

    pub fn list_notebooks(&self) -> Result<Vec<Notebook>, Error> {
        self.call(self.api.build_list_notebooks(), NoteStoreApi::parse_list_notebooks)
            .map_err(|cause| Error::remote("list_notebooks", cause))
    }

    pub fn get_notebook(&self, guid: &str) -> Result<Notebook, Error> {
        self.api
            .build_get_notebook(guid)
            .and_then(|request| self.call(request, NoteStoreApi::parse_get_notebook))
            .map_err(|cause| Error::remote_for("get_notebook", guid, cause))
    }

    /// One page of notes matching `filter`. Use `NoteList::next_offset` to
    /// continue past `max_notes`.
    pub fn find_notes(&self, filter: &NoteFilter, offset: u32, max_notes: u32) -> Result<NoteList, Error> {
        let input = FindNotes {
            filter: filter.clone(),
            offset,
            max_notes,
        };
        self.api
            .build_find_notes(&input)
            .and_then(|request| self.call(request, NoteStoreApi::parse_find_notes))
            .map_err(|cause| match &filter.notebook_guid {
                Some(guid) => Error::remote_for("find_notes", guid.as_str(), cause),
                None => Error::remote("find_notes", cause),
            })
    }

    /// Every notebook paired with its notes, oldest first.
    ///
    /// Only the first `list_page_size` notes (100 by default) of each
    /// notebook are returned; larger notebooks are truncated. Page through
    /// `find_notes` when the full contents are needed.
    #[instrument(level = "debug", skip(self))]
    pub fn list_all_notebooks_with_notes(&self) -> Result<Vec<(Notebook, Vec<Note>)>, Error> {
        let notebooks = self.list_notebooks()?;
        let mut listing = Vec::with_capacity(notebooks.len());
        for notebook in notebooks {
            let filter = NoteFilter::in_notebook(notebook.guid.as_str());
            let page = self.find_notes(&filter, 0, self.list_page_size)?;
            if page.next_offset().is_some() {
                debug!(
                    notebook = %notebook.guid,
                    total = page.total_notes,
                    returned = page.notes.len(),
                    "notebook listing truncated"
                );
            }
            listing.push((notebook, page.notes));
        }
        Ok(listing)
    }

    pub fn get_note(&self, guid: &str) -> Result<Note, Error> {
        self.api
            .build_get_note(guid)
            .and_then(|request| self.call(request, NoteStoreApi::parse_get_note))
            .map_err(|cause| Error::remote_for("get_note", guid, cause))
    }

    /// Create a note whose body is `content` wrapped in the note template.
    /// Without `notebook_guid` the account's default notebook receives it.
    pub fn create_note(&self, title: &str, content: &str, notebook_guid: Option<&str>) -> Result<Note, Error> {
        let input = CreateNote {
            title: title.to_string(),
            content: wrap_content(content),
            notebook_guid: notebook_guid.map(str::to_string),
        };
        let note = self
            .api
            .build_create_note(&input)
            .and_then(|request| self.call(request, NoteStoreApi::parse_create_note))
            .map_err(|cause| Error::remote_for("create_note", title, cause))?;
        info!(guid = %note.guid, title = %note.title, "created note");
        Ok(note)
    }

    /// Create a notebook. The service enforces name uniqueness; a duplicate
    /// surfaces as `Error::RemoteCall` with its HTTP status.
    pub fn create_notebook(&self, name: &str) -> Result<Notebook, Error> {
        let input = CreateNotebook { name: name.to_string() };
        let notebook = self
            .api
            .build_create_notebook(&input)
            .and_then(|request| self.call(request, NoteStoreApi::parse_create_notebook))
            .map_err(|cause| Error::remote_for("create_notebook", name, cause))?;
        info!(guid = %notebook.guid, name = %notebook.name, "created notebook");
        Ok(notebook)
    }

    pub fn delete_note(&self, guid: &str) -> Result<(), Error> {
        self.api
            .build_delete_note(guid)
            .and_then(|request| self.call(request, NoteStoreApi::parse_delete_note))
            .map_err(|cause| Error::remote_for("delete_note", guid, cause))?;
        info!(guid, "deleted note");
        Ok(())
    }

    /// Delete up to `delete_batch_size` notes (1000 by default) from a
    /// notebook, one at a time in creation order.
    ///
    /// Under `DeletePolicy::AbortOnFirstError` the first failed deletion
    /// stops the loop and is reported as `Error::PartialFailure`; later
    /// notes are not attempted. Under `ContinueOnError` failures are
    /// collected in the report. Cancellation always stops the loop.
    /// `BulkDeleteReport::remaining` counts notes beyond this batch.
    #[instrument(level = "debug", skip(self))]
    pub fn delete_all_notes_in_notebook(&self, notebook_guid: &str) -> Result<BulkDeleteReport, Error> {
        let notebook = self.get_notebook(notebook_guid)?;
        debug!(name = %notebook.name, "deleting notes in notebook");

        let filter = NoteFilter::in_notebook(notebook.guid.as_str());
        let page = self.find_notes(&filter, 0, self.delete_batch_size)?;
        let mut report = BulkDeleteReport {
            remaining: page.total_notes.saturating_sub(page.notes.len() as u32),
            ..BulkDeleteReport::default()
        };

        for note in &page.notes {
            let result = self
                .api
                .build_delete_note(&note.guid)
                .and_then(|request| self.call(request, NoteStoreApi::parse_delete_note));
            let cause = match result {
                Ok(()) => {
                    debug!(guid = %note.guid, title = %note.title, "deleted note");
                    report.deleted += 1;
                    continue;
                }
                Err(cause) => cause,
            };

            let cancelled = cause == ApiError::Transport(TransportError::Cancelled);
            if self.delete_policy == DeletePolicy::AbortOnFirstError || cancelled {
                warn!(
                    guid = %note.guid,
                    deleted = report.deleted,
                    error = %cause,
                    "bulk delete stopped"
                );
                return Err(Error::PartialFailure {
                    succeeded: report.deleted,
                    failed_at: note.guid.clone(),
                    cause,
                });
            }
            warn!(guid = %note.guid, error = %cause, "delete failed, continuing");
            report.failed.push(note.guid.clone());
        }

        info!(
            notebook = %notebook.guid,
            deleted = report.deleted,
            failed = report.failed.len(),
            remaining = report.remaining,
            "bulk delete finished"
        );
        Ok(report)
    }
}
