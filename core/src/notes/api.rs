//! Stateless request builder and response parser for the note store.
//!
//! # Design
//! `NoteStoreApi` holds the endpoint and the bearer token and carries no
//! mutable state between calls. Each remote operation is split into a
//! `build_*` method that produces an `HttpRequest` and a `parse_*` method
//! that consumes an `HttpResponse`; `NoteStoreClient` runs the round trip
//! in between.

use url::Url;

use crate::error::ApiError;
use crate::http::{check_status, decode_json, encode_json, HttpMethod, HttpRequest, HttpResponse, CONTENT_TYPE_JSON};
use crate::notes::types::{CreateNote, CreateNotebook, FindNotes, Note, NoteList, Notebook, User};

const CONTENT_PREFIX: &str = concat!(
    r#"<?xml version="1.0" encoding="UTF-8"?>"#,
    r#"<!DOCTYPE en-note SYSTEM "http://xml.evernote.com/pub/enml2.dtd">"#,
    r#"<en-note><span style="color:green;">"#,
);
const CONTENT_SUFFIX: &str = "</span><br/></en-note>";

/// Wrap `content` in the note markup template: one styled paragraph.
/// `content` is inserted verbatim, so inline markup passes through.
pub fn wrap_content(content: &str) -> String {
    let mut wrapped = String::with_capacity(CONTENT_PREFIX.len() + content.len() + CONTENT_SUFFIX.len());
    wrapped.push_str(CONTENT_PREFIX);
    wrapped.push_str(content);
    wrapped.push_str(CONTENT_SUFFIX);
    wrapped
}

#[derive(Clone)]
pub struct NoteStoreApi {
    base_url: String,
    authorization: String,
}

impl std::fmt::Debug for NoteStoreApi {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NoteStoreApi")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl NoteStoreApi {
    pub fn new(base_url: &str, token: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            authorization: format!("Bearer {}", token.trim()),
        }
    }

    fn request(&self, method: HttpMethod, path: &str, body: Option<String>) -> HttpRequest {
        self.request_to(method, format!("{}{path}", self.base_url), body)
    }

    fn request_to(&self, method: HttpMethod, url: String, body: Option<String>) -> HttpRequest {
        let mut headers = vec![("authorization".to_string(), self.authorization.clone())];
        if body.is_some() {
            headers.push((CONTENT_TYPE_JSON.0.to_string(), CONTENT_TYPE_JSON.1.to_string()));
        }
        HttpRequest {
            method,
            path: url,
            headers,
            body,
        }
    }

    /// `<base>/<collection>/<guid>` with `guid` percent-encoded as a single
    /// path segment, so `/`, `?` and `#` inside an id stay part of it.
    fn resource_url(&self, collection: &str, guid: &str) -> Result<String, ApiError> {
        let mut url = Url::parse(&self.base_url)
            .map_err(|err| ApiError::SerializationError(format!("invalid base url {}: {err}", self.base_url)))?;
        url.path_segments_mut()
            .map_err(|()| ApiError::SerializationError(format!("base url {} cannot carry a path", self.base_url)))?
            .pop_if_empty()
            .extend([collection, guid]);
        Ok(url.into())
    }

    pub fn build_get_user(&self) -> HttpRequest {
        self.request(HttpMethod::Get, "/user", None)
    }

    pub fn build_list_notebooks(&self) -> HttpRequest {
        self.request(HttpMethod::Get, "/notebooks", None)
    }

    pub fn build_get_notebook(&self, guid: &str) -> Result<HttpRequest, ApiError> {
        let url = self.resource_url("notebooks", guid)?;
        Ok(self.request_to(HttpMethod::Get, url, None))
    }

    pub fn build_create_notebook(&self, input: &CreateNotebook) -> Result<HttpRequest, ApiError> {
        let body = encode_json(input)?;
        Ok(self.request(HttpMethod::Post, "/notebooks", Some(body)))
    }

    pub fn build_find_notes(&self, input: &FindNotes) -> Result<HttpRequest, ApiError> {
        let body = encode_json(input)?;
        Ok(self.request(HttpMethod::Post, "/notes/search", Some(body)))
    }

    pub fn build_get_note(&self, guid: &str) -> Result<HttpRequest, ApiError> {
        let url = self.resource_url("notes", guid)?;
        Ok(self.request_to(HttpMethod::Get, url, None))
    }

    pub fn build_create_note(&self, input: &CreateNote) -> Result<HttpRequest, ApiError> {
        let body = encode_json(input)?;
        Ok(self.request(HttpMethod::Post, "/notes", Some(body)))
    }

    pub fn build_delete_note(&self, guid: &str) -> Result<HttpRequest, ApiError> {
        let url = self.resource_url("notes", guid)?;
        Ok(self.request_to(HttpMethod::Delete, url, None))
    }

    pub fn parse_get_user(&self, response: HttpResponse) -> Result<User, ApiError> {
        check_status(&response, 200)?;
        decode_json(&response.body)
    }

    pub fn parse_list_notebooks(&self, response: HttpResponse) -> Result<Vec<Notebook>, ApiError> {
        check_status(&response, 200)?;
        decode_json(&response.body)
    }

    pub fn parse_get_notebook(&self, response: HttpResponse) -> Result<Notebook, ApiError> {
        check_status(&response, 200)?;
        decode_json(&response.body)
    }

    pub fn parse_create_notebook(&self, response: HttpResponse) -> Result<Notebook, ApiError> {
        check_status(&response, 201)?;
        decode_json(&response.body)
    }

    pub fn parse_find_notes(&self, response: HttpResponse) -> Result<NoteList, ApiError> {
        check_status(&response, 200)?;
        decode_json(&response.body)
    }

    pub fn parse_get_note(&self, response: HttpResponse) -> Result<Note, ApiError> {
        check_status(&response, 200)?;
        decode_json(&response.body)
    }

    pub fn parse_create_note(&self, response: HttpResponse) -> Result<Note, ApiError> {
        check_status(&response, 201)?;
        decode_json(&response.body)
    }

    pub fn parse_delete_note(&self, response: HttpResponse) -> Result<(), ApiError> {
        check_status(&response, 204)
    }
}
