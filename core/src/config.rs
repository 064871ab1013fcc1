//! Configuration for both clients and the default transport.
//!
//! All structs deserialize with serde and fall back to `Default` for any
//! missing field, so a host can load them from whatever file format it
//! already uses. Nothing here reads the environment.

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Token value shipped in sample configs; never valid.
pub const PLACEHOLDER_TOKEN: &str = "PASTE_YOUR_TOKEN_HERE";

/// Page size used when listing notes per notebook.
pub const DEFAULT_LIST_PAGE_SIZE: u32 = 100;

/// Number of notes fetched for one bulk-delete pass.
pub const DEFAULT_DELETE_BATCH_SIZE: u32 = 1000;

pub const DEFAULT_EXCHANGE_BASE_URL: &str = "https://api.fixer.io";

/// Which note-store deployment to talk to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NoteService {
    #[default]
    Sandbox,
    Production,
    Yinxiang,
}

impl NoteService {
    pub fn base_url(self) -> &'static str {
        match self {
            NoteService::Sandbox => "https://sandbox.evernote.com",
            NoteService::Production => "https://www.evernote.com",
            NoteService::Yinxiang => "https://app.yinxiang.com",
        }
    }
}

/// What a bulk delete does when one deletion fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeletePolicy {
    /// Stop at the first failure and report `Error::PartialFailure`.
    #[default]
    AbortOnFirstError,
    /// Attempt every note; failures are listed in the returned report.
    ContinueOnError,
}

#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NoteStoreConfig {
    pub service: NoteService,
    /// Overrides the service's default endpoint when set.
    pub base_url: Option<String>,
    pub token: String,
    /// Maximum notes returned per notebook by
    /// `list_all_notebooks_with_notes`; larger notebooks are truncated.
    pub list_page_size: u32,
    /// Maximum notes removed by one `delete_all_notes_in_notebook` call.
    pub delete_batch_size: u32,
    pub delete_policy: DeletePolicy,
}

impl Default for NoteStoreConfig {
    fn default() -> Self {
        Self {
            service: NoteService::default(),
            base_url: None,
            token: String::new(),
            list_page_size: DEFAULT_LIST_PAGE_SIZE,
            delete_batch_size: DEFAULT_DELETE_BATCH_SIZE,
            delete_policy: DeletePolicy::default(),
        }
    }
}

impl NoteStoreConfig {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            ..Self::default()
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    pub fn with_delete_policy(mut self, policy: DeletePolicy) -> Self {
        self.delete_policy = policy;
        self
    }

    /// The endpoint requests are sent to.
    pub fn endpoint(&self) -> &str {
        self.base_url
            .as_deref()
            .unwrap_or_else(|| self.service.base_url())
    }

    /// Reject configurations that can never work, before any request is made.
    pub fn validate(&self) -> Result<(), Error> {
        let token = self.token.trim();
        if token.is_empty() {
            return Err(Error::Configuration("developer token must be set".into()));
        }
        if token == PLACEHOLDER_TOKEN {
            return Err(Error::Configuration(
                "developer token is still the placeholder value".into(),
            ));
        }
        if self.list_page_size == 0 || self.delete_batch_size == 0 {
            return Err(Error::Configuration("page sizes must be positive".into()));
        }
        Ok(())
    }
}

impl fmt::Debug for NoteStoreConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NoteStoreConfig")
            .field("service", &self.service)
            .field("base_url", &self.base_url)
            .field("token", &"<redacted>")
            .field("list_page_size", &self.list_page_size)
            .field("delete_batch_size", &self.delete_batch_size)
            .field("delete_policy", &self.delete_policy)
            .finish()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExchangeRateConfig {
    pub base_url: String,
    /// Sent as `access_key` when the endpoint requires one.
    pub access_key: Option<String>,
}

impl Default for ExchangeRateConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_EXCHANGE_BASE_URL.to_string(),
            access_key: None,
        }
    }
}

impl ExchangeRateConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            access_key: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TransportConfig {
    /// Upper bound for one request, connect through body read.
    pub timeout_ms: u64,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self { timeout_ms: 30_000 }
    }
}

impl TransportConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}
