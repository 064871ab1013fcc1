//! Thin synchronous clients for a remote note store and a currency-exchange
//! rate endpoint.
//!
//! # Overview
//! Two independent wrappers share one HTTP plumbing layer:
//! - [`NoteStoreClient`] lists notebooks with their notes, creates notes and
//!   notebooks, and deletes notes one at a time or in bulk.
//! - [`ExchangeRateClient`] fetches single- or multi-currency quotes and
//!   renders them as `1 USD = 6.5786 CNY, 0.70365 GBP`.
//!
//! # Design
//! - Each wrapper has a pure request layer ([`NoteStoreApi`],
//!   [`ExchangeRateApi`]) split into `build_*` (produces an [`HttpRequest`])
//!   and `parse_*` (consumes an [`HttpResponse`]), so the I/O boundary is
//!   explicit and testable without a network.
//! - The clients run those through a [`Transport`]. [`UreqTransport`] keeps
//!   standard certificate validation, applies a timeout, and honours a
//!   [`CancelFlag`].
//! - No retries, caching or concurrency: every method is one (or, for the
//!   listing and bulk operations, a sequence of) blocking round trips, and
//!   every failure is returned to the caller as an [`Error`].

pub mod config;
pub mod error;
pub mod http;
pub mod notes;
pub mod rates;
pub mod transport;

#[cfg(test)]
mod testing;

pub use config::{DeletePolicy, ExchangeRateConfig, NoteService, NoteStoreConfig, TransportConfig};
pub use error::{ApiError, Error, TransportError};
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use notes::{BulkDeleteReport, Note, NoteFilter, NoteList, NoteSortOrder, NoteStoreApi, NoteStoreClient, Notebook, User};
pub use rates::{format_rates, CurrencyCode, ExchangeRateApi, ExchangeRateClient, RateQuoteSet};
pub use transport::{CancelFlag, Transport, UreqTransport};
