//! End-to-end tests against the live mock server.
//!
//! # Design
//! Each test starts its own mock server on a random port, then drives the
//! clients over real HTTP through `UreqTransport`. This validates that the
//! request layers and the server agree on paths, payloads and status codes.

use std::time::Duration;

use notefx_core::notes::wrap_content;
use notefx_core::{
    ApiError, CurrencyCode, Error, ExchangeRateClient, ExchangeRateConfig, NoteFilter, NoteStoreClient, NoteStoreConfig,
    TransportConfig, TransportError, UreqTransport,
};

/// Start the mock server in a background thread and return its base URL.
fn start_mock_server() -> String {
    let std_listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = std_listener.local_addr().unwrap();
    std_listener.set_nonblocking(true).unwrap();

    std::thread::spawn(move || {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        rt.block_on(async {
            let listener = tokio::net::TcpListener::from_std(std_listener).unwrap();
            mock_server::run(listener).await
        })
        .unwrap();
    });

    format!("http://{addr}")
}

fn connect(base_url: &str) -> NoteStoreClient<UreqTransport> {
    let config = NoteStoreConfig::new(mock_server::DEFAULT_TOKEN).with_base_url(base_url);
    NoteStoreClient::connect(&config, UreqTransport::default()).unwrap()
}

#[test]
fn note_store_lifecycle() {
    let base_url = start_mock_server();
    let client = connect(&base_url);
    assert_eq!(client.user().username, "mock-user");

    // Step 1: create a notebook; a second one with the same name conflicts.
    let notebook = client.create_notebook("Integration").unwrap();
    assert_eq!(notebook.name, "Integration");
    let err = client.create_notebook("Integration").unwrap_err();
    assert!(matches!(
        err,
        Error::RemoteCall {
            operation: "create_notebook",
            cause: ApiError::HttpError { status: 409, .. },
            ..
        }
    ));

    // Step 2: create three notes in it and one in the default notebook.
    let mut created = Vec::new();
    for title in ["one", "two", "three"] {
        created.push(client.create_note(title, "body", Some(notebook.guid.as_str())).unwrap());
    }
    let loose = client.create_note("T", "C", None).unwrap();
    assert_ne!(loose.notebook_guid.as_deref(), Some(notebook.guid.as_str()));

    // Step 3: fetch round-trips title and wrapped content.
    let fetched = client.get_note(&loose.guid).unwrap();
    assert_eq!(fetched.title, "T");
    assert_eq!(fetched.content, wrap_content("C"));

    // Step 4: listing pairs every notebook with its notes, oldest first.
    let listing = client.list_all_notebooks_with_notes().unwrap();
    assert_eq!(listing.len(), 2);
    let (_, notes) = listing
        .iter()
        .find(|(nb, _)| nb.guid == notebook.guid)
        .unwrap();
    let titles: Vec<&str> = notes.iter().map(|n| n.title.as_str()).collect();
    assert_eq!(titles, vec!["one", "two", "three"]);

    // Step 5: delete one note; deleting it again is NotFound.
    client.delete_note(&created[0].guid).unwrap();
    let err = client.delete_note(&created[0].guid).unwrap_err();
    assert!(matches!(
        err,
        Error::RemoteCall {
            cause: ApiError::NotFound,
            ..
        }
    ));

    // Step 6: bulk delete drains the rest.
    let report = client.delete_all_notes_in_notebook(&notebook.guid).unwrap();
    assert_eq!(report.deleted, 2);
    assert!(report.failed.is_empty());
    assert_eq!(report.remaining, 0);

    let page = client
        .find_notes(&NoteFilter::in_notebook(notebook.guid.as_str()), 0, 100)
        .unwrap();
    assert_eq!(page.total_notes, 0);

    // The default notebook is untouched.
    assert_eq!(client.get_note(&loose.guid).unwrap().guid, loose.guid);
}

#[test]
fn ids_with_reserved_characters_do_not_reach_other_resources() {
    let base_url = start_mock_server();
    let client = connect(&base_url);

    let notebook = client.create_notebook("Reserved").unwrap();
    let note = client.create_note("kept", "x", Some(notebook.guid.as_str())).unwrap();

    for id in [format!("{}?other", note.guid), format!("{}/extra", note.guid), format!("{}#frag", note.guid)] {
        let err = client.delete_note(&id).unwrap_err();
        assert_eq!(err.cause(), Some(&ApiError::NotFound), "{id}");
    }
    assert_eq!(client.get_note(&note.guid).unwrap().title, "kept");

    let err = client.get_notebook(&format!("{}#frag", notebook.guid)).unwrap_err();
    assert_eq!(err.cause(), Some(&ApiError::NotFound));
    let err = client.get_note(&format!("{}/x", note.guid)).unwrap_err();
    assert_eq!(err.cause(), Some(&ApiError::NotFound));
}

#[test]
fn listing_truncates_at_page_size_and_find_notes_continues() {
    let base_url = start_mock_server();
    let mut config = NoteStoreConfig::new(mock_server::DEFAULT_TOKEN).with_base_url(&base_url);
    config.list_page_size = 2;
    let client = NoteStoreClient::connect(&config, UreqTransport::default()).unwrap();

    let notebook = client.create_notebook("Paged").unwrap();
    for title in ["a", "b", "c"] {
        client.create_note(title, "x", Some(notebook.guid.as_str())).unwrap();
    }

    let listing = client.list_all_notebooks_with_notes().unwrap();
    let (_, notes) = listing.iter().find(|(nb, _)| nb.guid == notebook.guid).unwrap();
    assert_eq!(notes.len(), 2);

    let filter = NoteFilter::in_notebook(notebook.guid.as_str());
    let first = client.find_notes(&filter, 0, 2).unwrap();
    let offset = first.next_offset().unwrap();
    let second = client.find_notes(&filter, offset, 2).unwrap();
    assert_eq!(second.notes.len(), 1);
    assert_eq!(second.notes[0].title, "c");
    assert_eq!(second.next_offset(), None);
}

#[test]
fn wrong_token_fails_construction() {
    let base_url = start_mock_server();
    let config = NoteStoreConfig::new("not-the-token").with_base_url(&base_url);
    let err = NoteStoreClient::connect(&config, UreqTransport::default()).err().unwrap();
    assert!(matches!(
        err,
        Error::RemoteCall {
            operation: "handshake",
            cause: ApiError::Unauthorized,
            ..
        }
    ));
}

#[test]
fn exchange_rates_over_http() {
    let base_url = start_mock_server();
    let client = ExchangeRateClient::new(&ExchangeRateConfig::new(&base_url), UreqTransport::default());

    assert_eq!(
        client.quote(&CurrencyCode::USD, &[CurrencyCode::JPY]).unwrap(),
        "1 USD = 117.89 JPY"
    );

    // Served as the literal 6.578600.
    let rate = client.get_rate(&CurrencyCode::USD, &CurrencyCode::CNY).unwrap();
    assert_eq!(rate.to_string(), "6.5786");

    let text = client
        .quote(&CurrencyCode::USD, &[CurrencyCode::CNY, CurrencyCode::GBP, CurrencyCode::EUR])
        .unwrap();
    let entries: Vec<&str> = text.strip_prefix("1 USD = ").unwrap().split(", ").collect();
    assert_eq!(entries.len(), 3);
    for expected in ["6.5786 CNY", "0.70365 GBP", "0.92013 EUR"] {
        assert!(entries.contains(&expected), "{text}");
    }

    let all = client.get_rates(&CurrencyCode::EUR, &[]).unwrap();
    assert_eq!(all.len(), 6);
    assert_eq!(all.date.as_deref(), Some("2017-01-20"));
}

#[test]
fn exchange_rate_failures_are_typed() {
    let base_url = start_mock_server();
    let client = ExchangeRateClient::new(&ExchangeRateConfig::new(&base_url), UreqTransport::default());

    let err = client.get_rates(&CurrencyCode::new("USS"), &[]).unwrap_err();
    match err {
        Error::RemoteCall { subject, cause, .. } => {
            assert_eq!(subject.as_deref(), Some("USS"));
            assert_eq!(cause, ApiError::ServiceError("Invalid base".into()));
        }
        other => panic!("expected RemoteCall, got {other:?}"),
    }

    let err = client
        .get_rates(&CurrencyCode::USD, &[CurrencyCode::new("FAKE")])
        .unwrap_err();
    assert_eq!(err.cause(), Some(&ApiError::UnknownCurrency("FAKE".into())));
}

#[test]
fn unresponsive_server_times_out() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    std::thread::spawn(move || {
        // Accept and hold connections without ever answering.
        let mut held = Vec::new();
        for stream in listener.incoming().flatten() {
            held.push(stream);
        }
    });

    let transport = UreqTransport::new(&TransportConfig { timeout_ms: 200 });
    let client = ExchangeRateClient::new(&ExchangeRateConfig::new(format!("http://{addr}")), transport);

    let started = std::time::Instant::now();
    let err = client.get_rates(&CurrencyCode::USD, &[]).unwrap_err();
    assert_eq!(err.cause(), Some(&ApiError::Transport(TransportError::Timeout)));
    assert!(started.elapsed() < Duration::from_secs(5));
}

#[test]
fn cancellation_stops_further_calls() {
    let base_url = start_mock_server();
    let transport = UreqTransport::default();
    let cancel = transport.cancel_flag();
    let client = connect_with(&base_url, transport);

    let notebook = client.create_notebook("Cancelled").unwrap();
    client.create_note("kept", "x", Some(notebook.guid.as_str())).unwrap();

    cancel.cancel();
    let err = client.delete_all_notes_in_notebook(&notebook.guid).unwrap_err();
    assert_eq!(err.cause(), Some(&ApiError::Transport(TransportError::Cancelled)));
}

fn connect_with(base_url: &str, transport: UreqTransport) -> NoteStoreClient<UreqTransport> {
    let config = NoteStoreConfig::new(mock_server::DEFAULT_TOKEN).with_base_url(base_url);
    NoteStoreClient::connect(&config, transport).unwrap()
}
