//! Test doubles shared by the unit tests.

use std::cell::RefCell;
use std::collections::VecDeque;

use crate::error::TransportError;
use crate::http::{HttpRequest, HttpResponse};
use crate::transport::Transport;

/// Replays queued responses in order and records every request it sees.
#[derive(Default)]
pub struct ScriptedTransport {
    responses: RefCell<VecDeque<Result<HttpResponse, TransportError>>>,
    requests: RefCell<Vec<HttpRequest>>,
}

impl ScriptedTransport {
    pub fn builder() -> ScriptedTransportBuilder {
        ScriptedTransportBuilder::default()
    }

    pub fn requests(&self) -> Vec<HttpRequest> {
        self.requests.borrow().clone()
    }

    pub fn paths(&self) -> Vec<String> {
        self.requests.borrow().iter().map(|r| r.path.clone()).collect()
    }
}

impl Transport for ScriptedTransport {
    fn execute(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        self.requests.borrow_mut().push(request);
        self.responses
            .borrow_mut()
            .pop_front()
            .unwrap_or_else(|| Err(TransportError::Io("no scripted response left".into())))
    }
}

#[derive(Default)]
pub struct ScriptedTransportBuilder {
    responses: VecDeque<Result<HttpResponse, TransportError>>,
}

impl ScriptedTransportBuilder {
    pub fn respond(mut self, status: u16, body: &str) -> Self {
        self.responses.push_back(Ok(HttpResponse::new(status, body)));
        self
    }

    pub fn fail(mut self, err: TransportError) -> Self {
        self.responses.push_back(Err(err));
        self
    }

    /// Queue the handshake answer expected by `NoteStoreClient::connect`.
    pub fn with_handshake(self) -> Self {
        self.respond(200, r#"{"id":7,"username":"tester"}"#)
    }

    pub fn build(self) -> ScriptedTransport {
        ScriptedTransport {
            responses: RefCell::new(self.responses),
            requests: RefCell::new(Vec::new()),
        }
    }
}
