//! Scripted [`Transport`] used by the unit tests.

use crate::api::Transport;
use crate::error::ClientError;
use serde_json::Value;
use std::cell::RefCell;
use std::collections::VecDeque;

/// Answers requests from a queue of scripted replies and records every call.
///
/// Panics when a request arrives for a different path than the next scripted
/// reply, or when the script has run out.
#[derive(Default)]
pub struct FakeTransport {
    script: RefCell<VecDeque<(String, Result<Value, ClientError>)>>,
    calls: RefCell<Vec<(String, Value)>>,
}

impl FakeTransport {
    pub fn new() -> Self {
        FakeTransport::default()
    }

    pub fn reply(self, path: &str, body: Value) -> Self {
        self.script
            .borrow_mut()
            .push_back((path.to_string(), Ok(body)));
        self
    }

    pub fn fail(self, path: &str, error: ClientError) -> Self {
        self.script
            .borrow_mut()
            .push_back((path.to_string(), Err(error)));
        self
    }

    pub fn calls(&self) -> Vec<(String, Value)> {
        self.calls.borrow().clone()
    }

    pub fn paths(&self) -> Vec<String> {
        self.calls.borrow().iter().map(|(p, _)| p.clone()).collect()
    }
}

impl Transport for FakeTransport {
    async fn post(&self, path: &str, body: Value) -> Result<Value, ClientError> {
        self.calls.borrow_mut().push((path.to_string(), body));
        let (expected, reply) = self
            .script
            .borrow_mut()
            .pop_front()
            .unwrap_or_else(|| panic!("unexpected request to {}", path));
        assert_eq!(expected, path, "request went to the wrong endpoint");
        reply
    }
}
