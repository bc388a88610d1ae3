//! In-process transport for unit tests

use crate::error::{Error, Result};
use crate::http::{SharedTransport, Transport};
use async_trait::async_trait;
use serde_json::Value;
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Scripted response for one request
#[derive(Debug, Clone)]
pub(crate) enum Reply {
    Body(Value),
    Empty,
    Status(u16),
}

/// Transport that answers from per-path scripts and records every request.
///
/// The last reply of a script is repeated once the queue runs dry.
#[derive(Default)]
pub(crate) struct MockTransport {
    routes: Mutex<HashMap<String, VecDeque<Reply>>>,
    calls: Mutex<Vec<(String, Option<Value>)>>,
    delay: Duration,
}

impl MockTransport {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Hold every response for `delay` before answering
    pub(crate) fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub(crate) fn reply(self, path: &str, reply: Reply) -> Self {
        self.routes
            .lock()
            .unwrap()
            .entry(path.to_string())
            .or_default()
            .push_back(reply);
        self
    }

    pub(crate) fn body(self, path: &str, body: Value) -> Self {
        self.reply(path, Reply::Body(body))
    }

    pub(crate) fn shared(self) -> Arc<Self> {
        Arc::new(self)
    }

    /// Every requested path, in order
    pub(crate) fn paths(&self) -> Vec<String> {
        self.calls.lock().unwrap().iter().map(|(p, _)| p.clone()).collect()
    }

    /// Bodies of POST requests, in order
    pub(crate) fn posted(&self) -> Vec<Value> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter_map(|(_, body)| body.clone())
            .collect()
    }

    pub(crate) fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    async fn answer(&self, path: &str, body: Option<Value>) -> Result<Option<Value>> {
        self.calls.lock().unwrap().push((path.to_string(), body));
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }

        let reply = {
            let mut routes = self.routes.lock().unwrap();
            match routes.get_mut(path) {
                Some(queue) if queue.len() > 1 => queue.pop_front(),
                Some(queue) => queue.front().cloned(),
                None => None,
            }
        };

        match reply {
            Some(Reply::Body(value)) => Ok(Some(value)),
            Some(Reply::Empty) => Ok(None),
            Some(Reply::Status(status)) => Err(Error::http_status(status, "")),
            None => Err(Error::http_status(404, format!("no route for {path}"))),
        }
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn get(&self, path: &str) -> Result<Option<Value>> {
        self.answer(path, None).await
    }

    async fn post(&self, path: &str, body: Value) -> Result<Option<Value>> {
        self.answer(path, Some(body)).await
    }
}

/// Coerce a mock into the handle builders expect
pub(crate) fn as_shared(mock: &Arc<MockTransport>) -> SharedTransport {
    Arc::clone(mock) as SharedTransport
}
