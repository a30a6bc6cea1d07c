//! Scripted contract gateway for deterministic testing.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use archive_gateway::mock::MockGateway;
//! use serde_json::json;
//!
//! let gateway = MockGateway::new()
//!     .with_response("count_images", json!(3))
//!     .with_latency_ms(50);
//!
//! // One-shot outcomes are consumed before the method's default. The
//! // outcome is chosen when the call arrives, before any latency.
//! gateway.push_error("count_images", Error::Remote("boom".into()));
//! ```

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::Value as JsonValue;

use archive_core::{ContractGateway, Error, Result};

/// Which gateway entry point a call went through.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MockCallKind {
    Query,
    Mutate,
}

/// One recorded gateway call.
#[derive(Debug, Clone)]
pub struct MockCall {
    pub kind: MockCallKind,
    pub method: String,
    pub args: Vec<String>,
    pub timestamp: std::time::Instant,
}

#[derive(Default)]
struct MockState {
    defaults: HashMap<String, Result<JsonValue>>,
    scripted: HashMap<String, VecDeque<Result<JsonValue>>>,
}

/// Mock gateway with per-method responses and a call log.
#[derive(Clone, Default)]
pub struct MockGateway {
    state: Arc<Mutex<MockState>>,
    call_log: Arc<Mutex<Vec<MockCall>>>,
    latency_ms: u64,
}

impl MockGateway {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the default response for a method.
    pub fn with_response(self, method: impl Into<String>, value: JsonValue) -> Self {
        self.set_response(method, value);
        self
    }

    /// Make a method fail by default.
    pub fn with_error(self, method: impl Into<String>, error: Error) -> Self {
        self.state
            .lock()
            .unwrap()
            .defaults
            .insert(method.into(), Err(error));
        self
    }

    /// Set simulated latency for every call.
    pub fn with_latency_ms(mut self, latency_ms: u64) -> Self {
        self.latency_ms = latency_ms;
        self
    }

    /// Replace the default response for a method.
    pub fn set_response(&self, method: impl Into<String>, value: JsonValue) {
        self.state
            .lock()
            .unwrap()
            .defaults
            .insert(method.into(), Ok(value));
    }

    /// Queue a one-shot response, consumed before the default.
    pub fn push_response(&self, method: impl Into<String>, value: JsonValue) {
        self.push(method.into(), Ok(value));
    }

    /// Queue a one-shot failure, consumed before the default.
    pub fn push_error(&self, method: impl Into<String>, error: Error) {
        self.push(method.into(), Err(error));
    }

    fn push(&self, method: String, outcome: Result<JsonValue>) {
        self.state
            .lock()
            .unwrap()
            .scripted
            .entry(method)
            .or_default()
            .push_back(outcome);
    }

    /// Get all logged calls for assertion.
    pub fn calls(&self) -> Vec<MockCall> {
        self.call_log.lock().unwrap().clone()
    }

    /// Clear the call log.
    pub fn clear_calls(&self) {
        self.call_log.lock().unwrap().clear()
    }

    /// Number of calls made to `method`, through either entry point.
    pub fn call_count(&self, method: &str) -> usize {
        self.call_log
            .lock()
            .unwrap()
            .iter()
            .filter(|c| c.method == method)
            .count()
    }

    /// Total number of calls.
    pub fn total_calls(&self) -> usize {
        self.call_log.lock().unwrap().len()
    }

    fn log_call(&self, kind: MockCallKind, method: &str, args: &[String]) {
        self.call_log.lock().unwrap().push(MockCall {
            kind,
            method: method.to_string(),
            args: args.to_vec(),
            timestamp: std::time::Instant::now(),
        });
    }

    fn next_outcome(&self, method: &str) -> Result<JsonValue> {
        let mut state = self.state.lock().unwrap();
        if let Some(outcome) = state.scripted.get_mut(method).and_then(VecDeque::pop_front) {
            return outcome;
        }
        state
            .defaults
            .get(method)
            .cloned()
            .unwrap_or_else(|| Err(Error::Remote(format!("no mock response for {}", method))))
    }

    async fn respond(&self, kind: MockCallKind, method: &str, args: &[String]) -> Result<JsonValue> {
        self.log_call(kind, method, args);
        let outcome = self.next_outcome(method);
        if self.latency_ms > 0 {
            tokio::time::sleep(std::time::Duration::from_millis(self.latency_ms)).await;
        }
        outcome
    }
}

#[async_trait]
impl ContractGateway for MockGateway {
    async fn query(&self, method: &str, args: &[String]) -> Result<JsonValue> {
        self.respond(MockCallKind::Query, method, args).await
    }

    async fn mutate(&self, method: &str, args: &[String]) -> Result<JsonValue> {
        self.respond(MockCallKind::Mutate, method, args).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_default_response() {
        let gw = MockGateway::new().with_response("count_images", json!(3));
        assert_eq!(gw.query("count_images", &[]).await.unwrap(), json!(3));
        assert_eq!(gw.query("count_images", &[]).await.unwrap(), json!(3));
        assert_eq!(gw.call_count("count_images"), 2);
    }

    #[tokio::test]
    async fn test_scripted_outcomes_come_first() {
        let gw = MockGateway::new().with_response("count_images", json!(3));
        gw.push_error("count_images", Error::Remote("boom".into()));
        gw.push_response("count_images", json!(1));

        assert!(gw.query("count_images", &[]).await.is_err());
        assert_eq!(gw.query("count_images", &[]).await.unwrap(), json!(1));
        assert_eq!(gw.query("count_images", &[]).await.unwrap(), json!(3));
    }

    #[tokio::test]
    async fn test_unknown_method_fails() {
        let gw = MockGateway::new();
        let err = gw.query("list_recent", &["50".into()]).await.unwrap_err();
        assert!(matches!(err, Error::Remote(_)));
    }

    #[tokio::test]
    async fn test_call_log_records_kind_and_args() {
        let gw = MockGateway::new().with_response("add_image_and_rate", json!("0x1"));
        gw.mutate("add_image_and_rate", &["a".into(), "b".into()])
            .await
            .unwrap();

        let calls = gw.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].kind, MockCallKind::Mutate);
        assert_eq!(calls[0].args, vec!["a".to_string(), "b".to_string()]);

        gw.clear_calls();
        assert_eq!(gw.total_calls(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_latency_is_simulated() {
        let gw = MockGateway::new()
            .with_response("count_images", json!(0))
            .with_latency_ms(200);
        let started = tokio::time::Instant::now();
        gw.query("count_images", &[]).await.unwrap();
        assert!(started.elapsed() >= std::time::Duration::from_millis(200));
    }
}
