//! Scripted in-memory gateway for unit tests
//!
//! Replies are registered per (method, endpoint, page). Several replies for
//! the same route are served in order and the last one sticks, which lets a
//! test model state changes such as "user absent, then present". Unscripted
//! paginated reads answer with an empty page, everything else with 404.

use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::Value;

use super::{Gateway, GatewayError, GatewayResponse, GatewayResult, Method};

/// A call observed by the gateway
#[derive(Debug, Clone, PartialEq)]
pub struct Call {
    pub method: Method,
    pub endpoint: String,
    pub query: Vec<(String, String)>,
    pub body: Option<Value>,
}

impl Call {
    pub fn page(&self) -> Option<u32> {
        self.query
            .iter()
            .find(|(k, _)| k == "page")
            .and_then(|(_, v)| v.parse().ok())
    }

    pub fn is(&self, method: Method, endpoint: &str) -> bool {
        self.method == method && self.endpoint == endpoint
    }
}

type Route = (Method, String, Option<u32>);

#[derive(Default)]
pub struct RecordingGateway {
    routes: Mutex<HashMap<Route, VecDeque<GatewayResponse>>>,
    calls: Mutex<Vec<Call>>,
}

impl RecordingGateway {
    pub fn new() -> Self {
        Self::default()
    }

    /// Script a reply for a non-paginated route
    pub fn on(self, method: Method, endpoint: &str, status: u16, body: Value) -> Self {
        self.push((method, endpoint.to_string(), None), status, body);
        self
    }

    /// Script a reply for one page of a paginated GET
    pub fn on_page(self, endpoint: &str, page: u32, status: u16, body: Value) -> Self {
        self.push((Method::Get, endpoint.to_string(), Some(page)), status, body);
        self
    }

    /// Script a single-page collection (page 1 holds everything)
    pub fn on_list(self, endpoint: &str, items: Value) -> Self {
        self.on_page(endpoint, 1, 200, items)
    }

    fn push(&self, route: Route, status: u16, body: Value) {
        self.routes
            .lock()
            .unwrap()
            .entry(route)
            .or_default()
            .push_back(GatewayResponse::new(status, body));
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    /// Calls that mutate remote state
    pub fn mutations(&self) -> Vec<Call> {
        self.calls()
            .into_iter()
            .filter(|c| c.method != Method::Get)
            .collect()
    }

    pub fn count(&self, method: Method, endpoint: &str) -> usize {
        self.calls().iter().filter(|c| c.is(method, endpoint)).count()
    }

    fn reply(
        &self,
        method: Method,
        endpoint: &str,
        query: &[(&str, String)],
        body: Option<&Value>,
    ) -> GatewayResult<GatewayResponse> {
        let call = Call {
            method,
            endpoint: endpoint.to_string(),
            query: query.iter().map(|(k, v)| (k.to_string(), v.clone())).collect(),
            body: body.cloned(),
        };
        let page = call.page();
        self.calls.lock().unwrap().push(call);

        let mut routes = self.routes.lock().unwrap();
        let response = match routes.get_mut(&(method, endpoint.to_string(), page)) {
            Some(queue) if queue.len() > 1 => queue.pop_front(),
            Some(queue) => queue.front().cloned(),
            None => None,
        };

        Ok(response.unwrap_or_else(|| match page {
            Some(_) => GatewayResponse::new(200, Value::Array(Vec::new())),
            None => GatewayResponse::new(404, Value::Null),
        }))
    }
}

#[async_trait]
impl Gateway for RecordingGateway {
    async fn get(&self, endpoint: &str, query: &[(&str, String)]) -> GatewayResult<GatewayResponse> {
        self.reply(Method::Get, endpoint, query, None)
    }

    async fn post(&self, endpoint: &str, body: &Value) -> GatewayResult<GatewayResponse> {
        self.reply(Method::Post, endpoint, &[], Some(body))
    }

    async fn patch(&self, endpoint: &str, body: &Value) -> GatewayResult<GatewayResponse> {
        self.reply(Method::Patch, endpoint, &[], Some(body))
    }

    async fn put(&self, endpoint: &str) -> GatewayResult<GatewayResponse> {
        self.reply(Method::Put, endpoint, &[], None)
    }

    async fn delete(&self, endpoint: &str) -> GatewayResult<GatewayResponse> {
        self.reply(Method::Delete, endpoint, &[], None)
    }
}

/// Convenience for asserting on gateway errors in tests
pub fn is_unexpected_status(err: &GatewayError, expected: u16) -> bool {
    matches!(err, GatewayError::UnexpectedStatus { status, .. } if *status == expected)
}
