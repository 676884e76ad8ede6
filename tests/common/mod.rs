//! Canned-response `Fetcher` shared by the integration tests.

#![allow(dead_code)]

use std::collections::HashMap;
use std::future::{ready, Future};
use std::sync::Mutex;

use mulligan_tool::{DeckError, FetchRequest, FetchResponse, Fetcher, Result};

/// Answers requests by exact URL and records everything it was asked.
#[derive(Default)]
pub struct StubFetcher {
    routes: HashMap<String, FetchResponse>,
    requests: Mutex<Vec<FetchRequest>>,
}

impl StubFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn route(mut self, url: &str, status: u16, body: impl Into<String>) -> Self {
        self.routes.insert(url.to_string(), FetchResponse::new(status, body));
        self
    }

    pub fn route_response(mut self, url: &str, response: FetchResponse) -> Self {
        self.routes.insert(url.to_string(), response);
        self
    }

    pub fn requests(&self) -> Vec<FetchRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn last_request(&self) -> FetchRequest {
        self.requests().last().cloned().expect("no request recorded")
    }
}

impl Fetcher for StubFetcher {
    fn fetch(&self, request: &FetchRequest) -> impl Future<Output = Result<FetchResponse>> + Send {
        self.requests.lock().unwrap().push(request.clone());
        let response = self
            .routes
            .get(&request.url)
            .cloned()
            .ok_or_else(|| DeckError::Transport(format!("no route for {}", request.url)));
        ready(response)
    }
}
