//! # Mock Clients & Testing Guide
//!
//! `MockClient<T>` hands out a real [`ResourceClient<T>`] whose requests are
//! answered from a queue of expectations instead of a resource service. It
//! lets controller tests inject failures (`NotFound`, a 400 from the server,
//! a dead transport) that are awkward to produce against the loopback service.
//!
//! ## When to use which
//!
//! | Need | Tool |
//! |------|------|
//! | Canned answers, order does not matter | [`MockClient`] |
//! | Answer out of order, late, or never | [`create_mock_client`] + `expect_*` helpers |
//! | Real list/search/ordering behaviour | [`ResourceActor`](crate::ResourceActor) |
//!
//! ## Canned answers
//!
//! ```rust,ignore
//! let mut mock = MockClient::<Endpoint>::new();
//! mock.expect_retrieve(EndpointId(1)).return_err(ClientError::NotFound("1".into()));
//!
//! let mut form = FormController::new(schema, mock.client(), Some(EndpointId(1)));
//! assert!(form.load().await.is_err());
//! mock.verify();
//! ```
//!
//! Expectations are matched by operation and id, not by arrival order, so
//! concurrent fan-out (bulk delete, auxiliary loads) can be mocked without
//! caring which call reaches the channel first.
//!
//! ## Holding responders
//!
//! [`create_mock_client`] returns the client and the raw request receiver.
//! The `expect_*` helpers pull the next request off it and give the test the
//! payload plus its responder. Answering the second request before the first
//! is how the list tests simulate out-of-order completion; dropping the
//! responder simulates a service that never answers.

use crate::client::ResourceClient;
use crate::entity::{ResourceEntity, UsedByEntry};
use crate::error::ClientError;
use crate::message::{ResourceRequest, Response};
use crate::query::{ListQuery, Page};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use tokio::sync::mpsc;

// =============================================================================
// EXPECTATION BUILDER API
// =============================================================================

enum MockResponse<T: ResourceEntity> {
    Page(Result<Page<T>, ClientError>),
    Item(Result<T, ClientError>),
    Unit(Result<(), ClientError>),
    UsedBy(Result<Vec<UsedByEntry>, ClientError>),
}

struct Expectation<T: ResourceEntity> {
    op: &'static str,
    id: Option<T::Id>,
    response: MockResponse<T>,
}

struct MockState<T: ResourceEntity> {
    expectations: VecDeque<Expectation<T>>,
    received: Vec<&'static str>,
    unexpected: Vec<String>,
}

fn request_id<T: ResourceEntity>(request: &ResourceRequest<T>) -> Option<&T::Id> {
    match request {
        ResourceRequest::List { .. } | ResourceRequest::Create { .. } => None,
        ResourceRequest::Retrieve { id, .. }
        | ResourceRequest::Update { id, .. }
        | ResourceRequest::Delete { id, .. }
        | ResourceRequest::UsedBy { id, .. } => Some(id),
    }
}

/// A mock client with expectation tracking for fluent testing.
pub struct MockClient<T: ResourceEntity> {
    client: ResourceClient<T>,
    state: Arc<Mutex<MockState<T>>>,
    _handle: tokio::task::JoinHandle<()>,
}

impl<T: ResourceEntity> Default for MockClient<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: ResourceEntity> MockClient<T> {
    /// Creates a new mock client with no expectations.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn new() -> Self {
        let (sender, mut receiver) = mpsc::channel::<ResourceRequest<T>>(100);
        let state = Arc::new(Mutex::new(MockState {
            expectations: VecDeque::new(),
            received: Vec::new(),
            unexpected: Vec::new(),
        }));
        let task_state = state.clone();

        let handle = tokio::spawn(async move {
            while let Some(request) = receiver.recv().await {
                let mut state = task_state.lock().unwrap();
                state.received.push(request.name());
                let position = state.expectations.iter().position(|exp| {
                    exp.op == request.name()
                        && match (&exp.id, request_id(&request)) {
                            (Some(expected), Some(actual)) => expected == actual,
                            _ => true,
                        }
                });
                let Some(expectation) = position.and_then(|i| state.expectations.remove(i))
                else {
                    let detail = match request_id(&request) {
                        Some(id) => format!("{} {}", request.name(), id),
                        None => request.name().to_string(),
                    };
                    state.unexpected.push(detail);
                    // Dropping the responder surfaces as `ClientError::Dropped`.
                    continue;
                };
                drop(state);

                match (request, expectation.response) {
                    (ResourceRequest::List { respond_to, .. }, MockResponse::Page(response)) => {
                        let _ = respond_to.send(response);
                    }
                    (ResourceRequest::Retrieve { respond_to, .. }, MockResponse::Item(response))
                    | (ResourceRequest::Create { respond_to, .. }, MockResponse::Item(response))
                    | (ResourceRequest::Update { respond_to, .. }, MockResponse::Item(response)) => {
                        let _ = respond_to.send(response);
                    }
                    (ResourceRequest::Delete { respond_to, .. }, MockResponse::Unit(response)) => {
                        let _ = respond_to.send(response);
                    }
                    (ResourceRequest::UsedBy { respond_to, .. }, MockResponse::UsedBy(response)) => {
                        let _ = respond_to.send(response);
                    }
                    (request, _) => {
                        task_state
                            .lock()
                            .unwrap()
                            .unexpected
                            .push(format!("{} with mismatched response", request.name()));
                    }
                }
            }
        });

        Self {
            client: ResourceClient::new(sender),
            state,
            _handle: handle,
        }
    }

    /// Returns a client wired to this mock.
    pub fn client(&self) -> ResourceClient<T> {
        self.client.clone()
    }

    fn builder<R>(
        &mut self,
        op: &'static str,
        id: Option<T::Id>,
        wrap: fn(Result<R, ClientError>) -> MockResponse<T>,
    ) -> ExpectationBuilder<T, R> {
        ExpectationBuilder {
            op,
            id,
            wrap,
            state: self.state.clone(),
        }
    }

    /// Expects a `list` operation.
    pub fn expect_list(&mut self) -> ExpectationBuilder<T, Page<T>> {
        self.builder("list", None, MockResponse::Page)
    }

    /// Expects a `retrieve` of `id`.
    pub fn expect_retrieve(&mut self, id: T::Id) -> ExpectationBuilder<T, T> {
        self.builder("retrieve", Some(id), MockResponse::Item)
    }

    /// Expects a `create` operation.
    pub fn expect_create(&mut self) -> ExpectationBuilder<T, T> {
        self.builder("create", None, MockResponse::Item)
    }

    /// Expects an `update` of `id`.
    pub fn expect_update(&mut self, id: T::Id) -> ExpectationBuilder<T, T> {
        self.builder("update", Some(id), MockResponse::Item)
    }

    /// Expects a `delete` of `id`.
    pub fn expect_delete(&mut self, id: T::Id) -> ExpectationBuilder<T, ()> {
        self.builder("delete", Some(id), MockResponse::Unit)
    }

    /// Expects a `used_by` lookup for `id`.
    pub fn expect_used_by(&mut self, id: T::Id) -> ExpectationBuilder<T, Vec<UsedByEntry>> {
        self.builder("used_by", Some(id), MockResponse::UsedBy)
    }

    /// Number of requests received so far, expected or not.
    pub fn request_count(&self) -> usize {
        self.state.lock().unwrap().received.len()
    }

    /// Operation names of every request received so far, in arrival order.
    pub fn requests(&self) -> Vec<&'static str> {
        self.state.lock().unwrap().received.clone()
    }

    /// Panics unless every expectation was consumed and nothing unexpected arrived.
    pub fn verify(&self) {
        let state = self.state.lock().unwrap();
        if !state.unexpected.is_empty() {
            panic!("Unexpected requests: {:?}", state.unexpected);
        }
        if !state.expectations.is_empty() {
            let remaining: Vec<_> = state.expectations.iter().map(|e| e.op).collect();
            panic!("Not all expectations were met. Remaining: {remaining:?}");
        }
    }
}

/// Builder returned by the `MockClient::expect_*` methods.
pub struct ExpectationBuilder<T: ResourceEntity, R> {
    op: &'static str,
    id: Option<T::Id>,
    wrap: fn(Result<R, ClientError>) -> MockResponse<T>,
    state: Arc<Mutex<MockState<T>>>,
}

impl<T: ResourceEntity, R> ExpectationBuilder<T, R> {
    /// Sets the expectation to return a successful result.
    pub fn return_ok(self, value: R) {
        self.push(Ok(value));
    }

    /// Sets the expectation to return an error.
    pub fn return_err(self, error: ClientError) {
        self.push(Err(error));
    }

    fn push(self, response: Result<R, ClientError>) {
        let expectation = Expectation {
            op: self.op,
            id: self.id,
            response: (self.wrap)(response),
        };
        self.state.lock().unwrap().expectations.push_back(expectation);
    }
}

// =============================================================================
// RAW REQUEST HELPERS
// =============================================================================

/// Creates a client and the receiver its requests arrive on.
///
/// Nothing answers the requests until the test does, which makes this the tool
/// for ordering and cancellation tests.
pub fn create_mock_client<T: ResourceEntity>(
    buffer_size: usize,
) -> (ResourceClient<T>, mpsc::Receiver<ResourceRequest<T>>) {
    let (sender, receiver) = mpsc::channel(buffer_size);
    (ResourceClient::new(sender), receiver)
}

/// Next request, if it is a `list`.
pub async fn expect_list<T: ResourceEntity>(
    receiver: &mut mpsc::Receiver<ResourceRequest<T>>,
) -> Option<(ListQuery, Response<Page<T>>)> {
    match receiver.recv().await {
        Some(ResourceRequest::List { query, respond_to }) => Some((query, respond_to)),
        _ => None,
    }
}

/// Next request, if it is a `retrieve`.
pub async fn expect_retrieve<T: ResourceEntity>(
    receiver: &mut mpsc::Receiver<ResourceRequest<T>>,
) -> Option<(T::Id, Response<T>)> {
    match receiver.recv().await {
        Some(ResourceRequest::Retrieve { id, respond_to }) => Some((id, respond_to)),
        _ => None,
    }
}

/// Next request, if it is a `create`.
pub async fn expect_create<T: ResourceEntity>(
    receiver: &mut mpsc::Receiver<ResourceRequest<T>>,
) -> Option<(T::Payload, Response<T>)> {
    match receiver.recv().await {
        Some(ResourceRequest::Create {
            payload,
            respond_to,
        }) => Some((payload, respond_to)),
        _ => None,
    }
}

/// Next request, if it is an `update`.
pub async fn expect_update<T: ResourceEntity>(
    receiver: &mut mpsc::Receiver<ResourceRequest<T>>,
) -> Option<(T::Id, T::Payload, Response<T>)> {
    match receiver.recv().await {
        Some(ResourceRequest::Update {
            id,
            payload,
            respond_to,
        }) => Some((id, payload, respond_to)),
        _ => None,
    }
}

/// Next request, if it is a `delete`.
pub async fn expect_delete<T: ResourceEntity>(
    receiver: &mut mpsc::Receiver<ResourceRequest<T>>,
) -> Option<(T::Id, Response<()>)> {
    match receiver.recv().await {
        Some(ResourceRequest::Delete { id, respond_to }) => Some((id, respond_to)),
        _ => None,
    }
}

/// Next request, if it is a `used_by` lookup.
pub async fn expect_used_by<T: ResourceEntity>(
    receiver: &mut mpsc::Receiver<ResourceRequest<T>>,
) -> Option<(T::Id, Response<Vec<UsedByEntry>>)> {
    match receiver.recv().await {
        Some(ResourceRequest::UsedBy { id, respond_to }) => Some((id, respond_to)),
        _ => None,
    }
}
