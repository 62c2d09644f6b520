//! # Mock Framework
//!
//! Utilities for testing clients in isolation.
//!
//! Use [`MockClient`] to queue canned responses, or [`create_mock_client`] to get a
//! client and the raw receiver, then use helpers like [`expect_get`] or
//! [`expect_action`] to assert behavior.
//!
//! ```rust,ignore
//! let mut products = MockClient::<Product>::new();
//! products.expect_get(ProductId(1)).return_ok(Some(burger));
//!
//! let (order_actor, order_client) = order_actor::new(32);
//! tokio::spawn(order_actor.run(ProductClient::new(products.client())));
//! ```

use crate::framework::{ActorEntity, FrameworkError, ResourceClient, ResourceRequest};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use tokio::sync::{mpsc, oneshot};

// =============================================================================
// EXPECTATION BUILDER API
// =============================================================================

/// Represents an expected request to the mock client.
#[allow(dead_code)] // ids are kept for diagnostics only
enum Expectation<T: ActorEntity> {
    Get {
        id: T::Id,
        response: Result<Option<T>, FrameworkError>,
    },
    GetMany {
        response: Result<Vec<T>, FrameworkError>,
    },
    List {
        response: Result<Vec<T>, FrameworkError>,
    },
    Create {
        response: Result<T::Id, FrameworkError>,
    },
    Update {
        id: T::Id,
        response: Result<T, FrameworkError>,
    },
    Upsert {
        response: Result<T, FrameworkError>,
    },
    Action {
        id: T::Id,
        response: Result<T::ActionResult, FrameworkError>,
    },
}

type Queue<T> = Arc<Mutex<VecDeque<Expectation<T>>>>;

fn push<T: ActorEntity>(queue: &Queue<T>, expectation: Expectation<T>) {
    queue
        .lock()
        .expect("mock expectation queue poisoned")
        .push_back(expectation);
}

/// A mock client with expectation tracking for fluent testing.
///
/// Requests are answered strictly in the order expectations were queued; a
/// request that does not match the next expectation panics the mock task.
pub struct MockClient<T: ActorEntity> {
    client: ResourceClient<T>,
    expectations: Queue<T>,
    _handle: tokio::task::JoinHandle<()>,
}

impl<T: ActorEntity> MockClient<T> {
    /// Creates a new mock client with no expectations.
    pub fn new() -> Self {
        let (sender, mut receiver) = mpsc::channel::<ResourceRequest<T>>(100);
        let expectations: Queue<T> = Arc::new(Mutex::new(VecDeque::new()));
        let expectations_clone = expectations.clone();

        let handle = tokio::spawn(async move {
            while let Some(request) = receiver.recv().await {
                let expectation = expectations_clone
                    .lock()
                    .expect("mock expectation queue poisoned")
                    .pop_front();

                match (request, expectation) {
                    (ResourceRequest::Get { respond_to, .. }, Some(Expectation::Get { response, .. })) => {
                        let _ = respond_to.send(response);
                    }
                    (ResourceRequest::GetMany { respond_to, .. }, Some(Expectation::GetMany { response })) => {
                        let _ = respond_to.send(response);
                    }
                    (ResourceRequest::List { respond_to }, Some(Expectation::List { response })) => {
                        let _ = respond_to.send(response);
                    }
                    (ResourceRequest::Create { respond_to, .. }, Some(Expectation::Create { response })) => {
                        let _ = respond_to.send(response);
                    }
                    (ResourceRequest::Update { respond_to, .. }, Some(Expectation::Update { response, .. })) => {
                        let _ = respond_to.send(response);
                    }
                    (ResourceRequest::Upsert { respond_to, .. }, Some(Expectation::Upsert { response })) => {
                        let _ = respond_to.send(response);
                    }
                    (ResourceRequest::Action { respond_to, .. }, Some(Expectation::Action { response, .. })) => {
                        let _ = respond_to.send(response);
                    }
                    _ => {
                        panic!("Unexpected request or expectation mismatch");
                    }
                }
            }
        });

        Self {
            client: ResourceClient::new(sender),
            expectations,
            _handle: handle,
        }
    }

    /// Returns the client for use in tests.
    pub fn client(&self) -> ResourceClient<T> {
        self.client.clone()
    }

    /// Expects a `get` operation.
    pub fn expect_get(&mut self, id: T::Id) -> Expect<T, Option<T>> {
        Expect::new(&self.expectations, move |response| Expectation::Get { id, response })
    }

    /// Expects a `get_many` operation.
    pub fn expect_get_many(&mut self) -> Expect<T, Vec<T>> {
        Expect::new(&self.expectations, |response| Expectation::GetMany { response })
    }

    /// Expects a `list` operation.
    pub fn expect_list(&mut self) -> Expect<T, Vec<T>> {
        Expect::new(&self.expectations, |response| Expectation::List { response })
    }

    /// Expects a `create` operation.
    pub fn expect_create(&mut self) -> Expect<T, T::Id> {
        Expect::new(&self.expectations, |response| Expectation::Create { response })
    }

    /// Expects an `update` operation.
    pub fn expect_update(&mut self, id: T::Id) -> Expect<T, T> {
        Expect::new(&self.expectations, move |response| Expectation::Update { id, response })
    }

    /// Expects an `upsert` operation.
    pub fn expect_upsert(&mut self) -> Expect<T, T> {
        Expect::new(&self.expectations, |response| Expectation::Upsert { response })
    }

    /// Expects an `action` operation.
    pub fn expect_action(&mut self, id: T::Id) -> Expect<T, T::ActionResult> {
        Expect::new(&self.expectations, move |response| Expectation::Action { id, response })
    }

    /// Verifies that all expectations were met.
    pub fn verify(&self) {
        let remaining = self
            .expectations
            .lock()
            .expect("mock expectation queue poisoned")
            .len();
        if remaining != 0 {
            panic!("Not all expectations were met. {} remaining", remaining);
        }
    }
}

impl<T: ActorEntity> Default for MockClient<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for a single queued expectation.
pub struct Expect<T: ActorEntity, R> {
    expectations: Queue<T>,
    build: Box<dyn FnOnce(Result<R, FrameworkError>) -> Expectation<T> + Send>,
}

impl<T: ActorEntity, R> Expect<T, R> {
    fn new(
        expectations: &Queue<T>,
        build: impl FnOnce(Result<R, FrameworkError>) -> Expectation<T> + Send + 'static,
    ) -> Self {
        Self {
            expectations: expectations.clone(),
            build: Box::new(build),
        }
    }

    /// Sets the expectation to return a successful result.
    pub fn return_ok(self, value: R) {
        push(&self.expectations, (self.build)(Ok(value)));
    }

    /// Sets the expectation to return an error.
    pub fn return_err(self, error: FrameworkError) {
        push(&self.expectations, (self.build)(Err(error)));
    }
}

// =============================================================================
// CHANNEL-LEVEL HELPERS
// =============================================================================

/// Creates a mock client and a receiver for asserting requests.
///
/// The test drives the receiving side itself, so it can inspect every payload
/// before answering.
pub fn create_mock_client<T: ActorEntity>(
    buffer_size: usize,
) -> (ResourceClient<T>, mpsc::Receiver<ResourceRequest<T>>) {
    let (sender, receiver) = mpsc::channel(buffer_size);
    (ResourceClient::new(sender), receiver)
}

/// Helper to verify that the next message is a Create request
pub async fn expect_create<T: ActorEntity>(
    receiver: &mut mpsc::Receiver<ResourceRequest<T>>,
) -> Option<(T::Create, oneshot::Sender<Result<T::Id, FrameworkError>>)> {
    match receiver.recv().await {
        Some(ResourceRequest::Create { params, respond_to }) => Some((params, respond_to)),
        _ => None,
    }
}

/// Helper to verify that the next message is a Get request
pub async fn expect_get<T: ActorEntity>(
    receiver: &mut mpsc::Receiver<ResourceRequest<T>>,
) -> Option<(T::Id, oneshot::Sender<Result<Option<T>, FrameworkError>>)> {
    match receiver.recv().await {
        Some(ResourceRequest::Get { id, respond_to }) => Some((id, respond_to)),
        _ => None,
    }
}

/// Helper to verify that the next message is a GetMany request
pub async fn expect_get_many<T: ActorEntity>(
    receiver: &mut mpsc::Receiver<ResourceRequest<T>>,
) -> Option<(Vec<T::Id>, oneshot::Sender<Result<Vec<T>, FrameworkError>>)> {
    match receiver.recv().await {
        Some(ResourceRequest::GetMany { ids, respond_to }) => Some((ids, respond_to)),
        _ => None,
    }
}

/// Helper to verify that the next message is an Upsert request
pub async fn expect_upsert<T: ActorEntity>(
    receiver: &mut mpsc::Receiver<ResourceRequest<T>>,
) -> Option<(T::Create, oneshot::Sender<Result<T, FrameworkError>>)> {
    match receiver.recv().await {
        Some(ResourceRequest::Upsert { params, respond_to }) => Some((params, respond_to)),
        _ => None,
    }
}

/// Helper to verify that the next message is an Action request
pub async fn expect_action<T: ActorEntity>(
    receiver: &mut mpsc::Receiver<ResourceRequest<T>>,
) -> Option<(
    T::Id,
    T::Action,
    oneshot::Sender<Result<T::ActionResult, FrameworkError>>,
)> {
    match receiver.recv().await {
        Some(ResourceRequest::Action {
            id,
            action,
            respond_to,
        }) => Some((id, action, respond_to)),
        _ => None,
    }
}
