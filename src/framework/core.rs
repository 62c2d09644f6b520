//! # Core Actor Framework
//!
//! This module defines the generic building blocks every resource of the
//! backend is built on.
//!
//! ## Key Types
//!
//! - [`ActorEntity`]: The trait that all resource types must implement.
//! - [`ResourceActor`]: The generic actor that owns a keyed store of entities.
//! - [`ResourceClient`]: The generic client for communicating with actors.
//! - [`FrameworkError`]: Common errors (e.g., ActorClosed, NotFound).

use async_trait::async_trait;
use std::collections::HashMap;
use std::fmt::{Debug, Display};
use std::hash::Hash;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, info, warn};

// =============================================================================
// 1. THE ABSTRACTION (Traits with Hooks, DTOs, and Actions)
// =============================================================================

/// Trait that any resource entity must implement to be managed by ResourceActor.
///
/// # Architecture Note
/// Products, restaurants, orders and cached places all satisfy this one
/// contract, so the message loop in [`ResourceActor`] is written once.
/// Associated types keep payloads apart: an `Order` only accepts an
/// `OrderCreate`, and the compiler rejects anything else.
///
/// # Keys
/// Most resources get a sequential id from the actor's generator. Resources
/// with a natural key (a cached place is identified by its address) return
/// it from [`ActorEntity::natural_key`]; such resources can be upserted.
///
/// # Async & Context
/// Hooks are `#[async_trait]` so they can call other actors. The `Context`
/// type is injected into every hook at `run()` time ("late binding").
#[async_trait]
pub trait ActorEntity: Clone + Send + Sync + 'static {
    /// The unique identifier for this entity.
    type Id: Eq + Hash + Ord + Clone + Send + Sync + Display + Debug;

    /// The data required to create a new instance.
    type Create: Send + Sync + Debug;

    /// The data required to update an existing instance.
    type Update: Send + Sync + Debug;

    /// Enum representing resource-specific operations (e.g., `SetAvailability`).
    type Action: Send + Sync + Debug;

    /// The result type returned by custom actions.
    type ActionResult: Send + Sync + Debug;

    /// The runtime context (dependencies) injected into the actor.
    /// Use `()` if no dependencies are needed.
    type Context: Send + Sync;

    /// Per-resource error type, boxed into [`FrameworkError::EntityError`]
    /// on its way back to the client.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Construct the full Entity from the ID and Payload.
    /// This is called synchronously before `on_create`.
    fn from_create_params(id: Self::Id, params: Self::Create) -> Result<Self, Self::Error>;

    /// Natural key carried by the creation payload, if the resource has one.
    fn natural_key(_params: &Self::Create) -> Option<Self::Id> {
        None
    }

    // --- Lifecycle Hooks (Async) ---

    /// Called immediately after the entity is created and initialized.
    async fn on_create(&mut self, _ctx: &Self::Context) -> Result<(), Self::Error> {
        Ok(())
    }

    /// Called when an update request is received.
    async fn on_update(
        &mut self,
        update: Self::Update,
        _ctx: &Self::Context,
    ) -> Result<(), Self::Error>;

    /// Called when an upsert hits an existing entity.
    ///
    /// The default keeps the stored entity untouched (get-or-create).
    async fn on_upsert(
        &mut self,
        _params: Self::Create,
        _ctx: &Self::Context,
    ) -> Result<(), Self::Error> {
        Ok(())
    }

    // --- Action Handler (Async) ---

    /// Handle a custom resource-specific action.
    async fn handle_action(
        &mut self,
        action: Self::Action,
        _ctx: &Self::Context,
    ) -> Result<Self::ActionResult, Self::Error>;
}

// =============================================================================
// 2. THE GENERIC MESSAGES & ERRORS
// =============================================================================

/// Errors that can occur within the actor framework itself.
#[derive(Debug, thiserror::Error)]
pub enum FrameworkError {
    #[error("Actor closed")]
    ActorClosed,
    #[error("Actor dropped response channel")]
    ActorDropped,
    #[error("Item not found: {0}")]
    NotFound(String),
    #[error("Item already exists: {0}")]
    AlreadyExists(String),
    #[error("Resource has no key for this request")]
    MissingKey,
    #[error("Entity error: {0}")]
    EntityError(Box<dyn std::error::Error + Send + Sync>),
}

/// Type alias for the one-shot response channel used by actors.
pub type Response<T> = oneshot::Sender<Result<T, FrameworkError>>;

/// Internal message type sent to the actor to request operations.
///
/// The variants are the CRUD lifecycle of a resource plus `Action` for
/// resource-specific logic. `GetMany` and `List` answer bulk reads in one
/// round trip; `Upsert` creates or refreshes an entity by its natural key.
#[derive(Debug)]
pub enum ResourceRequest<T: ActorEntity> {
    Create {
        params: T::Create,
        respond_to: Response<T::Id>,
    },
    Get {
        id: T::Id,
        respond_to: Response<Option<T>>,
    },
    GetMany {
        ids: Vec<T::Id>,
        respond_to: Response<Vec<T>>,
    },
    List {
        respond_to: Response<Vec<T>>,
    },
    Update {
        id: T::Id,
        update: T::Update,
        respond_to: Response<T>,
    },
    Upsert {
        params: T::Create,
        respond_to: Response<T>,
    },
    Action {
        id: T::Id,
        action: T::Action,
        respond_to: Response<T::ActionResult>,
    },
}

fn entity_error<E: std::error::Error + Send + Sync + 'static>(e: E) -> FrameworkError {
    FrameworkError::EntityError(Box::new(e))
}

impl FrameworkError {
    /// Recovers the concrete entity error boxed by the actor.
    ///
    /// Returns `Err(self)` for framework-level failures and for entity
    /// errors of a different type.
    pub fn into_entity_error<E: std::error::Error + 'static>(self) -> Result<E, Self> {
        match self {
            FrameworkError::EntityError(inner) => match inner.downcast::<E>() {
                Ok(e) => Ok(*e),
                Err(inner) => Err(FrameworkError::EntityError(inner)),
            },
            other => Err(other),
        }
    }
}

// =============================================================================
// 3. THE GENERIC ACTOR SERVER
// =============================================================================

/// Sequential id generator handed to [`ResourceActor::new`].
pub type IdGenerator<Id> = Box<dyn Fn() -> Id + Send + Sync>;

/// The generic actor that manages a collection of entities.
///
/// # Architecture Note
/// This struct is the "Server" half of the actor. It owns the state (`store`) and
/// the receiver end of the channel.
///
/// **Concurrency Model**:
/// Each actor processes its messages *sequentially* in a loop, so the store
/// needs no `Mutex`. This is also what makes `Upsert` atomic: the existence
/// check and the insert can never interleave with another request.
pub struct ResourceActor<T: ActorEntity> {
    receiver: mpsc::Receiver<ResourceRequest<T>>,
    store: HashMap<T::Id, T>,
    next_id_fn: Option<IdGenerator<T::Id>>,
}

impl<T: ActorEntity> ResourceActor<T> {
    /// Creates an actor whose entities get ids from `next_id_fn`.
    pub fn new(
        buffer_size: usize,
        next_id_fn: impl Fn() -> T::Id + Send + Sync + 'static,
    ) -> (Self, ResourceClient<T>) {
        Self::build(buffer_size, Some(Box::new(next_id_fn)))
    }

    /// Creates an actor for a resource identified only by its natural key.
    pub fn keyed(buffer_size: usize) -> (Self, ResourceClient<T>) {
        Self::build(buffer_size, None)
    }

    fn build(
        buffer_size: usize,
        next_id_fn: Option<IdGenerator<T::Id>>,
    ) -> (Self, ResourceClient<T>) {
        let (sender, receiver) = mpsc::channel(buffer_size);
        let actor = Self {
            receiver,
            store: HashMap::new(),
            next_id_fn,
        };
        let client = ResourceClient::new(sender);
        (actor, client)
    }

    fn key_for(&self, params: &T::Create) -> Option<T::Id> {
        T::natural_key(params).or_else(|| self.next_id_fn.as_ref().map(|next| next()))
    }

    /// Snapshot of the store ordered by id, so listings are deterministic.
    fn sorted(&self) -> Vec<T> {
        let mut ids: Vec<&T::Id> = self.store.keys().collect();
        ids.sort();
        ids.into_iter()
            .filter_map(|id| self.store.get(id).cloned())
            .collect()
    }

    /// Runs the actor's event loop, processing messages until the channel closes.
    ///
    /// # Context Injection
    /// The `context` argument is injected into every entity hook. This allows entities
    /// to access external dependencies (like other clients) that were created *after*
    /// the actor was instantiated but *before* the loop started.
    pub async fn run(mut self, context: T::Context) {
        // Extract just the type name (e.g., "Place" instead of "foodcart::model::place::Place")
        let entity_type = std::any::type_name::<T>()
            .split("::")
            .last()
            .unwrap_or("Unknown");
        info!(entity_type, "Actor started");

        while let Some(msg) = self.receiver.recv().await {
            match msg {
                ResourceRequest::Create { params, respond_to } => {
                    debug!(entity_type, ?params, "Create");
                    let Some(id) = self.key_for(&params) else {
                        warn!(entity_type, "Create without key");
                        let _ = respond_to.send(Err(FrameworkError::MissingKey));
                        continue;
                    };
                    if self.store.contains_key(&id) {
                        warn!(entity_type, %id, "Already exists");
                        let _ = respond_to.send(Err(FrameworkError::AlreadyExists(id.to_string())));
                        continue;
                    }

                    match T::from_create_params(id.clone(), params) {
                        Ok(mut item) => {
                            if let Err(e) = item.on_create(&context).await {
                                warn!(entity_type, error = %e, "on_create failed");
                                let _ = respond_to.send(Err(entity_error(e)));
                                continue;
                            }
                            self.store.insert(id.clone(), item);
                            info!(entity_type, %id, size = self.store.len(), "Created");
                            let _ = respond_to.send(Ok(id));
                        }
                        Err(e) => {
                            warn!(entity_type, error = %e, "Create failed");
                            let _ = respond_to.send(Err(entity_error(e)));
                        }
                    }
                }
                ResourceRequest::Get { id, respond_to } => {
                    let item = self.store.get(&id).cloned();
                    let found = item.is_some();
                    debug!(entity_type, %id, found, "Get");
                    let _ = respond_to.send(Ok(item));
                }
                ResourceRequest::GetMany { ids, respond_to } => {
                    let items: Vec<T> = ids
                        .iter()
                        .filter_map(|id| self.store.get(id).cloned())
                        .collect();
                    debug!(entity_type, requested = ids.len(), found = items.len(), "GetMany");
                    let _ = respond_to.send(Ok(items));
                }
                ResourceRequest::List { respond_to } => {
                    debug!(entity_type, size = self.store.len(), "List");
                    let _ = respond_to.send(Ok(self.sorted()));
                }
                ResourceRequest::Update {
                    id,
                    update,
                    respond_to,
                } => {
                    debug!(entity_type, %id, ?update, "Update");
                    if let Some(item) = self.store.get_mut(&id) {
                        if let Err(e) = item.on_update(update, &context).await {
                            warn!(entity_type, %id, error = %e, "Update failed");
                            let _ = respond_to.send(Err(entity_error(e)));
                            continue;
                        }
                        info!(entity_type, %id, "Updated");
                        let _ = respond_to.send(Ok(item.clone()));
                    } else {
                        warn!(entity_type, %id, "Not found");
                        let _ = respond_to.send(Err(FrameworkError::NotFound(id.to_string())));
                    }
                }
                ResourceRequest::Upsert { params, respond_to } => {
                    debug!(entity_type, ?params, "Upsert");
                    let Some(id) = T::natural_key(&params) else {
                        warn!(entity_type, "Upsert without natural key");
                        let _ = respond_to.send(Err(FrameworkError::MissingKey));
                        continue;
                    };

                    if let Some(item) = self.store.get_mut(&id) {
                        if let Err(e) = item.on_upsert(params, &context).await {
                            warn!(entity_type, %id, error = %e, "Upsert failed");
                            let _ = respond_to.send(Err(entity_error(e)));
                            continue;
                        }
                        info!(entity_type, %id, "Refreshed");
                        let _ = respond_to.send(Ok(item.clone()));
                        continue;
                    }

                    match T::from_create_params(id.clone(), params) {
                        Ok(mut item) => {
                            if let Err(e) = item.on_create(&context).await {
                                warn!(entity_type, error = %e, "on_create failed");
                                let _ = respond_to.send(Err(entity_error(e)));
                                continue;
                            }
                            self.store.insert(id.clone(), item.clone());
                            info!(entity_type, %id, size = self.store.len(), "Created");
                            let _ = respond_to.send(Ok(item));
                        }
                        Err(e) => {
                            warn!(entity_type, error = %e, "Upsert failed");
                            let _ = respond_to.send(Err(entity_error(e)));
                        }
                    }
                }
                ResourceRequest::Action {
                    id,
                    action,
                    respond_to,
                } => {
                    debug!(entity_type, %id, ?action, "Action");
                    if let Some(item) = self.store.get_mut(&id) {
                        let result = item
                            .handle_action(action, &context)
                            .await
                            .map_err(entity_error);
                        match &result {
                            Ok(_) => info!(entity_type, %id, "Action ok"),
                            Err(e) => warn!(entity_type, %id, error = %e, "Action failed"),
                        }
                        let _ = respond_to.send(result);
                    } else {
                        warn!(entity_type, %id, "Not found");
                        let _ = respond_to.send(Err(FrameworkError::NotFound(id.to_string())));
                    }
                }
            }
        }

        info!(entity_type, size = self.store.len(), "Shutdown");
    }
}

// =============================================================================
// 4. THE GENERIC CLIENT
// =============================================================================

/// A type-safe client for interacting with a `ResourceActor`.
///
/// Holds only a sender, so cloning is cheap.
#[derive(Clone)]
pub struct ResourceClient<T: ActorEntity> {
    sender: mpsc::Sender<ResourceRequest<T>>,
}

impl<T: ActorEntity> ResourceClient<T> {
    pub fn new(sender: mpsc::Sender<ResourceRequest<T>>) -> Self {
        Self { sender }
    }

    async fn request<R>(
        &self,
        build: impl FnOnce(Response<R>) -> ResourceRequest<T>,
    ) -> Result<R, FrameworkError> {
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(build(respond_to))
            .await
            .map_err(|_| FrameworkError::ActorClosed)?;
        response.await.map_err(|_| FrameworkError::ActorDropped)?
    }

    pub async fn create(&self, params: T::Create) -> Result<T::Id, FrameworkError> {
        self.request(|respond_to| ResourceRequest::Create { params, respond_to })
            .await
    }

    pub async fn get(&self, id: T::Id) -> Result<Option<T>, FrameworkError> {
        self.request(|respond_to| ResourceRequest::Get { id, respond_to })
            .await
    }

    pub async fn get_many(&self, ids: Vec<T::Id>) -> Result<Vec<T>, FrameworkError> {
        self.request(|respond_to| ResourceRequest::GetMany { ids, respond_to })
            .await
    }

    pub async fn list(&self) -> Result<Vec<T>, FrameworkError> {
        self.request(|respond_to| ResourceRequest::List { respond_to })
            .await
    }

    pub async fn update(&self, id: T::Id, update: T::Update) -> Result<T, FrameworkError> {
        self.request(|respond_to| ResourceRequest::Update {
            id,
            update,
            respond_to,
        })
        .await
    }

    pub async fn upsert(&self, params: T::Create) -> Result<T, FrameworkError> {
        self.request(|respond_to| ResourceRequest::Upsert { params, respond_to })
            .await
    }

    pub async fn perform_action(
        &self,
        id: T::Id,
        action: T::Action,
    ) -> Result<T::ActionResult, FrameworkError> {
        self.request(|respond_to| ResourceRequest::Action {
            id,
            action,
            respond_to,
        })
        .await
    }
}

// =============================================================================
// 5. EXAMPLE USAGE (Test)
// =============================================================================
