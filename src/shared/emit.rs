//! Event subscription plumbing.
//!
//! Inbound `UiEvent`s go through an [`EventBus`] whose handlers are async
//! (translation and contribution await the network). Outbound `AppEvent`s go
//! through an [`EventEmitter`] whose listeners are plain callbacks. Both hand
//! out a [`Subscription`] that unbinds the handler when disposed or dropped.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, Weak};

use async_trait::async_trait;

/// Async handler for inbound events.
#[async_trait]
pub trait EventHandler<E>: Send + Sync
where
    E: Send + Sync,
{
    async fn handle(&self, event: &E);
}

type Slots<H> = Mutex<Vec<(u64, H)>>;

struct Registry<H> {
    next_id: AtomicU64,
    slots: Slots<H>,
}

impl<H: Clone> Registry<H> {
    fn new() -> Self {
        Self {
            next_id: AtomicU64::new(1),
            slots: Mutex::new(Vec::new()),
        }
    }

    fn insert(&self, handler: H) -> u64 {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        match self.slots.lock() {
            Ok(mut slots) => slots.push((id, handler)),
            Err(poisoned) => poisoned.into_inner().push((id, handler)),
        }
        id
    }

    fn remove(&self, id: u64) {
        match self.slots.lock() {
            Ok(mut slots) => slots.retain(|(slot_id, _)| *slot_id != id),
            Err(poisoned) => poisoned.into_inner().retain(|(slot_id, _)| *slot_id != id),
        }
    }

    /// Copy of the current handlers so none is called with the lock held.
    fn snapshot(&self) -> Vec<H> {
        match self.slots.lock() {
            Ok(slots) => slots.iter().map(|(_, h)| h.clone()).collect(),
            Err(poisoned) => poisoned.into_inner().iter().map(|(_, h)| h.clone()).collect(),
        }
    }

    fn len(&self) -> usize {
        self.slots.lock().map(|s| s.len()).unwrap_or(0)
    }
}

trait Unbind: Send + Sync {
    fn unbind(&self, id: u64);
}

impl<H: Clone + Send> Unbind for Registry<H> {
    fn unbind(&self, id: u64) {
        self.remove(id);
    }
}

/// Disposer handle returned by `subscribe`/`listen`.
#[must_use = "dropping a Subscription unbinds its handler"]
pub struct Subscription {
    id: u64,
    registry: Option<Weak<dyn Unbind>>,
}

impl Subscription {
    /// A handle that owns nothing, for bindings that decided not to bind.
    pub fn inert() -> Self {
        Self { id: 0, registry: None }
    }

    pub fn is_bound(&self) -> bool {
        self.registry.as_ref().map(|r| r.strong_count() > 0).unwrap_or(false)
    }

    pub fn dispose(mut self) {
        self.release();
    }

    fn release(&mut self) {
        if let Some(registry) = self.registry.take().and_then(|weak| weak.upgrade()) {
            registry.unbind(self.id);
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.release();
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("id", &self.id)
            .field("bound", &self.is_bound())
            .finish()
    }
}

type SharedHandler<E> = Arc<dyn EventHandler<E>>;

/// Dispatches inbound events to async handlers in subscription order.
pub struct EventBus<E: Send + Sync + 'static> {
    registry: Arc<Registry<SharedHandler<E>>>,
}

impl<E: Send + Sync + 'static> Clone for EventBus<E> {
    fn clone(&self) -> Self {
        Self { registry: Arc::clone(&self.registry) }
    }
}

impl<E: Send + Sync + 'static> Default for EventBus<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: Send + Sync + 'static> EventBus<E> {
    pub fn new() -> Self {
        Self { registry: Arc::new(Registry::new()) }
    }

    pub fn subscribe(&self, handler: SharedHandler<E>) -> Subscription {
        let id = self.registry.insert(handler);
        let registry: Arc<dyn Unbind> = self.registry.clone();
        Subscription { id, registry: Some(Arc::downgrade(&registry)) }
    }

    /// Runs every handler to completion, one after another.
    pub async fn dispatch(&self, event: &E) {
        for handler in self.registry.snapshot() {
            handler.handle(event).await;
        }
    }

    pub fn handler_count(&self) -> usize {
        self.registry.len()
    }
}

type Listener<E> = Arc<dyn Fn(&E) + Send + Sync>;

/// Fans outbound events out to synchronous listeners.
pub struct EventEmitter<E: 'static> {
    registry: Arc<Registry<Listener<E>>>,
}

impl<E: 'static> Clone for EventEmitter<E> {
    fn clone(&self) -> Self {
        Self { registry: Arc::clone(&self.registry) }
    }
}

impl<E: 'static> Default for EventEmitter<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: 'static> EventEmitter<E> {
    pub fn new() -> Self {
        Self { registry: Arc::new(Registry::new()) }
    }

    pub fn listen<F>(&self, listener: F) -> Subscription
    where
        F: Fn(&E) + Send + Sync + 'static,
    {
        let id = self.registry.insert(Arc::new(listener));
        let registry: Arc<dyn Unbind> = self.registry.clone();
        Subscription { id, registry: Some(Arc::downgrade(&registry)) }
    }

    pub fn emit(&self, event: E) {
        for listener in self.registry.snapshot() {
            listener(&event);
        }
    }

    pub fn listener_count(&self) -> usize {
        self.registry.len()
    }
}
