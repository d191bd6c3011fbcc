//! Forwards remote change notifications to caller-supplied handlers.
//!
//! Delivery is at-least-once and may be redundant; nothing is deduplicated
//! or debounced here. Handlers are expected to trigger an idempotent full
//! re-fetch (`Studio::reload`).

use crate::persistence::gateway::PersistenceGateway;
use crate::persistence::remote::{ChangeHandler, Collection, Subscription};
use crate::ui::messages::warning;
use std::sync::Arc;

/// One handler per watched collection.
#[derive(Clone)]
pub struct ChangeHandlers {
    pub on_schedule: ChangeHandler,
    pub on_teachers: ChangeHandler,
    pub on_classes: ChangeHandler,
}

impl ChangeHandlers {
    pub fn new(on_schedule: ChangeHandler, on_teachers: ChangeHandler, on_classes: ChangeHandler) -> Self {
        Self {
            on_schedule,
            on_teachers,
            on_classes,
        }
    }

    /// Same callback for every collection.
    pub fn uniform<F>(handler: F) -> Self
    where
        F: Fn() + Send + Sync + 'static,
    {
        let handler: ChangeHandler = Arc::new(handler);
        Self::new(handler.clone(), handler.clone(), handler)
    }

    fn for_collection(&self, collection: Collection) -> ChangeHandler {
        match collection {
            Collection::Schedule => Arc::clone(&self.on_schedule),
            Collection::Teachers => Arc::clone(&self.on_teachers),
            Collection::ClassTypes => Arc::clone(&self.on_classes),
        }
    }
}

/// Live subscriptions; dropping the handle cancels them.
#[derive(Debug, Default)]
pub struct BridgeHandle {
    subscriptions: Vec<Subscription>,
    failed: Vec<Collection>,
}

impl BridgeHandle {
    pub fn inactive() -> Self {
        Self::default()
    }

    pub fn is_active(&self) -> bool {
        !self.subscriptions.is_empty()
    }

    pub fn subscribed(&self) -> Vec<Collection> {
        self.subscriptions.iter().map(Subscription::collection).collect()
    }

    /// Collections whose subscription could not be established.
    pub fn failed(&self) -> &[Collection] {
        &self.failed
    }

    pub fn unsubscribe(self) {
        drop(self);
    }
}

pub struct ChangeBridge;

impl ChangeBridge {
    /// Subscribe to every collection while the gateway is remote and
    /// realtime is enabled; otherwise return an inactive handle.
    pub fn subscribe(
        gateway: &mut PersistenceGateway,
        enable_realtime: bool,
        handlers: ChangeHandlers,
    ) -> BridgeHandle {
        if !enable_realtime {
            return BridgeHandle::inactive();
        }
        let Some(store) = gateway.remote_store() else {
            return BridgeHandle::inactive();
        };

        let mut handle = BridgeHandle::default();
        for collection in Collection::ALL {
            match store.subscribe(collection, handlers.for_collection(collection)) {
                Ok(sub) => handle.subscriptions.push(sub),
                Err(e) => {
                    warning(format!("Live updates for {} unavailable: {}", collection, e));
                    gateway.log("subscribe_failed", collection.table(), &e.to_string());
                    handle.failed.push(collection);
                }
            }
        }
        handle
    }
}
