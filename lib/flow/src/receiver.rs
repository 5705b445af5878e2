//! Event receivers and the registry that resolves them by name.
//!
//! Steps refer to receivers by name, never by reference, so flow
//! declarations do not depend on sink lifetimes. The registry is the only
//! place names are resolved.

use crate::error::ReceiverError;
use async_trait::async_trait;
use serde_json::Value as JsonValue;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tracing::{debug, info};

/// A sink that consumes pipeline values.
#[async_trait]
pub trait EventReceiver: Send + Sync {
    /// Accepts one value.
    ///
    /// # Errors
    ///
    /// Returns an error if the sink could not take the value. The engine
    /// reports this as a failed step; it does not retry.
    async fn receive(&self, value: JsonValue) -> Result<(), ReceiverError>;
}

/// Name → receiver mapping. Registration overwrites (last write wins).
#[derive(Default, Clone)]
pub struct ReceiverRegistry {
    receivers: HashMap<String, Arc<dyn EventReceiver>>,
}

impl ReceiverRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `receiver` under `name`, returning any receiver it replaced.
    pub fn add(
        &mut self,
        name: impl Into<String>,
        receiver: Arc<dyn EventReceiver>,
    ) -> Option<Arc<dyn EventReceiver>> {
        let name = name.into();
        let previous = self.receivers.insert(name.clone(), receiver);
        if previous.is_some() {
            debug!(receiver = %name, "replaced previously registered receiver");
        }
        previous
    }

    /// Looks up a receiver by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<Arc<dyn EventReceiver>> {
        self.receivers.get(name).cloned()
    }

    /// Registered names, sorted.
    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.receivers.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.receivers.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.receivers.is_empty()
    }
}

impl std::fmt::Debug for ReceiverRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReceiverRegistry")
            .field("receivers", &self.names())
            .finish()
    }
}

/// Writes every received value to the tracing log.
#[derive(Debug, Clone)]
pub struct LogReceiver {
    name: String,
}

impl LogReceiver {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

#[async_trait]
impl EventReceiver for LogReceiver {
    async fn receive(&self, value: JsonValue) -> Result<(), ReceiverError> {
        info!(receiver = %self.name, %value, "received event");
        Ok(())
    }
}

/// Records every received value in memory.
///
/// Clones share the same buffer, so a caller can register one clone and
/// inspect another.
#[derive(Debug, Clone, Default)]
pub struct MemoryReceiver {
    received: Arc<Mutex<Vec<JsonValue>>>,
}

impl MemoryReceiver {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of every value received so far, oldest first.
    #[must_use]
    pub fn received(&self) -> Vec<JsonValue> {
        self.lock().clone()
    }

    /// The most recently received value.
    #[must_use]
    pub fn last(&self) -> Option<JsonValue> {
        self.lock().last().cloned()
    }

    #[must_use]
    pub fn count(&self) -> usize {
        self.lock().len()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<JsonValue>> {
        // A poisoned buffer still holds every value pushed before the panic.
        self.received
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

#[async_trait]
impl EventReceiver for MemoryReceiver {
    async fn receive(&self, value: JsonValue) -> Result<(), ReceiverError> {
        self.lock().push(value);
        Ok(())
    }
}
