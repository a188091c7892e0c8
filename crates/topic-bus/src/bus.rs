//! # Topic Table
//!
//! Owns one broadcast channel per topic name.

use crate::publisher::Publisher;
use crate::DEFAULT_CHANNEL_CAPACITY;
use parking_lot::RwLock;
use std::any::{type_name, Any, TypeId};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::broadcast;
use tracing::debug;

/// Messages travel type-erased and are downcast by the subscriber.
pub(crate) type ErasedMessage = Arc<dyn Any + Send + Sync>;

/// Errors from topic operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BusError {
    /// Topic names must not be empty.
    #[error("Topic name is empty")]
    EmptyTopic,

    /// The topic already carries a different message type.
    #[error("Topic {topic} carries {existing}, requested {requested}")]
    TypeMismatch {
        topic: String,
        existing: &'static str,
        requested: &'static str,
    },
}

struct TopicEntry {
    sender: broadcast::Sender<ErasedMessage>,
    type_id: TypeId,
    type_name: &'static str,
}

pub(crate) struct BusInner {
    /// Topic name -> channel.
    topics: RwLock<HashMap<String, TopicEntry>>,

    /// Total messages published across all topics.
    messages_published: AtomicU64,

    /// Per-subscriber queue length.
    capacity: usize,
}

impl BusInner {
    pub(crate) fn record_published(&self) {
        self.messages_published.fetch_add(1, Ordering::Relaxed);
    }
}

/// In-memory topic bus.
///
/// Cheap to clone; clones share the same topic table.
#[derive(Clone)]
pub struct TopicBus {
    inner: Arc<BusInner>,
}

impl TopicBus {
    /// Create a bus with default per-subscriber capacity.
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CHANNEL_CAPACITY)
    }

    /// Create a bus with the given per-subscriber capacity.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            inner: Arc::new(BusInner {
                topics: RwLock::new(HashMap::new()),
                messages_published: AtomicU64::new(0),
                capacity: capacity.max(1),
            }),
        }
    }

    /// Create a publishing endpoint on `topic`.
    pub fn advertise<M>(&self, topic: &str) -> Result<Publisher<M>, BusError>
    where
        M: Send + Sync + 'static,
    {
        let sender = self.channel::<M>(topic)?;
        debug!(topic, message_type = type_name::<M>(), "Topic advertised");
        Ok(Publisher::connected(
            topic.to_string(),
            sender,
            self.inner.clone(),
        ))
    }

    /// Get or create the channel for `topic`, checking its message type.
    pub(crate) fn channel<M>(&self, topic: &str) -> Result<broadcast::Sender<ErasedMessage>, BusError>
    where
        M: Send + Sync + 'static,
    {
        if topic.is_empty() {
            return Err(BusError::EmptyTopic);
        }

        let mut topics = self.inner.topics.write();
        let entry = topics.entry(topic.to_string()).or_insert_with(|| {
            let (sender, _) = broadcast::channel(self.inner.capacity);
            TopicEntry {
                sender,
                type_id: TypeId::of::<M>(),
                type_name: type_name::<M>(),
            }
        });

        if entry.type_id != TypeId::of::<M>() {
            return Err(BusError::TypeMismatch {
                topic: topic.to_string(),
                existing: entry.type_name,
                requested: type_name::<M>(),
            });
        }

        Ok(entry.sender.clone())
    }

    /// Number of subscribers currently attached to `topic`.
    #[must_use]
    pub fn subscriber_count(&self, topic: &str) -> usize {
        self.inner
            .topics
            .read()
            .get(topic)
            .map_or(0, |entry| entry.sender.receiver_count())
    }

    /// Names of all known topics, sorted.
    #[must_use]
    pub fn topics(&self) -> Vec<String> {
        let mut names: Vec<String> = self.inner.topics.read().keys().cloned().collect();
        names.sort();
        names
    }

    /// Total messages published on this bus.
    #[must_use]
    pub fn messages_published(&self) -> u64 {
        self.inner.messages_published.load(Ordering::Relaxed)
    }

    /// Per-subscriber queue length.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.inner.capacity
    }
}

impl Default for TopicBus {
    fn default() -> Self {
        Self::new()
    }
}
