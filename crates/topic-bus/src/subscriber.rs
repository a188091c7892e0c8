//! # Subscriber
//!
//! Defines the subscription side of the bus.

use crate::bus::{BusError, ErasedMessage, TopicBus};
use std::any::type_name;
use std::sync::Arc;
use tokio::sync::broadcast;
use tracing::{debug, warn};

/// Callback invoked for every delivered message.
pub type MessageCallback<M> = Box<dyn FnMut(&Arc<M>)>;

/// Contract of a subscription endpoint.
///
/// Callbacks stay registered across `subscribe`/`unsubscribe` cycles; only
/// the topic binding changes.
pub trait MessageSubscriber<M> {
    /// Bind to `topic` on `bus`, dropping any previous binding.
    fn subscribe(&mut self, bus: &TopicBus, topic: &str) -> Result<(), BusError>;

    /// Re-bind to the most recently subscribed topic. No-op if there is none.
    fn resubscribe(&mut self) -> Result<(), BusError>;

    /// Drop the current binding. Pending messages are discarded.
    fn unsubscribe(&mut self);

    /// Topic currently bound; empty when unsubscribed.
    fn topic(&self) -> &str;

    /// Add a callback for delivered messages.
    fn register_callback(&mut self, callback: MessageCallback<M>);

    /// Deliver all queued messages to the callbacks on the calling thread.
    ///
    /// # Returns
    ///
    /// The number of messages delivered.
    fn spin_once(&mut self) -> usize;
}

/// Message-filter style subscriber on a `TopicBus`.
///
/// When dropped, the binding is released and the topic's subscriber count
/// decreases.
pub struct Subscriber<M> {
    /// Bus and topic of the last `subscribe` call, kept for `resubscribe`.
    last: Option<(TopicBus, String)>,

    /// Live binding.
    receiver: Option<broadcast::Receiver<ErasedMessage>>,

    callbacks: Vec<MessageCallback<M>>,

    /// Messages lost because the queue overflowed.
    lagged: u64,
}

impl<M> Subscriber<M>
where
    M: Send + Sync + 'static,
{
    /// Create an unbound subscriber.
    #[must_use]
    pub fn new() -> Self {
        Self {
            last: None,
            receiver: None,
            callbacks: Vec::new(),
            lagged: 0,
        }
    }

    /// Create a subscriber bound to `topic`.
    pub fn with_topic(bus: &TopicBus, topic: &str) -> Result<Self, BusError> {
        let mut subscriber = Self::new();
        subscriber.subscribe(bus, topic)?;
        Ok(subscriber)
    }

    /// True while bound to a topic.
    #[must_use]
    pub fn is_subscribed(&self) -> bool {
        self.receiver.is_some()
    }

    /// Messages lost to queue overflow since creation.
    #[must_use]
    pub fn lagged(&self) -> u64 {
        self.lagged
    }
}

impl<M> Default for Subscriber<M>
where
    M: Send + Sync + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<M> MessageSubscriber<M> for Subscriber<M>
where
    M: Send + Sync + 'static,
{
    fn subscribe(&mut self, bus: &TopicBus, topic: &str) -> Result<(), BusError> {
        self.unsubscribe();
        let sender = bus.channel::<M>(topic)?;
        self.receiver = Some(sender.subscribe());
        self.last = Some((bus.clone(), topic.to_string()));
        debug!(topic, message_type = type_name::<M>(), "Subscribed");
        Ok(())
    }

    fn resubscribe(&mut self) -> Result<(), BusError> {
        let Some((bus, topic)) = self.last.clone() else {
            return Ok(());
        };
        self.subscribe(&bus, &topic)
    }

    fn unsubscribe(&mut self) {
        if self.receiver.take().is_some() {
            debug!(topic = %self.topic_name(), "Unsubscribed");
        }
    }

    fn topic(&self) -> &str {
        if self.receiver.is_some() {
            self.topic_name()
        } else {
            ""
        }
    }

    fn register_callback(&mut self, callback: MessageCallback<M>) {
        self.callbacks.push(callback);
    }

    fn spin_once(&mut self) -> usize {
        let Some(receiver) = self.receiver.as_mut() else {
            return 0;
        };

        let mut delivered = 0;
        loop {
            let erased = match receiver.try_recv() {
                Ok(m) => m,
                Err(broadcast::error::TryRecvError::Empty)
                | Err(broadcast::error::TryRecvError::Closed) => break,
                Err(broadcast::error::TryRecvError::Lagged(count)) => {
                    self.lagged += count;
                    warn!(lagged = count, "Subscriber lagged, some messages dropped");
                    continue;
                }
            };

            let Ok(message) = erased.downcast::<M>() else {
                warn!(
                    expected = type_name::<M>(),
                    "Message of unexpected type discarded"
                );
                continue;
            };

            for callback in self.callbacks.iter_mut() {
                callback(&message);
            }
            delivered += 1;
        }
        delivered
    }
}

impl<M> Subscriber<M> {
    fn topic_name(&self) -> &str {
        self.last.as_ref().map_or("", |(_, topic)| topic.as_str())
    }
}
