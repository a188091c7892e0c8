//! # Publisher
//!
//! Defines the publishing side of the bus.

use crate::bus::{BusInner, ErasedMessage};
use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;
use tokio::sync::broadcast;
use tracing::{debug, trace};

/// Contract of a publishing endpoint.
///
/// Implementors are lightweight handles: clones publish to the same topic.
pub trait MessagePublisher<M>: Clone {
    /// Publish a shared message.
    ///
    /// # Returns
    ///
    /// The number of subscribers the message was queued for.
    fn publish_shared(&self, message: Arc<M>) -> usize;

    /// Publish a message by value.
    fn publish(&self, message: M) -> usize {
        self.publish_shared(Arc::new(message))
    }

    /// Topic name; empty for an unconnected endpoint.
    fn topic(&self) -> &str;

    /// Number of subscribers currently attached to the topic.
    fn num_subscribers(&self) -> usize;
}

/// Publishing endpoint on a `TopicBus`.
///
/// `Publisher::default()` is unconnected: it has an empty topic, no
/// subscribers, and drops everything it is asked to publish.
pub struct Publisher<M> {
    topic: String,
    sender: Option<broadcast::Sender<ErasedMessage>>,
    bus: Option<Arc<BusInner>>,
    _message: PhantomData<fn(M)>,
}

impl<M> Publisher<M> {
    pub(crate) fn connected(
        topic: String,
        sender: broadcast::Sender<ErasedMessage>,
        bus: Arc<BusInner>,
    ) -> Self {
        Self {
            topic,
            sender: Some(sender),
            bus: Some(bus),
            _message: PhantomData,
        }
    }

    /// True when the endpoint was created by a bus.
    #[must_use]
    pub fn is_connected(&self) -> bool {
        self.sender.is_some()
    }
}

impl<M> Default for Publisher<M> {
    fn default() -> Self {
        Self {
            topic: String::new(),
            sender: None,
            bus: None,
            _message: PhantomData,
        }
    }
}

impl<M> Clone for Publisher<M> {
    fn clone(&self) -> Self {
        Self {
            topic: self.topic.clone(),
            sender: self.sender.clone(),
            bus: self.bus.clone(),
            _message: PhantomData,
        }
    }
}

impl<M> fmt::Debug for Publisher<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Publisher")
            .field("topic", &self.topic)
            .field("connected", &self.is_connected())
            .finish()
    }
}

impl<M> MessagePublisher<M> for Publisher<M>
where
    M: Send + Sync + 'static,
{
    fn publish_shared(&self, message: Arc<M>) -> usize {
        let (Some(sender), Some(bus)) = (&self.sender, &self.bus) else {
            trace!("Publish on unconnected endpoint ignored");
            return 0;
        };

        // Always count the attempt
        bus.record_published();

        let erased: ErasedMessage = message;
        match sender.send(erased) {
            Ok(receivers) => {
                trace!(topic = %self.topic, receivers, "Message published");
                receivers
            }
            Err(_) => {
                debug!(topic = %self.topic, "Message dropped (no subscribers)");
                0
            }
        }
    }

    fn topic(&self) -> &str {
        &self.topic
    }

    fn num_subscribers(&self) -> usize {
        self.sender
            .as_ref()
            .map_or(0, broadcast::Sender::receiver_count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Subscriber, TopicBus};

    #[test]
    fn test_publish_no_subscribers() {
        let bus = TopicBus::new();
        let publisher = bus.advertise::<u32>("/count").unwrap();

        assert_eq!(publisher.publish(1), 0);
        assert_eq!(bus.messages_published(), 1);
    }

    #[test]
    fn test_publish_with_subscriber() {
        let bus = TopicBus::new();
        let publisher = bus.advertise::<u32>("/count").unwrap();
        let _sub = Subscriber::<u32>::with_topic(&bus, "/count").unwrap();

        assert_eq!(publisher.publish(7), 1);
        assert_eq!(publisher.num_subscribers(), 1);
    }

    #[test]
    fn test_default_publisher_is_inert() {
        let publisher = Publisher::<u32>::default();
        assert!(!publisher.is_connected());
        assert_eq!(publisher.topic(), "");
        assert_eq!(publisher.num_subscribers(), 0);
        assert_eq!(publisher.publish(3), 0);
    }

    #[test]
    fn test_clones_share_topic() {
        let bus = TopicBus::new();
        let publisher = bus.advertise::<u32>("/count").unwrap();
        let clone = publisher.clone();
        let _sub = Subscriber::<u32>::with_topic(&bus, "/count").unwrap();

        assert_eq!(clone.topic(), "/count");
        assert_eq!(clone.publish(1), 1);
        assert_eq!(bus.messages_published(), 1);
    }
}
