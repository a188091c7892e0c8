//! Publisher that ticks a `TopicDiagnostic` with every message it sends.

use crate::error::UpdaterError;
use crate::frequency::FrequencyStatusParam;
use crate::timestamp::TimeStampStatusParam;
use crate::topic::TopicDiagnostic;
use crate::updater::Updater;
use diag_msgs::HasHeader;
use std::marker::PhantomData;
use std::sync::Arc;
use topic_bus::{MessagePublisher, Publisher};

/// Name a publisher diagnostic is registered under: `"<topic> topic status"`.
pub fn topic_status_name(topic: &str) -> String {
    format!("{topic} topic status")
}

/// Wraps a publishing endpoint and records frequency and stamp delay of
/// everything it publishes.
///
/// The diagnostic is registered as `topic_status_name(topic)` on
/// construction and, like `TopicDiagnostic`, is left in the updater when
/// this value is dropped.
pub struct DiagnosedPublisher<M, P = Publisher<M>> {
    publisher: P,
    diagnostic: TopicDiagnostic,
    _message: PhantomData<fn(M)>,
}

impl<M, P> DiagnosedPublisher<M, P>
where
    M: HasHeader,
    P: MessagePublisher<M>,
{
    pub fn new(
        publisher: P,
        updater: &Updater,
        freq: FrequencyStatusParam,
        stamp: TimeStampStatusParam,
    ) -> Result<Self, UpdaterError> {
        let name = topic_status_name(publisher.topic());
        let diagnostic = TopicDiagnostic::new(name, updater, freq, stamp)?;
        Ok(Self {
            publisher,
            diagnostic,
            _message: PhantomData,
        })
    }

    /// Record the message stamp, then publish.
    pub fn publish(&self, message: M) -> usize {
        self.publish_shared(Arc::new(message))
    }

    pub fn publish_shared(&self, message: Arc<M>) -> usize {
        self.diagnostic.tick_at(message.header().stamp);
        self.publisher.publish_shared(message)
    }

    pub fn publisher(&self) -> &P {
        &self.publisher
    }

    /// Name the diagnostic is registered under.
    pub fn name(&self) -> &str {
        self.diagnostic.name()
    }

    pub fn diagnostic(&self) -> &TopicDiagnostic {
        &self.diagnostic
    }
}
