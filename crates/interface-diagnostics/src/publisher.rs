//! # Diagnosed Publisher
//!
//! Publisher adapter that starts out empty and gets its endpoint assigned
//! later, once the transport is up.
//!
//! The upstream `diagnostic_updater::DiagnosedPublisher` registers
//! `"<topic> topic status"` and never removes it. Here it lives inside an
//! `OwnedPublisher` whose `Drop` removes that entry by name, so dropping the
//! bundle both releases the endpoint and deregisters it.

use diag_msgs::HasHeader;
use diag_telemetry::metrics::{self, PUBLISHES_DROPPED_TOTAL};
use diagnostic_updater::{DiagnosedPublisher as TickingPublisher, Updater};
use std::fmt;
use std::sync::Arc;
use topic_bus::{MessagePublisher, Publisher};
use tracing::{debug, trace};

use crate::error::Result;
use crate::thresholds::Thresholds;

/// Endpoint plus its registration. Removes the registration on drop.
struct OwnedPublisher<M, P> {
    publisher: TickingPublisher<M, P>,
    updater: Updater,
    name: String,
}

impl<M, P> Drop for OwnedPublisher<M, P> {
    fn drop(&mut self) {
        self.updater.remove_by_name(&self.name);
        metrics::record_deregistration();
        debug!(diagnostic = %self.name, "Publisher diagnostic deregistered");
    }
}

/// Publisher whose rate and stamp delay are reported to an `Updater`.
///
/// Until an endpoint is assigned, publishing is a silent no-op and the
/// accessors return neutral values.
///
/// Only messages with a header can be published this way:
///
/// ```compile_fail
/// use diagnostic_updater::Updater;
/// use interface_diagnostics::DiagnosedPublisher;
///
/// let updater = Updater::new();
/// let _publisher = DiagnosedPublisher::<u32>::new(&updater);
/// ```
pub struct DiagnosedPublisher<M, P = Publisher<M>> {
    updater: Updater,
    thresholds: Thresholds,
    endpoint: Option<OwnedPublisher<M, P>>,
}

impl<M, P> DiagnosedPublisher<M, P>
where
    M: HasHeader + Send + Sync + 'static,
    P: MessagePublisher<M> + Default,
{
    #[must_use]
    pub fn new(updater: &Updater) -> Self {
        Self {
            updater: updater.clone(),
            thresholds: Thresholds::default(),
            endpoint: None,
        }
    }

    /// Set the minimum expected publish rate in Hz.
    pub fn min_frequency(&mut self, min_frequency: f64) -> &mut Self {
        self.thresholds.min_freq.set(min_frequency);
        self
    }

    /// Set the maximum accepted age of a message stamp in seconds.
    ///
    /// Rebuilds the registration if an endpoint is assigned.
    pub fn max_time_delay(&mut self, max_time_delay: f64) -> Result<&mut Self> {
        self.thresholds.max_time_delay = max_time_delay;
        let current = self
            .endpoint
            .as_ref()
            .map(|endpoint| endpoint.publisher.publisher().clone());
        if let Some(publisher) = current {
            self.init(publisher)?;
        }
        Ok(self)
    }

    /// Replace the endpoint and register it under its topic.
    ///
    /// An unconnected endpoint (empty topic) only clears the current
    /// assignment; nothing is registered for it.
    ///
    /// # Errors
    ///
    /// Fails if another live endpoint already registered the same name. The
    /// adapter is left unassigned in that case.
    pub fn assign(&mut self, publisher: P) -> Result<&mut Self> {
        self.init(publisher)?;
        Ok(self)
    }

    /// Publish `message` if an endpoint is assigned.
    ///
    /// # Returns
    ///
    /// Number of subscribers reached; 0 when unassigned.
    pub fn publish(&self, message: M) -> usize {
        self.publish_shared(Arc::new(message))
    }

    pub fn publish_shared(&self, message: Arc<M>) -> usize {
        match &self.endpoint {
            Some(endpoint) => endpoint.publisher.publish_shared(message),
            None => {
                trace!("Publish dropped, no endpoint assigned");
                PUBLISHES_DROPPED_TOTAL.inc();
                0
            }
        }
    }

    /// Copy of the assigned endpoint, or an unconnected one.
    pub fn publisher(&self) -> P {
        self.endpoint
            .as_ref()
            .map(|endpoint| endpoint.publisher.publisher().clone())
            .unwrap_or_default()
    }

    /// Topic of the assigned endpoint; empty when unassigned.
    pub fn topic(&self) -> &str {
        self.endpoint
            .as_ref()
            .map_or("", |endpoint| endpoint.publisher.publisher().topic())
    }

    /// Subscribers of the assigned endpoint; 0 when unassigned.
    pub fn num_subscribers(&self) -> usize {
        self.endpoint
            .as_ref()
            .map_or(0, |endpoint| endpoint.publisher.publisher().num_subscribers())
    }

    /// True while an endpoint is assigned and registered.
    pub fn is_assigned(&self) -> bool {
        self.endpoint.is_some()
    }

    /// Name of the live registration, if any.
    pub fn registration_name(&self) -> Option<&str> {
        self.endpoint.as_ref().map(|endpoint| endpoint.name.as_str())
    }

    fn init(&mut self, publisher: P) -> Result<()> {
        // Old entry goes first; the new one may reuse its name.
        self.endpoint = None;
        if publisher.topic().is_empty() {
            trace!("Unconnected endpoint assigned, no diagnostic registered");
            return Ok(());
        }

        let publisher = TickingPublisher::new(
            publisher,
            &self.updater,
            self.thresholds.frequency_param(),
            self.thresholds.stamp_param(),
        )?;
        metrics::record_registration();

        let name = publisher.name().to_string();
        debug!(diagnostic = %name, "Publisher diagnostic registered");
        self.endpoint = Some(OwnedPublisher {
            publisher,
            updater: self.updater.clone(),
            name,
        });
        Ok(())
    }
}

impl<M, P> fmt::Debug for DiagnosedPublisher<M, P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DiagnosedPublisher")
            .field("thresholds", &self.thresholds)
            .field(
                "registration",
                &self.endpoint.as_ref().map(|endpoint| endpoint.name.as_str()),
            )
            .finish()
    }
}
