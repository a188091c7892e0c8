//! # Diagnosed Subscriber
//!
//! Decorates a `MessageSubscriber` so that its topic always has exactly one
//! diagnostic registration, named `"<topic> subscriber"`.
//!
//! ## Re-derivation
//!
//! Every change of topic identity (subscribe, resubscribe, unsubscribe) and
//! every `max_time_delay` change rebuilds the registration:
//!
//! 1. drop the current handle, removing its entry from the updater
//! 2. stop if the subscription has no topic
//! 3. register a fresh handle with the current thresholds
//!
//! Removal always happens before insertion, so re-subscribing to the same
//! topic never trips the updater's duplicate-name check.

use diag_msgs::HasHeader;
use diag_telemetry::metrics::TICKS_DROPPED_TOTAL;
use diagnostic_updater::Updater;
use std::cell::RefCell;
use std::marker::PhantomData;
use std::rc::Rc;
use std::sync::Arc;
use topic_bus::{MessageSubscriber, Subscriber, TopicBus};
use tracing::{debug, trace};

use crate::error::Result;
use crate::handle::RegistrationHandle;
use crate::naming::subscriber_diagnostic_name;
use crate::thresholds::Thresholds;

/// Registration slot shared with the message callback.
type Slot = Rc<RefCell<Option<RegistrationHandle>>>;

/// Subscriber whose frequency and stamp delay are reported to an `Updater`.
///
/// Runs on the thread that spins it; the type is neither `Send` nor `Sync`.
///
/// ```
/// use diag_msgs::Stamped;
/// use diagnostic_updater::Updater;
/// use interface_diagnostics::DiagnosedSubscriber;
/// use topic_bus::{Subscriber, TopicBus};
///
/// let bus = TopicBus::new();
/// let updater = Updater::new();
/// let mut scans = DiagnosedSubscriber::<Stamped<u32>>::new(&updater, Subscriber::new()).unwrap();
/// scans.subscribe(&bus, "/scan").unwrap();
/// assert!(updater.contains("/scan subscriber"));
/// ```
///
/// Messages without a header are rejected when the type is instantiated:
///
/// ```compile_fail
/// use diagnostic_updater::Updater;
/// use interface_diagnostics::DiagnosedSubscriber;
/// use topic_bus::Subscriber;
///
/// let updater = Updater::new();
/// let _scans = DiagnosedSubscriber::<u32>::new(&updater, Subscriber::new());
/// ```
pub struct DiagnosedSubscriber<M, S = Subscriber<M>> {
    subscription: S,
    updater: Updater,
    thresholds: Thresholds,
    registration: Slot,
    _message: PhantomData<fn(M)>,
}

impl<M, S> DiagnosedSubscriber<M, S>
where
    M: HasHeader + Send + Sync + 'static,
    S: MessageSubscriber<M>,
{
    /// Wrap `subscription`, reporting into `updater`.
    ///
    /// The message callback is registered here, once. A subscription that is
    /// already bound gets its registration immediately.
    ///
    /// # Errors
    ///
    /// Fails if the derived name is already registered in `updater`.
    pub fn new(updater: &Updater, mut subscription: S) -> Result<Self> {
        let registration: Slot = Rc::new(RefCell::new(None));

        // Weak so that a callback outliving the decorator cannot keep its
        // registration alive.
        let slot = Rc::downgrade(&registration);
        subscription.register_callback(Box::new(move |message: &Arc<M>| {
            let Some(slot) = slot.upgrade() else {
                return;
            };
            let registration = slot.borrow();
            match registration.as_ref() {
                Some(handle) => handle.tick_at(message.header().stamp),
                None => {
                    trace!("Message received without diagnostic registration");
                    TICKS_DROPPED_TOTAL.inc();
                }
            }
        }));

        let mut subscriber = Self {
            subscription,
            updater: updater.clone(),
            thresholds: Thresholds::default(),
            registration,
            _message: PhantomData,
        };
        subscriber.rederive()?;
        Ok(subscriber)
    }

    /// Set the minimum expected message rate in Hz.
    ///
    /// Takes effect on the live registration without rebuilding it.
    pub fn min_frequency(&mut self, min_frequency: f64) -> &mut Self {
        self.thresholds.min_freq.set(min_frequency);
        self
    }

    /// Set the maximum accepted age of a message stamp in seconds, then
    /// rebuild the registration for the current topic.
    pub fn max_time_delay(&mut self, max_time_delay: f64) -> Result<&mut Self> {
        self.thresholds.max_time_delay = max_time_delay;
        self.rederive()?;
        Ok(self)
    }

    /// Bind to `topic` on `bus` and register `"<topic> subscriber"`.
    ///
    /// # Errors
    ///
    /// Bus errors are returned after the registration was brought in line
    /// with whatever binding the subscription ended up with.
    pub fn subscribe(&mut self, bus: &TopicBus, topic: &str) -> Result<()> {
        let bound = self.subscription.subscribe(bus, topic);
        self.rederive()?;
        bound.map_err(Into::into)
    }

    /// Re-bind to the last topic and register it again.
    pub fn resubscribe(&mut self) -> Result<()> {
        let bound = self.subscription.resubscribe();
        self.rederive()?;
        bound.map_err(Into::into)
    }

    /// Unbind and remove the registration.
    pub fn unsubscribe(&mut self) {
        self.subscription.unsubscribe();
        self.clear_registration();
    }

    /// Deliver queued messages, ticking the registration with each stamp.
    pub fn spin_once(&mut self) -> usize {
        self.subscription.spin_once()
    }

    /// Topic currently bound; empty when unsubscribed.
    pub fn topic(&self) -> &str {
        self.subscription.topic()
    }

    /// Name of the live registration, if any.
    pub fn registration_name(&self) -> Option<String> {
        self.registration
            .borrow()
            .as_ref()
            .map(|handle| handle.name().to_string())
    }

    /// True while a registration is live.
    pub fn is_registered(&self) -> bool {
        self.registration.borrow().is_some()
    }

    /// The wrapped subscription. Rebinding goes through the adapter.
    pub fn subscription(&self) -> &S {
        &self.subscription
    }

    fn rederive(&mut self) -> Result<()> {
        let topic = self.subscription.topic().to_string();
        self.init_diagnostic(&subscriber_diagnostic_name(&topic))
    }

    fn init_diagnostic(&mut self, name: &str) -> Result<()> {
        self.clear_registration();
        if name.is_empty() {
            return Ok(());
        }

        let handle = RegistrationHandle::new(
            name,
            &self.updater,
            self.thresholds.frequency_param(),
            self.thresholds.stamp_param(),
        )?;
        *self.registration.borrow_mut() = Some(handle);
        Ok(())
    }

    fn clear_registration(&mut self) {
        if let Some(handle) = self.registration.borrow_mut().take() {
            debug!(diagnostic = %handle.name(), "Replacing subscriber diagnostic");
        }
    }
}
