//! # Interface Diagnostics
//!
//! Subscriber and publisher adapters that report message rate and stamp
//! delay to a `diagnostic_updater::Updater`, and keep the updater's table in
//! step with the endpoint they wrap.
//!
//! ## Why
//!
//! `TopicDiagnostic` and the upstream diagnosed publisher register an entry
//! on construction and never remove it. Re-subscribing under the same name
//! then fails with a duplicate-name error, and dropped endpoints keep
//! reporting "No events recorded." forever.
//!
//! ## Components
//!
//! | Type | Registration |
//! |------|--------------|
//! | `RegistrationHandle` | one entry, removed on drop |
//! | `DiagnosedSubscriber` | `"<topic> subscriber"`, rebuilt on every (re)subscribe, removed on unsubscribe |
//! | `DiagnosedPublisher` | `"<topic> topic status"`, built on assign, removed on re-assign or drop |
//!
//! ## Threading
//!
//! The adapters run on the thread that spins the subscription. They hold
//! no locks of their own; the updater is the only shared object.
//!
//! ## Usage
//!
//! ```rust,ignore
//! let updater = Updater::builder().bus(&bus).build()?;
//!
//! let mut scans = DiagnosedSubscriber::<Stamped<Scan>>::new(&updater, Subscriber::new())?;
//! scans.min_frequency(10.0).max_time_delay(0.2)?;
//! scans.subscribe(&bus, "/scan")?;
//!
//! let mut cmd = DiagnosedPublisher::<Stamped<Twist>>::new(&updater);
//! cmd.publish(twist); // dropped, not assigned yet
//! cmd.assign(bus.advertise("/cmd_vel")?)?;
//!
//! loop {
//!     scans.spin_once();
//!     updater.update();
//! }
//! ```

// Allow in tests
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

pub mod error;
pub mod handle;
pub mod naming;
pub mod publisher;
pub mod subscriber;
mod thresholds;

// Re-exports for convenience
pub use error::{DiagnosticsError, Result};
pub use handle::RegistrationHandle;
pub use naming::{publisher_diagnostic_name, subscriber_diagnostic_name};
pub use publisher::DiagnosedPublisher;
pub use subscriber::DiagnosedSubscriber;
