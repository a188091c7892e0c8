//! # Updater
//!
//! Name-keyed table of diagnostic tasks. Tasks run in registration order on
//! every update and their statuses are published as one `DiagnosticArray`.
//!
//! ## Name Uniqueness
//!
//! Task names are unique. `add` fails with `UpdaterError::DuplicateName`
//! rather than shadowing an existing entry, so owners that re-register must
//! remove first.

use crate::config::UpdaterConfig;
use crate::error::UpdaterError;
use crate::status::DiagnosticStatusWrapper;
use crate::task::{DiagnosticTask, FunctionDiagnosticTask};
use diag_msgs::{Clock, DiagnosticArray, Header, Level, SystemClock, Time};
use parking_lot::{Mutex, RwLock};
use std::sync::Arc;
use topic_bus::{MessagePublisher, Publisher, TopicBus};
use tracing::{debug, trace, warn};

/// Observes changes to the task table.
///
/// Both hooks run after the table was updated, outside of its lock.
pub trait RegistryObserver: Send + Sync {
    /// A task named `name` was added.
    fn on_add(&self, _name: &str) {}

    /// `remove_by_name(name)` was called; `removed` tells whether an entry
    /// existed.
    fn on_remove(&self, _name: &str, _removed: bool) {}
}

struct UpdaterInner {
    config: UpdaterConfig,
    hardware_id: RwLock<String>,
    tasks: Mutex<Vec<Box<dyn DiagnosticTask>>>,
    next_update: Mutex<Time>,
    clock: Arc<dyn Clock>,
    publisher: Option<Publisher<DiagnosticArray>>,
    observer: Option<Arc<dyn RegistryObserver>>,
}

/// Diagnostic aggregator.
///
/// Cheap to clone; clones share the same task table. Keep at least one
/// clone alive for as long as anything is registered in it.
#[derive(Clone)]
pub struct Updater {
    inner: Arc<UpdaterInner>,
}

impl Updater {
    /// Updater with default configuration, system clock and no output topic.
    #[must_use]
    pub fn new() -> Self {
        let config = UpdaterConfig::default();
        Self::from_parts(config, Arc::new(SystemClock), None, None)
    }

    pub fn builder() -> UpdaterBuilder {
        UpdaterBuilder::default()
    }

    fn from_parts(
        config: UpdaterConfig,
        clock: Arc<dyn Clock>,
        publisher: Option<Publisher<DiagnosticArray>>,
        observer: Option<Arc<dyn RegistryObserver>>,
    ) -> Self {
        let now = clock.now();
        Self {
            inner: Arc::new(UpdaterInner {
                hardware_id: RwLock::new(config.hardware_id.clone()),
                config,
                tasks: Mutex::new(Vec::new()),
                next_update: Mutex::new(now),
                clock,
                publisher,
                observer,
            }),
        }
    }

    /// Register a task under its own name.
    pub fn add(&self, task: Box<dyn DiagnosticTask>) -> Result<(), UpdaterError> {
        let name = task.name().to_string();
        if name.is_empty() {
            return Err(UpdaterError::EmptyName);
        }

        {
            let mut tasks = self.inner.tasks.lock();
            if tasks.iter().any(|t| t.name() == name) {
                warn!(task = %name, "Diagnostic task already registered");
                return Err(UpdaterError::DuplicateName { name });
            }
            tasks.push(task);
        }

        debug!(task = %name, "Diagnostic task registered");
        if let Some(observer) = &self.inner.observer {
            observer.on_add(&name);
        }
        Ok(())
    }

    /// Register a closure as a task.
    pub fn add_fn<F>(&self, name: impl Into<String>, function: F) -> Result<(), UpdaterError>
    where
        F: FnMut(&mut DiagnosticStatusWrapper) + Send + 'static,
    {
        self.add(Box::new(FunctionDiagnosticTask::new(name, function)))
    }

    /// Remove the task registered as `name`.
    ///
    /// # Returns
    ///
    /// `true` if an entry was removed.
    pub fn remove_by_name(&self, name: &str) -> bool {
        let removed = {
            let mut tasks = self.inner.tasks.lock();
            match tasks.iter().position(|t| t.name() == name) {
                Some(idx) => {
                    tasks.remove(idx);
                    true
                }
                None => false,
            }
        };

        if removed {
            debug!(task = %name, "Diagnostic task removed");
        } else {
            trace!(task = %name, "No diagnostic task to remove");
        }
        if let Some(observer) = &self.inner.observer {
            observer.on_remove(name, removed);
        }
        removed
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.inner.tasks.lock().iter().any(|t| t.name() == name)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.tasks.lock().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.tasks.lock().is_empty()
    }

    /// Registered task names in registration order.
    #[must_use]
    pub fn names(&self) -> Vec<String> {
        self.inner
            .tasks
            .lock()
            .iter()
            .map(|t| t.name().to_string())
            .collect()
    }

    #[must_use]
    pub fn hardware_id(&self) -> String {
        self.inner.hardware_id.read().clone()
    }

    pub fn set_hardware_id(&self, hardware_id: impl Into<String>) {
        *self.inner.hardware_id.write() = hardware_id.into();
    }

    /// Clock used for policies created against this updater.
    #[must_use]
    pub fn clock(&self) -> Arc<dyn Clock> {
        self.inner.clock.clone()
    }

    #[must_use]
    pub fn config(&self) -> &UpdaterConfig {
        &self.inner.config
    }

    /// Run all tasks if a period has elapsed since the last update.
    pub fn update(&self) -> Option<DiagnosticArray> {
        let now = self.inner.clock.now();
        if now < *self.inner.next_update.lock() {
            return None;
        }
        Some(self.force_update())
    }

    /// Run all tasks now and publish the result.
    pub fn force_update(&self) -> DiagnosticArray {
        let now = self.inner.clock.now();
        *self.inner.next_update.lock() = now.offset_secs(self.inner.config.period_secs);

        let hardware_id = self.hardware_id();
        let mut status = Vec::new();
        for task in self.inner.tasks.lock().iter_mut() {
            let mut stat = DiagnosticStatusWrapper::new(
                self.inner.config.status_name(task.name()),
                hardware_id.clone(),
            );
            task.run(&mut stat);
            status.push(stat.into_status());
        }

        self.publish(DiagnosticArray {
            header: Header::stamped(now),
            status,
        })
    }

    /// Publish the same level and message for every task without running
    /// them.
    pub fn broadcast(&self, level: Level, message: &str) -> DiagnosticArray {
        let now = self.inner.clock.now();
        let hardware_id = self.hardware_id();
        let mut status = Vec::new();
        for task in self.inner.tasks.lock().iter() {
            let mut stat = DiagnosticStatusWrapper::new(
                self.inner.config.status_name(task.name()),
                hardware_id.clone(),
            );
            stat.summary(level, message);
            status.push(stat.into_status());
        }

        self.publish(DiagnosticArray {
            header: Header::stamped(now),
            status,
        })
    }

    fn publish(&self, array: DiagnosticArray) -> DiagnosticArray {
        if let Some(publisher) = &self.inner.publisher {
            publisher.publish(array.clone());
        }
        trace!(statuses = array.status.len(), "Diagnostics updated");
        array
    }
}

impl Default for Updater {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for `Updater`.
#[derive(Default)]
pub struct UpdaterBuilder {
    config: Option<UpdaterConfig>,
    clock: Option<Arc<dyn Clock>>,
    bus: Option<TopicBus>,
    observer: Option<Arc<dyn RegistryObserver>>,
}

impl UpdaterBuilder {
    pub fn config(mut self, config: UpdaterConfig) -> Self {
        self.config = Some(config);
        self
    }

    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = Some(clock);
        self
    }

    /// Publish every update on the configured topic of `bus`.
    pub fn bus(mut self, bus: &TopicBus) -> Self {
        self.bus = Some(bus.clone());
        self
    }

    pub fn observer(mut self, observer: Arc<dyn RegistryObserver>) -> Self {
        self.observer = Some(observer);
        self
    }

    /// Build the updater, validating the configuration.
    pub fn build(self) -> Result<Updater, UpdaterError> {
        let config = self.config.unwrap_or_default();
        config.validate()?;

        let publisher = match &self.bus {
            Some(bus) => Some(bus.advertise::<DiagnosticArray>(&config.topic)?),
            None => None,
        };
        let clock = self.clock.unwrap_or_else(|| Arc::new(SystemClock));

        Ok(Updater::from_parts(config, clock, publisher, self.observer))
    }
}
