//! Load gate: the policy boundary between the host's resource loader and
//! the validator.
//!
//! Only external files with a recognized extension are intercepted.
//! Intercepted files are read, classified, and then either handed to the
//! host for deserialization or replaced by the host's empty resource. One
//! notification is published per intercepted load.

pub mod events;
pub mod path;

use crate::error::{ResGuardError, Result};
use crate::io::error::IoError;
use crate::io::{self, IOLimits, RawFile};
use crate::validate::classifier::ResourceSafetyClassifier;
use crate::validate::config::{PolicyConfig, ValidatorConfig};
use crate::validate::outcome::Verdict;
use events::{LoadEvent, LoadObserver};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, PoisonError, RwLock};
use tracing::{debug, info, warn};

/// Capabilities the host application provides to the gate.
pub trait ResourceHost {
    type Resource;

    /// Return the complete raw bytes of the file at `path`.
    fn read_bytes(&self, path: &str, limits: &IOLimits) -> std::result::Result<RawFile, IoError> {
        io::read_resource_file(path, limits)
    }

    /// Deserialize approved bytes with the host's default loader.
    fn deserialize(&self, file: &RawFile) -> anyhow::Result<Self::Resource>;

    /// A neutral placeholder returned in place of a rejected resource.
    fn empty_resource(&self) -> Self::Resource;
}

/// Handle returned by [`LoadGate::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObserverId(u64);

pub struct LoadGate<H: ResourceHost> {
    classifier: Arc<ResourceSafetyClassifier>,
    host: H,
    policy: PolicyConfig,
    limits: IOLimits,
    observers: RwLock<Vec<(ObserverId, Arc<dyn LoadObserver>)>>,
    next_id: AtomicU64,
}

impl<H: ResourceHost> LoadGate<H> {
    pub fn new(classifier: Arc<ResourceSafetyClassifier>, host: H, config: &ValidatorConfig) -> Self {
        Self {
            classifier,
            host,
            policy: config.policy.clone(),
            limits: config.io.clone(),
            observers: RwLock::new(Vec::new()),
            next_id: AtomicU64::new(0),
        }
    }

    /// Build the classifier from `config` and wrap it in a gate.
    pub fn from_config(config: &ValidatorConfig, host: H) -> Result<Self> {
        let classifier = Arc::new(ResourceSafetyClassifier::new(config)?);
        Ok(Self::new(classifier, host, config))
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn classifier(&self) -> &Arc<ResourceSafetyClassifier> {
        &self.classifier
    }

    pub fn subscribe(&self, observer: Arc<dyn LoadObserver>) -> ObserverId {
        let id = ObserverId(self.next_id.fetch_add(1, Ordering::Relaxed));
        self.observers
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push((id, observer));
        id
    }

    /// Returns false if `id` was not subscribed.
    pub fn remove_observer(&self, id: ObserverId) -> bool {
        let mut observers = self.observers.write().unwrap_or_else(PoisonError::into_inner);
        let before = observers.len();
        observers.retain(|(oid, _)| *oid != id);
        observers.len() != before
    }

    pub fn clear_observers(&self) {
        self.observers
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }

    // Dispatch runs on a snapshot with the lock released, so an observer may
    // subscribe or unsubscribe from inside its callback.
    fn notify(&self, path: &str, success: bool) {
        let event = LoadEvent::new(path, success);
        let observers: Vec<Arc<dyn LoadObserver>> = self
            .observers
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .map(|(_, observer)| Arc::clone(observer))
            .collect();
        for observer in observers {
            observer.on_load(&event);
        }
    }

    pub fn recognize_path(&self, path: &str) -> bool {
        path::recognize_path(path, &self.policy)
    }

    pub fn handles_type(&self, ty: &str) -> bool {
        path::handles_type(ty, &self.policy)
    }

    /// Load the resource at `path`.
    ///
    /// Paths the gate does not intercept go straight to the host. For
    /// intercepted paths an unsafe or oversized file yields
    /// `Ok(empty_resource)` and a failure notification; an unreadable file
    /// yields `Err` and a failure notification.
    pub fn load(&self, path: &str) -> Result<H::Resource> {
        let span = crate::span_trace!("load", path = %path);
        let _guard = span.enter();

        if !self.recognize_path(path) {
            debug!(path = %path, "Not intercepted; delegating to host");
            let file = self.host.read_bytes(path, &self.limits)?;
            return Ok(self.host.deserialize(&file)?);
        }

        let file = match self.host.read_bytes(path, &self.limits) {
            Ok(file) => file,
            Err(e @ (IoError::FileTooLarge { .. } | IoError::ReadLimitExceeded { .. })) => {
                warn!(path = %path, error = %e, "External resource too large; substituting empty resource");
                self.notify(path, false);
                return Ok(self.host.empty_resource());
            }
            Err(e) => {
                warn!(path = %path, error = %e, "Failed to read external resource");
                self.notify(path, false);
                return Err(ResGuardError::Io(e));
            }
        };

        match self.classifier.validate_file(&file) {
            Verdict::Safe => match self.host.deserialize(&file) {
                Ok(resource) => {
                    info!(path = %path, "External resource loaded");
                    self.notify(path, true);
                    Ok(resource)
                }
                Err(e) => {
                    warn!(path = %path, error = %e, "Host failed to deserialize resource");
                    self.notify(path, false);
                    Err(ResGuardError::Host(e))
                }
            },
            Verdict::Unsafe => {
                warn!(path = %path, "External resource blocked; substituting empty resource");
                self.notify(path, false);
                Ok(self.host.empty_resource())
            }
        }
    }
}
