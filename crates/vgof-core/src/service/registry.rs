use std::any::{Any, type_name};
use std::collections::HashMap;
use std::sync::{Arc, OnceLock, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::service::error::ServiceError;
use crate::service::id::ServiceId;

/// An installed service. The registry never looks inside it.
pub type Service = Arc<dyn Any + Send + Sync>;

type Result<T> = std::result::Result<T, ServiceError>;

static GLOBAL_REGISTRY: OnceLock<Arc<ServiceRegistry>> = OnceLock::new();

/// Concurrent identifier → service table shared by all modules of a kernel.
///
/// Every operation takes the table lock for the duration of a single lookup
/// or mutation, which makes each identifier linearizable. Nothing is
/// guaranteed about the relative order of operations on different
/// identifiers.
#[derive(Default)]
pub struct ServiceRegistry {
    services: RwLock<HashMap<ServiceId, Service>>,
}

impl ServiceRegistry {
    /// Create a new empty service registry
    pub fn new() -> Self {
        Self {
            services: RwLock::new(HashMap::new()),
        }
    }

    // A panic can only happen in caller code, never while the lock is held
    // mid-mutation, so a poisoned table is still consistent.
    fn read(&self) -> RwLockReadGuard<'_, HashMap<ServiceId, Service>> {
        self.services.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, HashMap<ServiceId, Service>> {
        self.services.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Get the service installed under `id`.
    pub fn locate(&self, id: &ServiceId) -> Result<Service> {
        self.read()
            .get(id)
            .cloned()
            .ok_or(ServiceError::NotInstalled { id: *id })
    }

    /// Get the service installed under `id` as its concrete type `T`.
    pub fn locate_as<T: Any + Send + Sync>(&self, id: &ServiceId) -> Result<Arc<T>> {
        let service = self.locate(id)?;
        Arc::downcast::<T>(service).map_err(|_| ServiceError::TypeMismatch {
            id: *id,
            expected: type_name::<T>(),
        })
    }

    /// Install `service` under `id`. Fails if the identifier is occupied; the
    /// stored value is left untouched in that case.
    pub fn install(&self, id: ServiceId, service: Service) -> Result<()> {
        let mut services = self.write();
        if services.contains_key(&id) {
            return Err(ServiceError::AlreadyInstalled { id });
        }
        services.insert(id, service);
        log::debug!("Installed service {}", id);
        Ok(())
    }

    /// Wrap `value` in an `Arc` and install it under `id`.
    pub fn install_value<T: Any + Send + Sync>(&self, id: ServiceId, value: T) -> Result<()> {
        self.install(id, Arc::new(value))
    }

    /// Swap in `service` under `id`, returning whatever was installed right
    /// before this write. Installs directly when the identifier was free.
    pub fn replace(&self, id: ServiceId, service: Service) -> Option<Service> {
        let previous = self.write().insert(id, service);
        log::debug!(
            "Replaced service {} ({})",
            id,
            if previous.is_some() { "swapped" } else { "newly installed" }
        );
        previous
    }

    /// Remove every listed identifier that is present. Absent ones are ignored.
    pub fn uninstall(&self, ids: &[ServiceId]) {
        if ids.is_empty() {
            return;
        }
        let removed: Vec<Service> = {
            let mut services = self.write();
            ids.iter().filter_map(|id| services.remove(id)).collect()
        };
        log::debug!("Uninstalled {} of {} requested services", removed.len(), ids.len());
        // `removed` drops here, outside the lock
    }

    /// True iff every listed identifier is installed. An empty list is
    /// trivially satisfied.
    pub fn check_all(&self, ids: &[ServiceId]) -> bool {
        if ids.is_empty() {
            return true;
        }
        let services = self.read();
        ids.iter().all(|id| services.contains_key(id))
    }

    pub fn contains(&self, id: &ServiceId) -> bool {
        self.read().contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    /// Snapshot of the installed identifiers, for diagnostics.
    pub fn ids(&self) -> Vec<ServiceId> {
        let mut ids: Vec<ServiceId> = self.read().keys().copied().collect();
        ids.sort();
        ids
    }

    /// Designate `registry` as the process-wide registry. Allowed once.
    ///
    /// Prefer handing the registry reference to callers explicitly; this
    /// exists for call sites that cannot hold one.
    pub fn set_global(registry: Arc<ServiceRegistry>) -> Result<()> {
        GLOBAL_REGISTRY
            .set(registry)
            .map_err(|_| ServiceError::GlobalRegistryAlreadySet)
    }

    /// The process-wide registry, if one has been designated.
    pub fn global() -> Option<Arc<ServiceRegistry>> {
        GLOBAL_REGISTRY.get().cloned()
    }
}

impl std::fmt::Debug for ServiceRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceRegistry")
            .field("services", &self.ids())
            .finish()
    }
}
