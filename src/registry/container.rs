//! Process-wide capability lookup.

use arc_swap::ArcSwap;
use std::any::{type_name, Any, TypeId};
use std::collections::HashMap;
use std::sync::{Arc, OnceLock};

type Erased = Arc<dyn Any + Send + Sync>;
type Factory = Arc<dyn Fn() -> Erased + Send + Sync>;

/// How a capability is produced on resolution.
#[derive(Clone)]
enum Binding {
    /// The same instance on every resolve.
    Instance(Erased),
    /// A fresh value from the factory on every resolve.
    Factory(Factory),
}

static GLOBAL: OnceLock<Arc<ServiceRegistry>> = OnceLock::new();

/// Maps a capability type to a fixed instance or a factory.
///
/// Readers load an immutable snapshot; writers build a new map and swap it
/// in, so `resolve` never blocks on registration.
pub struct ServiceRegistry {
    bindings: ArcSwap<HashMap<TypeId, Binding>>,
}

impl ServiceRegistry {
    /// Create an empty, independent registry.
    pub fn new() -> Self {
        Self {
            bindings: ArcSwap::from_pointee(HashMap::new()),
        }
    }

    /// The process-wide registry.
    pub fn global() -> Arc<ServiceRegistry> {
        GLOBAL.get_or_init(|| Arc::new(ServiceRegistry::new())).clone()
    }

    /// Bind `T` to `instance`, replacing any previous binding for `T`.
    pub fn register_instance<T>(&self, instance: Arc<T>)
    where
        T: ?Sized + Send + Sync + 'static,
    {
        let erased: Erased = Arc::new(instance);
        self.bind::<T>(Binding::Instance(erased));
    }

    /// Bind `T` to `factory`, replacing any previous binding for `T`.
    pub fn register_factory<T, F>(&self, factory: F)
    where
        T: ?Sized + Send + Sync + 'static,
        F: Fn() -> Arc<T> + Send + Sync + 'static,
    {
        let factory: Factory = Arc::new(move || Arc::new(factory()) as Erased);
        self.bind::<T>(Binding::Factory(factory));
    }

    /// Resolve `T`, or `None` when nothing is bound.
    pub fn resolve<T>(&self) -> Option<Arc<T>>
    where
        T: ?Sized + Send + Sync + 'static,
    {
        // Clone the binding out so a factory never runs against a held snapshot guard.
        let binding = self.bindings.load().get(&TypeId::of::<T>()).cloned()?;
        let erased = match binding {
            Binding::Instance(erased) => erased,
            Binding::Factory(factory) => factory(),
        };
        erased.downcast_ref::<Arc<T>>().cloned()
    }

    /// True when `T` has a binding.
    pub fn contains<T>(&self) -> bool
    where
        T: ?Sized + 'static,
    {
        self.bindings.load().contains_key(&TypeId::of::<T>())
    }

    /// Number of bound capabilities.
    pub fn len(&self) -> usize {
        self.bindings.load().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Remove every binding.
    pub fn clear(&self) {
        self.bindings.store(Arc::new(HashMap::new()));
        tracing::debug!("Service registry cleared");
    }

    fn bind<T: ?Sized + 'static>(&self, binding: Binding) {
        let key = TypeId::of::<T>();
        self.bindings.rcu(|current| {
            let mut next = HashMap::clone(current);
            next.insert(key, binding.clone());
            next
        });
        tracing::debug!(capability = type_name::<T>(), "Capability registered");
    }
}

impl Default for ServiceRegistry {
    fn default() -> Self {
        Self::new()
    }
}
