//! Name-keyed lookup of live objects.
//!
//! Objects register themselves under a name while they are alive and can be fetched by that
//! name from anywhere holding the registry. A [`Registry`] is `Sync`, so it can sit in a
//! `static`:
//!
//! ```
//! use std::sync::LazyLock;
//! use sight_utils::Registry;
//!
//! static SPAWN_POINTS: LazyLock<Registry<[f32; 3]>> = LazyLock::new(Registry::new);
//!
//! let _entry = SPAWN_POINTS.register("north_gate", [0.0, 0.0, 40.0]);
//! assert_eq!(SPAWN_POINTS.fetch("north_gate").unwrap(), [0.0, 0.0, 40.0]);
//! ```

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistryError {
    #[error("no registered entry named `{0}`")]
    NotFound(String),
}

#[derive(Debug)]
struct Entry<T> {
    generation: u64,
    value: T,
}

#[derive(Debug)]
struct Inner<T> {
    entries: HashMap<String, Entry<T>>,
    next_generation: u64,
}

/// Thread-safe name to value map with scoped registrations.
#[derive(Debug)]
pub struct Registry<T> {
    inner: RwLock<Inner<T>>,
}

impl<T> Default for Registry<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Registry<T> {
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(Inner {
                entries: HashMap::new(),
                next_generation: 0,
            }),
        }
    }

    /// Register `value` under `name` until the returned guard is dropped.
    ///
    /// An existing entry with the same name is replaced; later fetches return the new value
    /// and dropping the old guard no longer removes anything.
    #[must_use = "the entry is removed when the registration is dropped"]
    pub fn register(&self, name: impl Into<String>, value: T) -> Registration<'_, T> {
        let name = name.into();
        let mut inner = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        let generation = inner.next_generation;
        inner.next_generation += 1;

        if inner
            .entries
            .insert(name.clone(), Entry { generation, value })
            .is_some()
        {
            tracing::warn!(
                name = %name,
                "an entry with this name is already registered; fetching it is now ambiguous"
            );
        }

        Registration {
            registry: self,
            name,
            generation,
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.read(|entries| entries.contains_key(name))
    }

    pub fn len(&self) -> usize {
        self.read(HashMap::len)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Names currently registered, in no particular order.
    pub fn names(&self) -> Vec<String> {
        self.read(|entries| entries.keys().cloned().collect())
    }

    /// Run `f` against the value registered under `name`.
    pub fn with<R>(&self, name: &str, f: impl FnOnce(&T) -> R) -> Result<R, RegistryError> {
        self.read(|entries| match entries.get(name) {
            Some(entry) => Ok(f(&entry.value)),
            None => Err(RegistryError::NotFound(name.to_owned())),
        })
    }

    fn read<R>(&self, f: impl FnOnce(&HashMap<String, Entry<T>>) -> R) -> R {
        let inner = self.inner.read().unwrap_or_else(PoisonError::into_inner);
        f(&inner.entries)
    }

    fn unregister(&self, name: &str, generation: u64) {
        let mut inner = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        if inner
            .entries
            .get(name)
            .is_some_and(|entry| entry.generation == generation)
        {
            inner.entries.remove(name);
        }
    }
}

impl<T: Clone> Registry<T> {
    pub fn fetch(&self, name: &str) -> Result<T, RegistryError> {
        self.with(name, T::clone)
    }
}

/// Keeps an entry registered. Dropping it removes the entry if it hasn't been replaced.
#[derive(Debug)]
pub struct Registration<'a, T> {
    registry: &'a Registry<T>,
    name: String,
    generation: u64,
}

impl<T> Registration<'_, T> {
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl<T> Drop for Registration<'_, T> {
    fn drop(&mut self) {
        self.registry.unregister(&self.name, self.generation);
    }
}
