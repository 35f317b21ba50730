//! Per-plugin private state attached to a deck.
//!
//! Plugins keep their own state here, keyed by plugin name, instead of
//! adding fields to the deck.

use parking_lot::Mutex;
use std::any::Any;
use std::collections::HashMap;

type Slot = Box<dyn Any + Send + Sync>;

#[derive(Default)]
pub struct PluginStorage {
    slots: Mutex<HashMap<String, Slot>>,
}

impl PluginStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `value` under `key`, replacing whatever was there.
    /// Returns `true` if an earlier value was replaced.
    pub fn insert<T>(&self, key: impl Into<String>, value: T) -> bool
    where
        T: Any + Send + Sync,
    {
        self.slots.lock().insert(key.into(), Box::new(value)).is_some()
    }

    /// Clone out the value under `key` if it exists and has type `T`.
    pub fn get<T>(&self, key: &str) -> Option<T>
    where
        T: Any + Clone,
    {
        self.slots.lock().get(key)?.downcast_ref::<T>().cloned()
    }

    /// Run `f` against the value under `key`.
    ///
    /// The value is taken out of the table while `f` runs, so `f` may use
    /// this storage freely; a value it stores under the same `key` is
    /// replaced when `f` returns.
    pub fn with<T, R>(&self, key: &str, f: impl FnOnce(&mut T) -> R) -> Option<R>
    where
        T: Any,
    {
        let mut slot = self.slots.lock().remove(key)?;
        let result = slot.downcast_mut::<T>().map(f);
        self.slots.lock().insert(key.to_string(), slot);
        result
    }

    /// Like [`with`](Self::with) but inserts `init()` first when `key` is vacant.
    /// Returns `None` only if an existing value has a different type.
    pub fn with_or_insert<T, R>(
        &self,
        key: &str,
        init: impl FnOnce() -> T,
        f: impl FnOnce(&mut T) -> R,
    ) -> Option<R>
    where
        T: Any + Send + Sync,
    {
        let existing = self.slots.lock().remove(key);
        let mut slot: Slot = match existing {
            Some(slot) => slot,
            None => Box::new(init()),
        };
        let result = slot.downcast_mut::<T>().map(f);
        self.slots.lock().insert(key.to_string(), slot);
        result
    }

    pub fn contains(&self, key: &str) -> bool {
        self.slots.lock().contains_key(key)
    }

    pub fn remove(&self, key: &str) -> bool {
        self.slots.lock().remove(key).is_some()
    }

    pub fn keys(&self) -> Vec<String> {
        let mut keys: Vec<_> = self.slots.lock().keys().cloned().collect();
        keys.sort();
        keys
    }
}

impl std::fmt::Debug for PluginStorage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PluginStorage").field("keys", &self.keys()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn typed_round_trip() {
        let storage = PluginStorage::new();
        assert!(!storage.insert("hash", String::from("#1")));
        assert_eq!(storage.get::<String>("hash").as_deref(), Some("#1"));
        assert_eq!(storage.get::<u32>("hash"), None);
        assert!(storage.insert("hash", String::from("#2")));
        assert_eq!(storage.get::<String>("hash").as_deref(), Some("#2"));
    }

    #[test]
    fn keys_are_isolated() {
        let storage = PluginStorage::new();
        storage.insert("touch", 10usize);
        storage.insert("keys", 20usize);
        storage.with("touch", |n: &mut usize| *n += 1);
        assert_eq!(storage.get::<usize>("touch"), Some(11));
        assert_eq!(storage.get::<usize>("keys"), Some(20));
        assert_eq!(storage.keys(), vec!["keys".to_string(), "touch".to_string()]);
        assert!(storage.remove("touch"));
        assert!(!storage.contains("touch"));
    }

    #[test]
    fn with_or_insert_initialises_once() {
        let storage = PluginStorage::new();
        let first = storage.with_or_insert("count", || 0u32, |n| {
            *n += 1;
            *n
        });
        let second = storage.with_or_insert("count", || 100u32, |n| {
            *n += 1;
            *n
        });
        assert_eq!(first, Some(1));
        assert_eq!(second, Some(2));
        assert_eq!(storage.with_or_insert("count", String::new, |s| s.len()), None);
    }

    #[test]
    fn closures_may_reenter_the_storage() {
        let storage = PluginStorage::new();
        storage.insert("keys", 1usize);
        storage.insert("hash", String::from("#1"));

        let seen = storage.with("keys", |n: &mut usize| {
            storage.insert("touch", true);
            *n += 1;
            storage.get::<String>("hash")
        });
        assert_eq!(seen, Some(Some("#1".to_string())));
        assert_eq!(storage.get::<usize>("keys"), Some(2));
        assert_eq!(storage.get::<bool>("touch"), Some(true));

        let total = storage.with_or_insert("count", || 0u32, |n| {
            *n += storage.get::<usize>("keys").unwrap_or(0) as u32;
            *n
        });
        assert_eq!(total, Some(2));
        assert_eq!(storage.with("count", |n: &mut String| n.len()), None);
        assert_eq!(storage.get::<u32>("count"), Some(2));
    }
}
