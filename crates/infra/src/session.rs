//! Session-scoped state keyed by basket instance name.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

/// Key/value session storage (the caller's request/user session).
///
/// Baskets remember their slug under their instance name and clear that entry
/// when they are deleted.
pub trait SessionStore: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: String);
    fn clear(&self, key: &str);

    fn has(&self, key: &str) -> bool {
        self.get(key).is_some()
    }
}

impl<S> SessionStore for Arc<S>
where
    S: SessionStore + ?Sized,
{
    fn get(&self, key: &str) -> Option<String> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: String) {
        (**self).set(key, value)
    }

    fn clear(&self, key: &str) {
        (**self).clear(key)
    }
}

/// In-memory session store for tests/dev.
#[derive(Debug, Default)]
pub struct InMemorySessionStore {
    inner: RwLock<HashMap<String, String>>,
}

impl InMemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionStore for InMemorySessionStore {
    fn get(&self, key: &str) -> Option<String> {
        let map = self.inner.read().ok()?;
        map.get(key).cloned()
    }

    fn set(&self, key: &str, value: String) {
        if let Ok(mut map) = self.inner.write() {
            map.insert(key.to_string(), value);
        }
    }

    fn clear(&self, key: &str) {
        if let Ok(mut map) = self.inner.write() {
            map.remove(key);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_get_clear() {
        let session = InMemorySessionStore::new();
        assert!(!session.has("basket"));

        session.set("basket", "slug-1".to_string());
        assert_eq!(session.get("basket").as_deref(), Some("slug-1"));

        session.clear("basket");
        assert!(!session.has("basket"));
    }

    #[test]
    fn keys_are_independent() {
        let session = InMemorySessionStore::new();
        session.set("basket", "a".to_string());
        session.set("wishlist", "b".to_string());
        session.clear("basket");
        assert_eq!(session.get("wishlist").as_deref(), Some("b"));
    }
}
