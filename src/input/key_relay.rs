//! Global key-press relay: forwards every key-down to at most one handler.
//!
//! Registering a handler replaces the previous one, so a page taking focus
//! never receives another page's shortcuts.

use std::sync::{Arc, RwLock};

type Handler = Arc<dyn Fn(&str) + Send + Sync>;

#[derive(Default)]
pub struct KeyRelay {
    handler: RwLock<Option<Handler>>,
}

impl KeyRelay {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register<F>(&self, handler: F)
    where
        F: Fn(&str) + Send + Sync + 'static,
    {
        match self.handler.write() {
            Ok(mut slot) => *slot = Some(Arc::new(handler)),
            Err(_) => tracing::warn!("Key relay lock poisoned, handler not registered"),
        }
    }

    pub fn unregister(&self) {
        if let Ok(mut slot) = self.handler.write() {
            *slot = None;
        }
    }

    pub fn is_registered(&self) -> bool {
        self.handler.read().map(|slot| slot.is_some()).unwrap_or(false)
    }

    /// Deliver a key-down. Returns whether a handler received it.
    pub fn dispatch(&self, key: &str) -> bool {
        // Clone out so the handler may re-register without deadlocking.
        let handler = match self.handler.read() {
            Ok(slot) => slot.clone(),
            Err(_) => return false,
        };
        match handler {
            Some(handler) => {
                handler(key);
                true
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    fn recorder() -> (Arc<Mutex<Vec<String>>>, impl Fn(&str) + Send + Sync + 'static) {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = seen.clone();
        (seen, move |key: &str| sink.lock().unwrap().push(key.to_string()))
    }

    #[test]
    fn dispatch_without_handler_is_dropped() {
        let relay = KeyRelay::new();
        assert!(!relay.dispatch("F1"));
        assert!(!relay.is_registered());
    }

    #[test]
    fn register_replaces_previous_handler() {
        let relay = KeyRelay::new();
        let (first, h1) = recorder();
        let (second, h2) = recorder();

        relay.register(h1);
        assert!(relay.dispatch("a"));
        relay.register(h2);
        assert!(relay.dispatch("b"));

        assert_eq!(*first.lock().unwrap(), vec!["a"]);
        assert_eq!(*second.lock().unwrap(), vec!["b"]);
    }

    #[test]
    fn unregister_stops_delivery() {
        let relay = KeyRelay::new();
        let (seen, handler) = recorder();
        relay.register(handler);
        relay.unregister();
        assert!(!relay.dispatch("Escape"));
        assert!(seen.lock().unwrap().is_empty());
    }

    #[test]
    fn handler_may_unregister_itself() {
        let relay = Arc::new(KeyRelay::new());
        let inner = relay.clone();
        relay.register(move |_| inner.unregister());
        assert!(relay.dispatch("Enter"));
        assert!(!relay.is_registered());
    }
}
