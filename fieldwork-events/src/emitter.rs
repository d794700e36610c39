//! Event emitter implementation

use crate::error::{EventError, Result};
use dashmap::DashMap;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use tracing::{debug, trace};

/// Listener callback. Returning `false` makes `fire_event` report failure.
pub type Listener<P> = Arc<dyn Fn(&P) -> bool + Send + Sync>;

/// Handle returned by `add_listener`, used to remove the listener later
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ListenerId {
    /// Event name
    pub event: String,

    /// Registration number, unique per emitter
    pub id: u64,
}

/// Named-event emitter.
///
/// Cloning an emitter shares its listeners.
pub struct EventEmitter<P> {
    /// Listeners per event name, keyed by registration number
    listeners: Arc<DashMap<String, BTreeMap<u64, Listener<P>>>>,

    /// Last issued registration number
    counter: Arc<AtomicU64>,

    /// Whether listeners are notified
    observing: Arc<AtomicBool>,
}

impl<P> EventEmitter<P> {
    /// Create new emitter
    pub fn new() -> Self {
        Self {
            listeners: Arc::new(DashMap::new()),
            counter: Arc::new(AtomicU64::new(0)),
            observing: Arc::new(AtomicBool::new(true)),
        }
    }

    /// Register a listener for `event`
    ///
    /// # Examples
    ///
    /// ```
    /// use fieldwork_events::EventEmitter;
    ///
    /// let emitter = EventEmitter::<String>::new();
    /// let id = emitter.add_listener("saved", |name: &String| !name.is_empty());
    ///
    /// assert!(emitter.fire_event("saved", &"report".to_string()));
    /// emitter.remove_listener(&id).unwrap();
    /// ```
    pub fn add_listener<F>(&self, event: impl Into<String>, listener: F) -> ListenerId
    where
        F: Fn(&P) -> bool + Send + Sync + 'static,
    {
        let event = event.into();
        let id = self.counter.fetch_add(1, Ordering::SeqCst) + 1;

        self.listeners
            .entry(event.clone())
            .or_default()
            .insert(id, Arc::new(listener));

        debug!("Added listener {} for event: {}", id, event);
        ListenerId { event, id }
    }

    /// Register several listeners at once
    pub fn add_listeners<I, F>(&self, listeners: I) -> Vec<ListenerId>
    where
        I: IntoIterator<Item = (String, F)>,
        F: Fn(&P) -> bool + Send + Sync + 'static,
    {
        listeners
            .into_iter()
            .map(|(event, listener)| self.add_listener(event, listener))
            .collect()
    }

    /// Remove a listener
    pub fn remove_listener(&self, id: &ListenerId) -> Result<()> {
        let removed = self
            .listeners
            .get_mut(&id.event)
            .and_then(|mut listeners| listeners.remove(&id.id));

        match removed {
            Some(_) => {
                debug!("Removed listener {} for event: {}", id.id, id.event);
                Ok(())
            }
            None => Err(EventError::ListenerNotFound {
                event: id.event.clone(),
                id: id.id,
            }),
        }
    }

    /// Remove several listeners, stopping at the first unknown one
    pub fn remove_listeners<'a, I>(&self, ids: I) -> Result<()>
    where
        I: IntoIterator<Item = &'a ListenerId>,
    {
        for id in ids {
            self.remove_listener(id)?;
        }
        Ok(())
    }

    /// Notify every listener of `event`, in registration order.
    ///
    /// Returns `false` if any listener returned `false`. Every listener runs
    /// regardless. While events are stopped nothing runs and `true` is
    /// returned.
    pub fn fire_event(&self, event: &str, payload: &P) -> bool {
        if !self.is_observing() {
            trace!("Events stopped, skipping: {}", event);
            return true;
        }

        // Snapshot so listeners may add or remove listeners
        let listeners: Vec<Listener<P>> = match self.listeners.get(event) {
            Some(listeners) => listeners.values().cloned().collect(),
            None => return true,
        };

        trace!("Firing event {} to {} listeners", event, listeners.len());

        let mut response = true;
        for listener in listeners {
            if !listener(payload) {
                response = false;
            }
        }
        response
    }

    /// Stop notifying listeners
    pub fn stop_events(&self) {
        self.observing.store(false, Ordering::SeqCst);
        debug!("Event notification stopped");
    }

    /// Resume notifying listeners
    pub fn resume_events(&self) {
        self.observing.store(true, Ordering::SeqCst);
        debug!("Event notification resumed");
    }

    pub fn is_observing(&self) -> bool {
        self.observing.load(Ordering::SeqCst)
    }

    /// Remove every listener
    pub fn clear_listeners(&self) {
        self.listeners.clear();
        debug!("Cleared all listeners");
    }

    /// Number of listeners registered for `event`
    pub fn listener_count(&self, event: &str) -> usize {
        self.listeners.get(event).map(|l| l.len()).unwrap_or(0)
    }
}

impl<P> Clone for EventEmitter<P> {
    fn clone(&self) -> Self {
        Self {
            listeners: Arc::clone(&self.listeners),
            counter: Arc::clone(&self.counter),
            observing: Arc::clone(&self.observing),
        }
    }
}

impl<P> Default for EventEmitter<P> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P> fmt::Debug for EventEmitter<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventEmitter")
            .field("events", &self.listeners.len())
            .field("observing", &self.is_observing())
            .finish()
    }
}

/// Gives any owner of an [`EventEmitter`] the emitter's surface.
pub trait Observable {
    type Payload;

    fn emitter(&self) -> &EventEmitter<Self::Payload>;

    fn add_listener<F>(&self, event: impl Into<String>, listener: F) -> ListenerId
    where
        F: Fn(&Self::Payload) -> bool + Send + Sync + 'static,
    {
        self.emitter().add_listener(event, listener)
    }

    fn remove_listener(&self, id: &ListenerId) -> Result<()> {
        self.emitter().remove_listener(id)
    }

    fn fire_event(&self, event: &str, payload: &Self::Payload) -> bool {
        self.emitter().fire_event(event, payload)
    }

    fn stop_events(&self) {
        self.emitter().stop_events()
    }

    fn resume_events(&self) {
        self.emitter().resume_events()
    }

    fn clear_listeners(&self) {
        self.emitter().clear_listeners()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;
    use std::sync::atomic::AtomicU32;

    #[test]
    fn test_fire_event_calls_listeners() {
        let emitter = EventEmitter::<u32>::new();
        let total = Arc::new(AtomicU32::new(0));
        let t = total.clone();

        emitter.add_listener("add", move |n: &u32| {
            t.fetch_add(*n, Ordering::SeqCst);
            true
        });

        assert!(emitter.fire_event("add", &5));
        assert!(emitter.fire_event("add", &2));
        assert!(emitter.fire_event("other", &100));
        assert_eq!(total.load(Ordering::SeqCst), 7);
    }

    #[test]
    fn test_listeners_run_in_registration_order() {
        let emitter = EventEmitter::<()>::new();
        let order = Arc::new(Mutex::new(Vec::new()));

        for i in 0..3 {
            let order = order.clone();
            emitter.add_listener("tick", move |_| {
                order.lock().unwrap().push(i);
                true
            });
        }

        emitter.fire_event("tick", &());
        assert_eq!(*order.lock().unwrap(), vec![0, 1, 2]);
    }

    #[test]
    fn test_false_listener_fails_event_but_others_run() {
        let emitter = EventEmitter::<()>::new();
        let calls = Arc::new(AtomicU32::new(0));

        emitter.add_listener("save", |_| false);
        let c = calls.clone();
        emitter.add_listener("save", move |_| {
            c.fetch_add(1, Ordering::SeqCst);
            true
        });

        assert!(!emitter.fire_event("save", &()));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_ids_are_increasing() {
        let emitter = EventEmitter::<()>::new();
        let a = emitter.add_listener("a", |_| true);
        let b = emitter.add_listener("b", |_| true);
        assert!(b.id > a.id);
        assert_eq!(b.event, "b");
    }

    #[test]
    fn test_remove_unknown_listener() {
        let emitter = EventEmitter::<()>::new();
        let id = emitter.add_listener("a", |_| true);

        emitter.remove_listener(&id).unwrap();
        assert_eq!(emitter.listener_count("a"), 0);
        assert!(matches!(
            emitter.remove_listener(&id),
            Err(EventError::ListenerNotFound { .. })
        ));
    }

    #[test]
    fn test_stop_and_resume() {
        let emitter = EventEmitter::<()>::new();
        emitter.add_listener("a", |_| false);

        emitter.stop_events();
        assert!(emitter.fire_event("a", &()));

        emitter.resume_events();
        assert!(!emitter.fire_event("a", &()));
    }

    #[test]
    fn test_clone_shares_listeners() {
        let emitter = EventEmitter::<()>::new();
        let clone = emitter.clone();
        clone.add_listener("a", |_| true);
        assert_eq!(emitter.listener_count("a"), 1);
    }
}
