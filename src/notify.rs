//! Change notification between the provider and whoever displays its data.
//!
//! A notification carries nothing but the URI that changed; observers are
//! expected to query again.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use tracing::debug;

use crate::contract::ContentUri;

/// Sink for "data at this URI may have changed" signals.
pub trait ChangeNotifier {
    fn notify_change(&self, uri: &ContentUri);
}

impl<T: ChangeNotifier + ?Sized> ChangeNotifier for Rc<T> {
    fn notify_change(&self, uri: &ContentUri) {
        (**self).notify_change(uri)
    }
}

/// Notifier that drops every signal. Handy when nothing is watching.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopNotifier;

impl ChangeNotifier for NoopNotifier {
    fn notify_change(&self, _uri: &ContentUri) {}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObserverId(u64);

type Callback = Rc<dyn Fn(&ContentUri)>;

struct Registration {
    id: ObserverId,
    uri: ContentUri,
    notify_for_descendants: bool,
    callback: Callback,
}

impl Registration {
    /// An observer hears about its own URI, about anything beneath a URI it
    /// registered for with descendants, and about any ancestor of its URI.
    fn wants(&self, changed: &ContentUri) -> bool {
        if &self.uri == changed || self.uri.is_descendant_of(changed) {
            return true;
        }
        self.notify_for_descendants && changed.is_descendant_of(&self.uri)
    }
}

/// Observers keyed by the URI they registered against.
#[derive(Default)]
pub struct ObserverRegistry {
    observers: RefCell<Vec<Registration>>,
    next_id: Cell<u64>,
}

impl ObserverRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register<F>(&self, uri: ContentUri, notify_for_descendants: bool, callback: F) -> ObserverId
    where
        F: Fn(&ContentUri) + 'static,
    {
        let id = ObserverId(self.next_id.get());
        self.next_id.set(id.0 + 1);
        self.observers.borrow_mut().push(Registration {
            id,
            uri,
            notify_for_descendants,
            callback: Rc::new(callback),
        });
        id
    }

    /// Returns false when the id was never registered or already removed.
    pub fn unregister(&self, id: ObserverId) -> bool {
        let mut observers = self.observers.borrow_mut();
        let before = observers.len();
        observers.retain(|registration| registration.id != id);
        observers.len() != before
    }

    pub fn len(&self) -> usize {
        self.observers.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.observers.borrow().is_empty()
    }
}

impl ChangeNotifier for ObserverRegistry {
    fn notify_change(&self, uri: &ContentUri) {
        // Collect first so callbacks may register or unregister observers.
        let callbacks: Vec<Callback> = self
            .observers
            .borrow()
            .iter()
            .filter(|registration| registration.wants(uri))
            .map(|registration| Rc::clone(&registration.callback))
            .collect();

        debug!(%uri, observers = callbacks.len(), "notifying change");
        for callback in callbacks {
            callback(uri);
        }
    }
}
