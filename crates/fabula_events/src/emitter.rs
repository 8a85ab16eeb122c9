//! The event emitter.
//!
//! Dispatch is synchronous and single-threaded. Listeners registered
//! for a specific event kind run before wildcard listeners, each group
//! ordered by descending priority; listeners with equal priority run
//! in registration order. A listener that returns an error is logged
//! and skipped, never aborting the dispatch.

use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::hash::Hash;
use std::rc::Rc;

use fabula_foundation::Result;

// ===== Event Trait =====

/// A value that can travel through an [`EventEmitter`].
///
/// The kind is the dispatch key: listeners subscribe to it with
/// [`EventEmitter::on`], or to every event with
/// [`EventEmitter::on_any`].
pub trait Event {
    /// The discriminant type listeners subscribe by.
    type Kind: Copy + Eq + Hash + fmt::Debug;

    /// The dispatch kind of this event.
    fn kind(&self) -> Self::Kind;
}

// ===== Listener Options =====

/// Options controlling how a listener is registered.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ListenerOptions {
    /// Deregister the listener after its first invocation.
    pub once: bool,
    /// Dispatch order within a group; higher runs first. Defaults to 0.
    pub priority: i32,
}

impl ListenerOptions {
    /// Options for a one-shot listener at default priority.
    #[must_use]
    pub fn once() -> Self {
        Self {
            once: true,
            ..Self::default()
        }
    }

    /// Options for a repeating listener at the given priority.
    #[must_use]
    pub fn priority(priority: i32) -> Self {
        Self {
            once: false,
            priority,
        }
    }
}

// ===== Listener Token =====

/// Handle returned from registration, used to remove a listener.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerToken(u64);

// ===== Registry =====

type Listener<E> = Rc<dyn Fn(&E) -> Result<()>>;

struct Registration<E> {
    token: ListenerToken,
    priority: i32,
    once: bool,
    callback: Listener<E>,
}

impl<E> Clone for Registration<E> {
    fn clone(&self) -> Self {
        Self {
            token: self.token,
            priority: self.priority,
            once: self.once,
            callback: Rc::clone(&self.callback),
        }
    }
}

struct Registry<E: Event> {
    named: HashMap<E::Kind, Vec<Registration<E>>>,
    wildcard: Vec<Registration<E>>,
    next_token: u64,
}

impl<E: Event> Registry<E> {
    fn new() -> Self {
        Self {
            named: HashMap::new(),
            wildcard: Vec::new(),
            next_token: 0,
        }
    }

    fn allocate_token(&mut self) -> ListenerToken {
        let token = ListenerToken(self.next_token);
        self.next_token += 1;
        token
    }

    fn remove(&mut self, token: ListenerToken) -> bool {
        for listeners in self.named.values_mut() {
            if let Some(index) = listeners.iter().position(|r| r.token == token) {
                listeners.remove(index);
                return true;
            }
        }
        if let Some(index) = self.wildcard.iter().position(|r| r.token == token) {
            self.wildcard.remove(index);
            return true;
        }
        false
    }
}

/// Inserts a registration keeping the list sorted by descending
/// priority; equal priorities keep registration order.
fn insert_sorted<E>(listeners: &mut Vec<Registration<E>>, registration: Registration<E>) {
    let index = listeners
        .iter()
        .position(|r| r.priority < registration.priority)
        .unwrap_or(listeners.len());
    listeners.insert(index, registration);
}

// ===== Event Emitter =====

/// A synchronous event emitter with kind-specific and wildcard
/// subscriptions.
///
/// # Examples
///
/// ```
/// use fabula_events::{Event, EventEmitter, ListenerOptions};
///
/// struct Ping;
///
/// impl Event for Ping {
///     type Kind = ();
///
///     fn kind(&self) {}
/// }
///
/// let emitter = EventEmitter::new();
/// emitter.on((), ListenerOptions::default(), |_: &Ping| Ok(()));
/// emitter.emit(&Ping);
/// ```
pub struct EventEmitter<E: Event> {
    registry: RefCell<Registry<E>>,
}

impl<E: Event> EventEmitter<E> {
    /// Creates an emitter with no listeners.
    #[must_use]
    pub fn new() -> Self {
        Self {
            registry: RefCell::new(Registry::new()),
        }
    }

    /// Registers a listener for events of the given kind.
    ///
    /// Returns a token that removes the listener via [`Self::off`].
    pub fn on(
        &self,
        kind: E::Kind,
        options: ListenerOptions,
        callback: impl Fn(&E) -> Result<()> + 'static,
    ) -> ListenerToken {
        let mut registry = self.registry.borrow_mut();
        let token = registry.allocate_token();
        let registration = Registration {
            token,
            priority: options.priority,
            once: options.once,
            callback: Rc::new(callback),
        };
        insert_sorted(registry.named.entry(kind).or_default(), registration);
        token
    }

    /// Registers a wildcard listener invoked for every event, after
    /// all listeners registered for the event's specific kind.
    pub fn on_any(
        &self,
        options: ListenerOptions,
        callback: impl Fn(&E) -> Result<()> + 'static,
    ) -> ListenerToken {
        let mut registry = self.registry.borrow_mut();
        let token = registry.allocate_token();
        let registration = Registration {
            token,
            priority: options.priority,
            once: options.once,
            callback: Rc::new(callback),
        };
        insert_sorted(&mut registry.wildcard, registration);
        token
    }

    /// Removes a listener by token.
    ///
    /// Returns `true` if the token was still registered.
    pub fn off(&self, token: ListenerToken) -> bool {
        self.registry.borrow_mut().remove(token)
    }

    /// Dispatches an event to every matching listener.
    ///
    /// The listener set is snapshotted before dispatch, so listeners
    /// added or removed during dispatch take effect on the next emit.
    /// One-shot listeners are deregistered before their callback runs.
    /// Listener errors are logged and suppressed.
    pub fn emit(&self, event: &E) {
        let snapshot: Vec<Registration<E>> = {
            let registry = self.registry.borrow();
            let mut snapshot: Vec<Registration<E>> = registry
                .named
                .get(&event.kind())
                .map(|listeners| listeners.to_vec())
                .unwrap_or_default();
            snapshot.extend(registry.wildcard.iter().cloned());
            snapshot
        };
        for registration in snapshot {
            if registration.once {
                // Remove before invoking so a re-entrant emit cannot
                // fire the listener a second time.
                self.registry.borrow_mut().remove(registration.token);
            }
            if let Err(error) = (registration.callback)(event) {
                tracing::error!(kind = ?event.kind(), %error, "event listener failed");
            }
        }
    }

    /// The number of listeners registered for a specific kind.
    ///
    /// Wildcard listeners are not counted.
    #[must_use]
    pub fn listener_count(&self, kind: E::Kind) -> usize {
        self.registry.borrow().named.get(&kind).map_or(0, Vec::len)
    }

    /// The number of wildcard listeners.
    #[must_use]
    pub fn wildcard_count(&self) -> usize {
        self.registry.borrow().wildcard.len()
    }

    /// Removes listeners.
    ///
    /// With a kind, removes the listeners registered for that kind.
    /// With `None`, removes every listener, wildcards included.
    pub fn remove_all(&self, kind: Option<E::Kind>) {
        let mut registry = self.registry.borrow_mut();
        match kind {
            Some(kind) => {
                registry.named.remove(&kind);
            }
            None => {
                registry.named.clear();
                registry.wildcard.clear();
            }
        }
    }
}

impl<E: Event> Default for EventEmitter<E> {
    fn default() -> Self {
        Self::new()
    }
}
