//! Observable values the router publishes to the UI.
//!
//! A [`Store`] holds one value and notifies subscribers synchronously, in
//! subscription order, on every [`set`](Store::set). Updates are never
//! batched: a subscriber sees each published value exactly once, in
//! publication order. A `set` from inside a subscriber is queued and
//! delivered to everyone after the value being delivered. Subscribing
//! delivers the current value immediately.
//!
//! ```
//! use spa_navigator::Store;
//! use std::cell::RefCell;
//! use std::rc::Rc;
//!
//! let path = Store::new(String::new());
//! let seen = Rc::new(RefCell::new(Vec::new()));
//!
//! let sink = Rc::clone(&seen);
//! let id = path.subscribe(move |p: &String| sink.borrow_mut().push(p.clone()));
//! path.set("/about".to_string());
//! path.unsubscribe(id);
//! path.set("/ignored".to_string());
//!
//! assert_eq!(*seen.borrow(), vec!["".to_string(), "/about".to_string()]);
//! ```

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::fmt;
use std::rc::Rc;

/// Handle returned by [`Store::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Subscriber<T> = Rc<dyn Fn(&T)>;

/// A single-threaded observable value.
pub struct Store<T> {
    value: RefCell<T>,
    subscribers: RefCell<Vec<(SubscriptionId, Subscriber<T>)>>,
    next_id: Cell<u64>,
    /// Values published while subscribers were being notified.
    pending: RefCell<VecDeque<T>>,
    notifying: Cell<bool>,
}

impl<T: Clone> Store<T> {
    pub fn new(value: T) -> Self {
        Self {
            value: RefCell::new(value),
            subscribers: RefCell::new(Vec::new()),
            next_id: Cell::new(0),
            pending: RefCell::new(VecDeque::new()),
            notifying: Cell::new(false),
        }
    }

    /// A copy of the current value.
    pub fn get(&self) -> T {
        self.value.borrow().clone()
    }

    /// Read the current value without cloning it.
    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        f(&self.value.borrow())
    }

    /// Replace the value and notify every subscriber.
    ///
    /// Subscribers may read the store or publish again from inside the
    /// callback. A nested update takes effect immediately but is delivered
    /// only once every subscriber has seen the current one; the outermost
    /// call drains the queue before returning.
    pub fn set(&self, value: T) {
        *self.value.borrow_mut() = value.clone();
        self.pending.borrow_mut().push_back(value);

        if self.notifying.replace(true) {
            return;
        }

        loop {
            let Some(value) = self.pending.borrow_mut().pop_front() else {
                break;
            };
            let subscribers: Vec<Subscriber<T>> = self
                .subscribers
                .borrow()
                .iter()
                .map(|(_, subscriber)| Rc::clone(subscriber))
                .collect();

            for subscriber in subscribers {
                subscriber(&value);
            }
        }

        self.notifying.set(false);
    }

    /// Register a callback. It is called right away with the current value.
    pub fn subscribe(&self, subscriber: impl Fn(&T) + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_id.get());
        self.next_id.set(id.0 + 1);

        let subscriber: Subscriber<T> = Rc::new(subscriber);
        self.subscribers
            .borrow_mut()
            .push((id, Rc::clone(&subscriber)));

        let current = self.get();
        subscriber(&current);
        id
    }

    /// Remove a callback. Returns `false` if it was already removed.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut subscribers = self.subscribers.borrow_mut();
        let before = subscribers.len();
        subscribers.retain(|(existing, _)| *existing != id);
        subscribers.len() != before
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.borrow().len()
    }
}

impl<T: Clone + Default> Default for Store<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

impl<T: fmt::Debug> fmt::Debug for Store<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Store")
            .field("value", &self.value.borrow())
            .field("subscribers", &self.subscribers.borrow().len())
            .finish()
    }
}
