#![forbid(unsafe_code)]

//! Subscriber registry for snapshot notifications.
//!
//! Callbacks run synchronously, in subscription order, inside the animator
//! operation that changed state. [`Subscribers::clear`] drops every callback;
//! animators call it on disposal so nothing can be invoked afterwards.

use std::fmt;

/// Handle returned by `subscribe`; pass it to `unsubscribe`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Callback<T> = Box<dyn FnMut(&T)>;

/// Ordered set of callbacks notified with `&T`.
pub struct Subscribers<T> {
    next_id: u64,
    entries: Vec<(SubscriptionId, Callback<T>)>,
}

impl<T> fmt::Debug for Subscribers<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscribers")
            .field("count", &self.entries.len())
            .finish()
    }
}

impl<T> Default for Subscribers<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Subscribers<T> {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            next_id: 0,
            entries: Vec::new(),
        }
    }

    /// Register a callback.
    pub fn subscribe(&mut self, callback: impl FnMut(&T) + 'static) -> SubscriptionId {
        self.next_id += 1;
        let id = SubscriptionId(self.next_id);
        self.entries.push((id, Box::new(callback)));
        id
    }

    /// Remove a callback. Returns `false` if `id` was not registered.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|(entry, _)| *entry != id);
        self.entries.len() < before
    }

    /// Invoke every callback with `value`.
    pub fn notify(&mut self, value: &T) {
        for (_, callback) in &mut self.entries {
            callback(value);
        }
    }

    /// Number of registered callbacks.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no callbacks are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drop every callback.
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn notifies_in_subscription_order() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut subs = Subscribers::<u32>::new();
        let a = Rc::clone(&log);
        subs.subscribe(move |v| a.borrow_mut().push(("a", *v)));
        let b = Rc::clone(&log);
        subs.subscribe(move |v| b.borrow_mut().push(("b", *v)));

        subs.notify(&7);
        assert_eq!(*log.borrow(), vec![("a", 7), ("b", 7)]);
    }

    #[test]
    fn unsubscribe_removes_only_that_callback() {
        let hits = Rc::new(RefCell::new(0));
        let mut subs = Subscribers::<()>::new();
        let h = Rc::clone(&hits);
        let id = subs.subscribe(move |_| *h.borrow_mut() += 1);
        let h = Rc::clone(&hits);
        subs.subscribe(move |_| *h.borrow_mut() += 10);

        assert!(subs.unsubscribe(id));
        assert!(!subs.unsubscribe(id));
        subs.notify(&());
        assert_eq!(*hits.borrow(), 10);
        assert_eq!(subs.len(), 1);
    }

    #[test]
    fn clear_drops_everything() {
        let mut subs = Subscribers::<()>::new();
        subs.subscribe(|_| {});
        subs.clear();
        assert!(subs.is_empty());
    }
}
