//! Change notification plumbing.
//!
//! Entities keep a [`Subscribers`] list and call [`Subscribers::notify`] after
//! each successful mutation. Only weak references are stored, so a subject
//! never keeps its observers alive; dropping the last `Rc` unsubscribes.

use std::fmt;
use std::rc::{Rc, Weak};

/// Receives change events synchronously.
pub trait Observer<E> {
    fn notify(&self, event: &E);
}

impl<E, F> Observer<E> for F
where
    F: Fn(&E),
{
    fn notify(&self, event: &E) {
        self(event);
    }
}

/// Non-owning list of observers for events of type `E`.
pub struct Subscribers<E> {
    observers: Vec<Weak<dyn Observer<E>>>,
}

impl<E> Subscribers<E> {
    pub const fn new() -> Self {
        Self {
            observers: Vec::new(),
        }
    }

    /// Register an observer. The caller keeps ownership.
    pub fn subscribe(&mut self, observer: &Rc<dyn Observer<E>>) {
        self.observers.push(Rc::downgrade(observer));
    }

    /// Deliver `event` to every live observer, dropping dead ones.
    pub fn notify(&mut self, event: &E) {
        self.observers.retain(|weak| match weak.upgrade() {
            Some(observer) => {
                observer.notify(event);
                true
            }
            None => false,
        });
    }

    /// Number of observers still alive.
    pub fn live_count(&self) -> usize {
        self.observers
            .iter()
            .filter(|weak| weak.strong_count() > 0)
            .count()
    }
}

impl<E> Default for Subscribers<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> fmt::Debug for Subscribers<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscribers")
            .field("live", &self.live_count())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    #[test]
    fn notify_reaches_live_observers() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        let observer: Rc<dyn Observer<u32>> = Rc::new(move |event: &u32| {
            sink.borrow_mut().push(*event);
        });

        let mut subscribers = Subscribers::new();
        subscribers.subscribe(&observer);
        subscribers.notify(&1);
        subscribers.notify(&2);

        assert_eq!(*seen.borrow(), vec![1, 2]);
    }

    #[test]
    fn dropped_observer_is_pruned() {
        let observer: Rc<dyn Observer<u32>> = Rc::new(|_: &u32| {});
        let mut subscribers = Subscribers::new();
        subscribers.subscribe(&observer);
        assert_eq!(subscribers.live_count(), 1);

        drop(observer);
        subscribers.notify(&7);
        assert_eq!(subscribers.live_count(), 0);
        assert!(subscribers.observers.is_empty());
    }
}
