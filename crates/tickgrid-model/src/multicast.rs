#![deny(unsafe_code)]

//! Single-threaded multi-subscriber change notification.
//!
//! [`Multicast`] is the one event primitive in the data layer. Every record
//! and value source owns independent instances per event kind; there is no
//! ordering guarantee across instances.
//!
//! Dispatch works on a snapshot of the handler list taken when `publish`
//! begins: handlers removed during a publish still receive the in-flight
//! event, handlers added during a publish do not. Reentrant publishing from
//! inside a handler is allowed.

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

/// Identifies one registered handler within its [`Multicast`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

struct Entry<E> {
    id: u64,
    handler: Rc<dyn Fn(&E)>,
}

struct Inner<E> {
    entries: RefCell<Vec<Entry<E>>>,
    next_id: Cell<u64>,
}

/// Anything a [`Subscription`] guard can detach from. Object-safe so the
/// guard does not carry the event type.
trait Unsubscribe {
    fn remove(&self, id: u64) -> bool;
}

impl<E> Unsubscribe for Inner<E> {
    fn remove(&self, id: u64) -> bool {
        let mut entries = self.entries.borrow_mut();
        let before = entries.len();
        entries.retain(|entry| entry.id != id);
        entries.len() != before
    }
}

/// Multi-subscriber event register for single-threaded use.
///
/// Not `Send` or `Sync`; all publishing and subscribing happens on the one
/// event thread, so there is no locking anywhere.
pub struct Multicast<E> {
    inner: Rc<Inner<E>>,
}

impl<E> Default for Multicast<E> {
    fn default() -> Self {
        Multicast::new()
    }
}

impl<E> Clone for Multicast<E> {
    fn clone(&self) -> Self {
        Multicast {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<E> Multicast<E> {
    pub fn new() -> Self {
        Multicast {
            inner: Rc::new(Inner {
                entries: RefCell::new(Vec::new()),
                next_id: Cell::new(0),
            }),
        }
    }

    /// Number of currently registered handlers.
    pub fn subscriber_count(&self) -> usize {
        self.inner.entries.borrow().len()
    }

    /// Removes a handler. Unknown or already-removed ids are a tolerated
    /// no-op returning `false`.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.inner.remove(id.0)
    }

    /// Dispatches `event` to a snapshot of the current handlers, in
    /// subscription order.
    pub fn publish(&self, event: &E) {
        let snapshot: Vec<Rc<dyn Fn(&E)>> = self
            .inner
            .entries
            .borrow()
            .iter()
            .map(|entry| Rc::clone(&entry.handler))
            .collect();
        for handler in snapshot {
            handler(event);
        }
    }
}

impl<E: 'static> Multicast<E> {
    /// Registers a handler and returns its id. Handlers run synchronously
    /// inside `publish`, in subscription order.
    pub fn subscribe(&self, handler: impl Fn(&E) + 'static) -> SubscriptionId {
        let id = self.inner.next_id.get();
        self.inner.next_id.set(id + 1);
        self.inner.entries.borrow_mut().push(Entry {
            id,
            handler: Rc::new(handler),
        });
        SubscriptionId(id)
    }

    /// Registers a handler owned by an RAII guard; dropping the guard
    /// unsubscribes. Dropping after the channel itself is gone is a no-op.
    pub fn subscribe_scoped(&self, handler: impl Fn(&E) + 'static) -> Subscription {
        let id = self.subscribe(handler);
        let weak: Weak<Inner<E>> = Rc::downgrade(&self.inner);
        Subscription {
            target: weak,
            id: id.0,
        }
    }
}

/// RAII handle for one registered handler. The handler stays registered for
/// exactly as long as the guard is alive.
pub struct Subscription {
    target: Weak<dyn Unsubscribe>,
    id: u64,
}

impl Subscription {
    /// Detaches immediately instead of waiting for drop.
    pub fn cancel(self) {
        drop(self);
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(target) = self.target.upgrade() {
            target.remove(self.id);
        }
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription").field("id", &self.id).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn recorder() -> (Rc<RefCell<Vec<i32>>>, impl Fn(&i32) + 'static) {
        let log = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&log);
        (log, move |event: &i32| sink.borrow_mut().push(*event))
    }

    #[test]
    fn test_handlers_run_in_subscription_order() {
        let channel = Multicast::new();
        let log = Rc::new(RefCell::new(Vec::new()));
        for tag in ["a", "b", "c"] {
            let sink = Rc::clone(&log);
            channel.subscribe(move |_: &()| sink.borrow_mut().push(tag));
        }
        channel.publish(&());
        assert_eq!(*log.borrow(), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_unsubscribe_is_idempotent() {
        let channel = Multicast::new();
        let (_log, handler) = recorder();
        let id = channel.subscribe(handler);
        assert!(channel.unsubscribe(id));
        assert!(!channel.unsubscribe(id), "second removal must be a no-op");
        assert_eq!(channel.subscriber_count(), 0);
        channel.publish(&7);
    }

    #[test]
    fn test_handler_removed_during_publish_still_receives_event() {
        let channel: Multicast<i32> = Multicast::new();
        let (log, handler) = recorder();
        let late_id = Rc::new(Cell::new(None));

        let removal_target = Rc::clone(&late_id);
        let remover = channel.clone();
        channel.subscribe(move |_| {
            if let Some(id) = removal_target.get() {
                remover.unsubscribe(id);
            }
        });
        late_id.set(Some(channel.subscribe(handler)));

        channel.publish(&1);
        assert_eq!(*log.borrow(), vec![1], "snapshot keeps the removed handler");
        channel.publish(&2);
        assert_eq!(*log.borrow(), vec![1], "removal applies to later publishes");
    }

    #[test]
    fn test_handler_added_during_publish_waits_for_next_event() {
        let channel: Multicast<i32> = Multicast::new();
        let log = Rc::new(RefCell::new(Vec::new()));

        let adder_channel = channel.clone();
        let adder_log = Rc::clone(&log);
        let added = Cell::new(false);
        channel.subscribe(move |event: &i32| {
            adder_log.borrow_mut().push(("outer", *event));
            if !added.get() {
                added.set(true);
                let inner_log = Rc::clone(&adder_log);
                adder_channel.subscribe(move |event: &i32| {
                    inner_log.borrow_mut().push(("inner", *event));
                });
            }
        });

        channel.publish(&1);
        channel.publish(&2);
        assert_eq!(
            *log.borrow(),
            vec![("outer", 1), ("outer", 2), ("inner", 2)],
            "handler subscribed mid-publish must not see the in-flight event"
        );
    }

    #[test]
    fn test_scoped_subscription_detaches_on_drop() {
        let channel: Multicast<i32> = Multicast::new();
        let (log, handler) = recorder();
        {
            let _guard = channel.subscribe_scoped(handler);
            channel.publish(&1);
            assert_eq!(channel.subscriber_count(), 1);
        }
        assert_eq!(channel.subscriber_count(), 0);
        channel.publish(&2);
        assert_eq!(*log.borrow(), vec![1]);
    }

    #[test]
    fn test_guard_outliving_channel_is_harmless() {
        let guard = {
            let channel: Multicast<()> = Multicast::new();
            channel.subscribe_scoped(|_| {})
        };
        drop(guard);
    }

    #[test]
    fn test_channels_are_independent() {
        let a: Multicast<i32> = Multicast::new();
        let b: Multicast<i32> = Multicast::new();
        let (log, handler) = recorder();
        a.subscribe(handler);
        b.publish(&9);
        assert!(log.borrow().is_empty());
        a.publish(&3);
        assert_eq!(*log.borrow(), vec![3]);
    }
}
