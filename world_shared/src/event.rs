//! Event and notification primitives.
//!
//! - `EventBus`: typed FIFO queues, drained once per frame by the session driver.
//! - `Notifier`: synchronous observer list for fixed-tag notifications.

use std::{
    any::{Any, TypeId},
    collections::HashMap,
};

/// Typed event bus.
#[derive(Default)]
pub struct EventBus {
    queues: HashMap<TypeId, Box<dyn Any>>,
}

impl EventBus {
    /// Pushes an event into the queue.
    pub fn push<E: 'static>(&mut self, e: E) {
        let q = self
            .queues
            .entry(TypeId::of::<E>())
            .or_insert_with(|| Box::new(Vec::<E>::new()));
        let q = q.downcast_mut::<Vec<E>>().expect("queue type mismatch");
        q.push(e);
    }

    /// Drains all queued events of a type, oldest first.
    pub fn drain<E: 'static>(&mut self) -> Vec<E> {
        self.queues
            .remove(&TypeId::of::<E>())
            .and_then(|boxed| boxed.downcast::<Vec<E>>().ok())
            .map(|boxed| *boxed)
            .unwrap_or_default()
    }

    /// Number of queued events of a type.
    pub fn pending<E: 'static>(&self) -> usize {
        self.queues
            .get(&TypeId::of::<E>())
            .and_then(|boxed| boxed.downcast_ref::<Vec<E>>())
            .map_or(0, Vec::len)
    }
}

/// Handle returned by [`Notifier::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObserverId(u64);

type Observer<E> = Box<dyn FnMut(&E)>;

/// Observer list. Observers run in subscription order.
pub struct Notifier<E> {
    next_id: u64,
    observers: Vec<(ObserverId, Observer<E>)>,
}

impl<E> Default for Notifier<E> {
    fn default() -> Self {
        Self {
            next_id: 0,
            observers: Vec::new(),
        }
    }
}

impl<E> Notifier<E> {
    pub fn subscribe(&mut self, observer: impl FnMut(&E) + 'static) -> ObserverId {
        let id = ObserverId(self.next_id);
        self.next_id += 1;
        self.observers.push((id, Box::new(observer)));
        id
    }

    /// Removes an observer. Returns false if it was not subscribed.
    pub fn unsubscribe(&mut self, id: ObserverId) -> bool {
        let before = self.observers.len();
        self.observers.retain(|(oid, _)| *oid != id);
        self.observers.len() != before
    }

    pub fn emit(&mut self, event: &E) {
        for (_, observer) in &mut self.observers {
            observer(event);
        }
    }

    pub fn len(&self) -> usize {
        self.observers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observers.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use std::{cell::RefCell, rc::Rc};

    use super::*;

    #[test]
    fn bus_drains_per_type_in_order() {
        let mut bus = EventBus::default();
        bus.push(1u32);
        bus.push("a");
        bus.push(2u32);
        assert_eq!(bus.pending::<u32>(), 2);
        assert_eq!(bus.drain::<u32>(), vec![1, 2]);
        assert!(bus.drain::<u32>().is_empty());
        assert_eq!(bus.drain::<&str>(), vec!["a"]);
    }

    #[test]
    fn notifier_delivers_until_unsubscribed() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let mut n = Notifier::<u8>::default();
        let sink = seen.clone();
        let id = n.subscribe(move |e| sink.borrow_mut().push(*e));

        n.emit(&1);
        assert!(n.unsubscribe(id));
        assert!(!n.unsubscribe(id));
        n.emit(&2);

        assert_eq!(*seen.borrow(), vec![1]);
        assert!(n.is_empty());
    }
}
