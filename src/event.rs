use std::{
    cell::RefCell,
    pin::Pin,
    rc::Rc,
    task::{Context, Poll},
};

use derive_ex::derive_ex;
use futures::{
    channel::mpsc::{unbounded, UnboundedReceiver},
    Stream, StreamExt,
};
use slabmap::SlabMap;

use crate::Subscription;

#[cfg(test)]
mod tests;

/// A hot multicast event stream.
///
/// Subscribers receive only the events emitted while they are subscribed, in the order they
/// subscribed. Past events are not replayed.
#[derive_ex(Clone, bound())]
pub struct EventSource<E: 'static>(Rc<EventSourceNode<E>>);

impl<E: 'static> EventSource<E> {
    pub fn new() -> Self {
        Self(Rc::new(EventSourceNode {
            subscribers: RefCell::new(Subscribers {
                items: SlabMap::new(),
                seq_next: 0,
            }),
        }))
    }

    /// Calls `f` for every event emitted until the returned [`Subscription`] is dropped.
    pub fn subscribe(&self, f: impl Fn(&E) + 'static) -> Subscription {
        let key = self.0.subscribers.borrow_mut().insert(Rc::new(f));
        Subscription::from_weak_fn(Rc::downgrade(&self.0), move |node| node.unsubscribe(key))
    }

    /// Delivers `event` to the current subscribers.
    ///
    /// Subscribers added during delivery do not see this event,
    /// and subscribers removed during delivery are skipped.
    pub fn emit(&self, event: &E) {
        let targets = self.0.subscribers.borrow().targets();
        for (key, seq, f) in targets {
            if self.0.subscribers.borrow().is_live(key, seq) {
                f(event);
            }
        }
    }

    pub fn subscriber_count(&self) -> usize {
        self.0.subscribers.borrow().items.len()
    }

    /// Returns a [`Stream`] of the events emitted after this call.
    pub fn to_stream(&self) -> EventStream<E>
    where
        E: Clone,
    {
        let (sender, receiver) = unbounded();
        let subscription = self.subscribe(move |event: &E| {
            let _ = sender.unbounded_send(event.clone());
        });
        EventStream {
            receiver,
            _subscription: subscription,
        }
    }
}
impl<E: 'static> Default for EventSource<E> {
    fn default() -> Self {
        Self::new()
    }
}
impl<E: 'static> std::fmt::Debug for EventSource<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventSource")
            .field("subscribers", &self.subscriber_count())
            .finish()
    }
}

struct EventSourceNode<E: 'static> {
    subscribers: RefCell<Subscribers<E>>,
}
impl<E: 'static> EventSourceNode<E> {
    fn unsubscribe(&self, key: usize) {
        self.subscribers.borrow_mut().items.remove(key);
    }
}

type Handler<E> = Rc<dyn Fn(&E)>;

struct Subscribers<E: 'static> {
    items: SlabMap<Subscriber<E>>,
    seq_next: u64,
}
impl<E: 'static> Subscribers<E> {
    fn insert(&mut self, f: Handler<E>) -> usize {
        let seq = self.seq_next;
        self.seq_next += 1;
        self.items.insert(Subscriber { seq, f })
    }
    fn is_live(&self, key: usize, seq: u64) -> bool {
        self.items.get(key).is_some_and(|s| s.seq == seq)
    }

    // Slab keys are reused, so delivery order comes from `seq`.
    fn targets(&self) -> Vec<(usize, u64, Handler<E>)> {
        let mut targets: Vec<_> = self
            .items
            .iter()
            .map(|(key, s)| (key, s.seq, s.f.clone()))
            .collect();
        targets.sort_by_key(|&(_, seq, _)| seq);
        targets
    }
}

struct Subscriber<E: 'static> {
    seq: u64,
    f: Handler<E>,
}

/// A [`Stream`] created by [`EventSource::to_stream`].
///
/// The stream ends when its `EventSource` is dropped.
pub struct EventStream<E: 'static> {
    receiver: UnboundedReceiver<E>,
    _subscription: Subscription,
}
impl<E: 'static> Stream for EventStream<E> {
    type Item = E;
    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context) -> Poll<Option<Self::Item>> {
        self.receiver.poll_next_unpin(cx)
    }
}
