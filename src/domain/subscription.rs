//! Observer registry and cancellable handles.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use dashmap::DashMap;

type Callback<T> = Arc<dyn Fn(&T) + Send + Sync>;

/// Fan-out registry for one event kind.
///
/// Every subscriber gets every published event independently; nothing is
/// serialized or deduplicated across subscribers, so several connections
/// may watch the same resource at once.
pub struct EventBus<T> {
    subscribers: Arc<DashMap<u64, Callback<T>>>,
    next_id: AtomicU64,
}

impl<T: 'static> EventBus<T> {
    pub fn new() -> Self {
        Self {
            subscribers: Arc::new(DashMap::new()),
            next_id: AtomicU64::new(0),
        }
    }

    /// Deliver `event` to every current subscriber.
    pub fn publish(&self, event: &T) {
        for entry in self.subscribers.iter() {
            (entry.value())(event);
        }
    }

    /// Register a callback; the returned handle removes it again.
    pub fn subscribe(&self, callback: impl Fn(&T) + Send + Sync + 'static) -> Subscription {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        self.subscribers.insert(id, Arc::new(callback));
        let subscribers = Arc::clone(&self.subscribers);
        Subscription::new(move || {
            subscribers.remove(&id);
        })
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }
}

impl<T: 'static> Default for EventBus<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Handle to an active subscription. Cancellation is explicit; dropping
/// the handle without cancelling leaves the subscription live.
pub struct Subscription {
    cancel: Option<Box<dyn FnOnce() + Send>>,
}

impl Subscription {
    pub fn new(cancel: impl FnOnce() + Send + 'static) -> Self {
        Self {
            cancel: Some(Box::new(cancel)),
        }
    }

    pub fn cancel(mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("cancelled", &self.cancel.is_none())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;

    #[test]
    fn test_publish_reaches_every_subscriber() {
        let bus: EventBus<u32> = EventBus::new();
        let first = Arc::new(AtomicUsize::new(0));
        let second = Arc::new(AtomicUsize::new(0));
        let a = first.clone();
        let b = second.clone();
        let _sub_a = bus.subscribe(move |event| {
            a.fetch_add(*event as usize, Ordering::SeqCst);
        });
        let _sub_b = bus.subscribe(move |event| {
            b.fetch_add(*event as usize, Ordering::SeqCst);
        });
        bus.publish(&3);
        assert_eq!(first.load(Ordering::SeqCst), 3);
        assert_eq!(second.load(Ordering::SeqCst), 3);
    }

    #[test]
    fn test_cancel_removes_subscriber() {
        let bus: EventBus<u32> = EventBus::new();
        let hits = Arc::new(AtomicUsize::new(0));
        let counter = hits.clone();
        let subscription = bus.subscribe(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        });
        bus.publish(&1);
        subscription.cancel();
        bus.publish(&1);
        assert_eq!(hits.load(Ordering::SeqCst), 1);
        assert_eq!(bus.subscriber_count(), 0);
    }

    #[test]
    fn test_independent_fanout_per_subscription() {
        let bus: EventBus<u32> = EventBus::new();
        let _one = bus.subscribe(|_| {});
        let _two = bus.subscribe(|_| {});
        assert_eq!(bus.subscriber_count(), 2);
    }
}
