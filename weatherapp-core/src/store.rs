//! Single-slot observable holder for the latest `WeatherInfo`.

use std::{
    fmt,
    sync::{
        Arc, Weak,
        atomic::{AtomicU64, Ordering},
    },
};

use arc_swap::ArcSwapOption;
use parking_lot::{Mutex, ReentrantMutex};

use crate::model::WeatherInfo;

type Callback = Arc<dyn Fn(&Arc<WeatherInfo>) + Send + Sync>;

/// Holds the most recently published `WeatherInfo` and notifies subscribers.
///
/// The slot is replaced atomically, so readers never observe a partial value.
/// There is no history: a subscriber added after a publish is not called for
/// it and should read [`latest`](Self::latest) to catch up.
///
/// Publishes are serialized, so every subscriber sees values in the same order
/// and the last value delivered is the one [`latest`](Self::latest) returns.
#[derive(Default)]
pub struct WeatherInfoStore {
    slot: ArcSwapOption<WeatherInfo>,
    // Reentrant so a callback may publish.
    publishing: ReentrantMutex<()>,
    subscribers: Mutex<Vec<(u64, Callback)>>,
    next_id: AtomicU64,
}

impl fmt::Debug for WeatherInfoStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WeatherInfoStore")
            .field("has_value", &self.slot.load().is_some())
            .field("subscribers", &self.subscribers.lock().len())
            .finish()
    }
}

impl WeatherInfoStore {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Replace the slot and call every subscriber, in subscription order.
    ///
    /// Callbacks run on the publishing thread and must not block.
    pub fn publish(&self, info: impl Into<Arc<WeatherInfo>>) {
        let info = info.into();
        let _publishing = self.publishing.lock();
        self.slot.store(Some(Arc::clone(&info)));

        // Snapshot so callbacks may subscribe or unsubscribe without deadlocking.
        let callbacks: Vec<Callback> = self
            .subscribers
            .lock()
            .iter()
            .map(|(_, cb)| Arc::clone(cb))
            .collect();

        for callback in callbacks {
            callback(&info);
        }
    }

    pub fn latest(&self) -> Option<Arc<WeatherInfo>> {
        self.slot.load_full()
    }

    /// Register a callback for future publishes. Dropping the handle unsubscribes.
    pub fn subscribe<F>(self: &Arc<Self>, callback: F) -> Subscription
    where
        F: Fn(&Arc<WeatherInfo>) + Send + Sync + 'static,
    {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let callback: Callback = Arc::new(callback);
        self.subscribers.lock().push((id, callback));

        Subscription {
            id,
            store: Arc::downgrade(self),
        }
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.lock().len()
    }

    fn unsubscribe(&self, id: u64) {
        self.subscribers.lock().retain(|(sub_id, _)| *sub_id != id);
    }
}

/// Handle returned by [`WeatherInfoStore::subscribe`].
#[derive(Debug)]
#[must_use = "dropping a Subscription unsubscribes immediately"]
pub struct Subscription {
    id: u64,
    store: Weak<WeatherInfoStore>,
}

impl Subscription {
    pub fn unsubscribe(self) {}
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(store) = self.store.upgrade() {
            store.unsubscribe(self.id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse;

    fn info(dt: i64) -> WeatherInfo {
        parse(&format!(r#"{{"current": {{"dt": {dt}}}}}"#)).expect("valid document")
    }

    #[test]
    fn empty_store_has_no_value() {
        let store = WeatherInfoStore::new();
        assert!(store.latest().is_none());
    }

    #[test]
    fn last_write_wins() {
        let store = WeatherInfoStore::new();
        store.publish(info(1));
        store.publish(info(2));

        let latest = store.latest().expect("value published");
        assert_eq!(latest.current.dt, 2);
    }

    #[test]
    fn late_subscriber_misses_earlier_publishes() {
        let store = WeatherInfoStore::new();
        store.publish(info(1));
        store.publish(info(2));

        let calls = Arc::new(Mutex::new(Vec::new()));
        let seen = Arc::clone(&calls);
        let _sub = store.subscribe(move |info| seen.lock().push(info.current.dt));

        assert!(calls.lock().is_empty());
        assert_eq!(store.latest().map(|i| i.current.dt), Some(2));
    }

    #[test]
    fn every_subscriber_sees_every_publish_in_order() {
        let store = WeatherInfoStore::new();
        let log = Arc::new(Mutex::new(Vec::new()));

        let first = Arc::clone(&log);
        let _a = store.subscribe(move |info| first.lock().push(("a", info.current.dt)));
        let second = Arc::clone(&log);
        let _b = store.subscribe(move |info| second.lock().push(("b", info.current.dt)));

        store.publish(info(1));
        store.publish(info(2));

        assert_eq!(
            *log.lock(),
            vec![("a", 1), ("b", 1), ("a", 2), ("b", 2)]
        );
    }

    #[test]
    fn overlapping_publishes_reach_subscribers_in_slot_order() {
        let store = WeatherInfoStore::new();
        let (entered_tx, entered_rx) = std::sync::mpsc::channel();
        let entered_tx = Mutex::new(entered_tx);

        // Stall the first delivery so a second publisher runs into it.
        let _slow = store.subscribe(move |published| {
            if published.current.dt == 1 {
                let _ = entered_tx.lock().send(());
                std::thread::sleep(std::time::Duration::from_millis(100));
            }
        });
        let seen = Arc::new(Mutex::new(Vec::new()));
        let log = Arc::clone(&seen);
        let _record = store.subscribe(move |info| log.lock().push(info.current.dt));

        let first = {
            let store = Arc::clone(&store);
            std::thread::spawn(move || store.publish(info(1)))
        };
        entered_rx.recv().expect("first publish reached subscriber");
        let second = {
            let store = Arc::clone(&store);
            std::thread::spawn(move || store.publish(info(2)))
        };
        first.join().expect("first publisher");
        second.join().expect("second publisher");

        assert_eq!(*seen.lock(), vec![1, 2]);
        assert_eq!(store.latest().map(|i| i.current.dt), Some(2));
    }

    #[test]
    fn callback_may_publish() {
        let store = WeatherInfoStore::new();
        let store_ref = Arc::clone(&store);
        let _sub = store.subscribe(move |published| {
            if published.current.dt == 1 {
                store_ref.publish(info(2));
            }
        });

        store.publish(info(1));
        assert_eq!(store.latest().map(|i| i.current.dt), Some(2));
    }

    #[test]
    fn dropping_subscription_stops_notifications() {
        let store = WeatherInfoStore::new();
        let count = Arc::new(AtomicU64::new(0));

        let counter = Arc::clone(&count);
        let sub = store.subscribe(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        });
        store.publish(info(1));
        assert_eq!(store.subscriber_count(), 1);

        sub.unsubscribe();
        store.publish(info(2));

        assert_eq!(count.load(Ordering::SeqCst), 1);
        assert_eq!(store.subscriber_count(), 0);
    }

    #[test]
    fn callback_may_subscribe_during_publish() {
        let store = WeatherInfoStore::new();
        let inner = Arc::new(Mutex::new(Vec::new()));

        let store_ref = Arc::clone(&store);
        let holder = Arc::clone(&inner);
        let _sub = store.subscribe(move |_| {
            holder.lock().push(store_ref.subscribe(|_| {}));
        });

        store.publish(info(1));
        assert_eq!(store.subscriber_count(), 2);
    }

    #[test]
    fn subscription_outliving_store_is_harmless() {
        let store = WeatherInfoStore::new();
        let sub = store.subscribe(|_| {});
        drop(store);
        drop(sub);
    }
}
