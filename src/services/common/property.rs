use std::{
    fmt::Debug,
    sync::{Mutex, MutexGuard, PoisonError},
};

use futures::stream::Stream;
use tokio::sync::watch;
use tokio_stream::wrappers::WatchStream;

/// A reactive value with a single writer and any number of watchers.
///
/// Every write replaces the value wholesale. Writes that produce an equal
/// value are not published. After `close()` the last value stays readable
/// but watch streams end and further writes are ignored.
pub struct Property<T: Clone + Send + Sync + 'static> {
    tx: Mutex<Option<watch::Sender<T>>>,
    rx: watch::Receiver<T>,
}

impl<T: Clone + PartialEq + Send + Sync + 'static> Property<T> {
    /// Create a new property with an initial value.
    pub fn new(initial: T) -> Self {
        let (tx, rx) = watch::channel(initial);
        Self {
            tx: Mutex::new(Some(tx)),
            rx,
        }
    }

    fn sender(&self) -> MutexGuard<'_, Option<watch::Sender<T>>> {
        self.tx.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Derive the next value from the current one and publish it if it
    /// differs.
    ///
    /// `next` runs while the channel's write lock is held, so concurrent
    /// updates are applied one after another and never interleave.
    /// Returns whether a new value was published.
    pub(crate) fn update<F>(&self, next: F) -> bool
    where
        F: FnOnce(&T) -> T,
    {
        let sender = self.sender();
        let Some(tx) = sender.as_ref() else {
            return false;
        };

        tx.send_if_modified(|current| {
            let candidate = next(current);
            if *current != candidate {
                *current = candidate;
                true
            } else {
                false
            }
        })
    }

    /// Replace the value and notify watchers if it changed.
    pub(crate) fn set(&self, new_value: T) -> bool {
        self.update(|_| new_value)
    }

    /// Get the current value.
    ///
    /// This is a synchronous operation that clones the current value.
    pub fn get(&self) -> T {
        self.rx.borrow().clone()
    }

    /// Watch for changes to this property.
    ///
    /// The stream immediately yields the current value, then yields
    /// whenever the value changes. It ends once the property is closed.
    pub fn watch(&self) -> impl Stream<Item = T> + Send + use<T> {
        WatchStream::new(self.rx.clone())
    }

    /// Raw receiver, for callers that want `changed()`/`has_changed()`.
    pub fn subscribe(&self) -> watch::Receiver<T> {
        self.rx.clone()
    }

    /// Stop publishing. Idempotent.
    pub(crate) fn close(&self) {
        self.sender().take();
    }

    /// Whether `close()` has been called
    pub fn is_closed(&self) -> bool {
        self.sender().is_none()
    }
}

impl<T: Clone + PartialEq + Send + Sync + Debug + 'static> Debug for Property<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Property")
            .field("value", &self.get())
            .field("closed", &self.is_closed())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use futures::StreamExt;

    use super::*;

    #[test]
    fn equal_updates_are_not_published() {
        let property = Property::new(1);
        let mut rx = property.subscribe();
        rx.borrow_and_update();

        assert!(!property.set(1));
        assert!(!rx.has_changed().unwrap());

        assert!(property.update(|value| value + 1));
        assert!(rx.has_changed().unwrap());
        assert_eq!(property.get(), 2);
    }

    #[tokio::test]
    async fn close_ends_watchers_but_keeps_value() {
        let property = Property::new("a".to_string());
        let mut stream = Box::pin(property.watch());

        assert_eq!(stream.next().await.as_deref(), Some("a"));

        property.set("b".to_string());
        property.close();
        property.close();

        assert!(property.is_closed());
        assert!(!property.set("c".to_string()));
        assert_eq!(property.get(), "b");

        let rest: Vec<String> = stream.collect().await;
        assert!(rest.len() <= 1);
    }
}
