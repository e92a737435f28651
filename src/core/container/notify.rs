//! core::container::notify
//!
//! Change notification for metadata containers.
//!
//! # Channels
//!
//! Observers subscribe either to every key or to a single key (the
//! subscription's *detail*). Every successful mutation of a container,
//! including removal, is published as `(key, Option<&MetaValue>)`; removal
//! publishes `None`. Rejected writes publish nothing.
//!
//! # Delivery
//!
//! Delivery is synchronous, in connection order, after the mutation has been
//! applied. Callbacks receive the key and value only, never the container,
//! so a callback cannot mutate the container it observes. Callers that share
//! a container behind their own synchronization must not lock it again from
//! inside a callback.

use std::fmt;

use crate::core::value::MetaValue;

/// Callback signature for change notifications.
pub type NotifyCallback = Box<dyn FnMut(&str, Option<&MetaValue>) + Send>;

/// Identifies a connected observer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct HandlerId(u64);

struct Handler {
    id: HandlerId,
    detail: Option<String>,
    callback: NotifyCallback,
}

/// Observer list owned by a container.
#[derive(Default)]
pub struct NotifyBus {
    handlers: Vec<Handler>,
    next_id: u64,
}

impl NotifyBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Connect an observer. `detail` restricts delivery to a single key.
    pub fn connect<F>(&mut self, detail: Option<&str>, callback: F) -> HandlerId
    where
        F: FnMut(&str, Option<&MetaValue>) + Send + 'static,
    {
        self.next_id += 1;
        let id = HandlerId(self.next_id);
        self.handlers.push(Handler {
            id,
            detail: detail.map(str::to_string),
            callback: Box::new(callback),
        });
        id
    }

    /// Disconnect an observer. Returns `false` if it was not connected.
    pub fn disconnect(&mut self, id: HandlerId) -> bool {
        let before = self.handlers.len();
        self.handlers.retain(|h| h.id != id);
        self.handlers.len() != before
    }

    /// Number of connected observers.
    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    pub(crate) fn emit(&mut self, key: &str, value: Option<&MetaValue>) {
        for handler in &mut self.handlers {
            let wanted = handler.detail.as_deref().map_or(true, |d| d == key);
            if wanted {
                (handler.callback)(key, value);
            }
        }
    }
}

impl fmt::Debug for NotifyBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NotifyBus")
            .field("handlers", &self.handlers.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    type Log = Arc<Mutex<Vec<(String, Option<MetaValue>)>>>;

    fn recorder(log: &Log) -> impl FnMut(&str, Option<&MetaValue>) + Send + 'static {
        let log = Arc::clone(log);
        move |key, value| {
            log.lock().unwrap().push((key.to_string(), value.cloned()));
        }
    }

    #[test]
    fn undetailed_receives_everything() {
        let log = Log::default();
        let mut bus = NotifyBus::new();
        bus.connect(None, recorder(&log));

        bus.emit("a", Some(&MetaValue::Int(1)));
        bus.emit("b", None);

        let log = log.lock().unwrap();
        assert_eq!(log.len(), 2);
        assert_eq!(log[0], ("a".to_string(), Some(MetaValue::Int(1))));
        assert_eq!(log[1], ("b".to_string(), None));
    }

    #[test]
    fn detail_filters_by_key() {
        let log = Log::default();
        let mut bus = NotifyBus::new();
        bus.connect(Some("title"), recorder(&log));

        bus.emit("width", Some(&MetaValue::Int(1)));
        bus.emit("title", Some(&MetaValue::from("Intro")));

        let log = log.lock().unwrap();
        assert_eq!(log.len(), 1);
        assert_eq!(log[0].0, "title");
    }

    #[test]
    fn disconnect_stops_delivery() {
        let log = Log::default();
        let mut bus = NotifyBus::new();
        let id = bus.connect(None, recorder(&log));

        assert!(bus.disconnect(id));
        assert!(!bus.disconnect(id));
        assert!(bus.is_empty());

        bus.emit("a", None);
        assert!(log.lock().unwrap().is_empty());
    }

    #[test]
    fn delivery_in_connection_order() {
        let order = Arc::new(Mutex::new(Vec::new()));
        let mut bus = NotifyBus::new();
        for n in 0..3 {
            let order = Arc::clone(&order);
            bus.connect(None, move |_, _| order.lock().unwrap().push(n));
        }

        bus.emit("k", None);
        assert_eq!(*order.lock().unwrap(), vec![0, 1, 2]);
    }
}
