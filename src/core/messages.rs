use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;

use serde_json::Value;

/// Channel the host publishes viewport changes on
pub const VIEW_METRICS_CHANNEL: &str = "ViewportMetricsChanged";

/// Identifies the owner of channel handlers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriberId(u64);

/// Handler invoked with the message method and its arguments
pub type ChannelHandler = dyn Fn(&str, &[Value]);

struct Subscription {
    owner: SubscriberId,
    handler: Rc<ChannelHandler>,
}

/// In-process publish/subscribe channel for named host messages.
///
/// At most one handler exists per `(owner, channel)`. Delivery snapshots the
/// handler list first, so handlers may subscribe or unsubscribe while a
/// message is being delivered.
#[derive(Default)]
pub struct MessageManager {
    channels: RefCell<HashMap<String, Vec<Subscription>>>,
    next_subscriber: Cell<u64>,
}

impl MessageManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn allocate_subscriber(&self) -> SubscriberId {
        let id = self.next_subscriber.get();
        self.next_subscriber.set(id + 1);
        SubscriberId(id)
    }

    /// Register `handler` for `channel`. Returns `false` and keeps the
    /// existing handler when `owner` already listens on that channel.
    pub fn add_channel_message_delegate(
        &self,
        channel: &str,
        owner: SubscriberId,
        handler: impl Fn(&str, &[Value]) + 'static,
    ) -> bool {
        let mut channels = self.channels.borrow_mut();
        let subscriptions = channels.entry(channel.to_string()).or_default();
        if subscriptions.iter().any(|s| s.owner == owner) {
            log::debug!("{:?} already subscribed to {}", owner, channel);
            return false;
        }
        subscriptions.push(Subscription {
            owner,
            handler: Rc::new(handler),
        });
        log::debug!("{:?} subscribed to {}", owner, channel);
        true
    }

    /// Drop every handler `owner` registered
    pub fn remove_subscriber(&self, owner: SubscriberId) -> usize {
        let mut removed = 0;
        let mut channels = self.channels.borrow_mut();
        for subscriptions in channels.values_mut() {
            let before = subscriptions.len();
            subscriptions.retain(|s| s.owner != owner);
            removed += before - subscriptions.len();
        }
        channels.retain(|_, subscriptions| !subscriptions.is_empty());
        removed
    }

    pub fn handler_count(&self, channel: &str) -> usize {
        self.channels.borrow().get(channel).map_or(0, Vec::len)
    }

    /// Deliver a message to every handler on `channel`; returns how many ran
    pub fn deliver(&self, channel: &str, method: &str, args: &[Value]) -> usize {
        let handlers: Vec<Rc<ChannelHandler>> = match self.channels.borrow().get(channel) {
            Some(subscriptions) => subscriptions.iter().map(|s| Rc::clone(&s.handler)).collect(),
            None => return 0,
        };
        log::trace!("{} -> {} handler(s) on {}", method, handlers.len(), channel);
        for handler in &handlers {
            handler(method, args);
        }
        handlers.len()
    }
}
