use shared::action::Action;
use tokio::sync::broadcast;
use tracing::{debug, trace};

pub const DEFAULT_DISPATCH_CAPACITY: usize = 256;

pub trait Dispatcher: Send + Sync {
    fn dispatch(&self, action: Action);
}

pub struct BroadcastDispatcher {
    sender: broadcast::Sender<Action>,
}

impl BroadcastDispatcher {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_DISPATCH_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<Action> {
        self.sender.subscribe()
    }

    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for BroadcastDispatcher {
    fn default() -> Self {
        Self::new()
    }
}

impl Dispatcher for BroadcastDispatcher {
    fn dispatch(&self, action: Action) {
        let action_type = action.action_type();
        match self.sender.send(action) {
            Ok(receivers) => debug!(action = %action_type, receivers, "dispatched action"),
            Err(_) => trace!(action = %action_type, "dispatched action with no subscribers"),
        }
    }
}
