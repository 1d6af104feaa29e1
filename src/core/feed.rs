//! Change feed - in-process notifications when the catalog, a cart or a purchase history
//! changes.
//!
//! Writers publish a [`ChangeEvent`] after a successful mutation; readers hold a
//! [`Subscription`] scoped to what they care about. The feed is a bounded broadcast
//! channel: a reader that falls behind skips the events it missed and resumes with the
//! newest ones, since every event only means "reload this view".

use tokio::sync::broadcast::{self, error::RecvError};
use tracing::{trace, warn};

/// Default number of buffered events per subscriber.
pub const DEFAULT_CAPACITY: usize = 64;

/// Something changed and views built on it should be reloaded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeEvent {
    /// A product was added or removed
    CatalogChanged,
    /// A user's cart lines changed
    CartChanged {
        /// Owner of the cart
        user_id: i64,
    },
    /// A user's purchase history changed
    PurchasesChanged {
        /// Owner of the history
        user_id: i64,
    },
}

/// Which events a subscription receives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope {
    /// Catalog changes only
    Catalog,
    /// Catalog changes plus changes to this user's cart and purchases
    User(i64),
}

impl Scope {
    /// Whether an event is visible in this scope.
    #[must_use]
    pub const fn includes(self, event: ChangeEvent) -> bool {
        match (self, event) {
            (_, ChangeEvent::CatalogChanged) => true,
            (Self::User(id), ChangeEvent::CartChanged { user_id })
            | (Self::User(id), ChangeEvent::PurchasesChanged { user_id }) => id == user_id,
            (Self::Catalog, _) => false,
        }
    }
}

/// Publisher side of the feed. Cheap to clone; all clones share one channel.
#[derive(Debug, Clone)]
pub struct ChangeFeed {
    sender: broadcast::Sender<ChangeEvent>,
}

impl Default for ChangeFeed {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

impl ChangeFeed {
    /// Creates a feed buffering up to `capacity` events per subscriber.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    /// Publishes an event, returning how many subscriptions were listening.
    pub fn publish(&self, event: ChangeEvent) -> usize {
        let listeners = self.sender.send(event).unwrap_or(0);
        trace!(?event, listeners, "Change published");
        listeners
    }

    /// Opens a subscription that yields every later event visible in `scope`.
    #[must_use]
    pub fn subscribe(&self, scope: Scope) -> Subscription {
        Subscription {
            scope,
            receiver: self.sender.subscribe(),
        }
    }

    /// Number of open subscriptions.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

/// Receiving side of the feed, filtered to one [`Scope`].
#[derive(Debug)]
pub struct Subscription {
    scope: Scope,
    receiver: broadcast::Receiver<ChangeEvent>,
}

impl Subscription {
    /// Waits for the next visible event.
    ///
    /// Returns `None` once every [`ChangeFeed`] handle has been dropped.
    pub async fn next(&mut self) -> Option<ChangeEvent> {
        loop {
            match self.receiver.recv().await {
                Ok(event) if self.scope.includes(event) => return Some(event),
                Ok(_) => {}
                Err(RecvError::Lagged(skipped)) => {
                    warn!(skipped, scope = ?self.scope, "Subscriber lagged, skipping events");
                }
                Err(RecvError::Closed) => return None,
            }
        }
    }

    /// Stops receiving events.
    pub fn unsubscribe(self) {
        drop(self);
    }
}
