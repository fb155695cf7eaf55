//! Event-subscription bookkeeping for slot-bound ad units
//!
//! A slot that listens to platform events must remove every listener it
//! registered when the slot goes away, or handlers accumulate across
//! show/hide cycles and fire once per historical cycle.
//! [`SubscriptionSet`] ties the registrations to one owned value so they
//! are added and removed as a unit.

use crate::traits::platform::{AdPlatform, EventHandler, ListenerId, SlotEventKind};
use tracing::warn;

/// Listener registrations owned by one live slot
///
/// Holds either every registration made for the slot or none: the set is
/// created by [`subscribe_all`](SubscriptionSet::subscribe_all) and
/// emptied by [`unsubscribe_all`](SubscriptionSet::unsubscribe_all);
/// there is no partial add or remove.
#[derive(Default)]
pub struct SubscriptionSet {
    entries: Vec<(SlotEventKind, ListenerId)>,
}

impl SubscriptionSet {
    /// Register every handler and collect the resulting tokens
    pub fn subscribe_all(
        platform: &dyn AdPlatform,
        handlers: Vec<(SlotEventKind, EventHandler)>,
    ) -> Self {
        let entries = handlers
            .into_iter()
            .map(|(kind, handler)| (kind, platform.subscribe(kind, handler)))
            .collect();
        Self { entries }
    }

    /// Remove exactly the registrations this set holds and empty it
    ///
    /// Removing a token the platform no longer knows is logged and
    /// skipped; the set always ends up empty.
    pub fn unsubscribe_all(&mut self, platform: &dyn AdPlatform) {
        for (kind, listener) in self.entries.drain(..) {
            if !platform.unsubscribe(kind, listener) {
                warn!(?kind, "listener was already removed");
            }
        }
    }

    /// Number of registrations held
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no registrations are held
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
