//! Rewarded ad unit
//!
//! Manages one out-of-page rewarded slot and the four platform events
//! that drive it. The hard part of this unit is not showing the ad but
//! tearing it down: every `show()` must leave exactly one live slot and
//! exactly one set of event listeners, no matter how the previous cycle
//! ended, and the reward callback must fire at most once per cycle.
//!
//! ## Lifecycle
//!
//! ```text
//! Idle ──show()──▶ Defining ──task──▶ Live ──ready──▶ Displaying
//!   ▲                 │ (refused)       │                 │
//!   └─────────────────┴── hide()/closed/granted ◀─────────┘
//! ```
//!
//! Every path out of `Live`/`Displaying` unsubscribes the full listener
//! set and destroys the slot *before* any host callback runs, so a late
//! event from the ending cycle finds nothing to act on.

use crate::config::AdUnitConfig;
use crate::traits::bootstrap::SdkBootstrap;
use crate::traits::platform::{
    AdPlatform, DisplayTarget, EventHandler, OutOfPageFormat, RewardPayload, SlotEvent,
    SlotEventKind, SlotHandle,
};
use crate::units::subscription::SubscriptionSet;
use std::sync::{Arc, Mutex};
use tracing::{debug, error, warn};

/// Host callback invoked on reward or dismissal
pub type HostCallback = Arc<dyn Fn() + Send + Sync>;

/// Where the rewarded unit currently is in its lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RewardedPhase {
    /// No slot defined
    Idle,
    /// Definition task queued but not yet run
    Defining,
    /// Slot defined and listeners registered, ad not visible yet
    Live,
    /// Ad made visible to the user
    Displaying,
}

/// A slot and the listener registrations that live and die with it
struct LiveSlot {
    slot: SlotHandle,
    subs: SubscriptionSet,
}

enum Phase {
    Idle,
    Defining,
    Live(LiveSlot),
    Displaying(LiveSlot),
}

impl Phase {
    fn kind(&self) -> RewardedPhase {
        match self {
            Phase::Idle => RewardedPhase::Idle,
            Phase::Defining => RewardedPhase::Defining,
            Phase::Live(_) => RewardedPhase::Live,
            Phase::Displaying(_) => RewardedPhase::Displaying,
        }
    }

    fn live_slot(&self) -> Option<SlotHandle> {
        match self {
            Phase::Live(live) | Phase::Displaying(live) => Some(live.slot),
            _ => None,
        }
    }
}

struct RewardedShared {
    /// Bumped on every teardown; queued tasks from older cycles are inert
    cycle: u64,
    phase: Phase,
    /// Reward recorded by the current cycle's grant, if any
    payload: Option<RewardPayload>,
    on_reward: Option<HostCallback>,
    on_fallback: Option<HostCallback>,
}

impl RewardedShared {
    /// Take the live slot out, dropping back to idle
    ///
    /// Leaves other phases untouched, so a late event arriving while a
    /// fresh definition is queued does not disturb it.
    fn take_live(&mut self) -> Option<LiveSlot> {
        match std::mem::replace(&mut self.phase, Phase::Idle) {
            Phase::Live(live) | Phase::Displaying(live) => Some(live),
            other => {
                self.phase = other;
                None
            }
        }
    }

    /// Move from `Live` to `Displaying` if this slot is still the live one
    fn promote_to_displaying(&mut self, slot: SlotHandle) -> bool {
        match std::mem::replace(&mut self.phase, Phase::Idle) {
            Phase::Live(live) if live.slot == slot => {
                self.phase = Phase::Displaying(live);
                true
            }
            other => {
                self.phase = other;
                false
            }
        }
    }
}

/// Incentivized out-of-page ad unit
///
/// `show()` and `hide()` are idempotent and re-enterable: host callbacks
/// may call back into either without corrupting state, and repeated
/// `show()` calls honor only the latest callback pair.
pub struct RewardedUnit {
    bootstrap: Arc<dyn SdkBootstrap>,
    platform: Arc<dyn AdPlatform>,
    unit: AdUnitConfig,
    shared: Arc<Mutex<RewardedShared>>,
}

impl RewardedUnit {
    /// Create a rewarded unit
    ///
    /// # Parameters
    ///
    /// - `bootstrap`: SDK loader
    /// - `platform`: Display-ad platform
    /// - `unit`: Ad-unit descriptor (out-of-page formats need only the path)
    pub fn new(
        bootstrap: Arc<dyn SdkBootstrap>,
        platform: Arc<dyn AdPlatform>,
        unit: AdUnitConfig,
    ) -> Self {
        Self {
            bootstrap,
            platform,
            unit,
            shared: Arc::new(Mutex::new(RewardedShared {
                cycle: 0,
                phase: Phase::Idle,
                payload: None,
                on_reward: None,
                on_fallback: None,
            })),
        }
    }

    /// Current lifecycle phase
    pub fn phase(&self) -> RewardedPhase {
        self.shared.lock().unwrap().phase.kind()
    }

    /// Reward recorded by the most recent grant
    ///
    /// Cleared by the next [`show`](RewardedUnit::show).
    pub fn last_reward(&self) -> Option<RewardPayload> {
        self.shared.lock().unwrap().payload.clone()
    }

    /// Show the rewarded ad
    ///
    /// Stores the callback pair (replacing any previous pair — only the
    /// latest call's callbacks are honored), ensures the primary SDK is
    /// loaded (a load failure is logged and the call silently degrades),
    /// tears down any previous slot, then defines a fresh one.
    ///
    /// # Parameters
    ///
    /// - `on_reward`: Invoked once the user has earned the reward
    /// - `on_fallback`: Invoked when the ad closes, rewarded or not
    pub async fn show(
        &self,
        on_reward: impl Fn() + Send + Sync + 'static,
        on_fallback: impl Fn() + Send + Sync + 'static,
    ) {
        {
            let mut shared = self.shared.lock().unwrap();
            shared.on_reward = Some(Arc::new(on_reward));
            shared.on_fallback = Some(Arc::new(on_fallback));
            // The previous cycle's grant must not leak into this one
            shared.payload = None;
        }

        if let Err(err) = self.bootstrap.ensure_primary().await {
            warn!(error = %err, "primary SDK failed to load, rewarded ad unavailable");
            return;
        }

        // At most one live slot: always tear down before defining anew
        self.hide();
        self.define_slot();
    }

    /// Destroy the slot and remove all event listeners
    ///
    /// Safe to call at any point in the lifecycle, including when nothing
    /// is live.
    pub fn hide(&self) {
        let live = {
            let mut shared = self.shared.lock().unwrap();
            shared.cycle += 1;
            match std::mem::replace(&mut shared.phase, Phase::Idle) {
                Phase::Live(live) | Phase::Displaying(live) => Some(live),
                Phase::Defining | Phase::Idle => None,
            }
        };

        if let Some(mut live) = live {
            live.subs.unsubscribe_all(self.platform.as_ref());
            self.platform.destroy_slots(&[live.slot]);
            debug!("rewarded slot destroyed");
        }
    }

    /// Define the out-of-page slot and wire up its event handlers
    fn define_slot(&self) {
        let cycle = {
            let mut shared = self.shared.lock().unwrap();
            if shared.phase.kind() != RewardedPhase::Idle {
                debug!(phase = ?shared.phase.kind(), "rewarded slot already defined, skipping");
                return;
            }
            shared.phase = Phase::Defining;
            shared.cycle
        };

        let platform = Arc::clone(&self.platform);
        let shared = Arc::clone(&self.shared);
        let unit_id = self.unit.id.clone();

        self.platform.enqueue(Box::new(move || {
            {
                let shared = shared.lock().unwrap();
                if shared.cycle != cycle {
                    debug!("rewarded define task superseded, skipping");
                    return;
                }
            }

            let Some(slot) = platform.define_out_of_page_slot(&unit_id, OutOfPageFormat::Rewarded)
            else {
                error!(unit = %unit_id, "Rewarded slot was not created");
                let mut shared = shared.lock().unwrap();
                if shared.cycle == cycle {
                    shared.phase = Phase::Idle;
                }
                return;
            };

            let mut subs =
                SubscriptionSet::subscribe_all(platform.as_ref(), event_handlers(&shared, slot));

            {
                let mut guard = shared.lock().unwrap();
                if guard.cycle != cycle {
                    // hide() won the race; this slot was never published
                    drop(guard);
                    subs.unsubscribe_all(platform.as_ref());
                    platform.destroy_slots(&[slot]);
                    debug!("rewarded slot defined after teardown, destroyed");
                    return;
                }
                guard.phase = Phase::Live(LiveSlot { slot, subs });
            }

            platform.enable_video_ads();
            // Rewarded fills go through the shared auction path
            platform.refresh(&[]);
            platform.display(DisplayTarget::Slot(slot));
            debug!(unit = %unit_id, "rewarded slot defined and fill requested");
        }));
    }
}

/// Build the four event handlers for one slot
///
/// Each handler verifies the event concerns its slot and that the slot is
/// still live before acting, so deliveries that outlive their cycle are
/// dropped.
fn event_handlers(
    shared: &Arc<Mutex<RewardedShared>>,
    slot: SlotHandle,
) -> Vec<(SlotEventKind, EventHandler)> {
    let ready: EventHandler = {
        let shared = Arc::clone(shared);
        Arc::new(move |platform, event| {
            if event.slot() != slot {
                return;
            }
            if shared.lock().unwrap().promote_to_displaying(slot) {
                platform.make_rewarded_visible(&slot);
                debug!("rewarded ad ready, made visible");
            } else {
                debug!("rewarded ready event after teardown, ignoring");
            }
        })
    };

    let closed: EventHandler = {
        let shared = Arc::clone(shared);
        Arc::new(move |platform, event| {
            if event.slot() != slot {
                return;
            }
            let taken = {
                let mut guard = shared.lock().unwrap();
                let live = guard.take_live();
                live.map(|live| {
                    (
                        live,
                        guard.payload.clone(),
                        guard.on_reward.clone(),
                        guard.on_fallback.clone(),
                    )
                })
            };
            let Some((mut live, payload, on_reward, on_fallback)) = taken else {
                debug!("rewarded close event after teardown, ignoring");
                return;
            };

            // Teardown before callbacks: once the listeners are gone, no
            // late event can reach this cycle again
            live.subs.unsubscribe_all(platform);
            platform.destroy_slots(&[live.slot]);

            if payload.is_some() {
                if let Some(on_reward) = on_reward {
                    on_reward();
                }
            }
            if let Some(on_fallback) = on_fallback {
                on_fallback();
            }
        })
    };

    let granted: EventHandler = {
        let shared = Arc::clone(shared);
        Arc::new(move |platform, event| {
            if event.slot() != slot {
                return;
            }
            let payload = match event {
                SlotEvent::RewardedGranted { payload, .. } => payload.clone(),
                _ => None,
            };
            let taken = {
                let mut guard = shared.lock().unwrap();
                let live = guard.take_live();
                live.map(|live| {
                    guard.payload = payload;
                    (live, guard.on_reward.clone())
                })
            };
            let Some((mut live, on_reward)) = taken else {
                debug!("reward granted after teardown, ignoring");
                return;
            };

            live.subs.unsubscribe_all(platform);
            platform.destroy_slots(&[live.slot]);

            if let Some(on_reward) = on_reward {
                on_reward();
            }
            debug!("reward granted and delivered");
        })
    };

    let render_ended: EventHandler = {
        let shared = Arc::clone(shared);
        Arc::new(move |_platform, event| {
            if let SlotEvent::RenderEnded {
                slot: ended,
                is_empty: true,
            } = event
            {
                let ours = shared.lock().unwrap().phase.live_slot() == Some(*ended);
                if ours && *ended == slot {
                    // No fill; the close event settles the outcome via the fallback
                    warn!("rewarded slot rendered empty");
                }
            }
        })
    };

    vec![
        (SlotEventKind::RewardedReady, ready),
        (SlotEventKind::RewardedClosed, closed),
        (SlotEventKind::RewardedGranted, granted),
        (SlotEventKind::RenderEnded, render_ended),
    ]
}
