//! Interstitial ad unit
//!
//! Manages one static full-page slot: define once, request fills on
//! demand, destroy on hide. The platform's size-mapping facility keeps
//! the served creative appropriate for the viewport — wide creatives on
//! desktop-class viewports, narrow ones everywhere else.
//!
//! ## Lifecycle
//!
//! ```text
//! Idle ──define_slot()──▶ Defining ──task──▶ Live ──show task──▶ Displaying
//!   ▲                        │ (refused)       │                     │
//!   └────────────────────────┴────── hide() ◀──┴─────────────────────┘
//! ```
//!
//! Definition happens inside a queued task, so between `define_slot()`
//! and the task running the unit is `Defining`; a teardown in that window
//! makes the task inert through the cycle counter.

use crate::config::{AdSize, AdUnitConfig};
use crate::traits::bootstrap::SdkBootstrap;
use crate::traits::platform::{AdPlatform, DisplayTarget, SizeMapping, SlotHandle};
use std::sync::{Arc, Mutex};
use tracing::{debug, error, info, warn};

/// Creatives wider than this are served only on desktop-class viewports
const WIDE_MIN_WIDTH: u32 = 300;

/// Minimum viewport width treated as desktop-class
const DESKTOP_MIN_VIEWPORT_WIDTH: u32 = 1024;

/// Where the interstitial unit currently is in its lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InterstitialPhase {
    /// No slot defined
    Idle,
    /// Definition task queued but not yet run
    Defining,
    /// Slot defined, no display requested yet
    Live(SlotHandle),
    /// Slot defined and displayed at least once
    Displaying(SlotHandle),
}

struct InterstitialShared {
    /// Bumped on every teardown; queued tasks from older cycles are inert
    cycle: u64,
    phase: InterstitialPhase,
}

/// Static full-page ad unit
///
/// `show()` and `hide()` are idempotent and safe to call at any time; at
/// most one slot is ever live.
pub struct InterstitialUnit {
    bootstrap: Arc<dyn SdkBootstrap>,
    platform: Arc<dyn AdPlatform>,
    unit: AdUnitConfig,
    container_id: String,
    shared: Arc<Mutex<InterstitialShared>>,
}

impl InterstitialUnit {
    /// Create an interstitial unit
    ///
    /// # Parameters
    ///
    /// - `bootstrap`: SDK loader
    /// - `platform`: Display-ad platform
    /// - `unit`: Ad-unit descriptor (path and creative sizes)
    /// - `container_id`: Host container the slot renders into
    pub fn new(
        bootstrap: Arc<dyn SdkBootstrap>,
        platform: Arc<dyn AdPlatform>,
        unit: AdUnitConfig,
        container_id: impl Into<String>,
    ) -> Self {
        Self {
            bootstrap,
            platform,
            unit,
            container_id: container_id.into(),
            shared: Arc::new(Mutex::new(InterstitialShared {
                cycle: 0,
                phase: InterstitialPhase::Idle,
            })),
        }
    }

    /// Current lifecycle phase
    pub fn phase(&self) -> InterstitialPhase {
        self.shared.lock().unwrap().phase
    }

    /// Define the ad slot if it has not been defined already
    ///
    /// No-op unless the unit is idle. The definition itself runs as a
    /// queued task: it partitions the configured sizes into wide and
    /// narrow buckets, attaches a viewport mapping serving wide creatives
    /// only from [`DESKTOP_MIN_VIEWPORT_WIDTH`] up, and disables initial
    /// load so fills happen only on [`show`](InterstitialUnit::show).
    pub fn define_slot(&self) {
        let cycle = {
            let mut shared = self.shared.lock().unwrap();
            if shared.phase != InterstitialPhase::Idle {
                debug!(phase = ?shared.phase, "interstitial slot already defined, skipping");
                return;
            }
            shared.phase = InterstitialPhase::Defining;
            shared.cycle
        };

        let platform = Arc::clone(&self.platform);
        let shared = Arc::clone(&self.shared);
        let unit = self.unit.clone();
        let container = self.container_id.clone();

        self.platform.enqueue(Box::new(move || {
            {
                let shared = shared.lock().unwrap();
                if shared.cycle != cycle || shared.phase != InterstitialPhase::Defining {
                    debug!("interstitial define task superseded, skipping");
                    return;
                }
            }

            let (wide, narrow) = split_sizes(&unit.sizes);
            let mapping = SizeMapping::new()
                .with_rule(AdSize::new(DESKTOP_MIN_VIEWPORT_WIDTH, 0), wide)
                .with_rule(AdSize::new(0, 0), narrow);

            let Some(slot) = platform.define_slot(&unit.id, &unit.sizes, &container) else {
                error!(unit = %unit.id, "Interstitial slot was not created");
                let mut shared = shared.lock().unwrap();
                if shared.cycle == cycle {
                    shared.phase = InterstitialPhase::Idle;
                }
                return;
            };

            platform.set_size_mapping(&slot, &mapping);
            platform.disable_initial_load();

            let torn_down = {
                let mut shared = shared.lock().unwrap();
                if shared.cycle == cycle {
                    shared.phase = InterstitialPhase::Live(slot);
                    false
                } else {
                    true
                }
            };
            if torn_down {
                // hide() won the race; this slot was never published
                platform.destroy_slots(&[slot]);
                debug!("interstitial slot defined after teardown, destroyed");
                return;
            }

            info!(unit = %unit.id, container = %container, "interstitial slot defined");
        }));
    }

    /// Show the interstitial
    ///
    /// Ensures the primary SDK is loaded (a load failure is logged and
    /// the call silently degrades), defines the slot if needed, then
    /// queues a display of the container and a fill request for this slot
    /// only. Safe to call repeatedly; each call after the first re-uses
    /// the defined slot and requests a fresh fill.
    pub async fn show(&self) {
        if let Err(err) = self.bootstrap.ensure_primary().await {
            warn!(error = %err, "primary SDK failed to load, interstitial stays hidden");
            return;
        }

        self.define_slot();

        let platform = Arc::clone(&self.platform);
        let shared = Arc::clone(&self.shared);
        let container = self.container_id.clone();
        let cycle = self.shared.lock().unwrap().cycle;

        self.platform.enqueue(Box::new(move || {
            let slot = {
                let mut shared = shared.lock().unwrap();
                if shared.cycle != cycle {
                    debug!("interstitial display task superseded, skipping");
                    return;
                }
                match shared.phase {
                    InterstitialPhase::Live(slot) | InterstitialPhase::Displaying(slot) => {
                        shared.phase = InterstitialPhase::Displaying(slot);
                        Some(slot)
                    }
                    _ => None,
                }
            };

            platform.display(DisplayTarget::Container(container.clone()));
            match slot {
                // Targeted refresh: never disturb other units' slots
                Some(slot) => platform.refresh(&[slot]),
                None => warn!(container = %container, "no live interstitial slot to refresh"),
            }
        }));
    }

    /// Destroy the slot to hide the ad
    ///
    /// No-op when nothing is live. A later
    /// [`show`](InterstitialUnit::show) defines a fresh slot.
    pub fn hide(&self) {
        let slot = {
            let mut shared = self.shared.lock().unwrap();
            shared.cycle += 1;
            match shared.phase {
                InterstitialPhase::Live(slot) | InterstitialPhase::Displaying(slot) => {
                    shared.phase = InterstitialPhase::Idle;
                    Some(slot)
                }
                InterstitialPhase::Defining => {
                    shared.phase = InterstitialPhase::Idle;
                    None
                }
                InterstitialPhase::Idle => None,
            }
        };

        if let Some(slot) = slot {
            self.platform.destroy_slots(&[slot]);
            debug!("interstitial slot destroyed");
        }
    }
}

/// Partition creative sizes at the wide/narrow threshold
fn split_sizes(sizes: &[AdSize]) -> (Vec<AdSize>, Vec<AdSize>) {
    let wide = sizes
        .iter()
        .copied()
        .filter(|size| size.width > WIDE_MIN_WIDTH)
        .collect();
    let narrow = sizes
        .iter()
        .copied()
        .filter(|size| size.width <= WIDE_MIN_WIDTH)
        .collect();
    (wide, narrow)
}
