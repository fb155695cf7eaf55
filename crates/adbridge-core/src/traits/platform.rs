// # Ad Platform Trait
//
// Defines the interface for the display-ad platform: slot definition,
// size mappings, fill requests, slot destruction and slot events.
//
// ## Implementations
//
// - Simulated platform (CI/testing): `adbridge-platform-sim` crate
// - Real deployments: a thin binding over the actual ad SDK's object API
//
// ## Usage
//
// ```rust,ignore
// use adbridge_core::traits::{AdPlatform, DisplayTarget};
//
// fn request_fill(platform: &dyn AdPlatform, container: &str) {
//     let container = container.to_string();
//     platform.enqueue(Box::new(move || {
//         // Runs once the platform is ready
//     }));
// }
// ```

use crate::config::{AdSize, PageSettings};
use crate::queue::Task;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Opaque handle to a defined ad slot
///
/// Handles are cheap cloneable references; the slot's lifecycle is owned
/// by exactly one ad unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SlotHandle(u64);

impl SlotHandle {
    /// Create a handle from a raw platform identifier
    pub fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// The raw platform identifier
    pub fn raw(&self) -> u64 {
        self.0
    }
}

/// Opaque token identifying one event subscription
///
/// Removal is by identity: only the token returned by
/// [`AdPlatform::subscribe`] removes that registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

impl ListenerId {
    /// Create a token from a raw identifier
    pub fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// The raw identifier
    pub fn raw(&self) -> u64 {
        self.0
    }
}

/// Named out-of-page slot formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OutOfPageFormat {
    /// Full-screen rewarded ad
    Rewarded,
    /// Full-screen interstitial between content transitions
    Interstitial,
}

/// Where a display call points
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DisplayTarget {
    /// A container identifier in the host surface
    Container(String),
    /// A previously defined slot
    Slot(SlotHandle),
}

/// Payload attached to a granted reward
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RewardPayload {
    /// Reward kind as reported by the platform (e.g. "coins")
    pub reward_type: String,
    /// Reward amount
    pub amount: u32,
}

/// One rule of a responsive size mapping
///
/// Applies when the viewport is at least `min_viewport` in both
/// dimensions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SizeRule {
    /// Minimum viewport for this rule (width, height)
    pub min_viewport: AdSize,
    /// Creative sizes allowed at this viewport
    pub sizes: Vec<AdSize>,
}

/// Ordered viewport→sizes mapping attached to a slot
///
/// Rules are evaluated in insertion order; the first rule whose minimum
/// viewport fits wins, so broader viewports go first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SizeMapping {
    /// Mapping rules, broadest viewport first
    pub rules: Vec<SizeRule>,
}

impl SizeMapping {
    /// Create an empty mapping
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a rule
    pub fn with_rule(mut self, min_viewport: AdSize, sizes: Vec<AdSize>) -> Self {
        self.rules.push(SizeRule { min_viewport, sizes });
        self
    }

    /// Resolve the creative sizes for a viewport
    ///
    /// Returns the sizes of the first rule the viewport satisfies, or
    /// `None` when no rule applies.
    pub fn resolve(&self, viewport: AdSize) -> Option<&[AdSize]> {
        self.rules
            .iter()
            .find(|rule| {
                viewport.width >= rule.min_viewport.width
                    && viewport.height >= rule.min_viewport.height
            })
            .map(|rule| rule.sizes.as_slice())
    }
}

/// Kinds of slot events an ad unit can subscribe to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SlotEventKind {
    /// A rewarded ad is loaded and may be made visible
    RewardedReady,
    /// The user dismissed the rewarded ad
    RewardedClosed,
    /// The user earned the reward
    RewardedGranted,
    /// A slot finished rendering
    RenderEnded,
}

/// A slot event delivered to subscribed handlers
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SlotEvent {
    /// A rewarded ad is loaded and may be made visible
    RewardedReady {
        /// The rewarded slot
        slot: SlotHandle,
    },

    /// The user dismissed the rewarded ad
    RewardedClosed {
        /// The rewarded slot
        slot: SlotHandle,
    },

    /// The user earned the reward
    RewardedGranted {
        /// The rewarded slot
        slot: SlotHandle,
        /// Reward details, when the platform reports them
        payload: Option<RewardPayload>,
    },

    /// A slot finished rendering
    RenderEnded {
        /// The slot that rendered
        slot: SlotHandle,
        /// Whether the response was empty (no fill)
        is_empty: bool,
    },
}

impl SlotEvent {
    /// The event's kind
    pub fn kind(&self) -> SlotEventKind {
        match self {
            SlotEvent::RewardedReady { .. } => SlotEventKind::RewardedReady,
            SlotEvent::RewardedClosed { .. } => SlotEventKind::RewardedClosed,
            SlotEvent::RewardedGranted { .. } => SlotEventKind::RewardedGranted,
            SlotEvent::RenderEnded { .. } => SlotEventKind::RenderEnded,
        }
    }

    /// The slot the event concerns
    pub fn slot(&self) -> SlotHandle {
        match self {
            SlotEvent::RewardedReady { slot }
            | SlotEvent::RewardedClosed { slot }
            | SlotEvent::RewardedGranted { slot, .. }
            | SlotEvent::RenderEnded { slot, .. } => *slot,
        }
    }
}

/// Handler invoked for subscribed slot events
///
/// The dispatching platform passes itself as the first argument, so
/// handlers never capture the platform and cannot form reference cycles
/// with the listener table that owns them.
pub type EventHandler = Arc<dyn Fn(&dyn AdPlatform, &SlotEvent) + Send + Sync>;

/// Trait for display-ad platform implementations
///
/// Models the slot API of a globally-queued, callback-driven ad SDK.
/// All unit-initiated work is submitted through [`enqueue`](AdPlatform::enqueue);
/// the remaining methods are invoked from inside queued tasks or event
/// handlers, once the platform is ready.
///
/// # Thread Safety
///
/// Implementations must be thread-safe and usable across async tasks.
///
/// # Dispatch Rules
///
/// Event dispatch is where platform implementations most often go wrong.
/// The ad units rely on these rules:
///
/// - ✅ Events are dispatched sequentially, on one logical thread
/// - ✅ The handler list is snapshotted before invocation, so a handler
///   may subscribe or unsubscribe (itself included) during dispatch
/// - ✅ An unsubscribed handler stops receiving events from the next
///   dispatch on
/// - ❌ Never invoke handlers while holding internal locks (handlers call
///   back into the platform)
/// - ❌ Never dispatch concurrently from multiple threads
pub trait AdPlatform: Send + Sync {
    /// Submit a task to run once the platform is ready
    ///
    /// Before readiness the task is buffered; afterwards it runs
    /// immediately on the calling thread. Buffered tasks drain in FIFO
    /// order, each exactly once.
    fn enqueue(&self, task: Task);

    /// Define a static ad slot bound to a container
    ///
    /// # Parameters
    ///
    /// - `path`: Full ad-unit path
    /// - `sizes`: Creative sizes the slot may serve
    /// - `container`: Host container identifier
    ///
    /// # Returns
    ///
    /// A slot handle, or `None` when the platform refuses the definition.
    fn define_slot(&self, path: &str, sizes: &[AdSize], container: &str) -> Option<SlotHandle>;

    /// Define an out-of-page slot of a named format
    ///
    /// # Returns
    ///
    /// A slot handle, or `None` when the platform refuses — e.g. a second
    /// live rewarded slot.
    fn define_out_of_page_slot(&self, path: &str, format: OutOfPageFormat) -> Option<SlotHandle>;

    /// Attach a responsive size mapping to a slot
    fn set_size_mapping(&self, slot: &SlotHandle, mapping: &SizeMapping);

    /// Disable fill-on-define so callers control when requests fire
    fn disable_initial_load(&self);

    /// Advertise video capability before requesting video-backed fills
    fn enable_video_ads(&self);

    /// Apply page-level settings
    ///
    /// Called once, from [`initialize`](crate::initialize), before
    /// [`enable_services`](AdPlatform::enable_services).
    fn configure(&self, settings: &PageSettings);

    /// Enable slot services for the page
    fn enable_services(&self);

    /// Register a container or slot as renderable
    fn display(&self, target: DisplayTarget);

    /// Request fills for the given slots
    ///
    /// An empty slice requests a fill for every serviced slot.
    fn refresh(&self, slots: &[SlotHandle]);

    /// Destroy the given slots, releasing their resources
    fn destroy_slots(&self, slots: &[SlotHandle]);

    /// Allow a loaded rewarded ad to become visible
    fn make_rewarded_visible(&self, slot: &SlotHandle);

    /// Subscribe a handler to an event kind
    ///
    /// # Returns
    ///
    /// A token removing exactly this registration.
    fn subscribe(&self, kind: SlotEventKind, handler: EventHandler) -> ListenerId;

    /// Remove a registration by its token
    ///
    /// # Returns
    ///
    /// `true` when the registration existed, `false` for an unknown token
    /// (a no-op).
    fn unsubscribe(&self, kind: SlotEventKind, listener: ListenerId) -> bool;
}

/// Helper trait for constructing ad platforms from configuration
pub trait AdPlatformFactory: Send + Sync {
    /// Create an AdPlatform instance from configuration
    ///
    /// # Parameters
    ///
    /// - `config`: Configuration specific to this platform type
    ///
    /// # Returns
    ///
    /// A shared AdPlatform trait object (platforms are shared by several
    /// ad units)
    fn create(
        &self,
        config: &crate::config::PlatformConfig,
    ) -> Result<Arc<dyn AdPlatform>, crate::Error>;
}
