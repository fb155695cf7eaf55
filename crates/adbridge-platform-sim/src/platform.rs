//! Simulated display-ad platform

use adbridge_core::config::{AdSize, PageSettings, PlatformConfig};
use adbridge_core::queue::{CommandQueue, Task};
use adbridge_core::traits::{
    AdPlatform, AdPlatformFactory, DisplayTarget, EventHandler, ListenerId, OutOfPageFormat,
    SizeMapping, SlotEvent, SlotEventKind, SlotHandle,
};
use adbridge_core::{Error, Result};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use tracing::{debug, warn};

/// One defined slot and what it was defined as
struct SlotRecord {
    handle: SlotHandle,
    path: String,
    kind: SlotKind,
    mapping: Option<SizeMapping>,
}

enum SlotKind {
    Static {
        container: String,
        sizes: Vec<AdSize>,
    },
    OutOfPage(OutOfPageFormat),
}

/// In-process stand-in for the display-ad SDK
///
/// Reproduces the SDK's observable contract deterministically: an
/// embedded command queue, a slot table issuing opaque handles (refusing
/// a second live rewarded slot, like the real platform), and snapshot
/// event dispatch. Every display/refresh/destroy/visibility/settings call
/// is recorded for inspection.
pub struct SimAdPlatform {
    queue: CommandQueue,
    next_id: AtomicU64,
    slots: Mutex<Vec<SlotRecord>>,
    listeners: Mutex<HashMap<SlotEventKind, Vec<(ListenerId, EventHandler)>>>,
    displays: Mutex<Vec<DisplayTarget>>,
    refreshes: Mutex<Vec<Vec<SlotHandle>>>,
    destroyed: Mutex<Vec<SlotHandle>>,
    made_visible: Mutex<Vec<SlotHandle>>,
    applied_settings: Mutex<Vec<PageSettings>>,
    initial_load_disabled: AtomicBool,
    video_ads_enabled: AtomicBool,
    services_enabled: AtomicBool,
}

impl SimAdPlatform {
    /// Platform whose command queue buffers until [`activate`](Self::activate)
    pub fn new() -> Self {
        Self::with_queue(CommandQueue::new())
    }

    /// Platform whose command queue runs tasks immediately
    pub fn activated() -> Self {
        Self::with_queue(CommandQueue::activated())
    }

    fn with_queue(queue: CommandQueue) -> Self {
        Self {
            queue,
            next_id: AtomicU64::new(1),
            slots: Mutex::new(Vec::new()),
            listeners: Mutex::new(HashMap::new()),
            displays: Mutex::new(Vec::new()),
            refreshes: Mutex::new(Vec::new()),
            destroyed: Mutex::new(Vec::new()),
            made_visible: Mutex::new(Vec::new()),
            applied_settings: Mutex::new(Vec::new()),
            initial_load_disabled: AtomicBool::new(false),
            video_ads_enabled: AtomicBool::new(false),
            services_enabled: AtomicBool::new(false),
        }
    }

    /// Signal SDK readiness, draining the buffered command queue
    pub fn activate(&self) {
        self.queue.activate();
    }

    /// Number of tasks still buffered
    pub fn pending_tasks(&self) -> usize {
        self.queue.pending()
    }

    /// Dispatch an event to a snapshot of the subscribed handlers
    ///
    /// The snapshot is taken before any handler runs, so handlers may
    /// subscribe or unsubscribe (themselves included) during dispatch.
    pub fn emit(&self, event: SlotEvent) {
        let handlers: Vec<EventHandler> = {
            let listeners = self.listeners.lock().unwrap();
            listeners
                .get(&event.kind())
                .map(|entries| entries.iter().map(|(_, h)| Arc::clone(h)).collect())
                .unwrap_or_default()
        };
        debug!(kind = ?event.kind(), handlers = handlers.len(), "dispatching slot event");
        for handler in handlers {
            handler(self, &event);
        }
    }

    /// Slots defined and not yet destroyed
    pub fn live_slots(&self) -> Vec<SlotHandle> {
        self.slots.lock().unwrap().iter().map(|s| s.handle).collect()
    }

    /// The ad-unit path a live slot was defined with
    pub fn slot_path(&self, slot: &SlotHandle) -> Option<String> {
        self.slots
            .lock()
            .unwrap()
            .iter()
            .find(|record| record.handle == *slot)
            .map(|record| record.path.clone())
    }

    /// The container a live static slot renders into
    pub fn slot_container(&self, slot: &SlotHandle) -> Option<String> {
        let slots = self.slots.lock().unwrap();
        let record = slots.iter().find(|record| record.handle == *slot)?;
        match &record.kind {
            SlotKind::Static { container, .. } => Some(container.clone()),
            SlotKind::OutOfPage(_) => None,
        }
    }

    /// Creative sizes a live slot serves at the given viewport
    ///
    /// Resolves the slot's responsive mapping when one is attached,
    /// falling back to the sizes it was defined with.
    pub fn creative_sizes_for(&self, slot: &SlotHandle, viewport: AdSize) -> Option<Vec<AdSize>> {
        let slots = self.slots.lock().unwrap();
        let record = slots.iter().find(|record| record.handle == *slot)?;

        if let Some(mapping) = &record.mapping {
            return mapping.resolve(viewport).map(|sizes| sizes.to_vec());
        }
        match &record.kind {
            SlotKind::Static { sizes, .. } => Some(sizes.clone()),
            SlotKind::OutOfPage(_) => None,
        }
    }

    /// Number of handlers registered for one event kind
    pub fn listener_count(&self, kind: SlotEventKind) -> usize {
        self.listeners
            .lock()
            .unwrap()
            .get(&kind)
            .map(|entries| entries.len())
            .unwrap_or(0)
    }

    /// Number of handlers registered across all event kinds
    pub fn total_listeners(&self) -> usize {
        self.listeners
            .lock()
            .unwrap()
            .values()
            .map(|entries| entries.len())
            .sum()
    }

    pub fn displays(&self) -> Vec<DisplayTarget> {
        self.displays.lock().unwrap().clone()
    }

    pub fn refreshes(&self) -> Vec<Vec<SlotHandle>> {
        self.refreshes.lock().unwrap().clone()
    }

    pub fn destroyed(&self) -> Vec<SlotHandle> {
        self.destroyed.lock().unwrap().clone()
    }

    pub fn made_visible(&self) -> Vec<SlotHandle> {
        self.made_visible.lock().unwrap().clone()
    }

    pub fn applied_settings(&self) -> Vec<PageSettings> {
        self.applied_settings.lock().unwrap().clone()
    }

    pub fn initial_load_disabled(&self) -> bool {
        self.initial_load_disabled.load(Ordering::SeqCst)
    }

    pub fn video_ads_enabled(&self) -> bool {
        self.video_ads_enabled.load(Ordering::SeqCst)
    }

    pub fn services_enabled(&self) -> bool {
        self.services_enabled.load(Ordering::SeqCst)
    }

    fn next_handle(&self) -> SlotHandle {
        SlotHandle::new(self.next_id.fetch_add(1, Ordering::SeqCst))
    }
}

impl Default for SimAdPlatform {
    fn default() -> Self {
        Self::new()
    }
}

impl AdPlatform for SimAdPlatform {
    fn enqueue(&self, task: Task) {
        self.queue.enqueue(task);
    }

    fn define_slot(&self, path: &str, sizes: &[AdSize], container: &str) -> Option<SlotHandle> {
        let handle = self.next_handle();
        self.slots.lock().unwrap().push(SlotRecord {
            handle,
            path: path.to_string(),
            kind: SlotKind::Static {
                container: container.to_string(),
                sizes: sizes.to_vec(),
            },
            mapping: None,
        });
        debug!(path, container, "static slot defined");
        Some(handle)
    }

    fn define_out_of_page_slot(&self, path: &str, format: OutOfPageFormat) -> Option<SlotHandle> {
        let mut slots = self.slots.lock().unwrap();

        // The real platform allows one live slot per out-of-page format
        let occupied = slots
            .iter()
            .any(|record| matches!(record.kind, SlotKind::OutOfPage(f) if f == format));
        if occupied {
            warn!(path, ?format, "out-of-page format already occupied, refusing");
            return None;
        }

        let handle = self.next_handle();
        slots.push(SlotRecord {
            handle,
            path: path.to_string(),
            kind: SlotKind::OutOfPage(format),
            mapping: None,
        });
        debug!(path, ?format, "out-of-page slot defined");
        Some(handle)
    }

    fn set_size_mapping(&self, slot: &SlotHandle, mapping: &SizeMapping) {
        let mut slots = self.slots.lock().unwrap();
        if let Some(record) = slots.iter_mut().find(|record| record.handle == *slot) {
            record.mapping = Some(mapping.clone());
        } else {
            warn!(slot = slot.raw(), "size mapping for unknown slot ignored");
        }
    }

    fn disable_initial_load(&self) {
        self.initial_load_disabled.store(true, Ordering::SeqCst);
    }

    fn enable_video_ads(&self) {
        self.video_ads_enabled.store(true, Ordering::SeqCst);
    }

    fn configure(&self, settings: &PageSettings) {
        self.applied_settings.lock().unwrap().push(settings.clone());
    }

    fn enable_services(&self) {
        self.services_enabled.store(true, Ordering::SeqCst);
    }

    fn display(&self, target: DisplayTarget) {
        self.displays.lock().unwrap().push(target);
    }

    fn refresh(&self, slots: &[SlotHandle]) {
        self.refreshes.lock().unwrap().push(slots.to_vec());
    }

    fn destroy_slots(&self, handles: &[SlotHandle]) {
        let mut slots = self.slots.lock().unwrap();
        slots.retain(|record| !handles.contains(&record.handle));
        self.destroyed.lock().unwrap().extend_from_slice(handles);
    }

    fn make_rewarded_visible(&self, slot: &SlotHandle) {
        self.made_visible.lock().unwrap().push(*slot);
    }

    fn subscribe(&self, kind: SlotEventKind, handler: EventHandler) -> ListenerId {
        let id = ListenerId::new(self.next_id.fetch_add(1, Ordering::SeqCst));
        self.listeners
            .lock()
            .unwrap()
            .entry(kind)
            .or_default()
            .push((id, handler));
        id
    }

    fn unsubscribe(&self, kind: SlotEventKind, listener: ListenerId) -> bool {
        let mut listeners = self.listeners.lock().unwrap();
        let Some(entries) = listeners.get_mut(&kind) else {
            return false;
        };
        match entries.iter().position(|(id, _)| *id == listener) {
            Some(index) => {
                entries.remove(index);
                true
            }
            None => false,
        }
    }
}

/// Factory for [`SimAdPlatform`]
pub struct SimAdPlatformFactory;

impl AdPlatformFactory for SimAdPlatformFactory {
    fn create(&self, config: &PlatformConfig) -> Result<Arc<dyn AdPlatform>> {
        match config {
            PlatformConfig::Sim { activated } => Ok(Arc::new(if *activated {
                SimAdPlatform::activated()
            } else {
                SimAdPlatform::new()
            })),
            PlatformConfig::Custom { factory, .. } => Err(Error::config(format!(
                "Sim platform factory cannot build custom type: {}",
                factory
            ))),
        }
    }
}
