//! Test doubles and common utilities for architecture contract tests
//!
//! This module provides instrumented doubles that verify the lifecycle
//! contracts without implementing real ad-serving functionality.

#![allow(dead_code)]

use adbridge_core::config::{AdSize, PageSettings};
use adbridge_core::error::Result;
use adbridge_core::queue::{CommandQueue, Task};
use adbridge_core::traits::{
    AdPlatform, AdRequest, DisplayHandle, DisplayTarget, EventHandler, ListenerId,
    OutOfPageFormat, SdkBootstrap, SizeMapping, SlotEvent, SlotEventKind, SlotHandle, SurfaceSize,
    VideoEvent, VideoPlatform,
};
use std::collections::{HashMap, VecDeque};
use std::pin::Pin;
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::mpsc;
use tokio_stream::Stream;
use tokio_stream::wrappers::UnboundedReceiverStream;

/// Let spawned unit tasks run to their next await point
///
/// Yields the test task repeatedly so background work progresses without
/// real time passing (safe under the paused clock: the runtime never goes
/// idle while the test task keeps yielding).
pub async fn settle() {
    for _ in 0..32 {
        tokio::task::yield_now().await;
    }
}

/// A bootstrap double with per-SDK failure switches and load counters
pub struct MockBootstrap {
    primary_ready: AtomicBool,
    video_ready: AtomicBool,
    fail_primary: AtomicBool,
    fail_video: AtomicBool,
    primary_load_count: Arc<AtomicUsize>,
    video_load_count: Arc<AtomicUsize>,
}

impl MockBootstrap {
    pub fn new() -> Self {
        Self {
            primary_ready: AtomicBool::new(false),
            video_ready: AtomicBool::new(false),
            fail_primary: AtomicBool::new(false),
            fail_video: AtomicBool::new(false),
            primary_load_count: Arc::new(AtomicUsize::new(0)),
            video_load_count: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Make every primary-SDK load attempt fail
    pub fn fail_primary(self) -> Self {
        self.fail_primary.store(true, Ordering::SeqCst);
        self
    }

    /// Make every video-SDK load attempt fail
    pub fn fail_video(self) -> Self {
        self.fail_video.store(true, Ordering::SeqCst);
        self
    }

    /// Get the number of times load_primary() was called
    pub fn primary_load_count(&self) -> usize {
        self.primary_load_count.load(Ordering::SeqCst)
    }

    /// Get the number of times load_video() was called
    pub fn video_load_count(&self) -> usize {
        self.video_load_count.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl SdkBootstrap for MockBootstrap {
    async fn load_primary(&self) -> Result<()> {
        self.primary_load_count.fetch_add(1, Ordering::SeqCst);
        if self.fail_primary.load(Ordering::SeqCst) {
            return Err(adbridge_core::Error::bootstrap("primary script blocked"));
        }
        self.primary_ready.store(true, Ordering::SeqCst);
        Ok(())
    }

    async fn load_video(&self) -> Result<()> {
        self.video_load_count.fetch_add(1, Ordering::SeqCst);
        if self.fail_video.load(Ordering::SeqCst) {
            return Err(adbridge_core::Error::bootstrap("video script blocked"));
        }
        self.video_ready.store(true, Ordering::SeqCst);
        Ok(())
    }

    fn is_primary_ready(&self) -> bool {
        self.primary_ready.load(Ordering::SeqCst)
    }

    fn is_video_ready(&self) -> bool {
        self.video_ready.load(Ordering::SeqCst)
    }
}

/// A display-platform double recording every call and dispatching events
/// on demand
pub struct RecordingAdPlatform {
    queue: CommandQueue,
    next_id: AtomicU64,
    refuse_out_of_page: AtomicBool,
    refuse_static: AtomicBool,
    live_slots: Mutex<Vec<SlotHandle>>,
    listeners: Mutex<HashMap<SlotEventKind, Vec<(ListenerId, EventHandler)>>>,
    displays: Mutex<Vec<DisplayTarget>>,
    refreshes: Mutex<Vec<Vec<SlotHandle>>>,
    destroyed: Mutex<Vec<SlotHandle>>,
    made_visible: Mutex<Vec<SlotHandle>>,
    mappings: Mutex<Vec<(SlotHandle, SizeMapping)>>,
    initial_load_disable_count: AtomicUsize,
    applied_settings: Mutex<Vec<PageSettings>>,
}

impl RecordingAdPlatform {
    /// Platform whose command queue runs tasks immediately
    pub fn activated() -> Self {
        Self::with_queue(CommandQueue::activated())
    }

    /// Platform whose command queue buffers until [`activate`](Self::activate)
    pub fn deferred() -> Self {
        Self::with_queue(CommandQueue::new())
    }

    fn with_queue(queue: CommandQueue) -> Self {
        Self {
            queue,
            next_id: AtomicU64::new(1),
            refuse_out_of_page: AtomicBool::new(false),
            refuse_static: AtomicBool::new(false),
            live_slots: Mutex::new(Vec::new()),
            listeners: Mutex::new(HashMap::new()),
            displays: Mutex::new(Vec::new()),
            refreshes: Mutex::new(Vec::new()),
            destroyed: Mutex::new(Vec::new()),
            made_visible: Mutex::new(Vec::new()),
            mappings: Mutex::new(Vec::new()),
            initial_load_disable_count: AtomicUsize::new(0),
            applied_settings: Mutex::new(Vec::new()),
        }
    }

    /// Drain the deferred queue
    pub fn activate(&self) {
        self.queue.activate();
    }

    /// Number of tasks still buffered
    pub fn pending_tasks(&self) -> usize {
        self.queue.pending()
    }

    /// Make every out-of-page definition attempt fail
    pub fn refuse_out_of_page(&self) {
        self.refuse_out_of_page.store(true, Ordering::SeqCst);
    }

    /// Make every static definition attempt fail
    pub fn refuse_static(&self) {
        self.refuse_static.store(true, Ordering::SeqCst);
    }

    /// Dispatch an event to a snapshot of the subscribed handlers
    pub fn emit(&self, event: SlotEvent) {
        let handlers: Vec<EventHandler> = {
            let listeners = self.listeners.lock().unwrap();
            listeners
                .get(&event.kind())
                .map(|entries| entries.iter().map(|(_, h)| Arc::clone(h)).collect())
                .unwrap_or_default()
        };
        for handler in handlers {
            handler(self, &event);
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

    /// Slots defined and not yet destroyed
    pub fn live_slots(&self) -> Vec<SlotHandle> {
        self.live_slots.lock().unwrap().clone()
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

    pub fn mappings(&self) -> Vec<(SlotHandle, SizeMapping)> {
        self.mappings.lock().unwrap().clone()
    }

    pub fn initial_load_disable_count(&self) -> usize {
        self.initial_load_disable_count.load(Ordering::SeqCst)
    }

    pub fn applied_settings(&self) -> Vec<PageSettings> {
        self.applied_settings.lock().unwrap().clone()
    }

    fn new_slot(&self) -> SlotHandle {
        let slot = SlotHandle::new(self.next_id.fetch_add(1, Ordering::SeqCst));
        self.live_slots.lock().unwrap().push(slot);
        slot
    }
}

impl AdPlatform for RecordingAdPlatform {
    fn enqueue(&self, task: Task) {
        self.queue.enqueue(task);
    }

    fn define_slot(&self, _path: &str, _sizes: &[AdSize], _container: &str) -> Option<SlotHandle> {
        if self.refuse_static.load(Ordering::SeqCst) {
            return None;
        }
        Some(self.new_slot())
    }

    fn define_out_of_page_slot(&self, _path: &str, _format: OutOfPageFormat) -> Option<SlotHandle> {
        if self.refuse_out_of_page.load(Ordering::SeqCst) {
            return None;
        }
        Some(self.new_slot())
    }

    fn set_size_mapping(&self, slot: &SlotHandle, mapping: &SizeMapping) {
        self.mappings.lock().unwrap().push((*slot, mapping.clone()));
    }

    fn disable_initial_load(&self) {
        self.initial_load_disable_count
            .fetch_add(1, Ordering::SeqCst);
    }

    fn enable_video_ads(&self) {}

    fn configure(&self, settings: &PageSettings) {
        self.applied_settings.lock().unwrap().push(settings.clone());
    }

    fn enable_services(&self) {}

    fn display(&self, target: DisplayTarget) {
        self.displays.lock().unwrap().push(target);
    }

    fn refresh(&self, slots: &[SlotHandle]) {
        self.refreshes.lock().unwrap().push(slots.to_vec());
    }

    fn destroy_slots(&self, slots: &[SlotHandle]) {
        let mut live = self.live_slots.lock().unwrap();
        live.retain(|slot| !slots.contains(slot));
        self.destroyed.lock().unwrap().extend_from_slice(slots);
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

/// Per-request outcome for [`ScriptedVideoPlatform`]
#[derive(Debug, Clone)]
pub enum ScriptedResponse {
    /// The request produces a loaded ads manager
    Fill,
    /// The request produces an ad error
    Error(String),
}

/// A video-platform double with a per-request response script and fan-out
/// event channels
pub struct ScriptedVideoPlatform {
    next_id: AtomicU64,
    surfaces: Mutex<HashMap<String, SurfaceSize>>,
    script: Mutex<VecDeque<ScriptedResponse>>,
    senders: Mutex<Vec<mpsc::UnboundedSender<VideoEvent>>>,
    creates: Mutex<Vec<(String, String)>>,
    initializes: Mutex<Vec<DisplayHandle>>,
    requests: Mutex<Vec<(DisplayHandle, AdRequest)>>,
    starts: Mutex<Vec<(DisplayHandle, u32, u32)>>,
}

impl ScriptedVideoPlatform {
    pub fn new() -> Self {
        Self {
            next_id: AtomicU64::new(1),
            surfaces: Mutex::new(HashMap::new()),
            script: Mutex::new(VecDeque::new()),
            senders: Mutex::new(Vec::new()),
            creates: Mutex::new(Vec::new()),
            initializes: Mutex::new(Vec::new()),
            requests: Mutex::new(Vec::new()),
            starts: Mutex::new(Vec::new()),
        }
    }

    /// Set the rendered size reported for a playback surface
    pub fn set_surface_size(&self, player: &str, size: SurfaceSize) {
        self.surfaces
            .lock()
            .unwrap()
            .insert(player.to_string(), size);
    }

    /// Append the outcome of the next unscripted request
    ///
    /// Requests beyond the script default to [`ScriptedResponse::Fill`].
    pub fn push_response(&self, response: ScriptedResponse) {
        self.script.lock().unwrap().push_back(response);
    }

    /// Dispatch an event to every active subscription
    pub fn emit(&self, event: VideoEvent) {
        let senders = self.senders.lock().unwrap();
        for sender in senders.iter() {
            let _ = sender.send(event.clone());
        }
    }

    pub fn create_count(&self) -> usize {
        self.creates.lock().unwrap().len()
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    pub fn requests(&self) -> Vec<(DisplayHandle, AdRequest)> {
        self.requests.lock().unwrap().clone()
    }

    pub fn starts(&self) -> Vec<(DisplayHandle, u32, u32)> {
        self.starts.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl VideoPlatform for ScriptedVideoPlatform {
    async fn create_display(&self, container: &str, player: &str) -> Result<DisplayHandle> {
        let display = DisplayHandle::new(self.next_id.fetch_add(1, Ordering::SeqCst));
        self.creates
            .lock()
            .unwrap()
            .push((container.to_string(), player.to_string()));
        Ok(display)
    }

    async fn initialize(&self, display: &DisplayHandle) -> Result<()> {
        self.initializes.lock().unwrap().push(*display);
        Ok(())
    }

    fn surface_size(&self, player: &str) -> SurfaceSize {
        self.surfaces
            .lock()
            .unwrap()
            .get(player)
            .copied()
            .unwrap_or_default()
    }

    async fn request_ads(&self, display: &DisplayHandle, request: &AdRequest) -> Result<()> {
        self.requests
            .lock()
            .unwrap()
            .push((*display, request.clone()));

        let response = self
            .script
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(ScriptedResponse::Fill);
        match response {
            ScriptedResponse::Fill => self.emit(VideoEvent::ManagerLoaded),
            ScriptedResponse::Error(message) => self.emit(VideoEvent::AdError { message }),
        }
        Ok(())
    }

    async fn start_ads(&self, display: &DisplayHandle, width: u32, height: u32) -> Result<()> {
        self.starts.lock().unwrap().push((*display, width, height));
        Ok(())
    }

    fn events(&self) -> Pin<Box<dyn Stream<Item = VideoEvent> + Send + 'static>> {
        let (tx, rx) = mpsc::unbounded_channel();
        self.senders.lock().unwrap().push(tx);
        Box::pin(UnboundedReceiverStream::new(rx))
    }
}
