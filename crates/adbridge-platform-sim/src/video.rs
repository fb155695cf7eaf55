//! Simulated video-ad platform

use adbridge_core::config::VideoPlatformConfig;
use adbridge_core::traits::{
    AdRequest, DisplayHandle, SurfaceSize, VideoEvent, VideoPlatform, VideoPlatformFactory,
};
use adbridge_core::{Error, Result};
use std::collections::{HashMap, VecDeque};
use std::pin::Pin;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::mpsc;
use tokio_stream::Stream;
use tokio_stream::wrappers::UnboundedReceiverStream;
use tracing::debug;

/// Scripted outcome of one ad request
#[derive(Debug, Clone)]
pub enum SimAdResponse {
    /// The request loads an ads manager
    Fill,
    /// The request returns no creative; nothing happens
    NoFill,
    /// The request fails with an ad error
    Error(String),
}

/// In-process stand-in for the instream video SDK
///
/// Request outcomes follow a script consumed one entry per request
/// (defaulting to [`SimAdResponse::Fill`] when the script runs out), and
/// lifecycle events fan out to every active [`events`](VideoPlatform::events)
/// subscription. Surface sizes are registered per player identifier.
pub struct SimVideoPlatform {
    next_id: AtomicU64,
    surfaces: Mutex<HashMap<String, SurfaceSize>>,
    script: Mutex<VecDeque<SimAdResponse>>,
    senders: Mutex<Vec<mpsc::UnboundedSender<VideoEvent>>>,
    displays: Mutex<HashMap<DisplayHandle, (String, String)>>,
    initialized: Mutex<Vec<DisplayHandle>>,
    requests: Mutex<Vec<(DisplayHandle, AdRequest)>>,
    starts: Mutex<Vec<(DisplayHandle, u32, u32)>>,
}

impl SimVideoPlatform {
    pub fn new() -> Self {
        Self {
            next_id: AtomicU64::new(1),
            surfaces: Mutex::new(HashMap::new()),
            script: Mutex::new(VecDeque::new()),
            senders: Mutex::new(Vec::new()),
            displays: Mutex::new(HashMap::new()),
            initialized: Mutex::new(Vec::new()),
            requests: Mutex::new(Vec::new()),
            starts: Mutex::new(Vec::new()),
        }
    }

    /// Register the rendered size reported for a playback surface
    pub fn set_surface_size(&self, player: &str, size: SurfaceSize) {
        self.surfaces
            .lock()
            .unwrap()
            .insert(player.to_string(), size);
    }

    /// Append the outcome of the next unscripted request
    pub fn push_response(&self, response: SimAdResponse) {
        self.script.lock().unwrap().push_back(response);
    }

    /// Dispatch an event to every active subscription
    pub fn emit(&self, event: VideoEvent) {
        let senders = self.senders.lock().unwrap();
        debug!(?event, subscribers = senders.len(), "dispatching video event");
        for sender in senders.iter() {
            let _ = sender.send(event.clone());
        }
    }

    /// Display surfaces created so far, with their container/player pair
    pub fn created_displays(&self) -> Vec<(DisplayHandle, String, String)> {
        self.displays
            .lock()
            .unwrap()
            .iter()
            .map(|(handle, (container, player))| (*handle, container.clone(), player.clone()))
            .collect()
    }

    pub fn initialized_displays(&self) -> Vec<DisplayHandle> {
        self.initialized.lock().unwrap().clone()
    }

    pub fn requests(&self) -> Vec<(DisplayHandle, AdRequest)> {
        self.requests.lock().unwrap().clone()
    }

    pub fn starts(&self) -> Vec<(DisplayHandle, u32, u32)> {
        self.starts.lock().unwrap().clone()
    }
}

impl Default for SimVideoPlatform {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl VideoPlatform for SimVideoPlatform {
    async fn create_display(&self, container: &str, player: &str) -> Result<DisplayHandle> {
        if container.is_empty() || player.is_empty() {
            return Err(Error::config(
                "Display surface needs a container and a player",
            ));
        }
        let handle = DisplayHandle::new(self.next_id.fetch_add(1, Ordering::SeqCst));
        self.displays
            .lock()
            .unwrap()
            .insert(handle, (container.to_string(), player.to_string()));
        debug!(container, player, "display surface created");
        Ok(handle)
    }

    async fn initialize(&self, display: &DisplayHandle) -> Result<()> {
        if !self.displays.lock().unwrap().contains_key(display) {
            return Err(Error::platform("sim", "unknown display surface"));
        }
        self.initialized.lock().unwrap().push(*display);
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
        if !self.displays.lock().unwrap().contains_key(display) {
            return Err(Error::platform("sim", "unknown display surface"));
        }
        self.requests
            .lock()
            .unwrap()
            .push((*display, request.clone()));

        let response = self
            .script
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(SimAdResponse::Fill);
        match response {
            SimAdResponse::Fill => self.emit(VideoEvent::ManagerLoaded),
            SimAdResponse::NoFill => debug!("scripted no-fill, no event"),
            SimAdResponse::Error(message) => self.emit(VideoEvent::AdError { message }),
        }
        Ok(())
    }

    async fn start_ads(&self, display: &DisplayHandle, width: u32, height: u32) -> Result<()> {
        if !self.initialized.lock().unwrap().contains(display) {
            return Err(Error::platform("sim", "display surface not initialized"));
        }
        self.starts.lock().unwrap().push((*display, width, height));

        // Playback begins: the host is asked to pause its content
        self.emit(VideoEvent::ContentPauseRequested);
        Ok(())
    }

    fn events(&self) -> Pin<Box<dyn Stream<Item = VideoEvent> + Send + 'static>> {
        let (tx, rx) = mpsc::unbounded_channel();
        self.senders.lock().unwrap().push(tx);
        Box::pin(UnboundedReceiverStream::new(rx))
    }
}

/// Factory for [`SimVideoPlatform`]
pub struct SimVideoPlatformFactory;

impl VideoPlatformFactory for SimVideoPlatformFactory {
    fn create(&self, config: &VideoPlatformConfig) -> Result<Arc<dyn VideoPlatform>> {
        match config {
            VideoPlatformConfig::Sim => Ok(Arc::new(SimVideoPlatform::new())),
            VideoPlatformConfig::Custom { factory, .. } => Err(Error::config(format!(
                "Sim video factory cannot build custom type: {}",
                factory
            ))),
        }
    }
}
