//! Simulated SDK script loader

use adbridge_core::config::BootstrapConfig;
use adbridge_core::traits::{SdkBootstrap, SdkBootstrapFactory};
use adbridge_core::{Error, Result};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use tracing::debug;

/// In-process stand-in for the script loader
///
/// Loading flips a readiness flag instead of fetching anything. Failure
/// switches make either SDK's load fail on demand, and load counters
/// expose how often each script was requested, so tests can verify both
/// the ensure-loaded pattern and the degrade-on-failure policy.
pub struct SimBootstrap {
    primary_ready: AtomicBool,
    video_ready: AtomicBool,
    fail_primary: AtomicBool,
    fail_video: AtomicBool,
    primary_load_count: AtomicUsize,
    video_load_count: AtomicUsize,
}

impl SimBootstrap {
    /// Create a loader with neither SDK ready
    pub fn new() -> Self {
        Self::with_ready(false, false)
    }

    /// Create a loader with chosen initial readiness
    pub fn with_ready(primary_ready: bool, video_ready: bool) -> Self {
        Self {
            primary_ready: AtomicBool::new(primary_ready),
            video_ready: AtomicBool::new(video_ready),
            fail_primary: AtomicBool::new(false),
            fail_video: AtomicBool::new(false),
            primary_load_count: AtomicUsize::new(0),
            video_load_count: AtomicUsize::new(0),
        }
    }

    /// Make primary-SDK loads fail from now on
    pub fn set_fail_primary(&self, fail: bool) {
        self.fail_primary.store(fail, Ordering::SeqCst);
    }

    /// Make video-SDK loads fail from now on
    pub fn set_fail_video(&self, fail: bool) {
        self.fail_video.store(fail, Ordering::SeqCst);
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

impl Default for SimBootstrap {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl SdkBootstrap for SimBootstrap {
    async fn load_primary(&self) -> Result<()> {
        self.primary_load_count.fetch_add(1, Ordering::SeqCst);
        if self.fail_primary.load(Ordering::SeqCst) {
            return Err(Error::bootstrap("simulated primary script failure"));
        }
        self.primary_ready.store(true, Ordering::SeqCst);
        debug!("simulated primary SDK loaded");
        Ok(())
    }

    async fn load_video(&self) -> Result<()> {
        self.video_load_count.fetch_add(1, Ordering::SeqCst);
        if self.fail_video.load(Ordering::SeqCst) {
            return Err(Error::bootstrap("simulated video script failure"));
        }
        self.video_ready.store(true, Ordering::SeqCst);
        debug!("simulated video SDK loaded");
        Ok(())
    }

    fn is_primary_ready(&self) -> bool {
        self.primary_ready.load(Ordering::SeqCst)
    }

    fn is_video_ready(&self) -> bool {
        self.video_ready.load(Ordering::SeqCst)
    }
}

/// Factory for [`SimBootstrap`]
pub struct SimBootstrapFactory;

impl SdkBootstrapFactory for SimBootstrapFactory {
    fn create(&self, config: &BootstrapConfig) -> Result<Arc<dyn SdkBootstrap>> {
        match config {
            BootstrapConfig::Sim {
                primary_ready,
                video_ready,
            } => Ok(Arc::new(SimBootstrap::with_ready(
                *primary_ready,
                *video_ready,
            ))),
            BootstrapConfig::Custom { factory, .. } => Err(Error::config(format!(
                "Sim bootstrap factory cannot build custom type: {}",
                factory
            ))),
        }
    }
}
