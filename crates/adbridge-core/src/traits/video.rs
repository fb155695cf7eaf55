// # Video Platform Trait
//
// Defines the interface for the instream video-ad platform: display
// surface construction, ad requests and the loader/manager lifecycle
// event stream.
//
// ## Implementations
//
// - Simulated platform (CI/testing): `adbridge-platform-sim` crate
// - Real deployments: a binding over the actual video SDK
//
// ## Usage
//
// ```rust,ignore
// use adbridge_core::traits::{AdRequest, VideoPlatform};
// use tokio_stream::StreamExt;
//
// async fn one_request(video: &dyn VideoPlatform, tag: &str) -> adbridge_core::Result<()> {
//     let display = video.create_display("ad-container", "player").await?;
//     video.initialize(&display).await?;
//
//     let mut events = video.events();
//     let request = AdRequest::for_surface(tag, video.surface_size("player"));
//     video.request_ads(&display, &request).await?;
//
//     while let Some(event) = events.next().await {
//         // React to manager-loaded / ad-error / pause / resume
//     }
//     Ok(())
// }
// ```

use async_trait::async_trait;
use std::pin::Pin;
use tokio_stream::Stream;

/// Height hint used for linear ads when the playback surface has not laid
/// out yet and reports zero height
pub const DEFAULT_LINEAR_HEIGHT: u32 = 250;

/// Fixed height of the non-linear overlay strip
pub const NON_LINEAR_STRIP_HEIGHT: u32 = 100;

/// Opaque handle to an ad display surface
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DisplayHandle(u64);

impl DisplayHandle {
    /// Create a handle from a raw platform identifier
    pub fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// The raw platform identifier
    pub fn raw(&self) -> u64 {
        self.0
    }
}

/// Rendered size of a playback surface in logical pixels
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SurfaceSize {
    /// Rendered width
    pub width: u32,
    /// Rendered height (zero when not laid out yet)
    pub height: u32,
}

impl SurfaceSize {
    /// Create a surface size
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

/// One video ad request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdRequest {
    /// VAST tag URL to request
    pub tag_url: String,
    /// Linear ad slot width
    pub linear_width: u32,
    /// Linear ad slot height
    pub linear_height: u32,
    /// Non-linear ad slot width
    pub non_linear_width: u32,
    /// Non-linear ad slot height
    pub non_linear_height: u32,
}

impl AdRequest {
    /// Build a request sized to a playback surface
    ///
    /// Linear hints take the surface's rendered size, falling back to
    /// [`DEFAULT_LINEAR_HEIGHT`] when the surface reports zero height.
    /// The non-linear strip spans the surface width at
    /// [`NON_LINEAR_STRIP_HEIGHT`].
    pub fn for_surface(tag_url: impl Into<String>, surface: SurfaceSize) -> Self {
        let linear_height = if surface.height == 0 {
            DEFAULT_LINEAR_HEIGHT
        } else {
            surface.height
        };

        Self {
            tag_url: tag_url.into(),
            linear_width: surface.width,
            linear_height,
            non_linear_width: surface.width,
            non_linear_height: NON_LINEAR_STRIP_HEIGHT,
        }
    }
}

/// Lifecycle events emitted by the video platform
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VideoEvent {
    /// An ads manager finished loading and playback can start
    ManagerLoaded,

    /// The loader or the manager reported an error
    AdError {
        /// Platform-reported error description
        message: String,
    },

    /// The host should pause its content for an ad break
    ContentPauseRequested,

    /// The ad break ended and the host may resume its content
    ContentResumeRequested,
}

/// Trait for video-ad platform implementations
///
/// Models an SDK whose request outcomes arrive asynchronously as events
/// rather than as call results: a successful [`request_ads`](VideoPlatform::request_ads)
/// only means the request was issued.
///
/// # Thread Safety
///
/// Implementations must be thread-safe and usable across async tasks.
#[async_trait]
pub trait VideoPlatform: Send + Sync {
    /// Build an ad display surface bound to a container/player pair
    ///
    /// # Parameters
    ///
    /// - `container`: Host container identifier the ad renders into
    /// - `player`: Playback surface identifier for content/ad handoff
    async fn create_display(
        &self,
        container: &str,
        player: &str,
    ) -> Result<DisplayHandle, crate::Error>;

    /// Initialize an ad display surface
    ///
    /// On mobile the underlying SDK requires this to happen in response
    /// to a user interaction; the caller owns that restriction.
    async fn initialize(&self, display: &DisplayHandle) -> Result<(), crate::Error>;

    /// The playback surface's current rendered size
    ///
    /// Reports zero height while the surface has not laid out.
    fn surface_size(&self, player: &str) -> SurfaceSize;

    /// Issue an ad request
    ///
    /// Outcomes arrive on the [`events`](VideoPlatform::events) stream.
    async fn request_ads(
        &self,
        display: &DisplayHandle,
        request: &AdRequest,
    ) -> Result<(), crate::Error>;

    /// Initialize and start playback of a loaded ad pod
    async fn start_ads(
        &self,
        display: &DisplayHandle,
        width: u32,
        height: u32,
    ) -> Result<(), crate::Error>;

    /// Subscribe to lifecycle events
    ///
    /// Each call returns a fresh subscription receiving all emissions
    /// from this point on.
    fn events(&self) -> Pin<Box<dyn Stream<Item = VideoEvent> + Send + 'static>>;
}

/// Helper trait for constructing video platforms from configuration
pub trait VideoPlatformFactory: Send + Sync {
    /// Create a VideoPlatform instance from configuration
    ///
    /// # Parameters
    ///
    /// - `config`: Configuration specific to this video platform type
    ///
    /// # Returns
    ///
    /// A shared VideoPlatform trait object
    fn create(
        &self,
        config: &crate::config::VideoPlatformConfig,
    ) -> Result<std::sync::Arc<dyn VideoPlatform>, crate::Error>;
}
