//! One-time platform initialization
//!
//! Hosts call [`initialize`] once at startup, before constructing ad
//! units. This is the one SDK-loading path that returns its error: the
//! host invokes it deliberately and can decide what a page without ads
//! does, whereas the units' own `show()`/`start()` paths absorb load
//! failures so an ad never blocks the host's flow.

use crate::config::PageSettings;
use crate::traits::bootstrap::SdkBootstrap;
use crate::traits::platform::AdPlatform;
use std::sync::Arc;
use tracing::info;

/// Load both SDKs and apply the page-level platform settings
///
/// Settings application goes through the command queue, so it lands
/// exactly once the platform is ready, before any slot work queued later.
///
/// # Parameters
///
/// - `bootstrap`: SDK loader
/// - `platform`: Display-ad platform
/// - `settings`: Page-level settings (single-request, safe frame, page URL)
///
/// # Returns
///
/// An error when either SDK script fails to load.
pub async fn initialize(
    bootstrap: &dyn SdkBootstrap,
    platform: &Arc<dyn AdPlatform>,
    settings: &PageSettings,
) -> Result<(), crate::Error> {
    bootstrap.ensure_primary().await?;
    bootstrap.ensure_video().await?;

    let queued = Arc::clone(platform);
    let settings = settings.clone();
    platform.enqueue(Box::new(move || {
        queued.configure(&settings);
        queued.enable_services();
    }));

    info!("ad platforms initialized");
    Ok(())
}
