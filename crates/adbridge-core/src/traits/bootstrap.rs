// # SDK Bootstrap Trait
//
// Defines the interface for loading the two external ad SDKs (the display
// platform and the video platform) and querying their readiness.
//
// ## Implementations
//
// - Simulated loader (CI/testing): `adbridge-platform-sim` crate
// - Real deployments: script/library loading glue owned by the host
//
// ## Usage
//
// ```rust,ignore
// use adbridge_core::SdkBootstrap;
//
// async fn prepare(bootstrap: &dyn SdkBootstrap) -> adbridge_core::Result<()> {
//     // Load only what is not ready yet
//     bootstrap.ensure_primary().await?;
//     bootstrap.ensure_video().await?;
//     Ok(())
// }
// ```

use async_trait::async_trait;

/// Trait for SDK script loading implementations
///
/// Loading must be idempotent: calling a `load_*` method when the SDK is
/// already available is a cheap no-op. Implementations must be thread-safe
/// and usable across async tasks.
///
/// Ad units treat load failures as soft: they are logged and the operation
/// that needed the SDK silently degrades. Only the deliberate
/// [`initialize`](crate::initialize) setup path returns them to the host.
#[async_trait]
pub trait SdkBootstrap: Send + Sync {
    /// Load the primary (display-ad) SDK
    ///
    /// # Returns
    ///
    /// - `Ok(())`: The SDK is available
    /// - `Err(Error)`: The script could not be loaded
    async fn load_primary(&self) -> Result<(), crate::Error>;

    /// Load the video-ad SDK
    ///
    /// # Returns
    ///
    /// - `Ok(())`: The SDK is available
    /// - `Err(Error)`: The script could not be loaded
    async fn load_video(&self) -> Result<(), crate::Error>;

    /// Whether the primary SDK is ready for use
    fn is_primary_ready(&self) -> bool;

    /// Whether the video SDK is ready for use
    fn is_video_ready(&self) -> bool;

    /// Load the primary SDK only if it is not already ready
    async fn ensure_primary(&self) -> Result<(), crate::Error> {
        if self.is_primary_ready() {
            return Ok(());
        }
        self.load_primary().await
    }

    /// Load the video SDK only if it is not already ready
    async fn ensure_video(&self) -> Result<(), crate::Error> {
        if self.is_video_ready() {
            return Ok(());
        }
        self.load_video().await
    }
}

/// Helper trait for constructing bootstraps from configuration
pub trait SdkBootstrapFactory: Send + Sync {
    /// Create an SdkBootstrap instance from configuration
    ///
    /// # Parameters
    ///
    /// - `config`: Configuration specific to this bootstrap type
    ///
    /// # Returns
    ///
    /// A shared SdkBootstrap trait object
    fn create(
        &self,
        config: &crate::config::BootstrapConfig,
    ) -> Result<std::sync::Arc<dyn SdkBootstrap>, crate::Error>;
}
