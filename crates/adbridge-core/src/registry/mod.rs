//! Plugin-based platform registry
//!
//! The registry allows SDK bootstraps and platform implementations to be
//! registered dynamically at runtime, avoiding hardcoded if-else chains
//! over implementation names.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use adbridge_core::registry::PlatformRegistry;
//! use adbridge_core::config::PlatformConfig;
//!
//! // Create a registry
//! let registry = PlatformRegistry::new();
//!
//! // Register implementations
//! registry.register_platform("sim", Box::new(sim_factory));
//!
//! // Create a platform from config
//! let config = PlatformConfig::Sim { activated: true };
//! let platform = registry.create_platform(&config)?;
//! ```
//!
//! ## Registration
//!
//! Implementation crates should register themselves during initialization:
//!
//! ```rust,ignore
//! // In adbridge-platform-sim
//! pub fn register(registry: &PlatformRegistry) {
//!     registry.register_platform("sim", Box::new(SimAdPlatformFactory));
//! }
//! ```

use crate::config::{BootstrapConfig, PlatformConfig, VideoPlatformConfig};
use crate::error::{Error, Result};
use crate::traits::{AdPlatform, SdkBootstrap, VideoPlatform};
use crate::traits::{AdPlatformFactory, SdkBootstrapFactory, VideoPlatformFactory};
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

/// Registry for plugin-based platform creation
///
/// The registry maintains a map of implementation type names to factory
/// objects, allowing dynamic instantiation based on configuration.
/// Factories hand back `Arc` trait objects because one platform instance
/// is shared by several ad units.
///
/// ## Thread Safety
///
/// The registry uses interior mutability with RwLock, allowing concurrent
/// reads and exclusive writes.
#[derive(Default)]
pub struct PlatformRegistry {
    /// Registered SDK bootstrap factories
    bootstraps: RwLock<HashMap<String, Box<dyn SdkBootstrapFactory>>>,

    /// Registered display-ad platform factories
    platforms: RwLock<HashMap<String, Box<dyn AdPlatformFactory>>>,

    /// Registered video-ad platform factories
    videos: RwLock<HashMap<String, Box<dyn VideoPlatformFactory>>>,
}

impl PlatformRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an SDK bootstrap factory
    ///
    /// # Parameters
    ///
    /// - `name`: Bootstrap type name (e.g., "sim")
    /// - `factory`: Factory object for creating bootstrap instances
    pub fn register_bootstrap(
        &self,
        name: impl Into<String>,
        factory: Box<dyn SdkBootstrapFactory>,
    ) {
        let name = name.into();
        let mut bootstraps = self.bootstraps.write().unwrap();
        bootstraps.insert(name, factory);
    }

    /// Register a display-ad platform factory
    ///
    /// # Parameters
    ///
    /// - `name`: Platform type name (e.g., "sim")
    /// - `factory`: Factory object for creating platform instances
    pub fn register_platform(&self, name: impl Into<String>, factory: Box<dyn AdPlatformFactory>) {
        let name = name.into();
        let mut platforms = self.platforms.write().unwrap();
        platforms.insert(name, factory);
    }

    /// Register a video-ad platform factory
    ///
    /// # Parameters
    ///
    /// - `name`: Video platform type name (e.g., "sim")
    /// - `factory`: Factory object for creating video platform instances
    pub fn register_video(&self, name: impl Into<String>, factory: Box<dyn VideoPlatformFactory>) {
        let name = name.into();
        let mut videos = self.videos.write().unwrap();
        videos.insert(name, factory);
    }

    /// Create an SDK bootstrap from configuration
    ///
    /// # Returns
    ///
    /// - `Ok(Arc<dyn SdkBootstrap>)`: Created bootstrap instance
    /// - `Err(Error)`: If the type is not registered or creation fails
    pub fn create_bootstrap(&self, config: &BootstrapConfig) -> Result<Arc<dyn SdkBootstrap>> {
        let bootstrap_type = config.type_name();
        let bootstraps = self.bootstraps.read().unwrap();

        let factory = bootstraps
            .get(bootstrap_type)
            .ok_or_else(|| Error::config(format!("Unknown bootstrap type: {}", bootstrap_type)))?;

        factory.create(config)
    }

    /// Create a display-ad platform from configuration
    ///
    /// # Returns
    ///
    /// - `Ok(Arc<dyn AdPlatform>)`: Created platform instance
    /// - `Err(Error)`: If the type is not registered or creation fails
    pub fn create_platform(&self, config: &PlatformConfig) -> Result<Arc<dyn AdPlatform>> {
        let platform_type = config.type_name();
        let platforms = self.platforms.read().unwrap();

        let factory = platforms
            .get(platform_type)
            .ok_or_else(|| Error::config(format!("Unknown platform type: {}", platform_type)))?;

        factory.create(config)
    }

    /// Create a video-ad platform from configuration
    ///
    /// # Returns
    ///
    /// - `Ok(Arc<dyn VideoPlatform>)`: Created video platform instance
    /// - `Err(Error)`: If the type is not registered or creation fails
    pub fn create_video(&self, config: &VideoPlatformConfig) -> Result<Arc<dyn VideoPlatform>> {
        let video_type = config.type_name();
        let videos = self.videos.read().unwrap();

        let factory = videos
            .get(video_type)
            .ok_or_else(|| Error::config(format!("Unknown video platform type: {}", video_type)))?;

        factory.create(config)
    }

    /// List all registered bootstrap types
    pub fn list_bootstraps(&self) -> Vec<String> {
        let bootstraps = self.bootstraps.read().unwrap();
        bootstraps.keys().cloned().collect()
    }

    /// List all registered platform types
    pub fn list_platforms(&self) -> Vec<String> {
        let platforms = self.platforms.read().unwrap();
        platforms.keys().cloned().collect()
    }

    /// List all registered video platform types
    pub fn list_videos(&self) -> Vec<String> {
        let videos = self.videos.read().unwrap();
        videos.keys().cloned().collect()
    }

    /// Check if a bootstrap type is registered
    pub fn has_bootstrap(&self, name: &str) -> bool {
        let bootstraps = self.bootstraps.read().unwrap();
        bootstraps.contains_key(name)
    }

    /// Check if a platform type is registered
    pub fn has_platform(&self, name: &str) -> bool {
        let platforms = self.platforms.read().unwrap();
        platforms.contains_key(name)
    }

    /// Check if a video platform type is registered
    pub fn has_video(&self, name: &str) -> bool {
        let videos = self.videos.read().unwrap();
        videos.contains_key(name)
    }
}
