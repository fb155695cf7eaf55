//! Configuration types for the ad mediation layer
//!
//! This module defines all configuration structures used throughout the crate:
//! the static ad-unit registry the embedding application ships with, the
//! page-level platform settings applied once at initialization, and the
//! tagged selection enums the [`PlatformRegistry`](crate::PlatformRegistry)
//! builds implementations from.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A fixed creative size in logical pixels
///
/// Serialized as a `[width, height]` pair, matching the shape ad-unit
/// registries are usually published in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "(u32, u32)", into = "(u32, u32)")]
pub struct AdSize {
    /// Creative width
    pub width: u32,
    /// Creative height
    pub height: u32,
}

impl AdSize {
    /// Create a new creative size
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

impl From<(u32, u32)> for AdSize {
    fn from((width, height): (u32, u32)) -> Self {
        Self { width, height }
    }
}

impl From<AdSize> for (u32, u32) {
    fn from(size: AdSize) -> Self {
        (size.width, size.height)
    }
}

impl fmt::Display for AdSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// Immutable descriptor of one ad unit
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdUnitConfig {
    /// Full ad-unit path (e.g. "/6355419/Travel/Europe")
    pub id: String,

    /// Creative sizes the unit may serve
    ///
    /// Out-of-page formats carry their own dimensions, so this may be empty.
    #[serde(default)]
    pub sizes: Vec<AdSize>,
}

impl AdUnitConfig {
    /// Create a new ad-unit descriptor
    pub fn new(id: impl Into<String>, sizes: Vec<AdSize>) -> Self {
        Self {
            id: id.into(),
            sizes,
        }
    }

    /// Validate the ad-unit descriptor
    pub fn validate(&self) -> Result<(), crate::Error> {
        if self.id.is_empty() {
            return Err(crate::Error::config("Ad unit id cannot be empty"));
        }
        if !self.id.starts_with('/') {
            return Err(crate::Error::config(format!(
                "Ad unit id must be a full path starting with '/': {}",
                self.id
            )));
        }
        Ok(())
    }
}

/// Static ad-unit registry for the embedding application
///
/// The defaults carry the platform's published test inventory so the
/// library is usable out of the box; real deployments override them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdsConfig {
    /// General-purpose test unit
    #[serde(default = "default_test_unit")]
    pub test: AdUnitConfig,

    /// Rewarded test unit (web example inventory)
    #[serde(default = "default_test_rewards_unit")]
    pub test_rewards: AdUnitConfig,

    /// Interstitial placement
    #[serde(default = "default_interstitial_unit")]
    pub interstitial: AdUnitConfig,

    /// Rewarded placement
    #[serde(default = "default_rewarded_unit")]
    pub rewarded: AdUnitConfig,

    /// VAST tag URL for the instream pre-roll
    #[serde(default = "default_instream_tag_url")]
    pub instream_tag_url: String,

    /// Page-level platform settings applied once at initialization
    #[serde(default)]
    pub page: PageSettings,
}

impl AdsConfig {
    /// Create a configuration carrying the default test inventory
    pub fn new() -> Self {
        Self {
            test: default_test_unit(),
            test_rewards: default_test_rewards_unit(),
            interstitial: default_interstitial_unit(),
            rewarded: default_rewarded_unit(),
            instream_tag_url: default_instream_tag_url(),
            page: PageSettings::default(),
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), crate::Error> {
        self.test.validate()?;
        self.test_rewards.validate()?;
        self.interstitial.validate()?;
        self.rewarded.validate()?;

        if self.instream_tag_url.is_empty() {
            return Err(crate::Error::config("Instream ad tag URL cannot be empty"));
        }

        Ok(())
    }
}

impl Default for AdsConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Page-level platform settings
///
/// Applied exactly once, by [`initialize`](crate::initialize), before any
/// slot is defined.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageSettings {
    /// Batch all slot requests into a single auction call
    #[serde(default = "default_single_request")]
    pub single_request: bool,

    /// Force creatives into a sandboxed safe frame
    #[serde(default = "default_force_safe_frame")]
    pub force_safe_frame: bool,

    /// Page URL reported to the platform for targeting
    #[serde(default)]
    pub page_url: Option<String>,
}

impl Default for PageSettings {
    fn default() -> Self {
        Self {
            single_request: default_single_request(),
            force_safe_frame: default_force_safe_frame(),
            page_url: None,
        }
    }
}

/// SDK bootstrap configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum BootstrapConfig {
    /// In-process simulated script loader
    Sim {
        /// Treat the primary SDK as already loaded
        #[serde(default)]
        primary_ready: bool,
        /// Treat the video SDK as already loaded
        #[serde(default)]
        video_ready: bool,
    },

    /// Custom bootstrap
    Custom {
        /// Factory name to use
        factory: String,
        /// Custom configuration data
        config: serde_json::Value,
    },
}

impl BootstrapConfig {
    /// Validate the bootstrap configuration
    pub fn validate(&self) -> Result<(), crate::Error> {
        match self {
            BootstrapConfig::Sim { .. } => Ok(()),
            BootstrapConfig::Custom { factory, config } => {
                validate_custom("bootstrap", factory, config)
            }
        }
    }

    /// Get the bootstrap type name
    pub fn type_name(&self) -> &str {
        match self {
            BootstrapConfig::Sim { .. } => "sim",
            BootstrapConfig::Custom { factory, .. } => factory,
        }
    }
}

impl Default for BootstrapConfig {
    fn default() -> Self {
        BootstrapConfig::Sim {
            primary_ready: false,
            video_ready: false,
        }
    }
}

/// Display-ad platform configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PlatformConfig {
    /// In-process simulated platform
    Sim {
        /// Start with the command queue already activated
        #[serde(default = "default_activated")]
        activated: bool,
    },

    /// Custom platform
    Custom {
        /// Factory name to use
        factory: String,
        /// Custom configuration data
        config: serde_json::Value,
    },
}

impl PlatformConfig {
    /// Validate the platform configuration
    pub fn validate(&self) -> Result<(), crate::Error> {
        match self {
            PlatformConfig::Sim { .. } => Ok(()),
            PlatformConfig::Custom { factory, config } => {
                validate_custom("platform", factory, config)
            }
        }
    }

    /// Get the platform type name
    pub fn type_name(&self) -> &str {
        match self {
            PlatformConfig::Sim { .. } => "sim",
            PlatformConfig::Custom { factory, .. } => factory,
        }
    }
}

impl Default for PlatformConfig {
    fn default() -> Self {
        PlatformConfig::Sim { activated: true }
    }
}

/// Video-ad platform configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum VideoPlatformConfig {
    /// In-process simulated video platform
    #[default]
    Sim,

    /// Custom video platform
    Custom {
        /// Factory name to use
        factory: String,
        /// Custom configuration data
        config: serde_json::Value,
    },
}

impl VideoPlatformConfig {
    /// Validate the video platform configuration
    pub fn validate(&self) -> Result<(), crate::Error> {
        match self {
            VideoPlatformConfig::Sim => Ok(()),
            VideoPlatformConfig::Custom { factory, config } => {
                validate_custom("video platform", factory, config)
            }
        }
    }

    /// Get the video platform type name
    pub fn type_name(&self) -> &str {
        match self {
            VideoPlatformConfig::Sim => "sim",
            VideoPlatformConfig::Custom { factory, .. } => factory,
        }
    }
}

fn validate_custom(
    what: &str,
    factory: &str,
    config: &serde_json::Value,
) -> Result<(), crate::Error> {
    if factory.is_empty() {
        return Err(crate::Error::config(format!(
            "Custom {} factory cannot be empty",
            what
        )));
    }
    if config.is_null() {
        return Err(crate::Error::config(format!(
            "Custom {} config cannot be null",
            what
        )));
    }
    Ok(())
}

fn default_test_unit() -> AdUnitConfig {
    AdUnitConfig::new(
        "/6355419/Travel/Europe",
        vec![
            AdSize::new(300, 250),
            AdSize::new(728, 90),
            AdSize::new(750, 200),
        ],
    )
}

fn default_test_rewards_unit() -> AdUnitConfig {
    AdUnitConfig::new("/22639388115/rewarded_web_example", Vec::new())
}

fn default_interstitial_unit() -> AdUnitConfig {
    AdUnitConfig::new(
        "/23211928466/ingame_interstitial_test",
        vec![
            AdSize::new(1, 1),
            AdSize::new(300, 250),
            AdSize::new(320, 480),
            AdSize::new(336, 280),
        ],
    )
}

fn default_rewarded_unit() -> AdUnitConfig {
    AdUnitConfig::new("/23211928466/ingame_rewarded_test", vec![AdSize::new(1, 1)])
}

fn default_instream_tag_url() -> String {
    "https://pubads.g.doubleclick.net/gampad/ads?iu=/23211928466/ingame_video\
     &description_url=https%3A%2F%2Fplaygama.com&sz=400x300%7C640x480\
     &gdfp_req=1&unviewed_position_start=1&output=vast&env=vp&impl=s&correlator="
        .to_string()
}

fn default_single_request() -> bool {
    true
}

fn default_force_safe_frame() -> bool {
    true
}

fn default_activated() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_validates() {
        let config = AdsConfig::default();
        config.validate().expect("default config is valid");
        assert_eq!(config.test.id, "/6355419/Travel/Europe");
        assert_eq!(config.interstitial.sizes.len(), 4);
        assert!(config.test_rewards.sizes.is_empty());
    }

    #[test]
    fn ad_size_serializes_as_pair() {
        let json = serde_json::to_string(&AdSize::new(728, 90)).unwrap();
        assert_eq!(json, "[728,90]");

        let unit: AdUnitConfig =
            serde_json::from_str(r#"{"id": "/1/test", "sizes": [[300, 250], [728, 90]]}"#).unwrap();
        assert_eq!(unit.sizes, vec![AdSize::new(300, 250), AdSize::new(728, 90)]);
    }

    #[test]
    fn unit_id_must_be_a_path() {
        let unit = AdUnitConfig::new("6355419/Travel", Vec::new());
        assert!(unit.validate().is_err());

        let empty = AdUnitConfig::new("", Vec::new());
        assert!(empty.validate().is_err());
    }

    #[test]
    fn custom_selection_requires_factory_and_config() {
        let config = PlatformConfig::Custom {
            factory: String::new(),
            config: serde_json::json!({}),
        };
        assert!(config.validate().is_err());

        let config = VideoPlatformConfig::Custom {
            factory: "headless".to_string(),
            config: serde_json::Value::Null,
        };
        assert!(config.validate().is_err());
    }
}
