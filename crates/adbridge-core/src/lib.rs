// # adbridge-core
//
// Core library for the ad-slot lifecycle mediation layer.
//
// ## Architecture Overview
//
// This library mediates between a host application and a third-party
// ad-serving platform:
// - **SdkBootstrap**: Trait for loading the two ad SDKs and querying readiness
// - **AdPlatform**: Trait for the display SDK's slot API (define, refresh, destroy, events)
// - **VideoPlatform**: Trait for the instream video SDK (display surfaces, requests, events)
// - **InterstitialUnit / RewardedUnit / InstreamSession**: The three ad-unit lifecycles
// - **PlatformRegistry**: Plugin-based registry for platform implementations
//
// ## Design Principles
//
// 1. **Separation of Concerns**: Core lifecycle logic is separate from SDK bindings
// 2. **Deferred Execution**: All platform work goes through the command queue
// 3. **Plugin-Based**: Implementations are registered dynamically, no hard-coded if-else
// 4. **Library-First**: No global state; every dependency is injected
// 5. **Host-Safe Failures**: An ad failing to show never breaks the host's flow

pub mod config;
pub mod error;
pub mod init;
pub mod queue;
pub mod registry;
pub mod traits;
pub mod units;

// Re-export core types for convenience
pub use config::{AdSize, AdUnitConfig, AdsConfig, PageSettings};
pub use config::{BootstrapConfig, PlatformConfig, VideoPlatformConfig};
pub use error::{Error, Result};
pub use init::initialize;
pub use queue::CommandQueue;
pub use registry::PlatformRegistry;
pub use traits::{AdPlatform, SdkBootstrap, VideoPlatform};
pub use units::{InstreamSession, InterstitialUnit, RewardedUnit};
