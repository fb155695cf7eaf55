// # Simulated Ad Platforms
//
// This crate provides deterministic in-process stand-ins for the two ad
// SDKs and the script loader.
//
// ## Purpose
//
// This is the **fallback/CI implementation** of the platform traits, for:
// - Host-side integration testing without real ad inventory
// - CI pipelines and demos
// - Debugging lifecycle issues with full call visibility
//
// ## IMPORTANT: Not For Production
//
// Nothing here serves a real ad. Production deployments bind the traits
// to the actual SDKs; this crate only reproduces their observable
// contract (command queue, slot handles, event dispatch) deterministically.
//
// ## Architecture
//
// - `SimBootstrap`: Readiness flags, failure switches and load counters
// - `SimAdPlatform`: Slot table + embedded command queue + event dispatch
// - `SimVideoPlatform`: Scripted request outcomes + fan-out event streams
//
// Each comes with a factory; [`register`] installs all three under the
// `"sim"` type name.

mod bootstrap;
mod platform;
mod video;

pub use bootstrap::{SimBootstrap, SimBootstrapFactory};
pub use platform::{SimAdPlatform, SimAdPlatformFactory};
pub use video::{SimAdResponse, SimVideoPlatform, SimVideoPlatformFactory};

use adbridge_core::PlatformRegistry;

/// Register the simulated implementations under the `"sim"` type name
pub fn register(registry: &PlatformRegistry) {
    registry.register_bootstrap("sim", Box::new(SimBootstrapFactory));
    registry.register_platform("sim", Box::new(SimAdPlatformFactory));
    registry.register_video("sim", Box::new(SimVideoPlatformFactory));
}
