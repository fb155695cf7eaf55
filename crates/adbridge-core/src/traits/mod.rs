//! Core traits for the ad mediation layer
//!
//! This module defines the abstract interfaces behind which the external
//! ad SDKs live.
//!
//! - [`SdkBootstrap`]: Load the two SDK scripts and query readiness
//! - [`AdPlatform`]: Display-ad slot API (define, refresh, destroy, events)
//! - [`VideoPlatform`]: Instream video-ad API (display surfaces, requests, events)

pub mod bootstrap;
pub mod platform;
pub mod video;

pub use bootstrap::{SdkBootstrap, SdkBootstrapFactory};
pub use platform::{
    AdPlatform, AdPlatformFactory, DisplayTarget, EventHandler, ListenerId, OutOfPageFormat,
    RewardPayload, SizeMapping, SizeRule, SlotEvent, SlotEventKind, SlotHandle,
};
pub use video::{
    AdRequest, DisplayHandle, SurfaceSize, VideoEvent, VideoPlatform, VideoPlatformFactory,
};
