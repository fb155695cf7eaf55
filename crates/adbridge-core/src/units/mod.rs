//! Ad units
//!
//! One module per ad-unit type, each owning the lifecycle of at most one
//! live platform slot:
//!
//! - [`InterstitialUnit`]: Static full-page slot (define, refresh, destroy)
//! - [`RewardedUnit`]: Out-of-page rewarded slot with event subscriptions
//! - [`InstreamSession`]: Pre-roll video request/playback cycle
//!
//! [`SubscriptionSet`] carries the subscribe/unsubscribe discipline shared
//! by slot-bound units.

pub mod instream;
pub mod interstitial;
pub mod rewarded;
pub mod subscription;

pub use instream::{InstreamPhase, InstreamSession};
pub use interstitial::{InterstitialPhase, InterstitialUnit};
pub use rewarded::{HostCallback, RewardedPhase, RewardedUnit};
pub use subscription::SubscriptionSet;
