//! Minimal embedding example for adbridge-core
//!
//! This example demonstrates using adbridge-core as a library in a host
//! application: a custom SDK bootstrap, the simulated display platform in
//! deferred-queue mode, and full interstitial + rewarded show/hide cycles.

use adbridge_core::config::AdsConfig;
use adbridge_core::traits::{AdPlatform, SdkBootstrap, SlotEvent};
use adbridge_core::units::{InterstitialUnit, RewardedUnit};
use adbridge_core::{Result, initialize};
use adbridge_platform_sim::SimAdPlatform;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Custom SDK bootstrap for embedded usage
///
/// A real host would inject script tags here; this one just flips flags.
struct HostScriptLoader {
    primary: AtomicBool,
    video: AtomicBool,
}

impl HostScriptLoader {
    fn new() -> Self {
        Self {
            primary: AtomicBool::new(false),
            video: AtomicBool::new(false),
        }
    }
}

#[async_trait::async_trait]
impl SdkBootstrap for HostScriptLoader {
    async fn load_primary(&self) -> Result<()> {
        println!("[Host] Loading display SDK script");
        self.primary.store(true, Ordering::SeqCst);
        Ok(())
    }

    async fn load_video(&self) -> Result<()> {
        println!("[Host] Loading video SDK script");
        self.video.store(true, Ordering::SeqCst);
        Ok(())
    }

    fn is_primary_ready(&self) -> bool {
        self.primary.load(Ordering::SeqCst)
    }

    fn is_video_ready(&self) -> bool {
        self.video.load(Ordering::SeqCst)
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    println!("=== Embedded adbridge-core Example ===\n");

    // Custom bootstrap + simulated platform with a deferred command queue,
    // mimicking an SDK whose global object exists before it is ready
    let bootstrap = Arc::new(HostScriptLoader::new());
    let sim = Arc::new(SimAdPlatform::new());
    let platform: Arc<dyn AdPlatform> = Arc::clone(&sim) as Arc<dyn AdPlatform>;

    let config = AdsConfig::default();

    println!("1. Initializing platforms (page settings go through the queue)...");
    initialize(bootstrap.as_ref(), &platform, &config.page).await?;
    println!(
        "   {} task(s) buffered until the SDK signals readiness",
        sim.pending_tasks()
    );

    let interstitial = InterstitialUnit::new(
        Arc::clone(&bootstrap) as Arc<dyn SdkBootstrap>,
        Arc::clone(&platform),
        config.interstitial.clone(),
        "interstitial-container",
    );
    let rewarded = RewardedUnit::new(
        Arc::clone(&bootstrap) as Arc<dyn SdkBootstrap>,
        Arc::clone(&platform),
        config.rewarded.clone(),
    );

    println!("\n2. show() before SDK readiness: work is buffered, not lost");
    interstitial.show().await;
    println!("   {} task(s) pending", sim.pending_tasks());

    println!("\n3. SDK becomes ready; the queue drains in order");
    sim.activate();
    println!("   live slots: {:?}", sim.live_slots());
    println!("   settings applied: {}", sim.applied_settings().len());

    println!("\n4. Rewarded cycle: show, ready, grant");
    rewarded
        .show(
            || println!("   [Host] Reward earned!"),
            || println!("   [Host] Rewarded ad closed"),
        )
        .await;

    let slot = sim
        .live_slots()
        .last()
        .copied()
        .expect("rewarded slot is live");
    sim.emit(SlotEvent::RewardedReady { slot });
    sim.emit(SlotEvent::RewardedGranted {
        slot,
        payload: Some(adbridge_core::traits::RewardPayload {
            reward_type: "coins".to_string(),
            amount: 100,
        }),
    });
    println!("   last reward: {:?}", rewarded.last_reward());

    println!("\n5. Tearing down");
    interstitial.hide();
    println!("   live slots: {:?}", sim.live_slots());
    println!("   listeners still registered: {}", sim.total_listeners());

    println!("\n=== Embedding Successful ===");
    println!("Key Points:");
    println!("- No global state; every dependency is injected");
    println!("- All platform work defers through the command queue");
    println!("- Teardown removed every slot and every listener");

    Ok(())
}
