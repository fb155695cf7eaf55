//! Instream session walkthrough
//!
//! Drives an instream pre-roll cycle against the simulated video platform
//! with a scripted error-then-fill response, demonstrating the fixed
//! 5-second retry and the resume-driven follow-up request.

use adbridge_core::config::AdsConfig;
use adbridge_core::traits::{SurfaceSize, VideoEvent, VideoPlatform};
use adbridge_core::units::InstreamSession;
use adbridge_platform_sim::{SimAdResponse, SimBootstrap, SimVideoPlatform};
use std::sync::Arc;
use std::time::Duration;

#[tokio::main]
async fn main() -> adbridge_core::Result<()> {
    tracing_subscriber::fmt::init();

    println!("=== Instream Session Example ===\n");

    let bootstrap = Arc::new(SimBootstrap::new());
    let sim = Arc::new(SimVideoPlatform::new());
    sim.set_surface_size("player", SurfaceSize::new(640, 360));

    // First request errors, the retry fills
    sim.push_response(SimAdResponse::Error("no inventory".to_string()));
    sim.push_response(SimAdResponse::Fill);

    let config = AdsConfig::default();
    let session = InstreamSession::new(
        Arc::clone(&bootstrap) as Arc<dyn adbridge_core::SdkBootstrap>,
        Arc::clone(&sim) as Arc<dyn VideoPlatform>,
        "instream-container",
        "player",
        config.instream_tag_url.clone(),
    )?;

    println!("1. Starting session (first request is scripted to fail)...");
    session.start().await;
    tokio::time::sleep(Duration::from_millis(50)).await;
    println!(
        "   requests so far: {}, phase: {:?}",
        sim.requests().len(),
        session.phase()
    );

    println!("\n2. Waiting out the fixed 5-second retry delay...");
    tokio::time::sleep(Duration::from_millis(5100)).await;
    println!(
        "   requests so far: {}, phase: {:?}",
        sim.requests().len(),
        session.phase()
    );
    println!("   display surfaces created: {}", sim.created_displays().len());

    println!("\n3. Ad pod finishes; the platform requests content resume");
    sim.emit(VideoEvent::ContentResumeRequested);
    tokio::time::sleep(Duration::from_millis(50)).await;
    println!(
        "   requests so far: {} (same surface, no teardown)",
        sim.requests().len()
    );

    println!("\n4. Navigating away");
    session.stop();
    println!("   phase: {:?}", session.phase());

    println!("\n=== Session Complete ===");
    Ok(())
}
