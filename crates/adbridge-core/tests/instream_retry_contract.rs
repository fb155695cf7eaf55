//! Architectural Contract Test: Instream Retry Cycle
//!
//! This test verifies the instream session's recovery behavior under the
//! paused tokio clock: fixed-delay retry, fresh surface per cycle, and
//! the construction-time fail-fast.
//!
//! Constraints verified:
//! - Construction with a missing mandatory input fails before anything
//!   touches the SDK loader
//! - Every ad error schedules exactly one retry 5000 ms later, unbounded
//! - Every retry cycle rebuilds the display surface from scratch
//! - A content-resume re-requests on the same surface, without teardown
//! - stop() is the only way out of the retry cycle
//!
//! If this test fails, either the retry delay drifted from the platform
//! integration's contract or retries started sharing surface state.

mod common;

use adbridge_core::config::AdsConfig;
use adbridge_core::traits::{SurfaceSize, VideoEvent, VideoPlatform};
use adbridge_core::units::{InstreamPhase, InstreamSession};
use common::*;
use std::sync::Arc;
use std::time::Duration;

const CONTAINER: &str = "instream-container";
const PLAYER: &str = "player";

fn session(video: &Arc<ScriptedVideoPlatform>) -> InstreamSession {
    InstreamSession::new(
        Arc::new(MockBootstrap::new()),
        Arc::clone(video) as Arc<dyn VideoPlatform>,
        CONTAINER,
        PLAYER,
        AdsConfig::default().instream_tag_url,
    )
    .expect("valid configuration")
}

#[tokio::test]
async fn missing_configuration_fails_before_touching_the_loader() {
    let bootstrap = Arc::new(MockBootstrap::new());
    let video = Arc::new(ScriptedVideoPlatform::new());

    for (container, player, tag) in [
        (CONTAINER, PLAYER, ""),
        (CONTAINER, "", "https://tag"),
        ("", PLAYER, "https://tag"),
    ] {
        let result = InstreamSession::new(
            Arc::clone(&bootstrap) as Arc<dyn adbridge_core::SdkBootstrap>,
            Arc::clone(&video) as Arc<dyn VideoPlatform>,
            container,
            player,
            tag,
        );
        assert!(
            matches!(result, Err(adbridge_core::Error::Config(_))),
            "a missing mandatory input must be a configuration error"
        );
    }

    assert_eq!(
        bootstrap.video_load_count(),
        0,
        "construction must never load the video SDK"
    );
    assert_eq!(video.create_count(), 0);
}

#[tokio::test(start_paused = true)]
async fn each_ad_error_schedules_exactly_one_retry_after_five_seconds() {
    let video = Arc::new(ScriptedVideoPlatform::new());
    video.set_surface_size(PLAYER, SurfaceSize::new(640, 360));
    video.push_response(ScriptedResponse::Error("no ad available".to_string()));
    video.push_response(ScriptedResponse::Error("still no ad".to_string()));
    // Third request falls through to the default fill

    let session = session(&video);
    session.start().await;
    settle().await;

    assert_eq!(video.request_count(), 1);
    assert_eq!(video.create_count(), 1);

    // First retry: due exactly 5000 ms after the first error
    tokio::time::advance(Duration::from_millis(4999)).await;
    settle().await;
    assert_eq!(
        video.request_count(),
        1,
        "retry must not fire before the 5000 ms delay elapses"
    );

    tokio::time::advance(Duration::from_millis(1)).await;
    settle().await;
    assert_eq!(video.request_count(), 2);
    assert_eq!(
        video.create_count(),
        2,
        "every retry cycle rebuilds the display surface"
    );

    // Second consecutive error: another full 5000 ms from the retry
    tokio::time::advance(Duration::from_millis(4999)).await;
    settle().await;
    assert_eq!(video.request_count(), 2);

    tokio::time::advance(Duration::from_millis(1)).await;
    settle().await;
    assert_eq!(video.request_count(), 3);
    assert_eq!(video.create_count(), 3);

    // Third request filled; playback starts
    assert_eq!(session.phase(), InstreamPhase::Playing);
    assert_eq!(video.starts().len(), 1);
}

#[tokio::test(start_paused = true)]
async fn content_resume_requests_next_pod_on_the_same_surface() {
    let video = Arc::new(ScriptedVideoPlatform::new());
    video.set_surface_size(PLAYER, SurfaceSize::new(640, 360));

    let session = session(&video);
    session.start().await;
    settle().await;

    assert_eq!(session.phase(), InstreamPhase::Playing);
    assert_eq!(video.request_count(), 1);

    // Ad pod finished: the platform asks the host to resume content
    video.emit(VideoEvent::ContentResumeRequested);
    settle().await;

    assert_eq!(
        video.request_count(),
        2,
        "resume must prepare the next break with a fresh request"
    );
    assert_eq!(
        video.create_count(),
        1,
        "resume must reuse the existing display surface"
    );
    let requests = video.requests();
    assert_eq!(
        requests[0].0, requests[1].0,
        "both requests go to the same display"
    );
}

#[tokio::test(start_paused = true)]
async fn zero_height_surface_falls_back_to_fixed_hints() {
    let video = Arc::new(ScriptedVideoPlatform::new());
    video.set_surface_size(PLAYER, SurfaceSize::new(640, 0));

    let session = session(&video);
    session.start().await;
    settle().await;

    let requests = video.requests();
    assert_eq!(requests.len(), 1);
    let request = &requests[0].1;
    assert_eq!(request.linear_width, 640);
    assert_eq!(request.linear_height, 250, "zero height falls back to 250");
    assert_eq!(request.non_linear_width, 640);
    assert_eq!(request.non_linear_height, 100);

    // Playback starts with the same fallback size
    assert_eq!(video.starts(), vec![(requests[0].0, 640, 250)]);
}

#[tokio::test(start_paused = true)]
async fn stop_ends_the_retry_cycle() {
    let video = Arc::new(ScriptedVideoPlatform::new());
    video.set_surface_size(PLAYER, SurfaceSize::new(640, 360));
    video.push_response(ScriptedResponse::Error("no ad available".to_string()));

    let session = session(&video);
    session.start().await;
    settle().await;
    assert_eq!(video.request_count(), 1);

    // Stop while the loop sleeps out its retry delay
    session.stop();
    assert_eq!(session.phase(), InstreamPhase::Idle);

    tokio::time::advance(Duration::from_secs(5)).await;
    settle().await;

    assert_eq!(
        video.request_count(),
        1,
        "a stopped session must not retry"
    );
}

#[tokio::test(start_paused = true)]
async fn restart_supersedes_a_sleeping_retry_loop() {
    let video = Arc::new(ScriptedVideoPlatform::new());
    video.set_surface_size(PLAYER, SurfaceSize::new(640, 360));
    video.push_response(ScriptedResponse::Error("no ad available".to_string()));

    let session = session(&video);
    session.start().await;
    settle().await;
    assert_eq!(video.request_count(), 1);

    // Restart while the first loop sleeps; the second request fills
    session.start().await;
    settle().await;
    assert_eq!(video.request_count(), 2);
    assert_eq!(session.phase(), InstreamPhase::Playing);

    // The superseded loop wakes up and exits without requesting
    tokio::time::advance(Duration::from_secs(5)).await;
    settle().await;
    assert_eq!(video.request_count(), 2);
}

#[tokio::test]
async fn video_bootstrap_failure_degrades_silently() {
    let bootstrap = Arc::new(MockBootstrap::new().fail_video());
    let video = Arc::new(ScriptedVideoPlatform::new());
    let session = InstreamSession::new(
        Arc::clone(&bootstrap) as Arc<dyn adbridge_core::SdkBootstrap>,
        Arc::clone(&video) as Arc<dyn VideoPlatform>,
        CONTAINER,
        PLAYER,
        "https://tag",
    )
    .expect("valid configuration");

    session.start().await;
    settle().await;

    assert_eq!(bootstrap.video_load_count(), 1);
    assert_eq!(session.phase(), InstreamPhase::Idle);
    assert_eq!(video.create_count(), 0);
}
