//! Instream pre-roll video session
//!
//! Drives a video-ad request/playback cycle against a VAST tag URL. The
//! session has no success state to report: playback continues until the
//! host navigates away ([`stop`](InstreamSession::stop)) or the platform
//! stops requesting ads. Ad errors restart the whole cycle after a fixed
//! delay, fresh display surface included, with no retry cap.
//!
//! ## Cycle
//!
//! ```text
//! Requesting ──manager loaded──▶ ManagerLoaded ──start──▶ Playing
//!     ▲                                │                     │
//!     └──── ad error (5s delay) ◀──────┴─────────────────────┘
//! ```
//!
//! A "content resume requested" event re-issues the ad request on the
//! same display surface to prepare the next break, without teardown.

use crate::traits::bootstrap::SdkBootstrap;
use crate::traits::video::{AdRequest, VideoEvent, VideoPlatform};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio_stream::StreamExt;
use tracing::{debug, error, info, warn};

/// Delay before a failed cycle restarts
const RETRY_DELAY: Duration = Duration::from_secs(5);

/// Where the instream session currently is in its cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstreamPhase {
    /// Not started, or stopped
    Idle,
    /// Ad request issued, waiting for the platform
    Requesting,
    /// An ads manager loaded, playback about to start
    ManagerLoaded,
    /// An ad pod is playing
    Playing,
}

struct InstreamShared {
    /// Bumped on every start/stop; a drive loop from an older epoch exits
    /// at its next check
    epoch: u64,
    phase: InstreamPhase,
}

/// Pre-roll video ad session
///
/// One session per playback surface. Construction validates the three
/// mandatory inputs and is the only operation here that reports a failure
/// to the host; everything after that is logged and self-healing.
pub struct InstreamSession {
    bootstrap: Arc<dyn SdkBootstrap>,
    video: Arc<dyn VideoPlatform>,
    container_id: String,
    player_id: String,
    tag_url: String,
    shared: Arc<Mutex<InstreamShared>>,
}

impl InstreamSession {
    /// Create an instream session
    ///
    /// # Parameters
    ///
    /// - `bootstrap`: SDK loader
    /// - `video`: Video-ad platform
    /// - `container_id`: Host container the ad renders into
    /// - `player_id`: Playback surface for content/ad handoff
    /// - `tag_url`: VAST tag URL to request
    ///
    /// # Returns
    ///
    /// A configuration error when any of the three identifiers is empty;
    /// there is no meaningful default to fall back to.
    pub fn new(
        bootstrap: Arc<dyn SdkBootstrap>,
        video: Arc<dyn VideoPlatform>,
        container_id: impl Into<String>,
        player_id: impl Into<String>,
        tag_url: impl Into<String>,
    ) -> Result<Self, crate::Error> {
        let container_id = container_id.into();
        let player_id = player_id.into();
        let tag_url = tag_url.into();

        if container_id.is_empty() {
            return Err(crate::Error::config(
                "Instream ad container id cannot be empty",
            ));
        }
        if player_id.is_empty() {
            return Err(crate::Error::config("Instream player id cannot be empty"));
        }
        if tag_url.is_empty() {
            return Err(crate::Error::config("Instream ad tag URL cannot be empty"));
        }

        Ok(Self {
            bootstrap,
            video,
            container_id,
            player_id,
            tag_url,
            shared: Arc::new(Mutex::new(InstreamShared {
                epoch: 0,
                phase: InstreamPhase::Idle,
            })),
        })
    }

    /// Current phase of the cycle
    pub fn phase(&self) -> InstreamPhase {
        self.shared.lock().unwrap().phase
    }

    /// Start the session
    ///
    /// Ensures the video SDK is loaded (a load failure is logged and the
    /// call silently degrades), then spawns the drive loop. Calling
    /// `start()` on a running session supersedes the previous loop.
    pub async fn start(&self) {
        if let Err(err) = self.bootstrap.ensure_video().await {
            warn!(error = %err, "video SDK failed to load, instream ads unavailable");
            return;
        }

        let epoch = {
            let mut shared = self.shared.lock().unwrap();
            shared.epoch += 1;
            shared.phase = InstreamPhase::Idle;
            shared.epoch
        };

        info!(tag = %self.tag_url, "instream session starting");

        let video = Arc::clone(&self.video);
        let shared = Arc::clone(&self.shared);
        let container = self.container_id.clone();
        let player = self.player_id.clone();
        let tag = self.tag_url.clone();

        tokio::spawn(async move {
            drive(video, shared, epoch, container, player, tag).await;
        });
    }

    /// Stop the session
    ///
    /// The navigation-away hook: bumps the epoch so the drive loop exits
    /// at its next check, ending the otherwise unbounded retry cycle.
    pub fn stop(&self) {
        let mut shared = self.shared.lock().unwrap();
        shared.epoch += 1;
        shared.phase = InstreamPhase::Idle;
        debug!("instream session stopped");
    }
}

/// Whether `epoch` has been superseded by a later start/stop
fn stale(shared: &Mutex<InstreamShared>, epoch: u64) -> bool {
    shared.lock().unwrap().epoch != epoch
}

/// Set the phase, unless the loop has been superseded
fn set_phase(shared: &Mutex<InstreamShared>, epoch: u64, phase: InstreamPhase) {
    let mut shared = shared.lock().unwrap();
    if shared.epoch == epoch {
        shared.phase = phase;
    }
}

/// The request/playback loop
///
/// One iteration is one full cycle: fresh display surface, fresh request,
/// then event consumption until an ad error sends the cycle back to the
/// top after [`RETRY_DELAY`]. Only ad-error events retry; failures of the
/// surface/request calls themselves end the loop, matching the platform's
/// own contract that those are not transient.
async fn drive(
    video: Arc<dyn VideoPlatform>,
    shared: Arc<Mutex<InstreamShared>>,
    epoch: u64,
    container: String,
    player: String,
    tag: String,
) {
    loop {
        if stale(&shared, epoch) {
            debug!("instream drive loop superseded, exiting");
            return;
        }

        let display = match video.create_display(&container, &player).await {
            Ok(display) => display,
            Err(err) => {
                error!(error = %err, "instream display surface could not be created");
                set_phase(&shared, epoch, InstreamPhase::Idle);
                return;
            }
        };

        if let Err(err) = video.initialize(&display).await {
            error!(error = %err, "instream display surface failed to initialize");
            set_phase(&shared, epoch, InstreamPhase::Idle);
            return;
        }

        // Subscribe before requesting so no outcome event is missed
        let mut events = video.events();
        let request = AdRequest::for_surface(&tag, video.surface_size(&player));

        set_phase(&shared, epoch, InstreamPhase::Requesting);
        if let Err(err) = video.request_ads(&display, &request).await {
            error!(error = %err, "instream ad request could not be issued");
            set_phase(&shared, epoch, InstreamPhase::Idle);
            return;
        }
        debug!(
            width = request.linear_width,
            height = request.linear_height,
            "instream ad request issued"
        );

        loop {
            let Some(event) = events.next().await else {
                debug!("instream event stream closed, exiting");
                return;
            };
            if stale(&shared, epoch) {
                debug!("instream drive loop superseded, exiting");
                return;
            }

            match event {
                VideoEvent::ManagerLoaded => {
                    set_phase(&shared, epoch, InstreamPhase::ManagerLoaded);
                    let surface = video.surface_size(&player);
                    let request = AdRequest::for_surface(&tag, surface);
                    match video
                        .start_ads(&display, request.linear_width, request.linear_height)
                        .await
                    {
                        Ok(()) => {
                            set_phase(&shared, epoch, InstreamPhase::Playing);
                            info!("instream ad playback started");
                        }
                        Err(err) => {
                            // Start failures do not retry; the next ad
                            // break gets a fresh chance
                            error!(error = %err, "instream ad playback failed to start");
                        }
                    }
                }

                VideoEvent::AdError { message } => {
                    error!(error = %message, "instream ad error, retrying");
                    break;
                }

                VideoEvent::ContentPauseRequested => {
                    debug!("ad break starting, host content paused");
                }

                VideoEvent::ContentResumeRequested => {
                    // Ad pod finished: prepare the next break on the same
                    // display, no teardown
                    debug!("ad break ended, requesting next pod");
                    set_phase(&shared, epoch, InstreamPhase::Requesting);
                    if let Err(err) = video.request_ads(&display, &request).await {
                        error!(error = %err, "instream follow-up ad request could not be issued");
                    }
                }
            }
        }

        tokio::time::sleep(RETRY_DELAY).await;
    }
}
