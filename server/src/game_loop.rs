use crane_shared::protocol::{SceneStateMsg, WelcomeMsg};
use std::time::Duration;
use tokio::sync::{broadcast, mpsc, oneshot};
use tokio::time::Instant;

use crate::config::InstallationConfig;
use crate::ingest::{DatagramSource, IngestBridge};
use crate::installation::{FrameReport, Installation};
use crate::osc::ColorSink;

/// Commands from viewer connections to the frame loop
pub enum ViewerCommand {
    Join {
        response: oneshot::Sender<WelcomeMsg>,
    },
    Trigger {
        digit: u8,
    },
}

/// Broadcasts from the frame loop to all viewers
#[derive(Debug, Clone)]
pub enum SceneBroadcast {
    SceneState(SceneStateMsg),
}

/// Run the installation. Owns all simulation state; viewer commands are
/// applied between frames.
pub async fn run_frame_loop<S, K>(
    mut cmd_rx: mpsc::Receiver<ViewerCommand>,
    broadcast_tx: broadcast::Sender<SceneBroadcast>,
    config: InstallationConfig,
    mut ingest: IngestBridge<S>,
    mut sink: K,
) where
    S: DatagramSource,
    K: ColorSink,
{
    let mut installation = Installation::new(&config);

    let tick_duration = Duration::from_secs_f64(1.0 / config.tick_rate_hz as f64);
    let broadcast_every_n = (config.tick_rate_hz / config.viewer.broadcast_rate_hz).max(1);
    let mut tick_count: u64 = 0;

    let mut tick_interval = tokio::time::interval(tick_duration);
    tick_interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

    let start = Instant::now();
    tracing::info!(
        "Frame loop running at {} Hz with {} launchers",
        config.tick_rate_hz,
        installation.launchers().len()
    );

    loop {
        tokio::select! {
            _ = tick_interval.tick() => {
                let now = start.elapsed().as_secs_f64();
                let report = installation.tick(now, &mut ingest, &mut sink);
                if report != FrameReport::default() {
                    tracing::trace!(
                        "t={:.3} launched={} terminated={} swept={}",
                        now,
                        report.launched,
                        report.terminated,
                        report.swept
                    );
                }

                // Viewers get the scene at a lower rate
                tick_count += 1;
                if tick_count % broadcast_every_n as u64 == 0 {
                    let msg = installation.scene_state(now);
                    let _ = broadcast_tx.send(SceneBroadcast::SceneState(msg));
                }
            }

            Some(cmd) = cmd_rx.recv() => {
                match cmd {
                    ViewerCommand::Join { response } => {
                        let _ = response.send(installation.welcome());
                    }
                    ViewerCommand::Trigger { digit } => {
                        let now = start.elapsed().as_secs_f64();
                        if installation.trigger_debug(digit, now, &mut sink).is_none() {
                            tracing::debug!("Debug trigger {} ignored", digit);
                        }
                    }
                }
            }

            else => break,
        }
    }

    tracing::info!("Frame loop ended");
}
