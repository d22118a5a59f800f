//! `courtside replay`: play a shot list on a simulated player.

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use tokio::sync::watch;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::{info, warn};

use courtside_models::{resolve_payload, Shot};
use courtside_playback::{MediaPlayer, OverlayEvent, PlaybackConfig, PlaybackSession, SimulatedPlayer};

use crate::render::event_line;

/// How the replay starts.
#[derive(Debug, Clone, Default)]
pub struct ReplayOptions {
    pub duration_seconds: f64,
    pub start_seconds: Option<f64>,
    pub select: Option<usize>,
}

/// Load the shot list from an inline payload, a payload file, or examples.
pub async fn load_shots(inline: Option<&str>, file: Option<&Path>) -> Result<(Vec<Shot>, bool)> {
    let from_file = match file {
        Some(path) => Some(
            tokio::fs::read_to_string(path)
                .await
                .with_context(|| format!("Failed to read {}", path.display()))?,
        ),
        None => None,
    };
    let payload = inline.or(from_file.as_deref().map(str::trim));
    let resolved = resolve_payload(payload);
    if resolved.is_example {
        warn!("No shots in payload, using example feedback");
    }
    Ok((resolved.shots, resolved.is_example))
}

/// Play `shots` until the video ends or `shutdown` fires.
///
/// Returns every overlay event with the position it was observed at.
pub async fn replay(
    shots: Vec<Shot>,
    options: &ReplayOptions,
    config: PlaybackConfig,
    mut shutdown: watch::Receiver<bool>,
) -> Result<Vec<(f64, OverlayEvent)>> {
    let player = Arc::new(SimulatedPlayer::new(options.duration_seconds));
    let mut handle = PlaybackSession::spawn(player.clone(), shots.into(), config);
    let snapshot = handle.snapshot();

    if let Some(start) = options.start_seconds {
        handle.seek_to(start).await?;
    }
    if let Some(index) = options.select {
        handle.select_shot(index).await?;
    }
    handle.play().await?;
    info!(duration = options.duration_seconds, "Replay started");

    let period = Duration::from_millis(250);
    let mut end_check = interval_at(Instant::now() + period, period);
    end_check.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let mut events = Vec::new();

    loop {
        tokio::select! {
            biased;

            changed = shutdown.changed() => {
                if changed.is_err() || *shutdown.borrow() {
                    info!("Replay interrupted");
                    break;
                }
            }
            event = handle.next_event() => match event {
                Some(event) => {
                    let position = snapshot.borrow().position_seconds;
                    println!("{}", event_line(position, &event));
                    events.push((position, event));
                }
                None => break,
            },
            _ = end_check.tick() => {
                if !player.state().is_playing {
                    info!("Replay reached the end of the video");
                    break;
                }
            }
        }
    }

    handle.shutdown().await;
    Ok(events)
}

/// Entry point for the `replay` subcommand.
pub async fn run(
    inline: Option<&str>,
    file: Option<&Path>,
    options: ReplayOptions,
    shutdown: watch::Receiver<bool>,
) -> Result<()> {
    let (shots, is_example) = load_shots(inline, file).await?;
    if is_example {
        println!("Showing example feedback.\n");
    }
    print!("{}", crate::render::shot_table(&shots));
    println!();

    let events = replay(shots, &options, PlaybackConfig::from_env(), shutdown).await?;
    let shown = events
        .iter()
        .filter(|(_, e)| matches!(e, OverlayEvent::Shown { .. }))
        .count();
    info!(shown, "Replay finished");
    Ok(())
}
