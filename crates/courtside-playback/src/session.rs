//! Playback session: the single owner of matching and overlay state.
//!
//! One task receives position samples from the [`PositionTracker`] and user
//! commands from the [`SessionHandle`], and is the only place the active
//! shot and the overlay change. Observers read the [`OverlaySnapshot`]
//! watch or drain [`OverlayEvent`]s.

use std::sync::Arc;

use serde::Serialize;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::{sleep_until, Instant};
use tracing::{debug, info, warn};

use courtside_models::Shot;

use crate::config::PlaybackConfig;
use crate::error::{PlaybackError, PlaybackResult};
use crate::matcher::{match_active, ActiveShotTracker, MatchChange};
use crate::overlay::Overlay;
use crate::player::MediaPlayer;
use crate::timeline::{clamp_seek, skip, tap_position};
use crate::tracker::{PositionSample, PositionTracker, SeekEpoch};

const COMMAND_BUFFER: usize = 32;
const EVENT_BUFFER: usize = 64;

/// User input for a session.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SessionCommand {
    SelectShot(usize),
    /// Tap at a fraction of the timeline width
    TimelineTap(f64),
    SeekTo(f64),
    SkipForward,
    SkipBackward,
    Play,
    Pause,
    TogglePlayback,
}

/// What caused the overlay to show.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ShowTrigger {
    /// Playback reached the shot
    Playback,
    Selection,
    TimelineTap,
    /// Seek or skip landed near the shot
    Seek,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum HideReason {
    /// Dwell time elapsed
    Expired,
    /// Position moved away from every shot
    NoActiveShot,
}

/// Overlay change published by the session.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum OverlayEvent {
    Shown {
        index: usize,
        shot: Shot,
        trigger: ShowTrigger,
    },
    Hidden {
        reason: HideReason,
    },
}

/// Latest session state.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct OverlaySnapshot {
    pub position_seconds: f64,
    pub is_playing: bool,
    /// Shot the matcher considers active
    pub active_index: Option<usize>,
    /// Shot whose feedback is on screen
    pub visible_index: Option<usize>,
}

/// Spawns playback sessions.
pub struct PlaybackSession;

impl PlaybackSession {
    /// Start the tracker and owner tasks for `player`.
    ///
    /// Must be called from within a tokio runtime.
    pub fn spawn<P: MediaPlayer>(player: Arc<P>, shots: Arc<[Shot]>, config: PlaybackConfig) -> SessionHandle {
        let (command_tx, command_rx) = mpsc::channel(COMMAND_BUFFER);
        let (event_tx, event_rx) = mpsc::channel(EVENT_BUFFER);
        let (sample_tx, sample_rx) = mpsc::channel(config.sample_buffer.max(1));
        let (shutdown_tx, _) = watch::channel(false);
        let initial = player.state();
        let (resume_tx, resume_rx) = watch::channel(initial.is_playing);
        let (snapshot_tx, snapshot_rx) = watch::channel(OverlaySnapshot {
            position_seconds: initial.position_seconds,
            is_playing: initial.is_playing,
            ..Default::default()
        });
        let seek_epoch = SeekEpoch::default();

        info!(
            shots = shots.len(),
            tolerance_secs = config.tolerance_secs,
            dwell_ms = config.dwell.as_millis() as u64,
            "Starting playback session"
        );

        let tracker = PositionTracker::new(
            player.clone(),
            config.sample_interval,
            config.sample_epsilon_secs,
            seek_epoch.clone(),
        );
        let tracker_task = tokio::spawn(tracker.run(sample_tx, resume_rx, shutdown_tx.subscribe()));

        let owner = SessionOwner {
            player,
            shots: shots.clone(),
            matcher: ActiveShotTracker::new(config.tolerance_secs),
            overlay: Overlay::new(config.dwell),
            skip_secs: config.skip_secs,
            position: initial.position_seconds,
            seek_epoch,
            events: event_tx,
            snapshot: snapshot_tx,
            resume: resume_tx,
        };
        let owner_task = tokio::spawn(owner.run(sample_rx, command_rx, shutdown_tx.subscribe()));

        SessionHandle {
            shots,
            commands: command_tx,
            events: event_rx,
            snapshot: snapshot_rx,
            shutdown: shutdown_tx,
            tasks: vec![tracker_task, owner_task],
        }
    }
}

/// Control surface for a running session.
///
/// Dropping the handle stops the session without waiting for it.
pub struct SessionHandle {
    shots: Arc<[Shot]>,
    commands: mpsc::Sender<SessionCommand>,
    events: mpsc::Receiver<OverlayEvent>,
    snapshot: watch::Receiver<OverlaySnapshot>,
    shutdown: watch::Sender<bool>,
    tasks: Vec<JoinHandle<()>>,
}

impl SessionHandle {
    pub fn shots(&self) -> &[Shot] {
        &self.shots
    }

    /// Queue a command for the owner task.
    pub async fn send(&self, command: SessionCommand) -> PlaybackResult<()> {
        if let SessionCommand::SelectShot(index) = command {
            if index >= self.shots.len() {
                return Err(PlaybackError::UnknownShot {
                    index,
                    count: self.shots.len(),
                });
            }
        }
        self.commands
            .send(command)
            .await
            .map_err(|_| PlaybackError::SessionClosed)
    }

    pub async fn select_shot(&self, index: usize) -> PlaybackResult<()> {
        self.send(SessionCommand::SelectShot(index)).await
    }

    pub async fn tap_timeline(&self, fraction: f64) -> PlaybackResult<()> {
        self.send(SessionCommand::TimelineTap(fraction)).await
    }

    pub async fn seek_to(&self, seconds: f64) -> PlaybackResult<()> {
        self.send(SessionCommand::SeekTo(seconds)).await
    }

    pub async fn skip_forward(&self) -> PlaybackResult<()> {
        self.send(SessionCommand::SkipForward).await
    }

    pub async fn skip_backward(&self) -> PlaybackResult<()> {
        self.send(SessionCommand::SkipBackward).await
    }

    pub async fn play(&self) -> PlaybackResult<()> {
        self.send(SessionCommand::Play).await
    }

    pub async fn pause(&self) -> PlaybackResult<()> {
        self.send(SessionCommand::Pause).await
    }

    pub async fn toggle_playback(&self) -> PlaybackResult<()> {
        self.send(SessionCommand::TogglePlayback).await
    }

    /// Watch of the latest state.
    pub fn snapshot(&self) -> watch::Receiver<OverlaySnapshot> {
        self.snapshot.clone()
    }

    /// Next overlay event, or `None` once the session has stopped.
    pub async fn next_event(&mut self) -> Option<OverlayEvent> {
        self.events.recv().await
    }

    /// Stop the session and wait for its tasks.
    ///
    /// No event is published after this returns.
    pub async fn shutdown(mut self) {
        let _ = self.shutdown.send(true);
        for task in std::mem::take(&mut self.tasks) {
            if let Err(e) = task.await {
                warn!("Playback task ended abnormally: {}", e);
            }
        }
        self.events.close();
        info!("Playback session stopped");
    }
}

impl Drop for SessionHandle {
    fn drop(&mut self) {
        let _ = self.shutdown.send(true);
    }
}

struct SessionOwner<P: MediaPlayer> {
    player: Arc<P>,
    shots: Arc<[Shot]>,
    matcher: ActiveShotTracker,
    overlay: Overlay,
    skip_secs: f64,
    position: f64,
    seek_epoch: SeekEpoch,
    events: mpsc::Sender<OverlayEvent>,
    snapshot: watch::Sender<OverlaySnapshot>,
    resume: watch::Sender<bool>,
}

impl<P: MediaPlayer> SessionOwner<P> {
    async fn run(
        mut self,
        mut samples: mpsc::Receiver<PositionSample>,
        mut commands: mpsc::Receiver<SessionCommand>,
        mut shutdown: watch::Receiver<bool>,
    ) {
        loop {
            let deadline = self.overlay.deadline();

            tokio::select! {
                biased;

                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        break;
                    }
                }
                Some(command) = commands.recv() => self.handle_command(command),
                Some(sample) = samples.recv() => self.handle_sample(sample),
                _ = sleep_until(deadline.unwrap_or_else(Instant::now)), if deadline.is_some() => {
                    if self.overlay.expire(Instant::now()) {
                        debug!(position = self.position, "Overlay dwell elapsed");
                        self.publish(OverlayEvent::Hidden { reason: HideReason::Expired });
                    }
                }
            }
        }

        debug!("Playback session owner stopped");
    }

    fn handle_sample(&mut self, sample: PositionSample) {
        if sample.seek_epoch < self.seek_epoch.current() {
            // Taken before the last explicit seek
            return;
        }
        self.position = sample.position_seconds;
        self.rematch(ShowTrigger::Playback);
        self.publish_snapshot();
    }

    fn handle_command(&mut self, command: SessionCommand) {
        debug!(?command, position = self.position, "Playback command");
        let duration = self.player.state().duration_seconds;

        match command {
            SessionCommand::SelectShot(index) => {
                let Some(shot) = self.shots.get(index).cloned() else {
                    warn!(index, "Ignoring selection of unknown shot");
                    return;
                };
                self.seek(clamp_seek(shot.timestamp_seconds, duration));
                self.matcher.force(index, &self.shots);
                self.show(index, shot, ShowTrigger::Selection);
            }
            SessionCommand::TimelineTap(fraction) => {
                self.seek(tap_position(fraction, duration));
                let tapped = match_active(self.position, &self.shots, self.matcher.tolerance())
                    .map(|(index, shot)| (index, shot.clone()));
                match tapped {
                    Some((index, shot)) => {
                        self.matcher.force(index, &self.shots);
                        self.show(index, shot, ShowTrigger::TimelineTap);
                    }
                    None => {
                        self.matcher.clear();
                        self.hide_for_no_shot();
                    }
                }
            }
            SessionCommand::SeekTo(seconds) => {
                self.seek(clamp_seek(seconds, duration));
                self.rematch(ShowTrigger::Seek);
            }
            SessionCommand::SkipForward => {
                self.seek(skip(self.position, self.skip_secs, duration));
                self.rematch(ShowTrigger::Seek);
            }
            SessionCommand::SkipBackward => {
                self.seek(skip(self.position, -self.skip_secs, duration));
                self.rematch(ShowTrigger::Seek);
            }
            SessionCommand::Play => self.set_playing(true),
            SessionCommand::Pause => self.set_playing(false),
            SessionCommand::TogglePlayback => {
                let playing = self.player.state().is_playing;
                self.set_playing(!playing);
            }
        }

        self.publish_snapshot();
    }

    fn seek(&mut self, position: f64) {
        self.player.seek(position);
        self.seek_epoch.advance();
        self.position = position;
    }

    fn set_playing(&mut self, playing: bool) {
        if playing {
            self.player.play();
        } else {
            self.player.pause();
        }
        // Always notify so a tracker suspended at the end of the video wakes up
        self.resume.send_replace(playing);
    }

    fn rematch(&mut self, trigger: ShowTrigger) {
        match self.matcher.update(self.position, &self.shots) {
            MatchChange::Entered(index) => {
                if let Some(shot) = self.shots.get(index).cloned() {
                    self.show(index, shot, trigger);
                }
            }
            MatchChange::Cleared => self.hide_for_no_shot(),
            MatchChange::Unchanged => {}
        }
    }

    fn show(&mut self, index: usize, shot: Shot, trigger: ShowTrigger) {
        debug!(index, timestamp = shot.timestamp_seconds, ?trigger, "Showing shot feedback");
        self.overlay.show(index, shot.clone(), Instant::now());
        self.publish(OverlayEvent::Shown { index, shot, trigger });
    }

    fn hide_for_no_shot(&mut self) {
        if self.overlay.clear() {
            self.publish(OverlayEvent::Hidden {
                reason: HideReason::NoActiveShot,
            });
        }
    }

    fn publish(&self, event: OverlayEvent) {
        if let Err(e) = self.events.try_send(event) {
            // The snapshot watch still carries the latest state
            debug!("Overlay event not delivered: {}", e);
        }
        self.publish_snapshot();
    }

    fn publish_snapshot(&self) {
        let is_playing = self.player.state().is_playing;
        self.snapshot.send_replace(OverlaySnapshot {
            position_seconds: self.position,
            is_playing,
            active_index: self.matcher.current_index(),
            visible_index: self.overlay.visible_index(),
        });
    }
}
