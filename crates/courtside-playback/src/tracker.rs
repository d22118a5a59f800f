//! Playback position sampling.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{mpsc, watch};
use tokio::time::{interval, MissedTickBehavior};
use tracing::{debug, trace};

use crate::player::MediaPlayer;

/// Drops samples that barely moved.
#[derive(Debug, Clone)]
pub struct SampleCoalescer {
    epsilon: f64,
    last: Option<f64>,
}

impl SampleCoalescer {
    pub fn new(epsilon: f64) -> Self {
        Self { epsilon, last: None }
    }

    /// Whether `position` should be forwarded. Records it if so.
    pub fn admit(&mut self, position: f64) -> bool {
        let forward = match self.last {
            None => true,
            Some(last) => (position - last).abs() >= self.epsilon,
        };
        if forward {
            self.last = Some(position);
        }
        forward
    }

    pub fn last(&self) -> Option<f64> {
        self.last
    }
}

/// Counter bumped after every explicit seek.
///
/// Samples carry the value read before the player was queried, so the
/// session can tell samples taken before a seek from those taken after.
#[derive(Debug, Clone, Default)]
pub struct SeekEpoch(Arc<AtomicU64>);

impl SeekEpoch {
    pub fn current(&self) -> u64 {
        self.0.load(Ordering::Acquire)
    }

    /// Call after the player has been seeked.
    pub fn advance(&self) -> u64 {
        self.0.fetch_add(1, Ordering::AcqRel) + 1
    }
}

/// One forwarded position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PositionSample {
    pub position_seconds: f64,
    pub seek_epoch: u64,
}

/// Polls a [`MediaPlayer`] and forwards coalesced positions.
pub struct PositionTracker<P: MediaPlayer> {
    player: Arc<P>,
    period: Duration,
    coalescer: SampleCoalescer,
    seek_epoch: SeekEpoch,
}

impl<P: MediaPlayer> PositionTracker<P> {
    pub fn new(player: Arc<P>, period: Duration, epsilon: f64, seek_epoch: SeekEpoch) -> Self {
        Self {
            player,
            period,
            coalescer: SampleCoalescer::new(epsilon),
            seek_epoch,
        }
    }

    /// Sample until shutdown or until the receiver goes away.
    ///
    /// Sampling is suspended while the player is not playing and resumes
    /// when `resume` flips to `true`.
    pub async fn run(
        mut self,
        samples: mpsc::Sender<PositionSample>,
        mut resume: watch::Receiver<bool>,
        mut shutdown: watch::Receiver<bool>,
    ) {
        let mut ticker = interval(self.period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                biased;

                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        break;
                    }
                }
                _ = ticker.tick() => {
                    let seek_epoch = self.seek_epoch.current();
                    let state = self.player.state();

                    if self.coalescer.admit(state.position_seconds) {
                        let sample = PositionSample {
                            position_seconds: state.position_seconds,
                            seek_epoch,
                        };
                        trace!(position = sample.position_seconds, "Position sample");
                        tokio::select! {
                            biased;

                            _ = shutdown.changed() => break,
                            sent = samples.send(sample) => {
                                if sent.is_err() {
                                    break;
                                }
                            }
                        }
                    }

                    if !state.is_playing {
                        debug!(position = state.position_seconds, "Playback stopped, suspending sampling");
                        if !wait_for_resume(&mut resume, &mut shutdown).await {
                            break;
                        }
                        debug!("Playback resumed");
                        ticker.reset_immediately();
                    }
                }
            }
        }

        debug!("Position tracker stopped");
    }
}

/// Wait until `resume` reads `true`. Returns `false` on shutdown.
async fn wait_for_resume(resume: &mut watch::Receiver<bool>, shutdown: &mut watch::Receiver<bool>) -> bool {
    loop {
        tokio::select! {
            biased;

            changed = shutdown.changed() => {
                if changed.is_err() || *shutdown.borrow() {
                    return false;
                }
            }
            changed = resume.changed() => {
                if changed.is_err() {
                    return false;
                }
                if *resume.borrow_and_update() {
                    return true;
                }
            }
        }
    }
}
