//! Media player abstraction.

use std::sync::Mutex;

use tokio::time::Instant;

/// Snapshot of the player at one instant.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlaybackState {
    pub position_seconds: f64,
    /// Zero while the duration is unknown
    pub duration_seconds: f64,
    pub is_playing: bool,
}

/// Controls a video player.
///
/// Implementations must be cheap to query; [`state`](MediaPlayer::state)
/// is polled at the sampling cadence.
pub trait MediaPlayer: Send + Sync + 'static {
    fn state(&self) -> PlaybackState;
    fn play(&self);
    fn pause(&self);
    fn seek(&self, position_seconds: f64);
}

#[derive(Debug)]
struct Clock {
    /// Position when playback last started or seeked
    anchor_position: f64,
    /// Set while playing
    anchor_instant: Option<Instant>,
}

/// Player driven by the tokio clock.
///
/// The position advances in real time while playing and stops at the end
/// of the video. Used by the CLI replay and by tests with a paused clock.
#[derive(Debug)]
pub struct SimulatedPlayer {
    duration_seconds: f64,
    clock: Mutex<Clock>,
}

impl SimulatedPlayer {
    pub fn new(duration_seconds: f64) -> Self {
        Self {
            duration_seconds: duration_seconds.max(0.0),
            clock: Mutex::new(Clock {
                anchor_position: 0.0,
                anchor_instant: None,
            }),
        }
    }

    fn position_at(&self, clock: &Clock, now: Instant) -> f64 {
        let elapsed = clock
            .anchor_instant
            .map(|started| now.duration_since(started).as_secs_f64())
            .unwrap_or(0.0);
        (clock.anchor_position + elapsed).min(self.duration_seconds)
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Clock> {
        // A poisoned clock still holds a usable position
        self.clock.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl MediaPlayer for SimulatedPlayer {
    fn state(&self) -> PlaybackState {
        let clock = self.lock();
        let position = self.position_at(&clock, Instant::now());
        PlaybackState {
            position_seconds: position,
            duration_seconds: self.duration_seconds,
            is_playing: clock.anchor_instant.is_some() && position < self.duration_seconds,
        }
    }

    fn play(&self) {
        let mut clock = self.lock();
        let now = Instant::now();
        let position = self.position_at(&clock, now);
        if position >= self.duration_seconds {
            return;
        }
        clock.anchor_position = position;
        clock.anchor_instant = Some(now);
    }

    fn pause(&self) {
        let mut clock = self.lock();
        clock.anchor_position = self.position_at(&clock, Instant::now());
        clock.anchor_instant = None;
    }

    fn seek(&self, position_seconds: f64) {
        let mut clock = self.lock();
        clock.anchor_position = position_seconds.clamp(0.0, self.duration_seconds);
        if clock.anchor_instant.is_some() {
            clock.anchor_instant = Some(Instant::now());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test(start_paused = true)]
    async fn test_position_advances_while_playing() {
        let player = SimulatedPlayer::new(30.0);
        assert!(!player.state().is_playing);

        player.play();
        tokio::time::advance(Duration::from_millis(2500)).await;
        let state = player.state();
        assert!(state.is_playing);
        assert!((state.position_seconds - 2.5).abs() < 1e-9);

        player.pause();
        tokio::time::advance(Duration::from_secs(5)).await;
        assert!((player.state().position_seconds - 2.5).abs() < 1e-9);
    }

    #[tokio::test(start_paused = true)]
    async fn test_stops_at_end() {
        let player = SimulatedPlayer::new(3.0);
        player.play();
        tokio::time::advance(Duration::from_secs(10)).await;
        let state = player.state();
        assert_eq!(state.position_seconds, 3.0);
        assert!(!state.is_playing);
    }

    #[tokio::test(start_paused = true)]
    async fn test_seek_clamps() {
        let player = SimulatedPlayer::new(20.0);
        player.seek(50.0);
        assert_eq!(player.state().position_seconds, 20.0);
        player.seek(-4.0);
        assert_eq!(player.state().position_seconds, 0.0);
    }
}
