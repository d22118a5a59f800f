//! Feedback overlay visibility.

use std::time::Duration;

use tokio::time::Instant;

use courtside_models::Shot;

/// Default time the overlay stays up.
pub const DEFAULT_DWELL: Duration = Duration::from_millis(5000);

/// Whether the feedback overlay is on screen.
#[derive(Debug, Clone, PartialEq)]
pub enum OverlayState {
    Hidden,
    Visible {
        index: usize,
        shot: Shot,
        shown_at: Instant,
    },
}

/// Overlay with its dwell timer.
///
/// The owner drives time: it sleeps until [`deadline`](Overlay::deadline)
/// and then calls [`expire`](Overlay::expire).
#[derive(Debug, Clone)]
pub struct Overlay {
    state: OverlayState,
    dwell: Duration,
}

impl Overlay {
    pub fn new(dwell: Duration) -> Self {
        Self {
            state: OverlayState::Hidden,
            dwell,
        }
    }

    pub fn state(&self) -> &OverlayState {
        &self.state
    }

    pub fn is_visible(&self) -> bool {
        matches!(self.state, OverlayState::Visible { .. })
    }

    pub fn visible_index(&self) -> Option<usize> {
        match self.state {
            OverlayState::Visible { index, .. } => Some(index),
            OverlayState::Hidden => None,
        }
    }

    /// Show `shot`, restarting the dwell timer if already visible.
    pub fn show(&mut self, index: usize, shot: Shot, now: Instant) {
        self.state = OverlayState::Visible {
            index,
            shot,
            shown_at: now,
        };
    }

    /// Hide immediately. Returns whether the overlay was visible.
    pub fn clear(&mut self) -> bool {
        let was_visible = self.is_visible();
        self.state = OverlayState::Hidden;
        was_visible
    }

    /// Hide once the dwell has elapsed. Returns whether it was hidden now.
    pub fn expire(&mut self, now: Instant) -> bool {
        match self.deadline() {
            Some(deadline) if now >= deadline => {
                self.state = OverlayState::Hidden;
                true
            }
            _ => false,
        }
    }

    /// When the visible overlay is due to hide.
    pub fn deadline(&self) -> Option<Instant> {
        match self.state {
            OverlayState::Visible { shown_at, .. } => Some(shown_at + self.dwell),
            OverlayState::Hidden => None,
        }
    }
}

impl Default for Overlay {
    fn default() -> Self {
        Self::new(DEFAULT_DWELL)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use courtside_models::example_shots;

    #[test]
    fn test_expires_after_dwell() {
        let shot = example_shots().remove(0);
        let start = Instant::now();
        let mut overlay = Overlay::default();

        overlay.show(0, shot, start);
        assert!(!overlay.expire(start + Duration::from_millis(4999)));
        assert!(overlay.is_visible());
        assert!(overlay.expire(start + DEFAULT_DWELL));
        assert!(!overlay.is_visible());
        assert!(overlay.deadline().is_none());
    }

    #[test]
    fn test_show_restarts_dwell() {
        let shots = example_shots();
        let start = Instant::now();
        let mut overlay = Overlay::default();

        overlay.show(0, shots[0].clone(), start);
        let later = start + Duration::from_secs(3);
        overlay.show(1, shots[1].clone(), later);
        assert_eq!(overlay.deadline(), Some(later + DEFAULT_DWELL));
        assert_eq!(overlay.visible_index(), Some(1));
    }

    #[test]
    fn test_clear() {
        let mut overlay = Overlay::default();
        assert!(!overlay.clear());
        overlay.show(0, example_shots().remove(0), Instant::now());
        assert!(overlay.clear());
        assert_eq!(overlay.state(), &OverlayState::Hidden);
    }
}
