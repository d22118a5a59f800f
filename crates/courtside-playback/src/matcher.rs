//! Timeline matching: which shot is active at a playback position.

use courtside_models::Shot;

/// Default max distance between position and shot timestamp.
pub const DEFAULT_TOLERANCE_SECS: f64 = 2.0;

/// Find the active shot at `position`.
///
/// Returns the first shot in list order whose timestamp is strictly within
/// `tolerance` of `position`. When windows overlap the earlier list entry
/// wins.
pub fn match_active(position: f64, shots: &[Shot], tolerance: f64) -> Option<(usize, &Shot)> {
    shots
        .iter()
        .enumerate()
        .find(|(_, shot)| (position - shot.timestamp_seconds).abs() < tolerance)
}

/// Outcome of re-matching at a new position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchChange {
    /// A different shot became active
    Entered(usize),
    /// The previously active shot is no longer in range
    Cleared,
    Unchanged,
}

/// Remembers the active shot so callers only react to changes.
///
/// Shots are identified by timestamp, so two entries sharing a timestamp
/// are the same shot for change detection.
#[derive(Debug, Clone)]
pub struct ActiveShotTracker {
    tolerance: f64,
    current: Option<(usize, f64)>,
}

impl ActiveShotTracker {
    pub fn new(tolerance: f64) -> Self {
        Self {
            tolerance,
            current: None,
        }
    }

    pub fn tolerance(&self) -> f64 {
        self.tolerance
    }

    /// Index of the active shot, if any.
    pub fn current_index(&self) -> Option<usize> {
        self.current.map(|(index, _)| index)
    }

    /// Re-match at `position`.
    pub fn update(&mut self, position: f64, shots: &[Shot]) -> MatchChange {
        let next = match_active(position, shots, self.tolerance)
            .map(|(index, shot)| (index, shot.timestamp_seconds));

        match (self.current, next) {
            (None, None) => MatchChange::Unchanged,
            (Some(_), None) => {
                self.current = None;
                MatchChange::Cleared
            }
            (Some((_, current_ts)), Some((index, ts))) if current_ts == ts => {
                self.current = Some((index, ts));
                MatchChange::Unchanged
            }
            (_, Some((index, ts))) => {
                self.current = Some((index, ts));
                MatchChange::Entered(index)
            }
        }
    }

    /// Make `index` the active shot regardless of position.
    ///
    /// Returns `false` (and leaves state alone) when `index` is out of range.
    pub fn force(&mut self, index: usize, shots: &[Shot]) -> bool {
        match shots.get(index) {
            Some(shot) => {
                self.current = Some((index, shot.timestamp_seconds));
                true
            }
            None => false,
        }
    }

    pub fn clear(&mut self) {
        self.current = None;
    }
}
