//! Simulated analysis progress.
//!
//! The model gives no progress signal, so the analysis screen shows a
//! percentage that advances on a timer, stalls at the cap, and jumps to 100
//! when the analysis finishes.

use tokio::sync::watch;

use crate::config::AnalysisConfig;

/// Percentage published while an analysis runs.
#[derive(Debug)]
pub struct SimulatedProgress {
    tx: watch::Sender<u8>,
    step: u8,
    cap: u8,
}

impl SimulatedProgress {
    pub fn new(config: &AnalysisConfig) -> Self {
        let (tx, _) = watch::channel(0);
        Self {
            tx,
            step: config.progress_step,
            cap: config.progress_cap.min(100),
        }
    }

    /// Subscribe to progress updates.
    pub fn subscribe(&self) -> watch::Receiver<u8> {
        self.tx.subscribe()
    }

    pub fn current(&self) -> u8 {
        *self.tx.borrow()
    }

    /// Advance one tick, never past the cap.
    pub fn advance(&self) {
        let (step, cap) = (self.step, self.cap);
        self.tx.send_if_modified(|value| {
            let next = value.saturating_add(step).min(cap).max(*value);
            let changed = next != *value;
            *value = next;
            changed
        });
    }

    /// Mark the analysis finished.
    pub fn complete(&self) {
        self.tx.send_replace(100);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_advance_caps_at_95() {
        let progress = SimulatedProgress::new(&AnalysisConfig::default());
        let rx = progress.subscribe();
        for _ in 0..30 {
            progress.advance();
        }
        assert_eq!(progress.current(), 95);
        assert_eq!(*rx.borrow(), 95);

        progress.complete();
        assert_eq!(*rx.borrow(), 100);
    }

    #[test]
    fn test_advance_steps() {
        let progress = SimulatedProgress::new(&AnalysisConfig::default());
        progress.advance();
        progress.advance();
        assert_eq!(progress.current(), 10);
    }
}
