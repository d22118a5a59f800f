//! Human-readable output.

use courtside_gemini::{AnalysisReport, Banner};
use courtside_models::{format_clock, Shot};
use courtside_playback::{HideReason, OverlayEvent, ShowTrigger};

/// One line per shot: clock, badge, type, running tally.
pub fn shot_line(shot: &Shot) -> String {
    format!(
        "{:>6}  {:<6}  {:<28}  made {} / missed {} / layups {}",
        format_clock(shot.timestamp_seconds),
        shot.result.label(),
        shot.shot_type,
        shot.made_count_at_this_point,
        shot.missed_count_at_this_point,
        shot.layups_made_at_this_point,
    )
}

pub fn shot_table(shots: &[Shot]) -> String {
    let mut out = String::new();
    for shot in shots {
        out.push_str(&shot_line(shot));
        out.push('\n');
        if !shot.feedback.is_empty() {
            out.push_str("        ");
            out.push_str(&shot.feedback);
            out.push('\n');
        }
    }
    out
}

pub fn banner_text(banner: &Banner) -> &str {
    match banner {
        Banner::UsingExampleFeedback { reason } => reason,
        Banner::NoShotsDetected => "No shots detected. Try a clip where the shooter and hoop are both in view.",
    }
}

pub fn report_summary(report: &AnalysisReport) -> String {
    let mut out = String::new();
    if let Some(banner) = &report.banner {
        out.push_str(banner_text(banner));
        out.push_str("\n\n");
    }
    if let Some(last) = report.shots.last() {
        out.push_str(&format!(
            "{} shots: {} made, {} missed\n\n",
            report.shots.len(),
            last.made_count_at_this_point,
            last.missed_count_at_this_point
        ));
    }
    out.push_str(&shot_table(&report.shots));
    out
}

pub fn event_line(position: f64, event: &OverlayEvent) -> String {
    let clock = format_clock(position);
    match event {
        OverlayEvent::Shown { shot, trigger, .. } => {
            let via = match trigger {
                ShowTrigger::Playback => "",
                ShowTrigger::Selection => " (selected)",
                ShowTrigger::TimelineTap => " (timeline)",
                ShowTrigger::Seek => " (seek)",
            };
            format!(
                "[{}] {} {}{}: {}",
                clock,
                shot.result.label().to_uppercase(),
                shot.shot_type,
                via,
                shot.feedback
            )
        }
        OverlayEvent::Hidden { reason } => {
            let why = match reason {
                HideReason::Expired => "timed out",
                HideReason::NoActiveShot => "no shot nearby",
            };
            format!("[{}] feedback hidden ({})", clock, why)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use courtside_models::example_shots;

    #[test]
    fn test_shot_line() {
        let shots = example_shots();
        let line = shot_line(&shots[1]);
        assert!(line.contains("0:13"));
        assert!(line.contains("Made"));
        assert!(line.contains("Three-pointer"));
        assert!(line.contains("made 1 / missed 1"));
    }

    #[test]
    fn test_event_lines() {
        let shot = example_shots().remove(0);
        let shown = OverlayEvent::Shown {
            index: 0,
            shot,
            trigger: ShowTrigger::Selection,
        };
        let line = event_line(7.5, &shown);
        assert!(line.starts_with("[0:07] MISSED"));
        assert!(line.contains("(selected)"));

        let hidden = OverlayEvent::Hidden {
            reason: HideReason::Expired,
        };
        assert_eq!(event_line(12.0, &hidden), "[0:12] feedback hidden (timed out)");
    }
}
