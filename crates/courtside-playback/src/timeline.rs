//! Timeline geometry for markers, taps, and skips.

use courtside_models::Shot;

/// Distance covered by one skip forward/backward.
pub const SKIP_SECONDS: f64 = 10.0;

/// Position for a tap at `fraction` of the timeline width.
pub fn tap_position(fraction: f64, duration: f64) -> f64 {
    let fraction = if fraction.is_finite() { fraction.clamp(0.0, 1.0) } else { 0.0 };
    fraction * duration.max(0.0)
}

/// Where a shot's marker sits on the timeline, in `[0, 1]`.
pub fn marker_fraction(shot: &Shot, duration: f64) -> f64 {
    if !duration.is_finite() || duration <= 0.0 {
        return 0.0;
    }
    (shot.timestamp_seconds / duration).clamp(0.0, 1.0)
}

/// Clamp a seek target into the video.
///
/// An unknown duration (zero or less) only clamps at the start.
pub fn clamp_seek(target: f64, duration: f64) -> f64 {
    let target = if target.is_finite() { target.max(0.0) } else { 0.0 };
    if duration > 0.0 {
        target.min(duration)
    } else {
        target
    }
}

/// Position after skipping `delta` seconds.
pub fn skip(position: f64, delta: f64, duration: f64) -> f64 {
    clamp_seek(position + delta, duration)
}

#[cfg(test)]
mod tests {
    use super::*;
    use courtside_models::example_shots;

    #[test]
    fn test_tap_position() {
        assert_eq!(tap_position(0.5, 60.0), 30.0);
        assert_eq!(tap_position(1.5, 60.0), 60.0);
        assert_eq!(tap_position(-0.2, 60.0), 0.0);
        assert_eq!(tap_position(f64::NAN, 60.0), 0.0);
    }

    #[test]
    fn test_marker_fraction() {
        let shots = example_shots();
        assert_eq!(marker_fraction(&shots[1], 26.0), 0.5);
        assert_eq!(marker_fraction(&shots[2], 10.0), 1.0);
        assert_eq!(marker_fraction(&shots[0], 0.0), 0.0);
    }

    #[test]
    fn test_skip_clamps() {
        assert_eq!(skip(5.0, SKIP_SECONDS, 60.0), 15.0);
        assert_eq!(skip(55.0, SKIP_SECONDS, 60.0), 60.0);
        assert_eq!(skip(4.0, -SKIP_SECONDS, 60.0), 0.0);
        assert_eq!(skip(95.0, SKIP_SECONDS, 0.0), 105.0);
    }
}
