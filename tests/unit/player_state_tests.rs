/*!
 * Tests for playback state transitions
 */

use cueplay::player_state::{PlaybackState, format_clock};
use crate::common::approx_eq;

fn playing(duration: f64, time: f64) -> PlaybackState {
    let mut state = PlaybackState::default();
    state.set_duration(duration);
    state.on_time_update(time);
    state
}

#[test]
fn test_progress_shouldFollowClockUntilDragging() {
    let mut state = playing(200.0, 50.0);
    assert!(approx_eq(state.progress(), 0.25));

    state.begin_drag(0.8);
    state.on_time_update(60.0);

    assert!(state.is_dragging());
    assert!(approx_eq(state.progress(), 0.8));
    assert!(approx_eq(state.current_time, 50.0));
}

#[test]
fn test_endDrag_shouldReturnSeekTarget() {
    let mut state = playing(120.0, 10.0);
    state.begin_drag(0.1);
    state.drag_to(0.5);

    let target = state.end_drag();

    assert_eq!(target, Some(60.0));
    assert!(!state.is_dragging());
    assert!(approx_eq(state.current_time, 60.0));
    assert_eq!(state.end_drag(), None);
}

#[test]
fn test_drag_withOutOfRangeRatio_shouldClamp() {
    let mut state = playing(100.0, 0.0);
    state.begin_drag(-3.0);
    assert_eq!(state.progress(), 0.0);

    state.drag_to(7.0);
    assert_eq!(state.end_drag(), Some(100.0));
}

#[test]
fn test_dragTo_withoutBeginDrag_shouldBeIgnored() {
    let mut state = playing(100.0, 20.0);
    state.drag_to(0.9);
    assert!(!state.is_dragging());
    assert!(approx_eq(state.progress(), 0.2));
}

#[test]
fn test_cancelDrag_shouldKeepPosition() {
    let mut state = playing(100.0, 20.0);
    state.begin_drag(0.9);
    state.cancel_drag();
    assert!(approx_eq(state.current_time, 20.0));
}

#[test]
fn test_seekRelative_shouldClampToBounds() {
    let mut state = playing(30.0, 25.0);

    assert!(approx_eq(state.seek_relative(10.0), 30.0));
    assert!(approx_eq(state.seek_relative(-45.0), 0.0));
}

#[test]
fn test_seekRelative_withNonFiniteDelta_shouldKeepPosition() {
    let mut state = playing(100.0, 40.0);

    assert!(approx_eq(state.seek_relative(f64::NAN), 40.0));
    assert!(approx_eq(state.seek_relative(f64::INFINITY), 40.0));
    assert!(approx_eq(state.seek_relative(f64::NEG_INFINITY), 40.0));
    assert!(approx_eq(state.progress(), 0.4));
}

#[test]
fn test_progress_withUnknownDuration_shouldBeZero() {
    let state = playing(0.0, 12.0);
    assert_eq!(state.progress(), 0.0);
}

#[test]
fn test_volume_shouldClampAndUnmute() {
    let mut state = PlaybackState::new(0.5, true);
    assert_eq!(state.effective_volume(), 0.0);

    state.set_volume(1.7);
    assert_eq!(state.volume, 1.0);
    assert!(!state.muted);

    state.set_volume(0.0);
    assert!(!state.muted);
    assert!(state.toggle_mute());
    assert_eq!(state.effective_volume(), 0.0);

    state.set_volume(f64::NAN);
    assert_eq!(state.volume, 0.0);
}

#[test]
fn test_togglePlay_shouldFlipPaused() {
    let mut state = PlaybackState::default();
    assert!(state.paused);
    assert!(!state.toggle_play());
    assert!(state.toggle_play());
}

#[test]
fn test_formatClock_shouldSwitchToHoursAfterOneHour() {
    assert_eq!(format_clock(0.0), "0:00");
    assert_eq!(format_clock(65.9), "1:05");
    assert_eq!(format_clock(3599.0), "59:59");
    assert_eq!(format_clock(3723.0), "1:02:03");
    assert_eq!(format_clock(f64::NAN), "0:00");
}
