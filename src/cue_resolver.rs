/*!
 * Active cue resolution.
 *
 * Given a cue track and a playback time, find the cue to display. A cue is
 * active when `start <= time <= end`. When several cues are active the first
 * one in track order wins, whatever their start times are, so unsorted and
 * overlapping tracks resolve the same way they were authored.
 *
 * Resolution is a linear scan with no state carried between calls.
 */

use crate::cue_parser::{Cue, CueTrack};

/// First cue in track order whose closed interval contains `time`
pub fn active_at(track: &CueTrack, time: f64) -> Option<&Cue> {
    if !is_valid_time(time) {
        return None;
    }

    track.iter().find(|cue| cue.contains(time))
}

/// Text of the active cue, ready to be displayed verbatim
pub fn active_text_at(track: &CueTrack, time: f64) -> Option<&str> {
    active_at(track, time).map(Cue::text)
}

/// Every active cue at `time`, in track order.
///
/// The first element is always the cue `active_at` returns.
pub fn active_cues_at(track: &CueTrack, time: f64) -> Vec<&Cue> {
    if !is_valid_time(time) {
        return Vec::new();
    }

    track.iter().filter(|cue| cue.contains(time)).collect()
}

fn is_valid_time(time: f64) -> bool {
    time.is_finite() && time >= 0.0
}

impl CueTrack {
    /// See [`active_at`]
    pub fn active_at(&self, time: f64) -> Option<&Cue> {
        active_at(self, time)
    }
}
