use log::debug;

// @module: Playback position, seeking and volume state

// @struct: Playback state with pure transitions
#[derive(Debug, Clone, PartialEq)]
pub struct PlaybackState {
    // @field: Last reported playback position in seconds
    pub current_time: f64,

    // @field: Media duration in seconds, 0.0 until known
    pub duration: f64,

    // @field: Paused flag
    pub paused: bool,

    // @field: Volume in 0.0..=1.0
    pub volume: f64,

    // @field: Mute flag, independent from volume
    pub muted: bool,

    // @field: Progress ratio while the seek bar is being dragged
    drag: Option<f64>,
}

impl Default for PlaybackState {
    fn default() -> Self {
        Self {
            current_time: 0.0,
            duration: 0.0,
            paused: true,
            volume: 1.0,
            muted: false,
            drag: None,
        }
    }
}

impl PlaybackState {
    pub fn new(volume: f64, muted: bool) -> Self {
        let mut state = Self::default();
        state.set_volume(volume);
        state.muted = muted;
        state
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    /// Progress ratio shown by the seek bar.
    ///
    /// While dragging the bar follows the pointer, not the media clock.
    pub fn progress(&self) -> f64 {
        if let Some(ratio) = self.drag {
            return ratio;
        }
        if self.duration > 0.0 {
            (self.current_time / self.duration).clamp(0.0, 1.0)
        } else {
            0.0
        }
    }

    pub fn set_duration(&mut self, duration: f64) {
        self.duration = if duration.is_finite() { duration.max(0.0) } else { 0.0 };
    }

    /// Playback clock tick. Ignored while dragging so the bar does not jump back.
    pub fn on_time_update(&mut self, time: f64) {
        if self.drag.is_none() && time.is_finite() {
            self.current_time = time.max(0.0);
        }
    }

    pub fn toggle_play(&mut self) -> bool {
        self.paused = !self.paused;
        self.paused
    }

    pub fn begin_drag(&mut self, ratio: f64) {
        self.drag = Some(clamp_ratio(ratio));
    }

    pub fn drag_to(&mut self, ratio: f64) {
        if self.drag.is_some() {
            self.drag = Some(clamp_ratio(ratio));
        }
    }

    /// Release the seek bar. Returns the seek target in seconds.
    pub fn end_drag(&mut self) -> Option<f64> {
        let ratio = self.drag.take()?;
        let target = ratio * self.duration;
        self.current_time = target;
        debug!("Seek by drag to {:.3}s", target);
        Some(target)
    }

    /// Abandon a drag without seeking
    pub fn cancel_drag(&mut self) {
        self.drag = None;
    }

    /// Skip forward or backward, clamped to the media bounds
    pub fn seek_relative(&mut self, delta: f64) -> f64 {
        if !delta.is_finite() {
            return self.current_time;
        }
        let target = self.current_time + delta;
        let upper = if self.duration > 0.0 { self.duration } else { f64::MAX };
        self.current_time = target.clamp(0.0, upper);
        self.current_time
    }

    /// Set the volume, clamped to 0.0..=1.0. A positive volume unmutes.
    pub fn set_volume(&mut self, volume: f64) {
        let volume = if volume.is_finite() { volume.clamp(0.0, 1.0) } else { self.volume };
        self.volume = volume;
        if volume > 0.0 {
            self.muted = false;
        }
    }

    pub fn toggle_mute(&mut self) -> bool {
        self.muted = !self.muted;
        self.muted
    }

    /// Volume actually applied to the output
    pub fn effective_volume(&self) -> f64 {
        if self.muted { 0.0 } else { self.volume }
    }
}

fn clamp_ratio(ratio: f64) -> f64 {
    if ratio.is_finite() { ratio.clamp(0.0, 1.0) } else { 0.0 }
}

/// Player clock text: `M:SS` below one hour, `H:MM:SS` from there on
pub fn format_clock(seconds: f64) -> String {
    if !seconds.is_finite() || seconds < 0.0 {
        return "0:00".to_string();
    }

    let total = seconds.floor() as u64;
    let hours = total / 3600;
    let minutes = (total % 3600) / 60;
    let secs = total % 60;

    if hours > 0 {
        format!("{}:{:02}:{:02}", hours, minutes, secs)
    } else {
        format!("{}:{:02}", minutes, secs)
    }
}
