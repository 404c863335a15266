/*!
 * Subtitle display state driven by playback ticks.
 *
 * `SubtitleState` owns the cue track currently in use, the enabled flag and
 * the caption currently on screen. Loading a document swaps the whole track;
 * disabling installs an empty one. Each playback tick reports whether the
 * display adapter has to show new text, clear, or do nothing.
 */

use std::sync::Arc;
use log::{debug, info};
use parking_lot::RwLock;

use crate::cue_parser::{self, CueTrack};
use crate::cue_resolver;

/// What the display adapter should do after a playback tick
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CaptionUpdate {
    /// Replace the displayed caption with this text
    Show(String),
    /// Remove the displayed caption
    Clear,
    /// The display is already correct
    Unchanged,
}

// @struct: Subtitle track and display state
#[derive(Debug, Clone)]
pub struct SubtitleState {
    // @field: Whether captions are shown at all
    enabled: bool,

    // @field: Track in use, replaced wholesale on load/disable
    track: Arc<CueTrack>,

    // @field: Caption currently on screen
    displayed: Option<String>,

    // @field: Stream index the track was extracted from
    source_index: Option<usize>,
}

impl Default for SubtitleState {
    fn default() -> Self {
        Self {
            enabled: false,
            track: Arc::new(CueTrack::empty()),
            displayed: None,
            source_index: None,
        }
    }
}

impl SubtitleState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn track(&self) -> Arc<CueTrack> {
        Arc::clone(&self.track)
    }

    pub fn displayed(&self) -> Option<&str> {
        self.displayed.as_deref()
    }

    pub fn source_index(&self) -> Option<usize> {
        self.source_index
    }

    /// Parse a freshly fetched caption document and make it the active track
    pub fn load_document(&mut self, source_index: usize, document: &str) -> Arc<CueTrack> {
        let track = Arc::new(cue_parser::parse_document(document));
        info!("Loaded subtitle stream {} with {} cues", source_index, track.len());
        self.install(Some(source_index), Arc::clone(&track));
        track
    }

    /// Install an already parsed track
    pub fn install(&mut self, source_index: Option<usize>, track: Arc<CueTrack>) {
        self.track = track;
        self.source_index = source_index;
        self.enabled = true;
        self.displayed = None;
    }

    /// Turn captions off and drop the current track
    pub fn disable(&mut self) {
        debug!("Subtitles disabled");
        self.track = Arc::new(CueTrack::empty());
        self.source_index = None;
        self.enabled = false;
        self.displayed = None;
    }

    /// Handle a playback time notification.
    ///
    /// When disabled the resolver is never consulted and any leftover
    /// caption is cleared.
    pub fn on_time_update(&mut self, time: f64) -> CaptionUpdate {
        if !self.enabled {
            return self.apply(None);
        }

        let text = cue_resolver::active_text_at(&self.track, time).map(str::to_owned);
        self.apply(text)
    }

    fn apply(&mut self, text: Option<String>) -> CaptionUpdate {
        if text == self.displayed {
            return CaptionUpdate::Unchanged;
        }

        self.displayed = text.clone();
        match text {
            Some(text) => CaptionUpdate::Show(text),
            None => CaptionUpdate::Clear,
        }
    }
}

/// Cue track slot shared between a loader and tick handlers.
///
/// Readers take an `Arc` snapshot per call, so a replacement never becomes
/// visible halfway through a resolution.
#[derive(Debug, Default)]
pub struct SharedCueTrack {
    slot: RwLock<Arc<CueTrack>>,
}

impl SharedCueTrack {
    pub fn new(track: CueTrack) -> Self {
        Self {
            slot: RwLock::new(Arc::new(track)),
        }
    }

    pub fn snapshot(&self) -> Arc<CueTrack> {
        self.slot.read().clone()
    }

    /// Swap in a new track, returning the previous one
    pub fn replace(&self, track: CueTrack) -> Arc<CueTrack> {
        std::mem::replace(&mut *self.slot.write(), Arc::new(track))
    }

    pub fn clear(&self) -> Arc<CueTrack> {
        self.replace(CueTrack::empty())
    }

    pub fn active_text_at(&self, time: f64) -> Option<String> {
        let track = self.snapshot();
        cue_resolver::active_text_at(&track, time).map(str::to_owned)
    }
}
