use std::path::Path;
use log::{info, debug};
use url::Url;

use crate::app_config::{Config, Theme};
use crate::errors::AppError;
use crate::file_utils::FileManager;
use crate::player_state::PlaybackState;
use crate::subtitle_state::{CaptionUpdate, SubtitleState};
use crate::track_selection::{BackendEndpoints, MediaAnalysis, SubtitleFormat, TrackSelectionState};

// @module: Player session wiring the state records together

/// Player session: owns the playback, track selection and subtitle records
/// and routes collaborator events to them. Each record stays usable on its
/// own; the controller only sequences them.
pub struct Controller {
    // @field: App configuration
    config: Config,

    // @field: Request URL builder for the configured backend
    endpoints: BackendEndpoints,

    // @field: Player chrome theme, toggled by the user
    theme: Theme,

    // @field: Clock, seeking and volume
    pub playback: PlaybackState,

    // @field: Audio and subtitle stream choices
    pub tracks: TrackSelectionState,

    // @field: Active cue track and displayed caption
    pub subtitles: SubtitleState,
}

impl Controller {
    // @method: Create a new controller with the given configuration
    pub fn with_config(config: Config) -> Result<Self, AppError> {
        config.validate()?;

        let endpoints = BackendEndpoints::new(&config.backend.base_url)?;
        let playback = PlaybackState::new(config.player.volume, config.player.muted);
        Ok(Self {
            theme: config.player.theme,
            config,
            endpoints,
            playback,
            tracks: TrackSelectionState::default(),
            subtitles: SubtitleState::new(),
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn endpoints(&self) -> &BackendEndpoints {
        &self.endpoints
    }

    pub fn theme(&self) -> Theme {
        self.theme
    }

    pub fn toggle_theme(&mut self) -> Theme {
        self.theme = self.theme.toggled();
        debug!("Theme switched to {:?}", self.theme);
        self.theme
    }

    /// Take a new analysis result. Returns the subtitle stream index the
    /// fetch collaborator should download, if one was picked automatically.
    pub fn apply_analysis(&mut self, analysis: MediaAnalysis) -> Option<usize> {
        self.playback.set_duration(analysis.video_info.duration_seconds);
        self.tracks = TrackSelectionState::from_analysis(analysis);
        self.subtitles.disable();

        if !self.config.subtitles.enabled_by_default {
            return None;
        }

        let preferred = self.config.subtitles.preferred_language.as_deref();
        let picked = self.tracks.auto_select_subtitle(preferred).map(|s| s.index);
        if let Some(index) = picked {
            info!("Auto-selected subtitle stream {}", index);
        }
        picked
    }

    /// Select a subtitle stream; the caller fetches its document next
    pub fn select_subtitle(&mut self, index: usize) -> Result<(), AppError> {
        self.tracks.select_subtitle(index)?;
        Ok(())
    }

    /// Where to fetch the selected subtitle stream, `None` when subtitles are off
    pub fn subtitle_url_for(&self, media_url: &str, format: SubtitleFormat) -> Result<Option<Url>, AppError> {
        match self.tracks.selected_subtitle() {
            Some(stream) => Ok(Some(self.endpoints.subtitle_url(media_url, stream.index, format)?)),
            None => Ok(None),
        }
    }

    /// Video URL carrying the selected audio stream
    pub fn stream_url_for(&self, media_url: &str) -> Result<Url, AppError> {
        let audio = self.tracks.selected_audio().map(|s| s.index);
        Ok(self.endpoints.stream_url(media_url, audio)?)
    }

    /// Install a fetched caption document for the selected subtitle stream
    /// and refresh the caption for the current position
    pub fn load_subtitle_document(&mut self, index: usize, document: &str) -> CaptionUpdate {
        let track = self.subtitles.load_document(index, document);
        debug!("Subtitle track spans {:.3}s", track.duration());
        self.subtitles.on_time_update(self.playback.current_time)
    }

    /// Read a caption document from disk and install it like a fetched one
    pub async fn load_subtitle_file<P: AsRef<Path>>(&mut self, index: usize, path: P) -> Result<CaptionUpdate, AppError> {
        let document = FileManager::read_document(path).await?;
        Ok(self.load_subtitle_document(index, &document))
    }

    pub fn disable_subtitles(&mut self) -> CaptionUpdate {
        self.tracks.disable_subtitles();
        self.subtitles.disable();
        CaptionUpdate::Clear
    }

    /// Playback time notification from the video element
    pub fn tick(&mut self, time: f64) -> CaptionUpdate {
        self.playback.on_time_update(time);
        self.subtitles.on_time_update(self.playback.current_time)
    }

    /// Skip by the configured step; negative `direction` goes back
    pub fn skip(&mut self, direction: i8) -> CaptionUpdate {
        let step = self.config.player.seek_step_secs * f64::from(direction.signum());
        let time = self.playback.seek_relative(step);
        self.subtitles.on_time_update(time)
    }

    /// Release the seek bar and resolve the caption at the new position
    pub fn finish_drag(&mut self) -> Option<CaptionUpdate> {
        let time = self.playback.end_drag()?;
        Some(self.subtitles.on_time_update(time))
    }

    /// Configuration with the session's volume and theme folded back in,
    /// ready to be saved
    pub fn persisted_config(&self) -> Config {
        let mut config = self.config.clone();
        config.player.volume = self.playback.volume;
        config.player.muted = self.playback.muted;
        config.player.theme = self.theme;
        config
    }
}
