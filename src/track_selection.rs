/*!
 * Track discovery results and audio/subtitle selection.
 *
 * The backend probes the media file and answers with the streams it found.
 * This module decodes that answer, keeps the user's audio and subtitle
 * choices, and builds the backend URLs the fetch collaborator requests.
 */

use log::{debug, warn};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use url::Url;

use crate::errors::TrackError;
use crate::language_utils;

/// Subtitle codecs that carry images instead of text
const BITMAP_SUBTITLE_CODECS: &[&str] = &["hdmv_pgs_subtitle", "dvd_subtitle", "dvb_subtitle", "xsub"];

fn unknown() -> String {
    "Unknown".to_string()
}

fn undetermined() -> String {
    language_utils::UNDETERMINED.to_string()
}

/// Container-level information
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VideoInfo {
    #[serde(default = "unknown")]
    pub filename: String,
    #[serde(default = "unknown")]
    pub format: String,
    #[serde(default = "unknown")]
    pub duration: String,
    #[serde(default)]
    pub duration_seconds: f64,
    #[serde(default = "unknown")]
    pub size: String,
    #[serde(default = "unknown")]
    pub bitrate: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VideoStream {
    pub index: usize,
    #[serde(default = "unknown")]
    pub codec: String,
    #[serde(default)]
    pub width: u32,
    #[serde(default)]
    pub height: u32,
    #[serde(default = "unknown")]
    pub fps: String,
    #[serde(default)]
    pub title: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AudioStream {
    pub index: usize,
    #[serde(default = "unknown")]
    pub codec: String,
    #[serde(default = "undetermined")]
    pub language: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub channels: Option<u32>,
    #[serde(default)]
    pub default: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubtitleStream {
    pub index: usize,
    #[serde(default = "unknown")]
    pub codec: String,
    #[serde(default = "undetermined")]
    pub language: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub default: bool,
    #[serde(default)]
    pub forced: bool,
}

impl SubtitleStream {
    /// Check if the stream is image-based (cannot be turned into caption text)
    pub fn is_bitmap(&self) -> bool {
        BITMAP_SUBTITLE_CODECS.contains(&self.codec.as_str())
    }

    /// Whether the language tag or the title names `language`
    fn matches_language(&self, language: &str) -> bool {
        if language_utils::language_codes_match(&self.language, language) {
            return true;
        }

        let Some(title) = &self.title else {
            return false;
        };
        let title_lower = title.to_lowercase();
        match language_utils::get_language_name(language) {
            Ok(name) => title_lower.contains(&name.to_lowercase()),
            Err(_) => false,
        }
    }

    pub fn label(&self) -> String {
        stream_label(&self.language, self.title.as_deref(), &self.codec, self.forced)
    }
}

impl AudioStream {
    pub fn label(&self) -> String {
        stream_label(&self.language, self.title.as_deref(), &self.codec, false)
    }
}

fn stream_label(language: &str, title: Option<&str>, codec: &str, forced: bool) -> String {
    let mut label = language_utils::display_language(language);
    if let Some(title) = title.filter(|t| !t.trim().is_empty()) {
        label.push_str(" - ");
        label.push_str(title.trim());
    }
    label.push_str(&format!(" ({})", codec));
    if forced {
        label.push_str(" [forced]");
    }
    label
}

/// Decoded answer of the backend analyze endpoint
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MediaAnalysis {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub video_info: VideoInfo,
    #[serde(default)]
    pub video_streams: Vec<VideoStream>,
    #[serde(default)]
    pub audio_streams: Vec<AudioStream>,
    #[serde(default)]
    pub subtitle_streams: Vec<SubtitleStream>,
}

impl MediaAnalysis {
    /// Decode an analyze response body. An `{"error": ...}` body becomes
    /// [`TrackError::Backend`].
    pub fn from_json(body: &str) -> Result<Self, TrackError> {
        let value: Value = serde_json::from_str(body)?;

        if let Some(message) = value.get("error").and_then(Value::as_str) {
            return Err(TrackError::Backend(message.to_string()));
        }

        let analysis: MediaAnalysis = serde_json::from_value(value)?;
        debug!(
            "Analysis: {} audio, {} subtitle streams",
            analysis.audio_streams.len(),
            analysis.subtitle_streams.len()
        );
        Ok(analysis)
    }

    /// Subtitle streams that can be converted to caption text
    pub fn text_subtitle_streams(&self) -> impl Iterator<Item = &SubtitleStream> {
        self.subtitle_streams.iter().filter(|s| !s.is_bitmap())
    }
}

// @struct: Audio/subtitle choices for the loaded media
#[derive(Debug, Clone, Default)]
pub struct TrackSelectionState {
    // @field: Streams reported by the backend
    analysis: MediaAnalysis,

    // @field: Selected audio stream index
    audio: Option<usize>,

    // @field: Selected subtitle stream index, None when captions are off
    subtitle: Option<usize>,
}

impl TrackSelectionState {
    /// Start from an analysis. Audio defaults to the stream flagged as
    /// default, else the first one. Subtitles start disabled.
    pub fn from_analysis(analysis: MediaAnalysis) -> Self {
        let audio = analysis
            .audio_streams
            .iter()
            .find(|s| s.default)
            .or_else(|| analysis.audio_streams.first())
            .map(|s| s.index);

        Self {
            analysis,
            audio,
            subtitle: None,
        }
    }

    pub fn analysis(&self) -> &MediaAnalysis {
        &self.analysis
    }

    pub fn selected_audio(&self) -> Option<&AudioStream> {
        let index = self.audio?;
        self.analysis.audio_streams.iter().find(|s| s.index == index)
    }

    pub fn selected_subtitle(&self) -> Option<&SubtitleStream> {
        let index = self.subtitle?;
        self.analysis.subtitle_streams.iter().find(|s| s.index == index)
    }

    pub fn select_audio(&mut self, index: usize) -> Result<&AudioStream, TrackError> {
        let stream = self
            .analysis
            .audio_streams
            .iter()
            .find(|s| s.index == index)
            .ok_or(TrackError::UnknownStream { kind: "audio", index })?;

        self.audio = Some(index);
        Ok(stream)
    }

    pub fn select_subtitle(&mut self, index: usize) -> Result<&SubtitleStream, TrackError> {
        let stream = self
            .analysis
            .subtitle_streams
            .iter()
            .find(|s| s.index == index)
            .ok_or(TrackError::UnknownStream { kind: "subtitle", index })?;

        if stream.is_bitmap() {
            warn!("Refusing bitmap subtitle stream {} ({})", index, stream.codec);
            return Err(TrackError::BitmapSubtitle {
                index,
                codec: stream.codec.clone(),
            });
        }

        self.subtitle = Some(index);
        Ok(stream)
    }

    pub fn disable_subtitles(&mut self) {
        self.subtitle = None;
    }

    /// Pick a text subtitle stream for the preferred language.
    ///
    /// Order: forced stream in that language, any stream in that language,
    /// then the stream flagged as default. Leaves subtitles off when none fit.
    pub fn auto_select_subtitle(&mut self, preferred_language: Option<&str>) -> Option<&SubtitleStream> {
        let candidates: Vec<&SubtitleStream> = self.analysis.text_subtitle_streams().collect();

        let by_language = preferred_language.and_then(|lang| {
            candidates
                .iter()
                .find(|s| s.forced && s.matches_language(lang))
                .or_else(|| candidates.iter().find(|s| s.matches_language(lang)))
        });

        let index = by_language
            .or_else(|| candidates.iter().find(|s| s.default))
            .map(|s| s.index)?;

        self.subtitle = Some(index);
        self.selected_subtitle()
    }
}

/// Caption document format requested from the backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SubtitleFormat {
    #[default]
    WebVtt,
    Srt,
}

/// Request URLs of the backend collaborator
#[derive(Debug, Clone)]
pub struct BackendEndpoints {
    base: Url,
}

impl BackendEndpoints {
    pub fn new(base_url: &str) -> Result<Self, TrackError> {
        Ok(Self {
            base: Url::parse(base_url)?,
        })
    }

    pub fn base(&self) -> &Url {
        &self.base
    }

    /// POST target for stream discovery; the body is [`analyze_request_body`]
    pub fn analyze_url(&self) -> Result<Url, TrackError> {
        Ok(self.base.join("/api/analyze")?)
    }

    /// Plain video proxy with Range support
    pub fn video_url(&self, media_url: &str) -> Result<Url, TrackError> {
        self.with_query("/api/video", &[("url", media_url)])
    }

    /// Video remuxed with a specific audio stream
    pub fn stream_url(&self, media_url: &str, audio_index: Option<usize>) -> Result<Url, TrackError> {
        match audio_index {
            Some(index) => self.with_query("/api/stream", &[("url", media_url), ("audio", &index.to_string())]),
            None => self.with_query("/api/stream", &[("url", media_url)]),
        }
    }

    pub fn audio_url(&self, media_url: &str, index: usize) -> Result<Url, TrackError> {
        self.with_query("/api/audio", &[("url", media_url), ("index", &index.to_string())])
    }

    pub fn subtitle_url(&self, media_url: &str, index: usize, format: SubtitleFormat) -> Result<Url, TrackError> {
        let path = match format {
            SubtitleFormat::WebVtt => "/api/subtitle",
            SubtitleFormat::Srt => "/api/subtitle/srt",
        };
        self.with_query(path, &[("url", media_url), ("index", &index.to_string())])
    }

    fn with_query(&self, path: &str, pairs: &[(&str, &str)]) -> Result<Url, TrackError> {
        let mut url = self.base.join(path)?;
        url.query_pairs_mut().extend_pairs(pairs.iter().copied());
        Ok(url)
    }
}

/// JSON body for the analyze request
pub fn analyze_request_body(media_url: &str) -> Value {
    serde_json::json!({ "url": media_url.trim() })
}
