/*!
 * Error types for the cueplay application.
 *
 * The cue parser and resolver never fail: malformed caption input degrades
 * to fallback values or dropped cues. The types here cover the outer
 * surfaces (configuration, backend analyze responses, caption files),
 * using the thiserror crate for ergonomic error definitions.
 */

use thiserror::Error;

/// Errors raised while loading or validating the configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Volume outside the 0.0..=1.0 range
    #[error("Volume must be between 0.0 and 1.0, got {0}")]
    InvalidVolume(f64),

    /// Seek step is zero, negative or not a number
    #[error("Seek step must be a positive number of seconds, got {0}")]
    InvalidSeekStep(f64),

    /// Tick interval of zero would spin the playback loop
    #[error("Tick interval must be at least 1ms")]
    InvalidTickInterval,

    /// Preferred subtitle language is not an ISO 639 code
    #[error("Invalid preferred subtitle language: {0}")]
    InvalidLanguage(String),

    /// Backend base URL cannot be parsed
    #[error("Invalid backend URL '{url}': {reason}")]
    InvalidBackendUrl {
        /// The rejected URL
        url: String,
        /// Parser message
        reason: String,
    },

    /// Configuration file could not be read or written
    #[error("Configuration I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration file is not valid JSON for the expected schema
    #[error("Configuration parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Errors raised by track discovery and selection
#[derive(Error, Debug)]
pub enum TrackError {
    /// The backend answered with an error payload
    #[error("Backend reported an error: {0}")]
    Backend(String),

    /// The analyze response could not be decoded
    #[error("Failed to decode analyze response: {0}")]
    Decode(#[from] serde_json::Error),

    /// No stream with this index exists in the analysis
    #[error("No {kind} stream with index {index}")]
    UnknownStream {
        /// "audio" or "subtitle"
        kind: &'static str,
        /// Requested stream index
        index: usize,
    },

    /// Image-based subtitle streams cannot be converted to caption text
    #[error("Subtitle stream {index} uses bitmap codec {codec} and cannot be rendered as text")]
    BitmapSubtitle {
        /// Stream index
        index: usize,
        /// Codec name reported by the backend
        codec: String,
    },

    /// Building a backend request URL failed
    #[error("Failed to build backend URL: {0}")]
    Url(#[from] url::ParseError),
}

/// Errors raised while reading caption documents from disk
#[derive(Error, Debug)]
pub enum DocumentError {
    /// File does not exist or is not a regular file
    #[error("Caption file not found: {0}")]
    NotFound(String),

    /// Reading the file failed
    #[error("Failed to read caption file: {0}")]
    Io(#[from] std::io::Error),
}

/// Error type of the player session, wrapping the per-area errors
#[derive(Error, Debug)]
pub enum AppError {
    /// Error from configuration handling
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    /// Error from track selection
    #[error("Track error: {0}")]
    Track(#[from] TrackError),

    /// Error from caption file access
    #[error("Document error: {0}")]
    Document(#[from] DocumentError),
}
