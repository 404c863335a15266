/*!
 * # cueplay - caption cues for a custom media player
 *
 * The subtitle core of a browser-style media player: caption documents are
 * parsed into time-ranged cues and, on every playback tick, the cue active at
 * the current position is resolved for display.
 *
 * ## Features
 *
 * - Tolerant WebVTT parsing (optional hours, `.` or `,` fractions, cue
 *   settings ignored, inline markup stripped)
 * - Closed-interval active cue resolution with first-match tie-break
 * - Explicit playback, track selection and subtitle state records
 * - Decoding of the backend's stream analysis and request URL building
 * - JSON configuration for persisted player settings
 *
 * ## Architecture
 *
 * - `cue_parser`: caption document to `CueTrack`
 * - `cue_resolver`: active cue lookup
 * - `subtitle_state`: track swapping and caption display updates
 * - `player_state`: clock, seek bar dragging and volume
 * - `track_selection`: analysis results and stream choices
 * - `app_controller`: session wiring the records together
 * - `app_config`: configuration management
 * - `file_utils`: caption file access
 * - `language_utils`: ISO language code utilities
 * - `errors`: custom error types for the outer surfaces
 *
 * ## License
 *
 * This project is licensed under the MIT License
 */

#![allow(clippy::uninlined_format_args)]

pub mod app_config;
pub mod app_controller;
pub mod cue_parser;
pub mod cue_resolver;
pub mod errors;
pub mod file_utils;
pub mod language_utils;
pub mod player_state;
pub mod subtitle_state;
pub mod track_selection;

pub use app_config::Config;
pub use cue_parser::{Cue, CueTrack, parse_document, parse_timestamp};
pub use cue_resolver::{active_at, active_text_at};
pub use subtitle_state::{CaptionUpdate, SharedCueTrack, SubtitleState};
pub use player_state::PlaybackState;
pub use track_selection::{MediaAnalysis, TrackSelectionState};
pub use errors::{AppError, ConfigError, DocumentError, TrackError};
