use std::fmt;
use std::fmt::Write as _;
use regex::Regex;
use once_cell::sync::Lazy;
use log::debug;
use serde::Serialize;

// @module: Caption document parsing into time-ranged cues

/// Separator between the start and end timestamps of a timing line
pub const TIMING_ARROW: &str = "-->";

// @const: Inline markup tag regex (<i>, </b>, <v Speaker>, <00:01.000>, ...)
static MARKUP_TAG_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"<[^>]*>").unwrap()
});

// @struct: Single time-ranged caption
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Cue {
    // @field: Start in seconds from track origin
    start: f64,

    // @field: End in seconds from track origin
    end: f64,

    // @field: Plain display text, markup stripped
    text: String,
}

impl Cue {
    /// Creates a cue without validation - used by tests and callers building tracks by hand
    pub fn new(start: f64, end: f64, text: impl Into<String>) -> Self {
        Cue {
            start,
            end,
            text: text.into(),
        }
    }

    // @creates: Validated cue
    // @validates: Non-negative start, end >= start, non-empty text
    pub fn new_validated(start: f64, end: f64, text: &str) -> Option<Self> {
        if !start.is_finite() || !end.is_finite() || start < 0.0 || end < start {
            return None;
        }

        let trimmed_text = text.trim();
        if trimmed_text.is_empty() {
            return None;
        }

        Some(Cue::new(start, end, trimmed_text))
    }

    pub fn start(&self) -> f64 {
        self.start
    }

    pub fn end(&self) -> f64 {
        self.end
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Length of the cue in seconds
    pub fn duration(&self) -> f64 {
        self.end - self.start
    }

    /// Closed-interval containment: both boundaries count as active
    pub fn contains(&self, time: f64) -> bool {
        self.start <= time && time <= self.end
    }
}

impl fmt::Display for Cue {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "{} {} {}", format_timestamp(self.start), TIMING_ARROW, format_timestamp(self.end))?;
        writeln!(f, "{}", self.text)
    }
}

/// Ordered cues parsed from one caption document, in document order
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CueTrack {
    cues: Vec<Cue>,
}

impl CueTrack {
    /// Track with no cues, installed when subtitles are disabled
    pub fn empty() -> Self {
        Self::default()
    }

    /// Wrap cues as-is. Order is kept and nothing is validated, so callers
    /// can model unsorted or overlapping tracks.
    pub fn from_cues(cues: Vec<Cue>) -> Self {
        CueTrack { cues }
    }

    pub fn cues(&self) -> &[Cue] {
        &self.cues
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Cue> {
        self.cues.iter()
    }

    pub fn len(&self) -> usize {
        self.cues.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cues.is_empty()
    }

    /// Latest end time in the track, 0.0 when empty
    pub fn duration(&self) -> f64 {
        self.cues.iter().map(Cue::end).fold(0.0, f64::max)
    }

    /// Serialize back to a WebVTT document
    pub fn to_vtt(&self) -> String {
        let mut document = String::from("WEBVTT\n\n");
        for cue in &self.cues {
            let _ = writeln!(document, "{}", cue);
        }
        document
    }
}

impl<'a> IntoIterator for &'a CueTrack {
    type Item = &'a Cue;
    type IntoIter = std::slice::Iter<'a, Cue>;

    fn into_iter(self) -> Self::IntoIter {
        self.cues.iter()
    }
}

/// Parse a caption document into a cue track.
///
/// Everything before the first timing line is treated as header and skipped.
/// Each timing line opens a cue whose text runs until the next blank line.
/// Malformed timestamps fall back to 0.0, and cues that end up with empty
/// text or with `end < start` are dropped. This never fails: garbage input
/// produces an empty track.
pub fn parse_document(document: &str) -> CueTrack {
    let document = document.strip_prefix('\u{feff}').unwrap_or(document);

    let mut cues = Vec::new();
    let mut dropped = 0usize;
    let mut lines = document
        .lines()
        .skip_while(|line| !line.contains(TIMING_ARROW))
        .peekable();

    while let Some(line) = lines.next() {
        // Cue identifiers, SRT sequence numbers and NOTE blocks land here
        let Some((left, right)) = line.split_once(TIMING_ARROW) else {
            continue;
        };

        let start = parse_timestamp(left.trim());
        // Cue settings follow the end timestamp after whitespace
        let end = parse_timestamp(right.split_whitespace().next().unwrap_or(""));

        let mut raw_lines = Vec::new();
        while let Some(text_line) = lines.next_if(|l| !l.trim().is_empty()) {
            raw_lines.push(text_line.trim_end());
        }

        let text = strip_markup(&raw_lines.join("\n"));
        match Cue::new_validated(start, end, &text) {
            Some(cue) => cues.push(cue),
            None => {
                dropped += 1;
                debug!("Dropping cue at '{}': empty text or end before start", line.trim());
            }
        }
    }

    if dropped > 0 {
        debug!("Parsed {} cues, dropped {}", cues.len(), dropped);
    }

    CueTrack { cues }
}

/// Remove every `<...>` tag, leaving plain text
pub fn strip_markup(text: &str) -> String {
    MARKUP_TAG_REGEX.replace_all(text, "").trim().to_string()
}

/// Parse `[HH:]MM:SS[.mmm]` into seconds, accepting `,` as the fraction
/// separator. Returns `None` for any other shape, for non-numeric or
/// negative components, and for non-finite results.
pub fn try_parse_timestamp(token: &str) -> Option<f64> {
    let normalized = token.trim().replace(',', ".");
    let parts = normalized
        .split(':')
        .map(parse_component)
        .collect::<Option<Vec<f64>>>()?;

    let seconds = match parts.as_slice() {
        [hours, minutes, seconds] => hours * 3600.0 + minutes * 60.0 + seconds,
        [minutes, seconds] => minutes * 60.0 + seconds,
        _ => return None,
    };

    seconds.is_finite().then_some(seconds)
}

/// Lenient timestamp parsing used for timing lines: malformed tokens map to 0.0
pub fn parse_timestamp(token: &str) -> f64 {
    try_parse_timestamp(token).unwrap_or_else(|| {
        debug!("Malformed timestamp '{}', falling back to 0.0", token);
        0.0
    })
}

fn parse_component(part: &str) -> Option<f64> {
    let value: f64 = part.parse().ok()?;
    (value.is_finite() && value >= 0.0).then_some(value)
}

/// Format seconds as `HH:MM:SS.mmm`
pub fn format_timestamp(seconds: f64) -> String {
    let total_ms = (seconds.max(0.0) * 1000.0).round() as u64;
    let hours = total_ms / 3_600_000;
    let minutes = (total_ms % 3_600_000) / 60_000;
    let secs = (total_ms % 60_000) / 1_000;
    let millis = total_ms % 1_000;

    format!("{:02}:{:02}:{:02}.{:03}", hours, minutes, secs, millis)
}
