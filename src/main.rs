// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use anyhow::{Result, anyhow, Context};
use log::{info, warn, debug, LevelFilter, Log, Metadata, Record, Level, SetLoggerError};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Duration;
use clap::{Parser, ValueEnum, CommandFactory, Subcommand};
use clap_complete::{generate, Shell};
use indicatif::{ProgressBar, ProgressStyle};

use cueplay::app_config::{self, Config};
use cueplay::app_controller::Controller;
use cueplay::cue_parser::{self, CueTrack};
use cueplay::cue_resolver;
use cueplay::file_utils::FileManager;
use cueplay::player_state::format_clock;
use cueplay::subtitle_state::CaptionUpdate;

/// CLI Wrapper for LogLevel to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliLogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<CliLogLevel> for app_config::LogLevel {
    fn from(cli_level: CliLogLevel) -> Self {
        match cli_level {
            CliLogLevel::Error => app_config::LogLevel::Error,
            CliLogLevel::Warn => app_config::LogLevel::Warn,
            CliLogLevel::Info => app_config::LogLevel::Info,
            CliLogLevel::Debug => app_config::LogLevel::Debug,
            CliLogLevel::Trace => app_config::LogLevel::Trace,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// List the cues of a caption file
    Cues {
        /// Caption file (WebVTT or SRT)
        #[arg(value_name = "CAPTION_FILE")]
        file: PathBuf,

        /// Print cues as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show the caption active at one or more playback times
    At {
        /// Caption file (WebVTT or SRT)
        #[arg(value_name = "CAPTION_FILE")]
        file: PathBuf,

        /// Playback times, in seconds or as [HH:]MM:SS.mmm
        #[arg(value_name = "TIME", required = true, value_parser = parse_time_arg)]
        times: Vec<f64>,
    },

    /// Re-emit a caption file as normalized WebVTT
    Dump {
        /// Caption file (WebVTT or SRT)
        #[arg(value_name = "CAPTION_FILE")]
        file: PathBuf,
    },

    /// Simulate playback and print captions as they change
    Play {
        /// Caption file (WebVTT or SRT)
        #[arg(value_name = "CAPTION_FILE")]
        file: PathBuf,

        /// Start position
        #[arg(long, default_value = "0", value_parser = parse_time_arg)]
        from: f64,

        /// Stop position (defaults to the end of the last cue)
        #[arg(long, value_parser = parse_time_arg)]
        to: Option<f64>,

        /// Playback speed multiplier
        #[arg(long, default_value_t = 1.0)]
        speed: f64,

        /// Tick interval in milliseconds (overrides the config)
        #[arg(long)]
        tick_ms: Option<u64>,
    },

    /// Generate shell completions for cueplay
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// cueplay - caption cue inspection for the media player core
///
/// Parses caption documents the way the player does and shows which caption
/// is on screen at any playback position.
#[derive(Parser, Debug)]
#[command(name = "cueplay")]
#[command(version)]
#[command(about = "Caption cue parsing and active-cue resolution")]
#[command(long_about = "cueplay parses WebVTT/SRT caption files into cues and resolves the active caption at playback times.

EXAMPLES:
    cueplay cues movie.en.vtt                   # List parsed cues
    cueplay at movie.en.vtt 12.5 01:02:03.000   # Caption at given times
    cueplay dump movie.srt > movie.vtt          # Normalize to WebVTT
    cueplay play movie.en.vtt --speed 4         # Simulated playback
    cueplay completions bash > cueplay.bash     # Generate bash completions

CONFIGURATION:
    Settings are read from cueplay.json in the working directory, or from the
    user config directory. A default file is created when none exists.")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file path
    #[arg(short, long, global = true)]
    config_path: Option<PathBuf>,

    /// Set logging level
    #[arg(short, long, value_enum, global = true)]
    log_level: Option<CliLogLevel>,
}

/// Accept plain seconds or a caption timestamp
fn parse_time_arg(value: &str) -> Result<f64, String> {
    if let Ok(seconds) = value.trim().parse::<f64>() {
        if seconds.is_finite() && seconds >= 0.0 {
            return Ok(seconds);
        }
    }
    cue_parser::try_parse_timestamp(value)
        .ok_or_else(|| format!("'{}' is not a time in seconds or [HH:]MM:SS.mmm", value))
}

// @struct: Custom logger implementation
struct CustomLogger {
    level: LevelFilter,
}

impl CustomLogger {
    // @creates: New logger with specified level
    fn new(level: LevelFilter) -> Self {
        CustomLogger { level }
    }

    // @initializes: Global logger
    fn init(level: LevelFilter) -> Result<(), SetLoggerError> {
        // The instance accepts everything; the global max level does the filtering
        log::set_boxed_logger(Box::new(CustomLogger::new(LevelFilter::Trace)))?;
        log::set_max_level(level);
        Ok(())
    }

    // @returns: ANSI color for log level
    fn color_for_level(level: Level) -> &'static str {
        match level {
            Level::Error => "1;31",
            Level::Warn => "1;33",
            Level::Info => "1;32",
            Level::Debug => "1;36",
            Level::Trace => "1;35",
        }
    }
}

impl Log for CustomLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let now = chrono::Local::now().format("%H:%M:%S.%3f");
            let _ = writeln!(
                std::io::stderr(),
                "\x1B[{}m{} {:<5} {}\x1B[0m",
                Self::color_for_level(record.level()),
                now,
                record.level(),
                record.args()
            );
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Info until the config has been read
    CustomLogger::init(LevelFilter::Info)?;

    let cli = CommandLineOptions::parse();

    if let Commands::Completions { shell } = cli.command {
        let mut cmd = CommandLineOptions::command();
        generate(shell, &mut cmd, "cueplay", &mut std::io::stdout());
        return Ok(());
    }

    let config = load_config(&cli)?;

    match cli.command {
        Commands::Cues { file, json } => run_cues(&file, json).await,
        Commands::At { file, times } => run_at(&file, &times).await,
        Commands::Dump { file } => run_dump(&file).await,
        Commands::Play { file, from, to, speed, tick_ms } => {
            let tick_ms = tick_ms.unwrap_or(config.subtitles.tick_interval_ms);
            run_play(config, &file, from, to, speed, tick_ms).await
        }
        Commands::Completions { .. } => Ok(()),
    }
}

fn load_config(cli: &CommandLineOptions) -> Result<Config> {
    if let Some(cmd_log_level) = &cli.log_level {
        let level: app_config::LogLevel = cmd_log_level.clone().into();
        log::set_max_level(level.into());
    }

    let config_path = cli.config_path.clone().unwrap_or_else(Config::default_path);
    let mut config = Config::load_or_create(&config_path)
        .with_context(|| format!("Failed to load config file: {}", config_path.display()))?;

    if let Some(log_level) = &cli.log_level {
        config.log_level = log_level.clone().into();
    } else {
        log::set_max_level(config.log_level.into());
    }

    config.validate().context("Configuration validation failed")?;
    debug!("Using config from {}", config_path.display());
    Ok(config)
}

async fn read_track(file: &Path) -> Result<CueTrack> {
    if !FileManager::is_caption_file(file) {
        warn!("{} does not have a caption extension, parsing anyway", file.display());
    }

    let document = FileManager::read_document(file)
        .await
        .with_context(|| format!("Failed to load captions from {}", file.display()))?;
    let track = cue_parser::parse_document(&document);
    info!("Parsed {} cues from {}", track.len(), file.display());
    Ok(track)
}

async fn run_cues(file: &Path, json: bool) -> Result<()> {
    let track = read_track(file).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&track)?);
        return Ok(());
    }

    for (i, cue) in track.iter().enumerate() {
        println!(
            "{:>4}  {} --> {}  {}",
            i + 1,
            cue_parser::format_timestamp(cue.start()),
            cue_parser::format_timestamp(cue.end()),
            cue.text().replace('\n', " | ")
        );
    }
    Ok(())
}

async fn run_at(file: &Path, times: &[f64]) -> Result<()> {
    let track = read_track(file).await?;

    for &time in times {
        match cue_resolver::active_text_at(&track, time) {
            Some(text) => println!("{}  {}", cue_parser::format_timestamp(time), text.replace('\n', " | ")),
            None => println!("{}  (no caption)", cue_parser::format_timestamp(time)),
        }
    }
    Ok(())
}

async fn run_dump(file: &Path) -> Result<()> {
    let track = read_track(file).await?;
    print!("{}", track.to_vtt());
    Ok(())
}

async fn run_play(config: Config, file: &Path, from: f64, to: Option<f64>, speed: f64, tick_ms: u64) -> Result<()> {
    if !(speed.is_finite() && speed > 0.0) {
        return Err(anyhow!("Speed must be a positive number, got {}", speed));
    }
    if tick_ms == 0 {
        return Err(anyhow!("Tick interval must be at least 1ms"));
    }

    let mut controller = Controller::with_config(config)?;
    controller
        .load_subtitle_file(0, file)
        .await
        .with_context(|| format!("Failed to load captions from {}", file.display()))?;
    info!("Playing {} cues from {}", controller.subtitles.track().len(), file.display());

    let end = to.unwrap_or_else(|| controller.subtitles.track().duration());
    if end <= from {
        warn!("Nothing to play between {} and {}", format_clock(from), format_clock(end));
        return Ok(());
    }
    controller.playback.set_duration(end);
    controller.playback.paused = false;

    let progress_bar = ProgressBar::new((end * 1000.0) as u64);
    progress_bar.set_style(
        ProgressStyle::default_bar()
            .template("{bar:40.cyan/blue} {prefix} {wide_msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("=> "),
    );

    let step = tick_ms as f64 / 1000.0 * speed;
    let mut interval = tokio::time::interval(Duration::from_millis(tick_ms));
    let mut time = from;

    loop {
        interval.tick().await;

        match controller.tick(time) {
            CaptionUpdate::Show(text) => {
                let line = text.replace('\n', " | ");
                progress_bar.println(format!("{}  {}", cue_parser::format_timestamp(time), line));
                progress_bar.set_message(line);
            }
            CaptionUpdate::Clear => progress_bar.set_message(""),
            CaptionUpdate::Unchanged => {}
        }
        progress_bar.set_prefix(format!("{} / {}", format_clock(time), format_clock(end)));
        progress_bar.set_position((time * 1000.0) as u64);

        if time >= end {
            break;
        }
        time = (time + step).min(end);
    }

    progress_bar.finish_and_clear();
    info!("Playback finished at {}", format_clock(end));
    Ok(())
}
