/*!
 * Integration tests for the player session controller
 */

use anyhow::Result;
use cueplay::app_config::{Config, Theme};
use cueplay::app_controller::Controller;
use cueplay::errors::{AppError, ConfigError, DocumentError, TrackError};
use cueplay::track_selection::{MediaAnalysis, SubtitleFormat};
use cueplay::subtitle_state::CaptionUpdate;
use crate::common;

fn sample_analysis() -> MediaAnalysis {
    MediaAnalysis::from_json(common::SAMPLE_ANALYSIS).unwrap()
}

#[test]
fn test_withConfig_withInvalidConfig_shouldFail() {
    let mut config = Config::default();
    config.player.volume = -1.0;
    assert!(matches!(
        Controller::with_config(config),
        Err(AppError::Config(ConfigError::InvalidVolume(_)))
    ));
}

#[test]
fn test_applyAnalysis_withPreferredLanguage_shouldRequestSubtitle() -> Result<()> {
    let mut config = Config::default();
    config.subtitles.preferred_language = Some("en".to_string());
    let mut controller = Controller::with_config(config)?;

    let picked = controller.apply_analysis(sample_analysis());

    assert_eq!(picked, Some(5));
    assert_eq!(controller.playback.duration, 2520.0);
    assert_eq!(controller.tracks.selected_audio().map(|s| s.index), Some(2));
    Ok(())
}

#[test]
fn test_applyAnalysis_withSubtitlesOffByDefault_shouldNotPick() -> Result<()> {
    let mut config = Config::default();
    config.subtitles.enabled_by_default = false;
    config.subtitles.preferred_language = Some("en".to_string());
    let mut controller = Controller::with_config(config)?;

    assert_eq!(controller.apply_analysis(sample_analysis()), None);
    assert!(!controller.subtitles.is_enabled());
    Ok(())
}

#[test]
fn test_fullSession_shouldShowSeekAndDisable() -> Result<()> {
    let mut controller = Controller::with_config(Config::default())?;
    controller.apply_analysis(sample_analysis());
    controller.select_subtitle(6)?;

    controller.tick(2.0);
    // Document arrives after playback already started
    assert_eq!(
        controller.load_subtitle_document(6, common::SAMPLE_VTT),
        CaptionUpdate::Show("Hello world".to_string())
    );

    assert_eq!(controller.tick(4.5), CaptionUpdate::Clear);

    controller.playback.begin_drag(6.0 / 2520.0);
    assert_eq!(controller.tick(100.0), CaptionUpdate::Unchanged);
    assert_eq!(controller.finish_drag(), Some(CaptionUpdate::Show("Second line".to_string())));

    // 6s + 10s step lands after the last cue
    assert_eq!(controller.skip(1), CaptionUpdate::Clear);
    assert_eq!(controller.skip(-1), CaptionUpdate::Show("Second line".to_string()));

    assert_eq!(controller.disable_subtitles(), CaptionUpdate::Clear);
    assert!(controller.tracks.selected_subtitle().is_none());
    assert_eq!(controller.tick(6.0), CaptionUpdate::Unchanged);
    Ok(())
}

#[test]
fn test_selectSubtitle_withBitmapStream_shouldFail() -> Result<()> {
    let mut controller = Controller::with_config(Config::default())?;
    controller.apply_analysis(sample_analysis());

    assert!(matches!(controller.select_subtitle(3), Err(AppError::Track(TrackError::BitmapSubtitle { .. }))));
    Ok(())
}

#[test]
fn test_persistedConfig_shouldCarrySessionVolume() -> Result<()> {
    let mut controller = Controller::with_config(Config::default())?;
    controller.playback.set_volume(0.3);
    controller.playback.toggle_mute();

    let config = controller.persisted_config();

    assert_eq!(config.player.volume, 0.3);
    assert!(config.player.muted);
    assert!(config.validate().is_ok());
    Ok(())
}

#[test]
fn test_toggleTheme_shouldPersistSessionTheme() -> Result<()> {
    let mut controller = Controller::with_config(Config::default())?;
    assert_eq!(controller.theme(), Theme::Dark);

    assert_eq!(controller.toggle_theme(), Theme::Light);
    assert_eq!(controller.persisted_config().player.theme, Theme::Light);

    assert_eq!(controller.toggle_theme(), Theme::Dark);
    assert_eq!(controller.persisted_config().player.theme, Theme::Dark);
    Ok(())
}

#[test]
fn test_requestUrls_shouldUseConfiguredBackendAndSelection() -> Result<()> {
    let mut config = Config::default();
    config.backend.base_url = "http://media.local:8080".to_string();
    let mut controller = Controller::with_config(config)?;
    controller.apply_analysis(sample_analysis());
    let media = "http://example.com/movie.mkv";

    assert_eq!(controller.endpoints().base().as_str(), "http://media.local:8080/");
    assert!(controller.subtitle_url_for(media, SubtitleFormat::WebVtt)?.is_none());

    let stream = controller.stream_url_for(media)?;
    assert_eq!(stream.host_str(), Some("media.local"));
    assert_eq!(stream.path(), "/api/stream");
    assert!(stream.query().unwrap_or_default().contains("audio=2"));

    controller.select_subtitle(4)?;
    let subtitle = controller.subtitle_url_for(media, SubtitleFormat::Srt)?.unwrap();
    assert_eq!(subtitle.path(), "/api/subtitle/srt");
    let pairs: Vec<(String, String)> = subtitle.query_pairs().into_owned().collect();
    assert_eq!(pairs, vec![
        ("url".to_string(), media.to_string()),
        ("index".to_string(), "4".to_string()),
    ]);
    Ok(())
}

#[tokio::test]
async fn test_loadSubtitleFile_shouldInstallOrReportMissingFile() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = common::create_test_file(temp_dir.path(), "movie.en.vtt", common::SAMPLE_VTT)?;
    let mut controller = Controller::with_config(Config::default())?;
    controller.tick(6.0);

    let update = controller.load_subtitle_file(6, &path).await?;
    assert_eq!(update, CaptionUpdate::Show("Second line".to_string()));

    let missing = controller.load_subtitle_file(6, temp_dir.path().join("missing.vtt")).await;
    assert!(matches!(missing, Err(AppError::Document(DocumentError::NotFound(_)))));
    Ok(())
}
