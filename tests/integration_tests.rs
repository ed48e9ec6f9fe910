//! Integration tests for the prompter
//!
//! Tests the full pipeline from scene sources and projects to playback.

use prompter::playback::{
    build_timeline, run_session, CompletionAction, DisplayState, ManualTimer, PlaybackSession,
    PlaybackTiming, SurfaceUpdate, Teleprompter,
};
use prompter::{
    load_project, load_project_file, parse_scene, save_project_file, scene_timeline, segment_scene,
    PrompterConfig, PrompterError, SceneList, TokenKind,
};
use std::time::Duration;

const OPENING: &str = r#"---
title: Opening
speed: 100
lead-in: 2s
---
(Calm) Good evening everyone. [Look at camera] Welcome back.
"#;

#[test]
fn test_scene_file_to_tokens() {
    let tokens = segment_scene(OPENING).unwrap();
    let kinds: Vec<TokenKind> = tokens.iter().map(|t| t.kind).collect();
    assert_eq!(
        kinds,
        vec![TokenKind::Emotion, TokenKind::PlainText, TokenKind::Note, TokenKind::PlainText]
    );
    assert_eq!(tokens[1].text, "Good evening everyone.");
    assert_eq!(tokens[3].text, "Welcome back.");
}

#[test]
fn test_scene_file_plays_to_completion() {
    let scene = parse_scene(OPENING).unwrap();
    let mut session = PlaybackSession::new(scene);
    let mut display = DisplayState::default();
    let mut timer = ManualTimer::new();
    let mut completions = Vec::new();

    let outcome = run_session(&mut session, &mut display, &mut timer, |title| {
        completions.push(title.to_string());
        CompletionAction::Advance
    });

    assert!(!outcome.is_cancelled());
    assert_eq!(completions, vec!["Opening".to_string()]);
    // lead-in 2000 + cues 600 + 3 words at 200 + 2 words at 200 + completion 1000
    assert_eq!(timer.elapsed(), Duration::from_millis(2000 + 600 + 600 + 400 + 1000));

    assert_eq!(display.current_text, "Welcome back.");
    assert_eq!(display.emotion.text, "Calm");
    assert_eq!(display.note.text, "Look at camera");
    assert_eq!(display.countdown, None);
}

#[test]
fn test_timeline_matches_playback() {
    let timeline = scene_timeline(OPENING).unwrap();

    let scene = parse_scene(OPENING).unwrap();
    let mut updates: Vec<SurfaceUpdate> = Vec::new();
    let mut timer = ManualTimer::new();
    let mut session = PlaybackSession::new(scene);
    run_session(&mut session, &mut updates, &mut timer, |_| CompletionAction::Advance);

    assert_eq!(
        timer.elapsed(),
        Duration::from_millis(timeline.lead_in_ms + timeline.total_ms)
    );
}

#[test]
fn test_project_round_trip_through_file() {
    let json = r#"[
  { "id": 1, "titulo": "One", "contenido": "First (Joy) line", "velocidad": 80, "tiempo": "00:03" },
  { "id": 2, "titulo": "Two", "contenido": "Second [Wave] line", "velocidad": 20, "tiempo": "00:00" }
]"#;
    let mut scenes = load_project(json).unwrap();
    scenes.duplicate(1).unwrap();

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("show.json");
    save_project_file(&path, scenes.as_slice()).unwrap();

    let loaded = load_project_file(&path).unwrap();
    assert_eq!(loaded, scenes);
    let titles: Vec<&str> = loaded.iter().map(|s| s.title.as_str()).collect();
    assert_eq!(titles, vec!["One", "Two", "Two (copy)"]);
    assert_eq!(loaded.get(0).unwrap().lead_in_seconds, 3);
}

#[test]
fn test_project_auto_advance() {
    let json = r#"[
  { "titulo": "A", "contenido": "alpha" },
  { "titulo": "B", "contenido": "beta" },
  { "titulo": "C", "contenido": "gamma" }
]"#;
    let scenes = load_project(json).unwrap();
    let mut played = Vec::new();

    let mut index = Some(0);
    while let Some(current) = index {
        let scene = scenes.get(current).unwrap().clone();
        let mut session = PlaybackSession::new(scene);
        let mut display = DisplayState::default();
        let mut timer = ManualTimer::new();
        let outcome = run_session(&mut session, &mut display, &mut timer, |_| CompletionAction::Advance);
        played.push(outcome.title().to_string());
        index = scenes.next_index(current);
    }

    assert_eq!(played, vec!["A", "B", "C"]);
}

#[test]
fn test_config_drives_timing() {
    let config = PrompterConfig::from_yaml("timing:\n  completion-delay-ms: 0\n  cue-ms: 50\n").unwrap();
    let tokens = prompter::segment("Go (Now)");
    let timeline = build_timeline(&tokens, 100, &config.timing);
    assert_eq!(timeline.total_ms, 200 + 50);
}

#[test]
fn test_teleprompter_plays_project_scene() {
    let scenes = SceneList::from(vec![parse_scene("---\ntitle: Quick\n---\nHi (Wink)").unwrap()]);
    let timing = PlaybackTiming {
        max_base_ms: 2,
        min_base_ms: 1,
        cue_ms: 1,
        completion_delay_ms: 1,
        countdown_tick_ms: 1,
        ..PlaybackTiming::default()
    };

    let mut prompter = Teleprompter::new(DisplayState::default()).with_timing(timing);
    prompter
        .start(scenes.get(0).unwrap().clone(), |_| CompletionAction::Advance)
        .unwrap();
    let outcome = prompter.wait().unwrap();

    assert_eq!(outcome.title(), "Quick");
    assert_eq!(prompter.surfaces().current_text, "Hi");
    assert!(prompter.surfaces().emotion.visible);
}

#[test]
fn test_bad_sources_report_errors() {
    assert!(matches!(
        parse_scene("---\nlead-in: later\n---\nHello"),
        Err(PrompterError::MetadataError(_))
    ));
    assert!(matches!(load_project("{}"), Err(PrompterError::ProjectError(_))));

    let scenes = load_project("[{}]").unwrap();
    assert!(matches!(scenes.get(3), Err(PrompterError::SceneError { index: 3, .. })));
}
