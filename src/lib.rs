pub mod config;
pub mod error;
pub mod playback;
pub mod project;
pub mod script;
pub mod segmenter;
pub mod token;

pub use config::PrompterConfig;
pub use error::*;
pub use project::{
    export_project, load_project, load_project_file, load_project_file_with, load_project_with, save_project_file,
    SceneList,
};
pub use script::{parse_lead_in, parse_scene, parse_scene_with, SceneDefaults, SceneScript};
pub use segmenter::segment;
pub use token::{Token, TokenKind};

/// Segment a scene file's text after stripping its frontmatter.
/// This is the main entry point for tools that only need the tokens.
pub fn segment_scene(source: &str) -> Result<Vec<Token>, PrompterError> {
    let scene = parse_scene(source)?;
    Ok(segment(&scene.content))
}

/// Build the playback schedule for a scene file at its own speed.
pub fn scene_timeline(source: &str) -> Result<playback::Timeline, PrompterError> {
    let scene = parse_scene(source)?;
    let timing = playback::PlaybackTiming::default();
    let tokens = segment(&scene.content);
    Ok(playback::build_timeline(&tokens, scene.speed_percent.into(), &timing)
        .with_lead_in(scene.lead_in_seconds, &timing))
}
