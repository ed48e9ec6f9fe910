//! # Scene Scripts
//!
//! A [`SceneScript`] is everything playback needs for one scene: its title, the
//! text to read, the speed and the lead-in countdown.
//!
//! Scene files are plain text with an optional YAML frontmatter block:
//!
//! ```text
//! ---
//! title: Opening
//! speed: 60
//! lead-in: 5s
//! ---
//! (Calm) Good evening. [Look at camera] Welcome back.
//! ```
//!
//! Missing header values fall back to [`SceneDefaults`]. Speeds outside
//! `1..=100` are clamped rather than rejected.

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::PrompterError;
use crate::playback::clamp_speed;

pub const DEFAULT_TITLE: &str = "Untitled scene";
pub const DEFAULT_SPEED: u8 = 50;

/// The playback input for one scene
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SceneScript {
    pub title: String,
    pub content: String,
    /// 1 (slowest) to 100 (fastest)
    pub speed_percent: u8,
    pub lead_in_seconds: u32,
}

impl SceneScript {
    pub fn new(title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            content: content.into(),
            speed_percent: DEFAULT_SPEED,
            lead_in_seconds: 0,
        }
    }

    pub fn with_speed(mut self, speed: i64) -> Self {
        self.speed_percent = clamp_speed(speed);
        self
    }

    pub fn with_lead_in(mut self, seconds: u32) -> Self {
        self.lead_in_seconds = seconds;
        self
    }
}

/// Values used when a scene does not specify them
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct SceneDefaults {
    pub title: String,
    pub speed: u8,
    pub lead_in_seconds: u32,
}

impl Default for SceneDefaults {
    fn default() -> Self {
        Self {
            title: DEFAULT_TITLE.to_string(),
            speed: DEFAULT_SPEED,
            lead_in_seconds: 0,
        }
    }
}

/// Lead-in as written in YAML: either a bare number or a string like `5s`
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawLeadIn {
    Seconds(u32),
    Text(String),
}

/// Raw frontmatter fields, validated into a [`SceneScript`]
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
struct RawSceneHeader {
    title: Option<String>,
    speed: Option<i64>,
    lead_in: Option<RawLeadIn>,
}

/// Parse a lead-in value.
///
/// Accepts `"5s"`, `"5"` and `"mm:ss"`; surrounding whitespace is ignored and an
/// empty string means no lead-in.
///
/// # Example
/// ```rust
/// use prompter::parse_lead_in;
///
/// assert_eq!(parse_lead_in("5s").unwrap(), 5);
/// assert_eq!(parse_lead_in("01:30").unwrap(), 90);
/// assert!(parse_lead_in("soon").is_err());
/// ```
pub fn parse_lead_in(s: &str) -> Result<u32, PrompterError> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        return Ok(0);
    }

    let invalid = || PrompterError::MetadataError(format!("Invalid lead-in: {}", s));

    if let Some((minutes, seconds)) = trimmed.split_once(':') {
        let minutes: u32 = minutes.trim().parse().map_err(|_| invalid())?;
        let seconds: u32 = seconds.trim().parse().map_err(|_| invalid())?;
        if seconds >= 60 {
            return Err(invalid());
        }
        return minutes
            .checked_mul(60)
            .and_then(|m| m.checked_add(seconds))
            .ok_or_else(invalid);
    }

    let digits = trimmed.strip_suffix('s').unwrap_or(trimmed).trim_end();
    digits.parse().map_err(|_| invalid())
}

/// Split a `---` delimited header from the top of a scene source.
///
/// Returns (header_content, body). Without a complete header block the whole
/// source is the body.
pub(crate) fn extract_header(source: &str) -> (Option<String>, String) {
    let lines: Vec<&str> = source.lines().collect();

    let start = match lines.iter().position(|line| !line.trim().is_empty()) {
        Some(idx) if lines[idx].trim() == "---" => idx,
        _ => return (None, source.to_string()),
    };

    match lines[start + 1..].iter().position(|line| line.trim() == "---") {
        Some(offset) => {
            let end = start + 1 + offset;
            let header = lines[start + 1..end].join("\n");
            let body = lines[end + 1..].join("\n");
            (Some(header), body)
        }
        None => (None, source.to_string()),
    }
}

/// Parse a scene source using the built-in defaults.
///
/// # Example
/// ```rust
/// use prompter::parse_scene;
///
/// let scene = parse_scene("---\ntitle: Intro\nspeed: 80\n---\nHello (Joy) there").unwrap();
/// assert_eq!(scene.title, "Intro");
/// assert_eq!(scene.speed_percent, 80);
/// assert_eq!(scene.content, "Hello (Joy) there");
/// ```
pub fn parse_scene(source: &str) -> Result<SceneScript, PrompterError> {
    parse_scene_with(source, &SceneDefaults::default())
}

pub fn parse_scene_with(source: &str, defaults: &SceneDefaults) -> Result<SceneScript, PrompterError> {
    let (header, body) = extract_header(source);

    let raw = match header {
        Some(content) if !content.trim().is_empty() => serde_yaml::from_str::<RawSceneHeader>(&content)
            .map_err(|e| PrompterError::MetadataError(e.to_string()))?,
        _ => RawSceneHeader::default(),
    };

    let lead_in_seconds = match raw.lead_in {
        Some(RawLeadIn::Seconds(seconds)) => seconds,
        Some(RawLeadIn::Text(text)) => parse_lead_in(&text)?,
        None => defaults.lead_in_seconds,
    };

    let speed = raw.speed.unwrap_or(i64::from(defaults.speed));
    if !(1..=100).contains(&speed) {
        warn!(speed, "scene speed out of range, clamping");
    }

    Ok(SceneScript {
        title: raw.title.unwrap_or_else(|| defaults.title.clone()),
        content: body.trim().to_string(),
        speed_percent: clamp_speed(speed),
        lead_in_seconds,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scene_without_header() {
        let scene = parse_scene("Just read this.").unwrap();
        assert_eq!(scene.title, DEFAULT_TITLE);
        assert_eq!(scene.content, "Just read this.");
        assert_eq!(scene.speed_percent, DEFAULT_SPEED);
        assert_eq!(scene.lead_in_seconds, 0);
    }

    #[test]
    fn test_scene_with_header() {
        let source = r#"---
title: Opening
speed: 60
lead-in: 5s
---
(Calm) Good evening."#;
        let scene = parse_scene(source).unwrap();
        assert_eq!(scene.title, "Opening");
        assert_eq!(scene.speed_percent, 60);
        assert_eq!(scene.lead_in_seconds, 5);
        assert_eq!(scene.content, "(Calm) Good evening.");
    }

    #[test]
    fn test_numeric_lead_in() {
        let scene = parse_scene("---\nlead-in: 3\n---\nx").unwrap();
        assert_eq!(scene.lead_in_seconds, 3);
    }

    #[test]
    fn test_speed_is_clamped() {
        let scene = parse_scene("---\nspeed: 250\n---\nx").unwrap();
        assert_eq!(scene.speed_percent, 100);
        let scene = parse_scene("---\nspeed: -4\n---\nx").unwrap();
        assert_eq!(scene.speed_percent, 1);
    }

    #[test]
    fn test_invalid_yaml() {
        let result = parse_scene("---\ntitle: [unclosed\n---\nx");
        assert!(matches!(result, Err(PrompterError::MetadataError(_))));
    }

    #[test]
    fn test_invalid_lead_in() {
        let result = parse_scene("---\nlead-in: soon\n---\nx");
        match result {
            Err(PrompterError::MetadataError(message)) => assert!(message.contains("soon")),
            other => panic!("Expected MetadataError, got {:?}", other),
        }
    }

    #[test]
    fn test_unterminated_header_is_content() {
        let scene = parse_scene("---\ntitle: Nope\nHello").unwrap();
        assert_eq!(scene.title, DEFAULT_TITLE);
        assert!(scene.content.starts_with("---"));
    }

    #[test]
    fn test_separator_inside_body_is_kept() {
        let scene = parse_scene("Intro\n---\nmiddle\n---\nend").unwrap();
        assert_eq!(scene.content, "Intro\n---\nmiddle\n---\nend");
    }

    #[test]
    fn test_custom_defaults() {
        let defaults = SceneDefaults {
            title: "Scene".to_string(),
            speed: 75,
            lead_in_seconds: 2,
        };
        let scene = parse_scene_with("Hi", &defaults).unwrap();
        assert_eq!(scene.title, "Scene");
        assert_eq!(scene.speed_percent, 75);
        assert_eq!(scene.lead_in_seconds, 2);
    }

    #[test]
    fn test_parse_lead_in_forms() {
        assert_eq!(parse_lead_in("").unwrap(), 0);
        assert_eq!(parse_lead_in("00:00").unwrap(), 0);
        assert_eq!(parse_lead_in(" 7 ").unwrap(), 7);
        assert_eq!(parse_lead_in("10s").unwrap(), 10);
        assert_eq!(parse_lead_in("2:05").unwrap(), 125);
        assert!(parse_lead_in("1:75").is_err());
        assert!(parse_lead_in("-3s").is_err());
        assert!(parse_lead_in("s").is_err());
    }
}
