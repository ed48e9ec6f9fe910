//! # Scene Projects
//!
//! A project is an ordered list of scenes, saved as a JSON array:
//!
//! ```json
//! [
//!   { "id": 1, "titulo": "Opening", "contenido": "(Calm) Good evening.", "velocidad": 60, "tiempo": "00:05" }
//! ]
//! ```
//!
//! Loading is lenient the way the editor always was: missing titles become
//! `Scene N`, missing content is empty, missing speed is 50 and unreadable
//! lead-ins count as zero. Numbers may be saved as strings or floats, and a
//! field holding some other kind of value falls back to its default. Only a document that is not an array of objects is
//! rejected. English keys (`title`, `content`, `speed`, `lead_in`) are accepted
//! as aliases.
//!
//! [`SceneList`] holds the scenes in memory and provides the editing operations
//! (add, duplicate, remove) as plain data changes.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::PrompterError;
use crate::playback::clamp_speed;
use crate::script::{parse_lead_in, SceneDefaults, SceneScript};

/// Duplicating stops at this many scenes
pub const MAX_SCENES: usize = 10;

pub const NEW_SCENE_TITLE: &str = "New scene";
pub const NEW_SCENE_CONTENT: &str = "New scene. Edit this text.";
pub const PLACEHOLDER_TITLE: &str = "Empty scene";
pub const PLACEHOLDER_CONTENT: &str = "Empty content";

/// A field value as it may appear in a hand-edited project
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Lenient {
    Number(i64),
    Float(f64),
    Text(String),
    Other(serde_json::Value),
}

impl Lenient {
    /// Text fields: strings as they are, numbers as written, anything else dropped.
    fn into_text(self, field: &str, number: usize) -> Option<String> {
        match self {
            Lenient::Text(text) => Some(text),
            Lenient::Number(n) => Some(n.to_string()),
            Lenient::Float(n) => Some(n.to_string()),
            Lenient::Other(value) => {
                warn!(scene = number, field, value = %value, "ignoring unreadable field");
                None
            }
        }
    }
}

#[derive(Debug, Deserialize)]
struct RawScene {
    #[serde(alias = "title")]
    titulo: Option<Lenient>,
    #[serde(alias = "content")]
    contenido: Option<Lenient>,
    #[serde(alias = "speed")]
    velocidad: Option<Lenient>,
    #[serde(alias = "lead_in")]
    tiempo: Option<Lenient>,
}

#[derive(Debug, Serialize)]
struct SavedScene<'a> {
    id: usize,
    titulo: &'a str,
    contenido: &'a str,
    velocidad: u8,
    tiempo: String,
}

impl RawScene {
    fn into_script(self, index: usize, defaults: &SceneDefaults) -> SceneScript {
        let number = index + 1;

        let title = match self.titulo.and_then(|v| v.into_text("titulo", number)) {
            Some(title) if !title.trim().is_empty() => title,
            _ => {
                warn!(scene = number, "scene has no title");
                format!("Scene {}", number)
            }
        };

        let content = self
            .contenido
            .and_then(|v| v.into_text("contenido", number))
            .unwrap_or_else(|| {
                warn!(scene = number, "scene has no content");
                String::new()
            });

        let default_speed = i64::from(defaults.speed);
        let speed = match self.velocidad {
            Some(Lenient::Number(n)) => n,
            Some(Lenient::Float(n)) if n.is_finite() => n.round() as i64,
            Some(Lenient::Text(text)) => text.trim().parse().unwrap_or_else(|_| {
                warn!(scene = number, speed = %text, "unreadable speed, using default");
                default_speed
            }),
            Some(Lenient::Float(_)) | Some(Lenient::Other(_)) => {
                warn!(scene = number, "unreadable speed, using default");
                default_speed
            }
            None => default_speed,
        };

        let lead_in_seconds = match self.tiempo {
            Some(Lenient::Number(n)) => u32::try_from(n.max(0)).unwrap_or(u32::MAX),
            Some(Lenient::Float(n)) if n.is_finite() => n.round().clamp(0.0, f64::from(u32::MAX)) as u32,
            Some(Lenient::Text(text)) => parse_lead_in(&text).unwrap_or_else(|e| {
                warn!(scene = number, error = %e, "unreadable lead-in, using none");
                0
            }),
            Some(Lenient::Float(_)) | Some(Lenient::Other(_)) => {
                warn!(scene = number, "unreadable lead-in, using none");
                0
            }
            None => defaults.lead_in_seconds,
        };

        SceneScript {
            title,
            content: content.trim().to_string(),
            speed_percent: clamp_speed(speed),
            lead_in_seconds,
        }
    }
}

/// Format a lead-in the way projects store it (`mm:ss`).
pub fn format_lead_in(seconds: u32) -> String {
    format!("{:02}:{:02}", seconds / 60, seconds % 60)
}

/// Parse a project document.
///
/// # Example
/// ```rust
/// use prompter::load_project;
///
/// let json = r#"[{"id": 1, "titulo": "Intro", "contenido": "Hello (Joy)", "velocidad": 80, "tiempo": "5s"}]"#;
/// let scenes = load_project(json).unwrap();
/// assert_eq!(scenes.len(), 1);
/// assert_eq!(scenes.get(0).unwrap().lead_in_seconds, 5);
/// ```
pub fn load_project(json: &str) -> Result<SceneList, PrompterError> {
    load_project_with(json, &SceneDefaults::default())
}

/// Parse a project document, filling missing speeds and lead-ins from `defaults`.
pub fn load_project_with(json: &str, defaults: &SceneDefaults) -> Result<SceneList, PrompterError> {
    if json.trim().is_empty() {
        return Err(PrompterError::ProjectError("document is empty".to_string()));
    }

    let document: serde_json::Value =
        serde_json::from_str(json).map_err(|e| PrompterError::ProjectError(e.to_string()))?;

    let items = match document {
        serde_json::Value::Array(items) => items,
        _ => return Err(PrompterError::ProjectError("expected an array of scenes".to_string())),
    };

    let scenes = items
        .into_iter()
        .enumerate()
        .map(|(index, item)| {
            serde_json::from_value::<RawScene>(item)
                .map(|raw| raw.into_script(index, defaults))
                .map_err(|e| PrompterError::ProjectError(format!("scene {}: {}", index + 1, e)))
        })
        .collect::<Result<Vec<_>, _>>()?;

    info!(scenes = scenes.len(), "loaded project");
    Ok(SceneList::from(scenes))
}

pub fn load_project_file(path: &Path) -> Result<SceneList, PrompterError> {
    load_project_file_with(path, &SceneDefaults::default())
}

pub fn load_project_file_with(path: &Path, defaults: &SceneDefaults) -> Result<SceneList, PrompterError> {
    let json = fs::read_to_string(path).map_err(|source| PrompterError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    load_project_with(&json, defaults)
}

/// Serialize scenes as a pretty-printed project document with 1-based ids.
///
/// An empty list is saved as a single placeholder scene so the file always
/// loads back into something playable.
pub fn export_project(scenes: &[SceneScript]) -> Result<String, PrompterError> {
    let placeholder;
    let scenes = if scenes.is_empty() {
        warn!("no scenes to export, writing a placeholder");
        placeholder = [SceneScript::new(PLACEHOLDER_TITLE, PLACEHOLDER_CONTENT)];
        &placeholder[..]
    } else {
        scenes
    };

    let saved: Vec<SavedScene<'_>> = scenes
        .iter()
        .enumerate()
        .map(|(index, scene)| SavedScene {
            id: index + 1,
            titulo: &scene.title,
            contenido: &scene.content,
            velocidad: scene.speed_percent,
            tiempo: format_lead_in(scene.lead_in_seconds),
        })
        .collect();

    serde_json::to_string_pretty(&saved).map_err(|e| PrompterError::ProjectError(e.to_string()))
}

pub fn save_project_file(path: &Path, scenes: &[SceneScript]) -> Result<(), PrompterError> {
    let json = export_project(scenes)?;
    fs::write(path, json).map_err(|source| PrompterError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Title for a duplicate: `X` -> `X (copy)` -> `X (copy 2)` -> `X (copy 3)`.
pub fn copy_title(title: &str) -> String {
    if let Some(start) = title.find("(copy ") {
        let rest = &title[start + "(copy ".len()..];
        if let Some(close) = rest.find(')') {
            if let Some(n) = rest[..close].parse::<u32>().ok().and_then(|n| n.checked_add(1)) {
                let end = start + "(copy ".len() + close + 1;
                return format!("{}(copy {}){}", &title[..start], n, &title[end..]);
            }
        }
    }
    if title.contains("(copy)") {
        return title.replacen("(copy)", "(copy 2)", 1);
    }
    format!("{} (copy)", title)
}

/// The scenes of a project, in playing order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SceneList {
    scenes: Vec<SceneScript>,
}

impl From<Vec<SceneScript>> for SceneList {
    fn from(scenes: Vec<SceneScript>) -> Self {
        Self { scenes }
    }
}

impl SceneList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.scenes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scenes.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, SceneScript> {
        self.scenes.iter()
    }

    pub fn as_slice(&self) -> &[SceneScript] {
        &self.scenes
    }

    pub fn get(&self, index: usize) -> Result<&SceneScript, PrompterError> {
        self.scenes.get(index).ok_or_else(|| self.out_of_range(index))
    }

    pub fn get_mut(&mut self, index: usize) -> Result<&mut SceneScript, PrompterError> {
        let len = self.scenes.len();
        self.scenes.get_mut(index).ok_or(PrompterError::SceneError {
            index,
            message: format!("project has {} scenes", len),
        })
    }

    pub fn push(&mut self, scene: SceneScript) -> usize {
        self.scenes.push(scene);
        self.scenes.len() - 1
    }

    /// Append a fresh scene with placeholder text, returning its index.
    pub fn add_new(&mut self) -> usize {
        self.push(SceneScript::new(NEW_SCENE_TITLE, NEW_SCENE_CONTENT))
    }

    /// Insert a copy of scene `index` right after it, returning the copy's index.
    pub fn duplicate(&mut self, index: usize) -> Result<usize, PrompterError> {
        if self.scenes.len() >= MAX_SCENES {
            return Err(PrompterError::SceneError {
                index,
                message: format!("a project holds at most {} scenes", MAX_SCENES),
            });
        }
        let mut copy = self.get(index)?.clone();
        copy.title = copy_title(&copy.title);
        self.scenes.insert(index + 1, copy);
        Ok(index + 1)
    }

    /// Remove scene `index`. The last remaining scene cannot be removed.
    pub fn remove(&mut self, index: usize) -> Result<SceneScript, PrompterError> {
        self.get(index)?;
        if self.scenes.len() == 1 {
            return Err(PrompterError::SceneError {
                index,
                message: "cannot remove the only scene".to_string(),
            });
        }
        Ok(self.scenes.remove(index))
    }

    /// The scene that plays after `index`, if any.
    pub fn next_index(&self, index: usize) -> Option<usize> {
        let next = index.checked_add(1)?;
        (next < self.scenes.len()).then_some(next)
    }

    fn out_of_range(&self, index: usize) -> PrompterError {
        PrompterError::SceneError {
            index,
            message: format!("project has {} scenes", self.scenes.len()),
        }
    }
}

impl<'a> IntoIterator for &'a SceneList {
    type Item = &'a SceneScript;
    type IntoIter = std::slice::Iter<'a, SceneScript>;

    fn into_iter(self) -> Self::IntoIter {
        self.scenes.iter()
    }
}
