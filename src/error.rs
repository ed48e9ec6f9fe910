//! # Error Types
//!
//! This module defines all error types for the prompter library.
//!
//! Segmentation and playback never fail on their input: malformed cue syntax
//! degrades to literal text and out-of-range speeds are clamped. Errors only
//! come from reading scene sources, projects and configuration, from bad scene
//! indices, and from trying to start a second session on a busy display.
//!
//! ## Error Types
//! - `MetadataError` - Invalid YAML frontmatter, configuration or lead-in value
//! - `ProjectError` - Malformed scene project JSON
//! - `SceneError` - Scene index out of range
//! - `SessionActive` - A playback session is already running on this display
//! - `Io` - File access failure, with the offending path
//!
//! ## Usage
//! ```rust
//! use prompter::{parse_scene, PrompterError};
//!
//! let source = "---\nlead-in: soon\n---\nHello";
//! match parse_scene(source) {
//!     Ok(scene) => println!("Loaded {}", scene.title),
//!     Err(PrompterError::MetadataError(message)) => eprintln!("Bad header: {}", message),
//!     Err(e) => eprintln!("Error: {}", e),
//! }
//! ```

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PrompterError {
    /// Invalid metadata error.
    ///
    /// Occurs when a scene's YAML frontmatter or the configuration file is
    /// invalid, or a lead-in value cannot be read.
    ///
    /// # Example
    /// ```
    /// # use prompter::PrompterError;
    /// let err = PrompterError::MetadataError("Invalid lead-in: soon".to_string());
    /// assert_eq!(err.to_string(), "Invalid metadata: Invalid lead-in: soon");
    /// ```
    #[error("Invalid metadata: {0}")]
    MetadataError(String),

    /// Malformed scene project.
    ///
    /// Occurs when a project document is not valid JSON or is not an array of scenes.
    ///
    /// # Example
    /// ```
    /// # use prompter::PrompterError;
    /// let err = PrompterError::ProjectError("expected an array of scenes".to_string());
    /// assert_eq!(err.to_string(), "Invalid project: expected an array of scenes");
    /// ```
    #[error("Invalid project: {0}")]
    ProjectError(String),

    /// Scene lookup error with the requested index (0-based).
    #[error("Scene error at index {index}: {message}")]
    SceneError { index: usize, message: String },

    /// A second session was started while one is still playing on the same display.
    #[error("A playback session is already active on this display")]
    SessionActive,

    #[error("Could not access {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
