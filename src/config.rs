//! Configuration loaded from YAML
//!
//! Every key is optional; missing keys keep their defaults.
//!
//! ```yaml
//! cue-policy: clear-on-text
//! timing:
//!   completion-delay-ms: 1500
//! scene:
//!   speed: 70
//!   lead-in-seconds: 3
//! ```

use std::fs;
use std::path::Path;

use serde::Deserialize;
use tracing::debug;

use crate::error::PrompterError;
use crate::playback::{CuePolicy, PlaybackTiming};
use crate::script::SceneDefaults;

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
pub struct PrompterConfig {
    pub timing: PlaybackTiming,
    pub cue_policy: CuePolicy,
    /// Defaults for scene files that leave values out
    pub scene: SceneDefaults,
}

impl PrompterConfig {
    pub fn from_yaml(content: &str) -> Result<Self, PrompterError> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(content).map_err(|e| PrompterError::MetadataError(e.to_string()))
    }

    pub fn load(path: &Path) -> Result<Self, PrompterError> {
        let content = fs::read_to_string(path).map_err(|source| PrompterError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        debug!(path = %path.display(), "loaded configuration");
        Self::from_yaml(&content)
    }
}
