//! Display surfaces driven by playback
//!
//! A prompter shows four things: the line being read, a preview of the next
//! line, an emotion badge and a stage-note banner. A lead-in countdown is shown
//! before reading starts. Playback talks to them only through [`SurfaceUpdate`]s.

use serde::{Deserialize, Serialize};

/// A single change to the display
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "surface", content = "value", rename_all = "camelCase")]
pub enum SurfaceUpdate {
    /// Blank every surface; sent when a run starts
    Reset,
    /// Lead-in countdown; `None` removes it
    Countdown(Option<u32>),
    CurrentText(String),
    /// Preview of the next line; empty when the next token is a cue or there is none
    UpcomingText(String),
    ShowEmotion(String),
    ShowNote(String),
    /// Hide both cue badges
    HideCues,
}

/// Something that can render surface updates
pub trait Surfaces {
    fn apply(&mut self, update: SurfaceUpdate);

    /// Whether the display has stopped accepting updates for good.
    ///
    /// Playback stops without signalling completion once this returns `true`.
    fn is_closed(&self) -> bool {
        false
    }
}

/// Records every update in order.
impl Surfaces for Vec<SurfaceUpdate> {
    fn apply(&mut self, update: SurfaceUpdate) {
        self.push(update);
    }
}

/// When cue badges disappear
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CuePolicy {
    /// Badges stay up until replaced or the run ends
    #[default]
    Persist,
    /// Badges are hidden when the next spoken line appears
    ClearOnText,
}

/// A cue badge: its text and whether it is showing
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Badge {
    pub text: String,
    pub visible: bool,
}

impl Badge {
    fn show(&mut self, text: String) {
        self.text = text;
        self.visible = true;
    }
}

/// In-memory state of all surfaces
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DisplayState {
    pub countdown: Option<u32>,
    pub current_text: String,
    pub upcoming_text: String,
    pub emotion: Badge,
    pub note: Badge,
}

impl Surfaces for DisplayState {
    fn apply(&mut self, update: SurfaceUpdate) {
        match update {
            SurfaceUpdate::Reset => *self = DisplayState::default(),
            SurfaceUpdate::Countdown(value) => self.countdown = value,
            SurfaceUpdate::CurrentText(text) => self.current_text = text,
            SurfaceUpdate::UpcomingText(text) => self.upcoming_text = text,
            SurfaceUpdate::ShowEmotion(text) => self.emotion.show(text),
            SurfaceUpdate::ShowNote(text) => self.note.show(text),
            SurfaceUpdate::HideCues => {
                self.emotion.visible = false;
                self.note.visible = false;
            }
        }
    }
}
