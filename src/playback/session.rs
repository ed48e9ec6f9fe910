//! Playback session state machine
//!
//! A session is a cooperative task: each call to [`PlaybackSession::step`]
//! performs one display change and hands back how long to wait before the next
//! call. Nothing here sleeps; the driver owns the waiting.
//!
//! ```text
//! Idle -> LeadIn -> Advancing -> Finishing -> Completed
//!                                   ^             |
//!                                   +-- restart --+
//! ```
//! Any state can move to `Cancelled`.

use std::time::Duration;

use tracing::{debug, info, warn};

use super::display::{CuePolicy, SurfaceUpdate, Surfaces};
use super::timing::PlaybackTiming;
use crate::script::SceneScript;
use crate::segmenter::segment;
use crate::token::{Token, TokenKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Idle,
    /// Counting down; `remaining` is the next value to show
    LeadIn { remaining: u32 },
    Advancing,
    /// All tokens shown, waiting out the completion delay
    Finishing,
    Completed,
    Cancelled,
}

/// What the driver should do after a step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// Wait this long, then step again
    Wait(Duration),
    /// The run just finished; signal completion with the session title
    Complete,
    /// Nothing left to do (already completed or cancelled)
    Halted,
}

/// One playback of one scene script
#[derive(Debug, Clone)]
pub struct PlaybackSession {
    script: SceneScript,
    tokens: Vec<Token>,
    cursor: usize,
    base: Duration,
    timing: PlaybackTiming,
    cue_policy: CuePolicy,
    state: SessionState,
    cues_visible: bool,
    runs: u32,
}

impl PlaybackSession {
    /// Segment the script's content and prepare a session for it.
    pub fn new(script: SceneScript) -> Self {
        let tokens = segment(&script.content);
        Self::from_tokens(script, tokens)
    }

    /// Prepare a session over already segmented tokens.
    ///
    /// The script's content is not consulted again.
    pub fn from_tokens(script: SceneScript, tokens: Vec<Token>) -> Self {
        let timing = PlaybackTiming::default();
        let base = timing.base_display_time(i64::from(script.speed_percent));
        Self {
            script,
            tokens,
            cursor: 0,
            base,
            timing,
            cue_policy: CuePolicy::default(),
            state: SessionState::Idle,
            cues_visible: false,
            runs: 0,
        }
    }

    pub fn with_timing(mut self, timing: PlaybackTiming) -> Self {
        self.base = timing.base_display_time(i64::from(self.script.speed_percent));
        self.timing = timing;
        self
    }

    pub fn with_cue_policy(mut self, policy: CuePolicy) -> Self {
        self.cue_policy = policy;
        self
    }

    pub fn title(&self) -> &str {
        &self.script.title
    }

    pub fn script(&self) -> &SceneScript {
        &self.script
    }

    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Index of the next token to show
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Number of runs started so far (the first run plus every repeat)
    pub fn runs(&self) -> u32 {
        self.runs
    }

    pub fn base_display_time(&self) -> Duration {
        self.base
    }

    /// Advance the state machine by one display change.
    pub fn step<S: Surfaces + ?Sized>(&mut self, surfaces: &mut S) -> Step {
        loop {
            match self.state {
                SessionState::Idle => {
                    info!(
                        title = %self.script.title,
                        tokens = self.tokens.len(),
                        speed = self.script.speed_percent,
                        "starting playback"
                    );
                    self.begin_run(surfaces);
                    self.state = match self.script.lead_in_seconds {
                        0 => SessionState::Advancing,
                        seconds => SessionState::LeadIn { remaining: seconds },
                    };
                }
                SessionState::LeadIn { remaining: 0 } => {
                    surfaces.apply(SurfaceUpdate::Countdown(None));
                    self.state = SessionState::Advancing;
                }
                SessionState::LeadIn { remaining } => {
                    surfaces.apply(SurfaceUpdate::Countdown(Some(remaining)));
                    self.state = SessionState::LeadIn { remaining: remaining - 1 };
                    return Step::Wait(self.timing.countdown_tick());
                }
                SessionState::Advancing => {
                    if self.cursor >= self.tokens.len() {
                        self.state = SessionState::Finishing;
                        return Step::Wait(self.timing.completion_delay());
                    }
                    let dwell = self.show(self.cursor, surfaces);
                    self.cursor += 1;
                    return Step::Wait(dwell);
                }
                SessionState::Finishing => {
                    info!(title = %self.script.title, run = self.runs, "playback completed");
                    self.state = SessionState::Completed;
                    return Step::Complete;
                }
                SessionState::Completed | SessionState::Cancelled => return Step::Halted,
            }
        }
    }

    /// Replay the same tokens from the start, without a lead-in.
    pub fn restart<S: Surfaces + ?Sized>(&mut self, surfaces: &mut S) {
        if self.state == SessionState::Cancelled {
            warn!(title = %self.script.title, "ignoring restart of a cancelled session");
            return;
        }
        debug!(title = %self.script.title, "repeating scene");
        self.begin_run(surfaces);
        self.state = SessionState::Advancing;
    }

    pub fn cancel(&mut self) {
        if !matches!(self.state, SessionState::Completed | SessionState::Cancelled) {
            info!(title = %self.script.title, cursor = self.cursor, "playback cancelled");
        }
        self.state = SessionState::Cancelled;
    }

    fn begin_run<S: Surfaces + ?Sized>(&mut self, surfaces: &mut S) {
        self.cursor = 0;
        self.cues_visible = false;
        self.runs += 1;
        surfaces.apply(SurfaceUpdate::Reset);
    }

    fn show<S: Surfaces + ?Sized>(&mut self, index: usize, surfaces: &mut S) -> Duration {
        let token = &self.tokens[index];
        let dwell = self.timing.dwell(token, self.base);
        debug!(index, kind = ?token.kind, dwell_ms = dwell.as_millis() as u64, "showing token");

        match token.kind {
            TokenKind::Emotion => {
                surfaces.apply(SurfaceUpdate::ShowEmotion(token.text.clone()));
                self.cues_visible = true;
            }
            TokenKind::Note => {
                surfaces.apply(SurfaceUpdate::ShowNote(token.text.clone()));
                self.cues_visible = true;
            }
            TokenKind::PlainText => {
                if self.cues_visible && self.cue_policy == CuePolicy::ClearOnText {
                    surfaces.apply(SurfaceUpdate::HideCues);
                    self.cues_visible = false;
                }
                let upcoming = match self.tokens.get(index + 1) {
                    Some(next) if next.kind == TokenKind::PlainText => next.text.clone(),
                    _ => String::new(),
                };
                surfaces.apply(SurfaceUpdate::CurrentText(token.text.clone()));
                surfaces.apply(SurfaceUpdate::UpcomingText(upcoming));
            }
        }

        dwell
    }
}
