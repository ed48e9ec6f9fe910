//! Playback driver
//!
//! Runs a [`PlaybackSession`] to completion against a set of surfaces and a
//! [`Timer`], asking the completion callback whether to repeat the scene or
//! move on.

use tracing::debug;

use super::display::Surfaces;
use super::session::{PlaybackSession, SessionState, Step};
use super::timer::{Timer, WaitOutcome};
use crate::script::SceneScript;
use crate::token::Token;

/// The two choices offered when a scene finishes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompletionAction {
    /// Play the same scene again
    Repeat,
    /// End the session; the caller picks what plays next
    Advance,
}

/// How a session ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlaybackOutcome {
    /// Completed and the callback chose to advance
    Advanced { title: String, runs: u32 },
    /// Stopped before completion was signalled
    Cancelled { title: String, runs: u32 },
}

impl PlaybackOutcome {
    pub fn title(&self) -> &str {
        match self {
            PlaybackOutcome::Advanced { title, .. } | PlaybackOutcome::Cancelled { title, .. } => title,
        }
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, PlaybackOutcome::Cancelled { .. })
    }
}

/// Drive `session` until it is advanced past or cancelled.
///
/// `on_complete` is called with the scene title once per finished run. A
/// cancelled wait or closed surfaces stop the session: no further surface
/// updates are made and completion is not signalled.
pub fn run_session<S, T, F>(
    session: &mut PlaybackSession,
    surfaces: &mut S,
    timer: &mut T,
    mut on_complete: F,
) -> PlaybackOutcome
where
    S: Surfaces + ?Sized,
    T: Timer + ?Sized,
    F: FnMut(&str) -> CompletionAction,
{
    loop {
        match session.step(surfaces) {
            Step::Wait(duration) => {
                if timer.wait(duration) == WaitOutcome::Cancelled {
                    session.cancel();
                    return cancelled(session);
                }
            }
            Step::Complete if timer.poll_cancelled() || surfaces.is_closed() => {
                session.cancel();
                return cancelled(session);
            }
            Step::Complete => match on_complete(session.title()) {
                CompletionAction::Repeat => session.restart(surfaces),
                CompletionAction::Advance => {
                    debug!(title = session.title(), "advancing past scene");
                    return PlaybackOutcome::Advanced {
                        title: session.title().to_string(),
                        runs: session.runs(),
                    };
                }
            },
            Step::Halted => {
                return match session.state() {
                    SessionState::Cancelled => cancelled(session),
                    _ => PlaybackOutcome::Advanced {
                        title: session.title().to_string(),
                        runs: session.runs(),
                    },
                };
            }
        }
    }
}

/// Play already segmented tokens at `speed_percent`, signalling `title` on completion.
pub fn play<S, T, F>(
    tokens: Vec<Token>,
    speed_percent: i64,
    title: &str,
    surfaces: &mut S,
    timer: &mut T,
    on_complete: F,
) -> PlaybackOutcome
where
    S: Surfaces + ?Sized,
    T: Timer + ?Sized,
    F: FnMut(&str) -> CompletionAction,
{
    let script = SceneScript::new(title, String::new()).with_speed(speed_percent);
    let mut session = PlaybackSession::from_tokens(script, tokens);
    run_session(&mut session, surfaces, timer, on_complete)
}

fn cancelled(session: &PlaybackSession) -> PlaybackOutcome {
    PlaybackOutcome::Cancelled {
        title: session.title().to_string(),
        runs: session.runs(),
    }
}
