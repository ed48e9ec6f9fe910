//! Teleprompter: one display surface set, at most one active session
//!
//! Each session runs on its own thread and waits with a [`ChannelTimer`], so
//! cancelling wakes it at once. Surfaces are shared behind a mutex; the cancel
//! flag is set and the timer woken while holding that mutex, so no update
//! lands on the display after [`Teleprompter::cancel`] returns and a session
//! that reaches its end after that point does not signal completion.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use parking_lot::{Mutex, MutexGuard};
use tracing::{debug, warn};

use super::display::{CuePolicy, SurfaceUpdate, Surfaces};
use super::driver::{run_session, CompletionAction, PlaybackOutcome};
use super::session::PlaybackSession;
use super::timer::{CancelSignal, ChannelTimer};
use super::timing::PlaybackTiming;
use crate::error::PrompterError;
use crate::script::SceneScript;

/// Surfaces as seen from the session thread: updates are dropped once cancelled
struct GuardedSurfaces<S> {
    inner: Arc<Mutex<S>>,
    cancelled: Arc<AtomicBool>,
}

impl<S: Surfaces> Surfaces for GuardedSurfaces<S> {
    fn apply(&mut self, update: SurfaceUpdate) {
        let mut surfaces = self.inner.lock();
        if self.cancelled.load(Ordering::SeqCst) {
            return;
        }
        surfaces.apply(update);
    }

    fn is_closed(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }
}

struct ActiveSession {
    signal: CancelSignal,
    cancelled: Arc<AtomicBool>,
    thread: JoinHandle<PlaybackOutcome>,
}

pub struct Teleprompter<S> {
    surfaces: Arc<Mutex<S>>,
    timing: PlaybackTiming,
    cue_policy: CuePolicy,
    active: Option<ActiveSession>,
}

impl<S: Surfaces + Send + 'static> Teleprompter<S> {
    pub fn new(surfaces: S) -> Self {
        Self {
            surfaces: Arc::new(Mutex::new(surfaces)),
            timing: PlaybackTiming::default(),
            cue_policy: CuePolicy::default(),
            active: None,
        }
    }

    pub fn with_timing(mut self, timing: PlaybackTiming) -> Self {
        self.timing = timing;
        self
    }

    pub fn with_cue_policy(mut self, policy: CuePolicy) -> Self {
        self.cue_policy = policy;
        self
    }

    /// Lock the surfaces, e.g. to render or inspect them.
    pub fn surfaces(&self) -> MutexGuard<'_, S> {
        self.surfaces.lock()
    }

    pub fn is_playing(&self) -> bool {
        self.active
            .as_ref()
            .is_some_and(|active| !active.thread.is_finished())
    }

    /// Start playing `script`.
    ///
    /// `on_complete` runs on the session thread each time the scene finishes.
    ///
    /// # Errors
    /// Returns [`PrompterError::SessionActive`] if a session is still playing;
    /// that session is left untouched.
    pub fn start<F>(&mut self, script: SceneScript, on_complete: F) -> Result<(), PrompterError>
    where
        F: FnMut(&str) -> CompletionAction + Send + 'static,
    {
        if self.is_playing() {
            warn!(title = %script.title, "rejecting start while a session is active");
            return Err(PrompterError::SessionActive);
        }
        // Reap a finished session before replacing it
        self.wait();

        let session = PlaybackSession::new(script)
            .with_timing(self.timing)
            .with_cue_policy(self.cue_policy);
        self.spawn(session, on_complete);
        Ok(())
    }

    fn spawn<F>(&mut self, mut session: PlaybackSession, on_complete: F)
    where
        F: FnMut(&str) -> CompletionAction + Send + 'static,
    {
        let (mut timer, signal) = ChannelTimer::with_signal();
        let cancelled = Arc::new(AtomicBool::new(false));
        let mut surfaces = GuardedSurfaces {
            inner: Arc::clone(&self.surfaces),
            cancelled: Arc::clone(&cancelled),
        };

        debug!(title = session.title(), "spawning session thread");
        let thread = thread::spawn(move || run_session(&mut session, &mut surfaces, &mut timer, on_complete));

        self.active = Some(ActiveSession { signal, cancelled, thread });
    }

    /// Cancel the active session and wait for its thread to exit.
    ///
    /// Returns the session's outcome, or `None` when nothing was playing. If
    /// the session had already finished, its real outcome is returned.
    pub fn cancel(&mut self) -> Option<PlaybackOutcome> {
        let active = self.active.take()?;
        stop(&self.surfaces, &active);
        join(active.thread)
    }

    /// Block until the active session ends on its own.
    pub fn wait(&mut self) -> Option<PlaybackOutcome> {
        let active = self.active.take()?;
        join(active.thread)
    }
}

impl<S> Drop for Teleprompter<S> {
    fn drop(&mut self) {
        // Stop the session without blocking on its thread
        if let Some(active) = self.active.take() {
            stop(&self.surfaces, &active);
        }
    }
}

/// Mark the session cancelled and wake its timer, both under the surfaces lock.
fn stop<S>(surfaces: &Mutex<S>, active: &ActiveSession) {
    let _surfaces = surfaces.lock();
    active.cancelled.store(true, Ordering::SeqCst);
    active.signal.cancel();
}

fn join(thread: JoinHandle<PlaybackOutcome>) -> Option<PlaybackOutcome> {
    match thread.join() {
        Ok(outcome) => Some(outcome),
        Err(_) => {
            warn!("session thread panicked");
            None
        }
    }
}
