//! # Playback Module
//!
//! Reveals segmented scene text one token at a time with per-token dwell times.
//!
//! ## Sub-modules
//! - `timing` - Dwell-time policy and the [`PlaybackTiming`] constants
//! - `display` - The [`Surfaces`] a prompter draws on and [`SurfaceUpdate`]s
//! - `session` - [`PlaybackSession`], the step-by-step state machine
//! - `timer` - Real ([`ChannelTimer`]) and virtual ([`ManualTimer`]) waits
//! - `driver` - [`run_session()`] and [`play()`], tying sessions to timers
//! - `timeline` - [`build_timeline()`], the schedule without running anything
//! - `teleprompter` - [`Teleprompter`], a display set with one session at a time
//!
//! ## Dwell Policy
//! - Base unit: `max(200ms, 1000ms - speed * 8ms)`, speed clamped to 1..=100
//! - Spoken text: base unit times the word count, between 1 and 10
//! - Emotion and note cues: 300ms
//! - After the last token: 1000ms, then completion
//!
//! ## Example
//! ```rust
//! use prompter::playback::{play, CompletionAction, ManualTimer, SurfaceUpdate};
//! use prompter::Token;
//! use std::time::Duration;
//!
//! let tokens = vec![Token::plain("A"), Token::emotion("Joy"), Token::plain("B")];
//! let mut updates: Vec<SurfaceUpdate> = Vec::new();
//! let mut timer = ManualTimer::new();
//!
//! let outcome = play(tokens, 100, "Intro", &mut updates, &mut timer, |_| CompletionAction::Advance);
//!
//! assert_eq!(outcome.title(), "Intro");
//! assert_eq!(timer.elapsed(), Duration::from_millis(1700));
//! ```

mod display;
mod driver;
mod session;
mod teleprompter;
mod timeline;
mod timer;
mod timing;


pub use display::{Badge, CuePolicy, DisplayState, SurfaceUpdate, Surfaces};
pub use driver::{play, run_session, CompletionAction, PlaybackOutcome};
pub use session::{PlaybackSession, SessionState, Step};
pub use teleprompter::Teleprompter;
pub use timeline::{build_timeline, Timeline, TimelineEntry};
pub use timer::{CancelSignal, ChannelTimer, ManualTimer, Timer, WaitOutcome};
pub use timing::{base_display_time, clamp_speed, PlaybackTiming};
