//! Precomputed playback schedule
//!
//! Computes when each token appears and how long it stays, without running a
//! session. Useful for previews and for checking scene length.

use serde::Serialize;

use super::timing::{clamp_speed, PlaybackTiming};
use crate::token::{Token, TokenKind};

/// Schedule entry for one token
///
/// # Fields
/// - `start_ms`: offset from the first token (lead-in excluded)
/// - `dwell_ms`: time on screen before the next token
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct TimelineEntry {
    pub index: usize,
    pub kind: TokenKind,
    pub text: String,
    pub start_ms: u64,
    pub dwell_ms: u64,
}

/// Schedule for a whole scene
///
/// `total_ms` runs from the first token to the completion signal, so it
/// includes `completion_ms` but not `lead_in_ms`.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Timeline {
    pub speed_percent: u8,
    pub base_ms: u64,
    pub lead_in_ms: u64,
    pub entries: Vec<TimelineEntry>,
    pub completion_ms: u64,
    pub total_ms: u64,
}

/// Build the schedule for `tokens` at `speed` with no lead-in.
///
/// # Example
/// ```rust
/// use prompter::playback::{build_timeline, PlaybackTiming};
/// use prompter::Token;
///
/// let tokens = vec![Token::plain("A"), Token::emotion("Joy"), Token::plain("B")];
/// let timeline = build_timeline(&tokens, 100, &PlaybackTiming::default());
/// assert_eq!(timeline.total_ms, 1700);
/// ```
pub fn build_timeline(tokens: &[Token], speed: i64, timing: &PlaybackTiming) -> Timeline {
    let base = timing.base_display_time(speed);
    let mut start = 0u64;

    let entries = tokens
        .iter()
        .enumerate()
        .map(|(index, token)| {
            let dwell_ms = u64::try_from(timing.dwell(token, base).as_millis()).unwrap_or(u64::MAX);
            let entry = TimelineEntry {
                index,
                kind: token.kind,
                text: token.text.clone(),
                start_ms: start,
                dwell_ms,
            };
            start = start.saturating_add(dwell_ms);
            entry
        })
        .collect();

    Timeline {
        speed_percent: clamp_speed(speed),
        base_ms: base.as_millis() as u64,
        lead_in_ms: 0,
        entries,
        completion_ms: timing.completion_delay_ms,
        total_ms: start.saturating_add(timing.completion_delay_ms),
    }
}

impl Timeline {
    /// Add a lead-in of `seconds` countdown ticks.
    pub fn with_lead_in(mut self, seconds: u32, timing: &PlaybackTiming) -> Self {
        self.lead_in_ms = u64::from(seconds) * timing.countdown_tick_ms;
        self
    }

    /// Time spent on spoken text only.
    pub fn spoken_ms(&self) -> u64 {
        self.entries
            .iter()
            .filter(|e| e.kind == TokenKind::PlainText)
            .map(|e| e.dwell_ms)
            .sum()
    }
}
