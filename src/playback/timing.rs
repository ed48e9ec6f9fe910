//! Dwell-time policy
//!
//! Speed is a percentage where 100 is fastest. Spoken text stays on screen for
//! a base unit per word (capped at ten words); cues flash for a fixed time.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::token::{Token, TokenKind};

/// Clamp a speed value into `1..=100`.
pub fn clamp_speed(speed: i64) -> u8 {
    speed.clamp(1, 100) as u8
}

/// Timing constants for playback.
///
/// The defaults are the canonical policy; configuration may override them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct PlaybackTiming {
    /// Base unit at speed 0, before the per-percent reduction
    pub max_base_ms: u64,
    /// Floor for the base unit
    pub min_base_ms: u64,
    /// Reduction of the base unit per speed percent
    pub speed_step_ms: u64,
    /// Word count cap for spoken text dwell
    pub max_words: usize,
    /// Dwell for emotion and note cues
    pub cue_ms: u64,
    /// Pause after the last token before completion is signalled
    pub completion_delay_ms: u64,
    /// Length of one lead-in countdown tick
    pub countdown_tick_ms: u64,
}

impl Default for PlaybackTiming {
    fn default() -> Self {
        Self {
            max_base_ms: 1000,
            min_base_ms: 200,
            speed_step_ms: 8,
            max_words: 10,
            cue_ms: 300,
            completion_delay_ms: 1000,
            countdown_tick_ms: 1000,
        }
    }
}

impl PlaybackTiming {
    /// `max(min_base, max_base - speed * step)` with speed clamped to `1..=100`.
    pub fn base_display_time(&self, speed: i64) -> Duration {
        let speed = u64::from(clamp_speed(speed));
        let ms = self
            .max_base_ms
            .saturating_sub(speed.saturating_mul(self.speed_step_ms))
            .max(self.min_base_ms);
        Duration::from_millis(ms)
    }

    /// How long `token` stays on screen given the base unit.
    pub fn dwell(&self, token: &Token, base: Duration) -> Duration {
        match token.kind {
            TokenKind::PlainText => {
                let words = token.word_count().clamp(1, self.max_words.max(1));
                base.saturating_mul(u32::try_from(words).unwrap_or(u32::MAX))
            }
            TokenKind::Emotion | TokenKind::Note => Duration::from_millis(self.cue_ms),
        }
    }

    pub fn completion_delay(&self) -> Duration {
        Duration::from_millis(self.completion_delay_ms)
    }

    pub fn countdown_tick(&self) -> Duration {
        Duration::from_millis(self.countdown_tick_ms)
    }
}

/// Base unit under the default policy.
///
/// # Example
/// ```rust
/// use prompter::playback::base_display_time;
/// use std::time::Duration;
///
/// assert_eq!(base_display_time(100), Duration::from_millis(200));
/// assert_eq!(base_display_time(1), Duration::from_millis(992));
/// ```
pub fn base_display_time(speed: i64) -> Duration {
    PlaybackTiming::default().base_display_time(speed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_display_time_bounds() {
        assert_eq!(base_display_time(1), Duration::from_millis(992));
        assert_eq!(base_display_time(50), Duration::from_millis(600));
        assert_eq!(base_display_time(100), Duration::from_millis(200));
    }

    #[test]
    fn test_base_display_time_is_monotonic() {
        let mut previous = base_display_time(1);
        for speed in 1..=100 {
            let current = base_display_time(speed);
            assert!(current <= previous, "speed {} went up", speed);
            assert!(current >= Duration::from_millis(200));
            assert!(current <= Duration::from_millis(992));
            previous = current;
        }
    }

    #[test]
    fn test_out_of_range_speed_is_clamped() {
        assert_eq!(base_display_time(0), base_display_time(1));
        assert_eq!(base_display_time(-20), base_display_time(1));
        assert_eq!(base_display_time(500), base_display_time(100));
    }

    #[test]
    fn test_text_dwell_scales_with_words() {
        let timing = PlaybackTiming::default();
        let base = timing.base_display_time(50);
        let fifteen = vec!["word"; 15].join(" ");
        assert_eq!(timing.dwell(&Token::plain(fifteen), base), Duration::from_millis(6000));
        assert_eq!(timing.dwell(&Token::plain("two words"), base), Duration::from_millis(1200));
        assert_eq!(timing.dwell(&Token::plain(""), base), Duration::from_millis(600));
    }

    #[test]
    fn test_cue_dwell_is_fixed() {
        let timing = PlaybackTiming::default();
        for speed in [1, 50, 100] {
            let base = timing.base_display_time(speed);
            assert_eq!(timing.dwell(&Token::emotion("Joy"), base), Duration::from_millis(300));
            assert_eq!(
                timing.dwell(&Token::note("a very long stage direction here"), base),
                Duration::from_millis(300)
            );
        }
    }

    #[test]
    fn test_huge_timing_values_saturate() {
        let timing = PlaybackTiming {
            max_base_ms: u64::MAX,
            min_base_ms: 0,
            speed_step_ms: u64::MAX,
            ..PlaybackTiming::default()
        };
        assert_eq!(timing.base_display_time(100), Duration::ZERO);

        let timing = PlaybackTiming {
            max_base_ms: u64::MAX,
            min_base_ms: u64::MAX,
            ..PlaybackTiming::default()
        };
        let base = timing.base_display_time(50);
        assert_eq!(timing.dwell(&Token::plain("many words here"), base), Duration::MAX);
    }

    #[test]
    fn test_zero_word_cap_does_not_panic() {
        let timing = PlaybackTiming { max_words: 0, ..PlaybackTiming::default() };
        let base = timing.base_display_time(100);
        assert_eq!(timing.dwell(&Token::plain("a b c"), base), Duration::from_millis(200));
    }
}
