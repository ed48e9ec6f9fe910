//! # Segmenter
//!
//! Splits free-form scene text into an ordered sequence of [`Token`]s.
//!
//! ## Cue Syntax
//! - `(Joy)` - emotion cue, shown on the emotion badge
//! - `[Pause]` - stage note, shown on the note banner
//! - everything else is spoken text
//!
//! Delimiters do not nest: an opening `(` pairs with the next `)`, whatever sits
//! in between (`((a)` is an emotion cue with text `(a`). The inner text must be
//! non-empty, so `()` and `[]` are literal. An opening delimiter with no closing
//! partner is literal text as well; segmentation never fails.
//!
//! ## Algorithm
//! 1. Scan the text once per delimiter pair, collecting every cue with its span
//! 2. Merge both lists by start offset (stable, so discovery order breaks ties)
//! 3. Walk the cues left to right, emitting the trimmed gap before each cue as
//!    plain text when it is non-empty, then the cue itself
//! 4. Emit any trimmed trailing text
//!
//! Text without cues always yields exactly one plain token, even when it is
//! empty, so `segment("")` is `[PlainText ""]`.
//!
//! ## Example
//! ```rust
//! use prompter::{segment, Token};
//!
//! let tokens = segment("Hello (Alegría) world");
//! assert_eq!(
//!     tokens,
//!     vec![Token::plain("Hello"), Token::emotion("Alegría"), Token::plain("world")]
//! );
//! ```

use crate::token::{Token, TokenKind};

/// A delimited cue found during scanning
#[derive(Debug, Clone, Copy)]
struct Marker<'a> {
    kind: TokenKind,
    inner: &'a str,
    /// Byte offset of the opening delimiter
    start: usize,
    /// Byte offset just past the closing delimiter
    end: usize,
}

/// Segmenter over one piece of scene text
pub struct Segmenter<'a> {
    input: &'a str,
}

impl<'a> Segmenter<'a> {
    pub fn new(input: &'a str) -> Self {
        Self { input }
    }

    /// Collect every `open … close` span with non-empty inner text.
    ///
    /// Both delimiters are ASCII, so the byte offsets found here always fall on
    /// char boundaries.
    fn scan(&self, open: u8, close: u8) -> Vec<Marker<'a>> {
        let bytes = self.input.as_bytes();
        let kind = match TokenKind::for_delimiter(open as char) {
            Some(kind) => kind,
            None => return Vec::new(),
        };
        let mut markers = Vec::new();
        let mut position = 0;

        while let Some(offset) = bytes[position..].iter().position(|&b| b == open) {
            let start = position + offset;
            match bytes[start + 1..].iter().position(|&b| b == close) {
                // Empty cue: not a marker, keep looking after the opener
                Some(0) => position = start + 1,
                Some(len) => {
                    let end = start + len + 2;
                    markers.push(Marker {
                        kind,
                        inner: &self.input[start + 1..end - 1],
                        start,
                        end,
                    });
                    position = end;
                }
                // No closer anywhere ahead, so no later opener can match either
                None => break,
            }
        }

        markers
    }

    fn markers(&self) -> Vec<Marker<'a>> {
        let mut markers = self.scan(b'(', b')');
        markers.extend(self.scan(b'[', b']'));
        // sort_by_key is stable: equal offsets keep discovery order
        markers.sort_by_key(|m| m.start);
        markers
    }

    pub fn tokenize(&self) -> Vec<Token> {
        let markers = self.markers();

        if markers.is_empty() {
            return vec![Token::plain(self.input.trim())];
        }

        let mut tokens = Vec::with_capacity(markers.len() * 2 + 1);
        let mut last_index = 0;

        for marker in &markers {
            if marker.start > last_index {
                let before = self.input[last_index..marker.start].trim();
                if !before.is_empty() {
                    tokens.push(Token::plain(before));
                }
            }

            tokens.push(Token {
                text: marker.inner.trim().to_string(),
                kind: marker.kind,
            });

            // Overlapping spans of different kinds must not rewind the cursor
            last_index = last_index.max(marker.end);
        }

        if last_index < self.input.len() {
            let after = self.input[last_index..].trim();
            if !after.is_empty() {
                tokens.push(Token::plain(after));
            }
        }

        tokens
    }
}

/// Segment scene text into playback tokens.
pub fn segment(text: &str) -> Vec<Token> {
    Segmenter::new(text).tokenize()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(tokens: &[Token]) -> Vec<TokenKind> {
        tokens.iter().map(|t| t.kind).collect()
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(segment(""), vec![Token::plain("")]);
        assert_eq!(segment("   \n "), vec![Token::plain("")]);
    }

    #[test]
    fn test_plain_text() {
        assert_eq!(segment("Hello world"), vec![Token::plain("Hello world")]);
        assert_eq!(segment("  padded  "), vec![Token::plain("padded")]);
    }

    #[test]
    fn test_emotion_between_text() {
        let tokens = segment("Hello (Alegría) world");
        assert_eq!(
            tokens,
            vec![Token::plain("Hello"), Token::emotion("Alegría"), Token::plain("world")]
        );
    }

    #[test]
    fn test_note_before_emotion() {
        let tokens = segment("[Pause] (Enojo)");
        assert_eq!(tokens, vec![Token::note("Pause"), Token::emotion("Enojo")]);
    }

    #[test]
    fn test_adjacent_cues_are_not_merged() {
        let tokens = segment("(Joy)(Joy)[a][b]");
        assert_eq!(
            kinds(&tokens),
            vec![TokenKind::Emotion, TokenKind::Emotion, TokenKind::Note, TokenKind::Note]
        );
    }

    #[test]
    fn test_unmatched_opener_is_literal() {
        assert_eq!(segment("Wait (for it"), vec![Token::plain("Wait (for it")]);
        assert_eq!(segment("Wait [for it"), vec![Token::plain("Wait [for it")]);
    }

    #[test]
    fn test_empty_cue_is_literal() {
        assert_eq!(segment("Nothing () here"), vec![Token::plain("Nothing () here")]);
        assert_eq!(segment("[] (x)"), vec![Token::plain("[]"), Token::emotion("x")]);
    }

    #[test]
    fn test_stray_closer_is_literal() {
        assert_eq!(segment("a) b] c"), vec![Token::plain("a) b] c")]);
    }

    #[test]
    fn test_openers_do_not_nest() {
        let tokens = segment("x ((a) y");
        assert_eq!(tokens, vec![Token::plain("x"), Token::emotion("(a"), Token::plain("y")]);
    }

    #[test]
    fn test_cue_text_is_trimmed() {
        let tokens = segment("( Sad ) [ breathe ]");
        assert_eq!(tokens, vec![Token::emotion("Sad"), Token::note("breathe")]);
    }

    #[test]
    fn test_trailing_text() {
        let tokens = segment("(Calm) Good evening.\nWelcome back. [Smile]  Tonight:");
        assert_eq!(
            tokens,
            vec![
                Token::emotion("Calm"),
                Token::plain("Good evening.\nWelcome back."),
                Token::note("Smile"),
                Token::plain("Tonight:"),
            ]
        );
    }

    #[test]
    fn test_overlapping_spans_keep_order() {
        // The note starts first; the emotion span begins inside it
        let tokens = segment("[a (b] c) d");
        assert_eq!(
            tokens,
            vec![Token::note("a (b"), Token::emotion("b] c"), Token::plain("d")]
        );

        // A note inside an emotion does not replay the text after it
        let tokens = segment("(a [b] c) d");
        assert_eq!(
            tokens,
            vec![Token::emotion("a [b] c"), Token::note("b"), Token::plain("d")]
        );
    }

    #[test]
    fn test_multibyte_text_around_cues() {
        let tokens = segment("¡Hola! (Sorpresa) ¿qué tal? [Señala]");
        assert_eq!(
            tokens,
            vec![
                Token::plain("¡Hola!"),
                Token::emotion("Sorpresa"),
                Token::plain("¿qué tal?"),
                Token::note("Señala"),
            ]
        );
    }
}
