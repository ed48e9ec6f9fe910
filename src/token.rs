//! Token types produced by the segmenter and consumed by playback.

use serde::Serialize;

/// What a token means on the prompter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum TokenKind {
    /// Spoken text, shown on the main surface
    PlainText,
    /// Emotion cue written as `(Joy)`, shown on the emotion badge
    Emotion,
    /// Stage direction written as `[Pause]`, shown on the note banner
    Note,
}

impl TokenKind {
    /// Cue kind for an opening delimiter, if it is one.
    pub fn for_delimiter(open: char) -> Option<Self> {
        match open {
            '(' => Some(TokenKind::Emotion),
            '[' => Some(TokenKind::Note),
            _ => None,
        }
    }

    pub fn is_cue(self) -> bool {
        !matches!(self, TokenKind::PlainText)
    }
}

/// A single unit of playback
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Token {
    pub text: String,
    pub kind: TokenKind,
}

impl Token {
    pub fn plain(text: impl Into<String>) -> Self {
        Self { text: text.into(), kind: TokenKind::PlainText }
    }

    pub fn emotion(text: impl Into<String>) -> Self {
        Self { text: text.into(), kind: TokenKind::Emotion }
    }

    pub fn note(text: impl Into<String>) -> Self {
        Self { text: text.into(), kind: TokenKind::Note }
    }

    /// Number of space-separated segments in the text.
    ///
    /// Splits on the space character only, so empty text counts as one word
    /// and consecutive spaces produce empty segments that still count.
    pub fn word_count(&self) -> usize {
        self.text.split(' ').count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_word_count() {
        assert_eq!(Token::plain("one two three").word_count(), 3);
        assert_eq!(Token::plain("").word_count(), 1);
        assert_eq!(Token::plain("a  b").word_count(), 3);
        assert_eq!(Token::plain("line\nbreak").word_count(), 1);
    }

    #[test]
    fn test_delimiter_kinds() {
        assert_eq!(TokenKind::for_delimiter('('), Some(TokenKind::Emotion));
        assert_eq!(TokenKind::for_delimiter('['), Some(TokenKind::Note));
        assert_eq!(TokenKind::for_delimiter('{'), None);
        assert!(TokenKind::Note.is_cue());
        assert!(!TokenKind::PlainText.is_cue());
    }
}
