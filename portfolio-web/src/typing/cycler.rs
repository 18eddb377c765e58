//! Phrase cycle state machine
//!
//! Each tick reveals one more character of the current phrase, or removes
//! one while erasing. A fully typed phrase is held, an empty banner pauses
//! briefly, then the next phrase (wrapping) starts.

use crate::config::TypingConfig;
use crate::error::PortfolioError;

/// Output of one tick: what to show and how long to wait before the next tick
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypingStep {
    pub text: String,
    pub delay_ms: u32,
}

pub struct TextCycler {
    phrases: Vec<String>,
    phrase_index: usize,
    /// Characters currently visible, counted in chars
    letter_index: usize,
    is_deleting: bool,

    type_delay_ms: u32,
    delete_delay_ms: u32,
    hold_delay_ms: u32,
    next_phrase_delay_ms: u32,
}

impl TextCycler {
    pub fn new(config: &TypingConfig) -> Result<Self, PortfolioError> {
        if config.phrases.is_empty() {
            return Err(PortfolioError::NoPhrases);
        }
        if let Some(index) = config.phrases.iter().position(|p| p.is_empty()) {
            return Err(PortfolioError::EmptyPhrase(index));
        }

        Ok(Self {
            phrases: config.phrases.clone(),
            phrase_index: 0,
            letter_index: 0,
            is_deleting: false,
            type_delay_ms: config.type_delay_ms,
            delete_delay_ms: config.delete_delay_ms,
            hold_delay_ms: config.hold_delay_ms,
            next_phrase_delay_ms: config.next_phrase_delay_ms,
        })
    }

    /// Advance by one character and report the visible text
    pub fn tick(&mut self) -> TypingStep {
        let phrase_len = self.current_phrase().chars().count();

        if self.is_deleting {
            self.letter_index = self.letter_index.saturating_sub(1);
        } else {
            self.letter_index = (self.letter_index + 1).min(phrase_len);
        }
        let text = prefix(self.current_phrase(), self.letter_index).to_string();

        let mut delay_ms = if self.is_deleting {
            self.delete_delay_ms
        } else {
            self.type_delay_ms
        };

        if !self.is_deleting && self.letter_index == phrase_len {
            delay_ms = self.hold_delay_ms;
            self.is_deleting = true;
        } else if self.is_deleting && self.letter_index == 0 {
            self.is_deleting = false;
            self.phrase_index = (self.phrase_index + 1) % self.phrases.len();
            delay_ms = self.next_phrase_delay_ms;
        }

        TypingStep { text, delay_ms }
    }

    pub fn current_phrase(&self) -> &str {
        &self.phrases[self.phrase_index]
    }

    pub fn phrase_index(&self) -> usize {
        self.phrase_index
    }

    pub fn letter_index(&self) -> usize {
        self.letter_index
    }

    pub fn is_deleting(&self) -> bool {
        self.is_deleting
    }
}

/// First `chars` characters of `s`, cut on a char boundary
fn prefix(s: &str, chars: usize) -> &str {
    match s.char_indices().nth(chars) {
        Some((byte_idx, _)) => &s[..byte_idx],
        None => s,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cycler(phrases: &[&str]) -> TextCycler {
        let config = TypingConfig {
            phrases: phrases.iter().map(|p| p.to_string()).collect(),
            ..TypingConfig::default()
        };
        TextCycler::new(&config).unwrap()
    }

    #[test]
    fn test_two_phrase_sequence() {
        let mut c = cycler(&["AB", "C"]);
        let steps: Vec<(String, u32)> = (0..7)
            .map(|_| {
                let s = c.tick();
                (s.text, s.delay_ms)
            })
            .collect();

        let expected = [
            ("A", 100),
            ("AB", 2000),
            ("A", 50),
            ("", 500),
            ("C", 2000),
            ("", 500),
            ("A", 100),
        ];
        for (got, want) in steps.iter().zip(expected.iter()) {
            assert_eq!(got.0, want.0);
            assert_eq!(got.1, want.1);
        }
    }

    #[test]
    fn test_letter_index_stays_in_bounds() {
        let mut c = cycler(&["HELLO", "HI", "WORLD!"]);
        for _ in 0..500 {
            c.tick();
            let len = c.current_phrase().chars().count();
            assert!(c.letter_index() <= len);
        }
    }

    #[test]
    fn test_visits_phrases_in_order() {
        let mut c = cycler(&["ONE", "TWO", "THREE"]);
        let mut completed = Vec::new();
        for _ in 0..200 {
            let step = c.tick();
            if step.delay_ms == 2000 {
                completed.push(step.text);
            }
        }
        assert_eq!(&completed[..4], &["ONE", "TWO", "THREE", "ONE"]);
    }

    #[test]
    fn test_multibyte_phrases() {
        let mut c = cycler(&["héllo"]);
        assert_eq!(c.tick().text, "h");
        assert_eq!(c.tick().text, "hé");
        assert_eq!(c.tick().text, "hél");
    }

    #[test]
    fn test_rejects_empty_input() {
        let config = TypingConfig {
            phrases: vec![],
            ..TypingConfig::default()
        };
        assert!(matches!(TextCycler::new(&config), Err(PortfolioError::NoPhrases)));

        let config = TypingConfig {
            phrases: vec!["A".to_string(), String::new()],
            ..TypingConfig::default()
        };
        assert!(matches!(TextCycler::new(&config), Err(PortfolioError::EmptyPhrase(1))));
    }
}
