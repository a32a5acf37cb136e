use std::time::Duration;

pub const TYPE_DELAY: Duration = Duration::from_millis(200);
pub const DELETE_DELAY: Duration = Duration::from_millis(100);
/// Hold time once the full text is shown.
pub const FULL_PAUSE: Duration = Duration::from_millis(2000);
/// Hold time once everything has been deleted.
pub const EMPTY_PAUSE: Duration = Duration::from_millis(500);

/// Types `text` out one character at a time, holds, deletes it again, and
/// starts over. Drive it by calling [`Typewriter::tick`] and sleeping for the
/// returned delay.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Typewriter {
    text: Vec<char>,
    shown: usize,
    deleting: bool,
}

impl Typewriter {
    pub fn new(text: &str) -> Self {
        Self {
            text: text.chars().collect(),
            shown: 0,
            deleting: false,
        }
    }

    /// Advance one step and return how long to wait before the next one.
    pub fn tick(&mut self) -> Duration {
        if self.deleting {
            self.shown = self.shown.saturating_sub(1);
        } else {
            self.shown = (self.shown + 1).min(self.text.len());
        }

        if !self.deleting && self.shown == self.text.len() {
            self.deleting = true;
            FULL_PAUSE
        } else if self.deleting && self.shown == 0 {
            self.deleting = false;
            EMPTY_PAUSE
        } else if self.deleting {
            DELETE_DELAY
        } else {
            TYPE_DELAY
        }
    }

    pub fn visible(&self) -> String {
        self.text[..self.shown].iter().collect()
    }

    pub fn text(&self) -> String {
        self.text.iter().collect()
    }

    pub fn is_deleting(&self) -> bool {
        self.deleting
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn types_holds_deletes_and_restarts() {
        let mut tw = Typewriter::new("abc");
        assert_eq!(tw.visible(), "");

        assert_eq!(tw.tick(), TYPE_DELAY);
        assert_eq!(tw.visible(), "a");
        assert_eq!(tw.tick(), TYPE_DELAY);
        assert_eq!(tw.tick(), FULL_PAUSE);
        assert_eq!(tw.visible(), "abc");
        assert!(tw.is_deleting());

        assert_eq!(tw.tick(), DELETE_DELAY);
        assert_eq!(tw.visible(), "ab");
        assert_eq!(tw.tick(), DELETE_DELAY);
        assert_eq!(tw.tick(), EMPTY_PAUSE);
        assert_eq!(tw.visible(), "");
        assert!(!tw.is_deleting());

        assert_eq!(tw.tick(), TYPE_DELAY);
        assert_eq!(tw.visible(), "a");
    }

    #[test]
    fn counts_characters_not_bytes() {
        let mut tw = Typewriter::new("é😔");
        tw.tick();
        assert_eq!(tw.visible(), "é");
        tw.tick();
        assert_eq!(tw.visible(), "é😔");
    }

    #[test]
    fn empty_text_alternates_pauses() {
        let mut tw = Typewriter::new("");
        assert_eq!(tw.tick(), FULL_PAUSE);
        assert_eq!(tw.tick(), EMPTY_PAUSE);
        assert_eq!(tw.visible(), "");
    }
}
