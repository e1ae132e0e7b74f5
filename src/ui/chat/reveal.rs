use std::time::{Duration, Instant};

/// Progressive character-by-character reveal of one bot reply.
///
/// Exactly one reveal can run at a time; a superseding send finishes it
/// instantly instead of leaving it ticking in the background.
#[derive(Debug, Clone)]
pub struct RevealState {
    chars: Vec<char>,
    shown: usize,
    interval: Duration,
    last_tick: Instant,
}

impl RevealState {
    pub fn new(text: &str, interval: Duration, now: Instant) -> Self {
        Self {
            chars: text.chars().collect(),
            shown: 0,
            interval,
            last_tick: now,
        }
    }

    /// Advance the reveal by however many intervals have elapsed. Returns
    /// true when any new characters became visible.
    pub fn advance(&mut self, now: Instant) -> bool {
        if self.is_done() {
            return false;
        }
        if self.interval.is_zero() {
            self.shown = self.chars.len();
            return true;
        }

        let elapsed = now.saturating_duration_since(self.last_tick);
        let steps = (elapsed.as_millis() / self.interval.as_millis()) as usize;
        if steps == 0 {
            return false;
        }

        self.shown = (self.shown + steps).min(self.chars.len());
        self.last_tick += self.interval * steps as u32;
        true
    }

    /// The currently visible prefix.
    pub fn visible(&self) -> String {
        self.chars[..self.shown].iter().collect()
    }

    pub fn is_done(&self) -> bool {
        self.shown >= self.chars.len()
    }

    /// Jump straight to the end.
    pub fn finish(&mut self) {
        self.shown = self.chars.len();
    }

    pub fn full_text(&self) -> String {
        self.chars.iter().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TICK: Duration = Duration::from_millis(30);

    #[test]
    fn starts_empty() {
        let reveal = RevealState::new("hello", TICK, Instant::now());
        assert_eq!(reveal.visible(), "");
        assert!(!reveal.is_done());
    }

    #[test]
    fn reveals_one_char_per_interval() {
        let start = Instant::now();
        let mut reveal = RevealState::new("hello", TICK, start);

        assert!(!reveal.advance(start + Duration::from_millis(10)));
        assert_eq!(reveal.visible(), "");

        assert!(reveal.advance(start + Duration::from_millis(35)));
        assert_eq!(reveal.visible(), "h");

        assert!(reveal.advance(start + Duration::from_millis(65)));
        assert_eq!(reveal.visible(), "he");
    }

    #[test]
    fn catches_up_over_a_long_gap() {
        let start = Instant::now();
        let mut reveal = RevealState::new("hello", TICK, start);

        reveal.advance(start + Duration::from_millis(95));
        assert_eq!(reveal.visible(), "hel");

        reveal.advance(start + Duration::from_secs(10));
        assert!(reveal.is_done());
        assert_eq!(reveal.visible(), "hello");
    }

    #[test]
    fn counts_characters_not_bytes() {
        let start = Instant::now();
        let mut reveal = RevealState::new("héllo 🤒", TICK, start);
        reveal.advance(start + Duration::from_millis(31));
        assert_eq!(reveal.visible(), "h");
        reveal.advance(start + Duration::from_millis(61));
        assert_eq!(reveal.visible(), "hé");
    }

    #[test]
    fn finish_jumps_to_full_text() {
        let mut reveal = RevealState::new("line one\nline two", TICK, Instant::now());
        reveal.finish();
        assert!(reveal.is_done());
        assert_eq!(reveal.visible(), "line one\nline two");
        assert_eq!(reveal.full_text(), "line one\nline two");
    }

    #[test]
    fn done_reveal_stops_advancing() {
        let start = Instant::now();
        let mut reveal = RevealState::new("hi", TICK, start);
        reveal.finish();
        assert!(!reveal.advance(start + Duration::from_secs(1)));
    }
}
