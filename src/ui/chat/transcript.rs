//! Conversation transcript display component

use crate::events::{Sender, Turn};
use crate::ui::chat::reveal::RevealState;
use chrono::{DateTime, Local};
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Widget},
};
use std::time::{Duration, Instant};

/// A finalized bubble on the display surface.
#[derive(Debug, Clone, PartialEq)]
pub struct DisplayTurn {
    pub message: String,
    pub sender: Sender,
    pub time: String,
}

impl DisplayTurn {
    fn from_turn(turn: &Turn) -> Self {
        let time = DateTime::parse_from_rfc3339(&turn.timestamp)
            .map(|dt| dt.with_timezone(&Local).format("%H:%M:%S").to_string())
            .unwrap_or_default();
        Self {
            message: turn.message.clone(),
            sender: turn.sender,
            time,
        }
    }
}

/// Conversation transcript: finalized bubbles, at most one in-progress
/// reveal, and the transient composing indicator. Rendering is anchored to
/// the bottom, which is the auto-scroll behavior.
#[derive(Clone)]
pub struct Transcript {
    messages: Vec<DisplayTurn>,
    revealing: Option<(DisplayTurn, RevealState)>,
    pending: bool,
    show_timestamps: bool,
    notice: Option<String>,
}

impl Transcript {
    pub fn new(show_timestamps: bool) -> Self {
        Self {
            messages: Vec::new(),
            revealing: None,
            pending: false,
            show_timestamps,
            notice: None,
        }
    }

    /// Materialize a turn instantly.
    pub fn push_instant(&mut self, turn: &Turn) {
        self.messages.push(DisplayTurn::from_turn(turn));
    }

    /// Clear the surface and instant-render every turn in order. History
    /// replay never animates, bot turns included.
    pub fn replay(&mut self, log: &[Turn]) {
        self.clear();
        for turn in log {
            self.push_instant(turn);
        }
    }

    pub fn clear(&mut self) {
        self.messages.clear();
        self.revealing = None;
    }

    /// Start revealing a bot turn one character at a time. Any reveal still
    /// in progress is finalized first.
    pub fn begin_reveal(&mut self, turn: &Turn, interval: Duration, now: Instant) {
        self.finalize_reveal();
        let state = RevealState::new(&turn.message, interval, now);
        self.revealing = Some((DisplayTurn::from_turn(turn), state));
    }

    /// Advance the running reveal; a completed reveal becomes a finalized
    /// bubble with its line breaks rendered properly.
    pub fn advance_reveal(&mut self, now: Instant) {
        if let Some((_, state)) = &mut self.revealing {
            state.advance(now);
            if state.is_done() {
                self.finalize_reveal();
            }
        }
    }

    /// Complete the running reveal instantly. No-op without one.
    pub fn finalize_reveal(&mut self) {
        if let Some((turn, state)) = self.revealing.take() {
            self.messages.push(DisplayTurn {
                message: state.full_text(),
                ..turn
            });
        }
    }

    #[allow(dead_code)]
    pub fn is_revealing(&self) -> bool {
        self.revealing.is_some()
    }

    /// Show the composing indicator.
    pub fn show_pending(&mut self) {
        self.pending = true;
    }

    /// Remove the composing indicator. No-op when none is shown.
    pub fn hide_pending(&mut self) {
        self.pending = false;
    }

    #[allow(dead_code)]
    pub fn pending_shown(&self) -> bool {
        self.pending
    }

    pub fn set_notice(&mut self, notice: Option<String>) {
        self.notice = notice;
    }

    #[allow(dead_code)]
    pub fn messages(&self) -> &[DisplayTurn] {
        &self.messages
    }
}

impl Widget for Transcript {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let title = self
            .notice
            .clone()
            .unwrap_or_else(|| "💬 Symptomate".to_string());
        let block = Block::default().borders(Borders::ALL).title(title);
        let inner_area = block.inner(area);
        block.render(area, buf);

        let mut all_lines: Vec<Line> = Vec::new();
        for message in &self.messages {
            all_lines.append(&mut self.render_message(message, inner_area.width));
            all_lines.push(Line::from(vec![Span::raw("")]));
        }

        if let Some((turn, state)) = &self.revealing {
            all_lines.append(&mut self.render_revealing(turn, &state.visible(), inner_area.width));
        }

        if self.pending {
            all_lines.push(pending_indicator_line());
        }

        // Show the bottom-most lines that fit; this is the auto-scroll.
        let height = inner_area.height as usize;
        let total = all_lines.len();
        let start = total.saturating_sub(height);
        for (i, line) in all_lines[start..].iter().enumerate() {
            buf.set_line(inner_area.x, inner_area.y + i as u16, line, inner_area.width);
        }
    }
}

impl Transcript {
    /// Render a finalized bubble: avatar header, then the content with each
    /// line break honored.
    fn render_message(&self, message: &DisplayTurn, width: u16) -> Vec<Line> {
        let mut lines = vec![self.header_line(message.sender, &message.time)];
        for paragraph in message.message.split('\n') {
            for content_line in wrap_text(paragraph, width.saturating_sub(2) as usize) {
                lines.push(Line::from(vec![
                    Span::raw("  "),
                    Span::styled(content_line, content_style(message.sender)),
                ]));
            }
        }
        lines
    }

    /// Render the partial reveal. The intermediate text flows as one run;
    /// line breaks are only honored once the reveal finalizes.
    fn render_revealing(&self, turn: &DisplayTurn, visible: &str, width: u16) -> Vec<Line> {
        let mut lines = vec![self.header_line(turn.sender, &turn.time)];
        let content_lines = wrap_text(visible, width.saturating_sub(2) as usize);
        let last = content_lines.len().saturating_sub(1);
        for (i, content_line) in content_lines.into_iter().enumerate() {
            let cursor = if i == last { "▋" } else { "" };
            lines.push(Line::from(vec![
                Span::raw("  "),
                Span::styled(content_line, content_style(turn.sender)),
                Span::styled(cursor, Style::default().fg(Color::Yellow)),
            ]));
        }
        lines
    }

    fn header_line(&self, sender: Sender, time: &str) -> Line<'static> {
        let avatar = match sender {
            Sender::User => "👤",
            Sender::Bot => "🩺",
        };
        let header = if self.show_timestamps {
            format!("{} {} {}", avatar, time, "─".repeat(20))
        } else {
            format!("{} {}", avatar, "─".repeat(20))
        };
        Line::from(vec![Span::styled(
            header,
            Style::default().fg(Color::DarkGray),
        )])
    }
}

fn content_style(sender: Sender) -> Style {
    match sender {
        Sender::User => Style::default().fg(Color::Blue),
        Sender::Bot => Style::default().fg(Color::Green),
    }
}

/// The animated "composing" bubble shown while a request is in flight.
fn pending_indicator_line() -> Line<'static> {
    let dots = match (std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis()
        / 300)
        % 4
    {
        0 => ".",
        1 => "..",
        2 => "...",
        _ => "   ",
    };
    Line::from(vec![
        Span::styled("🩺 ", Style::default().fg(Color::Green)),
        Span::styled("Symptomate is thinking", Style::default().fg(Color::Green)),
        Span::styled(dots.to_string(), Style::default().fg(Color::Yellow)),
    ])
}

/// Wrap text to fit within the given width
fn wrap_text(text: &str, width: usize) -> Vec<String> {
    if width == 0 {
        return vec![text.to_string()];
    }

    let mut lines = Vec::new();
    let mut current_line = String::new();

    for word in text.split_whitespace() {
        if current_line.chars().count() + word.chars().count() + 1 <= width {
            if !current_line.is_empty() {
                current_line.push(' ');
            }
            current_line.push_str(word);
        } else {
            if !current_line.is_empty() {
                lines.push(current_line);
                current_line = String::new();
            }
            current_line.push_str(word);
        }
    }

    if !current_line.is_empty() {
        lines.push(current_line);
    }

    if lines.is_empty() {
        lines.push(String::new());
    }

    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    const TICK: Duration = Duration::from_millis(30);

    fn log() -> Vec<Turn> {
        vec![
            Turn::bot("Hello!"),
            Turn::user("I have a cough"),
            Turn::bot("How long have you had it?"),
        ]
    }

    #[test]
    fn replay_renders_every_turn_in_order_instantly() {
        let mut transcript = Transcript::new(true);
        transcript.replay(&log());

        let senders: Vec<_> = transcript.messages().iter().map(|m| m.sender).collect();
        assert_eq!(senders, [Sender::Bot, Sender::User, Sender::Bot]);
        assert!(!transcript.is_revealing());
    }

    #[test]
    fn replaying_twice_produces_the_same_surface() {
        let log = log();
        let mut transcript = Transcript::new(true);
        transcript.replay(&log);
        let first = transcript.messages().to_vec();
        transcript.replay(&log);
        assert_eq!(transcript.messages(), first.as_slice());
    }

    #[test]
    fn reveal_finalizes_into_a_message() {
        let start = Instant::now();
        let mut transcript = Transcript::new(true);
        transcript.begin_reveal(&Turn::bot("hi\nthere"), TICK, start);
        assert!(transcript.is_revealing());
        assert!(transcript.messages().is_empty());

        transcript.advance_reveal(start + Duration::from_secs(10));
        assert!(!transcript.is_revealing());
        assert_eq!(transcript.messages().len(), 1);
        assert_eq!(transcript.messages()[0].message, "hi\nthere");
    }

    #[test]
    fn finalize_reveal_without_one_is_a_no_op() {
        let mut transcript = Transcript::new(true);
        transcript.finalize_reveal();
        assert!(transcript.messages().is_empty());
    }

    #[test]
    fn new_reveal_finishes_the_previous_one_first() {
        let start = Instant::now();
        let mut transcript = Transcript::new(true);
        transcript.begin_reveal(&Turn::bot("first reply"), TICK, start);
        transcript.begin_reveal(&Turn::bot("second reply"), TICK, start);

        // The first reveal landed as a complete message, not a truncated one.
        assert_eq!(transcript.messages().len(), 1);
        assert_eq!(transcript.messages()[0].message, "first reply");
        assert!(transcript.is_revealing());
    }

    #[test]
    fn hide_pending_without_indicator_is_a_no_op() {
        let mut transcript = Transcript::new(true);
        transcript.hide_pending();
        assert!(!transcript.pending_shown());

        transcript.show_pending();
        assert!(transcript.pending_shown());
        transcript.hide_pending();
        assert!(!transcript.pending_shown());
    }

    #[test]
    fn wrap_text_splits_on_word_boundaries() {
        let wrapped = wrap_text("one two three four", 9);
        assert_eq!(wrapped, ["one two", "three", "four"]);
    }

    #[test]
    fn wrap_text_of_empty_input_keeps_one_blank_line() {
        assert_eq!(wrap_text("", 10), [""]);
    }
}
