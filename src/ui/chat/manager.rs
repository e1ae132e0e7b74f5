use crate::config::Config;
use crate::events::{Turn, build_request_context};
use crate::reply::{APOLOGY_REPLY, PendingReply, ReplyOutcome, ReplySource};
use crate::store::ChatStore;
use crate::ui::chat::commands::{ParsedCommand, SlashCommand, get_help_text};
use crate::ui::chat::composer::{Composer, ComposerResult};
use crate::ui::chat::transcript::Transcript;
use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout},
};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Default greeting shown on an empty conversation. Not persisted until the
/// user interacts.
pub const GREETING: &str = "👋 Hello! I'm Symptomate. Tell me your symptoms, and I'll help you understand what might be happening.";

const PLACEHOLDER: &str = "Type your symptoms and press Enter...";

/// Actions requested by the chat manager
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatAction {
    None,
    Exit,
}

/// A transient status notice, the toast counterpart.
struct Notice {
    text: String,
    until: Instant,
}

/// Orchestrates the conversation: composer input, the persisted log, the
/// single in-flight request, and the transcript with its reveal.
pub struct ChatManager {
    config: Config,
    store: ChatStore,
    source: Arc<dyn ReplySource>,
    transcript: Transcript,
    composer: Composer,
    pending: Option<PendingReply>,
    notice: Option<Notice>,
}

impl ChatManager {
    pub fn new(config: Config, store: ChatStore, source: Arc<dyn ReplySource>) -> Self {
        let mut transcript = Transcript::new(config.ui.show_timestamps);

        let log = store.load();
        if log.is_empty() {
            transcript.push_instant(&Turn::bot(GREETING));
        } else {
            transcript.replay(&log);
        }

        Self {
            config,
            store,
            source,
            transcript,
            composer: Composer::new(PLACEHOLDER),
            pending: None,
            notice: None,
        }
    }

    /// Handle key input
    pub fn handle_key(&mut self, key: crossterm::event::KeyEvent) -> ChatAction {
        match self.composer.handle_key(key) {
            ComposerResult::Submitted(text) => {
                self.submit(text);
                ChatAction::None
            }
            ComposerResult::Command(command) => self.handle_command(command),
            ComposerResult::None => ChatAction::None,
        }
    }

    /// Submit one user message: persist it, render it instantly, and start
    /// the request. A still-running request or reveal is superseded.
    pub fn submit(&mut self, text: String) {
        let text = text.trim().to_string();
        if text.is_empty() {
            return;
        }

        if let Some(prev) = self.pending.take() {
            prev.abort();
            tracing::debug!("superseding in-flight request");
        }
        self.transcript.finalize_reveal();

        let turn = Turn::user(text.as_str());
        if let Err(err) = self.store.append(&turn) {
            tracing::error!("failed to persist user turn: {err:#}");
        }
        self.transcript.push_instant(&turn);

        // Context is the log minus the turn just appended; the backend gets
        // that turn in the message field.
        let context = build_request_context(&self.store.load());

        tracing::info!(source = self.source.name(), "sending message to backend");
        self.transcript.show_pending();
        self.pending = Some(PendingReply::spawn(
            Arc::clone(&self.source),
            text,
            context,
            Duration::from_secs(self.config.request_timeout_secs),
        ));
    }

    /// Drive animation and poll the in-flight request. Called from the main
    /// loop on every tick.
    pub fn on_tick(&mut self, now: Instant) {
        self.transcript.advance_reveal(now);

        if let Some(notice) = &self.notice {
            if now >= notice.until {
                self.notice = None;
            }
        }

        let Some(pending) = &mut self.pending else {
            return;
        };
        let Some(outcome) = pending.try_outcome() else {
            return;
        };
        self.pending = None;
        self.transcript.hide_pending();

        match outcome {
            ReplyOutcome::Success(bot) => {
                if bot.triage_stage() == Some("triage") {
                    tracing::info!(triage = ?bot.triage, "triage complete");
                }
                let turn = Turn::bot(bot.reply.as_str());
                if let Err(err) = self.store.append(&turn) {
                    tracing::error!("failed to persist bot turn: {err:#}");
                }
                self.transcript.begin_reveal(
                    &turn,
                    Duration::from_millis(self.config.typing_interval_ms),
                    now,
                );
            }
            ReplyOutcome::Failed(detail) => {
                tracing::error!("ai response failed: {detail}");
                self.push_apology();
            }
            ReplyOutcome::TimedOut => {
                tracing::error!(
                    "ai response timed out after {}s",
                    self.config.request_timeout_secs
                );
                self.push_apology();
            }
        }
    }

    /// Failure and timeout both land as the one fixed apology turn, rendered
    /// instantly rather than revealed.
    fn push_apology(&mut self) {
        let turn = Turn::bot(APOLOGY_REPLY);
        if let Err(err) = self.store.append(&turn) {
            tracing::error!("failed to persist apology turn: {err:#}");
        }
        self.transcript.push_instant(&turn);
    }

    /// Handle slash commands
    pub fn handle_command(&mut self, command: ParsedCommand) -> ChatAction {
        match command.command {
            SlashCommand::Clear => {
                if let Err(err) = self.store.clear() {
                    tracing::error!("failed to clear chat history: {err:#}");
                }
                self.transcript.clear();
                self.transcript.push_instant(&Turn::bot(GREETING));
                self.flash_notice("✅ Chat history cleared");
                ChatAction::None
            }
            SlashCommand::Help => {
                // Help is display-only, never persisted.
                self.transcript.push_instant(&Turn::bot(get_help_text()));
                ChatAction::None
            }
            SlashCommand::Bye => ChatAction::Exit,
        }
    }

    fn flash_notice(&mut self, text: &str) {
        self.notice = Some(Notice {
            text: text.to_string(),
            until: Instant::now() + Duration::from_secs(self.config.ui.notice_duration_secs),
        });
    }

    pub fn draw(&mut self, frame: &mut Frame) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Min(10),   // Transcript
                Constraint::Length(3), // Composer
            ])
            .split(frame.size());

        self.transcript
            .set_notice(self.notice.as_ref().map(|n| n.text.clone()));
        frame.render_widget(self.transcript.clone(), chunks[0]);
        frame.render_widget(self.composer.clone(), chunks[1]);
    }

    #[cfg(test)]
    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    #[cfg(test)]
    pub fn is_sending(&self) -> bool {
        self.pending.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::Sender;
    use crate::reply::{BotReply, FALLBACK_REPLY, MockReplySource};
    use crate::store::HISTORY_FILE;
    use anyhow::Result;
    use async_trait::async_trait;
    use tempfile::TempDir;

    struct BrokenSource;

    #[async_trait]
    impl ReplySource for BrokenSource {
        async fn reply(
            &self,
            _message: &str,
            _history: &[crate::events::ContextMessage],
        ) -> Result<BotReply> {
            Err(anyhow::anyhow!("HTTP 502: bad gateway"))
        }

        fn name(&self) -> &'static str {
            "broken"
        }
    }

    struct EmptyReplySource;

    #[async_trait]
    impl ReplySource for EmptyReplySource {
        async fn reply(
            &self,
            _message: &str,
            _history: &[crate::events::ContextMessage],
        ) -> Result<BotReply> {
            Ok(BotReply {
                reply: FALLBACK_REPLY.to_string(),
                triage: None,
            })
        }

        fn name(&self) -> &'static str {
            "empty"
        }
    }

    fn manager_with(dir: &TempDir, source: Arc<dyn ReplySource>) -> ChatManager {
        let store = ChatStore::with_path(dir.path().join(HISTORY_FILE));
        ChatManager::new(Config::default(), store, source)
    }

    fn store_of(dir: &TempDir) -> ChatStore {
        ChatStore::with_path(dir.path().join(HISTORY_FILE))
    }

    async fn settle(manager: &mut ChatManager) {
        for _ in 0..500 {
            manager.on_tick(Instant::now());
            if !manager.is_sending() {
                return;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        panic!("request never settled");
    }

    #[tokio::test]
    async fn empty_log_shows_unpersisted_greeting() {
        let dir = TempDir::new().unwrap();
        let manager = manager_with(&dir, Arc::new(MockReplySource::with_delay(Duration::ZERO)));

        let messages = manager.transcript().messages();
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].message, GREETING);
        assert!(store_of(&dir).load().is_empty());
    }

    #[tokio::test]
    async fn existing_log_is_replayed_without_greeting() {
        let dir = TempDir::new().unwrap();
        let store = store_of(&dir);
        store.append(&Turn::user("I have a rash")).unwrap();
        store.append(&Turn::bot("Where is the rash?")).unwrap();

        let manager = manager_with(&dir, Arc::new(MockReplySource::with_delay(Duration::ZERO)));
        let messages = manager.transcript().messages();
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].message, "I have a rash");
    }

    #[tokio::test]
    async fn whitespace_submit_sends_nothing_and_appends_nothing() {
        let dir = TempDir::new().unwrap();
        let mut manager =
            manager_with(&dir, Arc::new(MockReplySource::with_delay(Duration::ZERO)));

        manager.submit("   ".to_string());
        assert!(!manager.is_sending());
        assert!(!manager.transcript().pending_shown());
        assert!(store_of(&dir).load().is_empty());
    }

    #[tokio::test]
    async fn successful_send_appends_both_turns_and_starts_a_reveal() {
        let dir = TempDir::new().unwrap();
        let mut manager =
            manager_with(&dir, Arc::new(MockReplySource::with_delay(Duration::ZERO)));

        manager.submit("I have a cough".to_string());
        assert!(manager.is_sending());
        assert!(manager.transcript().pending_shown());

        settle(&mut manager).await;
        assert!(!manager.transcript().pending_shown());

        let log = store_of(&dir).load();
        assert_eq!(log.len(), 2);
        assert_eq!(log[0].sender, Sender::User);
        assert_eq!(log[0].message, "I have a cough");
        assert_eq!(log[1].sender, Sender::Bot);
        assert!(log[1].message.to_lowercase().contains("cough"));
    }

    #[tokio::test]
    async fn failed_send_appends_the_fixed_apology_instantly() {
        let dir = TempDir::new().unwrap();
        let mut manager = manager_with(&dir, Arc::new(BrokenSource));

        manager.submit("I have a fever".to_string());
        settle(&mut manager).await;

        let log = store_of(&dir).load();
        assert_eq!(log.len(), 2);
        assert_eq!(log[1].message, APOLOGY_REPLY);

        // Apologies render instantly; nothing is left revealing.
        assert!(!manager.transcript().is_revealing());
        assert!(!manager.transcript().pending_shown());
        let last = manager.transcript().messages().last().unwrap();
        assert_eq!(last.message, APOLOGY_REPLY);
    }

    #[tokio::test]
    async fn absent_reply_field_surfaces_the_fallback_string() {
        let dir = TempDir::new().unwrap();
        let mut manager = manager_with(&dir, Arc::new(EmptyReplySource));

        manager.submit("gibberish".to_string());
        settle(&mut manager).await;

        let log = store_of(&dir).load();
        assert_eq!(log[1].message, FALLBACK_REPLY);
    }

    #[tokio::test]
    async fn user_turn_survives_a_failed_request() {
        let dir = TempDir::new().unwrap();
        let mut manager = manager_with(&dir, Arc::new(BrokenSource));

        manager.submit("my knee hurts".to_string());
        settle(&mut manager).await;

        let log = store_of(&dir).load();
        assert_eq!(log[0].message, "my knee hurts");
    }

    #[tokio::test]
    async fn clear_resets_store_and_shows_greeting_only() {
        let dir = TempDir::new().unwrap();
        let mut manager =
            manager_with(&dir, Arc::new(MockReplySource::with_delay(Duration::ZERO)));

        manager.submit("I feel dizzy".to_string());
        settle(&mut manager).await;
        assert!(!store_of(&dir).load().is_empty());

        let action = manager.handle_command(ParsedCommand {
            command: SlashCommand::Clear,
            argument: None,
        });
        assert_eq!(action, ChatAction::None);

        assert!(store_of(&dir).load().is_empty());
        let messages = manager.transcript().messages();
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].message, GREETING);
    }

    #[tokio::test]
    async fn bye_requests_exit() {
        let dir = TempDir::new().unwrap();
        let mut manager =
            manager_with(&dir, Arc::new(MockReplySource::with_delay(Duration::ZERO)));
        let action = manager.handle_command(ParsedCommand {
            command: SlashCommand::Bye,
            argument: None,
        });
        assert_eq!(action, ChatAction::Exit);
    }

    #[tokio::test]
    async fn new_submit_supersedes_a_slow_request() {
        let dir = TempDir::new().unwrap();
        let mut manager = manager_with(
            &dir,
            Arc::new(MockReplySource::with_delay(Duration::from_secs(60))),
        );

        manager.submit("first message".to_string());
        assert!(manager.is_sending());

        // The slow first request is aborted, and only the second resolves.
        manager.submit("second message".to_string());
        assert!(manager.is_sending());

        let log = store_of(&dir).load();
        assert_eq!(log.len(), 2);
        assert_eq!(log[0].message, "first message");
        assert_eq!(log[1].message, "second message");
    }
}
