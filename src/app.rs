use crate::config::Config;
use crate::reply::{MockReplySource, NetworkReplySource, ReplySource};
use crate::store::ChatStore;
use crate::ui::chat::{ChatAction, ChatManager};
use anyhow::{Context, Result};
use crossterm::event::{self, Event};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use std::io;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Restores the terminal even when the loop exits via `?`.
struct TerminalGuard;

impl TerminalGuard {
    fn enter() -> Result<Self> {
        enable_raw_mode().context("Failed to enable raw mode")?;
        execute!(io::stdout(), EnterAlternateScreen)
            .context("Failed to enter alternate screen")?;
        Ok(Self)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
    }
}

/// Run the chat TUI until the user exits.
pub async fn run(config: Config, mock: bool) -> Result<()> {
    let store = ChatStore::new(&config)?;
    let source: Arc<dyn ReplySource> = if mock {
        Arc::new(MockReplySource::new())
    } else {
        Arc::new(NetworkReplySource::new(&config))
    };
    tracing::info!(source = source.name(), "starting chat session");

    let mut manager = ChatManager::new(config, store, source);

    let _guard = TerminalGuard::enter()?;
    let backend = CrosstermBackend::new(io::stdout());
    let mut terminal = Terminal::new(backend).context("Failed to create terminal")?;

    // One cooperative loop: tick animations, poll the in-flight request,
    // redraw, then wait briefly for input.
    loop {
        manager.on_tick(Instant::now());
        terminal
            .draw(|frame| manager.draw(frame))
            .context("Failed to draw frame")?;

        if event::poll(Duration::from_millis(30)).context("Failed to poll for input")? {
            match event::read().context("Failed to read input event")? {
                Event::Key(key) => {
                    if manager.handle_key(key) == ChatAction::Exit {
                        break;
                    }
                }
                Event::Resize(..) => {}
                _ => {}
            }
        }
    }

    tracing::info!("chat session ended");
    Ok(())
}
