use anyhow::{Context, Result};
use std::fs;
use std::path::PathBuf;

use crate::config::Config;
use crate::events::Turn;

/// File name of the persisted conversation log inside the data dir.
pub const HISTORY_FILE: &str = "chat_history.json";

/// Append-only store for the conversation log.
///
/// The whole log lives in one JSON blob that is fully read and fully
/// rewritten on every append. That keeps the contract trivial at the cost of
/// an O(n) rewrite per message, which is fine for conversations of tens of
/// turns. An absent or corrupt blob is treated as an empty log rather than an
/// error; the user is never shown a data-loss warning.
pub struct ChatStore {
    path: PathBuf,
}

impl ChatStore {
    pub fn new(config: &Config) -> Result<Self> {
        fs::create_dir_all(&config.data_dir)
            .context("Failed to create .symptomate directory")?;
        Ok(Self {
            path: config.data_dir.join(HISTORY_FILE),
        })
    }

    /// Store rooted at an explicit file path.
    #[allow(dead_code)]
    pub fn with_path(path: PathBuf) -> Self {
        Self { path }
    }

    /// Read the full log. Missing file or unparseable content comes back as
    /// an empty log.
    pub fn load(&self) -> Vec<Turn> {
        let Ok(content) = fs::read_to_string(&self.path) else {
            return Vec::new();
        };
        match serde_json::from_str(&content) {
            Ok(log) => log,
            Err(err) => {
                tracing::warn!("discarding unreadable chat history: {err}");
                Vec::new()
            }
        }
    }

    /// Push one turn and rewrite the whole blob.
    pub fn append(&self, turn: &Turn) -> Result<()> {
        let mut log = self.load();
        log.push(turn.clone());
        let content =
            serde_json::to_string_pretty(&log).context("Failed to serialize chat history")?;
        fs::write(&self.path, content).context("Failed to write chat history")?;
        Ok(())
    }

    /// Remove the persisted log entirely. The in-memory display is the
    /// caller's to refresh.
    pub fn clear(&self) -> Result<()> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err).context("Failed to remove chat history"),
        }
    }
}
