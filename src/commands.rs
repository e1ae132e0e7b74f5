use crate::config::Config;
use crate::health;
use crate::store::ChatStore;
use anyhow::Result;

/// `symptomate history` — print the recent health history cards.
pub async fn show_history(config: &Config) -> Result<()> {
    let client = reqwest::Client::new();
    let entries = match health::fetch_history(&client, &config.api_base_url).await {
        Ok(entries) => entries,
        Err(err) => {
            tracing::error!("error loading health history: {err:#}");
            println!("Unable to load health history.");
            return Ok(());
        }
    };

    let cards = health::recent_cards(&entries);
    if cards.is_empty() {
        println!("No health history yet. Start a chat to see your activity here.");
        return Ok(());
    }

    println!("🤒 Your Health History:");
    println!("{}", "=".repeat(50));

    for card in cards {
        println!("📋 {}", card.label);
        println!("   🕒 {}", card.time);
        println!("   🎯 Severity: {}", card.severity);
        println!();
    }

    Ok(())
}

/// `symptomate clear` — remove the persisted chat history.
pub fn clear_history(config: &Config) -> Result<()> {
    let store = ChatStore::new(config)?;
    store.clear()?;
    println!("✅ Chat Cleared: your chat history has been cleared successfully.");
    Ok(())
}
