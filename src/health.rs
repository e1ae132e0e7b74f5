use anyhow::{Context, Result};
use chrono::{Local, TimeZone};
use serde::Deserialize;

/// One record from `GET /api/history`. Everything is optional; the backend
/// only fills in what it knows.
#[derive(Debug, Clone, Deserialize)]
pub struct HealthEntry {
    /// Epoch seconds.
    pub timestamp: Option<i64>,
    pub triage: Option<TriageSummary>,
    pub user_message: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TriageSummary {
    pub causes: Option<Vec<String>>,
    pub severity: Option<String>,
}

/// Display-ready health history card.
#[derive(Debug, Clone, PartialEq)]
pub struct HealthCard {
    pub label: String,
    pub time: String,
    pub severity: String,
}

/// Number of cards shown on the history surface.
pub const CARD_LIMIT: usize = 5;

/// Fetch the health history from the backend. Read-only.
pub async fn fetch_history(client: &reqwest::Client, base_url: &str) -> Result<Vec<HealthEntry>> {
    let url = format!("{}/api/history", base_url.trim_end_matches('/'));
    let response = client
        .get(&url)
        .send()
        .await
        .context("Failed to reach history endpoint")?
        .error_for_status()
        .context("History endpoint returned an error")?;
    response
        .json()
        .await
        .context("Failed to parse history response")
}

/// Build up to [`CARD_LIMIT`] cards from the raw entries, most recent first.
pub fn recent_cards(entries: &[HealthEntry]) -> Vec<HealthCard> {
    let start = entries.len().saturating_sub(CARD_LIMIT);
    entries[start..].iter().rev().map(card_from_entry).collect()
}

fn card_from_entry(entry: &HealthEntry) -> HealthCard {
    let time = entry
        .timestamp
        .and_then(|ts| Local.timestamp_opt(ts, 0).single())
        .map(|dt| dt.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_else(|| "Unknown time".to_string());

    // Label precedence: first triage cause, then a truncated user message,
    // then the fixed placeholder.
    let first_cause = entry
        .triage
        .as_ref()
        .and_then(|t| t.causes.as_ref())
        .and_then(|causes| causes.first())
        .cloned();
    let label = first_cause
        .or_else(|| {
            entry
                .user_message
                .as_ref()
                .map(|msg| format!("{}...", msg.chars().take(30).collect::<String>()))
        })
        .unwrap_or_else(|| "Symptoms Logged".to_string());

    let severity = entry
        .triage
        .as_ref()
        .and_then(|t| t.severity.clone())
        .unwrap_or_else(|| "low".to_string());

    HealthCard {
        label,
        time,
        severity,
    }
}
