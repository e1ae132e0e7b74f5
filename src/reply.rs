use crate::config::Config;
use crate::events::ContextMessage;
use crate::mock;
use anyhow::{Result, anyhow};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tokio::time::Duration;

/// Shown when the backend answers 200 but the `reply` field is absent.
pub const FALLBACK_REPLY: &str = "Sorry, I didn't understand that.";

/// The one fixed user-facing turn for every failure and timeout.
pub const APOLOGY_REPLY: &str =
    "I'm sorry, I'm having trouble connecting right now. Please try again later.";

/// A produced assistant reply plus the opaque triage side channel.
#[derive(Debug, Clone)]
pub struct BotReply {
    pub reply: String,
    pub triage: Option<serde_json::Value>,
}

impl BotReply {
    /// Triage stage, if the backend attached one. Logged, never required.
    pub fn triage_stage(&self) -> Option<&str> {
        self.triage.as_ref()?.get("stage")?.as_str()
    }
}

/// Request body for `POST /api/ai-response`.
#[derive(Debug, Serialize)]
struct AiRequest<'a> {
    message: &'a str,
    history: &'a [ContextMessage],
}

/// Response body of `POST /api/ai-response`. `triage` is pass-through data.
#[derive(Debug, Deserialize)]
struct AiResponse {
    reply: Option<String>,
    triage: Option<serde_json::Value>,
}

/// The pluggable mechanism that produces the assistant's next turn.
///
/// Selected once at composition time; the rest of the client never knows
/// whether it is talking to the backend or to the offline responder.
#[async_trait]
pub trait ReplySource: Send + Sync {
    async fn reply(&self, message: &str, history: &[ContextMessage]) -> Result<BotReply>;

    fn name(&self) -> &'static str;
}

/// Reply source backed by the symptom-checking backend.
pub struct NetworkReplySource {
    client: reqwest::Client,
    base_url: String,
}

impl NetworkReplySource {
    pub fn new(config: &Config) -> Self {
        let client = reqwest::Client::builder()
            .build()
            .expect("Failed to create HTTP client");
        Self {
            client,
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
        }
    }
}

#[async_trait]
impl ReplySource for NetworkReplySource {
    async fn reply(&self, message: &str, history: &[ContextMessage]) -> Result<BotReply> {
        let url = format!("{}/api/ai-response", self.base_url);
        let payload = AiRequest { message, history };

        let response = self.client.post(&url).json(&payload).send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<no body>".to_string());
            return Err(anyhow!("HTTP {status}: {}", snippet(&body)));
        }

        let body = response.text().await.unwrap_or_default();
        let parsed: AiResponse = serde_json::from_str(&body)
            .map_err(|err| anyhow!("invalid JSON response ({err}): {}", snippet(&body)))?;

        Ok(BotReply {
            reply: parsed.reply.unwrap_or_else(|| FALLBACK_REPLY.to_string()),
            triage: parsed.triage,
        })
    }

    fn name(&self) -> &'static str {
        "network"
    }
}

/// Offline reply source backed by the keyword responder.
pub struct MockReplySource {
    /// Simulated backend latency before resolving.
    delay: Duration,
}

impl MockReplySource {
    pub fn new() -> Self {
        Self {
            delay: Duration::from_millis(1500),
        }
    }

    #[cfg(test)]
    pub fn with_delay(delay: Duration) -> Self {
        Self { delay }
    }
}

#[async_trait]
impl ReplySource for MockReplySource {
    async fn reply(&self, message: &str, _history: &[ContextMessage]) -> Result<BotReply> {
        tokio::time::sleep(self.delay).await;
        Ok(BotReply {
            reply: mock::respond(message),
            triage: None,
        })
    }

    fn name(&self) -> &'static str {
        "mock"
    }
}

/// How one send resolved. `Failed` and `TimedOut` are logged separately but
/// surface identically to the user.
#[derive(Debug)]
pub enum ReplyOutcome {
    Success(BotReply),
    Failed(String),
    TimedOut,
}

/// The single in-flight request.
///
/// Owns the spawned task so a superseding send can abort it; the timeout
/// bound cancels the underlying HTTP future when it expires.
pub struct PendingReply {
    rx: oneshot::Receiver<ReplyOutcome>,
    handle: JoinHandle<()>,
}

impl PendingReply {
    pub fn spawn(
        source: Arc<dyn ReplySource>,
        message: String,
        history: Vec<ContextMessage>,
        deadline: Duration,
    ) -> Self {
        let (tx, rx) = oneshot::channel();
        let handle = tokio::spawn(async move {
            let outcome = match tokio::time::timeout(
                deadline,
                source.reply(&message, &history),
            )
            .await
            {
                Ok(Ok(reply)) => ReplyOutcome::Success(reply),
                Ok(Err(err)) => ReplyOutcome::Failed(format!("{err:#}")),
                Err(_) => ReplyOutcome::TimedOut,
            };
            let _ = tx.send(outcome);
        });
        Self { rx, handle }
    }

    /// Non-blocking poll, called from the UI tick loop.
    pub fn try_outcome(&mut self) -> Option<ReplyOutcome> {
        match self.rx.try_recv() {
            Ok(outcome) => Some(outcome),
            Err(oneshot::error::TryRecvError::Empty) => None,
            Err(oneshot::error::TryRecvError::Closed) => {
                Some(ReplyOutcome::Failed("reply task dropped".to_string()))
            }
        }
    }

    /// Abort the underlying task; used when a new send supersedes this one.
    pub fn abort(&self) {
        self.handle.abort();
    }
}

fn snippet(body: &str) -> &str {
    let end = body
        .char_indices()
        .nth(200)
        .map(|(i, _)| i)
        .unwrap_or(body.len());
    &body[..end]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_reply_field_falls_back_to_generic_string() {
        let parsed: AiResponse =
            serde_json::from_str(r#"{"triage": {"stage": "triage"}}"#).unwrap();
        let reply = BotReply {
            reply: parsed.reply.unwrap_or_else(|| FALLBACK_REPLY.to_string()),
            triage: parsed.triage,
        };
        assert_eq!(reply.reply, FALLBACK_REPLY);
        assert_eq!(reply.triage_stage(), Some("triage"));
    }

    #[test]
    fn unparseable_body_is_a_parse_error() {
        assert!(serde_json::from_str::<AiResponse>("<html>oops</html>").is_err());
    }

    #[test]
    fn triage_passes_through_untouched() {
        let parsed: AiResponse = serde_json::from_str(
            r#"{"reply": "ok", "triage": {"stage": "triage", "severity": "low", "causes": ["flu"]}}"#,
        )
        .unwrap();
        let triage = parsed.triage.unwrap();
        assert_eq!(triage["severity"], "low");
        assert_eq!(triage["causes"][0], "flu");
    }

    #[test]
    fn request_payload_has_message_and_history() {
        use crate::events::{Role, ContextMessage};
        let history = vec![ContextMessage {
            role: Role::User,
            content: "earlier".into(),
        }];
        let payload = AiRequest {
            message: "now",
            history: &history,
        };
        let json = serde_json::to_value(&payload).unwrap();
        assert_eq!(json["message"], "now");
        assert_eq!(json["history"][0]["role"], "user");
        assert_eq!(json["history"][0]["content"], "earlier");
    }

    #[tokio::test]
    async fn mock_source_answers_from_keyword_table() {
        let source = MockReplySource::with_delay(Duration::ZERO);
        let reply = source.reply("I have a cough", &[]).await.unwrap();
        assert!(reply.reply.contains("cough"));
        assert!(reply.triage.is_none());
    }

    #[tokio::test]
    async fn overdue_request_resolves_to_timed_out() {
        struct NeverSource;

        #[async_trait]
        impl ReplySource for NeverSource {
            async fn reply(
                &self,
                _message: &str,
                _history: &[ContextMessage],
            ) -> Result<BotReply> {
                tokio::time::sleep(Duration::from_secs(3600)).await;
                unreachable!()
            }

            fn name(&self) -> &'static str {
                "never"
            }
        }

        let mut pending = PendingReply::spawn(
            Arc::new(NeverSource),
            "hello".to_string(),
            Vec::new(),
            Duration::from_millis(20),
        );

        let outcome = loop {
            if let Some(outcome) = pending.try_outcome() {
                break outcome;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        };
        assert!(matches!(outcome, ReplyOutcome::TimedOut));
    }

    #[tokio::test]
    async fn source_error_resolves_to_failed() {
        struct BrokenSource;

        #[async_trait]
        impl ReplySource for BrokenSource {
            async fn reply(
                &self,
                _message: &str,
                _history: &[ContextMessage],
            ) -> Result<BotReply> {
                Err(anyhow!("HTTP 500: internal error"))
            }

            fn name(&self) -> &'static str {
                "broken"
            }
        }

        let mut pending = PendingReply::spawn(
            Arc::new(BrokenSource),
            "hello".to_string(),
            Vec::new(),
            Duration::from_secs(1),
        );

        let outcome = loop {
            if let Some(outcome) = pending.try_outcome() {
                break outcome;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        };
        match outcome {
            ReplyOutcome::Failed(detail) => assert!(detail.contains("HTTP 500")),
            other => panic!("expected Failed, got {other:?}"),
        }
    }
}
