//! Render reply use case
//!
//! Expands a reply template for delivery. Expansion failures never drop the
//! reply: the unprocessed messages are sent instead and the error is kept
//! for the message log.

use serde::Serialize;
use serde_json::{Value, json};
use tracing::{debug, error};

use ile_domain::{AutoReply, ReplyContent, TenantId, unprocessed_messages};

use crate::ApplicationResult;
use crate::ile::TemplateEngine;
use crate::ports::{ImageRepository, RandomSource, RuleTableRepository};

/// Log line used when a reply has no text messages.
pub const JSON_MESSAGE_SUMMARY: &str = "(JSON message)";

/// Messages ready to hand to the outbound sender.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderedReply {
    /// Expanded messages, or the unprocessed ones after a failure.
    pub messages: Vec<Value>,
    /// The expansion error, when the messages are a fallback.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ile_error: Option<String>,
}

impl RenderedReply {
    /// Returns true if expansion failed and the template was sent as-is.
    #[must_use]
    pub const fn is_fallback(&self) -> bool {
        self.ile_error.is_some()
    }

    /// The text recorded in the message log.
    ///
    /// Joins the `text` of every `type == "text"` message with newlines.
    #[must_use]
    pub fn summary(&self) -> String {
        let text = self
            .messages
            .iter()
            .filter(|m| m.get("type").and_then(Value::as_str) == Some("text"))
            .filter_map(|m| m.get("text").and_then(Value::as_str))
            .collect::<Vec<_>>()
            .join("\n");
        if text.is_empty() {
            JSON_MESSAGE_SUMMARY.to_string()
        } else {
            text
        }
    }
}

/// Expands reply templates with fallback on failure.
pub struct RenderReply<T: ?Sized, I: ?Sized, R: ?Sized> {
    engine: TemplateEngine<T, I, R>,
}

impl<T, I, R> RenderReply<T, I, R>
where
    T: RuleTableRepository + ?Sized,
    I: ImageRepository + ?Sized,
    R: RandomSource + ?Sized,
{
    /// Creates a new `RenderReply` use case.
    #[must_use]
    pub const fn new(engine: TemplateEngine<T, I, R>) -> Self {
        Self { engine }
    }

    /// Returns a reference to the underlying engine.
    #[must_use]
    pub const fn engine(&self) -> &TemplateEngine<T, I, R> {
        &self.engine
    }

    /// Expands `template` for `tenant`.
    ///
    /// On a lookup failure the error is logged and the unprocessed
    /// messages are returned in its place.
    pub async fn execute(&self, template: &Value, tenant: &TenantId) -> RenderedReply {
        match self.engine.process_messages(template, tenant).await {
            Ok(messages) => {
                debug!(tenant = %tenant, count = messages.len(), "reply rendered");
                RenderedReply {
                    messages,
                    ile_error: None,
                }
            }
            Err(e) => {
                error!(tenant = %tenant, error = %e, "template expansion failed; sending unprocessed messages");
                RenderedReply {
                    messages: unprocessed_messages(template),
                    ile_error: Some(e.to_string()),
                }
            }
        }
    }

    /// Expands `template`, failing instead of falling back.
    ///
    /// # Errors
    /// Returns an error if a lookup fails.
    pub async fn execute_strict(&self, template: &Value, tenant: &TenantId) -> ApplicationResult<Vec<Value>> {
        Ok(self.engine.process_messages(template, tenant).await?)
    }

    /// Renders an auto-reply: text replies are wrapped verbatim, JSON
    /// replies are expanded.
    pub async fn render_auto_reply(&self, reply: &AutoReply) -> RenderedReply {
        match &reply.content {
            ReplyContent::Text(text) => RenderedReply {
                messages: vec![json!({"type": "text", "text": text})],
                ile_error: None,
            },
            ReplyContent::Json(template) => self.execute(template, &reply.tenant_id).await,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;
    use crate::ApplicationError;
    use crate::test_support::{StubImages, StubTables, engine, tenant};
    use chrono::Utc;
    use pretty_assertions::assert_eq;

    fn auto_reply(content: ReplyContent) -> AutoReply {
        AutoReply {
            id: "r1".to_string(),
            tenant_id: tenant("t1"),
            keyword: "luck".to_string(),
            content,
            is_active: true,
            priority: 0,
            match_type: ile_domain::MatchType::Contains,
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_successful_render() {
        let use_case = RenderReply::new(engine(StubTables::new(), StubImages::new()));
        let template = json!([{"type": "text", "text": "n=${rand:4:4}"}]);

        let reply = use_case.execute(&template, &tenant("t1")).await;
        assert!(!reply.is_fallback());
        assert_eq!(reply.messages, vec![json!({"type": "text", "text": "n=4"})]);
        assert_eq!(reply.summary(), "n=4");
    }

    #[tokio::test]
    async fn test_lookup_failure_falls_back_to_unprocessed_messages() {
        let use_case = RenderReply::new(engine(StubTables::failing(), StubImages::new()));
        let template = json!({
            "__vars__": [{"row": "${rand:1:1}"}],
            "__messages__": [{"type": "text", "text": "${tbl(${row}, msg)}"}]
        });

        let reply = use_case.execute(&template, &tenant("t1")).await;
        assert!(reply.is_fallback());
        assert_eq!(
            reply.messages,
            vec![json!({"type": "text", "text": "${tbl(${row}, msg)}"})]
        );
        assert!(reply.ile_error.unwrap().contains("rule store offline"));
    }

    #[tokio::test]
    async fn test_strict_render_reports_error() {
        let use_case = RenderReply::new(engine(StubTables::failing(), StubImages::new()));
        let err = use_case
            .execute_strict(&json!(["${tbl(1, a)}"]), &tenant("t1"))
            .await
            .unwrap_err();
        assert!(matches!(err, ApplicationError::Ile(_)));
    }

    #[tokio::test]
    async fn test_auto_reply_content() {
        let use_case = RenderReply::new(engine(StubTables::new(), StubImages::new()));

        let text = use_case
            .render_auto_reply(&auto_reply(ReplyContent::Text("${not expanded}".to_string())))
            .await;
        assert_eq!(
            text.messages,
            vec![json!({"type": "text", "text": "${not expanded}"})]
        );

        let expanded = use_case
            .render_auto_reply(&auto_reply(ReplyContent::Json(json!([
                {"type": "text", "text": "${rand:2:2}"}
            ]))))
            .await;
        assert_eq!(expanded.summary(), "2");
    }

    #[test]
    fn test_summary() {
        let reply = RenderedReply {
            messages: vec![
                json!({"type": "text", "text": "one"}),
                json!({"type": "image", "originalContentUrl": "https://x"}),
                json!({"type": "text", "text": "two"}),
            ],
            ile_error: None,
        };
        assert_eq!(reply.summary(), "one\ntwo");

        let images_only = RenderedReply {
            messages: vec![json!({"type": "image"})],
            ile_error: None,
        };
        assert_eq!(images_only.summary(), JSON_MESSAGE_SUMMARY);
    }
}
