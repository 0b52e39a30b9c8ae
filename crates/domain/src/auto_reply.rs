//! Keyword-triggered auto-replies

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::DomainError;
use crate::id::TenantId;

/// How an auto-reply keyword is compared with an incoming message.
///
/// Comparison is case-insensitive for every variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchType {
    /// Whole message equals the keyword.
    Exact,
    /// Keyword appears anywhere in the message.
    #[default]
    Contains,
    /// Message starts with the keyword.
    StartsWith,
    /// Message ends with the keyword.
    EndsWith,
}

impl MatchType {
    /// Returns the wire name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Exact => "exact",
            Self::Contains => "contains",
            Self::StartsWith => "starts_with",
            Self::EndsWith => "ends_with",
        }
    }

    /// Tests `message` against `keyword`.
    #[must_use]
    pub fn matches(self, keyword: &str, message: &str) -> bool {
        let keyword = keyword.to_lowercase();
        let message = message.to_lowercase();
        match self {
            Self::Exact => message == keyword,
            Self::Contains => message.contains(&keyword),
            Self::StartsWith => message.starts_with(&keyword),
            Self::EndsWith => message.ends_with(&keyword),
        }
    }
}

impl fmt::Display for MatchType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MatchType {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "exact" => Ok(Self::Exact),
            "contains" => Ok(Self::Contains),
            "starts_with" => Ok(Self::StartsWith),
            "ends_with" => Ok(Self::EndsWith),
            other => Err(DomainError::InvalidMatchType(other.to_string())),
        }
    }
}

/// What an auto-reply sends.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "reply_type", content = "reply", rename_all = "snake_case")]
pub enum ReplyContent {
    /// A single plain text message, sent verbatim.
    Text(String),
    /// A message template expanded by the ILE before sending.
    Json(Value),
}

/// A keyword rule that answers incoming chat messages.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AutoReply {
    /// Auto-reply id.
    pub id: String,
    /// Owning tenant.
    pub tenant_id: TenantId,
    /// Trigger keyword.
    pub keyword: String,
    /// Reply payload.
    pub content: ReplyContent,
    /// Inactive replies never match.
    #[serde(default = "default_active")]
    pub is_active: bool,
    /// Higher priorities are tried first.
    #[serde(default)]
    pub priority: i32,
    /// Keyword comparison mode.
    #[serde(default)]
    pub match_type: MatchType,
    /// Creation time; breaks priority ties, newest first.
    pub created_at: DateTime<Utc>,
}

const fn default_active() -> bool {
    true
}

impl AutoReply {
    /// Returns true if this reply is active and its keyword matches.
    #[must_use]
    pub fn matches(&self, message: &str) -> bool {
        self.is_active && self.match_type.matches(&self.keyword, message)
    }
}

/// Picks the auto-reply for `message` among one tenant's replies.
///
/// Replies are tried by priority (highest first), then by creation time
/// (newest first); the first match wins.
#[must_use]
pub fn select_auto_reply<'a>(replies: &'a [AutoReply], message: &str) -> Option<&'a AutoReply> {
    let mut candidates: Vec<&AutoReply> = replies.iter().filter(|r| r.is_active).collect();
    candidates.sort_by(|a, b| {
        b.priority
            .cmp(&a.priority)
            .then_with(|| b.created_at.cmp(&a.created_at))
    });
    candidates.into_iter().find(|r| r.matches(message))
}
