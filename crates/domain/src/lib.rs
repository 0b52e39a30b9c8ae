//! ILE Domain - Core business types
//!
//! This crate defines the domain model for the Inline Logic Engine and the
//! chat-bot data it reads from. All types here are pure Rust with no I/O
//! dependencies.

pub mod auto_reply;
pub mod context;
pub mod error;
pub mod expression;
pub mod id;
pub mod image;
pub mod rules;
pub mod template;

pub use auto_reply::{AutoReply, MatchType, ReplyContent, select_auto_reply};
pub use context::{VariableContext, render_text};
pub use error::{DomainError, DomainResult};
pub use expression::{Expression, Span};
pub use id::{GenerationId, TenantId, generate_id};
pub use image::ImageAsset;
pub use rules::{GenerationPlan, MAX_GENERATIONS, RuleGeneration, RuleRow, latest_active};
pub use template::{Envelope, TemplateInput, VarBinding, VarsBlock, unprocessed_messages};
