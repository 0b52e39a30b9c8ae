//! Port definitions (interfaces)
//!
//! Ports define the boundaries between the evaluator and the storage it reads
//! from. Each port is a trait implemented by adapters in the infrastructure
//! layer. Every lookup is parameterized by the tenant.

mod auto_reply_repository;
mod image_repository;
mod random;
mod repository_error;
mod rule_table_repository;

pub use auto_reply_repository::AutoReplyRepository;
pub use image_repository::ImageRepository;
pub use random::RandomSource;
pub use repository_error::RepositoryError;
pub use rule_table_repository::RuleTableRepository;
