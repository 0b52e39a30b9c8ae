//! Application use cases (business logic orchestration).

mod find_auto_reply;
mod render_reply;

pub use find_auto_reply::*;
pub use render_reply::*;
