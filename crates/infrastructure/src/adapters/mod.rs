//! Port adapters

mod thread_random;

pub use thread_random::{SeededRandom, ThreadRandom};
