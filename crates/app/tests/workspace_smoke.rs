//! Verifies the layers wire together through their public exports.

use std::sync::Arc;

use ile_application::ports::RandomSource;
use ile_application::{ApplicationError, MAX_PASSES, TemplateEngine};
use ile_infrastructure::{InMemoryStore, ThreadRandom};

#[test]
fn application_exports_are_reachable() {
    assert_eq!(MAX_PASSES, 100);
    let error = ApplicationError::from(ile_domain::DomainError::InvalidIdentifier(String::new()));
    assert!(error.to_string().contains("invalid identifier"));
}

#[test]
fn engine_accepts_erased_random_source() {
    let store = Arc::new(InMemoryStore::new());
    let random: Arc<dyn RandomSource> = Arc::new(ThreadRandom::new());
    let engine = TemplateEngine::new(Arc::clone(&store), store, random).with_max_passes(10);
    assert_eq!(engine.max_passes(), 10);
}
