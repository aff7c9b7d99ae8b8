//! Document factories and the per-application type registry.
//!
//! Which concrete document shape an alias materializes into is decided by
//! an explicit registration table populated at startup. Unregistered
//! aliases fall back to the generic [`Document`] factory; there is no
//! implicit class lookup by naming convention.

use std::collections::HashMap;
use std::sync::Arc;

use search_kit_shared::{Document, RawHit};

/// Builds one document from a normalized hit.
///
/// Implementations decide the concrete document shape for an alias. The
/// construction policy is fixed: source fields are assigned raw and the
/// document starts clean, `id` and `score` go into reserved slots, and
/// per-item engine errors are attached as a first-class error list.
pub trait DocumentFactory: Send + Sync {
    /// Build a document from a raw hit.
    fn build(&self, hit: &RawHit) -> Document;
}

/// The fallback factory producing plain [`Document`] values.
#[derive(Debug, Clone, Copy, Default)]
pub struct GenericDocumentFactory;

impl DocumentFactory for GenericDocumentFactory {
    fn build(&self, hit: &RawHit) -> Document {
        let mut document = match &hit.source {
            Some(source) => Document::from_source(source.clone()),
            None => Document::new(),
        };

        document.set_document_id(hit.id.clone());
        document.set_score(hit.score);

        if let Some(error) = &hit.error {
            document.set_errors(vec![error.clone()]);
        }

        document
    }
}

/// Registration table mapping index aliases to document factories.
///
/// One registry instance belongs to one connection; resolution results
/// are cached per result set, not here.
#[derive(Clone, Default)]
pub struct DocumentTypeRegistry {
    factories: HashMap<String, Arc<dyn DocumentFactory>>,
    fallback: Option<Arc<dyn DocumentFactory>>,
}

impl DocumentTypeRegistry {
    /// Create an empty registry with the generic fallback.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a factory for an alias.
    pub fn register(&mut self, alias: impl Into<String>, factory: Arc<dyn DocumentFactory>) {
        self.factories.insert(alias.into(), factory);
    }

    /// Replace the fallback factory used for unregistered aliases.
    pub fn set_fallback(&mut self, factory: Arc<dyn DocumentFactory>) {
        self.fallback = Some(factory);
    }

    /// Resolve the factory for an alias.
    ///
    /// Unregistered aliases resolve to the fallback; resolution never
    /// fails for documents.
    pub fn resolve(&self, alias: &str) -> Arc<dyn DocumentFactory> {
        if let Some(factory) = self.factories.get(alias) {
            return Arc::clone(factory);
        }

        match &self.fallback {
            Some(fallback) => Arc::clone(fallback),
            None => Arc::new(GenericDocumentFactory),
        }
    }
}

impl std::fmt::Debug for DocumentTypeRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DocumentTypeRegistry")
            .field("aliases", &self.factories.keys().collect::<Vec<_>>())
            .finish()
    }
}
