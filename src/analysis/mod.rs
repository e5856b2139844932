// Semantic analysis — category classification, semantic field ranking and
// cross-lingual comparison on top of an injected embedder.
//
// Every operation is a pure function of its inputs, the catalog and the
// embedder. Catalog strings (probes, vocabulary terms) go to the embedder in
// batches of at most `concurrency` texts, in input order.

pub mod classifier;
pub mod compare;
pub mod field;

use std::sync::Arc;

use crate::catalog::Catalog;
use crate::embedding::Embedder;
use crate::error::SemanticError;
use crate::similarity::Vector;

pub use classifier::CategoryScore;
pub use compare::ComparisonResult;
pub use field::SemanticField;

/// Default embedding batch size, and so the number of calls in flight at once.
pub const DEFAULT_CONCURRENCY: usize = 8;

/// Holds the configuration tables and the embedder for the lifetime of
/// the process. Cheap to share: it carries no per-request state.
pub struct SemanticAnalyzer {
    catalog: Catalog,
    embedder: Arc<dyn Embedder>,
    concurrency: usize,
}

impl SemanticAnalyzer {
    pub fn new(catalog: Catalog, embedder: Arc<dyn Embedder>) -> Self {
        Self {
            catalog,
            embedder,
            concurrency: DEFAULT_CONCURRENCY,
        }
    }

    /// Set the embedding batch size (at least 1).
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn concurrency(&self) -> usize {
        self.concurrency
    }

    /// Embed one non-blank text.
    async fn embed_text(&self, text: &str) -> Result<Vector, SemanticError> {
        require_text(text)?;
        self.embedder
            .embed(text)
            .await
            .map_err(SemanticError::embedding)
    }

    /// Embed catalog texts in batches, returning vectors in input order.
    /// The first failure aborts the whole request.
    async fn embed_many(&self, texts: &[&str]) -> Result<Vec<Vector>, SemanticError> {
        let mut vectors = Vec::with_capacity(texts.len());
        for chunk in texts.chunks(self.concurrency) {
            let batch: Vec<String> = chunk.iter().map(|t| t.to_string()).collect();
            let embedded = self
                .embedder
                .embed_batch(&batch)
                .await
                .map_err(SemanticError::embedding)?;
            if embedded.len() != batch.len() {
                return Err(SemanticError::embedding(anyhow::anyhow!(
                    "embedder returned {} vectors for {} texts",
                    embedded.len(),
                    batch.len()
                )));
            }
            vectors.extend(embedded);
        }
        Ok(vectors)
    }
}

/// Reject empty or whitespace-only text.
pub(crate) fn require_text(text: &str) -> Result<(), SemanticError> {
    if text.trim().is_empty() {
        Err(SemanticError::EmptyInput)
    } else {
        Ok(())
    }
}
