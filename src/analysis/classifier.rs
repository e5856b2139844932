// Nearest-probe category classification.
//
// The text is embedded once and compared against every category's probe
// phrase. The highest similarity wins; exact ties go to the category that
// comes first in `Category::ALL`.

use tracing::debug;

use super::SemanticAnalyzer;
use crate::catalog::Category;
use crate::error::SemanticError;
use crate::similarity::cosine_similarity;

/// Similarity of a text to one category's probe phrase.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CategoryScore {
    pub category: Category,
    pub score: f64,
}

impl SemanticAnalyzer {
    /// Resolve the semantic category of `text`.
    pub async fn classify(&self, text: &str) -> Result<Category, SemanticError> {
        let scores = self.category_scores(text).await?;
        Ok(best_category(&scores))
    }

    /// Probe similarity for every category, in `Category::ALL` order.
    pub async fn category_scores(&self, text: &str) -> Result<Vec<CategoryScore>, SemanticError> {
        let text_embedding = self.embed_text(text).await?;
        self.score_categories(&text_embedding).await
    }

    /// Classify an already-embedded text.
    pub(crate) async fn classify_embedding(
        &self,
        text_embedding: &[f64],
    ) -> Result<Category, SemanticError> {
        let scores = self.score_categories(text_embedding).await?;
        Ok(best_category(&scores))
    }

    async fn score_categories(
        &self,
        text_embedding: &[f64],
    ) -> Result<Vec<CategoryScore>, SemanticError> {
        let probes: Vec<&str> = Category::ALL
            .iter()
            .map(|&c| self.catalog.probe(c))
            .collect();
        let probe_embeddings = self.embed_many(&probes).await?;

        Category::ALL
            .iter()
            .zip(probe_embeddings.iter())
            .map(|(&category, probe)| {
                Ok(CategoryScore {
                    category,
                    score: cosine_similarity(text_embedding, probe)?,
                })
            })
            .collect()
    }
}

/// Highest-scoring category; the earliest one wins exact ties.
pub fn best_category(scores: &[CategoryScore]) -> Category {
    let mut best: Option<CategoryScore> = None;
    for candidate in scores {
        if best.is_none_or(|current| candidate.score > current.score) {
            best = Some(*candidate);
        }
    }

    let winner = best.map(|b| b.category).unwrap_or(Category::ALL[0]);
    debug!(category = %winner, "Resolved semantic category");
    winner
}
