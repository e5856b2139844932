// Semantic field ranking: score every vocabulary term of a (category,
// language) pair against the text and sort by descending similarity.
//
// The field always has exactly one entry per vocabulary term. Terms are
// neither dropped nor deduplicated, and exact ties keep vocabulary order.

use tracing::debug;

use super::{require_text, SemanticAnalyzer};
use crate::catalog::{Category, Language};
use crate::error::SemanticError;
use crate::similarity::cosine_similarity;

/// Vocabulary terms ranked by similarity to a text.
#[derive(Debug, Clone, PartialEq)]
pub struct SemanticField {
    pub category: Category,
    pub language: Language,
    /// (term, score), sorted by non-increasing score.
    pub terms: Vec<(String, f64)>,
}

impl SemanticField {
    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.terms.iter().map(|(t, s)| (t.as_str(), *s))
    }

    /// The `n` most similar terms.
    pub fn top(&self, n: usize) -> &[(String, f64)] {
        &self.terms[..n.min(self.terms.len())]
    }

    /// Pair the i-th term of each field, stopping at the shorter one.
    ///
    /// Fields from different categories are unrelated lists, so the pairing
    /// is for side-by-side display only.
    pub fn paired_with<'a>(
        &'a self,
        other: &'a SemanticField,
    ) -> impl Iterator<Item = (&'a (String, f64), &'a (String, f64))> {
        self.terms.iter().zip(other.terms.iter())
    }
}

impl SemanticAnalyzer {
    /// Rank the vocabulary of (category, language) against `text`.
    pub async fn rank_field(
        &self,
        text: &str,
        category: Category,
        language: Language,
    ) -> Result<SemanticField, SemanticError> {
        require_text(text)?;
        // Look the table up before spending any inference on the text.
        self.catalog.vocabulary(category, language)?;
        let text_embedding = self.embed_text(text).await?;
        self.rank_embedding(&text_embedding, category, language).await
    }

    /// Like `rank_field`, with the language given as a name or ISO code.
    pub async fn rank_field_tagged(
        &self,
        text: &str,
        category: Category,
        language: &str,
    ) -> Result<SemanticField, SemanticError> {
        require_text(text)?;
        let language: Language = language.parse().map_err(|e| match e {
            SemanticError::UnsupportedLanguage { language, .. } => {
                SemanticError::UnsupportedLanguage {
                    category: Some(category),
                    language,
                }
            }
            other => other,
        })?;
        self.rank_field(text, category, language).await
    }

    /// Classify `text`, then rank the resolved category's vocabulary.
    pub async fn analyze_field(
        &self,
        text: &str,
        language: Language,
    ) -> Result<SemanticField, SemanticError> {
        let text_embedding = self.embed_text(text).await?;
        self.field_for_embedding(&text_embedding, language).await
    }

    /// Classify-then-rank for an already-embedded text.
    pub(crate) async fn field_for_embedding(
        &self,
        text_embedding: &[f64],
        language: Language,
    ) -> Result<SemanticField, SemanticError> {
        let category = self.classify_embedding(text_embedding).await?;
        self.rank_embedding(text_embedding, category, language).await
    }

    async fn rank_embedding(
        &self,
        text_embedding: &[f64],
        category: Category,
        language: Language,
    ) -> Result<SemanticField, SemanticError> {
        let vocabulary = self.catalog.vocabulary(category, language)?;
        let words: Vec<&str> = vocabulary.iter().map(String::as_str).collect();
        let word_embeddings = self.embed_many(&words).await?;

        let mut terms = vocabulary
            .iter()
            .zip(word_embeddings.iter())
            .map(|(word, emb)| Ok((word.clone(), cosine_similarity(text_embedding, emb)?)))
            .collect::<Result<Vec<_>, SemanticError>>()?;

        // sort_by is stable: exact ties keep vocabulary order
        terms.sort_by(|a, b| b.1.total_cmp(&a.1));

        debug!(
            category = %category,
            language = %language,
            terms = terms.len(),
            "Ranked semantic field"
        );

        Ok(SemanticField {
            category,
            language,
            terms,
        })
    }
}
