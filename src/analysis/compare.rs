// Cross-lingual comparison of two texts.
//
// The overall score depends only on the two embeddings. Each text is then
// classified and ranked on its own, so the two fields may come from different
// categories and have different lengths.

use futures::future::try_join;
use tracing::info;

use super::{require_text, SemanticAnalyzer, SemanticField};
use crate::catalog::Language;
use crate::error::{CompareError, SemanticError, TextSide};
use crate::similarity::{check_vector, cosine_similarity, MatchLevel};

/// Overall similarity of two texts plus each text's semantic field.
#[derive(Debug, Clone, PartialEq)]
pub struct ComparisonResult {
    pub score: f64,
    pub field_a: SemanticField,
    pub field_b: SemanticField,
}

impl ComparisonResult {
    pub fn match_level(&self) -> MatchLevel {
        MatchLevel::from_score(self.score)
    }

    /// True when both texts resolved to the same category.
    pub fn same_category(&self) -> bool {
        self.field_a.category == self.field_b.category
    }
}

impl SemanticAnalyzer {
    /// Compare `text_a` (in `lang_a`) with `text_b` (in `lang_b`).
    ///
    /// Any failure is tagged with the text that caused it.
    pub async fn compare(
        &self,
        text_a: &str,
        lang_a: Language,
        text_b: &str,
        lang_b: Language,
    ) -> Result<ComparisonResult, CompareError> {
        require_text(text_a).map_err(|e| CompareError::new(TextSide::A, e))?;
        require_text(text_b).map_err(|e| CompareError::new(TextSide::B, e))?;

        let (emb_a, emb_b) = try_join(
            tagged(TextSide::A, self.embed_text(text_a)),
            tagged(TextSide::B, self.embed_text(text_b)),
        )
        .await?;

        // A degenerate vector is blamed on its own text; a length mismatch on B.
        let score = cosine_similarity(&emb_a, &emb_b).map_err(|e| {
            let side = match e {
                SemanticError::DimensionMismatch { .. } => TextSide::B,
                _ if check_vector(&emb_a).is_err() => TextSide::A,
                _ => TextSide::B,
            };
            CompareError::new(side, e)
        })?;

        let (field_a, field_b) = try_join(
            tagged(TextSide::A, self.field_for_embedding(&emb_a, lang_a)),
            tagged(TextSide::B, self.field_for_embedding(&emb_b, lang_b)),
        )
        .await?;

        info!(
            score,
            category_a = %field_a.category,
            category_b = %field_b.category,
            "Compared texts"
        );

        Ok(ComparisonResult {
            score,
            field_a,
            field_b,
        })
    }
}

async fn tagged<T>(
    side: TextSide,
    fut: impl std::future::Future<Output = Result<T, SemanticError>>,
) -> Result<T, CompareError> {
    fut.await.map_err(|e| CompareError::new(side, e))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::super::test_support::stub_embedder;
    use super::*;
    use crate::catalog::{Catalog, Category};
    use crate::embedding::EmbedFn;

    fn analyzer() -> SemanticAnalyzer {
        SemanticAnalyzer::new(Catalog::builtin(), stub_embedder())
    }

    #[tokio::test]
    async fn test_paired_translation_scores_one() {
        let result = analyzer()
            .compare("man", Language::English, "男人", Language::Chinese)
            .await
            .unwrap();
        assert!((result.score - 1.0).abs() < 1e-10);
        assert_eq!(result.field_a.category, Category::Human);
        assert_eq!(result.field_b.category, Category::Human);
        assert!(result.same_category());
        assert_eq!(result.match_level(), MatchLevel::Strong);
        assert_eq!(result.field_a.language, Language::English);
        assert_eq!(result.field_b.language, Language::Chinese);
    }

    #[tokio::test]
    async fn test_different_categories_allowed() {
        let result = analyzer()
            .compare("cat", Language::English, "rock", Language::French)
            .await
            .unwrap();
        assert_eq!(result.field_a.category, Category::Animal);
        assert_eq!(result.field_b.category, Category::Object);
        assert!(!result.same_category());
    }

    #[tokio::test]
    async fn test_compare_is_idempotent() {
        let analyzer = analyzer();
        let first = analyzer
            .compare(
                "a lonely traveller",
                Language::English,
                "un viajero",
                Language::Spanish,
            )
            .await
            .unwrap();
        let second = analyzer
            .compare(
                "a lonely traveller",
                Language::English,
                "un viajero",
                Language::Spanish,
            )
            .await
            .unwrap();
        assert_eq!(first, second);
        assert_eq!(first.score.to_bits(), second.score.to_bits());
    }

    #[tokio::test]
    async fn test_empty_text_tagged_by_side() {
        let analyzer = analyzer();
        let err = analyzer
            .compare("", Language::English, "男人", Language::Chinese)
            .await
            .unwrap_err();
        assert_eq!(err.side, TextSide::A);
        assert!(matches!(err.source, SemanticError::EmptyInput));

        let err = analyzer
            .compare("man", Language::English, " ", Language::Chinese)
            .await
            .unwrap_err();
        assert_eq!(err.side, TextSide::B);
    }

    #[tokio::test]
    async fn test_embedding_failure_tagged_by_side() {
        let analyzer = SemanticAnalyzer::new(
            Catalog::builtin(),
            Arc::new(EmbedFn::new(|text: &str| {
                if text == "unembeddable" {
                    anyhow::bail!("tokenizer rejected input")
                }
                Ok(vec![1.0, 0.0])
            })),
        );
        let err = analyzer
            .compare("man", Language::English, "unembeddable", Language::French)
            .await
            .unwrap_err();
        assert_eq!(err.side, TextSide::B);
        assert!(matches!(err.source, SemanticError::EmbeddingFailure(_)));
    }

    #[tokio::test]
    async fn test_zero_vector_tagged_by_side() {
        let analyzer = SemanticAnalyzer::new(
            Catalog::builtin(),
            Arc::new(EmbedFn::new(|text: &str| {
                Ok(match text {
                    "void" => vec![0.0, 0.0],
                    "noise" => vec![f64::NAN, 1.0],
                    _ => vec![1.0, 0.0],
                })
            })),
        );
        let err = analyzer
            .compare("void", Language::English, "man", Language::English)
            .await
            .unwrap_err();
        assert_eq!(err.side, TextSide::A);
        assert!(matches!(err.source, SemanticError::ZeroMagnitude));

        let err = analyzer
            .compare("man", Language::English, "noise", Language::English)
            .await
            .unwrap_err();
        assert_eq!(err.side, TextSide::B);
        assert!(matches!(err.source, SemanticError::NonFinite));
    }

    #[tokio::test]
    async fn test_unsupported_language_tagged_by_side() {
        use std::collections::BTreeMap;

        use crate::catalog::CategoryEntry;

        let mut entries = BTreeMap::new();
        for category in Category::ALL {
            let mut vocabulary = BTreeMap::new();
            vocabulary.insert(Language::English, vec![category.to_string()]);
            entries.insert(
                category,
                CategoryEntry {
                    probe: category.to_string(),
                    vocabulary,
                },
            );
        }
        let analyzer = SemanticAnalyzer::new(Catalog::new(entries).unwrap(), stub_embedder());
        let err = analyzer
            .compare("man", Language::English, "homme", Language::French)
            .await
            .unwrap_err();
        assert_eq!(err.side, TextSide::B);
        assert!(matches!(err.source, SemanticError::UnsupportedLanguage { .. }));
    }
}
