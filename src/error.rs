// Error taxonomy for the semantic core.
//
// Every core operation fails fast with exactly one of these. Nothing is
// retried here; callers decide whether to retry, degrade, or report.

use std::fmt;

use thiserror::Error;

use crate::catalog::Category;

/// Errors surfaced by similarity, classification and field ranking.
#[derive(Debug, Error)]
pub enum SemanticError {
    /// Text was empty or whitespace-only.
    #[error("input text is empty")]
    EmptyInput,

    /// Two vectors of differing length reached the similarity metric.
    #[error("vector dimension mismatch: {left} vs {right}")]
    DimensionMismatch { left: usize, right: usize },

    /// A vector with zero norm reached the similarity metric.
    #[error("vector has zero magnitude")]
    ZeroMagnitude,

    /// A vector with a NaN or infinite component reached the similarity metric.
    #[error("vector has a non-finite component")]
    NonFinite,

    /// No vocabulary list exists for the requested language.
    #[error("unsupported language '{}'{}", .language, category_suffix(.category))]
    UnsupportedLanguage {
        /// The category being ranked, when the failure came from a table lookup.
        category: Option<Category>,
        language: String,
    },

    /// The injected embedding function failed.
    #[error("embedding failed: {0}")]
    EmbeddingFailure(#[source] anyhow::Error),

    /// A category name that is not one of the fixed set.
    #[error("unknown category '{0}' (expected animal, human or object)")]
    UnknownCategory(String),

    /// Configuration tables are malformed (construction-time only).
    #[error("invalid catalog: {0}")]
    InvalidCatalog(String),
}

fn category_suffix(category: &Option<Category>) -> String {
    match category {
        Some(c) => format!(" for category '{c}'"),
        None => String::new(),
    }
}

impl SemanticError {
    pub(crate) fn embedding(err: anyhow::Error) -> Self {
        SemanticError::EmbeddingFailure(err)
    }
}

/// Which of the two compared texts triggered a failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextSide {
    A,
    B,
}

impl fmt::Display for TextSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TextSide::A => f.write_str("A"),
            TextSide::B => f.write_str("B"),
        }
    }
}

/// A comparison failure, tagged with the text that caused it.
#[derive(Debug, Error)]
#[error("text {side}: {source}")]
pub struct CompareError {
    pub side: TextSide,
    #[source]
    pub source: SemanticError,
}

impl CompareError {
    pub fn new(side: TextSide, source: SemanticError) -> Self {
        Self { side, source }
    }
}
