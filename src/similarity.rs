// Cosine similarity between embedding vectors, plus the interpretation
// helpers used when presenting a score.
//
// Unlike a ranking-only metric, the core never papers over degenerate input:
// mismatched dimensions, non-finite components and zero-norm vectors are
// typed errors, and the result is not clamped, so opposite vectors score -1.0.

use std::fmt;

use crate::error::SemanticError;

/// An embedding vector. Produced only by an `Embedder`, never mutated.
pub type Vector = Vec<f64>;

/// Cosine similarity: dot(a, b) / (|a| * |b|).
///
/// Returns a value in [-1.0, 1.0]. Fails with `DimensionMismatch` when the
/// lengths differ, `NonFinite` when a component is NaN or infinite, and
/// `ZeroMagnitude` when either vector has zero norm.
///
/// Both vectors are scaled by their largest component before the products
/// are summed, so very large or very small magnitudes neither overflow nor
/// flush to zero.
pub fn cosine_similarity(a: &[f64], b: &[f64]) -> Result<f64, SemanticError> {
    if a.len() != b.len() {
        return Err(SemanticError::DimensionMismatch {
            left: a.len(),
            right: b.len(),
        });
    }

    let scale_a = check_vector(a)?;
    let scale_b = check_vector(b)?;

    let dot: f64 = a
        .iter()
        .zip(b.iter())
        .map(|(x, y)| (x / scale_a) * (y / scale_b))
        .sum();
    let norm_a = scaled_norm(a, scale_a);
    let norm_b = scaled_norm(b, scale_b);

    Ok(dot / (norm_a * norm_b))
}

/// Check that `v` can be measured, returning its largest absolute component.
///
/// Non-finite components are reported before zero magnitude.
pub fn check_vector(v: &[f64]) -> Result<f64, SemanticError> {
    if v.iter().any(|x| !x.is_finite()) {
        return Err(SemanticError::NonFinite);
    }
    let scale = max_abs(v);
    if scale == 0.0 {
        return Err(SemanticError::ZeroMagnitude);
    }
    Ok(scale)
}

/// Euclidean norm of a vector. Empty vectors have zero magnitude.
pub fn magnitude(v: &[f64]) -> f64 {
    let scale = max_abs(v);
    if scale == 0.0 || !scale.is_finite() {
        return scale;
    }
    scale * scaled_norm(v, scale)
}

fn max_abs(v: &[f64]) -> f64 {
    v.iter().fold(0.0_f64, |m, x| m.max(x.abs()))
}

fn scaled_norm(v: &[f64], scale: f64) -> f64 {
    v.iter().map(|x| (x / scale).powi(2)).sum::<f64>().sqrt()
}

/// Coarse reading of a similarity score for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchLevel {
    /// score > 0.8
    Strong,
    /// score > 0.6
    Good,
    /// score > 0.4
    Partial,
    Weak,
}

impl MatchLevel {
    pub fn from_score(score: f64) -> Self {
        if score > 0.8 {
            MatchLevel::Strong
        } else if score > 0.6 {
            MatchLevel::Good
        } else if score > 0.4 {
            MatchLevel::Partial
        } else {
            MatchLevel::Weak
        }
    }

    /// One-line interpretation of what the level means for two terms.
    pub fn interpretation(&self) -> &'static str {
        match self {
            MatchLevel::Strong => {
                "These terms share very similar semantic spaces and likely evoke similar concepts in both languages."
            }
            MatchLevel::Good => {
                "These terms are related but may differ subtly in usage or connotation."
            }
            MatchLevel::Partial => {
                "These terms share some meaning but may be used differently in each language."
            }
            MatchLevel::Weak => {
                "These terms differ significantly in meaning or usage between the languages."
            }
        }
    }
}

impl fmt::Display for MatchLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            MatchLevel::Strong => "Strong match",
            MatchLevel::Good => "Good match",
            MatchLevel::Partial => "Partial match",
            MatchLevel::Weak => "Weak match",
        };
        f.write_str(label)
    }
}

/// Ten-slot star bar: one filled star per tenth of similarity.
///
/// Negative scores render as all empty; scores above 1.0 (float noise) as full.
pub fn similarity_stars(score: f64) -> String {
    let filled = if score.is_nan() {
        0
    } else {
        (score * 10.0).floor().clamp(0.0, 10.0) as usize
    };
    format!("{}{}", "★".repeat(filled), "☆".repeat(10 - filled))
}
