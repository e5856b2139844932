// Embedder trait — the only boundary of the semantic core.
//
// The analyzer never loads or owns a model. Whatever produces vectors (the
// local ONNX model, a remote service, a test stub) is injected behind this
// trait. Implementations must be deterministic for identical input within a
// session and return vectors of one fixed dimensionality.

use anyhow::Result;
use async_trait::async_trait;
use futures::future::try_join_all;

use crate::similarity::Vector;

/// Maps text to a fixed-length embedding vector.
#[async_trait]
pub trait Embedder: Send + Sync {
    /// Embed a single text.
    async fn embed(&self, text: &str) -> Result<Vector>;

    /// Embed multiple texts, returning vectors in the same order.
    ///
    /// The default runs one `embed` per text concurrently and fails on the
    /// first error. Providers with a native batch path (one forward pass for
    /// many inputs) should override it.
    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vector>> {
        try_join_all(texts.iter().map(|text| self.embed(text))).await
    }
}

/// Adapts a plain function or closure into an `Embedder`.
///
/// ```
/// use semfield::embedding::EmbedFn;
/// let embedder = EmbedFn::new(|text: &str| Ok(vec![text.len() as f64, 1.0]));
/// # let _ = embedder;
/// ```
pub struct EmbedFn<F> {
    f: F,
}

impl<F> EmbedFn<F>
where
    F: Fn(&str) -> Result<Vector> + Send + Sync,
{
    pub fn new(f: F) -> Self {
        Self { f }
    }
}

#[async_trait]
impl<F> Embedder for EmbedFn<F>
where
    F: Fn(&str) -> Result<Vector> + Send + Sync,
{
    async fn embed(&self, text: &str) -> Result<Vector> {
        (self.f)(text)
    }
}

#[async_trait]
impl<E: Embedder + ?Sized> Embedder for std::sync::Arc<E> {
    async fn embed(&self, text: &str) -> Result<Vector> {
        (**self).embed(text).await
    }

    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vector>> {
        (**self).embed_batch(texts).await
    }
}
