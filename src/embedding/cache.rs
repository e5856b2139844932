// Memoizing embedder wrapper.
//
// Probe phrases and vocabulary terms are embedded on every request, yet their
// vectors never change for a given model. The analyzer always sends those
// catalog strings through `embed_batch`, so that is the only path memoized:
// single-text `embed` calls carry user queries and pass straight through,
// which keeps the memo bounded by the catalog's size. The memo is keyed by
// text within one wrapped instance, which stands in for the embedder's
// identity: two different models never share a cache. Output is identical to
// the unwrapped embedder.

use std::collections::HashMap;
use std::sync::Mutex;

use anyhow::Result;
use async_trait::async_trait;
use tracing::debug;

use super::traits::Embedder;
use crate::similarity::Vector;

pub struct CachingEmbedder<E> {
    inner: E,
    cache: Mutex<HashMap<String, Vector>>,
}

impl<E: Embedder> CachingEmbedder<E> {
    pub fn new(inner: E) -> Self {
        Self {
            inner,
            cache: Mutex::new(HashMap::new()),
        }
    }

    /// Number of memoized vectors.
    pub fn len(&self) -> usize {
        self.cache.lock().map(|c| c.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl<E: Embedder> Embedder for CachingEmbedder<E> {
    async fn embed(&self, text: &str) -> Result<Vector> {
        self.inner.embed(text).await
    }

    /// Serve known texts from the memo and embed the rest in one inner batch.
    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vector>> {
        let mut vectors: Vec<Option<Vector>> = {
            let cache = self
                .cache
                .lock()
                .map_err(|e| anyhow::anyhow!("Embedding cache lock poisoned: {}", e))?;
            texts.iter().map(|t| cache.get(t).cloned()).collect()
        };

        let missing: Vec<usize> = (0..texts.len()).filter(|&i| vectors[i].is_none()).collect();
        debug!(
            hits = texts.len() - missing.len(),
            misses = missing.len(),
            "Embedding cache lookup"
        );

        if !missing.is_empty() {
            // Lock is not held across the await; a concurrent miss on the
            // same text computes the same vector twice, which is harmless.
            let batch: Vec<String> = missing.iter().map(|&i| texts[i].clone()).collect();
            let embedded = self.inner.embed_batch(&batch).await?;
            if embedded.len() != batch.len() {
                anyhow::bail!(
                    "Embedder returned {} vectors for {} texts",
                    embedded.len(),
                    batch.len()
                );
            }

            let mut cache = self
                .cache
                .lock()
                .map_err(|e| anyhow::anyhow!("Embedding cache lock poisoned: {}", e))?;
            for (i, vector) in missing.into_iter().zip(embedded) {
                cache.insert(texts[i].clone(), vector.clone());
                vectors[i] = Some(vector);
            }
        }

        vectors
            .into_iter()
            .map(|v| v.ok_or_else(|| anyhow::anyhow!("Embedding cache lost a vector")))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::embedding::EmbedFn;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    fn texts(items: &[&str]) -> Vec<String> {
        items.iter().map(|t| t.to_string()).collect()
    }

    #[tokio::test]
    async fn test_second_batch_is_memoized() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let embedder = CachingEmbedder::new(EmbedFn::new(move |text: &str| {
            counter.fetch_add(1, Ordering::SeqCst);
            Ok(vec![text.len() as f64, 1.0])
        }));

        let first = embedder.embed_batch(&texts(&["cat", "dog"])).await.unwrap();
        let second = embedder.embed_batch(&texts(&["cat", "dog"])).await.unwrap();

        assert_eq!(first, second);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
        assert_eq!(embedder.len(), 2);
    }

    #[tokio::test]
    async fn test_partial_hit_keeps_order() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let embedder = CachingEmbedder::new(EmbedFn::new(move |text: &str| {
            counter.fetch_add(1, Ordering::SeqCst);
            Ok(vec![text.len() as f64])
        }));

        embedder.embed_batch(&texts(&["bb"])).await.unwrap();
        let vectors = embedder
            .embed_batch(&texts(&["a", "bb", "cccc"]))
            .await
            .unwrap();

        assert_eq!(vectors, vec![vec![1.0], vec![2.0], vec![4.0]]);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_single_texts_are_not_memoized() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let embedder = CachingEmbedder::new(EmbedFn::new(move |text: &str| {
            counter.fetch_add(1, Ordering::SeqCst);
            Ok(vec![text.len() as f64])
        }));

        for _ in 0..3 {
            assert_eq!(embedder.embed("a user query").await.unwrap(), vec![12.0]);
        }
        assert_eq!(calls.load(Ordering::SeqCst), 3);
        assert!(embedder.is_empty());
    }

    #[tokio::test]
    async fn test_failures_are_not_cached() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let embedder = CachingEmbedder::new(EmbedFn::new(move |_text: &str| {
            counter.fetch_add(1, Ordering::SeqCst);
            anyhow::bail!("model unavailable")
        }));

        assert!(embedder.embed_batch(&texts(&["x"])).await.is_err());
        assert!(embedder.embed_batch(&texts(&["x"])).await.is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 2);
        assert!(embedder.is_empty());
    }
}
