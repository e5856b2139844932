// Embedding provider seam — the trait the core depends on, plus the
// providers and wrappers that plug into it.

pub mod cache;
pub mod download;
pub mod onnx;
pub mod traits;

pub use cache::CachingEmbedder;
pub use onnx::SentenceEmbedder;
pub use traits::{EmbedFn, Embedder};
