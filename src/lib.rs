// semfield: cross-lingual semantic category classification and field ranking
//
// This is the library root. The semantic core (similarity, catalog, analysis)
// depends on nothing but an injected `Embedder`; the remaining modules supply
// the local model, configuration and terminal output used by the CLI.

pub mod analysis;
pub mod catalog;
pub mod config;
pub mod embedding;
pub mod error;
pub mod output;
pub mod pairs;
pub mod similarity;

pub use analysis::{ComparisonResult, SemanticAnalyzer, SemanticField};
pub use catalog::{Catalog, Category, Language};
pub use embedding::Embedder;
pub use error::{CompareError, SemanticError, TextSide};
