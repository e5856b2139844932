use std::env;
use std::path::PathBuf;

use anyhow::{Context, Result};

use crate::analysis::DEFAULT_CONCURRENCY;
use crate::catalog::Catalog;
use crate::embedding::download;

/// Central configuration loaded from environment variables.
///
/// The .env file is loaded automatically at startup via dotenvy.
#[derive(Debug, Clone)]
pub struct Config {
    /// Base directory containing downloaded models
    pub model_dir: PathBuf,
    /// Optional JSON catalog replacing the built-in tables
    pub catalog_path: Option<PathBuf>,
    /// Embedding calls in flight at once
    pub concurrency: usize,
    /// Memoize probe and vocabulary embeddings (SEMFIELD_CACHE=off disables)
    pub cache_embeddings: bool,
}

impl Config {
    /// Load configuration from environment variables. Everything has a default.
    pub fn load() -> Result<Self> {
        let model_dir = env::var("SEMFIELD_MODEL_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| download::default_model_dir());

        let concurrency = match env::var("SEMFIELD_CONCURRENCY") {
            Ok(raw) => parse_concurrency(&raw)?,
            Err(_) => DEFAULT_CONCURRENCY,
        };

        let cache_embeddings = !matches!(
            env::var("SEMFIELD_CACHE").as_deref(),
            Ok("off") | Ok("0") | Ok("false")
        );

        Ok(Self {
            model_dir,
            catalog_path: env::var("SEMFIELD_CATALOG").ok().map(PathBuf::from),
            concurrency,
            cache_embeddings,
        })
    }

    /// Check that the embedding model has been downloaded.
    pub fn require_model(&self) -> Result<()> {
        if !download::embedding_files_present(&self.model_dir) {
            anyhow::bail!(
                "Embedding model not found in {}\n\
                 Run `semfield download-model` to download it.",
                download::embedding_model_dir(&self.model_dir).display()
            );
        }
        Ok(())
    }

    /// The configured catalog, or the built-in tables.
    pub fn load_catalog(&self) -> Result<Catalog> {
        match &self.catalog_path {
            Some(path) => Catalog::from_json_file(path)
                .with_context(|| format!("Failed to load catalog from {}", path.display())),
            None => Ok(Catalog::builtin()),
        }
    }
}

fn parse_concurrency(raw: &str) -> Result<usize> {
    let n: usize = raw
        .trim()
        .parse()
        .with_context(|| format!("SEMFIELD_CONCURRENCY must be a positive integer, got '{raw}'"))?;
    Ok(n.max(1))
}
