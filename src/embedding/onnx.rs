// Local multilingual sentence embedder (paraphrase-multilingual-MiniLM-L12-v2).
//
// The model maps text from 50+ languages into one shared 384-dimensional
// space, so "man" and "男人" land close together. It runs locally via ONNX,
// and token embeddings are mean-pooled under the attention mask (matching
// how the model was trained).

use std::path::Path;
use std::sync::{Arc, Mutex};

use anyhow::{Context, Result};
use async_trait::async_trait;
use ort::session::{Session, SessionInputValue};
use ort::value::Tensor;
use tokenizers::Tokenizer;
use tracing::debug;

use super::traits::Embedder;
use crate::similarity::Vector;

/// Embedding dimension for paraphrase-multilingual-MiniLM-L12-v2.
pub const EMBEDDING_DIM: usize = 384;

/// Sentence embedder backed by a local ONNX session.
///
/// Session and tokenizer sit behind Arc so inference can move onto
/// spawn_blocking; `Session::run` takes `&mut self`, hence the Mutex.
pub struct SentenceEmbedder {
    session: Arc<Mutex<Session>>,
    tokenizer: Arc<Tokenizer>,
}

impl SentenceEmbedder {
    /// Load the model and tokenizer from `model_dir`.
    ///
    /// Expects `model.onnx` and `tokenizer.json` in the directory.
    /// Call `download::download_model()` first if they don't exist.
    pub fn load(model_dir: &Path) -> Result<Self> {
        let model_path = model_dir.join("model.onnx");
        let tokenizer_path = model_dir.join("tokenizer.json");

        if !model_path.exists() {
            anyhow::bail!(
                "Embedding model not found: {}\nRun `semfield download-model` to download it.",
                model_path.display()
            );
        }
        if !tokenizer_path.exists() {
            anyhow::bail!(
                "Embedding tokenizer not found: {}\nRun `semfield download-model` to download it.",
                tokenizer_path.display()
            );
        }

        let session = Session::builder()
            .context("Failed to create ONNX session builder")?
            .commit_from_file(&model_path)
            .with_context(|| {
                format!(
                    "Failed to load embedding model from {}",
                    model_path.display()
                )
            })?;

        let tokenizer = Tokenizer::from_file(&tokenizer_path)
            .map_err(|e| anyhow::anyhow!("Failed to load embedding tokenizer: {}", e))?;

        debug!("Loaded sentence embedding model from {}", model_dir.display());

        Ok(Self {
            session: Arc::new(Mutex::new(session)),
            tokenizer: Arc::new(tokenizer),
        })
    }
}

#[async_trait]
impl Embedder for SentenceEmbedder {
    async fn embed(&self, text: &str) -> Result<Vector> {
        let mut vectors = self.embed_batch(&[text.to_string()]).await?;
        vectors
            .pop()
            .ok_or_else(|| anyhow::anyhow!("Embedding model returned no vector"))
    }

    /// One forward pass for the whole batch, offloaded to spawn_blocking.
    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vector>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        let session = Arc::clone(&self.session);
        let tokenizer = Arc::clone(&self.tokenizer);
        let texts = texts.to_vec();

        tokio::task::spawn_blocking(move || embed_sync(&session, &tokenizer, &texts))
            .await
            .context("spawn_blocking panicked")?
    }
}

/// Tokenize, run inference, and mean-pool. Blocking.
fn embed_sync(
    session: &Arc<Mutex<Session>>,
    tokenizer: &Arc<Tokenizer>,
    texts: &[String],
) -> Result<Vec<Vector>> {
    let encodings: Vec<_> = texts
        .iter()
        .map(|t| {
            tokenizer
                .encode(t.as_str(), true)
                .map_err(|e| anyhow::anyhow!("Tokenization failed: {}", e))
        })
        .collect::<Result<Vec<_>>>()?;

    let batch_size = encodings.len();
    let max_len = encodings
        .iter()
        .map(|e| e.get_ids().len())
        .max()
        .unwrap_or(0);

    if max_len == 0 {
        return Ok(vec![vec![0.0; EMBEDDING_DIM]; batch_size]);
    }

    // XLM-R vocabularies pad with id 1, BERT ones with 0; ask the tokenizer.
    let pad_id = tokenizer
        .get_padding()
        .map(|p| p.pad_id as i64)
        .unwrap_or(0);

    let mut input_ids_flat: Vec<i64> = Vec::with_capacity(batch_size * max_len);
    let mut attention_mask_flat: Vec<i64> = Vec::with_capacity(batch_size * max_len);

    for enc in &encodings {
        let ids = enc.get_ids();
        let mask = enc.get_attention_mask();
        let pad_len = max_len - ids.len();

        input_ids_flat.extend(ids.iter().map(|&id| id as i64));
        input_ids_flat.extend(std::iter::repeat_n(pad_id, pad_len));
        attention_mask_flat.extend(mask.iter().map(|&m| m as i64));
        attention_mask_flat.extend(std::iter::repeat_n(0i64, pad_len));
    }

    let shape = [batch_size as i64, max_len as i64];

    // Output is last_hidden_state: [batch, seq_len, EMBEDDING_DIM]
    let hidden_states = {
        let mut session = session
            .lock()
            .map_err(|e| anyhow::anyhow!("Session lock poisoned: {}", e))?;

        // XLM-R exports take no token_type_ids; BERT ones do. Feed exactly
        // what the graph declares.
        let input_names: Vec<String> = session
            .inputs()
            .iter()
            .map(|input| input.name().to_string())
            .collect();
        let mut inputs: Vec<(String, SessionInputValue<'static>)> =
            Vec::with_capacity(input_names.len());
        for name in input_names {
            let values = input_values(&name, &input_ids_flat, &attention_mask_flat)?;
            let tensor = Tensor::from_array((shape, values))
                .with_context(|| format!("Failed to create {} tensor", name))?;
            inputs.push((name, tensor.into()));
        }
        if inputs.is_empty() {
            anyhow::bail!("Embedding model declares no inputs");
        }

        let outputs = session
            .run(inputs)
            .context("Embedding ONNX inference failed")?;

        let (out_shape, data) = outputs[0]
            .try_extract_tensor::<f32>()
            .context("Failed to extract embedding output tensor")?;
        check_output_shape(out_shape, batch_size, max_len)?;

        data.to_vec()
    };

    let row = max_len * EMBEDDING_DIM;
    let embeddings: Vec<Vector> = (0..batch_size)
        .map(|i| {
            let mask = &attention_mask_flat[i * max_len..(i + 1) * max_len];
            let tokens = &hidden_states[i * row..(i + 1) * row];
            mean_pool(tokens, mask, EMBEDDING_DIM)
        })
        .collect();

    debug!(
        batch_size = batch_size,
        dim = EMBEDDING_DIM,
        "Computed sentence embeddings"
    );

    Ok(embeddings)
}

/// Tensor contents for one declared graph input.
fn input_values(name: &str, input_ids: &[i64], attention_mask: &[i64]) -> Result<Vec<i64>> {
    match name {
        "input_ids" => Ok(input_ids.to_vec()),
        "attention_mask" => Ok(attention_mask.to_vec()),
        "token_type_ids" => Ok(vec![0; input_ids.len()]),
        other => anyhow::bail!("Unsupported embedding model input '{}'", other),
    }
}

/// The model must return `[batch, seq_len, EMBEDDING_DIM]`.
fn check_output_shape(shape: &[i64], batch_size: usize, max_len: usize) -> Result<()> {
    let expected = [batch_size as i64, max_len as i64, EMBEDDING_DIM as i64];
    if shape != expected.as_slice() {
        anyhow::bail!(
            "Embedding model output has shape {:?}, expected {:?}",
            shape,
            expected
        );
    }
    Ok(())
}

/// Average token vectors weighted by the attention mask.
///
/// `tokens` is row-major `[mask.len(), dim]`. All-masked input yields zeros.
pub fn mean_pool(tokens: &[f32], mask: &[i64], dim: usize) -> Vector {
    let mut sum = vec![0.0_f64; dim];
    let mut mask_sum = 0.0_f64;

    for (j, &m) in mask.iter().enumerate() {
        if m > 0 {
            let weight = m as f64;
            mask_sum += weight;
            let row = &tokens[j * dim..(j + 1) * dim];
            for (acc, &v) in sum.iter_mut().zip(row) {
                *acc += v as f64 * weight;
            }
        }
    }

    if mask_sum > 0.0 {
        for val in &mut sum {
            *val /= mask_sum;
        }
    }

    sum
}
