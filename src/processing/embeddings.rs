//! Embedding generation and cosine similarity using Model2Vec

use crate::error::{Result, ScreenerError};
use log::info;
use model2vec_rs::model::StaticModel;
use std::path::Path;
use std::time::Instant;

/// Seam between the pipeline and the embedding model. Implementations must
/// return one unit-normalized fixed-dimension vector per input text.
pub trait Embedder {
    fn encode(&self, texts: &[String]) -> Result<Vec<Vec<f32>>>;
}

pub struct EmbeddingEngine {
    model: StaticModel,
}

impl EmbeddingEngine {
    pub fn load(model_path: &Path, model_name: &str) -> Result<Self> {
        let start_time = Instant::now();
        info!(
            "Loading Model2Vec model '{}' from: {}",
            model_name,
            model_path.display()
        );

        let model = StaticModel::from_pretrained(
            model_path,
            None,       // token
            Some(true), // normalize: cosine similarity reduces to a dot product
            None,       // subfolder
        )
        .map_err(|e| ScreenerError::ModelLoading(format!("Failed to load model: {}", e)))?;

        info!("Model loaded in {:.2?}", start_time.elapsed());

        Ok(Self { model })
    }
}

impl Embedder for EmbeddingEngine {
    fn encode(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        Ok(self.model.encode(texts))
    }
}

/// Cosine similarity with a zero-norm guard: an all-zero vector (e.g. the
/// embedding of an empty error-sentinel text) scores 0.0 instead of NaN.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> Result<f32> {
    if a.len() != b.len() {
        return Err(ScreenerError::Embedding(format!(
            "Embedding dimensions don't match: {} vs {}",
            a.len(),
            b.len()
        )));
    }
    if a.is_empty() {
        return Ok(0.0);
    }

    let dot_product: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        Ok(0.0)
    } else {
        Ok(dot_product / (norm_a * norm_b))
    }
}
