//! Embedding model resolution: local directory lookup plus Hugging Face
//! Hub download for models not yet on disk.

use crate::config::Config;
use crate::error::{Result, ScreenerError};
use hf_hub::api::tokio::Api;
use log::info;
use std::path::{Path, PathBuf};
use tokio::fs;

pub struct ModelManager {
    models_dir: PathBuf,
}

impl ModelManager {
    pub async fn new(models_dir: PathBuf) -> Result<Self> {
        if !models_dir.exists() {
            fs::create_dir_all(&models_dir).await.map_err(|e| {
                ScreenerError::ModelLoading(format!("Failed to create models directory: {}", e))
            })?;
        }
        Ok(Self { models_dir })
    }

    /// Resolve a model name to a local directory, downloading it from the
    /// Hub first if necessary. Unknown names are treated as repo ids.
    pub async fn ensure_model_available(&self, config: &Config, name: &str) -> Result<PathBuf> {
        let local_dir = self.models_dir.join(Self::sanitize(name));
        if Self::is_valid_model_dir(&local_dir).await {
            return Ok(local_dir);
        }

        let repo_id = config
            .get_model_by_name(name)
            .map(|m| m.repo_id.clone())
            .unwrap_or_else(|| name.to_string());

        self.download_model(&repo_id, &local_dir).await?;
        Ok(local_dir)
    }

    async fn download_model(&self, repo_id: &str, dest: &Path) -> Result<()> {
        info!("Downloading embedding model {} to {}", repo_id, dest.display());

        let api = Api::new().map_err(|e| {
            ScreenerError::ModelLoading(format!("Failed to initialize HF API: {}", e))
        })?;
        let repo = api.model(repo_id.to_string());

        fs::create_dir_all(dest).await.map_err(|e| {
            ScreenerError::ModelLoading(format!("Failed to create model directory: {}", e))
        })?;

        // tokenizer.json and model.safetensors are required for Model2Vec;
        // config.json is optional.
        for file in ["model.safetensors", "tokenizer.json", "config.json"] {
            match repo.get(file).await {
                Ok(cached) => {
                    fs::copy(&cached, dest.join(file)).await.map_err(|e| {
                        ScreenerError::ModelLoading(format!("Failed to copy {}: {}", file, e))
                    })?;
                    info!("Downloaded {}", file);
                }
                Err(e) if file == "config.json" => {
                    info!("Optional file {} not found: {}", file, e);
                }
                Err(e) => {
                    return Err(ScreenerError::ModelLoading(format!(
                        "Failed to download required file {} from {}: {}",
                        file, repo_id, e
                    )));
                }
            }
        }

        Ok(())
    }

    async fn is_valid_model_dir(path: &Path) -> bool {
        fs::metadata(path.join("model.safetensors")).await.is_ok()
            && fs::metadata(path.join("tokenizer.json")).await.is_ok()
    }

    fn sanitize(name: &str) -> String {
        name.replace(['/', '\\'], "--")
    }
}
