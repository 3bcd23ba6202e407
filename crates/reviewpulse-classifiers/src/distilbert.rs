//! DistilBERT sequence classifier backed by Candle
//!
//! Downloads a fine-tuned DistilBERT checkpoint from the Hugging Face Hub
//! (`distilbert-base-uncased-finetuned-sst-2-english` by default) and runs
//! it on the CPU or an accelerator. Loading and inference both run on the
//! blocking pool so the async runtime stays responsive.

use crate::provider::{ProviderLoader, SentimentProvider};
use async_trait::async_trait;
use candle_core::{DType, Device, IndexOp, Tensor, D};
use candle_nn::{Linear, Module, VarBuilder};
use candle_transformers::models::distilbert::{Config as DistilBertConfig, DistilBertModel};
use hf_hub::api::sync::Api;
use hf_hub::{Repo, RepoType};
use reviewpulse_core::{Error, RawOutput, Result};
use std::fmt::Display;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;
use tokenizers::{Tokenizer, TruncationDirection};

pub const DEFAULT_MODEL_REPO: &str = "distilbert-base-uncased-finetuned-sst-2-english";

/// Where to fetch the checkpoint from and how to run it
#[derive(Debug, Clone)]
pub struct DistilBertOptions {
    /// Hugging Face repository id
    pub repo: String,

    /// Repository revision
    pub revision: String,

    /// Device name: `cpu`, `cuda`, `metal`
    pub device: String,

    /// Maximum number of tokens fed to the model
    pub max_length: usize,
}

impl Default for DistilBertOptions {
    fn default() -> Self {
        Self {
            repo: DEFAULT_MODEL_REPO.to_string(),
            revision: "main".to_string(),
            device: "cpu".to_string(),
            max_length: 512,
        }
    }
}

/// Loads a [`DistilBertProvider`] from the Hub cache, downloading on first use
#[derive(Debug, Clone, Default)]
pub struct DistilBertLoader {
    options: DistilBertOptions,
}

impl DistilBertLoader {
    pub fn new(options: DistilBertOptions) -> Self {
        Self { options }
    }
}

#[async_trait]
impl ProviderLoader for DistilBertLoader {
    async fn load(&self) -> Result<Arc<dyn SentimentProvider>> {
        let options = self.options.clone();
        let provider = tokio::task::spawn_blocking(move || DistilBertProvider::load(&options))
            .await
            .map_err(|e| Error::model_load(format!("model loading task failed: {e}")))??;

        Ok(Arc::new(provider))
    }

    fn describe(&self) -> String {
        format!("distilbert:{}@{}", self.options.repo, self.options.revision)
    }
}

pub struct DistilBertProvider {
    name: String,
    model: Arc<DistilBertInner>,
}

struct DistilBertInner {
    tokenizer: Tokenizer,
    model: DistilBertModel,
    pre_classifier: Option<Linear>,
    classifier: Linear,
    device: Device,
    labels: Vec<String>,
    max_length: usize,
}

impl DistilBertProvider {
    /// Download (or reuse cached) files and build the model. Blocking.
    pub fn load(options: &DistilBertOptions) -> Result<Self> {
        let model_dir = download(options)?;
        Self::from_dir(&model_dir, options)
    }

    /// Build the model from a directory holding `config.json`,
    /// `tokenizer.json` and `model.safetensors`. Blocking.
    pub fn from_dir(model_dir: &Path, options: &DistilBertOptions) -> Result<Self> {
        let config_str = std::fs::read_to_string(model_dir.join("config.json"))
            .map_err(load_err("failed to read config.json"))?;
        let config_json: serde_json::Value =
            serde_json::from_str(&config_str).map_err(load_err("failed to parse config.json"))?;
        let config: DistilBertConfig =
            serde_json::from_str(&config_str).map_err(load_err("failed to parse config.json"))?;

        let hidden_size = config_json
            .get("dim")
            .or_else(|| config_json.get("hidden_size"))
            .and_then(|v| v.as_u64())
            .unwrap_or(768) as usize;
        let labels = labels_from_config(&config_json);

        let device = get_device(&options.device)?;

        let tokenizer = Tokenizer::from_file(model_dir.join("tokenizer.json"))
            .map_err(load_err("failed to load tokenizer.json"))?;

        let weights = model_dir.join("model.safetensors");
        if !weights.exists() {
            return Err(Error::model_load(format!(
                "model.safetensors not found in {}",
                model_dir.display()
            )));
        }
        // SAFETY: the weights file is not modified while mapped.
        let vb = unsafe {
            VarBuilder::from_mmaped_safetensors(&[weights], DType::F32, &device)
                .map_err(load_err("failed to load weights"))?
        };

        let model = DistilBertModel::load(vb.pp("distilbert"), &config)
            .map_err(load_err("failed to load DistilBERT backbone"))?;
        let pre_classifier = optional_linear(&vb, "pre_classifier", hidden_size, hidden_size)?;
        let classifier = candle_nn::linear(hidden_size, labels.len(), vb.pp("classifier"))
            .map_err(load_err("failed to load classification head"))?;

        tracing::info!(
            repo = %options.repo,
            labels = ?labels,
            pre_classifier = pre_classifier.is_some(),
            "Loaded DistilBERT sentiment model"
        );

        Ok(Self {
            name: options.repo.clone(),
            model: Arc::new(DistilBertInner {
                tokenizer,
                model,
                pre_classifier,
                classifier,
                device,
                labels,
                max_length: options.max_length,
            }),
        })
    }
}

#[async_trait]
impl SentimentProvider for DistilBertProvider {
    async fn predict(&self, text: &str) -> Result<RawOutput> {
        let model = Arc::clone(&self.model);
        let text = text.to_string();

        tokio::task::spawn_blocking(move || model.predict(&text))
            .await
            .map_err(|e| Error::inference(format!("inference task failed: {e}")))?
    }

    fn name(&self) -> &str {
        &self.name
    }
}

impl DistilBertInner {
    fn predict(&self, text: &str) -> Result<RawOutput> {
        let start = Instant::now();

        let mut encoding = self
            .tokenizer
            .encode(text, true)
            .map_err(infer_err("tokenization failed"))?;
        encoding.truncate(self.max_length, 0, TruncationDirection::Right);

        let input_ids: Vec<i64> = encoding.get_ids().iter().map(|&id| id as i64).collect();
        let input_ids = Tensor::new(input_ids.as_slice(), &self.device)
            .and_then(|t| t.unsqueeze(0))
            .map_err(infer_err("failed to create input tensor"))?;

        // DistilBERT masks positions flagged with 1.
        let mask: Vec<u8> = encoding
            .get_attention_mask()
            .iter()
            .map(|&m| u8::from(m == 0))
            .collect();
        let attention_mask = Tensor::new(mask.as_slice(), &self.device)
            .and_then(|t| t.unsqueeze(0))
            .map_err(infer_err("failed to create attention mask"))?;

        let hidden_states = self
            .model
            .forward(&input_ids, &attention_mask)
            .map_err(infer_err("model forward pass failed"))?;

        let cls = hidden_states
            .i((0, 0, ..))
            .and_then(|t| t.unsqueeze(0))
            .map_err(infer_err("failed to select CLS embedding"))?;

        let pooled = match &self.pre_classifier {
            Some(pre_classifier) => pre_classifier
                .forward(&cls)
                .and_then(|t| t.relu())
                .map_err(infer_err("pre-classifier failed"))?,
            None => cls,
        };

        let logits = self
            .classifier
            .forward(&pooled)
            .map_err(infer_err("classification head failed"))?;

        let probs: Vec<f32> = candle_nn::ops::softmax(&logits, D::Minus1)
            .and_then(|t| t.squeeze(0))
            .and_then(|t| t.to_vec1())
            .map_err(infer_err("softmax failed"))?;

        let mut ranked: Vec<(&str, f64)> = self
            .labels
            .iter()
            .map(String::as_str)
            .zip(probs.iter().map(|&p| f64::from(p)))
            .collect();
        ranked.sort_by(|a, b| b.1.total_cmp(&a.1));

        tracing::debug!(
            latency_us = start.elapsed().as_micros() as u64,
            top = ranked.first().map(|(label, _)| *label).unwrap_or_default(),
            "DistilBERT inference complete"
        );

        Ok(RawOutput::ranked(ranked))
    }
}

fn download(options: &DistilBertOptions) -> Result<PathBuf> {
    tracing::info!(repo = %options.repo, revision = %options.revision, "Fetching model from Hugging Face Hub");

    let api = Api::new().map_err(load_err("failed to initialize Hugging Face API"))?;
    let repo = api.repo(Repo::with_revision(
        options.repo.clone(),
        RepoType::Model,
        options.revision.clone(),
    ));

    let mut config_path = None;
    for file in ["config.json", "tokenizer.json", "model.safetensors"] {
        let path = repo
            .get(file)
            .map_err(|e| Error::model_load(format!("failed to download {file}: {e}")))?;
        if file == "config.json" {
            config_path = Some(path);
        }
    }

    config_path
        .as_deref()
        .and_then(Path::parent)
        .map(Path::to_path_buf)
        .ok_or_else(|| Error::model_load("invalid model cache path"))
}

fn get_device(device: &str) -> Result<Device> {
    match device.to_lowercase().as_str() {
        "cuda" | "cuda:0" => Device::new_cuda(0).map_err(load_err("failed to initialize CUDA")),
        "mps" | "metal" => Device::new_metal(0).map_err(load_err("failed to initialize Metal")),
        _ => Ok(Device::Cpu),
    }
}

/// Labels in class-index order, from `id2label` when present
fn labels_from_config(config: &serde_json::Value) -> Vec<String> {
    let Some(id2label) = config.get("id2label").and_then(|v| v.as_object()) else {
        return vec!["NEGATIVE".to_string(), "POSITIVE".to_string()];
    };

    let mut labels: Vec<(usize, String)> = id2label
        .iter()
        .filter_map(|(id, label)| Some((id.parse().ok()?, label.as_str()?.to_string())))
        .collect();
    labels.sort_by_key(|(id, _)| *id);

    if labels.is_empty() {
        vec!["NEGATIVE".to_string(), "POSITIVE".to_string()]
    } else {
        labels.into_iter().map(|(_, label)| label).collect()
    }
}

/// Load a linear layer that some checkpoints omit.
///
/// Absent weights yield `None`; weights that exist but fail to load are an error.
fn optional_linear(
    vb: &VarBuilder,
    name: &str,
    in_dim: usize,
    out_dim: usize,
) -> Result<Option<Linear>> {
    if !vb.contains_tensor(&format!("{name}.weight")) {
        return Ok(None);
    }
    candle_nn::linear(in_dim, out_dim, vb.pp(name))
        .map(Some)
        .map_err(|e| Error::model_load(format!("failed to load {name}: {e}")))
}

fn load_err<E: Display>(context: &'static str) -> impl FnOnce(E) -> Error {
    move |e| Error::model_load(format!("{context}: {e}"))
}

fn infer_err<E: Display>(context: &'static str) -> impl FnOnce(E) -> Error {
    move |e| Error::inference(format!("{context}: {e}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::collections::HashMap;

    fn weights(tensors: &[(&str, &[usize])]) -> VarBuilder<'static> {
        let map: HashMap<String, Tensor> = tensors
            .iter()
            .map(|(name, dims)| {
                let tensor = Tensor::zeros(*dims, DType::F32, &Device::Cpu).unwrap();
                (name.to_string(), tensor)
            })
            .collect();
        VarBuilder::from_tensors(map, DType::F32, &Device::Cpu)
    }

    #[test]
    fn test_labels_follow_class_index_order() {
        let config = json!({"id2label": {"1": "POSITIVE", "0": "NEGATIVE"}});
        assert_eq!(labels_from_config(&config), vec!["NEGATIVE", "POSITIVE"]);
    }

    #[test]
    fn test_labels_default_to_sst2() {
        assert_eq!(labels_from_config(&json!({})), vec!["NEGATIVE", "POSITIVE"]);
    }

    #[test]
    fn test_missing_model_dir_fails_to_load() {
        let options = DistilBertOptions::default();
        let err = DistilBertProvider::from_dir(Path::new("/nonexistent/model"), &options)
            .err()
            .unwrap();
        assert!(matches!(err, Error::ModelLoad(_)));
    }

    #[test]
    fn test_absent_pre_classifier_is_skipped() {
        let vb = weights(&[("classifier.weight", &[2, 4]), ("classifier.bias", &[2])]);
        assert!(optional_linear(&vb, "pre_classifier", 4, 4).unwrap().is_none());
    }

    #[test]
    fn test_present_pre_classifier_is_loaded() {
        let vb = weights(&[
            ("pre_classifier.weight", &[4, 4]),
            ("pre_classifier.bias", &[4]),
        ]);
        assert!(optional_linear(&vb, "pre_classifier", 4, 4).unwrap().is_some());
    }

    #[test]
    fn test_broken_pre_classifier_is_a_load_error() {
        // Wrong shape
        let vb = weights(&[
            ("pre_classifier.weight", &[3, 4]),
            ("pre_classifier.bias", &[4]),
        ]);
        let err = optional_linear(&vb, "pre_classifier", 4, 4).unwrap_err();
        assert!(matches!(err, Error::ModelLoad(_)));

        // Bias missing
        let vb = weights(&[("pre_classifier.weight", &[4, 4])]);
        let err = optional_linear(&vb, "pre_classifier", 4, 4).unwrap_err();
        assert!(matches!(err, Error::ModelLoad(_)));
    }
}
