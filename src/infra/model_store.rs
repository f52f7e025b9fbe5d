// ============================================================
// Layer 6 — Model Store
// ============================================================
// Loads the three assets that make up a pretrained model
// directory:
//
//   <dir>/model_config.json   architecture hyperparameters
//   <dir>/model.mpk           weights (Burn CompactRecorder,
//                             half-precision MessagePack)
//   <dir>/tokenizer.json      HuggingFace-format tokenizer
//
// Why save the config separately?
//   To load weights we must first rebuild the exact network
//   shape (d_model, num_layers, ...). Without the config next
//   to the weights the model cannot be reconstructed.
//
// Pointing the store at a different directory swaps the model.
// Nothing else in the crate knows or cares which model it is,
// as long as the three files agree with each other.
//
// Reference: Burn Book §5 (Records)

use anyhow::{Context, Result};
use std::{
    fs,
    path::{Path, PathBuf},
};

use burn::prelude::*;
use burn::record::{CompactRecorder, Recorder};
use serde::{Deserialize, Serialize};
use tokenizers::Tokenizer;

use crate::ml::model::{SpanQaConfig, SpanQaModel};

/// Architecture hyperparameters stored next to the weights.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelConfig {
    pub vocab_size:  usize,
    pub max_seq_len: usize,
    pub d_model:     usize,
    pub num_heads:   usize,
    pub num_layers:  usize,
    pub d_ff:        usize,
}

impl ModelConfig {
    /// Translate into the network-builder config (dropout stays
    /// at its inference default of 0.0).
    pub fn to_span_config(&self) -> SpanQaConfig {
        SpanQaConfig::new(
            self.vocab_size,
            self.max_seq_len,
            self.d_model,
            self.num_heads,
            self.num_layers,
            self.d_ff,
        )
    }
}

/// Handle on a pretrained model directory.
pub struct ModelStore {
    dir: PathBuf,
}

impl ModelStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Read and parse `model_config.json`.
    pub fn load_config(&self) -> Result<ModelConfig> {
        let path = self.dir.join("model_config.json");
        let json = fs::read_to_string(&path)
            .with_context(|| format!("cannot read model config '{}'", path.display()))?;
        serde_json::from_str(&json)
            .with_context(|| format!("malformed model config '{}'", path.display()))
    }

    /// Load the tokenizer paired with the weights. Using any
    /// other vocabulary would make the token ids meaningless.
    pub fn load_tokenizer(&self) -> Result<Tokenizer> {
        let path = self.dir.join("tokenizer.json");
        Tokenizer::from_file(&path)
            .map_err(|e| anyhow::anyhow!("cannot load tokenizer '{}': {}", path.display(), e))
    }

    /// Rebuild the network from `config` and restore the
    /// recorded weights into it. Loading fails if the weights
    /// were recorded for a different architecture.
    pub fn load_model<B: Backend>(
        &self,
        config: &ModelConfig,
        device: &B::Device,
    ) -> Result<SpanQaModel<B>> {
        let model = config.to_span_config().init::<B>(device);

        // CompactRecorder appends its ".mpk" extension to the stem.
        let path = self.dir.join("model");
        let record = CompactRecorder::new()
            .load(path.clone(), device)
            .with_context(|| {
                format!("cannot load model weights from '{}'", path.display())
            })?;

        tracing::info!("model weights loaded from '{}'", self.dir.display());
        Ok(model.load_record(record))
    }
}


// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_directory_reports_which_asset() {
        let store = ModelStore::new("definitely/not/a/model/dir");
        let err = store.load_config().unwrap_err();
        assert!(format!("{err:#}").contains("model_config.json"));
        assert!(store.load_tokenizer().is_err());
    }

    #[test]
    fn assets_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        testkit::write_assets(dir.path()).unwrap();

        let store = ModelStore::new(dir.path());
        let cfg = store.load_config().unwrap();
        assert_eq!(cfg.vocab_size, testkit::tiny_config().vocab_size);
        assert_eq!(cfg.max_seq_len, testkit::tiny_config().max_seq_len);

        let tokenizer = store.load_tokenizer().unwrap();
        assert_eq!(tokenizer.token_to_id("[CLS]"), Some(2));
        assert_eq!(tokenizer.token_to_id("[SEP]"), Some(3));

        type B = burn::backend::NdArray;
        let device = <B as Backend>::Device::default();
        let model = store.load_model::<B>(&cfg, &device).unwrap();
        assert_eq!(model.max_seq_len(), cfg.max_seq_len);
    }

    #[test]
    fn weights_are_required() {
        let dir = tempfile::tempdir().unwrap();
        testkit::write_assets(dir.path()).unwrap();
        fs::remove_file(dir.path().join("model.mpk")).unwrap();

        let store = ModelStore::new(dir.path());
        let cfg = store.load_config().unwrap();

        type B = burn::backend::NdArray;
        let device = <B as Backend>::Device::default();
        assert!(store.load_model::<B>(&cfg, &device).is_err());
    }
}
