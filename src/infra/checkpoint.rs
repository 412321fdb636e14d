// ============================================================
// Layer 6 — Model Store
// ============================================================
// Writes the trained parameters with Burn's CompactRecorder and
// the run configuration as JSON.
//
// What gets written:
//   results/
//     iris_nn_model.mpk   ← model parameters
//     run_config.json     ← hyperparameters and paths of the run
//
// CompactRecorder:
//   - Serialises the record to named MessagePack, half precision
//   - Appends its own file extension ("mpk"), so the store is
//     given the path WITHOUT an extension and asks the recorder
//     which extension it used
//
// The files are written once at the end of a run and never read
// back by this program.
//
// Reference: Burn Book §5 (Records and Checkpointing)

use std::{fs, path::PathBuf};

use burn::{
    prelude::*,
    record::{CompactRecorder, FileRecorder, Recorder},
};

use crate::application::train_use_case::RunConfig;
use crate::domain::error::{PipelineError, Result};
use crate::ml::model::IrisClassifier;

pub struct ModelStore {
    /// Model file path without extension
    stem: PathBuf,
    /// Where the run config JSON goes
    config_path: PathBuf,
}

impl ModelStore {
    pub fn new(stem: impl Into<PathBuf>, config_path: impl Into<PathBuf>) -> Self {
        Self { stem: stem.into(), config_path: config_path.into() }
    }

    /// Final on-disk path of the model file, using the extension
    /// CompactRecorder appends for backend `B`.
    pub fn model_path<B: Backend>(&self) -> PathBuf {
        let ext = <CompactRecorder as FileRecorder<B>>::file_extension();
        self.stem.with_extension(ext)
    }

    /// Save model parameters.
    ///
    /// Uses Burn's CompactRecorder which:
    ///   1. Calls model.into_record() to extract all parameters
    ///   2. Serialises to named MessagePack in half precision
    ///   3. Writes `<stem>.mpk`
    pub fn save_model<B: Backend>(&self, model: &IrisClassifier<B>) -> Result<PathBuf> {
        CompactRecorder::new()
            .record(model.clone().into_record(), self.stem.clone())
            .map_err(|e| {
                PipelineError::io(format!(
                    "failed to save model to '{}': {e}",
                    self.stem.display()
                ))
            })?;

        let path = self.model_path::<B>();
        if !path.is_file() {
            return Err(PipelineError::io(format!(
                "recorder reported success but '{}' does not exist",
                path.display()
            )));
        }
        tracing::info!("Saved model parameters to '{}'", path.display());
        Ok(path)
    }

    /// Save the run configuration as pretty-printed JSON.
    pub fn save_config(&self, cfg: &RunConfig) -> Result<()> {
        let json = serde_json::to_string_pretty(cfg)
            .map_err(|e| PipelineError::io(format!("cannot serialise run config: {e}")))?;
        fs::write(&self.config_path, json).map_err(|e| {
            PipelineError::io(format!(
                "cannot write config to '{}': {e}",
                self.config_path.display()
            ))
        })?;
        tracing::debug!("Saved run config to '{}'", self.config_path.display());
        Ok(())
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use burn::backend::{ndarray::NdArrayDevice, NdArray};

    use crate::ml::model::IrisClassifierConfig;

    fn scratch_dir(tag: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("iris_store_{tag}_{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn test_model_file_gets_recorder_extension() {
        let dir = scratch_dir("model");
        let store = ModelStore::new(dir.join("iris_nn_model"), dir.join("run_config.json"));
        let model: IrisClassifier<NdArray> = IrisClassifierConfig::new(4, 3).init(&NdArrayDevice::Cpu);

        let path = store.save_model(&model).unwrap();
        assert_eq!(path, dir.join("iris_nn_model.mpk"));
        assert_eq!(path, store.model_path::<NdArray>());
        assert!(store.model_path::<NdArray>().is_file());
        assert!(fs::metadata(&path).unwrap().len() > 0);
    }

    #[test]
    fn test_config_round_trips_through_json() {
        let dir = scratch_dir("config");
        let store = ModelStore::new(dir.join("m"), dir.join("run_config.json"));
        let cfg = RunConfig::default();
        store.save_config(&cfg).unwrap();

        let json = fs::read_to_string(dir.join("run_config.json")).unwrap();
        let back: RunConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back.epochs, cfg.epochs);
        assert_eq!(back.batch_size, cfg.batch_size);
    }

    #[test]
    fn test_unwritable_config_path_is_io_error() {
        let dir = scratch_dir("missing");
        let store = ModelStore::new(dir.join("m"), dir.join("no_such_dir").join("run_config.json"));
        let err = store.save_config(&RunConfig::default()).unwrap_err();
        assert!(matches!(err, PipelineError::Io(_)));
    }
}
