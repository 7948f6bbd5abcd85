use crate::batch::BatchOptions;
use crate::error::{HazeError, Result};
use crate::executor::ExecutorParams;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Batch run settings; every field is optional in the file.
///
/// ```json
/// {
///   "params": { "refiner": "guided", "omega": 0.9 },
///   "parallel": true,
///   "seed": 42,
///   "report": "out/report.json"
/// }
/// ```
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct BatchConfig {
    pub params: ExecutorParams,
    pub parallel: bool,
    pub seed: Option<u64>,
    /// Where to write the JSON batch report, if anywhere.
    pub report: Option<PathBuf>,
}

impl BatchConfig {
    pub fn options(&self) -> BatchOptions {
        BatchOptions {
            params: self.params.clone(),
            parallel: self.parallel,
            seed: self.seed,
        }
    }
}

pub fn load_config(path: &Path) -> Result<BatchConfig> {
    let data = fs::read_to_string(path).map_err(|e| {
        HazeError::Config(format!("Failed to read config {}: {e}", path.display()))
    })?;
    let config: BatchConfig = serde_json::from_str(&data).map_err(|e| {
        HazeError::Config(format!("Failed to parse config {}: {e}", path.display()))
    })?;
    config.params.validate()?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::refine::RefinerKind;

    #[test]
    fn loads_partial_config() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("params.json");
        fs::write(
            &path,
            r#"{ "params": { "refiner": "guided", "t0": 0.2 }, "parallel": true, "seed": 5 }"#,
        )
        .unwrap();
        let config = load_config(&path).unwrap();
        assert_eq!(config.params.refiner, RefinerKind::Guided);
        assert_eq!(config.params.t0, 0.2);
        assert_eq!(config.params.patch_size, 15);
        assert!(config.parallel);
        assert_eq!(config.options().seed, Some(5));
        assert!(config.report.is_none());
    }

    #[test]
    fn bad_files_are_config_errors() {
        let dir = tempfile::tempdir().unwrap();
        let missing = load_config(&dir.path().join("nope.json")).unwrap_err();
        assert!(matches!(missing, HazeError::Config(_)));

        let path = dir.path().join("broken.json");
        fs::write(&path, "{ not json").unwrap();
        assert!(matches!(load_config(&path).unwrap_err(), HazeError::Config(_)));

        fs::write(&path, r#"{ "params": { "patch_size": 4 } }"#).unwrap();
        assert!(load_config(&path).unwrap_err().is_invalid_argument());
    }
}
