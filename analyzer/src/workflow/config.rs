use anyhow::Context;
use multipathcore::prelude::DetectorConfig;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Which recording the multipath detector screens.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DetectionInput {
    /// Recording rebuilt from the tracks that survive the track filter.
    #[default]
    Filtered,
    /// Recording as ingested, before any track processing.
    Raw,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkflowConfig {
    pub detector: DetectorConfig,
    pub detection_input: DetectionInput,
    pub output_dir: Option<PathBuf>,
    pub ledger: Option<PathBuf>,
}

impl WorkflowConfig {
    pub fn load<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path_ref = path.as_ref();
        let contents = fs::read_to_string(path_ref)
            .with_context(|| format!("reading workflow config {}", path_ref.display()))?;
        let config: WorkflowConfig = serde_yaml::from_str(&contents)
            .with_context(|| format!("parsing workflow config {}", path_ref.display()))?;
        Ok(config)
    }

    pub fn from_args(
        detection_input: DetectionInput,
        output_dir: Option<PathBuf>,
        ledger: Option<PathBuf>,
    ) -> Self {
        Self {
            detector: DetectorConfig::default(),
            detection_input,
            output_dir,
            ledger,
        }
    }

    /// Command-line paths win over the ones read from YAML.
    pub fn with_overrides(mut self, output_dir: Option<PathBuf>, ledger: Option<PathBuf>) -> Self {
        if output_dir.is_some() {
            self.output_dir = output_dir;
        }
        if ledger.is_some() {
            self.ledger = ledger;
        }
        self
    }

    pub fn detector_config(&self) -> DetectorConfig {
        self.detector.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn config_from_args_uses_default_thresholds() {
        let cfg = WorkflowConfig::from_args(DetectionInput::Raw, None, None);
        assert_eq!(cfg.detector_config().parent_min_area, 150.0);
        assert_eq!(cfg.detection_input, DetectionInput::Raw);
    }

    #[test]
    fn config_load_reads_yaml() {
        let mut temp = NamedTempFile::new().unwrap();
        temp.write_all(
            b"detector:\n  parent_max_range: 60.0\n  min_persistence_scans: 5\ndetection_input: raw\n",
        )
        .unwrap();
        let path = temp.into_temp_path();
        let cfg = WorkflowConfig::load(&path).unwrap();
        assert_eq!(cfg.detector.parent_max_range, 60.0);
        assert_eq!(cfg.detector.min_persistence_scans, 5);
        assert_eq!(cfg.detector.association_distance, 10.0);
        assert_eq!(cfg.detection_input, DetectionInput::Raw);
        assert!(cfg.output_dir.is_none());
    }

    #[test]
    fn overrides_replace_only_given_paths() {
        let cfg = WorkflowConfig::from_args(
            DetectionInput::Filtered,
            Some(PathBuf::from("plots")),
            Some(PathBuf::from("ledger.txt")),
        )
        .with_overrides(None, Some(PathBuf::from("other.txt")));
        assert_eq!(cfg.output_dir, Some(PathBuf::from("plots")));
        assert_eq!(cfg.ledger, Some(PathBuf::from("other.txt")));
    }
}
