use serde::{Deserialize, Serialize};

/// Thresholds shared by every pipeline stage.
///
/// Defaults reproduce the values the recorded-scan tooling was tuned with.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectorConfig {
    /// Maximum distance (m) between a detection and a track's last sample for association.
    pub association_distance: f64,
    /// Radius (m) of the home disk around a track's first sample.
    pub stationary_radius: f64,
    /// A parent candidate must lie strictly closer than this range (m).
    pub parent_max_range: f64,
    /// A parent candidate's cluster area must strictly exceed this value.
    pub parent_min_area: f64,
    /// Half width of the sector around a parent's bearing, in degrees.
    pub sector_half_width_deg: f64,
    /// The aggregate is valid only when it spans more distinct scans than this.
    pub min_persistence_scans: usize,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            association_distance: 10.0,
            stationary_radius: 30.0,
            parent_max_range: 50.0,
            parent_min_area: 150.0,
            sector_half_width_deg: 6.0,
            min_persistence_scans: 3,
        }
    }
}

impl DetectorConfig {
    pub fn sector_half_width_rad(&self) -> f64 {
        self.sector_half_width_deg.to_radians()
    }
}

/// Common error type for stage execution.
#[derive(thiserror::Error, Debug, PartialEq)]
pub enum StageError {
    #[error("malformed input: {0}")]
    MalformedInput(String),
    #[error("internal failure: {0}")]
    Internal(String),
}

pub type StageResult<T> = Result<T, StageError>;

/// Trait describing the batch stages of the multipath pipeline.
///
/// A stage is initialized with the shared thresholds, executed once per
/// recording and cleaned up afterwards.
pub trait ProcessingStage<I> {
    type Output;

    fn initialize(&mut self, config: &DetectorConfig) -> StageResult<()>;
    fn execute(&mut self, input: I) -> StageResult<Self::Output>;
    fn cleanup(&mut self);
}
