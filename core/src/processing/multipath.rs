use crate::multipath::{MultiPathAggregate, MultiPathChild, MultiPathParent};
use crate::prelude::{DetectorConfig, ProcessingStage, StageError, StageResult};
use crate::scan_interface::ScanSet;
use crate::telemetry::log::LogManager;

/// Every detection closer than `parent_max_range` whose cluster area is
/// strictly above `parent_min_area`, in scan order.
pub fn find_parent_candidates(scans: &ScanSet, config: &DetectorConfig) -> Vec<MultiPathParent> {
    let half_width = config.sector_half_width_rad();
    let (max_range, min_area) = (config.parent_max_range, config.parent_min_area);
    scans
        .iter()
        .flat_map(|scan| {
            scan.detections
                .iter()
                .filter(move |d| d.range() < max_range && d.area > min_area)
                .map(move |d| MultiPathParent::from_detection(scan.timestamp, d, half_width))
        })
        .collect()
}

/// Pairs each candidate with the detections of its own scan that sit inside
/// its sector and farther out. Each candidate forms its own group.
pub fn confirm_children(scans: &ScanSet, candidates: &[MultiPathParent]) -> MultiPathAggregate {
    let mut aggregate = MultiPathAggregate::new();
    for parent in candidates {
        let Some(scan) = scans.scan_at(parent.timestamp) else {
            continue;
        };
        let children: Vec<MultiPathChild> = scan
            .detections
            .iter()
            .map(MultiPathChild::from_detection)
            .filter(|child| parent.shadows(child))
            .collect();
        aggregate.add_group(parent.clone(), children);
    }
    aggregate
}

/// Runs discovery then confirmation. `None` means the recording shows no
/// multipath that persists over more than `min_persistence_scans` scans.
pub fn check_for_multi_path(scans: &ScanSet, config: &DetectorConfig) -> Option<MultiPathAggregate> {
    let candidates = find_parent_candidates(scans, config);
    let aggregate = confirm_children(scans, &candidates);
    aggregate
        .is_valid(config.min_persistence_scans)
        .then_some(aggregate)
}

/// Stage wrapper around [`check_for_multi_path`].
pub struct MultipathStage {
    config: Option<DetectorConfig>,
    logger: LogManager,
}

impl MultipathStage {
    pub fn new() -> Self {
        Self {
            config: None,
            logger: LogManager::new("multipath"),
        }
    }
}

impl Default for MultipathStage {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a> ProcessingStage<&'a ScanSet> for MultipathStage {
    type Output = Option<MultiPathAggregate>;

    fn initialize(&mut self, config: &DetectorConfig) -> StageResult<()> {
        self.config = Some(config.clone());
        Ok(())
    }

    fn execute(&mut self, input: &'a ScanSet) -> StageResult<Option<MultiPathAggregate>> {
        let config = self
            .config
            .as_ref()
            .ok_or_else(|| StageError::Internal("stage not initialized".into()))?;

        let candidates = find_parent_candidates(input, config);
        self.logger
            .detail(&format!("{} parent candidates", candidates.len()));

        let aggregate = confirm_children(input, &candidates);
        if aggregate.is_valid(config.min_persistence_scans) {
            self.logger.record(&format!(
                "multipath over {} scans: {} parents, {} children",
                aggregate.number_of_timestamps(),
                aggregate.number_of_parents(),
                aggregate.number_of_children()
            ));
            Ok(Some(aggregate))
        } else {
            self.logger.record(&format!(
                "no multipath ({} scans with confirmed children)",
                aggregate.number_of_timestamps()
            ));
            Ok(None)
        }
    }

    fn cleanup(&mut self) {
        self.config = None;
    }
}
