use crate::ingest::load_recording;
use crate::report_bridge::model::ReportModel;
use crate::workflow::config::{DetectionInput, WorkflowConfig};
use crate::workflow::ledger::{output_directory, ScenarioLedger};
use anyhow::Context;
use multipathcore::multipath::MultiPathAggregate;
use multipathcore::prelude::ProcessingStage;
use multipathcore::processing::{
    reconstruct_scans, MultipathStage, TrackBuilderStage, TrackFilterStage,
};
use multipathcore::scan_interface::ScanSet;
use std::path::{Path, PathBuf};

pub struct WorkflowResult {
    pub scan_count: usize,
    pub track_count: usize,
    pub retained_track_count: usize,
    pub filtered: ScanSet,
    pub multipath: Option<MultiPathAggregate>,
}

/// What happened to one recording on disk.
pub struct FileOutcome {
    pub result: WorkflowResult,
    pub report_path: Option<PathBuf>,
    pub ledger_updated: bool,
}

#[derive(Clone)]
pub struct Runner {
    config: WorkflowConfig,
}

impl Runner {
    pub fn new(config: WorkflowConfig) -> Self {
        Self { config }
    }

    pub fn execute(&self, scans: &ScanSet) -> anyhow::Result<WorkflowResult> {
        let detector_config = self.config.detector_config();

        let mut builder = TrackBuilderStage::new();
        builder
            .initialize(&detector_config)
            .context("initializing track builder")?;
        let tracks = builder.execute(scans).context("building tracks")?;
        builder.cleanup();
        let track_count = tracks.len();

        let mut filter = TrackFilterStage::new();
        filter
            .initialize(&detector_config)
            .context("initializing track filter")?;
        let retained = filter.execute(tracks).context("filtering tracks")?;
        filter.cleanup();

        let filtered =
            reconstruct_scans(&retained, scans).context("rebuilding scans from tracks")?;

        let mut detector = MultipathStage::new();
        detector
            .initialize(&detector_config)
            .context("initializing multipath detector")?;
        let screened = match self.config.detection_input {
            DetectionInput::Filtered => &filtered,
            DetectionInput::Raw => scans,
        };
        let multipath = detector
            .execute(screened)
            .context("screening for multipath")?;
        detector.cleanup();

        Ok(WorkflowResult {
            scan_count: scans.len(),
            track_count,
            retained_track_count: retained.len(),
            filtered,
            multipath,
        })
    }

    /// Runs one recording and, when it shows multipath, lists it in the
    /// ledger and writes its report.
    pub fn process_file(&self, path: &Path) -> anyhow::Result<FileOutcome> {
        let scans = load_recording(path)?;
        let result = self
            .execute(&scans)
            .with_context(|| format!("processing {}", path.display()))?;

        let mut outcome = FileOutcome {
            result,
            report_path: None,
            ledger_updated: false,
        };
        if outcome.result.multipath.is_none() {
            return Ok(outcome);
        }

        if let Some(ledger_path) = self.config.ledger.as_ref() {
            outcome.ledger_updated = ScenarioLedger::new(ledger_path).record(path)?;
        }
        if let Some(output_root) = self.config.output_dir.as_ref() {
            let dir = output_directory(output_root, path)?;
            let source = path.file_name().map(|n| n.to_string_lossy().into_owned());
            let report = ReportModel::from_result(source, &outcome.result);
            outcome.report_path = Some(report.write_to(&dir)?);
        }

        Ok(outcome)
    }
}
