use crate::workflow::runner::WorkflowResult;
use anyhow::Context;
use multipathcore::multipath::MultiPathAggregate;
use multipathcore::scan_interface::ScanSet;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub const REPORT_FILE_NAME: &str = "report.json";

/// Everything an external renderer needs to draw one recording: the
/// track-filtered scans and, when found, the multipath aggregate.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ReportModel {
    pub source: Option<String>,
    pub scan_count: usize,
    pub track_count: usize,
    pub retained_track_count: usize,
    pub scans: ScanSet,
    pub multipath: Option<MultiPathAggregate>,
    pub notes: Vec<String>,
}

impl ReportModel {
    pub fn from_result(source: Option<String>, result: &WorkflowResult) -> Self {
        let mut notes = Vec::new();
        match result.multipath.as_ref() {
            Some(aggregate) => notes.push(format!(
                "multipath over {} scans: {} parents, {} children",
                aggregate.number_of_timestamps(),
                aggregate.number_of_parents(),
                aggregate.number_of_children()
            )),
            None => notes.push("no multipath".to_string()),
        }

        Self {
            source,
            scan_count: result.scan_count,
            track_count: result.track_count,
            retained_track_count: result.retained_track_count,
            scans: result.filtered.clone(),
            multipath: result.multipath.clone(),
            notes,
        }
    }

    pub fn write_to(&self, dir: &Path) -> anyhow::Result<PathBuf> {
        let path = dir.join(REPORT_FILE_NAME);
        let body = serde_json::to_string_pretty(self).context("serializing report")?;
        fs::write(&path, body).with_context(|| format!("writing report {}", path.display()))?;
        Ok(path)
    }
}
