use crate::prelude::{StageError, StageResult};
use crate::scan_interface::detection::Detection;
use serde::{Deserialize, Serialize};

/// Detections observed at one timestamp, in seconds relative to the first scan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scan {
    pub timestamp: f64,
    pub detections: Vec<Detection>,
}

impl Scan {
    pub fn new(timestamp: f64, detections: Vec<Detection>) -> Self {
        Self {
            timestamp,
            detections,
        }
    }

    /// First detection located exactly at `position`.
    pub fn find_at(&self, position: (f64, f64)) -> Option<&Detection> {
        self.detections.iter().find(|d| d.position() == position)
    }

    /// Index of the first detection at exactly `position` whose `claimed`
    /// flag is still false. Detections past the end of `claimed` count as
    /// unclaimed.
    pub fn find_unclaimed_at(&self, position: (f64, f64), claimed: &[bool]) -> Option<usize> {
        self.detections.iter().enumerate().position(|(idx, d)| {
            d.position() == position && !claimed.get(idx).copied().unwrap_or(false)
        })
    }
}

/// A recording: scans ordered by strictly increasing timestamp.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScanSet {
    scans: Vec<Scan>,
}

impl ScanSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a scan set, validating every scan in order.
    pub fn from_scans(scans: Vec<Scan>) -> StageResult<Self> {
        let mut set = Self::new();
        for scan in scans {
            set.push_scan(scan.timestamp, scan.detections)?;
        }
        Ok(set)
    }

    pub fn push_scan(&mut self, timestamp: f64, detections: Vec<Detection>) -> StageResult<()> {
        if !timestamp.is_finite() {
            return Err(StageError::MalformedInput(format!(
                "scan timestamp {} is not finite",
                timestamp
            )));
        }
        if let Some(last) = self.scans.last() {
            if timestamp <= last.timestamp {
                return Err(StageError::MalformedInput(format!(
                    "scan timestamp {:.6} does not follow {:.6}",
                    timestamp, last.timestamp
                )));
            }
        }
        if let Some(open) = detections.iter().position(|d| !d.has_closed_ring()) {
            return Err(StageError::MalformedInput(format!(
                "detection {} at t={:.6} has an open hull ring",
                open, timestamp
            )));
        }

        self.scans.push(Scan::new(timestamp, detections));
        Ok(())
    }

    pub fn scans(&self) -> &[Scan] {
        &self.scans
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Scan> {
        self.scans.iter()
    }

    pub fn len(&self) -> usize {
        self.scans.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scans.is_empty()
    }

    pub fn detection_count(&self) -> usize {
        self.scans.iter().map(|s| s.detections.len()).sum()
    }

    /// Index of the scan recorded at exactly `timestamp`.
    pub fn position_of(&self, timestamp: f64) -> Option<usize> {
        self.scans
            .binary_search_by(|scan| scan.timestamp.total_cmp(&timestamp))
            .ok()
    }

    pub fn scan_at(&self, timestamp: f64) -> Option<&Scan> {
        self.position_of(timestamp).map(|idx| &self.scans[idx])
    }
}

impl<'a> IntoIterator for &'a ScanSet {
    type Item = &'a Scan;
    type IntoIter = std::slice::Iter<'a, Scan>;

    fn into_iter(self) -> Self::IntoIter {
        self.scans.iter()
    }
}
