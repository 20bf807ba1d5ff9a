use anyhow::Context;
use multipathcore::prelude::{StageError, StageResult};
use multipathcore::scan_interface::{Detection, Point2, ScanSet};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Scan items of this type carry a clustered target with centroid and hull.
pub const CLUSTER_ITEM_TYPE: i64 = 3;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Stamp {
    pub secs: i64,
    pub nsecs: i64,
}

impl Stamp {
    pub fn seconds(&self) -> f64 {
        self.secs as f64 + self.nsecs as f64 * 1e-9
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecordHeader {
    pub stamp: Stamp,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct PlanarPoint {
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Hull {
    #[serde(default)]
    pub points: Vec<PlanarPoint>,
}

/// One item of a recorded scan, as exported from the radar bag.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanItem {
    #[serde(rename = "type")]
    pub kind: i64,
    #[serde(default)]
    pub cluster_centroid: Option<PlanarPoint>,
    #[serde(default)]
    pub area: Option<f64>,
    #[serde(default)]
    pub hull: Option<Hull>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanRecord {
    pub header: RecordHeader,
    #[serde(default)]
    pub scan: Vec<ScanItem>,
}

/// The bag reports x forward and y to port; detections are kept in the
/// plotting frame, so both axes are swapped here and nowhere else.
fn to_plot_frame(point: &PlanarPoint) -> (f64, f64) {
    (point.y, point.x)
}

fn item_to_detection(item: &ScanItem, scan_idx: usize) -> StageResult<Detection> {
    let missing = |field: &str| {
        StageError::MalformedInput(format!("scan {} cluster item lacks {}", scan_idx, field))
    };

    let centroid = item
        .cluster_centroid
        .as_ref()
        .ok_or_else(|| missing("cluster_centroid"))?;
    let area = item.area.ok_or_else(|| missing("area"))?;
    let hull = item.hull.as_ref().ok_or_else(|| missing("hull"))?;
    if hull.points.is_empty() {
        return Err(missing("hull points"));
    }

    let (x, y) = to_plot_frame(centroid);
    let ring = hull
        .points
        .iter()
        .map(|p| {
            let (hx, hy) = to_plot_frame(p);
            Point2::new(hx, hy)
        })
        .collect();
    Ok(Detection::from_hull(x, y, area, ring))
}

/// Flattens exported records into a recording whose first scan sits at t=0.
pub fn records_to_scan_set(records: &[ScanRecord]) -> StageResult<ScanSet> {
    let mut set = ScanSet::new();
    let Some(first) = records.first() else {
        return Ok(set);
    };
    let origin = first.header.stamp.seconds();

    for (idx, record) in records.iter().enumerate() {
        let timestamp = if idx == 0 {
            0.0
        } else {
            record.header.stamp.seconds() - origin
        };
        let detections = record
            .scan
            .iter()
            .filter(|item| item.kind == CLUSTER_ITEM_TYPE)
            .map(|item| item_to_detection(item, idx))
            .collect::<StageResult<Vec<_>>>()?;
        set.push_scan(timestamp, detections)?;
    }

    Ok(set)
}

pub fn parse_recording(contents: &str) -> anyhow::Result<ScanSet> {
    let records: Vec<ScanRecord> =
        serde_json::from_str(contents).context("decoding scan records")?;
    let scans = records_to_scan_set(&records)?;
    Ok(scans)
}

pub fn load_recording<P: AsRef<Path>>(path: P) -> anyhow::Result<ScanSet> {
    let path_ref = path.as_ref();
    let contents = fs::read_to_string(path_ref)
        .with_context(|| format!("reading recording {}", path_ref.display()))?;
    parse_recording(&contents).with_context(|| format!("parsing recording {}", path_ref.display()))
}
