//! Track association and multipath detection for recorded radar scans.
//!
//! A recording is a [`ScanSet`] of clustered detections. The pipeline links
//! detections into tracks, keeps the tracks that leave their home region,
//! rebuilds the recording from those tracks and finally looks for ghost
//! returns sitting behind large, close detections in the same bearing sector.

pub mod math;
pub mod multipath;
pub mod prelude;
pub mod processing;
pub mod scan_interface;
pub mod telemetry;

pub use multipath::MultiPathAggregate;
pub use prelude::{DetectorConfig, ProcessingStage, StageError, StageResult};
pub use scan_interface::{Detection, Point2, Scan, ScanSet, Track};
