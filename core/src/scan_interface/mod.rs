pub mod detection;
pub mod scan;
pub mod track;

pub use detection::{Detection, Point2};
pub use scan::{Scan, ScanSet};
pub use track::{Track, TrackSample};
