pub mod record;

pub use record::{load_recording, records_to_scan_set, ScanRecord};
