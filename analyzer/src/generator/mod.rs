pub mod scenario;

pub use scenario::build_scan_set;
