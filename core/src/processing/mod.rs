pub mod multipath;
pub mod track_builder;
pub mod track_filter;

pub use multipath::{check_for_multi_path, MultipathStage};
pub use track_builder::{nearest_neighbor, TrackBuilderStage};
pub use track_filter::{filter_tracks, reconstruct_scans, TrackFilterStage};
