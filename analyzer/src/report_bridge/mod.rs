pub mod bridge;
pub mod model;

pub use bridge::{report_bind_address, ReportBridge};
pub use model::ReportModel;
