use crate::scan_interface::{Detection, Point2};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A detection close to the sensor that may be reflecting into a ghost.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MultiPathParent {
    pub timestamp: f64,
    pub x: f64,
    pub y: f64,
    pub range: f64,
    pub bearing: f64,
    pub theta_min: f64,
    pub theta_max: f64,
    pub area: f64,
    pub polygon: Vec<Point2>,
}

impl MultiPathParent {
    /// Binds a detection to its scan, opening a sector of `half_width` radians
    /// on each side of its bearing.
    pub fn from_detection(timestamp: f64, detection: &Detection, half_width: f64) -> Self {
        let range = detection.range();
        let bearing = detection.bearing();
        Self {
            timestamp,
            x: detection.x,
            y: detection.y,
            range,
            bearing,
            theta_min: bearing - half_width,
            theta_max: bearing + half_width,
            area: detection.area,
            polygon: detection.polygon.clone(),
        }
    }

    /// Strictly inside the sector and strictly farther than the parent.
    pub fn shadows(&self, child: &MultiPathChild) -> bool {
        self.theta_min < child.bearing && child.bearing < self.theta_max && child.range > self.range
    }
}

impl fmt::Display for MultiPathParent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "MultiPathParent: x = {:.2}, y = {:.2}, r = {:.2}, theta = {:.2}, cluster_area = {:.2}",
            self.x, self.y, self.range, self.bearing, self.area
        )
    }
}

/// A detection that may be the ghost of a parent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MultiPathChild {
    pub x: f64,
    pub y: f64,
    pub range: f64,
    pub bearing: f64,
}

impl MultiPathChild {
    pub fn from_detection(detection: &Detection) -> Self {
        Self {
            x: detection.x,
            y: detection.y,
            range: detection.range(),
            bearing: detection.bearing(),
        }
    }
}

impl fmt::Display for MultiPathChild {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "MultiPathChild: x = {:.2}, y = {:.2}, r = {:.2}, theta = {:.2}",
            self.x, self.y, self.range, self.bearing
        )
    }
}
