use crate::math::GeometryHelper;
use serde::{Deserialize, Serialize};

/// Planar vertex of a cluster hull, in sensor-relative meters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point2 {
    pub x: f64,
    pub y: f64,
}

impl Point2 {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// One radar cluster observed in one scan.
///
/// `polygon` is a closed ring: the first vertex is repeated at the end.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Detection {
    pub x: f64,
    pub y: f64,
    pub area: f64,
    pub polygon: Vec<Point2>,
}

impl Detection {
    pub fn new(x: f64, y: f64, area: f64, polygon: Vec<Point2>) -> Self {
        Self {
            x,
            y,
            area,
            polygon,
        }
    }

    /// Builds a detection from an open hull, closing the ring.
    pub fn from_hull(x: f64, y: f64, area: f64, hull: Vec<Point2>) -> Self {
        let mut polygon = hull;
        if let Some(&first) = polygon.first() {
            if polygon.last() != Some(&first) || polygon.len() == 1 {
                polygon.push(first);
            }
        }
        Self::new(x, y, area, polygon)
    }

    pub fn position(&self) -> (f64, f64) {
        (self.x, self.y)
    }

    pub fn range(&self) -> f64 {
        GeometryHelper::to_polar(self.x, self.y).0
    }

    pub fn bearing(&self) -> f64 {
        GeometryHelper::to_polar(self.x, self.y).1
    }

    pub fn has_closed_ring(&self) -> bool {
        match (self.polygon.first(), self.polygon.last()) {
            (Some(first), Some(last)) => self.polygon.len() > 1 && first == last,
            _ => true,
        }
    }
}
