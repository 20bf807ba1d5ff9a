/// Planar helpers shared by the tracker and the multipath detector.
pub struct GeometryHelper;

impl GeometryHelper {
    pub fn euclidean_distance(a: (f64, f64), b: (f64, f64)) -> f64 {
        ((a.0 - b.0).powi(2) + (a.1 - b.1).powi(2)).sqrt()
    }

    /// Converts a sensor-relative Cartesian position into `(range, bearing)`.
    pub fn to_polar(x: f64, y: f64) -> (f64, f64) {
        ((x * x + y * y).sqrt(), y.atan2(x))
    }

    pub fn to_cartesian(range: f64, bearing: f64) -> (f64, f64) {
        (range * bearing.cos(), range * bearing.sin())
    }

    /// True when `point` lies strictly inside the disk of `radius` around `center`.
    pub fn point_in_disk(center: (f64, f64), radius: f64, point: (f64, f64)) -> bool {
        Self::euclidean_distance(center, point) < radius
    }
}
