use crate::math::GeometryHelper;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Position of a track at one scan.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrackSample {
    pub timestamp: f64,
    pub x: f64,
    pub y: f64,
}

impl TrackSample {
    pub fn position(&self) -> (f64, f64) {
        (self.x, self.y)
    }
}

/// A persistent object: samples in non-decreasing timestamp order. Two
/// detections of one scan may land on the same track, so equal timestamps
/// are allowed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Track {
    pub id: usize,
    samples: Vec<TrackSample>,
}

impl Track {
    pub fn new(id: usize) -> Self {
        Self {
            id,
            samples: Vec::new(),
        }
    }

    /// Appends a sample. Returns `false` and leaves the track untouched when
    /// the timestamp is earlier than the last sample.
    pub fn push(&mut self, timestamp: f64, x: f64, y: f64) -> bool {
        if let Some(last) = self.samples.last() {
            if timestamp < last.timestamp {
                return false;
            }
        }
        self.samples.push(TrackSample { timestamp, x, y });
        true
    }

    pub fn samples(&self) -> &[TrackSample] {
        &self.samples
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn first(&self) -> Option<&TrackSample> {
        self.samples.first()
    }

    pub fn last(&self) -> Option<&TrackSample> {
        self.samples.last()
    }

    /// Straight-line distance from the first to the last sample.
    pub fn displacement(&self) -> f64 {
        match (self.samples.first(), self.samples.last()) {
            (Some(first), Some(last)) if self.samples.len() >= 2 => {
                GeometryHelper::euclidean_distance(first.position(), last.position())
            }
            _ => 0.0,
        }
    }

    /// Sum of the distances between consecutive samples.
    pub fn path_length(&self) -> f64 {
        self.samples
            .windows(2)
            .map(|pair| GeometryHelper::euclidean_distance(pair[0].position(), pair[1].position()))
            .sum()
    }
}

impl fmt::Display for Track {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Track {} with {} samples", self.id, self.samples.len())?;
        for sample in &self.samples {
            writeln!(
                f,
                "Timestamp: {:.2}, x: {:.2}, y: {:.2}",
                sample.timestamp, sample.x, sample.y
            )?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn push_rejects_only_earlier_timestamps() {
        let mut track = Track::new(7);
        assert!(track.push(0.0, 1.0, 1.0));
        assert!(track.push(0.1, 2.0, 1.0));
        assert!(track.push(0.1, 3.0, 1.0));
        assert!(!track.push(0.05, 4.0, 1.0));
        assert_eq!(track.len(), 3);
        assert_eq!(track.last().map(|s| s.x), Some(3.0));
    }

    #[test]
    fn single_sample_has_zero_displacement() {
        let mut track = Track::new(0);
        track.push(0.0, 5.0, 5.0);
        assert_eq!(track.displacement(), 0.0);
        assert_eq!(track.path_length(), 0.0);
    }

    #[test]
    fn displacement_and_path_length_differ_for_detours() {
        let mut track = Track::new(0);
        track.push(0.0, 0.0, 0.0);
        track.push(1.0, 3.0, 4.0);
        track.push(2.0, 0.0, 0.0);
        assert_eq!(track.displacement(), 0.0);
        assert_eq!(track.path_length(), 10.0);
    }

    #[test]
    fn display_lists_every_sample() {
        let mut track = Track::new(3);
        track.push(0.0, 1.0, 2.0);
        let text = track.to_string();
        assert!(text.starts_with("Track 3 with 1 samples"));
        assert!(text.contains("x: 1.00, y: 2.00"));
    }
}
