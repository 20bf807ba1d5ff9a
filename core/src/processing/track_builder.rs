use crate::math::GeometryHelper;
use crate::prelude::{DetectorConfig, ProcessingStage, StageError, StageResult};
use crate::scan_interface::{ScanSet, Track};
use crate::telemetry::log::LogManager;

/// Greedy nearest-neighbour association of scan detections into tracks.
///
/// While no track exists, every detection of the scan starts its own track.
/// Afterwards a detection joins the track whose last sample is closest, when
/// that distance is strictly below `association_distance`; ties go to the
/// lower track index. Detections are matched in scan order against the
/// current last sample of every track, including tracks extended or born
/// earlier in the same scan. Several detections of one scan can therefore
/// chain onto a single track; that first-come-first-served artifact is kept.
pub fn nearest_neighbor(scans: &ScanSet, association_distance: f64) -> Vec<Track> {
    let mut tracks: Vec<Track> = Vec::new();

    for scan in scans {
        if tracks.is_empty() {
            for detection in &scan.detections {
                let mut track = Track::new(tracks.len());
                track.push(scan.timestamp, detection.x, detection.y);
                tracks.push(track);
            }
            continue;
        }

        for detection in &scan.detections {
            let mut nearest: Option<(usize, f64)> = None;
            for (idx, track) in tracks.iter().enumerate() {
                let Some(last) = track.last() else { continue };
                let distance =
                    GeometryHelper::euclidean_distance(last.position(), detection.position());
                if nearest.map_or(true, |(_, best)| distance < best) {
                    nearest = Some((idx, distance));
                }
            }

            match nearest {
                Some((idx, distance)) if distance < association_distance => {
                    tracks[idx].push(scan.timestamp, detection.x, detection.y);
                }
                _ => {
                    let mut track = Track::new(tracks.len());
                    track.push(scan.timestamp, detection.x, detection.y);
                    tracks.push(track);
                }
            }
        }
    }

    tracks
}

/// Stage wrapper that builds tracks from a recording.
pub struct TrackBuilderStage {
    config: Option<DetectorConfig>,
    logger: LogManager,
}

impl TrackBuilderStage {
    pub fn new() -> Self {
        Self {
            config: None,
            logger: LogManager::new("track-builder"),
        }
    }
}

impl Default for TrackBuilderStage {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a> ProcessingStage<&'a ScanSet> for TrackBuilderStage {
    type Output = Vec<Track>;

    fn initialize(&mut self, config: &DetectorConfig) -> StageResult<()> {
        self.config = Some(config.clone());
        Ok(())
    }

    fn execute(&mut self, input: &'a ScanSet) -> StageResult<Vec<Track>> {
        let config = self
            .config
            .as_ref()
            .ok_or_else(|| StageError::Internal("stage not initialized".into()))?;

        if input.len() < 2 {
            self.logger
                .detail(&format!("only {} scans, no motion to associate", input.len()));
        }

        let tracks = nearest_neighbor(input, config.association_distance);
        self.logger.record(&format!(
            "{} detections over {} scans -> {} tracks",
            input.detection_count(),
            input.len(),
            tracks.len()
        ));
        Ok(tracks)
    }

    fn cleanup(&mut self) {
        self.config = None;
    }
}
