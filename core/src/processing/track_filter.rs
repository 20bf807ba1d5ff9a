use crate::math::GeometryHelper;
use crate::prelude::{DetectorConfig, ProcessingStage, StageError, StageResult};
use crate::scan_interface::{Detection, Scan, ScanSet, Track};
use crate::telemetry::log::LogManager;

/// True when some sample of the track leaves the open disk of `radius`
/// around its first sample. Tracks with fewer than two samples never qualify.
pub fn leaves_home_disk(track: &Track, radius: f64) -> bool {
    if track.len() < 2 {
        return false;
    }
    let Some(home) = track.first() else {
        return false;
    };
    track
        .samples()
        .iter()
        .any(|sample| !GeometryHelper::point_in_disk(home.position(), radius, sample.position()))
}

/// Stationary-object classifier.
///
/// NOTE: despite the name, the returned tracks are the ones that DO leave
/// their home disk; tracks that stay inside it are dropped. Downstream
/// multipath logic depends on this polarity.
pub fn filter_tracks(tracks: &[Track], stationary_radius: f64) -> Vec<Track> {
    tracks
        .iter()
        .filter(|track| leaves_home_disk(track, stationary_radius))
        .cloned()
        .collect()
}

/// Rebuilds a recording holding only the detections that belong to `tracks`.
///
/// Each track sample is matched back to the first detection of the original
/// scan at exactly the same position that no earlier sample has claimed, so
/// area and hull survive even when two detections share a position. Within a
/// scan detections follow track order; scans no track touches are left out.
/// A sample with no matching detection is skipped with a warning.
pub fn reconstruct_scans(tracks: &[Track], original: &ScanSet) -> StageResult<ScanSet> {
    let logger = LogManager::new("reconstruction");
    let mut buckets: Vec<Option<Vec<Detection>>> = vec![None; original.len()];
    let mut claimed: Vec<Vec<bool>> = original
        .iter()
        .map(|scan| vec![false; scan.detections.len()])
        .collect();

    for track in tracks {
        for sample in track.samples() {
            let idx = original.position_of(sample.timestamp).ok_or_else(|| {
                StageError::MalformedInput(format!(
                    "track {} refers to unknown scan t={:.6}",
                    track.id, sample.timestamp
                ))
            })?;
            let scan = &original.scans()[idx];
            let bucket = buckets[idx].get_or_insert_with(Vec::new);
            match scan.find_unclaimed_at(sample.position(), &claimed[idx]) {
                Some(hit) => {
                    claimed[idx][hit] = true;
                    bucket.push(scan.detections[hit].clone());
                }
                None => logger.warn(&format!(
                    "track {} sample ({:.3}, {:.3}) has no detection left in scan t={:.6}",
                    track.id, sample.x, sample.y, sample.timestamp
                )),
            }
        }
    }

    let scans = original
        .iter()
        .zip(buckets)
        .filter_map(|(scan, bucket)| bucket.map(|detections| Scan::new(scan.timestamp, detections)))
        .collect();
    ScanSet::from_scans(scans)
}

/// Stage wrapper around [`filter_tracks`].
pub struct TrackFilterStage {
    config: Option<DetectorConfig>,
    logger: LogManager,
}

impl TrackFilterStage {
    pub fn new() -> Self {
        Self {
            config: None,
            logger: LogManager::new("track-filter"),
        }
    }
}

impl Default for TrackFilterStage {
    fn default() -> Self {
        Self::new()
    }
}

impl ProcessingStage<Vec<Track>> for TrackFilterStage {
    type Output = Vec<Track>;

    fn initialize(&mut self, config: &DetectorConfig) -> StageResult<()> {
        if !(config.stationary_radius > 0.0) {
            return Err(StageError::Internal(format!(
                "stationary radius must be positive, got {}",
                config.stationary_radius
            )));
        }
        self.config = Some(config.clone());
        Ok(())
    }

    fn execute(&mut self, input: Vec<Track>) -> StageResult<Vec<Track>> {
        let config = self
            .config
            .as_ref()
            .ok_or_else(|| StageError::Internal("stage not initialized".into()))?;

        let short = input.iter().filter(|track| track.len() < 2).count();
        let retained = filter_tracks(&input, config.stationary_radius);
        self.logger.record(&format!(
            "retained {} of {} tracks ({} too short to classify)",
            retained.len(),
            input.len(),
            short
        ));
        Ok(retained)
    }

    fn cleanup(&mut self) {
        self.config = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scan_interface::Point2;

    fn track(id: usize, points: &[(f64, f64)]) -> Track {
        let mut track = Track::new(id);
        for (idx, &(x, y)) in points.iter().enumerate() {
            track.push(idx as f64, x, y);
        }
        track
    }

    #[test]
    fn keeps_only_tracks_that_leave_the_disk() {
        let tracks = vec![
            track(0, &[(0.0, 0.0), (5.0, 5.0), (10.0, 0.0)]),
            track(1, &[(0.0, 0.0), (20.0, 0.0), (35.0, 0.0)]),
            track(2, &[(100.0, 100.0)]),
        ];
        let retained = filter_tracks(&tracks, 30.0);
        assert_eq!(retained.len(), 1);
        assert_eq!(retained[0].id, 1);
    }

    #[test]
    fn sample_on_the_circle_counts_as_outside() {
        let tracks = vec![track(0, &[(0.0, 0.0), (30.0, 0.0)])];
        assert_eq!(filter_tracks(&tracks, 30.0).len(), 1);
    }

    #[test]
    fn filtering_twice_changes_nothing() {
        let tracks = vec![
            track(0, &[(0.0, 0.0), (50.0, 0.0)]),
            track(1, &[(0.0, 0.0), (1.0, 0.0)]),
            track(2, &[(5.0, 5.0), (5.0, 40.0), (5.0, 5.0)]),
        ];
        let once = filter_tracks(&tracks, 30.0);
        let twice = filter_tracks(&once, 30.0);
        assert_eq!(once, twice);
    }

    #[test]
    fn reconstruction_preserves_detection_fields() {
        let hull = vec![Point2::new(0.0, 0.0), Point2::new(1.0, 0.0), Point2::new(0.0, 1.0)];
        let original = ScanSet::from_scans(vec![
            Scan::new(
                0.0,
                vec![
                    Detection::from_hull(1.0, 2.0, 77.5, hull.clone()),
                    Detection::from_hull(9.0, 9.0, 3.0, hull.clone()),
                ],
            ),
            Scan::new(1.0, vec![Detection::from_hull(40.0, 2.0, 12.25, hull)]),
        ])
        .unwrap();
        let tracks = vec![track(0, &[(1.0, 2.0), (40.0, 2.0)])];

        let rebuilt = reconstruct_scans(&tracks, &original).unwrap();
        assert_eq!(rebuilt.len(), 2);
        assert_eq!(rebuilt.scans()[0].detections, vec![original.scans()[0].detections[0].clone()]);
        assert_eq!(rebuilt.scans()[1].detections, original.scans()[1].detections);
    }

    #[test]
    fn coincident_detections_each_keep_their_own_area() {
        let hull = vec![Point2::new(4.0, 4.0), Point2::new(6.0, 4.0), Point2::new(5.0, 6.0)];
        let original = ScanSet::from_scans(vec![Scan::new(
            0.0,
            vec![
                Detection::from_hull(5.0, 5.0, 100.0, hull.clone()),
                Detection::from_hull(5.0, 5.0, 300.0, hull),
            ],
        )])
        .unwrap();
        let tracks = crate::processing::nearest_neighbor(&original, 10.0);
        assert_eq!(tracks.len(), 2);

        let rebuilt = reconstruct_scans(&tracks, &original).unwrap();
        let areas: Vec<f64> = rebuilt.scans()[0].detections.iter().map(|d| d.area).collect();
        assert_eq!(areas, vec![100.0, 300.0]);
    }

    #[test]
    fn sample_without_detection_is_skipped() {
        let original = ScanSet::from_scans(vec![
            Scan::new(0.0, vec![Detection::new(1.0, 1.0, 5.0, Vec::new())]),
            Scan::new(1.0, vec![Detection::new(2.0, 2.0, 5.0, Vec::new())]),
        ])
        .unwrap();
        let tracks = vec![track(0, &[(1.0, 1.0), (8.0, 8.0)])];

        let rebuilt = reconstruct_scans(&tracks, &original).unwrap();
        assert_eq!(rebuilt.len(), 2);
        assert_eq!(rebuilt.scans()[0].detections.len(), 1);
        assert!(rebuilt.scans()[1].detections.is_empty());
    }

    #[test]
    fn reconstruction_rejects_unknown_timestamps() {
        let original = ScanSet::from_scans(vec![Scan::new(0.0, Vec::new())]).unwrap();
        let mut stray = Track::new(0);
        stray.push(2.5, 0.0, 0.0);
        assert!(matches!(
            reconstruct_scans(&[stray], &original),
            Err(StageError::MalformedInput(_))
        ));
    }
}
