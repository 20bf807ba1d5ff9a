use multipathcore::multipath::MultiPathParent;
use multipathcore::prelude::{DetectorConfig, ProcessingStage};
use multipathcore::processing::{
    check_for_multi_path, filter_tracks, nearest_neighbor, reconstruct_scans, MultipathStage,
    TrackBuilderStage, TrackFilterStage,
};
use multipathcore::scan_interface::{Detection, Point2, Scan, ScanSet};
use rand::{rngs::StdRng, Rng, SeedableRng};

fn square_hull(x: f64, y: f64, half: f64) -> Vec<Point2> {
    vec![
        Point2::new(x - half, y - half),
        Point2::new(x + half, y - half),
        Point2::new(x + half, y + half),
        Point2::new(x - half, y + half),
    ]
}

fn polar(range: f64, bearing_deg: f64, area: f64) -> Detection {
    let bearing = bearing_deg.to_radians();
    let (x, y) = (range * bearing.cos(), range * bearing.sin());
    Detection::from_hull(x, y, area, square_hull(x, y, area.sqrt() / 2.0))
}

fn random_recording(seed: u64, scans: usize) -> ScanSet {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut set = ScanSet::new();
    let mut timestamp = 0.0;
    for _ in 0..scans {
        let count = rng.gen_range(0..6);
        let detections = (0..count)
            .map(|_| {
                let x = rng.gen_range(-80.0..80.0);
                let y = rng.gen_range(-80.0..80.0);
                Detection::from_hull(x, y, rng.gen_range(1.0..400.0), square_hull(x, y, 1.0))
            })
            .collect();
        set.push_scan(timestamp, detections).unwrap();
        timestamp += rng.gen_range(0.05..0.5);
    }
    set
}

/// A reflector passing the sensor at 35 m with its ghost at 70 m, plus a
/// parked object that never moves.
fn passing_reflector(scans: usize) -> ScanSet {
    let mut set = ScanSet::new();
    for step in 0..scans {
        let bearing = -40.0 + 4.0 * step as f64;
        let detections = vec![
            polar(35.0, bearing, 220.0),
            polar(70.0, bearing + 1.0, 30.0),
            Detection::from_hull(-60.0, 10.0, 40.0, square_hull(-60.0, 10.0, 3.0)),
        ];
        set.push_scan(step as f64 * 0.25, detections).unwrap();
    }
    set
}

#[test]
fn every_detection_lands_in_exactly_one_track() {
    for seed in 0..20 {
        let set = random_recording(seed, 30);
        let tracks = nearest_neighbor(&set, 10.0);

        let assigned: usize = tracks.iter().map(|t| t.len()).sum();
        assert_eq!(assigned, set.detection_count(), "seed {}", seed);

        for track in &tracks {
            assert!(track
                .samples()
                .windows(2)
                .all(|pair| pair[0].timestamp <= pair[1].timestamp));
        }
    }
}

#[test]
fn tight_cluster_forms_a_single_track() {
    let mut rng = StdRng::seed_from_u64(7);
    let mut set = ScanSet::new();
    for step in 0..25 {
        let x = 12.0 + rng.gen_range(-2.0..2.0);
        let y = -4.0 + rng.gen_range(-2.0..2.0);
        set.push_scan(step as f64, vec![Detection::from_hull(x, y, 5.0, square_hull(x, y, 1.0))])
            .unwrap();
    }
    assert_eq!(nearest_neighbor(&set, 10.0).len(), 1);
}

#[test]
fn crowded_cluster_still_forms_a_single_track() {
    let mut rng = StdRng::seed_from_u64(11);
    let mut set = ScanSet::new();
    set.push_scan(0.0, vec![Detection::from_hull(12.0, -4.0, 5.0, square_hull(12.0, -4.0, 1.0))])
        .unwrap();
    for step in 1..25 {
        let count = rng.gen_range(1..4);
        let detections = (0..count)
            .map(|_| {
                let x = 12.0 + rng.gen_range(-2.0..2.0);
                let y = -4.0 + rng.gen_range(-2.0..2.0);
                Detection::from_hull(x, y, 5.0, square_hull(x, y, 1.0))
            })
            .collect();
        set.push_scan(step as f64, detections).unwrap();
    }

    let tracks = nearest_neighbor(&set, 10.0);
    assert_eq!(tracks.len(), 1);
    assert_eq!(tracks[0].len(), set.detection_count());
}

#[test]
fn filter_is_idempotent_on_random_tracks() {
    for seed in 0..10 {
        let tracks = nearest_neighbor(&random_recording(seed, 40), 10.0);
        let once = filter_tracks(&tracks, 30.0);
        assert_eq!(filter_tracks(&once, 30.0), once);
    }
}

#[test]
fn parent_sector_is_six_degrees_each_side() {
    let half_width = DetectorConfig::default().sector_half_width_rad();
    let parent = MultiPathParent::from_detection(0.0, &polar(20.0, 27.0, 200.0), half_width);
    let six = 6.0_f64.to_radians();
    assert!((parent.bearing - parent.theta_min - six).abs() < 1e-9);
    assert!((parent.theta_max - parent.bearing - six).abs() < 1e-9);
}

#[test]
fn persistent_ghost_over_five_scans() {
    let frame = vec![polar(20.0, 0.0, 200.0), polar(40.0, 3.0, 20.0)];
    let set = ScanSet::from_scans((0..5).map(|i| Scan::new(i as f64, frame.clone())).collect())
        .unwrap();

    let aggregate = check_for_multi_path(&set, &DetectorConfig::default()).unwrap();
    assert_eq!(aggregate.number_of_parents(), 5);
    assert_eq!(aggregate.number_of_children(), 5);

    let brief = ScanSet::from_scans((0..2).map(|i| Scan::new(i as f64, frame.clone())).collect())
        .unwrap();
    assert!(check_for_multi_path(&brief, &DetectorConfig::default()).is_none());
}

#[test]
fn reconstruction_keeps_area_and_hull() {
    let set = random_recording(3, 30);
    let tracks = nearest_neighbor(&set, 10.0);
    let rebuilt = reconstruct_scans(&tracks, &set).unwrap();

    for scan in rebuilt.iter() {
        let source = set.scan_at(scan.timestamp).unwrap();
        for detection in &scan.detections {
            let original = source.find_at(detection.position()).unwrap();
            assert_eq!(detection.area, original.area);
            assert_eq!(detection.polygon, original.polygon);
        }
    }
    assert_eq!(rebuilt.detection_count(), set.detection_count());
}

#[test]
fn staged_pipeline_finds_the_passing_reflector() {
    let config = DetectorConfig::default();
    let recording = passing_reflector(20);

    let mut builder = TrackBuilderStage::new();
    builder.initialize(&config).unwrap();
    let tracks = builder.execute(&recording).unwrap();
    builder.cleanup();
    assert_eq!(tracks.len(), 3);

    let mut filter = TrackFilterStage::new();
    filter.initialize(&config).unwrap();
    let moving = filter.execute(tracks).unwrap();
    filter.cleanup();
    assert_eq!(moving.len(), 2);

    let filtered = reconstruct_scans(&moving, &recording).unwrap();
    assert_eq!(filtered.len(), 20);
    assert!(filtered
        .iter()
        .all(|scan| scan.detections.iter().all(|d| d.x != -60.0)));

    let mut detector = MultipathStage::new();
    detector.initialize(&config).unwrap();
    let aggregate = detector.execute(&filtered).unwrap().unwrap();
    detector.cleanup();
    assert_eq!(aggregate.number_of_timestamps(), 20);
    assert_eq!(aggregate.number_of_children(), 20);
}

#[test]
fn parked_reflector_is_removed_before_detection() {
    let config = DetectorConfig::default();
    let frame = vec![polar(20.0, 0.0, 200.0), polar(40.0, 3.0, 20.0)];
    let recording =
        ScanSet::from_scans((0..6).map(|i| Scan::new(i as f64, frame.clone())).collect()).unwrap();

    assert!(check_for_multi_path(&recording, &config).is_some());

    let tracks = filter_tracks(&nearest_neighbor(&recording, config.association_distance), 30.0);
    let filtered = reconstruct_scans(&tracks, &recording).unwrap();
    assert!(filtered.is_empty());
    assert!(check_for_multi_path(&filtered, &config).is_none());
}
