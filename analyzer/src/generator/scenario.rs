use anyhow::Context;
use multipathcore::scan_interface::{Detection, Point2, ScanSet};
use rand::{rngs::StdRng, Rng, SeedableRng};
use serde::{Deserialize, Serialize};

/// Configuration for generating a synthetic multipath recording.
///
/// A large reflector sweeps across the bow at `reflector_range`, its ghost
/// trails at `ghost_range_factor` times that range, and an optional parked
/// object sits off to the side for the whole recording.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    pub scans: usize,
    pub scan_interval: f64,
    pub reflector_range: f64,
    pub reflector_area: f64,
    pub ghost_range_factor: f64,
    pub ghost_area: f64,
    pub start_bearing_deg: f64,
    pub sweep_deg_per_scan: f64,
    pub parked_object: bool,
    pub noise: f64,
    pub seed: u64,
    pub description: Option<String>,
    pub scenario: Option<String>,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            scans: 20,
            scan_interval: 0.25,
            reflector_range: 35.0,
            reflector_area: 220.0,
            ghost_range_factor: 2.0,
            ghost_area: 30.0,
            start_bearing_deg: -40.0,
            sweep_deg_per_scan: 4.0,
            parked_object: true,
            noise: 0.2,
            seed: 0,
            description: None,
            scenario: None,
        }
    }
}

fn square_hull(x: f64, y: f64, area: f64) -> Vec<Point2> {
    let half = area.max(0.0).sqrt() / 2.0;
    vec![
        Point2::new(x - half, y - half),
        Point2::new(x + half, y - half),
        Point2::new(x + half, y + half),
        Point2::new(x - half, y + half),
    ]
}

fn cluster(range: f64, bearing_deg: f64, area: f64, jitter: (f64, f64)) -> Detection {
    let bearing = bearing_deg.to_radians();
    let x = range * bearing.cos() + jitter.0;
    let y = range * bearing.sin() + jitter.1;
    Detection::from_hull(x, y, area, square_hull(x, y, area))
}

pub fn build_scan_set_from_config(config: &GeneratorConfig) -> anyhow::Result<ScanSet> {
    let mut rng = StdRng::seed_from_u64(config.seed);
    let noise = config.noise.abs();
    let mut jitter = move || {
        if noise > 0.0 {
            (rng.gen_range(-noise..noise), rng.gen_range(-noise..noise))
        } else {
            (0.0, 0.0)
        }
    };

    let mut scans = ScanSet::new();
    for step in 0..config.scans {
        let bearing = config.start_bearing_deg + config.sweep_deg_per_scan * step as f64;
        let mut detections = vec![
            cluster(config.reflector_range, bearing, config.reflector_area, jitter()),
            cluster(
                config.reflector_range * config.ghost_range_factor,
                bearing + config.sweep_deg_per_scan.signum() * 0.5,
                config.ghost_area,
                jitter(),
            ),
        ];
        if config.parked_object {
            detections.push(cluster(60.0, 170.0, 40.0, jitter()));
        }

        scans
            .push_scan(step as f64 * config.scan_interval, detections)
            .with_context(|| format!("generating scan {}", step))?;
    }

    Ok(scans)
}

pub fn build_scan_set(scans: usize, seed: u64) -> anyhow::Result<ScanSet> {
    let config = GeneratorConfig {
        scans,
        seed,
        ..Default::default()
    };
    build_scan_set_from_config(&config)
}
