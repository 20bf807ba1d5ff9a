use crate::generator::scenario::{build_scan_set_from_config, GeneratorConfig};
use crate::ingest::{records_to_scan_set, ScanRecord};
use crate::report_bridge::model::ReportModel;
use crate::workflow::runner::Runner;
use anyhow::Result;
use serde_json::json;
use std::{
    net::SocketAddr,
    sync::{Arc, RwLock},
    thread,
};
use tokio::runtime::Builder;
use warp::{http::StatusCode, Filter};

pub fn report_bind_address(port: u16) -> SocketAddr {
    SocketAddr::from(([127, 0, 0, 1], port))
}

#[derive(Debug)]
struct WarpError;

impl warp::reject::Reject for WarpError {}

type SharedReport = Arc<RwLock<ReportModel>>;

fn store(state: &SharedReport, report: ReportModel) {
    let mut guard = state.write().unwrap_or_else(|poisoned| poisoned.into_inner());
    *guard = report;
}

/// Hosts the latest report for external renderers and accepts recordings
/// to screen over HTTP.
pub struct ReportBridge {
    state: SharedReport,
}

impl ReportBridge {
    pub fn new(runner: Arc<Runner>, address: SocketAddr) -> Self {
        let state: SharedReport = Arc::new(RwLock::new(ReportModel::default()));
        let state_for_filter = state.clone();
        let state_filter = warp::any().map(move || state_for_filter.clone());
        let runner_filter = warp::any().map(move || runner.clone());

        let get_route = warp::path("report")
            .and(warp::get())
            .and(state_filter.clone())
            .map(|state: SharedReport| {
                let guard = state.read().unwrap_or_else(|poisoned| poisoned.into_inner());
                warp::reply::json(&*guard)
            });

        let post_route = warp::path("ingest")
            .and(warp::post())
            .and(warp::body::json())
            .and(state_filter.clone())
            .and(runner_filter.clone())
            .and_then(
                |records: Vec<ScanRecord>, state: SharedReport, runner: Arc<Runner>| async move {
                    let outcome = records_to_scan_set(&records)
                        .map_err(anyhow::Error::from)
                        .and_then(|scans| runner.execute(&scans));
                    match outcome {
                        Ok(result) => {
                            let detected = result.multipath.is_some();
                            store(&state, ReportModel::from_result(None, &result));
                            Ok::<_, warp::Rejection>(warp::reply::with_status(
                                warp::reply::json(&json!({
                                    "status": "ok",
                                    "multipath": detected
                                })),
                                StatusCode::OK,
                            ))
                        }
                        Err(err) => {
                            log::warn!("ingest error: {:#}", err);
                            Err(warp::reject::custom(WarpError))
                        }
                    }
                },
            );

        let generator_route = warp::path("ingest-config")
            .and(warp::post())
            .and(warp::body::json())
            .and(state_filter)
            .and(runner_filter)
            .and_then(
                |config: GeneratorConfig, state: SharedReport, runner: Arc<Runner>| async move {
                    match build_scan_set_from_config(&config).and_then(|scans| runner.execute(&scans))
                    {
                        Ok(result) => {
                            let detected = result.multipath.is_some();
                            store(
                                &state,
                                ReportModel::from_result(config.scenario.clone(), &result),
                            );
                            if let Some(name) = config.scenario.as_ref() {
                                log::info!("scenario {} -> multipath {}", name, detected);
                            }
                            Ok::<_, warp::Rejection>(warp::reply::with_status(
                                warp::reply::json(&json!({
                                    "status": "ok",
                                    "multipath": detected,
                                    "description": config.description.clone().unwrap_or_default()
                                })),
                                StatusCode::OK,
                            ))
                        }
                        Err(err) => {
                            log::warn!("ingest-config error: {:#}", err);
                            Err(warp::reject::custom(WarpError))
                        }
                    }
                },
            );

        thread::spawn(move || {
            let routes = get_route.or(post_route).or(generator_route);
            let runtime = match Builder::new_current_thread().enable_all().build() {
                Ok(runtime) => runtime,
                Err(err) => {
                    log::error!("report bridge runtime: {}", err);
                    return;
                }
            };
            runtime.block_on(async move {
                match warp::serve(routes).try_bind_ephemeral(address) {
                    Ok((bound, server)) => {
                        log::info!("report bridge listening on {}", bound);
                        server.await;
                    }
                    Err(err) => log::error!("report bridge bind {}: {}", address, err),
                }
            });
        });

        Self { state }
    }

    pub fn publish(&self, report: ReportModel) -> Result<()> {
        println!(
            "[report] {} scans, {} tracks retained, multipath: {}",
            report.scans.len(),
            report.retained_track_count,
            report.multipath.is_some()
        );
        store(&self.state, report);
        Ok(())
    }

    pub fn publish_status(&self, message: &str) {
        println!("[report] {}", message);
    }

    #[cfg(test)]
    pub fn snapshot(&self) -> ReportModel {
        self.state
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }
}
