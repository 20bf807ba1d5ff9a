use anyhow::Context;
use clap::Parser;
use generator::build_scan_set;
use multipathcore::telemetry::MetricsRecorder;
use report_bridge::{report_bind_address, ReportBridge, ReportModel};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::runtime::Builder as TokioBuilder;
use tokio::signal;
use workflow::{find_recordings, DetectionInput, Runner, ScenarioLedger, WorkflowConfig};

mod generator;
mod ingest;
mod report_bridge;
mod workflow;

#[derive(Parser)]
#[command(author, version, about = "Screens recorded radar scans for multipath ghosts")]
struct Args {
    /// Recordings (JSON bag exports) to screen
    #[arg(long, num_args = 1..)]
    input: Vec<PathBuf>,
    /// Screen every JSON recording in the session directories under ROOT
    #[arg(long)]
    root: Option<PathBuf>,
    /// With --root, only screen recordings already listed in the ledger
    #[arg(long, default_value_t = false, requires = "root")]
    only_ledger: bool,
    /// Load a workflow config from YAML
    #[arg(long)]
    workflow: Option<PathBuf>,
    /// Directory receiving one report folder per multipath recording
    #[arg(long)]
    output_dir: Option<PathBuf>,
    /// Text file listing the recordings flagged as multipath scenarios
    #[arg(long)]
    ledger: Option<PathBuf>,
    /// Run the detector on the ingested scans instead of the track-filtered ones
    #[arg(long, default_value_t = false)]
    raw: bool,
    /// Screen a generated passing-reflector recording
    #[arg(long, default_value_t = false)]
    synthetic: bool,
    #[arg(long, default_value_t = 20)]
    scans: usize,
    #[arg(long, default_value_t = 0)]
    seed: u64,
    /// Keep the report bridge alive for incoming recordings
    #[arg(long, default_value_t = false)]
    serve: bool,
    #[arg(long, default_value_t = 9000)]
    port: u16,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    let workflow_config = if let Some(path) = args.workflow.as_ref() {
        let mut config = WorkflowConfig::load(path)?;
        if args.raw {
            config.detection_input = DetectionInput::Raw;
        }
        config.with_overrides(args.output_dir.clone(), args.ledger.clone())
    } else {
        let input = if args.raw {
            DetectionInput::Raw
        } else {
            DetectionInput::Filtered
        };
        WorkflowConfig::from_args(input, args.output_dir.clone(), args.ledger.clone())
    };

    let runner = Runner::new(workflow_config.clone());
    let bridge = args
        .serve
        .then(|| ReportBridge::new(Arc::new(runner.clone()), report_bind_address(args.port)));

    if args.synthetic {
        let scans = build_scan_set(args.scans, args.seed)?;
        let result = runner.execute(&scans)?;

        println!(
            "Synthetic run -> scans {}, tracks {} (retained {}), multipath {}",
            result.scan_count,
            result.track_count,
            result.retained_track_count,
            result.multipath.is_some()
        );
        if let Some(aggregate) = result.multipath.as_ref() {
            print!("{}", aggregate);
        }
        if let Some(bridge) = bridge.as_ref() {
            bridge.publish(ReportModel::from_result(Some("synthetic".into()), &result))?;
        }
    }

    let mut recordings = args.input.clone();
    if let Some(root) = args.root.as_ref() {
        let listed = if args.only_ledger {
            let ledger_path = workflow_config
                .ledger
                .as_ref()
                .context("--only-ledger needs a ledger path")?;
            Some(ScenarioLedger::new(ledger_path).entries()?)
        } else {
            None
        };
        recordings.extend(find_recordings(root, listed.as_deref())?);
    }

    let metrics = MetricsRecorder::new();
    for (idx, path) in recordings.iter().enumerate() {
        println!("Processing file {} of {}: {}", idx + 1, recordings.len(), path.display());
        match runner.process_file(path) {
            Ok(outcome) => {
                let detected = outcome.result.multipath.is_some();
                metrics.record_processed(detected);
                if detected {
                    println!("Multi path scenario");
                    if outcome.ledger_updated {
                        println!("  added to ledger");
                    }
                    if let Some(report) = outcome.report_path.as_ref() {
                        println!("  report -> {}", report.display());
                    }
                } else {
                    println!("No multi path scenario");
                }
                if let Some(bridge) = bridge.as_ref() {
                    let source = path.file_name().map(|n| n.to_string_lossy().into_owned());
                    bridge.publish(ReportModel::from_result(source, &outcome.result))?;
                }
            }
            Err(err) => {
                metrics.record_error();
                log::error!("skipping {}: {:#}", path.display(), err);
            }
        }
    }

    if !recordings.is_empty() {
        let snapshot = metrics.snapshot();
        println!(
            "Screened {} recordings: {} multipath, {} failed",
            snapshot.processed, snapshot.multipath, snapshot.errors
        );
    }

    if let Some(bridge) = bridge.as_ref() {
        bridge.publish_status("HTTP bridge running (Ctrl+C to stop)...");
        let runtime = TokioBuilder::new_current_thread()
            .enable_all()
            .build()
            .context("creating runtime for signal handling")?;
        runtime.block_on(async {
            signal::ctrl_c().await.context("awaiting Ctrl+C to exit")?;
            Ok::<(), anyhow::Error>(())
        })?;
    }

    Ok(())
}
