//! Replay NDJSON telemetry through the engine

use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::PathBuf;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use clap::Args;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};
use upkeep_engine::{EngineConfig, EngineStats, JsonLinesEventSink, MaintenanceEngine};
use upkeep_types::MaintenanceSchedule;

use crate::error::CliResult;
use crate::record::ReplayRecord;

/// Arguments for `upkeep replay`
#[derive(Args, Debug)]
pub struct ReplayArgs {
    /// NDJSON input file, or "-" for stdin
    #[arg(short, long, default_value = "-")]
    pub input: String,

    /// Append engine events to this file as NDJSON
    #[arg(short, long)]
    pub events: Option<PathBuf>,

    /// Horizon for the final upcoming-maintenance report [default: scheduler.default_horizon_days]
    #[arg(long)]
    pub horizon_days: Option<u32>,
}

/// Final line of a replay.
#[derive(Debug, Serialize, Deserialize)]
pub struct ReplaySummary {
    pub upcoming: Vec<MaintenanceSchedule>,
    pub stats: EngineStats,
    pub malformed_lines: u64,
}

pub fn execute(args: ReplayArgs, config: &EngineConfig) -> CliResult<()> {
    let mut engine = MaintenanceEngine::new(config.clone())?;
    if let Some(path) = &args.events {
        engine = engine.with_sink(Arc::new(JsonLinesEventSink::open(path)?));
    }
    let horizon = args
        .horizon_days
        .unwrap_or(config.scheduler.default_horizon_days);

    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());

    let summary = if args.input == "-" {
        replay(io::stdin().lock(), &mut out, &engine, horizon)?
    } else {
        let file = File::open(&args.input)?;
        replay(BufReader::new(file), &mut out, &engine, horizon)?
    };

    info!(
        processed = summary.stats.samples_processed,
        rejected = summary.stats.samples_rejected,
        malformed = summary.malformed_lines,
        upcoming = summary.upcoming.len(),
        "replay finished"
    );
    Ok(())
}

/// Feed every record in `input` to `engine`, writing one outcome per
/// accepted record and a closing summary to `out`.
///
/// Malformed lines and rejected samples are logged and skipped. The summary's
/// upcoming list is taken as of the last accepted sample's timestamp.
pub fn replay<R: BufRead, W: Write>(
    input: R,
    out: &mut W,
    engine: &MaintenanceEngine,
    horizon_days: u32,
) -> CliResult<ReplaySummary> {
    let mut malformed_lines = 0u64;
    let mut last_seen: Option<DateTime<Utc>> = None;

    for (idx, line) in input.lines().enumerate() {
        let line = line?;
        let line_no = idx + 1;
        if line.trim().is_empty() {
            continue;
        }

        let record: ReplayRecord = match serde_json::from_str(&line) {
            Ok(r) => r,
            Err(e) => {
                warn!(line = line_no, error = %e, "skipping malformed record");
                malformed_lines += 1;
                continue;
            }
        };

        match engine.process(&record.sample, &record.baselines) {
            Ok(outcome) => {
                serde_json::to_writer(&mut *out, &outcome)?;
                out.write_all(b"\n")?;
                last_seen = Some(record.sample.timestamp);
            }
            Err(e) => debug!(line = line_no, error = %e, "record rejected by engine"),
        }
    }

    let now = last_seen.unwrap_or_else(Utc::now);
    let summary = ReplaySummary {
        upcoming: engine.upcoming_maintenance_at(horizon_days, now),
        stats: engine.stats(),
        malformed_lines,
    };
    serde_json::to_writer(&mut *out, &summary)?;
    out.write_all(b"\n")?;
    out.flush()?;
    engine.flush()?;
    Ok(summary)
}
