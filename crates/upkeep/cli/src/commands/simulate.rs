//! Synthesize degrading telemetry for `replay`

use std::io::{self, BufWriter, Write};

use chrono::{DateTime, Duration, TimeZone, Utc};
use clap::Args;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::info;
use upkeep_types::{Baselines, TelemetrySample};

use crate::error::{CliError, CliResult};
use crate::record::ReplayRecord;

/// Metrics every simulated device reports, with their healthy baselines.
const METRICS: [(&str, f64); 3] = [("temperature", 80.0), ("pressure", 120.0), ("flow_rate", 45.0)];

/// Arguments for `upkeep simulate`
#[derive(Args, Debug, Clone)]
pub struct SimulateArgs {
    /// Number of devices
    #[arg(short, long, default_value_t = 3)]
    pub devices: usize,

    /// Samples per device, one per hour
    #[arg(short, long, default_value_t = 48)]
    pub samples: usize,

    /// RNG seed; the same seed always produces the same stream
    #[arg(long, default_value_t = 42)]
    pub seed: u64,

    /// Fractional loss per sample for the fastest-degrading device
    #[arg(long, default_value_t = 0.01)]
    pub decay: f64,
}

pub fn execute(args: SimulateArgs) -> CliResult<()> {
    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    let written = simulate(&args, &mut out)?;
    out.flush()?;
    info!(records = written, seed = args.seed, "simulation written");
    Ok(())
}

/// Write `devices * samples` records, interleaved by hour.
///
/// Device 0 holds steady; device `d` loses `decay * d / (devices - 1)` of
/// each baseline per sample, plus up to ±0.5% noise.
pub fn simulate<W: Write>(args: &SimulateArgs, out: &mut W) -> CliResult<usize> {
    if args.devices == 0 {
        return Err(CliError::InvalidArgument("--devices must be at least 1".into()));
    }
    if !(args.decay.is_finite() && (0.0..1.0).contains(&args.decay)) {
        return Err(CliError::InvalidArgument("--decay must be in [0, 1)".into()));
    }

    let mut rng = StdRng::seed_from_u64(args.seed);
    let baselines: Baselines = METRICS.iter().map(|(m, b)| (m.to_string(), *b)).collect();
    let start = epoch();
    let mut written = 0;

    for step in 0..args.samples {
        let timestamp = start + Duration::hours(step as i64);
        for device in 0..args.devices {
            let rate = if args.devices == 1 {
                args.decay
            } else {
                args.decay * device as f64 / (args.devices - 1) as f64
            };
            let drift = (1.0 - rate * step as f64).max(0.0);

            let metrics = METRICS
                .iter()
                .map(|(name, baseline)| {
                    let noise = rng.gen_range(-0.005..0.005);
                    (name.to_string(), baseline * (drift + noise))
                })
                .collect();

            let record = ReplayRecord {
                sample: TelemetrySample::new(format!("device-{device:03}"), timestamp, metrics),
                baselines: baselines.clone(),
            };
            serde_json::to_writer(&mut *out, &record)?;
            out.write_all(b"\n")?;
            written += 1;
        }
    }
    Ok(written)
}

fn epoch() -> DateTime<Utc> {
    Utc.timestamp_opt(1_767_225_600, 0)
        .single()
        .unwrap_or_else(Utc::now)
}
