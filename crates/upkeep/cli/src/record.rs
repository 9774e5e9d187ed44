//! NDJSON record format shared by `simulate` (writer) and `replay` (reader).

use serde::{Deserialize, Serialize};
use upkeep_types::{Baselines, TelemetrySample};

/// One input line: a sample and the baselines to judge it against.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReplayRecord {
    pub sample: TelemetrySample,

    #[serde(default)]
    pub baselines: Baselines,
}
