//! Editor configuration.
//!
//! Every field has a default, so a host can ship a partial JSON document
//! (or none at all) and get the stock behaviour.

use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LodConfig {
    /// Visible point count at or below which no reduction happens.
    pub max_points: usize,
    /// Windows at or below this duration are always drawn at full resolution.
    pub detail_threshold_ms: i64,
    /// Lower bound of a reduction bucket. Also the narrowest zoom width.
    pub min_bucket_ms: i64,
    /// Visible point count from which buckets are scanned in parallel.
    pub parallel_threshold: usize,
}

impl Default for LodConfig {
    fn default() -> Self {
        Self {
            max_points: 1500,
            detail_threshold_ms: 30 * 60 * 1000,
            min_bucket_ms: 30_000,
            parallel_threshold: 16_384,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewportConfig {
    /// Relative width change per wheel event.
    pub zoom_step: f64,
    /// Pointer travel (px) after which a pan counts as a drag.
    pub pan_threshold_px: f64,
    /// How long a context menu stays suppressed after a drag-pan.
    pub context_menu_suppress_ms: u64,
    /// Maximum distance (px) at which a series counts as "under the cursor".
    pub hit_test_px: f64,
}

impl Default for ViewportConfig {
    fn default() -> Self {
        Self {
            zoom_step: 0.15,
            pan_threshold_px: 3.0,
            context_menu_suppress_ms: 200,
            hit_test_px: 60.0,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HistoryConfig {
    pub depth: usize,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self { depth: 10 }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditConfig {
    /// Bucket width used by average-copy.
    pub average_bucket_ms: i64,
    /// Decimals kept in the read-only average report.
    pub average_decimals: u32,
    /// Maximum distance (px) between the pointer and a point for a point drag.
    pub drag_hit_px: f64,
}

impl Default for EditConfig {
    fn default() -> Self {
        Self {
            average_bucket_ms: 60_000,
            average_decimals: 1,
            drag_hit_px: 12.0,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    pub lod: LodConfig,
    pub viewport: ViewportConfig,
    pub history: HistoryConfig,
    pub edit: EditConfig,
}

impl EditorConfig {
    pub fn from_json_str(json: &str) -> eyre::Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json_string(&self) -> eyre::Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
