use serde::{Deserialize, Serialize};

use super::point::{DeviceId, TimeSeriesPoint};

pub const MINUTE_MS: i64 = 60_000;

/// Floors a timestamp to the start of its minute.
pub fn floor_to_minute(timestamp: i64) -> i64 {
    timestamp.div_euclid(MINUTE_MS) * MINUTE_MS
}

/// Ceils a timestamp to the next minute boundary (identity on a boundary).
pub fn ceil_to_minute(timestamp: i64) -> i64 {
    let floored = floor_to_minute(timestamp);
    if floored == timestamp {
        timestamp
    } else {
        floored + MINUTE_MS
    }
}

/// Minute-aligned time range chosen by box selection. Always `end > start`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SelectionRange {
    pub start: i64,
    pub end: i64,
}

impl SelectionRange {
    /// Snaps a raw `[min, max]` selection outwards to whole minutes.
    /// Returns `None` if nothing is left after snapping.
    pub fn from_raw(min: i64, max: i64) -> Option<Self> {
        let (min, max) = if min <= max { (min, max) } else { (max, min) };
        let start = floor_to_minute(min);
        let end = ceil_to_minute(max);
        (end > start).then_some(Self { start, end })
    }

    pub fn contains(&self, timestamp: i64) -> bool {
        timestamp >= self.start && timestamp <= self.end
    }

    pub fn duration(&self) -> i64 {
        self.end - self.start
    }
}

/// Points copied from one device.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CopiedSeries {
    pub device_id: DeviceId,
    /// Sorted by timestamp, never empty.
    pub points: Vec<TimeSeriesPoint>,
}

/// Copied points, grouped per device in the order they were recorded.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Clipboard {
    pub series: Vec<CopiedSeries>,
    /// `Some` when the copy was scoped to a single device.
    pub single_device_id: Option<DeviceId>,
}

impl Clipboard {
    pub fn is_empty(&self) -> bool {
        self.series.iter().all(|s| s.points.is_empty())
    }

    pub fn point_count(&self) -> usize {
        self.series.iter().map(|s| s.points.len()).sum()
    }

    pub fn get(&self, device_id: &str) -> Option<&CopiedSeries> {
        self.series.iter().find(|s| s.device_id == device_id)
    }

    /// First point of the first recorded device; the paste offset is measured from it.
    pub fn anchor(&self) -> Option<&TimeSeriesPoint> {
        self.series.iter().find_map(|s| s.points.first())
    }
}
