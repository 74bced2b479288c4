//! Overwrite-by-timestamp-range merge shared by every write path
//! (paste, average-copy, point drag, pen strokes).

use crate::data_types::{Dataset, DeviceId, Metric, TimeSeriesPoint};

/// A new value for one timestamp of the edited metric.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MetricEdit {
    pub timestamp: i64,
    pub value: f64,
}

/// Removes every point of `existing` with `start <= timestamp <= end`, adds
/// `incoming` and re-sorts. Incoming points without any finite reading are dropped.
pub fn overwrite_range(
    existing: &Dataset,
    start: i64,
    end: i64,
    incoming: impl IntoIterator<Item = TimeSeriesPoint>,
) -> Dataset {
    let mut points: Vec<TimeSeriesPoint> = existing
        .iter()
        .filter(|p| p.timestamp < start || p.timestamp > end)
        .cloned()
        .collect();
    points.extend(incoming.into_iter().filter(TimeSeriesPoint::has_reading));
    Dataset::from_points(points)
}

/// Moves points by `offset` ms and reassigns them to `device_id`.
pub fn shift_points(points: &[TimeSeriesPoint], offset: i64, device_id: &DeviceId) -> Vec<TimeSeriesPoint> {
    points
        .iter()
        .map(|p| TimeSeriesPoint {
            device_id: device_id.clone(),
            timestamp: p.timestamp + offset,
            temperature: p.temperature,
            humidity: p.humidity,
        })
        .collect()
}

/// Time-shifts `points` so the first lands on `target_timestamp` and writes
/// them over the covered range of `existing`.
pub fn paste_onto(
    existing: &Dataset,
    device_id: &DeviceId,
    points: &[TimeSeriesPoint],
    offset: i64,
    target_timestamp: i64,
) -> Dataset {
    let shifted = shift_points(points, offset, device_id);
    let Some(paste_end) = shifted.last().map(|p| p.timestamp) else {
        return existing.clone();
    };
    overwrite_range(existing, target_timestamp, paste_end, shifted)
}

/// Applies per-timestamp edits of one metric to a device's dataset.
///
/// The edited span is `[first edit, last edit]`; points inside it are replaced
/// by the edited ones. An edit at an existing timestamp keeps that point's other
/// reading; otherwise the other reading is carried over from the nearest earlier
/// point (or the nearest later one). Returns `None` if no edit is usable.
pub fn apply_metric_edits(
    existing: &Dataset,
    device_id: &DeviceId,
    metric: Metric,
    edits: &[MetricEdit],
) -> Option<Dataset> {
    let mut edits: Vec<MetricEdit> = edits.iter().copied().filter(|e| e.value.is_finite()).collect();
    if edits.is_empty() {
        return None;
    }
    edits.sort_by_key(|e| e.timestamp);
    edits.dedup_by(|later, earlier| {
        if later.timestamp == earlier.timestamp {
            earlier.value = later.value;
            true
        } else {
            false
        }
    });

    let start = edits.first()?.timestamp;
    let end = edits.last()?.timestamp;

    let edited: Vec<TimeSeriesPoint> = edits
        .iter()
        .map(|edit| {
            let mut point = match existing.at(edit.timestamp) {
                Some(p) => p.clone(),
                None => carried_point(existing, device_id, edit.timestamp),
            };
            metric.set(&mut point, edit.value);
            point
        })
        .collect();

    Some(overwrite_range(existing, start, end, edited))
}

fn carried_point(existing: &Dataset, device_id: &DeviceId, timestamp: i64) -> TimeSeriesPoint {
    let idx = existing.partition_point(|p| p.timestamp < timestamp);
    let neighbour = idx
        .checked_sub(1)
        .and_then(|i| existing.get(i))
        .or_else(|| existing.get(idx));
    match neighbour {
        Some(n) => TimeSeriesPoint::new(device_id.clone(), timestamp, n.temperature, n.humidity),
        None => TimeSeriesPoint::new(device_id.clone(), timestamp, 0.0, 0.0),
    }
}
