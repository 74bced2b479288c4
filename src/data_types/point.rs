use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Deref;
use std::sync::Arc;

/// Identifier of a sensor ("device") as reported by the container.
pub type DeviceId = String;

/// Which reading of a point is currently displayed and edited.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Metric {
    #[default]
    Temperature,
    Humidity,
}

impl Metric {
    pub fn value(self, point: &TimeSeriesPoint) -> f64 {
        match self {
            Metric::Temperature => point.temperature,
            Metric::Humidity => point.humidity,
        }
    }

    pub fn set(self, point: &mut TimeSeriesPoint, value: f64) {
        match self {
            Metric::Temperature => point.temperature = value,
            Metric::Humidity => point.humidity = value,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Metric::Temperature => "temperature",
            Metric::Humidity => "humidity",
        }
    }

    pub fn unit(self) -> &'static str {
        match self {
            Metric::Temperature => "°C",
            Metric::Humidity => "%RH",
        }
    }
}

/// A single sample of one device.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeSeriesPoint {
    pub device_id: DeviceId,
    /// Epoch milliseconds.
    pub timestamp: i64,
    pub temperature: f64,
    pub humidity: f64,
}

impl TimeSeriesPoint {
    pub fn new(device_id: impl Into<DeviceId>, timestamp: i64, temperature: f64, humidity: f64) -> Self {
        Self {
            device_id: device_id.into(),
            timestamp,
            temperature,
            humidity,
        }
    }

    /// At least one reading is finite. Points without any are never stored.
    pub fn has_reading(&self) -> bool {
        self.temperature.is_finite() || self.humidity.is_finite()
    }
}

/// Sorted, timestamp-unique samples of one device.
///
/// The backing storage is shared: cloning a `Dataset` is a reference-count
/// bump, so history snapshots of untouched devices cost nothing. A dataset
/// is never mutated in place; every edit builds a new one.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Dataset(Arc<[TimeSeriesPoint]>);

impl Default for Dataset {
    fn default() -> Self {
        Self(Arc::from(Vec::new()))
    }
}

impl Dataset {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Sorts by timestamp and drops duplicate timestamps.
    /// On duplicates the point that came last in `points` wins.
    pub fn from_points(mut points: Vec<TimeSeriesPoint>) -> Self {
        points.sort_by_key(|p| p.timestamp);
        let mut unique: Vec<TimeSeriesPoint> = Vec::with_capacity(points.len());
        for p in points {
            match unique.last_mut() {
                Some(last) if last.timestamp == p.timestamp => *last = p,
                _ => unique.push(p),
            }
        }
        Self(unique.into())
    }

    /// Like [`Dataset::from_points`] but also drops points with no usable reading.
    /// Used for data coming back from the cache.
    pub fn sanitized(points: Vec<TimeSeriesPoint>) -> Self {
        Self::from_points(
            points
                .into_iter()
                .filter(TimeSeriesPoint::has_reading)
                .collect(),
        )
    }

    pub fn as_slice(&self) -> &[TimeSeriesPoint] {
        &self.0
    }

    pub fn to_vec(&self) -> Vec<TimeSeriesPoint> {
        self.0.to_vec()
    }

    /// Points with `start <= timestamp <= end`.
    pub fn range(&self, start: i64, end: i64) -> &[TimeSeriesPoint] {
        if end < start {
            return &[];
        }
        let lo = self.0.partition_point(|p| p.timestamp < start);
        let hi = self.0.partition_point(|p| p.timestamp <= end);
        &self.0[lo..hi]
    }

    pub fn at(&self, timestamp: i64) -> Option<&TimeSeriesPoint> {
        self.0
            .binary_search_by_key(&timestamp, |p| p.timestamp)
            .ok()
            .map(|idx| &self.0[idx])
    }

    pub fn first_timestamp(&self) -> Option<i64> {
        self.0.first().map(|p| p.timestamp)
    }

    pub fn last_timestamp(&self) -> Option<i64> {
        self.0.last().map(|p| p.timestamp)
    }

    /// True when both handles point at the same storage.
    pub fn shares_storage(&self, other: &Dataset) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl Deref for Dataset {
    type Target = [TimeSeriesPoint];

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl From<Vec<TimeSeriesPoint>> for Dataset {
    fn from(points: Vec<TimeSeriesPoint>) -> Self {
        Self::from_points(points)
    }
}

/// All devices' datasets. Persistent map: clones share structure.
pub type DeviceDataMap = im::OrdMap<DeviceId, Dataset>;

/// Cache key of one device's dataset within a verification task.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct DatasetKey {
    pub task_id: String,
    pub device_id: DeviceId,
}

impl DatasetKey {
    pub fn new(task_id: impl Into<String>, device_id: impl Into<DeviceId>) -> Self {
        Self {
            task_id: task_id.into(),
            device_id: device_id.into(),
        }
    }
}

impl fmt::Display for DatasetKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.task_id, self.device_id)
    }
}
