use serde::{Deserialize, Serialize};

use crate::data_types::{Dataset, DeviceId, Metric};

/// Summary of one device's dataset for the displayed metric.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DatasetStats {
    pub device_id: DeviceId,
    pub metric: Metric,
    pub count: usize,
    pub first: Option<i64>,
    pub last: Option<i64>,
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub mean: Option<f64>,
}

impl DatasetStats {
    /// Non-finite readings are ignored for min/max/mean but still counted.
    pub fn compute(device_id: &DeviceId, dataset: &Dataset, metric: Metric) -> Self {
        let mut min = f64::INFINITY;
        let mut max = f64::NEG_INFINITY;
        let mut sum = 0.0;
        let mut n = 0usize;

        for p in dataset.iter() {
            let v = metric.value(p);
            if !v.is_finite() {
                continue;
            }
            min = min.min(v);
            max = max.max(v);
            sum += v;
            n += 1;
        }

        Self {
            device_id: device_id.clone(),
            metric,
            count: dataset.len(),
            first: dataset.first_timestamp(),
            last: dataset.last_timestamp(),
            min: (n > 0).then_some(min),
            max: (n > 0).then_some(max),
            mean: (n > 0).then(|| sum / n as f64),
        }
    }
}
