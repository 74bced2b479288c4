use crate::data_types::{Metric, TimeSeriesPoint};

/// Extremes of one time bucket, as indices into the scanned slice.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BucketExtrema {
    pub bucket: i64,
    pub min_idx: usize,
    pub min_val: f64,
    pub max_idx: usize,
    pub max_val: f64,
}

impl BucketExtrema {
    fn new(bucket: i64, idx: usize, val: f64) -> Self {
        Self {
            bucket,
            min_idx: idx,
            min_val: val,
            max_idx: idx,
            max_val: val,
        }
    }

    /// Strict comparisons: on ties the earlier point is kept.
    #[inline(always)]
    fn observe(&mut self, idx: usize, val: f64) {
        if val < self.min_val {
            self.min_val = val;
            self.min_idx = idx;
        }
        if val > self.max_val {
            self.max_val = val;
            self.max_idx = idx;
        }
    }

    /// Folds in the extremes of a run that comes later in time.
    fn absorb(&mut self, later: &BucketExtrema) {
        if later.min_val < self.min_val {
            self.min_val = later.min_val;
            self.min_idx = later.min_idx;
        }
        if later.max_val > self.max_val {
            self.max_val = later.max_val;
            self.max_idx = later.max_idx;
        }
    }
}

/// Scans sorted points and returns the extremes of every bucket they touch.
/// `offset` is added to the recorded indices so chunks of a larger slice can
/// be scanned independently. Non-finite readings are skipped.
pub fn scan_buckets(
    points: &[TimeSeriesPoint],
    offset: usize,
    origin: i64,
    bucket_ms: i64,
    metric: Metric,
) -> Vec<BucketExtrema> {
    let bucket_ms = bucket_ms.max(1);
    let mut runs: Vec<BucketExtrema> = Vec::new();

    for (i, p) in points.iter().enumerate() {
        let val = metric.value(p);
        if !val.is_finite() {
            continue;
        }
        let bucket = (p.timestamp - origin).div_euclid(bucket_ms);
        match runs.last_mut() {
            Some(run) if run.bucket == bucket => run.observe(offset + i, val),
            _ => runs.push(BucketExtrema::new(bucket, offset + i, val)),
        }
    }

    runs
}

/// Concatenates per-chunk runs in time order, merging a bucket split across
/// a chunk boundary.
pub fn merge_runs(chunks: Vec<Vec<BucketExtrema>>) -> Vec<BucketExtrema> {
    let mut merged: Vec<BucketExtrema> = Vec::with_capacity(chunks.iter().map(Vec::len).sum());
    for chunk in chunks {
        for run in chunk {
            match merged.last_mut() {
                Some(prev) if prev.bucket == run.bucket => prev.absorb(&run),
                _ => merged.push(run),
            }
        }
    }
    merged
}

/// Points whose `metric` reading is finite, in input order.
pub fn finite_points(points: &[TimeSeriesPoint], metric: Metric) -> Vec<TimeSeriesPoint> {
    points
        .iter()
        .filter(|p| metric.value(p).is_finite())
        .cloned()
        .collect()
}
