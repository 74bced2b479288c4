use std::ops::Range;

use rayon::prelude::*;

use super::common::{finite_points, merge_runs, scan_buckets, BucketExtrema};
use crate::config::LodConfig;
use crate::data_types::{Metric, TimeSeriesPoint, Viewport};

/// Resolves the window actually drawn and the index range of the points in it.
///
/// The requested viewport is clamped into the data extent (edges swapped if
/// clamping inverted them). If no point falls inside, the whole series is used.
pub fn effective_window(
    points: &[TimeSeriesPoint],
    viewport: Option<Viewport>,
) -> Option<(Viewport, Range<usize>)> {
    let first = points.first()?.timestamp;
    let last = points.last()?.timestamp;
    let extent = Viewport::new(first, last);

    let window = match viewport {
        Some(v) => Viewport::new(v.min.clamp(first, last), v.max.clamp(first, last)),
        None => extent,
    };

    let start = points.partition_point(|p| p.timestamp < window.min);
    let end = points.partition_point(|p| p.timestamp <= window.max);
    if start < end {
        Some((window, start..end))
    } else {
        Some((extent, 0..points.len()))
    }
}

/// Bucket width for a window of `duration` ms.
pub fn bucket_duration(duration: i64, config: &LodConfig) -> i64 {
    let target_buckets = (config.max_points / 2).max(1) as i64;
    (duration / target_buckets).max(config.min_bucket_ms).max(1)
}

/// Level-of-detail reduction of one device's sorted series for the given window.
///
/// Small or sparse windows come back at full resolution. Otherwise the window
/// is cut into fixed-duration buckets and each bucket contributes its minimum
/// and maximum `metric` point (one point when they coincide), in time order.
/// The output is always a time-ordered subsequence of the finite input.
pub fn reduce(
    points: &[TimeSeriesPoint],
    viewport: Option<Viewport>,
    metric: Metric,
    config: &LodConfig,
) -> Vec<TimeSeriesPoint> {
    let (Some(first), Some(last)) = (points.first(), points.last()) else {
        return Vec::new();
    };
    if last.timestamp <= first.timestamp {
        return finite_points(points, metric);
    }

    let Some((window, range)) = effective_window(points, viewport) else {
        return Vec::new();
    };
    let visible = &points[range];
    let duration = window.span().max(1);

    let finite = visible.iter().filter(|p| metric.value(p).is_finite()).count();
    if duration <= config.detail_threshold_ms || finite <= config.max_points {
        return finite_points(visible, metric);
    }

    let bucket_ms = bucket_duration(duration, config);
    let runs = if visible.len() >= config.parallel_threshold {
        scan_parallel(visible, window.min, bucket_ms, metric, config.parallel_threshold)
    } else {
        scan_buckets(visible, 0, window.min, bucket_ms, metric)
    };

    let mut output = Vec::with_capacity(runs.len() * 2);
    for run in &runs {
        emit_bucket(visible, run, &mut output);
    }

    tracing::debug!(
        visible = visible.len(),
        reduced = output.len(),
        bucket_ms,
        "lod reduction"
    );
    output
}

fn scan_parallel(
    visible: &[TimeSeriesPoint],
    origin: i64,
    bucket_ms: i64,
    metric: Metric,
    chunk_len: usize,
) -> Vec<BucketExtrema> {
    let chunk_len = chunk_len.max(1);
    let chunks: Vec<Vec<BucketExtrema>> = visible
        .par_chunks(chunk_len)
        .enumerate()
        .map(|(ci, chunk)| scan_buckets(chunk, ci * chunk_len, origin, bucket_ms, metric))
        .collect();
    merge_runs(chunks)
}

#[inline(always)]
fn emit_bucket(visible: &[TimeSeriesPoint], run: &BucketExtrema, output: &mut Vec<TimeSeriesPoint>) {
    let p_min = &visible[run.min_idx];
    let p_max = &visible[run.max_idx];
    if p_min.timestamp == p_max.timestamp {
        output.push(p_min.clone());
    } else if p_min.timestamp < p_max.timestamp {
        output.push(p_min.clone());
        output.push(p_max.clone());
    } else {
        output.push(p_max.clone());
        output.push(p_min.clone());
    }
}
