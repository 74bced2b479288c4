//! Magic pen: freehand strokes redraw a curve.
//!
//! The stroke is kept in pixels while drawing and converted to (time, value)
//! samples on release. Every existing point of the device inside the stroke's
//! time span takes the stroke's value at its timestamp, linearly interpolated
//! between samples.

use crate::data_types::{DeviceDataMap, DeviceId};
use crate::edit::MetricEdit;
use crate::surface::{ChartPoint, RenderSurface};

/// Stroke in progress, drawn by the host as an overlay.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Stroke {
    pub device_id: DeviceId,
    pub points: Vec<ChartPoint>,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct PenState {
    pub target: Option<DeviceId>,
    stroke: Option<Stroke>,
}

impl PenState {
    pub fn set_target(&mut self, device_id: Option<DeviceId>) {
        self.target = device_id;
    }

    /// Starts a stroke on the target, or on the curve under the pointer when
    /// there is no target. Returns false if there is nothing to draw on.
    pub fn begin(&mut self, at: ChartPoint, surface: &dyn RenderSurface, hit_test_px: f64) -> bool {
        let device_id = match &self.target {
            Some(target) => target.clone(),
            None => match surface.nearest_series(at, hit_test_px) {
                Some(hit) => hit.device_id,
                None => return false,
            },
        };
        self.stroke = Some(Stroke {
            device_id,
            points: vec![at],
        });
        true
    }

    pub fn extend(&mut self, at: ChartPoint) -> bool {
        match &mut self.stroke {
            Some(stroke) => {
                stroke.points.push(at);
                true
            }
            None => false,
        }
    }

    /// Ends the stroke and returns the edits it implies, or `None` if it
    /// covers no existing point.
    pub fn finish(
        &mut self,
        surface: &dyn RenderSurface,
        data: &DeviceDataMap,
    ) -> Option<(DeviceId, Vec<MetricEdit>)> {
        let stroke = self.stroke.take()?;
        let samples = stroke_samples(&stroke, surface);
        let (start, end) = (samples.first()?.0, samples.last()?.0);

        let edits: Vec<MetricEdit> = data
            .get(&stroke.device_id)?
            .range(start, end)
            .iter()
            .filter_map(|p| {
                Some(MetricEdit {
                    timestamp: p.timestamp,
                    value: interpolate(&samples, p.timestamp)?,
                })
            })
            .collect();

        if edits.is_empty() {
            tracing::debug!(device = %stroke.device_id, "stroke covers no point, discarded");
            return None;
        }
        Some((stroke.device_id, edits))
    }

    pub fn cancel(&mut self) {
        self.stroke = None;
    }

    pub fn overlay(&self) -> Option<&Stroke> {
        self.stroke.as_ref()
    }
}

/// (time, value) samples sorted by time; the last sample wins on equal times.
fn stroke_samples(stroke: &Stroke, surface: &dyn RenderSurface) -> Vec<(i64, f64)> {
    let mut samples: Vec<(i64, f64)> = stroke
        .points
        .iter()
        .map(|p| (surface.time_at(p.x), surface.value_at(p.y)))
        .filter(|(_, v)| v.is_finite())
        .collect();
    samples.sort_by_key(|(t, _)| *t);
    samples.dedup_by(|later, earlier| {
        if later.0 == earlier.0 {
            earlier.1 = later.1;
            true
        } else {
            false
        }
    });
    samples
}

fn interpolate(samples: &[(i64, f64)], timestamp: i64) -> Option<f64> {
    let idx = samples.partition_point(|(t, _)| *t < timestamp);
    let (t1, v1) = *samples.get(idx)?;
    if t1 == timestamp {
        return Some(v1);
    }
    let (t0, v0) = *samples.get(idx.checked_sub(1)?)?;
    let ratio = (timestamp - t0) as f64 / (t1 - t0) as f64;
    Some(v0 + (v1 - v0) * ratio)
}
