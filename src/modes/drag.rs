//! Drag mode: pick a target curve by clicking it, then drag single points of
//! the target vertically.

use crate::data_types::{DeviceDataMap, DeviceId, Metric};
use crate::edit::MetricEdit;
use crate::surface::{ChartPoint, RenderSurface};

/// A point of the target being dragged. `value` follows the pointer.
#[derive(Clone, Debug, PartialEq)]
pub struct PointDrag {
    pub device_id: DeviceId,
    pub timestamp: i64,
    pub original: f64,
    pub value: f64,
    pub moved: bool,
}

#[derive(Clone, Debug, PartialEq)]
enum Gesture {
    /// Press away from the target's points; may become a target toggle.
    Click { origin: ChartPoint },
    Point(PointDrag),
}

#[derive(Clone, Debug, PartialEq)]
pub enum DragOutcome {
    None,
    TargetChanged(Option<DeviceId>),
    Edit {
        device_id: DeviceId,
        edits: Vec<MetricEdit>,
    },
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct DragState {
    pub target: Option<DeviceId>,
    gesture: Option<Gesture>,
}

impl DragState {
    /// Clicking the current target deselects it, clicking another curve selects it.
    pub fn toggle_target(&mut self, device_id: &str) -> Option<DeviceId> {
        if self.target.as_deref() == Some(device_id) {
            self.target = None;
        } else {
            self.target = Some(device_id.to_string());
        }
        self.target.clone()
    }

    pub fn begin(
        &mut self,
        at: ChartPoint,
        surface: &dyn RenderSurface,
        data: &DeviceDataMap,
        metric: Metric,
        drag_hit_px: f64,
    ) {
        self.gesture = Some(
            self.grab_point(at, surface, data, metric, drag_hit_px)
                .map(Gesture::Point)
                .unwrap_or(Gesture::Click { origin: at }),
        );
    }

    fn grab_point(
        &self,
        at: ChartPoint,
        surface: &dyn RenderSurface,
        data: &DeviceDataMap,
        metric: Metric,
        drag_hit_px: f64,
    ) -> Option<PointDrag> {
        let target = self.target.as_ref()?;
        let hit = surface.nearest_series(at, drag_hit_px)?;
        if &hit.device_id != target {
            return None;
        }
        let point = data.get(target)?.at(hit.timestamp)?;
        let value = metric.value(point);
        Some(PointDrag {
            device_id: target.clone(),
            timestamp: point.timestamp,
            original: value,
            value,
            moved: false,
        })
    }

    /// Moves the grabbed point under the pointer. Returns whether the preview changed.
    pub fn update(&mut self, at: ChartPoint, surface: &dyn RenderSurface) -> bool {
        match &mut self.gesture {
            Some(Gesture::Point(drag)) => {
                let value = surface.value_at(at.y);
                if !value.is_finite() {
                    return false;
                }
                drag.value = value;
                drag.moved = true;
                true
            }
            _ => false,
        }
    }

    /// Ends the gesture. A moved point yields one edit; a short click toggles
    /// the target to the curve under the pointer.
    pub fn finish(
        &mut self,
        at: ChartPoint,
        surface: &dyn RenderSurface,
        click_tolerance_px: f64,
        hit_test_px: f64,
    ) -> DragOutcome {
        match self.gesture.take() {
            Some(Gesture::Point(drag)) => {
                if drag.moved && drag.value != drag.original {
                    DragOutcome::Edit {
                        device_id: drag.device_id,
                        edits: vec![MetricEdit {
                            timestamp: drag.timestamp,
                            value: drag.value,
                        }],
                    }
                } else {
                    DragOutcome::None
                }
            }
            Some(Gesture::Click { origin }) if at.distance(origin) <= click_tolerance_px => {
                match surface.nearest_series(at, hit_test_px) {
                    Some(hit) => DragOutcome::TargetChanged(self.toggle_target(&hit.device_id)),
                    None => DragOutcome::None,
                }
            }
            _ => DragOutcome::None,
        }
    }

    pub fn cancel(&mut self) {
        self.gesture = None;
    }

    pub fn is_active(&self) -> bool {
        self.gesture.is_some()
    }

    /// Point being dragged, for the host's preview layer.
    pub fn preview(&self) -> Option<&PointDrag> {
        match &self.gesture {
            Some(Gesture::Point(drag)) => Some(drag),
            _ => None,
        }
    }
}
