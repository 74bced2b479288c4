use std::time::Duration;

use super::ChartView;
use crate::commit::CommitOutcome;
use crate::container::DataContainer;
use crate::data_types::{DeviceId, Viewport};
use crate::error::{EditError, Notice};
use crate::modes::{AverageReport, DragOutcome, Mode};
use crate::surface::{MouseButton, PointerEvent, RenderSurface, WheelEvent};
use crate::view_controller::ViewController;

/// Middle/right-button pan in progress.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PanGesture {
    pub button: MouseButton,
    pub start_x: f64,
    pub start: Viewport,
    pub has_moved: bool,
}

/// What an input event did, for the host to act on.
#[derive(Debug)]
pub enum InputOutcome {
    /// Not for us; let the surface handle it.
    Ignored,
    Consumed,
    ViewportChanged(Viewport),
    TargetChanged(Option<DeviceId>),
    Notice(Notice),
    Average(AverageReport),
    Committed(CommitOutcome),
    Rejected(EditError),
}

impl ChartView {
    fn current_window(&self, surface: &dyn RenderSurface, bounds: Viewport) -> Viewport {
        self.viewport.or_else(|| surface.extremes()).unwrap_or(bounds)
    }

    /// Stores `next` and pushes it to the surface without a feedback loop.
    fn push_viewport(&mut self, next: Viewport, surface: &mut dyn RenderSurface) -> InputOutcome {
        if self.viewport == Some(next) {
            return InputOutcome::Consumed;
        }
        self.viewport = Some(next);
        self.guard.engage(Some(next));
        surface.set_extremes_silently(Some(next));
        tracing::debug!(min = next.min, max = next.max, "viewport");
        InputOutcome::ViewportChanged(next)
    }

    /// Wheel zoom around the time value under the pointer.
    pub fn on_wheel<C: DataContainer + ?Sized>(
        &mut self,
        event: &WheelEvent,
        container: &C,
        surface: &mut dyn RenderSurface,
    ) -> InputOutcome {
        if event.delta_y == 0.0 || !event.delta_y.is_finite() {
            return InputOutcome::Ignored;
        }
        let Some(bounds) = container.data_bounds() else {
            return InputOutcome::Ignored;
        };

        let current = self.current_window(&*surface, bounds);
        let at = surface.normalize(event.position);
        let anchor = surface.time_at(at.x) as f64;
        let next = ViewController::zoom_at(
            current,
            anchor,
            event.delta_y < 0.0,
            self.config.viewport.zoom_step,
            self.config.lod.min_bucket_ms,
            bounds,
        );
        self.push_viewport(next, surface)
    }

    pub fn on_pointer_down<C: DataContainer + ?Sized>(
        &mut self,
        event: &PointerEvent,
        container: &C,
        surface: &mut dyn RenderSurface,
    ) -> InputOutcome {
        let Some(button) = event.button else {
            return InputOutcome::Ignored;
        };
        let at = surface.normalize(event.position);
        self.hover = Some(at);

        if button.pans() {
            let Some(bounds) = container.data_bounds() else {
                return InputOutcome::Ignored;
            };
            self.pan = Some(PanGesture {
                button,
                start_x: at.x,
                start: self.current_window(&*surface, bounds),
                has_moved: false,
            });
            return InputOutcome::Consumed;
        }

        let metric = self.metric;
        let drag_hit_px = self.config.edit.drag_hit_px;
        let hit_test_px = self.config.viewport.hit_test_px;
        match &mut self.mode {
            // Left button belongs to the surface's box selection.
            Mode::Basic(_) => InputOutcome::Ignored,
            Mode::Drag(state) => {
                state.begin(at, &*surface, container.data(), metric, drag_hit_px);
                InputOutcome::Consumed
            }
            Mode::MagicPen(state) => {
                if state.begin(at, &*surface, hit_test_px) {
                    InputOutcome::Consumed
                } else {
                    InputOutcome::Ignored
                }
            }
        }
    }

    pub fn on_pointer_move<C: DataContainer + ?Sized>(
        &mut self,
        event: &PointerEvent,
        container: &C,
        surface: &mut dyn RenderSurface,
    ) -> InputOutcome {
        let at = surface.normalize(event.position);
        self.hover = Some(at);

        if let Some(mut pan) = self.pan {
            let delta = at.x - pan.start_x;
            if delta.abs() > self.config.viewport.pan_threshold_px {
                pan.has_moved = true;
            }
            self.pan = Some(pan);
            let Some(bounds) = container.data_bounds() else {
                return InputOutcome::Consumed;
            };
            let next = ViewController::pan(pan.start, delta, surface.plot_width(), bounds);
            return self.push_viewport(next, surface);
        }

        let changed = match &mut self.mode {
            Mode::Basic(_) => return InputOutcome::Ignored,
            Mode::Drag(state) => state.update(at, &*surface),
            Mode::MagicPen(state) => state.extend(at),
        };
        if changed {
            InputOutcome::Consumed
        } else {
            InputOutcome::Ignored
        }
    }

    pub fn on_pointer_up<C: DataContainer + ?Sized>(
        &mut self,
        event: &PointerEvent,
        container: &mut C,
        surface: &mut dyn RenderSurface,
    ) -> InputOutcome {
        let at = surface.normalize(event.position);

        if let Some(pan) = self.pan {
            if event.button.map_or(true, |b| b == pan.button) {
                self.pan = None;
                if pan.has_moved {
                    let window = Duration::from_millis(self.config.viewport.context_menu_suppress_ms);
                    self.suppress_context_menu_until = Some(event.at + window);
                }
                return InputOutcome::Consumed;
            }
        }
        if event.button != Some(MouseButton::Left) {
            return InputOutcome::Ignored;
        }

        let click_tolerance_px = self.config.viewport.pan_threshold_px;
        let hit_test_px = self.config.viewport.hit_test_px;
        let finished = match &mut self.mode {
            Mode::Basic(_) => return InputOutcome::Ignored,
            Mode::Drag(state) => state.finish(at, &*surface, click_tolerance_px, hit_test_px),
            Mode::MagicPen(state) => match state.finish(&*surface, container.data()) {
                Some((device_id, edits)) => DragOutcome::Edit { device_id, edits },
                None => DragOutcome::None,
            },
        };

        match finished {
            DragOutcome::None => InputOutcome::Consumed,
            DragOutcome::TargetChanged(target) => {
                tracing::debug!(?target, "edit target");
                InputOutcome::TargetChanged(target)
            }
            DragOutcome::Edit { device_id, edits } => match self.commit_edits(container, device_id, &edits) {
                Some(outcome) => InputOutcome::Committed(outcome),
                None => InputOutcome::Consumed,
            },
        }
    }

    /// Whether a pan is in progress.
    pub fn is_panning(&self) -> bool {
        self.pan.is_some()
    }
}
