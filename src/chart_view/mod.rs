pub mod actions;
pub mod extremes;
pub mod input;

use std::time::Instant;

use crate::commit::{commit, restore, CommitOutcome};
use crate::config::EditorConfig;
use crate::container::DataContainer;
use crate::data_types::{DeviceId, Metric, SelectionRange, TimeSeriesPoint, Viewport};
use crate::decimation::reduce;
use crate::edit::{apply_metric_edits, MetricEdit};
use crate::error::{EditError, Notice};
use crate::history::History;
use crate::modes::{AverageReport, BasicState, Mode, ModeKind};
use crate::persistence::PersistenceBridge;
use crate::surface::{ChartPoint, InputPolicy, RenderSurface};

pub use actions::{ContextMenu, KeyCommand, MenuAction, MenuEntry};
pub use extremes::ExtremesGuard;
pub use input::{InputOutcome, PanGesture};

/// Editing engine behind one chart.
///
/// Owns the visible window, the active mode and the undo history. Datasets
/// stay with the host's [`DataContainer`]; every operation borrows it (and the
/// [`RenderSurface`] when geometry is needed) for the duration of the call.
pub struct ChartView {
    config: EditorConfig,
    metric: Metric,
    viewport: Option<Viewport>,
    mode: Mode,
    history: History,
    bridge: PersistenceBridge,

    pan: Option<PanGesture>,
    guard: ExtremesGuard,
    suppress_context_menu_until: Option<Instant>,
    hover: Option<ChartPoint>,
}

impl ChartView {
    pub fn new(config: EditorConfig, bridge: PersistenceBridge) -> Self {
        let history = History::new(config.history.depth);
        Self {
            config,
            metric: Metric::default(),
            viewport: None,
            mode: Mode::default(),
            history,
            bridge,
            pan: None,
            guard: ExtremesGuard::default(),
            suppress_context_menu_until: None,
            hover: None,
        }
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    /// Visible window; `None` means the full data extent.
    pub fn viewport(&self) -> Option<Viewport> {
        self.viewport
    }

    pub fn metric(&self) -> Metric {
        self.metric
    }

    pub fn set_metric(&mut self, metric: Metric) {
        self.metric = metric;
    }

    pub fn mode(&self) -> &Mode {
        &self.mode
    }

    pub fn mode_kind(&self) -> ModeKind {
        self.mode.kind()
    }

    pub fn input_policy(&self) -> InputPolicy {
        self.mode.input_policy()
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn bridge(&self) -> &PersistenceBridge {
        &self.bridge
    }

    /// Switches the active mode. All state of the previous mode is dropped;
    /// the viewport is kept.
    pub fn set_mode(&mut self, kind: ModeKind, surface: &mut dyn RenderSurface) -> InputPolicy {
        if self.mode.kind() != kind {
            tracing::info!(from = ?self.mode.kind(), to = ?kind, "mode switch");
            self.mode = Mode::new(kind);
        }
        let policy = self.mode.input_policy();
        surface.set_box_selection_enabled(policy.native_box_selection);
        policy
    }

    /// Sets the curve edited by drag and pen gestures. Ignored in basic mode.
    pub fn set_edit_target(&mut self, device_id: Option<DeviceId>) {
        match &mut self.mode {
            Mode::Basic(_) => {}
            Mode::Drag(state) => state.target = device_id,
            Mode::MagicPen(state) => state.set_target(device_id),
        }
    }

    /// New render context (different task or dataset identity): forgets the
    /// viewport, the history and all gesture and mode state.
    pub fn reset_context(&mut self) {
        self.viewport = None;
        self.mode = Mode::new(self.mode.kind());
        self.history.clear();
        self.pan = None;
        self.guard = ExtremesGuard::default();
        self.suppress_context_menu_until = None;
        self.hover = None;
        tracing::info!("render context reset");
    }

    /// Back to the full data extent.
    pub fn reset_view(&mut self, surface: &mut dyn RenderSurface) {
        self.viewport = None;
        self.guard.engage(None);
        surface.set_extremes_silently(None);
        tracing::debug!("viewport reset");
    }

    /// Reduced points of one device for the current window and metric.
    pub fn render_series<C: DataContainer + ?Sized>(&self, container: &C, device_id: &str) -> Vec<TimeSeriesPoint> {
        match container.data().get(device_id) {
            Some(dataset) => reduce(dataset, self.viewport, self.metric, &self.config.lod),
            None => Vec::new(),
        }
    }

    /// Reduced points of every rendered device.
    pub fn render<C: DataContainer + ?Sized>(&self, container: &C) -> Vec<(DeviceId, Vec<TimeSeriesPoint>)> {
        container
            .rendered_devices()
            .into_iter()
            .map(|device_id| {
                let points = self.render_series(container, &device_id);
                (device_id, points)
            })
            .collect()
    }

    fn basic(&self) -> Result<&BasicState, EditError> {
        self.mode.basic().ok_or(EditError::WrongMode)
    }

    fn basic_mut(&mut self) -> Result<&mut BasicState, EditError> {
        self.mode.basic_mut().ok_or(EditError::WrongMode)
    }

    /// Box-select reported by the surface. Returns the minute-snapped range,
    /// `None` if it collapsed.
    pub fn select_range(&mut self, raw_min: i64, raw_max: i64) -> Result<Option<SelectionRange>, EditError> {
        let selection = self.basic_mut()?.select(raw_min, raw_max);
        tracing::debug!(?selection, "selection");
        Ok(selection)
    }

    pub fn selection(&self) -> Option<SelectionRange> {
        self.mode.basic().and_then(|state| state.selection)
    }

    pub fn clear_selection(&mut self) -> Result<(), EditError> {
        self.basic_mut()?.clear_selection();
        Ok(())
    }

    pub fn copy<C: DataContainer + ?Sized>(
        &mut self,
        container: &C,
        device_filter: Option<&str>,
    ) -> Result<Notice, EditError> {
        let rendered = container.rendered_devices();
        let result = self.basic_mut()?.copy(container.data(), &rendered, device_filter);
        log_result("copy", &result);
        result
    }

    pub fn remove_clipboard(&mut self) -> Result<Notice, EditError> {
        self.basic_mut()?.remove_clipboard();
        Ok(Notice::info("Clipboard cleared"))
    }

    pub fn paste<C: DataContainer + ?Sized>(
        &mut self,
        container: &mut C,
        target_device: Option<&str>,
        target_timestamp: i64,
    ) -> Result<CommitOutcome, EditError> {
        let rendered = container.rendered_devices();
        let planned = self
            .basic()?
            .plan_paste(container.data(), &rendered, target_device, target_timestamp);
        log_result("paste", &planned);
        let updates = planned?;

        let notice = if updates.is_empty() {
            Notice::info("None of the copied devices is displayed")
        } else {
            Notice::success(format!("Pasted onto {} device(s)", updates.len()))
        };
        Ok(commit(&mut self.history, &self.bridge, container, updates, self.metric, notice))
    }

    pub fn compute_average<C: DataContainer + ?Sized>(
        &self,
        container: &C,
        device_filter: Option<&str>,
    ) -> Result<AverageReport, EditError> {
        let rendered = container.rendered_devices();
        let result = self.basic()?.compute_average(
            container.data(),
            &rendered,
            device_filter,
            self.config.edit.average_decimals,
        );
        log_result("average", &result);
        result
    }

    pub fn average_copy_to<C: DataContainer + ?Sized>(
        &mut self,
        container: &mut C,
        target_device: &str,
    ) -> Result<CommitOutcome, EditError> {
        let rendered = container.rendered_devices();
        let known = container.known_devices();
        let planned = self.basic()?.plan_average_copy(
            container.data(),
            &rendered,
            &known,
            target_device,
            self.metric,
            self.config.edit.average_bucket_ms,
        );
        log_result("average copy", &planned);
        let (device_id, dataset) = planned?;

        let notice = Notice::success(format!(
            "Copied per-minute {} averages to {device_id}",
            self.metric.label()
        ));
        Ok(commit(
            &mut self.history,
            &self.bridge,
            container,
            vec![(device_id, dataset)],
            self.metric,
            notice,
        ))
    }

    /// Commits one gesture's edits of the active metric on a single device.
    pub(crate) fn commit_edits<C: DataContainer + ?Sized>(
        &mut self,
        container: &mut C,
        device_id: DeviceId,
        edits: &[MetricEdit],
    ) -> Option<CommitOutcome> {
        let existing = container.data().get(&device_id).cloned().unwrap_or_default();
        let dataset = apply_metric_edits(&existing, &device_id, self.metric, edits)?;
        let notice = Notice::success(format!("Edited {} point(s) of {device_id}", edits.len()));
        Some(commit(
            &mut self.history,
            &self.bridge,
            container,
            vec![(device_id, dataset)],
            self.metric,
            notice,
        ))
    }

    pub fn undo<C: DataContainer + ?Sized>(&mut self, container: &mut C) -> Result<CommitOutcome, EditError> {
        let snapshot = self
            .history
            .undo(container.data().clone())
            .ok_or(EditError::NothingToUndo)?;
        tracing::info!(remaining = self.history.len(), "undo");
        Ok(restore(&self.bridge, container, snapshot, self.metric, Notice::info("Undone")))
    }

    pub fn redo<C: DataContainer + ?Sized>(&mut self, container: &mut C) -> Result<CommitOutcome, EditError> {
        let snapshot = self
            .history
            .redo(container.data().clone())
            .ok_or(EditError::NothingToRedo)?;
        tracing::info!(history = self.history.len(), "redo");
        Ok(restore(&self.bridge, container, snapshot, self.metric, Notice::info("Redone")))
    }
}

fn log_result<T>(operation: &str, result: &Result<T, EditError>) {
    if let Err(e) = result {
        tracing::warn!(operation, error = %e, "operation rejected");
    }
}
